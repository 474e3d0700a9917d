/// Contains reader for protein FASTA files.
// std imports
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

// 3rd party imports
use fallible_iterator::FallibleIterator;
use tracing::warn;

// internal imports
use crate::entities::protein::Protein;
use crate::errors::search_error::SearchError;

/// Default buffer size
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Reader for FASTA files, yielding one protein per entry
pub struct Reader {
    internal_reader: BufReader<File>,
    /// Header of the next entry, already consumed from the file
    next_header: Option<String>,
}

impl Reader {
    /// Creates a new Reader
    ///
    /// # Arguments
    /// * `fasta_file_path` - Path to FASTA file
    /// * `buffer_size` - Size of the read buffer
    ///
    pub fn new(fasta_file_path: &Path, buffer_size: usize) -> Result<Self, SearchError> {
        let fasta_file = File::open(fasta_file_path).map_err(|err| {
            SearchError::SequenceSourceUnavailable(format!(
                "{}: {}",
                fasta_file_path.display(),
                err
            ))
        })?;
        Ok(Self {
            internal_reader: BufReader::with_capacity(buffer_size, fasta_file),
            next_header: None,
        })
    }

    /// Reads all proteins of the given file
    ///
    /// # Arguments
    /// * `fasta_file_path` - Path to FASTA file
    ///
    pub fn read_all(fasta_file_path: &Path) -> Result<Vec<Protein>, SearchError> {
        Self::new(fasta_file_path, DEFAULT_BUFFER_SIZE)?.collect()
    }

    /// Resets the reader to the beginning of the file
    ///
    pub fn reset(&mut self) -> Result<(), SearchError> {
        self.internal_reader.seek(SeekFrom::Start(0))?;
        self.next_header = None;
        Ok(())
    }

    /// Splits the header into accession and description.
    /// UniProt headers (`db|accession|entry name ...`) yield the accession in the middle.
    ///
    fn parse_header(header: &str) -> (String, String) {
        let header = header.trim_start_matches('>').trim();
        let (identifier, description) = match header.split_once(char::is_whitespace) {
            Some((identifier, description)) => (identifier, description.trim()),
            None => (header, ""),
        };
        let mut parts = identifier.split('|');
        let accession = match (parts.next(), parts.next()) {
            (Some(_), Some(accession)) if !accession.is_empty() => accession,
            _ => identifier,
        };
        (accession.to_string(), description.to_string())
    }
}

impl FallibleIterator for Reader {
    type Item = Protein;
    type Error = SearchError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        let mut header = self.next_header.take();
        let mut sequence = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            let num_bytes = self.internal_reader.read_line(&mut line)?;
            if num_bytes == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('>') {
                if header.is_some() {
                    self.next_header = Some(trimmed.to_string());
                    break;
                }
                header = Some(trimmed.to_string());
                continue;
            }
            if header.is_none() {
                warn!("Skipping sequence line before first FASTA header");
                continue;
            }
            sequence.push_str(trimmed);
        }
        match header {
            Some(header) => {
                let (accession, description) = Self::parse_header(&header);
                Ok(Some(Protein::new(accession, description, sequence)))
            }
            None => Ok(None),
        }
    }
}
