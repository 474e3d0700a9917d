// std imports
use std::path::Path;
use std::str::FromStr;

// 3rd party imports
use serde::Deserialize;

// internal imports
use crate::errors::search_error::SearchError;
use crate::functions::modification::{
    ModificationCollection, ModificationPosition, ModificationRule, ModificationType,
};

#[derive(Debug, Deserialize)]
struct ModificationCsvRecord {
    name: String,
    amino_acids: String,
    mass_delta: f64,
    mod_type: String,
    position: String,
    #[serde(default)]
    prevents_cleavage: Option<bool>,
    #[serde(default)]
    prevents_xlink: Option<bool>,
    #[serde(default)]
    symbol: Option<char>,
    #[serde(default)]
    max_per_peptide: Option<usize>,
}

impl TryFrom<ModificationCsvRecord> for ModificationRule {
    type Error = SearchError;

    fn try_from(record: ModificationCsvRecord) -> Result<Self, Self::Error> {
        let mod_type = ModificationType::from_str(&record.mod_type).map_err(|_| {
            SearchError::MalformedModificationRule(
                record.name.clone(),
                format!("unknown modification type '{}'", record.mod_type),
            )
        })?;
        let position = ModificationPosition::from_str(&record.position).map_err(|_| {
            SearchError::MalformedModificationRule(
                record.name.clone(),
                format!("unknown position '{}'", record.position),
            )
        })?;
        Ok(ModificationRule::new(
            record.name.trim(),
            &record.amino_acids.to_uppercase(),
            record.mass_delta,
            mod_type,
            position,
        )
        .with_prevents_cleavage(record.prevents_cleavage.unwrap_or(false))
        .with_prevents_cross_link(record.prevents_xlink.unwrap_or(false))
        .with_symbol(record.symbol)
        .with_max_per_peptide(record.max_per_peptide))
    }
}

/// Reader for modification rule tables.
/// Columns: `name,amino_acids,mass_delta,mod_type,position` followed by the optional
/// `prevents_cleavage,prevents_xlink,symbol,max_per_peptide`.
///
pub struct Reader {}

impl Reader {
    /// Reads the rules in file order
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file
    ///
    pub fn read(path: &Path) -> Result<Vec<ModificationRule>, SearchError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut rules: Vec<ModificationRule> = Vec::new();
        for record_res in reader.deserialize() {
            let record: ModificationCsvRecord = record_res?;
            rules.push(ModificationRule::try_from(record)?);
        }
        Ok(rules)
    }

    /// Reads and validates the rules
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file
    ///
    pub fn read_collection(path: &Path) -> Result<ModificationCollection, SearchError> {
        Ok(ModificationCollection::new(Self::read(path)?)?)
    }
}
