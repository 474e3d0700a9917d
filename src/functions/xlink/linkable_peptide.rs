// std imports
use std::sync::Arc;

// 3rd party imports
use fallible_iterator::FallibleIterator;

// internal imports
use crate::entities::peptide::PeptideCandidate;
use crate::errors::search_error::SearchError;
use crate::functions::candidate_generator::CandidateStream;
use crate::functions::decoy::DecoyGenerator;
use crate::functions::xlink::bond_map::XLinkBondMap;

/// Peptide with the offsets at which a linker may attach
///
#[derive(Clone, Debug)]
pub struct LinkablePeptide {
    /// Position in the pool the peptide belongs to, identifies cached ion series
    index: usize,
    candidate: Arc<PeptideCandidate>,
    link_sites: Vec<usize>,
}

impl LinkablePeptide {
    pub fn new(index: usize, candidate: Arc<PeptideCandidate>, link_sites: Vec<usize>) -> Self {
        Self {
            index,
            candidate,
            link_sites,
        }
    }

    /// Returns the offsets of residues taking part in a bond which are not blocked by a modification
    ///
    /// # Arguments
    /// * `candidate` - Peptide
    /// * `bond_map` - Bond map
    ///
    pub fn find_link_sites(candidate: &PeptideCandidate, bond_map: &XLinkBondMap) -> Vec<usize> {
        candidate
            .get_sequence()
            .chars()
            .enumerate()
            .filter(|(offset, residue)| {
                bond_map.is_linkable(*residue)
                    && !candidate
                        .get_modifications()
                        .map(|modifications| modifications.prevents_cross_link_at(*offset))
                        .unwrap_or(false)
            })
            .map(|(offset, _)| offset)
            .collect()
    }

    /// Wraps the candidate if it has at least one link site
    ///
    pub fn from_candidate(candidate: PeptideCandidate, bond_map: &XLinkBondMap) -> Option<Self> {
        let link_sites = Self::find_link_sites(&candidate, bond_map);
        if link_sites.is_empty() {
            return None;
        }
        Some(Self::new(0, Arc::new(candidate), link_sites))
    }

    /// Returns the decoy of the peptide. Link sites move with their residues,
    /// link site `k` of the decoy is link site `k` of the target.
    ///
    /// # Arguments
    /// * `decoy_generator` - Decoy generator
    /// * `index` - Index of the decoy in its pool
    ///
    pub fn to_decoy(&self, decoy_generator: &mut DecoyGenerator, index: usize) -> Self {
        let (decoy, permutation) = decoy_generator.to_decoy_with_permutation(&self.candidate);
        // decoy offset of each target offset
        let mut moved_to = vec![0; permutation.len()];
        for (decoy_offset, target_offset) in permutation.iter().enumerate() {
            moved_to[*target_offset] = decoy_offset;
        }
        let link_sites = self
            .link_sites
            .iter()
            .map(|site| moved_to[*site])
            .collect();
        Self::new(index, Arc::new(decoy), link_sites)
    }

    /// Returns the offset the given link site of this peptide has in a peptide derived from it,
    /// e.g. its decoy. None if the offset is not a link site of this peptide.
    ///
    /// # Arguments
    /// * `derived` - Peptide with link sites in the same order, e.g. the decoy
    /// * `link_site` - Link site of this peptide
    ///
    pub fn corresponding_link_site(&self, derived: &LinkablePeptide, link_site: usize) -> Option<usize> {
        let position = self.link_sites.iter().position(|site| *site == link_site)?;
        derived.link_sites.get(position).copied()
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_candidate(&self) -> &Arc<PeptideCandidate> {
        &self.candidate
    }

    pub fn get_link_sites(&self) -> &[usize] {
        &self.link_sites
    }

    pub fn get_mass(&self) -> i64 {
        self.candidate.get_mass()
    }

    pub fn is_decoy(&self) -> bool {
        self.candidate.is_decoy()
    }
}

/// Sorts the peptides by mass, stable, and numbers them by their new position
fn index_pool(mut pool: Vec<LinkablePeptide>) -> Vec<Arc<LinkablePeptide>> {
    pool.sort_by_key(|peptide| peptide.get_mass());
    pool.into_iter()
        .enumerate()
        .map(|(index, mut peptide)| {
            peptide.index = index;
            Arc::new(peptide)
        })
        .collect()
}

/// Collects all linkable peptides of the stream with a mass up to `max_mass`, sorted by mass.
/// Peptides without a link site are dropped.
///
/// # Arguments
/// * `stream` - Candidate stream
/// * `bond_map` - Bond map
/// * `max_mass` - Maximum mass (inclusive)
///
pub fn collect_pool(
    stream: CandidateStream<'_>,
    bond_map: &XLinkBondMap,
    max_mass: i64,
) -> Result<Vec<Arc<LinkablePeptide>>, SearchError> {
    let pool: Vec<LinkablePeptide> = stream
        .filter(|candidate| Ok(candidate.get_mass() <= max_mass))
        .filter_map(|candidate| Ok(LinkablePeptide::from_candidate(candidate, bond_map)))
        .collect()?;
    Ok(index_pool(pool))
}

/// Merges two pools into one pool sorted by mass, renumbering the peptides
///
pub fn merge_pools(
    pool_a: Vec<Arc<LinkablePeptide>>,
    pool_b: Vec<Arc<LinkablePeptide>>,
) -> Vec<Arc<LinkablePeptide>> {
    let merged: Vec<LinkablePeptide> = pool_a
        .into_iter()
        .chain(pool_b)
        .map(|peptide| Arc::unwrap_or_clone(peptide))
        .collect();
    index_pool(merged)
}

/// Returns the prefix of the mass sorted pool with masses up to `max_mass`
///
pub fn pool_up_to(pool: &[Arc<LinkablePeptide>], max_mass: i64) -> &[Arc<LinkablePeptide>] {
    let end = pool.partition_point(|peptide| peptide.get_mass() <= max_mass);
    &pool[..end]
}
