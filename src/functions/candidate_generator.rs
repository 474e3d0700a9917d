// std imports
use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::sync::Arc;

// 3rd party imports
use fallible_iterator::FallibleIterator;
use tracing::debug;

// internal imports
use crate::biology::digestion_enzyme::cleavage_specificity::CleavageSpecificity;
use crate::biology::digestion_enzyme::enzyme::Enzyme;
use crate::biology::digestion_enzyme::functions::get_enzyme_by_name;
use crate::chemistry::mass_basis::MassBasis;
use crate::entities::configuration::SearchConfiguration;
use crate::entities::constraint::{PeptideConstraint, MAX_SEQUENCE_LENGTH};
use crate::entities::peptide::{PeptideCandidate, PeptideSource};
use crate::entities::protein::Protein;
use crate::errors::search_error::SearchError;
use crate::functions::decoy::DecoyGenerator;
use crate::functions::modification_combinator::{ModificationCombinator, ModificationProfile};
use crate::functions::sequence_source::SequenceSource;

/// Lazy stream of candidates, restartable only by opening a new one
pub type CandidateStream<'a> =
    Box<dyn FallibleIterator<Item = PeptideCandidate, Error = SearchError> + Send + 'a>;

/// How the unmodified peptides are enumerated
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Binary search in a prebuilt, mass sorted peptide index
    IndexScan,
    /// Lazy scan over the proteins, for unspecific cleavage
    DatabaseScan,
    /// Digest all proteins, merge duplicates and sort by mass
    SortedDatabaseScan,
}

impl Display for ScanStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexScan => write!(f, "index scan"),
            Self::DatabaseScan => write!(f, "database scan"),
            Self::SortedDatabaseScan => write!(f, "sorted database scan"),
        }
    }
}

/// Digests the proteins, keeps peptides within the mass range, merges peptides with the same
/// sequence by appending their sources and sorts them by mass. Peptides with the same mass keep
/// the order in which they were found.
///
/// # Arguments
/// * `proteins` - Proteins
/// * `enzyme` - Enzyme, provides the length and missed cleavage limits
/// * `cleavage_specificity` - Cleavage specificity
/// * `mass_basis` - Mass basis
/// * `mass_range` - Inclusive (min, max) mass
///
pub fn digest_and_merge(
    proteins: &[Arc<Protein>],
    enzyme: &dyn Enzyme,
    cleavage_specificity: CleavageSpecificity,
    mass_basis: MassBasis,
    mass_range: (i64, i64),
) -> Vec<PeptideCandidate> {
    let mut candidates: Vec<PeptideCandidate> = Vec::new();
    let mut sequence_to_idx: HashMap<String, usize> = HashMap::new();
    for protein in proteins.iter() {
        for digested in enzyme.digest(protein.get_sequence(), cleavage_specificity) {
            let candidate = match PeptideCandidate::new(
                PeptideSource::new(protein.clone(), digested.start + 1),
                digested.length,
                digested.missed_cleavages,
                mass_basis,
            ) {
                Some(candidate) => candidate,
                None => continue,
            };
            if candidate.get_mass() < mass_range.0 || candidate.get_mass() > mass_range.1 {
                continue;
            }
            match sequence_to_idx.get(candidate.get_sequence()) {
                Some(idx) => candidates[*idx].merge(candidate),
                None => {
                    sequence_to_idx.insert(candidate.get_sequence().to_string(), candidates.len());
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates.sort_by_key(|candidate| candidate.get_mass());
    candidates
}

/// Lazy scan over the proteins, digesting one protein at a time
struct DatabaseScan<'a> {
    proteins: &'a [Arc<Protein>],
    next_protein_idx: usize,
    pending: std::vec::IntoIter<PeptideCandidate>,
    enzyme: Box<dyn Enzyme>,
    cleavage_specificity: CleavageSpecificity,
    mass_basis: MassBasis,
    mass_range: (i64, i64),
}

impl FallibleIterator for DatabaseScan<'_> {
    type Item = PeptideCandidate;
    type Error = SearchError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if let Some(candidate) = self.pending.next() {
                return Ok(Some(candidate));
            }
            let proteins = self.proteins;
            let Some(protein) = proteins.get(self.next_protein_idx) else {
                return Ok(None);
            };
            self.next_protein_idx += 1;
            let candidates: Vec<PeptideCandidate> = self
                .enzyme
                .digest(protein.get_sequence(), self.cleavage_specificity)
                .into_iter()
                .filter_map(|digested| {
                    PeptideCandidate::new(
                        PeptideSource::new(protein.clone(), digested.start + 1),
                        digested.length,
                        digested.missed_cleavages,
                        self.mass_basis,
                    )
                })
                .filter(|candidate| {
                    self.mass_range.0 <= candidate.get_mass() && candidate.get_mass() <= self.mass_range.1
                })
                .collect();
            self.pending = candidates.into_iter();
        }
    }
}

/// Places the modifications of one profile on each unmodified candidate, checks the exact
/// constraint and optionally turns the results into decoys
struct ModifiedCandidateStream<'a> {
    base: CandidateStream<'a>,
    combinator: &'a ModificationCombinator,
    profile: ModificationProfile,
    constraint: PeptideConstraint,
    /// Set if missed cleavages have to be recounted because modifications may prevent cleavage
    recount_enzyme: Option<Box<dyn Enzyme>>,
    decoy_generator: Option<DecoyGenerator>,
    pending: VecDeque<PeptideCandidate>,
}

impl ModifiedCandidateStream<'_> {
    fn modify(&mut self, base: PeptideCandidate) {
        for assignment in self.combinator.apply(&self.profile, &base) {
            let mut candidate = base.clone();
            candidate.set_modifications(assignment);
            if !self.constraint.contains_mass(candidate.get_mass()) {
                continue;
            }
            if let Some(enzyme) = &self.recount_enzyme {
                let blocked_residues = candidate
                    .get_modifications()
                    .map(|modifications| modifications.get_cleavage_blocked_residues())
                    .unwrap_or_default();
                let missed_cleavages =
                    enzyme.count_missed_cleavages(candidate.get_sequence(), &blocked_residues);
                if missed_cleavages > self.constraint.get_max_missed_cleavages() {
                    continue;
                }
                candidate.set_missed_cleavages(missed_cleavages);
            }
            let candidate = match self.decoy_generator.as_mut() {
                Some(decoy_generator) => decoy_generator.to_decoy(&candidate),
                None => candidate,
            };
            self.pending.push_back(candidate);
        }
    }
}

impl FallibleIterator for ModifiedCandidateStream<'_> {
    type Item = PeptideCandidate;
    type Error = SearchError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Ok(Some(candidate));
            }
            match self.base.next()? {
                Some(base) => self.modify(base),
                None => return Ok(None),
            }
        }
    }
}

/// Produces target and decoy candidates from a sequence source under a constraint
///
pub struct CandidateGenerator {
    source: Arc<dyn SequenceSource>,
    combinator: Arc<ModificationCombinator>,
    config: Arc<SearchConfiguration>,
}

impl CandidateGenerator {
    /// Creates a new candidate generator
    ///
    /// # Arguments
    /// * `source` - Sequence source
    /// * `combinator` - Modification combinator
    /// * `config` - Search configuration
    ///
    pub fn new(
        source: Arc<dyn SequenceSource>,
        combinator: Arc<ModificationCombinator>,
        config: Arc<SearchConfiguration>,
    ) -> Self {
        Self {
            source,
            combinator,
            config,
        }
    }

    pub fn get_combinator(&self) -> &Arc<ModificationCombinator> {
        &self.combinator
    }

    pub fn get_config(&self) -> &Arc<SearchConfiguration> {
        &self.config
    }

    /// True if modifications may change the number of missed cleavages
    fn needs_recount(&self, constraint: &PeptideConstraint) -> bool {
        constraint.get_cleavage_specificity() != CleavageSpecificity::None
            && self
                .combinator
                .get_collection()
                .has_cleavage_preventing_rules()
    }

    /// Missed cleavages the unmodified scan has to allow
    fn get_scan_missed_cleavages(&self, constraint: &PeptideConstraint) -> usize {
        if self.needs_recount(constraint) {
            // any internal site might be blocked by a modification
            constraint.get_max_length()
        } else {
            constraint.get_max_missed_cleavages()
        }
    }

    /// Returns the strategy `open` will use for the constraint
    ///
    pub fn get_strategy(&self, constraint: &PeptideConstraint) -> ScanStrategy {
        let scan_missed_cleavages = self.get_scan_missed_cleavages(constraint);
        match self.source.get_peptide_index() {
            Some(index) if index.is_compatible(constraint, scan_missed_cleavages) => {
                ScanStrategy::IndexScan
            }
            _ => match constraint.get_cleavage_specificity() {
                CleavageSpecificity::None => ScanStrategy::DatabaseScan,
                _ => ScanStrategy::SortedDatabaseScan,
            },
        }
    }

    /// Opens a stream of candidates without variable modifications (static modifications are applied).
    /// Decoys are generated with the configured method and seed.
    ///
    /// # Arguments
    /// * `constraint` - Constraint
    /// * `is_decoy` - If true the targets are turned into decoys
    ///
    pub fn open(
        &self,
        constraint: &PeptideConstraint,
        is_decoy: bool,
    ) -> Result<CandidateStream<'_>, SearchError> {
        let decoy_generator = is_decoy.then(|| {
            DecoyGenerator::new(self.config.get_decoy_method(), self.config.get_seed())
        });
        self.open_with_profile(constraint, &ModificationProfile::unmodified(), decoy_generator)
    }

    /// Opens a stream for the given neutral mass `target_mass ± window` (Dalton)
    ///
    /// # Arguments
    /// * `target_mass` - Neutral mass
    /// * `window` - Tolerance
    /// * `is_decoy` - If true the targets are turned into decoys
    ///
    pub fn open_for_mass(
        &self,
        target_mass: f64,
        window: f64,
        is_decoy: bool,
    ) -> Result<CandidateStream<'_>, SearchError> {
        let constraint = PeptideConstraint::from_configuration_for_mass(&self.config, target_mass, window)?;
        self.open(&constraint, is_decoy)
    }

    /// Opens a stream of candidates carrying exactly the variable modifications of the profile.
    /// Fails if the maximum length exceeds the sequence length limit or the source is unavailable.
    ///
    /// # Arguments
    /// * `constraint` - Constraint
    /// * `profile` - Modification profile
    /// * `decoy_generator` - If given, each target is turned into a decoy
    ///
    pub fn open_with_profile(
        &self,
        constraint: &PeptideConstraint,
        profile: &ModificationProfile,
        decoy_generator: Option<DecoyGenerator>,
    ) -> Result<CandidateStream<'_>, SearchError> {
        if constraint.get_max_length() > MAX_SEQUENCE_LENGTH {
            return Err(SearchError::ConstraintViolation(format!(
                "max length {} exceeds the limit of {}",
                constraint.get_max_length(),
                MAX_SEQUENCE_LENGTH
            )));
        }
        let variable_delta =
            profile.get_mass_delta(self.combinator.get_collection().get_variable_rules());
        let (static_min, static_max) = self
            .combinator
            .get_static_delta_range(constraint.get_max_length());
        let scan_mass_range = (
            constraint.get_min_mass() - variable_delta - static_max,
            constraint.get_max_mass() - variable_delta - static_min,
        );
        let scan_missed_cleavages = self.get_scan_missed_cleavages(constraint);
        let strategy = self.get_strategy(constraint);
        debug!("Opening {} for {}", strategy, profile);

        let base: CandidateStream<'_> = match strategy {
            ScanStrategy::IndexScan => {
                let index = self.source.get_peptide_index().ok_or_else(|| {
                    SearchError::SequenceSourceUnavailable("peptide index vanished".to_string())
                })?;
                let constraint = *constraint;
                let candidates = index
                    .get_mass_range(scan_mass_range.0, scan_mass_range.1)
                    .iter()
                    .filter(move |candidate| {
                        constraint.contains_length(candidate.get_length())
                            && (constraint.get_cleavage_specificity() == CleavageSpecificity::None
                                || candidate.get_missed_cleavages() <= scan_missed_cleavages)
                    })
                    .cloned()
                    .map(Ok::<PeptideCandidate, SearchError>);
                Box::new(fallible_iterator::convert(candidates))
            }
            ScanStrategy::DatabaseScan => Box::new(DatabaseScan {
                proteins: self.source.get_proteins()?,
                next_protein_idx: 0,
                pending: Vec::new().into_iter(),
                enzyme: self.get_enzyme(constraint, scan_missed_cleavages)?,
                cleavage_specificity: constraint.get_cleavage_specificity(),
                mass_basis: constraint.get_mass_basis(),
                mass_range: scan_mass_range,
            }),
            ScanStrategy::SortedDatabaseScan => {
                let enzyme = self.get_enzyme(constraint, scan_missed_cleavages)?;
                let candidates = digest_and_merge(
                    self.source.get_proteins()?,
                    enzyme.as_ref(),
                    constraint.get_cleavage_specificity(),
                    constraint.get_mass_basis(),
                    scan_mass_range,
                );
                Box::new(fallible_iterator::convert(
                    candidates
                        .into_iter()
                        .map(Ok::<PeptideCandidate, SearchError>),
                ))
            }
        };

        let recount_enzyme = if self.needs_recount(constraint) {
            Some(self.get_enzyme(constraint, constraint.get_max_missed_cleavages())?)
        } else {
            None
        };

        Ok(Box::new(ModifiedCandidateStream {
            base,
            combinator: self.combinator.as_ref(),
            profile: profile.clone(),
            constraint: *constraint,
            recount_enzyme,
            decoy_generator,
            pending: VecDeque::new(),
        }))
    }

    fn get_enzyme(
        &self,
        constraint: &PeptideConstraint,
        max_missed_cleavages: usize,
    ) -> Result<Box<dyn Enzyme>, SearchError> {
        get_enzyme_by_name(
            self.config.get_enzyme_name(),
            max_missed_cleavages,
            constraint.get_min_length(),
            constraint.get_max_length(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chemistry::amino_acid::calc_sequence_mass;
    use crate::functions::modification::{
        ModificationCollection, ModificationPosition, ModificationRule, ModificationType,
    };
    use crate::functions::sequence_source::InMemorySequenceSource;
    use crate::mass::convert::to_int as mass_to_int;

    const PROTEIN: &str = "MKRPEPTIDEKADEFGHIK";

    fn generator(
        proteins: &[&str],
        rules: Vec<ModificationRule>,
        config: SearchConfiguration,
        with_index: bool,
    ) -> CandidateGenerator {
        let proteins = proteins
            .iter()
            .enumerate()
            .map(|(idx, sequence)| {
                Protein::new(format!("P{}", idx), String::new(), sequence.to_string())
            })
            .collect();
        let mut source = InMemorySequenceSource::new(proteins);
        if with_index {
            let enzyme = get_enzyme_by_name(
                config.get_enzyme_name(),
                config.get_max_number_of_missed_cleavages(),
                config.get_min_peptide_length(),
                config.get_max_peptide_length(),
            )
            .unwrap();
            source = source.with_peptide_index(
                enzyme.as_ref(),
                config.get_cleavage_specificity(),
                config.get_mass_basis(),
            );
        }
        let collection = Arc::new(ModificationCollection::new(rules).unwrap());
        let combinator = Arc::new(ModificationCombinator::new(
            collection,
            config.get_max_variable_modifications(),
        ));
        CandidateGenerator::new(Arc::new(source), combinator, Arc::new(config))
    }

    /// All tryptic substrings within the bounds, as (0-based start, length)
    fn brute_force(sequence: &str, constraint: &PeptideConstraint) -> Vec<(usize, usize)> {
        let bytes = sequence.as_bytes();
        let is_site = |idx: usize| {
            idx == 0
                || idx == bytes.len()
                || ((bytes[idx - 1] == b'K' || bytes[idx - 1] == b'R') && bytes[idx] != b'P')
        };
        let mut expected = Vec::new();
        for start in 0..bytes.len() {
            for end in (start + 1)..=bytes.len() {
                let length = end - start;
                if !constraint.contains_length(length) || !is_site(start) || !is_site(end) {
                    continue;
                }
                let missed = ((start + 1)..end).filter(|idx| is_site(*idx)).count();
                let mass = calc_sequence_mass(&sequence[start..end], MassBasis::Monoisotopic).unwrap();
                if missed <= constraint.get_max_missed_cleavages() && constraint.contains_mass(mass) {
                    expected.push((start, length));
                }
            }
        }
        expected.sort();
        expected
    }

    fn collect_locations(mut stream: CandidateStream<'_>) -> Vec<(usize, usize)> {
        let mut locations = Vec::new();
        while let Some(candidate) = stream.next().unwrap() {
            for source in candidate.get_sources() {
                locations.push((source.get_start() - 1, candidate.get_length()));
            }
        }
        locations.sort();
        locations
    }

    #[test]
    fn test_tryptic_end_to_end() {
        let config = SearchConfiguration::default().with_peptide_length(6, 10);
        let generator = generator(&[PROTEIN], vec![], config, false);
        for (min_mass, max_mass, max_missed) in [(500.0, 600.0, 0), (500.0, 1100.0, 0), (500.0, 2000.0, 1)] {
            let constraint = PeptideConstraint::new(
                6,
                10,
                mass_to_int(min_mass),
                mass_to_int(max_mass),
                CleavageSpecificity::Full,
                max_missed,
                MassBasis::Monoisotopic,
            )
            .unwrap();
            assert_eq!(generator.get_strategy(&constraint), ScanStrategy::SortedDatabaseScan);
            let locations = collect_locations(generator.open(&constraint, false).unwrap());
            assert_eq!(locations, brute_force(PROTEIN, &constraint));
            if max_mass > 1000.0 {
                assert!(!locations.is_empty());
            }
        }
        // RPEPTIDEK and ADEFGHIK
        let constraint = PeptideConstraint::new(
            6,
            10,
            mass_to_int(500.0),
            mass_to_int(1100.0),
            CleavageSpecificity::Full,
            0,
            MassBasis::Monoisotopic,
        )
        .unwrap();
        assert_eq!(
            collect_locations(generator.open(&constraint, false).unwrap()),
            vec![(2, 9), (11, 8)]
        );
    }

    #[test]
    fn test_bounds_hold_for_all_strategies() {
        let proteins = [PROTEIN, "MCPEPMTKAGLLVSDEFHIWK", "PEPTIDERPEPTIDEK"];
        let rules = vec![
            ModificationRule::new(
                "Carbamidomethyl",
                "C",
                57.021464,
                ModificationType::Static,
                ModificationPosition::Anywhere,
            ),
            ModificationRule::new(
                "Oxidation",
                "M",
                15.994915,
                ModificationType::Variable,
                ModificationPosition::Anywhere,
            ),
        ];
        for specificity in [CleavageSpecificity::Full, CleavageSpecificity::Partial, CleavageSpecificity::None] {
            for with_index in [false, true] {
                let config = SearchConfiguration::default()
                    .with_peptide_length(5, 12)
                    .with_cleavage_specificity(specificity)
                    .with_max_number_of_missed_cleavages(1);
                let generator = generator(&proteins, rules.clone(), config, with_index);
                let constraint = PeptideConstraint::new(
                    5,
                    12,
                    mass_to_int(600.0),
                    mass_to_int(1200.0),
                    specificity,
                    1,
                    MassBasis::Monoisotopic,
                )
                .unwrap();
                if with_index {
                    assert_eq!(generator.get_strategy(&constraint), ScanStrategy::IndexScan);
                }
                for profile in generator.get_combinator().get_profiles_by_count().iter().flatten() {
                    let mut stream = generator.open_with_profile(&constraint, profile, None).unwrap();
                    while let Some(candidate) = stream.next().unwrap() {
                        assert!(constraint.contains_length(candidate.get_length()));
                        assert!(constraint.contains_mass(candidate.get_mass()));
                        let variable = candidate
                            .get_modifications()
                            .map(|modifications| modifications.count_variable())
                            .unwrap_or(0);
                        assert_eq!(variable, profile.get_count());
                        if specificity != CleavageSpecificity::None {
                            assert!(candidate.get_missed_cleavages() <= 1);
                        }
                        // every cysteine is carbamidomethylated
                        for (offset, amino_acid) in candidate.get_sequence().chars().enumerate() {
                            if amino_acid == 'C' {
                                assert_eq!(
                                    candidate.get_modifications().unwrap().get(offset)[0].get_name(),
                                    "Carbamidomethyl"
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_index_and_sorted_scan_agree() {
        let config = SearchConfiguration::default()
            .with_peptide_length(4, 20)
            .with_max_number_of_missed_cleavages(2);
        let proteins = [PROTEIN, "PEPTIDERPEPTIDEK", "AAKPEPTIDEK"];
        let indexed = generator(&proteins, vec![], config.clone(), true);
        let scanned = generator(&proteins, vec![], config, false);
        let constraint = PeptideConstraint::new(
            4,
            20,
            mass_to_int(300.0),
            mass_to_int(2500.0),
            CleavageSpecificity::Full,
            2,
            MassBasis::Monoisotopic,
        )
        .unwrap();
        assert_eq!(indexed.get_strategy(&constraint), ScanStrategy::IndexScan);
        assert_eq!(scanned.get_strategy(&constraint), ScanStrategy::SortedDatabaseScan);
        let indexed_locations = collect_locations(indexed.open(&constraint, false).unwrap());
        let scanned_locations = collect_locations(scanned.open(&constraint, false).unwrap());
        assert!(!indexed_locations.is_empty());
        assert_eq!(indexed_locations, scanned_locations);
    }

    #[test]
    fn test_duplicates_are_merged() {
        let config = SearchConfiguration::default().with_peptide_length(4, 20);
        let generator = generator(&["PEPTIDEKAAR", "PEPTIDEKGGGGR"], vec![], config, false);
        let constraint = PeptideConstraint::from_configuration(generator.get_config()).unwrap();
        let mut stream = generator.open(&constraint, false).unwrap();
        let mut found = false;
        let mut previous_mass = i64::MIN;
        while let Some(candidate) = stream.next().unwrap() {
            assert!(candidate.get_mass() >= previous_mass);
            previous_mass = candidate.get_mass();
            if candidate.get_sequence() == "PEPTIDEK" {
                assert_eq!(candidate.get_protein_accessions(), vec!["P0", "P1"]);
                found = true;
            }
        }
        assert!(found);
    }

    #[test]
    fn test_decoy_stream() {
        let config = SearchConfiguration::default().with_peptide_length(4, 20);
        let generator = generator(&[PROTEIN, "PEPTIDERPEPTIDEK"], vec![], config, false);
        let constraint = PeptideConstraint::from_configuration(generator.get_config()).unwrap();
        let mut targets = generator.open(&constraint, false).unwrap();
        let mut decoys = generator.open(&constraint, true).unwrap();
        loop {
            match (targets.next().unwrap(), decoys.next().unwrap()) {
                (Some(target), Some(decoy)) => {
                    assert!(decoy.is_decoy());
                    assert_eq!(decoy.get_target_sequence(), target.get_sequence());
                    assert_eq!(decoy.get_mass(), target.get_mass());
                }
                (None, None) => break,
                _ => panic!("decoy stream differs in length from target stream"),
            }
        }
    }

    #[test]
    fn test_cleavage_preventing_modification() {
        let config = SearchConfiguration::default()
            .with_peptide_length(4, 30)
            .with_max_variable_modifications(1);
        let rules = vec![ModificationRule::new(
            "Dimethyl",
            "K",
            28.0313,
            ModificationType::Variable,
            ModificationPosition::Anywhere,
        )
        .with_prevents_cleavage(true)];
        let generator = generator(&["PEPTIDEKAAGLLR"], rules, config, false);
        let constraint = PeptideConstraint::from_configuration(generator.get_config()).unwrap();
        let profile = &generator.get_combinator().get_profiles_by_count()[1][0];
        let mut stream = generator.open_with_profile(&constraint, profile, None).unwrap();
        let mut sequences = Vec::new();
        while let Some(candidate) = stream.next().unwrap() {
            assert_eq!(candidate.get_missed_cleavages(), 0);
            sequences.push(candidate.get_modified_sequence());
        }
        // blocked K makes the full protein a peptide without missed cleavages
        assert!(sequences.contains(&"PEPTIDEK[+28.0313]AAGLLR".to_string()));
        // unmodified stream keeps the limit
        let mut unmodified = generator.open(&constraint, false).unwrap();
        while let Some(candidate) = unmodified.next().unwrap() {
            assert_ne!(candidate.get_sequence(), "PEPTIDEKAAGLLR");
        }
    }

    #[test]
    fn test_length_ceiling() {
        let config = SearchConfiguration::default();
        let generator = generator(&[PROTEIN], vec![], config, false);
        let constraint = PeptideConstraint::new(
            6,
            256,
            0,
            mass_to_int(5000.0),
            CleavageSpecificity::Full,
            0,
            MassBasis::Monoisotopic,
        )
        .unwrap();
        assert!(matches!(
            generator.open(&constraint, false),
            Err(SearchError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_open_for_mass() {
        let config = SearchConfiguration::default().with_peptide_length(6, 10);
        let generator = generator(&[PROTEIN], vec![], config, false);
        let mass = crate::mass::convert::to_float(
            calc_sequence_mass("ADEFGHIK", MassBasis::Monoisotopic).unwrap(),
        );
        let locations = collect_locations(generator.open_for_mass(mass, 0.01, false).unwrap());
        assert_eq!(locations, vec![(11, 8)]);
    }
}
