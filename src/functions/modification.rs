// std imports
use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

// 3rd party imports
use thiserror::Error;
use tracing::warn;

// internal imports
use crate::chemistry::amino_acid::AminoAcid;
use crate::errors::search_error::SearchError;
use crate::mass::convert::to_int as mass_to_int;

/// Symbols handed out to variable modifications without an explicit symbol, in this order
pub const VARIABLE_MODIFICATION_SYMBOLS: [char; 10] = ['*', '#', '@', '^', '~', '%', '$', '&', '!', '?'];
/// Symbol used when all symbols of `VARIABLE_MODIFICATION_SYMBOLS` are taken
pub const FALLBACK_MODIFICATION_SYMBOL: char = '+';

/// Errors which might occur during modification collection validation
#[derive(Debug, Error)]
pub enum ModificationCollectionValidationError {
    #[error("Modification {0} does not target any amino acid.")]
    EmptyResidueSet(String),
    #[error("Modification {0} targets unknown amino acid '{1}'.")]
    UnknownResidue(String, char),
    #[error("Modification {0} has an invalid mass delta.")]
    InvalidMassDelta(String),
    #[error("Amino acid {0} is statically modified twice or more.")]
    StaticallyModifiedTwiceOrMore(char),
    #[error("Modification {0} targets an amino acid which is already statically modified.")]
    AlreadyStaticallyModified(String),
}

impl ModificationCollectionValidationError {
    fn get_modification_name(&self) -> String {
        match self {
            Self::EmptyResidueSet(name)
            | Self::UnknownResidue(name, _)
            | Self::InvalidMassDelta(name)
            | Self::AlreadyStaticallyModified(name) => name.clone(),
            Self::StaticallyModifiedTwiceOrMore(amino_acid) => amino_acid.to_string(),
        }
    }
}

impl From<ModificationCollectionValidationError> for SearchError {
    fn from(error: ModificationCollectionValidationError) -> Self {
        SearchError::MalformedModificationRule(error.get_modification_name(), error.to_string())
    }
}

/// Static modifications are applied to each occurrence of the targeted amino acids,
/// variable modifications may be applied.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModificationType {
    Static,
    Variable,
}

impl FromStr for ModificationType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" | "fixed" => Ok(Self::Static),
            "variable" => Ok(Self::Variable),
            _ => Err(SearchError::MalformedModificationRule(
                s.to_string(),
                "unknown modification type".to_string(),
            )),
        }
    }
}

/// Where a modification may be placed
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModificationPosition {
    Anywhere,
    PeptideNTerminus,
    PeptideCTerminus,
    ProteinNTerminus,
    ProteinCTerminus,
}

impl ModificationPosition {
    /// True for peptide and protein N-terminus
    pub fn is_n_terminal(&self) -> bool {
        matches!(self, Self::PeptideNTerminus | Self::ProteinNTerminus)
    }

    /// True for peptide and protein C-terminus
    pub fn is_c_terminal(&self) -> bool {
        matches!(self, Self::PeptideCTerminus | Self::ProteinCTerminus)
    }
}

impl FromStr for ModificationPosition {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "anywhere" | "any" => Ok(Self::Anywhere),
            "n_term" | "n_terminus" | "peptide_n_term" | "peptide_n_terminus" => {
                Ok(Self::PeptideNTerminus)
            }
            "c_term" | "c_terminus" | "peptide_c_term" | "peptide_c_terminus" => {
                Ok(Self::PeptideCTerminus)
            }
            "protein_n_term" | "protein_n_terminus" => Ok(Self::ProteinNTerminus),
            "protein_c_term" | "protein_c_terminus" => Ok(Self::ProteinCTerminus),
            _ => Err(SearchError::MalformedModificationRule(
                s.to_string(),
                "unknown modification position".to_string(),
            )),
        }
    }
}

impl Display for ModificationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anywhere => write!(f, "anywhere"),
            Self::PeptideNTerminus => write!(f, "peptide N-terminus"),
            Self::PeptideCTerminus => write!(f, "peptide C-terminus"),
            Self::ProteinNTerminus => write!(f, "protein N-terminus"),
            Self::ProteinCTerminus => write!(f, "protein C-terminus"),
        }
    }
}

/// Chemical modification of one or more amino acids.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ModificationRule {
    name: String,
    amino_acids: BTreeSet<char>,
    mass_delta: f64,
    mass_delta_int: i64,
    mod_type: ModificationType,
    position: ModificationPosition,
    prevents_cleavage: bool,
    prevents_cross_link: bool,
    symbol: Option<char>,
    max_per_peptide: Option<usize>,
}

impl ModificationRule {
    /// Creates a new modification rule. `X` within `amino_acids` targets all amino acids.
    ///
    /// # Arguments
    /// * `name` - Name of the modification
    /// * `amino_acids` - One letter codes of the targeted amino acids
    /// * `mass_delta` - Mass delta in Dalton
    /// * `mod_type` - Static or variable
    /// * `position` - Where the modification may be placed
    ///
    pub fn new(
        name: &str,
        amino_acids: &str,
        mass_delta: f64,
        mod_type: ModificationType,
        position: ModificationPosition,
    ) -> Self {
        let amino_acids: BTreeSet<char> = if amino_acids.contains('X') {
            ('A'..='Z').collect()
        } else {
            amino_acids
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect()
        };
        Self {
            name: name.to_string(),
            amino_acids,
            mass_delta,
            mass_delta_int: mass_to_int(mass_delta),
            mod_type,
            position,
            prevents_cleavage: false,
            prevents_cross_link: false,
            symbol: None,
            max_per_peptide: None,
        }
    }

    /// Marks the modified residue as no longer cleavable
    ///
    pub fn with_prevents_cleavage(mut self, prevents_cleavage: bool) -> Self {
        self.prevents_cleavage = prevents_cleavage;
        self
    }

    /// Marks the modified residue as no longer linkable
    ///
    pub fn with_prevents_cross_link(mut self, prevents_cross_link: bool) -> Self {
        self.prevents_cross_link = prevents_cross_link;
        self
    }

    pub fn with_symbol(mut self, symbol: Option<char>) -> Self {
        self.symbol = symbol;
        self
    }

    /// Limits the number of occurrences of this (variable) modification per peptide
    ///
    pub fn with_max_per_peptide(mut self, max_per_peptide: Option<usize>) -> Self {
        self.max_per_peptide = max_per_peptide;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_amino_acids(&self) -> &BTreeSet<char> {
        &self.amino_acids
    }

    pub fn get_mass_delta(&self) -> f64 {
        self.mass_delta
    }

    /// Returns the mass delta in internal representation
    pub fn get_mass_delta_int(&self) -> i64 {
        self.mass_delta_int
    }

    pub fn get_mod_type(&self) -> ModificationType {
        self.mod_type
    }

    pub fn get_position(&self) -> ModificationPosition {
        self.position
    }

    pub fn get_prevents_cleavage(&self) -> bool {
        self.prevents_cleavage
    }

    pub fn get_prevents_cross_link(&self) -> bool {
        self.prevents_cross_link
    }

    pub fn get_symbol(&self) -> Option<char> {
        self.symbol
    }

    /// Returns the maximum number of occurrences per peptide. Terminal modifications occur once at most.
    ///
    pub fn get_max_per_peptide(&self) -> Option<usize> {
        if self.position != ModificationPosition::Anywhere {
            return Some(1);
        }
        self.max_per_peptide
    }

    pub fn is_static(&self) -> bool {
        self.mod_type == ModificationType::Static
    }

    pub fn is_variable(&self) -> bool {
        self.mod_type == ModificationType::Variable
    }

    /// True if the modification targets the given amino acid
    ///
    pub fn targets(&self, amino_acid: char) -> bool {
        self.amino_acids.contains(&amino_acid)
    }

    /// Checks if the modification can be placed at the given residue of a peptide.
    ///
    /// # Arguments
    /// * `amino_acid` - Amino acid at the position
    /// * `offset` - 0-based offset within the peptide
    /// * `peptide_length` - Length of the peptide
    /// * `is_protein_n_terminal` - True if the peptide starts at the protein N-terminus
    /// * `is_protein_c_terminal` - True if the peptide ends at the protein C-terminus
    ///
    pub fn is_placeable(
        &self,
        amino_acid: char,
        offset: usize,
        peptide_length: usize,
        is_protein_n_terminal: bool,
        is_protein_c_terminal: bool,
    ) -> bool {
        if !self.targets(amino_acid) {
            return false;
        }
        match self.position {
            ModificationPosition::Anywhere => true,
            ModificationPosition::PeptideNTerminus => offset == 0,
            ModificationPosition::PeptideCTerminus => offset + 1 == peptide_length,
            ModificationPosition::ProteinNTerminus => offset == 0 && is_protein_n_terminal,
            ModificationPosition::ProteinCTerminus => {
                offset + 1 == peptide_length && is_protein_c_terminal
            }
        }
    }
}

impl Display for ModificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let amino_acids: String = if self.amino_acids.len() == 26 {
            "X".to_string()
        } else {
            self.amino_acids.iter().collect()
        };
        write!(
            f,
            "{} [{:+}] @ {} ({}, {})",
            self.name,
            self.mass_delta,
            amino_acids,
            self.position,
            match self.mod_type {
                ModificationType::Static => "static",
                ModificationType::Variable => "variable",
            }
        )?;
        if let Some(symbol) = self.symbol {
            write!(f, " '{}'", symbol)?;
        }
        Ok(())
    }
}

/// Validated, ordered collection of modification rules.
/// Rules:
/// * Static rules are applied to every occurrence of the targeted amino acids, a residue is
///   statically modified once at most per position class (anywhere, N-terminal, C-terminal)
/// * Variable rules placed anywhere cannot target a statically modified amino acid
/// * Terminal rules stack on top of residue modifications
///
#[derive(Clone, Debug)]
pub struct ModificationCollection {
    rules: Vec<Arc<ModificationRule>>,
    static_rules: Vec<Arc<ModificationRule>>,
    variable_rules: Vec<Arc<ModificationRule>>,
}

impl ModificationCollection {
    /// Creates a new collection from the given rules, validates them and assigns a
    /// symbol to each variable rule without one.
    ///
    /// # Arguments
    /// * `rules` - Modification rules in declaration order
    ///
    pub fn new(rules: Vec<ModificationRule>) -> Result<Self, ModificationCollectionValidationError> {
        for rule in rules.iter() {
            if rule.amino_acids.is_empty() {
                return Err(ModificationCollectionValidationError::EmptyResidueSet(
                    rule.name.clone(),
                ));
            }
            for amino_acid in rule.amino_acids.iter() {
                if AminoAcid::get_by_one_letter_code(*amino_acid).is_none() {
                    return Err(ModificationCollectionValidationError::UnknownResidue(
                        rule.name.clone(),
                        *amino_acid,
                    ));
                }
            }
            if !rule.mass_delta.is_finite() {
                return Err(ModificationCollectionValidationError::InvalidMassDelta(
                    rule.name.clone(),
                ));
            }
        }

        // (amino acid, position class) which are statically modified
        let mut static_targets: HashSet<(char, u8)> = HashSet::new();
        for rule in rules.iter().filter(|rule| rule.is_static()) {
            let position_class = Self::get_position_class(rule.position);
            for amino_acid in rule.amino_acids.iter() {
                if !static_targets.insert((*amino_acid, position_class)) {
                    return Err(ModificationCollectionValidationError::StaticallyModifiedTwiceOrMore(
                        *amino_acid,
                    ));
                }
            }
        }
        for rule in rules
            .iter()
            .filter(|rule| rule.is_variable() && rule.position == ModificationPosition::Anywhere)
        {
            if rule
                .amino_acids
                .iter()
                .any(|amino_acid| static_targets.contains(&(*amino_acid, 0)))
            {
                return Err(ModificationCollectionValidationError::AlreadyStaticallyModified(
                    rule.name.clone(),
                ));
            }
        }

        let mut used_symbols: HashSet<char> = rules.iter().filter_map(|rule| rule.symbol).collect();
        let mut symbol_pool = VARIABLE_MODIFICATION_SYMBOLS.iter();
        let rules: Vec<Arc<ModificationRule>> = rules
            .into_iter()
            .map(|mut rule| {
                if rule.is_variable() && rule.symbol.is_none() {
                    let symbol = symbol_pool
                        .by_ref()
                        .find(|symbol| !used_symbols.contains(*symbol))
                        .copied();
                    rule.symbol = match symbol {
                        Some(symbol) => {
                            used_symbols.insert(symbol);
                            Some(symbol)
                        }
                        None => {
                            warn!(
                                "No symbol left for variable modification {}, using '{}'",
                                rule.name, FALLBACK_MODIFICATION_SYMBOL
                            );
                            Some(FALLBACK_MODIFICATION_SYMBOL)
                        }
                    };
                }
                Arc::new(rule)
            })
            .collect();

        let static_rules = rules.iter().filter(|rule| rule.is_static()).cloned().collect();
        let variable_rules = rules.iter().filter(|rule| rule.is_variable()).cloned().collect();

        Ok(Self {
            rules,
            static_rules,
            variable_rules,
        })
    }

    /// Creates an empty collection
    ///
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            static_rules: Vec::new(),
            variable_rules: Vec::new(),
        }
    }

    fn get_position_class(position: ModificationPosition) -> u8 {
        if position.is_n_terminal() {
            1
        } else if position.is_c_terminal() {
            2
        } else {
            0
        }
    }

    /// Returns all rules in declaration order
    pub fn get_rules(&self) -> &[Arc<ModificationRule>] {
        &self.rules
    }

    /// Returns the static rules in declaration order
    pub fn get_static_rules(&self) -> &[Arc<ModificationRule>] {
        &self.static_rules
    }

    /// Returns the variable rules in declaration order
    pub fn get_variable_rules(&self) -> &[Arc<ModificationRule>] {
        &self.variable_rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True if any rule prevents cleavage of the modified residue
    pub fn has_cleavage_preventing_rules(&self) -> bool {
        self.rules.iter().any(|rule| rule.prevents_cleavage)
    }
}

impl Display for ModificationCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in self.rules.iter() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_collection_validation() {
        let valid_rules = vec![
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
            // acetylation of any N-terminus stacks on the static C modification
            ModificationRule::new(
                "Acetyl",
                "X",
                42.010565,
                ModificationType::Variable,
                ModificationPosition::ProteinNTerminus,
            ),
        ];
        let collection = ModificationCollection::new(valid_rules).unwrap();
        assert_eq!(collection.get_static_rules().len(), 1);
        assert_eq!(collection.get_variable_rules().len(), 2);
        assert_eq!(collection.get_variable_rules()[0].get_symbol(), Some('*'));
        assert_eq!(collection.get_variable_rules()[1].get_symbol(), Some('#'));

        let twice_static = vec![
            ModificationRule::new("A", "C", 57.0, ModificationType::Static, ModificationPosition::Anywhere),
            ModificationRule::new("B", "CM", 5.0, ModificationType::Static, ModificationPosition::Anywhere),
        ];
        assert!(matches!(
            ModificationCollection::new(twice_static),
            Err(ModificationCollectionValidationError::StaticallyModifiedTwiceOrMore('C'))
        ));

        let variable_on_static = vec![
            ModificationRule::new("A", "C", 57.0, ModificationType::Static, ModificationPosition::Anywhere),
            ModificationRule::new("B", "C", 5.0, ModificationType::Variable, ModificationPosition::Anywhere),
        ];
        assert!(matches!(
            ModificationCollection::new(variable_on_static),
            Err(ModificationCollectionValidationError::AlreadyStaticallyModified(_))
        ));

        let unknown = vec![ModificationRule::new(
            "Unknown",
            "1",
            5.0,
            ModificationType::Variable,
            ModificationPosition::Anywhere,
        )];
        let error: SearchError = ModificationCollection::new(unknown).unwrap_err().into();
        assert!(matches!(error, SearchError::MalformedModificationRule(name, _) if name == "Unknown"));

        let empty = vec![ModificationRule::new(
            "Empty",
            "",
            5.0,
            ModificationType::Variable,
            ModificationPosition::Anywhere,
        )];
        assert!(ModificationCollection::new(empty).is_err());
    }

    #[test]
    fn test_symbol_pool_exhaustion() {
        let rules = (0..12)
            .map(|idx| {
                ModificationRule::new(
                    &format!("mod {}", idx),
                    "S",
                    idx as f64,
                    ModificationType::Variable,
                    ModificationPosition::Anywhere,
                )
            })
            .collect();
        let collection = ModificationCollection::new(rules).unwrap();
        let symbols: Vec<char> = collection
            .get_variable_rules()
            .iter()
            .filter_map(|rule| rule.get_symbol())
            .collect();
        assert_eq!(&symbols[..10], &VARIABLE_MODIFICATION_SYMBOLS[..]);
        assert_eq!(symbols[10], FALLBACK_MODIFICATION_SYMBOL);
        assert_eq!(symbols[11], FALLBACK_MODIFICATION_SYMBOL);
    }

    #[test]
    fn test_placement() {
        let n_term = ModificationRule::new(
            "n",
            "X",
            1.0,
            ModificationType::Variable,
            ModificationPosition::PeptideNTerminus,
        );
        assert!(n_term.is_placeable('A', 0, 5, false, false));
        assert!(!n_term.is_placeable('A', 1, 5, false, false));
        let protein_c = ModificationRule::new(
            "c",
            "K",
            1.0,
            ModificationType::Variable,
            ModificationPosition::ProteinCTerminus,
        );
        assert!(!protein_c.is_placeable('K', 4, 5, false, false));
        assert!(protein_c.is_placeable('K', 4, 5, false, true));
        assert!(!protein_c.is_placeable('R', 4, 5, false, true));
        assert_eq!(protein_c.get_max_per_peptide(), Some(1));
        assert_eq!(
            ModificationPosition::from_str("protein-n-term").unwrap(),
            ModificationPosition::ProteinNTerminus
        );
    }
}
