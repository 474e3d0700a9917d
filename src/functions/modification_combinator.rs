// std imports
use std::fmt::Display;
use std::sync::Arc;

// 3rd party imports
use itertools::Itertools;

// internal imports
use crate::entities::peptide::{ModificationAssignment, PeptideCandidate};
use crate::functions::modification::{
    ModificationCollection, ModificationPosition, ModificationRule,
};

/// Multiset of variable modifications, as (index into the collection's variable rules, count).
/// Static modifications are implicit in every profile.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModificationProfile {
    entries: Vec<(usize, usize)>,
}

impl ModificationProfile {
    /// Profile without variable modifications
    pub fn unmodified() -> Self {
        Self::default()
    }

    pub fn new(entries: Vec<(usize, usize)>) -> Self {
        Self {
            entries: entries.into_iter().filter(|(_, count)| *count > 0).collect(),
        }
    }

    pub fn get_entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// Total number of variable modifications
    pub fn get_count(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Sum of the variable modification mass deltas
    ///
    /// # Arguments
    /// * `variable_rules` - Variable rules the profile refers to
    ///
    pub fn get_mass_delta(&self, variable_rules: &[Arc<ModificationRule>]) -> i64 {
        self.entries
            .iter()
            .map(|(rule_idx, count)| variable_rules[*rule_idx].get_mass_delta_int() * *count as i64)
            .sum()
    }

    /// Rule indexes, each repeated by its count, in declaration order
    fn expand(&self) -> Vec<usize> {
        self.entries
            .iter()
            .flat_map(|(rule_idx, count)| std::iter::repeat(*rule_idx).take(*count))
            .collect()
    }
}

impl Display for ModificationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "unmodified");
        }
        let entries = self
            .entries
            .iter()
            .map(|(rule_idx, count)| format!("{}x{}", count, rule_idx))
            .join(", ");
        write!(f, "{}", entries)
    }
}

/// Enumerates modification profiles and places them on candidates
///
pub struct ModificationCombinator {
    collection: Arc<ModificationCollection>,
    max_modifications: usize,
    /// Profiles partitioned by count, index is the count
    profiles_by_count: Vec<Vec<ModificationProfile>>,
    static_delta_bounds: (i64, i64, i64, i64),
}

impl ModificationCombinator {
    /// Creates a new combinator and enumerates all profiles with up to `max_modifications`
    /// variable modifications.
    ///
    /// # Arguments
    /// * `collection` - Validated modification collection
    /// * `max_modifications` - Maximum number of variable modifications per peptide
    ///
    pub fn new(collection: Arc<ModificationCollection>, max_modifications: usize) -> Self {
        let profiles_by_count = Self::enumerate_profiles(&collection, max_modifications);
        let static_delta_bounds = Self::calc_static_delta_bounds(&collection);
        Self {
            collection,
            max_modifications,
            profiles_by_count,
            static_delta_bounds,
        }
    }

    fn enumerate_profiles(
        collection: &ModificationCollection,
        max_modifications: usize,
    ) -> Vec<Vec<ModificationProfile>> {
        let variable_rules = collection.get_variable_rules();
        let mut profiles: Vec<ModificationProfile> = Vec::new();
        let mut counts: Vec<usize> = vec![0; variable_rules.len()];
        Self::enumerate_counts(variable_rules, max_modifications, 0, &mut counts, &mut profiles);

        let mut profiles_by_count: Vec<Vec<ModificationProfile>> =
            vec![Vec::new(); max_modifications + 1];
        for profile in profiles {
            profiles_by_count[profile.get_count()].push(profile);
        }
        for level in profiles_by_count.iter_mut() {
            level.sort_by_cached_key(|profile| profile.expand());
        }
        profiles_by_count
    }

    fn enumerate_counts(
        variable_rules: &[Arc<ModificationRule>],
        remaining: usize,
        rule_idx: usize,
        counts: &mut [usize],
        profiles: &mut Vec<ModificationProfile>,
    ) {
        if rule_idx == variable_rules.len() {
            let n_terminal = Self::count_position_class(variable_rules, counts, |position| {
                position.is_n_terminal()
            });
            let c_terminal = Self::count_position_class(variable_rules, counts, |position| {
                position.is_c_terminal()
            });
            if n_terminal <= 1 && c_terminal <= 1 {
                profiles.push(ModificationProfile::new(
                    counts.iter().copied().enumerate().collect(),
                ));
            }
            return;
        }
        let limit = variable_rules[rule_idx]
            .get_max_per_peptide()
            .unwrap_or(remaining)
            .min(remaining);
        for count in 0..=limit {
            counts[rule_idx] = count;
            Self::enumerate_counts(variable_rules, remaining - count, rule_idx + 1, counts, profiles);
        }
        counts[rule_idx] = 0;
    }

    fn count_position_class<F>(variable_rules: &[Arc<ModificationRule>], counts: &[usize], is_class: F) -> usize
    where
        F: Fn(&ModificationPosition) -> bool,
    {
        variable_rules
            .iter()
            .zip(counts.iter())
            .filter(|(rule, count)| **count > 0 && is_class(&rule.get_position()))
            .map(|(_, count)| *count)
            .sum()
    }

    /// (residue min, residue max, terminal min, terminal max) of static mass deltas,
    /// residue values are per residue
    fn calc_static_delta_bounds(collection: &ModificationCollection) -> (i64, i64, i64, i64) {
        let mut residue_min = 0;
        let mut residue_max = 0;
        for amino_acid in 'A'..='Z' {
            let delta: i64 = collection
                .get_static_rules()
                .iter()
                .filter(|rule| rule.get_position() == ModificationPosition::Anywhere && rule.targets(amino_acid))
                .map(|rule| rule.get_mass_delta_int())
                .sum();
            residue_min = residue_min.min(delta);
            residue_max = residue_max.max(delta);
        }
        let terminal_bound = |is_class: fn(&ModificationPosition) -> bool, pick: fn(i64, i64) -> i64| {
            collection
                .get_static_rules()
                .iter()
                .filter(|rule| is_class(&rule.get_position()))
                .map(|rule| rule.get_mass_delta_int())
                .fold(0, pick)
        };
        let terminal_min = terminal_bound(ModificationPosition::is_n_terminal, i64::min)
            + terminal_bound(ModificationPosition::is_c_terminal, i64::min);
        let terminal_max = terminal_bound(ModificationPosition::is_n_terminal, i64::max)
            + terminal_bound(ModificationPosition::is_c_terminal, i64::max);
        (residue_min, residue_max, terminal_min, terminal_max)
    }

    /// Lowest and highest mass delta the static modifications may add to a peptide of
    /// at most `max_length` residues.
    ///
    pub fn get_static_delta_range(&self, max_length: usize) -> (i64, i64) {
        let (residue_min, residue_max, terminal_min, terminal_max) = self.static_delta_bounds;
        (
            residue_min * max_length as i64 + terminal_min,
            residue_max * max_length as i64 + terminal_max,
        )
    }

    pub fn get_collection(&self) -> &Arc<ModificationCollection> {
        &self.collection
    }

    pub fn get_max_modifications(&self) -> usize {
        self.max_modifications
    }

    /// Returns the profiles partitioned by count (index = number of variable modifications).
    /// Within a count the profiles are ordered by rule declaration.
    ///
    pub fn get_profiles_by_count(&self) -> &[Vec<ModificationProfile>] {
        &self.profiles_by_count
    }

    /// Returns every placement of the profile (plus static modifications) on the candidate.
    /// Empty if the profile cannot be placed.
    ///
    /// # Arguments
    /// * `profile` - Modification profile
    /// * `candidate` - Unmodified candidate
    ///
    pub fn apply(
        &self,
        profile: &ModificationProfile,
        candidate: &PeptideCandidate,
    ) -> Vec<ModificationAssignment> {
        let sequence: Vec<char> = candidate.get_sequence().chars().collect();
        let length = sequence.len();
        let is_protein_n_terminal = candidate
            .get_sources()
            .iter()
            .any(|source| source.is_protein_n_terminal());
        let is_protein_c_terminal = candidate
            .get_sources()
            .iter()
            .any(|source| source.is_protein_c_terminal(length));

        let mut base = ModificationAssignment::new(length);
        // residues carrying a modification placed anywhere
        let mut occupied = vec![false; length];
        for rule in self.collection.get_static_rules() {
            for (offset, amino_acid) in sequence.iter().enumerate() {
                if rule.is_placeable(
                    *amino_acid,
                    offset,
                    length,
                    is_protein_n_terminal,
                    is_protein_c_terminal,
                ) {
                    base.add(offset, rule.clone());
                    if rule.get_position() == ModificationPosition::Anywhere {
                        occupied[offset] = true;
                    }
                }
            }
        }

        let variable_rules = self.collection.get_variable_rules();
        let mut assignments = Vec::new();
        self.place_entries(
            profile.get_entries(),
            variable_rules,
            &sequence,
            (is_protein_n_terminal, is_protein_c_terminal),
            &mut occupied,
            base,
            &mut assignments,
        );
        assignments
    }

    #[allow(clippy::too_many_arguments)]
    fn place_entries(
        &self,
        entries: &[(usize, usize)],
        variable_rules: &[Arc<ModificationRule>],
        sequence: &[char],
        protein_termini: (bool, bool),
        occupied: &mut [bool],
        assignment: ModificationAssignment,
        assignments: &mut Vec<ModificationAssignment>,
    ) {
        let Some(((rule_idx, count), remaining_entries)) = entries.split_first() else {
            assignments.push(assignment);
            return;
        };
        let rule = &variable_rules[*rule_idx];
        let is_anywhere = rule.get_position() == ModificationPosition::Anywhere;
        let eligible: Vec<usize> = sequence
            .iter()
            .enumerate()
            .filter(|(offset, amino_acid)| {
                !(is_anywhere && occupied[*offset])
                    && rule.is_placeable(
                        **amino_acid,
                        *offset,
                        sequence.len(),
                        protein_termini.0,
                        protein_termini.1,
                    )
            })
            .map(|(offset, _)| offset)
            .collect();
        for offsets in eligible.into_iter().combinations(*count) {
            let mut next_assignment = assignment.clone();
            for offset in offsets.iter() {
                next_assignment.add(*offset, rule.clone());
                if is_anywhere {
                    occupied[*offset] = true;
                }
            }
            self.place_entries(
                remaining_entries,
                variable_rules,
                sequence,
                protein_termini,
                occupied,
                next_assignment,
                assignments,
            );
            if is_anywhere {
                for offset in offsets.iter() {
                    occupied[*offset] = false;
                }
            }
        }
    }
}
