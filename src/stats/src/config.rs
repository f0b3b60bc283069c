//! Enumeration of subgroup configurations.
//!
//! A configuration is a non-empty subset of the S subgroups assumed to carry
//! the signal, labelled by its 1-based members joined with '-' ("2", "1-3",
//! "1-2-3", ...). Enumeration is lexicographic within each subset size, so
//! label-keyed maps built during the association phase line up with the
//! write phase.

use itertools::Itertools;

/// One configuration: the 0-based member indices and the display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub members: Vec<usize>,
    pub label: String,
}

impl Config {
    fn new(members: Vec<usize>) -> Self {
        let label = members.iter().map(|i| (i + 1).to_string()).join("-");
        Self { members, label }
    }

    pub fn contains(&self, subgroup: usize) -> bool {
        self.members.contains(&subgroup)
    }
}

/// Lexicographic k-combinations of {0..nb_subgroups}.
pub fn subsets_of_size(nb_subgroups: usize, k: usize) -> impl Iterator<Item = Config> {
    (0..nb_subgroups).combinations(k).map(Config::new)
}

/// The singleton configurations "1" ... "S" (the `subset` family).
pub fn singletons(nb_subgroups: usize) -> impl Iterator<Item = Config> {
    subsets_of_size(nb_subgroups, 1)
}

/// Every non-empty proper subset, sizes 1 ≤ k < S (the `all` family).
/// Size 2^S − 2 overall.
pub fn proper_subsets(nb_subgroups: usize) -> impl Iterator<Item = Config> {
    (1..nb_subgroups).flat_map(move |k| subsets_of_size(nb_subgroups, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_subgroups_enumerate_in_order() {
        let labels: Vec<String> = proper_subsets(3).map(|c| c.label).collect();
        assert_eq!(labels, vec!["1", "2", "3", "1-2", "1-3", "2-3"]);
    }

    #[test]
    fn proper_subset_count_is_2s_minus_2() {
        for s in 2..=6 {
            assert_eq!(proper_subsets(s).count(), (1usize << s) - 2);
        }
    }

    #[test]
    fn singletons_only() {
        let labels: Vec<String> = singletons(4).map(|c| c.label).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn members_are_zero_based() {
        let cfg = subsets_of_size(3, 2).next().unwrap();
        assert_eq!(cfg.members, vec![0, 1]);
        assert_eq!(cfg.label, "1-2");
        assert!(cfg.contains(0) && !cfg.contains(2));
    }
}
