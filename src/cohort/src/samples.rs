//! Alignment of every data source onto a common sample universe.

use ahash::AHashMap;

/// The union of sample identifiers across the genotype source and every
/// subgroup's phenotype matrix, with per-source column mappings.
///
/// `pheno_idx[s][i]` / `geno_idx[i]` give the column of universe position
/// `i` within subgroup s's phenotype matrix / the genotype matrix, or `None`
/// when that source does not type this sample.
#[derive(Debug, Clone)]
pub struct SampleMap {
    samples: Vec<String>,
    pheno_idx: Vec<Vec<Option<usize>>>,
    geno_idx: Vec<Option<usize>>,
}

impl SampleMap {
    /// Build the universe from the genotype header and the per-subgroup
    /// phenotype headers, in order of first appearance.
    pub fn build(geno_samples: &[String], pheno_samples: &[Vec<String>]) -> Self {
        let mut samples: Vec<String> = Vec::new();
        let mut position: AHashMap<String, usize> = AHashMap::new();

        let mut intern = |name: &str, samples: &mut Vec<String>, position: &mut AHashMap<String, usize>| {
            if !position.contains_key(name) {
                position.insert(name.to_string(), samples.len());
                samples.push(name.to_string());
            }
        };

        for name in geno_samples {
            intern(name, &mut samples, &mut position);
        }
        for subgroup in pheno_samples {
            for name in subgroup {
                intern(name, &mut samples, &mut position);
            }
        }

        let geno_idx = Self::index_source(&samples, geno_samples);
        let pheno_idx = pheno_samples.iter()
            .map(|cols| Self::index_source(&samples, cols))
            .collect();

        Self { samples, pheno_idx, geno_idx }
    }

    fn index_source(universe: &[String], source: &[String]) -> Vec<Option<usize>> {
        let cols: AHashMap<&str, usize> = source.iter().enumerate()
            .map(|(j, name)| (name.as_str(), j))
            .collect();
        universe.iter().map(|name| cols.get(name.as_str()).copied()).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn nb_subgroups(&self) -> usize {
        self.pheno_idx.len()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Phenotype column of universe position `i` within subgroup `s`.
    pub fn pheno_col(&self, s: usize, i: usize) -> Option<usize> {
        self.pheno_idx[s][i]
    }

    /// Genotype column of universe position `i` (single genotype source).
    pub fn geno_col(&self, i: usize) -> Option<usize> {
        self.geno_idx[i]
    }

    /// Universe positions typed by subgroup `s`'s phenotype matrix.
    /// This is the index vector the separate permutation engine shuffles.
    pub fn subgroup_positions(&self, s: usize) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.pheno_idx[s][i].is_some()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn union_preserves_first_appearance() {
        let map = SampleMap::build(
            &names(&["s1", "s2", "s3"]),
            &[names(&["s2", "s4"]), names(&["s3", "s1"])],
        );
        assert_eq!(map.samples(), &names(&["s1", "s2", "s3", "s4"])[..]);
        assert_eq!(map.len(), 4);
        assert_eq!(map.nb_subgroups(), 2);
    }

    #[test]
    fn column_lookups() {
        let map = SampleMap::build(
            &names(&["s1", "s2", "s3"]),
            &[names(&["s2", "s4"]), names(&["s3", "s1"])],
        );
        // s4 (universe position 3) is absent from the genotype source.
        assert_eq!(map.geno_col(3), None);
        assert_eq!(map.geno_col(1), Some(1));
        // Subgroup 0 types s2 (col 0) and s4 (col 1).
        assert_eq!(map.pheno_col(0, 1), Some(0));
        assert_eq!(map.pheno_col(0, 3), Some(1));
        assert_eq!(map.pheno_col(0, 0), None);
        assert_eq!(map.subgroup_positions(0), vec![1, 3]);
        assert_eq!(map.subgroup_positions(1), vec![0, 2]);
    }
}
