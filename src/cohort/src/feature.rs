//! Features (molecular phenotypes) and their per-pair association results.

use ahash::AHashMap;
use stats::{OlsStats, StdSstats};

use crate::SnpIdx;

/// Genomic coordinates of a feature, 1-based inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCoords {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

/// Association result of one (feature, cis-SNP) pair: per-subgroup OLS
/// summary statistics, standardized triples and the ABF family.
///
/// `unweighted_abfs` keeps its insertion order (the enumerator order), so
/// the write phase never has to re-derive it; `weighted_abfs` is the
/// label-keyed lookup used by the permutation engine.
#[derive(Debug, Clone)]
pub struct PairResult {
    pub snp: SnpIdx,
    pub stats: Vec<OlsStats>,
    pub std_sstats: Vec<StdSstats>,
    pub unweighted_abfs: Vec<(String, Vec<f64>)>,
    pub weighted_abfs: AHashMap<String, f64>,
}

impl PairResult {
    pub fn new(snp: SnpIdx, nb_subgroups: usize) -> Self {
        Self {
            snp,
            stats: vec![OlsStats::degenerate(0); nb_subgroups],
            std_sstats: vec![StdSstats::zero(); nb_subgroups],
            unweighted_abfs: Vec::new(),
            weighted_abfs: AHashMap::new(),
        }
    }

    /// Number of subgroups with at least one aligned sample for this pair.
    pub fn nb_subgroups_with_data(&self) -> usize {
        self.stats.iter().filter(|s| s.n > 0).count()
    }

    /// Total sample count over subgroups.
    pub fn nb_samples(&self) -> usize {
        self.stats.iter().map(|s| s.n).sum()
    }

    pub fn sample_sizes(&self) -> Vec<usize> {
        self.stats.iter().map(|s| s.n).collect()
    }
}

/// One feature: phenotype vectors per subgroup, its cis-SNPs, association
/// results and permutation bookkeeping.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    pub chr: String,
    /// 1-based inclusive interval.
    pub start: u32,
    pub end: u32,
    /// `phenos[s]` is empty when subgroup s does not measure this feature.
    pub phenos: Vec<Vec<f64>>,
    pub is_na: Vec<Vec<bool>>,
    /// Sorted by coordinate, deduplicated; filled by the cis-scan.
    pub cis_snps: Vec<SnpIdx>,
    pub pair_results: Vec<PairResult>,
    pub perm_pval_sep: Vec<f64>,
    pub nb_perms_sep: Vec<u64>,
    pub joint_perm_pval: f64,
    pub nb_perms_joint: u64,
    pub max_l10_true_abf: f64,
}

impl Feature {
    pub fn new(name: String, coords: FeatureCoords, nb_subgroups: usize) -> Self {
        Self {
            name,
            chr: coords.chr,
            start: coords.start,
            end: coords.end,
            phenos: vec![Vec::new(); nb_subgroups],
            is_na: vec![Vec::new(); nb_subgroups],
            cis_snps: Vec::new(),
            pair_results: Vec::new(),
            perm_pval_sep: vec![f64::NAN; nb_subgroups],
            nb_perms_sep: vec![0; nb_subgroups],
            joint_perm_pval: f64::NAN,
            nb_perms_joint: 0,
            max_l10_true_abf: f64::NAN,
        }
    }

    /// Does subgroup `s` measure this feature at all?
    pub fn has_pheno(&self, s: usize) -> bool {
        !self.phenos[s].is_empty()
    }

    /// Smallest per-subgroup p-value over this feature's cis-SNPs, ignoring
    /// degenerate (NaN) pairs. NaN when nothing is testable.
    pub fn min_true_pval(&self, s: usize) -> f64 {
        let min = self.pair_results.iter()
            .map(|pair| pair.stats[s].pval)
            .filter(|p| !p.is_nan())
            .fold(f64::INFINITY, f64::min);
        if min.is_infinite() { f64::NAN } else { min }
    }
}
