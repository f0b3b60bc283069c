//! The SNP arena.

use crate::SampleMap;

/// Stable index into the SNP arena. Features reference their cis-SNPs
/// through this, never by pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnpIdx(pub usize);

/// One SNP of the (single) genotype source.
///
/// `genos[j]` is the allele dosage of source column j, 0·AA + 1·AB + 2·BB;
/// `is_na[j]` flags the all-zero probability triples of the IMPUTE format.
#[derive(Debug, Clone)]
pub struct Snp {
    pub name: String,
    pub chr: String,
    /// 1-based position.
    pub coord: u32,
    pub genos: Vec<f64>,
    pub is_na: Vec<bool>,
    /// Per-subgroup minor allele frequency, NaN when the subgroup types no
    /// sample for this SNP.
    pub mafs: Vec<f64>,
}

impl Snp {
    pub fn new(name: String, chr: String, coord: u32, genos: Vec<f64>, is_na: Vec<bool>) -> Self {
        Self { name, chr, coord, genos, is_na, mafs: Vec::new() }
    }

    /// Dosage of genotype column `col`, or None when missing.
    pub fn dose(&self, col: usize) -> Option<f64> {
        (!self.is_na[col]).then(|| self.genos[col])
    }

    /// min(p, 1−p) with p = mean dosage / 2 over the subgroup's non-missing
    /// samples.
    pub fn compute_mafs(&mut self, map: &SampleMap) {
        self.mafs = (0..map.nb_subgroups()).map(|s| {
            let (mut sum, mut n) = (0.0, 0usize);
            for i in 0..map.len() {
                if map.pheno_col(s, i).is_none() {
                    continue
                }
                let Some(col) = map.geno_col(i) else {
                    continue
                };
                if let Some(dose) = self.dose(col) {
                    sum += dose;
                    n += 1;
                }
            }
            if n == 0 {
                f64::NAN
            } else {
                let p = sum / (2.0 * n as f64);
                p.min(1.0 - p)
            }
        }).collect();
    }
}
