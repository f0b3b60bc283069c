//! Association and permutation engines of cismeta-rs.
//!
//! The association scan locates each feature's cis-SNPs, drives the
//! statistical kernel for every observed pair and aggregates per-feature
//! maxima. The permutation engines then assess feature-level significance,
//! separately per subgroup (minimum p-value) and jointly (maximum ABF).

use parser::{Anchor, BfFamily, TrickMode};
use stats::Grid;

pub mod cis;
pub mod scan;
pub mod perm;
pub mod write;

#[cfg(test)]
pub(crate) mod testutil;

pub(crate) use logger::Logger;

/// Everything the engines need to know, resolved once from the CLI.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub anchor: Anchor,
    pub cis_len: u32,
    /// Subgroups below this MAF carry no data for the pair.
    pub maf_min: f64,
    /// Some(_) when ABFs are computed (steps >= 3).
    pub bfs: Option<BfFamily>,
    /// Some(_) when joint permutations will run (steps 4 and 5).
    pub pbf: Option<BfFamily>,
    pub grid: Option<Grid>,
    pub nperm: u64,
    pub seed: u64,
    pub trick: TrickMode,
}
