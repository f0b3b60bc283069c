//! Statistical kernel of cismeta-rs.
//!
//! Everything in here is plain numerics: no I/O, no catalogue types. The
//! association and permutation engines drive these functions for every
//! (feature, cis-SNP) pair.

pub mod dist;
pub mod ols;
pub mod qnorm;
pub mod l10;
pub mod grid;
pub mod config;
pub mod abf;

pub use ols::{OlsStats, StdSstats};
pub use grid::Grid;
pub use config::Config;

/// Tolerance under which a statistic is treated as zero throughout the kernel.
pub const NEAR_ZERO: f64 = 1e-8;
