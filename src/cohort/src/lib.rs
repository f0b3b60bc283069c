//! Data model of cismeta-rs: subgroups, sample-alignment tables, the SNP
//! arena and the feature catalogue.
//!
//! Catalogues are built once from loaded matrices, then stay read-only during
//! association scanning; only per-feature results and permutation counters
//! are mutated afterwards, each by the feature's own task.

pub mod samples;
pub mod snp;
pub mod feature;
pub mod build;

mod error;
pub use error::CohortError;

pub use samples::SampleMap;
pub use snp::{Snp, SnpIdx};
pub use feature::{Feature, FeatureCoords, PairResult};
pub use build::{Catalogues, PhenoMatrix};
