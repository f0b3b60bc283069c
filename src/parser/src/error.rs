use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Invalid --step '{0}'. Expected an integer within [1-5]")]
    InvalidStep(String),

    #[error("Invalid --trick '{0}'. Expected 0 (off), 1 (stop early) or 2 (shuffle-only)")]
    InvalidTrick(String),

    #[error("--grid is required when --step >= 3, since Bayes factors are averaged over a grid of prior variances")]
    MissingGrid,

    #[error("--nperm must be >= 1 for the permutation steps (2, 4 and 5)")]
    InvalidNbPerms,

    #[error("Incompatible '--bfs {bfs}' with '--pbf {pbf}'. The permutation Bayes factor cannot enumerate more configurations than the analysis computes")]
    IncompatibleBfs{bfs: String, pbf: String},

    #[error("Missing file: '{0}'")]
    MissingFile(String),

    #[error("'{0}' exists but is not a regular file")]
    NotAFile(String),

    #[error("Failed to parse the output prefix from --out")]
    ParseOutputPrefix,
}
