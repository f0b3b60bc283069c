use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create '{}'", path.display())]
    Create{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to create the parent directory of '{}'", path.display())]
    CreateParentDirectory{path: PathBuf, #[source] source: std::io::Error},

    #[error("I/O error while writing results")]
    Io(#[from] std::io::Error),

    #[error("Failed to finalize the gzip stream")]
    Finish(#[from] gzp::GzpError),
}
