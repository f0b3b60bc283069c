use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to open '{}'", path.display())]
    Open{path: PathBuf, #[source] source: std::io::Error},

    #[error("'{}' is empty", path.display())]
    EmptyFile{path: PathBuf},

    #[error("'{}', line {line}: expected {expected} column(s), found {found}", path.display())]
    ColumnCount{path: PathBuf, line: usize, expected: String, found: usize},

    #[error("'{}', line {line}: cannot parse '{field}' as a number", path.display())]
    ParseNumber{path: PathBuf, line: usize, field: String},

    #[error("'{}': malformed header. {reason}", path.display())]
    MalformedHeader{path: PathBuf, reason: String},

    #[error("The genotype list '{}' must reference exactly one genotype file, found {found}", path.display())]
    SingleGenotypeSource{path: PathBuf, found: usize},

    #[error("The subgroup list '{}' contains a duplicate subgroup id '{id}'", path.display())]
    DuplicateSubgroup{path: PathBuf, id: String},
}
