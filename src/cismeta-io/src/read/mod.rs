//! Input loaders. Every reader accepts plain text or gzip (`.gz`)
//! transparently and skips `#`-comment lines where the format allows them.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use ahash::AHashSet;
use anyhow::Result;
use flate2::read::MultiGzDecoder;
use located_error::LocatedError;

mod error;
pub use error::ReadError;

pub mod geno;
pub mod pheno;
pub mod bed;
pub mod grid;

/// Open a (possibly gzipped) text file for buffered line reading.
pub fn open_reader<'a>(path: &Path) -> Result<BufReader<Box<dyn Read + 'a>>> {
    let file = File::open(path)
        .map_err(|source| ReadError::Open{path: path.to_path_buf(), source})
        .with_loc(|| format!("While opening '{}'", path.display()))?;

    let source: Box<dyn Read> = match path.extension().map(|ext| ext == "gz") {
        Some(true) => Box::new(MultiGzDecoder::new(file)),
        _          => Box::new(file),
    };
    Ok(BufReader::new(source))
}

/// Read all data lines of `path`: trimmed, `#`-comments and blanks skipped,
/// paired with their 1-based line number.
pub(crate) fn data_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let reader = open_reader(path)?;
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.loc("While reading line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue
        }
        out.push((i + 1, trimmed.to_string()));
    }
    Ok(out)
}

/// Parse a two-column list file `subgroupId <WS> path`, preserving order.
pub fn list_file(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    let mut seen: AHashSet<String> = AHashSet::new();
    for (line_no, line) in data_lines(path)? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(ReadError::ColumnCount{
                path: path.to_path_buf(), line: line_no, expected: "2".to_string(), found: fields.len()
            }).loc("While parsing a subgroup list file")
        }
        if !seen.insert(fields[0].to_string()) {
            return Err(ReadError::DuplicateSubgroup{path: path.to_path_buf(), id: fields[0].to_string()})
                .loc("While parsing a subgroup list file")
        }
        entries.push((fields[0].to_string(), PathBuf::from(fields[1])));
    }
    if entries.is_empty() {
        return Err(ReadError::EmptyFile{path: path.to_path_buf()})
            .loc("While parsing a subgroup list file")
    }
    Ok(entries)
}

/// Genotype list file: like [`list_file`], but the core accepts exactly one
/// (shared) genotype source.
pub fn geno_list_file(path: &Path) -> Result<(String, PathBuf)> {
    let entries = list_file(path)?;
    if entries.len() != 1 {
        return Err(ReadError::SingleGenotypeSource{path: path.to_path_buf(), found: entries.len()})
            .loc("While parsing the genotype list file")
    }
    Ok(entries.into_iter().next().expect("one entry"))
}

/// One identifier per line.
pub fn allow_list(path: &Path) -> Result<AHashSet<String>> {
    let mut out = AHashSet::new();
    for (_, line) in data_lines(path)? {
        out.insert(line);
    }
    Ok(out)
}

pub(crate) fn parse_f64(field: &str, path: &Path, line: usize) -> Result<f64, ReadError> {
    field.parse::<f64>().map_err(|_| ReadError::ParseNumber{
        path: path.to_path_buf(), line, field: field.to_string()
    })
}
