//! Prior-variance grid loader: two whitespace-separated columns, φ² then ω².

use std::path::Path;

use anyhow::Result;
use located_error::LocatedError;
use log::info;
use stats::Grid;

use super::{data_lines, parse_f64, ReadError};

pub fn load(path: &Path) -> Result<Grid> {
    let loc_msg = || format!("While parsing the grid file '{}'", path.display());

    let mut pairs = Vec::new();
    for (line_no, line) in data_lines(path)? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(ReadError::ColumnCount{
                path: path.to_path_buf(), line: line_no,
                expected: "2".to_string(), found: fields.len(),
            }).with_loc(loc_msg)
        }
        let phi2 = parse_f64(fields[0], path, line_no).with_loc(loc_msg)?;
        let omega2 = parse_f64(fields[1], path, line_no).with_loc(loc_msg)?;
        pairs.push((phi2, omega2));
    }
    if pairs.is_empty() {
        return Err(ReadError::EmptyFile{path: path.to_path_buf()}).with_loc(loc_msg)
    }

    info!("Loaded a grid of {} prior-variance pair(s) from '{}'", pairs.len(), path.display());
    Ok(Grid::from_pairs(&pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Write as _};

    #[test]
    fn two_columns_per_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grid.txt");
        File::create(&path)
            .and_then(|mut f| f.write_all(b"0.1 0.4\n0.5 0.5\n"))
            .expect("fixture");

        let grid = load(&path).expect("valid grid");
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.iter().next().map(|p| (p.phi2, p.omega2)), Some((0.1, 0.4)));
    }

    #[test]
    fn three_columns_are_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grid.txt");
        File::create(&path)
            .and_then(|mut f| f.write_all(b"0.1 0.4 0.9\n"))
            .expect("fixture");
        assert!(load(&path).is_err());
    }
}
