//! BED-like feature coordinate loader: `chr start end name [...]`, 0-based
//! half-open start, stored 1-based inclusive.

use std::path::Path;

use ahash::AHashMap;
use anyhow::Result;
use cohort::FeatureCoords;
use located_error::LocatedError;
use log::info;

use super::{data_lines, ReadError};

pub fn load(path: &Path) -> Result<AHashMap<String, FeatureCoords>> {
    let loc_msg = || format!("While parsing the feature coordinates '{}'", path.display());

    let mut coords = AHashMap::new();
    for (line_no, line) in data_lines(path)? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(ReadError::ColumnCount{
                path: path.to_path_buf(), line: line_no,
                expected: "at least 4".to_string(), found: fields.len(),
            }).with_loc(loc_msg)
        }
        let parse_coord = |field: &str| -> Result<u32, ReadError> {
            field.parse().map_err(|_| ReadError::ParseNumber{
                path: path.to_path_buf(), line: line_no, field: field.to_string()
            })
        };
        let start: u32 = parse_coord(fields[1]).with_loc(loc_msg)?;
        let end: u32 = parse_coord(fields[2]).with_loc(loc_msg)?;
        coords.insert(fields[3].to_string(), FeatureCoords {
            chr: fields[0].to_string(),
            start: start + 1,
            end,
        });
    }
    if coords.is_empty() {
        return Err(ReadError::EmptyFile{path: path.to_path_buf()}).with_loc(loc_msg)
    }

    info!("Loaded coordinates for {} feature(s) from '{}'", coords.len(), path.display());
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Write as _};

    #[test]
    fn bed_start_becomes_one_based() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fcoord.bed");
        File::create(&path)
            .and_then(|mut f| f.write_all(b"chr1\t999\t1100\tgene1\t.\t+\nchr2\t0\t500\tgene2\n"))
            .expect("fixture");

        let coords = load(&path).expect("valid bed");
        assert_eq!(coords["gene1"], FeatureCoords { chr: "chr1".into(), start: 1000, end: 1100 });
        assert_eq!(coords["gene2"].start, 1);
    }
}
