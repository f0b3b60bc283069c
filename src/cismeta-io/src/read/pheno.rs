//! Phenotype matrix loader.
//!
//! Row 1 holds the sample names, with an optional leading `Id` column
//! header; every following row is a feature name then one numeric (or `NA`)
//! cell per sample.

use std::path::Path;

use anyhow::Result;
use cohort::PhenoMatrix;
use located_error::LocatedError;
use log::info;

use super::{data_lines, parse_f64, ReadError};

pub fn load(path: &Path, subgroup: &str) -> Result<PhenoMatrix> {
    let loc_msg = || format!("While parsing the phenotype matrix '{}' of subgroup '{subgroup}'", path.display());
    let mut lines = data_lines(path)?.into_iter();

    let (_, header) = lines.next()
        .ok_or_else(|| ReadError::EmptyFile{path: path.to_path_buf()})
        .with_loc(loc_msg)?;
    let mut header_fields: Vec<String> = header.split_whitespace().map(str::to_string).collect();

    let mut feature_names = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let mut is_na: Vec<Vec<bool>> = Vec::new();
    let mut header_resolved = false;

    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !header_resolved {
            // The header may or may not carry a leading `Id` cell: resolve
            // against the first data row's width.
            if header_fields.len() == fields.len() {
                header_fields.remove(0);
            } else if header_fields.len() + 1 != fields.len() {
                return Err(ReadError::MalformedHeader{
                    path: path.to_path_buf(),
                    reason: format!(
                        "header lists {} sample(s) but the first data row has {} column(s)",
                        header_fields.len(), fields.len()
                    ),
                }).with_loc(loc_msg)
            }
            header_resolved = true;
        }
        if fields.len() != header_fields.len() + 1 {
            return Err(ReadError::ColumnCount{
                path: path.to_path_buf(), line: line_no,
                expected: (header_fields.len() + 1).to_string(), found: fields.len(),
            }).with_loc(loc_msg)
        }

        feature_names.push(fields[0].to_string());
        let mut row_values = Vec::with_capacity(header_fields.len());
        let mut row_na = Vec::with_capacity(header_fields.len());
        for field in &fields[1..] {
            if field.eq_ignore_ascii_case("na") {
                row_values.push(f64::NAN);
                row_na.push(true);
            } else {
                row_values.push(parse_f64(field, path, line_no).with_loc(loc_msg)?);
                row_na.push(false);
            }
        }
        values.push(row_values);
        is_na.push(row_na);
    }

    if feature_names.is_empty() {
        return Err(ReadError::EmptyFile{path: path.to_path_buf()}).with_loc(loc_msg)
    }

    info!("Subgroup '{subgroup}': {} feature(s) over {} sample(s)", feature_names.len(), header_fields.len());
    Ok(PhenoMatrix {
        subgroup: subgroup.to_string(),
        samples: header_fields,
        feature_names,
        values,
        is_na,
    })
}
