//! IMPUTE-style genotype matrix loader.
//!
//! Header: `chr name coord a1 a2` followed by three probability columns per
//! sample (`<id>_a1a1 <id>_a1a2 <id>_a2a2`). Body rows carry the same five
//! leading columns then 3·N probabilities. Dosage = 0·AA + 1·AB + 2·BB; an
//! all-zero triple flags a missing genotype.

use std::path::Path;

use anyhow::Result;
use cohort::Snp;
use located_error::LocatedError;
use log::info;

use super::{data_lines, parse_f64, ReadError};

const LEADING_COLS: usize = 5;

/// Load the genotype matrix: sample names (header order) and the SNP rows.
pub fn load(path: &Path) -> Result<(Vec<String>, Vec<Snp>)> {
    let loc_msg = || format!("While parsing the genotype matrix '{}'", path.display());
    let mut lines = data_lines(path)?.into_iter();

    let (_, header) = lines.next()
        .ok_or_else(|| ReadError::EmptyFile{path: path.to_path_buf()})
        .with_loc(loc_msg)?;
    let samples = parse_header(&header, path).with_loc(loc_msg)?;
    let expected = LEADING_COLS + 3 * samples.len();

    let mut snps = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != expected {
            return Err(ReadError::ColumnCount{
                path: path.to_path_buf(), line: line_no,
                expected: expected.to_string(), found: fields.len(),
            }).with_loc(loc_msg)
        }

        let chr = fields[0].to_string();
        let name = fields[1].to_string();
        let coord: u32 = fields[2].parse()
            .map_err(|_| ReadError::ParseNumber{
                path: path.to_path_buf(), line: line_no, field: fields[2].to_string()
            })
            .with_loc(loc_msg)?;

        let mut genos = Vec::with_capacity(samples.len());
        let mut is_na = Vec::with_capacity(samples.len());
        for j in 0..samples.len() {
            let base = LEADING_COLS + 3 * j;
            let p_aa = parse_f64(fields[base], path, line_no).with_loc(loc_msg)?;
            let p_ab = parse_f64(fields[base + 1], path, line_no).with_loc(loc_msg)?;
            let p_bb = parse_f64(fields[base + 2], path, line_no).with_loc(loc_msg)?;
            if p_aa == 0.0 && p_ab == 0.0 && p_bb == 0.0 {
                genos.push(f64::NAN);
                is_na.push(true);
            } else {
                genos.push(p_ab + 2.0 * p_bb);
                is_na.push(false);
            }
        }
        snps.push(Snp::new(name, chr, coord, genos, is_na));
    }

    info!("Loaded {} SNP(s) over {} genotyped sample(s) from '{}'", snps.len(), samples.len(), path.display());
    Ok((samples, snps))
}

/// Extract sample ids from the header: one per probability-column triple,
/// stripping the `_aNaM` suffix.
fn parse_header(header: &str, path: &Path) -> Result<Vec<String>, ReadError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() < LEADING_COLS + 3 || (fields.len() - LEADING_COLS) % 3 != 0 {
        return Err(ReadError::MalformedHeader{
            path: path.to_path_buf(),
            reason: format!("expected 5 leading columns then 3 columns per sample, found {} column(s)", fields.len()),
        })
    }
    let samples = fields[LEADING_COLS..].chunks(3)
        .map(|triple| strip_allele_suffix(triple[0]).to_string())
        .collect();
    Ok(samples)
}

fn strip_allele_suffix(column: &str) -> &str {
    match column.rfind('_') {
        Some(pos) => &column[..pos],
        None      => column,
    }
}
