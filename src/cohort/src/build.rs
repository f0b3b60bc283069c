//! Assembly of the global catalogues from loaded matrices.

use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use located_error::LocatedError;
use log::{info, warn};

use crate::{CohortError, Feature, FeatureCoords, SampleMap, Snp, SnpIdx};

/// One subgroup's phenotype matrix, as loaded: row per feature, column per
/// sample, missing cells flagged in `is_na`.
#[derive(Debug, Clone)]
pub struct PhenoMatrix {
    pub subgroup: String,
    pub samples: Vec<String>,
    pub feature_names: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub is_na: Vec<Vec<bool>>,
}

/// The read-only state shared by the association and permutation engines.
#[derive(Debug)]
pub struct Catalogues {
    pub subgroups: Vec<String>,
    pub sample_map: SampleMap,
    pub snps: Vec<Snp>,
    /// Per-chromosome SNP indices, sorted by coordinate.
    pub snps_by_chr: AHashMap<String, Vec<SnpIdx>>,
    /// Sorted by name: the deterministic processing and output order.
    pub features: Vec<Feature>,
}

impl Catalogues {
    pub fn nb_subgroups(&self) -> usize {
        self.subgroups.len()
    }

    pub fn snp(&self, idx: SnpIdx) -> &Snp {
        &self.snps[idx.0]
    }

    /// Quantile-normalize every subgroup's phenotype vector of every
    /// feature. Run once, before any OLS.
    pub fn quantile_normalize_phenotypes(&mut self) {
        for ftr in &mut self.features {
            for s in 0..self.subgroups.len() {
                if !ftr.phenos[s].is_empty() {
                    stats::qnorm::quantile_normalize(&mut ftr.phenos[s], &ftr.is_na[s]);
                }
            }
        }
    }
}

/// Build the catalogues: align samples, sort and deduplicate the SNP arena,
/// attach coordinates to features and compute per-subgroup MAFs.
pub fn build(
    geno_samples: Vec<String>,
    mut snps: Vec<Snp>,
    phenos: Vec<PhenoMatrix>,
    coords: AHashMap<String, FeatureCoords>,
    ftr_allow: Option<&AHashSet<String>>,
    snp_allow: Option<&AHashSet<String>>,
) -> Result<Catalogues> {
    let subgroups: Vec<String> = phenos.iter().map(|m| m.subgroup.clone()).collect();
    let pheno_samples: Vec<Vec<String>> = phenos.iter().map(|m| m.samples.clone()).collect();
    let sample_map = SampleMap::build(&geno_samples, &pheno_samples);
    info!("Sample universe: {} samples across {} subgroup(s)", sample_map.len(), subgroups.len());

    // ---- SNP arena: allow-list filter, sort by (chr, coord, name), dedup by name.
    if let Some(allow) = snp_allow {
        snps.retain(|snp| allow.contains(&snp.name));
    }
    snps.sort_by(|a, b| {
        (a.chr.as_str(), a.coord, a.name.as_str()).cmp(&(b.chr.as_str(), b.coord, b.name.as_str()))
    });
    let mut seen = AHashSet::with_capacity(snps.len());
    snps.retain(|snp| seen.insert(snp.name.clone()));
    if snps.is_empty() {
        return Err(CohortError::EmptySnpCatalogue)
            .loc("While building the SNP arena")
    }

    for snp in &mut snps {
        snp.compute_mafs(&sample_map);
    }

    let mut snps_by_chr: AHashMap<String, Vec<SnpIdx>> = AHashMap::new();
    for (i, snp) in snps.iter().enumerate() {
        snps_by_chr.entry(snp.chr.clone()).or_default().push(SnpIdx(i));
    }

    // ---- Feature catalogue: union of phenotype rows across subgroups.
    let mut features: AHashMap<String, Feature> = AHashMap::new();
    for (s, matrix) in phenos.iter().enumerate() {
        let mut seen_rows: AHashSet<&str> = AHashSet::with_capacity(matrix.feature_names.len());
        for (row, name) in matrix.feature_names.iter().enumerate() {
            if !seen_rows.insert(name.as_str()) {
                return Err(CohortError::DuplicateFeature(name.clone(), matrix.subgroup.clone()))
                    .with_loc(|| format!("While merging the phenotype matrix of subgroup '{}'", matrix.subgroup))
            }
            if let Some(allow) = ftr_allow {
                if !allow.contains(name) {
                    continue
                }
            }
            if !features.contains_key(name) {
                let coords = coords.get(name)
                    .ok_or_else(|| CohortError::MissingCoordinate(name.clone()))
                    .with_loc(|| format!("While attaching coordinates to feature '{name}'"))?;
                features.insert(name.clone(), Feature::new(name.clone(), coords.clone(), subgroups.len()));
            }
            let ftr = features.get_mut(name).expect("feature was just interned");
            ftr.phenos[s] = matrix.values[row].clone();
            ftr.is_na[s] = matrix.is_na[row].clone();
        }
    }
    if features.is_empty() {
        return Err(CohortError::EmptyFeatureCatalogue)
            .loc("While building the feature catalogue")
    }

    let mut features: Vec<Feature> = features.into_values().collect();
    features.sort_by(|a, b| a.name.cmp(&b.name));

    let kept: AHashSet<&str> = features.iter().map(|f| f.name.as_str()).collect();
    let orphans = coords.keys().filter(|name| !kept.contains(name.as_str())).count();
    if orphans > 0 {
        warn!("{orphans} feature(s) of the --fcoord file are not analyzed (no phenotype measurement, or filtered out)");
    }

    Ok(Catalogues { subgroups, sample_map, snps, snps_by_chr, features })
}
