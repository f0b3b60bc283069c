//! Shared fixtures for the engine tests.

use ahash::AHashMap;
use cohort::{build, Catalogues, FeatureCoords, PhenoMatrix, Snp};
use parser::{Anchor, TrickMode};

use crate::AnalysisOptions;

/// One subgroup, one feature, one cis-SNP (plus a far-away one), with a
/// perfect dose-phenotype signal over `nb_samples` samples.
pub(crate) fn toy_catalogues(nb_samples: usize) -> Catalogues {
    let samples: Vec<String> = (0..nb_samples).map(|i| format!("s{i}")).collect();
    // Dosage cycles 0,1,2; phenotype follows it exactly.
    let doses: Vec<f64> = (0..nb_samples).map(|i| (i % 3) as f64).collect();
    let phenos: Vec<f64> = doses.iter().map(|d| d + 1.0).collect();
    toy_catalogues_with(samples, doses, phenos)
}

/// Same topology with caller-chosen dosages and phenotypes.
pub(crate) fn toy_catalogues_with(samples: Vec<String>, doses: Vec<f64>, phenos: Vec<f64>) -> Catalogues {
    let nb_samples = samples.len();
    let snps = vec![
        Snp::new("rs1".into(), "chr1".into(), 950, doses.clone(), vec![false; nb_samples]),
        Snp::new("rs2".into(), "chr1".into(), 5_000_000, doses, vec![false; nb_samples]),
    ];
    let matrix = PhenoMatrix {
        subgroup: "tissueA".into(),
        samples: samples.clone(),
        feature_names: vec!["gene1".into()],
        values: vec![phenos],
        is_na: vec![vec![false; nb_samples]],
    };
    let mut coords = AHashMap::new();
    coords.insert("gene1".to_string(), FeatureCoords { chr: "chr1".into(), start: 1000, end: 1100 });
    build::build(samples, snps, vec![matrix], coords, None, None).expect("toy catalogues")
}

pub(crate) fn toy_options() -> AnalysisOptions {
    AnalysisOptions {
        anchor: Anchor::Fss,
        cis_len: 100_000,
        maf_min: 0.0,
        bfs: None,
        pbf: None,
        grid: None,
        nperm: 0,
        seed: 1234,
        trick: TrickMode::Off,
    }
}
