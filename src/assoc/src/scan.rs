//! The association engine: for every feature, locate its cis-SNPs, run the
//! statistical kernel on each (feature, SNP) pair and aggregate the
//! feature-level maximum ABF.
//!
//! Features are independent once the catalogues are built, so the scan fans
//! out with rayon; every task mutates its own feature only.

use cohort::{Catalogues, Feature, PairResult, SampleMap, Snp, SnpIdx};
use log::info;
use parser::BfFamily;
use rayon::prelude::*;

use stats::{abf, config, l10, ols, Grid, StdSstats};

use crate::{cis, AnalysisOptions, Logger};

/// Run the scan over every feature of the catalogue.
pub fn run(cat: &mut Catalogues, opts: &AnalysisOptions) {
    let Catalogues { subgroups, sample_map, snps, snps_by_chr, features } = cat;
    let (snps, snps_by_chr, sample_map) = (&*snps, &*snps_by_chr, &*sample_map);
    let nb_subgroups = subgroups.len();
    let positions: Vec<Vec<usize>> = (0..nb_subgroups)
        .map(|s| sample_map.subgroup_positions(s))
        .collect();

    info!("Scanning {} feature(s) for cis associations...", features.len());
    let progress = Logger::progress(features.len(), "associating".to_string());

    features.par_iter_mut().for_each(|ftr| {
        ftr.cis_snps = cis::scan(ftr, snps, snps_by_chr, opts.anchor, opts.cis_len);
        let pairs: Vec<PairResult> = ftr.cis_snps.iter()
            .map(|&idx| analyze_pair(ftr, idx, &snps[idx.0], sample_map, &positions, opts))
            .collect();
        ftr.pair_results = pairs;
        if let Some(pbf) = opts.pbf {
            ftr.max_l10_true_abf = max_true_abf(&ftr.pair_results, pbf, nb_subgroups);
        }
        progress.inc(1);
    });
    progress.finish_and_clear();

    let nb_pairs: usize = features.iter().map(|f| f.pair_results.len()).sum();
    let nb_tested: usize = features.iter().filter(|f| !f.cis_snps.is_empty()).count();
    info!("{nb_tested} feature(s) with at least one cis-SNP, {nb_pairs} pair(s) analyzed");
}

/// Gather the paired, non-missing (dosage, phenotype) values of one
/// subgroup. `pheno_positions[j]` is the universe position used to look up
/// the phenotype of `positions[j]`; outside permutations the two slices are
/// identical.
pub(crate) fn collect_aligned(
    ftr: &Feature,
    s: usize,
    snp: &Snp,
    map: &SampleMap,
    positions: &[usize],
    pheno_positions: &[usize],
    g: &mut Vec<f64>,
    y: &mut Vec<f64>,
) {
    g.clear();
    y.clear();
    for (j, &i) in positions.iter().enumerate() {
        let Some(geno_col) = map.geno_col(i) else {
            continue
        };
        if snp.is_na[geno_col] {
            continue
        }
        let Some(pheno_col) = map.pheno_col(s, pheno_positions[j]) else {
            continue
        };
        if ftr.is_na[s][pheno_col] {
            continue
        }
        g.push(snp.genos[geno_col]);
        y.push(ftr.phenos[s][pheno_col]);
    }
}

/// Does this subgroup carry data for this SNP at all, under the MAF filter?
pub(crate) fn subgroup_in_play(ftr: &Feature, s: usize, snp: &Snp, maf_min: f64) -> bool {
    if !ftr.has_pheno(s) {
        return false
    }
    // A NaN MAF (no genotyped sample in the subgroup) never passes.
    maf_min <= 0.0 || snp.mafs[s] >= maf_min
}

fn analyze_pair(
    ftr: &Feature,
    snp_idx: SnpIdx,
    snp: &Snp,
    map: &SampleMap,
    positions: &[Vec<usize>],
    opts: &AnalysisOptions,
) -> PairResult {
    let nb_subgroups = ftr.phenos.len();
    let mut pair = PairResult::new(snp_idx, nb_subgroups);

    let (mut g, mut y) = (Vec::new(), Vec::new());
    for s in 0..nb_subgroups {
        if !subgroup_in_play(ftr, s, snp, opts.maf_min) {
            continue
        }
        collect_aligned(ftr, s, snp, map, &positions[s], &positions[s], &mut g, &mut y);
        pair.stats[s] = if g.len() < 2 {
            ols::OlsStats::degenerate(g.len())
        } else {
            ols::regress(&g, &y)
        };
    }

    if let Some(bfs) = opts.bfs {
        for s in 0..nb_subgroups {
            pair.std_sstats[s] = ols::standardize(&pair.stats[s]);
        }
        let grid = opts.grid.as_ref().expect("a grid is mandatory when ABFs are computed");
        compute_abfs(&mut pair, bfs, grid);
    }
    pair
}

/// Fill the label-keyed ABF maps of one pair: the consistent model and its
/// fixed-effect / maximum-heterogeneity variants first, then the selector's
/// configurations in enumerator order.
fn compute_abfs(pair: &mut PairResult, bfs: BfFamily, grid: &Grid) {
    let ns = pair.sample_sizes();
    let triples = pair.std_sstats.clone();
    let weights = grid.uniform_weights();
    let nb_subgroups = ns.len();
    let everyone: Vec<usize> = (0..nb_subgroups).collect();

    let mut entries: Vec<(String, Vec<f64>)> = Vec::new();
    let with_data = |members: &[usize]| abf::subset_has_data(&ns, members);

    for (label, values) in [
        ("const", abf::grid_consistent(&triples, grid)),
        ("const-fix", abf::grid_fixed(&triples, grid)),
        ("const-maxh", abf::grid_max_het(&triples, grid)),
    ] {
        let values = if with_data(&everyone) { values } else { abf::nan_grid(grid) };
        entries.push((label.to_string(), values));
    }

    let configs: Vec<config::Config> = match bfs {
        BfFamily::Const  => Vec::new(),
        BfFamily::Subset => config::singletons(nb_subgroups).collect(),
        BfFamily::All    => config::proper_subsets(nb_subgroups).collect(),
    };
    for cfg in configs {
        let values = if with_data(&cfg.members) {
            abf::grid_consistent(&abf::mask(&triples, &cfg.members), grid)
        } else {
            abf::nan_grid(grid)
        };
        entries.push((cfg.label, values));
    }

    for (label, values) in entries {
        pair.weighted_abfs.insert(label.clone(), l10::log10_weighted_sum(&values, &weights));
        pair.unweighted_abfs.push((label, values));
    }
}

/// The labels over which the permutation Bayes factor maximizes.
pub(crate) fn pbf_labels(pbf: BfFamily, nb_subgroups: usize) -> Vec<String> {
    let mut labels = vec!["const".to_string()];
    match pbf {
        BfFamily::Const  => {}
        BfFamily::Subset => labels.extend(config::singletons(nb_subgroups).map(|c| c.label)),
        BfFamily::All    => labels.extend(config::proper_subsets(nb_subgroups).map(|c| c.label)),
    }
    labels
}

/// Feature-level maximum weighted ABF over its pairs, under the permutation
/// policy. NaN entries never win; all-NaN stays NaN.
fn max_true_abf(pairs: &[PairResult], pbf: BfFamily, nb_subgroups: usize) -> f64 {
    let labels = pbf_labels(pbf, nb_subgroups);
    let mut best = f64::NAN;
    for pair in pairs {
        for label in &labels {
            if let Some(&value) = pair.weighted_abfs.get(label) {
                if !value.is_nan() && (best.is_nan() || value > best) {
                    best = value;
                }
            }
        }
    }
    best
}

/// Weighted permutation Bayes factor of one pair, recomputed from
/// (permuted) standardized triples: the policy's maximum over the same
/// label set as [`pbf_labels`].
pub(crate) fn weighted_pbf_max(
    triples: &[StdSstats],
    ns: &[usize],
    pbf: BfFamily,
    grid: &Grid,
    weights: &[f64],
) -> f64 {
    let nb_subgroups = triples.len();
    let everyone: Vec<usize> = (0..nb_subgroups).collect();
    let mut best = f64::NAN;
    let mut consider = |value: f64, best: &mut f64| {
        if !value.is_nan() && (best.is_nan() || value > *best) {
            *best = value;
        }
    };

    if abf::subset_has_data(ns, &everyone) {
        consider(l10::log10_weighted_sum(&abf::grid_consistent(triples, grid), weights), &mut best);
    }
    let configs: Vec<config::Config> = match pbf {
        BfFamily::Const  => Vec::new(),
        BfFamily::Subset => config::singletons(nb_subgroups).collect(),
        BfFamily::All    => config::proper_subsets(nb_subgroups).collect(),
    };
    for cfg in configs {
        if abf::subset_has_data(ns, &cfg.members) {
            let values = abf::grid_consistent(&abf::mask(triples, &cfg.members), grid);
            consider(l10::log10_weighted_sum(&values, &weights), &mut best);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{toy_catalogues, toy_options};

    #[test]
    fn scan_keeps_only_cis_pairs() {
        let mut cat = toy_catalogues(9);
        run(&mut cat, &toy_options());
        let ftr = &cat.features[0];
        assert_eq!(ftr.cis_snps.len(), 1);
        assert_eq!(cat.snp(ftr.cis_snps[0]).name, "rs1");
        // Perfect fit: betahat = 1, pve = 1, p = 0.
        let stats = &ftr.pair_results[0].stats[0];
        assert!((stats.betahat - 1.0).abs() < 1e-10);
        assert!((stats.pve - 1.0).abs() < 1e-10);
        assert_eq!(stats.pval, 0.0);
    }

    #[test]
    fn abfs_follow_enumerator_order() {
        let mut cat = toy_catalogues(9);
        let mut opts = toy_options();
        opts.bfs = Some(BfFamily::Subset);
        opts.pbf = Some(BfFamily::Const);
        opts.grid = Some(Grid::from_pairs(&[(0.1, 0.4), (0.5, 0.5)]));
        run(&mut cat, &opts);

        let pair = &cat.features[0].pair_results[0];
        let labels: Vec<&str> = pair.unweighted_abfs.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["const", "const-fix", "const-maxh", "1"]);
        assert!(pair.unweighted_abfs.iter().all(|(_, v)| v.len() == 2));
        assert!(pair.weighted_abfs.contains_key("const"));
    }

    #[test]
    fn maf_filter_silences_a_subgroup() {
        let mut cat = toy_catalogues(9);
        let mut opts = toy_options();
        // Doses 0,1,2 cycling: p = 0.5, maf = 0.5. A 0.6 threshold excludes it.
        opts.maf_min = 0.6;
        run(&mut cat, &opts);
        let pair = &cat.features[0].pair_results[0];
        assert_eq!(pair.stats[0].n, 0);
        assert!(pair.stats[0].pval.is_nan());
    }

    #[test]
    fn max_true_abf_ignores_nan() {
        let mut cat = toy_catalogues(9);
        let mut opts = toy_options();
        opts.bfs = Some(BfFamily::Const);
        opts.pbf = Some(BfFamily::Const);
        opts.grid = Some(Grid::from_pairs(&[(0.1, 0.4)]));
        run(&mut cat, &opts);
        // With a perfect fit the triple degenerates to zero: the weighted
        // ABF is 0 everywhere, never NaN.
        assert!(!cat.features[0].max_l10_true_abf.is_nan());
    }
}
