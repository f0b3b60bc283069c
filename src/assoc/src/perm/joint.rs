//! Joint permutations: one sample-universe shuffle applied to every
//! subgroup's phenotype indexing, scored by the maximum weighted ABF under
//! the selected permutation Bayes factor.

use cohort::Catalogues;
use log::info;
use parser::TrickMode;
use stats::{ols, StdSstats};

use crate::{scan, AnalysisOptions, Logger};
use super::{calibrate, TRICK_HITS};

pub fn run(cat: &mut Catalogues, opts: &AnalysisOptions) {
    let Some(pbf) = opts.pbf else {
        return
    };
    let grid = opts.grid.as_ref().expect("a grid is mandatory for joint permutations");
    let weights = grid.uniform_weights();

    let Catalogues { subgroups, sample_map, snps, features, .. } = cat;
    let nb_subgroups = subgroups.len();
    let universe: Vec<usize> = (0..sample_map.len()).collect();

    info!("Joint permutations ({} permutation(s) per feature, --pbf {pbf})...", opts.nperm);
    let progress = Logger::progress(features.len(), "permuting jointly".to_string());

    let mut rng_perm = fastrand::Rng::with_seed(opts.seed);
    let mut rng_trick = fastrand::Rng::with_seed(opts.seed);

    let mut perm: Vec<usize> = Vec::with_capacity(universe.len());
    let (mut g, mut y) = (Vec::new(), Vec::new());
    let mut ns = vec![0usize; nb_subgroups];
    let mut triples = vec![StdSstats::zero(); nb_subgroups];

    for ftr in features.iter_mut() {
        progress.inc(1);
        if ftr.cis_snps.is_empty() || ftr.max_l10_true_abf.is_nan() {
            continue
        }

        perm.clear();
        perm.extend(0..universe.len());
        let mut hits: u64 = 1;
        let mut done: u64 = 0;
        let mut shuffle_only = false;

        for _ in 0..opts.nperm {
            rng_perm.shuffle(&mut perm);
            if shuffle_only {
                continue
            }
            done += 1;

            let mut max_perm_abf = f64::NAN;
            for &snp_idx in &ftr.cis_snps {
                let snp = &snps[snp_idx.0];
                for s in 0..nb_subgroups {
                    ns[s] = 0;
                    triples[s] = StdSstats::zero();
                    if !scan::subgroup_in_play(ftr, s, snp, opts.maf_min) {
                        continue
                    }
                    scan::collect_aligned(ftr, s, snp, sample_map, &universe, &perm, &mut g, &mut y);
                    ns[s] = g.len();
                    if g.len() >= 2 {
                        triples[s] = ols::standardize(&ols::regress(&g, &y));
                    }
                }
                let weighted = scan::weighted_pbf_max(&triples, &ns, pbf, grid, &weights);
                if !weighted.is_nan() && (max_perm_abf.is_nan() || weighted > max_perm_abf) {
                    max_perm_abf = weighted;
                }
            }

            if !max_perm_abf.is_nan() && max_perm_abf >= ftr.max_l10_true_abf {
                hits += 1;
            }
            if !opts.trick.is_off() && hits == TRICK_HITS {
                match opts.trick {
                    TrickMode::Stop        => break,
                    TrickMode::ShuffleOnly => shuffle_only = true,
                    TrickMode::Off         => unreachable!("trick is not off"),
                }
            }
        }

        ftr.joint_perm_pval = calibrate(hits, done, opts.nperm, &mut rng_trick);
        ftr.nb_perms_joint = done;
    }
    progress.finish_and_clear();
}
