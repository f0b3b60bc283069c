//! Separate permutations: per subgroup, per feature, the minimum cis
//! p-value of the shuffled phenotypes against the true minimum.

use cohort::Catalogues;
use log::info;
use parser::TrickMode;
use stats::ols;

use crate::{scan, AnalysisOptions, Logger};
use super::{calibrate, TRICK_HITS};

/// Run the separate permutation loop for every subgroup.
///
/// The phenotype index vector of the subgroup is shuffled once per
/// permutation id; under `trick = 2` the shuffle still runs for skipped
/// permutations so that the RNG trajectory matches a full run.
pub fn run(cat: &mut Catalogues, opts: &AnalysisOptions) {
    let Catalogues { subgroups, sample_map, snps, features, .. } = cat;

    for s in 0..subgroups.len() {
        info!("Permuting phenotypes of subgroup '{}' ({} permutation(s) per feature)...",
              subgroups[s], opts.nperm);
        let mut rng_perm = fastrand::Rng::with_seed(opts.seed);
        let mut rng_trick = fastrand::Rng::with_seed(opts.seed);
        let positions = sample_map.subgroup_positions(s);

        let progress = Logger::progress(features.len(), format!("permuting {}", subgroups[s]));

        let mut perm: Vec<usize> = Vec::with_capacity(positions.len());
        let mut pheno_positions: Vec<usize> = vec![0; positions.len()];
        let (mut g, mut y) = (Vec::new(), Vec::new());

        for ftr in features.iter_mut() {
            progress.inc(1);
            if ftr.cis_snps.is_empty() || !ftr.has_pheno(s) {
                continue
            }
            let min_true_pval = ftr.min_true_pval(s);
            if min_true_pval.is_nan() {
                continue
            }

            perm.clear();
            perm.extend(0..positions.len());
            let mut hits: u64 = 1;
            let mut done: u64 = 0;
            let mut shuffle_only = false;

            for _ in 0..opts.nperm {
                rng_perm.shuffle(&mut perm);
                if shuffle_only {
                    continue
                }
                done += 1;
                for (j, &p) in perm.iter().enumerate() {
                    pheno_positions[j] = positions[p];
                }

                let mut min_perm_pval = f64::INFINITY;
                for &snp_idx in &ftr.cis_snps {
                    let snp = &snps[snp_idx.0];
                    if !scan::subgroup_in_play(ftr, s, snp, opts.maf_min) {
                        continue
                    }
                    scan::collect_aligned(ftr, s, snp, sample_map, &positions, &pheno_positions, &mut g, &mut y);
                    if g.len() >= 2 {
                        let pval = ols::regress(&g, &y).pval;
                        if pval < min_perm_pval {
                            min_perm_pval = pval;
                        }
                    }
                }

                if min_perm_pval <= min_true_pval {
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

            ftr.perm_pval_sep[s] = calibrate(hits, done, opts.nperm, &mut rng_trick);
            ftr.nb_perms_sep[s] = done;
        }
        progress.finish_and_clear();
    }
}
