//! Approximate Bayes Factors (log10 scale) from standardized summary
//! statistics, under a Gaussian prior on the effect decomposed into a shared
//! component (ω²) and a subgroup-heterogeneity component (φ²).

use crate::{Grid, StdSstats, NEAR_ZERO};

const LN_10: f64 = std::f64::consts::LN_10;

/// log10 ABF for one (φ², ω²) pair over S subgroups.
///
/// Subgroups with |t| below tolerance carry no information: they contribute
/// a zero term and are excluded from the meta accumulation. With every
/// subgroup masked out the ABF is exactly 0 (no data, no evidence).
pub fn l10_abf(triples: &[StdSstats], phi2: f64, omega2: f64) -> f64 {
    let mut l10_singles = 0.0;
    let (mut num, mut den) = (0.0, 0.0);

    for tri in triples {
        if tri.t.abs() < NEAR_ZERO {
            continue
        }
        let v = tri.sebhat * tri.sebhat;
        l10_singles += 0.5 * v.log10() - 0.5 * (v + phi2).log10()
            + (0.5 * tri.t * tri.t * phi2 / (v + phi2)) / LN_10;
        num += tri.bhat / (v + phi2);
        den += 1.0 / (v + phi2);
    }

    let l10_bar = if den > 0.0 {
        let b_bar = num / den;
        let v_bar = 1.0 / den;
        let t2 = b_bar * b_bar / v_bar;
        if t2 != 0.0 {
            0.5 * v_bar.log10() - 0.5 * (v_bar + omega2).log10()
                + (0.5 * t2 * omega2 / (v_bar + omega2)) / LN_10
        } else {
            0.0
        }
    } else {
        0.0
    };

    l10_bar + l10_singles
}

/// The `const` model: ABF at (φ²ₖ, ω²ₖ) for every grid row.
pub fn grid_consistent(triples: &[StdSstats], grid: &Grid) -> Vec<f64> {
    grid.iter().map(|p| l10_abf(triples, p.phi2, p.omega2)).collect()
}

/// The fixed-effect model: all prior mass on the shared component,
/// (0, φ²ₖ + ω²ₖ).
pub fn grid_fixed(triples: &[StdSstats], grid: &Grid) -> Vec<f64> {
    grid.iter().map(|p| l10_abf(triples, 0.0, p.phi2 + p.omega2)).collect()
}

/// The maximum-heterogeneity model: all prior mass on the subgroup
/// component, (φ²ₖ + ω²ₖ, 0).
pub fn grid_max_het(triples: &[StdSstats], grid: &Grid) -> Vec<f64> {
    grid.iter().map(|p| l10_abf(triples, p.phi2 + p.omega2, 0.0)).collect()
}

/// Restrict `triples` to `members`: every other subgroup is replaced by the
/// zero triple, which the kernel skips.
pub fn mask(triples: &[StdSstats], members: &[usize]) -> Vec<StdSstats> {
    triples.iter().enumerate()
        .map(|(s, tri)| if members.contains(&s) { *tri } else { StdSstats::zero() })
        .collect()
}

/// A subset carries data when at least one of its members has ≥ 2 samples.
/// Configurations without data yield all-NaN grid vectors downstream.
pub fn subset_has_data(ns: &[usize], members: &[usize]) -> bool {
    members.iter().any(|&s| ns[s] > 1)
}

/// All-NaN vector, for configurations with no data.
pub fn nan_grid(grid: &Grid) -> Vec<f64> {
    vec![f64::NAN; grid.len()]
}
