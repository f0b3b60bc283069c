//! Simple linear regression summary statistics for one (genotype, phenotype)
//! pair, plus the small-sample standardization feeding the ABF kernel.
//!
//! The accumulation works from raw sums (Σg, Σy, Σg², Σy², Σgy) rather than
//! centered vectors, and var(g) is the *uncentered* Σg² − n·ḡ² quantity.

use crate::dist;
use crate::NEAR_ZERO;

/// Per-subgroup OLS summary statistics for a single feature-SNP pair.
#[derive(Debug, Clone, Copy)]
pub struct OlsStats {
    pub n: usize,
    pub betahat: f64,
    pub sebetahat: f64,
    pub sigmahat: f64,
    pub pval: f64,
    pub pve: f64,
}

impl OlsStats {
    /// Sentinel statistics for a subgroup with fewer than two paired samples.
    pub fn degenerate(n: usize) -> Self {
        Self { n, betahat: f64::NAN, sebetahat: f64::NAN, sigmahat: f64::NAN, pval: f64::NAN, pve: f64::NAN }
    }
}

/// Standardized summary statistics (bhat, sebhat, t), small-sample corrected.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSstats {
    pub bhat: f64,
    pub sebhat: f64,
    pub t: f64,
}

impl StdSstats {
    /// The zero triple: contributes nothing to any ABF.
    pub fn zero() -> Self {
        Self { bhat: 0.0, sebhat: 0.0, t: 0.0 }
    }
}

/// Regress `y` on `g` (paired, non-missing, length ≥ 2).
///
/// A genotype with (near-)zero variance yields the degenerate branch:
/// β̂ = 0, se = +∞, p = 1, pve = 0, with σ̂ still estimated from y alone.
pub fn regress(g: &[f64], y: &[f64]) -> OlsStats {
    assert_eq!(g.len(), y.len(), "unpaired genotype/phenotype vectors");
    let n = g.len();
    if n < 2 {
        return OlsStats::degenerate(n)
    }
    let nf = n as f64;

    let (mut sum_g, mut sum_y, mut sum_g2, mut sum_y2, mut sum_gy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&gi, &yi) in g.iter().zip(y.iter()) {
        sum_g  += gi;
        sum_y  += yi;
        sum_g2 += gi * gi;
        sum_y2 += yi * yi;
        sum_gy += gi * yi;
    }
    let g_bar = sum_g / nf;
    let y_bar = sum_y / nf;
    let var_g = sum_g2 - nf * g_bar * g_bar;

    if var_g > NEAR_ZERO {
        let betahat = (sum_gy - nf * g_bar * y_bar) / var_g;
        let rss1 = sum_y2
            - (1.0 / var_g)
            * (nf * y_bar * (sum_g2 * y_bar - g_bar * sum_gy) - sum_gy * (nf * g_bar * y_bar - sum_gy));
        let sigmahat = if betahat.abs() > NEAR_ZERO {
            (rss1 / (nf - 2.0)).sqrt()
        } else {
            ((sum_y2 - nf * y_bar * y_bar) / (nf - 2.0)).sqrt()
        };
        let sebetahat = sigmahat / var_g.sqrt();
        let muhat = (y_bar * sum_g2 - g_bar * sum_gy) / var_g;
        let mss: f64 = g.iter().map(|&gi| {
            let fitted = muhat + betahat * gi;
            (fitted - y_bar) * (fitted - y_bar)
        }).sum();
        let pval = if sigmahat * sigmahat > 0.0 {
            dist::fisher_survival(mss / (sigmahat * sigmahat), nf - 2.0)
        } else if mss > 0.0 {
            0.0
        } else {
            1.0
        };
        let pve = mss / (mss + rss1);
        OlsStats { n, betahat, sebetahat, sigmahat, pval, pve }
    } else {
        // Constant genotype: nothing to regress on.
        let sigmahat = ((sum_y2 - nf * y_bar * y_bar) / (nf - 2.0)).sqrt();
        OlsStats { n, betahat: 0.0, sebetahat: f64::INFINITY, sigmahat, pval: 1.0, pve: 0.0 }
    }
}

/// Standardize the OLS summary statistics of one subgroup into the
/// (bhat, sebhat, t) triple consumed by the ABF kernel.
///
/// t = Φ⁻¹(F_t(−|bhat/sebhat|; n−2)) maps the small-sample t statistic onto
/// its Gaussian equivalent; the triple is then rescaled so that bhat/sebhat
/// reproduces t exactly. The mapping leaves t ≤ 0; downstream formulas only
/// consume t² and sebhat², so the sign never matters.
pub fn standardize(stats: &OlsStats) -> StdSstats {
    if stats.n < 2 {
        return StdSstats::zero()
    }
    let bhat = stats.betahat / stats.sigmahat;
    let sebhat = stats.sebetahat / stats.sigmahat;
    let t = dist::normal_quantile(dist::student_cdf(-(bhat / sebhat).abs(), stats.n as f64 - 2.0));
    if t.abs() > NEAR_ZERO {
        let sigmahat_corr = stats.betahat.abs() / (t.abs() * sebhat);
        let bhat = stats.betahat / sigmahat_corr;
        StdSstats { bhat, sebhat: bhat / t, t }
    } else {
        StdSstats { bhat: 0.0, sebhat: f64::INFINITY, t: 0.0 }
    }
}
