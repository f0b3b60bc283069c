//! Permutation engines.
//!
//! Both modes draw from two independent streams seeded from the same user
//! seed: `rng_perm` drives the shuffles, `rng_trick` the bounded-uniform
//! draw of the early-stopping trick. The separate engine re-seeds once per
//! subgroup, the joint engine once overall, so a fixed seed reproduces every
//! result bit for bit.

pub mod separate;
pub mod joint;

/// Number of exceedances at which the trick fires.
pub(crate) const TRICK_HITS: u64 = 11;

/// Turn the exceedance counter into the reported permutation p-value.
///
/// When every requested permutation ran, p = hits/(N+1) (the counter starts
/// at 1, so this is the usual (1 + #exceedances)/(N+1)). After an early stop
/// at m < N permutations with 11 exceedances, the empirical tail estimate is
/// replaced by a draw from Uniform(11/(m+2), 11/(m+1)).
pub(crate) fn calibrate(hits: u64, done: u64, requested: u64, rng_trick: &mut fastrand::Rng) -> f64 {
    if done == requested {
        hits as f64 / (requested as f64 + 1.0)
    } else {
        let m = done as f64;
        let lo = TRICK_HITS as f64 / (m + 2.0);
        let hi = TRICK_HITS as f64 / (m + 1.0);
        lo + (hi - lo) * rng_trick.f64()
    }
}
