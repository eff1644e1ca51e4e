//! Feature-level scores that need no pairwise matrix: retention-time
//! agreement with the library and signal-to-noise.

use peakgroup::{
    PeakGroupLike,
    SignalToNoiseLike,
};

/// Absolute difference between the (normalized) experimental retention
/// time and the library retention time. A compound without a known
/// library RT scores 0, i.e. it is never penalized.
pub fn calc_rt_score(library_rt: Option<f64>, experimental_rt: f64) -> f64 {
    match library_rt {
        Some(expected) => (experimental_rt - expected).abs(),
        None => 0.0,
    }
}

/// Mean signal-to-noise over the per-transition estimators, evaluated at
/// the feature's retention time. No estimators means no evidence either
/// way: 0.
pub fn calc_sn_score<S: SignalToNoiseLike>(feature: &impl PeakGroupLike, estimators: &[S]) -> f64 {
    if estimators.is_empty() {
        return 0.0;
    }
    let rt = feature.retention_time();
    estimators
        .iter()
        .map(|e| e.signal_to_noise_at(rt))
        .sum::<f64>()
        / estimators.len() as f64
}

/// Per-transition `ln(S/N)` at the feature's retention time. Values
/// below S/N 1 clamp to 0 before the log.
pub fn calc_separate_sn_score<S: SignalToNoiseLike>(
    feature: &impl PeakGroupLike,
    estimators: &[S],
) -> Vec<f64> {
    let rt = feature.retention_time();
    estimators
        .iter()
        .map(|e| {
            let sn = e.signal_to_noise_at(rt);
            if sn < 1.0 { 0.0 } else { sn.ln() }
        })
        .collect()
}
