use peakgroup::errors::{
    DataProcessingError,
    Result,
};

/// Assigns each element its 0-based ascending dense rank among the
/// distinct values and returns `(ranks, max_rank)`.
///
/// Dense ranking means tied values share one rank and no ranks are
/// skipped: `[10.0, 30.0, 10.0, 20.0]` ranks as `[0, 2, 0, 1]` with a max
/// rank of 2. This differs from the fractional ("average") ranking many
/// statistics libraries default to; the mutual-information estimator
/// below depends on the dense convention.
///
/// Panics on NaN input; intensity traces are expected to be finite.
pub fn compute_ranks(data: &[f64]) -> (Vec<usize>, usize) {
    if data.is_empty() {
        return (Vec::new(), 0);
    }
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| {
        data[a]
            .partial_cmp(&data[b])
            .expect("trace intensities must not be NaN")
    });

    let mut ranks = vec![0usize; data.len()];
    let mut rank = 0usize;
    for (k, &idx) in order.iter().enumerate() {
        if k > 0 && data[idx] != data[order[k - 1]] {
            rank += 1;
        }
        ranks[idx] = rank;
    }
    (ranks, rank)
}

fn entropy(counts: &[usize], n: f64) -> f64 {
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Discrete mutual information (in bits) between two equal-length rank
/// arrays, from the empirical joint and marginal distributions.
///
/// A constant input (max rank 0, e.g. a flat or empty trace) carries no
/// information and scores exactly 0 rather than NaN.
pub fn ranked_mutual_information(
    ranks1: &[usize],
    ranks2: &[usize],
    max_rank1: usize,
    max_rank2: usize,
) -> Result<f64> {
    if ranks1.len() != ranks2.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: ranks1.len(),
            other: ranks2.len(),
            context: "ranked_mutual_information".to_string(),
        });
    }
    if ranks1.is_empty() || max_rank1 == 0 || max_rank2 == 0 {
        return Ok(0.0);
    }

    let bins1 = max_rank1 + 1;
    let bins2 = max_rank2 + 1;
    let mut joint = vec![0usize; bins1 * bins2];
    let mut marginal1 = vec![0usize; bins1];
    let mut marginal2 = vec![0usize; bins2];
    for (&a, &b) in ranks1.iter().zip(ranks2.iter()) {
        debug_assert!(a <= max_rank1 && b <= max_rank2);
        joint[a * bins2 + b] += 1;
        marginal1[a] += 1;
        marginal2[b] += 1;
    }

    let n = ranks1.len() as f64;
    Ok(entropy(&marginal1, n) + entropy(&marginal2, n) - entropy(&joint, n))
}
