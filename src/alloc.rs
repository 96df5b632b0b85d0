//! Allocation helpers (score → probability, cumulative sampling).
//!
//! All arithmetic is `f32` and order-sensitive: probabilities are summed in action order
//! so the sampled action and its reported probability are reproducible bit-for-bit.

/// Softmax with temperature `lambda` over scores in action order.
///
/// Uses the shift trick: `exp(lambda * (s - anchor))`, normalized, where the anchor is
/// the max score for `lambda >= 0` and the min score for negative `lambda`, so the
/// exponent never exceeds zero. The exponent is evaluated in `f64` and narrowed,
/// matching hosts that call a double-precision `exp`.
pub fn softmax_probabilities(scores: &[f32], lambda: f32) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let anchor = if lambda >= 0.0 {
        scores.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    } else {
        scores.iter().copied().fold(f32::INFINITY, f32::min)
    };
    let mut out: Vec<f32> = Vec::with_capacity(scores.len());
    let mut total = 0.0f32;
    for &s in scores {
        let x = f64::from(lambda * (s - anchor)).exp() as f32;
        total += x;
        out.push(x);
    }
    if total <= 0.0 || !total.is_finite() {
        // Degenerate fallback: uniform.
        let n = scores.len() as f32;
        return vec![1.0 / n; scores.len()];
    }
    for p in &mut out {
        *p /= total;
    }
    out
}

/// Normalize non-negative weights by their (positive) total.
pub fn normalize_weights(weights: &[f32], total: f32) -> Vec<f32> {
    weights.iter().map(|w| w / total).collect()
}

/// Walk the cumulative distribution and return the first index whose running sum
/// exceeds `u`, together with that index's probability.
///
/// If rounding leaves the total at or below `u`, the last index is chosen.
/// Returns `None` only for an empty distribution.
pub fn sample_cumulative(probs: &[f32], u: f32) -> Option<(usize, f32)> {
    let mut cdf = 0.0f32;
    for (i, &p) in probs.iter().enumerate() {
        cdf += p;
        if cdf > u {
            return Some((i, p));
        }
    }
    // Numerical fallback.
    let last = probs.len().checked_sub(1)?;
    Some((last, probs[last]))
}

/// Index of the largest score; ties go to the first occurrence.
pub fn argmax_first(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}
