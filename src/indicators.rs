//! Indicator and statistics kernels
//!
//! Shared numeric building blocks for strategies and risk analysis.
//! All computation is in f64; prices are converted at the call site.

/// Simple moving average over the trailing `window` elements of `values`
///
/// Returns None when fewer than `window` elements are available.
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Period-over-period percentage changes
///
/// Output has one fewer element than the input. Zero previous values are
/// skipped rather than producing infinities.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    let mut changes = Vec::with_capacity(values.len().saturating_sub(1));
    for i in 1..values.len() {
        let prev = values[i - 1];
        if prev != 0.0 {
            changes.push((values[i] - prev) / prev);
        }
    }
    changes
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n-1 denominator)
///
/// Requires at least two observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Percentile with linear interpolation between order statistics
///
/// `pct` is in [0, 100]. Returns None on an empty slice.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Relative Strength Index series
///
/// RSI = 100 - 100 / (1 + RS) where RS is the ratio of exponentially
/// smoothed average gains to average losses of period-over-period changes.
/// Smoothing is span-based: alpha = 2 / (period + 1), recursing from zero
/// averages. Output is aligned with `closes` (element 0 is neutral 50.0) and
/// every element is a finite value in [0, 100]:
/// - no losses over the span -> 100
/// - no gains over the span -> 0
/// - flat series -> 50
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    const EPS: f64 = 1e-12;

    let mut out = vec![50.0; closes.len()];
    if closes.len() < 2 || period == 0 {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;

        out[i] = if avg_loss < EPS {
            if avg_gain < EPS {
                50.0
            } else {
                100.0
            }
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }

    out
}

/// Latest RSI value for a close series
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < 2 {
        return None;
    }
    rsi_series(closes, period).last().copied()
}
