//! Small numeric helpers shared by the example pages.
//!
//! Distributions are evaluated exactly (pmf/pdf) rather than sampled, so a
//! page shows the same figure for the same inputs.

use serde_json::Value;

/// Reads a number from an input value. Text fields hold strings, layout
/// defaults hold numbers; both are accepted.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Comma or whitespace separated numbers. Unparseable tokens are returned as `Err`.
pub fn parse_list(text: &str) -> Result<Vec<f64>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| token.to_string())
        })
        .collect()
}

/// Most bars a figure is drawn with; wider ranges are bucketed.
pub const MAX_BARS: usize = 40;

/// ln(n!). Summed directly for small `n`, Stirling's series above that.
pub fn ln_factorial(n: u64) -> f64 {
    if n <= 20 {
        return (2..=n).map(|k| (k as f64).ln()).sum();
    }
    let n = n as f64;
    n * n.ln() - n + 0.5 * (2.0 * std::f64::consts::PI * n).ln() + 1.0 / (12.0 * n)
        - 1.0 / (360.0 * n.powi(3))
}

pub fn ln_choose(n: u64, k: u64) -> f64 {
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

/// P(X = k) for X ~ Poisson(lambda).
pub fn poisson_pmf(lambda: f64, k: u64) -> f64 {
    if lambda == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    (k as f64 * lambda.ln() - lambda - ln_factorial(k)).exp()
}

/// P(X = k) for X ~ Binomial(n, p).
pub fn binomial_pmf(n: u64, p: f64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    if p == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    (ln_choose(n, k) + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln()).exp()
}

pub fn normal_pdf(mean: f64, std: f64, x: f64) -> f64 {
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * std::f64::consts::PI).sqrt())
}

pub fn exponential_pdf(rate: f64, x: f64) -> f64 {
    if x < 0.0 { 0.0 } else { rate * (-rate * x).exp() }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Splits `[min, max]` into `count` equal bins and counts the values in each.
/// The last bin is closed on the right.
pub fn histogram(values: &[f64], count: usize) -> Vec<(f64, usize)> {
    if values.is_empty() || count == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / count as f64 } else { 1.0 };

    let mut bins = vec![0usize; count];
    for v in values {
        let index = (((v - min) / width) as usize).min(count - 1);
        bins[index] += 1;
    }
    bins.into_iter()
        .enumerate()
        .map(|(i, n)| (min + i as f64 * width, n))
        .collect()
}

/// Bars for a discrete distribution over `lo..=hi`. Consecutive values are
/// merged so that at most `MAX_BARS` bars remain.
pub fn discrete_bars(lo: u64, hi: u64, pmf: impl Fn(u64) -> f64) -> Vec<(String, f64)> {
    if hi < lo {
        return Vec::new();
    }
    let step = (hi - lo + 1).div_ceil(MAX_BARS as u64);
    (lo..=hi)
        .step_by(step as usize)
        .map(|start| {
            let end = (start + step - 1).min(hi);
            let p = (start..=end).map(&pmf).sum::<f64>();
            let label = if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            };
            (label, p)
        })
        .collect()
}

/// Bars for a continuous distribution: `bins` equal slices of `[lo, hi)`, each
/// holding the approximate probability mass of its slice.
pub fn continuous_bars(lo: f64, hi: f64, bins: usize, pdf: impl Fn(f64) -> f64) -> Vec<(String, f64)> {
    let width = (hi - lo) / bins as f64;
    (0..bins)
        .map(|i| {
            let start = lo + i as f64 * width;
            (label(start), pdf(start + width / 2.0) * width)
        })
        .collect()
}

/// Short label for a bin edge or axis tick.
pub fn label(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e6 {
        format!("{}", x as i64)
    } else {
        format!("{:.1}", x)
    }
}
