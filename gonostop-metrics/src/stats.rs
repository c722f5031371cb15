//! Descriptive statistics over latency samples. Undefined quantities
//! return the -1 sentinel instead of faulting, matching the summary
//! schema.

/// Median of an unsorted sample; -1 on empty input. Even-length samples
/// average the two central values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return -1.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return -1.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); -1 below two samples.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return -1.0;
    }
    let m = mean(values);
    let var = values.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Coefficient of variation (stdev / mean); -1 below two samples or on a
/// non-positive mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return -1.0;
    }
    let m = mean(values);
    if m <= 0.0 {
        return -1.0;
    }
    std_dev(values) / m
}
