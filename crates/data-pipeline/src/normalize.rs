/// Resample `values` to `target` evenly spaced points by linear
/// interpolation over the input's index range.
///
/// Used for display alignment only. Empty input or a zero target yields an
/// empty series; a matching length is returned unchanged; a target of one
/// keeps the first point.
pub fn normalize_length(values: &[f64], target: usize) -> Vec<f64> {
    if values.is_empty() || target == 0 {
        return Vec::new();
    }
    if values.len() == target {
        return values.to_vec();
    }
    if target == 1 {
        return vec![values[0]];
    }
    let last = values.len() - 1;
    (0..target)
        .map(|i| {
            let t = (i * last) as f64 / (target - 1) as f64;
            let lo = (t.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let alpha = t - lo as f64;
            values[lo] * (1.0 - alpha) + values[hi] * alpha
        })
        .collect()
}
