// num / den, or 0.0 when there is nothing to divide by
pub fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 { return 0.0; }
    num as f64 / den as f64
}

// Running totals, same length as the input
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values.iter().map(|v| { total += v; total }).collect()
}
