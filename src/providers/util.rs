/// Rounds a value to 2 decimal places (display money precision).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds a value to 4 decimal places (exchange rate precision).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
