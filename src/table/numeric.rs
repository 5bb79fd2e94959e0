/// Coerce a raw cell to a finite number, tolerating a decimal comma.
///
/// Returns `None` for anything that does not parse, including NaN and infinities.
pub fn to_number(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
