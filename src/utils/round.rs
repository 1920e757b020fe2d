/// Round to two decimal places, half away from zero.
///
/// Rounding works on the shortest decimal representation of `value` rather
/// than on `value * 100.0`, so inputs written as `0.005` or `40.005` round up
/// even though their binary value sits just below the midpoint. This matches
/// the fixed-point formatting the metrics agents' consumers expect.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // Display for f64 never uses exponent notation.
    let repr = value.abs().to_string();
    let (int_part, frac_part) = match repr.split_once('.') {
        Some(parts) => parts,
        None => return value,
    };
    if frac_part.len() <= 2 {
        return value;
    }

    // Any value with fractional digits is below 2^53, so this fits in u64.
    let Ok(whole) = int_part.parse::<u64>() else {
        return value;
    };
    let hundredths = frac_part[..2].parse::<u64>().unwrap_or(0);
    let round_up = frac_part.as_bytes()[2] >= b'5';

    let scaled = whole * 100 + hundredths + u64::from(round_up);
    let rounded = scaled as f64 / 100.0;
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

pub fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}
