/// Human-readable frequency with two decimals and an SI prefix.
pub fn format_frequency(freq: Option<f64>) -> String {
    let Some(f) = freq else { return "N/A".into() };
    let mag = f.abs();
    if mag >= 1_000_000.0 {
        format!("{:.2} MHz", f / 1_000_000.0)
    } else if mag >= 1_000.0 {
        format!("{:.2} kHz", f / 1_000.0)
    } else {
        format!("{:.2} Hz", f)
    }
}

pub fn format_seconds(t: Option<f64>) -> String {
    match t {
        Some(t) => format!("{t:.2}"),
        None => "N/A".into(),
    }
}

/// `1234567.0` -> `"1,234,567"`; fractional part is rounded away.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_prefixes() {
        assert_eq!(format_frequency(None), "N/A");
        assert_eq!(format_frequency(Some(230.9)), "230.90 Hz");
        assert_eq!(format_frequency(Some(12_500.0)), "12.50 kHz");
        assert_eq!(format_frequency(Some(2_412_000_000.0)), "2412.00 MHz");
        assert_eq!(format_frequency(Some(-2_000.0)), "-2.00 kHz");
    }

    #[test]
    fn test_seconds() {
        assert_eq!(format_seconds(Some(2.0)), "2.00");
        assert_eq!(format_seconds(None), "N/A");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(8_000_000.0), "8,000,000");
        assert_eq!(group_thousands(-12_345.4), "-12,345");
    }
}
