//! Quantity formatting
//!
//! Locale-independent rendering of quantities for ingredient lines.

/// Render a quantity for display
///
/// Whole numbers have no decimal places; anything else is rounded to two
/// places with trailing zeros trimmed. Always uses `.` as the separator.
///
/// - 2.0 -> "2"
/// - 1.5 -> "1.5"
/// - 1.333 -> "1.33"
pub fn format_quantity(quantity: f64) -> String {
    if !quantity.is_finite() {
        return quantity.to_string();
    }

    let rendered = if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        let fixed = format!("{:.2}", quantity);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };

    // Tiny negatives round to "-0"
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

/// Render a quantity with its unit ("1.5 cup"); count units render bare
pub fn format_amount(quantity: f64, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{} {}", format_quantity(quantity), unit),
        None => format_quantity(quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(1_000_000.0), "1000000");
    }

    #[test]
    fn test_fractional_numbers() {
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(1.333), "1.33");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(2.10), "2.1");
    }

    #[test]
    fn test_rounding_to_whole() {
        assert_eq!(format_quantity(1.999), "2");
        assert_eq!(format_quantity(3.001), "3");
    }

    #[test]
    fn test_idempotent() {
        for value in [2.0, 1.5, 1.333, 0.125, 473.176, 12.0] {
            let once = format_quantity(value);
            let reparsed: f64 = once.parse().unwrap();
            assert_eq!(format_quantity(reparsed), once);
        }
    }

    #[test]
    fn test_negative_and_nan_do_not_panic() {
        assert_eq!(format_quantity(-1.5), "-1.5");
        assert_eq!(format_quantity(-0.001), "0");
        assert_eq!(format_quantity(f64::NAN), "NaN");
        assert_eq!(format_quantity(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.0, Some("cup")), "2 cup");
        assert_eq!(format_amount(0.5, Some("  ")), "0.5");
        assert_eq!(format_amount(3.0, None), "3");
    }
}
