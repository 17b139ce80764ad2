//! Numeric text parsing.

/// Parses trimmed text to a finite number.
///
/// Blank, non-numeric, infinite and NaN input all give `None`, never zero.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number(" 3.25 "), Some(3.25));
        assert_eq!(parse_number("-4"), Some(-4.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("3,5"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
