//! Flexible date entry, normalized to `DD/MM/YY`.

use crate::year::YearContext;

/// Left-pads with zeros to two characters, then keeps the last two.
fn pad2(part: &str) -> String {
    let padded = format!("{part:0>2}");
    let skip = padded.chars().count().saturating_sub(2);
    padded.chars().skip(skip).collect()
}

fn build(day: &str, month: &str, year: &str) -> String {
    format!("{}/{}/{}", pad2(day), pad2(month), pad2(year))
}

/// Normalizes a loosely typed date to `DD/MM/YY`.
///
/// Slash-delimited input is read as `D/M[/Y]`; the year may be given with 1,
/// 2 or 4 digits and defaults to the context year. Otherwise the digits of
/// the input are read positionally:
///
/// | digits | reading              |
/// |--------|----------------------|
/// | 2      | `D` `M`              |
/// | 3      | `D` `MM`             |
/// | 4      | `DD` `MM`            |
/// | 5      | `D` `MM` `YY`        |
/// | 6      | `DD` `MM` `YY`       |
/// | 8+     | `DD` `MM` `..YY`     |
///
/// Anything else, including a slash form missing its day or month, is
/// returned trimmed but otherwise unchanged.
///
/// ```
/// use geolab_normalize::{normalize_flexible_date, YearContext};
///
/// let year = YearContext::from_year(2026);
/// assert_eq!(normalize_flexible_date("150326", year), "15/03/26");
/// assert_eq!(normalize_flexible_date("5/3", year), "05/03/26");
/// assert_eq!(normalize_flexible_date("abc", year), "abc");
/// ```
pub fn normalize_flexible_date(raw: &str, year: YearContext) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    let current = year.short();

    if value.contains('/') {
        let mut parts = value.split('/').map(str::trim);
        let day = parts.next().unwrap_or_default();
        let month = parts.next().unwrap_or_default();
        let year_raw = parts.next().unwrap_or_default();
        if day.is_empty() || month.is_empty() {
            return value.to_string();
        }
        let mut yy: String = year_raw.chars().filter(char::is_ascii_digit).collect();
        match yy.len() {
            0 => yy = current,
            1 => yy.insert(0, '0'),
            4 => yy = yy.split_off(2),
            _ => {}
        }
        return build(day, month, &yy);
    }

    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let d = digits.as_str();
    match d.len() {
        2 => build(&d[..1], &d[1..], &current),
        3 => build(&d[..1], &d[1..3], &current),
        4 => build(&d[..2], &d[2..4], &current),
        5 => build(&d[..1], &d[1..3], &d[3..5]),
        6 => build(&d[..2], &d[2..4], &d[4..6]),
        n if n >= 8 => build(&d[..2], &d[2..4], &d[6..8]),
        _ => {
            tracing::trace!(value, "date not recognized");
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: YearContext = YearContext::from_year(2026);

    #[test]
    fn pad2_keeps_last_two() {
        assert_eq!(pad2("5"), "05");
        assert_eq!(pad2("15"), "15");
        assert_eq!(pad2("2026"), "26");
    }

    #[test]
    fn slash_year_widths() {
        assert_eq!(normalize_flexible_date("1/2/2025", YEAR), "01/02/25");
        assert_eq!(normalize_flexible_date("1/2/5", YEAR), "01/02/05");
        assert_eq!(normalize_flexible_date("01/02/", YEAR), "01/02/26");
    }

    #[test]
    fn slash_missing_month_passes_through() {
        assert_eq!(normalize_flexible_date("12/", YEAR), "12/");
        assert_eq!(normalize_flexible_date(" /3 ", YEAR), "/3");
    }

    #[test]
    fn seven_digits_pass_through() {
        assert_eq!(normalize_flexible_date("1503202", YEAR), "1503202");
        assert_eq!(normalize_flexible_date("7", YEAR), "7");
    }
}
