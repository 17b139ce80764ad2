//! The current-year context for normalizers.

use std::fmt;

use chrono::Datelike;

/// The two-digit year a normalizer falls back to when the input has none.
///
/// Passed explicitly so normalizers stay pure; use [`YearContext::current`]
/// at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearContext {
    two_digit: u8,
}

impl YearContext {
    /// Context for the current local year.
    pub fn current() -> Self {
        Self::from_year(chrono::Local::now().year())
    }

    /// Context for a full calendar year, e.g. `2026` gives `26`.
    pub const fn from_year(year: i32) -> Self {
        // Always in 0..100.
        Self {
            two_digit: year.rem_euclid(100) as u8,
        }
    }

    /// The zero-padded two-digit year.
    pub fn short(self) -> String {
        format!("{:02}", self.two_digit)
    }
}

impl Default for YearContext {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for YearContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.two_digit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_year_is_zero_padded() {
        assert_eq!(YearContext::from_year(2026).short(), "26");
        assert_eq!(YearContext::from_year(2005).short(), "05");
        assert_eq!(YearContext::from_year(2100).to_string(), "00");
    }
}
