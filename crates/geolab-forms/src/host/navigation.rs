//! Navigation context: what the form was opened with.

use std::borrow::Cow;

use reqwest::Url;

use crate::error::{FormError, Result};

/// Query parameters a form is opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    /// Bearer token handed over by the host (`token`).
    pub token: Option<String>,
    /// Report to edit (`ensayo_id`); `None` creates a new report.
    pub report_id: Option<u64>,
}

impl NavigationContext {
    pub fn new(report_id: Option<u64>) -> Self {
        Self {
            token: None,
            report_id,
        }
    }

    /// Reads the context from a full URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|_| FormError::InvalidUrl(url.to_string()))?;
        Ok(Self::from_pairs(url.query_pairs()))
    }

    /// Reads the context from a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Url::parse(&format!("http://localhost/?{query}"))
            .map(|url| Self::from_pairs(url.query_pairs()))
            .unwrap_or_default()
    }

    /// Only the first occurrence of each parameter counts.
    fn from_pairs<'a>(pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Self {
        let mut token = None;
        let mut report_id = None;
        for (key, value) in pairs {
            match key.as_ref() {
                "token" if token.is_none() => token = Some(value),
                "ensayo_id" if report_id.is_none() => report_id = Some(value),
                _ => {}
            }
        }
        Self {
            token: token
                .filter(|value| !value.is_empty())
                .map(Cow::into_owned),
            report_id: report_id.and_then(|value| parse_report_id(&value)),
        }
    }
}

/// A report id is a positive whole number, in any numeric notation (`12`,
/// `12.0`, `1.2e1`); anything else means "new report".
fn parse_report_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return (id > 0).then_some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    let whole = value.is_finite() && value.fract() == 0.0;
    (whole && value > 0.0 && value < u64::MAX as f64).then(|| value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_token_and_report_id() {
        let context =
            NavigationContext::from_url("https://forms.test/equi-arena?token=abc&ensayo_id=12")
                .unwrap();
        assert_eq!(context.token.as_deref(), Some("abc"));
        assert_eq!(context.report_id, Some(12));
    }

    #[test]
    fn invalid_report_ids_mean_new() {
        for raw in ["0", "-3", "1.5", "abc", "", "inf", "NaN", "1e-2", "-1e2"] {
            let context = NavigationContext::from_query(&format!("ensayo_id={raw}"));
            assert_eq!(context.report_id, None, "{raw}");
        }
    }

    #[test]
    fn exponent_and_decimal_ids_are_whole_numbers() {
        for (raw, id) in [("1e2", 100), ("12.0", 12), ("1.2e1", 12), (" 7 ", 7)] {
            let context = NavigationContext::from_query(&format!("ensayo_id={raw}"));
            assert_eq!(context.report_id, Some(id), "{raw}");
        }
    }

    #[test]
    fn first_occurrence_of_a_parameter_wins() {
        let context = NavigationContext::from_query("ensayo_id=5&token=a&ensayo_id=9&token=b");
        assert_eq!(context.report_id, Some(5));
        assert_eq!(context.token.as_deref(), Some("a"));

        let context = NavigationContext::from_query("ensayo_id=abc&ensayo_id=9");
        assert_eq!(context.report_id, None);
    }

    #[test]
    fn empty_token_is_absent() {
        let context = NavigationContext::from_query("?token=&ensayo_id=4");
        assert_eq!(context.token, None);
        assert_eq!(context.report_id, Some(4));
    }

    #[test]
    fn bad_url_is_an_error() {
        assert!(matches!(
            NavigationContext::from_url("::"),
            Err(FormError::InvalidUrl(_))
        ));
    }
}
