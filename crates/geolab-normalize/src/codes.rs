//! Sample-code and work-order normalizers.

use std::sync::LazyLock;

use regex::Regex;

use crate::year::YearContext;

/// Digits, optional `-SU`, optional two-digit year.
static SAMPLE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)(?:-SU)?(?:-([0-9]{2}))?$").expect("Invalid sample code regex")
});

/// Work order patterns, tried in order. The first accepts an `OT-`/`NOT-`
/// prefix, the second an `-OT`/`-NOT` suffix.
static WORK_ORDER: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^(?:N?OT-)?([0-9]+)(?:-([0-9]{2}))?$").expect("Invalid work order regex"),
        Regex::new(r"^([0-9]+)(?:-(?:N?OT))?(?:-([0-9]{2}))?$").expect("Invalid work order regex"),
    ]
});

/// Trims and uppercases; `None` for blank input.
fn prepare(raw: &str) -> Option<String> {
    let value = raw.trim().to_uppercase();
    (!value.is_empty()).then_some(value)
}

fn compact(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Rewrites a sample code to `<digits>-SU-<yy>`.
///
/// ```
/// use geolab_normalize::{normalize_sample_code, YearContext};
///
/// let year = YearContext::from_year(2026);
/// assert_eq!(normalize_sample_code(" 1234 ", year), "1234-SU-26");
/// assert_eq!(normalize_sample_code("1234-su-25", year), "1234-SU-25");
/// ```
pub fn normalize_sample_code(raw: &str, year: YearContext) -> String {
    let Some(value) = prepare(raw) else {
        return String::new();
    };
    match SAMPLE_CODE.captures(&compact(&value)) {
        Some(caps) => {
            let yy = caps.get(2).map_or_else(|| year.short(), |m| m.as_str().to_string());
            format!("{}-SU-{yy}", &caps[1])
        }
        None => {
            tracing::trace!(value = %value, "sample code not recognized");
            value
        }
    }
}

/// Rewrites a work order code to `<digits>-<yy>`.
pub fn normalize_work_order(raw: &str, year: YearContext) -> String {
    let Some(value) = prepare(raw) else {
        return String::new();
    };
    let compact = compact(&value);
    for pattern in WORK_ORDER.iter() {
        if let Some(caps) = pattern.captures(&compact) {
            let yy = caps.get(2).map_or_else(|| year.short(), |m| m.as_str().to_string());
            return format!("{}-{yy}", &caps[1]);
        }
    }
    tracing::trace!(value = %value, "work order not recognized");
    value
}
