//! Tests for the normalizers against typical lab entries.

use geolab_normalize::{
    YearContext, normalize_flexible_date, normalize_sample_code, normalize_work_order,
    parse_number,
};

const Y26: YearContext = YearContext::from_year(2026);

#[test]
fn sample_code_gets_suffix_and_current_year() {
    assert_eq!(normalize_sample_code(" 1234 ", Y26), "1234-SU-26");
    assert_eq!(normalize_sample_code("1234-SU", Y26), "1234-SU-26");
}

#[test]
fn sample_code_keeps_given_year() {
    assert_eq!(normalize_sample_code("1234-su-25", Y26), "1234-SU-25");
    assert_eq!(normalize_sample_code("1234-25", Y26), "1234-SU-25");
}

#[test]
fn sample_code_with_three_digit_year_is_not_rewritten() {
    assert_eq!(normalize_sample_code("1234-su-2025", Y26), "1234-SU-2025");
}

#[test]
fn work_order_variants() {
    assert_eq!(normalize_work_order("4567", Y26), "4567-26");
    assert_eq!(normalize_work_order("OT-4567-25", Y26), "4567-25");
    assert_eq!(normalize_work_order("4567-OT-25", Y26), "4567-25");
    assert_eq!(normalize_work_order("ot 4567", Y26), "OT 4567");
}

#[test]
fn date_digit_runs() {
    assert_eq!(normalize_flexible_date("53", Y26), "05/03/26");
    assert_eq!(normalize_flexible_date("512", Y26), "05/12/26");
    assert_eq!(normalize_flexible_date("1503", Y26), "15/03/26");
    assert_eq!(normalize_flexible_date("50325", Y26), "05/03/25");
    assert_eq!(normalize_flexible_date("150326", Y26), "15/03/26");
    assert_eq!(normalize_flexible_date("15032025", Y26), "15/03/25");
    assert_eq!(normalize_flexible_date("15-03-2025", Y26), "15/03/25");
}

#[test]
fn date_slash_forms() {
    assert_eq!(normalize_flexible_date("5/3", Y26), "05/03/26");
    assert_eq!(normalize_flexible_date(" 15 / 3 / 2024 ", Y26), "15/03/24");
}

#[test]
fn date_unrecognized_passes_through() {
    assert_eq!(normalize_flexible_date("abc", Y26), "abc");
    assert_eq!(normalize_flexible_date("  ", Y26), "");
}

#[test]
fn year_context_changes_default_only() {
    let y30 = YearContext::from_year(2030);
    assert_eq!(normalize_sample_code("9", y30), "9-SU-30");
    assert_eq!(normalize_sample_code("9-SU-26", y30), "9-SU-26");
}

#[test]
fn numbers_never_default_to_zero() {
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("0"), Some(0.0));
}
