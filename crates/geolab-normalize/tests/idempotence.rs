//! Property tests: normalizing twice equals normalizing once.

use geolab_normalize::{
    YearContext, normalize_flexible_date, normalize_sample_code, normalize_work_order,
};
use proptest::prelude::*;

fn year() -> impl Strategy<Value = YearContext> {
    (2000i32..2100).prop_map(YearContext::from_year)
}

proptest! {
    #[test]
    fn sample_code_is_idempotent(raw in "[ 0-9a-zA-Z-]{0,16}", year in year()) {
        let once = normalize_sample_code(&raw, year);
        prop_assert_eq!(normalize_sample_code(&once, year), once);
    }

    #[test]
    fn work_order_is_idempotent(raw in "(N?OT-| )?[0-9]{1,6}(-[0-9]{2})?(-N?OT)?", year in year()) {
        let once = normalize_work_order(&raw, year);
        prop_assert_eq!(normalize_work_order(&once, year), once);
    }

    #[test]
    fn digit_dates_are_idempotent(raw in "[0-9]{0,10}", year in year()) {
        let once = normalize_flexible_date(&raw, year);
        prop_assert_eq!(normalize_flexible_date(&once, year), once);
    }

    #[test]
    fn slash_dates_are_idempotent(
        raw in "[0-9]{0,3}/[0-9]{0,3}(/[0-9]{0,5})?",
        year in year(),
    ) {
        let once = normalize_flexible_date(&raw, year);
        prop_assert_eq!(normalize_flexible_date(&once, year), once);
    }
}
