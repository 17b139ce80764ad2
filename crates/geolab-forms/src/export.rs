//! Export artifact naming.

use chrono::NaiveDate;
use geolab_model::FormKind;

/// File name for a downloaded spreadsheet,
/// `<FORM_TYPE>_<workOrderCode>_<YYYY-MM-DD>.xlsx`.
pub fn export_file_name(kind: FormKind, work_order_code: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.xlsx",
        kind.export_prefix(),
        work_order_code.trim(),
        date.format("%Y-%m-%d")
    )
}
