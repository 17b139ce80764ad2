//! The trait shared by both report types.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::kind::FormKind;
use crate::progress::ProgressSummary;

/// A field of a report, addressed by its wire name.
pub trait ReportField: Copy + Debug + Eq + Send + Sync + 'static {
    /// Key of the field in the JSON payload.
    fn wire_name(self) -> &'static str;

    /// Short label for messages and tables.
    fn label(self) -> &'static str;
}

/// How a free-text field is tidied when the user leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    SampleCode,
    WorkOrder,
    Date,
}

/// Identity fields every report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'a> {
    pub sample_code: &'a str,
    pub work_order_code: &'a str,
    pub test_date: &'a str,
    pub performed_by: &'a str,
}

impl Identity<'_> {
    /// Labels of the identity fields that must be filled before saving.
    ///
    /// The test date is not required.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("sample code", self.sample_code),
            ("work order", self.work_order_code),
            ("performed by", self.performed_by),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

/// One laboratory test report.
///
/// `Default` is the empty record the form starts from. Serialization uses the
/// wire names expected by the remote API.
pub trait Report:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Which form this record belongs to.
    const KIND: FormKind;

    /// Any field of the record.
    type Field: ReportField;

    /// The fixed-length repeated-reading fields.
    type TrialField: ReportField + Into<Self::Field>;

    /// Calculator outputs for the current readings.
    type Derived: Debug + Clone + PartialEq + Serialize;

    /// Runs the calculators against the current readings.
    fn derived(&self) -> Self::Derived;

    /// The record to submit: calculator outputs fill overrides the user left
    /// empty. An explicit override always wins, even if stale.
    fn submission(&self) -> Self;

    /// Section-by-section completion of the form.
    fn progress(&self) -> ProgressSummary;

    fn identity(&self) -> Identity<'_>;

    /// Text fields that are normalized on blur, with their format.
    fn formatted_fields() -> &'static [(Self::Field, TextFormat)];
}
