//! Form completion summaries.

use serde::Serialize;

/// Readiness of one section of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub label: &'static str,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SectionStatus {
    pub fn new(label: &'static str, ready: bool, detail: Option<String>) -> Self {
        Self {
            label,
            ready,
            detail,
        }
    }
}

/// Ordered section statuses plus an overall completion percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// `round(100 * ready / total)`.
    pub completion: u8,
    pub sections: Vec<SectionStatus>,
}

impl ProgressSummary {
    pub fn from_sections(sections: Vec<SectionStatus>) -> Self {
        let completion = if sections.is_empty() {
            0
        } else {
            let ready = sections.iter().filter(|s| s.ready).count();
            ((ready as f64 / sections.len() as f64) * 100.0).round() as u8
        };
        Self {
            completion,
            sections,
        }
    }

    pub fn ready_count(&self) -> usize {
        self.sections.iter().filter(|s| s.ready).count()
    }
}

/// True for text that is neither blank nor the unset sentinel.
pub fn has_text(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != crate::UNSET
}

/// Formats a number the way the forms display it (no trailing `.0`).
pub(crate) fn display_number(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rounds_to_nearest() {
        let summary = ProgressSummary::from_sections(vec![
            SectionStatus::new("a", true, None),
            SectionStatus::new("b", false, None),
            SectionStatus::new("c", false, None),
        ]);
        assert_eq!(summary.completion, 33);
        assert_eq!(summary.ready_count(), 1);
    }

    #[test]
    fn unset_sentinel_is_not_text() {
        assert!(!has_text(" - "));
        assert!(!has_text("   "));
        assert!(has_text("EQP-0046"));
    }

    #[test]
    fn display_number_drops_trailing_zeros() {
        assert_eq!(display_number(23.0), "23");
        assert_eq!(display_number(0.95), "0.95");
    }
}
