//! Draft keys.

use std::fmt;

use geolab_model::FormKind;

/// Identifies one draft: form type plus report id, or "new".
///
/// Formats as `<form>_form_draft_v1:<id|new>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub kind: FormKind,
    pub report_id: Option<u64>,
}

impl DraftKey {
    pub const fn new(kind: FormKind, report_id: Option<u64>) -> Self {
        Self { kind, report_id }
    }

    /// Key of the draft for a report that has not been saved yet.
    pub const fn unsaved(kind: FormKind) -> Self {
        Self::new(kind, None)
    }

    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.report_id {
            Some(id) => write!(f, "{}:{id}", self.kind.draft_namespace()),
            None => write!(f, "{}:new", self.kind.draft_namespace()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        assert_eq!(
            DraftKey::unsaved(FormKind::SandEquivalent).storage_key(),
            "equi_arena_form_draft_v1:new"
        );
        assert_eq!(
            DraftKey::new(FormKind::Gradation, Some(42)).storage_key(),
            "gran_agregado_form_draft_v1:42"
        );
    }
}
