//! Form kinds and their external names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two laboratory test forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    /// Sand equivalent test.
    #[serde(rename = "equi_arena")]
    SandEquivalent,
    /// Aggregate gradation (sieve analysis).
    #[serde(rename = "gran_agregado")]
    Gradation,
}

impl FormKind {
    /// All form kinds, in display order.
    pub const ALL: [FormKind; 2] = [FormKind::SandEquivalent, FormKind::Gradation];

    /// Name used in draft keys and on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FormKind::SandEquivalent => "equi_arena",
            FormKind::Gradation => "gran_agregado",
        }
    }

    /// Path segment of the remote API (`/api/<slug>/...`).
    pub const fn api_slug(&self) -> &'static str {
        match self {
            FormKind::SandEquivalent => "equi-arena",
            FormKind::Gradation => "gran-agregado",
        }
    }

    /// Prefix of exported spreadsheet file names.
    pub const fn export_prefix(&self) -> &'static str {
        match self {
            FormKind::SandEquivalent => "EQUI_ARENA",
            FormKind::Gradation => "GRAN_AGREGADO",
        }
    }

    /// Human-readable form title.
    pub const fn label(&self) -> &'static str {
        match self {
            FormKind::SandEquivalent => "Sand Equivalent",
            FormKind::Gradation => "Aggregate Gradation",
        }
    }

    /// Versioned draft namespace, `<form>_form_draft_v1`.
    pub fn draft_namespace(&self) -> String {
        format!("{}_form_draft_v1", self.as_str())
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    /// Accepts the wire name, the API slug, or a short English alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "equi_arena" | "sand_equivalent" | "se" => Ok(FormKind::SandEquivalent),
            "gran_agregado" | "gradation" | "gr" => Ok(FormKind::Gradation),
            _ => Err(format!("Unknown form kind: {s}")),
        }
    }
}
