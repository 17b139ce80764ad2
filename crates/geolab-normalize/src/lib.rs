//! Input normalizers for the laboratory report forms.
//!
//! Each normalizer is a pure `&str -> String` transform, applied when the
//! user leaves a free-text field. They are deterministic and idempotent for a
//! fixed [`YearContext`]: normalizing an already normalized value returns it
//! unchanged. Input a normalizer does not recognize passes through
//! (trimmed, and uppercased for the code normalizers).

mod codes;
mod date;
mod numeric;
mod year;

pub use codes::{normalize_sample_code, normalize_work_order};
pub use date::normalize_flexible_date;
pub use numeric::parse_number;
pub use year::YearContext;

/// A text normalizer bound to a year context.
///
/// Matches the signature of the normalizers above so callers can pick one at
/// runtime.
pub type Normalizer = fn(&str, YearContext) -> String;
