//! Closed option sets for single-choice report fields.
//!
//! Every option set has an `Unset` member rendered as [`UNSET`] (`-`).
//! Deserialization never fails on an unknown value: anything outside the
//! set becomes `Unset`, so a record can only ever hold declared options.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentinel text for an option field that has not been chosen yet.
pub const UNSET: &str = "-";

macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            /// Not chosen yet (`-`).
            #[default]
            Unset,
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member of the set, `Unset` first.
            pub const ALL: &'static [$name] = &[$name::Unset, $($name::$variant),+];

            /// Returns the text stored on the wire.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $name::Unset => UNSET,
                    $( $name::$variant => $text, )+
                }
            }

            /// Returns true when a real option has been chosen.
            pub const fn is_set(&self) -> bool {
                !matches!(self, $name::Unset)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == trimmed)
                    .ok_or_else(|| format!("Unknown {} option: {s}", stringify!($name)))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = crate::lenient::text(deserializer)?;
                Ok(text.parse().unwrap_or_else(|_| {
                    if !text.is_empty() && text != UNSET {
                        tracing::debug!(value = %text, "option outside {}, treating as unset", stringify!($name));
                    }
                    $name::Unset
                }))
            }
        }
    };
}

option_set! {
    /// Kind of material tested for sand equivalent.
    SampleType {
        Soil => "SUELO",
        FineAggregate => "AGREGADO FINO",
    }
}

option_set! {
    /// How the graduated cylinder was agitated.
    AgitationMethod {
        Manual => "MANUAL",
        Mechanical => "MECÁNICO",
    }
}

option_set! {
    /// Sample preparation procedure.
    SamplePreparation {
        ProcedureA => "PROCEDIMIENTO A",
        ProcedureB => "PROCEDIMIENTO B",
    }
}

option_set! {
    /// Staff allowed to sign the review.
    Reviewer {
        FabianLaRosa => "FABIAN LA ROSA",
    }
}

option_set! {
    /// Staff allowed to sign the approval.
    Approver {
        IrmaCoaquira => "IRMA COAQUIRA",
    }
}

option_set! {
    /// 0.1 g balance used for gradation weighing.
    BalanceCode {
        Eqp0046 => "EQP-0046",
    }
}

option_set! {
    /// Drying oven used for gradation.
    OvenCode {
        Eqp0049 => "EQP-0049",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_become_unset() {
        let parsed: SampleType = serde_json::from_str("\"ARCILLA\"").unwrap();
        assert_eq!(parsed, SampleType::Unset);
        let parsed: SampleType = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, SampleType::Unset);
    }

    #[test]
    fn known_values_round_through_wire_text() {
        let parsed: AgitationMethod = serde_json::from_str("\"MECÁNICO\"").unwrap();
        assert_eq!(parsed, AgitationMethod::Mechanical);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"MECÁNICO\"");
    }

    #[test]
    fn unset_is_not_set() {
        assert!(!Reviewer::Unset.is_set());
        assert!(Reviewer::FabianLaRosa.is_set());
        assert_eq!(Reviewer::default().as_str(), UNSET);
    }
}
