//! Fixed-length arrays of repeated readings.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::lenient::number_from_value;

/// One optional numeric reading. `None` means "not measured", never zero.
pub type Reading = Option<f64>;

/// A positionally significant, fixed-length sequence of readings.
///
/// Index is the trial number (or sieve slot) and is never reordered.
/// Deserializing from a sequence of any length truncates or pads with `None`,
/// so the declared length `N` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialArray<const N: usize>([Reading; N]);

impl<const N: usize> TrialArray<N> {
    /// Creates an array with every slot empty.
    pub const fn empty() -> Self {
        Self([None; N])
    }

    /// Creates an array with every slot set to `value`.
    pub const fn filled_with(value: f64) -> Self {
        Self([Some(value); N])
    }

    /// Builds an array from arbitrary-length input, truncating or padding.
    pub fn from_readings<I: IntoIterator<Item = Reading>>(readings: I) -> Self {
        let mut slots = [None; N];
        for (slot, reading) in slots.iter_mut().zip(readings) {
            *slot = reading.filter(|v| v.is_finite());
        }
        Self(slots)
    }

    /// Declared length.
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false for `N > 0`; provided for API symmetry.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Reading at `index`, `None` when out of range or unmeasured.
    pub fn get(&self, index: usize) -> Reading {
        self.0.get(index).copied().flatten()
    }

    /// Writes `reading` at `index`. Out-of-range writes are ignored and
    /// reported as `false`.
    pub fn set(&mut self, index: usize, reading: Reading) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = reading.filter(|v| v.is_finite());
                true
            }
            None => false,
        }
    }

    /// Number of slots holding a reading.
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|r| r.is_some()).count()
    }

    /// Returns true if any slot holds a reading.
    pub fn any(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Reading> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> Default for TrialArray<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> From<[Reading; N]> for TrialArray<N> {
    fn from(value: [Reading; N]) -> Self {
        Self::from_readings(value)
    }
}

impl<const N: usize> Serialize for TrialArray<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for reading in &self.0 {
            seq.serialize_element(reading)?;
        }
        seq.end()
    }
}

impl<'de, const N: usize> Deserialize<'de> for TrialArray<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => {
                if items.len() != N {
                    tracing::debug!(found = items.len(), expected = N, "resizing trial array");
                }
                Self::from_readings(items.iter().map(number_from_value))
            }
            _ => Self::empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_padded() {
        let parsed: TrialArray<3> = serde_json::from_str("[4.1, 3.9]").unwrap();
        assert_eq!(parsed.as_slice(), &[Some(4.1), Some(3.9), None]);
    }

    #[test]
    fn long_input_is_truncated() {
        let parsed: TrialArray<3> = serde_json::from_str("[1, 2, 3, 4, 5]").unwrap();
        assert_eq!(parsed.as_slice(), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn bad_elements_become_none() {
        let parsed: TrialArray<3> = serde_json::from_str(r#"["x", null, "2.5"]"#).unwrap();
        assert_eq!(parsed.as_slice(), &[None, None, Some(2.5)]);
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut trials = TrialArray::<3>::empty();
        assert!(!trials.set(3, Some(1.0)));
        assert!(trials.set(2, Some(1.0)));
        assert_eq!(trials.filled(), 1);
    }

    #[test]
    fn serializes_nulls() {
        let trials = TrialArray::<3>::from([Some(10.0), None, Some(10.0)]);
        assert_eq!(serde_json::to_string(&trials).unwrap(), "[10.0,null,10.0]");
    }
}
