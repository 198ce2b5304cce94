use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// How two clocks relate under happens-before.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CausalOrder {
    Before,
    After,
    Equal,
    Concurrent,
}

/// An immutable vector of per-process event counters.
///
/// Component `i` belongs to the same process in every clock it is compared
/// with, so clocks of different lengths are never comparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock(Box<[u64]>);

impl VectorClock {
    pub fn new(components: impl Into<Box<[u64]>>) -> Self {
        Self(components.into())
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn compare(&self, other: &VectorClock) -> Result<CausalOrder, ClockError> {
        if self.len() != other.len() {
            return Err(ClockError::DimensionMismatch { expected: self.len(), found: other.len() });
        }

        let mut self_le_other = true;
        let mut other_le_self = true;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            if a > b {
                self_le_other = false;
            }
            if a < b {
                other_le_self = false;
            }
        }

        Ok(match (self_le_other, other_le_self) {
            (true, true) => CausalOrder::Equal,
            (true, false) => CausalOrder::Before,
            (false, true) => CausalOrder::After,
            (false, false) => CausalOrder::Concurrent,
        })
    }

    /// `self <= other` componentwise and `self != other`.
    pub fn happens_before(&self, other: &VectorClock) -> Result<bool, ClockError> {
        Ok(self.compare(other)? == CausalOrder::Before)
    }

    /// Neither clock happens before the other.
    ///
    /// Equal clocks count as concurrent here; use `==` to detect equality.
    pub fn concurrent_with(&self, other: &VectorClock) -> Result<bool, ClockError> {
        Ok(matches!(self.compare(other)?, CausalOrder::Equal | CausalOrder::Concurrent))
    }
}

impl From<Vec<u64>> for VectorClock {
    fn from(components: Vec<u64>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<[u64; N]> for VectorClock {
    fn from(components: [u64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

/// Canonical key form: `[1, 0, 2]`.
impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}

/// Checks that every clock has the same, non-zero, number of components.
/// Returns that dimension, or `None` for an empty set.
pub fn check_dimensions<'a, I>(clocks: I) -> Result<Option<usize>, ClockError>
where
    I: IntoIterator<Item = &'a VectorClock>,
{
    let mut dimension = None;
    for clock in clocks {
        if clock.is_empty() {
            return Err(ClockError::Empty);
        }
        match dimension {
            None => dimension = Some(clock.len()),
            Some(expected) if expected != clock.len() => {
                return Err(ClockError::DimensionMismatch { expected, found: clock.len() });
            }
            Some(_) => {}
        }
    }
    Ok(dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vc<const N: usize>(c: [u64; N]) -> VectorClock {
        VectorClock::from(c)
    }

    #[test]
    fn test_compare_equal() {
        assert_eq!(vc([1, 2]).compare(&vc([1, 2])), Ok(CausalOrder::Equal));
        assert_eq!(vc([1, 2]).happens_before(&vc([1, 2])), Ok(false));
        assert_eq!(vc([1, 2]).concurrent_with(&vc([1, 2])), Ok(true));
    }

    #[test]
    fn test_compare_before_after() {
        assert_eq!(vc([1, 1]).compare(&vc([1, 2])), Ok(CausalOrder::Before));
        assert_eq!(vc([1, 2]).compare(&vc([1, 1])), Ok(CausalOrder::After));
        assert_eq!(vc([0, 1]).happens_before(&vc([1, 2])), Ok(true));
        assert_eq!(vc([1, 2]).happens_before(&vc([0, 1])), Ok(false));
        assert_eq!(vc([0, 1]).concurrent_with(&vc([1, 2])), Ok(false));
    }

    #[test]
    fn test_compare_concurrent() {
        assert_eq!(vc([1, 2]).compare(&vc([2, 1])), Ok(CausalOrder::Concurrent));
        assert_eq!(vc([1, 2]).concurrent_with(&vc([2, 1])), Ok(true));
        assert_eq!(vc([2, 1]).concurrent_with(&vc([1, 2])), Ok(true));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = vc([1, 2]).happens_before(&vc([1, 2, 3])).unwrap_err();
        assert_eq!(err, ClockError::DimensionMismatch { expected: 2, found: 3 });
        assert!(vc([1]).concurrent_with(&vc([])).is_err());
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(vc([1, 0, 2]).to_string(), "[1, 0, 2]");
        assert_eq!(vc([7]).to_string(), "[7]");
        assert_ne!(vc([1, 12]).to_string(), vc([11, 2]).to_string());
    }

    #[test]
    fn test_check_dimensions() {
        assert_eq!(check_dimensions(&Vec::<VectorClock>::new()), Ok(None));
        assert_eq!(check_dimensions(&[vc([1, 2]), vc([3, 4])]), Ok(Some(2)));
        assert_eq!(
            check_dimensions(&[vc([1, 2]), vc([3])]),
            Err(ClockError::DimensionMismatch { expected: 2, found: 1 })
        );
        assert_eq!(check_dimensions(&[vc([])]), Err(ClockError::Empty));
    }

    #[test]
    fn test_serde_as_plain_array() {
        let clock: VectorClock = serde_json::from_str("[3, 0, 1]").unwrap();
        assert_eq!(clock, vc([3, 0, 1]));
        assert_eq!(serde_json::to_string(&clock).unwrap(), "[3,0,1]");
    }
}
