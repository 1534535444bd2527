//! The unit of storage of an iteration list: a single value or an
//! arithmetic progression `[start, end]` with a stride.

use serde::{Deserialize, Serialize};

/// Largest value an iteration list can hold.
///
/// Two bits of every packed storage word are reserved for tags (see
/// [`codec`](crate::codec)), leaving `u64::BITS - 2` bits for the value.
pub const MAX_VALUE: u64 = (1u64 << (u64::BITS - 2)) - 1;

/// One run of an iteration list.
///
/// Runs are always normalized:
/// - `Single` is used whenever `start == end`;
/// - `Unit` has `start < end` and an implied stride of 1;
/// - `Strided` has `start < end`, `stride > 1`, and `end` lies in phase with
///   `start` (i.e. `(end - start) % stride == 0`).
///
/// Use [`Run::new`] to build a run from arbitrary bounds; it performs the
/// normalization and rejects empty progressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Run {
    Single { value: u64 },
    Unit { start: u64, end: u64 },
    Strided { start: u64, end: u64, stride: u64 },
}

impl Run {
    /// Builds the progression `start, start + stride, ...` up to `end`.
    ///
    /// `end` is rounded down to the last in-phase value. Returns `None` when
    /// the progression is empty (`end < start`).
    ///
    /// # Panics
    ///
    /// In debug builds, panics when `stride` is zero.
    #[inline]
    pub fn new(start: u64, end: u64, stride: u64) -> Option<Run> {
        debug_assert!(stride >= 1);
        if end < start {
            return None;
        }
        let end = start + (end - start) / stride * stride;
        Some(if end == start {
            Run::Single { value: start }
        } else if stride == 1 {
            Run::Unit { start, end }
        } else {
            Run::Strided { start, end, stride }
        })
    }

    #[inline]
    pub fn single(value: u64) -> Run {
        Run::Single { value }
    }

    #[inline]
    pub fn start(&self) -> u64 {
        match *self {
            Run::Single { value } => value,
            Run::Unit { start, .. } | Run::Strided { start, .. } => start,
        }
    }

    #[inline]
    pub fn end(&self) -> u64 {
        match *self {
            Run::Single { value } => value,
            Run::Unit { end, .. } | Run::Strided { end, .. } => end,
        }
    }

    /// Distance between consecutive elements; 1 for singles and unit runs.
    #[inline]
    pub fn stride(&self) -> u64 {
        match *self {
            Run::Strided { stride, .. } => stride,
            _ => 1,
        }
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        matches!(self, Run::Single { .. })
    }

    /// Number of elements in the run.
    #[inline]
    pub fn len(&self) -> u64 {
        (self.end() - self.start()) / self.stride() + 1
    }

    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value >= self.start() && value <= self.end() && (value - self.start()) % self.stride() == 0
    }

    /// Returns `true` when every element of `other` is also an element of
    /// `self`.
    pub fn covers(&self, other: &Run) -> bool {
        if !self.contains(other.start()) || other.end() > self.end() {
            return false;
        }
        other.is_single() || other.stride() % self.stride() == 0
    }

    /// Smallest element that is `>= value`.
    #[inline]
    pub fn first_at_or_above(&self, value: u64) -> Option<u64> {
        if value <= self.start() {
            return Some(self.start());
        }
        if value > self.end() {
            return None;
        }
        let stride = self.stride();
        let steps = (value - self.start()).div_ceil(stride);
        Some(self.start() + steps * stride)
    }

    /// Largest element that is strictly `< value`.
    #[inline]
    pub fn last_below(&self, value: u64) -> Option<u64> {
        if value <= self.start() {
            return None;
        }
        if value > self.end() {
            return Some(self.end());
        }
        let stride = self.stride();
        Some(self.start() + (value - 1 - self.start()) / stride * stride)
    }

    /// Number of elements strictly less than `value`.
    #[inline]
    pub fn count_below(&self, value: u64) -> u64 {
        if value <= self.start() {
            0
        } else if value > self.end() {
            self.len()
        } else {
            (value - 1 - self.start()) / self.stride() + 1
        }
    }

    /// The part of this run strictly below `value`.
    pub fn below(&self, value: u64) -> Option<Run> {
        let end = self.last_below(value)?;
        Run::new(self.start(), end, self.stride())
    }

    /// The part of this run strictly above `value`.
    pub fn above(&self, value: u64) -> Option<Run> {
        let start = self.first_at_or_above(value.checked_add(1)?)?;
        Run::new(start, self.end(), self.stride())
    }

    /// The elements of this run lying in `[lo, hi]` (both inclusive).
    pub fn clip(&self, lo: u64, hi: u64) -> Option<Run> {
        let start = self.first_at_or_above(lo)?;
        if start > hi {
            return None;
        }
        let end = if self.end() <= hi {
            self.end()
        } else {
            self.last_below(hi + 1)?
        };
        Run::new(start, end, self.stride())
    }

    /// Attempts to join `next` (which must lie entirely above `self`) onto
    /// this run.
    ///
    /// Two runs join when the result is still a single progression under the
    /// rules kept by the consolidation pass:
    /// - two singles exactly one apart become a unit run;
    /// - a single one stride below or above a run extends that run;
    /// - two runs with equal stride join when `next` starts one stride after
    ///   `self` ends.
    ///
    /// Returns the joined run, or both runs unchanged.
    pub fn try_merge(&self, next: Run) -> Result<Run, (Run, Run)> {
        debug_assert!(self.end() < next.start());
        let joined = match (self.is_single(), next.is_single()) {
            (true, true) if next.start() - self.start() == 1 => {
                Run::new(self.start(), next.start(), 1)
            }
            (true, false) if self.start() + next.stride() == next.start() => {
                Run::new(self.start(), next.end(), next.stride())
            }
            (false, true) if self.end() + self.stride() == next.start() => {
                Run::new(self.start(), next.start(), self.stride())
            }
            (false, false)
                if self.stride() == next.stride() && self.end() + self.stride() == next.start() =>
            {
                Run::new(self.start(), next.end(), self.stride())
            }
            _ => None,
        };
        joined.ok_or((*self, next))
    }

    /// Iterates the elements of the run in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u64> + Clone + use<> {
        let start = self.start();
        let stride = self.stride();
        (0..self.len()).map(move |k| start + k * stride)
    }
}

impl std::fmt::Display for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Run::Single { value } => write!(f, "{value}"),
            Run::Unit { start, end } => write!(f, "{start}-{end}"),
            Run::Strided { start, end, stride } => write!(f, "{start}+{stride}-{end}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: u64, end: u64, stride: u64) -> Run {
        Run::new(start, end, stride).unwrap()
    }

    #[test]
    fn test_new_normalizes() {
        assert_eq!(Run::new(5, 4, 1), None);
        assert_eq!(r(5, 5, 3), Run::single(5));
        assert_eq!(r(5, 7, 3), Run::single(5));
        assert_eq!(r(1, 3, 1), Run::Unit { start: 1, end: 3 });
        assert_eq!(
            r(16, 34, 4),
            Run::Strided {
                start: 16,
                end: 32,
                stride: 4
            }
        );
    }

    #[test]
    fn test_membership_and_counts() {
        let run = r(16, 32, 4);
        assert_eq!(run.len(), 5);
        assert!(run.contains(20));
        assert!(!run.contains(19));
        assert!(!run.contains(36));
        assert_eq!(run.count_below(16), 0);
        assert_eq!(run.count_below(17), 1);
        assert_eq!(run.count_below(20), 1);
        assert_eq!(run.count_below(21), 2);
        assert_eq!(run.count_below(100), 5);
        assert_eq!(run.first_at_or_above(17), Some(20));
        assert_eq!(run.first_at_or_above(33), None);
        assert_eq!(run.last_below(16), None);
        assert_eq!(run.last_below(24), Some(20));
        assert_eq!(run.last_below(25), Some(24));
    }

    #[test]
    fn test_split_pieces() {
        let run = r(10, 50, 5);
        assert_eq!(run.below(22), Some(r(10, 20, 5)));
        assert_eq!(run.above(22), Some(r(25, 50, 5)));
        assert_eq!(run.below(10), None);
        assert_eq!(run.above(50), None);
        assert_eq!(run.above(45), Some(Run::single(50)));
        assert_eq!(run.clip(11, 34), Some(r(15, 30, 5)));
        assert_eq!(run.clip(11, 14), None);
        assert_eq!(run.clip(0, 100), Some(run));
    }

    #[test]
    fn test_covers() {
        let odd = r(1, 99, 2);
        assert!(odd.covers(&r(5, 25, 4)));
        assert!(odd.covers(&Run::single(7)));
        assert!(!odd.covers(&r(5, 25, 3)));
        assert!(!odd.covers(&r(5, 101, 2)));
        assert!(r(0, 10, 1).covers(&r(2, 8, 3)));
    }

    #[test]
    fn test_try_merge() {
        assert_eq!(Run::single(4).try_merge(Run::single(5)), Ok(r(4, 5, 1)));
        assert!(Run::single(4).try_merge(Run::single(6)).is_err());
        assert_eq!(Run::single(3).try_merge(r(5, 11, 2)), Ok(r(3, 11, 2)));
        assert_eq!(r(5, 11, 2).try_merge(Run::single(13)), Ok(r(5, 13, 2)));
        assert_eq!(r(1, 3, 1).try_merge(r(4, 9, 1)), Ok(r(1, 9, 1)));
        assert!(r(0, 8, 4).try_merge(r(12, 20, 8)).is_err());
        assert!(r(1, 3, 1).try_merge(r(5, 9, 1)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Run::single(7).to_string(), "7");
        assert_eq!(r(15, 18, 1).to_string(), "15-18");
        assert_eq!(r(16, 32, 4).to_string(), "16+4-32");
    }

    #[test]
    fn test_values() {
        assert_eq!(r(16, 32, 4).values().collect::<Vec<_>>(), vec![16, 20, 24, 28, 32]);
        assert_eq!(Run::single(9).values().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_json_kind_tag() {
        let json = serde_json::to_value(r(16, 32, 4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "strided", "start": 16, "end": 32, "stride": 4})
        );
        assert_eq!(serde_json::from_value::<Run>(json).unwrap(), r(16, 32, 4));

        let json = serde_json::to_value(r(5, 5, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "single", "value": 5}));
        let unit: Run = serde_json::from_str(r#"{"kind":"unit","start":1,"end":3}"#).unwrap();
        assert_eq!(unit, r(1, 3, 1));
    }
}
