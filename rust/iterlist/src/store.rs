//! Growable, ordered storage of runs.

use iterlist_common::{Result, error::Error};
use serde::Serialize;

use crate::run::Run;

/// Sorted, non-overlapping runs backing an iteration list.
///
/// The store knows nothing about merging; it only supports locating runs and
/// shifting windows of runs up or down. All window operations preserve the
/// runs above the affected window exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct RunStore {
    runs: Vec<Run>,
}

impl RunStore {
    pub fn new() -> RunStore {
        RunStore { runs: Vec::new() }
    }

    pub fn from_runs(runs: Vec<Run>) -> RunStore {
        RunStore { runs }
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[inline]
    pub fn set(&mut self, index: usize, run: Run) {
        self.runs[index] = run;
    }

    /// Index of the run with the greatest start `<= value`, or `None` when
    /// `value` lies below the first run.
    #[inline]
    pub fn find_floor(&self, value: u64) -> Option<usize> {
        self.runs
            .partition_point(|run| run.start() <= value)
            .checked_sub(1)
    }

    /// Index range of the runs whose `[start, end]` interval intersects
    /// `[lo, hi]`.
    ///
    /// When nothing intersects, the returned range is empty and starts at
    /// the insertion point for a run beginning at `lo`.
    pub fn overlapping(&self, lo: u64, hi: u64) -> std::ops::Range<usize> {
        let first = match self.find_floor(lo) {
            Some(i) if self.runs[i].end() >= lo => i,
            Some(i) => i + 1,
            None => 0,
        };
        let end = self.runs.partition_point(|run| run.start() <= hi).max(first);
        first..end
    }

    /// Inserts `runs` at `at`, shifting everything from `at` upwards.
    ///
    /// Grows the backing storage by at least a quarter of its current length
    /// when capacity runs out.
    pub fn make_room(&mut self, at: usize, runs: &[Run]) -> Result<()> {
        if at > self.runs.len() {
            return Err(Error::fatal(
                "make_room",
                format!("insertion point {at} is past the end of {} runs", self.runs.len()),
            ));
        }
        self.reserve(runs.len());
        self.runs.splice(at..at, runs.iter().copied());
        Ok(())
    }

    /// Removes `count` runs starting at `at`, shifting the runs above down.
    pub fn close_gap(&mut self, at: usize, count: usize) -> Result<()> {
        if self.runs.capacity() == 0 && count > 0 {
            return Err(Error::fatal("close_gap", "the list has no backing storage"));
        }
        let end = at.checked_add(count).filter(|&end| end <= self.runs.len());
        let Some(end) = end else {
            return Err(Error::fatal(
                "close_gap",
                format!(
                    "window {at}+{count} exceeds the stored {} runs",
                    self.runs.len()
                ),
            ));
        };
        self.runs.drain(at..end);
        Ok(())
    }

    /// Replaces the `count` runs at `at` with `runs`.
    ///
    /// Overwrites in place as far as possible, then makes room for or closes
    /// the gap left by the difference.
    pub fn replace(&mut self, at: usize, count: usize, runs: &[Run]) -> Result<()> {
        if at + count > self.runs.len() {
            return Err(Error::fatal(
                "replace",
                format!(
                    "window {at}+{count} exceeds the stored {} runs",
                    self.runs.len()
                ),
            ));
        }
        let shared = count.min(runs.len());
        self.runs[at..at + shared].copy_from_slice(&runs[..shared]);
        if runs.len() > count {
            self.make_room(at + shared, &runs[shared..])
        } else {
            self.close_gap(at + shared, count - shared)
        }
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.runs.len() + additional;
        if needed > self.runs.capacity() {
            let grow = additional.max(self.runs.len() / 4 + 1);
            self.runs.reserve_exact(grow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(runs: &[(u64, u64, u64)]) -> RunStore {
        RunStore::from_runs(
            runs.iter()
                .map(|&(s, e, k)| Run::new(s, e, k).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_find_floor() {
        let s = store(&[(7, 7, 1), (13, 13, 1), (15, 18, 1), (22, 22, 1)]);
        assert_eq!(s.find_floor(0), None);
        assert_eq!(s.find_floor(6), None);
        assert_eq!(s.find_floor(7), Some(0));
        assert_eq!(s.find_floor(14), Some(1));
        assert_eq!(s.find_floor(17), Some(2));
        assert_eq!(s.find_floor(1000), Some(3));
        assert_eq!(RunStore::new().find_floor(5), None);
    }

    #[test]
    fn test_overlapping() {
        let s = store(&[(0, 10, 1), (20, 40, 5), (50, 50, 1)]);
        assert_eq!(s.overlapping(11, 19), 1..1);
        assert_eq!(s.overlapping(5, 25), 0..2);
        assert_eq!(s.overlapping(41, 49), 2..2);
        assert_eq!(s.overlapping(42, 60), 2..3);
        assert_eq!(s.overlapping(60, 70), 3..3);
        assert_eq!(s.overlapping(0, 100), 0..3);
    }

    #[test]
    fn test_window_shifts_preserve_tail() {
        let mut s = store(&[(1, 1, 1), (5, 5, 1), (9, 9, 1)]);
        s.make_room(1, &[Run::single(3)]).unwrap();
        assert_eq!(s, store(&[(1, 1, 1), (3, 3, 1), (5, 5, 1), (9, 9, 1)]));
        s.close_gap(1, 2).unwrap();
        assert_eq!(s, store(&[(1, 1, 1), (9, 9, 1)]));
        s.replace(0, 1, &[Run::single(2), Run::single(4), Run::single(6)])
            .unwrap();
        assert_eq!(
            s,
            store(&[(2, 2, 1), (4, 4, 1), (6, 6, 1), (9, 9, 1)])
        );
        s.replace(1, 2, &[Run::single(5)]).unwrap();
        assert_eq!(s, store(&[(2, 2, 1), (5, 5, 1), (9, 9, 1)]));
    }

    #[test]
    fn test_out_of_bounds_windows_are_fatal() {
        let mut s = store(&[(1, 1, 1)]);
        assert!(s.close_gap(1, 1).unwrap_err().is_fatal());
        assert!(s.make_room(3, &[Run::single(3)]).unwrap_err().is_fatal());
        assert!(s.replace(0, 2, &[]).unwrap_err().is_fatal());
        assert!(RunStore::new().close_gap(0, 1).unwrap_err().is_fatal());
    }
}
