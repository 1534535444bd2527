//! The consolidation pass run after every edit.

use iterlist_common::Result;

use crate::store::RunStore;

impl RunStore {
    /// Merges neighboring runs until no further merge applies.
    ///
    /// Scans from the highest index downward, joining each run onto its lower
    /// neighbor whenever [`Run::try_merge`](crate::run::Run::try_merge)
    /// accepts the pair, and repeats full scans until one makes no change.
    /// Each merge removes one run, so the pass terminates.
    ///
    /// Empty and degenerate runs cannot occur here: [`Run::new`](crate::run::Run::new)
    /// drops empty progressions and demotes one-element ranges to singles
    /// when the pieces of an edit are built.
    ///
    /// Returns the number of merges performed.
    pub fn consolidate(&mut self) -> Result<usize> {
        let mut merges = 0;
        loop {
            let mut changed = false;
            let mut index = self.len();
            while index > 1 {
                index -= 1;
                if index >= self.len() {
                    continue;
                }
                let (lower, upper) = (self.runs()[index - 1], self.runs()[index]);
                if let Ok(joined) = lower.try_merge(upper) {
                    log::trace!("consolidate: {lower} + {upper} -> {joined}");
                    self.set(index - 1, joined);
                    self.close_gap(index, 1)?;
                    merges += 1;
                    changed = true;
                }
            }
            if !changed {
                return Ok(merges);
            }
        }
    }

    /// Returns `true` when the runs are ascending, non-overlapping and no
    /// adjacent pair could be merged.
    pub fn is_consolidated(&self) -> bool {
        self.runs()
            .windows(2)
            .all(|pair| pair[0].end() < pair[1].start() && pair[0].try_merge(pair[1]).is_err())
    }
}

#[cfg(test)]
mod tests {
    use crate::{run::Run, store::RunStore};

    fn r(start: u64, end: u64, stride: u64) -> Run {
        Run::new(start, end, stride).unwrap()
    }

    #[test]
    fn test_cascading_merges() {
        let mut s = RunStore::from_runs(vec![
            Run::single(1),
            Run::single(2),
            r(3, 5, 1),
            Run::single(6),
            r(10, 20, 5),
            Run::single(25),
            r(30, 40, 5),
        ]);
        assert!(!s.is_consolidated());
        assert_eq!(s.consolidate().unwrap(), 5);
        assert_eq!(s.runs(), &[r(1, 6, 1), r(10, 40, 5)]);
        assert!(s.is_consolidated());
        assert_eq!(s.consolidate().unwrap(), 0);
    }

    #[test]
    fn test_non_mergeable_neighbors_stay() {
        let mut s = RunStore::from_runs(vec![
            Run::single(7),
            Run::single(13),
            r(15, 18, 1),
            Run::single(22),
            r(24, 40, 4),
        ]);
        assert!(s.is_consolidated());
        assert_eq!(s.consolidate().unwrap(), 0);
        assert_eq!(s.len(), 5);
    }
}
