//! The iteration list: sorted runs, an optional repeating block, and pending
//! selections.

use iterlist_common::{Result, error::Error, verify_arg};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    codec,
    cursor::Cursor,
    run::{MAX_VALUE, Run},
    store::RunStore,
};

/// A repeating block `[origin, origin + length)`.
///
/// The stored runs of a periodic list describe the base block only; the
/// logical set is that block tiled upwards indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub origin: u64,
    pub length: u64,
}

impl Period {
    /// Folds `value` into the base block, returning the folded value and the
    /// tile offset that was removed. Values below the origin are returned
    /// unchanged.
    #[inline]
    pub fn fold(&self, value: u64) -> (u64, u64) {
        if value < self.origin {
            return (value, 0);
        }
        let offset = value - self.origin;
        let tile = offset / self.length * self.length;
        (value - tile, tile)
    }

    /// First value above the base block, saturating at `u64::MAX`.
    #[inline]
    pub fn end(&self) -> u64 {
        self.origin.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RandomRequest {
    pub count: u64,
    pub seed: u32,
}

/// Selection requests that need the universe size before they can be
/// resolved by [`IterationList::finalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pending {
    pub all: bool,
    pub first: Option<u64>,
    pub last: Option<u64>,
    pub random: Option<RandomRequest>,
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        !self.all && self.first.is_none() && self.last.is_none() && self.random.is_none()
    }
}

/// Result of a single add or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed,
    /// The edit had no effect: an add of elements already present, or a
    /// delete of elements not present.
    Unchanged,
}

impl EditOutcome {
    pub fn changed(self) -> bool {
        self == EditOutcome::Changed
    }
}

impl From<bool> for EditOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            EditOutcome::Changed
        } else {
            EditOutcome::Unchanged
        }
    }
}

/// An ordered, mutable set of non-negative integers.
///
/// Invariants kept after every edit:
/// - runs are sorted by start and their `[start, end]` intervals are disjoint;
/// - no two neighboring runs could be merged into one
///   (see [`Run::try_merge`]).
///
/// A list is exclusively owned by its mutator. Any number of [`Cursor`]s may
/// read it concurrently as long as nothing mutates it meanwhile; the borrow
/// checker enforces this for cursors created by [`IterationList::cursor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationList {
    runs: RunStore,
    /// Base value of the universe: `FIRST`, `LAST`, `RANDOM` and `EVERY`
    /// count from here.
    origin: u64,
    period: Option<Period>,
    pending: Pending,
    /// Universe size given to the first [`IterationList::finalize`].
    universe: Option<u64>,
}

impl IterationList {
    pub fn new(origin: u64) -> IterationList {
        IterationList {
            runs: RunStore::new(),
            origin,
            period: None,
            pending: Pending::default(),
            universe: None,
        }
    }

    /// Builds a list from runs in any order; overlapping runs are merged as
    /// if added one by one.
    pub fn from_runs(origin: u64, runs: impl IntoIterator<Item = Run>) -> Result<IterationList> {
        let mut list = IterationList::new(origin);
        for run in runs {
            list.add(run.start(), run.end(), run.stride())?;
        }
        Ok(list)
    }

    /// Rebuilds a list from the packed words produced by
    /// [`IterationList::to_words`].
    pub fn from_words(origin: u64, words: &[u64]) -> Result<IterationList> {
        let runs = codec::decode(words)?;
        let list = IterationList {
            runs: RunStore::from_runs(runs),
            ..IterationList::new(origin)
        };
        if !list.runs.is_consolidated() {
            return Err(Error::invalid_format(
                "packed list",
                "runs are out of order, overlap, or are not consolidated",
            ));
        }
        Ok(list)
    }

    /// Packs the stored runs into tagged words.
    pub fn to_words(&self) -> Result<Vec<u64>> {
        codec::encode(self.runs.runs())
    }

    #[inline]
    pub fn origin(&self) -> u64 {
        self.origin
    }

    #[inline]
    pub fn period(&self) -> Option<Period> {
        self.period
    }

    #[inline]
    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    #[inline]
    pub fn universe(&self) -> Option<u64> {
        self.universe
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        self.runs.runs()
    }

    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Index of the run with the greatest start `<= value`.
    #[inline]
    pub(crate) fn find_floor(&self, value: u64) -> Option<usize> {
        self.runs.find_floor(value)
    }

    /// Number of stored elements (one block for periodic lists).
    pub fn len(&self) -> u64 {
        self.runs().iter().map(Run::len).sum()
    }

    /// Smallest stored element.
    pub fn lowest(&self) -> Option<u64> {
        self.runs().first().map(Run::start)
    }

    /// Largest stored element. For periodic lists this is the largest
    /// element of the base block.
    pub fn highest(&self) -> Option<u64> {
        self.runs().last().map(Run::end)
    }

    /// Adds the progression `start, start + stride, ...` up to `end`.
    ///
    /// Returns [`EditOutcome::Unchanged`] when all elements were present.
    pub fn add(&mut self, start: u64, end: u64, stride: u64) -> Result<EditOutcome> {
        verify_arg!(stride, stride >= 1);
        verify_arg!(end, end >= start);
        if end > MAX_VALUE {
            return Err(Error::value_out_of_range(end, MAX_VALUE));
        }
        let Some(run) = Run::new(start, end, stride) else {
            return Ok(EditOutcome::Unchanged);
        };
        let changed = self.runs.add(run)?;
        if changed {
            let merges = self.runs.consolidate()?;
            log::debug!(
                "add {run}: {} runs after {merges} merges",
                self.runs.len()
            );
        }
        debug_assert!(self.runs.is_consolidated());
        Ok(changed.into())
    }

    /// Adds a single value.
    pub fn add_value(&mut self, value: u64) -> Result<EditOutcome> {
        self.add(value, value, 1)
    }

    /// Removes every element in `[start, end]`.
    ///
    /// Returns [`EditOutcome::Unchanged`] when no element was present.
    pub fn delete(&mut self, start: u64, end: u64) -> Result<EditOutcome> {
        verify_arg!(end, end >= start);
        let changed = self.runs.delete(start, end)?;
        if changed {
            let merges = self.runs.consolidate()?;
            log::debug!(
                "delete {start}-{end}: {} runs after {merges} merges",
                self.runs.len()
            );
        }
        debug_assert!(self.runs.is_consolidated());
        Ok(changed.into())
    }

    /// Declares the repeating block `[origin, origin + length)`.
    ///
    /// The block must end within the storable range; see
    /// [`IterationList::longest_period`].
    pub fn set_period(&mut self, length: u64) -> Result<()> {
        verify_arg!(length, length >= 1);
        verify_arg!(length, length <= self.longest_period());
        self.period = Some(Period {
            origin: self.origin,
            length,
        });
        Ok(())
    }

    /// Longest block length whose block `[origin, origin + length)` stays
    /// within `[0, MAX_VALUE]`.
    pub fn longest_period(&self) -> u64 {
        (MAX_VALUE + 1).saturating_sub(self.origin)
    }

    pub fn request_all(&mut self) {
        self.pending.all = true;
    }

    pub fn request_first(&mut self, count: u64) {
        self.pending.first = Some(count);
    }

    pub fn request_last(&mut self, count: u64) {
        self.pending.last = Some(count);
    }

    pub fn request_random(&mut self, count: u64, seed: u32) {
        self.pending.random = Some(RandomRequest { count, seed });
    }

    pub(crate) fn pending_mut(&mut self) -> &mut Pending {
        &mut self.pending
    }

    pub(crate) fn set_universe(&mut self, universe: u64) {
        self.universe = Some(universe);
    }

    /// Membership test in O(log n).
    ///
    /// For periodic lists, `value` is first folded into the base block.
    pub fn contains(&self, value: u64) -> bool {
        let value = match self.period {
            Some(period) => period.fold(value).0,
            None => value,
        };
        self.runs
            .find_floor(value)
            .is_some_and(|index| self.runs()[index].contains(value))
    }

    /// Number of elements strictly less than `value`.
    ///
    /// Sums closed-form run cardinalities; for periodic lists, multiplies the
    /// per-block count by the number of complete blocks below `value` and
    /// adds the remainder.
    pub fn count_below(&self, value: u64) -> u64 {
        let stored_below = |v: u64| -> u64 {
            self.runs().iter().map(|run| run.count_below(v)).sum()
        };
        match self.period {
            Some(period) if value > period.origin => {
                let below_origin = stored_below(period.origin);
                let per_block = stored_below(period.end()) - below_origin;
                let (folded, tile) = period.fold(value);
                let blocks = tile / period.length;
                below_origin
                    .saturating_add(blocks.saturating_mul(per_block))
                    .saturating_add(stored_below(folded) - below_origin)
            }
            _ => stored_below(value),
        }
    }

    /// A cursor positioned at the smallest element `>= start`.
    pub fn cursor(&self, start: u64) -> Cursor<'_> {
        Cursor::new(self, start)
    }

    /// Iterates all elements in ascending order. Periodic lists repeat
    /// until the values would exceed [`MAX_VALUE`].
    pub fn iter(&self) -> Cursor<'_> {
        self.cursor(0)
    }

    /// Returns `true` when both lists hold the same elements (including
    /// periodic repeats), regardless of how their runs are laid out.
    pub fn same_elements(&self, other: &IterationList) -> bool {
        if self.period != other.period {
            return false;
        }
        self.len() == other.len()
            && self
                .runs()
                .iter()
                .all(|run| run.values().all(|v| other.contains(v)))
    }

    /// Verifies the structural invariants.
    pub fn check_invariants(&self) -> Result<()> {
        if !self.runs.is_consolidated() {
            return Err(Error::fatal(
                "check_invariants",
                format!("runs are not consolidated: {self}"),
            ));
        }
        if let Some(high) = self.highest().filter(|&high| high > MAX_VALUE) {
            return Err(Error::value_out_of_range(high, MAX_VALUE));
        }
        Ok(())
    }
}

impl std::fmt::Display for IterationList {
    /// Renders the list in its textual form, e.g. `(7,13,15-18,EVERY 10)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut items: Vec<String> = self.runs().iter().map(Run::to_string).collect();
        if let Some(period) = self.period {
            items.push(format!("EVERY {}", period.length));
        }
        if self.pending.all {
            items.push("ALL".to_string());
        }
        if let Some(count) = self.pending.first {
            items.push(format!("FIRST {count}"));
        }
        if let Some(count) = self.pending.last {
            items.push(format!("LAST {count}"));
        }
        if let Some(request) = self.pending.random {
            items.push(format!("SEED={}", request.seed));
            items.push(format!("RANDOM {}", request.count));
        }
        write!(f, "({})", items.iter().join(","))
    }
}

impl<'a> IntoIterator for &'a IterationList {
    type Item = u64;
    type IntoIter = Cursor<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
