//! Read-only, ascending enumeration of an iteration list.

use crate::{list::IterationList, run::MAX_VALUE};

/// A position within an [`IterationList`].
///
/// The cursor borrows the list, so the list cannot be edited while the
/// cursor is alive. Cursors over the same list are independent.
///
/// For periodic lists the cursor wraps from the top of the base block to the
/// first run, raising its tile adjustment by the period length each time. It
/// stops once the next value would exceed [`MAX_VALUE`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    list: &'a IterationList,
    run_index: usize,
    /// Current value within the base block.
    current: u64,
    increment: u64,
    run_end: u64,
    /// Offset of the current tile above the base block.
    adjustment: u64,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    /// Positions a cursor at the smallest element `>= start`.
    pub fn new(list: &'a IterationList, start: u64) -> Cursor<'a> {
        let mut cursor = Cursor {
            list,
            run_index: 0,
            current: 0,
            increment: 1,
            run_end: 0,
            adjustment: 0,
            exhausted: true,
        };
        cursor.position(start);
        cursor
    }

    /// Repositions the cursor at the smallest element `>= start`.
    pub fn position(&mut self, start: u64) {
        self.exhausted = true;
        if self.list.is_empty() {
            return;
        }
        let (folded, adjustment) = match self.list.period() {
            Some(period) => period.fold(start),
            None => (start, 0),
        };
        self.adjustment = adjustment;
        match self.locate(folded) {
            Some((index, value)) => self.load(index, value),
            None => match self.list.period() {
                Some(period) => {
                    self.adjustment = self.adjustment.saturating_add(period.length);
                    self.load(0, self.list.runs()[0].start());
                }
                None => return,
            },
        }
        self.exhausted = self.current.saturating_add(self.adjustment) > MAX_VALUE;
    }

    /// Finds the run holding the smallest stored element `>= value`.
    fn locate(&self, value: u64) -> Option<(usize, u64)> {
        let runs = self.list.runs();
        let next = match self.list.find_floor(value) {
            Some(index) => {
                if let Some(found) = runs[index].first_at_or_above(value) {
                    return Some((index, found));
                }
                index + 1
            }
            None => 0,
        };
        runs.get(next).map(|run| (next, run.start()))
    }

    fn load(&mut self, index: usize, value: u64) {
        let run = &self.list.runs()[index];
        self.run_index = index;
        self.current = value;
        self.increment = run.stride();
        self.run_end = run.end();
    }

    /// The value the next call to `next()` returns, without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u64> {
        (!self.exhausted).then(|| self.current + self.adjustment)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the current value and advances to the next element.
    pub fn advance(&mut self) -> Option<u64> {
        let value = self.peek()?;
        if self.current < self.run_end {
            self.current += self.increment;
        } else if self.run_index + 1 < self.list.run_count() {
            let next = self.run_index + 1;
            self.load(next, self.list.runs()[next].start());
        } else if let Some(period) = self.list.period() {
            self.adjustment = self.adjustment.saturating_add(period.length);
            self.load(0, self.list.runs()[0].start());
        } else {
            self.exhausted = true;
            return Some(value);
        }
        if self.current.saturating_add(self.adjustment) > MAX_VALUE {
            self.exhausted = true;
        }
        Some(value)
    }
}

impl Iterator for Cursor<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.advance()
    }
}
