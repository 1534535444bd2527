//! Iteration lists: ordered, mutable sets of non-negative integers stored as
//! singles and arithmetic-progression runs.
//!
//! An [`IterationList`] decides *which* discrete work items (cells, slots,
//! cycle numbers) a caller processes. It supports:
//!
//! - **Editing**: [`IterationList::add`] and [`IterationList::delete`] insert
//!   or remove `[lo, hi]` progressions with arbitrary overlap. Every edit ends
//!   with a consolidation pass that merges touching runs.
//! - **Periodic tiling**: a list may declare a repeating block
//!   `[origin, origin + length)`; its runs then describe one block that tiles
//!   upwards indefinitely.
//! - **Deferred selection**: `FIRST`, `LAST`, `RANDOM` and `ALL` requests are
//!   kept pending until [`IterationList::finalize`] supplies the universe size.
//! - **Reading**: O(log n) membership, closed-form [`IterationList::count_below`],
//!   and ascending enumeration through a [`Cursor`].
//!
//! The textual list form (`(ADD 1-5, 9+2-15, RANDOM 3)`) is handled by the
//! [`ingest`] module.

pub mod codec;
mod consolidate;
pub mod cursor;
pub mod diagnostics;
pub mod ingest;
pub mod list;
mod merge;
mod mutation;
pub mod prng;
pub mod run;
mod selector;
mod store;
#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Selector, Severity};
pub use list::{EditOutcome, IterationList, Pending, Period, RandomRequest};
pub use prng::{MinimalStandard, SeedSequence};
pub use run::{MAX_VALUE, Run};
