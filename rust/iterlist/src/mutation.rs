//! Insertion and deletion of progressions against the run store.
//!
//! Both edits work on the window of stored runs whose intervals intersect
//! the request, build the replacement runs for that window, and swap them in
//! with a single [`RunStore::replace`]. Merging with neighbors outside the
//! window is left to the consolidation pass.

use iterlist_common::Result;

use crate::{merge, run::Run, store::RunStore};

/// How the part of the incoming progression that falls inside one existing
/// run's span combines with that run.
#[derive(Debug, PartialEq, Eq)]
enum Overlap {
    /// The incoming elements are all present already.
    Absorbed,
    /// The existing run is a subset of the incoming elements; the incoming
    /// fragment replaces it.
    Replaces(Run),
    /// Phases or strides are incompatible; the union is materialized.
    Interleaved(Vec<Run>),
}

/// Appends `run` to the ascending `pieces`, joining it onto the last piece
/// when the two form one progression.
fn push_joined(pieces: &mut Vec<Run>, run: Run) {
    if let Some(last) = pieces.last_mut() {
        if let Ok(joined) = last.try_merge(run) {
            *last = joined;
            return;
        }
    }
    pieces.push(run);
}

fn overlap(existing: &Run, fragment: &Run) -> Overlap {
    if existing.covers(fragment) {
        Overlap::Absorbed
    } else if fragment.covers(existing) {
        Overlap::Replaces(*fragment)
    } else {
        Overlap::Interleaved(merge::interleave(existing, fragment))
    }
}

impl RunStore {
    /// Adds the elements of `incoming` to the store.
    ///
    /// The incoming progression is processed left to right in fragments
    /// bounded by the existing runs it meets:
    /// - gaps between existing runs receive the in-phase part of the
    ///   incoming progression as new runs;
    /// - inside an existing run's span, the fragment is absorbed, replaces the
    ///   run, or is interleaved with it element by element;
    /// - existing runs straddling either end of the request are split, the
    ///   outside parts kept as they are.
    ///
    /// Returns `false` when every incoming element was already present; the
    /// store is then left untouched.
    pub fn add(&mut self, incoming: Run) -> Result<bool> {
        let (lo, hi) = (incoming.start(), incoming.end());
        let window = self.overlapping(lo, hi);
        if window.is_empty() {
            self.make_room(window.start, &[incoming])?;
            return Ok(true);
        }

        let existing = &self.runs()[window.clone()];
        let mut pieces = Vec::with_capacity(existing.len() + 3);
        let mut added = false;
        pieces.extend(existing[0].below(lo));

        // Next value not yet accounted for.
        let mut cursor = lo;
        for run in existing {
            let Some(inside) = run.clip(lo, hi) else {
                continue;
            };
            if inside.start() > cursor {
                if let Some(gap) = incoming.clip(cursor, inside.start() - 1) {
                    push_joined(&mut pieces, gap);
                    added = true;
                }
            }
            match incoming.clip(inside.start(), inside.end()) {
                None => push_joined(&mut pieces, inside),
                Some(fragment) => match overlap(&inside, &fragment) {
                    Overlap::Absorbed => push_joined(&mut pieces, inside),
                    Overlap::Replaces(run) => {
                        push_joined(&mut pieces, run);
                        added = true;
                    }
                    Overlap::Interleaved(runs) => {
                        for run in runs {
                            push_joined(&mut pieces, run);
                        }
                        added = true;
                    }
                },
            }
            cursor = inside.end() + 1;
        }
        if cursor <= hi {
            if let Some(tail) = incoming.clip(cursor, hi) {
                push_joined(&mut pieces, tail);
                added = true;
            }
        }
        if let Some(above) = existing[existing.len() - 1].above(hi) {
            push_joined(&mut pieces, above);
        }

        if !added {
            return Ok(false);
        }
        self.replace(window.start, window.len(), &pieces)?;
        Ok(true)
    }

    /// Removes every stored element in `[lo, hi]`.
    ///
    /// Runs inside the interval are dropped; runs crossing its bottom or top
    /// are truncated; a run straddling both ends is split in two with the
    /// middle removed.
    ///
    /// Returns `false` when no stored element lay in the interval.
    pub fn delete(&mut self, lo: u64, hi: u64) -> Result<bool> {
        let window = self.overlapping(lo, hi);
        if window.is_empty() {
            return Ok(false);
        }
        let existing = &self.runs()[window.clone()];
        if existing.iter().all(|run| run.clip(lo, hi).is_none()) {
            return Ok(false);
        }
        let mut pieces = Vec::with_capacity(2);
        pieces.extend(existing[0].below(lo));
        pieces.extend(existing[existing.len() - 1].above(hi));
        self.replace(window.start, window.len(), &pieces)?;
        Ok(true)
    }
}
