//! Element-wise merging of progressions whose phases interleave.
//!
//! Two progressions with incompatible strides cannot share one run without
//! overlapping another, so over the span where they interleave the union is
//! materialized and re-packed into unit runs and singles.

use std::iter::Peekable;

use crate::run::Run;

/// Iterator over the union of two strictly ascending value streams.
///
/// A value present in both inputs is yielded once.
pub(crate) struct Union<I, J>
where
    I: Iterator<Item = u64>,
    J: Iterator<Item = u64>,
{
    a: Peekable<I>,
    b: Peekable<J>,
}

impl<I, J> Union<I, J>
where
    I: Iterator<Item = u64>,
    J: Iterator<Item = u64>,
{
    pub fn new(a: I, b: J) -> Self {
        Self {
            a: a.peekable(),
            b: b.peekable(),
        }
    }
}

impl<I, J> Iterator for Union<I, J>
where
    I: Iterator<Item = u64>,
    J: Iterator<Item = u64>,
{
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        use std::cmp::Ordering::*;
        let (va, vb) = match (self.a.peek(), self.b.peek()) {
            (None, None) => return None,
            (Some(_), None) => return self.a.next(),
            (None, Some(_)) => return self.b.next(),
            (Some(&va), Some(&vb)) => (va, vb),
        };
        match va.cmp(&vb) {
            Less => self.a.next(),
            Greater => self.b.next(),
            Equal => {
                self.b.next();
                self.a.next()
            }
        }
    }
}

/// Packs a strictly ascending stream of values into unit runs and singles.
pub(crate) fn pack_values(values: impl IntoIterator<Item = u64>) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current: Option<(u64, u64)> = None;
    for value in values {
        current = match current {
            Some((start, end)) if value == end + 1 => Some((start, value)),
            Some((start, end)) => {
                runs.extend(Run::new(start, end, 1));
                Some((value, value))
            }
            None => Some((value, value)),
        };
    }
    if let Some((start, end)) = current {
        runs.extend(Run::new(start, end, 1));
    }
    runs
}

/// Union of two runs covering the same span, packed into runs.
pub(crate) fn interleave(a: &Run, b: &Run) -> Vec<Run> {
    pack_values(Union::new(a.values(), b.values()))
}
