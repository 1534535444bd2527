//! Packed word encoding of runs.
//!
//! Each run occupies one to three `u64` words. The top two bits of a word
//! are a tag that classifies it relative to the preceding start word:
//!
//! | run                     | words                                                        |
//! |-------------------------|--------------------------------------------------------------|
//! | single `v`              | `v`                                                          |
//! | unit `[s, e]`           | `s`, `e \| TAG_RANGE_END`                                    |
//! | strided `[s, e]` by `k` | `s`, `k \| TAG_INCREMENT`, `e \| TAG_RANGE_END_WITH_INCREMENT` |
//!
//! A start word is always untagged; the decoder classifies it by inspecting
//! the tag of the word that follows.

use iterlist_common::{Result, error::Error, verify_data};

use crate::run::{MAX_VALUE, Run};

const TAG_SHIFT: u32 = u64::BITS - 2;

pub const TAG_MASK: u64 = 0b11 << TAG_SHIFT;
pub const VALUE_MASK: u64 = !TAG_MASK;

pub const TAG_RANGE_END: u64 = 0b01 << TAG_SHIFT;
pub const TAG_INCREMENT: u64 = 0b10 << TAG_SHIFT;
pub const TAG_RANGE_END_WITH_INCREMENT: u64 = 0b11 << TAG_SHIFT;

const _: () = assert!(VALUE_MASK == MAX_VALUE);

#[inline]
fn tag(word: u64) -> u64 {
    word & TAG_MASK
}

/// Number of words needed to encode `run`.
#[inline]
pub fn encoded_len(run: &Run) -> usize {
    match run {
        Run::Single { .. } => 1,
        Run::Unit { .. } => 2,
        Run::Strided { .. } => 3,
    }
}

/// Appends the packed form of `run` to `words`.
pub fn encode_run(run: &Run, words: &mut Vec<u64>) -> Result<()> {
    let check = |value: u64| {
        if value > MAX_VALUE {
            Err(Error::value_out_of_range(value, MAX_VALUE))
        } else {
            Ok(value)
        }
    };
    match *run {
        Run::Single { value } => words.push(check(value)?),
        Run::Unit { start, end } => {
            words.push(check(start)?);
            words.push(check(end)? | TAG_RANGE_END);
        }
        Run::Strided { start, end, stride } => {
            words.push(check(start)?);
            words.push(check(stride)? | TAG_INCREMENT);
            words.push(check(end)? | TAG_RANGE_END_WITH_INCREMENT);
        }
    }
    Ok(())
}

/// Encodes a sequence of runs into packed words.
pub fn encode<'a>(runs: impl IntoIterator<Item = &'a Run>) -> Result<Vec<u64>> {
    let runs = runs.into_iter();
    let mut words = Vec::with_capacity(runs.size_hint().0 * 2);
    for run in runs {
        encode_run(run, &mut words)?;
    }
    Ok(words)
}

/// Decodes packed words back into runs.
///
/// Never reads past the end of `words`: a truncated or mistagged tail is
/// reported as an `InvalidFormat` error. Ordering of the decoded runs is not
/// checked here.
pub fn decode(words: &[u64]) -> Result<Vec<Run>> {
    let mut runs = Vec::new();
    let mut pos = 0;
    while pos < words.len() {
        let start = words[pos];
        if tag(start) != 0 {
            return Err(Error::invalid_format(
                "packed run",
                format!("word {pos} is tagged but a start value was expected"),
            ));
        }
        let run = match words.get(pos + 1).copied().map(|w| (tag(w), w & VALUE_MASK)) {
            Some((TAG_RANGE_END, end)) => {
                verify_data!(unit_range_bounds, end > start);
                pos += 2;
                Run::new(start, end, 1)
            }
            Some((TAG_INCREMENT, stride)) => {
                let end = match words.get(pos + 2).copied() {
                    Some(w) if tag(w) == TAG_RANGE_END_WITH_INCREMENT => w & VALUE_MASK,
                    _ => {
                        return Err(Error::invalid_format(
                            "packed run",
                            format!("increment at word {} is not followed by a range end", pos + 1),
                        ));
                    }
                };
                verify_data!(strided_range_stride, stride > 1);
                verify_data!(strided_range_bounds, end > start && (end - start) % stride == 0);
                pos += 3;
                Run::new(start, end, stride)
            }
            Some((TAG_RANGE_END_WITH_INCREMENT, _)) => {
                return Err(Error::invalid_format(
                    "packed run",
                    format!("range end at word {} has no increment", pos + 1),
                ));
            }
            _ => {
                pos += 1;
                Some(Run::single(start))
            }
        };
        runs.extend(run);
    }
    Ok(runs)
}
