//! Resolution of deferred selections once the universe size is known.

use iterlist_common::{Result, error::Error};

use crate::{
    diagnostics::{DiagnosticKind, Diagnostics, Selector},
    list::{EditOutcome, IterationList, RandomRequest},
    prng::{MinimalStandard, SeedSequence},
    run::MAX_VALUE,
};

impl IterationList {
    /// Resolves pending selections against a universe of `universe` items
    /// starting at the list origin.
    ///
    /// Steps, in order:
    /// 1. block validation: stored elements outside
    ///    `[origin, origin + block)` are reported and dropped, where `block`
    ///    is the period length of a periodic list and `universe` otherwise,
    ///    cut short where it would pass [`MAX_VALUE`];
    /// 2. `ALL`, then `FIRST n`, then `LAST n`, each added as one range;
    /// 3. `RANDOM n`: single values drawn from the seeded generator until `n`
    ///    new elements were added or the block is full.
    ///
    /// Each pending request is cleared once processed, so finalizing again
    /// with the same universe is a no-op. Requests larger than the block are
    /// reported and ignored.
    ///
    /// Returns `Ok(false)` when any input error was reported, including an
    /// origin above [`MAX_VALUE`]. Finalizing a list again with a different
    /// universe is a fatal error.
    pub fn finalize(
        &mut self,
        universe: u64,
        label: &str,
        diags: &mut Diagnostics,
    ) -> Result<bool> {
        self.finalize_with(universe, label, diags, MinimalStandard::new)
    }

    /// [`IterationList::finalize`] with a caller-chosen generator for
    /// `RANDOM`.
    pub fn finalize_with<R, F>(
        &mut self,
        universe: u64,
        label: &str,
        diags: &mut Diagnostics,
        make_rng: F,
    ) -> Result<bool>
    where
        R: SeedSequence,
        F: FnOnce(u32) -> R,
    {
        match self.universe() {
            Some(previous) if previous != universe => {
                return Err(Error::fatal(
                    "finalize",
                    format!(
                        "list '{label}' was already checked against {previous} items, \
                         now {universe}"
                    ),
                ));
            }
            Some(_) if self.pending().is_empty() => return Ok(true),
            _ => {}
        }
        self.set_universe(universe);
        diags.begin_call();
        let errors_before = diags.errors().count();

        let origin = self.origin();
        if origin > MAX_VALUE {
            diags.input_error(
                label,
                None,
                DiagnosticKind::ValueTooLarge {
                    value: origin,
                    max: MAX_VALUE,
                },
            );
            return Ok(false);
        }
        let block = self
            .period()
            .map_or(universe, |period| period.length)
            .min(MAX_VALUE + 1 - origin);
        let limit = origin + block;
        self.drop_outside_block(origin, limit, label, diags)?;

        let pending = std::mem::take(self.pending_mut());
        let mut add_span = |list: &mut IterationList,
                            selector: Selector,
                            count: u64,
                            start: u64|
         -> Result<()> {
            if count > block {
                diags.input_error(
                    label,
                    None,
                    DiagnosticKind::SelectionExceedsUniverse {
                        selector,
                        count,
                        universe: block,
                    },
                );
            } else if count > 0 {
                let end = start + count - 1;
                match list.add(start, end, 1) {
                    Ok(_) => {}
                    Err(e) if !e.is_fatal() => diags.input_error(
                        label,
                        None,
                        DiagnosticKind::ValueTooLarge {
                            value: end,
                            max: MAX_VALUE,
                        },
                    ),
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        };
        if pending.all {
            add_span(self, Selector::All, block, origin)?;
        }
        if let Some(count) = pending.first {
            add_span(self, Selector::First, count, origin)?;
        }
        if let Some(count) = pending.last {
            add_span(self, Selector::Last, count, limit.saturating_sub(count))?;
        }
        if let Some(request) = pending.random {
            if request.count > block {
                diags.input_error(
                    label,
                    None,
                    DiagnosticKind::SelectionExceedsUniverse {
                        selector: Selector::Random,
                        count: request.count,
                        universe: block,
                    },
                );
            } else {
                let mut rng = make_rng(request.seed);
                self.resolve_random(request, origin, block, &mut rng, label, diags)?;
            }
        }

        Ok(diags.errors().count() == errors_before)
    }

    fn drop_outside_block(
        &mut self,
        origin: u64,
        limit: u64,
        label: &str,
        diags: &mut Diagnostics,
    ) -> Result<()> {
        if let Some(low) = self.lowest().filter(|&low| low < origin) {
            diags.input_error(
                label,
                None,
                DiagnosticKind::OutsideBlock {
                    value: low,
                    low: origin,
                    limit,
                },
            );
            self.delete(0, origin - 1)?;
        }
        if let Some(high) = self.highest().filter(|&high| high >= limit) {
            diags.input_error(
                label,
                None,
                DiagnosticKind::OutsideBlock {
                    value: high,
                    low: origin,
                    limit,
                },
            );
            self.delete(limit, high)?;
        }
        Ok(())
    }

    fn resolve_random<R: SeedSequence>(
        &mut self,
        request: RandomRequest,
        origin: u64,
        block: u64,
        rng: &mut R,
        label: &str,
        diags: &mut Diagnostics,
    ) -> Result<()> {
        let limit = origin + block;
        let mut remaining = request.count;
        // Every value the generator can produce is seen within one period.
        let mut draws_left = rng.period();
        while remaining > 0 {
            if self.count_below(limit) - self.count_below(origin) >= block {
                break;
            }
            if draws_left == 0 {
                diags.input_error(label, None, DiagnosticKind::RandomExhausted { remaining });
                break;
            }
            draws_left -= 1;
            let value = rng.next_value() as u64 % block + origin;
            if self.add_value(value)? == EditOutcome::Changed {
                remaining -= 1;
            }
        }
        log::debug!(
            "list '{label}': RANDOM {} resolved, seed now {}",
            request.count,
            rng.seed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_last_all() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(1);
        l.request_first(3);
        l.request_last(2);
        assert!(l.finalize(10, "cells", &mut diags).unwrap());
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![1, 2, 3, 9, 10]);
        assert!(l.pending().is_empty());

        let mut l = IterationList::new(0);
        l.request_all();
        assert!(l.finalize(5, "cells", &mut diags).unwrap());
        assert_eq!(l.to_string(), "(0-4)");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_oversized_selection_is_reported() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(1);
        l.request_first(11);
        l.request_last(1);
        assert!(!l.finalize(10, "cells", &mut diags).unwrap());
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![10]);
        assert_eq!(diags.errors().count(), 1);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(0);
        l.request_random(4, 99);
        assert!(l.finalize(50, "cells", &mut diags).unwrap());
        let once = l.clone();
        assert!(l.finalize(50, "cells", &mut diags).unwrap());
        assert_eq!(l, once);
        assert_eq!(l.len(), 4);
    }

    #[test]
    fn test_conflicting_universe_is_fatal() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(0);
        l.finalize(50, "cells", &mut diags).unwrap();
        assert!(l.finalize(60, "cells", &mut diags).unwrap_err().is_fatal());
    }

    #[test]
    fn test_values_outside_block_are_dropped() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(1);
        l.add(0, 3, 1).unwrap();
        l.add(12, 15, 1).unwrap();
        l.set_period(10).unwrap();
        assert!(!l.finalize(100, "cells", &mut diags).unwrap());
        assert_eq!(l.to_string(), "(1-3,EVERY 10)");
        assert_eq!(diags.errors().count(), 2);
    }

    #[test]
    fn test_random_fills_small_universe() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(0);
        l.request_random(5, 7);
        assert!(l.finalize(5, "cells", &mut diags).unwrap());
        assert_eq!(l.to_string(), "(0-4)");
    }

    #[test]
    fn test_periodic_selections_stay_in_block() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(1);
        l.add_value(2).unwrap();
        l.set_period(10).unwrap();
        l.request_last(3);
        l.request_random(2, 11);
        assert!(l.finalize(100, "cells", &mut diags).unwrap());
        assert_eq!(l.len(), 6);
        assert!(l.lowest().unwrap() >= 1);
        assert!(l.highest().unwrap() <= 10);
        for v in [2, 8, 9, 10, 12, 18, 20, 92, 100] {
            assert!(l.contains(v), "{v} in {l}");
        }
        assert_eq!(l.count_below(101), 60);
    }

    #[test]
    fn test_universe_past_max_is_cut_short() {
        let mut diags = Diagnostics::new();
        let origin = MAX_VALUE - 5;
        let mut l = IterationList::new(origin);
        l.request_random(3, 7);
        l.request_last(1);
        assert!(l.finalize(10, "cells", &mut diags).unwrap());
        assert_eq!(l.len(), 4);
        assert!(l.contains(MAX_VALUE));
        assert!(l.iter().all(|v| (origin..=MAX_VALUE).contains(&v)));
    }

    #[test]
    fn test_origin_past_max_is_reported() {
        let mut diags = Diagnostics::new();
        let mut l = IterationList::new(u64::MAX - 5);
        l.request_random(1, 7);
        assert!(!l.finalize(10, "cells", &mut diags).unwrap());
        assert!(l.is_empty());
        assert_eq!(
            diags.records()[0].kind,
            DiagnosticKind::ValueTooLarge {
                value: u64::MAX - 5,
                max: MAX_VALUE,
            }
        );
    }
}
