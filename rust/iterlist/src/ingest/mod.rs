//! The textual list form.
//!
//! ```text
//! list  := '(' [ mode ] item (',' item)* ')' | item
//! mode  := NEW | ADD | DEL | OFF | NONE
//! item  := value | value '-' value [ '+' value ] | value '+' value '-' value
//!        | ALL | FIRST value | LAST value | RANDOM value | EVERY value
//!        | SEED= value
//! ```
//!
//! Parsing never fails: malformed items are reported to the diagnostics sink
//! and skipped, and the remaining items are still applied.

mod fields;
pub mod scan;

use iterlist_common::Result;

use crate::{
    diagnostics::{DiagnosticKind, Diagnostics, Selector},
    list::{EditOutcome, IterationList},
    run::MAX_VALUE,
};
use fields::FieldStream;
pub use scan::{Field, scan};

/// How the items of a list combine with a prior list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Replace the prior list. The default when no mode is given.
    New,
    /// Add to the prior list, or start a new one if there is none.
    Add,
    /// Delete from the prior list. `(DEL)` with no items destroys it.
    Delete,
    /// Destroy the list.
    Off,
    /// An explicitly empty list.
    None,
}

impl Mode {
    fn from_keyword(word: &str) -> Option<Mode> {
        Some(match word {
            "NEW" => Mode::New,
            "ADD" => Mode::Add,
            "DEL" => Mode::Delete,
            "OFF" => Mode::Off,
            "NONE" => Mode::None,
            _ => return None,
        })
    }

    fn keyword(self) -> &'static str {
        match self {
            Mode::New => "NEW",
            Mode::Add => "ADD",
            Mode::Delete => "DEL",
            Mode::Off => "OFF",
            Mode::None => "NONE",
        }
    }
}

/// One parsed list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// A value (`start == end`, `stride == 1`) or a range.
    Range { start: u64, end: u64, stride: u64 },
    All,
    First(u64),
    Last(u64),
    Random(u64),
    Every(u64),
    Seed(u64),
}

/// A parsed list: its mode and its items with their 1-based item numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub mode: Option<Mode>,
    pub items: Vec<(usize, Item)>,
}

/// Per-call settings for building a list.
#[derive(Debug, Clone, Copy)]
pub struct ListContext<'a> {
    /// Identity of the list in diagnostics.
    pub label: &'a str,
    /// Base value of the universe for new lists.
    pub origin: u64,
    /// Seed for `RANDOM` unless the list sets one with `SEED=`.
    pub seed: u32,
}

impl<'a> ListContext<'a> {
    pub fn new(label: &'a str, origin: u64) -> ListContext<'a> {
        ListContext {
            label,
            origin,
            seed: 0,
        }
    }

    pub fn with_seed(self, seed: u32) -> ListContext<'a> {
        ListContext { seed, ..self }
    }
}

/// Parses fields into a mode and items.
pub fn parse(
    fields: impl IntoIterator<Item = Field>,
    label: &str,
    diags: &mut Diagnostics,
) -> ParsedList {
    let mut stream = FieldStream::new(fields.into_iter());
    let parenthesized = stream.eat(&Field::Open);
    let mut parsed = ParsedList::default();
    if let Some(Field::Word(word)) = stream.peek() {
        if let Some(mode) = Mode::from_keyword(word) {
            parsed.mode = Some(mode);
            stream.next();
        }
    }

    let mut closed = false;
    let mut index = 0;
    while let Some(field) = stream.next() {
        match field {
            Field::Comma => {}
            Field::Close if parenthesized => {
                closed = true;
                break;
            }
            Field::Int(start) => {
                index += 1;
                if let Some(item) = parse_range(start, &mut stream, label, index, diags) {
                    parsed.items.push((index, item));
                }
            }
            Field::SeedEq => {
                index += 1;
                match stream.next_int() {
                    Some(seed) => parsed.items.push((index, Item::Seed(seed))),
                    None => missing_value(diags, label, index, "SEED="),
                }
            }
            Field::Word(word) => {
                index += 1;
                if Mode::from_keyword(&word).is_some() {
                    let kind = DiagnosticKind::ModeNotFirst { keyword: word };
                    diags.input_error(label, Some(index), kind);
                    continue;
                }
                let make: fn(u64) -> Item = match word.as_str() {
                    "ALL" => {
                        parsed.items.push((index, Item::All));
                        continue;
                    }
                    "FIRST" => Item::First,
                    "LAST" => Item::Last,
                    "RANDOM" => Item::Random,
                    "EVERY" => Item::Every,
                    _ => {
                        let kind = DiagnosticKind::UnexpectedToken { token: word };
                        diags.input_error(label, Some(index), kind);
                        continue;
                    }
                };
                match stream.next_int() {
                    Some(value) => parsed.items.push((index, make(value))),
                    None => missing_value(diags, label, index, &word),
                }
            }
            other => {
                diags.input_error(
                    label,
                    Some(index + 1),
                    DiagnosticKind::UnexpectedToken {
                        token: other.to_string(),
                    },
                );
            }
        }
    }
    if parenthesized && !closed {
        diags.input_error(label, None, DiagnosticKind::UnbalancedParenthesis);
    }
    for trailing in stream {
        diags.input_error(
            label,
            None,
            DiagnosticKind::UnexpectedToken {
                token: trailing.to_string(),
            },
        );
    }
    parsed
}

fn missing_value(diags: &mut Diagnostics, label: &str, index: usize, after: &str) {
    diags.input_error(
        label,
        Some(index),
        DiagnosticKind::MissingValue {
            after: after.to_string(),
        },
    );
}

/// Parses the rest of a range whose first value was `start`:
/// `start`, `start-end`, `start-end+stride` or `start+stride-end`.
fn parse_range<I: Iterator<Item = Field>>(
    start: u64,
    stream: &mut FieldStream<I>,
    label: &str,
    index: usize,
    diags: &mut Diagnostics,
) -> Option<Item> {
    let expect = |stream: &mut FieldStream<I>, diags: &mut Diagnostics, after: &str| {
        let value = stream.next_int();
        if value.is_none() {
            missing_value(diags, label, index, after);
        }
        value
    };
    let (end, stride) = if stream.eat(&Field::Dash) {
        let end = expect(stream, diags, "-")?;
        let stride = if stream.eat(&Field::Plus) {
            expect(stream, diags, "+")?
        } else {
            1
        };
        (end, stride)
    } else if stream.eat(&Field::Plus) {
        let stride = expect(stream, diags, "+")?;
        if !stream.eat(&Field::Dash) {
            missing_value(diags, label, index, &format!("{start}+{stride}"));
            return None;
        }
        (expect(stream, diags, "-")?, stride)
    } else {
        (start, 1)
    };
    Some(Item::Range { start, end, stride })
}

/// Checks a range item, reporting why it cannot be applied.
fn check_range(start: u64, end: u64, stride: u64) -> std::result::Result<(), DiagnosticKind> {
    if end < start {
        Err(DiagnosticKind::MalformedRange { start, end })
    } else if stride == 0 {
        Err(DiagnosticKind::ZeroStride { start })
    } else if end > MAX_VALUE {
        Err(DiagnosticKind::ValueTooLarge {
            value: end,
            max: MAX_VALUE,
        })
    } else {
        Ok(())
    }
}

/// Applies a parsed list to `list`, returning the resulting list (`None`
/// when the list was destroyed or never existed).
///
/// Only fatal storage errors are returned as `Err`; everything else is
/// reported to `diags` and the best list that could be built is returned.
pub fn apply(
    list: Option<IterationList>,
    parsed: &ParsedList,
    ctx: &ListContext,
    diags: &mut Diagnostics,
) -> Result<Option<IterationList>> {
    diags.begin_call();
    let mode = parsed.mode.unwrap_or(Mode::New);
    let label = ctx.label;
    match mode {
        Mode::Off | Mode::None => {
            if !parsed.items.is_empty() {
                diags.input_error(
                    label,
                    None,
                    DiagnosticKind::ItemsIgnored {
                        mode: mode.keyword().to_string(),
                    },
                );
            }
            Ok((mode == Mode::None).then(|| IterationList::new(ctx.origin)))
        }
        Mode::Delete => {
            if parsed.items.is_empty() {
                return Ok(None);
            }
            let Some(mut list) = list else {
                diags.warn(label, None, DiagnosticKind::DeleteFromAbsentList);
                return Ok(None);
            };
            for &(index, item) in &parsed.items {
                apply_delete(&mut list, index, item, label, diags)?;
            }
            Ok(Some(list))
        }
        Mode::New | Mode::Add => {
            let mut list = match list {
                Some(prior) if mode == Mode::Add => prior,
                _ => IterationList::new(ctx.origin),
            };
            let mut seed = ctx.seed;
            for &(index, item) in &parsed.items {
                apply_add(&mut list, index, item, &mut seed, label, diags)?;
            }
            Ok(Some(list))
        }
    }
}

fn apply_add(
    list: &mut IterationList,
    index: usize,
    item: Item,
    seed: &mut u32,
    label: &str,
    diags: &mut Diagnostics,
) -> Result<()> {
    let at = Some(index);
    let (selector, count) = match item {
        Item::Range { start, end, stride } => {
            if let Err(kind) = check_range(start, end, stride) {
                diags.input_error(label, at, kind);
                return Ok(());
            }
            if list.add(start, end, stride)? == EditOutcome::Unchanged {
                diags.warn(label, at, DiagnosticKind::RedundantAdd { start, end, stride });
            }
            return Ok(());
        }
        Item::Seed(value) => {
            match u32::try_from(value) {
                Ok(value) => *seed = value,
                Err(_) => diags.input_error(
                    label,
                    at,
                    DiagnosticKind::ValueTooLarge {
                        value,
                        max: u32::MAX as u64,
                    },
                ),
            }
            return Ok(());
        }
        Item::All => {
            list.request_all();
            return Ok(());
        }
        Item::First(count) => (Selector::First, count),
        Item::Last(count) => (Selector::Last, count),
        Item::Random(count) => (Selector::Random, count),
        Item::Every(length) => (Selector::Every, length),
    };
    if list.pending().all {
        diags.input_error(label, at, DiagnosticKind::SelectorAfterAll { selector });
        return Ok(());
    }
    match selector {
        Selector::First => list.request_first(count),
        Selector::Last => list.request_last(count),
        Selector::Random => list.request_random(count, *seed),
        Selector::Every if count == 0 => {
            diags.input_error(label, at, DiagnosticKind::ZeroPeriod);
        }
        Selector::Every if count > list.longest_period() => {
            let max = list.longest_period();
            diags.input_error(label, at, DiagnosticKind::ValueTooLarge { value: count, max });
        }
        Selector::Every => list.set_period(count)?,
        Selector::All => list.request_all(),
    }
    Ok(())
}

fn apply_delete(
    list: &mut IterationList,
    index: usize,
    item: Item,
    label: &str,
    diags: &mut Diagnostics,
) -> Result<()> {
    let at = Some(index);
    let (start, end, stride) = match item {
        Item::Range { start, end, stride } => (start, end, stride),
        Item::Seed(_) => return Ok(()),
        Item::All => return not_allowed(label, at, diags, Selector::All),
        Item::First(_) => return not_allowed(label, at, diags, Selector::First),
        Item::Last(_) => return not_allowed(label, at, diags, Selector::Last),
        Item::Random(_) => return not_allowed(label, at, diags, Selector::Random),
        Item::Every(_) => return not_allowed(label, at, diags, Selector::Every),
    };
    if let Err(kind) = check_range(start, end, stride) {
        diags.input_error(label, at, kind);
        return Ok(());
    }
    if stride != 1 {
        diags.input_error(label, at, DiagnosticKind::StrideOnDelete { stride });
        return Ok(());
    }
    if list.delete(start, end)? == EditOutcome::Unchanged {
        diags.warn(label, at, DiagnosticKind::DeleteNotFound { start, end });
    }
    Ok(())
}

fn not_allowed(
    label: &str,
    at: Option<usize>,
    diags: &mut Diagnostics,
    selector: Selector,
) -> Result<()> {
    diags.input_error(label, at, DiagnosticKind::SelectorNotAllowed { selector });
    Ok(())
}

/// Scans, parses and applies list text in one call.
pub fn apply_text(
    list: Option<IterationList>,
    text: &str,
    ctx: &ListContext,
    diags: &mut Diagnostics,
) -> Result<Option<IterationList>> {
    let fields = scan(text, ctx.label, diags);
    let parsed = parse(fields, ctx.label, diags);
    apply(list, &parsed, ctx, diags)
}
