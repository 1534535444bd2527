//! Non-fatal problems found while building or finalizing a list.
//!
//! Input errors and warnings never abort list processing. They are
//! collected into a caller-owned [`Diagnostics`] sink, tagged with the list
//! label and the offending item, and forwarded to the `log` facade.

use std::mem::Discriminant;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Redundant or ineffective request; the list is left consistent.
    Warning,
    /// The offending item was dropped; remaining items were still applied.
    InputError,
}

/// A deferred selection keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Selector {
    First,
    Last,
    Random,
    Every,
    All,
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Selector::First => "FIRST",
            Selector::Last => "LAST",
            Selector::Random => "RANDOM",
            Selector::Every => "EVERY",
            Selector::All => "ALL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("{start}-{end} (stride {stride}) is already in the list")]
    RedundantAdd { start: u64, end: u64, stride: u64 },

    #[error("nothing to delete in {start}-{end}")]
    DeleteNotFound { start: u64, end: u64 },

    #[error("delete requested but there is no list to delete from")]
    DeleteFromAbsentList,

    #[error("range {start}-{end} ends below its start")]
    MalformedRange { start: u64, end: u64 },

    #[error("range starting at {start} has a zero stride")]
    ZeroStride { start: u64 },

    #[error("delete does not accept strided ranges (stride {stride})")]
    StrideOnDelete { stride: u64 },

    #[error("value {value} exceeds the largest storable value {max}")]
    ValueTooLarge { value: u64, max: u64 },

    #[error("{selector} {count} exceeds the {universe} available items")]
    SelectionExceedsUniverse {
        selector: Selector,
        count: u64,
        universe: u64,
    },

    #[error("{selector} is not allowed here")]
    SelectorNotAllowed { selector: Selector },

    #[error("{selector} cannot follow ALL")]
    SelectorAfterAll { selector: Selector },

    #[error("EVERY requires a positive block length")]
    ZeroPeriod,

    #[error("value {value} lies outside the block [{low}, {limit})")]
    OutsideBlock { value: u64, low: u64, limit: u64 },

    #[error("RANDOM gave up with {remaining} selections left")]
    RandomExhausted { remaining: u64 },

    #[error("mode keyword {keyword} must come first")]
    ModeNotFirst { keyword: String },

    #[error("unexpected '{token}'")]
    UnexpectedToken { token: String },

    #[error("missing value after '{after}'")]
    MissingValue { after: String },

    #[error("missing closing parenthesis")]
    UnbalancedParenthesis,

    #[error("items after {mode} are ignored")]
    ItemsIgnored { mode: String },
}

impl DiagnosticKind {
    /// Kinds reported at most once per list-processing call.
    fn once_per_call(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::RedundantAdd { .. }
                | DiagnosticKind::DeleteNotFound { .. }
                | DiagnosticKind::DeleteFromAbsentList
        )
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Identity of the list being processed.
    pub label: String,
    /// 1-based item number within the list text, when the problem is tied to
    /// one item.
    pub item: Option<usize>,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::InputError => "error",
        };
        write!(f, "{severity}: list '{}'", self.label)?;
        if let Some(item) = self.item {
            write!(f, ", item {item}")?;
        }
        write!(f, ": {}", self.kind)
    }
}

/// Collects diagnostics across list-processing calls.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    reported_this_call: Vec<Discriminant<DiagnosticKind>>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Marks the start of a new user-visible list-processing call.
    ///
    /// Warnings limited to one report per call may be reported again after
    /// this.
    pub fn begin_call(&mut self) {
        self.reported_this_call.clear();
    }

    pub fn warn(&mut self, label: &str, item: Option<usize>, kind: DiagnosticKind) {
        self.push(Severity::Warning, label, item, kind);
    }

    pub fn input_error(&mut self, label: &str, item: Option<usize>, kind: DiagnosticKind) {
        self.push(Severity::InputError, label, item, kind);
    }

    fn push(&mut self, severity: Severity, label: &str, item: Option<usize>, kind: DiagnosticKind) {
        if kind.once_per_call() {
            let discriminant = std::mem::discriminant(&kind);
            if self.reported_this_call.contains(&discriminant) {
                return;
            }
            self.reported_this_call.push(discriminant);
        }
        let diagnostic = Diagnostic {
            severity,
            label: label.to_string(),
            item,
            kind,
        };
        match severity {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::InputError => log::error!("{diagnostic}"),
        }
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records
            .iter()
            .filter(|d| d.severity == Severity::InputError)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}
