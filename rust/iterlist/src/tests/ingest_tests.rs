use crate::{
    DiagnosticKind, Diagnostics, IterationList, Selector, Severity,
    ingest::{Item, ListContext, Mode, apply_text, parse, scan},
};

fn ctx() -> ListContext<'static> {
    ListContext::new("cells", 1)
}

fn apply(list: Option<IterationList>, text: &str) -> (Option<IterationList>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let list = apply_text(list, text, &ctx(), &mut diags).unwrap();
    (list, diags)
}

fn kinds(diags: &Diagnostics) -> Vec<DiagnosticKind> {
    diags.records().iter().map(|d| d.kind.clone()).collect()
}

#[test]
fn test_parse_items() {
    let mut diags = Diagnostics::new();
    let text = "(add 4, 1-5, 16+4-32, 10-20+5 all first 2 seed=3 random 1 every 9)";
    let fields = scan(text, "t", &mut diags);
    let parsed = parse(fields, "t", &mut diags);
    assert!(diags.is_empty());
    assert_eq!(parsed.mode, Some(Mode::Add));
    let items: Vec<Item> = parsed.items.iter().map(|&(_, item)| item).collect();
    assert_eq!(
        items,
        vec![
            Item::Range { start: 4, end: 4, stride: 1 },
            Item::Range { start: 1, end: 5, stride: 1 },
            Item::Range { start: 16, end: 32, stride: 4 },
            Item::Range { start: 10, end: 20, stride: 5 },
            Item::All,
            Item::First(2),
            Item::Seed(3),
            Item::Random(1),
            Item::Every(9),
        ]
    );
    assert_eq!(parsed.items.last().map(|&(index, _)| index), Some(9));
}

#[test]
fn test_unparenthesized_item() {
    let (list, diags) = apply(None, "5-9");
    assert!(diags.is_empty());
    assert_eq!(list.unwrap().to_string(), "(5-9)");
}

#[test]
fn test_new_replaces_and_add_extends() {
    let (list, _) = apply(None, "(1-3)");
    let (list, _) = apply(list, "(ADD 10)");
    assert_eq!(list.as_ref().unwrap().to_string(), "(1-3,10)");
    let (list, _) = apply(list, "(20)");
    assert_eq!(list.unwrap().to_string(), "(20)");
}

#[test]
fn test_add_without_prior_list_starts_new() {
    let (list, diags) = apply(None, "(ADD 4)");
    assert!(diags.is_empty());
    assert_eq!(list.unwrap().to_string(), "(4)");
}

#[test]
fn test_off_none_and_bare_delete() {
    let prior = || apply(None, "(1-3)").0;
    assert_eq!(apply(prior(), "(OFF)").0, None);
    assert_eq!(apply(prior(), "(DEL)").0, None);
    let (list, _) = apply(prior(), "(NONE)");
    assert!(list.unwrap().is_empty());

    let (list, diags) = apply(prior(), "(OFF 5)");
    assert_eq!(list, None);
    assert_eq!(
        kinds(&diags),
        vec![DiagnosticKind::ItemsIgnored { mode: "OFF".to_string() }]
    );
}

#[test]
fn test_delete_from_absent_list() {
    let (list, diags) = apply(None, "(DEL 5, 6)");
    assert_eq!(list, None);
    assert_eq!(kinds(&diags), vec![DiagnosticKind::DeleteFromAbsentList]);
    assert_eq!(diags.records()[0].severity, Severity::Warning);
}

#[test]
fn test_delete_item_checks() {
    let prior = apply(None, "(1-20)").0;
    let (list, diags) = apply(prior, "(DEL 1-9+2, FIRST 3, 30, 15)");
    assert_eq!(list.unwrap().to_string(), "(1-14,16-20)");
    assert_eq!(
        kinds(&diags),
        vec![
            DiagnosticKind::StrideOnDelete { stride: 2 },
            DiagnosticKind::SelectorNotAllowed { selector: Selector::First },
            DiagnosticKind::DeleteNotFound { start: 30, end: 30 },
        ]
    );
    let items: Vec<Option<usize>> = diags.records().iter().map(|d| d.item).collect();
    assert_eq!(items, vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn test_redundant_add_reported_once_per_call() {
    let (list, diags) = apply(None, "(1-10, 2, 3-4)");
    assert_eq!(list.as_ref().unwrap().to_string(), "(1-10)");
    assert_eq!(
        kinds(&diags),
        vec![DiagnosticKind::RedundantAdd { start: 2, end: 2, stride: 1 }]
    );

    let mut diags = diags;
    let list = apply_text(list, "(ADD 5)", &ctx(), &mut diags).unwrap();
    assert!(list.is_some());
    assert_eq!(diags.warnings().count(), 2);
}

#[test]
fn test_bad_items_are_dropped() {
    let (list, diags) = apply(None, "(2, 5-3, 4+0-9, EVERY 0, 4611686018427387904, 8)");
    let list = list.unwrap();
    assert_eq!(list.to_string(), "(2,8)");
    assert_eq!(list.period(), None);
    assert_eq!(
        kinds(&diags),
        vec![
            DiagnosticKind::MalformedRange { start: 5, end: 3 },
            DiagnosticKind::ZeroStride { start: 4 },
            DiagnosticKind::ZeroPeriod,
            DiagnosticKind::ValueTooLarge {
                value: 1 << 62,
                max: crate::MAX_VALUE,
            },
        ]
    );
    assert_eq!(diags.errors().count(), 4);
}

#[test]
fn test_every_longer_than_universe_is_dropped() {
    let (list, diags) = apply(None, "(1-3, EVERY 18446744073709551615)");
    let list = list.unwrap();
    assert_eq!(list.to_string(), "(1-3)");
    assert_eq!(list.period(), None);
    assert_eq!(
        kinds(&diags),
        vec![DiagnosticKind::ValueTooLarge {
            value: u64::MAX,
            max: crate::MAX_VALUE,
        }]
    );
    assert_eq!(list.count_below(5), 3);
    assert_eq!(list.cursor(5).next(), None);
}

#[test]
fn test_mode_keyword_must_come_first() {
    let (list, diags) = apply(None, "(1, ADD 2)");
    assert_eq!(list.unwrap().to_string(), "(1-2)");
    assert_eq!(
        kinds(&diags),
        vec![DiagnosticKind::ModeNotFirst { keyword: "ADD".to_string() }]
    );
}

#[test]
fn test_selectors_after_all() {
    let (list, diags) = apply(None, "(ALL, FIRST 3, EVERY 4)");
    let list = list.unwrap();
    assert!(list.pending().all);
    assert_eq!(list.pending().first, None);
    assert_eq!(list.period(), None);
    assert_eq!(
        kinds(&diags),
        vec![
            DiagnosticKind::SelectorAfterAll { selector: Selector::First },
            DiagnosticKind::SelectorAfterAll { selector: Selector::Every },
        ]
    );
}

#[test]
fn test_seed_out_of_range() {
    let (list, diags) = apply(None, "(SEED=4294967296, RANDOM 2)");
    assert_eq!(list.unwrap().pending().random.map(|r| r.seed), Some(0));
    assert_eq!(
        kinds(&diags),
        vec![DiagnosticKind::ValueTooLarge {
            value: 1 << 32,
            max: u32::MAX as u64,
        }]
    );
}

#[test]
fn test_syntax_errors() {
    let (list, diags) = apply(None, "(1-5");
    assert_eq!(list.unwrap().to_string(), "(1-5)");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::UnbalancedParenthesis]);

    let (list, diags) = apply(None, "(3-, FROB) 7");
    assert!(list.unwrap().is_empty());
    assert_eq!(
        kinds(&diags),
        vec![
            DiagnosticKind::MissingValue { after: "-".to_string() },
            DiagnosticKind::UnexpectedToken { token: "FROB".to_string() },
            DiagnosticKind::UnexpectedToken { token: "7".to_string() },
        ]
    );
}

#[test]
fn test_display_reparses_to_same_list() {
    let text = "(1-3,9-10,16+4-32,EVERY 40,FIRST 2,LAST 1,SEED=5,RANDOM 3)";
    let (list, diags) = apply(None, text);
    assert!(diags.is_empty());
    let list = list.unwrap();
    assert_eq!(list.to_string(), text);
    let (again, _) = apply(None, &list.to_string());
    assert_eq!(again.unwrap(), list);
}

#[test]
fn test_finalize_after_ingest() {
    let (list, _) = apply(None, "(FIRST 3, LAST 2)");
    let mut list = list.unwrap();
    let mut diags = Diagnostics::new();
    assert!(list.finalize(10, "cells", &mut diags).unwrap());
    assert_eq!(list.to_string(), "(1-3,9-10)");
}
