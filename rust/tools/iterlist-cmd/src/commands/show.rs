//! Show command implementation

use anyhow::Result;
use iterlist::{Diagnostic, IterationList};
use serde::Serialize;

use crate::{
    commands::{ListArgs, build},
    utils,
};

#[derive(Serialize)]
struct ShowSummary<'a> {
    label: &'a str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    list: Option<&'a IterationList>,
    element_count: u64,
    elements: Vec<u64>,
    truncated: bool,
    diagnostics: &'a [Diagnostic],
}

/// Run the show command
pub fn run(args: &ListArgs, lists: &[String], limit: usize, json: bool) -> Result<()> {
    let built = build(args, lists)?;

    match &built.list {
        Some(list) if json => {
            let mut elements: Vec<u64> = list.iter().take(limit + 1).collect();
            let truncated = elements.len() > limit;
            elements.truncate(limit);
            let summary = ShowSummary {
                label: &args.label,
                text: list.to_string(),
                list: Some(list),
                element_count: list.len(),
                elements,
                truncated,
                diagnostics: built.diagnostics.records(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(list) => {
            println!("list '{}': {list}", args.label);
            println!("  runs: {}", list.run_count());
            if list.period().is_some() {
                println!("  elements per block: {}", list.len());
            } else {
                println!("  elements: {}", list.len());
            }
            if !list.is_empty() {
                println!("  {}", utils::format_elements(list.iter(), limit));
            }
        }
        None if json => {
            let summary = ShowSummary {
                label: &args.label,
                text: String::new(),
                list: None,
                element_count: 0,
                elements: Vec::new(),
                truncated: false,
                diagnostics: built.diagnostics.records(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => println!("list '{}' does not exist", args.label),
    }

    built.check(args)
}
