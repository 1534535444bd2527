//! Command implementations for iterlist-cmd

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use iterlist::{
    Diagnostics, IterationList,
    ingest::{ListContext, apply_text},
};

use crate::utils;

pub mod count;
pub mod pack;
pub mod show;

/// Options shared by every command that builds a list.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// File of list expressions, one per line, applied before the command line lists
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// First value of the universe
    #[arg(long, default_value_t = 1)]
    pub origin: u64,

    /// Seed for RANDOM selections without a SEED= item
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Universe size; resolves FIRST, LAST, RANDOM and ALL
    #[arg(short, long)]
    pub universe: Option<u64>,

    /// Name of the list in diagnostics
    #[arg(long, default_value = "list")]
    pub label: String,
}

/// A list built from the command line, with everything reported on the way.
pub struct BuiltList {
    pub list: Option<IterationList>,
    pub diagnostics: Diagnostics,
}

impl BuiltList {
    /// The list, or an empty one when it was never created or was destroyed.
    pub fn list_or_empty(&self, args: &ListArgs) -> IterationList {
        self.list
            .clone()
            .unwrap_or_else(|| IterationList::new(args.origin))
    }

    /// Fails when any input error was reported. Warnings were already
    /// logged and do not affect the outcome.
    pub fn check(&self, args: &ListArgs) -> Result<()> {
        let errors = self.diagnostics.errors().count();
        if errors > 0 {
            anyhow::bail!("{errors} input error(s) in list '{}'", args.label);
        }
        Ok(())
    }
}

/// Applies the list file and then `lists` in order, and finalizes the result
/// when a universe size was given.
pub fn build(args: &ListArgs, lists: &[String]) -> Result<BuiltList> {
    let ctx = ListContext::new(&args.label, args.origin).with_seed(args.seed);
    let mut diagnostics = Diagnostics::new();
    let mut list = None;

    let mut expressions = Vec::new();
    if let Some(path) = &args.file {
        expressions = utils::read_list_file(path)?;
        log::info!("{}: {} list expressions", path.display(), expressions.len());
    }
    expressions.extend(lists.iter().cloned());

    for text in &expressions {
        list = apply_text(list, text, &ctx, &mut diagnostics)
            .with_context(|| format!("Failed to apply list expression: {text}"))?;
    }

    if let (Some(universe), Some(list)) = (args.universe, list.as_mut()) {
        list.finalize(universe, &args.label, &mut diagnostics)
            .with_context(|| format!("Failed to finalize list '{}'", args.label))?;
    }

    Ok(BuiltList { list, diagnostics })
}
