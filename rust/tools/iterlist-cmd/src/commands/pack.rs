//! Pack command implementation

use anyhow::{Context, Result};

use crate::commands::{ListArgs, build};

/// Run the pack command
pub fn run(args: &ListArgs, list: &str, json: bool) -> Result<()> {
    let built = build(args, &[list.to_string()])?;
    let words = built
        .list_or_empty(args)
        .to_words()
        .context("Failed to pack list")?;

    if json {
        println!("{}", serde_json::to_string(&words)?);
    } else {
        for word in &words {
            println!("{word:#018x}");
        }
    }

    built.check(args)
}
