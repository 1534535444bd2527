//! Count command implementation

use anyhow::Result;

use crate::commands::{ListArgs, build};

/// Run the count command
pub fn run(args: &ListArgs, list: &str, value: u64, json: bool) -> Result<()> {
    let built = build(args, &[list.to_string()])?;
    let count = built.list_or_empty(args).count_below(value);

    if json {
        println!("{}", serde_json::json!({ "below": value, "count": count }));
    } else {
        println!("{count}");
    }

    built.check(args)
}
