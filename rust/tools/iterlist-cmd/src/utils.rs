//! Common utilities for iterlist-cmd

use anyhow::{Context, Result};
use std::path::Path;

/// Reads list expressions from a file, one per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn read_list_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file: {}", path.display()))?;
    Ok(parse_list_lines(&text))
}

fn parse_list_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Formats elements for display, eliding those past `limit`.
pub fn format_elements(elements: impl Iterator<Item = u64>, limit: usize) -> String {
    let mut shown: Vec<String> = Vec::new();
    let mut more = false;
    for (i, value) in elements.enumerate() {
        if i == limit {
            more = true;
            break;
        }
        shown.push(value.to_string());
    }
    if more {
        shown.push("...".to_string());
    }
    shown.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_lines() {
        let lines = parse_list_lines("# header\n(1-5)\n\n   (ADD 9)  \n#(DEL 3)\n");
        assert_eq!(lines, vec!["(1-5)", "(ADD 9)"]);
    }

    #[test]
    fn test_format_elements() {
        assert_eq!(format_elements([1u64, 2, 3].into_iter(), 5), "1 2 3");
        assert_eq!(format_elements([1u64, 2, 3].into_iter(), 2), "1 2 ...");
        assert_eq!(format_elements(std::iter::empty(), 2), "");
        assert_eq!(format_elements(0u64.., 3), "0 1 2 ...");
    }
}
