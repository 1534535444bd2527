//! Splits list text into fields.

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// One delimited field of a list expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Int(u64),
    /// An upper-cased keyword.
    Word(String),
    Open,
    Close,
    Comma,
    Dash,
    Plus,
    /// The `SEED=` prefix.
    SeedEq,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Int(v) => write!(f, "{v}"),
            Field::Word(w) => f.write_str(w),
            Field::Open => f.write_str("("),
            Field::Close => f.write_str(")"),
            Field::Comma => f.write_str(","),
            Field::Dash => f.write_str("-"),
            Field::Plus => f.write_str("+"),
            Field::SeedEq => f.write_str("SEED="),
        }
    }
}

/// Scans `text` into fields.
///
/// Keywords are case-insensitive. Whitespace only separates fields.
/// Characters that cannot start a field, and integers too large for `u64`,
/// are reported against `label` and skipped.
pub fn scan(text: &str, label: &str, diags: &mut Diagnostics) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' | '-' | '+' => {
                chars.next();
                fields.push(match c {
                    '(' => Field::Open,
                    ')' => Field::Close,
                    ',' => Field::Comma,
                    '-' => Field::Dash,
                    _ => Field::Plus,
                });
            }
            c if c.is_ascii_digit() => {
                let mut end = pos;
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let digits = &text[pos..end];
                match digits.parse::<u64>() {
                    Ok(value) => fields.push(Field::Int(value)),
                    Err(_) => diags.input_error(
                        label,
                        None,
                        DiagnosticKind::UnexpectedToken {
                            token: digits.to_string(),
                        },
                    ),
                }
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = pos;
                while let Some(&(i, a)) = chars.peek() {
                    if !a.is_ascii_alphabetic() {
                        break;
                    }
                    end = i + a.len_utf8();
                    chars.next();
                }
                let word = text[pos..end].to_ascii_uppercase();
                if word == "SEED" && chars.peek().is_some_and(|&(_, c)| c == '=') {
                    chars.next();
                    fields.push(Field::SeedEq);
                } else {
                    fields.push(Field::Word(word));
                }
            }
            other => {
                chars.next();
                diags.input_error(
                    label,
                    None,
                    DiagnosticKind::UnexpectedToken {
                        token: other.to_string(),
                    },
                );
            }
        }
    }
    fields
}
