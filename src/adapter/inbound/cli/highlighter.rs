//! SQL keyword highlighting for the shell.
//!
//! Three disjoint word classes are matched case-insensitively over the
//! whole input on every edit.

use std::borrow::Cow;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use regex::Regex;

/// Word class recognized by the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Statement and clause keywords.
    Keyword,
    /// Column type names.
    Type,
    /// Control-flow words.
    Control,
}

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "CREATE",
    "TABLE", "DROP", "ORDER", "BY", "ASC", "DESC", "LIMIT", "PRIMARY", "KEY",
];
const TYPES: &[&str] = &["INTEGER", "TEXT", "REAL", "BLOB", "NUMERIC"];
const CONTROL: &[&str] = &["IF", "ELSE", "BEGIN", "END"];

fn word_pattern(words: &[&str]) -> Regex {
    let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
    // The word lists are fixed ASCII identifiers.
    Regex::new(&pattern).unwrap_or_else(|e| unreachable!("invalid keyword pattern: {e}"))
}

fn rules() -> &'static [(TokenClass, Regex)] {
    static RULES: OnceLock<Vec<(TokenClass, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            (TokenClass::Keyword, word_pattern(KEYWORDS)),
            (TokenClass::Type, word_pattern(TYPES)),
            (TokenClass::Control, word_pattern(CONTROL)),
        ]
    })
}

/// Byte ranges of every recognized word, in text order.
pub fn classify(text: &str) -> Vec<(std::ops::Range<usize>, TokenClass)> {
    let mut spans: Vec<_> = rules()
        .iter()
        .flat_map(|(class, regex)| regex.find_iter(text).map(move |m| (m.range(), *class)))
        .collect();
    spans.sort_by_key(|(range, _)| range.start);
    spans
}

/// Wrap recognized words in ANSI colors.
pub fn paint(text: &str) -> Cow<'_, str> {
    let spans = classify(text);
    if spans.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + spans.len() * 12);
    let mut cursor = 0;
    for (range, class) in spans {
        out.push_str(&text[cursor..range.start]);
        let word = &text[range.clone()];
        let styled = match class {
            TokenClass::Keyword => word.blue().bold().to_string(),
            TokenClass::Type => word.green().to_string(),
            TokenClass::Control => word.yellow().to_string(),
        };
        out.push_str(&styled);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    Cow::Owned(out)
}
