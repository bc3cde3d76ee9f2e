//! Inline tokenizer: split one paragraph line into [`RichSpan`]s.
//!
//! A single alternation pattern is scanned left to right. Alternatives are
//! tried in priority order at each position, so `$$…$$` wins over `$…$`,
//! which wins over `**…**`. All three are non-greedy.
//!
//! | Match        | Span                                          |
//! |--------------|-----------------------------------------------|
//! | `$$…$$`      | `PlainText`, delimiters kept                  |
//! | `$…$`        | `InlineEquation`, delimiters stripped         |
//! | `**…**`      | `BoldText`, delimiters stripped               |
//! | between/tail | `PlainText`                                   |
//!
//! Display math is recognised per line by the parser (a line of exactly
//! `$$`), never inside a paragraph, hence the literal passthrough above.

use crate::blocks::RichSpan;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$.*?\$\$|\$.*?\$|\*\*.*?\*\*").unwrap());

/// Tokenize `line` into spans, preserving order.
pub fn split_spans(line: &str) -> Vec<RichSpan> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for m in RE_INLINE.find_iter(line) {
        if m.start() > last_end {
            spans.push(RichSpan::PlainText(line[last_end..m.start()].to_string()));
        }
        spans.push(classify(m.as_str()));
        last_end = m.end();
    }

    if last_end < line.len() {
        spans.push(RichSpan::PlainText(line[last_end..].to_string()));
    }

    spans
}

fn classify(token: &str) -> RichSpan {
    if token.starts_with("$$") && token.ends_with("$$") {
        RichSpan::PlainText(token.to_string())
    } else if let Some(expr) = token.strip_prefix('$').and_then(|t| t.strip_suffix('$')) {
        RichSpan::InlineEquation(expr.to_string())
    } else if let Some(bold) = token.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
        RichSpan::BoldText(bold.to_string())
    } else {
        RichSpan::PlainText(token.to_string())
    }
}
