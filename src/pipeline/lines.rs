//! Line classification and the block-equation accumulator.
//!
//! [`classify_line`] is a pure function of one trimmed line and whether an
//! equation is currently open. [`EquationAccumulator`] holds the lines of an
//! open `$$ … $$` group. Neither touches the network.

use crate::blocks::HeadingLevel;
use once_cell::sync::Lazy;
use regex::Regex;

/// Markers recognised as headings, deepest first so `### ` is not read as
/// `# ` with leftovers.
const HEADING_MARKERS: [(&str, usize); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

/// Line that opens or closes a display equation.
pub const EQUATION_DELIMITER: &str = "$$";

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!\[(.*?)\]\((.*?)\)").unwrap());

static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Split text into lines on `\n`, `\r\n` or a lone `\r`, terminators
/// removed. A final terminator does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    if text.ends_with(['\n', '\r']) {
        lines.pop();
    }
    lines
}

/// What a single line means to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Heading { level: HeadingLevel, text: &'a str },
    EquationDelimiter,
    EquationBody(&'a str),
    Image { alt: &'a str, target: &'a str },
    Paragraph(&'a str),
    Blank,
}

/// Classify an already-trimmed line.
///
/// Precedence: heading, `$$` delimiter, open-equation body, image,
/// paragraph. Headings are recognised even inside an open equation; blank
/// lines inside an open equation belong to the equation.
pub fn classify_line(line: &str, in_equation: bool) -> LineKind<'_> {
    for (marker, depth) in HEADING_MARKERS {
        if let Some(text) = line.strip_prefix(marker) {
            if let Some(level) = HeadingLevel::from_depth(depth) {
                return LineKind::Heading { level, text };
            }
        }
    }

    if line == EQUATION_DELIMITER {
        return LineKind::EquationDelimiter;
    }

    if in_equation {
        return LineKind::EquationBody(line);
    }

    if let Some(caps) = RE_IMAGE.captures(line) {
        let alt = caps.get(1).map_or("", |m| m.as_str());
        let target = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::Image { alt, target };
    }

    if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph(line)
    }
}

/// Lines collected between two `$$` delimiters.
#[derive(Debug, Default)]
pub struct EquationAccumulator {
    lines: Option<Vec<String>>,
    /// 1-indexed line number of the opening delimiter.
    opened_at: usize,
}

impl EquationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.lines.is_some()
    }

    pub fn opened_at(&self) -> Option<usize> {
        self.lines.as_ref().map(|_| self.opened_at)
    }

    /// Handle a `$$` line. Opens an empty accumulator, or closes the open one
    /// and returns the expression.
    pub fn toggle(&mut self, line_no: usize) -> Option<String> {
        match self.lines.take() {
            Some(lines) => Some(lines.join("\n")),
            None => {
                self.lines = Some(Vec::new());
                self.opened_at = line_no;
                None
            }
        }
    }

    /// Append a body line. Ignored when no equation is open.
    pub fn push(&mut self, line: &str) {
        if let Some(lines) = self.lines.as_mut() {
            lines.push(line.to_string());
        }
    }

    /// Drain an unterminated equation at end of input.
    pub fn finish(&mut self) -> Option<String> {
        self.lines.take().map(|lines| lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_accepts_every_line_ending() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("# Title\rSome text\r"), vec!["# Title", "Some text"]);
    }

    #[test]
    fn split_lines_keeps_inner_blank_lines() {
        assert_eq!(split_lines("a\r\rb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn heading_levels_match_marker_depth() {
        for (line, depth, text) in [
            ("# Title", 1, "Title"),
            ("## Section two", 2, "Section two"),
            ("### Deep #3", 3, "Deep #3"),
        ] {
            match classify_line(line, false) {
                LineKind::Heading { level, text: t } => {
                    assert_eq!(level.depth(), depth, "{line}");
                    assert_eq!(t, text);
                }
                other => panic!("{line}: expected heading, got {other:?}"),
            }
        }
    }

    #[test]
    fn four_hashes_is_a_paragraph() {
        assert_eq!(
            classify_line("#### too deep", false),
            LineKind::Paragraph("#### too deep")
        );
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        assert_eq!(classify_line("#tag", false), LineKind::Paragraph("#tag"));
    }

    #[test]
    fn delimiter_only_when_exact() {
        assert_eq!(classify_line("$$", false), LineKind::EquationDelimiter);
        assert_eq!(classify_line("$$", true), LineKind::EquationDelimiter);
        assert_eq!(
            classify_line("$$x$$", false),
            LineKind::Paragraph("$$x$$")
        );
    }

    #[test]
    fn open_equation_swallows_images_and_blanks() {
        assert_eq!(
            classify_line("![a](b.png)", true),
            LineKind::EquationBody("![a](b.png)")
        );
        assert_eq!(classify_line("", true), LineKind::EquationBody(""));
    }

    #[test]
    fn heading_wins_inside_equation() {
        assert!(matches!(
            classify_line("# x", true),
            LineKind::Heading { .. }
        ));
    }

    #[test]
    fn image_reference_is_captured() {
        assert_eq!(
            classify_line("![A cat](./cat.png)", false),
            LineKind::Image {
                alt: "A cat",
                target: "./cat.png"
            }
        );
        assert_eq!(
            classify_line("![](https://x.y/z.png) trailing", false),
            LineKind::Image {
                alt: "",
                target: "https://x.y/z.png"
            }
        );
    }

    #[test]
    fn image_must_start_the_line() {
        assert!(matches!(
            classify_line("see ![a](b.png)", false),
            LineKind::Paragraph(_)
        ));
    }

    #[test]
    fn blank_outside_equation() {
        assert_eq!(classify_line("", false), LineKind::Blank);
    }

    #[test]
    fn accumulator_joins_lines_on_close() {
        let mut acc = EquationAccumulator::new();
        assert_eq!(acc.toggle(3), None);
        assert!(acc.is_open());
        assert_eq!(acc.opened_at(), Some(3));
        acc.push("a = b");
        acc.push("c = d");
        assert_eq!(acc.toggle(6).as_deref(), Some("a = b\nc = d"));
        assert!(!acc.is_open());
        assert_eq!(acc.finish(), None);
    }

    #[test]
    fn accumulator_finish_drains_unterminated() {
        let mut acc = EquationAccumulator::new();
        acc.toggle(1);
        acc.push("x");
        assert_eq!(acc.finish().as_deref(), Some("x"));
        assert!(!acc.is_open());
    }

    #[test]
    fn push_without_open_is_ignored() {
        let mut acc = EquationAccumulator::new();
        acc.push("stray");
        assert_eq!(acc.toggle(1), None);
        assert_eq!(acc.toggle(2).as_deref(), Some(""));
    }
}
