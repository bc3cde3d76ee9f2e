//! Terminal output: ANSI colour helpers, titled boxes, and Markdown
//! rendering for chat replies.
//!
//! Everything here returns `String`s; the binaries decide where to print.
//! Passing `color = false` yields plain text, which is what tests and
//! non-TTY output use.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthChar;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Column width of `s` on a terminal, ignoring ANSI escape sequences.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI: ESC [ params final-byte
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        width += char_width(c);
    }
    width
}

/// Terminal columns for one character; controls and combining marks are 0.
fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

// ── Boxes ────────────────────────────────────────────────────────────────────

/// Draw `body` inside a rounded box with `title` in the top border. The box
/// is only as wide as its content.
pub fn panel(title: &str, body: &str, color: bool) -> String {
    let title = if color { bold(title) } else { title.to_string() };
    let lines: Vec<&str> = if body.is_empty() {
        vec![""]
    } else {
        body.lines().collect()
    };

    let title_w = visible_width(&title);
    let inner = lines
        .iter()
        .map(|l| visible_width(l))
        .max()
        .unwrap_or(0)
        .max(title_w + 1);

    let mut out = String::new();
    out.push_str(&format!(
        "╭─ {title} {}╮\n",
        "─".repeat(inner - title_w - 1)
    ));
    for line in &lines {
        let pad = inner - visible_width(line);
        out.push_str(&format!("│ {line}{} │\n", " ".repeat(pad)));
    }
    out.push_str(&format!("╰{}╯", "─".repeat(inner + 2)));
    out
}

// ── Markdown ─────────────────────────────────────────────────────────────────

/// Render Markdown for the terminal.
///
/// Headings are bold cyan, `**strong**` bold, `*emphasis*` italic, inline
/// code yellow, fenced code indented and dimmed, lists bulleted or
/// numbered, block quotes prefixed with a bar. Markup characters are
/// removed.
pub fn render_markdown(markdown: &str, color: bool) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let mut r = Renderer::new(color);
    for event in Parser::new_ext(markdown, options) {
        r.event(event);
    }
    r.finish()
}

#[derive(Default)]
struct Style {
    strong: usize,
    emphasis: usize,
    strike: usize,
    heading: bool,
    link: bool,
}

impl Style {
    fn sgr(&self) -> String {
        let mut s = String::from("\x1b[0m");
        if self.strong > 0 || self.heading {
            s.push_str("\x1b[1m");
        }
        if self.emphasis > 0 {
            s.push_str("\x1b[3m");
        }
        if self.link {
            s.push_str("\x1b[4m");
        }
        if self.strike > 0 {
            s.push_str("\x1b[9m");
        }
        if self.heading {
            s.push_str("\x1b[36m");
        }
        s
    }
}

struct Renderer {
    out: String,
    color: bool,
    style: Style,
    /// Emit the current style before the next text.
    style_dirty: bool,
    /// One entry per open list: next number, or `None` for bullets.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
}

impl Renderer {
    fn new(color: bool) -> Self {
        Self {
            out: String::new(),
            color,
            style: Style::default(),
            style_dirty: false,
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_block_text(&text);
                } else {
                    self.text(&text);
                }
            }
            Event::Code(code) => {
                let code = if self.color {
                    format!("\x1b[33m{code}\x1b[0m")
                } else {
                    code.to_string()
                };
                self.text(&code);
                self.style_dirty = true;
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak | Event::HardBreak => self.line_break(),
            Event::Rule => {
                self.block_break();
                self.text(&"─".repeat(40));
                self.block_break();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.block_break();
                self.set_style(|s| s.heading = true);
            }
            Tag::BlockQuote(_) => {
                self.block_break();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.block_break();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.line_break();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_break();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{n}. ");
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                self.text(&format!("{indent}{marker}"));
            }
            Tag::Table(_) => self.block_break(),
            Tag::TableHead => self.set_style(|s| s.strong += 1),
            Tag::TableCell => {
                if !self.at_line_start() {
                    self.text(" │ ");
                }
            }
            Tag::Emphasis => self.set_style(|s| s.emphasis += 1),
            Tag::Strong => self.set_style(|s| s.strong += 1),
            Tag::Strikethrough => self.set_style(|s| s.strike += 1),
            Tag::Link { .. } => self.set_style(|s| s.link = true),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.line_break();
                }
            }
            TagEnd::Heading(_) => {
                self.set_style(|s| s.heading = false);
                self.block_break();
            }
            TagEnd::BlockQuote(..) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.block_break();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.block_break();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.block_break();
                }
            }
            TagEnd::Item => self.line_break(),
            TagEnd::Table => self.block_break(),
            TagEnd::TableHead => {
                self.set_style(|s| s.strong = s.strong.saturating_sub(1));
                self.line_break();
            }
            TagEnd::TableRow => self.line_break(),
            TagEnd::Emphasis => self.set_style(|s| s.emphasis = s.emphasis.saturating_sub(1)),
            TagEnd::Strong => self.set_style(|s| s.strong = s.strong.saturating_sub(1)),
            TagEnd::Strikethrough => self.set_style(|s| s.strike = s.strike.saturating_sub(1)),
            TagEnd::Link => self.set_style(|s| s.link = false),
            _ => {}
        }
    }

    fn set_style(&mut self, f: impl FnOnce(&mut Style)) {
        f(&mut self.style);
        self.style_dirty = true;
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn text(&mut self, text: &str) {
        if self.at_line_start() && self.quote_depth > 0 {
            let bars = "│ ".repeat(self.quote_depth);
            if self.color {
                self.out.push_str(&dim(&bars));
                self.style_dirty = true;
            } else {
                self.out.push_str(&bars);
            }
        }
        if self.color && self.style_dirty {
            self.out.push_str(&self.style.sgr());
            self.style_dirty = false;
        }
        self.out.push_str(text);
    }

    fn code_block_text(&mut self, text: &str) {
        for line in text.lines() {
            let line = format!("    {line}");
            if self.color {
                self.text(&dim(&line));
                self.style_dirty = true;
            } else {
                self.text(&line);
            }
            self.out.push('\n');
        }
    }

    fn line_break(&mut self) {
        if !self.at_line_start() {
            self.out.push('\n');
        }
    }

    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> String {
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if self.color && !self.out.is_empty() {
            self.out.push_str("\x1b[0m");
        }
        self.out
    }
}
