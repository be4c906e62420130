//! Block parser: line-oriented state machine over the raw article text.
//!
//! States are NORMAL, CODE_BLOCK, MATH_BLOCK and LIST(kind). Entering a
//! fenced state (code or math) closes any open list; blank lines close any
//! open list. Rules are evaluated top to bottom per line, first match wins.
//! The table rule is the one lookahead in the parser: it inspects the next
//! line for a divider row before committing, then consumes every following
//! `|` row.

use std::sync::LazyLock;

use regex::Regex;

use super::{inline, math};
use crate::utils::html;

/// Table divider row: cells of optional colons around three-or-more
/// hyphens, separated by `|`.
static TABLE_DIVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?(\s*:?-{3,}:?\s*\|)+\s*:?-{3,}:?\s*\|?\s*$").unwrap()
});

/// Open list kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Accumulates emitted HTML fragments plus the transient parse state.
struct BlockParser {
    html: String,
    list: Option<ListKind>,
    in_code_block: bool,
    in_math_block: bool,
    math_lines: Vec<String>,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            html: String::new(),
            list: None,
            in_code_block: false,
            in_math_block: false,
            math_lines: Vec::new(),
        }
    }

    fn close_list_if_open(&mut self) {
        if let Some(kind) = self.list.take() {
            self.html.push_str("</");
            self.html.push_str(kind.tag());
            self.html.push('>');
        }
    }

    fn close_math_block_if_open(&mut self) {
        if !self.in_math_block {
            return;
        }
        self.html.push_str(&math::display_block(&self.math_lines));
        self.in_math_block = false;
        self.math_lines.clear();
    }

    /// Open a list of `kind` unless one of that kind is already open.
    fn ensure_list(&mut self, kind: ListKind) {
        if self.list != Some(kind) {
            self.close_list_if_open();
            self.html.push('<');
            self.html.push_str(kind.tag());
            self.html.push('>');
            self.list = Some(kind);
        }
    }

    fn push_list_item(&mut self, kind: ListKind, text: &str) {
        self.ensure_list(kind);
        self.html.push_str("<li>");
        self.html.push_str(&inline::format(text));
        self.html.push_str("</li>");
    }

    /// Emit a table from `lines[start..]`. `lines[start]` is the header row
    /// and `lines[start + 1]` the divider. Returns the index of the last
    /// consumed line.
    fn push_table(&mut self, lines: &[&str], start: usize) -> usize {
        let header = parse_table_row(lines[start]);
        let mut index = start + 2;
        let mut body = Vec::new();
        while index < lines.len() && lines[index].trim().starts_with('|') {
            body.push(parse_table_row(lines[index]));
            index += 1;
        }

        self.html.push_str("<table><thead><tr>");
        for cell in header {
            self.html.push_str("<th>");
            self.html.push_str(&cell);
            self.html.push_str("</th>");
        }
        self.html.push_str("</tr></thead><tbody>");
        for row in body {
            self.html.push_str("<tr>");
            for cell in row {
                self.html.push_str("<td>");
                self.html.push_str(&cell);
                self.html.push_str("</td>");
            }
            self.html.push_str("</tr>");
        }
        self.html.push_str("</tbody></table>");

        index - 1
    }

    fn parse(mut self, markdown: &str) -> String {
        let normalized = markdown.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();

        let mut index = 0;
        while index < lines.len() {
            let raw_line = lines[index];
            let line = raw_line.trim();
            index += 1;

            // Rule 1: `$$` toggles the math block.
            if line == "$$" {
                self.close_list_if_open();
                if self.in_math_block {
                    self.close_math_block_if_open();
                } else {
                    self.in_math_block = true;
                    self.math_lines.clear();
                }
                continue;
            }

            // Rule 2: buffer raw lines inside the math block.
            if self.in_math_block {
                self.math_lines.push(raw_line.to_string());
                continue;
            }

            // Rule 3: fenced code marker toggles the code block.
            if line.starts_with("```") {
                self.close_list_if_open();
                if self.in_code_block {
                    self.in_code_block = false;
                    self.html.push_str("</code></pre>");
                } else {
                    self.in_code_block = true;
                    self.html.push_str("<pre><code>");
                }
                continue;
            }

            // Rule 4: code lines are escaped verbatim, whitespace preserved.
            if self.in_code_block {
                self.html.push_str(&html::escape(raw_line));
                self.html.push('\n');
                continue;
            }

            // Rule 5: blank line closes any open list.
            if line.is_empty() {
                self.close_list_if_open();
                continue;
            }

            // Rule 6: table (header row + divider lookahead).
            if line.starts_with('|')
                && index < lines.len()
                && TABLE_DIVIDER.is_match(lines[index])
            {
                self.close_list_if_open();
                index = self.push_table(&lines, index - 1) + 1;
                continue;
            }

            // Rule 7: heading.
            if let Some((level, text)) = heading(line) {
                self.close_list_if_open();
                self.html.push_str(&format!(
                    "<h{level}>{}</h{level}>",
                    inline::format(text)
                ));
                continue;
            }

            // Rule 8: horizontal rule.
            if is_horizontal_rule(line) {
                self.close_list_if_open();
                self.html.push_str("<hr>");
                continue;
            }

            // Rule 9: blockquote. Each `>` line is its own blockquote;
            // consecutive quote lines are deliberately not merged.
            if let Some(text) = blockquote_text(line) {
                self.close_list_if_open();
                self.html.push_str("<blockquote><p>");
                self.html.push_str(&inline::format(text));
                self.html.push_str("</p></blockquote>");
                continue;
            }

            // Rules 10/11: list items.
            if let Some(text) = unordered_item(line) {
                self.push_list_item(ListKind::Unordered, text);
                continue;
            }
            if let Some(text) = ordered_item(line) {
                self.push_list_item(ListKind::Ordered, text);
                continue;
            }

            // Rule 12: paragraph.
            self.close_list_if_open();
            self.html.push_str("<p>");
            self.html.push_str(&inline::format(line));
            self.html.push_str("</p>");
        }

        // End of input: close open structure. An unterminated math block
        // is flushed as display math; an unterminated code fence is
        // implicitly closed.
        self.close_list_if_open();
        self.close_math_block_if_open();
        if self.in_code_block {
            self.html.push_str("</code></pre>");
        }

        self.html
    }
}

/// Heading marker: 1-6 `#` characters followed by whitespace.
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    rest.starts_with(char::is_whitespace)
        .then(|| (level, rest.trim_start()))
}

/// A line of 3+ repeated `-` or `*` characters.
fn is_horizontal_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.bytes().all(|b| b == b'-') || line.bytes().all(|b| b == b'*'))
}

/// `> ` quote marker; requires whitespace after the `>`.
fn blockquote_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// `-` or `*` followed by whitespace.
fn unordered_item(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// Digits, `.`, whitespace.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// Split a `| a | b |` row into inline-formatted cells.
fn parse_table_row(line: &str) -> Vec<String> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|')
        .map(|cell| inline::format(cell.trim()))
        .collect()
}

/// Render raw article markdown to the full HTML body.
pub fn markdown_to_html(markdown: &str) -> String {
    BlockParser::new().parse(markdown)
}
