//! Inline formatter: one line of markup to an HTML fragment.
//!
//! Pass order is load-bearing:
//! 1. math tokenization (before escaping, or TeX operators get entity-mangled)
//! 2. code span tokenization (protected the same way, escaped once on restore)
//! 3. HTML escape of the remaining prose
//! 4. images
//! 5. bold before italic, so `**` is consumed before `*` can see it
//! 6. italic
//! 7. links
//! 8. code spans restored after every regex pass, then math tokens last
//!
//! Every rule is a best-effort substitution: unmatched delimiters stay
//! literal text rather than being an error.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::math;
use crate::utils::html;

/// Code span placeholder sentinel, same scheme as math tokens.
const MARK: char = '\u{1}';

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Image syntax, matched after escaping: the optional title's quotes have
/// already become `&quot;` by the time this runs.
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+&quot;([^&]+)&quot;)?\)"#).unwrap()
});

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

struct CodeToken {
    placeholder: String,
    content: String,
}

/// Lift `` `code` `` spans out of the working text before escaping.
fn protect_code(text: &str) -> (String, Vec<CodeToken>) {
    let mut tokens = Vec::new();
    let output = CODE_SPAN.replace_all(text, |caps: &Captures| {
        let placeholder = format!("{MARK}CODE{}{MARK}", tokens.len());
        tokens.push(CodeToken {
            placeholder: placeholder.clone(),
            content: caps[1].to_string(),
        });
        placeholder
    });
    (output.into_owned(), tokens)
}

/// Splice code spans back, escaping their content exactly once.
fn restore_code(text: &str, tokens: &[CodeToken]) -> String {
    let mut output = text.to_string();
    for token in tokens {
        let replacement = format!("<code>{}</code>", html::escape(&token.content));
        output = output.replacen(&token.placeholder, &replacement, 1);
    }
    output
}

/// Transform one line of text into an HTML fragment.
pub fn format(text: &str) -> String {
    let (text, math_tokens) = math::tokenize(text);
    let (text, code_tokens) = protect_code(&text);

    let mut output = html::escape(&text).into_owned();

    output = IMAGE
        .replace_all(&output, |caps: &Captures| {
            let alt = &caps[1];
            let src = &caps[2];
            match caps.get(3) {
                Some(title) => {
                    format!(r#"<img src="{src}" alt="{alt}" title="{}">"#, title.as_str())
                }
                None => format!(r#"<img src="{src}" alt="{alt}">"#),
            }
        })
        .into_owned();

    output = BOLD.replace_all(&output, "<strong>$1</strong>").into_owned();
    output = ITALIC.replace_all(&output, "<em>$1</em>").into_owned();
    output = LINK
        .replace_all(&output, r#"<a href="$2">$1</a>"#)
        .into_owned();

    let output = restore_code(&output, &code_tokens);
    math::restore(&output, &math_tokens)
}
