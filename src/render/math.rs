//! Math tokenizer: protects TeX expressions from the HTML escape pass.
//!
//! Inline `$...$` expressions are swapped for placeholder tokens before any
//! escaping or inline substitution runs, then restored afterwards wrapped in
//! typesetting delimiters (`\( ... \)` inline, `\[ ... \]` display). The
//! external typesetting engine only ever sees those delimiters; the rest of
//! the document is plain escaped HTML by the time it runs.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::html;

/// Placeholder sentinel. A control character never occurs in article prose
/// and survives both the escape pass and the inline regex passes untouched.
const MARK: char = '\u{1}';

/// Inline math: `$expr$` with no literal `$` or newline inside.
/// An unmatched `$` finds no closing delimiter and stays literal text.
static INLINE_MATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^$\n]+)\$").unwrap());

/// A math expression lifted out of the working text.
#[derive(Debug, Clone)]
pub struct MathToken {
    /// Unique placeholder substituted into the working text.
    pub placeholder: String,
    /// The TeX expression, trimmed, exactly as authored.
    pub expression: String,
    /// Display (block) math renders as `\[ ... \]` instead of `\( ... \)`.
    pub display: bool,
}

/// Replace every inline `$...$` with a placeholder token.
///
/// Returns the substituted text and the ordered token list. Placeholders
/// are unique within one call; restoration consumes them in order.
pub fn tokenize(text: &str) -> (String, Vec<MathToken>) {
    let mut tokens = Vec::new();
    let output = INLINE_MATH.replace_all(text, |caps: &regex::Captures| {
        let placeholder = format!("{MARK}MATH{}{MARK}", tokens.len());
        tokens.push(MathToken {
            placeholder: placeholder.clone(),
            expression: caps[1].trim().to_string(),
            display: false,
        });
        placeholder
    });
    (output.into_owned(), tokens)
}

/// Splice tokens back into already-escaped text, each exactly once.
///
/// The recorded expression is HTML-escaped here, so `<`, `&` and quotes in
/// TeX source are safe to embed while the typesetting engine still sees
/// the original characters after entity decoding.
pub fn restore(text: &str, tokens: &[MathToken]) -> String {
    let mut output = text.to_string();
    for token in tokens {
        let (open, close) = if token.display {
            (r"\[", r"\]")
        } else {
            (r"\(", r"\)")
        };
        let replacement = format!(
            r#"<span class="math-inline">{open}{}{close}</span>"#,
            html::escape(&token.expression)
        );
        output = output.replacen(&token.placeholder, &replacement, 1);
    }
    output
}

/// Wrap the buffered lines of a `$$ ... $$` block as display math.
///
/// Content is preserved verbatim (joined and trimmed, never inline
/// tokenized) and escaped directly into display delimiters.
pub fn display_block(lines: &[String]) -> String {
    let expression = lines.join("\n");
    format!(
        r#"<div class="math-block">\[{}\]</div>"#,
        html::escape(expression.trim())
    )
}
