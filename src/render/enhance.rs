//! Structural enhancer: post-parse rewrites of the rendered element tree.
//!
//! Two independent passes over the fragment:
//! - media promotion: a paragraph whose only child is an image becomes a
//!   `<figure>`, captioned from the image title (preferred) or alt text;
//! - callout extraction: a blockquote whose first paragraph starts with
//!   `Definition:` or `Example:` (case-insensitive, `:` or `-` separator)
//!   is replaced wholesale by a callout container.
//!
//! Replacement is a full ownership transfer: the old paragraph/blockquote
//! node is consumed, never aliased.

use std::sync::LazyLock;

use regex::Regex;

use crate::debug;
use crate::dom::{self, Element, Node};

/// Callout prefix on the first paragraph of a blockquote.
static CALLOUT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(definition|example)\s*[:\-]\s*").unwrap());

/// Run both enhancement passes over an HTML fragment.
///
/// A fragment that fails to parse is returned unchanged; enhancement is
/// best-effort, never fatal.
pub fn enhance(fragment: &str) -> String {
    match dom::parse_fragment(fragment) {
        Ok(mut nodes) => {
            promote_media(&mut nodes);
            extract_callouts(&mut nodes);
            dom::render_nodes(&nodes)
        }
        Err(e) => {
            debug!("enhance"; "fragment left unenhanced: {e}");
            fragment.to_string()
        }
    }
}

// ============================================================================
// Media promotion
// ============================================================================

fn promote_media(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if let Node::Element(elem) = node {
            promote_media(&mut elem.children);
        }
        if let Some(figure) = media_figure(node) {
            *node = Node::Element(figure);
        }
    }
}

/// Build the replacement `<figure>` if `node` is a paragraph whose only
/// child is an image.
fn media_figure(node: &mut Node) -> Option<Element> {
    let Node::Element(elem) = node else {
        return None;
    };
    if !elem.is_tag("p") || elem.children.len() != 1 {
        return None;
    }
    if !matches!(&elem.children[0], Node::Element(img) if img.is_tag("img")) {
        return None;
    }
    let Some(Node::Element(img)) = elem.children.pop() else {
        return None;
    };

    let caption = img
        .get_attr("title")
        .filter(|s| !s.is_empty())
        .or_else(|| img.get_attr("alt").filter(|s| !s.is_empty()))
        .map(str::to_string);

    let mut figure = Element::new("figure");
    figure.children.push(Node::Element(img));
    if let Some(text) = caption {
        let mut figcaption = Element::new("figcaption");
        figcaption.children.push(Node::Text(text));
        figure.children.push(Node::Element(figcaption));
    }
    Some(figure)
}

// ============================================================================
// Callout extraction
// ============================================================================

fn extract_callouts(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if let Node::Element(elem) = node {
            extract_callouts(&mut elem.children);
        }
        if let Some(callout) = callout_container(node) {
            *node = Node::Element(callout);
        }
    }
}

/// Build the replacement callout if `node` is a tagged blockquote.
fn callout_container(node: &mut Node) -> Option<Element> {
    let Node::Element(elem) = node else {
        return None;
    };
    if !elem.is_tag("blockquote") {
        return None;
    }

    let title = strip_callout_prefix(elem)?;
    let kind = title.to_ascii_lowercase();

    let mut heading = Element::new("p");
    heading.set_attr("class", "callout-title");
    heading.children.push(Node::Text(title));

    let mut callout = Element::new("aside");
    callout.set_attr("class", &format!("callout callout-{kind}"));
    callout.children.push(Node::Element(heading));
    callout.children.append(&mut elem.children);
    Some(callout)
}

/// Match the callout prefix on the blockquote's first paragraph and strip
/// it from that paragraph's leading text. Returns the canonical title.
fn strip_callout_prefix(quote: &mut Element) -> Option<String> {
    let first_para = quote.children.iter_mut().find_map(|child| match child {
        Node::Element(elem) if elem.is_tag("p") => Some(elem),
        _ => None,
    })?;

    let Some(Node::Text(text)) = first_para.children.first_mut() else {
        return None;
    };

    let captures = CALLOUT_PREFIX.captures(text)?;
    let title = match captures[1].to_ascii_lowercase().as_str() {
        "definition" => "Definition",
        _ => "Example",
    };
    let stripped = text[captures.get(0)?.end()..].to_string();
    if stripped.is_empty() {
        first_para.children.remove(0);
    } else {
        *text = stripped;
    }
    Some(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::block::markdown_to_html;

    #[test]
    fn test_standalone_image_promoted_to_figure() {
        let html = enhance(r#"<p><img src="curve.png" alt="Supply curve"></p>"#);
        assert_eq!(
            html,
            r#"<figure><img src="curve.png" alt="Supply curve"><figcaption>Supply curve</figcaption></figure>"#
        );
    }

    #[test]
    fn test_caption_prefers_title_over_alt() {
        let html = enhance(r#"<p><img src="c.png" alt="alt text" title="Figure 1"></p>"#);
        assert!(html.contains("<figcaption>Figure 1</figcaption>"));
    }

    #[test]
    fn test_image_without_caption_text() {
        let html = enhance(r#"<p><img src="c.png" alt=""></p>"#);
        assert!(html.starts_with("<figure><img"));
        assert!(!html.contains("figcaption"));
    }

    #[test]
    fn test_paragraph_with_text_and_image_untouched() {
        let input = r#"<p>see <img src="c.png" alt="x"> here</p>"#;
        assert_eq!(enhance(input), input);
    }

    #[test]
    fn test_definition_callout() {
        let html = enhance(
            "<blockquote><p>Definition: A market clears when quantity \
             supplied equals quantity demanded.</p></blockquote>",
        );
        assert!(html.starts_with(r#"<aside class="callout callout-definition">"#));
        assert!(html.contains(r#"<p class="callout-title">Definition</p>"#));
        assert!(html.contains("<p>A market clears when quantity supplied equals quantity demanded.</p>"));
        assert!(!html.contains("blockquote"));
    }

    #[test]
    fn test_example_callout_case_insensitive() {
        let html = enhance("<blockquote><p>EXAMPLE - rent ceilings</p></blockquote>");
        assert!(html.contains(r#"class="callout callout-example""#));
        assert!(html.contains(r#"<p class="callout-title">Example</p>"#));
        assert!(html.contains("<p>rent ceilings</p>"));
    }

    #[test]
    fn test_unrelated_prefix_left_untouched() {
        let input = "<blockquote><p>Note: not a callout</p></blockquote>";
        assert_eq!(enhance(input), input);
    }

    #[test]
    fn test_callout_keeps_inline_markup_after_prefix() {
        let html = enhance(
            "<blockquote><p>Definition: a <strong>binding</strong> price floor</p></blockquote>",
        );
        assert!(html.contains("<p>a <strong>binding</strong> price floor</p>"));
    }

    #[test]
    fn test_enhance_composes_with_block_parser() {
        let parsed = markdown_to_html(
            "> Definition: Opportunity cost is the next-best alternative forgone.",
        );
        let html = enhance(&parsed);
        assert!(html.contains("callout-definition"));
        assert!(html.contains("Opportunity cost is the next-best alternative forgone."));
    }

    #[test]
    fn test_image_paragraph_from_block_parser() {
        let parsed = markdown_to_html(r#"![Curve](supply.png "Figure 1")"#);
        let html = enhance(&parsed);
        assert!(html.contains("<figure>"));
        assert!(html.contains("<figcaption>Figure 1</figcaption>"));
    }
}
