//! Owned HTML fragment tree for the enhancement pass.
//!
//! The block parser emits an HTML string; the structural enhancer needs a
//! mutable element tree. `parse_fragment` builds one with `tl`, the
//! enhancer rewrites it, and `render_nodes` serializes it back.
//!
//! Text nodes hold the raw source text (entities still encoded), so
//! serialization writes them back verbatim without re-escaping.

use anyhow::{Result, anyhow};

use crate::utils::html;

/// A node in the rendered element tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            attr.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Concatenated text of this element's descendants, raw as authored.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(elem) => collect_text(&elem.children, out),
        }
    }
}

/// Parse an HTML fragment into an owned node tree.
pub fn parse_fragment(fragment: &str) -> Result<Vec<Node>> {
    let dom = tl::parse(fragment, tl::ParserOptions::default())
        .map_err(|e| anyhow!("HTML fragment parse failed: {e}"))?;

    let parser = dom.parser();
    let mut nodes = Vec::new();
    for handle in dom.children() {
        if let Some(node) = convert(*handle, parser) {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

/// Convert one tl node handle to an owned node.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let mut elem = Element::new(&tag.name().as_utf8_str().to_lowercase());

            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                elem.attrs.push((key.to_string(), value));
            }

            for child_handle in tag.children().top().iter() {
                if let Some(child) = convert(*child_handle, parser) {
                    elem.children.push(child);
                }
            }

            Some(Node::Element(elem))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(bytes.as_utf8_str().to_string())),
        tl::Node::Comment(_) => None,
    }
}

/// Serialize a node tree back to an HTML string.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_into(node, &mut out);
    }
    out
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag);
            for (key, value) in &elem.attrs {
                out.push(' ');
                out.push_str(key);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
            }
            out.push('>');

            if html::is_void_element(&elem.tag) {
                return;
            }

            for child in &elem.children {
                render_into(child, out);
            }
            out.push_str("</");
            out.push_str(&elem.tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_paragraph() {
        let html = "<p>hello <strong>world</strong></p>";
        let nodes = parse_fragment(html).unwrap();
        assert_eq!(render_nodes(&nodes), html);
    }

    #[test]
    fn test_roundtrip_preserves_entities() {
        let html = "<p>a &amp; b &lt;c&gt;</p>";
        let nodes = parse_fragment(html).unwrap();
        assert_eq!(render_nodes(&nodes), html);
    }

    #[test]
    fn test_roundtrip_img_attributes() {
        let html = r#"<p><img src="supply.png" alt="Curve" title="Figure 1"></p>"#;
        let nodes = parse_fragment(html).unwrap();
        let out = render_nodes(&nodes);
        assert!(out.contains(r#"src="supply.png""#));
        assert!(out.contains(r#"alt="Curve""#));
        assert!(out.contains(r#"title="Figure 1""#));
        assert!(!out.contains("</img>"));
    }

    #[test]
    fn test_element_text_concatenates_descendants() {
        let nodes = parse_fragment("<p>a <em>b</em> c</p>").unwrap();
        let Node::Element(p) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(p.text(), "a b c");
    }

    #[test]
    fn test_get_set_attr() {
        let mut elem = Element::new("aside");
        assert!(elem.get_attr("class").is_none());
        elem.set_attr("class", "callout");
        assert_eq!(elem.get_attr("class"), Some("callout"));
        elem.set_attr("class", "callout callout-example");
        assert_eq!(elem.get_attr("class"), Some("callout callout-example"));
        assert_eq!(elem.attrs.len(), 1);
    }
}
