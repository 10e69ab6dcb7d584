//! HTML serialization with lowercase tag names.
//!
//! Output is what `innerHTML` would give in a browser for the same tree, so
//! two fragments that differ only in tag case or attribute quoting serialize
//! to the same string.

use super::parser::{self, ParsedNode};
use super::{Document, NodeData, NodeId};

impl Document {
    /// Serialized markup of the node's children.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag_name(node).is_some_and(parser::is_raw_text);
        for &child in self.children(node) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    /// Serialized markup of the node itself.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, false, &mut out);
        out
    }

    /// Start tag of an element, used in assertion messages.
    #[must_use]
    pub fn start_tag(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeData::Element(el)) = self.node_data(node) {
            write_start_tag(&el.tag, &el.attrs, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, raw_parent: bool, out: &mut String) {
        let mut steps = vec![Step::Open(node, raw_parent)];
        while let Some(step) = steps.pop() {
            let (node, raw_parent) = match step {
                Step::Close(tag) => {
                    write_end_tag(tag, out);
                    continue;
                }
                Step::Open(node, raw_parent) => (node, raw_parent),
            };
            match self.node_data(node) {
                Some(NodeData::Text(text)) => {
                    if raw_parent {
                        out.push_str(text);
                    } else {
                        escape_text(text, out);
                    }
                }
                Some(NodeData::Element(el)) => {
                    write_start_tag(&el.tag, &el.attrs, out);
                    if parser::is_void(&el.tag) {
                        continue;
                    }
                    let raw = parser::is_raw_text(&el.tag);
                    steps.push(Step::Close(&el.tag));
                    let children = self.children(node).iter().rev();
                    steps.extend(children.map(|&c| Step::Open(c, raw)));
                }
                Some(NodeData::Document) | None => {
                    let children = self.children(node).iter().rev();
                    steps.extend(children.map(|&c| Step::Open(c, false)));
                }
            }
        }
    }
}

enum Step<'a> {
    Open(NodeId, bool),
    Close(&'a str),
}

/// Normalize a fragment to its serialized form (parse, then serialize).
///
/// `normalize_html("<DIV>x</DIV>") == "<div>x</div>"`.
#[must_use]
pub fn normalize_html(html: &str) -> String {
    let mut out = String::new();
    for node in parser::parse_fragment(html) {
        write_parsed(node, &mut out);
    }
    out
}

enum ParsedStep {
    Open(ParsedNode, bool),
    Close(String),
}

/// Consumes `node` so that deep trees are dismantled level by level.
fn write_parsed(node: ParsedNode, out: &mut String) {
    let mut steps = vec![ParsedStep::Open(node, false)];
    while let Some(step) = steps.pop() {
        match step {
            ParsedStep::Close(tag) => write_end_tag(&tag, out),
            ParsedStep::Open(ParsedNode::Text(text), true) => out.push_str(&text),
            ParsedStep::Open(ParsedNode::Text(text), false) => escape_text(&text, out),
            ParsedStep::Open(
                ParsedNode::Element {
                    tag,
                    attrs,
                    children,
                },
                _,
            ) => {
                write_start_tag(&tag, &attrs, out);
                if parser::is_void(&tag) {
                    continue;
                }
                let raw = parser::is_raw_text(&tag);
                steps.push(ParsedStep::Close(tag));
                steps.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| ParsedStep::Open(child, raw)),
                );
            }
        }
    }
}

fn write_end_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_start_tag(tag: &str, attrs: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
