//! In-memory document model.
//!
//! An arena of nodes addressed by [`NodeId`]. It covers what fixtures and
//! matchers need from a browser document: element creation, attributes,
//! live properties and associated data, form state, visibility, focus,
//! selector queries, and insertion that runs embedded scripts (see
//! [`crate::script`]). Event bindings live in [`crate::event`].
//!
//! Nodes are never freed; removing a node detaches it, so a removed
//! [`NodeId`] stays valid and simply reports `is_attached() == false`.

pub mod parser;
pub mod selector;
pub mod serialize;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::event::EventRegistry;
use crate::result::{FixdomError, FixdomResult};
use crate::script::ScriptRunner;
use parser::ParsedNode;
use selector::SelectorList;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    props: HashMap<String, Value>,
    data: HashMap<String, Value>,
    /// Dirty value; `None` means "derive from markup"
    value: Option<String>,
    checked: Option<bool>,
    selected: Option<bool>,
    script_started: bool,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An ordered collection of nodes, the result of a query.
///
/// Matchers treat a selection like jQuery does: they look at its first node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Create a selection from nodes
    #[must_use]
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    /// First node, if any
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Node at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the selection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over nodes
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Nodes as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl From<Vec<NodeId>> for Selection {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::new(nodes)
    }
}

impl From<NodeId> for Selection {
    fn from(node: NodeId) -> Self {
        Self::new(vec![node])
    }
}

impl IntoIterator for Selection {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// A single-threaded in-memory document with a `<body>`.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    pub(crate) events: EventRegistry,
    script_runner: Option<Rc<dyn ScriptRunner>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.nodes.len())
            .field("focused", &self.focused)
            .field("has_script_runner", &self.script_runner.is_some())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

const JS_SCRIPT_TYPES: &[&str] = &[
    "",
    "text/javascript",
    "application/javascript",
    "text/ecmascript",
    "application/ecmascript",
    "module",
];

const VALUE_ELEMENTS: &[&str] = &["input", "textarea", "select", "option", "button"];

impl Document {
    /// Create an empty document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
            events: EventRegistry::default(),
            script_runner: None,
        };
        let body = doc.create_element("body");
        doc.link(doc.root, body);
        doc.body = body;
        doc
    }

    /// Drop every node, binding and spy record, keeping the script runner.
    ///
    /// Node ids taken before the reset no longer refer to anything.
    pub fn reset(&mut self) {
        let runner = self.script_runner.take();
        *self = Self::new();
        self.script_runner = runner;
    }

    /// Nodes held by the arena, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Document root node
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `<body>` element
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    pub(crate) fn node_data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0).map(|n| &n.data)
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.node_data(node) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Whether the id refers to a node of this document.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Parent node, if attached to one.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Parent node if it is an element.
    #[must_use]
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| self.is_element(p))
    }

    /// Child nodes, including text.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Child elements only.
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// All descendants in document order, excluding `node` itself.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Whether the node is connected to the document root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains_node(node) && self.is_inclusive_ancestor(self.root, node)
    }

    /// Append `child` to `parent`, moving it out of its current parent.
    ///
    /// # Errors
    ///
    /// Fails when either node is unknown, when `parent` cannot have
    /// children, or when `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> FixdomResult<()> {
        if !self.contains_node(parent) || !self.contains_node(child) {
            return Err(FixdomError::InvalidNode {
                message: "node does not belong to this document".to_string(),
            });
        }
        if matches!(self.node_data(parent), Some(NodeData::Text(_))) {
            return Err(FixdomError::InvalidNode {
                message: "text nodes cannot have children".to_string(),
            });
        }
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(FixdomError::InvalidNode {
                message: "cannot append a node to its own subtree".to_string(),
            });
        }
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    /// Remove a node from its parent. The node and its subtree stay usable.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.nodes[parent.0].children.retain(|&c| c != node);
            self.nodes[node.0].parent = None;
        }
    }

    /// Detach every child of `node`.
    pub fn remove_children(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.detach(child);
        }
    }

    /// Move a parsed tree into the arena. Children are taken out of each
    /// parsed element as it is visited, so neither building nor dropping
    /// recurses on nesting depth.
    fn build(&mut self, parsed: ParsedNode) -> NodeId {
        let mut pending = Vec::new();
        let root = self.build_one(parsed, &mut pending);
        while let Some((parent, child)) = pending.pop() {
            let built = self.build_one(child, &mut pending);
            self.link(parent, built);
        }
        root
    }

    fn build_one(
        &mut self,
        parsed: ParsedNode,
        pending: &mut Vec<(NodeId, ParsedNode)>,
    ) -> NodeId {
        match parsed {
            ParsedNode::Text(text) => self.create_text(&text),
            ParsedNode::Element {
                tag,
                attrs,
                children,
            } => {
                let el = self.push_node(NodeData::Element(ElementData {
                    tag,
                    attrs,
                    ..ElementData::default()
                }));
                pending.extend(children.into_iter().rev().map(|child| (el, child)));
                el
            }
        }
    }

    /// Parse a fragment into detached nodes. Scripts do not run.
    pub fn parse_fragment(&mut self, html: &str) -> Vec<NodeId> {
        parser::parse_fragment(html)
            .into_iter()
            .map(|parsed| self.build(parsed))
            .collect()
    }

    /// Parse `html` and append it to `parent`, then run inserted scripts.
    ///
    /// # Errors
    ///
    /// Fails when `parent` cannot take children or a script fails.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> FixdomResult<Vec<NodeId>> {
        let nodes = self.parse_fragment(html);
        self.append_nodes(parent, &nodes)?;
        Ok(nodes)
    }

    /// Append existing nodes to `parent` in order, then run inserted scripts.
    ///
    /// # Errors
    ///
    /// Fails on an invalid insertion or when a script fails.
    pub fn append_nodes(&mut self, parent: NodeId, nodes: &[NodeId]) -> FixdomResult<()> {
        for &node in nodes {
            self.append_child(parent, node)?;
        }
        self.run_scripts(nodes)
    }

    /// Replace the children of `node` with parsed `html`.
    ///
    /// # Errors
    ///
    /// See [`Document::append_html`].
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> FixdomResult<Vec<NodeId>> {
        self.remove_children(node);
        self.append_html(node, html)
    }

    fn run_scripts(&mut self, inserted: &[NodeId]) -> FixdomResult<()> {
        let mut scripts = Vec::new();
        for &node in inserted {
            if !self.is_attached(node) {
                continue;
            }
            if self.tag_name(node) == Some("script") {
                scripts.push(node);
            }
            scripts.extend(
                self.descendants(node)
                    .into_iter()
                    .filter(|&d| self.tag_name(d) == Some("script")),
            );
        }

        for script in scripts {
            let Some(el) = self.element_mut(script) else {
                continue;
            };
            if el.script_started {
                continue;
            }
            el.script_started = true;

            let kind = self
                .attr(script, "type")
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !JS_SCRIPT_TYPES.contains(&kind.as_str()) {
                trace!(script_type = %kind, "skipping non-script <script> element");
                continue;
            }

            let source = self.text_content(script);
            match self.script_runner.clone() {
                Some(runner) => {
                    debug!(bytes = source.len(), "running inserted script");
                    runner.run(self, &source)?;
                }
                None => debug!("no script runner installed; inserted script left inert"),
            }
        }
        Ok(())
    }

    /// Install the hook that executes inserted `<script>` elements.
    pub fn set_script_runner(&mut self, runner: impl ScriptRunner + 'static) {
        self.script_runner = Some(Rc::new(runner));
    }

    /// Remove the script hook; inserted scripts become inert.
    pub fn clear_script_runner(&mut self) {
        self.script_runner = None;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Elements under the document root matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidSelector`] for unsupported selectors.
    pub fn select(&self, selector: &str) -> FixdomResult<Selection> {
        self.query_selector_all(self.root, selector)
    }

    /// Descendant elements of `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidSelector`] for unsupported selectors.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> FixdomResult<Selection> {
        let list = SelectorList::parse(selector)?;
        Ok(Selection::new(
            self.descendants(scope)
                .into_iter()
                .filter(|&n| list.matches(self, n))
                .collect(),
        ))
    }

    /// First descendant of `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidSelector`] for unsupported selectors.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> FixdomResult<Option<NodeId>> {
        Ok(self.query_selector_all(scope, selector)?.first())
    }

    /// Whether the node matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidSelector`] for unsupported selectors.
    pub fn matches(&self, node: NodeId, selector: &str) -> FixdomResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(self, node))
    }

    /// First attached element with the given id, in document order.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    // ------------------------------------------------------------------
    // Element content
    // ------------------------------------------------------------------

    /// Lowercase tag name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    /// Concatenated text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(NodeData::Text(text)) = self.node_data(node) {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|d| match self.node_data(d) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if !self.is_element(node) {
            return;
        }
        self.remove_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(node, text_node);
        }
    }

    // ------------------------------------------------------------------
    // Attributes, classes, properties, data
    //
    // Setters are no-ops on non-element nodes, like jQuery on an empty set.
    // ------------------------------------------------------------------

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.element(node).and_then(|el| {
            el.attrs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// All attributes in order.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        self.element(node).map_or(&[], |el| el.attrs.as_slice())
    }

    /// Set or replace an attribute, keeping its position when replaced.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(el) = self.element_mut(node) {
            match el.attrs.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => el.attrs.push((name, value.to_string())),
            }
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(el) = self.element_mut(node) {
            el.attrs.retain(|(n, _)| *n != name);
        }
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    /// Whitespace-separated classes of the `class` attribute.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the element has a class.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).contains(&class)
    }

    /// Add a class if missing.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.is_element(node) || self.has_class(node, class) {
            return;
        }
        let mut classes: Vec<String> = self.classes(node).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attr(node, "class", &classes.join(" "));
    }

    /// Remove a class.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(node)
            .into_iter()
            .filter(|c| *c != class)
            .map(String::from)
            .collect();
        self.set_attr(node, "class", &classes.join(" "));
    }

    /// Live property: custom properties first, then reflected built-ins
    /// (`id`, `className`, `tagName`, `value`, `checked`, `selected`,
    /// `disabled`).
    #[must_use]
    pub fn prop(&self, node: NodeId, name: &str) -> Option<Value> {
        let el = self.element(node)?;
        if let Some(value) = el.props.get(name) {
            return Some(value.clone());
        }
        match name {
            "id" => Some(Value::from(self.attr(node, "id").unwrap_or_default())),
            "className" => Some(Value::from(self.attr(node, "class").unwrap_or_default())),
            "tagName" => Some(Value::from(el.tag.to_ascii_uppercase())),
            "value" => self.value(node).map(Value::from),
            "checked" => Some(Value::from(self.is_checked(node))),
            "selected" => Some(Value::from(self.is_selected(node))),
            "disabled" => Some(Value::from(self.is_disabled(node))),
            _ => None,
        }
    }

    /// Set a custom live property.
    pub fn set_prop(&mut self, node: NodeId, name: &str, value: impl Into<Value>) {
        if let Some(el) = self.element_mut(node) {
            let _ = el.props.insert(name.to_string(), value.into());
        }
    }

    /// Remove a custom live property.
    pub fn remove_prop(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            let _ = el.props.remove(name);
        }
    }

    /// Associated data: the data store first, then a `data-<key>` attribute.
    #[must_use]
    pub fn data(&self, node: NodeId, key: &str) -> Option<Value> {
        let el = self.element(node)?;
        if let Some(value) = el.data.get(key) {
            return Some(value.clone());
        }
        self.attr(node, &format!("data-{key}"))
            .map(|raw| serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw)))
    }

    /// Store associated data without touching attributes.
    pub fn set_data(&mut self, node: NodeId, key: &str, value: impl Into<Value>) {
        if let Some(el) = self.element_mut(node) {
            let _ = el.data.insert(key.to_string(), value.into());
        }
    }

    /// Remove associated data from the store.
    pub fn remove_data(&mut self, node: NodeId, key: &str) {
        if let Some(el) = self.element_mut(node) {
            let _ = el.data.remove(key);
        }
    }

    // ------------------------------------------------------------------
    // Form state
    // ------------------------------------------------------------------

    /// Current form value. `None` for elements without a value.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<String> {
        let el = self.element(node)?;
        if !VALUE_ELEMENTS.contains(&el.tag.as_str()) {
            return None;
        }
        if let Some(dirty) = &el.value {
            return Some(dirty.clone());
        }
        let value = match el.tag.as_str() {
            "textarea" => self.text_content(node),
            "option" => self
                .attr(node, "value")
                .map_or_else(|| self.text_content(node).trim().to_string(), String::from),
            "select" => {
                let options = self.query_selector_all(node, "option").unwrap_or_default();
                let chosen = options
                    .iter()
                    .find(|&o| self.is_selected(o))
                    .or_else(|| options.first());
                chosen.and_then(|o| self.value(o)).unwrap_or_default()
            }
            _ => self.attr(node, "value").unwrap_or_default().to_string(),
        };
        Some(value)
    }

    /// Set the form value. On a `<select>`, selects the matching option.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if self.tag_name(node) == Some("select") {
            let options = self.query_selector_all(node, "option").unwrap_or_default();
            for option in options.iter() {
                let matches = self.value(option).as_deref() == Some(value);
                self.set_selected(option, matches);
            }
            return;
        }
        if let Some(el) = self.element_mut(node) {
            if VALUE_ELEMENTS.contains(&el.tag.as_str()) {
                el.value = Some(value.to_string());
            }
        }
    }

    /// Checked state (dirty state, else the `checked` attribute).
    #[must_use]
    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node)
            .is_some_and(|el| el.checked.unwrap_or_else(|| self.has_attr(node, "checked")))
    }

    /// Set the checked state without touching the attribute.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(el) = self.element_mut(node) {
            el.checked = Some(checked);
        }
    }

    /// Selected state of an `<option>` (dirty state, else the attribute).
    #[must_use]
    pub fn is_selected(&self, node: NodeId) -> bool {
        self.element(node)
            .is_some_and(|el| el.selected.unwrap_or_else(|| self.has_attr(node, "selected")))
    }

    /// Set the selected state without touching the attribute.
    pub fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(el) = self.element_mut(node) {
            el.selected = Some(selected);
        }
    }

    /// Whether the `disabled` attribute is present.
    #[must_use]
    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attr(node, "disabled")
    }

    /// Toggle the `disabled` attribute.
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attr(node, "disabled", "disabled");
        } else {
            self.remove_attr(node, "disabled");
        }
    }

    // ------------------------------------------------------------------
    // Visibility and focus
    // ------------------------------------------------------------------

    /// Attached, and no inclusive ancestor is `display: none`, carries
    /// `hidden`, or is an `<input type="hidden">`.
    #[must_use]
    pub fn is_visible(&self, node: NodeId) -> bool {
        if !self.is_element(node) || !self.is_attached(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if self.is_element(n) && self.hides_itself(n) {
                return false;
            }
            current = self.parent(n);
        }
        true
    }

    fn hides_itself(&self, node: NodeId) -> bool {
        if self.has_attr(node, "hidden") {
            return true;
        }
        if self.tag_name(node) == Some("input")
            && self
                .attr(node, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return true;
        }
        self.style_property(node, "display")
            .is_some_and(|display| display.eq_ignore_ascii_case("none"))
    }

    /// Value of one declaration in the inline `style` attribute.
    #[must_use]
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
            .map(|(_, value)| value.trim().to_string())
            .last()
    }

    /// Set one declaration in the inline `style` attribute.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        if !self.is_element(node) {
            return;
        }
        let mut decls: Vec<String> = self
            .attr(node, "style")
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|decl| {
                !decl.is_empty()
                    && !decl
                        .split_once(':')
                        .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case(property))
            })
            .map(String::from)
            .collect();
        if !value.is_empty() {
            decls.push(format!("{property}: {value}"));
        }
        if decls.is_empty() {
            self.remove_attr(node, "style");
        } else {
            self.set_attr(node, "style", &format!("{};", decls.join("; ")));
        }
    }

    /// Hide an element with an inline `display: none`.
    pub fn hide(&mut self, node: NodeId) {
        self.set_style_property(node, "display", "none");
    }

    /// Undo [`Document::hide`] and drop the `hidden` attribute.
    pub fn show(&mut self, node: NodeId) {
        self.set_style_property(node, "display", "");
        self.remove_attr(node, "hidden");
    }

    /// Focus an attached element. Returns whether focus moved.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_element(node) || !self.is_attached(node) || self.is_disabled(node) {
            return false;
        }
        self.focused = Some(node);
        true
    }

    /// Drop focus from `node` if it has it.
    pub fn blur(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            self.focused = None;
        }
    }

    /// The focused element, if it is still attached.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&n| self.is_attached(n))
    }
}
