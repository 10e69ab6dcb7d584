//! DOM matchers.
//!
//! A [`Matcher`] is a named predicate over a subject in a [`Document`].
//! Each variant has one canonical boolean result. Negation and failure
//! messages are left to [`crate::expect`].
//!
//! Subjects are anything implementing [`ElementLike`]: a raw [`NodeId`], a
//! [`Selection`] (its first node is used), an `Option<NodeId>`, or an
//! [`EventTarget`]. An empty selection or `None` never matches.

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::dom::serialize::normalize_html;
use crate::dom::{Document, NodeId, Selection};
use crate::event::{EventTarget, HandlerRef};
use crate::result::{FixdomError, FixdomResult};

// ============================================================================
// Subjects
// ============================================================================

/// Something a matcher can be applied to.
pub trait ElementLike {
    /// The event target this subject stands for, if any.
    fn target(&self) -> Option<EventTarget>;

    /// The element this subject stands for, if it is one.
    fn element(&self, document: &Document) -> Option<NodeId> {
        match self.target() {
            Some(EventTarget::Node(node)) if document.is_element(node) => Some(node),
            _ => None,
        }
    }

    /// Short human description for failure messages.
    fn describe(&self, document: &Document) -> String {
        match self.target() {
            Some(EventTarget::Node(node)) if document.is_element(node) => document.start_tag(node),
            Some(EventTarget::Node(node)) => format!("text node {node:?}"),
            Some(other) => other.to_string(),
            None => "nothing".to_string(),
        }
    }
}

impl ElementLike for NodeId {
    fn target(&self) -> Option<EventTarget> {
        Some(EventTarget::Node(*self))
    }
}

impl ElementLike for Selection {
    fn target(&self) -> Option<EventTarget> {
        self.first().map(EventTarget::Node)
    }

    fn describe(&self, document: &Document) -> String {
        match self.first() {
            Some(node) if self.len() == 1 => node.describe(document),
            Some(node) => format!("{} (first of {})", node.describe(document), self.len()),
            None => "empty selection".to_string(),
        }
    }
}

impl ElementLike for Option<NodeId> {
    fn target(&self) -> Option<EventTarget> {
        self.map(EventTarget::Node)
    }
}

impl ElementLike for EventTarget {
    fn target(&self) -> Option<EventTarget> {
        Some(*self)
    }
}

impl<T: ElementLike + ?Sized> ElementLike for &T {
    fn target(&self) -> Option<EventTarget> {
        (**self).target()
    }

    fn element(&self, document: &Document) -> Option<NodeId> {
        (**self).element(document)
    }

    fn describe(&self, document: &Document) -> String {
        (**self).describe(document)
    }
}

// ============================================================================
// Matchers
// ============================================================================

/// Expected text: exact (compared against trimmed text) or a pattern.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// Trimmed text equals this string
    Exact(String),
    /// Text matches this pattern
    Pattern(Regex),
}

impl TextMatcher {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidPattern`] for an invalid regex.
    pub fn pattern(pattern: &str) -> FixdomResult<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text.trim() == expected,
            Self::Pattern(regex) => regex.is_match(text.trim()),
        }
    }
}

impl From<&str> for TextMatcher {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_string())
    }
}

impl From<String> for TextMatcher {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<Regex> for TextMatcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl fmt::Display for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text:?}"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// The closed set of DOM matchers.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Element has the class
    HaveClass(String),
    /// Element has the attribute, optionally with exactly this value
    HaveAttr {
        /// Attribute name
        name: String,
        /// Expected value
        value: Option<String>,
    },
    /// Element has the live property, optionally equal to this value
    HaveProp {
        /// Property name
        name: String,
        /// Expected value
        value: Option<Value>,
    },
    /// Element's `id` equals this
    HaveId(String),
    /// Element's inner markup equals this, after normalization
    HaveHtml(String),
    /// Element's text matches
    HaveText(TextMatcher),
    /// Element's form value equals this
    HaveValue(String),
    /// Element has data under the key, optionally equal to this value
    HaveData {
        /// Data key
        key: String,
        /// Expected value
        value: Option<Value>,
    },
    /// Element is visible
    BeVisible,
    /// Element is not visible
    BeHidden,
    /// Element is selected
    BeSelected,
    /// Element is checked
    BeChecked,
    /// Element has no child elements and only whitespace text
    BeEmpty,
    /// Element is attached to the document
    Exist,
    /// Element matches the selector
    Be(String),
    /// Element has a descendant matching the selector
    Contain(String),
    /// Element is disabled
    BeDisabled,
    /// Element has focus
    BeFocused,
    /// The event was recorded on the subject by a spy
    HaveBeenTriggeredOn(String),
    /// The event was recorded on the subject with its default prevented
    HaveBeenPreventedOn(String),
    /// Subject has a handler for the event
    Handle(String),
    /// Subject has this exact handler for the event
    HandleWith {
        /// Event name
        event: String,
        /// Handler compared by identity
        handler: HandlerRef,
    },
}

/// Names accepted by [`Matcher::from_name`], in kebab-case without `to-`.
pub const MATCHER_NAMES: &[&str] = &[
    "have-class",
    "have-attr",
    "have-prop",
    "have-id",
    "have-html",
    "have-text",
    "have-value",
    "have-data",
    "be-visible",
    "be-hidden",
    "be-selected",
    "be-checked",
    "be-empty",
    "exist",
    "be",
    "contain",
    "be-disabled",
    "be-focused",
    "have-been-triggered-on",
    "have-been-prevented-on",
    "handle",
    "handle-with",
];

impl Matcher {
    /// `toHaveClass`
    #[must_use]
    pub fn have_class(class: impl Into<String>) -> Self {
        Self::HaveClass(class.into())
    }

    /// `toHaveAttr(name)`
    #[must_use]
    pub fn have_attr(name: impl Into<String>) -> Self {
        Self::HaveAttr {
            name: name.into(),
            value: None,
        }
    }

    /// `toHaveAttr(name, value)`
    #[must_use]
    pub fn have_attr_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::HaveAttr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// `toHaveProp(name)`
    #[must_use]
    pub fn have_prop(name: impl Into<String>) -> Self {
        Self::HaveProp {
            name: name.into(),
            value: None,
        }
    }

    /// `toHaveProp(name, value)`
    #[must_use]
    pub fn have_prop_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::HaveProp {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// `toHaveData(key)`
    #[must_use]
    pub fn have_data(key: impl Into<String>) -> Self {
        Self::HaveData {
            key: key.into(),
            value: None,
        }
    }

    /// `toHaveData(key, value)`
    #[must_use]
    pub fn have_data_value(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::HaveData {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// `toHaveText` with a string or compiled regex
    #[must_use]
    pub fn have_text(text: impl Into<TextMatcher>) -> Self {
        Self::HaveText(text.into())
    }

    /// `toHaveText` with a pattern compiled here.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidPattern`] for an invalid regex.
    pub fn have_text_matching(pattern: &str) -> FixdomResult<Self> {
        Ok(Self::HaveText(TextMatcher::pattern(pattern)?))
    }

    /// `toHandleWith`
    #[must_use]
    pub fn handle_with(event: impl Into<String>, handler: &HandlerRef) -> Self {
        Self::HandleWith {
            event: event.into(),
            handler: handler.clone(),
        }
    }

    /// Look a matcher up by name with string arguments.
    ///
    /// Names may be camelCase (`toHaveClass`) or kebab-case
    /// (`to-have-class`, `have-class`). A `toHaveText` argument written as
    /// `/pattern/` is compiled as a regex. Property and data values are
    /// parsed as JSON when possible, else taken as strings.
    ///
    /// # Errors
    ///
    /// Fails on an unknown name, a wrong argument count, an invalid
    /// pattern, or `toHandleWith` (a handler cannot be named).
    pub fn from_name(name: &str, args: &[String]) -> FixdomResult<Self> {
        let key = canonical_name(name);
        let arity = |min: usize, max: usize| -> FixdomResult<()> {
            if (min..=max).contains(&args.len()) {
                Ok(())
            } else if min == max {
                Err(FixdomError::invalid_matcher(
                    name,
                    format!("expected {min} argument(s), got {}", args.len()),
                ))
            } else {
                Err(FixdomError::invalid_matcher(
                    name,
                    format!("expected {min} to {max} arguments, got {}", args.len()),
                ))
            }
        };
        let arg = |i: usize| args[i].clone();
        let json_arg = |i: usize| parse_loose_json(&args[i]);

        let matcher = match key.as_str() {
            "have-class" => {
                arity(1, 1)?;
                Self::HaveClass(arg(0))
            }
            "have-attr" => {
                arity(1, 2)?;
                Self::HaveAttr {
                    name: arg(0),
                    value: args.get(1).cloned(),
                }
            }
            "have-prop" => {
                arity(1, 2)?;
                Self::HaveProp {
                    name: arg(0),
                    value: (args.len() == 2).then(|| json_arg(1)),
                }
            }
            "have-id" => {
                arity(1, 1)?;
                Self::HaveId(arg(0))
            }
            "have-html" => {
                arity(1, 1)?;
                Self::HaveHtml(arg(0))
            }
            "have-text" => {
                arity(1, 1)?;
                let raw = &args[0];
                match raw
                    .strip_prefix('/')
                    .and_then(|rest| rest.strip_suffix('/'))
                {
                    Some(pattern) => Self::have_text_matching(pattern)?,
                    None => Self::HaveText(TextMatcher::Exact(raw.clone())),
                }
            }
            "have-value" => {
                arity(1, 1)?;
                Self::HaveValue(arg(0))
            }
            "have-data" => {
                arity(1, 2)?;
                Self::HaveData {
                    key: arg(0),
                    value: (args.len() == 2).then(|| json_arg(1)),
                }
            }
            "be-visible" => {
                arity(0, 0)?;
                Self::BeVisible
            }
            "be-hidden" => {
                arity(0, 0)?;
                Self::BeHidden
            }
            "be-selected" => {
                arity(0, 0)?;
                Self::BeSelected
            }
            "be-checked" => {
                arity(0, 0)?;
                Self::BeChecked
            }
            "be-empty" => {
                arity(0, 0)?;
                Self::BeEmpty
            }
            "exist" => {
                arity(0, 0)?;
                Self::Exist
            }
            "be" => {
                arity(1, 1)?;
                Self::Be(arg(0))
            }
            "contain" => {
                arity(1, 1)?;
                Self::Contain(arg(0))
            }
            "be-disabled" => {
                arity(0, 0)?;
                Self::BeDisabled
            }
            "be-focused" => {
                arity(0, 0)?;
                Self::BeFocused
            }
            "have-been-triggered-on" => {
                arity(1, 1)?;
                Self::HaveBeenTriggeredOn(arg(0))
            }
            "have-been-prevented-on" => {
                arity(1, 1)?;
                Self::HaveBeenPreventedOn(arg(0))
            }
            "handle" => {
                arity(1, 1)?;
                Self::Handle(arg(0))
            }
            "handle-with" => {
                return Err(FixdomError::invalid_matcher(
                    name,
                    "needs a handler reference; build it with Matcher::handle_with",
                ))
            }
            _ => {
                return Err(FixdomError::invalid_matcher(
                    name,
                    format!("unknown matcher (known: {})", MATCHER_NAMES.join(", ")),
                ))
            }
        };
        Ok(matcher)
    }

    /// camelCase name, as in `toHaveClass`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HaveClass(_) => "toHaveClass",
            Self::HaveAttr { .. } => "toHaveAttr",
            Self::HaveProp { .. } => "toHaveProp",
            Self::HaveId(_) => "toHaveId",
            Self::HaveHtml(_) => "toHaveHtml",
            Self::HaveText(_) => "toHaveText",
            Self::HaveValue(_) => "toHaveValue",
            Self::HaveData { .. } => "toHaveData",
            Self::BeVisible => "toBeVisible",
            Self::BeHidden => "toBeHidden",
            Self::BeSelected => "toBeSelected",
            Self::BeChecked => "toBeChecked",
            Self::BeEmpty => "toBeEmpty",
            Self::Exist => "toExist",
            Self::Be(_) => "toBe",
            Self::Contain(_) => "toContain",
            Self::BeDisabled => "toBeDisabled",
            Self::BeFocused => "toBeFocused",
            Self::HaveBeenTriggeredOn(_) => "toHaveBeenTriggeredOn",
            Self::HaveBeenPreventedOn(_) => "toHaveBeenPreventedOn",
            Self::Handle(_) => "toHandle",
            Self::HandleWith { .. } => "toHandleWith",
        }
    }

    /// Evaluate against `subject`. Missing subjects and invalid selectors
    /// evaluate to `false`.
    #[must_use]
    pub fn matches<S: ElementLike + ?Sized>(&self, document: &Document, subject: &S) -> bool {
        match self {
            Self::HaveBeenTriggeredOn(event) => subject
                .target()
                .is_some_and(|t| document.was_triggered(t, event)),
            Self::HaveBeenPreventedOn(event) => subject
                .target()
                .is_some_and(|t| document.was_prevented(t, event)),
            Self::Handle(event) => subject.target().is_some_and(|t| document.handles(t, event)),
            Self::HandleWith { event, handler } => subject
                .target()
                .is_some_and(|t| document.handles_with(t, event, handler)),
            _ => subject
                .element(document)
                .is_some_and(|el| self.matches_element(document, el)),
        }
    }

    fn matches_element(&self, doc: &Document, el: NodeId) -> bool {
        match self {
            Self::HaveClass(class) => doc.has_class(el, class),
            Self::HaveAttr { name, value } => match (doc.attr(el, name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
            Self::HaveProp { name, value } => {
                optional_value_matches(doc.prop(el, name).as_ref(), value.as_ref())
            }
            Self::HaveId(id) => doc.id(el) == Some(id.as_str()),
            Self::HaveHtml(html) => normalize_html(&doc.inner_html(el)) == normalize_html(html),
            Self::HaveText(text) => text.is_match(&doc.text_content(el)),
            Self::HaveValue(expected) => doc.value(el).as_deref() == Some(expected.as_str()),
            Self::HaveData { key, value } => {
                optional_value_matches(doc.data(el, key).as_ref(), value.as_ref())
            }
            Self::BeVisible => doc.is_visible(el),
            Self::BeHidden => !doc.is_visible(el),
            Self::BeSelected => doc.is_selected(el),
            Self::BeChecked => doc.is_checked(el),
            Self::BeEmpty => {
                doc.element_children(el).is_empty() && doc.text_content(el).trim().is_empty()
            }
            Self::Exist => doc.is_attached(el),
            Self::Be(selector) => doc.matches(el, selector).unwrap_or(false),
            Self::Contain(selector) => doc
                .query_selector(el, selector)
                .ok()
                .flatten()
                .is_some(),
            Self::BeDisabled => doc.is_disabled(el),
            Self::BeFocused => doc.focused() == Some(el),
            Self::HaveBeenTriggeredOn(_)
            | Self::HaveBeenPreventedOn(_)
            | Self::Handle(_)
            | Self::HandleWith { .. } => false,
        }
    }
}

impl fmt::Display for Matcher {
    /// Reads as the tail of "expected <subject> ...".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HaveClass(class) => write!(f, "to have class {class:?}"),
            Self::HaveAttr { name, value: None } => write!(f, "to have attribute {name:?}"),
            Self::HaveAttr {
                name,
                value: Some(v),
            } => write!(f, "to have attribute {name:?} with value {v:?}"),
            Self::HaveProp { name, value: None } => write!(f, "to have property {name:?}"),
            Self::HaveProp {
                name,
                value: Some(v),
            } => write!(f, "to have property {name:?} with value {v}"),
            Self::HaveId(id) => write!(f, "to have id {id:?}"),
            Self::HaveHtml(html) => write!(f, "to have HTML {html:?}"),
            Self::HaveText(text) => write!(f, "to have text {text}"),
            Self::HaveValue(value) => write!(f, "to have value {value:?}"),
            Self::HaveData { key, value: None } => write!(f, "to have data {key:?}"),
            Self::HaveData {
                key,
                value: Some(v),
            } => write!(f, "to have data {key:?} with value {v}"),
            Self::BeVisible => write!(f, "to be visible"),
            Self::BeHidden => write!(f, "to be hidden"),
            Self::BeSelected => write!(f, "to be selected"),
            Self::BeChecked => write!(f, "to be checked"),
            Self::BeEmpty => write!(f, "to be empty"),
            Self::Exist => write!(f, "to exist"),
            Self::Be(selector) => write!(f, "to be {selector:?}"),
            Self::Contain(selector) => write!(f, "to contain {selector:?}"),
            Self::BeDisabled => write!(f, "to be disabled"),
            Self::BeFocused => write!(f, "to be focused"),
            Self::HaveBeenTriggeredOn(event) => write!(f, "to have had {event:?} triggered on it"),
            Self::HaveBeenPreventedOn(event) => write!(f, "to have had {event:?} prevented on it"),
            Self::Handle(event) => write!(f, "to handle {event:?}"),
            Self::HandleWith { event, handler } => {
                write!(f, "to handle {event:?} with {handler:?}")
            }
        }
    }
}

/// `toHaveClass` / `to-have-class` / `have-class` -> `have-class`
fn canonical_name(name: &str) -> String {
    let mut kebab = String::with_capacity(name.len() + 4);
    for (i, c) in name.trim().chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                kebab.push('-');
            }
            kebab.push(c.to_ascii_lowercase());
        } else if c == '_' {
            kebab.push('-');
        } else {
            kebab.push(c);
        }
    }
    match kebab.strip_prefix("to-") {
        Some(rest) => rest.to_string(),
        None => kebab,
    }
}

fn parse_loose_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw))
}

fn optional_value_matches(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (Some(actual), Some(expected)) => loose_eq(actual, expected),
        (Some(actual), None) => !actual.is_null(),
        (None, _) => false,
    }
}

/// Equal values, or equal when both are rendered as plain strings
/// (`3 == "3"`, `true == "true"`).
fn loose_eq(a: &Value, b: &Value) -> bool {
    fn plain(v: &Value) -> String {
        match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
    a == b || (a.is_string() != b.is_string() && plain(a) == plain(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(html: &str) -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_html(body, html).unwrap();
        doc
    }

    fn by_id(doc: &Document, id: &str) -> NodeId {
        doc.element_by_id(id).unwrap()
    }

    mod subject_tests {
        use super::*;

        #[test]
        fn test_selection_uses_first_node() {
            let doc = doc_with("<p class=\"a\"></p><p class=\"b\"></p>");
            let all = doc.select("p").unwrap();
            assert!(Matcher::have_class("a").matches(&doc, &all));
            assert!(!Matcher::have_class("b").matches(&doc, &all));
        }

        #[test]
        fn test_node_and_selection_agree() {
            let doc = doc_with("<p id=\"x\" class=\"a\"></p>");
            let node = by_id(&doc, "x");
            let selection = Selection::from(node);
            for matcher in [Matcher::have_class("a"), Matcher::have_class("z"), Matcher::Exist] {
                assert_eq!(matcher.matches(&doc, &node), matcher.matches(&doc, &selection));
            }
        }

        #[test]
        fn test_missing_subject_is_false() {
            let doc = Document::new();
            let empty = Selection::default();
            assert!(!Matcher::Exist.matches(&doc, &empty));
            assert!(!Matcher::BeHidden.matches(&doc, &None::<NodeId>));
            assert!(!Matcher::BeEmpty.matches(&doc, &EventTarget::Window));
        }

        #[test]
        fn test_describe() {
            let doc = doc_with("<p id=\"x\"></p><p></p>");
            assert_eq!(by_id(&doc, "x").describe(&doc), "<p id=\"x\">");
            let all = doc.select("p").unwrap();
            assert_eq!(all.describe(&doc), "<p id=\"x\"> (first of 2)");
            assert_eq!(Selection::default().describe(&doc), "empty selection");
            assert_eq!(EventTarget::Window.describe(&doc), "window");
        }
    }

    mod attribute_matcher_tests {
        use super::*;

        #[test]
        fn test_have_attr() {
            let doc = doc_with("<a id=\"a\" target=\"_blank\"></a>");
            let a = by_id(&doc, "a");
            assert!(Matcher::have_attr("target").matches(&doc, &a));
            assert!(Matcher::have_attr_value("target", "_blank").matches(&doc, &a));
            assert!(!Matcher::have_attr_value("target", "_self").matches(&doc, &a));
            assert!(!Matcher::have_attr("rel").matches(&doc, &a));
        }

        #[test]
        fn test_have_id() {
            let doc = doc_with("<div id=\"some-id\"></div><div class=\"no-id\"></div>");
            assert!(Matcher::HaveId("some-id".into()).matches(&doc, &by_id(&doc, "some-id")));
            let no_id = doc.select(".no-id").unwrap();
            assert!(!Matcher::HaveId("some-id".into()).matches(&doc, &no_id));
        }

        #[test]
        fn test_have_prop_loose_value() {
            let mut doc = doc_with("<input id=\"i\">");
            let i = by_id(&doc, "i");
            doc.set_prop(i, "count", 3);
            assert!(Matcher::have_prop("count").matches(&doc, &i));
            assert!(Matcher::have_prop_value("count", 3).matches(&doc, &i));
            assert!(Matcher::have_prop_value("count", "3").matches(&doc, &i));
            assert!(!Matcher::have_prop_value("count", 4).matches(&doc, &i));
            assert!(!Matcher::have_prop("missing").matches(&doc, &i));
        }

        #[test]
        fn test_have_data() {
            let mut doc = doc_with("<div id=\"d\" data-role=\"page\"></div>");
            let d = by_id(&doc, "d");
            doc.set_data(d, "some key", "some value");
            assert!(Matcher::have_data("some key").matches(&doc, &d));
            assert!(Matcher::have_data_value("some key", "some value").matches(&doc, &d));
            assert!(!Matcher::have_data_value("some key", "wrong value").matches(&doc, &d));
            assert!(!Matcher::have_data("wrong key").matches(&doc, &d));
            assert!(Matcher::have_data_value("role", "page").matches(&doc, &d));
        }
    }

    mod content_matcher_tests {
        use super::*;

        #[test]
        fn test_have_html_normalizes() {
            let doc = doc_with("<div id=\"d\"><DIV>some text</DIV></div>");
            let d = by_id(&doc, "d");
            assert!(Matcher::HaveHtml("<div>some text</div>".into()).matches(&doc, &d));
            assert!(Matcher::HaveHtml("<DIV>some text</DIV>".into()).matches(&doc, &d));
            assert!(!Matcher::HaveHtml("<span>some text</span>".into()).matches(&doc, &d));
        }

        #[test]
        fn test_have_text_trims_and_matches_patterns() {
            let doc = doc_with("<div id=\"d\">\nsome text\n</div>");
            let d = by_id(&doc, "d");
            assert!(Matcher::have_text("some text").matches(&doc, &d));
            assert!(!Matcher::have_text("some other text").matches(&doc, &d));
            assert!(Matcher::have_text_matching("some").unwrap().matches(&doc, &d));
            assert!(!Matcher::have_text_matching("other").unwrap().matches(&doc, &d));
            assert!(Matcher::have_text_matching("(").is_err());
        }

        #[test]
        fn test_have_text_anchored_pattern_ignores_surrounding_whitespace() {
            let doc = doc_with("<div id=\"d\">\nsome text\n</div>");
            let d = by_id(&doc, "d");
            assert!(Matcher::have_text_matching("^some text$")
                .unwrap()
                .matches(&doc, &d));
        }

        #[test]
        fn test_have_value() {
            let mut doc = doc_with("<input id=\"i\" type=\"text\"><div id=\"d\"></div>");
            let i = by_id(&doc, "i");
            doc.set_value(i, "some value");
            assert!(Matcher::HaveValue("some value".into()).matches(&doc, &i));
            assert!(!Matcher::HaveValue("different value".into()).matches(&doc, &i));
            assert!(!Matcher::HaveValue(String::new()).matches(&doc, &by_id(&doc, "d")));
        }

        #[test]
        fn test_be_empty() {
            let doc = doc_with("<div id=\"e\"> </div><div id=\"t\">x</div><div id=\"c\"><span></span></div>");
            assert!(Matcher::BeEmpty.matches(&doc, &by_id(&doc, "e")));
            assert!(!Matcher::BeEmpty.matches(&doc, &by_id(&doc, "t")));
            assert!(!Matcher::BeEmpty.matches(&doc, &by_id(&doc, "c")));
        }
    }

    mod state_matcher_tests {
        use super::*;

        #[test]
        fn test_visibility() {
            let mut doc = doc_with("<div id=\"v\"></div><div id=\"h\"></div>");
            let h = by_id(&doc, "h");
            doc.hide(h);
            assert!(Matcher::BeVisible.matches(&doc, &by_id(&doc, "v")));
            assert!(Matcher::BeHidden.matches(&doc, &h));
            assert!(!Matcher::BeVisible.matches(&doc, &h));
        }

        #[test]
        fn test_form_states() {
            let mut doc = doc_with(
                "<select><option id=\"o1\" selected>1</option><option id=\"o2\">2</option></select>\
                 <input id=\"c\" type=\"checkbox\" checked><input id=\"d\" disabled>",
            );
            assert!(Matcher::BeSelected.matches(&doc, &by_id(&doc, "o1")));
            assert!(!Matcher::BeSelected.matches(&doc, &by_id(&doc, "o2")));
            assert!(Matcher::BeChecked.matches(&doc, &by_id(&doc, "c")));
            assert!(Matcher::BeDisabled.matches(&doc, &by_id(&doc, "d")));
            let c = by_id(&doc, "c");
            doc.set_checked(c, false);
            assert!(!Matcher::BeChecked.matches(&doc, &c));
        }

        #[test]
        fn test_exist_and_removal() {
            let mut doc = doc_with("<div id=\"s\"></div>");
            let selection = doc.select("#s").unwrap();
            assert!(Matcher::Exist.matches(&doc, &selection));
            doc.detach(by_id(&doc, "s"));
            assert!(!Matcher::Exist.matches(&doc, &selection));
            let none = doc.select("#non-existent-element").unwrap();
            assert!(!Matcher::Exist.matches(&doc, &none));
        }

        #[test]
        fn test_be_and_contain() {
            let mut doc = Document::new();
            let detached = doc.create_element("div");
            assert!(Matcher::Be("div".into()).matches(&doc, &detached));
            let doc = doc_with("<div id=\"sandbox\"><span></span></div>");
            let s = by_id(&doc, "sandbox");
            assert!(Matcher::Be("#sandbox".into()).matches(&doc, &s));
            assert!(!Matcher::Be("#wrong-id".into()).matches(&doc, &s));
            assert!(Matcher::Contain("span".into()).matches(&doc, &s));
            assert!(!Matcher::Contain("div".into()).matches(&doc, &s));
            assert!(!Matcher::Be("[[".into()).matches(&doc, &s));
        }

        #[test]
        fn test_be_focused() {
            let mut doc = doc_with("<input id=\"f\"><input id=\"n\">");
            let f = by_id(&doc, "f");
            doc.focus(f);
            assert!(Matcher::BeFocused.matches(&doc, &f));
            assert!(!Matcher::BeFocused.matches(&doc, &by_id(&doc, "n")));
        }
    }

    mod event_matcher_tests {
        use super::*;

        #[test]
        fn test_handle_on_any_target() {
            let mut doc = doc_with("<a id=\"clickme\"></a>");
            let a = by_id(&doc, "clickme");
            let object = doc.create_object();
            let handler = doc.on(a, "click", |_, _| {});
            doc.bind(EventTarget::Window, "resize", &handler);
            doc.bind(object, "click", &handler);
            assert!(Matcher::Handle("click".into()).matches(&doc, &a));
            assert!(Matcher::Handle("resize".into()).matches(&doc, &EventTarget::Window));
            assert!(Matcher::handle_with("click", &handler).matches(&doc, &object));
            assert!(!Matcher::handle_with("click", &HandlerRef::noop()).matches(&doc, &a));
        }

        #[test]
        fn test_triggered_and_prevented() {
            let mut doc = doc_with("<a id=\"clickme\"></a><a id=\"other\"></a>");
            let a = by_id(&doc, "clickme");
            doc.spy_on_event(a, "click");
            doc.on(a, "click", |_, e| e.prevent_default());
            doc.click(a);
            assert!(Matcher::HaveBeenTriggeredOn("click".into()).matches(&doc, &a));
            assert!(Matcher::HaveBeenPreventedOn("click".into()).matches(&doc, &a));
            let other = by_id(&doc, "other");
            assert!(!Matcher::HaveBeenTriggeredOn("click".into()).matches(&doc, &other));
        }
    }

    mod name_tests {
        use super::*;

        fn args(values: &[&str]) -> Vec<String> {
            values.iter().map(|s| (*s).to_string()).collect()
        }

        #[test]
        fn test_canonical_names() {
            assert_eq!(canonical_name("toHaveClass"), "have-class");
            assert_eq!(canonical_name("to-have-class"), "have-class");
            assert_eq!(canonical_name("have_class"), "have-class");
            assert_eq!(canonical_name("toBe"), "be");
            assert_eq!(canonical_name("toHaveBeenTriggeredOn"), "have-been-triggered-on");
        }

        #[test]
        fn test_from_name_round_trips_names() {
            let m = Matcher::from_name("toHaveAttr", &args(&["href", "#"])).unwrap();
            assert_eq!(m.name(), "toHaveAttr");
            let m = Matcher::from_name("be-visible", &[]).unwrap();
            assert_eq!(m.name(), "toBeVisible");
        }

        #[test]
        fn test_from_name_regex_text() {
            let m = Matcher::from_name("toHaveText", &args(&["/^so/"])).unwrap();
            assert!(matches!(m, Matcher::HaveText(TextMatcher::Pattern(_))));
            let m = Matcher::from_name("toHaveText", &args(&["/"])).unwrap();
            assert!(matches!(m, Matcher::HaveText(TextMatcher::Exact(_))));
        }

        #[test]
        fn test_from_name_json_values() {
            let m = Matcher::from_name("toHaveProp", &args(&["checked", "true"])).unwrap();
            assert!(matches!(m, Matcher::HaveProp { value: Some(Value::Bool(true)), .. }));
            let m = Matcher::from_name("toHaveData", &args(&["k", "plain words"])).unwrap();
            assert!(matches!(m, Matcher::HaveData { value: Some(Value::String(_)), .. }));
        }

        #[test]
        fn test_from_name_errors() {
            assert!(Matcher::from_name("toSparkle", &[]).is_err());
            assert!(Matcher::from_name("toHaveClass", &[]).is_err());
            assert!(Matcher::from_name("toBeVisible", &args(&["x"])).is_err());
            assert!(Matcher::from_name("toHandleWith", &args(&["click"])).is_err());
            let err = Matcher::from_name("toHaveAttr", &args(&["a", "b", "c"])).unwrap_err();
            assert!(err.to_string().contains("expected 1 to 2 arguments"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Matcher::have_class("a").to_string(), "to have class \"a\"");
            assert_eq!(
                Matcher::have_text_matching("so").unwrap().to_string(),
                "to have text /so/"
            );
        }
    }
}
