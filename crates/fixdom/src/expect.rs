//! Assertion builder over matchers.
//!
//! ```
//! use fixdom::{expect, Document};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! doc.append_html(body, "<p id=\"greeting\" class=\"big\">hello</p>").unwrap();
//! let p = doc.select("#greeting").unwrap();
//!
//! expect(&doc, &p).to_have_class("big").unwrap();
//! expect(&doc, &p).not().to_have_class("small").unwrap();
//! assert!(expect(&doc, &p).to_have_text("bye").is_err());
//! ```

use regex::Regex;
use serde_json::Value;

use crate::dom::Document;
use crate::event::HandlerRef;
use crate::matcher::{ElementLike, Matcher, TextMatcher};
use crate::result::{FixdomError, FixdomResult};

/// Result of evaluating one expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Convert into a `Result`, failing with [`FixdomError::AssertionFailed`].
    ///
    /// # Errors
    ///
    /// Returns the failure message when the assertion did not pass.
    pub fn into_result(self) -> FixdomResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(FixdomError::AssertionFailed {
                message: self.message,
            })
        }
    }
}

fn verdict(holds: bool, negated: bool, subject: &str, description: &str) -> AssertionResult {
    if holds != negated {
        AssertionResult::pass()
    } else if negated {
        AssertionResult::fail(format!("expected {subject} not {description}"))
    } else {
        AssertionResult::fail(format!("expected {subject} {description}"))
    }
}

/// Expectation on a subject in a document.
#[derive(Debug, Clone)]
pub struct Expect<'a, S> {
    document: &'a Document,
    subject: S,
    negated: bool,
}

impl<'a, S: ElementLike> Expect<'a, S> {
    /// Create a new expectation
    #[must_use]
    pub const fn new(document: &'a Document, subject: S) -> Self {
        Self {
            document,
            subject,
            negated: false,
        }
    }

    /// Negate the expectation
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Evaluate a matcher without failing
    #[must_use]
    pub fn evaluate(&self, matcher: &Matcher) -> AssertionResult {
        let holds = matcher.matches(self.document, &self.subject);
        verdict(
            holds,
            self.negated,
            &self.subject.describe(self.document),
            &matcher.to_string(),
        )
    }

    /// Assert a matcher
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::AssertionFailed`] when the (possibly negated)
    /// matcher does not hold.
    pub fn to(&self, matcher: &Matcher) -> FixdomResult<()> {
        self.evaluate(matcher).into_result()
    }

    /// Assert the element has a class
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_class(&self, class: &str) -> FixdomResult<()> {
        self.to(&Matcher::have_class(class))
    }

    /// Assert the element has an attribute
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_attr(&self, name: &str) -> FixdomResult<()> {
        self.to(&Matcher::have_attr(name))
    }

    /// Assert the element has an attribute with exactly this value
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_attr_value(&self, name: &str, value: &str) -> FixdomResult<()> {
        self.to(&Matcher::have_attr_value(name, value))
    }

    /// Assert the element has a live property
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_prop(&self, name: &str) -> FixdomResult<()> {
        self.to(&Matcher::have_prop(name))
    }

    /// Assert the element has a live property equal to `value`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_prop_value(&self, name: &str, value: impl Into<Value>) -> FixdomResult<()> {
        self.to(&Matcher::have_prop_value(name, value))
    }

    /// Assert the element's id
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_id(&self, id: &str) -> FixdomResult<()> {
        self.to(&Matcher::HaveId(id.to_string()))
    }

    /// Assert the element's inner markup, ignoring tag case
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_html(&self, html: &str) -> FixdomResult<()> {
        self.to(&Matcher::HaveHtml(html.to_string()))
    }

    /// Assert the element's trimmed text, or a compiled regex over its text
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_text(&self, text: impl Into<TextMatcher>) -> FixdomResult<()> {
        self.to(&Matcher::have_text(text))
    }

    /// Assert the element's text matches `pattern`
    ///
    /// # Errors
    ///
    /// Fails on an invalid pattern, or see [`Expect::to`].
    pub fn to_have_text_matching(&self, pattern: &str) -> FixdomResult<()> {
        self.to(&Matcher::HaveText(TextMatcher::Pattern(Regex::new(pattern)?)))
    }

    /// Assert the element's form value
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_value(&self, value: &str) -> FixdomResult<()> {
        self.to(&Matcher::HaveValue(value.to_string()))
    }

    /// Assert the element has data under `key`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_data(&self, key: &str) -> FixdomResult<()> {
        self.to(&Matcher::have_data(key))
    }

    /// Assert the element has data under `key` equal to `value`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_have_data_value(&self, key: &str, value: impl Into<Value>) -> FixdomResult<()> {
        self.to(&Matcher::have_data_value(key, value))
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_visible(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeVisible)
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_hidden(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeHidden)
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_selected(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeSelected)
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_checked(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeChecked)
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_empty(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeEmpty)
    }

    /// Assert the element is attached to the document
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_exist(&self) -> FixdomResult<()> {
        self.to(&Matcher::Exist)
    }

    /// Assert the element matches `selector`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be(&self, selector: &str) -> FixdomResult<()> {
        self.to(&Matcher::Be(selector.to_string()))
    }

    /// Assert a descendant matches `selector`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_contain(&self, selector: &str) -> FixdomResult<()> {
        self.to(&Matcher::Contain(selector.to_string()))
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_disabled(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeDisabled)
    }

    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_be_focused(&self) -> FixdomResult<()> {
        self.to(&Matcher::BeFocused)
    }

    /// Assert a handler is bound for `event`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_handle(&self, event: &str) -> FixdomResult<()> {
        self.to(&Matcher::Handle(event.to_string()))
    }

    /// Assert `handler` itself is bound for `event`
    ///
    /// # Errors
    ///
    /// See [`Expect::to`].
    pub fn to_handle_with(&self, event: &str, handler: &HandlerRef) -> FixdomResult<()> {
        self.to(&Matcher::handle_with(event, handler))
    }
}

/// Expectation on a spied event.
#[derive(Debug, Clone)]
pub struct EventExpect<'a> {
    document: &'a Document,
    event: String,
    negated: bool,
}

impl<'a> EventExpect<'a> {
    /// Create a new event expectation
    #[must_use]
    pub fn new(document: &'a Document, event: impl Into<String>) -> Self {
        Self {
            document,
            event: event.into(),
            negated: false,
        }
    }

    /// Negate the expectation
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    fn check(&self, matcher: &Matcher, target: &impl ElementLike, verb: &str) -> FixdomResult<()> {
        let holds = matcher.matches(self.document, target);
        verdict(
            holds,
            self.negated,
            &format!("event {:?}", self.event),
            &format!("to have been {verb} on {}", target.describe(self.document)),
        )
        .into_result()
    }

    /// Assert the spy recorded the event on `target`
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::AssertionFailed`] when it did not (or did, negated).
    pub fn to_have_been_triggered_on(&self, target: impl ElementLike) -> FixdomResult<()> {
        let matcher = Matcher::HaveBeenTriggeredOn(self.event.clone());
        self.check(&matcher, &target, "triggered")
    }

    /// Assert the spy recorded the event on `target` with its default prevented
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::AssertionFailed`] when it did not (or did, negated).
    pub fn to_have_been_prevented_on(&self, target: impl ElementLike) -> FixdomResult<()> {
        let matcher = Matcher::HaveBeenPreventedOn(self.event.clone());
        self.check(&matcher, &target, "prevented")
    }
}

/// Create an expectation for a subject
#[must_use]
pub const fn expect<S: ElementLike>(document: &Document, subject: S) -> Expect<'_, S> {
    Expect::new(document, subject)
}

/// Create an expectation for a spied event
#[must_use]
pub fn expect_event<'a>(document: &'a Document, event: &str) -> EventExpect<'a> {
    EventExpect::new(document, event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;
    use crate::event::EventTarget;

    fn doc_with(html: &str) -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_html(body, html).unwrap();
        doc
    }

    mod assertion_result_tests {
        use super::*;

        #[test]
        fn test_pass_and_fail() {
            assert!(AssertionResult::pass().into_result().is_ok());
            let err = AssertionResult::fail("nope").into_result().unwrap_err();
            assert_eq!(err.to_string(), "Assertion failed: nope");
        }

        #[test]
        fn test_verdict_negation() {
            assert!(verdict(true, false, "s", "d").passed);
            assert!(verdict(false, true, "s", "d").passed);
            assert_eq!(verdict(true, true, "s", "to x").message, "expected s not to x");
            assert_eq!(verdict(false, false, "s", "to x").message, "expected s to x");
        }
    }

    mod expect_tests {
        use super::*;

        #[test]
        fn test_failure_message_names_subject_and_matcher() {
            let doc = doc_with("<p id=\"p\" class=\"a\"></p>");
            let p = doc.element_by_id("p").unwrap();
            let err = expect(&doc, p).to_have_class("b").unwrap_err();
            assert_eq!(
                err.to_string(),
                "Assertion failed: expected <p id=\"p\" class=\"a\"> to have class \"b\""
            );
            let err = expect(&doc, p).not().to_have_class("a").unwrap_err();
            assert!(err.to_string().contains("not to have class"));
        }

        #[test]
        fn test_double_not_cancels() {
            let doc = doc_with("<p id=\"p\" class=\"a\"></p>");
            let p = doc.element_by_id("p").unwrap();
            expect(&doc, p).not().not().to_have_class("a").unwrap();
        }

        #[test]
        fn test_subject_by_reference() {
            let doc = doc_with("<p class=\"a\"></p>");
            let selection = doc.select("p").unwrap();
            expect(&doc, &selection).to_have_class("a").unwrap();
            expect(&doc, &selection).to_exist().unwrap();
            assert_eq!(selection.len(), 1);
        }

        #[test]
        fn test_empty_selection_negated_passes() {
            let doc = Document::new();
            let none = doc.select("#nothing").unwrap();
            expect(&doc, &none).not().to_have_class("some-class").unwrap();
            expect(&doc, None::<NodeId>).not().to_exist().unwrap();
        }

        #[test]
        fn test_invalid_pattern_is_error() {
            let doc = doc_with("<p>x</p>");
            let p = doc.select("p").unwrap();
            let err = expect(&doc, &p).to_have_text_matching("(").unwrap_err();
            assert!(matches!(err, FixdomError::InvalidPattern(_)));
        }

        #[test]
        fn test_handle_on_window() {
            let mut doc = Document::new();
            let handler = doc.on(EventTarget::Window, "resize", |_, _| {});
            expect(&doc, EventTarget::Window).to_handle("resize").unwrap();
            expect(&doc, EventTarget::Window)
                .to_handle_with("resize", &handler)
                .unwrap();
        }
    }

    mod event_expect_tests {
        use super::*;

        #[test]
        fn test_triggered_messages() {
            let mut doc = doc_with("<a id=\"clickme\">Click Me</a>");
            let a = doc.element_by_id("clickme").unwrap();
            doc.spy_on_event(a, "click");
            let err = expect_event(&doc, "click")
                .to_have_been_triggered_on(a)
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Assertion failed: expected event \"click\" to have been triggered on <a id=\"clickme\">"
            );
            expect_event(&doc, "click").not().to_have_been_triggered_on(a).unwrap();
            doc.click(a);
            expect_event(&doc, "click").to_have_been_triggered_on(a).unwrap();
            expect_event(&doc, "click").not().to_have_been_prevented_on(a).unwrap();
        }
    }
}
