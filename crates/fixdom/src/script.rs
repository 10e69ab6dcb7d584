//! Script hook for inserted `<script>` elements.
//!
//! The document has no script engine of its own. A test installs a
//! [`ScriptRunner`] with [`Document::set_script_runner`]; whenever markup is
//! inserted through [`Document::append_html`], [`Document::append_nodes`] or
//! the fixture loaders, each newly attached JavaScript `<script>` element is
//! handed to the runner once, in document order, after the whole fragment
//! is in place.
//!
//! ```
//! use fixdom::{Document, FixdomResult};
//!
//! let mut doc = Document::new();
//! doc.set_script_runner(|doc: &mut Document, source: &str| -> FixdomResult<()> {
//!     if source.contains("mark") {
//!         let body = doc.body();
//!         doc.add_class(body, "marked");
//!     }
//!     Ok(())
//! });
//! let body = doc.body();
//! doc.append_html(body, "<script>mark()</script>").unwrap();
//! assert!(doc.has_class(body, "marked"));
//! ```

use crate::dom::Document;
use crate::result::FixdomResult;

/// Executes the text of an inserted `<script>` element.
pub trait ScriptRunner {
    /// Run `source` against the document it was inserted into.
    ///
    /// # Errors
    ///
    /// Errors propagate out of the insertion that triggered the script.
    fn run(&self, document: &mut Document, source: &str) -> FixdomResult<()>;
}

impl<F> ScriptRunner for F
where
    F: Fn(&mut Document, &str) -> FixdomResult<()>,
{
    fn run(&self, document: &mut Document, source: &str) -> FixdomResult<()> {
        self(document, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::FixdomError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_doc() -> (Document, Rc<RefCell<Vec<String>>>) {
        let mut doc = Document::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        doc.set_script_runner(move |_: &mut Document, source: &str| -> FixdomResult<()> {
            log.borrow_mut().push(source.to_string());
            Ok(())
        });
        (doc, seen)
    }

    #[test]
    fn test_scripts_run_in_document_order() {
        let (mut doc, seen) = recording_doc();
        let body = doc.body();
        doc.append_html(
            body,
            "<script>one()</script><div><script>two()</script></div><script>three()</script>",
        )
        .unwrap();
        assert_eq!(*seen.borrow(), vec!["one()", "two()", "three()"]);
    }

    #[test]
    fn test_script_sees_complete_fragment() {
        let mut doc = Document::new();
        doc.set_script_runner(|doc: &mut Document, _: &str| -> FixdomResult<()> {
            let later = doc.element_by_id("later").ok_or_else(|| FixdomError::script("missing"))?;
            doc.add_class(later, "touched");
            Ok(())
        });
        let body = doc.body();
        doc.append_html(body, "<script>x</script><p id=\"later\"></p>").unwrap();
        let later = doc.element_by_id("later").unwrap();
        assert!(doc.has_class(later, "touched"));
    }

    #[test]
    fn test_script_runs_once_when_moved() {
        let (mut doc, seen) = recording_doc();
        let body = doc.body();
        let nodes = doc.append_html(body, "<div><script>once()</script></div>").unwrap();
        let other = doc.create_element("section");
        doc.append_nodes(body, &[other]).unwrap();
        doc.append_nodes(other, &nodes).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_non_javascript_type_skipped() {
        let (mut doc, seen) = recording_doc();
        let body = doc.body();
        doc.append_html(
            body,
            "<script type=\"text/template\"><b>x</b></script><script type=\"text/javascript\">y</script>",
        )
        .unwrap();
        assert_eq!(*seen.borrow(), vec!["y"]);
    }

    #[test]
    fn test_detached_insertion_does_not_run() {
        let (mut doc, seen) = recording_doc();
        let holder = doc.create_element("div");
        doc.append_html(holder, "<script>later()</script>").unwrap();
        assert!(seen.borrow().is_empty());
        let body = doc.body();
        doc.append_nodes(body, &[holder]).unwrap();
        assert_eq!(*seen.borrow(), vec!["later()"]);
    }

    #[test]
    fn test_runner_error_propagates() {
        let mut doc = Document::new();
        doc.set_script_runner(|_: &mut Document, _: &str| -> FixdomResult<()> {
            Err(FixdomError::script("boom"))
        });
        let body = doc.body();
        let err = doc.append_html(body, "<script>x</script>").unwrap_err();
        assert!(matches!(err, FixdomError::Script { .. }));
    }

    #[test]
    fn test_without_runner_scripts_are_inert() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_html(body, "<script>x</script>").unwrap();
        assert_eq!(doc.select("script").unwrap().len(), 1);
    }
}
