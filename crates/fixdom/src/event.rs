//! Event binding, synchronous dispatch, and the event spy.
//!
//! Handlers are bound per [`EventTarget`] and event name. A [`HandlerRef`]
//! is an `Rc`, so the exact handler a test bound can later be compared by
//! identity (`to_handle_with`). Dispatch is plain and synchronous: handlers
//! on the target run first, then the event bubbles through ancestor
//! elements until a handler stops propagation.
//!
//! Event names may carry a namespace (`"click.menu"`). Dispatch and
//! `handles` use the part before the first dot; `unbind` with a namespace
//! removes only bindings made with that namespace.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dom::{Document, NodeId};

/// Anything handlers can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global window
    Window,
    /// A document node
    Node(NodeId),
    /// A plain object created with [`Document::create_object`]
    Object(u64),
}

impl From<NodeId> for EventTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window => write!(f, "window"),
            Self::Node(node) => write!(f, "node {node:?}"),
            Self::Object(id) => write!(f, "object #{id}"),
        }
    }
}

/// An event being dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type, without namespace
    pub name: String,
    /// Where the event was triggered
    pub target: EventTarget,
    /// Where the running handler is bound
    pub current_target: EventTarget,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    fn new(name: &str, target: EventTarget) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Mark the default action as prevented
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop bubbling after the current target's handlers
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether `prevent_default` was called
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether `stop_propagation` was called
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

type HandlerFn = dyn Fn(&mut Document, &mut Event);

/// A shared reference to an event handler, compared by identity.
#[derive(Clone)]
pub struct HandlerRef(Rc<HandlerFn>);

impl HandlerRef {
    /// Wrap a closure
    pub fn new(handler: impl Fn(&mut Document, &mut Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// A handler that does nothing
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    /// Whether both refer to the same handler
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, document: &mut Document, event: &mut Event) {
        (self.0)(document, event);
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRef({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// A dispatch recorded by the spy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiedEvent {
    /// Event type
    pub name: String,
    /// Target the event was triggered on
    pub target: EventTarget,
    /// Whether a handler prevented the default action
    pub default_prevented: bool,
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    namespace: Option<String>,
    handler: HandlerRef,
}

#[derive(Debug, Default)]
pub(crate) struct EventRegistry {
    bindings: HashMap<EventTarget, Vec<Binding>>,
    spies: HashSet<(String, EventTarget)>,
    records: Vec<SpiedEvent>,
    next_object: u64,
}

fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((base, namespace)) => (base, Some(namespace)),
        None => (name, None),
    }
}

impl Document {
    /// Create a plain object that can carry event bindings.
    pub fn create_object(&mut self) -> EventTarget {
        self.events.next_object += 1;
        EventTarget::Object(self.events.next_object)
    }

    /// Bind a closure and return its handler reference.
    pub fn on(
        &mut self,
        target: impl Into<EventTarget>,
        name: &str,
        handler: impl Fn(&mut Self, &mut Event) + 'static,
    ) -> HandlerRef {
        let handler = HandlerRef::new(handler);
        self.bind(target, name, &handler);
        handler
    }

    /// Bind an existing handler reference.
    pub fn bind(&mut self, target: impl Into<EventTarget>, name: &str, handler: &HandlerRef) {
        let target = target.into();
        let (base, namespace) = split_name(name);
        trace!(event = base, %target, "binding handler");
        self.events
            .bindings
            .entry(target)
            .or_default()
            .push(Binding {
                name: base.to_string(),
                namespace: namespace.map(String::from),
                handler: handler.clone(),
            });
    }

    /// Remove bindings for `name` (and only its namespace, when given).
    pub fn unbind(&mut self, target: impl Into<EventTarget>, name: &str) {
        let (base, namespace) = split_name(name);
        if let Some(list) = self.events.bindings.get_mut(&target.into()) {
            list.retain(|b| {
                let name_matches = base.is_empty() || b.name == base;
                let ns_matches = namespace.is_none() || b.namespace.as_deref() == namespace;
                !(name_matches && ns_matches)
            });
        }
    }

    /// Remove one specific handler for `name`.
    pub fn unbind_handler(&mut self, target: impl Into<EventTarget>, name: &str, handler: &HandlerRef) {
        let (base, _) = split_name(name);
        if let Some(list) = self.events.bindings.get_mut(&target.into()) {
            list.retain(|b| !(b.name == base && b.handler.same_as(handler)));
        }
    }

    /// Handlers bound on `target` for `name`, in binding order.
    #[must_use]
    pub fn handlers(&self, target: impl Into<EventTarget>, name: &str) -> Vec<HandlerRef> {
        let (base, _) = split_name(name);
        self.events
            .bindings
            .get(&target.into())
            .map(|list| {
                list.iter()
                    .filter(|b| b.name == base)
                    .map(|b| b.handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any handler is bound on `target` for `name`.
    #[must_use]
    pub fn handles(&self, target: impl Into<EventTarget>, name: &str) -> bool {
        !self.handlers(target, name).is_empty()
    }

    /// Whether `handler` itself is bound on `target` for `name`.
    #[must_use]
    pub fn handles_with(&self, target: impl Into<EventTarget>, name: &str, handler: &HandlerRef) -> bool {
        self.handlers(target, name).iter().any(|h| h.same_as(handler))
    }

    /// Dispatch `name` on `target`, bubbling through ancestor elements.
    ///
    /// Handler lists are snapshotted per target, so handlers may bind or
    /// unbind freely while running.
    pub fn trigger(&mut self, target: impl Into<EventTarget>, name: &str) -> Event {
        let target = target.into();
        let (base, _) = split_name(name);
        let mut event = Event::new(base, target);

        let mut path = vec![target];
        if let EventTarget::Node(node) = target {
            let mut current = self.parent(node);
            while let Some(ancestor) = current {
                path.push(EventTarget::Node(ancestor));
                current = self.parent(ancestor);
            }
        }

        for current in path {
            event.current_target = current;
            for handler in self.handlers(current, base) {
                handler.call(self, &mut event);
            }
            if event.propagation_stopped {
                break;
            }
        }
        event.current_target = target;

        if self.events.spies.contains(&(base.to_string(), target)) {
            trace!(event = base, %target, "spy recorded event");
            self.events.records.push(SpiedEvent {
                name: base.to_string(),
                target,
                default_prevented: event.default_prevented,
            });
        }
        event
    }

    /// Shorthand for `trigger(node, "click")`.
    pub fn click(&mut self, node: NodeId) -> Event {
        self.trigger(node, "click")
    }

    /// Start recording dispatches of `name` on `target`.
    pub fn spy_on_event(&mut self, target: impl Into<EventTarget>, name: &str) {
        let (base, _) = split_name(name);
        let _ = self.events.spies.insert((base.to_string(), target.into()));
    }

    /// Whether a spied dispatch of `name` on `target` was recorded.
    #[must_use]
    pub fn was_triggered(&self, target: impl Into<EventTarget>, name: &str) -> bool {
        let target = target.into();
        let (base, _) = split_name(name);
        self.events
            .records
            .iter()
            .any(|r| r.name == base && r.target == target)
    }

    /// Whether a recorded dispatch of `name` on `target` had its default prevented.
    #[must_use]
    pub fn was_prevented(&self, target: impl Into<EventTarget>, name: &str) -> bool {
        let target = target.into();
        let (base, _) = split_name(name);
        self.events
            .records
            .iter()
            .any(|r| r.name == base && r.target == target && r.default_prevented)
    }

    /// All spy records in dispatch order.
    #[must_use]
    pub fn spied_events(&self) -> &[SpiedEvent] {
        &self.events.records
    }

    /// Drop spies and their records. Bindings are kept.
    pub fn clear_spies(&mut self) {
        self.events.spies.clear();
        self.events.records.clear();
    }

    /// Drop every binding, spy, and record.
    pub fn clear_events(&mut self) {
        self.events = EventRegistry {
            next_object: self.events.next_object,
            ..EventRegistry::default()
        };
    }
}
