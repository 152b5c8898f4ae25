//! # Callbacks
//!
//! A callback wires one output property to a list of input properties through a
//! plain function. Whenever one of the inputs changes, the handler is invoked with
//! the current input values and its return value becomes the new output value.
//!
//! ```text
//! inputs: [lambda.value]  ──handler──▶  output: histogram.figure
//! ```
//!
//! Component identifiers are namespaced per example: `{example}-x-{local}`.
//! The namespace keeps examples from stepping on each other once their
//! callbacks live in the same dispatcher.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Separator between an example's identifier and a component's local name.
pub const NAMESPACE_SEPARATOR: &str = "-x-";

// ============================================================================
// Identifiers
// ============================================================================

/// A component identifier, e.g. `poisson-distribution-x-lambda`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds `{namespace}-x-{local}`.
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self(format!("{}{local}", Self::prefix(namespace)))
    }

    /// The literal prefix every component of `namespace` carries.
    pub fn prefix(namespace: &str) -> String {
        format!("{namespace}{NAMESPACE_SEPARATOR}")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local name of this component inside `namespace`, if it belongs there.
    pub fn local_name(&self, namespace: &str) -> Option<&str> {
        self.0
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
            .filter(|local| !local.is_empty())
    }

    pub fn belongs_to(&self, namespace: &str) -> bool {
        self.local_name(namespace).is_some()
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Component properties that callbacks read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    /// Current value of an input field.
    Value,
    /// A serialized `Figure` shown by a graph.
    Figure,
    /// Markdown text shown by an output block.
    Children,
}

impl Prop {
    pub fn name(self) -> &'static str {
        match self {
            Prop::Value => "value",
            Prop::Figure => "figure",
            Prop::Children => "children",
        }
    }
}

/// A (component, property) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    pub component: ComponentId,
    pub prop: Prop,
}

impl Binding {
    pub fn new(component: impl Into<ComponentId>, prop: Prop) -> Self {
        Self {
            component: component.into(),
            prop,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.prop.name())
    }
}

// ============================================================================
// Callbacks
// ============================================================================

/// Handler signature. `Ok(None)` means "leave the output as it is".
pub type Handler = fn(&[Value]) -> Result<Option<Value>, CallbackError>;

#[derive(Clone)]
pub struct Callback {
    pub output: Binding,
    pub inputs: Vec<Binding>,
    pub handler: Handler,
}

impl Callback {
    pub fn new(output: (&str, Prop), inputs: &[(&str, Prop)], handler: Handler) -> Self {
        Self {
            output: Binding::new(output.0, output.1),
            inputs: inputs
                .iter()
                .map(|(component, prop)| Binding::new(*component, *prop))
                .collect(),
            handler,
        }
    }

    /// Every binding this callback touches, output first.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        std::iter::once(&self.output).chain(self.inputs.iter())
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackError {
    /// The handler rejected its input values.
    InvalidInput(String),
    /// The handler's output could not be serialized.
    Serialization(String),
    /// The handler panicked while running.
    Panicked(String),
    /// The handler did not finish within the allowed time (seconds).
    TimedOut(u64),
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CallbackError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            CallbackError::Panicked(msg) => write!(f, "handler panicked: {msg}"),
            CallbackError::TimedOut(secs) => write!(f, "handler timed out after {secs}s"),
        }
    }
}

impl std::error::Error for CallbackError {}

impl From<serde_json::Error> for CallbackError {
    fn from(e: serde_json::Error) -> Self {
        CallbackError::Serialization(e.to_string())
    }
}

// ============================================================================
// Property Store
// ============================================================================

/// Current property values for one session.
#[derive(Debug, Default, Clone)]
pub struct PropStore {
    values: HashMap<Binding, Value>,
}

impl PropStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, binding: &Binding) -> Option<&Value> {
        self.values.get(binding)
    }

    /// Sets a value. Returns `true` if the stored value changed.
    pub fn set(&mut self, binding: Binding, value: Value) -> bool {
        match self.values.get(&binding) {
            Some(existing) if *existing == value => false,
            _ => {
                self.values.insert(binding, value);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Invocation
// ============================================================================

/// A callback ready to run: its handler plus a snapshot of its input values.
///
/// Invocations own everything they need, so they can be sent to another thread.
#[derive(Clone)]
pub struct Invocation {
    pub output: Binding,
    pub args: Vec<Value>,
    handler: Handler,
}

impl Invocation {
    pub fn new(callback: &Callback, store: &PropStore) -> Self {
        let args = callback
            .inputs
            .iter()
            .map(|input| store.get(input).cloned().unwrap_or(Value::Null))
            .collect();
        Self {
            output: callback.output.clone(),
            args,
            handler: callback.handler,
        }
    }

    pub fn run(&self) -> Result<Option<Value>, CallbackError> {
        (self.handler)(&self.args)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("output", &self.output)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(args: &[Value]) -> Result<Option<Value>, CallbackError> {
        Ok(args.first().cloned())
    }

    #[test]
    fn test_local_name_strips_namespace() {
        let id = ComponentId::new("poisson-distribution-x-lambda");
        assert_eq!(id.local_name("poisson-distribution"), Some("lambda"));
        assert!(id.belongs_to("poisson-distribution"));
        assert!(!id.belongs_to("poisson"));
        assert!(!id.belongs_to("binomial-distribution"));
    }

    #[test]
    fn test_empty_local_name_does_not_belong() {
        let id = ComponentId::new("demo-x-");
        assert_eq!(id.local_name("demo"), None);
    }

    #[test]
    fn test_namespaced_builds_prefix() {
        let id = ComponentId::namespaced("demo", "input");
        assert_eq!(id.as_str(), "demo-x-input");
        assert_eq!(ComponentId::prefix("demo"), "demo-x-");
    }

    #[test]
    fn test_binding_display() {
        let binding = Binding::new("demo-x-graph", Prop::Figure);
        assert_eq!(binding.to_string(), "demo-x-graph.figure");
    }

    #[test]
    fn test_store_set_reports_change() {
        let mut store = PropStore::new();
        let binding = Binding::new("demo-x-in", Prop::Value);
        assert!(store.set(binding.clone(), json!(1)));
        assert!(!store.set(binding.clone(), json!(1)));
        assert!(store.set(binding.clone(), json!(2)));
        assert_eq!(store.get(&binding), Some(&json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invocation_reads_missing_inputs_as_null() {
        let callback = Callback::new(
            ("demo-x-out", Prop::Children),
            &[("demo-x-in", Prop::Value)],
            echo,
        );
        let invocation = Invocation::new(&callback, &PropStore::new());
        assert_eq!(invocation.args, vec![Value::Null]);
        assert_eq!(invocation.run(), Ok(Some(Value::Null)));
    }

    #[test]
    fn test_callback_bindings_output_first() {
        let callback = Callback::new(
            ("demo-x-out", Prop::Children),
            &[("demo-x-a", Prop::Value), ("demo-x-b", Prop::Value)],
            echo,
        );
        let names: Vec<String> = callback.bindings().map(|b| b.to_string()).collect();
        assert_eq!(
            names,
            vec!["demo-x-out.children", "demo-x-a.value", "demo-x-b.value"]
        );
    }
}
