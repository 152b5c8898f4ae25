//! # Dispatcher
//!
//! Composes the callback sets of every example into one host dispatcher.
//!
//! Each example registers under its own namespace. Registration is where
//! conflicts are caught: a namespace can only be registered once, a callback may
//! only bind components inside its own namespace, and no two callbacks may
//! produce the same output. A failed registration leaves the dispatcher unchanged.
//!
//! Once startup is done the dispatcher is only read, so it is shared behind an
//! `Arc` across sessions without locking.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::callbacks::{Binding, Callback, CallbackError, Invocation, PropStore};
use crate::core::registry::Registry;

/// Upper bound on chained callback rounds in `settle`.
pub const MAX_CASCADE_DEPTH: usize = 16;

/// Locates one callback inside the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackRef {
    pub namespace: String,
    pub index: usize,
}

/// A callback that failed during `settle`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackFailure {
    pub output: Binding,
    pub error: CallbackError,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
    DuplicateNamespace(String),
    ForeignComponent { namespace: String, binding: Binding },
    OutputCollision {
        binding: Binding,
        existing: String,
        incoming: String,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::DuplicateNamespace(ns) => {
                write!(f, "namespace '{ns}' is already registered")
            }
            MergeError::ForeignComponent { namespace, binding } => {
                write!(f, "callback in '{namespace}' binds foreign component {binding}")
            }
            MergeError::OutputCollision {
                binding,
                existing,
                incoming,
            } => write!(
                f,
                "output {binding} from '{incoming}' is already produced by '{existing}'"
            ),
        }
    }
}

impl std::error::Error for MergeError {}

// ============================================================================
// Dispatcher
// ============================================================================

#[derive(Debug, Default)]
pub struct Dispatcher {
    namespaces: BTreeMap<String, Vec<Callback>>,
    outputs: HashMap<Binding, CallbackRef>,
    listeners: HashMap<Binding, Vec<CallbackRef>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every example in the registry, in identifier order.
    pub fn from_registry(registry: &Registry) -> Result<Self, MergeError> {
        let mut dispatcher = Dispatcher::new();
        for entry in registry.iter() {
            dispatcher.register(&entry.id, entry.callbacks.clone())?;
        }
        info!(
            "Dispatcher ready: {} namespaces, {} callbacks",
            dispatcher.namespaces.len(),
            dispatcher.outputs.len()
        );
        Ok(dispatcher)
    }

    /// Adds `callbacks` under `namespace`, or rejects all of them.
    pub fn register(&mut self, namespace: &str, callbacks: Vec<Callback>) -> Result<(), MergeError> {
        if self.namespaces.contains_key(namespace) {
            return Err(MergeError::DuplicateNamespace(namespace.to_string()));
        }

        let mut staged: HashSet<&Binding> = HashSet::new();
        for callback in &callbacks {
            if let Some(binding) = callback.bindings().find(|b| !b.component.belongs_to(namespace)) {
                return Err(MergeError::ForeignComponent {
                    namespace: namespace.to_string(),
                    binding: binding.clone(),
                });
            }
            if let Some(existing) = self.outputs.get(&callback.output) {
                return Err(MergeError::OutputCollision {
                    binding: callback.output.clone(),
                    existing: existing.namespace.clone(),
                    incoming: namespace.to_string(),
                });
            }
            if !staged.insert(&callback.output) {
                return Err(MergeError::OutputCollision {
                    binding: callback.output.clone(),
                    existing: namespace.to_string(),
                    incoming: namespace.to_string(),
                });
            }
        }

        for (index, callback) in callbacks.iter().enumerate() {
            let cref = CallbackRef {
                namespace: namespace.to_string(),
                index,
            };
            self.outputs.insert(callback.output.clone(), cref.clone());
            for input in &callback.inputs {
                self.listeners.entry(input.clone()).or_default().push(cref.clone());
            }
        }
        debug!("Registered {} callbacks under '{}'", callbacks.len(), namespace);
        self.namespaces.insert(namespace.to_string(), callbacks);
        Ok(())
    }

    pub fn get(&self, cref: &CallbackRef) -> Option<&Callback> {
        self.namespaces.get(&cref.namespace)?.get(cref.index)
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Number of registered callbacks across all namespaces.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Callbacks listening on `changed`.
    pub fn triggered_by(&self, changed: &Binding) -> Vec<CallbackRef> {
        self.listeners.get(changed).cloned().unwrap_or_default()
    }

    /// Callbacks listening on any of `changed`, each listed once.
    pub fn triggered_by_any(&self, changed: &[Binding]) -> Vec<CallbackRef> {
        let mut out: Vec<CallbackRef> = Vec::new();
        for binding in changed {
            for cref in self.triggered_by(binding) {
                if !out.contains(&cref) {
                    out.push(cref);
                }
            }
        }
        out
    }

    /// Every callback of a page, fired when the page loads.
    pub fn initial_callbacks(&self, namespace: &str) -> Vec<CallbackRef> {
        let count = self.namespaces.get(namespace).map_or(0, Vec::len);
        (0..count)
            .map(|index| CallbackRef {
                namespace: namespace.to_string(),
                index,
            })
            .collect()
    }

    /// Snapshots the inputs of `cref` from `store`.
    pub fn prepare(&self, cref: &CallbackRef, store: &PropStore) -> Option<Invocation> {
        self.get(cref).map(|callback| Invocation::new(callback, store))
    }

    /// Runs the initial callbacks of `namespace` and everything they trigger.
    pub fn load(&self, namespace: &str, store: &mut PropStore) -> Vec<CallbackFailure> {
        let crefs = self.initial_callbacks(namespace);
        self.run_cascade(crefs, store)
    }

    /// Runs every callback triggered by `changed`, following chains until quiet.
    pub fn settle(&self, changed: &[Binding], store: &mut PropStore) -> Vec<CallbackFailure> {
        let crefs = self.triggered_by_any(changed);
        self.run_cascade(crefs, store)
    }

    fn run_cascade(&self, mut crefs: Vec<CallbackRef>, store: &mut PropStore) -> Vec<CallbackFailure> {
        let mut failures = Vec::new();
        for _ in 0..MAX_CASCADE_DEPTH {
            if crefs.is_empty() {
                return failures;
            }
            let mut changed = Vec::new();
            for cref in &crefs {
                let Some(invocation) = self.prepare(cref, store) else {
                    continue;
                };
                match invocation.run() {
                    Ok(Some(value)) => {
                        if store.set(invocation.output.clone(), value) {
                            changed.push(invocation.output);
                        }
                    }
                    Ok(None) => {}
                    Err(error) => failures.push(CallbackFailure {
                        output: invocation.output,
                        error,
                    }),
                }
            }
            crefs = self.triggered_by_any(&changed);
        }
        if !crefs.is_empty() {
            warn!("Callback cascade stopped after {} rounds", MAX_CASCADE_DEPTH);
        }
        failures
    }
}

/// Applies a handler result to `store`. Returns the output binding if its value changed.
pub fn apply_result(
    store: &mut PropStore,
    output: &Binding,
    result: Result<Option<Value>, CallbackError>,
) -> Result<Option<Binding>, CallbackError> {
    let Some(value) = result? else {
        return Ok(None);
    };
    Ok(store.set(output.clone(), value).then(|| output.clone()))
}
