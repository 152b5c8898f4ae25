//! # Example Registry
//!
//! Every example is an independent unit: a source file, its embedded text, and a
//! constructor that builds the example's app (layout + callbacks). The registry
//! builds each unit once at startup and indexes it by an identifier derived from
//! the source path:
//!
//! ```text
//! pages/poisson-distribution.rs  →  "poisson-distribution"
//! ```
//!
//! After `Registry::build` returns, the registry is never mutated again and is
//! shared behind an `Arc`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::core::callbacks::Callback;
use crate::core::layout::Node;

/// What an example constructs for itself.
#[derive(Debug, Clone)]
pub struct ExampleApp {
    pub title: String,
    pub description: String,
    pub layout: Node,
    pub callbacks: Vec<Callback>,
}

/// One discovered example source unit.
#[derive(Clone, Copy)]
pub struct ExampleUnit {
    pub path: &'static str,
    pub source: &'static str,
    pub build: fn() -> ExampleApp,
}

impl ExampleUnit {
    pub fn identifier(&self) -> String {
        identifier_from_source_path(self.path)
    }
}

#[derive(Debug, Clone)]
pub struct ExampleEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub layout: Arc<Node>,
    pub callbacks: Vec<Callback>,
    pub source: Arc<str>,
}

/// Base name of `path` without its extension.
pub fn identifier_from_source_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, ExampleEntry>,
    sources: BTreeMap<String, Arc<str>>,
}

impl Registry {
    /// Builds every unit and indexes it by identifier.
    ///
    /// When two units derive the same identifier the later one replaces the
    /// earlier one.
    pub fn build(units: impl IntoIterator<Item = ExampleUnit>) -> Self {
        let mut registry = Registry::default();
        for unit in units {
            let app = (unit.build)();
            registry.insert(unit.identifier(), app, unit.source);
        }
        registry
    }

    fn insert(&mut self, id: String, app: ExampleApp, source: &str) {
        let source: Arc<str> = Arc::from(source);
        self.sources.insert(id.clone(), Arc::clone(&source));
        self.entries.insert(
            id.clone(),
            ExampleEntry {
                id,
                title: app.title,
                description: app.description,
                layout: Arc::new(app.layout),
                callbacks: app.callbacks,
                source,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&ExampleEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn source(&self, id: &str) -> Option<&str> {
        self.sources.get(id).map(|s| s.as_ref())
    }

    /// Identifier → raw source text.
    pub fn sources(&self) -> &BTreeMap<String, Arc<str>> {
        &self.sources
    }

    /// Entries sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &ExampleEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
