//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::config::{CliOverrides, GalleryConfig, ResolvedConfig, resolve_with_env};
use crate::core::dispatcher::Dispatcher;
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::{ExampleApp, ExampleUnit, Registry};
use crate::core::state::App;

/// Source text registered for the `demo` example.
pub const DEMO_SOURCE: &str = r#"Node::input("demo-x-count", "count", 3)
Node::output("demo-x-double")
Node::graph("demo-x-graph")
"#;

fn count(args: &[Value]) -> Option<f64> {
    match args.first()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn double(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    match count(args) {
        Some(n) => Ok(Some(json!(format!("{}", n * 2.0)))),
        None => Err(CallbackError::InvalidInput("count must be a number".to_string())),
    }
}

fn summary(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    Ok(args
        .first()
        .and_then(Value::as_str)
        .map(|doubled| json!(format!("double is {doubled}"))))
}

fn bars(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let Some(n) = count(args) else {
        return Ok(None);
    };
    let figure = Figure::new("Bars")
        .axes("i", "value")
        .bars((0..n.max(0.0) as usize).map(|i| (i.to_string(), i as f64)));
    Ok(Some(figure.to_value()?))
}

fn demo() -> ExampleApp {
    ExampleApp {
        title: "Demo".to_string(),
        description: "Doubles a number.".to_string(),
        layout: Node::column(vec![
            Node::heading("Demo"),
            Node::input("demo-x-count", "count", 3),
            Node::output("demo-x-double"),
            Node::output("demo-x-summary"),
            Node::graph("demo-x-graph"),
        ]),
        callbacks: vec![
            Callback::new(("demo-x-double", Prop::Children), &[("demo-x-count", Prop::Value)], double),
            Callback::new(("demo-x-graph", Prop::Figure), &[("demo-x-count", Prop::Value)], bars),
            Callback::new(
                ("demo-x-summary", Prop::Children),
                &[("demo-x-double", Prop::Children)],
                summary,
            ),
        ],
    }
}

fn notes() -> ExampleApp {
    ExampleApp {
        title: "Notes".to_string(),
        description: "Static markdown only.".to_string(),
        layout: Node::card("Notes", vec![Node::markdown("Some **bold** text.")]),
        callbacks: Vec::new(),
    }
}

/// Two examples: `demo` (input → output → summary, input → graph) and `notes`.
pub fn test_registry() -> Registry {
    Registry::build([
        ExampleUnit {
            path: "pages/demo.rs",
            source: DEMO_SOURCE,
            build: demo,
        },
        ExampleUnit {
            path: "pages/notes.rs",
            source: "Node::markdown(\"Some **bold** text.\")\n",
            build: notes,
        },
    ])
}

/// Defaults only, no environment.
pub fn test_config() -> ResolvedConfig {
    resolve_with_env(&GalleryConfig::default(), &CliOverrides::default(), |_| None)
}

/// Creates a test App on the overview over `test_registry()`.
pub fn test_app() -> App {
    let registry = test_registry();
    let dispatcher = match Dispatcher::from_registry(&registry) {
        Ok(dispatcher) => dispatcher,
        Err(e) => panic!("test registry does not compose: {e}"),
    };
    App::new(Arc::new(registry), Arc::new(dispatcher), &test_config())
}
