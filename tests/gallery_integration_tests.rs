use std::sync::Arc;

use example_gallery::core::action::{Action, Effect, update};
use example_gallery::core::callbacks::{Binding, Callback, CallbackError, Prop, PropStore};
use example_gallery::core::config::{CliOverrides, GalleryConfig, resolve_with_env};
use example_gallery::core::dispatcher::{Dispatcher, MergeError};
use example_gallery::core::figure::Figure;
use example_gallery::core::fullscreen::{ContentKind, Fullscreen, ModalContent, SideEffect};
use example_gallery::core::highlight::{DEFAULT_THEME, render_code};
use example_gallery::core::layout::Node;
use example_gallery::core::registry::{ExampleApp, ExampleUnit, Registry};
use example_gallery::core::state::App;
use example_gallery::gallery;
use serde_json::{Value, json};

// ============================================================================
// Helper Functions
// ============================================================================

const POISSON: &str = "/examples/poisson-distribution";

/// Builds an app over the bundled examples with default configuration.
fn gallery_app() -> App {
    let registry = Registry::build(gallery::units());
    let dispatcher = Dispatcher::from_registry(&registry).unwrap();
    let config = resolve_with_env(&GalleryConfig::default(), &CliOverrides::default(), |_| None);
    App::new(Arc::new(registry), Arc::new(dispatcher), &config)
}

/// Applies an action and runs any invocations it schedules to completion.
fn drive(app: &mut App, action: Action) {
    let mut queue = vec![update(app, action)];
    while let Some(effect) = queue.pop() {
        if let Effect::Invoke {
            generation,
            depth,
            invocations,
        } = effect
        {
            for invocation in invocations {
                let output = invocation.output.clone();
                let result = invocation.run();
                queue.push(update(
                    app,
                    Action::CallbackResolved {
                        generation,
                        depth,
                        output,
                        result,
                    },
                ));
            }
        }
    }
}

fn lambda() -> Binding {
    Binding::new("poisson-distribution-x-lambda", Prop::Value)
}

fn histogram(app: &App) -> Figure {
    let value = app
        .props
        .get(&Binding::new("poisson-distribution-x-histogram", Prop::Figure))
        .expect("histogram rendered");
    Figure::from_value(value).expect("histogram is a figure")
}

fn unit(path: &'static str, source: &'static str, build: fn() -> ExampleApp) -> ExampleUnit {
    ExampleUnit { path, source, build }
}

fn first() -> ExampleApp {
    ExampleApp {
        title: "First".to_string(),
        description: String::new(),
        layout: Node::heading("first"),
        callbacks: Vec::new(),
    }
}

fn second() -> ExampleApp {
    ExampleApp {
        title: "Second".to_string(),
        ..first()
    }
}

fn echo(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    Ok(args.first().cloned())
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_round_trip() {
    let registry = Registry::build(gallery::units());
    let entry = registry.get("poisson-distribution").unwrap();
    assert_eq!(registry.source("poisson-distribution"), Some(entry.source.as_ref()));

    let first = render_code(&entry.source, &entry.id, DEFAULT_THEME);
    let again = render_code(&entry.source, &entry.id, DEFAULT_THEME);
    assert_eq!(first, again);
}

#[test]
fn test_duplicate_identifiers_last_wins() {
    let registry = Registry::build(vec![
        unit("pages/same.rs", "one", first),
        unit("other/same.rs", "two", second),
    ]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("same").unwrap().title, "Second");
    assert_eq!(registry.source("same"), Some("two"));
}

// ============================================================================
// Dispatcher composition
// ============================================================================

#[test]
fn test_dispatcher_rejects_duplicate_namespace() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("a", Vec::new()).unwrap();
    assert!(matches!(
        dispatcher.register("a", Vec::new()),
        Err(MergeError::DuplicateNamespace(_))
    ));
}

#[test]
fn test_dispatcher_rejects_foreign_component_atomically() {
    let mut dispatcher = Dispatcher::new();
    let callbacks = vec![
        Callback::new(("a-x-out", Prop::Children), &[("a-x-in", Prop::Value)], echo),
        Callback::new(("b-x-out", Prop::Children), &[("a-x-in", Prop::Value)], echo),
    ];
    assert!(matches!(
        dispatcher.register("a", callbacks),
        Err(MergeError::ForeignComponent { .. })
    ));
    assert!(!dispatcher.contains_namespace("a"));
    assert!(dispatcher.is_empty());
}

// ============================================================================
// Fullscreen
// ============================================================================

#[test]
fn test_open_app_then_close_refreshes_once() {
    let mut app = gallery_app();
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    assert!(app.controls_visible());

    drive(&mut app, Action::OpenFullscreenApp);
    assert_eq!(
        app.fullscreen.state(),
        &Fullscreen::OpenApp("poisson-distribution".to_string())
    );
    let expected = &app.registry.get("poisson-distribution").unwrap().layout;
    match app.fullscreen.content() {
        Some(ModalContent::Layout(layout)) => assert!(Arc::ptr_eq(layout, expected)),
        other => panic!("expected layout content, got {other:?}"),
    }

    let before = app.refresh_count;
    drive(&mut app, Action::OpenFullscreenApp);
    assert_eq!(app.fullscreen.state(), &Fullscreen::Closed);
    assert_eq!(app.refresh_count, before + 1);
    assert_eq!(app.pathname, POISSON);
}

#[test]
fn test_open_code_strips_namespace() {
    let mut app = gallery_app();
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    drive(&mut app, Action::OpenFullscreenCode);

    let state = app.modal_state();
    assert!(state.is_open);
    assert_eq!(state.content_kind, ContentKind::Code);
    match app.fullscreen.content() {
        Some(ModalContent::Code(code)) => {
            let text = code.plain_text();
            assert!(text.contains("\"lambda\""));
            assert!(!text.contains("poisson-distribution-x-"));
        }
        other => panic!("expected code content, got {other:?}"),
    }
}

#[test]
fn test_controls_hidden_on_overview_only() {
    let mut app = gallery_app();
    assert!(!app.controls_visible());
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    assert!(app.controls_visible());
    drive(&mut app, Action::OpenFullscreenCode);
    assert!(app.controls_visible());
}

#[test]
fn test_every_close_emits_one_refresh() {
    use example_gallery::core::fullscreen::{FullscreenEvent, transition};

    for open in [
        Fullscreen::OpenApp("x".to_string()),
        Fullscreen::OpenCode("x".to_string()),
    ] {
        for event in [
            FullscreenEvent::OpenApp,
            FullscreenEvent::OpenCode,
            FullscreenEvent::Dismiss,
        ] {
            let (next, effects) = transition(&open, event, "/examples/x");
            assert_eq!(next, Fullscreen::Closed);
            assert_eq!(effects, vec![SideEffect::RefreshLocation("/examples/x".to_string())]);
        }
    }
}

// ============================================================================
// Callback cascade
// ============================================================================

#[test]
fn test_poisson_histogram_follows_lambda() {
    let mut app = gallery_app();
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    assert_eq!(app.pending_callbacks, 0);
    let initial = histogram(&app);
    assert!(!initial.bars.is_empty());

    drive(
        &mut app,
        Action::SetInput {
            component: lambda().component,
            value: "12".to_string(),
        },
    );
    let updated = histogram(&app);
    assert_ne!(initial, updated);
}

#[test]
fn test_invalid_lambda_keeps_previous_histogram() {
    let mut app = gallery_app();
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    let before = histogram(&app);

    drive(
        &mut app,
        Action::SetInput {
            component: lambda().component,
            value: "-3".to_string(),
        },
    );
    assert_eq!(histogram(&app), before);
    assert!(app.status_message.contains("poisson-distribution-x-histogram"));
}

#[test]
fn test_headless_settle_matches_event_loop() {
    let registry = Registry::build(gallery::units());
    let dispatcher = Dispatcher::from_registry(&registry).unwrap();
    let entry = registry.get("poisson-distribution").unwrap();

    let mut store = PropStore::new();
    entry.layout.seed(&mut store);
    assert!(dispatcher.load(&entry.id, &mut store).is_empty());

    store.set(lambda(), json!("12"));
    assert!(dispatcher.settle(&[lambda()], &mut store).is_empty());

    let mut app = gallery_app();
    drive(&mut app, Action::Navigate(POISSON.to_string()));
    drive(
        &mut app,
        Action::SetInput {
            component: lambda().component,
            value: "12".to_string(),
        },
    );
    let figure_binding = Binding::new("poisson-distribution-x-histogram", Prop::Figure);
    assert_eq!(store.get(&figure_binding), app.props.get(&figure_binding));
}
