//! # Actions
//!
//! Everything that can happen in the gallery becomes an `Action`.
//! User presses `a`? That's `Action::OpenFullscreenApp`.
//! A callback finishes on the blocking pool? That's `Action::CallbackResolved`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the shell should perform.
//! No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Page loads and location refreshes both go through `load_page`: the
//! property store is reseeded from the layout, the generation is bumped, and
//! every callback of the page is scheduled again.

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::callbacks::{Binding, CallbackError, ComponentId, Invocation, Prop};
use crate::core::dispatcher::{CallbackRef, MAX_CASCADE_DEPTH, apply_result};
use crate::core::fullscreen::{FullscreenEvent, SideEffect};
use crate::core::state::App;

#[derive(Debug, Clone)]
pub enum Action {
    /// Go to a path (overview or example page).
    Navigate(String),
    OpenFullscreenApp,
    OpenFullscreenCode,
    /// Modal close button or Esc.
    DismissFullscreen,
    /// The text of an input field changed.
    SetInput { component: ComponentId, value: String },
    /// A callback invocation finished.
    CallbackResolved {
        generation: u64,
        depth: usize,
        output: Binding,
        result: Result<Option<Value>, CallbackError>,
    },
    ShowDocs,
    Quit,
}

#[derive(Debug)]
pub enum Effect {
    None,
    Quit,
    /// Run these invocations and report each result as `CallbackResolved`
    /// tagged with `generation` and `depth`.
    Invoke {
        generation: u64,
        depth: usize,
        invocations: Vec<Invocation>,
    },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Navigate(path) => {
            if app.fullscreen.is_open() {
                // Closing still refreshes; its invocations go stale with the load below.
                fullscreen_event(app, FullscreenEvent::Dismiss);
            }
            info!("[{}] Navigate: {} -> {}", app.session_id, app.pathname, path);
            load_page(app, path)
        }
        Action::OpenFullscreenApp => fullscreen_event(app, FullscreenEvent::OpenApp),
        Action::OpenFullscreenCode => fullscreen_event(app, FullscreenEvent::OpenCode),
        Action::DismissFullscreen => fullscreen_event(app, FullscreenEvent::Dismiss),
        Action::SetInput { component, value } => {
            let binding = Binding::new(component, Prop::Value);
            if !app.props.set(binding.clone(), Value::String(value)) {
                return Effect::None;
            }
            let crefs = app.dispatcher.triggered_by(&binding);
            schedule(app, crefs, 0)
        }
        Action::CallbackResolved {
            generation,
            depth,
            output,
            result,
        } => {
            if generation != app.generation {
                debug!(
                    "Dropping stale result for {} (generation {} != {})",
                    output, generation, app.generation
                );
                return Effect::None;
            }
            app.pending_callbacks = app.pending_callbacks.saturating_sub(1);
            match apply_result(&mut app.props, &output, result) {
                Ok(Some(changed)) => {
                    if depth + 1 >= MAX_CASCADE_DEPTH {
                        warn!("Callback cascade stopped at {} after {} rounds", changed, depth + 1);
                        return Effect::None;
                    }
                    let crefs = app.dispatcher.triggered_by(&changed);
                    schedule(app, crefs, depth + 1)
                }
                Ok(None) => Effect::None,
                Err(e) => {
                    warn!("[{}] Callback for {} failed: {}", app.session_id, output, e);
                    app.status_message = format!("{output}: {e}");
                    Effect::None
                }
            }
        }
        Action::ShowDocs => {
            app.status_message = format!("Docs: {}", app.docs_url);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn fullscreen_event(app: &mut App, event: FullscreenEvent) -> Effect {
    let opens = matches!(event, FullscreenEvent::OpenApp | FullscreenEvent::OpenCode);
    if opens && !app.controls_visible() {
        debug!("Ignoring {:?} on the overview", event);
        return Effect::None;
    }

    let effects = app.fullscreen.handle(event, &app.pathname, &app.registry);
    let mut effect = Effect::None;
    for side_effect in effects {
        match side_effect {
            SideEffect::RefreshLocation(path) => {
                app.refresh_count += 1;
                info!("[{}] Refreshing {} (#{})", app.session_id, path, app.refresh_count);
                effect = load_page(app, path);
            }
        }
    }
    effect
}

/// Loads `path` from scratch: fresh property store seeded from the layout,
/// new generation, and every callback of the page scheduled.
fn load_page(app: &mut App, path: String) -> Effect {
    app.pathname = path;
    app.generation += 1;
    app.pending_callbacks = 0;
    app.props.clear();

    let id = app.current_id().to_string();
    match app.registry.get(&id) {
        Some(entry) => entry.layout.seed(&mut app.props),
        None if app.is_overview() => {}
        None => warn!("No example registered under '{}'", id),
    }
    let _ = app
        .fullscreen
        .handle(FullscreenEvent::Mount, &app.pathname, &app.registry);

    let crefs = app.dispatcher.initial_callbacks(&id);
    schedule(app, crefs, 0)
}

fn schedule(app: &mut App, crefs: Vec<CallbackRef>, depth: usize) -> Effect {
    let invocations: Vec<Invocation> = crefs
        .iter()
        .filter_map(|cref| app.dispatcher.prepare(cref, &app.props))
        .collect();
    if invocations.is_empty() {
        return Effect::None;
    }
    app.pending_callbacks += invocations.len();
    Effect::Invoke {
        generation: app.generation,
        depth,
        invocations,
    }
}
