//! # Application State
//!
//! Per-session state of the gallery. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session_id: Uuid                  // tags log lines of this session
//! ├── registry: Arc<Registry>           // shared, immutable after startup
//! ├── dispatcher: Arc<Dispatcher>       // shared, immutable after startup
//! ├── base_path / pathname: String      // current location
//! ├── fullscreen: FullscreenController  // modal state + content
//! ├── props: PropStore                  // live component values of the page
//! ├── generation: u64                   // bumped on every page load
//! ├── refresh_count: u32                // location refreshes so far
//! ├── pending_callbacks: usize          // invocations in flight
//! └── status_message: String            // status line text
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::sync::Arc;

use uuid::Uuid;

use crate::core::callbacks::{Binding, Prop, PropStore};
use crate::core::config::ResolvedConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::fullscreen::{FullscreenController, ModalState};
use crate::core::registry::{ExampleEntry, Registry};
use crate::core::route;

pub struct App {
    pub session_id: Uuid,
    pub registry: Arc<Registry>,
    pub dispatcher: Arc<Dispatcher>,
    pub base_path: String,
    pub pathname: String,
    pub fullscreen: FullscreenController,
    pub props: PropStore,
    /// Incremented on every navigation and refresh. Callback results started
    /// under an older generation are dropped.
    pub generation: u64,
    pub refresh_count: u32,
    pub pending_callbacks: usize,
    pub callback_timeout_secs: u64,
    pub status_message: String,
    pub docs_url: String,
    pub contributors_url: String,
}

impl App {
    pub fn new(registry: Arc<Registry>, dispatcher: Arc<Dispatcher>, config: &ResolvedConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            registry,
            dispatcher,
            base_path: config.base_path.clone(),
            pathname: config.base_path.clone(),
            fullscreen: FullscreenController::new(&config.code_theme),
            props: PropStore::new(),
            generation: 0,
            refresh_count: 0,
            pending_callbacks: 0,
            callback_timeout_secs: config.callback_timeout_secs,
            status_message: String::from("Welcome to the Example Gallery!"),
            docs_url: config.docs_url.clone(),
            contributors_url: config.contributors_url.clone(),
        }
    }

    /// Identifier of the current page (`""` on the overview).
    pub fn current_id(&self) -> &str {
        if self.is_overview() {
            ""
        } else {
            route::identifier_from_path(&self.pathname)
        }
    }

    pub fn current_entry(&self) -> Option<&ExampleEntry> {
        self.registry.get(self.current_id())
    }

    pub fn is_overview(&self) -> bool {
        route::is_overview(&self.pathname, &self.base_path)
    }

    /// Whether the fullscreen controls are shown for the current location.
    pub fn controls_visible(&self) -> bool {
        route::controls_visible(&self.pathname, &self.base_path)
    }

    pub fn modal_state(&self) -> ModalState {
        self.fullscreen.modal_state(&self.pathname)
    }

    /// Current text of an input component on this page.
    pub fn input_text(&self, binding: &Binding) -> String {
        debug_assert_eq!(binding.prop, Prop::Value);
        match self.props.get(binding) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
