//! # Fullscreen Controller
//!
//! The fullscreen modal shows either the live example or its source. Its state is
//! a tagged variant driven by a pure transition function:
//!
//! ```text
//!              OpenApp                       OpenApp | OpenCode | Dismiss
//!   Closed ─────────────▶ OpenApp(id) ──────────────────────────────▶ Closed
//!     │        OpenCode                                                 ▲
//!     └─────────────────▶ OpenCode(id) ─────────────────────────────────┘
//! ```
//!
//! Either open control closes an open modal. Every transition back to `Closed`
//! emits exactly one `RefreshLocation` with the current path, so the page reloads
//! and its callbacks fire again.
//!
//! `FullscreenController` wraps the state with the content computed for the
//! current path, which the shell draws inside the modal.

use std::sync::Arc;

use log::debug;

use crate::core::highlight::{self, CodeBlock};
use crate::core::layout::Node;
use crate::core::registry::Registry;
use crate::core::route;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fullscreen {
    #[default]
    Closed,
    OpenApp(String),
    OpenCode(String),
}

impl Fullscreen {
    pub fn is_open(&self) -> bool {
        !matches!(self, Fullscreen::Closed)
    }

    pub fn content_kind(&self) -> ContentKind {
        match self {
            Fullscreen::Closed => ContentKind::None,
            Fullscreen::OpenApp(_) => ContentKind::App,
            Fullscreen::OpenCode(_) => ContentKind::Code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    App,
    Code,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenEvent {
    /// Initial render, before any control has been clicked.
    Mount,
    OpenApp,
    OpenCode,
    /// Close button or Esc.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Reload the page at this (unchanged) path.
    RefreshLocation(String),
}

/// Read-only snapshot of the modal for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub is_open: bool,
    pub content_kind: ContentKind,
    pub current_path: String,
}

#[derive(Debug, Clone)]
pub enum ModalContent {
    Layout(Arc<Node>),
    Code(CodeBlock),
}

/// Computes the next state. No I/O, no registry access.
pub fn transition(
    state: &Fullscreen,
    event: FullscreenEvent,
    path: &str,
) -> (Fullscreen, Vec<SideEffect>) {
    let id = route::identifier_from_path(path).to_string();
    match (state, event) {
        (_, FullscreenEvent::Mount) => (state.clone(), Vec::new()),
        (Fullscreen::Closed, FullscreenEvent::OpenApp) => (Fullscreen::OpenApp(id), Vec::new()),
        (Fullscreen::Closed, FullscreenEvent::OpenCode) => (Fullscreen::OpenCode(id), Vec::new()),
        (Fullscreen::Closed, FullscreenEvent::Dismiss) => (Fullscreen::Closed, Vec::new()),
        (Fullscreen::OpenApp(_) | Fullscreen::OpenCode(_), _) => (
            Fullscreen::Closed,
            vec![SideEffect::RefreshLocation(path.to_string())],
        ),
    }
}

/// Open/close state of the modal plus the content it displays.
#[derive(Debug, Clone)]
pub struct FullscreenController {
    state: Fullscreen,
    app_clicks: u32,
    code_clicks: u32,
    content: Option<ModalContent>,
    code_theme: String,
}

impl FullscreenController {
    pub fn new(code_theme: &str) -> Self {
        Self {
            state: Fullscreen::Closed,
            app_clicks: 0,
            code_clicks: 0,
            content: None,
            code_theme: code_theme.to_string(),
        }
    }

    pub fn state(&self) -> &Fullscreen {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    /// Clicks recorded on (open app, open code).
    pub fn clicks(&self) -> (u32, u32) {
        (self.app_clicks, self.code_clicks)
    }

    pub fn modal_state(&self, current_path: &str) -> ModalState {
        ModalState {
            is_open: self.state.is_open(),
            content_kind: self.state.content_kind(),
            current_path: current_path.to_string(),
        }
    }

    /// Applies `event` at `path` and returns the side effects to perform.
    ///
    /// Content is looked up by the identifier derived from `path`. An unknown
    /// identifier leaves the content empty; the modal still toggles.
    pub fn handle(
        &mut self,
        event: FullscreenEvent,
        path: &str,
        registry: &Registry,
    ) -> Vec<SideEffect> {
        let id = route::identifier_from_path(path);
        match event {
            FullscreenEvent::OpenApp => {
                self.app_clicks += 1;
                self.content = registry
                    .get(id)
                    .map(|entry| ModalContent::Layout(Arc::clone(&entry.layout)));
            }
            FullscreenEvent::OpenCode => {
                self.code_clicks += 1;
                self.content = self.code_content(id, registry);
            }
            // An open modal keeps showing what it was opened with.
            FullscreenEvent::Mount if !self.state.is_open() => {
                self.content = self.code_content(id, registry);
            }
            FullscreenEvent::Mount => {}
            FullscreenEvent::Dismiss => {}
        }

        let (next, effects) = transition(&self.state, event, path);
        if next != self.state {
            debug!("Fullscreen: {:?} -> {:?} ({:?})", self.state, next, event);
        }
        self.state = next;
        effects
    }

    fn code_content(&self, id: &str, registry: &Registry) -> Option<ModalContent> {
        registry
            .source(id)
            .map(|source| ModalContent::Code(highlight::render_code(source, id, &self.code_theme)))
    }
}
