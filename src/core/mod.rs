//! # Core Application Logic
//!
//! This module contains the gallery's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!   ExampleUnit ─▶ Registry ─▶ Dispatcher          (startup, once)
//!                     │            │
//!                     ▼            ▼
//!                 ┌──────────────────────┐
//!                 │   App + update()     │         (per session)
//!                 │  route · fullscreen  │
//!                 │  props · highlight   │
//!                 └──────────┬───────────┘
//!                            │ Effect
//!                            ▼
//!                     ┌────────────┐
//!                     │    TUI     │
//!                     │  Adapter   │
//!                     │ (ratatui)  │
//!                     └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: example units indexed by identifier
//! - [`dispatcher`]: all example callbacks composed into one dispatcher
//! - [`callbacks`]: identifiers, bindings, handlers and the property store
//! - [`layout`]: the component tree each example describes its page with
//! - [`figure`]: bar figures produced by callbacks
//! - [`fullscreen`]: the fullscreen modal state machine
//! - [`highlight`]: source stripping and syntax highlighting
//! - [`route`]: path ↔ identifier mapping
//! - [`state`]: the `App` struct, all per-session state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: layered configuration

pub mod action;
pub mod callbacks;
pub mod config;
pub mod dispatcher;
pub mod figure;
pub mod fullscreen;
pub mod highlight;
pub mod layout;
pub mod registry;
pub mod route;
pub mod state;
