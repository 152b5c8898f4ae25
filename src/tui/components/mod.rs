//! # TUI Components
//!
//! UI building blocks for the gallery shell.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `NavBar`: brand, button hints and status message
//! - `Footer`: callback spinner and contributors link
//! - `Graph`: bar chart for a `Figure`
//!
//! ### Stateful Components (Persistent State + Transient Wrapper)
//!
//! State lives in `TuiState`; a wrapper borrowing it is built each frame:
//! - `Overview` / `OverviewState`: list of registered examples
//! - `PageView` / `ScrollPane`: an example's layout, scrollable
//! - `FullscreenModal` / `ScrollPane`: the fullscreen overlay
//!
//! Each file carries its own state types, events, rendering and tests.

pub mod footer;
pub mod fullscreen_modal;
pub mod graph;
pub mod nav_bar;
pub mod overview;
pub mod page_view;

pub use footer::Footer;
pub use fullscreen_modal::FullscreenModal;
pub use nav_bar::NavBar;
pub use overview::{Overview, OverviewEvent, OverviewState};
pub use page_view::{PageView, ScrollPane};
