//! # NavBar Component
//!
//! Top bar with the gallery brand, the key hints for the shell's buttons and
//! the current status message on the right.
//!
//! ## Stateless Component
//!
//! NavBar is purely presentational. Its props come from core `App` state:
//!
//! ```rust,ignore
//! let mut nav = NavBar::new(app.status_message.clone(), app.controls_visible(), app.is_overview());
//! nav.render(frame, nav_area);
//! ```
//!
//! The fullscreen buttons are only listed on example pages, matching where
//! the shell accepts them.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

pub const BRAND: &str = " Example Gallery ";

/// Top navigation bar.
pub struct NavBar {
    pub status_message: String,
    pub controls_visible: bool,
    pub is_overview: bool,
}

impl NavBar {
    pub fn new(status_message: String, controls_visible: bool, is_overview: bool) -> Self {
        Self {
            status_message,
            controls_visible,
            is_overview,
        }
    }

    fn buttons(&self) -> Vec<(&'static str, &'static str)> {
        let mut buttons = Vec::new();
        if !self.is_overview {
            buttons.push(("o", "Overview"));
        }
        buttons.push(("d", "Docs"));
        if self.controls_visible {
            buttons.push(("a", "Fullscreen app"));
            buttons.push(("c", "Fullscreen code"));
        }
        buttons
    }
}

impl Component for NavBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled(BRAND, Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
        ];
        for (k, label) in self.buttons() {
            spans.push(Span::styled(format!("[{k}]"), key));
            spans.push(Span::styled(format!(" {label}  "), Style::default().fg(Color::Gray)));
        }

        let status_width = (self.status_message.width() as u16 + 1).min(area.width / 2);
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

        frame.render_widget(Line::from(spans), left);
        frame.render_widget(
            Line::styled(self.status_message.clone(), Style::default().fg(Color::Yellow)).right_aligned(),
            right,
        );
    }
}
