use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Bottom line: callback activity on the left, the contributors link after it.
pub struct Footer {
    pub contributors_url: String,
    pub pending_callbacks: usize,
    pub spinner_frame: usize,
}

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        if self.pending_callbacks > 0 {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            let noun = if self.pending_callbacks == 1 { "callback" } else { "callbacks" };
            spans.push(Span::styled(
                format!(" {glyph} running {} {noun} ", self.pending_callbacks),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(" Thank you to all contributors: ", dim));
        spans.push(Span::styled(self.contributors_url.clone(), Style::default().fg(Color::Cyan)));
        frame.render_widget(Line::from(spans), area);
    }
}
