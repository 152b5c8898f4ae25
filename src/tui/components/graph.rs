use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
};

use crate::core::figure::Figure;
use crate::tui::component::Component;

/// Bars are scaled to this integer range since `BarChart` takes `u64`.
const SCALE: f64 = 1000.0;
const MAX_BAR_WIDTH: u16 = 9;
pub const GRAPH_HEIGHT: u16 = 14;

/// Bar chart of a `Figure`, framed with its title and axis labels.
pub struct Graph<'a> {
    figure: &'a Figure,
}

impl<'a> Graph<'a> {
    pub fn new(figure: &'a Figure) -> Self {
        Self { figure }
    }

    pub fn block(&self) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.figure.title))
            .title_bottom(Line::from(format!(" x: {}  y: {} ", self.figure.x_label, self.figure.y_label)).right_aligned())
    }

    /// The chart body, sized for `inner_width` columns.
    pub fn chart(&self, inner_width: u16) -> BarChart<'static> {
        let n = self.figure.bars.len().max(1) as u16;
        let bar_width = ((inner_width + 1) / n).saturating_sub(1).clamp(1, MAX_BAR_WIDTH);
        let max = self.figure.max_value();

        let bars: Vec<Bar<'static>> = self
            .figure
            .bars
            .iter()
            .map(|bar| {
                Bar::default()
                    .value(scaled(bar.value, max))
                    .label(Line::from(bar.label.clone()))
                    .text_value(format_value(bar.value))
            })
            .collect();

        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .max(SCALE as u64)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
            .label_style(Style::default().fg(Color::Gray))
    }
}

impl Component for Graph<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(self.chart(inner.width), inner);
    }
}

fn scaled(value: f64, max: f64) -> u64 {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    (value.max(0.0) / max * SCALE).round() as u64
}

/// Whole numbers print bare, fractions with two decimals.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
