//! # Overview Component
//!
//! The landing page: one entry per registered example with its title,
//! identifier and a wrapped description. Enter opens the selected example.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `OverviewState` lives in `TuiState`
//! - `Overview` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::registry::Registry;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent selection for the overview list.
pub struct OverviewState {
    /// Example identifiers in display order.
    pub ids: Vec<String>,
    pub selected: usize,
    pub list_state: ListState,
}

impl OverviewState {
    pub fn new(registry: &Registry) -> Self {
        let ids: Vec<String> = registry.iter().map(|e| e.id.clone()).collect();
        let mut list_state = ListState::default();
        if !ids.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            ids,
            selected: 0,
            list_state,
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

/// Events emitted by the overview.
#[derive(Debug, PartialEq, Eq)]
pub enum OverviewEvent {
    Open(String),
}

impl EventHandler for OverviewState {
    type Event = OverviewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<OverviewEvent> {
        if self.ids.is_empty() {
            return None;
        }
        let last = self.ids.len() - 1;
        match event {
            TuiEvent::Up => self.select(self.selected.saturating_sub(1)),
            TuiEvent::Down => self.select((self.selected + 1).min(last)),
            TuiEvent::Home => self.select(0),
            TuiEvent::End => self.select(last),
            TuiEvent::Enter => {
                return self.ids.get(self.selected).cloned().map(OverviewEvent::Open);
            }
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the overview list.
pub struct Overview<'a> {
    state: &'a mut OverviewState,
    registry: &'a Registry,
}

impl<'a> Overview<'a> {
    pub fn new(state: &'a mut OverviewState, registry: &'a Registry) -> Self {
        Self { state, registry }
    }
}

impl Component for Overview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Examples ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" ↑↓ Select  Enter Open  d Docs  q Quit ").centered())
            .padding(Padding::horizontal(1));

        if self.state.ids.is_empty() {
            let empty = Paragraph::new("No examples registered.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // Borders, padding and the highlight symbol.
        let wrap_width = (area.width.saturating_sub(8) as usize).max(10);
        let items: Vec<ListItem> = self
            .state
            .ids
            .iter()
            .filter_map(|id| self.registry.get(id))
            .map(|entry| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(entry.title.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(entry.id.clone(), Style::default().fg(Color::DarkGray)),
                ])];
                lines.extend(
                    textwrap::wrap(&entry.description, wrap_width)
                        .into_iter()
                        .map(|l| Line::styled(l.into_owned(), Style::default().fg(Color::Gray))),
                );
                lines.push(Line::default());
                ListItem::new(Text::from(lines))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_symbol("▶ ")
            .highlight_style(Style::default().fg(Color::Cyan));

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}
