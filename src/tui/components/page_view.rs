//! Renders an example's layout tree into a scrollable canvas.
//!
//! Heights are measured first (`Paragraph::line_count` for wrapped text) so
//! the `ScrollView` canvas can be sized, then every node is drawn at its
//! offset. Rows split their width evenly and take the height of their
//! tallest child.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect, Size},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use serde_json::Value;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthChar;

use super::graph::{GRAPH_HEIGHT, Graph};
use crate::core::callbacks::{Binding, ComponentId, Prop, PropStore};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

const INPUT_HEIGHT: u16 = 3;
const CURSOR: &str = "▏";

/// Scroll position of a page or modal body, kept across frames.
#[derive(Default)]
pub struct ScrollPane {
    pub state: ScrollViewState,
}

impl ScrollPane {
    pub fn reset(&mut self) {
        self.state = ScrollViewState::default();
    }

    /// Keeps the offset inside the content once its height is known.
    pub fn clamp(&mut self, content_height: u16, viewport_height: u16) {
        let max = content_height.saturating_sub(viewport_height);
        let offset = self.state.offset();
        if offset.y > max {
            self.state.set_offset(Position { x: offset.x, y: max });
        }
    }
}

impl EventHandler for ScrollPane {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::Up => self.state.scroll_up(),
            TuiEvent::Down => self.state.scroll_down(),
            TuiEvent::PageUp => self.state.scroll_page_up(),
            TuiEvent::PageDown => self.state.scroll_page_down(),
            TuiEvent::Home => self.state.scroll_to_top(),
            TuiEvent::End => self.state.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Transient view of a layout tree and the current prop values.
pub struct PageView<'a> {
    layout: &'a Node,
    props: &'a PropStore,
    focused: Option<&'a ComponentId>,
    editing: bool,
    pane: &'a mut ScrollPane,
}

impl<'a> PageView<'a> {
    pub fn new(
        layout: &'a Node,
        props: &'a PropStore,
        focused: Option<&'a ComponentId>,
        editing: bool,
        pane: &'a mut ScrollPane,
    ) -> Self {
        Self {
            layout,
            props,
            focused,
            editing,
            pane,
        }
    }

    fn height(&self, node: &Node, width: u16) -> u16 {
        match node {
            Node::Column(children) => children.iter().map(|c| self.height(c, width)).sum(),
            Node::Row(children) => row_columns(children.len(), width)
                .iter()
                .zip(children)
                .map(|(col, child)| self.height(child, col.width))
                .max()
                .unwrap_or(0),
            Node::Heading(text) => text_height(&heading(text), width) + 1,
            Node::Markdown(text) => text_height(&prose(text), width),
            Node::Rule => 1,
            Node::Card { body, .. } => self.height(body, width.saturating_sub(2)) + 2,
            Node::Input { .. } => INPUT_HEIGHT,
            Node::Graph { id } => match self.figure(id) {
                Some(_) => GRAPH_HEIGHT,
                None => 3,
            },
            Node::Output { id } => match self.output_text(id) {
                Some(text) => text_height(&prose(&text), width).max(1),
                None => 1,
            },
        }
    }

    fn draw(&self, node: &Node, view: &mut ScrollView, area: Rect) {
        if area.width == 0 {
            return;
        }
        match node {
            Node::Column(children) => {
                let mut y = area.y;
                for child in children {
                    let h = self.height(child, area.width);
                    self.draw(child, view, Rect::new(area.x, y, area.width, h));
                    y += h;
                }
            }
            Node::Row(children) => {
                for (col, child) in row_columns(children.len(), area.width).iter().zip(children) {
                    let h = self.height(child, col.width);
                    self.draw(child, view, Rect::new(area.x + col.x, area.y, col.width, h));
                }
            }
            Node::Heading(text) => {
                let rect = Rect { height: area.height.saturating_sub(1), ..area };
                view.render_widget(heading(text), rect);
            }
            Node::Markdown(text) => view.render_widget(prose(text), area),
            Node::Rule => view.render_widget(
                Line::styled("─".repeat(area.width as usize), Style::default().fg(Color::DarkGray)),
                area,
            ),
            Node::Card { title, body } => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(Span::styled(format!(" {title} "), Style::default().add_modifier(Modifier::BOLD)));
                let inner = block.inner(area);
                view.render_widget(block, area);
                self.draw(body, view, inner);
            }
            Node::Input { id, label, .. } => self.draw_input(id, label, view, area),
            Node::Graph { id } => match self.figure(id) {
                Some(figure) => {
                    let graph = Graph::new(&figure);
                    let block = graph.block();
                    let inner = block.inner(area);
                    view.render_widget(block, area);
                    view.render_widget(graph.chart(inner.width), inner);
                }
                None => view.render_widget(
                    Paragraph::new(Span::styled("No data yet", Style::default().fg(Color::DarkGray)))
                        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray))),
                    area,
                ),
            },
            Node::Output { id } => match self.output_text(id) {
                Some(text) => view.render_widget(prose(&text), area),
                None => view.render_widget(Span::styled("…", Style::default().fg(Color::DarkGray)), area),
            },
        }
    }

    fn draw_input(&self, id: &ComponentId, label: &str, view: &mut ScrollView, area: Rect) {
        let focused = self.focused == Some(id);
        let border = match (focused, self.editing) {
            (true, true) => Color::Yellow,
            (true, false) => Color::Cyan,
            _ => Color::DarkGray,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {label} "));

        let text = match self.props.get(&Binding::new(id.clone(), Prop::Value)) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let editing = focused && self.editing;
        let room = block.inner(area).width.saturating_sub(u16::from(editing)) as usize;
        let mut spans = vec![Span::raw(visible_tail(&text, room).to_string())];
        if editing {
            spans.push(Span::styled(CURSOR, Style::default().fg(Color::Yellow)));
        }
        view.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn figure(&self, id: &ComponentId) -> Option<Figure> {
        self.props
            .get(&Binding::new(id.clone(), Prop::Figure))
            .and_then(Figure::from_value)
    }

    fn output_text(&self, id: &ComponentId) -> Option<String> {
        match self.props.get(&Binding::new(id.clone(), Prop::Children))? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl Component for PageView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // One column is reserved for the vertical scrollbar.
        let width = area.width.saturating_sub(1);
        let total = self.height(self.layout, width);
        self.pane.clamp(total, area.height);

        let mut view = ScrollView::new(Size::new(width, total))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        self.draw(self.layout, &mut view, Rect::new(0, 0, width, total));
        frame.render_stateful_widget(view, area, &mut self.pane.state);
    }
}

fn heading(text: &str) -> Paragraph<'static> {
    Paragraph::new(Line::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .wrap(Wrap { trim: true })
}

fn prose(text: &str) -> Paragraph<'static> {
    Paragraph::new(markdown::render(text, Color::Gray)).wrap(Wrap { trim: false })
}

fn text_height(paragraph: &Paragraph, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    paragraph.line_count(width).min(u16::MAX as usize) as u16
}

/// Column rects (x relative to the row) for `n` equal-width children.
fn row_columns(n: usize, width: u16) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    Layout::horizontal(vec![Constraint::Ratio(1, n as u32); n])
        .spacing(1)
        .split(Rect::new(0, 0, width, 1))
        .to_vec()
}

/// The longest suffix of `text` that fits in `max_width` terminal columns.
pub fn visible_tail(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (i, c) in text.char_indices().rev() {
        width += c.width().unwrap_or(0);
        if width > max_width {
            return &text[i + c.len_utf8()..];
        }
    }
    text
}
