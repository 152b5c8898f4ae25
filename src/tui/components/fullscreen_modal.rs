//! # Fullscreen Modal
//!
//! Overlay covering the whole terminal. It shows either the live example
//! layout (sharing the page's prop values, so inputs stay editable) or the
//! example's highlighted source with line numbers.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use super::page_view::{PageView, ScrollPane};
use crate::core::callbacks::{ComponentId, PropStore};
use crate::core::fullscreen::ModalContent;
use crate::core::highlight::CodeBlock;
use crate::tui::component::Component;

pub const MODAL_TITLE: &str = " Full screen ";

/// Transient render wrapper for the fullscreen overlay.
pub struct FullscreenModal<'a> {
    content: Option<&'a ModalContent>,
    props: &'a PropStore,
    focused: Option<&'a ComponentId>,
    editing: bool,
    pane: &'a mut ScrollPane,
}

impl<'a> FullscreenModal<'a> {
    pub fn new(
        content: Option<&'a ModalContent>,
        props: &'a PropStore,
        focused: Option<&'a ComponentId>,
        editing: bool,
        pane: &'a mut ScrollPane,
    ) -> Self {
        Self {
            content,
            props,
            focused,
            editing,
            pane,
        }
    }
}

impl Component for FullscreenModal<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let hint = match self.content {
            Some(ModalContent::Layout(_)) => " Esc Close  ↑↓ Scroll  Tab Inputs ",
            _ => " Esc Close  ↑↓ Scroll ",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(MODAL_TITLE, Style::default().add_modifier(Modifier::BOLD)))
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(hint).centered());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.content {
            Some(ModalContent::Layout(node)) => {
                PageView::new(node, self.props, self.focused, self.editing, self.pane).render(frame, inner);
            }
            Some(ModalContent::Code(code)) => {
                let lines = code_lines(code);
                let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
                let width = content_width.max(inner.width.saturating_sub(1));
                let height = lines.len() as u16;
                self.pane.clamp(height, inner.height);

                let mut view = ScrollView::new(Size::new(width, height))
                    .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
                    .horizontal_scrollbar_visibility(ScrollbarVisibility::Automatic);
                view.render_widget(Paragraph::new(lines), Rect::new(0, 0, width, height));
                frame.render_stateful_widget(view, inner, &mut self.pane.state);
            }
            None => {
                let empty = Paragraph::new("Nothing to show for this page.")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                frame.render_widget(empty, inner);
            }
        }
    }
}

/// Highlighted source lines, each prefixed with a right-aligned line number.
pub fn code_lines(code: &CodeBlock) -> Vec<Line<'static>> {
    let digits = code.lines.len().to_string().width().max(3);
    let gutter = Style::default().fg(Color::DarkGray);
    code.lines
        .iter()
        .enumerate()
        .map(|(i, spans)| {
            let mut line = vec![Span::styled(format!("{:>digits$} │ ", i + 1), gutter)];
            line.extend(spans.iter().map(|span| {
                let (r, g, b) = span.rgb;
                let mut style = Style::default().fg(Color::Rgb(r, g, b));
                if span.bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if span.italic {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                Span::styled(span.text.clone(), style)
            }));
            Line::from(line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::highlight::{DEFAULT_THEME, render_code};
    use crate::test_support::{DEMO_SOURCE, test_registry};
    use ratatui::{Terminal, backend::TestBackend};

    fn render(content: Option<&ModalContent>, props: &PropStore) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut pane = ScrollPane::default();
        terminal
            .draw(|f| FullscreenModal::new(content, props, None, false, &mut pane).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_code_lines_are_numbered() {
        let code = render_code("fn a() {}\nfn b() {}", "demo", DEFAULT_THEME);
        let lines = code_lines(&code);
        assert_eq!(lines.len(), 2);
        let text: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("  2 │ "), "{text}");
        assert!(text.ends_with("fn b() {}"));
    }

    #[test]
    fn test_code_view_strips_namespace() {
        let code = render_code(DEMO_SOURCE, "demo", DEFAULT_THEME);
        let content = render(Some(&ModalContent::Code(code)), &PropStore::new());
        assert!(content.contains("Full screen"));
        assert!(!content.contains("demo-x-"));
        assert!(content.contains("Esc Close"));
        assert!(!content.contains("Tab Inputs"));
    }

    #[test]
    fn test_layout_view_renders_app() {
        let registry = test_registry();
        let entry = registry.get("demo").unwrap();
        let mut props = PropStore::new();
        entry.layout.seed(&mut props);
        let content = render(Some(&ModalContent::Layout(entry.layout.clone())), &props);
        assert!(content.contains("Full screen"));
        assert!(content.contains("count"));
        assert!(content.contains("Tab Inputs"));
    }

    #[test]
    fn test_empty_modal() {
        let content = render(None, &PropStore::new());
        assert!(content.contains("Nothing to show"));
    }
}
