use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{Footer, FullscreenModal, NavBar, Overview, PageView};
use crate::tui::{InputMode, TuiState};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [nav_area, main_area, footer_area] = layout.areas(frame.area());

    NavBar::new(app.status_message.clone(), app.controls_visible(), app.is_overview())
        .render(frame, nav_area);

    let focused = tui.focused_input(app);
    let editing = tui.input_mode == InputMode::Edit;

    // Main area - overview, example page, or not-found
    if app.is_overview() {
        Overview::new(&mut tui.overview, &app.registry).render(frame, main_area);
    } else if let Some(entry) = app.current_entry() {
        PageView::new(&entry.layout, &app.props, focused.as_ref(), editing, &mut tui.page)
            .render(frame, main_area);
    } else {
        draw_not_found(frame, main_area, &app.pathname);
    }

    Footer {
        contributors_url: app.contributors_url.clone(),
        pending_callbacks: app.pending_callbacks,
        spinner_frame: tui.spinner_frame,
    }
    .render(frame, footer_area);

    if app.fullscreen.is_open() {
        FullscreenModal::new(
            app.fullscreen.content(),
            &app.props,
            focused.as_ref(),
            editing,
            &mut tui.modal,
        )
        .render(frame, frame.area());
    }
}

fn draw_not_found(frame: &mut Frame, area: Rect, pathname: &str) {
    let text = vec![
        Line::from(format!("No example is registered at {pathname}")),
        Line::default(),
        Line::styled("Press o for the overview.", Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::bordered().title(" Not found "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
