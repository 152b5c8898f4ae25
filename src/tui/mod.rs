//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the shell and
//! the current page, and translates keyboard events into `core::Action`
//! values. Callback invocations returned by `update` run on tokio's blocking
//! pool and report back over a channel.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (callbacks in flight): draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resolved callbacks.
//!
//! ## Input Modes
//!
//! In `Browse` mode single keys drive the shell (`o` overview, `d` docs,
//! `a`/`c` fullscreen, `q` quit). Tab focuses the page's inputs when they are
//! on screen and enters `Edit` mode, where keys type into the focused input.
//! Esc backs out one level at a time: input focus, then the fullscreen modal,
//! then the page.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, error, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::callbacks::{Binding, CallbackError, ComponentId, Invocation, Prop};
use crate::core::fullscreen::ModalContent;
use crate::core::route;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{OverviewEvent, OverviewState, ScrollPane};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key shell commands and scrolling.
    Browse,
    /// Typing into the focused input.
    Edit,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub overview: OverviewState,
    pub page: ScrollPane,
    pub modal: ScrollPane,
    /// Index into the current layout's inputs.
    pub focus: Option<usize>,
    pub input_mode: InputMode,
    pub spinner_frame: usize,
    /// Page generation and modal visibility at the last sync.
    seen_generation: u64,
    seen_modal_open: bool,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            overview: OverviewState::new(&app.registry),
            page: ScrollPane::default(),
            modal: ScrollPane::default(),
            focus: None,
            input_mode: InputMode::Browse,
            spinner_frame: 0,
            seen_generation: app.generation,
            seen_modal_open: app.fullscreen.is_open(),
        }
    }

    /// Drops page-local presentation state after a page load or when the
    /// modal opens or closes.
    pub fn sync(&mut self, app: &App) {
        if app.generation != self.seen_generation {
            self.seen_generation = app.generation;
            self.page.reset();
            self.focus = None;
            self.input_mode = InputMode::Browse;
        }
        if app.fullscreen.is_open() != self.seen_modal_open {
            self.seen_modal_open = app.fullscreen.is_open();
            self.modal.reset();
        }
    }

    /// The input component currently holding focus, if any.
    pub fn focused_input(&self, app: &App) -> Option<ComponentId> {
        let entry = app.current_entry()?;
        entry.layout.inputs().get(self.focus?).map(|id| (*id).clone())
    }

    fn move_focus(&mut self, app: &App, forward: bool) {
        let count = if inputs_visible(app) {
            app.current_entry().map_or(0, |e| e.layout.inputs().len())
        } else {
            0
        };
        if count == 0 {
            self.focus = None;
            self.input_mode = InputMode::Browse;
            return;
        }
        self.focus = Some(match (self.focus, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
        self.input_mode = InputMode::Edit;
    }

    fn leave_edit(&mut self) {
        self.focus = None;
        self.input_mode = InputMode::Browse;
    }

    fn scroll_target(&mut self, app: &App) -> &mut ScrollPane {
        if app.fullscreen.is_open() { &mut self.modal } else { &mut self.page }
    }
}

/// Whether the page's inputs are on screen: the modal is closed or shows the
/// live example.
pub fn inputs_visible(app: &App) -> bool {
    !app.fullscreen.is_open() || matches!(app.fullscreen.content(), Some(ModalContent::Layout(_)))
}

/// Translates one terminal event into at most one core action, updating
/// presentation state along the way.
pub fn handle_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    tui.sync(app);
    match tui.input_mode {
        InputMode::Edit => edit_event(app, tui, event),
        InputMode::Browse => browse_event(app, tui, event),
    }
}

fn browse_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Char('q') => Some(Action::Quit),
        TuiEvent::Char('o') if !app.fullscreen.is_open() => {
            Some(Action::Navigate(app.base_path.clone()))
        }
        TuiEvent::Char('d') => Some(Action::ShowDocs),
        TuiEvent::Char('a') if app.controls_visible() => Some(Action::OpenFullscreenApp),
        TuiEvent::Char('c') if app.controls_visible() => Some(Action::OpenFullscreenCode),
        TuiEvent::Escape if app.fullscreen.is_open() => Some(Action::DismissFullscreen),
        TuiEvent::Escape if !app.is_overview() => Some(Action::Navigate(app.base_path.clone())),
        TuiEvent::Tab | TuiEvent::BackTab => {
            tui.move_focus(app, matches!(event, TuiEvent::Tab));
            None
        }
        _ if app.is_overview() && !app.fullscreen.is_open() => {
            tui.overview.handle_event(event).map(|OverviewEvent::Open(id)| {
                Action::Navigate(route::example_path(&app.base_path, &id))
            })
        }
        _ => {
            tui.scroll_target(app).handle_event(event);
            None
        }
    }
}

fn edit_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let Some(component) = tui.focused_input(app) else {
        tui.leave_edit();
        return browse_event(app, tui, event);
    };
    let binding = Binding::new(component.clone(), Prop::Value);
    let mut text = app.input_text(&binding);
    match event {
        TuiEvent::Escape => {
            tui.leave_edit();
            None
        }
        TuiEvent::Enter => {
            tui.input_mode = InputMode::Browse;
            None
        }
        TuiEvent::Tab | TuiEvent::BackTab => {
            tui.move_focus(app, matches!(event, TuiEvent::Tab));
            None
        }
        TuiEvent::Char(c) => {
            text.push(*c);
            Some(Action::SetInput { component, value: text })
        }
        TuiEvent::Paste(data) => {
            text.extend(data.chars().filter(|c| !c.is_control()));
            Some(Action::SetInput { component, value: text })
        }
        TuiEvent::Backspace => {
            text.pop()?;
            Some(Action::SetInput { component, value: text })
        }
        _ => {
            tui.scroll_target(app).handle_event(event);
            None
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Disambiguated escape codes let a bare Esc arrive without delay.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Panics in callback handlers are caught and reported as callback errors;
/// only a panic on the main thread should tear the terminal down.
fn install_panic_hook() {
    let restore_and_report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if std::thread::current().name() == Some("main") {
            restore_and_report(info);
        } else {
            error!("Callback panicked: {}", info);
        }
    }));
}

pub fn run(mut app: App, start_path: String) -> std::io::Result<()> {
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    install_panic_hook();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for resolved callbacks
    let (tx, rx) = mpsc::channel();
    let timeout = Duration::from_secs(app.callback_timeout_secs);

    info!("Session {} starting at {}", app.session_id, start_path);
    let effect = update(&mut app, Action::Navigate(start_path));
    let mut should_quit = dispatch(effect, &tx, timeout);

    let start_time = Instant::now();
    let mut needs_redraw = true;

    while !should_quit {
        tui.sync(&app);
        let busy = app.pending_callbacks > 0;
        if busy {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let poll = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(poll);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = handle_event(&app, &mut tui, &event) else {
                continue;
            };
            debug!("Action from input: {:?}", action);
            if dispatch(update(&mut app, action), &tx, timeout) {
                should_quit = true;
                break;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatch(update(&mut app, action), &tx, timeout) {
                should_quit = true;
            }
        }
    }

    info!(
        "Session {} ending ({} refreshes, fullscreen clicks {:?})",
        app.session_id,
        app.refresh_count,
        app.fullscreen.clicks()
    );
    ratatui::restore();
    Ok(())
}

/// Carries out an effect. Returns true when the app should quit.
fn dispatch(effect: Effect, tx: &mpsc::Sender<Action>, timeout: Duration) -> bool {
    match effect {
        Effect::Quit => true,
        Effect::Invoke {
            generation,
            depth,
            invocations,
        } => {
            for invocation in invocations {
                spawn_invocation(invocation, generation, depth, tx.clone(), timeout);
            }
            false
        }
        Effect::None => false,
    }
}

fn spawn_invocation(
    invocation: Invocation,
    generation: u64,
    depth: usize,
    tx: mpsc::Sender<Action>,
    timeout: Duration,
) {
    let output = invocation.output.clone();
    debug!(
        "Spawning callback for {} (generation={}, depth={})",
        output, generation, depth
    );
    tokio::spawn(async move {
        let task = tokio::task::spawn_blocking(move || invocation.run());
        let result = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                warn!("Callback for {} did not finish: {}", output, join_error);
                Err(CallbackError::Panicked(panic_message(join_error)))
            }
            Err(_) => {
                warn!(
                    "Callback for {} timed out after {}s",
                    output,
                    timeout.as_secs()
                );
                Err(CallbackError::TimedOut(timeout.as_secs()))
            }
        };
        if tx
            .send(Action::CallbackResolved {
                generation,
                depth,
                output: output.clone(),
                result,
            })
            .is_err()
        {
            warn!("Failed to send result for {}: receiver dropped", output);
        }
    });
}

fn panic_message(join_error: tokio::task::JoinError) -> String {
    if !join_error.is_panic() {
        return join_error.to_string();
    }
    let payload = join_error.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callbacks::{Callback, PropStore};
    use crate::test_support::test_app;

    fn press(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
        let action = handle_event(app, tui, &event)?;
        // Run invocations inline so props settle before the next key.
        if let Effect::Invoke { generation, depth, invocations } = update(app, action.clone()) {
            for invocation in invocations {
                let output = invocation.output.clone();
                let result = invocation.run();
                update(app, Action::CallbackResolved { generation, depth, output, result });
            }
        }
        tui.sync(app);
        Some(action)
    }

    fn open_demo(app: &mut App) {
        update(app, Action::Navigate("/examples/demo".to_string()));
    }

    #[test]
    fn test_browse_keys_map_to_actions() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        assert!(matches!(
            handle_event(&app, &mut tui, &TuiEvent::Char('q')),
            Some(Action::Quit)
        ));
        assert!(matches!(
            handle_event(&app, &mut tui, &TuiEvent::Char('d')),
            Some(Action::ShowDocs)
        ));
        assert!(matches!(
            handle_event(&app, &mut tui, &TuiEvent::ForceQuit),
            Some(Action::Quit)
        ));

        // Fullscreen keys do nothing on the overview.
        assert!(handle_event(&app, &mut tui, &TuiEvent::Char('a')).is_none());
        assert!(handle_event(&app, &mut tui, &TuiEvent::Char('c')).is_none());

        open_demo(&mut app);
        assert!(matches!(
            handle_event(&app, &mut tui, &TuiEvent::Char('a')),
            Some(Action::OpenFullscreenApp)
        ));
        assert!(matches!(
            handle_event(&app, &mut tui, &TuiEvent::Char('c')),
            Some(Action::OpenFullscreenCode)
        ));
    }

    #[test]
    fn test_overview_enter_opens_example() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        let action = press(&mut app, &mut tui, TuiEvent::Enter);
        assert!(matches!(action, Some(Action::Navigate(ref p)) if p == "/examples/demo"));
        assert_eq!(app.current_id(), "demo");
    }

    #[test]
    fn test_typing_updates_input_and_outputs() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        open_demo(&mut app);

        press(&mut app, &mut tui, TuiEvent::Tab);
        assert_eq!(tui.input_mode, InputMode::Edit);
        assert_eq!(tui.focused_input(&app), Some(ComponentId::new("demo-x-count")));

        // 'q' types instead of quitting while editing.
        press(&mut app, &mut tui, TuiEvent::Backspace);
        press(&mut app, &mut tui, TuiEvent::Char('2'));
        press(&mut app, &mut tui, TuiEvent::Char('1'));
        assert_eq!(app.input_text(&Binding::new("demo-x-count", Prop::Value)), "21");
        assert_eq!(
            app.props.get(&Binding::new("demo-x-double", Prop::Children)),
            Some(&serde_json::json!("42"))
        );

        let action = press(&mut app, &mut tui, TuiEvent::Char('q'));
        assert!(matches!(action, Some(Action::SetInput { .. })));
    }

    #[test]
    fn test_escape_backs_out_one_level_at_a_time() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        open_demo(&mut app);
        tui.sync(&app);
        press(&mut app, &mut tui, TuiEvent::Char('a'));
        assert!(app.fullscreen.is_open());
        press(&mut app, &mut tui, TuiEvent::Tab);
        assert_eq!(tui.input_mode, InputMode::Edit);

        press(&mut app, &mut tui, TuiEvent::Escape);
        assert_eq!(tui.input_mode, InputMode::Browse);
        assert!(app.fullscreen.is_open());

        press(&mut app, &mut tui, TuiEvent::Escape);
        assert!(!app.fullscreen.is_open());
        assert_eq!(app.current_id(), "demo");

        press(&mut app, &mut tui, TuiEvent::Escape);
        assert!(app.is_overview());
    }

    #[test]
    fn test_page_load_resets_focus() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        open_demo(&mut app);
        press(&mut app, &mut tui, TuiEvent::Tab);
        assert!(tui.focus.is_some());

        update(&mut app, Action::Navigate("/examples/notes".to_string()));
        tui.sync(&app);
        assert_eq!(tui.focus, None);
        assert_eq!(tui.input_mode, InputMode::Browse);
    }

    #[test]
    fn test_tab_without_inputs_stays_in_browse() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        update(&mut app, Action::Navigate("/examples/notes".to_string()));
        press(&mut app, &mut tui, TuiEvent::Tab);
        assert_eq!(tui.input_mode, InputMode::Browse);
        assert_eq!(tui.focus, None);
    }

    #[test]
    fn test_overview_key_ignored_while_modal_open() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        open_demo(&mut app);
        press(&mut app, &mut tui, TuiEvent::Char('a'));

        assert!(press(&mut app, &mut tui, TuiEvent::Char('o')).is_none());
        assert!(app.fullscreen.is_open());
        assert_eq!(app.current_id(), "demo");

        press(&mut app, &mut tui, TuiEvent::Escape);
        assert_eq!(app.refresh_count, 1);
        let action = press(&mut app, &mut tui, TuiEvent::Char('o'));
        assert!(matches!(action, Some(Action::Navigate(ref p)) if p == "/"));
        assert!(app.is_overview());
    }

    #[test]
    fn test_tab_ignored_behind_code_view() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        open_demo(&mut app);
        press(&mut app, &mut tui, TuiEvent::Char('c'));
        assert!(!inputs_visible(&app));

        press(&mut app, &mut tui, TuiEvent::Tab);
        press(&mut app, &mut tui, TuiEvent::BackTab);
        assert_eq!(tui.input_mode, InputMode::Browse);
        assert_eq!(tui.focus, None);

        // Typing goes nowhere; the hidden input keeps its default.
        press(&mut app, &mut tui, TuiEvent::Char('9'));
        assert_eq!(app.input_text(&Binding::new("demo-x-count", Prop::Value)), "3");

        // Switching to the live example makes the inputs reachable again.
        press(&mut app, &mut tui, TuiEvent::Char('a'));
        press(&mut app, &mut tui, TuiEvent::Char('a'));
        assert!(inputs_visible(&app));
        press(&mut app, &mut tui, TuiEvent::Tab);
        assert_eq!(tui.input_mode, InputMode::Edit);
    }

    fn slow(_: &[serde_json::Value]) -> Result<Option<serde_json::Value>, CallbackError> {
        std::thread::sleep(Duration::from_secs(3));
        Ok(None)
    }

    fn explode(_: &[serde_json::Value]) -> Result<Option<serde_json::Value>, CallbackError> {
        panic!("boom")
    }

    fn resolve(handler: crate::core::callbacks::Handler, timeout: Duration) -> Action {
        let callback = Callback::new(("demo-x-out", Prop::Children), &[("demo-x-in", Prop::Value)], handler);
        let invocation = Invocation::new(&callback, &PropStore::new());
        let (tx, rx) = mpsc::channel();
        spawn_invocation(invocation, 7, 2, tx, timeout);
        rx.recv_timeout(Duration::from_secs(10)).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_panicking_handler_becomes_error() {
        match resolve(explode, Duration::from_secs(5)) {
            Action::CallbackResolved { generation, depth, output, result } => {
                assert_eq!(generation, 7);
                assert_eq!(depth, 2);
                assert_eq!(output, Binding::new("demo-x-out", Prop::Children));
                assert_eq!(result, Err(CallbackError::Panicked("boom".to_string())));
            }
            _ => panic!("expected a resolved callback"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_slow_handler_times_out() {
        match resolve(slow, Duration::from_secs(1)) {
            Action::CallbackResolved { result, .. } => {
                assert_eq!(result, Err(CallbackError::TimedOut(1)));
            }
            _ => panic!("expected a resolved callback"),
        }
    }
}
