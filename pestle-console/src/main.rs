//! Pestle Console - terminal front-end for the pharmacy inventory API
//!
//! Run: cargo run --bin pestle-console
//!
//! Reads `PESTLE_API_URL` (and friends) from the environment or a .env
//! file. All network work happens in background tasks; the UI loop only
//! drains their results.

mod app;
mod form;
mod ui;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tui_input::backend::crossterm::EventHandler;
use tui_logger::TuiWidgetEvent;

use pestle_client::{ClientConfig, HttpInventoryApi, ProductStore};

use app::{App, AppEvent, FilterInput, InputMode, View};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Route tracing into the TUI log pane
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter)
        .init();
    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Info);

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "connecting to inventory API");

    let api = Arc::new(HttpInventoryApi::new(&config)?);
    let store = Arc::new(ProductStore::new(api).with_category_ttl(config.category_ttl));

    let (tx, mut rx) = mpsc::channel(64);
    let mut app = App::new(store, tx);
    app.refresh();
    app.load_categories();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Apply whatever the background tasks have finished
        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    handle_key(app, key);
                }
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.view {
        View::Table => match app.input_mode {
            InputMode::Normal => handle_table_key(app, key),
            InputMode::Editing(target) => handle_filter_edit_key(app, key, target),
        },
        View::Form(_) => handle_form_key(app, key),
        View::ConfirmDelete(_) => handle_confirm_key(app, key),
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.open_delete_confirm(),
        KeyCode::Char('/') => app.input_mode = InputMode::Editing(FilterInput::Search),
        KeyCode::Char('u') => app.input_mode = InputMode::Editing(FilterInput::Supplier),
        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char('s') => app.cycle_stock_filter(),
        KeyCode::Char('x') => app.cycle_expiry_filter(),
        KeyCode::Char('l') => app.toggle_low_stock_shortcut(),
        KeyCode::Char('g') => app.toggle_expiring_shortcut(),
        KeyCode::Char('C') => app.clear_filters(),
        KeyCode::Char('L') => app.show_logs = !app.show_logs,
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::PageUp => app.logger_state.transition(TuiWidgetEvent::PrevPageKey),
        KeyCode::PageDown => app.logger_state.transition(TuiWidgetEvent::NextPageKey),
        _ => {}
    }
}

fn handle_filter_edit_key(app: &mut App, key: KeyEvent, target: FilterInput) {
    match key.code {
        KeyCode::Enter => app.commit_filter_input(target),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.filter_input.reset();
        }
        _ => {
            app.filter_input.handle_event(&Event::Key(key));
        }
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus_prev();
            }
        }
        _ => {
            if let Some(form) = app.form.as_mut() {
                form.focused_input_mut().handle_event(&Event::Key(key));
            }
        }
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.close_modal(),
        _ => {}
    }
}
