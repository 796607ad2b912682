mod app;
mod cli;
mod detail;
mod fetch;
mod filter;
mod format;
mod grid;
mod logging;
mod model;
mod refresh;
mod timer;
mod ui;
mod worker;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::{error, info};

use crate::app::{App, InputMode};
use crate::fetch::Fetcher;
use crate::refresh::RefreshController;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let _guard = logging::setup_logging(&args.log_path())?;

    let fetcher = Fetcher::new(fetch::source_from(&args.source)?);
    let controller = RefreshController::new(args.refresh_interval, args.button_lock);
    let mut app = App::new(fetcher, controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start(Instant::now());
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    info!("exiting");

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Action {
    None,
    Quit,
    Refresh,
    OpenDetail,
    SelectCard(usize),
    SelectCategory(usize),
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished fetches and advance the timers (non-blocking)
        app.process_fetch_results();
        app.on_tick(Instant::now());

        terminal.draw(|f| ui::ui(f, app))?;
        // Note: clickable_regions are updated during ui() rendering

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;

            let action = match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_input(app, key.code),
                Event::Mouse(mouse) => handle_mouse(app, mouse.kind, mouse.column, mouse.row),
                _ => Action::None,
            };

            match action {
                Action::Quit => return Ok(()),
                Action::Refresh => {
                    app.request_manual_refresh(Instant::now());
                }
                Action::OpenDetail => app.open_selected_detail(),
                Action::SelectCard(idx) => app.select_card(idx),
                Action::SelectCategory(idx) => app.select_category_tab(idx),
                Action::None => {}
            }
        }
    }
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.input_mode {
        InputMode::Normal => match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('/') => {
                app.input_mode = InputMode::Search;
                Action::None
            }
            KeyCode::Tab => {
                app.next_category();
                Action::None
            }
            KeyCode::BackTab => {
                app.prev_category();
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                app.move_selection(1);
                Action::None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                app.move_selection(-1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.move_selection(app.grid_columns as isize);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.move_selection(-(app.grid_columns as isize));
                Action::None
            }
            KeyCode::Enter => Action::OpenDetail,
            _ => Action::None,
        },
        InputMode::Search => match key {
            KeyCode::Esc | KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
                Action::None
            }
            KeyCode::Backspace => {
                app.pop_search_char();
                Action::None
            }
            KeyCode::Char(c) => {
                app.push_search_char(c);
                Action::None
            }
            _ => Action::None,
        },
        InputMode::Detail => match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                app.close_detail();
                Action::None
            }
            _ => Action::None,
        },
    }
}

/// Check if a point (x, y) is inside a Rect
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, kind: MouseEventKind, x: u16, y: u16) -> Action {
    match kind {
        MouseEventKind::ScrollDown if app.input_mode == InputMode::Normal => {
            app.move_selection(app.grid_columns as isize);
            return Action::None;
        }
        MouseEventKind::ScrollUp if app.input_mode == InputMode::Normal => {
            app.move_selection(-(app.grid_columns as isize));
            return Action::None;
        }
        MouseEventKind::Down(MouseButton::Left) => {}
        _ => return Action::None,
    }

    // In detail view, any click closes it
    if app.input_mode == InputMode::Detail {
        app.close_detail();
        return Action::None;
    }

    let regions = &app.clickable_regions;

    if point_in_rect(x, y, regions.search_bar) {
        app.input_mode = InputMode::Search;
        return Action::None;
    }
    if app.input_mode == InputMode::Search {
        app.input_mode = InputMode::Normal;
    }

    for (rect, idx) in &regions.category_tabs {
        if point_in_rect(x, y, *rect) {
            return Action::SelectCategory(*idx);
        }
    }

    // Click on already-selected card opens detail view
    for (rect, idx) in &regions.cards {
        if point_in_rect(x, y, *rect) {
            if app.selected == *idx {
                return Action::OpenDetail;
            }
            return Action::SelectCard(*idx);
        }
    }

    if point_in_rect(x, y, regions.refresh_button) {
        return Action::Refresh;
    }

    Action::None
}
