//! fleetconsole - a terminal console for fleet platform user administration
//!
//! Browse users by organization, search and page through them, and add
//! users and roles without leaving the terminal.

mod api;
mod config;
mod models;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::FleetClient;
use crate::config::{Config, Overrides};
use crate::ui::{App, AppEvent, AppSettings, Focus, InputMode, KeyBindings, Nav, UserField};

/// fleetconsole - fleet user administration TUI
#[derive(Parser, Debug)]
#[command(name = "fleetconsole")]
#[command(about = "A terminal UI for managing fleet platform users and roles")]
#[command(version)]
struct Args {
    /// API base URL (e.g., https://fleet.example.com/api)
    #[arg(short = 'u', long = "url", env = "FLEET_API_URL")]
    url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "FLEET_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Users per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Use vim-style keybindings (h/j/k/l navigation)
    #[arg(long, default_value = "false")]
    vim: bool,

    /// Save the API URL to the config file
    #[arg(long, default_value = "false")]
    remember: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    config.apply(Overrides {
        base_url: args.url,
        token: args.token,
        page_size: args.page_size,
        vim: args.vim,
        log_file: args.log_file,
    });

    init_logging(&config)?;

    let base_url = config.require_base_url()?.to_string();
    let client = Arc::new(
        FleetClient::new(
            &base_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .context("Failed to create API client")?,
    );

    if args.remember {
        // Tokens stay out of the file
        let saved = Config {
            token: None,
            ..config.clone()
        };
        let path = saved.save()?;
        eprintln!("Saved settings to {}", path.display());
    }

    let settings = AppSettings {
        page_size: config.page_size,
        default_parent_path: config.default_parent_path.clone(),
        keep_org_filter_on_search: config.keep_org_filter_on_search,
        key_bindings: KeyBindings::from_vim_flag(config.vim),
    };
    tracing::info!(url = %base_url, page_size = settings.page_size, "starting");

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (mut app, events) = App::new(client, settings);
    let result = run_app(&mut terminal, &mut app, events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:?}", e);
    }

    Ok(())
}

/// Logs go to the configured file, or stderr. Filter with RUST_LOG.
fn init_logging(config: &Config) -> Result<()> {
    let layer = tracing_subscriber::fmt::layer();
    let layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            layer
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => layer.with_writer(BoxMakeWriter::new(io::stderr)),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(layer)
        .init();
    Ok(())
}

/// Main event loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut events: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    app.start();

    loop {
        // Finished API calls first, so the frame shows their results
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::components::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.input_mode {
                    InputMode::Normal => handle_normal_mode(app, key.code),
                    InputMode::Search => handle_search_mode(app, key.code),
                    InputMode::Modal => handle_modal_mode(app, key.code),
                }

                if app.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handle input in normal mode
fn handle_normal_mode(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input = app.users.filter().search_text.clone().unwrap_or_default();
            return;
        }
        KeyCode::Esc => {
            app.clear_message();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Tree => Focus::Users,
                Focus::Users => Focus::Tree,
            };
            return;
        }
        KeyCode::Char('r') => {
            app.reset();
            return;
        }
        KeyCode::Char('a') => {
            app.open_user_form();
            return;
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            app.prev_page();
            return;
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            app.next_page();
            return;
        }
        _ => {}
    }

    let nav = app.key_bindings.nav(key, InputMode::Normal);
    match app.focus {
        Focus::Tree => match (nav, key) {
            (Some(Nav::Up), _) => app.org_tree.cursor_up(),
            (Some(Nav::Down), _) => app.org_tree.cursor_down(),
            (Some(Nav::Left), _) => app.org_tree.collapse(),
            (Some(Nav::Right), _) => app.org_tree.expand(),
            (None, KeyCode::Enter) => app.select_org(),
            (None, KeyCode::Char(' ')) => app.org_tree.toggle(),
            _ => {}
        },
        Focus::Users => match nav {
            Some(Nav::Up) => app.users.select_prev(),
            Some(Nav::Down) => app.users.select_next(),
            Some(Nav::Left) => app.prev_page(),
            Some(Nav::Right) => app.next_page(),
            None => {}
        },
    }
}

/// Handle input in search mode
fn handle_search_mode(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}

/// Handle input while a creation modal is open
fn handle_modal_mode(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.close_modal();
            return;
        }
        KeyCode::Enter => {
            app.submit_modal();
            return;
        }
        _ => {}
    }

    if let Some(form) = app.role_form.as_mut() {
        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.focus_next(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
        return;
    }

    let Some(form) = app.user_form.as_mut() else {
        return;
    };
    match key {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left | KeyCode::Right => {
            if let Some(province) = form.cycle(key == KeyCode::Right) {
                app.load_cities(province);
            }
        }
        KeyCode::Delete => form.clear_choice(),
        KeyCode::Char(' ')
            if matches!(form.focus, UserField::FreezeUponExpiration | UserField::Roles) =>
        {
            form.toggle()
        }
        KeyCode::Char('n') if form.focus == UserField::Roles => app.open_role_form(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}
