mod app;
mod catalog;
mod config;
mod dispatcher;
mod error;
mod file_operations;
mod logging;
mod poller;
mod resolver;
mod tasks;
mod types;
mod ui;

use anyhow::Context;
use app::App;
use clap::Parser;
use config::PanelConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dispatcher::{Dispatcher, SystemLauncher};
use file_operations::RealFs;
use logging::LogBuffer;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{Terminal, backend::CrosstermBackend};
use resolver::PathTable;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{info, warn};
use types::{ActivePane, DialogButton};

const LOG_PANE_LINES: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "unreal-panel")]
#[command(about = "TUI control panel for Unreal Engine project tools", long_about = None)]
struct Args {
    /// Path to the panel configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between path checks (overrides the configuration)
    #[arg(long)]
    interval: Option<u64>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log = LogBuffer::new(LOG_PANE_LINES);
    let log_dir = args.log_dir.clone().unwrap_or_else(config::default_log_dir);
    let _guard = logging::init_tracing(&log_dir, &log)
        .with_context(|| format!("failed to set up logging in {}", log_dir.display()))?;

    let config_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let mut config = PanelConfig::load(&config_path)?;
    if let Some(interval) = args.interval {
        config.panel.poll_interval_secs = interval;
    }
    for warning in config.warnings() {
        warn!("{}", warning);
    }
    info!("Loaded configuration from {}", config_path.display());

    let paths = Arc::new(PathTable::new(&config.paths));
    let dispatcher = Dispatcher::new(paths.clone(), Arc::new(RealFs), Arc::new(SystemLauncher));
    let mut app = App::new(&config, dispatcher, log);

    // Watch the project directory so folder changes show up before the next tick
    let (tx, rx) = channel();
    let mut _watcher = None;
    if let Some(project) = paths.get("unreal_project").filter(|p| p.is_dir()) {
        match RecommendedWatcher::new(tx, Config::default()).and_then(|mut watcher| {
            watcher.watch(project, RecursiveMode::NonRecursive)?;
            Ok(watcher)
        }) {
            Ok(watcher) => {
                _watcher = Some(watcher);
                app = app.with_fs_events(rx);
            }
            Err(e) => warn!("Could not watch {}: {}", project.display(), e),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    info!("Panel closed");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.check_completions();
        app.check_fs_events();
        app.tick();

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.show_help_dialog {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                app.show_help_dialog = false;
            }
        } else if app.show_confirm_dialog {
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    app.dialog_button = match app.dialog_button {
                        DialogButton::Ok => DialogButton::Cancel,
                        DialogButton::Cancel => DialogButton::Ok,
                    };
                }
                KeyCode::Enter => app.confirm_selected(),
                KeyCode::Esc => {
                    app.show_confirm_dialog = false;
                    app.dialog_button = DialogButton::Ok;
                }
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('h') | KeyCode::Char('?') => app.show_help_dialog = true,
                KeyCode::Char('r') => app.request_refresh(),
                KeyCode::Tab => app.toggle_pane(),
                KeyCode::Enter => {
                    if app.active_pane == ActivePane::Controls {
                        app.activate_selected();
                    }
                }
                KeyCode::Down => match app.active_pane {
                    ActivePane::Controls => app.next(),
                    ActivePane::Log => app.scroll_log_down(),
                },
                KeyCode::Up => match app.active_pane {
                    ActivePane::Controls => app.previous(),
                    ActivePane::Log => app.scroll_log_up(),
                },
                _ => {}
            }
        }
    }
}
