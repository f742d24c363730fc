mod action;
mod app;
mod commands;
mod config;
mod error;
mod event;
mod listing;
mod net;
mod state;
#[cfg(test)]
mod testing;
mod ui;

use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use crate::action::Action;
use crate::app::App;
use crate::commands::CommandDispatcher;
use crate::commands::http::HttpManageApi;
use crate::config::Config;
use crate::event::{Event, EventLoop, map_key};
use crate::net::endpoint::{listing_endpoint, parse_origin};
use crate::net::socket::WsDialer;
use crate::net::ConnectionManager;
use crate::state::Severity;

/// Terminal client for a remote file-manager server.
#[derive(Debug, Parser)]
#[command(name = "rfm", version, about)]
struct Cli {
  /// Server origin, e.g. `files.local:3000` or `https://files.example.com`
  #[arg(env = "RFM_SERVER")]
  server: Option<String>,

  /// Directory to open first, as the server names it
  #[arg(long)]
  path: Option<String>,

  /// Write the default config file and exit
  #[arg(long)]
  init: bool,

  /// Log file, defaults to rfm.log in the user's state directory
  #[arg(long)]
  log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.init {
    return init_config();
  }

  let (mut config, config_errors) = Config::load();
  if let Some(server) = cli.server {
    config.server = server;
  }
  if let Some(path) = cli.path {
    config.start_path = path;
  }

  let log_path = cli.log_file.or_else(default_log_path);
  if let Some(path) = &log_path
    && let Err(e) = init_logging(path)
  {
    eprintln!("rfm: logging disabled: {e:#}");
  }

  let origin = parse_origin(&config.server).with_context(|| format!("invalid server {:?}", config.server))?;
  let endpoint = listing_endpoint(&origin)?;
  tracing::info!(%origin, %endpoint, "starting");

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .worker_threads(2)
    .enable_all()
    .build()
    .context("failed to start async runtime")?;

  let events = EventLoop::new(Duration::from_millis(config.tick_rate_ms));
  let api = HttpManageApi::new(origin.clone(), config.request_timeout())?;
  let dialer = WsDialer::new(runtime.handle().clone(), events.sender());
  let connection = ConnectionManager::new(endpoint, dialer, config.reconnect_policy());
  let dispatcher = CommandDispatcher::new(api, origin, runtime.handle().clone(), events.sender());
  let mut app = App::new(connection, dispatcher, &config);

  let now = Instant::now();
  for error in config_errors {
    tracing::warn!("config: {error}");
    app.notifications.push(error, Severity::Warning, now);
  }

  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    original_hook(info);
  }));

  setup_terminal()?;
  let backend = CrosstermBackend::new(io::stdout());
  let mut terminal = Terminal::new(backend)?;

  app.start();
  let result = run(&mut terminal, &mut app, &events, &config);

  app.shutdown();
  restore_terminal()?;
  runtime.shutdown_timeout(Duration::from_millis(500));
  tracing::info!("exiting");
  result
}

fn run<D, A>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<D, A>,
  events: &EventLoop,
  config: &Config,
) -> Result<()>
where
  D: net::Dialer,
  A: commands::ManageApi,
{
  loop {
    terminal.draw(|frame| ui::draw(frame, app, config))?;

    match events.next()? {
      Event::Key(key) => {
        let action = map_key(key, app.input_mode, config);
        app.update(action)?;
      }
      Event::Resize(w, h) => app.update(Action::Resize(w, h))?,
      Event::Tick => app.update(Action::Tick)?,
      Event::Socket(signal) => app.handle_socket(signal, Instant::now()),
      Event::Command(report) => app.handle_command_report(report),
    }

    if app.should_quit {
      return Ok(());
    }
  }
}

fn init_config() -> Result<()> {
  let path = Config::config_path().map_err(anyhow::Error::msg)?;
  if path.exists() {
    eprint!("{} already exists. Overwrite? [y/N] ", path.display());
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
      return Ok(());
    }
  }
  Config::dump_default_config(&path).map_err(anyhow::Error::msg)?;
  println!("{}", path.display());
  Ok(())
}

fn default_log_path() -> Option<PathBuf> {
  dirs::state_dir()
    .or_else(dirs::cache_dir)
    .map(|d| d.join("rfm").join("rfm.log"))
}

fn init_logging(path: &Path) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let file = File::options()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("failed to open {}", path.display()))?;

  let filter = EnvFilter::try_from_env("RFM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| anyhow::anyhow!("{e}"))?;
  Ok(())
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen)?;
  Ok(())
}
