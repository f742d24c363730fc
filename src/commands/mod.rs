pub mod http;

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use serde::Deserialize;
use tokio::runtime::Handle;
use url::Url;

use crate::error::Result;
use crate::event::Event;
use crate::net::endpoint;

pub use http::HttpManageApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Rename { path: String, new_name: String },
  Delete { paths: Vec<String> },
  Copy { sources: Vec<String>, destination: String },
  Move { sources: Vec<String>, destination: String },
}

impl Command {
  fn fallback_error(&self) -> &'static str {
    match self {
      Command::Rename { .. } => "Failed to rename",
      Command::Delete { .. } => "Failed to delete",
      Command::Copy { .. } => "Failed to copy",
      Command::Move { .. } => "Failed to move",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
  Copy,
  Paste,
  Delete,
}

impl ManageAction {
  pub fn as_str(self) -> &'static str {
    match self {
      ManageAction::Copy => "copy",
      ManageAction::Paste => "paste",
      ManageAction::Delete => "delete",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
  Success,
  Ok,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResponse {
  pub status: ApiStatus,
  #[serde(default)]
  pub error: Option<String>,
}

impl ApiResponse {
  /// Upstream services disagree on the spelling, so both count.
  pub fn is_success(&self) -> bool {
    matches!(self.status, ApiStatus::Success | ApiStatus::Ok)
  }
}

/// The request/response management endpoints.
pub trait ManageApi: Send + Sync + 'static {
  fn rename(&self, path: &str, new_name: &str) -> impl Future<Output = Result<ApiResponse>> + Send;

  fn manage(
    &self,
    action: ManageAction,
    srcs: &[String],
    dest: Option<&str>,
  ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// Runs one command. The error is ready to show to the user.
pub async fn execute<A: ManageApi>(api: &A, command: &Command) -> std::result::Result<(), String> {
  let response = match command {
    Command::Rename { path, new_name } => api.rename(path, new_name).await,
    Command::Delete { paths } => api.manage(ManageAction::Delete, paths, None).await,
    Command::Copy { sources, destination } => {
      api.manage(ManageAction::Copy, sources, Some(destination)).await
    }
    Command::Move { sources, destination } => {
      api.manage(ManageAction::Paste, sources, Some(destination)).await
    }
  };
  match response {
    Ok(response) if response.is_success() => Ok(()),
    Ok(response) => Err(
      response
        .error
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| command.fallback_error().to_string()),
    ),
    Err(e) => {
      tracing::warn!(?command, "command transport failed: {e}");
      Err(e.to_string())
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
  /// Id of the tab the command was issued from.
  pub tab: u64,
  pub command: Command,
  pub outcome: std::result::Result<(), String>,
}

type Launcher = Box<dyn Fn(&Url) -> io::Result<()>>;

/// Runs commands on the runtime and posts a [`CommandReport`] for each one.
/// Overlapping commands are not de-duplicated.
pub struct CommandDispatcher<A: ManageApi> {
  api: Arc<A>,
  origin: Url,
  runtime: Handle,
  events: Sender<Event>,
  launcher: Launcher,
}

impl<A: ManageApi> CommandDispatcher<A> {
  pub fn new(api: A, origin: Url, runtime: Handle, events: Sender<Event>) -> Self {
    Self {
      api: Arc::new(api),
      origin,
      runtime,
      events,
      launcher: Box::new(|url| open::that(url.as_str())),
    }
  }

  pub fn with_launcher(mut self, launcher: impl Fn(&Url) -> io::Result<()> + 'static) -> Self {
    self.launcher = Box::new(launcher);
    self
  }

  pub fn dispatch(&self, tab: u64, command: Command) {
    tracing::info!(tab, ?command, "dispatching command");
    let api = Arc::clone(&self.api);
    let events = self.events.clone();
    self.runtime.spawn(async move {
      let outcome = execute(api.as_ref(), &command).await;
      if let Err(ref e) = outcome {
        tracing::warn!(?command, "command failed: {e}");
      }
      let _ = events.send(Event::Command(CommandReport { tab, command, outcome }));
    });
  }

  /// Hands the transfer to the system opener. Folders arrive as a ZIP archive.
  /// There is no completion signal.
  pub fn download(&self, path: &str, is_folder: bool) -> Result<Url> {
    let url = if is_folder {
      endpoint::zip_url(&self.origin, path)?
    } else {
      endpoint::file_url(&self.origin, path)?
    };
    tracing::info!(%url, "starting download");
    (self.launcher)(&url)?;
    Ok(url)
  }
}
