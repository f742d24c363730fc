//! Fakes for the socket and HTTP seams.

use std::cell::RefCell;
use std::sync::Mutex;
use std::sync::mpsc;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use url::Url;

use crate::app::App;
use crate::commands::{ApiResponse, ApiStatus, CommandDispatcher, ManageAction, ManageApi};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::event::Event;
use crate::net::{ConnectionManager, Dialer};

#[derive(Default)]
pub struct FakeDialer {
  sockets: RefCell<Vec<UnboundedReceiver<String>>>,
}

impl FakeDialer {
  pub fn dials(&self) -> usize {
    self.sockets.borrow().len()
  }

  /// Every frame written to any socket so far, in order, drained.
  pub fn sent(&self) -> Vec<String> {
    let mut frames = Vec::new();
    for rx in self.sockets.borrow_mut().iter_mut() {
      while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
      }
    }
    frames
  }
}

impl Dialer for FakeDialer {
  fn dial(&mut self, _endpoint: &Url, _generation: u64) -> crate::net::connection::Outbound {
    let (tx, rx) = unbounded_channel();
    self.sockets.borrow_mut().push(rx);
    tx
  }
}

#[derive(Debug, Clone)]
pub enum Reply {
  Status(ApiResponse),
  Fail(String),
}

pub struct FakeApi {
  reply: Mutex<Reply>,
  calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
  fn default() -> Self {
    Self::replying(Reply::Status(ApiResponse { status: ApiStatus::Success, error: None }))
  }
}

impl FakeApi {
  pub fn replying(reply: Reply) -> Self {
    Self { reply: Mutex::new(reply), calls: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().map(|c| c.clone()).unwrap_or_default()
  }

  fn respond(&self, call: String) -> Result<ApiResponse> {
    if let Ok(mut calls) = self.calls.lock() {
      calls.push(call);
    }
    let reply = self.reply.lock().map(|r| r.clone()).map_err(|e| ClientError::Server(e.to_string()))?;
    match reply {
      Reply::Status(response) => Ok(response),
      Reply::Fail(message) => Err(ClientError::Server(message)),
    }
  }
}

impl ManageApi for FakeApi {
  async fn rename(&self, path: &str, new_name: &str) -> Result<ApiResponse> {
    self.respond(format!("rename {path} -> {new_name}"))
  }

  async fn manage(&self, action: ManageAction, srcs: &[String], dest: Option<&str>) -> Result<ApiResponse> {
    let mut call = format!("{} {}", action.as_str(), srcs.join(","));
    if let Some(dest) = dest {
      call.push_str(&format!(" -> {dest}"));
    }
    self.respond(call)
  }
}

pub struct Harness {
  pub app: App<FakeDialer, FakeApi>,
  pub events: mpsc::Receiver<Event>,
  pub runtime: tokio::runtime::Runtime,
}

pub fn harness(api: FakeApi) -> Harness {
  let runtime = tokio::runtime::Runtime::new().unwrap();
  let (tx, rx) = mpsc::channel();
  let origin = Url::parse("http://localhost:3000").unwrap();
  let endpoint = Url::parse("ws://localhost:3000/files").unwrap();
  let config = Config::default();
  let connection = ConnectionManager::new(endpoint, FakeDialer::default(), config.reconnect_policy());
  let dispatcher = CommandDispatcher::new(api, origin, runtime.handle().clone(), tx)
    .with_launcher(|_| Ok(()));
  let app = App::new(connection, dispatcher, &config);
  Harness { app, events: rx, runtime }
}
