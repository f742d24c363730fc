use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::listing::RequestSink;
use crate::net::protocol::{ListingRequest, ServerMessage, parse_server_message};
use crate::net::subscribers::{Subscribers, Subscription};

/// Outbound text frames for one live socket. Dropping it closes the socket.
pub type Outbound = UnboundedSender<String>;

/// Opens sockets. Events for the socket must be reported back through
/// [`ConnectionManager::handle`] tagged with `generation`.
pub trait Dialer {
  fn dial(&mut self, endpoint: &Url, generation: u64) -> Outbound;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
  pub delay: Duration,
  pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
  fn default() -> Self {
    Self { delay: Duration::from_millis(1000), max_attempts: 5 }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
  Idle,
  Connecting,
  Open,
  Closed,
  /// Reconnect attempts are exhausted. Only a manual reconnect leaves this state.
  Disconnected,
}

impl ConnectionState {
  pub fn label(self) -> &'static str {
    match self {
      ConnectionState::Idle => "idle",
      ConnectionState::Connecting => "connecting",
      ConnectionState::Open => "live",
      ConnectionState::Closed => "reconnecting",
      ConnectionState::Disconnected => "disconnected",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
  Opened,
  Message(String),
  Error(String),
  Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketSignal {
  pub generation: u64,
  pub event: SocketEvent,
}

pub struct ConnectionManager<D: Dialer> {
  endpoint: Url,
  dialer: D,
  policy: ReconnectPolicy,
  state: ConnectionState,
  generation: u64,
  attempts: u32,
  reconnect_at: Option<Instant>,
  outbound: Option<Outbound>,
  subscribers: Subscribers<ServerMessage>,
}

impl<D: Dialer> ConnectionManager<D> {
  pub fn new(endpoint: Url, dialer: D, policy: ReconnectPolicy) -> Self {
    Self {
      endpoint,
      dialer,
      policy,
      state: ConnectionState::Idle,
      generation: 0,
      attempts: 0,
      reconnect_at: None,
      outbound: None,
      subscribers: Subscribers::new(),
    }
  }

  pub fn state(&self) -> ConnectionState {
    self.state
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  pub fn attempts(&self) -> u32 {
    self.attempts
  }

  pub fn reconnect_at(&self) -> Option<Instant> {
    self.reconnect_at
  }

  #[cfg(test)]
  pub fn generation(&self) -> u64 {
    self.generation
  }

  #[cfg(test)]
  pub fn dialer(&self) -> &D {
    &self.dialer
  }

  pub fn connect(&mut self) {
    if matches!(self.state, ConnectionState::Connecting | ConnectionState::Open) {
      tracing::debug!(state = ?self.state, "connect ignored, socket already active");
      return;
    }
    self.generation += 1;
    self.reconnect_at = None;
    self.state = ConnectionState::Connecting;
    tracing::info!(endpoint = %self.endpoint, generation = self.generation, "connecting");
    self.outbound = Some(self.dialer.dial(&self.endpoint, self.generation));
  }

  /// Closes the socket and cancels any pending reconnect.
  pub fn disconnect(&mut self) {
    self.generation += 1;
    self.reconnect_at = None;
    if self.outbound.take().is_some() {
      tracing::info!(endpoint = %self.endpoint, "disconnected");
    }
    if self.state != ConnectionState::Idle {
      self.state = ConnectionState::Closed;
    }
  }

  /// Resets the attempt counter and connects again, typically after the
  /// manager gave up.
  pub fn reconnect(&mut self) {
    self.attempts = 0;
    self.reconnect_at = None;
    self.connect();
  }

  pub fn send(&self, request: &ListingRequest) -> bool {
    let outbound = match (&self.outbound, self.state) {
      (Some(outbound), ConnectionState::Open) => outbound,
      _ => {
        tracing::warn!(state = ?self.state, path = %request.path, "socket not open, dropping request");
        return false;
      }
    };
    let text = match serde_json::to_string(request) {
      Ok(text) => text,
      Err(e) => {
        tracing::warn!("failed to encode request: {e}");
        return false;
      }
    };
    if outbound.send(text).is_err() {
      tracing::warn!(path = %request.path, "socket task gone, dropping request");
      return false;
    }
    true
  }

  pub fn subscribe(&self, handler: impl FnMut(&ServerMessage) + 'static) -> Subscription<ServerMessage> {
    self.subscribers.subscribe(handler)
  }

  /// Applies a socket event. Returns the new state when it changed.
  pub fn handle(&mut self, signal: SocketSignal, now: Instant) -> Option<ConnectionState> {
    if signal.generation != self.generation {
      tracing::debug!(generation = signal.generation, "ignoring event from stale socket");
      return None;
    }
    match signal.event {
      SocketEvent::Opened => {
        tracing::info!(endpoint = %self.endpoint, "connection open");
        self.attempts = 0;
        self.state = ConnectionState::Open;
        Some(self.state)
      }
      SocketEvent::Message(text) => {
        match parse_server_message(&text) {
          Ok(message) => self.subscribers.dispatch(&message),
          Err(e) => tracing::warn!("dropping malformed message: {e}"),
        }
        None
      }
      SocketEvent::Error(e) => {
        tracing::warn!(endpoint = %self.endpoint, "socket error: {e}");
        None
      }
      SocketEvent::Closed => {
        tracing::info!(endpoint = %self.endpoint, "connection closed");
        self.outbound = None;
        self.schedule_reconnect(now);
        Some(self.state)
      }
    }
  }

  fn schedule_reconnect(&mut self, now: Instant) {
    if self.attempts < self.policy.max_attempts {
      self.attempts += 1;
      self.reconnect_at = Some(now + self.policy.delay);
      self.state = ConnectionState::Closed;
      tracing::info!(
        attempt = self.attempts,
        max = self.policy.max_attempts,
        "reconnect scheduled in {:?}",
        self.policy.delay
      );
    } else {
      self.reconnect_at = None;
      self.state = ConnectionState::Disconnected;
      tracing::warn!(attempts = self.attempts, "giving up on reconnecting");
    }
  }

  /// Fires a due reconnect. Returns true when a socket was dialed.
  pub fn poll(&mut self, now: Instant) -> bool {
    match self.reconnect_at {
      Some(at) if now >= at => {
        self.reconnect_at = None;
        self.connect();
        true
      }
      _ => false,
    }
  }
}

impl<D: Dialer> RequestSink for ConnectionManager<D> {
  fn send(&mut self, request: &ListingRequest) -> bool {
    ConnectionManager::send(self, request)
  }
}
