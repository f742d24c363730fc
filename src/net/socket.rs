use std::sync::mpsc::Sender;

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::event::Event;
use crate::net::connection::{Dialer, Outbound, SocketEvent, SocketSignal};

/// Runs each socket as a task on the runtime and reports its lifecycle back
/// into the event loop.
pub struct WsDialer {
  runtime: Handle,
  events: Sender<Event>,
}

impl WsDialer {
  pub fn new(runtime: Handle, events: Sender<Event>) -> Self {
    Self { runtime, events }
  }
}

impl Dialer for WsDialer {
  fn dial(&mut self, endpoint: &Url, generation: u64) -> Outbound {
    let (tx, rx) = unbounded_channel();
    self.runtime.spawn(run_socket(endpoint.clone(), generation, rx, self.events.clone()));
    tx
  }
}

fn post(events: &Sender<Event>, generation: u64, event: SocketEvent) -> bool {
  events.send(Event::Socket(SocketSignal { generation, event })).is_ok()
}

async fn run_socket(
  endpoint: Url,
  generation: u64,
  mut outbound: UnboundedReceiver<String>,
  events: Sender<Event>,
) {
  let (stream, _) = match connect_async(endpoint.as_str()).await {
    Ok(value) => value,
    Err(e) => {
      tracing::debug!(%endpoint, "connect failed: {e}");
      post(&events, generation, SocketEvent::Error(e.to_string()));
      post(&events, generation, SocketEvent::Closed);
      return;
    }
  };
  if !post(&events, generation, SocketEvent::Opened) {
    return;
  }

  let (mut write, mut read) = stream.split();
  loop {
    tokio::select! {
      frame = outbound.recv() => match frame {
        Some(text) => {
          if let Err(e) = write.send(Message::Text(text)).await {
            post(&events, generation, SocketEvent::Error(e.to_string()));
            break;
          }
        }
        // The manager dropped its sender: local disconnect.
        None => {
          let _ = write.send(Message::Close(None)).await;
          break;
        }
      },
      incoming = read.next() => match incoming {
        Some(Ok(Message::Text(text))) => {
          if !post(&events, generation, SocketEvent::Message(text)) {
            break;
          }
        }
        Some(Ok(Message::Close(_))) | None => break,
        Some(Ok(_)) => {}
        Some(Err(e)) => {
          post(&events, generation, SocketEvent::Error(e.to_string()));
          break;
        }
      },
    }
  }
  post(&events, generation, SocketEvent::Closed);
}
