use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::action::Action;
use crate::commands::CommandReport;
use crate::config::{Config, normalize_key_event};
use crate::net::SocketSignal;

pub enum Event {
  Key(KeyEvent),
  Resize(u16, u16),
  Tick,
  Socket(SocketSignal),
  Command(CommandReport),
}

/// Merges terminal input, ticks and background completions into one stream.
pub struct EventLoop {
  tx: mpsc::Sender<Event>,
  rx: mpsc::Receiver<Event>,
}

impl EventLoop {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::channel();

    let input = tx.clone();
    thread::spawn(move || loop {
      if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
            if input.send(Event::Key(key)).is_err() {
              break;
            }
          }
          Ok(CrosstermEvent::Resize(w, h)) => {
            if input.send(Event::Resize(w, h)).is_err() {
              break;
            }
          }
          _ => {}
        }
      } else if input.send(Event::Tick).is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// For producers outside the input thread (sockets, commands).
  pub fn sender(&self) -> mpsc::Sender<Event> {
    self.tx.clone()
  }

  pub fn next(&self) -> Result<Event> {
    Ok(self.rx.recv()?)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  GPrefix,
  Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
  Rename,
  ConfirmDelete,
}

pub fn map_key(key: KeyEvent, mode: InputMode, config: &Config) -> Action {
  match mode {
    InputMode::Prompt => match key.code {
      KeyCode::Esc => Action::PromptCancel,
      KeyCode::Enter => Action::PromptConfirm,
      KeyCode::Backspace => Action::PromptBackspace,
      KeyCode::Char(c) => Action::PromptInput(c),
      _ => Action::None,
    },
    InputMode::GPrefix => {
      let kb = normalize_key_event(key);
      config.g_prefix_keys.get(&kb).cloned().unwrap_or(Action::None)
    }
    InputMode::Normal => {
      let kb = normalize_key_event(key);
      config.normal_keys.get(&kb).cloned().unwrap_or(Action::None)
    }
  }
}
