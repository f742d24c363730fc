use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use crate::action::Action;
use crate::commands::{Command, CommandDispatcher, CommandReport, ManageApi};
use crate::config::Config;
use crate::event::{InputMode, PromptKind};
use crate::listing::{Listing, ListingUpdate};
use crate::net::protocol::{Entry, ServerMessage, SortColumn};
use crate::net::subscribers::Subscription;
use crate::net::{ConnectionManager, ConnectionState, Dialer, SocketSignal};
use crate::state::{Clipboard, ClipboardOp, Notifications, Severity, Tabs};

pub struct App<D: Dialer, A: ManageApi> {
  pub connection: ConnectionManager<D>,
  pub listing: Rc<RefCell<Listing>>,
  listing_subscription: Option<Subscription<ServerMessage>>,
  pub tabs: Tabs,
  pub clipboard: Clipboard,
  pub notifications: Notifications,
  dispatcher: CommandDispatcher<A>,
  pub cursor: usize,
  pub scroll_offset: usize,
  pub viewport_height: usize,
  pub input_mode: InputMode,
  pub prompt_kind: Option<PromptKind>,
  pub prompt_input: String,
  pub prompt_targets: Vec<String>,
  pub should_quit: bool,
}

impl<D: Dialer, A: ManageApi> App<D, A> {
  pub fn new(connection: ConnectionManager<D>, dispatcher: CommandDispatcher<A>, config: &Config) -> Self {
    let listing = Rc::new(RefCell::new(Listing::new()));
    let sink = Rc::clone(&listing);
    let subscription = connection.subscribe(move |message| {
      sink.borrow_mut().apply(message);
    });
    Self {
      connection,
      listing,
      listing_subscription: Some(subscription),
      tabs: Tabs::new(&config.start_path),
      clipboard: Clipboard::default(),
      notifications: Notifications::new(config.notification_ttl()),
      dispatcher,
      cursor: 0,
      scroll_offset: 0,
      viewport_height: 20,
      input_mode: InputMode::Normal,
      prompt_kind: None,
      prompt_input: String::new(),
      prompt_targets: Vec::new(),
      should_quit: false,
    }
  }

  pub fn start(&mut self) {
    self.connection.connect();
  }

  pub fn shutdown(&mut self) {
    if let Some(subscription) = self.listing_subscription.take() {
      subscription.unsubscribe();
    }
    self.connection.disconnect();
  }

  pub fn update(&mut self, action: Action) -> Result<()> {
    if self.input_mode == InputMode::GPrefix && !matches!(action, Action::Tick | Action::Resize(..)) {
      self.input_mode = InputMode::Normal;
    }

    match action {
      Action::Quit => self.should_quit = true,
      Action::MoveDown => self.move_cursor(1),
      Action::MoveUp => self.move_cursor(-1),
      Action::PageDown => self.move_cursor(self.page_size() as i64),
      Action::PageUp => self.move_cursor(-(self.page_size() as i64)),
      Action::GoToTop => {
        self.cursor = 0;
        self.scroll_offset = 0;
      }
      Action::GoToBottom => {
        let len = self.listing.borrow().len();
        if len > 0 {
          self.cursor = len - 1;
          self.adjust_scroll();
        }
      }
      Action::GPress => self.input_mode = InputMode::GPrefix,
      Action::Open => self.open_highlighted(),
      Action::Back => {
        if self.tabs.back().is_some() {
          self.enter_view();
        }
      }
      Action::ToggleSelect => {
        if let Some(entry) = self.highlighted() {
          self.tabs.toggle_selected(&entry.path);
          self.move_cursor(1);
        }
      }
      Action::ClearSelection => self.tabs.clear_selection(),
      Action::Copy => self.stage(ClipboardOp::Copy),
      Action::Cut => self.stage(ClipboardOp::Cut),
      Action::Paste => self.paste(),
      Action::RenameStart => {
        if let Some(entry) = self.highlighted() {
          self.prompt_input = entry.name.clone();
          self.prompt_targets = vec![entry.path];
          self.prompt_kind = Some(PromptKind::Rename);
          self.input_mode = InputMode::Prompt;
        }
      }
      Action::Delete => {
        let targets = self.targets();
        if !targets.is_empty() {
          self.prompt_targets = targets;
          self.prompt_input.clear();
          self.prompt_kind = Some(PromptKind::ConfirmDelete);
          self.input_mode = InputMode::Prompt;
        }
      }
      Action::Download => self.download_highlighted(),
      Action::SortByName => self.sort_by(SortColumn::Name),
      Action::SortByModified => self.sort_by(SortColumn::Modified),
      Action::NewTab => {
        let path = self.tabs.active().path.clone();
        self.tabs.open(&path);
        self.enter_view();
      }
      Action::CloseTab => {
        if self.tabs.close().is_some() {
          self.enter_view();
        } else {
          self.notify("Cannot close the last tab", Severity::Info);
        }
      }
      Action::NextTab => {
        self.tabs.next();
        self.enter_view();
      }
      Action::PrevTab => {
        self.tabs.previous();
        self.enter_view();
      }
      Action::Refresh => {
        self.listing.borrow_mut().refresh(&mut self.connection);
      }
      Action::Reconnect => {
        if self.connection.state() == ConnectionState::Open {
          self.notify("Already connected", Severity::Info);
        } else {
          self.connection.reconnect();
        }
      }
      Action::DismissNotification => {
        self.notifications.dismiss_latest();
      }
      Action::PromptInput(c) => match self.prompt_kind {
        Some(PromptKind::ConfirmDelete) => {
          if c == 'y' || c == 'Y' {
            self.execute_delete();
          } else {
            self.cancel_prompt();
            self.notify("Delete cancelled", Severity::Info);
          }
        }
        Some(PromptKind::Rename) => self.prompt_input.push(c),
        None => {}
      },
      Action::PromptBackspace => {
        if self.prompt_kind == Some(PromptKind::Rename) {
          self.prompt_input.pop();
        }
      }
      Action::PromptConfirm => match self.prompt_kind {
        Some(PromptKind::Rename) => self.execute_rename(),
        Some(PromptKind::ConfirmDelete) => {
          self.cancel_prompt();
          self.notify("Delete cancelled", Severity::Info);
        }
        None => {}
      },
      Action::PromptCancel => self.cancel_prompt(),
      Action::Resize(_, h) => {
        // tab bar, header, status bar and the list borders
        self.viewport_height = h.saturating_sub(5) as usize;
        self.adjust_scroll();
      }
      Action::Tick => self.tick(Instant::now()),
      Action::None => {}
    }
    Ok(())
  }

  pub fn tick(&mut self, now: Instant) {
    if self.connection.poll(now) {
      tracing::debug!(attempt = self.connection.attempts(), "reconnecting");
    }
    self.notifications.expire(now);
  }

  pub fn handle_socket(&mut self, signal: SocketSignal, now: Instant) {
    if let Some(state) = self.connection.handle(signal, now) {
      match state {
        ConnectionState::Open => self.load_active(),
        ConnectionState::Disconnected => {
          self.notifications.push(
            "Connection lost, live updates stopped. Press R to reconnect",
            Severity::Error,
            now,
          );
        }
        _ => {}
      }
    }
    self.apply_listing_updates(now);
  }

  fn apply_listing_updates(&mut self, now: Instant) {
    let updates = self.listing.borrow_mut().drain_updates();
    for update in updates {
      match update {
        ListingUpdate::Chunk { .. } => self.clamp_cursor(),
        ListingUpdate::Completed { .. } => {
          {
            let listing = self.listing.borrow();
            if listing.path() == self.tabs.active().path {
              self.tabs.retain_selection(|path| listing.contains_path(path));
            }
          }
          self.clamp_cursor();
        }
        ListingUpdate::Failed(error) => {
          self.notifications.push(error, Severity::Error, now);
        }
        ListingUpdate::Stale { .. } => {}
      }
    }
  }

  pub fn handle_command_report(&mut self, report: CommandReport) {
    let CommandReport { tab, command, outcome } = report;
    if let Err(error) = outcome {
      self.notify(error, Severity::Error);
      return;
    }

    self.listing.borrow_mut().refresh(&mut self.connection);
    let message = match &command {
      Command::Rename { new_name, .. } => format!("Renamed to \"{new_name}\""),
      Command::Delete { .. } => {
        self.tabs.clear_selection_of(tab);
        "Deleted successfully".to_string()
      }
      Command::Copy { .. } => "Files copied successfully".to_string(),
      Command::Move { sources, .. } => {
        self.clipboard.complete_paste(ClipboardOp::Cut, sources);
        "Files moved successfully".to_string()
      }
    };
    self.notify(message, Severity::Success);
  }

  fn notify(&mut self, message: impl Into<String>, severity: Severity) {
    self.notifications.push(message, severity, Instant::now());
  }

  /// Requests the active tab's path and sort order.
  fn load_active(&mut self) {
    let tab = self.tabs.active();
    let (path, sort) = (tab.path.clone(), tab.sort);
    self.listing.borrow_mut().request_path(&mut self.connection, &path, sort);
  }

  fn enter_view(&mut self) {
    self.cursor = 0;
    self.scroll_offset = 0;
    self.load_active();
  }

  fn sort_by(&mut self, column: SortColumn) {
    let sort = self.tabs.sort_by(column).sort;
    self.listing.borrow_mut().request_sort(&mut self.connection, sort);
  }

  pub fn highlighted(&self) -> Option<Entry> {
    self.listing.borrow().entry(self.cursor).cloned()
  }

  /// The selection when there is one, otherwise the highlighted entry.
  fn targets(&self) -> Vec<String> {
    let selected = &self.tabs.active().selected;
    if !selected.is_empty() {
      return selected.iter().cloned().collect();
    }
    self.highlighted().map(|e| vec![e.path]).unwrap_or_default()
  }

  fn open_highlighted(&mut self) {
    let Some(entry) = self.highlighted() else {
      return;
    };
    if entry.is_folder() {
      self.tabs.navigate(&entry.path);
      self.enter_view();
    } else {
      self.download(&entry);
    }
  }

  fn download_highlighted(&mut self) {
    if let Some(entry) = self.highlighted() {
      self.download(&entry);
    }
  }

  fn download(&mut self, entry: &Entry) {
    match self.dispatcher.download(&entry.path, entry.is_folder()) {
      Ok(_) => self.notify(format!("Downloading {}", entry.name), Severity::Info),
      Err(e) => self.notify(format!("Download failed: {e}"), Severity::Error),
    }
  }

  fn stage(&mut self, op: ClipboardOp) {
    let targets = self.targets();
    if targets.is_empty() {
      self.notify("Nothing selected", Severity::Info);
      return;
    }
    let count = targets.len();
    match op {
      ClipboardOp::Copy => {
        self.clipboard.copy(targets);
        self.notify(format!("{count} item(s) copied"), Severity::Info);
      }
      ClipboardOp::Cut => {
        self.clipboard.cut(targets);
        self.notify(format!("{count} item(s) cut"), Severity::Warning);
      }
    }
  }

  fn paste(&mut self) {
    let Some(op) = self.clipboard.op else {
      self.notify("Clipboard is empty", Severity::Info);
      return;
    };
    let sources = self.clipboard.paths.clone();
    let destination = self.tabs.active().path.clone();
    let command = match op {
      ClipboardOp::Copy => Command::Copy { sources, destination },
      ClipboardOp::Cut => Command::Move { sources, destination },
    };
    self.dispatcher.dispatch(self.tabs.active().id, command);
  }

  fn execute_rename(&mut self) {
    let new_name = self.prompt_input.trim().to_string();
    let Some(path) = self.prompt_targets.first().cloned() else {
      self.cancel_prompt();
      return;
    };
    self.cancel_prompt();

    if new_name.is_empty() {
      self.notify("Name cannot be empty", Severity::Warning);
      return;
    }
    let current = path.rsplit(['/', '\\']).next().unwrap_or(&path);
    if new_name == current {
      return;
    }
    self.dispatcher.dispatch(self.tabs.active().id, Command::Rename { path, new_name });
  }

  fn execute_delete(&mut self) {
    let paths = std::mem::take(&mut self.prompt_targets);
    self.cancel_prompt();
    if !paths.is_empty() {
      self.dispatcher.dispatch(self.tabs.active().id, Command::Delete { paths });
    }
  }

  fn cancel_prompt(&mut self) {
    self.input_mode = InputMode::Normal;
    self.prompt_kind = None;
    self.prompt_input.clear();
    self.prompt_targets.clear();
  }

  fn page_size(&self) -> usize {
    self.viewport_height.max(1)
  }

  fn move_cursor(&mut self, delta: i64) {
    let len = self.listing.borrow().len();
    if len == 0 {
      return;
    }
    if delta > 0 {
      self.cursor = (self.cursor + delta as usize).min(len - 1);
    } else {
      self.cursor = self.cursor.saturating_sub(delta.unsigned_abs() as usize);
    }
    self.adjust_scroll();
  }

  fn clamp_cursor(&mut self) {
    let len = self.listing.borrow().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
    self.adjust_scroll();
  }

  fn adjust_scroll(&mut self) {
    let visible = self.viewport_height;
    if visible == 0 {
      return;
    }
    if self.cursor < self.scroll_offset {
      self.scroll_offset = self.cursor;
    } else if self.cursor >= self.scroll_offset + visible {
      self.scroll_offset = self.cursor - visible + 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::commands::{ApiResponse, ApiStatus};
  use crate::event::Event;
  use crate::net::connection::SocketEvent;
  use crate::testing::{FakeApi, Harness, Reply, harness};

  const LISTING: &str = r#"{"requestId": 1, "items": [
    {"name": "docs", "path": "/docs", "type": "folder"},
    {"name": "a.txt", "path": "/a.txt", "type": "file"},
    {"name": "b.png", "path": "/b.png", "type": "image"}
  ]}"#;

  fn signal(h: &mut Harness, event: SocketEvent) {
    let generation = h.app.connection.generation();
    h.app.handle_socket(SocketSignal { generation, event }, Instant::now());
  }

  fn connected(api: FakeApi) -> Harness {
    let mut h = harness(api);
    h.app.start();
    signal(&mut h, SocketEvent::Opened);
    h
  }

  fn loaded(api: FakeApi) -> Harness {
    let mut h = connected(api);
    signal(&mut h, SocketEvent::Message(LISTING.to_string()));
    signal(&mut h, SocketEvent::Message(r#"{"requestId": 1, "items": []}"#.to_string()));
    h
  }

  fn requests(h: &Harness) -> Vec<serde_json::Value> {
    h.app
      .connection
      .dialer()
      .sent()
      .iter()
      .map(|frame| serde_json::from_str(frame).unwrap())
      .collect()
  }

  fn deliver_report(h: &mut Harness) {
    match h.events.recv_timeout(Duration::from_secs(5)).unwrap() {
      Event::Command(report) => h.app.handle_command_report(report),
      _ => panic!("expected a command report"),
    }
  }

  fn messages(h: &Harness) -> Vec<(String, Severity)> {
    h.app.notifications.iter().map(|n| (n.message.clone(), n.severity)).collect()
  }

  #[test]
  fn test_open_connection_requests_active_tab() {
    let h = connected(FakeApi::default());
    let sent = requests(&h);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], serde_json::json!({"path": "", "requestId": 1, "sortBy": "name", "dir": "asc"}));
    assert!(h.app.listing.borrow().is_loading());
  }

  #[test]
  fn test_listing_fills_folders_then_files() {
    let h = loaded(FakeApi::default());
    let listing = h.app.listing.borrow();
    let names: Vec<&str> = listing.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "a.txt", "b.png"]);
    assert!(!listing.is_loading());
  }

  #[test]
  fn test_open_folder_navigates_and_resets_selection() {
    let mut h = loaded(FakeApi::default());
    requests(&h);
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    assert!(h.app.tabs.active().is_selected("/a.txt"));

    h.app.update(Action::GoToTop).unwrap();
    h.app.update(Action::Open).unwrap();
    assert_eq!(h.app.tabs.active().path, "/docs");
    assert!(h.app.tabs.active().selected.is_empty());
    assert_eq!(h.app.cursor, 0);
    let sent = requests(&h);
    assert_eq!(sent[0]["path"], "/docs");
    assert_eq!(sent[0]["requestId"], 2);

    h.app.update(Action::Back).unwrap();
    assert_eq!(h.app.tabs.active().path, "");
  }

  #[test]
  fn test_sort_toggle_sends_requests() {
    let mut h = loaded(FakeApi::default());
    requests(&h);
    h.app.update(Action::SortByModified).unwrap();
    h.app.update(Action::SortByModified).unwrap();
    let sent = requests(&h);
    assert_eq!(sent[0]["sortBy"], "modified");
    assert_eq!(sent[0]["dir"], "asc");
    assert_eq!(sent[1]["dir"], "desc");
    assert!(h.app.listing.borrow().is_loading());
  }

  #[test]
  fn test_copy_and_cut_notifications() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::Copy).unwrap();
    assert_eq!(h.app.clipboard.op, Some(ClipboardOp::Copy));
    assert_eq!(h.app.clipboard.paths.len(), 2);
    h.app.update(Action::Cut).unwrap();
    assert_eq!(
      messages(&h),
      vec![
        ("2 item(s) copied".to_string(), Severity::Info),
        ("2 item(s) cut".to_string(), Severity::Warning),
      ]
    );
  }

  #[test]
  fn test_cut_then_paste_clears_clipboard() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::Cut).unwrap();
    h.app.update(Action::Paste).unwrap();
    requests(&h);
    deliver_report(&mut h);

    assert!(h.app.clipboard.is_empty());
    assert!(h.app.clipboard.paths.is_empty());
    assert!(messages(&h).contains(&("Files moved successfully".to_string(), Severity::Success)));
    let sent = requests(&h);
    assert_eq!(sent.len(), 1, "success re-requests the listing");
    assert_eq!(sent[0]["path"], "");
  }

  #[test]
  fn test_copy_then_paste_keeps_clipboard() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::Copy).unwrap();
    h.app.update(Action::Paste).unwrap();
    deliver_report(&mut h);
    assert_eq!(h.app.clipboard.op, Some(ClipboardOp::Copy));
    assert_eq!(h.app.clipboard.paths, vec!["/a.txt".to_string()]);
    assert!(messages(&h).contains(&("Files copied successfully".to_string(), Severity::Success)));
  }

  #[test]
  fn test_paste_with_empty_clipboard() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::Paste).unwrap();
    assert_eq!(messages(&h), vec![("Clipboard is empty".to_string(), Severity::Info)]);
  }

  #[test]
  fn test_delete_confirm_flow() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::Delete).unwrap();
    assert_eq!(h.app.input_mode, InputMode::Prompt);
    assert_eq!(h.app.prompt_targets.len(), 2);

    h.app.update(Action::PromptInput('y')).unwrap();
    assert_eq!(h.app.input_mode, InputMode::Normal);
    deliver_report(&mut h);
    assert!(h.app.tabs.active().selected.is_empty());
    assert!(messages(&h).contains(&("Deleted successfully".to_string(), Severity::Success)));
  }

  #[test]
  fn test_delete_report_clears_issuing_tab_only() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::Delete).unwrap();
    h.app.update(Action::PromptInput('y')).unwrap();

    h.app.update(Action::NewTab).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    assert!(h.app.tabs.active().is_selected("/docs"));

    deliver_report(&mut h);
    let selections: Vec<(u64, Vec<String>)> =
      h.app.tabs.iter().map(|t| (t.id, t.selected.clone())).collect();
    assert_eq!(selections, vec![(1, Vec::<String>::new()), (2, vec!["/docs".to_string()])]);
  }

  #[test]
  fn test_copy_stages_in_pick_order() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::GoToBottom).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::GoToTop).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::Copy).unwrap();
    assert_eq!(h.app.clipboard.paths, vec!["/b.png".to_string(), "/docs".to_string()]);
  }

  #[test]
  fn test_delete_cancelled() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::Delete).unwrap();
    h.app.update(Action::PromptInput('n')).unwrap();
    assert_eq!(h.app.input_mode, InputMode::Normal);
    assert_eq!(messages(&h), vec![("Delete cancelled".to_string(), Severity::Info)]);
    assert!(h.events.recv_timeout(Duration::from_millis(100)).is_err());
  }

  #[test]
  fn test_rename_flow() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::RenameStart).unwrap();
    assert_eq!(h.app.prompt_input, "a.txt");
    for _ in 0..3 {
      h.app.update(Action::PromptBackspace).unwrap();
    }
    for c in "md".chars() {
      h.app.update(Action::PromptInput(c)).unwrap();
    }
    h.app.update(Action::PromptConfirm).unwrap();
    deliver_report(&mut h);
    assert!(messages(&h).contains(&("Renamed to \"a.md\"".to_string(), Severity::Success)));
  }

  #[test]
  fn test_rename_unchanged_or_empty_makes_no_call() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::RenameStart).unwrap();
    h.app.update(Action::PromptConfirm).unwrap();
    assert_eq!(h.app.input_mode, InputMode::Normal);

    h.app.update(Action::RenameStart).unwrap();
    h.app.prompt_input = "   ".to_string();
    h.app.update(Action::PromptConfirm).unwrap();
    assert_eq!(messages(&h), vec![("Name cannot be empty".to_string(), Severity::Warning)]);
    assert!(h.events.recv_timeout(Duration::from_millis(100)).is_err());
  }

  #[test]
  fn test_command_failure_notifies_once() {
    let api = FakeApi::replying(Reply::Status(ApiResponse {
      status: ApiStatus::Error,
      error: Some("File operations are disabled".to_string()),
    }));
    let mut h = loaded(api);
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::Cut).unwrap();
    h.app.update(Action::Paste).unwrap();
    requests(&h);
    deliver_report(&mut h);
    assert!(h.app.clipboard.is_cut("/a.txt"));
    let errors: Vec<_> = messages(&h).into_iter().filter(|(_, s)| *s == Severity::Error).collect();
    assert_eq!(errors, vec![("File operations are disabled".to_string(), Severity::Error)]);
    assert!(requests(&h).is_empty(), "failures do not refresh");
  }

  #[test]
  fn test_listing_error_is_notified() {
    let mut h = connected(FakeApi::default());
    signal(&mut h, SocketEvent::Message(r#"{"type": "error", "payload": {"error": "no such directory"}}"#.to_string()));
    assert!(!h.app.listing.borrow().is_loading());
    assert_eq!(messages(&h), vec![("no such directory".to_string(), Severity::Error)]);
  }

  #[test]
  fn test_completion_prunes_selection() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::MoveDown).unwrap();
    h.app.update(Action::ToggleSelect).unwrap();
    h.app.update(Action::Refresh).unwrap();
    signal(
      &mut h,
      SocketEvent::Message(r#"{"requestId": 2, "items": [{"name": "docs", "path": "/docs", "type": "folder"}]}"#.to_string()),
    );
    assert!(h.app.tabs.active().is_selected("/a.txt"));
    signal(&mut h, SocketEvent::Message(r#"{"requestId": 2, "items": []}"#.to_string()));
    assert!(h.app.tabs.active().selected.is_empty());
    assert_eq!(h.app.cursor, 0);
  }

  #[test]
  fn test_giving_up_is_surfaced() {
    let mut h = connected(FakeApi::default());
    let mut now = Instant::now();
    for _ in 0..6 {
      let generation = h.app.connection.generation();
      h.app.handle_socket(SocketSignal { generation, event: SocketEvent::Closed }, now);
      now += Duration::from_secs(1);
      h.app.tick(now);
    }
    assert_eq!(h.app.connection.state(), ConnectionState::Disconnected);
    assert_eq!(messages(&h).len(), 1);
    assert_eq!(messages(&h)[0].1, Severity::Error);

    h.app.update(Action::Reconnect).unwrap();
    assert_eq!(h.app.connection.state(), ConnectionState::Connecting);
  }

  #[test]
  fn test_tabs_keep_their_own_paths() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::Open).unwrap();
    h.app.update(Action::NewTab).unwrap();
    assert_eq!(h.app.tabs.active().path, "/docs");
    h.app.update(Action::Back).unwrap();
    assert_eq!(h.app.tabs.active().path, "/docs", "history is per tab");
    h.app.update(Action::CloseTab).unwrap();
    h.app.update(Action::CloseTab).unwrap();
    assert_eq!(h.app.tabs.len(), 1);
    assert_eq!(messages(&h), vec![("Cannot close the last tab".to_string(), Severity::Info)]);
  }

  #[test]
  fn test_download_folder() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::Download).unwrap();
    assert_eq!(messages(&h), vec![("Downloading docs".to_string(), Severity::Info)]);
  }

  #[test]
  fn test_shutdown_unsubscribes() {
    let mut h = connected(FakeApi::default());
    h.app.shutdown();
    assert_eq!(h.app.connection.state(), ConnectionState::Closed);
    assert!(h.app.listing_subscription.is_none());
  }

  #[test]
  fn test_tick_expires_notifications() {
    let mut h = loaded(FakeApi::default());
    h.app.update(Action::Paste).unwrap();
    h.app.tick(Instant::now() + Duration::from_secs(6));
    assert!(h.app.notifications.is_empty());
  }
}
