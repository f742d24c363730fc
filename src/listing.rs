use crate::net::protocol::{Entry, ListingRequest, ServerMessage, SortOrder};

/// Where listing requests go. The connection manager in production.
pub trait RequestSink {
  fn send(&mut self, request: &ListingRequest) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingUpdate {
  Chunk { request_id: u64 },
  Completed { request_id: u64 },
  Failed(String),
  /// A response for a request that has since been superseded.
  Stale { request_id: u64 },
}

/// Turns streamed snapshots into folder and file collections for the
/// current path and sort order.
///
/// Every request carries a fresh id. Responses echo it, and anything that
/// is not for the latest request is discarded. A snapshot arrives as one or
/// more non-empty chunks followed by an empty completion message; the first
/// chunk replaces the held collections and later chunks append to them.
#[derive(Debug)]
pub struct Listing {
  next_request_id: u64,
  latest_request: Option<u64>,
  path: String,
  sort: SortOrder,
  folders: Vec<Entry>,
  files: Vec<Entry>,
  loading: bool,
  chunks_received: usize,
  complete: bool,
  empty: bool,
  error: Option<String>,
  updates: Vec<ListingUpdate>,
}

impl Default for Listing {
  fn default() -> Self {
    Self::new()
  }
}

impl Listing {
  pub fn new() -> Self {
    Self {
      next_request_id: 1,
      latest_request: None,
      path: String::new(),
      sort: SortOrder::default(),
      folders: Vec::new(),
      files: Vec::new(),
      loading: false,
      chunks_received: 0,
      complete: false,
      empty: false,
      error: None,
      updates: Vec::new(),
    }
  }

  pub fn request_path(&mut self, sink: &mut impl RequestSink, path: &str, sort: SortOrder) -> u64 {
    self.path = path.to_string();
    self.sort = sort;
    self.issue(sink)
  }

  pub fn request_sort(&mut self, sink: &mut impl RequestSink, sort: SortOrder) -> u64 {
    self.sort = sort;
    self.issue(sink)
  }

  /// Re-requests the tracked path and sort order.
  pub fn refresh(&mut self, sink: &mut impl RequestSink) -> u64 {
    self.issue(sink)
  }

  fn issue(&mut self, sink: &mut impl RequestSink) -> u64 {
    let request_id = self.next_request_id;
    self.next_request_id += 1;
    self.latest_request = Some(request_id);
    self.chunks_received = 0;
    self.complete = false;
    self.error = None;
    // A dropped request gets no response, so it must not leave the view loading.
    self.loading = sink.send(&ListingRequest {
      path: self.path.clone(),
      request_id,
      sort_by: self.sort.column,
      dir: self.sort.direction,
    });
    request_id
  }

  pub fn apply(&mut self, message: &ServerMessage) -> ListingUpdate {
    let update = match message {
      ServerMessage::Listing { request_id, items } => {
        let latest = self.latest_request.unwrap_or(0);
        let request_id = request_id.unwrap_or(latest);
        if self.latest_request.is_some() && request_id != latest {
          tracing::debug!(request_id, latest, "discarding stale listing");
          ListingUpdate::Stale { request_id }
        } else if items.is_empty() {
          self.loading = false;
          self.complete = true;
          self.empty = self.chunks_received == 0;
          ListingUpdate::Completed { request_id }
        } else {
          let (folders, files): (Vec<Entry>, Vec<Entry>) = items.iter().cloned().partition(Entry::is_folder);
          if self.chunks_received == 0 {
            self.folders = folders;
            self.files = files;
          } else {
            self.folders.extend(folders);
            self.files.extend(files);
          }
          self.chunks_received += 1;
          self.empty = false;
          self.loading = false;
          ListingUpdate::Chunk { request_id }
        }
      }
      ServerMessage::Error { .. } => {
        let error = message.error_message().unwrap_or_default();
        tracing::warn!(path = %self.path, "listing failed: {error}");
        self.loading = false;
        self.error = Some(error.clone());
        ListingUpdate::Failed(error)
      }
    };
    self.updates.push(update.clone());
    update
  }

  pub fn drain_updates(&mut self) -> Vec<ListingUpdate> {
    std::mem::take(&mut self.updates)
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn sort(&self) -> SortOrder {
    self.sort
  }

  pub fn folders(&self) -> &[Entry] {
    &self.folders
  }

  pub fn files(&self) -> &[Entry] {
    &self.files
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  /// The latest request completed without a single entry.
  pub fn is_empty_directory(&self) -> bool {
    self.empty
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Folders first, then files. Nothing when the directory is empty.
  pub fn entries(&self) -> Vec<&Entry> {
    if self.empty {
      return Vec::new();
    }
    self.folders.iter().chain(self.files.iter()).collect()
  }

  pub fn len(&self) -> usize {
    if self.empty { 0 } else { self.folders.len() + self.files.len() }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn entry(&self, index: usize) -> Option<&Entry> {
    if self.empty {
      return None;
    }
    if index < self.folders.len() {
      self.folders.get(index)
    } else {
      self.files.get(index - self.folders.len())
    }
  }

  pub fn contains_path(&self, path: &str) -> bool {
    !self.empty && self.folders.iter().chain(self.files.iter()).any(|e| e.path == path)
  }
}
