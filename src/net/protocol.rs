use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
  #[default]
  Name,
  Modified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
  pub column: SortColumn,
  pub direction: SortDirection,
}

impl SortOrder {
  pub fn new(column: SortColumn, direction: SortDirection) -> Self {
    Self { column, direction }
  }

  /// Re-clicking the active column inverts the direction, any other column
  /// starts ascending.
  pub fn toggled(self, column: SortColumn) -> Self {
    if self.column == column {
      Self { column, direction: self.direction.flipped() }
    } else {
      Self { column, direction: SortDirection::Asc }
    }
  }
}

/// Client-to-server listing request sent over the duplex channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
  pub path: String,
  pub request_id: u64,
  pub sort_by: SortColumn,
  pub dir: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
  Folder,
  File,
  Image,
  Document,
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
  pub name: String,
  pub path: String,
  pub kind: EntryKind,
  pub modified: Option<DateTime<FixedOffset>>,
  pub size: Option<u64>,
  pub size_stale: bool,
}

impl Entry {
  pub fn is_folder(&self) -> bool {
    self.kind == EntryKind::Folder
  }
}

// Older servers send `isDir` instead of `type` and `-1` for unknown sizes.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
  name: String,
  path: String,
  #[serde(rename = "type")]
  kind: Option<EntryKind>,
  #[serde(default)]
  is_dir: bool,
  modified: Option<String>,
  size: Option<i64>,
  #[serde(default)]
  size_stale: bool,
}

impl From<RawEntry> for Entry {
  fn from(raw: RawEntry) -> Self {
    let kind = raw.kind.unwrap_or(if raw.is_dir { EntryKind::Folder } else { EntryKind::File });
    Entry {
      name: raw.name,
      path: raw.path,
      kind,
      modified: raw.modified.and_then(|m| DateTime::parse_from_rfc3339(&m).ok()),
      size: raw.size.and_then(|s| u64::try_from(s).ok()),
      size_stale: raw.size_stale,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorTag {
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
  Listing {
    #[serde(rename = "requestId")]
    request_id: Option<u64>,
    items: Vec<Entry>,
  },
  Error {
    #[serde(rename = "type")]
    kind: ErrorTag,
    payload: Option<ErrorPayload>,
    error: Option<String>,
  },
}

impl ServerMessage {
  pub fn error_message(&self) -> Option<String> {
    match self {
      ServerMessage::Listing { .. } => None,
      ServerMessage::Error { payload, error, .. } => Some(
        payload
          .as_ref()
          .and_then(|p| p.error.clone())
          .or_else(|| error.clone())
          .unwrap_or_else(|| "Failed to load directory".to_string()),
      ),
    }
  }
}

pub fn parse_server_message(text: &str) -> serde_json::Result<ServerMessage> {
  serde_json::from_str(text)
}
