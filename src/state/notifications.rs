use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Success,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub id: u64,
  pub message: String,
  pub severity: Severity,
  pub created_at: Instant,
  pub expires_at: Instant,
}

/// Transient messages, each expiring on its own after `ttl`.
#[derive(Debug)]
pub struct Notifications {
  entries: Vec<Notification>,
  next_id: u64,
  ttl: Duration,
}

impl Default for Notifications {
  fn default() -> Self {
    Self::new(Duration::from_millis(5000))
  }
}

impl Notifications {
  pub fn new(ttl: Duration) -> Self {
    Self { entries: Vec::new(), next_id: 1, ttl }
  }

  pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    let message = message.into();
    tracing::debug!(id, ?severity, "notify: {message}");
    self.entries.push(Notification {
      id,
      message,
      severity,
      created_at: now,
      expires_at: now + self.ttl,
    });
    id
  }

  pub fn remove(&mut self, id: u64) -> bool {
    let before = self.entries.len();
    self.entries.retain(|n| n.id != id);
    self.entries.len() != before
  }

  pub fn dismiss_latest(&mut self) -> bool {
    self.entries.pop().is_some()
  }

  /// Drops everything due at `now`. Returns how many were removed.
  pub fn expire(&mut self, now: Instant) -> usize {
    let before = self.entries.len();
    self.entries.retain(|n| n.expires_at > now);
    before - self.entries.len()
  }

  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_each_entry_expires_independently() {
    let start = Instant::now();
    let mut n = Notifications::default();
    n.push("first", Severity::Info, start);
    n.push("second", Severity::Error, start + Duration::from_secs(2));

    assert_eq!(n.expire(start + Duration::from_millis(4999)), 0);
    assert_eq!(n.expire(start + Duration::from_secs(5)), 1);
    let left: Vec<&str> = n.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(left, vec!["second"]);
    assert_eq!(n.expire(start + Duration::from_secs(7)), 1);
    assert!(n.is_empty());
  }

  #[test]
  fn test_remove_by_id() {
    let now = Instant::now();
    let mut n = Notifications::new(Duration::from_secs(1));
    let a = n.push("a", Severity::Success, now);
    let b = n.push("b", Severity::Warning, now);
    assert_ne!(a, b);
    assert!(n.remove(a));
    assert!(!n.remove(a));
    assert_eq!(n.len(), 1);
    assert!(n.dismiss_latest());
    assert!(!n.dismiss_latest());
  }
}
