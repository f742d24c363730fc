use crate::net::protocol::{SortColumn, SortOrder};

/// One browsing context: a path, its sort order, the selection made in it and
/// the paths visited before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
  pub id: u64,
  pub label: String,
  pub path: String,
  pub sort: SortOrder,
  /// Selected paths in the order they were picked.
  pub selected: Vec<String>,
  pub history: Vec<String>,
}

impl ViewContext {
  fn new(id: u64, path: &str) -> Self {
    Self {
      id,
      label: format!("Tab {id}"),
      path: path.to_string(),
      sort: SortOrder::default(),
      selected: Vec::new(),
      history: Vec::new(),
    }
  }

  pub fn is_selected(&self, path: &str) -> bool {
    self.selected.iter().any(|p| p == path)
  }
}

/// Owns every view context. All mutation goes through these methods.
#[derive(Debug)]
pub struct Tabs {
  tabs: Vec<ViewContext>,
  active: usize,
  next_id: u64,
}

impl Tabs {
  pub fn new(path: &str) -> Self {
    Self { tabs: vec![ViewContext::new(1, path)], active: 0, next_id: 2 }
  }

  pub fn active(&self) -> &ViewContext {
    &self.tabs[self.active]
  }

  fn active_mut(&mut self) -> &mut ViewContext {
    &mut self.tabs[self.active]
  }

  pub fn active_index(&self) -> usize {
    self.active
  }

  pub fn iter(&self) -> impl Iterator<Item = &ViewContext> {
    self.tabs.iter()
  }

  pub fn len(&self) -> usize {
    self.tabs.len()
  }

  /// Opens a tab on `path` and makes it active.
  pub fn open(&mut self, path: &str) -> &ViewContext {
    let tab = ViewContext::new(self.next_id, path);
    self.next_id += 1;
    self.tabs.push(tab);
    self.active = self.tabs.len() - 1;
    self.active()
  }

  /// Closes the active tab. The last remaining tab cannot be closed.
  pub fn close(&mut self) -> Option<ViewContext> {
    if self.tabs.len() <= 1 {
      return None;
    }
    let closed = self.tabs.remove(self.active);
    if self.active >= self.tabs.len() {
      self.active = self.tabs.len() - 1;
    }
    Some(closed)
  }

  pub fn activate(&mut self, index: usize) -> Option<&ViewContext> {
    if index >= self.tabs.len() {
      return None;
    }
    self.active = index;
    Some(self.active())
  }

  pub fn next(&mut self) -> &ViewContext {
    self.active = (self.active + 1) % self.tabs.len();
    self.active()
  }

  pub fn previous(&mut self) -> &ViewContext {
    self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    self.active()
  }

  /// Moves the active tab to `path`, remembering the current one. Selection
  /// never survives navigation.
  pub fn navigate(&mut self, path: &str) -> &ViewContext {
    let tab = self.active_mut();
    let previous = std::mem::replace(&mut tab.path, path.to_string());
    tab.history.push(previous);
    tab.selected.clear();
    self.active()
  }

  pub fn back(&mut self) -> Option<&ViewContext> {
    let tab = self.active_mut();
    let previous = tab.history.pop()?;
    tab.path = previous;
    tab.selected.clear();
    Some(self.active())
  }

  pub fn sort_by(&mut self, column: SortColumn) -> &ViewContext {
    let tab = self.active_mut();
    tab.sort = tab.sort.toggled(column);
    self.active()
  }

  /// Returns whether `path` is selected afterwards.
  pub fn toggle_selected(&mut self, path: &str) -> bool {
    let selected = &mut self.active_mut().selected;
    match selected.iter().position(|p| p == path) {
      Some(i) => {
        selected.remove(i);
        false
      }
      None => {
        selected.push(path.to_string());
        true
      }
    }
  }

  pub fn clear_selection(&mut self) {
    self.active_mut().selected.clear();
  }

  /// Clears the selection of the tab with `id`, if it is still open.
  pub fn clear_selection_of(&mut self, id: u64) -> bool {
    match self.tabs.iter_mut().find(|t| t.id == id) {
      Some(tab) => {
        tab.selected.clear();
        true
      }
      None => false,
    }
  }

  pub fn retain_selection(&mut self, keep: impl Fn(&str) -> bool) {
    self.active_mut().selected.retain(|p| keep(p.as_str()));
  }
}
