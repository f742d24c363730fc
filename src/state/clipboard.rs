#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
  Cut,
  Copy,
}

/// At most one pending batch. Staging replaces, never merges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
  pub paths: Vec<String>,
  pub op: Option<ClipboardOp>,
}

impl Clipboard {
  pub fn copy(&mut self, paths: Vec<String>) {
    self.stage(paths, ClipboardOp::Copy);
  }

  pub fn cut(&mut self, paths: Vec<String>) {
    self.stage(paths, ClipboardOp::Cut);
  }

  fn stage(&mut self, paths: Vec<String>, op: ClipboardOp) {
    if paths.is_empty() {
      self.clear();
      return;
    }
    self.paths = paths;
    self.op = Some(op);
  }

  pub fn clear(&mut self) {
    self.paths.clear();
    self.op = None;
  }

  pub fn is_empty(&self) -> bool {
    self.op.is_none()
  }

  /// A successful move of `moved` empties a cut that staged exactly those
  /// paths. Copies stay pasteable.
  pub fn complete_paste(&mut self, op: ClipboardOp, moved: &[String]) {
    if op == ClipboardOp::Cut && self.op == Some(ClipboardOp::Cut) && self.paths == moved {
      self.clear();
    }
  }

  pub fn is_cut(&self, path: &str) -> bool {
    self.op == Some(ClipboardOp::Cut) && self.paths.iter().any(|p| p == path)
  }
}
