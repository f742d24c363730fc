use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::action::Action;
use crate::net::ReconnectPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: KeyCode,
  pub modifiers: KeyModifiers,
}

impl KeyBinding {
  pub fn display_key(&self) -> String {
    let key_name = match self.code {
      KeyCode::Char(' ') => "Space".to_string(),
      KeyCode::Char(c) => c.to_string(),
      KeyCode::Enter => "Enter".to_string(),
      KeyCode::Esc => "Esc".to_string(),
      KeyCode::Backspace => "Backspace".to_string(),
      KeyCode::Delete => "Delete".to_string(),
      KeyCode::Tab => "Tab".to_string(),
      KeyCode::BackTab => "BackTab".to_string(),
      KeyCode::PageUp => "PageUp".to_string(),
      KeyCode::PageDown => "PageDown".to_string(),
      KeyCode::Up => "Up".to_string(),
      KeyCode::Down => "Down".to_string(),
      KeyCode::Left => "Left".to_string(),
      KeyCode::Right => "Right".to_string(),
      KeyCode::F(n) => format!("F{n}"),
      _ => format!("{:?}", self.code),
    };

    if self.modifiers.contains(KeyModifiers::CONTROL) {
      format!("Ctrl+{key_name}")
    } else if self.modifiers.contains(KeyModifiers::ALT) {
      format!("Alt+{key_name}")
    } else {
      key_name
    }
  }
}

pub struct Config {
  pub server: String,
  pub start_path: String,
  pub tick_rate_ms: u64,
  pub request_timeout_ms: u64,
  pub reconnect_delay_ms: u64,
  pub max_reconnect_attempts: u32,
  pub notification_ttl_ms: u64,
  pub normal_keys: HashMap<KeyBinding, Action>,
  pub g_prefix_keys: HashMap<KeyBinding, Action>,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  connection: Option<ConnectionConfig>,
  notifications: Option<NotificationsConfig>,
  keys: Option<KeysConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  server: Option<String>,
  start_path: Option<String>,
  tick_rate_ms: Option<u64>,
  request_timeout_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct ConnectionConfig {
  reconnect_delay_ms: Option<u64>,
  max_reconnect_attempts: Option<u32>,
}

#[derive(Deserialize, Default)]
struct NotificationsConfig {
  ttl_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct KeysConfig {
  normal: Option<HashMap<String, String>>,
  g_prefix: Option<HashMap<String, String>>,
}

pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
  if s.is_empty() {
    return None;
  }

  let parts: Vec<&str> = s.split('+').collect();

  if parts.len() == 1 {
    let key = parts[0];
    if let Some(code) = named_key(key) {
      return Some(KeyBinding { code, modifiers: KeyModifiers::NONE });
    }
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
      return Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE });
    }
    return None;
  }

  if parts.len() == 2 {
    let modifier_str = parts[0].to_lowercase();
    let key_str = parts[1];

    let modifiers = match modifier_str.as_str() {
      "ctrl" => KeyModifiers::CONTROL,
      "shift" => {
        let chars: Vec<char> = key_str.chars().collect();
        if chars.len() == 1 {
          let c = chars[0].to_uppercase().next().unwrap_or(chars[0]);
          return Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE });
        }
        if key_str.eq_ignore_ascii_case("tab") {
          return Some(KeyBinding { code: KeyCode::BackTab, modifiers: KeyModifiers::NONE });
        }
        if let Some(code) = named_key(key_str) {
          return Some(KeyBinding { code, modifiers: KeyModifiers::SHIFT });
        }
        return None;
      }
      "alt" => KeyModifiers::ALT,
      _ => return None,
    };

    if let Some(code) = named_key(key_str) {
      return Some(KeyBinding { code, modifiers });
    }
    let chars: Vec<char> = key_str.chars().collect();
    if chars.len() == 1 {
      return Some(KeyBinding { code: KeyCode::Char(chars[0]), modifiers });
    }
    return None;
  }

  None
}

fn named_key(s: &str) -> Option<KeyCode> {
  match s.to_lowercase().as_str() {
    "enter" => Some(KeyCode::Enter),
    "space" => Some(KeyCode::Char(' ')),
    "esc" => Some(KeyCode::Esc),
    "up" => Some(KeyCode::Up),
    "down" => Some(KeyCode::Down),
    "left" => Some(KeyCode::Left),
    "right" => Some(KeyCode::Right),
    "backspace" => Some(KeyCode::Backspace),
    "delete" => Some(KeyCode::Delete),
    "tab" => Some(KeyCode::Tab),
    "backtab" => Some(KeyCode::BackTab),
    "pageup" => Some(KeyCode::PageUp),
    "pagedown" => Some(KeyCode::PageDown),
    s if s.starts_with('f') && s.len() > 1 => {
      s[1..].parse::<u8>().ok().filter(|&n| (1..=24).contains(&n)).map(KeyCode::F)
    }
    _ => None,
  }
}

/// Shift is implied by uppercase characters and by BackTab.
pub fn normalize_key_event(key: KeyEvent) -> KeyBinding {
  let mut modifiers = key.modifiers;
  match key.code {
    KeyCode::Char(c) if c.is_uppercase() => modifiers -= KeyModifiers::SHIFT,
    KeyCode::BackTab => modifiers -= KeyModifiers::SHIFT,
    _ => {}
  }
  KeyBinding { code: key.code, modifiers }
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      server: "http://localhost:3000".to_string(),
      start_path: String::new(),
      tick_rate_ms: 100,
      request_timeout_ms: 30_000,
      reconnect_delay_ms: 1000,
      max_reconnect_attempts: 5,
      notification_ttl_ms: 5000,
      normal_keys: HashMap::new(),
      g_prefix_keys: HashMap::new(),
    }
  }

  pub fn reconnect_policy(&self) -> ReconnectPolicy {
    ReconnectPolicy {
      delay: Duration::from_millis(self.reconnect_delay_ms),
      max_attempts: self.max_reconnect_attempts,
    }
  }

  pub fn notification_ttl(&self) -> Duration {
    Duration::from_millis(self.notification_ttl_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general {
      if let Some(server) = general.server {
        self.server = server;
      }
      if let Some(path) = general.start_path {
        self.start_path = path;
      }
      if let Some(tick) = general.tick_rate_ms {
        self.tick_rate_ms = tick;
      }
      if let Some(timeout) = general.request_timeout_ms {
        self.request_timeout_ms = timeout;
      }
    }

    if let Some(connection) = toml_config.connection {
      if let Some(delay) = connection.reconnect_delay_ms {
        self.reconnect_delay_ms = delay;
      }
      if let Some(max) = connection.max_reconnect_attempts {
        self.max_reconnect_attempts = max;
      }
    }

    if let Some(ttl) = toml_config.notifications.and_then(|n| n.ttl_ms) {
      self.notification_ttl_ms = ttl;
    }

    if let Some(keys) = toml_config.keys {
      if let Some(normal) = keys.normal {
        self.normal_keys = parse_bindings(&normal, errors);
      }
      if let Some(g_prefix) = keys.g_prefix {
        self.g_prefix_keys = parse_bindings(&g_prefix, errors);
      }
    }
  }

  pub fn default_toml() -> &'static str {
    r#"[general]
server = "http://localhost:3000"   # origin of the file-manager server
start_path = ""                    # directory to open; empty means the server root
tick_rate_ms = 100                 # event loop tick rate in ms
request_timeout_ms = 30000         # timeout for rename/copy/move/delete calls

[connection]
reconnect_delay_ms = 1000          # delay before each reconnect attempt
max_reconnect_attempts = 5         # attempts before giving up

[notifications]
ttl_ms = 5000                      # how long a notification stays visible

[keys.normal]
j = "move_down"
k = "move_up"
down = "move_down"
up = "move_up"
pagedown = "page_down"
pageup = "page_up"
"shift+g" = "go_to_bottom"
g = "g_press"
enter = "open"
l = "open"
right = "open"
h = "back"
left = "back"
backspace = "back"
space = "toggle_select"
esc = "clear_selection"
y = "copy"
x = "cut"
p = "paste"
r = "rename_start"
f2 = "rename_start"
delete = "delete"
"shift+d" = "delete"
d = "download"
s = "sort_name"
m = "sort_modified"
t = "new_tab"
w = "close_tab"
tab = "next_tab"
"shift+tab" = "prev_tab"
"ctrl+r" = "refresh"
"shift+r" = "reconnect"
n = "dismiss_notification"
q = "quit"
"ctrl+c" = "quit"

[keys.g_prefix]
g = "go_to_top"
t = "next_tab"
"shift+t" = "prev_tab"
"#
  }

  pub fn reverse_lookup(&self) -> HashMap<Action, Vec<String>> {
    let mut map: HashMap<Action, Vec<String>> = HashMap::new();
    for (kb, action) in &self.normal_keys {
      map.entry(action.clone()).or_default().push(kb.display_key());
    }
    for (kb, action) in &self.g_prefix_keys {
      let key_str = format!("g{}", kb.display_key());
      map.entry(action.clone()).or_default().push(key_str);
    }
    for keys in map.values_mut() {
      keys.sort();
    }
    map
  }

  pub fn config_path() -> Result<std::path::PathBuf, String> {
    dirs::config_dir()
      .map(|d| d.join("rfm").join("config.toml"))
      .ok_or_else(|| "could not determine config directory".to_string())
  }

  pub fn dump_default_config(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    std::fs::write(path, Self::default_toml())
      .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    Ok(())
  }

  pub fn load() -> (Config, Vec<String>) {
    let mut errors = Vec::new();

    let content = Self::config_path()
      .ok()
      .and_then(|p| std::fs::read_to_string(p).ok());

    let config = match content {
      Some(s) => Self::load_from_str_with_errors(&s, &mut errors),
      None => Config::default(),
    };

    (config, errors)
  }

  pub fn load_from_str(s: &str) -> Config {
    let mut errors = Vec::new();
    Self::load_from_str_with_errors(s, &mut errors)
  }

  fn load_from_str_with_errors(s: &str, errors: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    config.apply_toml_str(s, errors);
    config
  }
}

fn parse_bindings(section: &HashMap<String, String>, errors: &mut Vec<String>) -> HashMap<KeyBinding, Action> {
  let mut bindings = HashMap::new();
  for (key_str, action_str) in section {
    let Some(kb) = parse_key_binding(key_str) else {
      errors.push(format!("invalid key binding: {key_str:?}"));
      continue;
    };
    let Some(action) = Action::from_name(action_str) else {
      errors.push(format!("invalid action: {action_str:?}"));
      continue;
    };
    bindings.insert(kb, action);
  }
  bindings
}
