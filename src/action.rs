#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
  Quit,
  MoveUp,
  MoveDown,
  PageUp,
  PageDown,
  GoToTop,
  GoToBottom,
  GPress,
  Open,
  Back,
  ToggleSelect,
  ClearSelection,
  Copy,
  Cut,
  Paste,
  RenameStart,
  Delete,
  Download,
  SortByName,
  SortByModified,
  NewTab,
  CloseTab,
  NextTab,
  PrevTab,
  Refresh,
  Reconnect,
  DismissNotification,
  PromptInput(char),
  PromptBackspace,
  PromptConfirm,
  PromptCancel,
  Resize(u16, u16),
  Tick,
  None,
}

impl Action {
  pub fn from_name(name: &str) -> Option<Action> {
    match name {
      "quit" => Some(Action::Quit),
      "move_up" => Some(Action::MoveUp),
      "move_down" => Some(Action::MoveDown),
      "page_up" => Some(Action::PageUp),
      "page_down" => Some(Action::PageDown),
      "go_to_top" => Some(Action::GoToTop),
      "go_to_bottom" => Some(Action::GoToBottom),
      "g_press" => Some(Action::GPress),
      "open" => Some(Action::Open),
      "back" => Some(Action::Back),
      "toggle_select" => Some(Action::ToggleSelect),
      "clear_selection" => Some(Action::ClearSelection),
      "copy" => Some(Action::Copy),
      "cut" => Some(Action::Cut),
      "paste" => Some(Action::Paste),
      "rename_start" => Some(Action::RenameStart),
      "delete" => Some(Action::Delete),
      "download" => Some(Action::Download),
      "sort_name" => Some(Action::SortByName),
      "sort_modified" => Some(Action::SortByModified),
      "new_tab" => Some(Action::NewTab),
      "close_tab" => Some(Action::CloseTab),
      "next_tab" => Some(Action::NextTab),
      "prev_tab" => Some(Action::PrevTab),
      "refresh" => Some(Action::Refresh),
      "reconnect" => Some(Action::Reconnect),
      "dismiss_notification" => Some(Action::DismissNotification),
      "none" => Some(Action::None),
      _ => None,
    }
  }
}
