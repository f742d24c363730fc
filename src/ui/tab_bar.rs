use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::commands::ManageApi;
use crate::net::Dialer;
use crate::state::ViewContext;

/// "Tab 2: photos", using the last path segment, or "/" at the root.
pub fn tab_title(tab: &ViewContext) -> String {
  let leaf = tab
    .path
    .trim_end_matches(['/', '\\'])
    .rsplit(['/', '\\'])
    .next()
    .filter(|s| !s.is_empty())
    .unwrap_or("/");
  format!("{}: {leaf}", tab.label)
}

pub fn render_tab_bar<D: Dialer, A: ManageApi>(app: &App<D, A>, area: Rect, buf: &mut Buffer) {
  let active = app.tabs.active_index();
  let mut spans = Vec::with_capacity(app.tabs.len() * 2);

  for (i, tab) in app.tabs.iter().enumerate() {
    let style = if i == active {
      Style::default()
        .fg(Color::Indexed(234))
        .bg(Color::Indexed(75))
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Indexed(245))
    };
    spans.push(Span::styled(format!(" {} ", tab_title(tab)), style));
    spans.push(Span::raw(" "));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Indexed(236)));
  paragraph.render(area, buf);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::Tabs;

  #[test]
  fn test_tab_title_uses_leaf() {
    let mut tabs = Tabs::new("");
    assert_eq!(tab_title(tabs.active()), "Tab 1: /");
    tabs.navigate("/home/user/photos/");
    assert_eq!(tab_title(tabs.active()), "Tab 1: photos");
    tabs.navigate("C:\\Users\\me");
    assert_eq!(tab_title(tabs.active()), "Tab 1: me");
  }
}
