use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::action::Action;
use crate::app::App;
use crate::commands::ManageApi;
use crate::config::Config;
use crate::event::{InputMode, PromptKind};
use crate::net::Dialer;
use crate::state::ClipboardOp;
use crate::ui::file_list::size_label;

const HINTS: [(Action, &str); 5] = [
  (Action::Open, "open"),
  (Action::ToggleSelect, "select"),
  (Action::Paste, "paste"),
  (Action::NewTab, "tab"),
  (Action::Quit, "quit"),
];

/// " enter open  space select ..." from the first key bound to each action.
pub fn key_hints(lookup: &HashMap<Action, Vec<String>>) -> String {
  let mut out = String::new();
  for (action, label) in HINTS {
    if let Some(key) = lookup.get(&action).and_then(|keys| keys.first()) {
      out.push_str(&format!(" {key} {label} "));
    }
  }
  out
}

pub fn render_status_bar<D: Dialer, A: ManageApi>(app: &App<D, A>, config: &Config, area: Rect, buf: &mut Buffer) {
  let line = match app.input_mode {
    InputMode::Prompt => match app.prompt_kind {
      Some(PromptKind::Rename) => Line::from(vec![
        Span::styled(" Rename: ", Style::default().fg(Color::Indexed(75)).add_modifier(Modifier::BOLD)),
        Span::styled(&app.prompt_input, Style::default().fg(Color::Indexed(252))),
        Span::styled("▌", Style::default().fg(Color::Indexed(75))),
      ]),
      Some(PromptKind::ConfirmDelete) => Line::from(vec![Span::styled(
        format!(" Delete {} item(s)? (y/N)", app.prompt_targets.len()),
        Style::default().fg(Color::Indexed(167)).add_modifier(Modifier::BOLD),
      )]),
      None => Line::default(),
    },
    InputMode::GPrefix => Line::from(vec![
      Span::styled(" g", Style::default().fg(Color::Indexed(208)).add_modifier(Modifier::BOLD)),
      Span::styled(" (g top, t next tab, T previous tab)", Style::default().fg(Color::DarkGray)),
    ]),
    InputMode::Normal => {
      let mut spans = Vec::new();
      if let Some(entry) = app.highlighted() {
        spans.push(Span::styled(
          format!(" {}", entry.name),
          Style::default().fg(Color::Indexed(252)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" | {}", size_label(&entry)), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
          format!(" | {}/{}", app.cursor + 1, app.listing.borrow().len()),
          Style::default().fg(Color::DarkGray),
        ));
      } else {
        spans.push(Span::styled(" No selection", Style::default().fg(Color::DarkGray)));
      }

      if let Some(op) = app.clipboard.op {
        let (verb, color) = match op {
          ClipboardOp::Copy => ("copied", Color::Indexed(75)),
          ClipboardOp::Cut => ("cut", Color::Indexed(220)),
        };
        spans.push(Span::styled(
          format!("  [{} {verb}]", app.clipboard.paths.len()),
          Style::default().fg(color),
        ));
      }

      spans.push(Span::styled(
        format!("  {}", key_hints(&config.reverse_lookup())),
        Style::default().fg(Color::Indexed(241)),
      ));
      Line::from(spans)
    }
  };

  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Indexed(236)));
  paragraph.render(area, buf);
}
