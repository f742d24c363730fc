use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::commands::ManageApi;
use crate::net::Dialer;
use crate::net::protocol::{Entry, EntryKind, SortColumn, SortDirection, SortOrder};

const DATE_WIDTH: usize = 16;
const SIZE_WIDTH: usize = 10;

pub fn format_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = 1024 * KB;
  const GB: u64 = 1024 * MB;

  if bytes >= GB {
    format!("{:.1} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.1} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.1} KB", bytes as f64 / KB as f64)
  } else {
    format!("{bytes} B")
  }
}

/// Unknown sizes render as "-", sizes the server flagged as stale get a "~".
pub fn size_label(entry: &Entry) -> String {
  match entry.size {
    Some(bytes) if entry.size_stale => format!("~{}", format_size(bytes)),
    Some(bytes) => format_size(bytes),
    None => "-".to_string(),
  }
}

pub fn modified_label(entry: &Entry) -> String {
  entry
    .modified
    .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_default()
}

/// Pads or truncates to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
  let mut out = String::new();
  let mut used = 0;
  let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();

  if total <= width {
    out.push_str(text);
    used = total;
  } else if width > 0 {
    for c in text.chars() {
      let w = c.width().unwrap_or(0);
      if used + w + 1 > width {
        break;
      }
      out.push(c);
      used += w;
    }
    out.push('…');
    used += 1;
  }
  out.push_str(&" ".repeat(width.saturating_sub(used)));
  out
}

pub fn sort_title(sort: SortOrder) -> String {
  let column = match sort.column {
    SortColumn::Name => "name",
    SortColumn::Modified => "modified",
  };
  let arrow = match sort.direction {
    SortDirection::Asc => "▲",
    SortDirection::Desc => "▼",
  };
  format!(" {column} {arrow} ")
}

fn kind_color(kind: EntryKind) -> Color {
  match kind {
    EntryKind::Folder => Color::Indexed(75),
    EntryKind::Image => Color::Indexed(176),
    EntryKind::Document => Color::Indexed(180),
    EntryKind::File | EntryKind::Other => Color::Indexed(252),
  }
}

pub fn render_file_list<D: Dialer, A: ManageApi>(app: &App<D, A>, area: Rect, buf: &mut Buffer) {
  let listing = app.listing.borrow();
  let tab = app.tabs.active();
  let inner_height = area.height.saturating_sub(2) as usize;
  let inner_width = area.width.saturating_sub(2) as usize;
  let name_width = inner_width.saturating_sub(4 + DATE_WIDTH + SIZE_WIDTH + 2);

  let entries = listing.entries();
  let mut lines: Vec<Line> = Vec::with_capacity(inner_height);

  if entries.is_empty() {
    let (text, color) = if let Some(error) = listing.error() {
      (format!(" {error}"), Color::Indexed(167))
    } else if listing.is_loading() {
      (" Loading…".to_string(), Color::Indexed(245))
    } else if listing.is_empty_directory() {
      (" This folder is empty".to_string(), Color::Indexed(245))
    } else {
      (String::new(), Color::Indexed(245))
    };
    lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
  }

  let start = app.scroll_offset.min(entries.len());
  let end = (start + inner_height).min(entries.len());

  for (offset, entry) in entries[start..end].iter().enumerate() {
    let is_cursor = start + offset == app.cursor;
    let is_marked = tab.is_selected(&entry.path);
    let is_cut = app.clipboard.is_cut(&entry.path);

    let name = if entry.is_folder() {
      format!("{}/", entry.name)
    } else {
      entry.name.clone()
    };

    let (name_style, meta_style) = if is_cursor {
      let sel = Style::default()
        .fg(Color::Indexed(234))
        .bg(Color::Indexed(75))
        .add_modifier(Modifier::BOLD);
      (sel, sel)
    } else if is_cut {
      let cut = Modifier::DIM | Modifier::CROSSED_OUT;
      (
        Style::default().fg(kind_color(entry.kind)).add_modifier(cut),
        Style::default().fg(Color::DarkGray).add_modifier(cut),
      )
    } else {
      let mut style = Style::default().fg(kind_color(entry.kind));
      if entry.is_folder() {
        style = style.add_modifier(Modifier::BOLD);
      }
      (style, Style::default().fg(Color::DarkGray))
    };

    let marker = if is_marked { "[x] " } else { "[ ] " };
    let marker_style = if is_cursor {
      name_style
    } else if is_marked {
      Style::default().fg(Color::Indexed(220)).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Indexed(240))
    };

    lines.push(Line::from(vec![
      Span::styled(marker, marker_style),
      Span::styled(fit(&name, name_width), name_style),
      Span::styled(format!(" {:>DATE_WIDTH$}", modified_label(entry)), meta_style),
      Span::styled(format!(" {:>SIZE_WIDTH$}", size_label(entry)), meta_style),
    ]));
  }

  let title = if tab.selected.is_empty() {
    format!(" {} items ", entries.len())
  } else {
    format!(" {} items, {} selected ", entries.len(), tab.selected.len())
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Indexed(75)))
    .title(title)
    .title(Line::from(sort_title(tab.sort)).right_aligned())
    .title_style(Style::default().fg(Color::Indexed(75)));

  let paragraph = Paragraph::new(lines).block(block);
  paragraph.render(area, buf);
}
