use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::state::{Notifications, Severity};

const MAX_VISIBLE: usize = 4;
const TOAST_HEIGHT: u16 = 3;

fn severity_color(severity: Severity) -> Color {
  match severity {
    Severity::Info => Color::Indexed(75),
    Severity::Success => Color::Indexed(114),
    Severity::Warning => Color::Indexed(220),
    Severity::Error => Color::Indexed(167),
  }
}

fn severity_title(severity: Severity) -> &'static str {
  match severity {
    Severity::Info => " Info ",
    Severity::Success => " Done ",
    Severity::Warning => " Warning ",
    Severity::Error => " Error ",
  }
}

/// Stacks the newest toasts upwards from the bottom right corner of `area`.
pub fn render_notifications(notifications: &Notifications, area: Rect, buf: &mut Buffer) {
  let width = 48.min(area.width.saturating_sub(2));
  if width < 10 {
    return;
  }

  let mut bottom = area.y + area.height;
  for notification in notifications.iter().rev().take(MAX_VISIBLE) {
    if bottom < area.y + TOAST_HEIGHT {
      break;
    }
    bottom -= TOAST_HEIGHT;
    let popup = Rect::new(area.x + area.width - width - 1, bottom, width, TOAST_HEIGHT);

    Clear.render(popup, buf);

    let color = severity_color(notification.severity);
    let block = Block::default()
      .borders(Borders::ALL)
      .title(severity_title(notification.severity))
      .border_style(Style::default().fg(color))
      .style(Style::default().bg(Color::Indexed(235)));

    let line = Line::from(Span::styled(
      format!(" {}", notification.message),
      Style::default().fg(Color::Indexed(252)),
    ));
    Paragraph::new(line)
      .block(block)
      .wrap(Wrap { trim: true })
      .render(popup, buf);
  }
}
