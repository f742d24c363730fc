pub mod file_list;
pub mod notifications;
pub mod status_bar;
pub mod tab_bar;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::commands::ManageApi;
use crate::config::Config;
use crate::net::{ConnectionState, Dialer};

pub fn draw<D: Dialer, A: ManageApi>(frame: &mut Frame, app: &mut App<D, A>, config: &Config) {
  let area = frame.area();

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tabs
      Constraint::Length(1), // header
      Constraint::Min(3),    // listing
      Constraint::Length(1), // status bar
    ])
    .split(area);

  tab_bar::render_tab_bar(app, chunks[0], frame.buffer_mut());
  render_header(app, chunks[1], frame.buffer_mut());

  app.viewport_height = chunks[2].height.saturating_sub(2) as usize;
  file_list::render_file_list(app, chunks[2], frame.buffer_mut());

  status_bar::render_status_bar(app, config, chunks[3], frame.buffer_mut());

  let toast_area = Rect { height: area.height.saturating_sub(1), ..area };
  notifications::render_notifications(&app.notifications, toast_area, frame.buffer_mut());
}

pub fn state_color(state: ConnectionState) -> Color {
  match state {
    ConnectionState::Open => Color::Indexed(114),
    ConnectionState::Connecting => Color::Indexed(220),
    ConnectionState::Closed => Color::Indexed(208),
    ConnectionState::Disconnected => Color::Indexed(167),
    ConnectionState::Idle => Color::Indexed(245),
  }
}

fn render_header<D: Dialer, A: ManageApi>(app: &App<D, A>, area: Rect, buf: &mut Buffer) {
  let path = &app.tabs.active().path;
  let path = if path.is_empty() { "/" } else { path.as_str() };
  let state = app.connection.state();

  let mut spans = vec![
    Span::styled(" ", Style::default().fg(Color::Indexed(75))),
    Span::styled(
      path.to_string(),
      Style::default().fg(Color::Indexed(252)).add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("  {}", app.connection.endpoint().host_str().unwrap_or_default()),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(format!("  ● {}", state.label()), Style::default().fg(state_color(state))),
  ];

  if app.listing.borrow().is_loading() {
    spans.push(Span::styled("  loading…", Style::default().fg(Color::Indexed(245))));
  }

  if state == ConnectionState::Disconnected {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      " live updates stopped, press R to reconnect ",
      Style::default()
        .fg(Color::Indexed(234))
        .bg(Color::Indexed(167))
        .add_modifier(Modifier::BOLD),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Indexed(236)));
  paragraph.render(area, buf);
}
