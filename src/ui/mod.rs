mod views;

use crate::app::{App, Mode, NoticeKind, View};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);

  match app.view() {
    View::Login => views::login::draw_login(frame, chunks[1], app),
    View::Search => views::search::draw_search(frame, chunks[1], app),
    View::Favorites => views::favorites::draw_favorites(frame, chunks[1], app),
  }

  draw_status_bar(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let mut spans = vec![
    Span::styled(
      " pawmatch ",
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(" "),
    Span::styled(app.title(), Style::default().fg(Color::DarkGray)),
  ];

  if let Some(user) = app.session() {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      user.name.clone(),
      Style::default().fg(Color::Gray),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("favorites ({})", app.favorites().len()),
      Style::default().fg(Color::Magenta),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  // A live notice outranks the mode hints
  if let Some(notice) = app.notice() {
    let style = match notice.kind {
      NoticeKind::Success => Style::default().fg(Color::Green),
      NoticeKind::Error => Style::default().fg(Color::Red),
    };
    let paragraph = Paragraph::new(format!(" {}", notice.text)).style(style);
    frame.render_widget(paragraph, area);
    return;
  }

  let (content, style) = match app.mode() {
    Mode::Normal => {
      let hint = match app.view() {
        View::Login => " Tab:switch field  Enter:login  Ctrl-C:quit",
        View::Search => {
          " :command  /search  f:filters  Space:favorite  n/p:page  j/k:nav  q:quit"
        }
        View::Favorites => " :command  m:match  x:remove  C:clear all  j/k:nav  q:back",
      };
      (Line::from(hint), Style::default().fg(Color::DarkGray))
    }
    Mode::Command => (command_line(app), Style::default().fg(Color::Yellow)),
    Mode::Search => (
      Line::from(format!("/{}", app.search_term())),
      Style::default().fg(Color::Cyan),
    ),
    Mode::Filter => (
      Line::from(" Tab:next field  Space:toggle breed  Left/Right:adjust  Enter:apply  Esc:cancel"),
      Style::default().fg(Color::DarkGray),
    ),
  };

  frame.render_widget(Paragraph::new(content).style(style), area);
}

/// Command prompt with inline suggestions, the selected one highlighted
fn command_line(app: &App) -> Line<'static> {
  let mut spans = vec![Span::raw(format!(":{}", app.command_input()))];

  let suggestions = app.autocomplete_suggestions();
  if !suggestions.is_empty() {
    spans.push(Span::styled("   ", Style::default()));
    for (idx, cmd) in suggestions.iter().enumerate() {
      let style = if idx == app.selected_suggestion() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
      } else {
        Style::default().fg(Color::DarkGray)
      };
      spans.push(Span::styled(format!(" {} ", cmd.name), style));
    }
  }

  Line::from(spans)
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
  if s.len() <= max_len {
    s.to_string()
  } else {
    format!("{}...", &s[..max_len.saturating_sub(3)])
  }
}
