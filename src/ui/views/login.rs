use crate::app::{App, LoginField};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
  // Center a fixed-size form
  let width = 50.min(area.width);
  let height = 9.min(area.height);
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let form_area = Rect::new(x, y, width, height);

  let block = Block::default()
    .title(" Welcome to PawMatch ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let inner = block.inner(form_area);
  frame.render_widget(block, form_area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tagline
      Constraint::Length(1),
      Constraint::Length(1), // name
      Constraint::Length(1), // email
      Constraint::Length(1),
      Constraint::Length(1), // submit hint
    ])
    .split(inner);

  let tagline = Paragraph::new("Find your perfect furry companion")
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
  frame.render_widget(tagline, rows[0]);

  draw_field(
    frame,
    rows[2],
    "Name",
    app.login_name(),
    app.login_field() == LoginField::Name,
  );
  draw_field(
    frame,
    rows[3],
    "Email",
    app.login_email(),
    app.login_field() == LoginField::Email,
  );

  let submit = if app.login_pending() {
    "Logging in..."
  } else {
    "Press Enter to login"
  };
  let submit = Paragraph::new(submit)
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center);
  frame.render_widget(submit, rows[5]);
}

fn draw_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let label_style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };

  let mut spans = vec![
    Span::styled(format!(" {:<7}", format!("{}:", label)), label_style),
    Span::raw(value.to_string()),
  ];
  if focused {
    spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
