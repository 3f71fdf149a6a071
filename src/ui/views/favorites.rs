use crate::app::App;
use crate::ui::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_favorites(frame: &mut Frame, area: Rect, app: &App) {
  // When a match exists, it gets a celebration panel above the list
  let chunks = if app.matched().is_some() {
    Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(6), Constraint::Min(1)])
      .split(area)
  } else {
    Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(1)])
      .split(area)
  };

  if let Some(matched) = app.matched() {
    let block = Block::default()
      .title(" Your Perfect Match! ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Magenta));

    let lines = vec![
      Line::from(Span::styled(
        matched.name.clone(),
        Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )),
      Line::from(Span::styled(
        matched.breed.clone(),
        Style::default().fg(Color::Cyan),
      )),
      Line::from(Span::styled(
        format!("{} years old  {}", matched.age, matched.zip_code),
        Style::default().fg(Color::Gray),
      )),
      Line::from(Span::styled(
        matched.img.clone(),
        Style::default().fg(Color::DarkGray),
      )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);
  }

  let list_area = *chunks.last().unwrap_or(&area);

  let title = if app.match_pending() {
    format!(" Your Favorite Dogs ({}) - generating match... ", app.favorites().len())
  } else {
    format!(" Your Favorite Dogs ({}) ", app.favorites().len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Magenta));

  if app.favorites().is_empty() {
    let paragraph = Paragraph::new("You haven't added any dogs to your favorites yet.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, list_area);
    return;
  }

  let items: Vec<ListItem> = app
    .favorites()
    .dogs()
    .iter()
    .map(|dog| {
      let line = Line::from(vec![
        Span::styled("♥ ", Style::default().fg(Color::Magenta)),
        Span::styled(
          format!("{:<20}", truncate(&dog.name, 20)),
          Style::default().fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<28}", truncate(&dog.breed, 28)),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{:>3} yrs  ", dog.age), Style::default().fg(Color::Gray)),
        Span::styled(dog.zip_code.clone(), Style::default().fg(Color::DarkGray)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(app.favorites_selected()));

  frame.render_stateful_widget(list, list_area, &mut state);
}
