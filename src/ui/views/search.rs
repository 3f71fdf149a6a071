use crate::app::{App, FilterFocus};
use crate::ui::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

pub fn draw_search(frame: &mut Frame, area: Rect, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Active filter summary
      Constraint::Min(1),    // Dog list
      Constraint::Length(1), // Pagination
    ])
    .split(area);

  draw_filter_summary(frame, chunks[0], app);
  draw_dog_list(frame, chunks[1], app);
  draw_pagination(frame, chunks[2], app);

  if app.filter_panel().is_some() {
    draw_filter_panel(frame, area, app);
  }
}

fn draw_filter_summary(frame: &mut Frame, area: Rect, app: &App) {
  let filters = app.filters();
  let breeds = if filters.breeds.is_empty() {
    "all breeds".to_string()
  } else {
    truncate(&filters.breeds.join(", "), 40)
  };

  let mut spans = vec![
    Span::styled(format!(" {}", breeds), Style::default().fg(Color::Cyan)),
    Span::styled(
      format!("  age {}-{}", filters.age_min, filters.age_max),
      Style::default().fg(Color::Gray),
    ),
    Span::styled(
      format!("  {}", filters.sort.label()),
      Style::default().fg(Color::Gray),
    ),
  ];

  if !app.search_term().trim().is_empty() {
    spans.push(Span::styled(
      format!("  /{}", app.search_term()),
      Style::default().fg(Color::Yellow),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_dog_list(frame: &mut Frame, area: Rect, app: &App) {
  let dogs = app.display_dogs();

  let title = if app.searching() {
    " Dogs (loading...) ".to_string()
  } else {
    format!(" Dogs ({}) ", dogs.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if dogs.is_empty() && !app.searching() {
    let paragraph = Paragraph::new("No dogs found matching your search criteria.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = dogs
    .iter()
    .map(|dog| {
      let heart = if app.favorites().contains(&dog.id) {
        Span::styled("♥ ", Style::default().fg(Color::Magenta))
      } else {
        Span::raw("  ")
      };

      let line = Line::from(vec![
        heart,
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
  state.select(Some(app.search_selected()));

  frame.render_stateful_widget(list, area, &mut state);
}

fn draw_pagination(frame: &mut Frame, area: Rect, app: &App) {
  let content = format!(
    " Page {}/{} ({} dogs)",
    app.filters().page,
    app.total_pages(),
    app.total()
  );
  let paragraph = Paragraph::new(content).style(Style::default().fg(Color::DarkGray));
  frame.render_widget(paragraph, area);
}

/// Modal overlay for editing breed/age/sort filters
fn draw_filter_panel(frame: &mut Frame, area: Rect, app: &App) {
  let Some(panel) = app.filter_panel() else {
    return;
  };

  let width = (area.width * 60 / 100).clamp(40, 70);
  let height = (area.height * 70 / 100).clamp(12, 24);
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let overlay_area = Rect::new(x, y, width, height);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .title(" Filters ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));

  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(3),    // Breed list
      Constraint::Length(1), // Age min
      Constraint::Length(1), // Age max
      Constraint::Length(1), // Sort
    ])
    .split(inner);

  draw_breed_picker(frame, rows[0], app, panel.focus == FilterFocus::Breeds);
  draw_value_row(
    frame,
    rows[1],
    "Age min",
    &panel.draft.age_min.to_string(),
    panel.focus == FilterFocus::AgeMin,
  );
  draw_value_row(
    frame,
    rows[2],
    "Age max",
    &panel.draft.age_max.to_string(),
    panel.focus == FilterFocus::AgeMax,
  );
  draw_value_row(
    frame,
    rows[3],
    "Sort",
    panel.draft.sort.label(),
    panel.focus == FilterFocus::Sort,
  );
}

fn draw_breed_picker(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
  let Some(panel) = app.filter_panel() else {
    return;
  };

  let border = if focused { Color::Yellow } else { Color::DarkGray };
  let block = Block::default()
    .title(" Breeds ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  if app.breeds().is_empty() {
    let paragraph = Paragraph::new("Loading breeds...")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = app
    .breeds()
    .iter()
    .map(|breed| {
      let mark = if panel.draft.breeds.iter().any(|b| b == breed) {
        Span::styled("[x] ", Style::default().fg(Color::Green))
      } else {
        Span::raw("[ ] ")
      };
      ListItem::new(Line::from(vec![mark, Span::raw(breed.clone())]))
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
  state.select(Some(panel.cursor));

  frame.render_stateful_widget(list, area, &mut state);
}

fn draw_value_row(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };

  let line = Line::from(vec![
    Span::styled(format!(" {:<9}", format!("{}:", label)), style),
    Span::raw(value.to_string()),
  ]);
  frame.render_widget(Paragraph::new(line), area);
}
