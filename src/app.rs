use crate::api::types::{Dog, User};
use crate::api::ApiClient;
use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{ApiEvent, Event, EventHandler};
use crate::favorites::Favorites;
use crate::search::{
  filter_by_term, Debouncer, FilterState, SearchCache, SearchOrchestrator, MAX_AGE,
};
use crate::store::StateStore;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a status-bar notice stays visible
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  /// Editing the free-text search term
  Search,
  /// Editing breed/age/sort filters in the panel
  Filter,
}

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Login,
  Search,
  Favorites,
}

/// Focused field on the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Name,
  Email,
}

/// Focused control in the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFocus {
  Breeds,
  AgeMin,
  AgeMax,
  Sort,
}

impl FilterFocus {
  fn next(self) -> Self {
    match self {
      Self::Breeds => Self::AgeMin,
      Self::AgeMin => Self::AgeMax,
      Self::AgeMax => Self::Sort,
      Self::Sort => Self::Breeds,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Breeds => Self::Sort,
      Self::AgeMin => Self::Breeds,
      Self::AgeMax => Self::AgeMin,
      Self::Sort => Self::AgeMax,
    }
  }
}

/// Draft filter edits; applied to the live filters only on Enter
#[derive(Debug, Clone)]
pub struct FilterPanel {
  pub draft: FilterState,
  pub focus: FilterFocus,
  /// Cursor into the breed list
  pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

/// Transient status-bar message (the SPA's toast)
#[derive(Debug, Clone)]
pub struct Notice {
  pub text: String,
  pub kind: NoticeKind,
  shown_at: Instant,
}

/// Main application state
pub struct App {
  config: Config,
  store: StateStore,
  client: ApiClient,
  orchestrator: SearchOrchestrator,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  view: View,
  mode: Mode,
  should_quit: bool,
  notice: Option<Notice>,

  // --- session ---
  session: Option<User>,
  login_name: String,
  login_email: String,
  login_field: LoginField,
  login_pending: bool,

  // --- command palette ---
  command_input: String,
  selected_suggestion: usize,

  // --- search view ---
  breeds: Vec<String>,
  filters: FilterState,
  filter_panel: Option<FilterPanel>,
  search_term: String,
  debouncer: Debouncer,
  dogs: Vec<Dog>,
  filtered: Vec<Dog>,
  total: u32,
  searching: bool,
  /// Generation of the most recently issued search; completions carrying an
  /// older generation are discarded so the last-issued request always wins.
  search_generation: u64,
  search_selected: usize,

  // --- favorites view ---
  favorites: Favorites,
  favorites_selected: usize,
  matched: Option<Dog>,
  match_pending: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let store = StateStore::open()?;
    Self::with_store(config, store)
  }

  fn with_store(config: Config, store: StateStore) -> Result<Self> {
    let client = ApiClient::new(&config)?;
    let cache = SearchCache::new(store.clone());
    let orchestrator = SearchOrchestrator::new(client.clone(), cache, config.page_size);

    let session = store.load_session()?;
    let favorites = Favorites::new(store.load_favorites()?);
    let view = if session.is_some() {
      View::Search
    } else {
      View::Login
    };

    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      config,
      store,
      client,
      orchestrator,
      event_tx: tx,
      view,
      mode: Mode::Normal,
      should_quit: false,
      notice: None,
      session,
      login_name: String::new(),
      login_email: String::new(),
      login_field: LoginField::Name,
      login_pending: false,
      command_input: String::new(),
      selected_suggestion: 0,
      breeds: Vec::new(),
      filters: FilterState::default(),
      filter_panel: None,
      search_term: String::new(),
      debouncer: Debouncer::default(),
      dogs: Vec::new(),
      filtered: Vec::new(),
      total: 0,
      searching: false,
      search_generation: 0,
      search_selected: 0,
      favorites,
      favorites_selected: 0,
      matched: None,
      match_pending: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load for an already-authenticated session
    if self.session.is_some() {
      self.load_breeds();
      self.start_search();
    }

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Api(api_event) => self.handle_api_event(api_event),
    }
  }

  fn tick(&mut self) {
    // Apply a debounced text-term edit: re-filters in-memory records only,
    // never the network.
    if let Some(term) = self.debouncer.poll() {
      self.filtered = filter_by_term(&self.dogs, &term);
      self.clamp_search_selection();
    }

    if let Some(notice) = &self.notice {
      if notice.shown_at.elapsed() > NOTICE_TTL {
        self.notice = None;
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
      Mode::Filter => self.handle_filter_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match self.view {
      View::Login => self.handle_login_key(key),
      View::Search => self.handle_search_view_key(key),
      View::Favorites => self.handle_favorites_view_key(key),
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab | KeyCode::BackTab => {
        self.login_field = match self.login_field {
          LoginField::Name => LoginField::Email,
          LoginField::Email => LoginField::Name,
        };
      }
      KeyCode::Enter => self.start_login(),
      KeyCode::Backspace => {
        match self.login_field {
          LoginField::Name => self.login_name.pop(),
          LoginField::Email => self.login_email.pop(),
        };
      }
      KeyCode::Char(c) => match self.login_field {
        LoginField::Name => self.login_name.push(c),
        LoginField::Email => self.login_email.push(c),
      },
      _ => {}
    }
  }

  fn handle_search_view_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,

      KeyCode::Up | KeyCode::Char('k') => self.move_search_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_search_selection(1),

      KeyCode::Char(' ') => self.toggle_favorite_selected(),

      KeyCode::Right | KeyCode::Char('n') => self.next_page(),
      KeyCode::Left | KeyCode::Char('p') => self.prev_page(),

      KeyCode::Char('/') => {
        self.mode = Mode::Search;
      }
      KeyCode::Char('f') => {
        self.filter_panel = Some(FilterPanel {
          draft: self.filters.clone(),
          focus: FilterFocus::Breeds,
          cursor: 0,
        });
        self.mode = Mode::Filter;
      }
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn handle_favorites_view_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => {
        self.view = View::Search;
      }

      KeyCode::Up | KeyCode::Char('k') => self.move_favorites_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_favorites_selection(1),

      KeyCode::Char('x') => self.remove_selected_favorite(),
      KeyCode::Char('C') => self.clear_favorites(),
      KeyCode::Char('m') => self.generate_match(),

      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0;
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_term.clear();
        self.debouncer.flush();
        self.filtered = self.dogs.clone();
        self.clamp_search_selection();
      }
      KeyCode::Enter => {
        // Apply immediately instead of waiting out the quiet period
        if let Some(term) = self.debouncer.flush() {
          self.filtered = filter_by_term(&self.dogs, &term);
          self.clamp_search_selection();
        }
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_term.pop();
        self.debouncer.submit(self.search_term.clone());
      }
      KeyCode::Char(c) => {
        self.search_term.push(c);
        self.debouncer.submit(self.search_term.clone());
      }
      _ => {}
    }
  }

  fn handle_filter_mode_key(&mut self, key: KeyEvent) {
    let Some(panel) = self.filter_panel.as_mut() else {
      self.mode = Mode::Normal;
      return;
    };

    match key.code {
      KeyCode::Esc => {
        // Discard the draft
        self.filter_panel = None;
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => {
        // Apply filters: back to page 1 and an explicit re-fetch
        let mut applied = panel.draft.clone();
        applied.page = 1;
        self.filters = applied;
        self.filter_panel = None;
        self.mode = Mode::Normal;
        self.start_search();
      }
      KeyCode::Tab => panel.focus = panel.focus.next(),
      KeyCode::BackTab => panel.focus = panel.focus.prev(),

      KeyCode::Up | KeyCode::Char('k') if panel.focus == FilterFocus::Breeds => {
        panel.cursor = panel.cursor.saturating_sub(1);
      }
      KeyCode::Down | KeyCode::Char('j') if panel.focus == FilterFocus::Breeds => {
        if panel.cursor + 1 < self.breeds.len() {
          panel.cursor += 1;
        }
      }
      KeyCode::Char(' ') if panel.focus == FilterFocus::Breeds => {
        if let Some(breed) = self.breeds.get(panel.cursor) {
          panel.draft.toggle_breed(breed);
        }
      }

      KeyCode::Left | KeyCode::Char('-') => match panel.focus {
        FilterFocus::AgeMin => {
          let value = panel.draft.age_min.saturating_sub(1);
          panel.draft.set_age_min(value);
        }
        FilterFocus::AgeMax => {
          let value = panel.draft.age_max.saturating_sub(1);
          panel.draft.set_age_max(value);
        }
        FilterFocus::Sort => panel.draft.sort = panel.draft.sort.cycle(-1),
        FilterFocus::Breeds => {}
      },
      KeyCode::Right | KeyCode::Char('+') => match panel.focus {
        FilterFocus::AgeMin => {
          let value = (panel.draft.age_min + 1).min(MAX_AGE);
          panel.draft.set_age_min(value);
        }
        FilterFocus::AgeMax => {
          let value = (panel.draft.age_max + 1).min(MAX_AGE);
          panel.draft.set_age_max(value);
        }
        FilterFocus::Sort => panel.draft.sort = panel.draft.sort.cycle(1),
        FilterFocus::Breeds => {}
      },

      _ => {}
    }
  }

  fn execute_command(&mut self) {
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "search" => {
        self.view = View::Search;
      }
      "favorites" => {
        self.view = View::Favorites;
        self.favorites_selected = 0;
      }
      "refresh" => {
        self.orchestrator.clear_cache();
        self.notice_success("Search cache cleared");
        if self.view == View::Search {
          self.start_search();
        }
      }
      "logout" => self.start_logout(),
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        // Unknown command
      }
    }
    self.command_input.clear();
  }

  // --- async operations ---

  fn start_login(&mut self) {
    if self.login_pending {
      return;
    }

    let name = self.login_name.trim().to_string();
    let email = self.login_email.trim().to_string();
    if name.is_empty() || email.is_empty() {
      self.notice_error("Name and email are required");
      return;
    }

    self.login_pending = true;
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match client.login(&name, &email).await {
        Ok(()) => ApiEvent::LoggedIn(User { name, email }),
        Err(err) => ApiEvent::LoginFailed(err),
      };
      let _ = tx.send(Event::Api(event));
    });
  }

  fn start_logout(&mut self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match client.logout().await {
        Ok(()) => ApiEvent::LoggedOut,
        Err(err) => ApiEvent::LogoutFailed(err),
      };
      let _ = tx.send(Event::Api(event));
    });
  }

  fn load_breeds(&self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match client.breeds().await {
        Ok(breeds) => ApiEvent::BreedsLoaded(breeds),
        Err(err) => ApiEvent::BreedsFailed(err),
      };
      let _ = tx.send(Event::Api(event));
    });
  }

  /// Issue a search for the current filters, tagging it with a fresh
  /// generation so late arrivals from superseded requests are discarded.
  fn start_search(&mut self) {
    self.search_generation += 1;
    let generation = self.search_generation;
    self.searching = true;

    let orchestrator = self.orchestrator.clone();
    let filters = self.filters.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match orchestrator.execute(&filters).await {
        Ok(outcome) => ApiEvent::SearchCompleted {
          generation,
          dogs: outcome.dogs,
          total: outcome.total,
          from_cache: outcome.from_cache,
        },
        Err(error) => ApiEvent::SearchFailed { generation, error },
      };
      let _ = tx.send(Event::Api(event));
    });
  }

  fn generate_match(&mut self) {
    if self.match_pending {
      return;
    }

    // Rejected locally; the network is never consulted for an empty set.
    if self.favorites.is_empty() {
      self.notice_error("Add some dogs to your favorites first!");
      return;
    }

    self.match_pending = true;
    let ids = self.favorites.ids();
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match client.generate_match(&ids).await {
        Ok(matched) => ApiEvent::MatchGenerated(matched),
        Err(err) => ApiEvent::MatchFailed(err),
      };
      let _ = tx.send(Event::Api(event));
    });
  }

  // --- API completions ---

  fn handle_api_event(&mut self, event: ApiEvent) {
    match event {
      ApiEvent::LoggedIn(user) => {
        self.login_pending = false;
        if let Err(err) = self.store.save_session(Some(&user)) {
          tracing::warn!(error = %err, "failed to persist session");
        }
        self.session = Some(user);
        self.view = View::Search;
        self.notice_success("Logged in successfully");
        self.load_breeds();
        self.start_search();
      }
      ApiEvent::LoginFailed(err) => {
        self.login_pending = false;
        // No detail leakage on auth failures
        tracing::warn!(status = err.status, "login failed");
        self.notice_error("Invalid credentials");
      }
      ApiEvent::LoggedOut => {
        // Local session is cleared only on confirmed success
        if let Err(err) = self.store.save_session(None) {
          tracing::warn!(error = %err, "failed to clear persisted session");
        }
        self.session = None;
        self.view = View::Login;
        self.notice_success("Logged out successfully");
      }
      ApiEvent::LogoutFailed(err) => {
        if err.is_auth_expired() {
          self.expire_session();
        } else {
          self.notice_error("Failed to logout");
        }
      }
      ApiEvent::BreedsLoaded(breeds) => {
        self.breeds = breeds;
      }
      ApiEvent::BreedsFailed(err) => {
        if err.is_auth_expired() {
          self.expire_session();
        } else {
          self.notice_error("Failed to load breeds");
        }
      }
      ApiEvent::SearchCompleted {
        generation,
        dogs,
        total,
        from_cache,
      } => {
        if generation != self.search_generation {
          tracing::debug!(generation, "discarding superseded search result");
          return;
        }

        tracing::debug!(total, from_cache, "search completed");
        self.searching = false;
        self.dogs = dogs;
        self.total = total;
        self.filtered = filter_by_term(&self.dogs, &self.search_term);
        self.clamp_search_selection();
      }
      ApiEvent::SearchFailed { generation, error } => {
        if generation != self.search_generation {
          return;
        }

        self.searching = false;
        // The orchestrator absorbs everything except authentication expiry
        if error.is_auth_expired() {
          self.expire_session();
        } else {
          self.notice_error("Search failed");
        }
      }
      ApiEvent::MatchGenerated(matched) => {
        self.match_pending = false;
        // The match id is resolved against the local favorites, never
        // re-fetched; an unknown id silently produces no match panel.
        if let Some(id) = matched {
          if let Some(dog) = self.favorites.find(&id) {
            self.matched = Some(dog.clone());
            self.notice_success("We've found your perfect match!");
          }
        }
      }
      ApiEvent::MatchFailed(err) => {
        self.match_pending = false;
        if err.is_auth_expired() {
          self.expire_session();
        } else {
          // Previous match display, if any, stays
          self.notice_error("Failed to generate match");
        }
      }
    }
  }

  /// The 401 path: drop the session and return to the login view, the TUI
  /// equivalent of the browser redirect.
  fn expire_session(&mut self) {
    if let Err(err) = self.store.save_session(None) {
      tracing::warn!(error = %err, "failed to clear persisted session");
    }
    self.session = None;
    self.login_pending = false;
    self.view = View::Login;
    self.mode = Mode::Normal;
    self.notice_error("Session expired, please log in again");
  }

  // --- favorites ---

  fn toggle_favorite_selected(&mut self) {
    let Some(dog) = self.display_dogs().get(self.search_selected).cloned() else {
      return;
    };

    let name = dog.name.clone();
    if self.favorites.toggle(&dog) {
      self.notice_success(&format!("{} added to favorites", name));
    } else {
      self.notice_success(&format!("{} removed from favorites", name));
    }
    self.persist_favorites();
  }

  fn remove_selected_favorite(&mut self) {
    let Some(dog) = self.favorites.dogs().get(self.favorites_selected).cloned() else {
      return;
    };

    self.favorites.remove(&dog.id);
    self.persist_favorites();
    self.notice_success(&format!("{} removed from favorites", dog.name));
    self.clamp_favorites_selection();
  }

  fn clear_favorites(&mut self) {
    if self.favorites.is_empty() {
      return;
    }
    self.favorites.clear();
    self.matched = None;
    self.favorites_selected = 0;
    self.persist_favorites();
    self.notice_success("Favorites cleared");
  }

  fn persist_favorites(&self) {
    if let Err(err) = self.store.save_favorites(self.favorites.dogs()) {
      tracing::warn!(error = %err, "failed to persist favorites");
    }
  }

  // --- pagination & selection ---

  pub fn total_pages(&self) -> u32 {
    let page_size = self.config.page_size.max(1);
    (self.total.div_ceil(page_size)).max(1)
  }

  fn next_page(&mut self) {
    if self.filters.page < self.total_pages() {
      self.filters.page += 1;
      self.search_selected = 0;
      // The text term survives page changes
      self.start_search();
    }
  }

  fn prev_page(&mut self) {
    if self.filters.page > 1 {
      self.filters.page -= 1;
      self.search_selected = 0;
      self.start_search();
    }
  }

  fn move_search_selection(&mut self, delta: i32) {
    let len = self.display_dogs().len();
    if len > 0 {
      self.search_selected = (self.search_selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn move_favorites_selection(&mut self, delta: i32) {
    let len = self.favorites.len();
    if len > 0 {
      self.favorites_selected =
        (self.favorites_selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn clamp_search_selection(&mut self) {
    let len = self.display_dogs().len();
    if self.search_selected >= len {
      self.search_selected = len.saturating_sub(1);
    }
  }

  fn clamp_favorites_selection(&mut self) {
    let len = self.favorites.len();
    if self.favorites_selected >= len {
      self.favorites_selected = len.saturating_sub(1);
    }
  }

  // --- notices ---

  fn notice_success(&mut self, text: &str) {
    self.notice = Some(Notice {
      text: text.to_string(),
      kind: NoticeKind::Success,
      shown_at: Instant::now(),
    });
  }

  fn notice_error(&mut self, text: &str) {
    self.notice = Some(Notice {
      text: text.to_string(),
      kind: NoticeKind::Error,
      shown_at: Instant::now(),
    });
  }

  // --- accessors for UI rendering ---

  /// The list the search view renders: text-filtered when a term is
  /// active, the full hydrated page otherwise.
  pub fn display_dogs(&self) -> &[Dog] {
    if self.search_term.trim().is_empty() {
      &self.dogs
    } else {
      &self.filtered
    }
  }

  pub fn view(&self) -> View {
    self.view
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn notice(&self) -> Option<&Notice> {
    self.notice.as_ref()
  }

  pub fn title(&self) -> String {
    self.config.display_title()
  }

  pub fn session(&self) -> Option<&User> {
    self.session.as_ref()
  }

  pub fn login_name(&self) -> &str {
    &self.login_name
  }

  pub fn login_email(&self) -> &str {
    &self.login_email
  }

  pub fn login_field(&self) -> LoginField {
    self.login_field
  }

  pub fn login_pending(&self) -> bool {
    self.login_pending
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  pub fn breeds(&self) -> &[String] {
    &self.breeds
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }

  pub fn filter_panel(&self) -> Option<&FilterPanel> {
    self.filter_panel.as_ref()
  }

  pub fn search_term(&self) -> &str {
    &self.search_term
  }

  pub fn searching(&self) -> bool {
    self.searching
  }

  pub fn total(&self) -> u32 {
    self.total
  }

  pub fn search_selected(&self) -> usize {
    self.search_selected
  }

  pub fn favorites(&self) -> &Favorites {
    &self.favorites
  }

  pub fn favorites_selected(&self) -> usize {
    self.favorites_selected
  }

  pub fn matched(&self) -> Option<&Dog> {
    self.matched.as_ref()
  }

  pub fn match_pending(&self) -> bool {
    self.match_pending
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::ApiError;

  fn dog(id: &str, name: &str) -> Dog {
    Dog {
      id: id.to_string(),
      name: name.to_string(),
      breed: "Poodle".to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    }
  }

  fn test_app() -> App {
    let store = StateStore::open_in_memory().unwrap();
    App::with_store(Config::default(), store).unwrap()
  }

  #[tokio::test]
  async fn test_stale_generation_is_discarded() {
    let mut app = test_app();
    app.search_generation = 2;

    app.handle_api_event(ApiEvent::SearchCompleted {
      generation: 1,
      dogs: vec![dog("old", "Old")],
      total: 1,
      from_cache: false,
    });
    assert!(app.dogs.is_empty());

    app.handle_api_event(ApiEvent::SearchCompleted {
      generation: 2,
      dogs: vec![dog("new", "New")],
      total: 1,
      from_cache: false,
    });
    assert_eq!(app.dogs.len(), 1);
    assert_eq!(app.dogs[0].id, "new");
  }

  #[tokio::test]
  async fn test_search_completion_applies_active_term() {
    let mut app = test_app();
    app.search_generation = 1;
    app.search_term = "lab".to_string();

    app.handle_api_event(ApiEvent::SearchCompleted {
      generation: 1,
      dogs: vec![dog("a", "Labrador"), dog("b", "Poodle")],
      total: 2,
      from_cache: false,
    });

    let displayed: Vec<_> = app.display_dogs().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(displayed, vec!["Labrador"]);
    // The full hydrated page is retained underneath
    assert_eq!(app.dogs.len(), 2);
  }

  #[tokio::test]
  async fn test_empty_favorites_match_is_local() {
    let mut app = test_app();
    app.generate_match();

    // Rejected before any task is spawned
    assert!(!app.match_pending);
    let notice = app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
  }

  #[tokio::test]
  async fn test_match_resolves_against_local_favorites() {
    let mut app = test_app();
    app.favorites.add(dog("a", "Ace"));

    app.handle_api_event(ApiEvent::MatchGenerated(Some("a".to_string())));
    assert_eq!(app.matched.as_ref().unwrap().id, "a");

    // An id we do not hold locally is silently ignored
    app.matched = None;
    app.handle_api_event(ApiEvent::MatchGenerated(Some("unknown".to_string())));
    assert!(app.matched.is_none());
  }

  #[tokio::test]
  async fn test_auth_expiry_returns_to_login() {
    let mut app = test_app();
    app.session = Some(User {
      name: "Ada".to_string(),
      email: "ada@example.com".to_string(),
    });
    app.view = View::Search;
    app.search_generation = 1;

    app.handle_api_event(ApiEvent::SearchFailed {
      generation: 1,
      error: ApiError::http(401, None),
    });

    assert!(app.session.is_none());
    assert_eq!(app.view, View::Login);
  }

  #[tokio::test]
  async fn test_logout_failure_keeps_session() {
    let mut app = test_app();
    app.session = Some(User {
      name: "Ada".to_string(),
      email: "ada@example.com".to_string(),
    });
    app.view = View::Search;

    app.handle_api_event(ApiEvent::LogoutFailed(ApiError::http(500, None)));
    assert!(app.session.is_some());
    assert_eq!(app.view, View::Search);
  }

  #[tokio::test]
  async fn test_total_pages_rounds_up() {
    let mut app = test_app();
    app.total = 41;
    assert_eq!(app.total_pages(), 3);
    app.total = 0;
    assert_eq!(app.total_pages(), 1);
  }
}
