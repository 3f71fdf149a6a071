use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::types::{Dog, User};
use crate::api::ApiError;

/// Completion events posted by spawned API tasks
#[derive(Debug)]
pub enum ApiEvent {
  LoggedIn(User),
  LoginFailed(ApiError),
  LoggedOut,
  LogoutFailed(ApiError),
  BreedsLoaded(Vec<String>),
  BreedsFailed(ApiError),
  /// A search invocation finished. `generation` identifies which issued
  /// request this answers; stale generations are discarded by the app.
  SearchCompleted {
    generation: u64,
    dogs: Vec<Dog>,
    total: u32,
    from_cache: bool,
  },
  SearchFailed {
    generation: u64,
    error: ApiError,
  },
  MatchGenerated(Option<String>),
  MatchFailed(ApiError),
}

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh, debounce polling and notice expiry
  Tick,
  /// Async API task completed
  Api(ApiEvent),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let reader_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if reader_tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if reader_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender handle for spawned API tasks
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
