use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use rand::rngs::StdRng;
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use crate::config::UiConfig;
use crate::entry::{validate_entries, PRESET_SCORES};
use crate::session::{GameStatus, Session, MAX_PLAYERS};
use crate::store::SessionStore;

use super::entry_view::{self, EntryForm};
use super::{history_view, lobby_view, score_view};

const RESET_PROMPT: &str = "Discard the whole session? y: reset / any other key: keep playing";

/// Owns the single current session value, applies transitions in response
/// to key events, and persists the result after each one.
pub struct App {
    session: Session,
    store: SessionStore,
    ui: UiConfig,
    rng: StdRng,
    name_input: String,
    lobby_selected: usize,
    history_selected: usize,
    entry_form: Option<EntryForm>,
    confirm_reset: bool,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(session: Session, store: SessionStore, ui: UiConfig, rng: StdRng) -> Self {
        // A rehydrated blob may still carry an open entry flag; rebuild the
        // form so the overlay is usable on the first frame.
        let entry_form = session
            .round_entry_open
            .then(|| EntryForm::open(&session.players));

        App {
            session,
            store,
            ui,
            rng,
            name_input: String::new(),
            lobby_selected: 0,
            history_selected: 0,
            entry_form,
            confirm_reset: false,
            should_quit: false,
            message: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(self.ui.tick_rate_ms))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Install the next session value and persist it (best-effort).
    fn apply(&mut self, next: Session) {
        self.session = next;
        self.store.persist(&self.session);
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        if self.confirm_reset {
            self.handle_confirm_key(key);
        } else if self.session.status == GameStatus::Lobby {
            self.handle_lobby_key(key);
        } else if self.session.round_entry_open {
            self.handle_entry_key(key);
        } else if self.session.history_open {
            self.handle_history_key(key);
        } else {
            self.handle_score_key(key);
        }
    }

    fn handle_lobby_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => {
                self.name_input.push(c);
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Up => {
                self.lobby_selected = self.lobby_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = self.session.players.len().saturating_sub(1);
                self.lobby_selected = (self.lobby_selected + 1).min(last);
            }
            KeyCode::Delete => {
                if let Some(player) = self.session.players.get(self.lobby_selected) {
                    let id = player.id;
                    match self.session.remove_player(id) {
                        Ok(next) => {
                            self.apply(next);
                            let last = self.session.players.len().saturating_sub(1);
                            self.lobby_selected = self.lobby_selected.min(last);
                        }
                        Err(err) => self.message = Some(err.to_string()),
                    }
                }
            }
            KeyCode::Enter => {
                if self.name_input.trim().is_empty() {
                    match self.session.start_game() {
                        Ok(next) => {
                            self.apply(next);
                            debug!(players = self.session.players.len(), "game started");
                        }
                        Err(err) => self.message = Some(err.to_string()),
                    }
                } else if self.session.players.len() >= MAX_PLAYERS {
                    self.message = Some(format!("The table is full ({MAX_PLAYERS} players)"));
                } else {
                    let next = self.session.add_player(&self.name_input, &mut self.rng);
                    self.apply(next);
                    self.name_input.clear();
                }
            }
            _ => {}
        }
    }

    fn handle_score_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.entry_form = Some(EntryForm::open(&self.session.players));
                let next = self.session.with_round_entry_open(true);
                self.apply(next);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.history_selected = 0;
                let next = self.session.with_history_open(true);
                self.apply(next);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.confirm_reset = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.entry_form = None;
                let next = self.session.with_round_entry_open(false);
                self.apply(next);
                return;
            }
            KeyCode::Enter => {
                self.submit_entries();
                return;
            }
            _ => {}
        }

        let Some(form) = self.entry_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left | KeyCode::BackTab => form.prev_player(),
            KeyCode::Right | KeyCode::Tab => form.next_player(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if c.is_ascii_digit() => form.push_digit(c),
            KeyCode::Char('-') | KeyCode::Char('+') => form.toggle_sign(),
            KeyCode::Char('c') | KeyCode::Char('C') => form.clear_active(),
            KeyCode::Char('w') | KeyCode::Char('W') => form.set_preset(PRESET_SCORES[0].1),
            KeyCode::Char('j') | KeyCode::Char('J') => form.set_preset(PRESET_SCORES[1].1),
            KeyCode::Char('h') | KeyCode::Char('H') => form.set_preset(PRESET_SCORES[2].1),
            _ => {}
        }
    }

    /// Validate the typed entries and record the round if they pass.
    fn submit_entries(&mut self) {
        let Some(form) = self.entry_form.as_ref() else {
            return;
        };

        match validate_entries(&self.session.players, form.buffers()) {
            Ok(scores) => {
                let winners = self
                    .session
                    .players
                    .iter()
                    .filter(|p| scores.get(&p.id) == Some(&0))
                    .map(|p| p.name.clone())
                    .collect::<Vec<_>>();

                let next = self.session.submit_round(&scores);
                self.apply(next);
                self.entry_form = None;
                debug!(round = self.session.round_count(), "round recorded");

                if self.ui.celebrate_wins {
                    self.message = Some(format!("🎉 Round to {}!", winners.join(" & ")));
                }
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let rounds = self.session.round_count();
        match key.code {
            KeyCode::Up => {
                self.history_selected = self.history_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if rounds > 0 {
                    self.history_selected = (self.history_selected + 1).min(rounds - 1);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                // Rows display the latest round first; map back to the
                // ledger index before deleting.
                if let Some(round_index) = rounds.checked_sub(self.history_selected + 1) {
                    match self.session.delete_round(round_index) {
                        Ok(next) => {
                            self.apply(next);
                            let left = self.session.round_count();
                            self.history_selected =
                                self.history_selected.min(left.saturating_sub(1));
                            self.message =
                                Some(format!("Round {} struck from the sheet", round_index + 1));
                        }
                        Err(err) => self.message = Some(err.to_string()),
                    }
                }
            }
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                let next = self.session.with_history_open(false);
                self.apply(next);
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        self.confirm_reset = false;
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.session = Session::new();
            self.store.discard();
            self.entry_form = None;
            self.name_input.clear();
            self.lobby_selected = 0;
            self.history_selected = 0;
            self.message = Some("Session cleared, back to the lobby".to_string());
            debug!("session reset");
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        if self.session.status == GameStatus::Lobby {
            lobby_view::render(
                frame,
                &self.session,
                &self.name_input,
                self.lobby_selected,
                &self.message,
            );
            return;
        }

        if self.session.history_open {
            history_view::render(frame, &self.session, self.history_selected, &self.message);
            return;
        }

        let message = if self.confirm_reset {
            Some(RESET_PROMPT.to_string())
        } else {
            self.message.clone()
        };
        score_view::render(frame, &self.session, &message);

        if self.session.round_entry_open {
            if let Some(form) = &self.entry_form {
                entry_view::render(frame, &self.session.players, form, &self.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("state.json"));
        let app = App::new(
            Session::new(),
            store,
            UiConfig::default(),
            StdRng::seed_from_u64(1),
        );
        (dir, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with_game() -> (TempDir, App) {
        let (dir, mut app) = app();
        type_str(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "Bert");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // empty name starts the game
        (dir, app)
    }

    #[test]
    fn test_typing_a_name_and_enter_adds_a_player() {
        let (_dir, mut app) = app();
        type_str(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.players.len(), 1);
        assert_eq!(app.session.players[0].name, "Anna");
        assert!(app.name_input.is_empty());

        // The transition was persisted.
        let stored = app.store.load().unwrap().expect("blob written");
        assert_eq!(stored, app.session);
    }

    #[test]
    fn test_start_with_one_player_is_rejected() {
        let (_dir, mut app) = app();
        type_str(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.status, GameStatus::Lobby);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_empty_enter_with_full_lobby_starts_the_game() {
        let (_dir, app) = app_with_game();
        assert_eq!(app.session.status, GameStatus::Active);
        assert_eq!(app.session.players.len(), 2);
    }

    #[test]
    fn test_delete_removes_the_selected_player() {
        let (_dir, mut app) = app();
        type_str(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "Bert");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.session.players.len(), 1);
        assert_eq!(app.session.players[0].name, "Anna");
        assert_eq!(app.lobby_selected, 0);
    }

    #[test]
    fn test_n_opens_the_entry_form() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('n'));

        assert!(app.session.round_entry_open);
        assert!(app.entry_form.is_some());
    }

    #[test]
    fn test_submitting_a_round_through_the_form() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('n'));

        // Anna stays at the initial 0; give Bert 15.
        press(&mut app, KeyCode::Right);
        type_str(&mut app, "15");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.round_count(), 1);
        assert_eq!(app.session.dealer_index, 1);
        assert_eq!(app.session.players[0].total_score, 0);
        assert_eq!(app.session.players[0].wins, 1);
        assert_eq!(app.session.players[1].total_score, 15);
        assert!(!app.session.round_entry_open);
        assert!(app.entry_form.is_none());
        assert!(app.message.as_ref().unwrap().contains("Anna"));
    }

    #[test]
    fn test_round_without_winner_is_blocked_at_the_form() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('n'));

        type_str(&mut app, "5");
        press(&mut app, KeyCode::Right);
        type_str(&mut app, "7");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.round_count(), 0);
        assert!(app.session.round_entry_open);
        assert!(app.message.as_ref().unwrap().contains("no winner"));

        // Any further key clears the banner.
        press(&mut app, KeyCode::Left);
        assert!(app.message.is_none());
    }

    #[test]
    fn test_escape_cancels_the_entry_form() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "42");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.session.round_count(), 0);
        assert!(!app.session.round_entry_open);
        assert!(app.entry_form.is_none());
    }

    #[test]
    fn test_deleting_the_latest_round_from_history() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Right);
        type_str(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('h'));
        assert!(app.session.history_open);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.session.round_count(), 0);
        assert_eq!(app.session.players[1].total_score, 0);

        press(&mut app, KeyCode::Esc);
        assert!(!app.session.history_open);
    }

    #[test]
    fn test_delete_in_empty_history_is_ignored() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.session.round_count(), 0);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.confirm_reset);

        // Anything but y keeps the session.
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.confirm_reset);
        assert_eq!(app.session.players.len(), 2);
    }

    #[test]
    fn test_confirmed_reset_discards_session_and_blob() {
        let (_dir, mut app) = app_with_game();
        assert!(app.store.load().unwrap().is_some());

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.session, Session::new());
        assert!(app.store.load().unwrap().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, mut app) = app_with_game();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let (_dir, mut app) = self::app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_rehydrated_entry_flag_rebuilds_the_form() {
        let (_dir, app) = app_with_game();
        let session = app.session.with_round_entry_open(true);

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("state.json"));
        let restored = App::new(session, store, UiConfig::default(), StdRng::seed_from_u64(2));
        assert!(restored.entry_form.is_some());
    }
}
