use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Player, PlayerId, Suit};

/// Minimum roster size required to start a game.
pub const MIN_PLAYERS: usize = 2;
/// Maximum roster size; further additions are ignored.
pub const MAX_PLAYERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Lobby,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the roster is locked once the game has started")]
    RosterLocked,

    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),

    #[error("at least {MIN_PLAYERS} players are required to start")]
    RosterTooSmall,

    #[error("round {index} does not exist ({rounds} rounds recorded)")]
    RoundOutOfRange { index: usize, rounds: usize },
}

/// The complete game state for one continuous play, from lobby to reset.
///
/// Transitions never mutate in place: each operation takes `&self` and
/// returns the next session value. The UI flags ride along in the persisted
/// blob even though they are only meaningful within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub players: Vec<Player>,
    pub status: GameStatus,
    pub dealer_index: usize,
    pub history_open: bool,
    #[serde(rename = "roundConfigOpen")]
    pub round_entry_open: bool,
}

impl Session {
    /// The empty lobby session.
    pub fn new() -> Self {
        Session {
            players: Vec::new(),
            status: GameStatus::Lobby,
            dealer_index: 0,
            history_open: false,
            round_entry_open: false,
        }
    }

    /// Number of completed rounds. All players hold the same number of
    /// entries, so the first player's ledger is authoritative.
    pub fn round_count(&self) -> usize {
        self.players.first().map_or(0, |p| p.scores.len())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Append a player to the roster. A no-op when the trimmed name is
    /// empty, the roster is full, or the game has already started; the
    /// input surface disables those paths, so they are not errors here.
    pub fn add_player(&self, name: &str, rng: &mut impl Rng) -> Session {
        let name = name.trim();
        if name.is_empty() || self.players.len() >= MAX_PLAYERS || self.status != GameStatus::Lobby
        {
            return self.clone();
        }

        let mut next = self.clone();
        next.players.push(Player::new(name, Suit::random(rng)));
        next
    }

    /// Remove a player from the lobby roster.
    pub fn remove_player(&self, id: PlayerId) -> Result<Session, SessionError> {
        if self.status != GameStatus::Lobby {
            return Err(SessionError::RosterLocked);
        }
        if self.player(id).is_none() {
            return Err(SessionError::UnknownPlayer(id));
        }

        let mut next = self.clone();
        next.players.retain(|p| p.id != id);
        Ok(next)
    }

    /// Finalize the roster and begin recording rounds.
    pub fn start_game(&self) -> Result<Session, SessionError> {
        if self.players.len() < MIN_PLAYERS {
            return Err(SessionError::RosterTooSmall);
        }

        let mut next = self.clone();
        next.status = GameStatus::Active;
        Ok(next)
    }

    /// Record one completed round and rotate the dealer.
    ///
    /// Input is validated upstream (see the entry module); this operation
    /// performs no rejection of its own. A missing entry counts as 0.
    pub fn submit_round(&self, scores: &HashMap<PlayerId, i32>) -> Session {
        if self.players.is_empty() {
            return self.clone();
        }

        let players = self
            .players
            .iter()
            .map(|p| {
                let score = scores.get(&p.id).copied().unwrap_or(0);
                let mut next = p.clone();
                next.scores.push(score);
                next.total_score += score;
                if score == 0 {
                    next.wins += 1;
                }
                next
            })
            .collect::<Vec<_>>();

        Session {
            dealer_index: (self.dealer_index + 1) % players.len(),
            players,
            round_entry_open: false,
            ..self.clone()
        }
    }

    /// Retract a recorded round from every player's ledger.
    pub fn delete_round(&self, round_index: usize) -> Result<Session, SessionError> {
        let rounds = self.round_count();
        if round_index >= rounds {
            return Err(SessionError::RoundOutOfRange {
                index: round_index,
                rounds,
            });
        }

        let players = self
            .players
            .iter()
            .map(|p| {
                let mut next = p.clone();
                let removed = next.scores.remove(round_index);
                next.total_score -= removed;
                if removed == 0 {
                    next.wins = next.wins.saturating_sub(1);
                }
                next
            })
            .collect();

        Ok(Session {
            players,
            ..self.clone()
        })
    }

    pub fn with_history_open(&self, open: bool) -> Session {
        Session {
            history_open: open,
            ..self.clone()
        }
    }

    pub fn with_round_entry_open(&self, open: bool) -> Session {
        Session {
            round_entry_open: open,
            ..self.clone()
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn lobby_with(names: &[&str]) -> Session {
        let mut rng = rng();
        names
            .iter()
            .fold(Session::new(), |s, name| s.add_player(name, &mut rng))
    }

    fn active_with(names: &[&str]) -> Session {
        lobby_with(names).start_game().unwrap()
    }

    fn scores_for(session: &Session, values: &[i32]) -> HashMap<PlayerId, i32> {
        session
            .players
            .iter()
            .zip(values)
            .map(|(p, &v)| (p.id, v))
            .collect()
    }

    #[test]
    fn test_new_session_is_empty_lobby() {
        let session = Session::new();
        assert!(session.players.is_empty());
        assert_eq!(session.status, GameStatus::Lobby);
        assert_eq!(session.dealer_index, 0);
        assert_eq!(session.round_count(), 0);
    }

    #[test]
    fn test_add_player_trims_name() {
        let session = Session::new().add_player("  Anna  ", &mut rng());
        assert_eq!(session.players.len(), 1);
        assert_eq!(session.players[0].name, "Anna");
    }

    #[test]
    fn test_add_player_ignores_blank_name() {
        let session = Session::new().add_player("   ", &mut rng());
        assert!(session.players.is_empty());
    }

    #[test]
    fn test_add_player_caps_roster_at_six() {
        let session = lobby_with(&["A", "B", "C", "D", "E", "F"]);
        assert_eq!(session.players.len(), MAX_PLAYERS);

        let overfull = session.add_player("G", &mut rng());
        assert_eq!(overfull.players.len(), MAX_PLAYERS);
    }

    #[test]
    fn test_add_player_ignored_once_active() {
        let session = active_with(&["Anna", "Bert"]);
        let next = session.add_player("Carl", &mut rng());
        assert_eq!(next.players.len(), 2);
    }

    #[test]
    fn test_remove_player_in_lobby() {
        let session = lobby_with(&["Anna", "Bert"]);
        let id = session.players[0].id;

        let next = session.remove_player(id).unwrap();
        assert_eq!(next.players.len(), 1);
        assert_eq!(next.players[0].name, "Bert");
    }

    #[test]
    fn test_remove_unknown_player_is_rejected() {
        let session = lobby_with(&["Anna"]);
        let err = session.remove_player(PlayerId::new_v4()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownPlayer(_)));
    }

    #[test]
    fn test_remove_player_rejected_once_active() {
        let session = active_with(&["Anna", "Bert"]);
        let id = session.players[0].id;
        assert_eq!(session.remove_player(id).unwrap_err(), SessionError::RosterLocked);
    }

    #[test]
    fn test_start_game_requires_two_players() {
        let session = lobby_with(&["Anna"]);
        assert_eq!(session.start_game().unwrap_err(), SessionError::RosterTooSmall);

        let session = lobby_with(&["Anna", "Bert"]);
        assert_eq!(session.start_game().unwrap().status, GameStatus::Active);
    }

    #[test]
    fn test_submit_round_updates_totals_wins_and_dealer() {
        let session = active_with(&["Anna", "Bert"]);
        let next = session.submit_round(&scores_for(&session, &[0, 15]));

        assert_eq!(next.players[0].total_score, 0);
        assert_eq!(next.players[0].wins, 1);
        assert_eq!(next.players[1].total_score, 15);
        assert_eq!(next.players[1].wins, 0);
        assert_eq!(next.dealer_index, 1);
    }

    #[test]
    fn test_submit_round_dealer_wraps_around() {
        let mut session = active_with(&["Anna", "Bert", "Carl"]);
        session.dealer_index = 2;

        let next = session.submit_round(&scores_for(&session, &[5, 0, 20]));
        assert_eq!(next.dealer_index, 0);
    }

    #[test]
    fn test_submit_round_keeps_ledgers_aligned() {
        let session = active_with(&["Anna", "Bert", "Carl"]);
        let one = session.submit_round(&scores_for(&session, &[0, 7, 12]));
        let two = one.submit_round(&scores_for(&one, &[4, 0, 9]));

        for p in &two.players {
            assert_eq!(p.scores.len(), 2);
        }
        assert_eq!(two.round_count(), 2);
    }

    #[test]
    fn test_submit_round_treats_missing_entry_as_zero() {
        let session = active_with(&["Anna", "Bert"]);
        let partial: HashMap<_, _> = [(session.players[1].id, 30)].into_iter().collect();

        let next = session.submit_round(&partial);
        assert_eq!(next.players[0].scores, vec![0]);
        assert_eq!(next.players[0].wins, 1);
        assert_eq!(next.players[1].scores, vec![30]);
    }

    #[test]
    fn test_submit_round_closes_entry_flag() {
        let session = active_with(&["Anna", "Bert"]).with_round_entry_open(true);
        let next = session.submit_round(&scores_for(&session, &[0, 10]));
        assert!(!next.round_entry_open);
    }

    #[test]
    fn test_submit_round_does_not_touch_original() {
        let session = active_with(&["Anna", "Bert"]);
        let before = session.clone();
        let _ = session.submit_round(&scores_for(&session, &[0, 10]));
        assert_eq!(session, before);
    }

    #[test]
    fn test_delete_round_rejects_bad_index() {
        let session = active_with(&["Anna", "Bert"]);
        let err = session.delete_round(0).unwrap_err();
        assert_eq!(err, SessionError::RoundOutOfRange { index: 0, rounds: 0 });

        let one = session.submit_round(&scores_for(&session, &[0, 10]));
        assert!(one.delete_round(1).is_err());
        assert!(one.delete_round(0).is_ok());
    }

    #[test]
    fn test_delete_round_reverses_totals_and_wins() {
        let session = active_with(&["Anna", "Bert"]);
        let one = session.submit_round(&scores_for(&session, &[0, 25]));
        let back = one.delete_round(0).unwrap();

        assert_eq!(back.players[0].total_score, 0);
        assert_eq!(back.players[0].wins, 0);
        assert_eq!(back.players[1].total_score, 0);
        assert_eq!(back.round_count(), 0);
    }

    #[test]
    fn test_delete_round_wins_never_go_negative() {
        let session = active_with(&["Anna", "Bert"]);
        let one = session.submit_round(&scores_for(&session, &[0, 25]));

        // Corrupt the counter on purpose; the floor must still hold.
        let mut skewed = one.clone();
        skewed.players[0].wins = 0;
        let back = skewed.delete_round(0).unwrap();
        assert_eq!(back.players[0].wins, 0);
    }

    #[test]
    fn test_delete_then_resubmit_restores_ledger() {
        let session = active_with(&["Anna", "Bert"]);
        let round = scores_for(&session, &[0, 18]);
        let one = session.submit_round(&round);

        let resubmitted = one.delete_round(0).unwrap().submit_round(&round);
        for (a, b) in resubmitted.players.iter().zip(&one.players) {
            assert_eq!(a.total_score, b.total_score);
            assert_eq!(a.wins, b.wins);
            assert_eq!(a.scores, b.scores);
        }
    }

    #[test]
    fn test_middle_round_deletion_shifts_ledger() {
        let session = active_with(&["Anna", "Bert"]);
        let one = session.submit_round(&scores_for(&session, &[0, 10]));
        let two = one.submit_round(&scores_for(&one, &[20, 0]));
        let three = two.submit_round(&scores_for(&two, &[0, 30]));

        let next = three.delete_round(1).unwrap();
        assert_eq!(next.players[0].scores, vec![0, 0]);
        assert_eq!(next.players[0].total_score, 0);
        assert_eq!(next.players[0].wins, 2);
        assert_eq!(next.players[1].scores, vec![10, 30]);
        assert_eq!(next.players[1].total_score, 40);
        assert_eq!(next.players[1].wins, 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let session = active_with(&["Anna", "Bert"]);
        let one = session.submit_round(&scores_for(&session, &[0, 12]));

        let json = serde_json::to_string(&one).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, one);
    }

    #[test]
    fn test_serde_uses_original_blob_spelling() {
        let session = lobby_with(&["Anna", "Bert"]);
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["status"], "LOBBY");
        assert!(value.get("dealerIndex").is_some());
        assert!(value.get("historyOpen").is_some());
        assert!(value.get("roundConfigOpen").is_some());
        assert!(value["players"][0].get("totalScore").is_some());
        let suit = value["players"][0]["suit"].as_str().unwrap();
        assert!(["hearts", "diamonds", "clubs", "spades"].contains(&suit));
    }
}
