//! Round entry validation: turns the free-form per-player text typed into
//! the score form into a score map the session can record.

use std::collections::HashMap;

use crate::session::{Player, PlayerId};

/// Quick-entry presets offered by the score form.
pub const PRESET_SCORES: [(&str, i32); 3] = [("Win", 0), ("Joker", -10), ("High", 100)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("missing score for {name}")]
    Missing { name: String },

    #[error("'{value}' is not a valid score for {name}")]
    Invalid { name: String, value: String },

    #[error("no winner: one player must score exactly 0")]
    NoWinner,
}

/// Validate one raw entry per player and produce the score map for
/// `Session::submit_round`.
///
/// Players are checked in roster order and the first per-player problem is
/// reported. The no-winner check only runs after every player has passed,
/// so a malformed entry always takes priority over a missing winner.
pub fn validate_entries(
    players: &[Player],
    raw: &HashMap<PlayerId, String>,
) -> Result<HashMap<PlayerId, i32>, EntryError> {
    let mut scores = HashMap::with_capacity(players.len());
    let mut has_winner = false;

    for player in players {
        let value = raw.get(&player.id).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() || value == "-" || value == "+" {
            return Err(EntryError::Missing {
                name: player.name.clone(),
            });
        }

        let score: i32 = value.parse().map_err(|_| EntryError::Invalid {
            name: player.name.clone(),
            value: value.to_string(),
        })?;

        if score == 0 {
            has_winner = true;
        }
        scores.insert(player.id, score);
    }

    if !has_winner {
        return Err(EntryError::NoWinner);
    }
    Ok(scores)
}
