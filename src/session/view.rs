//! Read-only queries over the session, recomputed on every render.

use super::{Player, PlayerId, Session};

/// Ids of the player(s) currently in the lead (lowest total — lower is
/// better in Rommé scoring). Empty while every total is still 0, so the
/// all-zero starting state shows no leader.
pub fn leaders(session: &Session) -> Vec<PlayerId> {
    if session.players.iter().all(|p| p.total_score == 0) {
        return Vec::new();
    }

    let min = session
        .players
        .iter()
        .map(|p| p.total_score)
        .min()
        .unwrap_or(0);
    session
        .players
        .iter()
        .filter(|p| p.total_score == min)
        .map(|p| p.id)
        .collect()
}

/// The player whose turn it is to deal.
pub fn dealer(session: &Session) -> Option<&Player> {
    session.players.get(session.dealer_index)
}
