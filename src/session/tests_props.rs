//! Property tests over arbitrary round sequences: the ledger bookkeeping
//! must stay consistent no matter which rounds are played or retracted.

use std::collections::HashMap;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{PlayerId, Session};

/// A played round: one score per player, with the winner forced to 0.
fn round_strategy(player_count: usize) -> impl Strategy<Value = Vec<i32>> {
    (
        prop::collection::vec(-50..300i32, player_count),
        0..player_count,
    )
        .prop_map(|(mut scores, winner)| {
            scores[winner] = 0;
            scores
        })
}

fn rounds_strategy(player_count: usize) -> impl Strategy<Value = Vec<Vec<i32>>> {
    prop::collection::vec(round_strategy(player_count), 0..12)
}

fn active_session(player_count: usize) -> Session {
    let mut rng = StdRng::seed_from_u64(11);
    let names = ["Anna", "Bert", "Carl", "Dora", "Emil", "Frida"];
    names[..player_count]
        .iter()
        .fold(Session::new(), |s, name| s.add_player(name, &mut rng))
        .start_game()
        .expect("roster is large enough")
}

fn score_map(session: &Session, values: &[i32]) -> HashMap<PlayerId, i32> {
    session
        .players
        .iter()
        .zip(values)
        .map(|(p, &v)| (p.id, v))
        .collect()
}

fn play(session: Session, rounds: &[Vec<i32>]) -> Session {
    rounds
        .iter()
        .fold(session, |s, round| s.submit_round(&score_map(&s, round)))
}

fn assert_ledger_consistent(session: &Session) {
    let rounds = session.round_count();
    for p in &session.players {
        assert_eq!(p.scores.len(), rounds, "ledger lengths diverged");
        assert_eq!(
            p.total_score,
            p.scores.iter().sum::<i32>(),
            "total out of sync for {}",
            p.name
        );
        assert_eq!(
            p.wins as usize,
            p.scores.iter().filter(|s| **s == 0).count(),
            "win count out of sync for {}",
            p.name
        );
    }
    if !session.players.is_empty() {
        assert!(session.dealer_index < session.players.len());
    }
}

fn roster_and_rounds() -> impl Strategy<Value = (usize, Vec<Vec<i32>>)> {
    (2..=6usize).prop_flat_map(|n| (Just(n), rounds_strategy(n)))
}

proptest! {
    #[test]
    fn prop_totals_and_wins_track_the_ledger((player_count, rounds) in roster_and_rounds()) {
        let session = play(active_session(player_count), &rounds);
        assert_ledger_consistent(&session);
        prop_assert_eq!(session.round_count(), rounds.len());
    }

    #[test]
    fn prop_dealer_rotates_once_per_round(rounds in rounds_strategy(3)) {
        let session = play(active_session(3), &rounds);
        prop_assert_eq!(session.dealer_index, rounds.len() % 3);
    }

    #[test]
    fn prop_delete_keeps_ledger_consistent(
        rounds in prop::collection::vec(round_strategy(4), 1..10),
        index in any::<prop::sample::Index>(),
    ) {
        let full = play(active_session(4), &rounds);
        let victim = index.index(rounds.len());

        let next = full.delete_round(victim).expect("index is in range");
        assert_ledger_consistent(&next);
        prop_assert_eq!(next.round_count(), rounds.len() - 1);
    }

    #[test]
    fn prop_delete_then_resubmit_is_identity_on_last_round(
        rounds in prop::collection::vec(round_strategy(3), 1..8),
    ) {
        let full = play(active_session(3), &rounds);
        let last = rounds.len() - 1;

        let replayed = full
            .delete_round(last)
            .expect("index is in range")
            .submit_round(&score_map(&full, &rounds[last]));

        prop_assert_eq!(replayed.players, full.players);
    }

    #[test]
    fn prop_serde_round_trips(rounds in rounds_strategy(2)) {
        let session = play(active_session(2), &rounds);
        let json = serde_json::to_string(&session).expect("session serializes");
        let restored: Session = serde_json::from_str(&json).expect("session deserializes");
        prop_assert_eq!(restored, session);
    }
}
