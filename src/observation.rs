//! Symbolic-string and dense-tensor observation encoders, in both the
//! perfect-recall (information state) and Markov (observation) modes
//!.
//!
//! The flat-`Vec<f32>`-with-fixed-offset-blocks shape is kept from the
//! disabled tensor-encoding code in `games/liars_die.rs`'s `neural` module
//! (`encode_public`/`encode_private`: one-hot segments at fixed offsets);
//! what's dropped is the neural-network consumption of it, out of scope per
//! spec.md §1.

use crate::card::{Card, Color};
use crate::config::GameConfig;
use crate::round::{Phase, Round};
use crate::seat::Seat;
use std::fmt::Write as _;

fn trump_one_hot(suit: Option<Color>) -> [f32; 4] {
    let mut row = [0.0f32; 4];
    if let Some(color) = suit {
        let idx = match color {
            Color::Blue => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::White => unreachable!("trump suit is never White; no-trump is encoded as None"),
        };
        row[idx] = 1.0;
    }
    row
}

fn write_card_row(out: &mut Vec<f32>, card: Option<Card>) {
    let mut row = [0.0f32; 54];
    if let Some(c) = card {
        row[c.to_index() as usize] = 1.0;
    }
    out.extend_from_slice(&row);
}

fn common_tensor(config: &GameConfig, round: &Round, viewpoint: Seat) -> Vec<f32> {
    let n = config.num_players as usize;
    let mut out = Vec::with_capacity(n + 54 + 1 + 4 + n);

    // Seat one-hot.
    let mut seat_onehot = vec![0.0f32; n];
    seat_onehot[viewpoint.index()] = 1.0;
    out.extend_from_slice(&seat_onehot);

    // Private hand, as per-index counts in {0,1,2,3,4}.
    let mut hand_counts = [0.0f32; 54];
    for card in round.hands[viewpoint.index()].iter_cards() {
        hand_counts[card.to_index() as usize] += 1.0;
    }
    out.extend_from_slice(&hand_counts);

    // Round number.
    out.push(config.round_nr as f32);

    // Trump one-hot (zero vector means no trump).
    let suit = round.trump.as_ref().and_then(|t| t.suit);
    out.extend_from_slice(&trump_one_hot(suit));

    // Guessed tricks per seat (0.0 if not yet guessed).
    for p in 0..n {
        out.push(round.guessed[p].unwrap_or(0) as f32);
    }

    out
}

/// Length of [`observation_tensor`]'s output for a fixed `(N, R)` — tensor
/// shapes are fixed per spec §4.6 and must match this exactly.
pub fn observation_tensor_len(config: &GameConfig) -> usize {
    let n = config.num_players as usize;
    (n + 54 + 1 + 4 + n) + n + n * 54
}

/// Length of [`information_state_tensor`]'s output for a fixed `(N, R)`.
pub fn information_state_tensor_len(config: &GameConfig) -> usize {
    let n = config.num_players as usize;
    let r = config.round_nr as usize;
    (n + 54 + 1 + 4 + n) + 1 + (n * r) * 54
}

/// Dense Markov observation tensor: common block + current
/// tricks-won-per-seat + the current table as an `N x 54` matrix (row i =
/// the card seat i has played this trick, zero row if not yet played).
pub fn observation_tensor(config: &GameConfig, round: &Round, viewpoint: Seat) -> Vec<f32> {
    let n = config.num_players as usize;
    let mut out = common_tensor(config, round, viewpoint);

    for p in 0..n {
        out.push(round.tricks_won[p] as f32);
    }

    let mut table_rows: Vec<Option<Card>> = vec![None; n];
    for &(seat, card) in &round.table {
        table_rows[seat.index()] = Some(card);
    }
    for row in table_rows {
        write_card_row(&mut out, row);
    }

    debug_assert_eq!(out.len(), observation_tensor_len(config));
    out
}

/// Dense perfect-recall information-state tensor: common block +
/// `move_number` + every play so far, row-ordered by play sequence, as an
/// `(N*R) x 54` matrix (unplayed rows are zero).
pub fn information_state_tensor(config: &GameConfig, round: &Round, viewpoint: Seat, move_number: u32) -> Vec<f32> {
    let n = config.num_players as usize;
    let r = config.round_nr as usize;
    let mut out = common_tensor(config, round, viewpoint);

    out.push(move_number as f32);

    let plays: Vec<Card> = round.history_played.iter().chain(round.table.iter()).map(|&(_, c)| c).collect();
    for i in 0..(n * r) {
        write_card_row(&mut out, plays.get(i).copied());
    }

    debug_assert_eq!(out.len(), information_state_tensor_len(config));
    out
}

fn phase_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Dealing { .. } => "Dealing",
        Phase::Guessing { .. } => "Guessing",
        Phase::Tricking { .. } => "Tricking",
        Phase::Final => "Final",
    }
}

fn legal_action_labels(round: &Round) -> Vec<String> {
    match round.phase {
        Phase::Dealing { .. } => round.legal_chance_indices().into_iter().map(|i| Card::from_index(i).label()).collect(),
        Phase::Guessing { .. } => round.legal_guesses().into_iter().map(|n| n.to_string()).collect(),
        Phase::Tricking { .. } => round.legal_plays().into_iter().map(|i| Card::from_index(i).label()).collect(),
        Phase::Final => Vec::new(),
    }
}

fn write_common_lines(out: &mut String, config: &GameConfig, round: &Round, viewpoint: Seat) {
    let _ = writeln!(out, "seat: {}", viewpoint.index());
    let _ = writeln!(out, "current_player: {:?}", round.active_player());
    let _ = writeln!(out, "round: {}", config.round_nr);
    let _ = writeln!(out, "num_players: {}", config.num_players);
    let _ = writeln!(out, "guesses: {:?}", round.guessed);
    let _ = writeln!(out, "tricks_so_far: {:?}", round.tricks_won);
    let _ = writeln!(out, "phase: {}", phase_name(&round.phase));
    let _ = writeln!(
        out,
        "trump: {}",
        round.trump.as_ref().map(|t| t.card.label()).unwrap_or_else(|| "none-yet".to_string())
    );
    let table: Vec<String> = round.table.iter().map(|&(s, c)| format!("{}:{}", s.index(), c.label())).collect();
    let _ = writeln!(out, "table: [{}]", table.join(", "));
    let hand: Vec<String> = round.hands[viewpoint.index()].iter_cards().map(|c| c.label()).collect();
    let _ = writeln!(out, "hand: [{}]", hand.join(", "));
    let _ = writeln!(out, "legal_actions: [{}]", legal_action_labels(round).join(", "));
}

/// Symbolic Markov observation string.
pub fn observation_string(config: &GameConfig, round: &Round, viewpoint: Seat) -> String {
    let mut out = String::new();
    write_common_lines(&mut out, config, round, viewpoint);
    out
}

/// Symbolic perfect-recall information-state string: the
/// observation string plus the full play history.
pub fn information_state_string(config: &GameConfig, round: &Round, viewpoint: Seat) -> String {
    let mut out = String::new();
    write_common_lines(&mut out, config, round, viewpoint);
    let history: Vec<String> = round.history_played.iter().map(|&(s, c)| format!("{}:{}", s.index(), c.label())).collect();
    let _ = writeln!(out, "history: [{}]", history.join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewardMode;

    #[test]
    fn tensor_lengths_match_declared_shapes() {
        let config = GameConfig::new(4, 3, 0, RewardMode::Normal);
        let round = Round::new(config);
        let obs = observation_tensor(&config, &round, Seat(0));
        assert_eq!(obs.len(), observation_tensor_len(&config));
        let info = information_state_tensor(&config, &round, Seat(0), 0);
        assert_eq!(info.len(), information_state_tensor_len(&config));
    }

    #[test]
    fn no_trump_encodes_as_zero_vector() {
        let config = GameConfig::new(3, 20, 0, RewardMode::Normal);
        let mut round = Round::new(config);
        while let Phase::Dealing { .. } = round.phase {
            let choice = round.legal_chance_indices()[0];
            round.apply_chance(choice);
        }
        let common_offset = 3 + 54 + 1; // seat + hand + round number
        let tensor = observation_tensor(&config, &round, Seat(0));
        assert_eq!(&tensor[common_offset..common_offset + 4], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn observation_string_lists_legal_actions_for_current_phase() {
        let config = GameConfig::new(4, 2, 0, RewardMode::Normal);
        let round = Round::new(config);
        let s = observation_string(&config, &round, Seat(0));
        assert!(s.contains("phase: Dealing"));
        assert!(s.contains("legal_actions:"));
    }
}
