//! Translation between the framework-facing flat action-id space (spec
//! §4.2) and the domain values `Round` actually operates on (card indices,
//! bid counts). `Round` itself never sees an offset action id — this
//! module, and `state.rs` above it, own that encoding, matching the
//! "Public State facade adapts Round to the framework contract" split in
//! spec §2.

use crate::card::Card;

/// A decoded framework action, tagged by which sub-range of the flat action
/// space it fell in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ActionKind {
    /// A chance outcome during Dealing: one of the 54 card indices.
    Chance(u8),
    /// A bid during Guessing: a count in `[0, R]`.
    Guess(u8),
    /// A card play during Tricking: the card's index.
    Play(u8),
}

/// Encode a chance (Dealing) action: the card index itself.
pub fn encode_chance(card_index: u8) -> u64 {
    card_index as u64
}

/// Encode a guess (Guessing) action: the raw bid, unshifted.
pub fn encode_guess(bid: u8) -> u64 {
    bid as u64
}

/// Encode a card-play (Tricking) action: `card_index + guess_count`.
pub fn encode_play(card_index: u8, guess_count: u8) -> u64 {
    card_index as u64 + guess_count as u64
}

/// Decode a flat action id, given which phase it was produced in (the flat
/// id alone is ambiguous between a Guess and a Play — the phase disambiguates
/// it, exactly as the active player/phase disambiguates it for `Round`).
pub fn decode_chance(action: u64) -> u8 {
    assert!(action < 54, "chance action out of range: {action}");
    action as u8
}

pub fn decode_guess(action: u64, round_nr: u8) -> u8 {
    assert!(action <= round_nr as u64, "guess action out of range: {action}");
    action as u8
}

pub fn decode_play(action: u64, guess_count: u8) -> u8 {
    assert!(action >= guess_count as u64, "play action below the card-index offset: {action}");
    let card_index = action - guess_count as u64;
    assert!(card_index < 54, "play action decodes to an out-of-range card index: {card_index}");
    card_index as u8
}

/// `action_to_string`: card labels for chance/play actions
/// (`[B7]`, `[W14]`, `[W0]`), the decimal bid for guesses.
pub fn action_to_string(kind: ActionKind) -> String {
    match kind {
        ActionKind::Chance(idx) => Card::from_index(idx).label(),
        ActionKind::Guess(n) => n.to_string(),
        ActionKind::Play(idx) => Card::from_index(idx).label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_action_round_trips_through_the_offset() {
        let guess_count = 4; // round_nr = 3
        let encoded = encode_play(17, guess_count);
        assert_eq!(decode_play(encoded, guess_count), 17);
    }

    #[test]
    fn action_to_string_matches_spec_examples() {
        assert_eq!(action_to_string(ActionKind::Chance(Card::wizard().to_index())), "[W14]");
        assert_eq!(action_to_string(ActionKind::Chance(Card::jester().to_index())), "[W0]");
        assert_eq!(action_to_string(ActionKind::Guess(3)), "3");
    }
}
