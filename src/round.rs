//! The Round state machine: phases, legal-action derivation, phase
//! transitions, trick resolution, and scoring.
//!
//! `Phase` is a tagged enum with per-phase payload, per the §9 design note:
//! this is the generalization of `games/AKQ.rs`'s `PublicState` enum (a
//! hand-rolled phase/history state machine whose variant alone determines
//! whose turn it is and what's legal) from a closed 9-state betting tree to
//! Wizard's four open-ended phases.

use crate::card::{compare, Card, Color, Winner};
use crate::config::{GameConfig, RewardMode};
use crate::deck::Deck;
use crate::hand::Hand;
use crate::seat::{PlayerId, Seat};

/// The trump card and the suit it sets, if any. `suit == None` means the
/// White sentinel was drawn (Jester or Wizard) — no trump suit this round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Trump {
    pub card: Card,
    pub suit: Option<Color>,
}

/// Dealing → Guessing → Tricking → Final. Querying `trump` while `Dealing`,
/// or `guessed`/`table` fields meaningful only to later phases, is made
/// unrepresentable by keeping each phase's turn-tracking fields local to its
/// own variant instead of a flat struct with an integer phase tag.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    Dealing { deal_to: Seat, dealt: u16 },
    Guessing { turn: Seat, stop_turn: Seat },
    Tricking { turn: Seat, stop_turn: Seat, lead: Seat },
    Final,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Round {
    pub config: GameConfig,
    pub phase: Phase,
    pub hands: Vec<Hand>,
    pub deck: Deck,
    pub trump: Option<Trump>,
    pub guessed: Vec<Option<u8>>,
    pub tricks_won: Vec<u8>,
    pub table: Vec<(Seat, Card)>,
    pub history_played: Vec<(Seat, Card)>,
    pub tricks_completed: u8,
}

impl Round {
    pub fn new(config: GameConfig) -> Round {
        let n = config.num_players as usize;
        log::debug!("new round: {} players, round_nr={}", config.num_players, config.round_nr);
        Round {
            phase: Phase::Dealing { deal_to: Seat(config.start_player), dealt: 0 },
            hands: vec![Hand::new(); n],
            deck: Deck::new(),
            trump: None,
            guessed: vec![None; n],
            tricks_won: vec![0; n],
            table: Vec::new(),
            history_played: Vec::new(),
            tricks_completed: 0,
            config,
        }
    }

    fn n(&self) -> u8 {
        self.config.num_players
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Final)
    }

    pub fn active_player(&self) -> PlayerId {
        match self.phase {
            Phase::Dealing { .. } => PlayerId::Chance,
            Phase::Guessing { turn, .. } => PlayerId::Seat(turn),
            Phase::Tricking { turn, .. } => PlayerId::Seat(turn),
            Phase::Final => PlayerId::Terminal,
        }
    }

    fn cards_per_hand(&self) -> u16 {
        self.config.num_players as u16 * self.config.round_nr as u16
    }

    // ---------- Dealing ----------

    /// All card indices legal as the next chance outcome. The single exception: when the trump draw falls on an
    /// empty deck (the final round, all 60 cards already in hands), the
    /// only legal outcome is the Jester index (0), a no-trump sentinel that
    /// does not touch the deck.
    pub fn legal_chance_indices(&self) -> Vec<u8> {
        let Phase::Dealing { dealt, .. } = self.phase else {
            panic!("legal_chance_indices called outside Dealing");
        };
        if dealt < self.cards_per_hand() || self.deck.remaining() > 0 {
            self.deck.present_indices()
        } else {
            vec![0]
        }
    }

    /// Apply one chance outcome during Dealing. Either deals a
    /// card into the current `deal_to` hand, or — once all hands are full —
    /// sets `trump` and transitions to Guessing.
    pub fn apply_chance(&mut self, index: u8) {
        let Phase::Dealing { deal_to, dealt } = self.phase else {
            panic!("apply_chance called outside Dealing");
        };
        log::trace!("apply_chance({index}) deal_to={deal_to:?} dealt={dealt}");
        if dealt < self.cards_per_hand() {
            let card = self.deck.deal(index);
            self.hands[deal_to.index()].add(card);
            let next_dealt = dealt + 1;
            self.phase = Phase::Dealing { deal_to: deal_to.next(self.n()), dealt: next_dealt };
        } else {
            let trump = if self.deck.remaining() == 0 {
                assert_eq!(index, 0, "forced no-trump draw must use the Jester index");
                Trump { card: Card::jester(), suit: None }
            } else {
                let card = self.deck.deal(index);
                let suit = if card.color == Color::White { None } else { Some(card.color) };
                Trump { card, suit }
            };
            log::debug!("dealing complete, trump={:?}", trump);
            self.trump = Some(trump);
            let start = Seat(self.config.start_player);
            self.phase = Phase::Guessing { turn: start, stop_turn: start.prev(self.n()) };
        }
    }

    // ---------- Guessing ----------

    /// Legal bids `[0, R]`, minus the hook-rule exclusion for the last
    /// bidder.
    pub fn legal_guesses(&self) -> Vec<u8> {
        let Phase::Guessing { turn, stop_turn } = self.phase else {
            panic!("legal_guesses called outside Guessing");
        };
        let mut options: Vec<u8> = (0..=self.config.round_nr).collect();
        if turn == stop_turn {
            let already: u32 = self.guessed.iter().flatten().map(|&g| g as u32).sum();
            options.retain(|&bid| already + bid as u32 != self.config.round_nr as u32);
        }
        options
    }

    /// Record a bid; advance to the next bidder, or to Tricking if this was
    /// the last.
    pub fn apply_guess(&mut self, n: u8) {
        let Phase::Guessing { turn, stop_turn } = self.phase else {
            panic!("apply_guess called outside Guessing");
        };
        assert!(self.legal_guesses().contains(&n), "illegal guess {n} for seat {turn:?}");
        self.guessed[turn.index()] = Some(n);
        log::trace!("apply_guess({n}) by {turn:?}");
        if turn == stop_turn {
            log::debug!("guessing complete, guessed={:?}", self.guessed);
            let start = Seat(self.config.start_player);
            self.phase = Phase::Tricking { turn: start, stop_turn: start.prev(self.n()), lead: start };
        } else {
            self.phase = Phase::Guessing { turn: turn.next(self.n()), stop_turn };
        }
    }

    // ---------- Tricking ----------

    fn lead_color(&self) -> Option<Color> {
        self.table.iter().map(|(_, c)| *c).find(|c| !c.is_jester()).map(|c| c.color)
    }

    /// Legal card plays under the lead-color rule.
    pub fn legal_plays(&self) -> Vec<u8> {
        let Phase::Tricking { turn, .. } = self.phase else {
            panic!("legal_plays called outside Tricking");
        };
        let hand = &self.hands[turn.index()];
        match self.lead_color() {
            None => hand.distinct_indices().collect(),
            Some(lead) => {
                let has_lead = hand.distinct_indices().any(|i| Card::from_index(i).color == lead);
                if has_lead {
                    hand.distinct_indices()
                        .filter(|&i| {
                            let c = Card::from_index(i).color;
                            c == lead || c == Color::White
                        })
                        .collect()
                } else {
                    hand.distinct_indices().collect()
                }
            }
        }
    }

    /// Play a card; resolve the trick if this closes it.
    pub fn apply_play(&mut self, card_index: u8) {
        let Phase::Tricking { turn, stop_turn, .. } = self.phase else {
            panic!("apply_play called outside Tricking");
        };
        assert!(self.legal_plays().contains(&card_index), "illegal play {card_index} for seat {turn:?}");
        let card = Card::from_index(card_index);
        self.hands[turn.index()].remove(card);
        self.table.push((turn, card));
        log::trace!("apply_play({card}) by {turn:?}");
        if turn == stop_turn {
            self.resolve_trick();
        } else {
            let Phase::Tricking { lead, .. } = self.phase else { unreachable!() };
            self.phase = Phase::Tricking { turn: turn.next(self.n()), stop_turn, lead };
        }
    }

    fn resolve_trick(&mut self) {
        let trump_suit = self.trump.as_ref().expect("trump must be set before tricking").suit;
        let mut best_idx = 0usize;
        let mut best_card = self.table[0].1;
        for (i, &(_, challenger)) in self.table.iter().enumerate().skip(1) {
            if compare(best_card, challenger, trump_suit) == Winner::Challenger {
                best_card = challenger;
                best_idx = i;
            }
        }
        let winner = self.table[best_idx].0;
        self.tricks_won[winner.index()] += 1;
        self.history_played.extend(self.table.drain(..));
        self.tricks_completed += 1;
        log::debug!("trick resolved: winner={winner:?} tricks_completed={}", self.tricks_completed);
        if self.tricks_completed == self.config.round_nr {
            self.phase = Phase::Final;
        } else {
            self.phase = Phase::Tricking { turn: winner, stop_turn: winner.prev(self.n()), lead: winner };
        }
    }

    // ---------- Scoring ----------

    /// Per-seat score at termination. Panics if called before
    /// `Final` — returns for a non-terminal state are the framework facade's
    /// responsibility (all-zero vector), not this method's.
    pub fn scores(&self) -> Vec<f64> {
        assert!(self.is_terminal(), "scores() called before the round is Final");
        (0..self.n() as usize)
            .map(|p| {
                let tricks = self.tricks_won[p];
                let guessed = self.guessed[p].expect("every seat must have guessed by Final");
                let diff = (tricks as i32 - guessed as i32).abs();
                let normal = if diff == 0 { 20.0 + 10.0 * tricks as f64 } else { -10.0 * diff as f64 };
                match self.config.reward_mode {
                    RewardMode::Normal => normal,
                    RewardMode::Binary => {
                        if normal > 0.0 {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                }
            })
            .collect()
    }

    /// Card-conservation invariant: every card is in exactly one
    /// of hands / history / table / deck / trump.
    pub fn cards_accounted_for(&self) -> u32 {
        let hands: u32 = self.hands.iter().map(|h| h.len() as u32).sum();
        let history = self.history_played.len() as u32;
        let table = self.table.len() as u32;
        let deck = self.deck.remaining();
        let trump = if self.trump.is_some() { 1 } else { 0 };
        hands + history + table + deck + trump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn deal_full_round(round: &mut Round) {
        while let Phase::Dealing { .. } = round.phase {
            let choice = round.legal_chance_indices()[0];
            round.apply_chance(choice);
        }
    }

    #[test]
    fn dealing_fills_every_hand_to_round_nr_then_sets_trump() {
        let cfg = GameConfig::new(4, 3, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        deal_full_round(&mut round);
        assert!(round.trump.is_some());
        for hand in &round.hands {
            assert_eq!(hand.len(), 3);
        }
        assert!(matches!(round.phase, Phase::Guessing { .. }));
    }

    #[test]
    fn final_round_with_empty_deck_forces_no_trump() {
        // N=3, R=20 => N*R = 60, the entire deck is dealt to hands leaving
        // nothing for a real trump draw.
        let cfg = GameConfig::new(3, 20, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        deal_full_round(&mut round);
        assert_eq!(round.deck.remaining(), 0);
        let trump = round.trump.unwrap();
        assert!(trump.card.is_jester());
        assert_eq!(trump.suit, None);
    }

    #[test]
    fn hook_rule_forbids_last_bidder_matching_round_total() {
        let cfg = GameConfig::new(3, 1, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        deal_full_round(&mut round);
        round.apply_guess(1);
        round.apply_guess(0);
        // Sum so far is 1; the round has only 1 trick, so the last bidder
        // may not also bid 0 (which would keep the total at 1 == R).
        assert_eq!(round.legal_guesses(), vec![1]);
    }

    #[test]
    fn trick_winner_becomes_next_lead_and_stop_turn_tracks_it() {
        let cfg = GameConfig::new(3, 1, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        deal_full_round(&mut round);
        for _ in 0..3 {
            let bid = round.legal_guesses()[0];
            round.apply_guess(bid);
        }
        let mut winner_before = None;
        for _ in 0..3 {
            let Phase::Tricking { turn, .. } = round.phase else { panic!("expected Tricking") };
            winner_before = Some(turn);
            let play = round.legal_plays()[0];
            round.apply_play(play);
        }
        assert!(round.is_terminal());
        assert_eq!(round.tricks_won.iter().sum::<u8>(), 1);
        let _ = winner_before;
    }

    #[test]
    fn scores_match_formula_on_exact_guess_and_miss() {
        let cfg = GameConfig::new(3, 1, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        deal_full_round(&mut round);
        for _ in 0..3 {
            let bid = round.legal_guesses()[0];
            round.apply_guess(bid);
        }
        while !round.is_terminal() {
            let play = round.legal_plays()[0];
            round.apply_play(play);
        }
        let scores = round.scores();
        for p in 0..3 {
            let tricks = round.tricks_won[p];
            let guessed = round.guessed[p].unwrap();
            if tricks == guessed {
                assert_eq!(scores[p], 20.0 + 10.0 * tricks as f64);
            } else {
                assert_eq!(scores[p], -10.0 * (tricks as i32 - guessed as i32).abs() as f64);
            }
        }
    }

    #[test]
    fn card_conservation_holds_throughout_a_full_round() {
        let cfg = GameConfig::new(4, 2, 0, RewardMode::Normal);
        let mut round = Round::new(cfg);
        assert_eq!(round.cards_accounted_for(), 60);
        deal_full_round(&mut round);
        assert_eq!(round.cards_accounted_for(), 60);
        for _ in 0..4 {
            let bid = round.legal_guesses()[0];
            round.apply_guess(bid);
        }
        while !round.is_terminal() {
            let play = round.legal_plays()[0];
            round.apply_play(play);
            assert_eq!(round.cards_accounted_for(), 60);
        }
    }
}
