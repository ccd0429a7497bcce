//! The Public State facade: `WizardGame` and `WizardState` adapt `Round` to
//! the host sequential-game framework's contract named in spec §6.
//!
//! `WizardGame` plays the role of `game.rs`'s `Game` trait's const/associated
//! surface (`NUM_PLAYERS`, `MAX_TURNS`, `DIMS`) but as plain methods on a
//! value rather than trait constants, since `(N, R)` are runtime-configured
//! here, not compiled in per concrete game type. `WizardState` is the
//! `PlayerId`/turn-tracking half, generalizing `copilot/obscuro_core.rs`'s
//! `Game` trait naming (`legal_actions`, `apply_action`, `is_terminal`) onto
//! one concrete game instead of a generic trait.

use crate::action::{self, ActionKind};
use crate::config::GameConfig;
use crate::observation;
use crate::resample::{self, UniformSampler};
use crate::round::Round;
use crate::seat::{PlayerId, Seat};

/// Game-level, immutable-after-construction facts: the validated config plus
/// the derived sizes every episode shares. Per spec §9's "no global mutable
/// state" note, this holds no observer objects of its own — the encoders in
/// `observation.rs` are pure functions of `(&GameConfig, &Round, viewpoint)`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WizardGame {
    pub config: GameConfig,
}

impl WizardGame {
    pub fn new(config: GameConfig) -> WizardGame {
        WizardGame { config }
    }

    pub fn num_players(&self) -> u8 {
        self.config.num_players
    }

    pub fn num_distinct_actions(&self) -> usize {
        self.config.num_distinct_actions()
    }

    pub fn max_chance_outcomes(&self) -> usize {
        self.config.max_chance_outcomes()
    }

    pub fn max_game_length(&self) -> usize {
        self.config.max_game_length()
    }

    pub fn min_utility(&self) -> f64 {
        self.config.min_utility()
    }

    pub fn max_utility(&self) -> f64 {
        self.config.max_utility()
    }

    pub fn observation_tensor_shape(&self) -> usize {
        observation::observation_tensor_len(&self.config)
    }

    pub fn information_state_tensor_shape(&self) -> usize {
        observation::information_state_tensor_len(&self.config)
    }

    /// Spec §6 `new_initial_state`: a fresh episode in `Dealing`.
    pub fn new_initial_state(&self) -> WizardState<'_> {
        WizardState {
            game: self,
            round: Round::new(self.config),
            action_history: Vec::new(),
        }
    }
}

/// One episode: the evolving `Round` plus the non-owning back-reference to
/// its `WizardGame` and the
/// auxiliary history of `(actor, action_id)` pairs spec §3 "Ownership"
/// assigns to the State, not the Round.
#[derive(Debug, Clone)]
pub struct WizardState<'g> {
    game: &'g WizardGame,
    round: Round,
    action_history: Vec<(PlayerId, u64)>,
}

impl<'g> WizardState<'g> {
    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn current_player(&self) -> PlayerId {
        self.round.active_player()
    }

    pub fn is_terminal(&self) -> bool {
        self.round.is_terminal()
    }

    /// Flat framework action ids legal at the current phase, ascending
    ///.
    pub fn legal_actions(&self) -> Vec<u64> {
        let guess_count = self.game.config.guess_count();
        match self.current_player() {
            PlayerId::Chance => self.round.legal_chance_indices().into_iter().map(action::encode_chance).collect(),
            PlayerId::Seat(_) => match self.round.phase {
                crate::round::Phase::Guessing { .. } => {
                    self.round.legal_guesses().into_iter().map(action::encode_guess).collect()
                }
                crate::round::Phase::Tricking { .. } => self
                    .round
                    .legal_plays()
                    .into_iter()
                    .map(|idx| action::encode_play(idx, guess_count))
                    .collect(),
                _ => unreachable!("a real seat is only active during Guessing or Tricking"),
            },
            PlayerId::Terminal => Vec::new(),
        }
    }

    /// Spec §6 `chance_outcomes`: same as `legal_actions` restricted to the
    /// Dealing phase, since every chance outcome is assumed uniform here —
    /// the weighting is the host framework's responsibility once it reads
    /// `Deck::count` itself; this engine exposes only the legal support.
    pub fn chance_outcomes(&self) -> Vec<u64> {
        match self.current_player() {
            PlayerId::Chance => self.legal_actions(),
            _ => Vec::new(),
        }
    }

    /// Apply one flat framework action id. Decodes it against
    /// the current phase, mutates `round`, and records `(actor, action)` in
    /// the auxiliary history.
    pub fn apply_action(&mut self, action_id: u64) {
        let actor = self.current_player();
        let guess_count = self.game.config.guess_count();
        match actor {
            PlayerId::Chance => {
                let idx = action::decode_chance(action_id);
                self.round.apply_chance(idx);
            }
            PlayerId::Seat(_) => match self.round.phase {
                crate::round::Phase::Guessing { .. } => {
                    let bid = action::decode_guess(action_id, self.game.config.round_nr);
                    self.round.apply_guess(bid);
                }
                crate::round::Phase::Tricking { .. } => {
                    let idx = action::decode_play(action_id, guess_count);
                    self.round.apply_play(idx);
                }
                _ => panic!("apply_action called for a real seat outside Guessing/Tricking"),
            },
            PlayerId::Terminal => panic!("apply_action called on a terminal state"),
        }
        self.action_history.push((actor, action_id));
    }

    /// Spec §6 `action_to_string`.
    pub fn action_to_string(&self, action_id: u64) -> String {
        let guess_count = self.game.config.guess_count();
        let kind = match self.current_player() {
            PlayerId::Chance => ActionKind::Chance(action::decode_chance(action_id)),
            PlayerId::Seat(_) => match self.round.phase {
                crate::round::Phase::Guessing { .. } => ActionKind::Guess(action::decode_guess(action_id, self.game.config.round_nr)),
                crate::round::Phase::Tricking { .. } => ActionKind::Play(action::decode_play(action_id, guess_count)),
                _ => unreachable!(),
            },
            PlayerId::Terminal => panic!("no action is legal on a terminal state"),
        };
        action::action_to_string(kind)
    }

    /// Spec §6 `returns`: all-zero until `Final`, the scoring
    /// formula thereafter.
    pub fn returns(&self) -> Vec<f64> {
        if self.round.is_terminal() {
            self.round.scores()
        } else {
            vec![0.0; self.game.num_players() as usize]
        }
    }

    pub fn observation_string(&self, viewpoint: Seat) -> String {
        observation::observation_string(&self.game.config, &self.round, viewpoint)
    }

    pub fn observation_tensor(&self, viewpoint: Seat) -> Vec<f32> {
        observation::observation_tensor(&self.game.config, &self.round, viewpoint)
    }

    pub fn information_state_string(&self, viewpoint: Seat) -> String {
        observation::information_state_string(&self.game.config, &self.round, viewpoint)
    }

    pub fn information_state_tensor(&self, viewpoint: Seat) -> Vec<f32> {
        let move_number = self.action_history.len() as u32;
        observation::information_state_tensor(&self.game.config, &self.round, viewpoint, move_number)
    }

    /// Spec §6 `to_string`: the current player's own symbolic information
    /// state, the closest single "whole state" rendering available without
    /// picking an arbitrary seat to leak to.
    pub fn to_string_repr(&self) -> String {
        match self.current_player() {
            PlayerId::Seat(seat) => self.information_state_string(seat),
            _ => format!(
                "phase: {:?}\ntricks_so_far: {:?}\nguesses: {:?}",
                phase_tag(&self.round),
                self.round.tricks_won,
                self.round.guessed
            ),
        }
    }

    /// Spec §4.7 `resample_from_infostate`: draw a full world consistent
    /// with `viewpoint`'s information, returning an independent `WizardState`
    /// with the same action history (the history is public/replayed exactly,
    /// not resampled — only the hidden hands and deck order are).
    pub fn resample_from_infostate(&self, viewpoint: Seat, sampler: &mut impl UniformSampler) -> WizardState<'g> {
        let round = resample::resample_from_infostate(&self.round, viewpoint, sampler);
        WizardState { game: self.game, round, action_history: self.action_history.clone() }
    }

    /// Deep, independent clone: every field here already owns its
    /// data (or, for `game`, is a plain shared immutable reference), so a
    /// structural clone is already a deep copy with no aliasing.
    pub fn deep_clone(&self) -> WizardState<'g> {
        self.clone()
    }
}

fn phase_tag(round: &Round) -> &'static str {
    match round.phase {
        crate::round::Phase::Dealing { .. } => "Dealing",
        crate::round::Phase::Guessing { .. } => "Guessing",
        crate::round::Phase::Tricking { .. } => "Tricking",
        crate::round::Phase::Final => "Final",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewardMode;

    fn play_full_episode(state: &mut WizardState) {
        while !state.is_terminal() {
            let action = state.legal_actions()[0];
            state.apply_action(action);
        }
    }

    #[test]
    fn new_initial_state_starts_in_dealing_with_nonempty_legal_actions() {
        let game = WizardGame::new(GameConfig::new(4, 3, 0, RewardMode::Normal));
        let state = game.new_initial_state();
        assert!(!state.is_terminal());
        assert_eq!(state.current_player(), PlayerId::Chance);
        assert!(!state.legal_actions().is_empty());
    }

    #[test]
    fn legal_actions_nonempty_iff_not_terminal() {
        let game = WizardGame::new(GameConfig::new(3, 2, 0, RewardMode::Normal));
        let mut state = game.new_initial_state();
        while !state.is_terminal() {
            assert!(!state.legal_actions().is_empty());
            let action = state.legal_actions()[0];
            state.apply_action(action);
        }
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn returns_are_zero_until_terminal_then_within_utility_bounds() {
        let game = WizardGame::new(GameConfig::new(4, 2, 0, RewardMode::Normal));
        let mut state = game.new_initial_state();
        assert_eq!(state.returns(), vec![0.0; 4]);
        play_full_episode(&mut state);
        let returns = state.returns();
        for &r in &returns {
            assert!(r >= game.min_utility() && r <= game.max_utility());
        }
    }

    #[test]
    fn tensor_lengths_match_declared_shapes() {
        let game = WizardGame::new(GameConfig::new(5, 3, 0, RewardMode::Normal));
        let state = game.new_initial_state();
        assert_eq!(state.observation_tensor(Seat(0)).len(), game.observation_tensor_shape());
        assert_eq!(state.information_state_tensor(Seat(0)).len(), game.information_state_tensor_shape());
    }

    #[test]
    fn action_to_string_matches_card_labels_during_dealing() {
        let game = WizardGame::new(GameConfig::new(4, 1, 0, RewardMode::Normal));
        let state = game.new_initial_state();
        let action = state.legal_actions()[0];
        let label = state.action_to_string(action);
        assert!(label.starts_with('['));
        assert!(label.ends_with(']'));
    }

    #[test]
    fn determinism_replaying_same_actions_yields_identical_state() {
        let game = WizardGame::new(GameConfig::new(3, 1, 0, RewardMode::Normal));
        let mut a = game.new_initial_state();
        let mut actions = Vec::new();
        while !a.is_terminal() {
            let act = a.legal_actions()[0];
            actions.push(act);
            a.apply_action(act);
        }
        let mut b = game.new_initial_state();
        for act in actions {
            b.apply_action(act);
        }
        assert_eq!(a.round, b.round);
        assert_eq!(a.action_history, b.action_history);
    }

    #[test]
    fn to_string_repr_reflects_current_phase_and_player() {
        let game = WizardGame::new(GameConfig::new(4, 2, 0, RewardMode::Normal));
        let mut state = game.new_initial_state();
        assert!(state.to_string_repr().contains("phase: Dealing"));
        while !matches!(state.current_player(), PlayerId::Seat(_)) {
            let action = state.legal_actions()[0];
            state.apply_action(action);
        }
        let PlayerId::Seat(seat) = state.current_player() else { unreachable!() };
        assert_eq!(state.to_string_repr(), state.information_state_string(seat));
    }

    #[test]
    fn deep_clone_is_independent_of_the_original() {
        let game = WizardGame::new(GameConfig::new(3, 2, 0, RewardMode::Normal));
        let mut original = game.new_initial_state();
        for _ in 0..3 {
            let action = original.legal_actions()[0];
            original.apply_action(action);
        }
        let mut cloned = original.deep_clone();
        assert_eq!(cloned.round, original.round);
        assert_eq!(cloned.action_history, original.action_history);

        let action = cloned.legal_actions()[0];
        cloned.apply_action(action);
        assert_ne!(cloned.round, original.round);
        assert_ne!(cloned.action_history.len(), original.action_history.len());
    }
}
