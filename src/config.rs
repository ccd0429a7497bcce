//! Game configuration: the fixed parameters of one episode plus the
//! derived action-space sizes and utility bounds.

/// `Normal` applies the point formula directly; `Binary` collapses it to its
/// sign.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RewardMode {
    Normal,
    Binary,
}

/// `(num_players N, round_nr R, start_player S, reward_mode)`, validated
/// once at construction. Invalid parameters are a
/// programming-contract violation, not a recoverable error — `new` panics,
/// matching the teacher's own `assert!`/`assert_eq!` validation style
/// (`games/AKQ.rs::play`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GameConfig {
    pub num_players: u8,
    pub round_nr: u8,
    pub start_player: u8,
    pub reward_mode: RewardMode,
}

impl GameConfig {
    pub fn new(num_players: u8, round_nr: u8, start_player: u8, reward_mode: RewardMode) -> GameConfig {
        assert!((3..=6).contains(&num_players), "num_players must be in [3,6], got {num_players}");
        let max_round = Self::r_max(num_players);
        assert!((1..=max_round).contains(&round_nr), "round_nr must be in [1,{max_round}], got {round_nr}");
        assert!(start_player < num_players, "start_player must be in [0,{num_players}), got {start_player}");
        GameConfig { num_players, round_nr, start_player, reward_mode }
    }

    /// `floor(60/N)`, the largest round size this table size can deal a full
    /// round for.
    pub fn r_max(num_players: u8) -> u8 {
        60 / num_players
    }

    /// `R+1` — the number of distinct bids `[0, R]` and the offset between
    /// the guess and card-play action sub-ranges.
    pub fn guess_count(&self) -> u8 {
        self.round_nr + 1
    }

    /// Total distinct actions advertised to the framework: `54 +
    /// (floor(60/N) + 1)`. Deliberately sized off `R_max`, not this
    /// instance's `round_nr`, so the declared action space is a valid upper
    /// bound for every `round_nr` a Game with this `num_players` could be
    /// constructed with.
    pub fn num_distinct_actions(&self) -> usize {
        54 + (Self::r_max(self.num_players) as usize + 1)
    }

    pub fn max_chance_outcomes(&self) -> usize {
        54
    }

    /// `N*R + N`.
    pub fn max_game_length(&self) -> usize {
        self.num_players as usize * self.round_nr as usize + self.num_players as usize
    }

    fn normal_score_at_r_max_summed(&self, term: impl Fn(u8) -> f64) -> f64 {
        (1..=Self::r_max(self.num_players)).map(|k| term(k)).sum()
    }

    /// `Σ_{k=1..R_max} (20 + 10k)` for Normal, `+1` for Binary. Sums over `R_max` regardless of this instance's `round_nr`, per
    /// the spec's own table.
    pub fn max_utility(&self) -> f64 {
        match self.reward_mode {
            RewardMode::Normal => self.normal_score_at_r_max_summed(|k| 20.0 + 10.0 * k as f64),
            RewardMode::Binary => 1.0,
        }
    }

    /// `Σ_{k=1..R_max} (-10k)` for Normal, `-1` for Binary.
    pub fn min_utility(&self) -> f64 {
        match self.reward_mode {
            RewardMode::Normal => self.normal_score_at_r_max_summed(|k| -10.0 * k as f64),
            RewardMode::Binary => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_round_trips_fields() {
        let cfg = GameConfig::new(4, 3, 1, RewardMode::Normal);
        assert_eq!(cfg.guess_count(), 4);
        assert_eq!(cfg.max_game_length(), 4 * 3 + 4);
    }

    #[test]
    #[should_panic(expected = "num_players must be in")]
    fn rejects_too_few_players() {
        GameConfig::new(2, 1, 0, RewardMode::Normal);
    }

    #[test]
    #[should_panic(expected = "round_nr must be in")]
    fn rejects_round_above_r_max() {
        // R_max for 6 players is 10.
        GameConfig::new(6, 11, 0, RewardMode::Normal);
    }

    #[test]
    #[should_panic(expected = "start_player must be in")]
    fn rejects_out_of_range_start_player() {
        GameConfig::new(4, 1, 4, RewardMode::Normal);
    }

    #[test]
    fn binary_utility_bounds_are_plus_minus_one() {
        let cfg = GameConfig::new(3, 5, 0, RewardMode::Binary);
        assert_eq!(cfg.max_utility(), 1.0);
        assert_eq!(cfg.min_utility(), -1.0);
    }

    #[test]
    fn num_distinct_actions_uses_r_max_not_round_nr() {
        let cfg = GameConfig::new(4, 1, 0, RewardMode::Normal);
        // R_max(4) = 15, so num_distinct_actions = 54 + 16 = 70 even though
        // round_nr is only 1.
        assert_eq!(cfg.num_distinct_actions(), 54 + 16);
    }
}
