//! Information-state resampler: given one seat's viewpoint, draw a full
//! `Round` uniformly from the set of worlds consistent with it.
//!
//! Generalizes `games/liars_die.rs`'s `sample_position` and
//! `games/AKQ.rs`'s `sample_position` (both: given a trace, construct a
//! consistent concrete world) from two fixed players and a with-replacement
//! pool to Wizard's N seats and a without-replacement deal. Per spec §9 "RNG
//! as a collaborator", the RNG is an injected callable rather than
//! `rand::rng()` pulled from ambient state, unlike the teacher's own
//! in-crate samplers.

use crate::card::Card;
use crate::config::GameConfig;
use crate::round::{Phase, Round, Trump};
use crate::seat::Seat;

/// A source of uniform `[0, 1)` samples, injected by the caller. Kept as a
/// trait rather than a bare closure type so callers can implement it once
/// over their own rng and pass `&mut impl UniformSampler` around freely.
pub trait UniformSampler {
    fn sample(&mut self) -> f64;

    /// Uniformly pick an index in `[0, len)`, weighted by `weights` (the
    /// pool's per-index remaining multiplicity). Panics if every weight is
    /// zero — the caller must not offer an empty pool.
    fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        assert!(total > 0, "weighted_index called with an empty pool");
        let mut target = (self.sample() * total as f64) as u32;
        if target >= total {
            target = total - 1;
        }
        for (i, &w) in weights.iter().enumerate() {
            if target < w {
                return i;
            }
            target -= w;
        }
        unreachable!("weighted_index: target exceeded cumulative weight")
    }
}

/// Per-seat queue of cards known to have belonged to that seat, consumed
/// back-to-front while re-driving the deal.
struct SeatQueue {
    known: Vec<Card>,
}

impl SeatQueue {
    fn pop(&mut self) -> Option<Card> {
        self.known.pop()
    }
}

/// Shared pool of cards not yet fixed to any seat: the current deck plus
/// every hidden (not publicly known) card held by seats other than the
/// viewpoint.
struct Pool {
    counts: [u32; 54],
}

impl Pool {
    fn draw(&mut self, sampler: &mut impl UniformSampler) -> Card {
        debug_assert!(self.counts.iter().sum::<u32>() > 0, "pool exhausted");
        let idx = sampler.weighted_index(&self.counts) as u8;
        self.counts[idx as usize] -= 1;
        Card::from_index(idx)
    }
}

/// Draw a full `Round`, consistent with `viewpoint`'s information, from
/// `real`. Per spec §4.7's termination invariant, each seat ends holding
/// exactly the number of cards it holds in `real` and the replayed history
/// is legal under §4.3 — both guaranteed structurally here since every
/// action replayed is one actually legal (and in fact taken) in `real`.
pub fn resample_from_infostate(real: &Round, viewpoint: Seat, sampler: &mut impl UniformSampler) -> Round {
    let config: GameConfig = real.config;
    let n = config.num_players as usize;

    log::debug!(
        "resampling from seat {:?}: deck_remaining={} history_len={}",
        viewpoint,
        real.deck.remaining(),
        real.history_played.len()
    );

    // Build each seat's known-card queue (oldest first, so `pop()` — which
    // removes from the back — yields the most recently fixed card first,
    // matching "pop from back" in spec §4.7).
    let mut queues: Vec<SeatQueue> = (0..n)
        .map(|p| {
            let seat = Seat(p as u8);
            if seat == viewpoint {
                // v's full original deal: current hand plus everything v has
                // already played, in real play order.
                let mut known: Vec<Card> = real
                    .history_played
                    .iter()
                    .chain(real.table.iter())
                    .filter(|&&(s, _)| s == seat)
                    .map(|&(_, c)| c)
                    .collect();
                known.extend(real.hands[p].iter_cards());
                SeatQueue { known }
            } else {
                // Only what this seat has publicly played so far.
                let known: Vec<Card> = real
                    .history_played
                    .iter()
                    .chain(real.table.iter())
                    .filter(|&&(s, _)| s == seat)
                    .map(|&(_, c)| c)
                    .collect();
                SeatQueue { known }
            }
        })
        .collect();

    // Pool = current deck + every hidden card (other seats' hands not yet
    // fixed by a queue pop), all indexed by card index multiplicity.
    let mut counts = [0u32; 54];
    for i in 0..54u8 {
        counts[i as usize] += real.deck.count(i) as u32;
    }
    for p in 0..n {
        if p == viewpoint.index() {
            continue;
        }
        for card in real.hands[p].iter_cards() {
            counts[card.to_index() as usize] += 1;
        }
    }
    let mut pool = Pool { counts };

    let mut resampled = Round::new(config);

    // Re-drive the deal, in the same round-robin order `Round::new` itself
    // uses, popping each seat's queue before falling back to the pool.
    let cards_per_hand = config.num_players as u16 * config.round_nr as u16;
    let mut dealt = 0u16;
    let mut deal_to = Seat(config.start_player);
    while dealt < cards_per_hand {
        let card = match queues[deal_to.index()].pop() {
            // Queue cards are never double-counted in the pool: a
            // non-viewpoint seat's queue holds only cards it has already
            // played (never part of its current hidden hand, which is what
            // seeded the pool), and the viewpoint's own cards were excluded
            // from the pool entirely.
            Some(c) => c,
            None => pool.draw(sampler),
        };
        resampled.apply_chance(card.to_index());
        deal_to = deal_to.next(config.num_players);
        dealt += 1;
    }

    // Trump is public; replay it verbatim.
    let trump: &Trump = real.trump.as_ref().expect("trump must be set once Dealing has completed");
    let trump_index = trump.card.to_index();
    if real.deck.remaining() == 0 {
        resampled.apply_chance(0);
    } else {
        resampled.apply_chance(trump_index);
    }

    // Guesses and plays are both public; replay them verbatim in order.
    replay_guesses(&mut resampled, real, config);
    replay_plays(&mut resampled, real);

    resampled
}

fn replay_guesses(resampled: &mut Round, real: &Round, config: GameConfig) {
    let start = Seat(config.start_player);
    let mut turn = start;
    loop {
        let bid = real.guessed[turn.index()].expect("guess must be recorded by the time tricking starts");
        resampled.apply_guess(bid);
        if turn == start.prev(config.num_players) {
            break;
        }
        turn = turn.next(config.num_players);
    }
}

fn replay_plays(resampled: &mut Round, real: &Round) {
    for &(_, card) in real.history_played.iter().chain(real.table.iter()) {
        if resampled.is_terminal() {
            break;
        }
        if !matches!(resampled.phase, Phase::Tricking { .. }) {
            break;
        }
        resampled.apply_play(card.to_index());
    }
}
