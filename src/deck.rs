//! The 60-card deck multiset.
//!
//! Generalizes the with-replacement dice pool implicit in
//! `games/liars_die.rs`'s `sample_position` into an explicit counted
//! multiset supporting real without-replacement dealing.

use crate::card::Card;

/// Monotone-mutation-only multiset over the 54 card identities. Starts at
/// the initial Wizard composition: 4 Jesters, 4 Wizards, 1 each of the 52
/// normals — 60 cards total.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Deck {
    counts: [u8; 54],
}

impl Deck {
    pub fn new() -> Deck {
        let mut counts = [1u8; 54];
        counts[0] = 4; // Jester
        counts[1] = 4; // Wizard
        Deck { counts }
    }

    pub fn count(&self, index: u8) -> u8 {
        self.counts[index as usize]
    }

    /// Cards still undealt, summed over all 54 identities.
    pub fn remaining(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    /// All indices with positive count, ascending.
    pub fn present_indices(&self) -> Vec<u8> {
        (0..54u8).filter(|&i| self.counts[i as usize] > 0).collect()
    }

    /// Deal one copy of `index`. Panics if the count is already zero — a
    /// programming-contract violation per spec §7, never a recoverable
    /// condition (the caller is expected to have checked `present_indices`
    /// or `count` first).
    pub fn deal(&mut self, index: u8) -> Card {
        let slot = &mut self.counts[index as usize];
        assert!(*slot > 0, "dealing card index {index} with zero count remaining");
        *slot -= 1;
        Card::from_index(index)
    }
}

impl Default for Deck {
    fn default() -> Deck {
        Deck::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_sixty_cards() {
        assert_eq!(Deck::new().remaining(), 60);
    }

    #[test]
    fn dealing_decrements_count_and_conserves_total() {
        let mut deck = Deck::new();
        let before = deck.remaining();
        let card = deck.deal(5);
        assert_eq!(card.to_index(), 5);
        assert_eq!(deck.remaining(), before - 1);
        assert_eq!(deck.count(5), 0);
    }

    #[test]
    #[should_panic(expected = "zero count remaining")]
    fn dealing_an_exhausted_index_panics() {
        let mut deck = Deck::new();
        deck.deal(5);
        deck.deal(5);
    }
}
