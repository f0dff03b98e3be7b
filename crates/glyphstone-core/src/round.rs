//! Round state and the round generator
//!
//! A round is a totem of three distinct symbols plus a shuffled row of
//! stones, exactly one of which carries the totem's symbols (in any
//! order). The decoys are perturbed copies of the totem, so the player
//! has to remember the actual glyphs rather than a rough shape.

use crate::{symbol::TOTEM_SIZE, Alphabet, GameRng, Result, Symbol};
use serde::{Deserialize, Serialize};

/// The ordered symbols the player memorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totem {
    symbols: [Symbol; TOTEM_SIZE],
}

impl Totem {
    /// The totem's symbols in display order
    pub fn symbols(&self) -> &[Symbol; TOTEM_SIZE] {
        &self.symbols
    }

    /// Multiset equality against a stone's symbols
    pub fn matches(&self, symbols: &[Symbol; TOTEM_SIZE]) -> bool {
        multiset(&self.symbols) == multiset(symbols)
    }
}

fn multiset(symbols: &[Symbol; TOTEM_SIZE]) -> [Symbol; TOTEM_SIZE] {
    let mut sorted = *symbols;
    sorted.sort_unstable_by_key(Symbol::glyph);
    sorted
}

/// One selectable candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    symbols: [Symbol; TOTEM_SIZE],
    is_match: bool,
}

impl Stone {
    /// The stone's symbols in display order
    pub fn symbols(&self) -> &[Symbol; TOTEM_SIZE] {
        &self.symbols
    }

    /// Whether this is the round's one correct stone
    pub fn is_match(&self) -> bool {
        self.is_match
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// The selection window elapsed with no pick
    TimedOut,
}

impl Outcome {
    /// Timeouts score as incorrect; only the message differs
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// Number of stones for a level: `clamp(3 + level / 2, 3, 8)`
pub fn stone_count(level: u32) -> usize {
    (3 + level as usize / 2).clamp(3, 8)
}

/// One play cycle's state
///
/// Created at round start, resolved at most once, replaced when the
/// player continues, dropped on exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    totem: Totem,
    stones: Vec<Stone>,
    selected: Option<usize>,
    outcome: Option<Outcome>,
}

impl Round {
    /// Generate a fresh round for `level`
    pub fn generate(level: u32, alphabet: &Alphabet, rng: &mut GameRng) -> Result<Self> {
        let drawn = alphabet.draw(TOTEM_SIZE, &[], rng)?;
        let totem = Totem {
            symbols: [drawn[0], drawn[1], drawn[2]],
        };

        let count = stone_count(level);
        let mut stones = Vec::with_capacity(count);

        // The one matching stone: totem symbols, order shuffled
        let mut matching = totem.symbols;
        rng.shuffle(&mut matching);
        stones.push(Stone {
            symbols: matching,
            is_match: true,
        });

        for _ in 1..count {
            stones.push(Self::decoy(&totem, alphabet, rng)?);
        }

        // Position must carry no information about correctness
        rng.shuffle(&mut stones);

        let round = Self {
            totem,
            stones,
            selected: None,
            outcome: None,
        };
        debug_assert!(round.invariants_hold(), "generated round violates invariants");
        Ok(round)
    }

    /// Build one incorrect stone via the perturbation policy
    ///
    /// An independent draw picks how far the decoy strays from the totem:
    /// under 0.4 one symbol is replaced, under 0.7 two, otherwise all
    /// three. Replacements always come from outside the totem, so a decoy
    /// can never collapse into a second correct answer.
    fn decoy(totem: &Totem, alphabet: &Alphabet, rng: &mut GameRng) -> Result<Stone> {
        let mut symbols = totem.symbols;
        let roll = rng.next_f64();

        if roll < 0.4 {
            let replacement = alphabet.draw(1, &totem.symbols, rng)?;
            symbols[rng.index(TOTEM_SIZE)] = replacement[0];
        } else if roll < 0.7 {
            let mut positions = [0, 1, 2];
            rng.shuffle(&mut positions);
            let replacements = alphabet.draw(2, &totem.symbols, rng)?;
            symbols[positions[0]] = replacements[0];
            symbols[positions[1]] = replacements[1];
        } else {
            let replacements = alphabet.draw(TOTEM_SIZE, &totem.symbols, rng)?;
            symbols = [replacements[0], replacements[1], replacements[2]];
        }

        rng.shuffle(&mut symbols);
        Ok(Stone {
            symbols,
            is_match: false,
        })
    }

    fn invariants_hold(&self) -> bool {
        let matches = self.stones.iter().filter(|s| s.is_match).count();
        matches == 1
            && self
                .stones
                .iter()
                .all(|s| s.is_match == self.totem.matches(&s.symbols))
    }

    /// The totem to memorize
    pub fn totem(&self) -> &Totem {
        &self.totem
    }

    /// The shuffled stones on offer
    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    /// Index of the player's pick, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The recorded outcome, if the round is resolved
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Record the round's single resolution; later calls are ignored
    pub(crate) fn record_outcome(&mut self, selected: Option<usize>, outcome: Outcome) {
        if self.outcome.is_none() {
            self.selected = selected;
            self.outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totem_set(round: &Round) -> Vec<Symbol> {
        let mut set = round.totem().symbols().to_vec();
        set.sort_unstable_by_key(Symbol::glyph);
        set
    }

    #[test]
    fn test_totem_symbols_distinct() {
        let alphabet = Alphabet::default();
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let round = Round::generate(1, &alphabet, &mut rng).unwrap();
            let t = round.totem().symbols();
            assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
        }
    }

    #[test]
    fn test_exactly_one_matching_stone() {
        let alphabet = Alphabet::default();
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            for level in [1, 4, 9, 20] {
                let round = Round::generate(level, &alphabet, &mut rng).unwrap();
                let matches = round.stones().iter().filter(|s| s.is_match()).count();
                assert_eq!(matches, 1, "seed {seed} level {level}");
            }
        }
    }

    #[test]
    fn test_matching_stone_is_a_permutation_of_the_totem() {
        let alphabet = Alphabet::default();
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let round = Round::generate(6, &alphabet, &mut rng).unwrap();
            let matching = round.stones().iter().find(|s| s.is_match()).unwrap();
            let mut stone_set = matching.symbols().to_vec();
            stone_set.sort_unstable_by_key(Symbol::glyph);
            assert_eq!(stone_set, totem_set(&round));
        }
    }

    #[test]
    fn test_decoys_never_equal_the_totem_set() {
        let alphabet = Alphabet::default();
        for seed in 0..100 {
            let mut rng = GameRng::new(seed);
            let round = Round::generate(14, &alphabet, &mut rng).unwrap();
            for stone in round.stones().iter().filter(|s| !s.is_match()) {
                let mut stone_set = stone.symbols().to_vec();
                stone_set.sort_unstable_by_key(Symbol::glyph);
                assert_ne!(stone_set, totem_set(&round), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_stone_count_steps_with_level() {
        assert_eq!(stone_count(1), 3);
        assert_eq!(stone_count(3), 4);
        assert_eq!(stone_count(5), 5);
        assert_eq!(stone_count(11), 8);
        assert_eq!(stone_count(100), 8);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let alphabet = Alphabet::default();
        let mut a = GameRng::new(99);
        let mut b = GameRng::new(99);
        let first = Round::generate(5, &alphabet, &mut a).unwrap();
        let second = Round::generate(5, &alphabet, &mut b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_minimal_alphabet_still_generates() {
        // Six glyphs is the floor: totem plus a full-replacement decoy
        let alphabet = Alphabet::new(['a', 'b', 'c', 'd', 'e', 'f']).unwrap();
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let round = Round::generate(12, &alphabet, &mut rng).unwrap();
            assert_eq!(round.stones().len(), 8);
        }
    }

    #[test]
    fn test_outcome_recorded_once() {
        let alphabet = Alphabet::default();
        let mut rng = GameRng::new(3);
        let mut round = Round::generate(1, &alphabet, &mut rng).unwrap();

        round.record_outcome(Some(1), Outcome::Incorrect);
        round.record_outcome(Some(0), Outcome::Correct);

        assert_eq!(round.selected(), Some(1));
        assert_eq!(round.outcome(), Some(Outcome::Incorrect));
    }
}
