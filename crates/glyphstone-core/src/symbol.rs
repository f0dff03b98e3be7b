//! Symbols and the glyph alphabet

use crate::{Error, GameRng, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of symbols on a totem, and on every stone
pub const TOTEM_SIZE: usize = 3;

/// The reference glyph set (24 glyphs)
pub const DEFAULT_GLYPHS: [char; 24] = [
    '🔺', '🔻', '🔷', '🔶', '⭐', '🌟', '💠', '🔸', '🔹', '◆', '◇', '●', '○', '■', '□', '▲',
    '▼', '◀', '▶', '🔵', '🟡', '🟠', '🔴', '🟢',
];

/// One glyph drawn from the alphabet
///
/// Symbols are opaque tokens; equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub char);

impl Symbol {
    /// The underlying glyph
    pub fn glyph(&self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated set of distinct glyphs
///
/// Needs enough glyphs that a fully-replaced decoy can always be drawn:
/// a totem takes `TOTEM_SIZE`, and the complement must cover another
/// `TOTEM_SIZE` on top of that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<char>", into = "Vec<char>")]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Minimum glyph count: a totem plus a full-replacement decoy
    pub const MIN_GLYPHS: usize = TOTEM_SIZE * 2;

    /// Build an alphabet, rejecting duplicates and undersized sets
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Result<Self> {
        let mut symbols: Vec<Symbol> = Vec::new();
        for glyph in glyphs {
            let symbol = Symbol(glyph);
            if symbols.contains(&symbol) {
                return Err(Error::DuplicateGlyph(glyph));
            }
            symbols.push(symbol);
        }
        if symbols.len() < Self::MIN_GLYPHS {
            return Err(Error::AlphabetTooSmall {
                needed: Self::MIN_GLYPHS,
                got: symbols.len(),
            });
        }
        Ok(Self { symbols })
    }

    /// Number of glyphs in the set
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a validated alphabet
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All glyphs, in declaration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Draw `count` distinct symbols uniformly, skipping `exclude`
    pub fn draw(&self, count: usize, exclude: &[Symbol], rng: &mut GameRng) -> Result<Vec<Symbol>> {
        let mut pool: Vec<Symbol> = self
            .symbols
            .iter()
            .copied()
            .filter(|s| !exclude.contains(s))
            .collect();
        if pool.len() < count {
            return Err(Error::ComplementExhausted {
                needed: count,
                available: pool.len(),
            });
        }
        // Partial Fisher-Yates: only the first `count` slots need settling
        for i in 0..count {
            let j = i + rng.index(pool.len() - i);
            pool.swap(i, j);
        }
        pool.truncate(count);
        Ok(pool)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_GLYPHS.iter().copied().map(Symbol).collect(),
        }
    }
}

impl TryFrom<Vec<char>> for Alphabet {
    type Error = Error;

    fn try_from(glyphs: Vec<char>) -> Result<Self> {
        Self::new(glyphs)
    }
}

impl From<Alphabet> for Vec<char> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols.iter().map(Symbol::glyph).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet_is_valid() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 24);
        // Re-validating must succeed: all glyphs distinct
        assert!(Alphabet::new(DEFAULT_GLYPHS).is_ok());
    }

    #[test]
    fn test_duplicate_glyph_rejected() {
        let result = Alphabet::new(['a', 'b', 'c', 'd', 'e', 'a']);
        assert!(matches!(result, Err(Error::DuplicateGlyph('a'))));
    }

    #[test]
    fn test_undersized_alphabet_rejected() {
        let result = Alphabet::new(['a', 'b', 'c', 'd']);
        assert!(matches!(
            result,
            Err(Error::AlphabetTooSmall { needed: 6, got: 4 })
        ));
    }

    #[test]
    fn test_draw_distinct_and_excluding() {
        let alphabet = Alphabet::new(['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h']).unwrap();
        let mut rng = GameRng::new(23);
        let exclude = [Symbol('a'), Symbol('b'), Symbol('c')];

        for _ in 0..100 {
            let drawn = alphabet.draw(3, &exclude, &mut rng).unwrap();
            assert_eq!(drawn.len(), 3);
            for s in &drawn {
                assert!(!exclude.contains(s));
            }
            assert!(drawn[0] != drawn[1] && drawn[1] != drawn[2] && drawn[0] != drawn[2]);
        }
    }

    #[test]
    fn test_draw_exhausted() {
        let alphabet = Alphabet::new(['a', 'b', 'c', 'd', 'e', 'f']).unwrap();
        let mut rng = GameRng::new(29);
        let exclude = [Symbol('a'), Symbol('b'), Symbol('c'), Symbol('d')];

        let result = alphabet.draw(3, &exclude, &mut rng);
        assert!(matches!(
            result,
            Err(Error::ComplementExhausted {
                needed: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_ron_round_trip() {
        let alphabet = Alphabet::new(['a', 'b', 'c', 'd', 'e', 'f']).unwrap();
        let encoded = ron::to_string(&alphabet).unwrap();
        let decoded: Alphabet = ron::from_str(&encoded).unwrap();
        assert_eq!(alphabet, decoded);
    }

    #[test]
    fn test_ron_rejects_invalid_alphabet() {
        // Validation runs on deserialization too
        assert!(ron::from_str::<Alphabet>("['a', 'b', 'c']").is_err());
    }
}
