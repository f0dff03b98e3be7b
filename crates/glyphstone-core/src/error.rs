//! Error types for glyphstone-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("alphabet needs at least {needed} glyphs, got {got}")]
    AlphabetTooSmall { needed: usize, got: usize },

    #[error("alphabet contains duplicate glyph '{0}'")]
    DuplicateGlyph(char),

    #[error("draw of {needed} glyphs exceeds the {available} outside the exclusion set")]
    ComplementExhausted { needed: usize, available: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
