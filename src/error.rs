use thiserror::Error;

use crate::style::StyleId;

/// Everything that can go wrong when defining styles or attaching lights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlickerError {
    /// A live style already uses this id
    #[error("style {0} already exists")]
    DuplicateStyleId(StyleId),
    /// Symbol is not a lowercase ASCII letter; `position` is 1-based within a pattern
    #[error(
        "invalid pattern symbol '{symbol}'{}",
        .position.map(|p| format!(" at position {p}")).unwrap_or_default()
    )]
    InvalidSymbol {
        symbol: char,
        position: Option<usize>,
    },
    /// Pattern has no symbols at all
    #[error("pattern must contain at least one symbol")]
    EmptySequence,
    /// A loosely-typed input value could not be converted
    #[error("invalid {argument}: expected {expected}")]
    InvalidArgumentType {
        argument: &'static str,
        expected: &'static str,
    },
    /// Attach was requested for a style that is not registered
    #[error("unknown style {0}")]
    UnknownStyle(StyleId),
}
