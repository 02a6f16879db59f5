//! Letter-encoded brightness patterns.
//!
//! Every symbol is a lowercase letter: `a` is fully dark, `z` is full brightness and the
//! letters in between are spaced evenly at 1/25 steps.

use std::fmt;

use crate::error::FlickerError;

const FIRST: u8 = b'a';
const LAST: u8 = b'z';

/// Maps a pattern symbol to its brightness fraction in `[0, 1]`.
pub fn decode(symbol: char) -> Result<f64, FlickerError> {
    if !symbol.is_ascii_lowercase() {
        return Err(FlickerError::InvalidSymbol {
            symbol,
            position: None,
        });
    }

    Ok(level_of(symbol as u8))
}

fn level_of(symbol: u8) -> f64 {
    (symbol - FIRST) as f64 / (LAST - FIRST) as f64
}

/// A validated, non-empty sequence of pattern symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    symbols: Vec<u8>,
}

impl Pattern {
    /// Validates the whole sequence once so that stepping through it later cannot fail.
    pub fn parse(sequence: &str) -> Result<Pattern, FlickerError> {
        if sequence.is_empty() {
            return Err(FlickerError::EmptySequence);
        }

        for (i, symbol) in sequence.chars().enumerate() {
            if !symbol.is_ascii_lowercase() {
                return Err(FlickerError::InvalidSymbol {
                    symbol,
                    position: Some(i + 1),
                });
            }
        }

        Ok(Pattern {
            symbols: sequence.as_bytes().to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at a 1-based position, which must lie in `[1, len]`.
    pub(crate) fn symbol(&self, index: usize) -> char {
        self.symbols[index - 1] as char
    }

    pub(crate) fn level(&self, index: usize) -> f64 {
        level_of(self.symbols[index - 1])
    }

    /// Floors and clamps a caller-supplied start position into `[1, len]`.
    pub fn clamp_index(&self, index: f64) -> usize {
        if index.is_nan() {
            return 1;
        }

        let floored = index.floor();
        if floored < 1.0 {
            1
        } else if floored >= self.len() as f64 {
            self.len()
        } else {
            floored as usize
        }
    }

    /// The position following `index`, wrapping back to the start.
    pub fn next_index(&self, index: usize) -> usize {
        if index >= self.len() {
            1
        } else {
            index + 1
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", *symbol as char)?;
        }
        Ok(())
    }
}
