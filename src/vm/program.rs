//! Program buffer representation and parsing.

use crate::vm::errors::VmError;
use std::str::FromStr;

/// Immutable integer program template parsed from comma-separated text.
///
/// A program is only a template: each machine built from it copies the
/// words into its own private memory, so any number of machines can share
/// one program without aliasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<i64>,
}

impl Program {
    /// Parses a program from comma-separated integer text.
    ///
    /// Items may be signed and may carry surrounding whitespace. An empty
    /// source or a non-integer item is a load-time fault naming the item
    /// and its index.
    pub fn parse(source: &str) -> Result<Self, VmError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(VmError::EmptySource);
        }

        let words = source
            .split(',')
            .enumerate()
            .map(|(index, item)| {
                let item = item.trim();
                item.parse::<i64>().map_err(|_| VmError::InvalidItem {
                    item: item.to_string(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { words })
    }

    /// Returns the program's words in address order.
    pub fn words(&self) -> &[i64] {
        &self.words
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the program holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromStr for Program {
    type Err = VmError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}
