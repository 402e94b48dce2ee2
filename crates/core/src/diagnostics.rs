//! Malformed-input flags.
//!
//! None of these conditions abort analysis. The stage that detects one closes
//! the offending span or scope at end-of-unit, records a flag and carries on.

use core::fmt;
use serde::{Deserialize, Serialize};

/// The kind of malformed construct detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedKind {
    /// A string, char or text-block literal without its closing delimiter.
    UnterminatedLiteral,
    /// A block comment without `*/`.
    UnterminatedComment,
    /// A brace left open at end-of-unit, or a closing brace without an opener.
    UnbalancedScope,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnterminatedLiteral => "unterminated literal",
            Self::UnterminatedComment => "unterminated comment",
            Self::UnbalancedScope => "unbalanced scope",
        };
        f.write_str(label)
    }
}

/// One malformed-input finding, anchored at the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MalformedFlag {
    pub kind: MalformedKind,
    pub offset: usize,
}

impl MalformedFlag {
    #[must_use]
    pub const fn new(kind: MalformedKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for MalformedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_kind_and_offset() {
        let flag = MalformedFlag::new(MalformedKind::UnterminatedComment, 42);
        assert_eq!(flag.to_string(), "unterminated comment at byte 42");
    }
}
