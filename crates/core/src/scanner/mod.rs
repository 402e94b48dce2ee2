//! # Lexical Scanner
//!
//! Partitions raw source text into classified spans: code, line comments,
//! block comments, string/char literals and multi-line text-block literals.
//!
//! ## Guarantees
//!
//! - Spans are emitted in source order, never overlap and leave no gaps:
//!   concatenating their text reproduces the input exactly.
//! - Markers inside a literal or comment are inert. Only the construct's own
//!   terminator ends it, so `"// not a comment"` is one string literal and
//!   `/* "not a string */` is one block comment.
//! - Block comments do not nest; the first `*/` closes.
//!
//! ## Malformed input
//!
//! An unterminated block comment or text block runs to end-of-unit; a plain
//! string that reaches a line break stops before it. Both raise a
//! [`MalformedFlag`] at the literal's start offset and scanning continues.
//!
//! ## Usage Example
//!
//! ```rust
//! use metric_lens_core::language::LexOptions;
//! use metric_lens_core::scanner::{scan, SpanKind};
//!
//! let out = scan("x++; // increment", LexOptions::java_kotlin());
//! let kinds: Vec<SpanKind> = out.spans.iter().map(|s| s.kind).collect();
//! assert_eq!(kinds, [SpanKind::Code, SpanKind::LineComment]);
//! assert!(out.flags.is_empty());
//! ```

pub mod literals;

use crate::diagnostics::{MalformedFlag, MalformedKind};
use crate::language::LexOptions;
use alloc::vec::Vec;
use literals::{
    Skipped, is_digit_separator, is_ident_char, regex_allowed, skip_backtick,
    skip_cpp_raw_string, skip_csharp_verbatim, skip_quoted, skip_regex, skip_text_block,
};
use serde::{Deserialize, Serialize};

/// Classification of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    TextBlockLiteral,
}

impl SpanKind {
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::StringLiteral | Self::TextBlockLiteral)
    }
}

/// A classified half-open byte range `[start, end)` of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` this span covers.
    ///
    /// `source` must be the text the span was produced from.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Scanner output: the span partition plus any malformed-input flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub spans: Vec<Span>,
    pub flags: Vec<MalformedFlag>,
}

impl ScanOutput {
    /// Iterates over line and block comment spans.
    pub fn comments(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|s| s.kind.is_comment())
    }
}

/// Scans `text` into a gapless, ordered sequence of spans.
#[must_use]
pub fn scan(text: &str, options: LexOptions) -> ScanOutput {
    let bytes = text.as_bytes();
    let mut out = ScanOutput::default();
    let mut code_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some((kind, skipped)) = recognize(bytes, i, options) else {
            i += 1;
            continue;
        };

        if code_start < i {
            out.spans.push(Span::new(SpanKind::Code, code_start, i));
        }
        let end = i + skipped.len;
        out.spans.push(Span::new(kind, i, end));
        if !skipped.terminated {
            let problem = if kind.is_comment() {
                MalformedKind::UnterminatedComment
            } else {
                MalformedKind::UnterminatedLiteral
            };
            out.flags.push(MalformedFlag::new(problem, i));
        }
        i = end;
        code_start = end;
    }

    if code_start < bytes.len() {
        out.spans.push(Span::new(SpanKind::Code, code_start, bytes.len()));
    }
    out
}

/// `i` の位置でコメントまたはリテラルが始まるかを判定し、その範囲を返す
fn recognize(bytes: &[u8], i: usize, options: LexOptions) -> Option<(SpanKind, Skipped)> {
    let rest = &bytes[i..];
    let next = rest.get(1).copied();

    match rest[0] {
        b'/' if next == Some(b'/') => Some((SpanKind::LineComment, line_comment(rest))),
        b'/' if next == Some(b'*') => Some((SpanKind::BlockComment, block_comment(rest))),
        b'/' if options.regex_literal() && regex_allowed(bytes, i) => {
            skip_regex(rest).map(|s| (SpanKind::StringLiteral, s))
        }
        b'#' if options.hash_comment() && next != Some(b'[') => {
            Some((SpanKind::LineComment, line_comment(rest)))
        }
        b'"' if options.text_block() && rest.starts_with(b"\"\"\"") => {
            Some((SpanKind::TextBlockLiteral, skip_text_block(rest)))
        }
        b'"' if options.double_quote() => Some((SpanKind::StringLiteral, skip_quoted(rest, b'"'))),
        b'\'' if options.single_quote() => {
            if options.digit_separator() && is_digit_separator(bytes, i) {
                return None;
            }
            Some((SpanKind::StringLiteral, skip_quoted(rest, b'\'')))
        }
        b'`' if options.backtick_string() => Some((
            SpanKind::TextBlockLiteral,
            skip_backtick(rest, options.backtick_escapes()),
        )),
        b'@' | b'$'
            if options.csharp_verbatim()
                && (rest.starts_with(b"@\"")
                    || rest.starts_with(b"@$\"")
                    || rest.starts_with(b"$@\"")) =>
        {
            Some((SpanKind::TextBlockLiteral, skip_csharp_verbatim(rest)))
        }
        b'R' if options.cpp_raw_string()
            && next == Some(b'"')
            && (i == 0 || !is_ident_char(bytes[i - 1])) =>
        {
            skip_cpp_raw_string(rest).map(|s| (SpanKind::TextBlockLiteral, s))
        }
        _ => None,
    }
}

/// 行コメントは改行の直前で終わる (改行自体は後続のコードスパンに属する)
fn line_comment(rest: &[u8]) -> Skipped {
    let len = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
    Skipped {
        len,
        terminated: true,
    }
}

/// ブロックコメントは最初の `*/` で閉じる (ネスト非対応)
fn block_comment(rest: &[u8]) -> Skipped {
    match memchr::memmem::find(&rest[2..], b"*/") {
        Some(pos) => Skipped {
            len: 2 + pos + 2,
            terminated: true,
        },
        None => Skipped {
            len: rest.len(),
            terminated: false,
        },
    }
}
