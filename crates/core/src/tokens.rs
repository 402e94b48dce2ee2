//! Token stream over the code regions of a scan.
//!
//! Comments produce no tokens and each literal span collapses into a single
//! opaque [`TokenKind::Literal`], so everything downstream sees braces and
//! keywords only where they are real code.

use crate::language::Language;
use crate::scanner::{Span, SpanKind};
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    Number,
    Literal,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    Dot,
    Question,
    /// `?.`
    SafeCall,
    /// `??`
    Coalesce,
    /// `->`
    ThinArrow,
    /// `=>`
    FatArrow,
    AndAnd,
    OrOr,
    Lt,
    Gt,
    Assign,
    At,
    Hash,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
}

impl Token<'_> {
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.text.len()
    }

    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text == word
    }

    #[must_use]
    pub fn is_arrow(&self, arrow: &str) -> bool {
        matches!(self.kind, TokenKind::ThinArrow | TokenKind::FatArrow) && self.text == arrow
    }
}

/// Tokenizes the code spans of `source`; literals become single tokens.
#[must_use]
pub fn tokenize<'a>(source: &'a str, spans: &[Span]) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    for span in spans {
        match span.kind {
            SpanKind::Code => lex_code(source, span.start, span.end, &mut tokens),
            SpanKind::StringLiteral | SpanKind::TextBlockLiteral => tokens.push(Token {
                kind: TokenKind::Literal,
                text: span.text(source),
                start: span.start,
            }),
            SpanKind::LineComment | SpanKind::BlockComment => {}
        }
    }
    tokens
}

/// Tokens the structural stages work on.
///
/// Same as [`tokenize`], except that preprocessor directive lines are dropped
/// for languages that have them, so `#include <x>` never joins the header of
/// the next declaration and `#if A && B` never counts as a branch.
#[must_use]
pub fn code_tokens<'a>(source: &'a str, spans: &[Span], language: Language) -> Vec<Token<'a>> {
    let mut tokens = tokenize(source, spans);
    if language.preprocessor() {
        strip_directives(source, &mut tokens);
    }
    tokens
}

/// Removes every token of a directive line: a `#` that is the first token on
/// its line, up to the next line break not escaped by `\`.
pub fn strip_directives(source: &str, tokens: &mut Vec<Token<'_>>) {
    let bytes = source.as_bytes();
    let mut directive_end = 0;
    let mut prev_end: Option<usize> = None;
    tokens.retain(|token| {
        let line_start = prev_end
            .is_none_or(|end| memchr::memchr(b'\n', &bytes[end..token.start]).is_some());
        prev_end = Some(token.end());
        if token.start < directive_end {
            return false;
        }
        if token.kind == TokenKind::Hash && line_start {
            directive_end = directive_line_end(bytes, token.start);
            return false;
        }
        true
    });
}

/// Offset of the line break that ends the directive starting at `start`.
fn directive_line_end(bytes: &[u8], start: usize) -> usize {
    let mut from = start;
    while let Some(pos) = memchr::memchr(b'\n', &bytes[from..]) {
        let newline = from + pos;
        let mut k = newline;
        if k > start && bytes[k - 1] == b'\r' {
            k -= 1;
        }
        if k > start && bytes[k - 1] == b'\\' {
            from = newline + 1;
            continue;
        }
        return newline;
    }
    bytes.len()
}

/// Pairs every bracket token with its partner.
///
/// `(`/`)`, `[`/`]` and `{`/`}` are matched on independent stacks; the entry
/// of an unmatched bracket is `None`.
#[must_use]
pub fn pair_brackets(tokens: &[Token<'_>]) -> Vec<Option<usize>> {
    let mut partners = alloc::vec![None; tokens.len()];
    let mut parens = Vec::new();
    let mut brackets = Vec::new();
    let mut braces = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let (stack, closing) = match token.kind {
            TokenKind::OpenParen => (&mut parens, false),
            TokenKind::OpenBracket => (&mut brackets, false),
            TokenKind::OpenBrace => (&mut braces, false),
            TokenKind::CloseParen => (&mut parens, true),
            TokenKind::CloseBracket => (&mut brackets, true),
            TokenKind::CloseBrace => (&mut braces, true),
            _ => continue,
        };
        if !closing {
            stack.push(i);
        } else if let Some(open) = stack.pop() {
            partners[open] = Some(i);
            partners[i] = Some(open);
        }
    }
    partners
}

#[inline]
const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn lex_code<'a>(source: &'a str, start: usize, end: usize, out: &mut Vec<Token<'a>>) {
    let bytes = source.as_bytes();
    let mut i = start;

    while i < end {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if b.is_ascii_digit() {
            let mut j = i + 1;
            while j < end && (is_word_byte(bytes[j]) || bytes[j] == b'.' || bytes[j] == b'\'') {
                j += 1;
            }
            out.push(Token {
                kind: TokenKind::Number,
                text: &source[i..j],
                start: i,
            });
            i = j;
            continue;
        }

        if is_word_byte(b) {
            let mut j = i + 1;
            while j < end && is_word_byte(bytes[j]) {
                j += 1;
            }
            out.push(Token {
                kind: TokenKind::Word,
                text: &source[i..j],
                start: i,
            });
            i = j;
            continue;
        }

        let (kind, len) = punct(&bytes[i..end]);
        out.push(Token {
            kind,
            text: &source[i..i + len],
            start: i,
        });
        i += len;
    }
}

fn punct(rest: &[u8]) -> (TokenKind, usize) {
    if rest.starts_with(b"<=>") {
        return (TokenKind::Other, 3);
    }
    if rest.len() >= 2 {
        let two = match &rest[..2] {
            b"&&" => Some(TokenKind::AndAnd),
            b"||" => Some(TokenKind::OrOr),
            b"->" => Some(TokenKind::ThinArrow),
            b"=>" => Some(TokenKind::FatArrow),
            b"::" => Some(TokenKind::DoubleColon),
            b"?." => Some(TokenKind::SafeCall),
            b"??" => Some(TokenKind::Coalesce),
            b"==" | b"!=" | b"<=" | b">=" => Some(TokenKind::Other),
            _ => None,
        };
        if let Some(kind) = two {
            return (kind, 2);
        }
    }
    let kind = match rest[0] {
        b'{' => TokenKind::OpenBrace,
        b'}' => TokenKind::CloseBrace,
        b'(' => TokenKind::OpenParen,
        b')' => TokenKind::CloseParen,
        b'[' => TokenKind::OpenBracket,
        b']' => TokenKind::CloseBracket,
        b';' => TokenKind::Semicolon,
        b',' => TokenKind::Comma,
        b':' => TokenKind::Colon,
        b'.' => TokenKind::Dot,
        b'?' => TokenKind::Question,
        b'<' => TokenKind::Lt,
        b'>' => TokenKind::Gt,
        b'=' => TokenKind::Assign,
        b'@' => TokenKind::At,
        b'#' => TokenKind::Hash,
        _ => TokenKind::Other,
    };
    (kind, 1)
}
