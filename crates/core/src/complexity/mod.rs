//! # Complexity Calculator
//!
//! Counts decision points inside one callable scope and turns them into a
//! McCabe-style score.
//!
//! Only the callable's own body is walked: tokens that belong to a nested
//! scope (a lambda, an anonymous or local type and everything inside it) are
//! skipped, since those scopes receive their own record.
//!
//! ## Counted constructs
//!
//! | kind           | tokens                                                  |
//! |----------------|---------------------------------------------------------|
//! | `If`           | `if` not preceded by `else`                             |
//! | `ElseIf`       | `if` preceded by `else`, PHP `elseif`                   |
//! | `Loop`         | `for`, `foreach`, `while` (`do` is not counted)         |
//! | `Case`         | `case` labels, `when`/`switch` expression arms          |
//! | `Catch`        | `catch`                                                 |
//! | `LogicalAnd`   | `&&`, PHP `and`                                         |
//! | `LogicalOr`    | `\|\|`, PHP `or`                                        |
//! | `Ternary`      | `?` of a conditional expression                         |
//! | `NullCoalesce` | `??`                                                    |
//!
//! `default`, `else ->` and `_ =>` add nothing. Preprocessor lines never reach
//! the calculator (see [`code_tokens`](crate::tokens::code_tokens)), so `#if`
//! is not a branch.

mod rules;

pub use rules::ComplexityRules;

use crate::language::Language;
use crate::structure::header::opens_arms;
use crate::structure::{ScopeId, ScopeTree};
use crate::tokens::{Token, TokenKind};
use alloc::vec::Vec;
use core::ops::AddAssign;
use serde::{Deserialize, Serialize};

/// A category of decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    If,
    ElseIf,
    Loop,
    Case,
    Catch,
    LogicalAnd,
    LogicalOr,
    Ternary,
    NullCoalesce,
}

impl DecisionKind {
    pub const ALL: [Self; 9] = [
        Self::If,
        Self::ElseIf,
        Self::Loop,
        Self::Case,
        Self::Catch,
        Self::LogicalAnd,
        Self::LogicalOr,
        Self::Ternary,
        Self::NullCoalesce,
    ];
}

/// Raw occurrence count per [`DecisionKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakdown {
    pub ifs: u32,
    pub else_ifs: u32,
    pub loops: u32,
    pub cases: u32,
    pub catches: u32,
    pub logical_ands: u32,
    pub logical_ors: u32,
    pub ternaries: u32,
    pub null_coalesces: u32,
}

impl Breakdown {
    fn slot(&mut self, kind: DecisionKind) -> &mut u32 {
        match kind {
            DecisionKind::If => &mut self.ifs,
            DecisionKind::ElseIf => &mut self.else_ifs,
            DecisionKind::Loop => &mut self.loops,
            DecisionKind::Case => &mut self.cases,
            DecisionKind::Catch => &mut self.catches,
            DecisionKind::LogicalAnd => &mut self.logical_ands,
            DecisionKind::LogicalOr => &mut self.logical_ors,
            DecisionKind::Ternary => &mut self.ternaries,
            DecisionKind::NullCoalesce => &mut self.null_coalesces,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: DecisionKind) -> u32 {
        match kind {
            DecisionKind::If => self.ifs,
            DecisionKind::ElseIf => self.else_ifs,
            DecisionKind::Loop => self.loops,
            DecisionKind::Case => self.cases,
            DecisionKind::Catch => self.catches,
            DecisionKind::LogicalAnd => self.logical_ands,
            DecisionKind::LogicalOr => self.logical_ors,
            DecisionKind::Ternary => self.ternaries,
            DecisionKind::NullCoalesce => self.null_coalesces,
        }
    }

    pub fn add(&mut self, kind: DecisionKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }

    /// Decision points of every kind.
    #[must_use]
    pub fn total(&self) -> u32 {
        DecisionKind::ALL
            .iter()
            .fold(0u32, |acc, &k| acc.saturating_add(self.get(k)))
    }
}

impl AddAssign for Breakdown {
    fn add_assign(&mut self, rhs: Self) {
        for kind in DecisionKind::ALL {
            let slot = self.slot(kind);
            *slot = slot.saturating_add(rhs.get(kind));
        }
    }
}

/// Complexity of one callable scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplexityRecord {
    /// `1 + Σ weight × count`; never below 1.
    pub score: u32,
    pub breakdown: Breakdown,
    /// Counting met an unbalanced bracket or the scope was closed at end-of-unit.
    pub partial: bool,
}

impl Default for ComplexityRecord {
    fn default() -> Self {
        Self {
            score: 1,
            breakdown: Breakdown::default(),
            partial: false,
        }
    }
}

/// An open `{` met while walking a body.
#[derive(Debug, Clone, Copy)]
struct Block {
    /// Opened by `when (x) {` / `switch {`: arrows at its level are arms.
    arms: bool,
    parens: usize,
}

/// Scores the callable scope `id` of `tree`.
///
/// `tokens` and `partners` are the token stream and bracket pairing the tree
/// was built from. An unknown id yields the base record.
#[must_use]
pub fn calculate(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    tree: &ScopeTree,
    id: ScopeId,
    language: Language,
    rules: &ComplexityRules,
) -> ComplexityRecord {
    let Some(node) = tree.get(id) else {
        return ComplexityRecord::default();
    };

    let excluded: Vec<(usize, usize)> = tree.children(id).map(|c| (c.start, c.end)).collect();
    let mut next_excluded = 0;

    let mut breakdown = Breakdown::default();
    let mut partial = node.unterminated;
    let mut blocks: Vec<Block> = Vec::new();
    let mut parens = 0usize;

    let first = tokens.partition_point(|t| t.start < node.body_start);
    for i in first..tokens.len() {
        let token = tokens[i];
        if token.start >= node.end {
            break;
        }
        while next_excluded < excluded.len() && excluded[next_excluded].1 <= token.start {
            next_excluded += 1;
        }
        if excluded
            .get(next_excluded)
            .is_some_and(|&(start, _)| start <= token.start)
        {
            continue;
        }

        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBracket => parens += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket => {
                let Some(depth) = parens.checked_sub(1) else {
                    partial = true;
                    break;
                };
                parens = depth;
            }
            TokenKind::OpenBrace => blocks.push(Block {
                arms: opens_arms(tokens, partners, i, language),
                parens,
            }),
            TokenKind::CloseBrace => {
                if blocks.pop().is_none() {
                    partial = true;
                    break;
                }
            }
            _ => {
                if let Some(kind) = decision_at(tokens, i, language, blocks.last(), parens) {
                    breakdown.add(kind);
                }
            }
        }
    }

    // 閉じていない ( / [ が残ったまま本体が終わった
    partial |= parens != 0;

    ComplexityRecord {
        score: rules.score(&breakdown),
        breakdown,
        partial,
    }
}

/// The decision point token `i` represents, if any.
fn decision_at(
    tokens: &[Token<'_>],
    i: usize,
    language: Language,
    block: Option<&Block>,
    parens: usize,
) -> Option<DecisionKind> {
    let token = tokens[i];
    let prev = i.checked_sub(1).map(|p| tokens[p]);

    match token.kind {
        TokenKind::AndAnd => Some(DecisionKind::LogicalAnd),
        TokenKind::OrOr => Some(DecisionKind::LogicalOr),
        TokenKind::Coalesce => Some(DecisionKind::NullCoalesce),
        TokenKind::Question => is_ternary(tokens, i, language).then_some(DecisionKind::Ternary),
        TokenKind::ThinArrow | TokenKind::FatArrow => {
            let style = language.arm_style()?;
            let in_arms = block.is_some_and(|b| b.arms && b.parens == parens);
            let fallback = prev.is_some_and(|p| p.text == style.fallback);
            (in_arms && token.text == style.arrow && !fallback).then_some(DecisionKind::Case)
        }
        TokenKind::Word => {
            if prev.is_some_and(|p| {
                matches!(
                    p.kind,
                    TokenKind::Dot | TokenKind::SafeCall | TokenKind::DoubleColon
                )
            }) {
                return None;
            }
            keyword_decision(token.text, prev, language)
        }
        _ => None,
    }
}

fn keyword_decision(word: &str, prev: Option<Token<'_>>, language: Language) -> Option<DecisionKind> {
    match word {
        "if" => match prev {
            Some(p) if p.is_word("else") => Some(DecisionKind::ElseIf),
            _ => Some(DecisionKind::If),
        },
        "elseif" if language == Language::Php => Some(DecisionKind::ElseIf),
        "for" | "foreach" | "while" => Some(DecisionKind::Loop),
        "case" => Some(DecisionKind::Case),
        "catch" => Some(DecisionKind::Catch),
        _ if language.word_logical_operators() => {
            if word.eq_ignore_ascii_case("and") {
                Some(DecisionKind::LogicalAnd)
            } else if word.eq_ignore_ascii_case("or") {
                Some(DecisionKind::LogicalOr)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Whether the `?` at `i` is a conditional operator rather than a wildcard,
/// a nullable type marker or part of `?:` / `?(` / `?[`.
fn is_ternary(tokens: &[Token<'_>], i: usize, language: Language) -> bool {
    if !language.has_ternary() {
        return false;
    }
    let token = tokens[i];
    let prev = i.checked_sub(1).map(|p| tokens[p]);
    let next = tokens.get(i + 1).copied();
    let glued_next = next.is_some_and(|n| n.start == token.end());

    if prev.is_some_and(|p| p.kind == TokenKind::Lt) {
        return false;
    }
    if let Some(n) = next {
        if matches!(n.kind, TokenKind::Gt | TokenKind::Comma) || n.is_word("extends") || n.is_word("super") {
            return false;
        }
        if glued_next && n.kind == TokenKind::Colon {
            return false;
        }
        if language.nullable_types()
            && glued_next
            && matches!(n.kind, TokenKind::OpenParen | TokenKind::OpenBracket)
        {
            return false;
        }
    }
    if language.nullable_types() && !glued_next {
        let glued_prev = prev.is_some_and(|p| {
            p.end() == token.start
                && matches!(p.kind, TokenKind::Word | TokenKind::Gt | TokenKind::CloseBracket)
        });
        if glued_prev {
            return false;
        }
    }
    true
}
