use super::{Breakdown, DecisionKind};
use serde::{Deserialize, Serialize};

/// Weight added to a callable's score per decision point of each kind.
///
/// Every weight defaults to 1, which yields plain McCabe-style counting.
/// A weight of 0 drops the construct from the score while the breakdown
/// still records how often it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityRules {
    pub r#if: u32,
    pub else_if: u32,
    pub r#loop: u32,
    pub case: u32,
    pub catch: u32,
    pub logical_and: u32,
    pub logical_or: u32,
    pub ternary: u32,
    pub null_coalesce: u32,
}

impl Default for ComplexityRules {
    fn default() -> Self {
        Self::uniform(1)
    }
}

impl ComplexityRules {
    /// Same weight for every kind.
    #[must_use]
    pub const fn uniform(weight: u32) -> Self {
        Self {
            r#if: weight,
            else_if: weight,
            r#loop: weight,
            case: weight,
            catch: weight,
            logical_and: weight,
            logical_or: weight,
            ternary: weight,
            null_coalesce: weight,
        }
    }

    #[must_use]
    pub const fn weight(&self, kind: DecisionKind) -> u32 {
        match kind {
            DecisionKind::If => self.r#if,
            DecisionKind::ElseIf => self.else_if,
            DecisionKind::Loop => self.r#loop,
            DecisionKind::Case => self.case,
            DecisionKind::Catch => self.catch,
            DecisionKind::LogicalAnd => self.logical_and,
            DecisionKind::LogicalOr => self.logical_or,
            DecisionKind::Ternary => self.ternary,
            DecisionKind::NullCoalesce => self.null_coalesce,
        }
    }

    #[must_use]
    pub const fn with_weight(mut self, kind: DecisionKind, weight: u32) -> Self {
        match kind {
            DecisionKind::If => self.r#if = weight,
            DecisionKind::ElseIf => self.else_if = weight,
            DecisionKind::Loop => self.r#loop = weight,
            DecisionKind::Case => self.case = weight,
            DecisionKind::Catch => self.catch = weight,
            DecisionKind::LogicalAnd => self.logical_and = weight,
            DecisionKind::LogicalOr => self.logical_or = weight,
            DecisionKind::Ternary => self.ternary = weight,
            DecisionKind::NullCoalesce => self.null_coalesce = weight,
        }
        self
    }

    /// `1 + Σ weight × count`, saturating.
    #[must_use]
    pub fn score(&self, breakdown: &Breakdown) -> u32 {
        DecisionKind::ALL.iter().fold(1u32, |acc, &kind| {
            acc.saturating_add(self.weight(kind).saturating_mul(breakdown.get(kind)))
        })
    }
}
