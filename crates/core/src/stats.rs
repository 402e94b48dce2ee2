use crate::complexity::ComplexityRecord;
use crate::diagnostics::MalformedFlag;
use crate::language::Language;
use crate::lines::{LineKind, LineMetrics};
use crate::scanner::Span;
use crate::structure::{ScopeId, ScopeKind, ScopeTree, TypeKind};
use alloc::string::String;
use alloc::vec::Vec;
use serde::Serialize;

/// Metrics of one scope below the unit root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    pub id: ScopeId,
    pub kind: ScopeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_kind: Option<TypeKind>,
    pub name: String,
    pub parent: Option<ScopeId>,
    /// Byte range `[start, end)`.
    pub start: usize,
    pub end: usize,
    /// 1-based, inclusive.
    pub start_line: usize,
    pub end_line: usize,
    pub metrics: LineMetrics,
    /// Present for methods, initializers and lambdas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityRecord>,
    pub unterminated: bool,
}

/// Everything `analyze` learns about one unit.
///
/// Only a function of the unit's text, language and rules: analyzing the same
/// input twice yields equal reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub id: String,
    pub language: Language,
    pub metrics: LineMetrics,
    /// Kind of each physical line, first line first.
    pub lines: Vec<LineKind>,
    /// Scanner partition of the text.
    #[serde(skip)]
    pub spans: Vec<Span>,
    pub tree: ScopeTree,
    pub scopes: Vec<ScopeReport>,
    /// Malformed-input flags ordered by offset.
    pub flags: Vec<MalformedFlag>,
    /// Type declarations, anonymous ones included.
    pub classes: usize,
    /// Methods, constructors, initializer blocks and lambdas.
    pub functions: usize,
    pub comment_lines: usize,
    /// Sum of every callable's score.
    pub complexity: u64,
}

impl UnitReport {
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Reports of the callable scopes, in order of opening.
    pub fn callables(&self) -> impl Iterator<Item = &ScopeReport> {
        self.scopes.iter().filter(|s| s.kind.is_callable())
    }

    /// First scope named `name`.
    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&ScopeReport> {
        self.scopes.iter().find(|s| s.name == name)
    }

    /// Highest callable score, 0 when the unit has no callables.
    #[must_use]
    pub fn max_complexity(&self) -> u32 {
        self.callables()
            .filter_map(|s| s.complexity.map(|c| c.score))
            .max()
            .unwrap_or(0)
    }
}
