//! # Line Classifier
//!
//! Labels each physical line from the spans that touch it and aggregates the
//! line-count metrics.
//!
//! A line is code-bearing when a code span puts a non-whitespace character on
//! it or a literal span touches it (a blank line inside a text block is still
//! part of the literal). It is comment-bearing when a comment span puts a
//! non-whitespace character on it or a block comment that started on an
//! earlier line runs through it, so the blank lines inside a multi-line
//! comment count as comment lines.

use crate::scanner::{Span, SpanKind};
use alloc::vec::Vec;
use core::ops::AddAssign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    CommentOnly,
    CodeOnly,
    Mixed,
}

impl LineKind {
    #[must_use]
    pub const fn has_code(self) -> bool {
        matches!(self, Self::CodeOnly | Self::Mixed)
    }

    #[must_use]
    pub const fn has_comment(self) -> bool {
        matches!(self, Self::CommentOnly | Self::Mixed)
    }
}

/// Set of span kinds touching a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanKindSet {
    bits: u8,
}

impl SpanKindSet {
    const fn bit(kind: SpanKind) -> u8 {
        match kind {
            SpanKind::Code => 1 << 0,
            SpanKind::LineComment => 1 << 1,
            SpanKind::BlockComment => 1 << 2,
            SpanKind::StringLiteral => 1 << 3,
            SpanKind::TextBlockLiteral => 1 << 4,
        }
    }

    pub fn insert(&mut self, kind: SpanKind) {
        self.bits |= Self::bit(kind);
    }

    #[must_use]
    pub const fn contains(self, kind: SpanKind) -> bool {
        self.bits & Self::bit(kind) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// One physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character, excluding the line break.
    pub end: usize,
    pub kinds: SpanKindSet,
    pub kind: LineKind,
}

/// Line-count metrics for a unit or a scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMetrics {
    /// Physical lines, blank ones included.
    pub total_lines: usize,
    pub blank_lines: usize,
    pub comment_only_lines: usize,
    /// Lines holding both code and comment text.
    pub mixed_lines: usize,
    /// `CodeOnly + Mixed`.
    pub code_lines: usize,
    /// `total - blank - comment_only`; the "real lines of code".
    pub real_lines: usize,
    /// `total - blank`; raw non-blank lines, comments included.
    pub non_blank_lines: usize,
    /// Lines touched by a comment (`CommentOnly + Mixed`).
    pub comment_lines: usize,
}

impl LineMetrics {
    /// Aggregates metrics over a run of classified lines.
    #[must_use]
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut metrics = Self::default();
        for line in lines {
            metrics.record(line.kind);
        }
        metrics
    }

    fn record(&mut self, kind: LineKind) {
        self.total_lines += 1;
        match kind {
            LineKind::Blank => self.blank_lines += 1,
            LineKind::CommentOnly => self.comment_only_lines += 1,
            LineKind::CodeOnly => {}
            LineKind::Mixed => self.mixed_lines += 1,
        }
        if kind.has_code() {
            self.code_lines += 1;
            self.real_lines += 1;
        }
        if kind != LineKind::Blank {
            self.non_blank_lines += 1;
        }
        if kind.has_comment() {
            self.comment_lines += 1;
        }
    }

    /// Number of `CodeOnly` lines.
    #[must_use]
    pub const fn code_only_lines(&self) -> usize {
        self.code_lines - self.mixed_lines
    }
}

impl AddAssign for LineMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.total_lines += rhs.total_lines;
        self.blank_lines += rhs.blank_lines;
        self.comment_only_lines += rhs.comment_only_lines;
        self.mixed_lines += rhs.mixed_lines;
        self.code_lines += rhs.code_lines;
        self.real_lines += rhs.real_lines;
        self.non_blank_lines += rhs.non_blank_lines;
        self.comment_lines += rhs.comment_lines;
    }
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = Vec::new();
        if !bytes.is_empty() {
            starts.push(0);
            starts.extend(
                memchr::memchr_iter(b'\n', bytes)
                    .map(|p| p + 1)
                    .filter(|&p| p < bytes.len()),
            );
        }
        Self {
            starts,
            len: bytes.len(),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 1-based line containing `offset`; offsets at or past the end map to the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }

    /// Byte range `[start, next_start)` of a 1-based line, line break included.
    #[must_use]
    pub fn full_range(&self, number: usize) -> (usize, usize) {
        let start = self.starts[number - 1];
        let end = self.starts.get(number).copied().unwrap_or(self.len);
        (start, end)
    }
}

/// Classifier output for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClassification {
    pub lines: Vec<Line>,
    pub metrics: LineMetrics,
}

/// Classifies every physical line of `source` from its span partition.
#[must_use]
pub fn classify(source: &str, spans: &[Span], index: &LineIndex) -> LineClassification {
    let count = index.line_count();
    let mut code = alloc::vec![false; count];
    let mut comment = alloc::vec![false; count];
    let mut kinds = alloc::vec![SpanKindSet::default(); count];

    for span in spans.iter().filter(|s| !s.is_empty()) {
        let mut number = index.line_of(span.start);
        while number <= count {
            let (line_start, line_end) = index.full_range(number);
            if line_start >= span.end {
                break;
            }
            let from = span.start.max(line_start);
            let to = span.end.min(line_end);
            let piece = &source[from..to];
            let visible = piece.chars().any(|c| !c.is_whitespace());
            let slot = number - 1;

            kinds[slot].insert(span.kind);
            match span.kind {
                SpanKind::Code => code[slot] |= visible,
                SpanKind::StringLiteral | SpanKind::TextBlockLiteral => code[slot] = true,
                SpanKind::LineComment | SpanKind::BlockComment => {
                    comment[slot] |= visible || span.start < line_start;
                }
            }
            number += 1;
        }
    }

    let mut lines = Vec::with_capacity(count);
    let mut metrics = LineMetrics::default();
    for slot in 0..count {
        let kind = match (code[slot], comment[slot]) {
            (true, true) => LineKind::Mixed,
            (true, false) => LineKind::CodeOnly,
            (false, true) => LineKind::CommentOnly,
            (false, false) => LineKind::Blank,
        };
        let (start, full_end) = index.full_range(slot + 1);
        let end = if source[start..full_end].ends_with('\n') {
            full_end - 1
        } else {
            full_end
        };
        metrics.record(kind);
        lines.push(Line {
            number: slot + 1,
            start,
            end,
            kinds: kinds[slot],
            kind,
        });
    }

    LineClassification { lines, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LexOptions;
    use crate::scanner::scan;

    fn kinds_of(text: &str) -> Vec<LineKind> {
        let out = scan(text, LexOptions::java_kotlin());
        let index = LineIndex::new(text);
        classify(text, &out.spans, &index)
            .lines
            .iter()
            .map(|l| l.kind)
            .collect()
    }

    #[test]
    fn scenario_mixed_comment_and_blank_lines() {
        let text = "x++; // increment\n// increment\n   \t\ny = 2;\n";
        assert_eq!(
            kinds_of(text),
            [
                LineKind::Mixed,
                LineKind::CommentOnly,
                LineKind::Blank,
                LineKind::CodeOnly
            ]
        );
    }

    #[test]
    fn empty_source_has_no_lines() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 0);
        let result = classify("", &[], &index);
        assert!(result.lines.is_empty());
        assert_eq!(result.metrics, LineMetrics::default());
    }

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        assert_eq!(LineIndex::new("a\n").line_count(), 1);
        assert_eq!(LineIndex::new("a\n\n").line_count(), 2);
        assert_eq!(LineIndex::new("a").line_count(), 1);
    }

    #[test]
    fn blank_lines_inside_block_comment_are_comment_lines() {
        let text = "/*\n  first\n\n  last\n */\nint x;";
        assert_eq!(
            kinds_of(text),
            [
                LineKind::CommentOnly,
                LineKind::CommentOnly,
                LineKind::CommentOnly,
                LineKind::CommentOnly,
                LineKind::CommentOnly,
                LineKind::CodeOnly
            ]
        );
    }

    #[test]
    fn code_after_block_comment_close_is_mixed() {
        let text = "/* a\n b */ int x;\nint y; /* c */";
        assert_eq!(
            kinds_of(text),
            [LineKind::CommentOnly, LineKind::Mixed, LineKind::Mixed]
        );
    }

    #[test]
    fn text_block_lines_are_code_even_when_blank() {
        let text = "s = \"\"\"\n\n  // inert\n\"\"\";";
        assert_eq!(
            kinds_of(text),
            [
                LineKind::CodeOnly,
                LineKind::CodeOnly,
                LineKind::CodeOnly,
                LineKind::CodeOnly
            ]
        );
    }

    #[test]
    fn metrics_partition_the_line_count() {
        let text = "// c\n\nint a; // b\nint c;\n";
        let out = scan(text, LexOptions::java_kotlin());
        let index = LineIndex::new(text);
        let m = classify(text, &out.spans, &index).metrics;
        assert_eq!(m.total_lines, 4);
        assert_eq!(m.blank_lines, 1);
        assert_eq!(m.comment_only_lines, 1);
        assert_eq!(m.mixed_lines, 1);
        assert_eq!(m.code_only_lines(), 1);
        assert_eq!(m.code_lines, 2);
        assert_eq!(m.real_lines, m.total_lines - m.blank_lines - m.comment_only_lines);
        assert_eq!(m.non_blank_lines, 3);
        assert_eq!(m.comment_lines, 2);
    }

    #[test]
    fn line_index_maps_offsets() {
        let index = LineIndex::new("ab\ncd\nef");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(7), 3);
        assert_eq!(index.full_range(2), (3, 6));
        assert_eq!(index.full_range(3), (6, 8));
    }

    #[test]
    fn line_records_exclude_the_line_break() {
        let text = "ab\r\ncd";
        let out = scan(text, LexOptions::c());
        let index = LineIndex::new(text);
        let lines = classify(text, &out.spans, &index).lines;
        assert_eq!((lines[0].start, lines[0].end), (0, 3));
        assert_eq!((lines[1].start, lines[1].end), (4, 6));
        assert!(lines[0].kinds.contains(SpanKind::Code));
    }
}
