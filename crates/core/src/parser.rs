use crate::complexity::calculate;
use crate::config::AnalysisConfig;
use crate::lines::{LineIndex, LineMetrics, classify};
use crate::scanner::scan;
use crate::stats::{ScopeReport, UnitReport};
use crate::structure::{ScopeKind, track};
use crate::tokens::{code_tokens, pair_brackets};
use crate::unit::SourceUnit;
use alloc::vec::Vec;

/// Analyzes one unit with the default complexity rules.
///
/// This is the core entry point for the library. It never fails: malformed
/// input yields best-effort metrics plus flags in [`UnitReport::flags`].
///
/// ```rust
/// use metric_lens_core::{SourceUnit, analyze};
///
/// let unit = SourceUnit::new("Demo.java", "class Demo {\n  int f(int x) { return x > 0 ? 1 : 0; }\n}\n");
/// let report = analyze(&unit);
/// assert_eq!(report.metrics.total_lines, 3);
/// assert_eq!(report.classes, 1);
/// assert_eq!(report.scope("f").and_then(|s| s.complexity).map(|c| c.score), Some(2));
/// ```
#[must_use]
pub fn analyze(unit: &SourceUnit) -> UnitReport {
    analyze_with(unit, &AnalysisConfig::default())
}

/// Analyzes one unit with the rules of `config`.
///
/// The unit's own language is used; `config.map_ext` only matters when the
/// caller builds units through [`AnalysisConfig::language_of`].
#[must_use]
pub fn analyze_with(unit: &SourceUnit, config: &AnalysisConfig) -> UnitReport {
    let text = unit.text.as_str();
    let language = unit.language;

    // 1. 字句解析
    let scanned = scan(text, language.lex_options());

    // 2. 行分類
    let index = LineIndex::new(text);
    let classified = classify(text, &scanned.spans, &index);

    // 3. スコープ木
    let tokens = code_tokens(text, &scanned.spans, language);
    let partners = pair_brackets(&tokens);
    let tracked = track(&tokens, &partners, text, language, &unit.id);
    let tree = tracked.tree;

    // 4. スコープごとの行数と複雑度
    let mut scopes = Vec::with_capacity(tree.len().saturating_sub(1));
    let mut complexity = 0u64;
    for (id, node) in tree.iter().skip(1) {
        let (start_line, end_line) = line_span(&index, node.start, node.end);
        let metrics = if start_line == 0 {
            LineMetrics::default()
        } else {
            LineMetrics::from_lines(&classified.lines[start_line - 1..end_line])
        };
        let record = node
            .kind
            .is_callable()
            .then(|| calculate(&tokens, &partners, &tree, id, language, &config.rules));
        if let Some(record) = record {
            complexity += u64::from(record.score);
        }
        scopes.push(ScopeReport {
            id,
            kind: node.kind,
            type_kind: node.type_kind,
            name: node.name.clone(),
            parent: node.parent,
            start: node.start,
            end: node.end,
            start_line,
            end_line,
            metrics,
            complexity: record,
            unterminated: node.unterminated,
        });
    }

    let mut flags = scanned.flags;
    flags.extend(tracked.flags);
    flags.sort_by_key(|f| (f.offset, f.kind as u8));

    UnitReport {
        id: unit.id.clone(),
        language,
        metrics: classified.metrics,
        lines: classified.lines.iter().map(|l| l.kind).collect(),
        spans: scanned.spans,
        classes: tree.count(ScopeKind::Type),
        functions: scopes.iter().filter(|s| s.kind.is_callable()).count(),
        comment_lines: classified.metrics.comment_lines,
        complexity,
        tree,
        scopes,
        flags,
    }
}

/// 1-based inclusive line range of `[start, end)`; `(0, 0)` for a unit without lines.
fn line_span(index: &LineIndex, start: usize, end: usize) -> (usize, usize) {
    if index.line_count() == 0 {
        return (0, 0);
    }
    let first = index.line_of(start);
    let last = index.line_of(end.saturating_sub(1).max(start));
    (first, last.min(index.line_count()))
}

/// Whether `input` looks binary: a NUL byte within the first 8 KiB.
#[must_use]
pub fn is_binary(input: &[u8]) -> bool {
    let len = input.len().min(8 * 1024);
    memchr::memchr(0, &input[..len]).is_some()
}
