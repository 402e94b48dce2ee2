use crate::error::EngineError;
use metric_lens_core::UnitReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Analysis of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Size in bytes as read from disk.
    pub size: u64,
    pub report: UnitReport,
    /// Occurrences of each configured keyword inside comments.
    pub comment_keywords: BTreeMap<String, usize>,
}

impl FileReport {
    #[must_use]
    pub fn new(path: PathBuf, size: u64, report: UnitReport) -> Self {
        Self {
            path,
            size,
            report,
            comment_keywords: BTreeMap::new(),
        }
    }
}

/// Reports plus the per-file errors collected in non-strict mode.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Ordered by path.
    pub reports: Vec<FileReport>,
    /// Ordered by path.
    pub errors: Vec<(PathBuf, EngineError)>,
}

/// Totals across every successfully analyzed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: usize,
    pub errors: usize,
    pub lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub real_lines: usize,
    pub classes: usize,
    pub functions: usize,
    pub complexity: u64,
    /// Highest single callable score.
    pub max_complexity: u32,
    /// Files carrying at least one malformed-input flag.
    pub malformed_files: usize,
    pub comment_keywords: BTreeMap<String, usize>,
}

/// Aggregates a run into totals.
#[must_use]
pub fn summarize(result: &RunResult) -> RunSummary {
    let mut summary = RunSummary {
        files: result.reports.len(),
        errors: result.errors.len(),
        ..RunSummary::default()
    };
    for file in &result.reports {
        let report = &file.report;
        summary.lines += report.metrics.total_lines;
        summary.blank_lines += report.metrics.blank_lines;
        summary.comment_lines += report.comment_lines;
        summary.real_lines += report.metrics.real_lines;
        summary.classes += report.classes;
        summary.functions += report.functions;
        summary.complexity += report.complexity;
        summary.max_complexity = summary.max_complexity.max(report.max_complexity());
        if report.is_malformed() {
            summary.malformed_files += 1;
        }
        for (keyword, count) in &file.comment_keywords {
            *summary.comment_keywords.entry(keyword.clone()).or_default() += count;
        }
    }
    summary
}
