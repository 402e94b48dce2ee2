use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::stats::FileReport;
use log::{debug, warn};
use metric_lens_core::parser::is_binary;
use metric_lens_core::{AnalysisConfig, SourceUnit, analyze_with};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::Path;

/// Reads `path` into a [`SourceUnit`].
///
/// # Errors
///
/// Fails when the file cannot be read, exceeds `config.max_file_size` or
/// looks binary.
pub fn load_unit(path: &Path, config: &EngineConfig) -> Result<SourceUnit> {
    load_with(path, config, &config.analysis()).map(|(unit, _)| unit)
}

fn load_with(path: &Path, config: &EngineConfig, analysis: &AnalysisConfig) -> Result<(SourceUnit, u64)> {
    let read_err = |source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_err)?.len();
    if size > config.max_file_size {
        return Err(EngineError::FileTooLarge {
            size,
            max: config.max_file_size,
        });
    }

    let bytes = std::fs::read(path).map_err(read_err)?;
    if is_binary(&bytes) {
        return Err(EngineError::BinaryFile(path.to_path_buf()));
    }

    let id = path.to_string_lossy().into_owned();
    let language = analysis.language_of(&id);
    Ok((SourceUnit::from_bytes(id, &bytes, language), size))
}

/// Analyzes a loaded unit and counts comment keywords.
///
/// # Errors
///
/// Fails only when the keyword pattern cannot be compiled.
pub fn process_unit(unit: &SourceUnit, config: &EngineConfig) -> Result<FileReport> {
    let processor = Processor::new(config)?;
    Ok(processor.process(unit, unit.text.len() as u64))
}

/// Case-insensitive whole-word matcher for the configured comment keywords.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
    keywords: Vec<String>,
}

impl KeywordMatcher {
    /// `None` when there are no keywords to look for.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Regex`] if the combined pattern is rejected.
    pub fn new(keywords: &[String]) -> Result<Option<Self>> {
        let mut keywords: Vec<String> = keywords.iter().map(|k| k.trim().to_lowercase()).collect();
        keywords.sort();
        keywords.dedup();
        if keywords.is_empty() {
            return Ok(None);
        }
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()?;
        Ok(Some(Self { regex, keywords }))
    }

    /// Adds the occurrences found in `text` to `counts`.
    pub fn count_into(&self, text: &str, counts: &mut BTreeMap<String, usize>) {
        for found in self.regex.find_iter(text) {
            let word = found.as_str().to_lowercase();
            if let Some(keyword) = self.keywords.iter().find(|k| **k == word) {
                *counts.entry(keyword.clone()).or_default() += 1;
            }
        }
    }

    /// Every keyword with a zero count.
    #[must_use]
    pub fn empty_counts(&self) -> BTreeMap<String, usize> {
        self.keywords.iter().map(|k| (k.clone(), 0)).collect()
    }
}

/// Per-run state shared read-only by the worker threads.
#[derive(Debug, Clone)]
pub struct Processor<'a> {
    config: &'a EngineConfig,
    analysis: AnalysisConfig,
    keywords: Option<KeywordMatcher>,
}

impl<'a> Processor<'a> {
    /// # Errors
    ///
    /// Returns [`EngineError::Regex`] if the keyword pattern cannot be compiled.
    pub fn new(config: &'a EngineConfig) -> Result<Self> {
        Ok(Self {
            config,
            analysis: config.analysis(),
            keywords: KeywordMatcher::new(&config.comment_keywords)?,
        })
    }

    /// Loads and analyzes one file.
    ///
    /// # Errors
    ///
    /// Propagates [`load_unit`] failures.
    pub fn process_path(&self, path: &Path) -> Result<FileReport> {
        let (unit, size) = load_with(path, self.config, &self.analysis)?;
        let mut report = self.process(&unit, size);
        report.path = path.to_path_buf();
        Ok(report)
    }

    #[must_use]
    pub fn process(&self, unit: &SourceUnit, size: u64) -> FileReport {
        let report = analyze_with(unit, &self.analysis);
        debug!(
            "{}: {} lines, {} scopes, complexity {} ({})",
            unit.id,
            report.metrics.total_lines,
            report.scopes.len(),
            report.complexity,
            unit.language.name()
        );
        for flag in &report.flags {
            warn!("{}: {}", unit.id, flag);
        }

        let mut comment_keywords = BTreeMap::new();
        if let Some(matcher) = &self.keywords {
            comment_keywords = matcher.empty_counts();
            for span in report.spans.iter().filter(|s| s.kind.is_comment()) {
                matcher.count_into(span.text(&unit.text), &mut comment_keywords);
            }
        }

        FileReport {
            path: unit.id.clone().into(),
            size,
            report,
            comment_keywords,
        }
    }
}
