// crates/engine/src/lib.rs
//! Multi-file driver around `metric_lens_core`.
//!
//! File discovery is the caller's job: [`run`] takes the paths to analyze,
//! loads each one, analyzes it on a rayon pool and returns the reports
//! together with the per-file errors.
use log::{info, warn};
use rayon::iter::Either;
use rayon::prelude::*;
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod processor;
pub mod stats;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{EngineError, Result};
pub use processor::{load_unit, process_unit};
pub use stats::{FileReport, RunResult, RunSummary, summarize};

use crate::processor::Processor;

/// Analyze every file in `paths`.
///
/// Each file is one task on a pool of `config.threads` workers; tasks share
/// nothing mutable. Reports and errors come back sorted by path.
///
/// # Errors
///
/// Returns an error for an invalid configuration or a pool that cannot be
/// built. In strict mode the first file error is returned as well; otherwise
/// file errors are collected in [`RunResult::errors`].
pub fn run(paths: &[PathBuf], config: &EngineConfig) -> Result<RunResult> {
    config.validate()?;
    let processor = Processor::new(config)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    info!(
        "Analyzing {} files on {} threads (strict: {})",
        paths.len(),
        config.threads,
        config.strict
    );

    let mut result = if config.strict {
        // Strict mode: fail on first error
        let reports = pool.install(|| {
            paths
                .par_iter()
                .map(|path| processor.process_path(path))
                .collect::<Result<Vec<_>>>()
        })?;
        RunResult {
            reports,
            errors: Vec::new(),
        }
    } else {
        // Non-strict mode: collect errors alongside successful results
        let (reports, errors): (Vec<FileReport>, Vec<(PathBuf, EngineError)>) = pool.install(|| {
            paths
                .par_iter()
                .partition_map(|path| match processor.process_path(path) {
                    Ok(report) => Either::Left(report),
                    Err(e) => Either::Right((path.clone(), e)),
                })
        });
        RunResult { reports, errors }
    };

    result.reports.sort_by(|a, b| a.path.cmp(&b.path));
    result.errors.sort_by(|a, b| a.0.cmp(&b.0));
    for (path, error) in &result.errors {
        warn!("{}: {}", path.display(), error);
    }

    info!(
        "Analyzed {} files ({} errors)",
        result.reports.len(),
        result.errors.len()
    );
    Ok(result)
}
