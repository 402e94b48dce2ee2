//! Lexical and structural source metrics for C-family languages.
//!
//! The pipeline is a chain of pure functions:
//! [`scanner`] → [`lines`] and [`structure`] (over [`tokens`]) → [`complexity`],
//! tied together by [`analyze`].
#![no_std]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

pub mod complexity;
pub mod config;
pub mod diagnostics;
pub mod language;
pub mod lines;
pub mod parser;
pub mod scanner;
pub mod stats;
pub mod structure;
pub mod tokens;
pub mod unit;

pub use config::AnalysisConfig;
pub use parser::{analyze, analyze_with};
pub use stats::{ScopeReport, UnitReport};
pub use unit::SourceUnit;
