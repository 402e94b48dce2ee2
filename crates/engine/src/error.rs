use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{0}' looks binary")]
    BinaryFile(PathBuf),

    #[error("File size {size} is larger than maximum {max}")]
    FileTooLarge { size: u64, max: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config builder error: {0}")]
    Builder(#[from] crate::config::EngineConfigBuilderError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
