use std::io;
use std::path::PathBuf;

use gridbench_movingai::LoadError;

/// Errors that abort a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// A map or its scenarios could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for [`BenchConfig`](crate::BenchConfig).
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting is out of range.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("cannot start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot access baseline {}: {source}", path.display())]
    BaselineIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The baseline file is not a saved [`Baseline`](crate::Baseline).
    #[error("invalid baseline {}: {source}", path.display())]
    BaselineFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The corpus directory could not be walked.
    #[error("cannot scan corpus: {0}")]
    Walk(#[from] walkdir::Error),
}
