//! gridbench: grid pathfinding benchmarks over MovingAI map corpora.

pub mod baseline;
pub mod config;
pub mod corpus;
pub mod error;
pub mod report;
pub mod runner;

pub use baseline::{Baseline, Comparison, settle_baseline};
pub use config::{BenchConfig, DEFAULT_CONFIG_FILE, OutputFormat, ParseFormatError};
pub use corpus::{CorpusTotals, MAP_EXTENSION, discover_maps, run_corpus};
pub use error::BenchError;
pub use report::{MapReport, Statistics};
pub use runner::Runner;
