pub mod logging;

pub mod cli;
pub mod collector;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod storage;

pub use collector::Collector;
pub use config::ConfigManager;
pub use dashboard::Dashboard;
pub use error::{PipelineError, PipelineResult};
pub use normalizer::Normalizer;
