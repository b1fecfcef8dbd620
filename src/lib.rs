//! Research assistant pipeline: search the web for a topic, summarize each
//! source with a language model and synthesize a cited report, streaming
//! progress to the caller.

pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod server;
pub mod tasks;
pub mod tools;
pub mod truncation;

pub use error::{ConfigError, ResearchError, ValidationError};
pub use tasks::ResearchService;
