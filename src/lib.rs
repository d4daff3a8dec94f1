pub mod adapters;
pub mod app;
pub mod catalog;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use core::{audit::AuditEngine, pipeline::AuditPipeline, runner::AuditRunner};
pub use utils::error::{AuditError, Result};
