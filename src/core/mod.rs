pub mod audit;
pub mod grade;
pub mod group_matcher;
pub mod pipeline;
pub mod pool;
pub mod report;
pub mod runner;
pub mod sequence_matcher;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
