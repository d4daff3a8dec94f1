use crate::domain::model::Student;
use crate::domain::policy::{MatchPolicy, OutputFormat, RenderOptions};
use crate::domain::progress::ProgressReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn transcript_path(&self) -> &str;
    fn major_catalog_path(&self) -> &str;
    fn minor_catalog_path(&self) -> &str;
    fn majors(&self) -> &[String];
    fn minors(&self) -> &[String];
    fn graduation_year(&self) -> Option<u16>;
    fn output_format(&self) -> OutputFormat;
    fn output_path(&self) -> Option<&str>;
    fn match_policy(&self) -> MatchPolicy;
    fn render_options(&self) -> RenderOptions;
}

/// What the load step produced: the rendered report and, if it was written
/// to storage, where.
#[derive(Debug, Clone)]
pub struct AuditOutput {
    pub rendered: String,
    pub written_to: Option<String>,
    pub report: ProgressReport,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Student>;
    async fn transform(&self, student: Student) -> Result<ProgressReport>;
    async fn load(&self, report: ProgressReport) -> Result<AuditOutput>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub report: ProgressReport,
    pub stored_at: DateTime<Utc>,
}

/// Keyed store for computed reports. Supplied by the caller; the engine
/// never reads or writes it.
pub trait ResultStore: Send + Sync {
    fn put(&self, session: &str, report: ProgressReport) -> StoredReport;
    fn get(&self, session: &str) -> Option<StoredReport>;
    /// Returns true if an entry was removed.
    fn invalidate(&self, session: &str) -> bool;
    fn clear(&self);
}
