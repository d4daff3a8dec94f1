use crate::adapters::catalog_csv::read_catalog_rows;
use crate::adapters::transcript_csv::read_transcript;
use crate::catalog::load_concentration;
use crate::core::audit::AuditEngine;
use crate::core::report::render;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ConcentrationKind, Student};
use crate::domain::ports::AuditOutput;
use crate::domain::progress::ProgressReport;
use crate::utils::error::Result;

/// File-driven audit: transcript and catalogs come from storage, the
/// rendered report goes back to storage when an output path is configured.
pub struct AuditPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    engine: AuditEngine,
}

impl<S: Storage, C: ConfigProvider> AuditPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let engine = AuditEngine::new(config.match_policy());
        Self {
            storage,
            config,
            engine,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AuditPipeline<S, C> {
    async fn extract(&self) -> Result<Student> {
        tracing::debug!("Reading transcript from: {}", self.config.transcript_path());
        let transcript = self.storage.read_file(self.config.transcript_path()).await?;
        let courses = read_transcript(&transcript)?;

        // 只在有選擇時才讀取目錄
        let majors = if self.config.majors().is_empty() {
            Vec::new()
        } else {
            let data = self.storage.read_file(self.config.major_catalog_path()).await?;
            let rows = read_catalog_rows(&data)?;
            self.config
                .majors()
                .iter()
                .map(|name| load_concentration(ConcentrationKind::Major, name, &rows))
                .collect()
        };

        let minors = if self.config.minors().is_empty() {
            Vec::new()
        } else {
            let data = self.storage.read_file(self.config.minor_catalog_path()).await?;
            let rows = read_catalog_rows(&data)?;
            self.config
                .minors()
                .iter()
                .map(|name| load_concentration(ConcentrationKind::Minor, name, &rows))
                .collect()
        };

        Ok(Student::new(
            self.config.graduation_year(),
            courses,
            majors,
            minors,
        ))
    }

    async fn transform(&self, student: Student) -> Result<ProgressReport> {
        Ok(self.engine.evaluate(&student))
    }

    async fn load(&self, report: ProgressReport) -> Result<AuditOutput> {
        let rendered = render(
            &report,
            self.config.output_format(),
            &self.config.render_options(),
        )?;

        let written_to = match self.config.output_path() {
            Some(path) => {
                self.storage.write_file(path, rendered.as_bytes()).await?;
                tracing::debug!("Wrote {} bytes to {}", rendered.len(), path);
                Some(path.to_string())
            }
            None => None,
        };

        Ok(AuditOutput {
            rendered,
            written_to,
            report,
        })
    }
}
