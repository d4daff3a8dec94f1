use crate::core::Pipeline;
use crate::domain::ports::AuditOutput;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a pipeline through extract, transform and load.
pub struct AuditRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<AuditOutput> {
        let started = Instant::now();
        tracing::info!("Starting audit...");

        // Extract
        let student = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} course(s), {} concentration(s)",
            student.courses.len(),
            student.majors.len() + student.minors.len()
        );

        // Transform
        let report = self.pipeline.transform(student).await?;
        let complete = report
            .concentrations
            .iter()
            .filter(|c| c.is_complete())
            .count();
        tracing::info!(
            "Evaluated {} concentration(s), {} complete",
            report.concentrations.len(),
            complete
        );
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        // Load
        let output = self.pipeline.load(report).await?;
        if let Some(path) = &output.written_to {
            tracing::info!("Report saved to: {}", path);
        }

        tracing::info!("Audit finished in {:.2?}", started.elapsed());
        Ok(output)
    }
}
