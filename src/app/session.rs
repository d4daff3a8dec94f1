use crate::catalog::{list_concentrations, load_concentration, CatalogRow};
use crate::core::audit::AuditEngine;
use crate::core::report::render_text;
use crate::domain::model::{ConcentrationKind, Course, Student};
use crate::domain::policy::RenderOptions;
use crate::domain::ports::{ResultStore, StoredReport};
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NO_PROGRESS_MESSAGE: &str =
    "No student data available. Please submit your selections first.";

/// Concentration names a student can pick from, per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcentrationOptions {
    pub majors: Vec<String>,
    pub minors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub session: String,
    pub stored_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

/// Submit-then-fetch service. The catalog rows are loaded once; every
/// submission evaluates from scratch and replaces the session's entry.
pub struct ProgressService<S: ResultStore> {
    engine: AuditEngine,
    store: S,
    major_rows: Vec<CatalogRow>,
    minor_rows: Vec<CatalogRow>,
    render_options: RenderOptions,
}

impl<S: ResultStore> ProgressService<S> {
    pub fn new(
        engine: AuditEngine,
        store: S,
        major_rows: Vec<CatalogRow>,
        minor_rows: Vec<CatalogRow>,
    ) -> Self {
        Self {
            engine,
            store,
            major_rows,
            minor_rows,
            render_options: RenderOptions::default(),
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn concentration_options(&self) -> ConcentrationOptions {
        ConcentrationOptions {
            majors: list_concentrations(&self.major_rows),
            minors: list_concentrations(&self.minor_rows),
        }
    }

    pub fn submit_selections(
        &self,
        session: &str,
        graduation_year: Option<u16>,
        courses: Vec<Course>,
        majors: &[String],
        minors: &[String],
    ) -> Result<SubmissionReceipt> {
        validate_non_empty_string("session", session)?;

        let majors = majors
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| load_concentration(ConcentrationKind::Major, name, &self.major_rows))
            .collect();
        let minors = minors
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| load_concentration(ConcentrationKind::Minor, name, &self.minor_rows))
            .collect();

        let student = Student::new(graduation_year, courses, majors, minors);
        let report = self.engine.evaluate(&student);
        let warnings = report.warnings.clone();

        let stored = self.store.put(session, report);
        tracing::info!(
            "Stored progress for session '{}' ({} warning(s))",
            session,
            warnings.len()
        );

        Ok(SubmissionReceipt {
            session: session.to_string(),
            stored_at: stored.stored_at,
            warnings,
        })
    }

    pub fn student_progress(&self, session: &str) -> Option<StoredReport> {
        self.store.get(session)
    }

    pub fn student_progress_text(&self, session: &str) -> String {
        match self.store.get(session) {
            Some(stored) => render_text(&stored.report, &self.render_options),
            None => NO_PROGRESS_MESSAGE.to_string(),
        }
    }

    pub fn invalidate(&self, session: &str) -> bool {
        let removed = self.store.invalidate(session);
        if removed {
            tracing::debug!("Invalidated progress for session '{}'", session);
        }
        removed
    }
}
