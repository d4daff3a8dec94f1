//! Requirement catalog: row model, cell grammar and concentration loading.

pub mod loader;
pub mod tokens;

pub use loader::{list_concentrations, load_concentration, parse_rule, CatalogRow};

use thiserror::Error;

/// A catalog row that cannot be turned into a requirement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("'{title}': malformed number requirement '{token}' (expected N(MMM))")]
    MalformedNumberRequirement { title: String, token: String },

    #[error("'{title}': malformed type requirement '{token}' (expected N(TAG))")]
    MalformedTypeRequirement { title: String, token: String },

    #[error("'{title}': malformed sequence clause '{clause}': {reason}")]
    MalformedSequenceClause {
        title: String,
        clause: String,
        reason: String,
    },

    #[error("'{title}': course list is empty")]
    EmptyCourseGroup { title: String },
}

impl RuleError {
    pub fn title(&self) -> &str {
        match self {
            RuleError::MalformedNumberRequirement { title, .. }
            | RuleError::MalformedTypeRequirement { title, .. }
            | RuleError::MalformedSequenceClause { title, .. }
            | RuleError::EmptyCourseGroup { title } => title,
        }
    }
}
