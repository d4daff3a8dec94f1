use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Transcript error at row {row}: {message}")]
    TranscriptError { row: usize, message: String },
}

/// 錯誤分類，用於日誌與結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::ConfigError { .. }
            | AuditError::TomlError(_)
            | AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AuditError::CsvError(_) | AuditError::TranscriptError { .. } => ErrorCategory::Input,
            AuditError::SerializationError(_) => ErrorCategory::Processing,
            AuditError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AuditError::CsvError(_) => {
                "Check that the CSV file has a header row and the expected columns".to_string()
            }
            AuditError::IoError(_) => "Check that the file exists and is readable".to_string(),
            AuditError::SerializationError(_) => {
                "Try the text output format instead of json".to_string()
            }
            AuditError::TomlError(_) => "Check the TOML syntax near the reported line".to_string(),
            AuditError::ConfigError { .. } | AuditError::ConfigValidationError { .. } => {
                "Review the configuration file against the documented sections".to_string()
            }
            AuditError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            AuditError::MissingConfigError { field } => {
                format!("Set '{}' on the command line or in the config file", field)
            }
            AuditError::TranscriptError { .. } => {
                "Check the transcript columns: code,title,term,year,credits,grade,types"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Processing => format!("Audit failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_severity() {
        let err = AuditError::MissingConfigError {
            field: "transcript".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("transcript"));

        let io = AuditError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(io.user_friendly_message().starts_with("System error"));
    }

    #[test]
    fn test_every_variant_has_a_category() {
        let toml_err = toml::from_str::<toml::Table>("[broken").unwrap_err();
        assert_eq!(AuditError::from(toml_err).category(), ErrorCategory::Configuration);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AuditError::from(json_err);
        assert_eq!(err.category(), ErrorCategory::Processing);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let transcript = AuditError::TranscriptError {
            row: 3,
            message: "bad credits".to_string(),
        };
        assert_eq!(transcript.category(), ErrorCategory::Input);
    }
}
