use crate::core::ConfigProvider;
use crate::domain::policy::{MatchPolicy, OutputFormat, RenderOptions};
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub audit: AuditSection,
    pub catalog: CatalogConfig,
    pub transcript: TranscriptConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    pub policy: Option<PolicyConfig>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub majors: String,
    pub minors: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub majors: Vec<String>,
    #[serde(default)]
    pub minors: Vec<String>,
    pub graduation_year: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub allow_multi_tag_credit: Option<bool>,
    pub excluded_wildcard_suffixes: Option<Vec<String>>,
    pub withdrawn_grades: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<String>,
    pub combined_tags: Option<Vec<String>>,
    pub combined_tag_floor: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl AuditConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        let config = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${CATALOG_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AuditError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("audit.name", &self.audit.name)?;

        for (field, path) in [
            ("catalog.majors", &self.catalog.majors),
            ("catalog.minors", &self.catalog.minors),
            ("transcript.path", &self.transcript.path),
        ] {
            validate_path(field, path)?;
            validate_file_extension(field, path, &["csv"])?;
        }

        if self.selection.majors.is_empty() && self.selection.minors.is_empty() {
            return Err(AuditError::ConfigValidationError {
                field: "selection".to_string(),
                message: "Select at least one major or minor".to_string(),
            });
        }
        for name in self.selection.majors.iter().chain(&self.selection.minors) {
            validate_non_empty_string("selection", name)?;
        }

        if let Some(year) = self.selection.graduation_year {
            validate_range("selection.graduation_year", year, 1900, 2200)?;
        }

        if let Some(path) = self.output.as_ref().and_then(|o| o.path.as_deref()) {
            validate_path("output.path", path)?;
        }

        Ok(())
    }

    /// 配置摘要，每行一項；由呼叫端決定輸出位置
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Audit: {}", self.audit.name)];
        if let Some(description) = &self.audit.description {
            lines.push(format!("Description: {}", description));
        }
        lines.push(format!("Transcript: {}", self.transcript_path()));
        lines.push(format!("Majors: {}", self.majors().join(", ")));
        lines.push(format!("Minors: {}", self.minors().join(", ")));
        if let Some(year) = self.graduation_year() {
            lines.push(format!("Graduation Year: {}", year));
        }
        lines.push(format!("Format: {:?}", self.output_format()));
        lines.push(format!("Output: {}", self.output_path().unwrap_or("stdout")));
        lines.push(format!(
            "Multi-tag credit: {}",
            self.match_policy().allow_multi_tag_credit
        ));
        lines
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for AuditConfig {
    fn transcript_path(&self) -> &str {
        &self.transcript.path
    }

    fn major_catalog_path(&self) -> &str {
        &self.catalog.majors
    }

    fn minor_catalog_path(&self) -> &str {
        &self.catalog.minors
    }

    fn majors(&self) -> &[String] {
        &self.selection.majors
    }

    fn minors(&self) -> &[String] {
        &self.selection.minors
    }

    fn graduation_year(&self) -> Option<u16> {
        self.selection.graduation_year
    }

    fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    fn match_policy(&self) -> MatchPolicy {
        let mut policy = MatchPolicy::default();
        if let Some(config) = &self.policy {
            if let Some(allow) = config.allow_multi_tag_credit {
                policy.allow_multi_tag_credit = allow;
            }
            if let Some(suffixes) = &config.excluded_wildcard_suffixes {
                policy.excluded_wildcard_suffixes = suffixes.clone();
            }
            if let Some(grades) = &config.withdrawn_grades {
                policy.withdrawn_grades = grades.clone();
            }
        }
        policy
    }

    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::default();
        if let Some(output) = &self.output {
            if let Some(tags) = &output.combined_tags {
                options.combined_tags = tags.clone();
            }
            if let Some(floor) = output.combined_tag_floor {
                options.combined_tag_floor = floor;
            }
        }
        options
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[audit]
name = "spring-check"

[catalog]
majors = "catalog/majors.csv"
minors = "catalog/minors.csv"

[transcript]
path = "data/transcript.csv"

[selection]
majors = ["Computer Science"]
minors = ["Music"]
graduation_year = 2026

[policy]
allow_multi_tag_credit = false

[output]
format = "json"
path = "out/progress.json"
combined_tag_floor = 400
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = AuditConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.audit.name, "spring-check");
        assert_eq!(config.majors(), &["Computer Science".to_string()]);
        assert_eq!(config.graduation_year(), Some(2026));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.output_path(), Some("out/progress.json"));
        assert!(!config.match_policy().allow_multi_tag_credit);
        assert_eq!(config.match_policy().withdrawn_grades, vec!["W"]);
        assert_eq!(config.render_options().combined_tag_floor, 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_default() {
        let toml_content = r#"
[audit]
name = "minimal"

[catalog]
majors = "majors.csv"
minors = "minors.csv"

[transcript]
path = "t.csv"

[selection]
minors = ["Music"]
"#;
        let config = AuditConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert_eq!(config.output_path(), None);
        assert_eq!(config.match_policy(), MatchPolicy::default());
        assert!(!config.verbose_logging());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DEGREE_AUDIT_TEST_DIR", "/srv/registrar");

        let toml_content = r#"
[audit]
name = "env"

[catalog]
majors = "${DEGREE_AUDIT_TEST_DIR}/majors.csv"
minors = "${DEGREE_AUDIT_TEST_UNSET}/minors.csv"

[transcript]
path = "t.csv"
"#;

        let config = AuditConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.majors, "/srv/registrar/majors.csv");
        assert_eq!(config.catalog.minors, "${DEGREE_AUDIT_TEST_UNSET}/minors.csv");

        std::env::remove_var("DEGREE_AUDIT_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let no_selection = BASIC.replace(
            "majors = [\"Computer Science\"]\nminors = [\"Music\"]",
            "",
        );
        let config = AuditConfig::from_toml_str(&no_selection).unwrap();
        assert!(config.validate().is_err());

        let bad_catalog = BASIC.replace("catalog/majors.csv", "catalog/majors.xlsx");
        let config = AuditConfig::from_toml_str(&bad_catalog).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_lines_describe_selection() {
        let config = AuditConfig::from_toml_str(BASIC).unwrap();
        let lines = config.summary_lines();

        assert_eq!(lines[0], "Audit: spring-check");
        assert!(lines.contains(&"Majors: Computer Science".to_string()));
        assert!(lines.contains(&"Output: out/progress.json".to_string()));
        assert!(lines.contains(&"Multi-tag credit: false".to_string()));
        // plain text, never mixed into a JSON report
        assert!(lines.iter().all(|l| !l.starts_with('{')));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = AuditConfig::from_toml_str("[audit\nname=").unwrap_err();
        assert!(matches!(err, AuditError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = AuditConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.audit.name, "spring-check");
    }
}
