use crate::core::ConfigProvider;
use crate::domain::policy::{MatchPolicy, OutputFormat, RenderOptions};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_range, validate_required_field, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "degree-audit")]
#[command(about = "Audit a transcript against major and minor requirements")]
pub struct CliConfig {
    /// Transcript CSV (code,title,term,year,credits,grade,types)
    #[arg(long, short)]
    pub transcript: Option<String>,

    #[arg(long, default_value = "catalog/majors.csv")]
    pub major_catalog: String,

    #[arg(long, default_value = "catalog/minors.csv")]
    pub minor_catalog: String,

    /// Major names, repeatable or comma separated
    #[arg(long = "major", value_delimiter = ',')]
    pub majors: Vec<String>,

    /// Minor names, repeatable or comma separated
    #[arg(long = "minor", value_delimiter = ',')]
    pub minors: Vec<String>,

    #[arg(long)]
    pub graduation_year: Option<u16>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,

    /// Credit a multi-tagged course toward only the first matching type quota
    #[arg(long)]
    pub single_tag_credit: bool,

    /// List concentrations in both catalogs and exit
    #[arg(long)]
    pub list: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn transcript_path(&self) -> &str {
        self.transcript.as_deref().unwrap_or_default()
    }

    fn major_catalog_path(&self) -> &str {
        &self.major_catalog
    }

    fn minor_catalog_path(&self) -> &str {
        &self.minor_catalog
    }

    fn majors(&self) -> &[String] {
        &self.majors
    }

    fn minors(&self) -> &[String] {
        &self.minors
    }

    fn graduation_year(&self) -> Option<u16> {
        self.graduation_year
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn match_policy(&self) -> MatchPolicy {
        MatchPolicy {
            allow_multi_tag_credit: !self.single_tag_credit,
            ..MatchPolicy::default()
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("major_catalog", &self.major_catalog)?;
        validate_file_extension("major_catalog", &self.major_catalog, &["csv"])?;
        validate_path("minor_catalog", &self.minor_catalog)?;
        validate_file_extension("minor_catalog", &self.minor_catalog, &["csv"])?;

        // --list 只需要目錄
        if self.list {
            return Ok(());
        }

        let transcript = validate_required_field("transcript", &self.transcript)?;
        validate_path("transcript", transcript)?;
        validate_file_extension("transcript", transcript, &["csv"])?;

        if let Some(year) = self.graduation_year {
            validate_range("graduation_year", year, 1900, 2200)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }

        Ok(())
    }
}
