use serde::{Deserialize, Serialize};

/// Knobs that change how the matchers credit courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// A course carrying several matching tags credits every matching type
    /// quota in one pass. When off, only the first open quota is credited.
    pub allow_multi_tag_credit: bool,
    /// Course-number suffixes never matched by a department wildcard.
    pub excluded_wildcard_suffixes: Vec<String>,
    /// Grades that never count toward anything.
    pub withdrawn_grades: Vec<String>,
}

impl MatchPolicy {
    pub fn is_excluded_from_wildcard(&self, number_part: &str) -> bool {
        self.excluded_wildcard_suffixes
            .iter()
            .any(|suffix| number_part.ends_with(suffix.as_str()))
    }

    pub fn is_withdrawn(&self, grade: &str) -> bool {
        let grade = grade.trim();
        self.withdrawn_grades.iter().any(|w| w == grade)
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            allow_multi_tag_credit: true,
            excluded_wildcard_suffixes: vec!["295H".into(), "296H".into(), "297H".into()],
            withdrawn_grades: vec!["W".into()],
        }
    }
}

/// Text rendering options for the progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Tags folded into the upper-level course-number line
    /// ("... numbered >=300 and is also a WAC or WAC-R").
    pub combined_tags: Vec<String>,
    /// Course-number floor from which combined tags are folded in.
    pub combined_tag_floor: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            combined_tags: vec!["WAC".into(), "WAC-R".into()],
            combined_tag_floor: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
