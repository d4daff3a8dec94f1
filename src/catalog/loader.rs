use crate::catalog::tokens::{
    parse_number_requirement, parse_sequence_clause, parse_type_requirement,
    split_course_list, split_outside_parens, split_sequence_cell,
};
use crate::catalog::RuleError;
use crate::domain::model::{
    CatalogRule, Concentration, ConcentrationKind, GroupRequirement, Requirement,
    SequenceRequirement,
};
use serde::{Deserialize, Serialize};

/// One row of a requirement catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub concentration: String,
    pub courses: String,
    pub num_needed: u32,
    pub title: String,
    #[serde(default)]
    pub number_requirements: Option<String>,
    #[serde(default)]
    pub type_requirements: Option<String>,
    #[serde(default)]
    pub grade_requirement: Option<String>,
}

impl CatalogRow {
    pub fn new(
        concentration: impl Into<String>,
        courses: impl Into<String>,
        num_needed: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            concentration: concentration.into(),
            courses: courses.into(),
            num_needed,
            title: title.into(),
            number_requirements: None,
            type_requirements: None,
            grade_requirement: None,
        }
    }

    pub fn with_number_requirements(mut self, cell: impl Into<String>) -> Self {
        self.number_requirements = Some(cell.into());
        self
    }

    pub fn with_type_requirements(mut self, cell: impl Into<String>) -> Self {
        self.type_requirements = Some(cell.into());
        self
    }

    pub fn with_grade_requirement(mut self, cell: impl Into<String>) -> Self {
        self.grade_requirement = Some(cell.into());
        self
    }

    pub fn belongs_to(&self, name: &str) -> bool {
        self.concentration.trim().eq_ignore_ascii_case(name.trim())
    }

    pub fn is_sequence(&self) -> bool {
        self.courses.contains(';')
    }
}

fn cell(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses one catalog row into a typed requirement.
pub fn parse_rule(row: &CatalogRow) -> Result<Requirement, RuleError> {
    let title = row.title.trim();
    let grade = cell(&row.grade_requirement).map(str::to_string);

    if row.is_sequence() {
        if cell(&row.number_requirements).is_some() || cell(&row.type_requirements).is_some() {
            tracing::warn!(
                "Sequence row '{}' carries number/type constraints; they are ignored",
                title
            );
        }

        let mut sequences = Vec::new();
        for clause in split_sequence_cell(&row.courses) {
            let parsed =
                parse_sequence_clause(clause).map_err(|reason| RuleError::MalformedSequenceClause {
                    title: title.to_string(),
                    clause: clause.to_string(),
                    reason,
                })?;
            sequences.push(
                GroupRequirement::new(title, parsed.count, parsed.courses)
                    .with_grade_requirement(grade.clone()),
            );
        }

        return Ok(Requirement::Sequence(SequenceRequirement {
            title: title.to_string(),
            num_needed: row.num_needed,
            grade_requirement: grade,
            sequences,
        }));
    }

    let course_groups = split_course_list(&row.courses);
    if course_groups.is_empty() {
        return Err(RuleError::EmptyCourseGroup {
            title: title.to_string(),
        });
    }

    let number_requirements = match cell(&row.number_requirements) {
        Some(text) => split_outside_parens(text)
            .into_iter()
            .map(|token| {
                parse_number_requirement(&token).ok_or_else(|| {
                    RuleError::MalformedNumberRequirement {
                        title: title.to_string(),
                        token,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let type_requirements = match cell(&row.type_requirements) {
        Some(text) => split_outside_parens(text)
            .into_iter()
            .map(|token| {
                parse_type_requirement(&token).ok_or_else(|| RuleError::MalformedTypeRequirement {
                    title: title.to_string(),
                    token,
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(Requirement::Group(
        GroupRequirement::new(title, row.num_needed, course_groups)
            .with_number_requirements(number_requirements)
            .with_type_requirements(type_requirements)
            .with_grade_requirement(grade),
    ))
}

/// Builds a concentration from every row whose name matches
/// (case-insensitively). Rows that fail to parse are kept as
/// [`CatalogRule::Unevaluable`] in their original position.
pub fn load_concentration(kind: ConcentrationKind, name: &str, rows: &[CatalogRow]) -> Concentration {
    let rules: Vec<CatalogRule> = rows
        .iter()
        .filter(|row| row.belongs_to(name))
        .map(|row| match parse_rule(row) {
            Ok(req) => CatalogRule::Evaluable(req),
            Err(e) => {
                tracing::warn!("{} '{}': {}", kind, name.trim(), e);
                CatalogRule::Unevaluable {
                    title: e.title().to_string(),
                    reason: e.to_string(),
                }
            }
        })
        .collect();

    if rules.is_empty() {
        tracing::warn!("No catalog rows found for {} '{}'", kind, name.trim());
    } else {
        tracing::debug!("Loaded {} rule(s) for {} '{}'", rules.len(), kind, name.trim());
    }

    Concentration::new(kind, name.trim(), rules)
}

/// Distinct concentration names, first-seen order.
pub fn list_concentrations(rows: &[CatalogRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        let name = row.concentration.trim();
        if name.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
