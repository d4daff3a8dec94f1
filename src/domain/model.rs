use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard suffix on a course-group token, e.g. `CSC-XXX`.
pub const WILDCARD_SUFFIX: &str = "-XXX";

/// A completed (or in-progress / transferred) course from the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    code: String,
    title: Option<String>,
    term: Option<String>,
    year: Option<String>,
    credits: f32,
    grade: String,
    types: Vec<String>,
    is_transfer: bool,
}

impl Course {
    pub fn new(code: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_string(),
            title: None,
            term: None,
            year: None,
            credits: 0.0,
            grade: grade.into().trim().to_string(),
            types: Vec::new(),
            is_transfer: false,
        }
    }

    /// AP / transfer credit: no term, no letter grade.
    pub fn transfer(code: impl Into<String>, credits: f32) -> Self {
        let mut course = Self::new(code, "N/A");
        course.credits = credits;
        course.is_transfer = true;
        course
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_term(mut self, term: impl Into<String>, year: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self.year = Some(year.into());
        self
    }

    pub fn with_credits(mut self, credits: f32) -> Self {
        self.credits = credits;
        self
    }

    pub fn with_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn credits(&self) -> f32 {
        self.credits
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn is_transfer(&self) -> bool {
        self.is_transfer
    }

    /// Department prefix: everything before the first `-`.
    pub fn department(&self) -> &str {
        self.code
            .split_once('-')
            .map(|(dept, _)| dept)
            .unwrap_or(&self.code)
    }

    /// The part after the department, e.g. `295H` for `CSC-295H`.
    pub fn number_part(&self) -> &str {
        self.code
            .split_once('-')
            .map(|(_, rest)| rest)
            .unwrap_or("")
    }

    /// Leading digits of the course number (`295H` -> 295).
    pub fn number(&self) -> Option<u32> {
        let digits: String = self
            .number_part()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Returns the department of a wildcard token (`CSC-XXX` -> `CSC`).
pub fn wildcard_department(token: &str) -> Option<&str> {
    token.trim().strip_suffix(WILDCARD_SUFFIX)
}

/// At least `count` courses numbered `>= min_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRequirement {
    pub count: u32,
    pub min_number: u32,
}

impl fmt::Display for NumberRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.count, self.min_number)
    }
}

/// At least `count` courses carrying `tag`. A tag may list alternatives
/// (`WAC/WAC-R`, `WAC, WAC-R` or `WAC or WAC-R`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRequirement {
    pub count: u32,
    pub tag: String,
}

impl TypeRequirement {
    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.tag
            .split(['/', ','])
            .flat_map(|part| part.split(" or "))
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
    }

    pub fn matches_any(&self, course_types: &[String]) -> bool {
        course_types
            .iter()
            .any(|t| self.alternatives().any(|alt| alt == t.trim()))
    }
}

impl fmt::Display for TypeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.count, self.tag)
    }
}

/// A flat "N of these courses" rule, optionally constrained by
/// course-number floors, category tags and a grade floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRequirement {
    pub title: String,
    pub num_needed: u32,
    pub course_groups: Vec<String>,
    pub number_requirements: Vec<NumberRequirement>,
    pub type_requirements: Vec<TypeRequirement>,
    pub grade_requirement: Option<String>,
}

impl GroupRequirement {
    pub fn new(title: impl Into<String>, num_needed: u32, course_groups: Vec<String>) -> Self {
        Self {
            title: title.into(),
            num_needed,
            course_groups,
            number_requirements: Vec::new(),
            type_requirements: Vec::new(),
            grade_requirement: None,
        }
    }

    pub fn with_number_requirements(mut self, reqs: Vec<NumberRequirement>) -> Self {
        self.number_requirements = reqs;
        self
    }

    pub fn with_type_requirements(mut self, reqs: Vec<TypeRequirement>) -> Self {
        self.type_requirements = reqs;
        self
    }

    pub fn with_grade_requirement(mut self, grade: Option<String>) -> Self {
        self.grade_requirement = grade.filter(|g| !g.trim().is_empty());
        self
    }

    pub fn has_sub_constraints(&self) -> bool {
        !self.number_requirements.is_empty() || !self.type_requirements.is_empty()
    }
}

impl fmt::Display for GroupRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} needed): {}",
            self.title,
            self.num_needed,
            self.course_groups.join(" | ")
        )?;
        if !self.number_requirements.is_empty() {
            let nums: Vec<String> = self.number_requirements.iter().map(|n| n.to_string()).collect();
            write!(f, " [{}]", nums.join(", "))?;
        }
        if !self.type_requirements.is_empty() {
            let types: Vec<String> = self.type_requirements.iter().map(|t| t.to_string()).collect();
            write!(f, " [{}]", types.join(", "))?;
        }
        if let Some(grade) = &self.grade_requirement {
            write!(f, " [min {}]", grade)?;
        }
        Ok(())
    }
}

/// `num_needed` complete sequences out of several ordered variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRequirement {
    pub title: String,
    pub num_needed: u32,
    pub grade_requirement: Option<String>,
    pub sequences: Vec<GroupRequirement>,
}

impl fmt::Display for SequenceRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<String> = self
            .sequences
            .iter()
            .map(|s| format!("({} | {})", s.course_groups.join(", "), s.num_needed))
            .collect();
        write!(
            f,
            "{} ({} sequence(s) needed): {}",
            self.title,
            self.num_needed,
            variants.join("; ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Requirement {
    Group(GroupRequirement),
    Sequence(SequenceRequirement),
}

impl Requirement {
    pub fn title(&self) -> &str {
        match self {
            Requirement::Group(g) => &g.title,
            Requirement::Sequence(s) => &s.title,
        }
    }

    pub fn num_needed(&self) -> u32 {
        match self {
            Requirement::Group(g) => g.num_needed,
            Requirement::Sequence(s) => s.num_needed,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Group(g) => g.fmt(f),
            Requirement::Sequence(s) => s.fmt(f),
        }
    }
}

/// One catalog row after parsing. Rows whose constraint cells could not be
/// parsed stay in the list so the report can flag them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogRule {
    Evaluable(Requirement),
    Unevaluable { title: String, reason: String },
}

impl CatalogRule {
    pub fn title(&self) -> &str {
        match self {
            CatalogRule::Evaluable(req) => req.title(),
            CatalogRule::Unevaluable { title, .. } => title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationKind {
    Major,
    Minor,
}

impl fmt::Display for ConcentrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationKind::Major => write!(f, "Major"),
            ConcentrationKind::Minor => write!(f, "Minor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub kind: ConcentrationKind,
    pub name: String,
    pub rules: Vec<CatalogRule>,
}

impl Concentration {
    pub fn new(kind: ConcentrationKind, name: impl Into<String>, rules: Vec<CatalogRule>) -> Self {
        Self {
            kind,
            name: name.into(),
            rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.rules.iter().filter_map(|rule| match rule {
            CatalogRule::Evaluable(req) => Some(req),
            CatalogRule::Unevaluable { .. } => None,
        })
    }
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind, self.name)?;
        for rule in &self.rules {
            match rule {
                CatalogRule::Evaluable(req) => writeln!(f, "{}", req)?,
                CatalogRule::Unevaluable { title, reason } => {
                    writeln!(f, "{} (unevaluable: {})", title, reason)?
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub graduation_year: Option<u16>,
    pub courses: Vec<Course>,
    pub majors: Vec<Concentration>,
    pub minors: Vec<Concentration>,
}

impl Student {
    pub fn new(
        graduation_year: Option<u16>,
        courses: Vec<Course>,
        majors: Vec<Concentration>,
        minors: Vec<Concentration>,
    ) -> Self {
        Self {
            graduation_year,
            courses,
            majors,
            minors,
        }
    }

    /// Majors first, then minors, each in selection order.
    pub fn concentrations(&self) -> impl Iterator<Item = &Concentration> {
        self.majors.iter().chain(self.minors.iter())
    }
}
