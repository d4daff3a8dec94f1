use crate::core::group_matcher::match_group;
use crate::core::pool::CoursePool;
use crate::core::sequence_matcher::match_sequence;
use crate::domain::model::{CatalogRule, Concentration, Course, Requirement, Student};
use crate::domain::policy::MatchPolicy;
use crate::domain::progress::{
    ConcentrationProgress, Outcome, ProgressReport, RequirementProgress,
};

/// Stateless requirement-satisfaction engine. Every call builds its own
/// pools, so one engine can serve any number of evaluations.
#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    policy: MatchPolicy,
}

impl AuditEngine {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Evaluates every major, then every minor, each against a fresh pool.
    pub fn evaluate(&self, student: &Student) -> ProgressReport {
        let mut warnings = Vec::new();
        let concentrations = student
            .concentrations()
            .map(|concentration| {
                if concentration.is_empty() {
                    warnings.push(format!(
                        "No catalog rows found for {} '{}'",
                        concentration.kind, concentration.name
                    ));
                }
                self.evaluate_concentration(&student.courses, concentration)
            })
            .collect();

        ProgressReport {
            graduation_year: student.graduation_year,
            concentrations,
            warnings,
        }
    }

    pub fn evaluate_concentration(
        &self,
        courses: &[Course],
        concentration: &Concentration,
    ) -> ConcentrationProgress {
        let span = tracing::debug_span!("concentration", name = %concentration.name);
        let _guard = span.enter();

        let mut pool = CoursePool::new(courses);
        let requirements: Vec<RequirementProgress> = concentration
            .rules
            .iter()
            .map(|rule| match rule {
                CatalogRule::Evaluable(req) => RequirementProgress {
                    title: req.title().to_string(),
                    outcome: self.evaluate_requirement(req, &mut pool),
                },
                CatalogRule::Unevaluable { title, reason } => RequirementProgress {
                    title: title.clone(),
                    outcome: Outcome::Unevaluable {
                        reason: reason.clone(),
                    },
                },
            })
            .collect();

        let consumed: Vec<String> = pool.consumed().map(|c| c.code().to_string()).collect();
        tracing::info!(
            "{} '{}': {} requirement(s), {} of {} course(s) used",
            concentration.kind,
            concentration.name,
            requirements.len(),
            consumed.len(),
            pool.len()
        );

        ConcentrationProgress {
            kind: concentration.kind,
            name: concentration.name.clone(),
            requirements,
            consumed,
        }
    }

    pub fn evaluate_requirement(&self, req: &Requirement, pool: &mut CoursePool<'_>) -> Outcome {
        let outcome = match req {
            Requirement::Group(group) => Outcome::Group(match_group(group, pool, &self.policy)),
            Requirement::Sequence(seq) => {
                Outcome::Sequence(match_sequence(seq, pool, &self.policy))
            }
        };
        tracing::debug!("'{}' evaluated, {} course(s) left in pool", req.title(), pool.remaining());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ConcentrationKind, GroupRequirement};
    use crate::domain::progress::FulfillmentStatus;

    fn group(title: &str, needed: u32, tokens: &[&str]) -> CatalogRule {
        CatalogRule::Evaluable(Requirement::Group(GroupRequirement::new(
            title,
            needed,
            tokens.iter().map(|t| t.to_string()).collect(),
        )))
    }

    #[test]
    fn test_course_used_once_per_concentration() {
        let courses = vec![Course::new("CSC-101", "A"), Course::new("CSC-201", "A")];
        let major = Concentration::new(
            ConcentrationKind::Major,
            "Computer Science",
            vec![
                group("Intro", 1, &["CSC-101"]),
                group("Any CSC", 2, &["CSC-XXX"]),
            ],
        );
        let progress = AuditEngine::default().evaluate_concentration(&courses, &major);

        assert_eq!(progress.requirements[0].status(), FulfillmentStatus::Complete);
        assert_eq!(progress.requirements[1].status(), FulfillmentStatus::Partial);
        assert_eq!(progress.consumed, vec!["CSC-101", "CSC-201"]);
    }

    #[test]
    fn test_major_and_minor_use_separate_pools() {
        let courses = vec![Course::new("MTH-221", "B")];
        let major = Concentration::new(
            ConcentrationKind::Major,
            "Computer Science",
            vec![group("Math", 1, &["MTH-221"])],
        );
        let minor = Concentration::new(
            ConcentrationKind::Minor,
            "Mathematics",
            vec![group("Linear Algebra", 1, &["MTH-221"])],
        );
        let student = Student::new(Some(2027), courses, vec![major], vec![minor]);
        let report = AuditEngine::default().evaluate(&student);

        assert!(report.concentrations.iter().all(|c| c.is_complete()));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unevaluable_rule_consumes_nothing() {
        let courses = vec![Course::new("PHY-301", "A")];
        let conc = Concentration::new(
            ConcentrationKind::Minor,
            "Physics",
            vec![
                CatalogRule::Unevaluable {
                    title: "Upper level".into(),
                    reason: "bad token".into(),
                },
                group("Any PHY", 1, &["PHY-XXX"]),
            ],
        );
        let progress = AuditEngine::default().evaluate_concentration(&courses, &conc);

        assert_eq!(progress.requirements[0].status(), FulfillmentStatus::Unevaluable);
        assert_eq!(progress.requirements[1].status(), FulfillmentStatus::Complete);
    }

    #[test]
    fn test_empty_concentration_produces_warning() {
        let student = Student::new(
            None,
            vec![],
            vec![Concentration::new(ConcentrationKind::Major, "Astrology", vec![])],
            vec![],
        );
        let report = AuditEngine::default().evaluate(&student);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.concentrations[0].requirements.is_empty());
    }
}
