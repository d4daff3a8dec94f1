use crate::core::grade::meets_floor;
use crate::core::pool::CoursePool;
use crate::domain::model::SequenceRequirement;
use crate::domain::policy::MatchPolicy;
use crate::domain::progress::{FulfillmentStatus, SequenceAttempt, SequenceFulfillment};

/// Walks the variants of a sequence requirement in catalog order. Each step
/// takes the first pool course with the exact code; courses are consumed even
/// when their variant is never completed.
pub fn match_sequence(
    req: &SequenceRequirement,
    pool: &mut CoursePool<'_>,
    policy: &MatchPolicy,
) -> SequenceFulfillment {
    let mut attempts = Vec::new();
    let mut completed: u32 = 0;

    for (variant_index, variant) in req.sequences.iter().enumerate() {
        if completed >= req.num_needed {
            break;
        }

        let floor = variant
            .grade_requirement
            .as_deref()
            .or(req.grade_requirement.as_deref());
        let mut positions: Vec<Option<String>> = vec![None; variant.course_groups.len()];
        let mut filled = 0usize;

        for (position, token) in variant.course_groups.iter().enumerate() {
            if filled >= variant.num_needed as usize {
                break;
            }
            let hit = pool
                .available()
                .find(|(_, course)| {
                    course.code() == token.trim()
                        && !policy.is_withdrawn(course.grade())
                        && meets_floor(course.grade(), floor)
                })
                .map(|(index, _)| index);

            if let Some(course) = hit.and_then(|index| pool.check_out(index)) {
                tracing::trace!("'{}': {} fills step {}", req.title, course.code(), position + 1);
                positions[position] = Some(course.code().to_string());
                filled += 1;
            }
        }

        let attempt = SequenceAttempt {
            variant: variant_index,
            positions,
            required: variant.num_needed,
        };
        if attempt.is_complete() {
            completed += 1;
        }
        attempts.push(attempt);
    }

    let incomplete_templates = req
        .sequences
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            !attempts
                .iter()
                .any(|a| a.variant == *index && a.is_complete())
        })
        .map(|(_, variant)| variant.course_groups.clone())
        .collect();

    SequenceFulfillment {
        status: FulfillmentStatus::from_counts(completed as usize, req.num_needed as usize),
        num_needed: req.num_needed,
        sequences_completed: completed,
        attempts,
        incomplete_templates,
        grade_requirement: req.grade_requirement.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Course, GroupRequirement};

    fn variant(codes: &[&str]) -> GroupRequirement {
        GroupRequirement::new(
            "Language",
            codes.len() as u32,
            codes.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn language_requirement(num_needed: u32) -> SequenceRequirement {
        SequenceRequirement {
            title: "Language".into(),
            num_needed,
            grade_requirement: None,
            sequences: vec![
                variant(&["FRE-101", "FRE-102", "FRE-201"]),
                variant(&["SPN-101", "SPN-102", "SPN-201"]),
            ],
        }
    }

    #[test]
    fn test_full_match_of_first_variant() {
        let courses = vec![
            Course::new("FRE-101", "A"),
            Course::new("FRE-102", "B"),
            Course::new("FRE-201", "B+"),
            Course::new("SPN-101", "A"),
        ];
        let mut pool = CoursePool::new(&courses);
        let result = match_sequence(&language_requirement(1), &mut pool, &MatchPolicy::default());

        assert_eq!(result.status, FulfillmentStatus::Complete);
        assert_eq!(result.sequences_completed, 1);
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(
            result.attempts[0].filled_codes(),
            vec!["FRE-101", "FRE-102", "FRE-201"]
        );
        assert_eq!(
            result.incomplete_templates,
            vec![vec!["SPN-101".to_string(), "SPN-102".into(), "SPN-201".into()]]
        );
        // Spanish is not claimed once French completes the requirement.
        assert!(pool.is_available(3));
    }

    #[test]
    fn test_partial_variants_still_consume_courses() {
        let courses = vec![
            Course::new("FRE-101", "A"),
            Course::new("SPN-101", "A"),
            Course::new("SPN-102", "A"),
            Course::new("SPN-201", "A"),
        ];
        let mut pool = CoursePool::new(&courses);
        let result = match_sequence(&language_requirement(2), &mut pool, &MatchPolicy::default());

        assert_eq!(result.status, FulfillmentStatus::Partial);
        assert_eq!(result.sequences_completed, 1);
        assert_eq!(result.attempts[0].positions, vec![Some("FRE-101".into()), None, None]);
        assert_eq!(pool.remaining(), 0);
        assert_eq!(result.incomplete_templates.len(), 1);
        assert_eq!(result.still_needed(), 1);
    }

    #[test]
    fn test_grade_floor_and_withdrawn_block_steps() {
        let courses = vec![
            Course::new("FRE-101", "W"),
            Course::new("FRE-102", "D"),
            Course::new("FRE-201", "A"),
        ];
        let mut req = language_requirement(1);
        req.grade_requirement = Some("C".into());
        let mut pool = CoursePool::new(&courses);
        let result = match_sequence(&req, &mut pool, &MatchPolicy::default());

        assert_eq!(result.status, FulfillmentStatus::None);
        assert_eq!(result.attempts[0].positions, vec![None, None, Some("FRE-201".into())]);
        assert_eq!(result.incomplete_templates.len(), 2);
    }

    #[test]
    fn test_repeated_course_fills_one_step_only() {
        let courses = vec![Course::new("FRE-101", "C"), Course::new("FRE-101", "A")];
        let mut pool = CoursePool::new(&courses);
        let result = match_sequence(&language_requirement(1), &mut pool, &MatchPolicy::default());

        assert_eq!(result.attempts[0].filled_count(), 1);
        assert!(pool.is_available(1));
    }
}
