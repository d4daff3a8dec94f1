use crate::core::grade::meets_floor;
use crate::core::pool::CoursePool;
use crate::domain::model::{wildcard_department, Course, GroupRequirement, NumberRequirement, TypeRequirement};
use crate::domain::policy::MatchPolicy;
use crate::domain::progress::{FulfillmentStatus, GroupFulfillment};

/// Unfilled slots beyond this are left out of `filled_slots`; `still_needed`
/// still counts them.
const MAX_PADDED_SLOTS: usize = 64;

/// Outstanding number/type quotas of one group requirement while it is being
/// matched.
#[derive(Debug, Clone)]
struct QuotaLedger {
    numbers: Vec<NumberRequirement>,
    types: Vec<TypeRequirement>,
}

impl QuotaLedger {
    fn new(req: &GroupRequirement) -> Self {
        Self {
            numbers: req.number_requirements.clone(),
            types: req.type_requirements.clone(),
        }
    }

    fn is_unconstrained(&self) -> bool {
        self.numbers.is_empty() && self.types.is_empty()
    }

    /// Numeric pairs the course can credit: its number meets the floor, the
    /// pair is still open and the slots left can still hold the whole pair.
    fn number_hits(&self, course: &Course, slots_left: usize) -> Vec<usize> {
        let Some(number) = course.number() else {
            return Vec::new();
        };
        self.numbers
            .iter()
            .enumerate()
            .filter(|(_, quota)| {
                number >= quota.min_number && quota.count > 0 && quota.count as usize <= slots_left
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn type_hits(&self, course: &Course, slots_left: usize, policy: &MatchPolicy) -> Vec<usize> {
        let open = self
            .types
            .iter()
            .enumerate()
            .filter(|(_, quota)| {
                quota.matches_any(course.types())
                    && quota.count > 0
                    && quota.count as usize <= slots_left
            })
            .map(|(i, _)| i);

        if policy.allow_multi_tag_credit {
            open.collect()
        } else {
            open.take(1).collect()
        }
    }

    /// Numeric pairs are tried first and the course's matching type pairs
    /// are credited along with them. A course below every open numeric floor
    /// can still be taken for a type pair alone.
    fn try_credit(&mut self, course: &Course, slots_left: usize, policy: &MatchPolicy) -> bool {
        if self.is_unconstrained() {
            return true;
        }

        let number_hits = self.number_hits(course, slots_left);
        let type_hits = self.type_hits(course, slots_left, policy);
        if number_hits.is_empty() && type_hits.is_empty() {
            return false;
        }

        for i in number_hits {
            self.numbers[i].count -= 1;
        }
        for i in type_hits {
            self.types[i].count -= 1;
        }
        true
    }
}

fn is_candidate(token: &str, course: &Course, policy: &MatchPolicy) -> bool {
    match wildcard_department(token) {
        Some(dept) => {
            course.department() == dept && !policy.is_excluded_from_wildcard(course.number_part())
        }
        None => course.code() == token.trim(),
    }
}

fn is_eligible(course: &Course, floor: Option<&str>, policy: &MatchPolicy) -> bool {
    !policy.is_withdrawn(course.grade()) && meets_floor(course.grade(), floor)
}

/// Satisfies one group requirement from the pool, consuming every course it
/// uses.
pub fn match_group(
    req: &GroupRequirement,
    pool: &mut CoursePool<'_>,
    policy: &MatchPolicy,
) -> GroupFulfillment {
    let num_needed = req.num_needed as usize;
    let floor = req.grade_requirement.as_deref();
    let mut ledger = QuotaLedger::new(req);
    let mut filled: Vec<String> = Vec::new();
    let mut remaining_tokens = req.course_groups.clone();

    for token in &req.course_groups {
        if filled.len() >= num_needed {
            break;
        }

        let candidates: Vec<(usize, &Course)> = pool
            .available()
            .filter(|(_, course)| is_candidate(token, course, policy))
            .filter(|(_, course)| is_eligible(course, floor, policy))
            .collect();

        for (index, course) in candidates {
            if filled.len() >= num_needed {
                break;
            }
            if !pool.is_available(index)
                || !ledger.try_credit(course, num_needed - filled.len(), policy)
            {
                continue;
            }
            pool.check_out(index);

            tracing::trace!("'{}': {} taken for token {}", req.title, course.code(), token);
            filled.push(course.code().to_string());
            if wildcard_department(token).is_none() {
                if let Some(pos) = remaining_tokens.iter().position(|t| t == token) {
                    remaining_tokens.remove(pos);
                }
            }
        }
    }

    let status = FulfillmentStatus::from_counts(filled.len(), num_needed);
    let mut filled_slots: Vec<Option<String>> = filled.into_iter().map(Some).collect();
    let padded = num_needed.min(MAX_PADDED_SLOTS).max(filled_slots.len());
    filled_slots.resize(padded, None);

    GroupFulfillment {
        status,
        num_needed: req.num_needed,
        filled_slots,
        remaining_tokens,
        outstanding_numbers: ledger.numbers,
        outstanding_types: ledger.types,
        grade_requirement: req.grade_requirement.clone(),
    }
}
