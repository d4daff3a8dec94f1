use crate::domain::model::{ConcentrationKind, NumberRequirement, TypeRequirement};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Complete,
    Partial,
    None,
    Unevaluable,
}

impl FulfillmentStatus {
    pub fn from_counts(filled: usize, needed: usize) -> Self {
        if filled >= needed {
            FulfillmentStatus::Complete
        } else if filled > 0 {
            FulfillmentStatus::Partial
        } else {
            FulfillmentStatus::None
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            FulfillmentStatus::Complete => "[X]",
            FulfillmentStatus::Partial => "[~]",
            FulfillmentStatus::None => "[ ]",
            FulfillmentStatus::Unevaluable => "[!]",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FulfillmentStatus::Complete => "Completed",
            FulfillmentStatus::Partial => "Partially Completed",
            FulfillmentStatus::None => "Not Completed",
            FulfillmentStatus::Unevaluable => "Unevaluable",
        }
    }
}

/// Result of matching one group requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFulfillment {
    pub status: FulfillmentStatus,
    pub num_needed: u32,
    /// Filled slots first in the order they were taken, then `None` up to
    /// `num_needed` (capped for absurdly large requirements).
    pub filled_slots: Vec<Option<String>>,
    pub remaining_tokens: Vec<String>,
    /// Quotas after matching; counts are what is still owed.
    pub outstanding_numbers: Vec<NumberRequirement>,
    pub outstanding_types: Vec<TypeRequirement>,
    pub grade_requirement: Option<String>,
}

impl GroupFulfillment {
    pub fn filled_codes(&self) -> Vec<&str> {
        self.filled_slots.iter().flatten().map(String::as_str).collect()
    }

    pub fn filled_count(&self) -> usize {
        self.filled_slots.iter().flatten().count()
    }

    pub fn still_needed(&self) -> u32 {
        self.num_needed.saturating_sub(self.filled_count() as u32)
    }
}

/// One variant as the sequence matcher left it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceAttempt {
    /// Index of the variant in catalog order.
    pub variant: usize,
    pub positions: Vec<Option<String>>,
    pub required: u32,
}

impl SequenceAttempt {
    pub fn filled_count(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() >= self.required as usize
    }

    pub fn fill_ratio(&self) -> f64 {
        if self.positions.is_empty() {
            return 1.0;
        }
        self.filled_count() as f64 / self.positions.len() as f64
    }

    pub fn filled_codes(&self) -> Vec<&str> {
        self.positions.iter().flatten().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceFulfillment {
    pub status: FulfillmentStatus,
    pub num_needed: u32,
    pub sequences_completed: u32,
    pub attempts: Vec<SequenceAttempt>,
    /// Token lists of the variants that were not completed, catalog order.
    pub incomplete_templates: Vec<Vec<String>>,
    pub grade_requirement: Option<String>,
}

impl SequenceFulfillment {
    pub fn completed_sequences(&self) -> impl Iterator<Item = &SequenceAttempt> {
        self.attempts.iter().filter(|a| a.is_complete())
    }

    /// Highest fill ratio first, catalog order on ties, at most `num_needed`.
    pub fn display_sequences(&self) -> Vec<&SequenceAttempt> {
        let mut ranked: Vec<&SequenceAttempt> = self.attempts.iter().collect();
        ranked.sort_by(|a, b| b.fill_ratio().total_cmp(&a.fill_ratio()));
        ranked.truncate(self.num_needed as usize);
        ranked
    }

    pub fn still_needed(&self) -> u32 {
        self.num_needed.saturating_sub(self.sequences_completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Outcome {
    Group(GroupFulfillment),
    Sequence(SequenceFulfillment),
    Unevaluable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub title: String,
    pub outcome: Outcome,
}

impl RequirementProgress {
    pub fn status(&self) -> FulfillmentStatus {
        match &self.outcome {
            Outcome::Group(g) => g.status,
            Outcome::Sequence(s) => s.status,
            Outcome::Unevaluable { .. } => FulfillmentStatus::Unevaluable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationProgress {
    pub kind: ConcentrationKind,
    pub name: String,
    pub requirements: Vec<RequirementProgress>,
    /// Codes of every course taken out of this concentration's pool.
    pub consumed: Vec<String>,
}

impl ConcentrationProgress {
    pub fn is_complete(&self) -> bool {
        !self.requirements.is_empty()
            && self
                .requirements
                .iter()
                .all(|r| r.status() == FulfillmentStatus::Complete)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub graduation_year: Option<u16>,
    pub concentrations: Vec<ConcentrationProgress>,
    pub warnings: Vec<String>,
}

impl ProgressReport {
    pub fn concentration(&self, name: &str) -> Option<&ConcentrationProgress> {
        self.concentrations
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_counts() {
        assert_eq!(FulfillmentStatus::from_counts(2, 2), FulfillmentStatus::Complete);
        assert_eq!(FulfillmentStatus::from_counts(1, 2), FulfillmentStatus::Partial);
        assert_eq!(FulfillmentStatus::from_counts(0, 2), FulfillmentStatus::None);
        assert_eq!(FulfillmentStatus::from_counts(0, 0), FulfillmentStatus::Complete);
    }

    #[test]
    fn test_display_sequences_prefers_fuller_variants() {
        let fulfillment = SequenceFulfillment {
            status: FulfillmentStatus::Complete,
            num_needed: 1,
            sequences_completed: 1,
            attempts: vec![
                SequenceAttempt {
                    variant: 0,
                    positions: vec![Some("FRE-101".into()), None, None],
                    required: 3,
                },
                SequenceAttempt {
                    variant: 1,
                    positions: vec![
                        Some("SPN-101".into()),
                        Some("SPN-102".into()),
                        Some("SPN-201".into()),
                    ],
                    required: 3,
                },
            ],
            incomplete_templates: vec![],
            grade_requirement: None,
        };

        let shown = fulfillment.display_sequences();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].variant, 1);
    }
}
