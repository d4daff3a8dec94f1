use crate::domain::model::{NumberRequirement, TypeRequirement};
use crate::domain::policy::{OutputFormat, RenderOptions};
use crate::domain::progress::{
    ConcentrationProgress, FulfillmentStatus, GroupFulfillment, Outcome, ProgressReport,
    RequirementProgress, SequenceFulfillment,
};
use crate::utils::error::Result;
use std::fmt::Write as _;

const DETAIL_INDENT: &str = "   ";
const QUOTA_INDENT: &str = "                    * ";

pub fn render(report: &ProgressReport, format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, options)),
        OutputFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &ProgressReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &ProgressReport, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("\n======== Student Progress ========\n");
    match report.graduation_year {
        Some(year) => {
            let _ = writeln!(out, "Graduation Year: {}", year);
        }
        None => out.push_str("Graduation Year: N/A\n"),
    }
    out.push_str("==================================\n\n");

    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    if !report.warnings.is_empty() {
        out.push('\n');
    }

    for concentration in &report.concentrations {
        out.push_str(&render_concentration(concentration, options));
    }
    out
}

pub fn render_concentration(progress: &ConcentrationProgress, options: &RenderOptions) -> String {
    let mut out = format!("{}: {}\n", progress.kind, progress.name);
    if progress.requirements.is_empty() {
        out.push_str(DETAIL_INDENT);
        out.push_str("(no requirements found in catalog)\n\n");
        return out;
    }
    for requirement in &progress.requirements {
        out.push_str(&render_requirement(requirement, options));
    }
    out
}

pub fn render_requirement(progress: &RequirementProgress, options: &RenderOptions) -> String {
    let status = progress.status();
    let mut out = format!("{} {} ({})\n", status.marker(), progress.title, status.label());

    match &progress.outcome {
        Outcome::Group(group) => render_group(&mut out, group, options),
        Outcome::Sequence(seq) => render_sequence(&mut out, seq),
        Outcome::Unevaluable { reason } => {
            let _ = writeln!(out, "{}Reason: {}", DETAIL_INDENT, reason);
        }
    }
    out.push('\n');
    out
}

fn render_group(out: &mut String, group: &GroupFulfillment, options: &RenderOptions) {
    let filled = group.filled_codes().join(", ");
    match group.status {
        FulfillmentStatus::Complete => {
            let _ = writeln!(out, "{}Fulfilled by: {}", DETAIL_INDENT, filled);
            return;
        }
        FulfillmentStatus::Partial => {
            let _ = writeln!(out, "{}Completed: {}", DETAIL_INDENT, filled);
        }
        FulfillmentStatus::None | FulfillmentStatus::Unevaluable => {}
    }

    let _ = writeln!(
        out,
        "{}Still Needed: {} of {}{}{}",
        DETAIL_INDENT,
        group.still_needed(),
        group.remaining_tokens.join("; "),
        describe_quotas(&group.outstanding_numbers, &group.outstanding_types, options),
        grade_suffix(group.grade_requirement.as_deref()),
    );
}

fn render_sequence(out: &mut String, seq: &SequenceFulfillment) {
    match seq.status {
        FulfillmentStatus::Complete => {
            let shown: Vec<String> = seq
                .display_sequences()
                .iter()
                .map(|attempt| attempt.filled_codes().join(", "))
                .collect();
            let _ = writeln!(out, "{}Fulfilled by: {}", DETAIL_INDENT, shown.join("; "));
            return;
        }
        FulfillmentStatus::Partial => {
            let done: Vec<String> = seq
                .completed_sequences()
                .map(|attempt| format!("({})", attempt.filled_codes().join(", ")))
                .collect();
            let _ = writeln!(out, "{}Sequences Completed: {}", DETAIL_INDENT, done.join("; "));
        }
        FulfillmentStatus::None | FulfillmentStatus::Unevaluable => {}
    }

    let left: Vec<String> = seq
        .incomplete_templates
        .iter()
        .map(|template| format!("({})", template.join(", ")))
        .collect();
    let _ = writeln!(
        out,
        "{}Sequences Left: {} of {}{}",
        DETAIL_INDENT,
        seq.still_needed(),
        left.join("; "),
        grade_suffix(seq.grade_requirement.as_deref()),
    );
}

fn grade_suffix(grade: Option<&str>) -> String {
    match grade {
        Some(g) if !g.trim().is_empty() => format!(" with a minimum grade of {}", g),
        _ => String::new(),
    }
}

/// Describes what is still owed on the number/type quotas. Number floors are
/// cumulative, so each line shows its count minus the next higher floor's.
fn describe_quotas(
    numbers: &[NumberRequirement],
    types: &[TypeRequirement],
    options: &RenderOptions,
) -> String {
    let is_combined = |t: &TypeRequirement| options.combined_tags.iter().any(|c| c == &t.tag);

    let combined: Vec<&TypeRequirement> = types.iter().filter(|t| is_combined(*t)).collect();
    let combined_count: u32 = combined.iter().map(|t| t.count).sum();
    let mut combined_names: Vec<&str> = Vec::new();
    for t in &combined {
        if !combined_names.contains(&t.tag.as_str()) {
            combined_names.push(&t.tag);
        }
    }
    let mut combined_placed = false;

    let mut sorted: Vec<NumberRequirement> = numbers.to_vec();
    sorted.sort_by_key(|n| n.min_number);

    let mut lines: Vec<String> = Vec::new();
    for (i, quota) in sorted.iter().enumerate() {
        let next = sorted.get(i + 1).map(|n| n.count).unwrap_or(0);
        let count = quota.count.saturating_sub(next);
        if count == 0 {
            continue;
        }

        if !combined_placed && combined_count > 0 && quota.min_number >= options.combined_tag_floor {
            let general_only = count.saturating_sub(combined_count);
            if general_only > 0 {
                lines.push(format!("{} course(s) numbered >={}", general_only, quota.min_number));
            }
            lines.push(format!(
                "{} course(s) numbered >={} and is also a {}",
                combined_count,
                quota.min_number,
                combined_names.join(" or ")
            ));
            combined_placed = true;
        } else {
            lines.push(format!("{} course(s) numbered >={}", count, quota.min_number));
        }
    }

    for quota in types {
        if quota.count == 0 || (combined_placed && is_combined(quota)) {
            continue;
        }
        lines.push(format!("{} course(s) must be typed {}", quota.count, quota.tag));
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut out = String::from(" consisting of:");
    for line in lines {
        out.push('\n');
        out.push_str(QUOTA_INDENT);
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ConcentrationKind;
    use crate::domain::progress::SequenceAttempt;

    fn group(status: FulfillmentStatus, filled: &[&str], num_needed: u32) -> GroupFulfillment {
        let mut slots: Vec<Option<String>> = filled.iter().map(|c| Some(c.to_string())).collect();
        slots.resize(num_needed as usize, None);
        GroupFulfillment {
            status,
            num_needed,
            filled_slots: slots,
            remaining_tokens: vec!["CSC-XXX".into()],
            outstanding_numbers: vec![],
            outstanding_types: vec![],
            grade_requirement: None,
        }
    }

    #[test]
    fn test_complete_group_lists_courses() {
        let item = RequirementProgress {
            title: "Core".into(),
            outcome: Outcome::Group(group(FulfillmentStatus::Complete, &["CSC-101", "CSC-201"], 2)),
        };
        assert_eq!(
            render_requirement(&item, &RenderOptions::default()),
            "[X] Core (Completed)\n   Fulfilled by: CSC-101, CSC-201\n\n"
        );
    }

    #[test]
    fn test_partial_group_shows_remaining_and_grade() {
        let mut g = group(FulfillmentStatus::Partial, &["CSC-310"], 2);
        g.grade_requirement = Some("C".into());
        g.outstanding_numbers = vec![NumberRequirement {
            count: 1,
            min_number: 300,
        }];
        let item = RequirementProgress {
            title: "Electives".into(),
            outcome: Outcome::Group(g),
        };
        let text = render_requirement(&item, &RenderOptions::default());
        assert_eq!(
            text,
            "[~] Electives (Partially Completed)\n   Completed: CSC-310\n   Still Needed: 1 of CSC-XXX consisting of:\n                    * 1 course(s) numbered >=300 with a minimum grade of C\n\n"
        );
    }

    #[test]
    fn test_cumulative_number_quotas_and_combined_tags() {
        let numbers = vec![
            NumberRequirement {
                count: 4,
                min_number: 200,
            },
            NumberRequirement {
                count: 2,
                min_number: 300,
            },
        ];
        let types = vec![
            TypeRequirement {
                count: 1,
                tag: "WAC".into(),
            },
            TypeRequirement {
                count: 1,
                tag: "HUM".into(),
            },
        ];
        let text = describe_quotas(&numbers, &types, &RenderOptions::default());
        assert_eq!(
            text,
            " consisting of:\n                    * 2 course(s) numbered >=200\n                    * 1 course(s) numbered >=300\n                    * 1 course(s) numbered >=300 and is also a WAC\n                    * 1 course(s) must be typed HUM"
        );
    }

    #[test]
    fn test_combined_tag_without_numbers_renders_as_type() {
        let types = vec![TypeRequirement {
            count: 1,
            tag: "WAC".into(),
        }];
        let text = describe_quotas(&[], &types, &RenderOptions::default());
        assert!(text.ends_with("* 1 course(s) must be typed WAC"));
    }

    #[test]
    fn test_sequence_rendering() {
        let seq = SequenceFulfillment {
            status: FulfillmentStatus::None,
            num_needed: 1,
            sequences_completed: 0,
            attempts: vec![SequenceAttempt {
                variant: 0,
                positions: vec![Some("FRE-101".into()), None],
                required: 2,
            }],
            incomplete_templates: vec![
                vec!["FRE-101".into(), "FRE-102".into()],
                vec!["SPN-101".into(), "SPN-102".into()],
            ],
            grade_requirement: Some("C-".into()),
        };
        let item = RequirementProgress {
            title: "Language".into(),
            outcome: Outcome::Sequence(seq),
        };
        assert_eq!(
            render_requirement(&item, &RenderOptions::default()),
            "[ ] Language (Not Completed)\n   Sequences Left: 1 of (FRE-101, FRE-102); (SPN-101, SPN-102) with a minimum grade of C-\n\n"
        );
    }

    #[test]
    fn test_report_header_and_empty_concentration() {
        let report = ProgressReport {
            graduation_year: Some(2027),
            concentrations: vec![ConcentrationProgress {
                kind: ConcentrationKind::Minor,
                name: "Astrology".into(),
                requirements: vec![],
                consumed: vec![],
            }],
            warnings: vec!["No catalog rows found for Minor 'Astrology'".into()],
        };
        let text = render_text(&report, &RenderOptions::default());
        assert!(text.contains("Graduation Year: 2027\n"));
        assert!(text.contains("Warning: No catalog rows found for Minor 'Astrology'\n"));
        assert!(text.contains("Minor: Astrology\n   (no requirements found in catalog)\n"));
    }

    #[test]
    fn test_json_rendering_is_structured() {
        let report = ProgressReport {
            graduation_year: None,
            concentrations: vec![],
            warnings: vec![],
        };
        let json = render(&report, OutputFormat::Json, &RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["graduation_year"].is_null());
        assert!(value["concentrations"].as_array().unwrap().is_empty());
    }
}
