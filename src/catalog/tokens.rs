//! Token grammar of catalog cells.
//!
//! - course list: `CSC-101, CSC-201, CSC-XXX`
//! - number requirements: `4(200), 2(300)` (also `2(>=300)`, `2 (300+)`)
//! - type requirements: `1(WAC), 2(JDQR/GDQR)`
//! - sequence cell: `(FRE-101, FRE-102 | 2); (SPN-101, SPN-102 | 2)`

use crate::domain::model::{NumberRequirement, TypeRequirement};
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*\(\s*(?:>=)?\s*(\d+)\s*\+?\s*\)$").expect("number pair pattern")
});

static TYPE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*\(\s*([^()]*?)\s*\)$").expect("type pair pattern"));

/// Splits on commas that are not inside parentheses. Pieces are trimmed and
/// empty pieces dropped.
pub fn split_outside_parens(input: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for ch in input.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    pieces.push(current);

    pieces
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits a course-group cell on plain commas.
pub fn split_course_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_number_requirement(token: &str) -> Option<NumberRequirement> {
    let caps = NUMBER_PAIR.captures(token.trim())?;
    Some(NumberRequirement {
        count: caps[1].parse().ok()?,
        min_number: caps[2].parse().ok()?,
    })
}

pub fn parse_type_requirement(token: &str) -> Option<TypeRequirement> {
    let caps = TYPE_PAIR.captures(token.trim())?;
    let tag = caps[2].trim();
    if tag.is_empty() {
        return None;
    }
    Some(TypeRequirement {
        count: caps[1].parse().ok()?,
        tag: tag.to_string(),
    })
}

/// A sequence clause: the ordered steps of one variant and how many of them
/// complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceClause {
    pub courses: Vec<String>,
    pub count: u32,
}

/// Parses `(A, B, C | 3)`. Parentheses are optional.
pub fn parse_sequence_clause(clause: &str) -> Result<SequenceClause, String> {
    let stripped: String = clause.chars().filter(|c| *c != '(' && *c != ')').collect();
    let parts: Vec<&str> = stripped.split('|').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!(
            "expected exactly one '|' in sequence clause '{}'",
            clause.trim()
        ));
    }

    let courses = split_course_list(parts[0]);
    if courses.is_empty() {
        return Err(format!("sequence clause '{}' lists no courses", clause.trim()));
    }

    let count = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("sequence count '{}' is not a number", parts[1]))?;

    Ok(SequenceClause { courses, count })
}

/// Splits a sequence cell into its clauses.
pub fn split_sequence_cell(input: &str) -> Vec<&str> {
    input
        .split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_outside_parens_keeps_parenthesized_commas() {
        assert_eq!(
            split_outside_parens("4(200), 2(300)"),
            vec!["4(200)".to_string(), "2(300)".to_string()]
        );
        assert_eq!(
            split_outside_parens("1(WAC, WAC-R), 2(HUM)"),
            vec!["1(WAC, WAC-R)".to_string(), "2(HUM)".to_string()]
        );
        assert!(split_outside_parens("  ").is_empty());
    }

    #[test]
    fn test_split_course_list_trims() {
        assert_eq!(
            split_course_list("CSC-101 ,CSC-201,  CSC-XXX"),
            vec!["CSC-101", "CSC-201", "CSC-XXX"]
        );
    }

    #[test]
    fn test_parse_number_requirement_forms() {
        let expected = NumberRequirement {
            count: 2,
            min_number: 300,
        };
        assert_eq!(parse_number_requirement("2(300)"), Some(expected));
        assert_eq!(parse_number_requirement(" 2 ( 300+ ) "), Some(expected));
        assert_eq!(parse_number_requirement("2(>=300)"), Some(expected));
        assert_eq!(parse_number_requirement("two(300)"), None);
        assert_eq!(parse_number_requirement("2(WAC)"), None);
        assert_eq!(parse_number_requirement("300"), None);
    }

    #[test]
    fn test_parse_type_requirement() {
        let req = parse_type_requirement("1(WAC/WAC-R)").unwrap();
        assert_eq!(req.count, 1);
        assert_eq!(req.tag, "WAC/WAC-R");
        assert!(parse_type_requirement("1()").is_none());
        assert!(parse_type_requirement("WAC").is_none());
    }

    #[test]
    fn test_parse_sequence_clause() {
        let clause = parse_sequence_clause("(FRE-101, FRE-102, FRE-201 | 3)").unwrap();
        assert_eq!(clause.courses, vec!["FRE-101", "FRE-102", "FRE-201"]);
        assert_eq!(clause.count, 3);

        assert!(parse_sequence_clause("(FRE-101, FRE-102)").is_err());
        assert!(parse_sequence_clause("(FRE-101 | x)").is_err());
        assert!(parse_sequence_clause("( | 2)").is_err());
    }

    #[test]
    fn test_split_sequence_cell() {
        let cell = "(FRE-101, FRE-102 | 2); (SPN-101, SPN-102 | 2);";
        assert_eq!(
            split_sequence_cell(cell),
            vec!["(FRE-101, FRE-102 | 2)", "(SPN-101, SPN-102 | 2)"]
        );
    }
}
