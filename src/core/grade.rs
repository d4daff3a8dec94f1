/// Rank of a grade token. Transfer, test and in-progress credit (`T`, `N/A`,
/// `CIP`) rank above `A`; unknown tokens rank -1.0.
pub fn grade_rank(grade: &str) -> f64 {
    match grade.trim() {
        "CIP" | "N/A" | "T" => 4.3,
        "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "D" => 1.0,
        "D-" => 0.7,
        "F" => 0.0,
        _ => -1.0,
    }
}

/// True iff `grade` ranks at or above `floor`.
pub fn compare_grades(grade: &str, floor: &str) -> bool {
    grade_rank(grade) >= grade_rank(floor)
}

/// A missing or blank floor always passes.
pub fn meets_floor(grade: &str, floor: Option<&str>) -> bool {
    match floor.map(str::trim) {
        None | Some("") => true,
        Some(floor) => compare_grades(grade, floor),
    }
}
