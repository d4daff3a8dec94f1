use crate::domain::model::Course;

/// A student's courses as seen by one concentration evaluation.
///
/// The course list itself is never mutated; consumption is recorded as a
/// checked-out index set so every course leaves the pool at most once.
#[derive(Debug, Clone)]
pub struct CoursePool<'a> {
    courses: &'a [Course],
    checked_out: Vec<bool>,
    order: Vec<usize>,
}

impl<'a> CoursePool<'a> {
    pub fn new(courses: &'a [Course]) -> Self {
        Self {
            courses,
            checked_out: vec![false; courses.len()],
            order: Vec::new(),
        }
    }

    /// Courses still in the pool, in transcript order.
    pub fn available(&self) -> impl Iterator<Item = (usize, &'a Course)> + '_ {
        let courses = self.courses;
        courses
            .iter()
            .enumerate()
            .filter(move |(index, _)| !self.checked_out[*index])
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.checked_out.get(index).is_some_and(|out| !out)
    }

    /// Removes a course from the pool. Returns `None` if it was already
    /// taken or the index is out of range.
    pub fn check_out(&mut self, index: usize) -> Option<&'a Course> {
        if !self.is_available(index) {
            return None;
        }
        self.checked_out[index] = true;
        self.order.push(index);
        Some(&self.courses[index])
    }

    /// Consumed courses in the order they were taken.
    pub fn consumed(&self) -> impl Iterator<Item = &'a Course> + '_ {
        let courses = self.courses;
        self.order.iter().map(move |&index| &courses[index])
    }

    pub fn remaining(&self) -> usize {
        self.courses.len() - self.order.len()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses() -> Vec<Course> {
        vec![
            Course::new("CSC-101", "A"),
            Course::new("CSC-201", "B"),
            Course::new("CSC-301", "C"),
        ]
    }

    #[test]
    fn test_check_out_is_at_most_once() {
        let courses = courses();
        let mut pool = CoursePool::new(&courses);

        assert!(pool.check_out(1).is_some());
        assert!(pool.check_out(1).is_none());
        assert!(pool.check_out(7).is_none());
        assert_eq!(pool.remaining(), 2);

        let left: Vec<&str> = pool.available().map(|(_, c)| c.code()).collect();
        assert_eq!(left, vec!["CSC-101", "CSC-301"]);
    }

    #[test]
    fn test_consumed_keeps_take_order() {
        let courses = courses();
        let mut pool = CoursePool::new(&courses);
        pool.check_out(2);
        pool.check_out(0);

        let taken: Vec<&str> = pool.consumed().map(|c| c.code()).collect();
        assert_eq!(taken, vec!["CSC-301", "CSC-101"]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_pools_over_same_courses_are_independent() {
        let courses = courses();
        let mut major = CoursePool::new(&courses);
        let minor = CoursePool::new(&courses);
        major.check_out(0);
        assert!(minor.is_available(0));
    }
}
