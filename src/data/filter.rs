use std::collections::BTreeSet;

use super::model::Course;
use crate::rules::{CourseGroup, RuleSet};

// ---------------------------------------------------------------------------
// CourseCombination
// ---------------------------------------------------------------------------

/// A candidate set of distinct courses, before any section is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCombination {
    courses: Vec<Course>,
}

impl CourseCombination {
    pub fn new(courses: Vec<Course>) -> Self {
        CourseCombination { courses }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn keys(&self) -> Vec<String> {
        self.courses.iter().map(Course::key).collect()
    }

    /// Number of courses whose key contains any of the group's patterns.
    fn count_matching(&self, group: &CourseGroup) -> usize {
        self.courses
            .iter()
            .filter(|course| matches_any(course, &group.courses))
            .count()
    }

    fn contains_match(&self, pattern: &str) -> bool {
        self.courses.iter().any(|course| matches_pattern(course, pattern))
    }

    fn departments_unique(&self) -> bool {
        let departments: BTreeSet<&str> =
            self.courses.iter().map(|c| c.department.as_str()).collect();
        departments.len() == self.courses.len()
    }
}

// ---------------------------------------------------------------------------
// Matching predicates
// ---------------------------------------------------------------------------

/// Inclusion and group rules match by substring of the course key:
/// `"COS"` matches `COS126`, and `"AAA100"` would also match `AAA1000`.
pub fn matches_pattern(course: &Course, pattern: &str) -> bool {
    course.key().contains(pattern)
}

fn matches_any(course: &Course, patterns: &[String]) -> bool {
    patterns.iter().any(|p| matches_pattern(course, p))
}

/// Exclusions match a whole department code or an exact course key.
pub fn is_excluded(course: &Course, exclusions: &[String]) -> bool {
    exclusions
        .iter()
        .any(|e| course.department == *e || course.key() == *e)
}

// ---------------------------------------------------------------------------
// k-subset enumeration
// ---------------------------------------------------------------------------

/// Lexicographic k-subsets of `0..n`, as index vectors.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Combinations {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        // rightmost index that can still move right
        match (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

// ---------------------------------------------------------------------------
// generate_combinations
// ---------------------------------------------------------------------------

/// Enumerate every `target_count`-subset of the non-excluded courses, then
/// narrow it stage by stage: must-include, at-least, at-most, exact counts,
/// and finally unique departments.
///
/// The result keeps enumeration order. An empty catalog, or a target larger
/// than the catalog, gives an empty list.
pub fn generate_combinations(catalog: &[Course], rules: &RuleSet) -> Vec<CourseCombination> {
    if rules.target_count == 0 {
        log::warn!("target_count is 0, no combinations generated");
        return Vec::new();
    }

    let courses: Vec<&Course> = catalog
        .iter()
        .filter(|c| !is_excluded(c, &rules.must_exclude))
        .collect();

    let mut combos: Vec<CourseCombination> = Combinations::new(courses.len(), rules.target_count)
        .map(|idx| CourseCombination::new(idx.into_iter().map(|i| courses[i].clone()).collect()))
        .collect();
    log::info!("Generated {} combinations", combos.len());

    for must in &rules.must_include {
        combos.retain(|combo| combo.contains_match(must));
    }
    log::info!("Filtered to {} combinations with all must-includes", combos.len());

    for group in &rules.group_at_least {
        combos.retain(|combo| combo.count_matching(group) >= group.count);
    }
    log::info!("Filtered to {} combinations meeting every at-least group", combos.len());

    for group in &rules.group_at_most {
        combos.retain(|combo| combo.count_matching(group) <= group.count);
    }
    log::info!("Filtered to {} combinations within every at-most group", combos.len());

    for group in &rules.group_exact {
        combos.retain(|combo| combo.count_matching(group) == group.count);
    }
    log::info!("Filtered to {} combinations matching every exact group", combos.len());

    if rules.unique_departments {
        combos.retain(CourseCombination::departments_unique);
        log::info!("Filtered to {} combinations with unique departments", combos.len());
    }

    combos
}
