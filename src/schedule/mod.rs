/// Section selection: overlap rules and the backtracking search.
///
/// ```text
///   CourseCombination ──► sections_by_key ──► search_keys (fewest sections first)
///                                                   │
///                                                   ▼
///                                   find_schedule (DFS + is_placeable)
///                                                   │
///                                                   ▼
///                                          Option<Schedule>
/// ```
pub mod overlap;
pub mod search;

use std::collections::BTreeMap;

use crate::data::model::{Section, Weekday};

/// A complete, conflict-free choice of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    sections: Vec<Section>,
}

impl Schedule {
    pub fn new(sections: Vec<Section>) -> Self {
        Schedule { sections }
    }

    /// Sections in the order the search placed them.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Distinct course keys in placement order.
    pub fn course_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for section in &self.sections {
            let key = section.course_key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Number of sections meeting on each day.
    pub fn day_counts(&self) -> BTreeMap<Weekday, usize> {
        day_counts(&self.sections)
    }
}

pub(crate) fn day_counts<'a>(
    sections: impl IntoIterator<Item = &'a Section>,
) -> BTreeMap<Weekday, usize> {
    let mut counts = BTreeMap::new();
    for section in sections {
        for day in &section.days {
            *counts.entry(*day).or_insert(0) += 1;
        }
    }
    counts
}
