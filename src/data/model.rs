use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Weekday – a teaching day
// ---------------------------------------------------------------------------

/// A teaching day. Weekends are not part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching days in grid column order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Zero-based grid column.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// Parse a full day name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Weekday> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Course – department + number
// ---------------------------------------------------------------------------

/// An academic offering, identified by department and number (`COS126`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Course {
    pub department: String,
    pub number: u32,
}

impl Course {
    pub fn new(department: impl Into<String>, number: u32) -> Self {
        Course {
            department: department.into(),
            number,
        }
    }

    /// Identity key: department immediately followed by number.
    pub fn key(&self) -> String {
        format!("{}{}", self.department, self.number)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.department, self.number)
    }
}

// ---------------------------------------------------------------------------
// Section – one meeting pattern of a course
// ---------------------------------------------------------------------------

/// One offering of a course: a label, the days it meets and a daily time span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub course: Course,
    /// Section label as printed in the catalog (`L01`, `P03`).
    pub label: String,
    pub days: BTreeSet<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Course title shown in the legend.
    pub name: String,
}

impl Section {
    pub fn course_key(&self) -> String {
        self.course.key()
    }

    /// Course key plus the component letter of the label (`COS126L`).
    pub fn component_key(&self) -> String {
        match self.label.chars().next() {
            Some(c) => format!("{}{c}", self.course.key()),
            None => self.course.key(),
        }
    }

    /// Course key plus the full section label, used on grid labels.
    pub fn section_key(&self) -> String {
        format!("{} {}", self.course.key(), self.label)
    }

    /// `HH:MM - HH:MM`
    pub fn time_range(&self) -> String {
        format!(
            "{:02}:{:02} - {:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

// ---------------------------------------------------------------------------
// Catalog – every section, plus the distinct courses
// ---------------------------------------------------------------------------

/// The full loaded catalog with a pre-computed course list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// All sections in catalog (row) order.
    pub sections: Vec<Section>,
    /// Distinct courses in order of first appearance.
    pub courses: Vec<Course>,
}

impl Catalog {
    /// Build the course index from loaded sections.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut seen: BTreeSet<Course> = BTreeSet::new();
        let mut courses = Vec::new();
        for section in &sections {
            if seen.insert(section.course.clone()) {
                courses.push(section.course.clone());
            }
        }
        Catalog { sections, courses }
    }

    /// Sections of the given courses, grouped by course key, in catalog order.
    pub fn sections_by_course<'a>(
        &'a self,
        courses: &[Course],
    ) -> BTreeMap<String, Vec<&'a Section>> {
        let wanted: BTreeSet<&Course> = courses.iter().collect();
        let mut grouped: BTreeMap<String, Vec<&'a Section>> = BTreeMap::new();
        for section in self.sections.iter().filter(|s| wanted.contains(&s.course)) {
            grouped.entry(section.course_key()).or_default().push(section);
        }
        grouped
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Test helper: a section meeting on `days` between two `HH:MM` times.
    pub(crate) fn section(
        key: (&str, u32),
        label: &str,
        days: &[Weekday],
        start: &str,
        end: &str,
    ) -> Section {
        Section {
            course: Course::new(key.0, key.1),
            label: label.to_string(),
            days: days.iter().copied().collect(),
            start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            name: format!("{}{} title", key.0, key.1),
        }
    }

    #[test]
    fn course_key_concatenates_department_and_number() {
        assert_eq!(Course::new("COS", 126).key(), "COS126");
        assert_eq!(Course::new("MAT", 201).to_string(), "MAT201");
    }

    #[test]
    fn component_key_uses_first_label_character() {
        let s = section(("COS", 126), "P02", &[Weekday::Monday], "09:00", "10:00");
        assert_eq!(s.component_key(), "COS126P");
        assert_eq!(s.section_key(), "COS126 P02");
        assert_eq!(s.time_range(), "09:00 - 10:00");
    }

    #[test]
    fn catalog_lists_courses_once_in_first_seen_order() {
        let catalog = Catalog::from_sections(vec![
            section(("MAT", 201), "L01", &[Weekday::Monday], "09:00", "10:00"),
            section(("COS", 126), "L01", &[Weekday::Tuesday], "09:00", "10:00"),
            section(("MAT", 201), "L02", &[Weekday::Friday], "13:00", "14:00"),
        ]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.courses,
            vec![Course::new("MAT", 201), Course::new("COS", 126)]
        );

        let grouped = catalog.sections_by_course(&[Course::new("MAT", 201)]);
        assert_eq!(grouped.len(), 1);
        let labels: Vec<&str> = grouped["MAT201"].iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["L01", "L02"]);
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_name(day.name()), Some(day));
        }
        assert_eq!(Weekday::from_name("thursday"), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_name("Saturday"), None);
    }
}
