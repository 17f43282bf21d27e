use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::data::model::Weekday;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Rule building blocks
// ---------------------------------------------------------------------------

/// A set of course patterns and a count, used by the three group rules.
///
/// A course belongs to the group when any pattern is a substring of its key,
/// so `"COS"` matches every COS course and `"COS1"` matches `COS126`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGroup {
    pub courses: Vec<String>,
    pub count: usize,
}

impl CourseGroup {
    pub fn new(courses: &[&str], count: usize) -> Self {
        CourseGroup {
            courses: courses.iter().map(|c| c.to_string()).collect(),
            count,
        }
    }
}

/// A time-of-day range during which no section may be in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "time_of_day")]
    pub start: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        TimeWindow { start, end }
    }

    /// Open-interval intersection: a span ending exactly when the window
    /// starts (or starting exactly when it ends) is allowed.
    pub fn intersects(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && end > self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Maximum number of section meetings per weekday.
pub type DayLimits = BTreeMap<Weekday, usize>;

mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(d)?;
        crate::data::parse::parse_time(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Everything the user constrains: how many courses, which ones, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Number of courses in every schedule.
    pub target_count: usize,
    /// Every schedule contains a course matching each of these (substring match).
    #[serde(default)]
    pub must_include: Vec<String>,
    /// Department codes (`PHY`) or exact course keys (`PHY101`) to drop.
    #[serde(default)]
    pub must_exclude: Vec<String>,
    #[serde(default)]
    pub group_at_least: Vec<CourseGroup>,
    #[serde(default)]
    pub group_at_most: Vec<CourseGroup>,
    #[serde(default)]
    pub group_exact: Vec<CourseGroup>,
    /// No two courses from the same department.
    #[serde(default)]
    pub unique_departments: bool,
    #[serde(default)]
    pub per_day_max_sections: DayLimits,
    #[serde(default)]
    pub blackout_windows: Vec<TimeWindow>,
    /// Choose one section per (course, component letter) instead of per course.
    #[serde(default)]
    pub per_component: bool,
    /// Search at most this many combinations.
    #[serde(default)]
    pub max_combinations: Option<usize>,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl RuleSet {
    /// A rule set with only a target count.
    pub fn new(target_count: usize) -> Self {
        RuleSet {
            target_count,
            must_include: Vec::new(),
            must_exclude: Vec::new(),
            group_at_least: Vec::new(),
            group_at_most: Vec::new(),
            group_exact: Vec::new(),
            unique_departments: false,
            per_day_max_sections: DayLimits::new(),
            blackout_windows: Vec::new(),
            per_component: false,
            max_combinations: None,
            parallel: true,
        }
    }

    /// Read a JSON rule file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let rules: RuleSet = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Structural checks. A rule set that is valid but unsatisfiable is not
    /// an error; it just produces no schedules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count == 0 {
            return Err(ConfigError::ZeroTargetCount);
        }
        for window in &self.blackout_windows {
            if window.end <= window.start {
                return Err(ConfigError::InvertedWindow {
                    start: window.start.format("%H:%M").to_string(),
                    end: window.end.format("%H:%M").to_string(),
                });
            }
        }
        let groups = [
            ("group_at_least", &self.group_at_least),
            ("group_at_most", &self.group_at_most),
            ("group_exact", &self.group_exact),
        ];
        for (rule, list) in groups {
            if list.iter().any(|g| g.courses.is_empty()) {
                return Err(ConfigError::EmptyGroup { rule });
            }
        }
        Ok(())
    }

    /// Human-readable dump, one `field: value` line per rule.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

fn fmt_groups(groups: &[CourseGroup]) -> String {
    let items: Vec<String> = groups
        .iter()
        .map(|g| format!("{{courses: {:?}, count: {}}}", g.courses, g.count))
        .collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let windows: Vec<String> = self.blackout_windows.iter().map(|w| w.to_string()).collect();
        let limits: Vec<String> = self
            .per_day_max_sections
            .iter()
            .map(|(day, max)| format!("{day}: {max}"))
            .collect();

        writeln!(f, "target_count: {}", self.target_count)?;
        writeln!(f, "must_include: {:?}", self.must_include)?;
        writeln!(f, "must_exclude: {:?}", self.must_exclude)?;
        writeln!(f, "group_at_least: {}", fmt_groups(&self.group_at_least))?;
        writeln!(f, "group_at_most: {}", fmt_groups(&self.group_at_most))?;
        writeln!(f, "group_exact: {}", fmt_groups(&self.group_exact))?;
        writeln!(f, "unique_departments: {}", self.unique_departments)?;
        writeln!(f, "per_day_max_sections: {{{}}}", limits.join(", "))?;
        writeln!(f, "blackout_windows: [{}]", windows.join(", "))?;
        writeln!(f, "per_component: {}", self.per_component)?;
        match self.max_combinations {
            Some(n) => writeln!(f, "max_combinations: {n}"),
            None => writeln!(f, "max_combinations: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let rules: RuleSet = serde_json::from_str(r#"{ "target_count": 4 }"#).unwrap();
        assert_eq!(rules, RuleSet::new(4));
        assert!(rules.parallel);
        assert!(!rules.unique_departments);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn full_json() {
        let rules: RuleSet = serde_json::from_str(
            r#"{
                "target_count": 3,
                "must_include": ["COS126"],
                "must_exclude": ["PHY", "MAT104"],
                "group_at_least": [{ "courses": ["MAT", "ECO"], "count": 1 }],
                "group_exact": [{ "courses": ["ENG"], "count": 0 }],
                "unique_departments": true,
                "per_day_max_sections": { "Friday": 1, "Monday": 2 },
                "blackout_windows": [{ "start": "08:00 AM", "end": "09:30" }],
                "max_combinations": 500,
                "parallel": false
            }"#,
        )
        .unwrap();

        assert_eq!(rules.must_exclude, vec!["PHY", "MAT104"]);
        assert_eq!(rules.group_at_least, vec![CourseGroup::new(&["MAT", "ECO"], 1)]);
        assert_eq!(rules.per_day_max_sections[&Weekday::Friday], 1);
        assert_eq!(rules.blackout_windows, vec![TimeWindow::new(hm(8, 0), hm(9, 30))]);
        assert_eq!(rules.max_combinations, Some(500));
        assert!(!rules.parallel);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn bad_time_is_a_parse_error() {
        let res: Result<RuleSet, _> = serde_json::from_str(
            r#"{ "target_count": 1, "blackout_windows": [{ "start": "noon", "end": "13:00" }] }"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn validation_failures() {
        assert!(matches!(
            RuleSet::new(0).validate(),
            Err(ConfigError::ZeroTargetCount)
        ));

        let mut rules = RuleSet::new(2);
        rules.blackout_windows.push(TimeWindow::new(hm(10, 0), hm(9, 0)));
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::InvertedWindow { .. })
        ));

        let mut rules = RuleSet::new(2);
        rules.group_at_most.push(CourseGroup::new(&[], 1));
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::EmptyGroup { rule: "group_at_most" })
        ));
    }

    #[test]
    fn blackout_window_is_open_interval() {
        let w = TimeWindow::new(hm(12, 0), hm(13, 0));
        assert!(w.intersects(hm(11, 30), hm(12, 30)));
        assert!(w.intersects(hm(12, 15), hm(12, 45)));
        assert!(!w.intersects(hm(11, 0), hm(12, 0)));
        assert!(!w.intersects(hm(13, 0), hm(14, 0)));
    }

    #[test]
    fn dump_lists_every_field() {
        let mut rules = RuleSet::new(4);
        rules.must_include.push("COS126".into());
        rules.group_exact.push(CourseGroup::new(&["ENG"], 1));
        rules.per_day_max_sections.insert(Weekday::Friday, 1);
        rules.blackout_windows.push(TimeWindow::new(hm(8, 0), hm(9, 0)));

        let dump = rules.dump();
        assert!(dump.contains("target_count: 4\n"));
        assert!(dump.contains("must_include: [\"COS126\"]\n"));
        assert!(dump.contains("group_exact: [{courses: [\"ENG\"], count: 1}]\n"));
        assert!(dump.contains("per_day_max_sections: {Friday: 1}\n"));
        assert!(dump.contains("blackout_windows: [08:00-09:00]\n"));
        assert!(dump.contains("max_combinations: none\n"));
        assert_eq!(dump.lines().count(), 11);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RuleSet::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
