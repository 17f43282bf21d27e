use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use course_planner::rules::{CourseGroup, TimeWindow};
use course_planner::{RuleSet, Weekday};
use parquet::arrow::ArrowWriter;

/// (department, number, title)
const COURSES: [(&str, i64, &str); 12] = [
    ("COS", 126, "Computer Science: An Interdisciplinary Approach"),
    ("COS", 217, "Introduction to Programming Systems"),
    ("COS", 226, "Algorithms and Data Structures"),
    ("MAT", 201, "Multivariable Calculus"),
    ("MAT", 202, "Linear Algebra with Applications"),
    ("PHY", 103, "General Physics I"),
    ("ECO", 100, "Introduction to Microeconomics"),
    ("ECO", 101, "Introduction to Macroeconomics"),
    ("ENG", 200, "Reading Literature"),
    ("HIS", 210, "The World in the Twentieth Century"),
    ("PSY", 101, "Introduction to Psychology"),
    ("CHI", 108, "Intensive Intermediate Chinese"),
];

/// Lecture slots (days, start, end)
const LECTURES: [(&str, &str, &str); 6] = [
    ("MW", "09:00", "09:50"),
    ("TTh", "10:00", "11:20"),
    ("MW", "11:00", "12:20"),
    ("TTh", "13:30", "14:50"),
    ("MWF", "10:00", "10:50"),
    ("MW", "15:00", "16:20"),
];

/// Precept slots (days, start, end)
const PRECEPTS: [(&str, &str, &str); 5] = [
    ("Th", "09:00", "09:50"),
    ("F", "11:00", "11:50"),
    ("W", "13:30", "14:20"),
    ("T", "15:00", "15:50"),
    ("F", "13:30", "14:20"),
];

fn main() {
    let mut department = Vec::new();
    let mut course = Vec::new();
    let mut section = Vec::new();
    let mut days = Vec::new();
    let mut start = Vec::new();
    let mut end = Vec::new();
    let mut name = Vec::new();

    let mut push = |c: &(&str, i64, &str), label: String, slot: &(&str, &str, &str)| {
        department.push(c.0.to_string());
        course.push(c.1);
        section.push(label);
        days.push(slot.0.to_string());
        start.push(slot.1.to_string());
        end.push(slot.2.to_string());
        name.push(c.2.to_string());
    };

    for (i, c) in COURSES.iter().enumerate() {
        // one or two lecture sections, and precepts for every other course
        for l in 0..=(i % 2) {
            let slot = &LECTURES[(i + 2 * l) % LECTURES.len()];
            push(c, format!("L{:02}", l + 1), slot);
        }
        if i % 2 == 0 {
            for p in 0..2 {
                let slot = &PRECEPTS[(i + p) % PRECEPTS.len()];
                push(c, format!("P{:02}", p + 1), slot);
            }
        }
    }
    let rows = department.len();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Department", DataType::Utf8, false),
        Field::new("Course", DataType::Int64, false),
        Field::new("Section", DataType::Utf8, false),
        Field::new("Days", DataType::Utf8, false),
        Field::new("Start", DataType::Utf8, false),
        Field::new("End", DataType::Utf8, false),
        Field::new("Name", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(department)),
            Arc::new(Int64Array::from(course)),
            Arc::new(StringArray::from(section)),
            Arc::new(StringArray::from(days)),
            Arc::new(StringArray::from(start)),
            Arc::new(StringArray::from(end)),
            Arc::new(StringArray::from(name)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let catalog_path = "sample_catalog.parquet";
    let file = std::fs::File::create(catalog_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // Matching rule file
    let mut rules = RuleSet::new(4);
    rules.must_include.push("COS126".into());
    rules.must_exclude.push("CHI".into());
    rules.group_at_least.push(CourseGroup::new(&["MAT", "PHY"], 1));
    rules.group_at_most.push(CourseGroup::new(&["ECO"], 1));
    rules.per_day_max_sections = BTreeMap::from([(Weekday::Friday, 2)]);
    rules.blackout_windows.push(TimeWindow::new(hm(8, 0), hm(9, 0)));

    let rules_path = "sample_rules.json";
    let json = serde_json::to_string_pretty(&rules).expect("Failed to serialize rules");
    std::fs::write(rules_path, json).expect("Failed to write rules");

    println!("Wrote {rows} sections of {} courses to {catalog_path}", COURSES.len());
    println!("Wrote sample rules to {rules_path}");
}

fn hm(h: u32, m: u32) -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}
