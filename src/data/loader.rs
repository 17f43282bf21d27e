use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Catalog, Course, Section};
use super::parse::{parse_days, parse_time};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a course catalog from a file.  Dispatch by extension.
///
/// Every format carries the same columns:
/// `Department`, `Course`, `Section`, `Days`, `Start`, `End` and an optional
/// `Name` (course title).
///
/// Supported formats:
/// * `.csv`     – header row with the column names above
/// * `.json`    – `[{ "Department": "COS", "Course": 126, ... }, ...]`
/// * `.parquet` – one column per field; `Course` may be integer or string
pub fn load_file(path: &Path) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} sections of {} courses from {}",
        catalog.len(),
        catalog.courses.len(),
        path.display()
    );
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Row model shared by all formats
// ---------------------------------------------------------------------------

/// Course numbers arrive as integers (JSON, typed Parquet) or numeric text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CourseCell {
    Number(u64),
    Text(String),
}

/// One untyped catalog row as read from disk.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Course")]
    course: CourseCell,
    #[serde(rename = "Section")]
    section: String,
    #[serde(rename = "Days", default)]
    days: String,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
}

impl CatalogRow {
    /// Validate and convert into a typed section. `row` counts data rows from 1.
    fn into_section(self, row: usize) -> Result<Section> {
        let department = self.department.trim().to_string();
        if department.is_empty() {
            bail!("Row {row}: empty Department");
        }

        let number = match self.course {
            CourseCell::Number(n) => u32::try_from(n)
                .with_context(|| format!("Row {row}: course number {n} out of range"))?,
            CourseCell::Text(s) => s
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Row {row}: course '{s}' is not a number"))?,
        };
        let course = Course::new(department, number);

        let days = parse_days(&self.days).with_context(|| format!("Row {row}: bad Days"))?;
        let start = parse_time(&self.start).with_context(|| format!("Row {row}: bad Start"))?;
        let end = parse_time(&self.end).with_context(|| format!("Row {row}: bad End"))?;
        if end <= start {
            bail!("Row {row}: section ends ({end}) before it starts ({start})");
        }

        let name = match self.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => course.key(),
        };

        Ok(Section {
            course,
            label: self.section.trim().to_string(),
            days,
            start,
            end,
            name,
        })
    }
}

fn rows_to_catalog(rows: Vec<CatalogRow>) -> Result<Catalog> {
    let sections = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_section(i + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::from_sections(sections))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Catalog> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<CatalogRow>().enumerate() {
        rows.push(result.with_context(|| format!("CSV row {}", row_no + 1))?);
    }

    rows_to_catalog(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Department": "COS", "Course": 126, "Section": "L01",
///     "Days": "TTh", "Start": "10:00", "End": "10:50",
///     "Name": "Computer Science: An Interdisciplinary Approach" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<CatalogRow> = serde_json::from_str(&text).context("parsing JSON")?;
    rows_to_catalog(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog. Every column is cast to text first, so integer
/// course numbers and `Time64` start/end columns written by Pandas or Polars
/// go through the same validation as CSV cells.
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let department = required_column(&batch, "Department")?;
        let course = required_column(&batch, "Course")?;
        let section = required_column(&batch, "Section")?;
        let days = required_column(&batch, "Days")?;
        let start = required_column(&batch, "Start")?;
        let end = required_column(&batch, "End")?;
        let name = optional_column(&batch, "Name")?;

        for row in 0..batch.num_rows() {
            rows.push(CatalogRow {
                department: cell(&department, row),
                course: CourseCell::Text(cell(&course, row)),
                section: cell(&section, row),
                days: cell(&days, row),
                start: cell(&start, row),
                end: cell(&end, row),
                name: name.as_ref().map(|n| cell(n, row)),
            });
        }
    }

    rows_to_catalog(rows)
}

// -- Parquet / Arrow helpers --

fn required_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    optional_column(batch, name)?.with_context(|| format!("Parquet file missing '{name}' column"))
}

/// Fetch a column by name and cast it to UTF-8.
fn optional_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let text = cast(col, &DataType::Utf8)
        .with_context(|| format!("casting column '{name}' ({:?}) to text", col.data_type()))?;
    let strings = text
        .as_any()
        .downcast_ref::<StringArray>()
        .context("expected StringArray after cast")?
        .clone();
    Ok(Some(strings))
}

fn cell(col: &StringArray, row: usize) -> String {
    if col.is_null(row) {
        String::new()
    } else {
        col.value(row).to_string()
    }
}
