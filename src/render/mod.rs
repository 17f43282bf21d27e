/// Weekly grid rendering.
///
/// Layout of one image:
/// ```text
///  ┌──────┬────────────────────────────────────────┬──────────────┐
///  │ time │  Monday  Tuesday  Wednesday  ...        │   legend     │
///  │ 00:00│  ┌────┐                                 │ COS126 - ... │
///  │ 01:00│  │    │  24 hourly rows × 5 day columns │ MAT201 - ... │
///  │  ... │  └────┘                                 │              │
///  └──────┴────────────────────────────────────────┴──────────────┘
/// ```
pub mod canvas;
pub mod legend;

use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use image::RgbImage;
use rayon::prelude::*;

use crate::color::ColorMap;
use crate::data::model::Weekday;
use crate::error::RenderError;
use crate::rules::RuleSet;
use crate::schedule::Schedule;
use canvas::{fit_scale, text_size, Canvas, BLACK};

const HOURS: u32 = 24;

/// Image geometry. The default matches a 3000 × 2400 px grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub grid_width: u32,
    pub grid_height: u32,
    /// Legend line-wrap budget in characters.
    pub legend_wrap: usize,
    pub header_scale: u32,
    pub time_scale: u32,
    pub label_scale: u32,
    pub legend_scale: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            grid_width: 3000,
            grid_height: 2400,
            legend_wrap: 20,
            header_scale: 6,
            time_scale: 3,
            label_scale: 2,
            legend_scale: 4,
        }
    }
}

impl RenderOptions {
    fn slot_width(&self) -> u32 {
        self.grid_width / Weekday::ALL.len() as u32
    }

    fn slot_height(&self) -> u32 {
        self.grid_height / HOURS
    }

    /// Blank space left of the grid, holding the hour labels.
    pub fn left_margin(&self) -> u32 {
        (self.grid_width as f64 * 0.05) as u32
    }
}

/// Vertical pixel offset of a time of day inside the grid, with fractional
/// minutes placed proportionally within the hour row.
fn time_offset(t: chrono::NaiveTime, slot_height: u32) -> i64 {
    let hours = t.hour() as f64 + t.minute() as f64 / 60.0;
    (hours * slot_height as f64) as i64
}

// ---------------------------------------------------------------------------
// Single schedule
// ---------------------------------------------------------------------------

/// Draw a schedule onto a fresh image: hour grid, day headers, one coloured
/// block per section meeting, and a legend sized to its longest line.
pub fn render_image(schedule: &Schedule, options: &RenderOptions) -> RgbImage {
    let slot_w = options.slot_width();
    let slot_h = options.slot_height();
    let left = options.left_margin() as i64;

    // Legend first: its widest line decides the right margin.
    let entries = legend::legend_entries(schedule, options.legend_wrap);
    let max_line = entries
        .iter()
        .flatten()
        .map(|line| text_size(line, options.legend_scale).0)
        .max()
        .unwrap_or(0);
    let extra = (options.grid_width as f64 * 0.05 + max_line as f64 * 1.2) as u32;

    let mut canvas = Canvas::new(options.grid_width + 1 + extra, options.grid_height + 1);

    // Grid
    for day in Weekday::ALL {
        let x0 = left + (day.index() as u32 * slot_w) as i64;
        for hour in 0..HOURS {
            let y0 = (hour * slot_h) as i64;
            canvas.outline_rect(x0, y0, x0 + slot_w as i64, y0 + slot_h as i64, BLACK);
        }
    }

    // Day headers
    for day in Weekday::ALL {
        let (w, _) = text_size(day.name(), options.header_scale);
        let x = left + (day.index() as u32 * slot_w) as i64 + (slot_w as i64 - w as i64) / 2;
        canvas.draw_text(x, 5, day.name(), options.header_scale, BLACK);
    }

    // Sections
    let colors = ColorMap::for_schedule(schedule);
    for section in schedule.sections() {
        let color = colors.color_for(&section.course_key());
        let label = format!("{} ({})", section.section_key(), section.time_range());
        let scale = fit_scale(&label, slot_w, options.label_scale);
        let (label_w, label_h) = text_size(&label, scale);

        let top = time_offset(section.start, slot_h);
        let bottom = time_offset(section.end, slot_h);

        for day in &section.days {
            let x0 = left + (day.index() as u32 * slot_w) as i64;
            canvas.fill_rect(x0, top, x0 + slot_w as i64, bottom, color);

            let x = x0 + (slot_w as i64 - label_w as i64) / 2;
            let y = top + (slot_h as i64 - label_h as i64) / 2;
            canvas.draw_text(x, y, &label, scale, BLACK);
        }
    }

    // Hour labels
    for hour in 0..HOURS {
        let text = format!("{hour:02}:00");
        let (_, h) = text_size(&text, options.time_scale);
        let y = (hour * slot_h) as i64 + (slot_h as i64 - h as i64) / 2;
        canvas.draw_text(5, y, &text, options.time_scale, BLACK);
    }

    // Legend
    let legend_x = (options.grid_width as f64 * 1.05 + max_line as f64 * 0.1) as i64;
    let line_h = (text_size("", options.legend_scale).1 + 8) as i64;
    let mut y = 7 * slot_h as i64;
    for lines in &entries {
        for (i, line) in lines.iter().enumerate() {
            canvas.draw_text(legend_x, y + i as i64 * line_h, line, options.legend_scale, BLACK);
        }
        let block = lines.len() as i64 * line_h;
        y += block.max(slot_h as i64 * 3 / 2);
    }

    canvas.into_image()
}

/// Render a schedule and write it to `path`. The format follows the
/// extension; `.png` is the one this crate produces.
pub fn render(
    schedule: &Schedule,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let image = render_image(schedule, options);
    image.save(path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Directory name for a batch generated at `timestamp`:
/// `schedules_<day>_<month>_<yy>_<hour>_<minute>_<second>`.
pub fn output_dir_name(timestamp: &NaiveDateTime) -> String {
    format!("schedules_{}", timestamp.format("%d_%m_%y_%H_%M_%S"))
}

/// Render every schedule into `output_dir` as `course_schedule{i}.png`, and
/// write the rule set that produced them to `params.txt`.
///
/// A failed image is logged and skipped; the rest of the batch still runs.
/// Returns the number of images written.
pub fn render_all(
    schedules: &[Schedule],
    output_dir: &Path,
    rules: &RuleSet,
    options: &RenderOptions,
) -> usize {
    if schedules.is_empty() {
        log::info!("No results");
        return 0;
    }

    if output_dir.is_dir() {
        log::warn!("Directory '{}' already exists, writing into it", output_dir.display());
    } else {
        match std::fs::create_dir_all(output_dir) {
            Ok(()) => log::info!("Directory '{}' created successfully.", output_dir.display()),
            Err(e) => log::error!("Creation of directory '{}' failed: {e}", output_dir.display()),
        }
    }

    let written = schedules
        .par_iter()
        .enumerate()
        .filter(|(i, schedule)| {
            let path = output_dir.join(format!("course_schedule{i}.png"));
            match render(schedule, &path, options) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Failed to write {}: {e}", path.display());
                    false
                }
            }
        })
        .count();

    let params_path = output_dir.join("params.txt");
    if let Err(e) = std::fs::write(&params_path, rules.dump()) {
        log::error!("Failed to write {}: {e}", params_path.display());
    }

    log::info!("{written} of {} schedules written to {}", schedules.len(), output_dir.display());
    written
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use image::Rgb;

    use super::canvas::WHITE;
    use super::*;
    use crate::data::model::tests::section;
    use crate::data::model::Weekday::*;

    fn sample() -> Schedule {
        Schedule::new(vec![
            section(("AAA", 100), "L01", &[Monday, Wednesday], "09:00", "10:30"),
            section(("BBB", 200), "L01", &[Thursday], "13:15", "14:45"),
        ])
    }

    #[test]
    fn grid_and_blocks_land_where_expected() {
        let options = RenderOptions::default();
        let schedule = sample();
        let image = render_image(&schedule, &options);
        assert_eq!(image.height(), 2401);
        assert!(image.width() > 3000 + options.left_margin());

        let colors = ColorMap::for_schedule(&schedule);
        let aaa = colors.color_for("AAA100");
        let bbb = colors.color_for("BBB200");

        // 10:30 ends at y = 1050 on a 100 px hour row; Monday column starts at x = 150
        assert_eq!(*image.get_pixel(153, 1040), aaa);
        assert_eq!(*image.get_pixel(1353, 1040), aaa);
        assert_eq!(*image.get_pixel(153, 1060), WHITE);
        // Tuesday is empty
        assert_eq!(*image.get_pixel(1050, 1040), WHITE);
        // 13:15 starts at y = 1325 in the Thursday column (x from 1950)
        assert_eq!(*image.get_pixel(1953, 1330), bbb);
        assert_eq!(*image.get_pixel(1953, 1320), WHITE);
        // gridline between the 03:00 and 04:00 rows
        assert_eq!(*image.get_pixel(1000, 400), Rgb([0, 0, 0]));
    }

    fn has_ink(image: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .any(|(x, y)| *image.get_pixel(x, y) == BLACK)
    }

    #[test]
    fn day_headers_and_hour_labels_are_drawn() {
        let options = RenderOptions::default();
        let image = render_image(&sample(), &options);

        // "Monday" at scale 6 is 288 x 48, centred in the 600 px column from x = 150
        let header_bottom = 5 + 8 * options.header_scale;
        assert!(has_ink(&image, 306..594, 5..header_bottom));
        assert!(!has_ink(&image, 160..300, 5..header_bottom));
        // "Tuesday" gets its own ink in the next column
        assert!(has_ink(&image, 750 + 132..750 + 468, 5..header_bottom));

        // "00:00" at scale 3 is 120 x 24, vertically centred in the first hour row
        assert!(has_ink(&image, 5..125, 38..62));
        assert!(!has_ink(&image, 0..150, 0..30));
        // "23:00" in the last row
        assert!(has_ink(&image, 5..125, 2338..2362));
    }

    #[test]
    fn longer_legend_widens_the_image() {
        let options = RenderOptions::default();
        let short = render_image(&sample(), &options);

        let mut sections = sample().sections().to_vec();
        sections[0].name = "A Considerably Longer Course Title Than Before".into();
        let long = render_image(&Schedule::new(sections), &options);
        assert!(long.width() > short.width());
    }

    #[test]
    fn render_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.png");
        render(&sample(), &path, &RenderOptions::default()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.height(), 2401);
    }

    #[test]
    fn render_all_writes_images_and_params() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("batch");
        let rules = RuleSet::new(2);
        let options = RenderOptions {
            grid_width: 500,
            grid_height: 480,
            ..RenderOptions::default()
        };

        let written = render_all(&[sample(), sample()], &out, &rules, &options);
        assert_eq!(written, 2);
        assert!(out.join("course_schedule0.png").is_file());
        assert!(out.join("course_schedule1.png").is_file());
        let params = std::fs::read_to_string(out.join("params.txt")).unwrap();
        assert_eq!(params, rules.dump());

        // a second run into the same directory is tolerated
        assert_eq!(render_all(&[sample()], &out, &rules, &options), 1);
    }

    #[test]
    fn render_all_with_nothing_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        assert_eq!(render_all(&[], &out, &RuleSet::new(1), &RenderOptions::default()), 0);
        assert!(!out.exists());
    }

    #[test]
    fn failed_writes_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the directory should be
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, b"").unwrap();
        let options = RenderOptions {
            grid_width: 500,
            grid_height: 480,
            ..RenderOptions::default()
        };
        assert_eq!(render_all(&[sample()], &blocker, &RuleSet::new(2), &options), 0);
    }

    #[test]
    fn directory_name_from_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(output_dir_name(&ts), "schedules_07_03_24_14_05_09");
    }
}
