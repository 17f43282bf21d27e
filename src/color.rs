use std::collections::BTreeMap;

use image::Rgb;
use palette::{Hsl, IntoColor, Srgb};

use crate::schedule::Schedule;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.82);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: course key → Rgb
// ---------------------------------------------------------------------------

/// Maps each course of a schedule to its own colour. Sections of the same
/// course (lecture, precept) share a colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb<u8>>,
    default_color: Rgb<u8>,
}

impl ColorMap {
    /// Build a colour map with palette entries assigned in placement order.
    pub fn for_schedule(schedule: &Schedule) -> Self {
        let keys = schedule.course_keys();
        let palette = generate_palette(keys.len());
        let mapping: BTreeMap<String, Rgb<u8>> = keys.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Rgb([200, 200, 200]),
        }
    }

    /// Look up the colour for a course key.
    pub fn color_for(&self, course_key: &str) -> Rgb<u8> {
        self.mapping
            .get(course_key)
            .copied()
            .unwrap_or(self.default_color)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
