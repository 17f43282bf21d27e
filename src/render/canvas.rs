use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

/// Side length of one glyph cell at scale 1.
pub const GLYPH: u32 = 8;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel size of a single line of text at the given scale.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    (text.chars().count() as u32 * GLYPH * scale, GLYPH * scale)
}

/// Largest scale `<= preferred` at which `text` fits into `max_width`, never below 1.
pub fn fit_scale(text: &str, max_width: u32, preferred: u32) -> u32 {
    (1..=preferred.max(1))
        .rev()
        .find(|&s| text_size(text, s).0 <= max_width)
        .unwrap_or(1)
}

/// A white RGB raster with clipped drawing primitives.
///
/// Coordinates are signed so callers can position things partly off-canvas;
/// everything outside the image is silently dropped.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if (0..w).contains(&x) && (0..h).contains(&y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the half-open box `[x0, x1) × [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        for y in y0.max(0)..y1.min(h) {
            for x in x0.max(0)..x1.min(w) {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// One-pixel border whose corners are both included.
    pub fn outline_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        for x in x0..=x1 {
            self.put(x, y0, color);
            self.put(x, y1, color);
        }
        for y in y0..=y1 {
            self.put(x0, y, color);
            self.put(x1, y, color);
        }
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    /// Characters outside the basic Latin set render as `?`.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let scale = scale.max(1) as i64;
        let step = GLYPH as i64 * scale;

        for (i, c) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(c).or_else(|| BASIC_FONTS.get('?')) else {
                continue;
            };
            let gx = x + i as i64 * step;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH {
                    // bit 0 is the leftmost pixel
                    if bits & (1u8 << col) != 0 {
                        let px = gx + col as i64 * scale;
                        let py = y + row as i64 * scale;
                        self.fill_rect(px, py, px + scale, py + scale, color);
                    }
                }
            }
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
