//! Text rendering for location labels and map titles.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};

use crate::gradient::Color;

/// System font used when the configured font is missing.
pub const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

const LABEL_TEXT: Rgba<u8> = Rgba([33, 33, 33, 255]);
const LABEL_BORDER: Rgba<u8> = Rgba([102, 102, 102, 255]);
const LABEL_OPACITY: f32 = 0.92;
const LABEL_PADDING: i32 = 4;
const LINE_SPACING: f32 = 1.25;

/// Load the first readable TrueType font among `preferred` and the system
/// fallbacks.
pub fn load_font(preferred: Option<&Path>) -> Option<Font<'static>> {
    let candidates = preferred
        .map(Path::to_path_buf)
        .into_iter()
        .chain(FALLBACK_FONT_PATHS.iter().map(PathBuf::from));

    for path in candidates {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        match Font::try_from_vec(bytes) {
            Some(font) => {
                tracing::debug!(path = %path.display(), "Loaded label font");
                return Some(font);
            }
            None => tracing::warn!(path = %path.display(), "Not a valid TrueType font"),
        }
    }

    tracing::warn!("No usable font found, maps will be rendered without text");
    None
}

/// Format a numeric value for display (1 decimal place)
pub fn format_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{:.1}", rounded)
}

/// Format a percentage without decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}", value.round())
}

/// Size in pixels of a multi-line block of text.
pub fn block_size(font: &Font<'_>, font_size: f32, lines: &[String]) -> (i32, i32) {
    let scale = Scale::uniform(font_size);
    let line_height = (font_size * LINE_SPACING).ceil() as i32;
    let width = lines
        .iter()
        .map(|line| text_size(scale, font, line).0)
        .max()
        .unwrap_or(0);
    (width, line_height * lines.len() as i32)
}

/// Draw a label box whose top-left corner is at (x, y). Returns the box.
pub fn draw_label(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    font_size: f32,
    x: i32,
    y: i32,
    lines: &[String],
) -> Option<Rect> {
    if lines.is_empty() {
        return None;
    }

    let (text_w, text_h) = block_size(font, font_size, lines);
    let box_w = (text_w + 2 * LABEL_PADDING).max(1) as u32;
    let box_h = (text_h + 2 * LABEL_PADDING).max(1) as u32;

    // keep the box on the canvas
    let x = x.clamp(0, (canvas.width() as i32 - box_w as i32).max(0));
    let y = y.clamp(0, (canvas.height() as i32 - box_h as i32).max(0));
    let rect = Rect::at(x, y).of_size(box_w, box_h);

    blend_rect(canvas, rect, Color::rgb(255, 255, 255), LABEL_OPACITY);
    draw_hollow_rect_mut(canvas, rect, LABEL_BORDER);

    let scale = Scale::uniform(font_size);
    let line_height = (font_size * LINE_SPACING).ceil() as i32;
    for (i, line) in lines.iter().enumerate() {
        draw_text_mut(
            canvas,
            LABEL_TEXT,
            x + LABEL_PADDING,
            y + LABEL_PADDING + i as i32 * line_height,
            scale,
            font,
            line,
        );
    }

    Some(rect)
}

/// Draw a line of text horizontally centered on `center_x`.
pub fn draw_centered_text(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    font_size: f32,
    center_x: i32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(font_size);
    let (w, _) = text_size(scale, font, text);
    draw_text_mut(canvas, color, center_x - w / 2, y, scale, font, text);
}

/// Alpha-blend a solid color over a rectangle of the canvas.
fn blend_rect(canvas: &mut RgbaImage, rect: Rect, color: Color, opacity: f32) {
    let x0 = rect.left().max(0) as u32;
    let y0 = rect.top().max(0) as u32;
    let x1 = (rect.right() + 1).clamp(0, canvas.width() as i32) as u32;
    let y1 = (rect.bottom() + 1).clamp(0, canvas.height() as i32) as u32;
    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = canvas.get_pixel_mut(x, y);
            *pixel = color.over(*pixel, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(18.0), "18.0");
        assert_eq!(format_value(18.46), "18.5");
        assert_eq!(format_percent(19.6), "20");
    }

    #[test]
    fn test_missing_font_path_falls_through() {
        // must not panic whether or not a system font exists
        let _ = load_font(Some(Path::new("/nonexistent/font.ttf")));
    }

    #[test]
    fn test_blend_rect_is_clipped() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        blend_rect(
            &mut canvas,
            Rect::at(5, 5).of_size(20, 20),
            Color::rgb(255, 255, 255),
            1.0,
        );
        assert_eq!(*canvas.get_pixel(9, 9), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(4, 4), Rgba([0, 0, 0, 255]));
    }
}
