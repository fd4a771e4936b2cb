use crate::{
    bounds::MapBounds,
    config::MapStyle,
    error::{PeakMapError, Result},
    peaks::{PeakRecord, PeakTable, ShapeKind},
};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use imageproc::{
    drawing::{
        draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut,
    },
    point::Point,
};
use log::{debug, info};
use std::path::Path;

/// Strokes thinner than this are drawn as 1px segments.
const THIN_STROKE_PX: f32 = 1.5;

/// Map colors
pub struct Colors;

impl Colors {
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
}

/// Square raster canvas. Callers pass normalized `[0,1]` coordinates
/// through [`Renderer::to_px`]; the draw methods take pixels.
pub struct Renderer {
    pub image: RgbImage,
    pub size: u32,
    font: FontVec,
}

impl Renderer {
    /// White canvas of `size` x `size` pixels.
    pub fn new(size: u32, font: FontVec) -> Self {
        let image = ImageBuffer::from_pixel(size, size, Colors::WHITE);
        Self { image, size, font }
    }

    /// Normalized length/coordinate -> pixels
    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        (v * self.size as f64) as f32
    }

    /// Upward-pointing isosceles triangle outline centered on `(cx, cy)`.
    pub fn draw_triangle_outline(
        &mut self,
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Rgb<u8>,
    ) {
        let apex = (cx, cy - height / 2.0);
        let left = (cx - width / 2.0, cy + height / 2.0);
        let right = (cx + width / 2.0, cy + height / 2.0);

        for (a, b) in [(apex, right), (right, left), (left, apex)] {
            self.draw_thick_segment(a, b, line_width, color);
        }
    }

    /// Line segment of `line_width` pixels with round joins.
    pub fn draw_thick_segment(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        line_width: f32,
        color: Rgb<u8>,
    ) {
        if line_width < THIN_STROKE_PX {
            draw_line_segment_mut(&mut self.image, a, b, color);
            return;
        }

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len = (dx * dx + dy * dy).sqrt();
        let half = line_width / 2.0;

        if len > f32::EPSILON {
            // unit normal scaled to half the stroke width
            let (nx, ny) = (-dy / len * half, dx / len * half);
            let quad = [
                px_point(a.0 + nx, a.1 + ny),
                px_point(b.0 + nx, b.1 + ny),
                px_point(b.0 - nx, b.1 - ny),
                px_point(a.0 - nx, a.1 - ny),
            ];
            if quad[0] != quad[3] {
                draw_polygon_mut(&mut self.image, &quad, color);
            } else {
                draw_line_segment_mut(&mut self.image, a, b, color);
            }
        }

        let r = half.round().max(1.0) as i32;
        for (x, y) in [a, b] {
            draw_filled_circle_mut(&mut self.image, (x.round() as i32, y.round() as i32), r, color);
        }
    }

    /// Filled circle; radius is clamped to at least one pixel.
    pub fn draw_filled_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>) {
        let r = radius.round().max(1.0) as i32;
        draw_filled_circle_mut(&mut self.image, (cx.round() as i32, cy.round() as i32), r, color);
    }

    /// Text whose baseline starts at `(x, y)`. Sizes under one pixel
    /// rasterize to nothing and are skipped.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, font_size: f32, color: Rgb<u8>) {
        if text.is_empty() || font_size < 1.0 {
            return;
        }

        let font = &self.font;
        let scale = PxScale::from(font_size);
        // draw_text_mut takes the top of the line box
        let ascent = font.as_scaled(scale).ascent();
        draw_text_mut(
            &mut self.image,
            color,
            x.round() as i32,
            (y - ascent).round() as i32,
            scale,
            font,
            text,
        );
    }

    /// Saves the canvas; format follows the extension, PNG if unknown.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        self.image
            .save_with_format(path, format)
            .map_err(|source| PeakMapError::SaveImage {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[inline]
fn px_point(x: f32, y: f32) -> Point<i32> {
    Point::new(x.round() as i32, y.round() as i32)
}

/// Resolves the label font: an explicit file first, then system fonts.
///
/// # Errors
/// Returns error if `explicit` cannot be loaded or no system font is found.
pub fn load_font(explicit: Option<&Path>) -> Result<FontVec> {
    if let Some(path) = explicit {
        let bytes = std::fs::read(path).map_err(|e| PeakMapError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| PeakMapError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("Using label font {}", path.display());
        return Ok(font);
    }

    load_system_font()
}

/// First system sans-serif font that loads
fn load_system_font() -> Result<FontVec> {
    let source = SystemSource::new();

    let font_families = [
        FamilyName::Title("Arial".to_string()),
        FamilyName::SansSerif,
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::Title("DejaVu Sans".to_string()),
    ];

    for family in font_families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            debug!("Loaded system font {}", font_kit_font.full_name());
            return Ok(font);
        }
    }
    Err(PeakMapError::NoFont)
}

/// Draws every peak of `table` in input order onto `renderer`.
pub fn render_peaks(renderer: &mut Renderer, table: &PeakTable, style: &MapStyle) {
    let b = &table.bounds;

    let tri_w = renderer.to_px(b.normalize_width(style.triangle_width));
    // equilateral height from the same width unit
    let tri_h = tri_w * 3f32.sqrt() / 2.0;
    let line_w = renderer.to_px(b.normalize_width(style.line_width));
    let radius = renderer.to_px(b.normalize_width(style.circle_radius));
    let font_px = renderer.to_px(b.normalize_height(style.font_size));
    debug!(
        "symbol sizes [px]: triangle {:.2}x{:.2}, line {:.2}, circle r {:.2}, font {:.2}",
        tri_w, tri_h, line_w, radius, font_px
    );

    let mut drawn = 0;
    for peak in table.iter() {
        let (cx, cy) = peak_center_px(renderer, b, peak);
        match peak.shape {
            ShapeKind::Triangle => {
                renderer.draw_triangle_outline(cx, cy, tri_w, tri_h, line_w, Colors::RED);
            }
            ShapeKind::Circle => {
                let color = if peak.bagged { Colors::BLACK } else { Colors::RED };
                renderer.draw_filled_circle(cx, cy, radius, color);
            }
            ShapeKind::Unset => continue,
        }
        renderer.draw_text(cx, cy, &peak.name, font_px, Colors::BLACK);
        drawn += 1;
    }
    info!("Drew {} of {} peaks", drawn, table.len());
}

fn peak_center_px(renderer: &Renderer, bounds: &MapBounds, peak: &PeakRecord) -> (f32, f32) {
    let (nx, ny) = bounds.normalize(peak.x as f64, peak.y as f64);
    (renderer.to_px(nx), renderer.to_px(ny))
}

/// Renders the map and writes it to `output_path`.
pub fn render_map<P: AsRef<Path>>(
    table: &PeakTable,
    style: &MapStyle,
    font: FontVec,
    output_path: P,
) -> Result<()> {
    let mut renderer = Renderer::new(style.canvas_size, font);
    render_peaks(&mut renderer, table, style);
    renderer.save(&output_path)?;
    info!("Map saved to: {}", output_path.as_ref().display());
    Ok(())
}
