//! Static frame rendering for the layered host surface
//!
//! Composes one frame per insertion: backdrop fill, indicator ring, and
//! label text. Animation stays with the host application; this surface
//! only ever draws the frame it presents.

use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Transform};

use crate::domain::content::{OverlayBody, OverlayContent, TextBody};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to allocate {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },
}

/// Renders overlay content into premultiplied RGBA pixmaps
pub struct FramePainter {
    font: Option<FontVec>,
}

impl FramePainter {
    const SPINNER_RADIUS: f32 = 28.0;
    const SPINNER_DOTS: u32 = 12;
    const DOT_RADIUS: f32 = 4.5;
    const LABEL_SIZE: f32 = 22.0;
    const LABEL_GAP: f32 = 24.0;

    pub fn new() -> Self {
        Self {
            font: load_system_font(),
        }
    }

    /// Renders one frame of the given content at the given surface size
    pub fn render(
        &self,
        content: &OverlayContent,
        width: u32,
        height: u32,
    ) -> Result<Pixmap, RenderError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed { width, height })?;

        let backdrop = content.backdrop;
        pixmap.fill(Color::from_rgba8(
            backdrop.color.r,
            backdrop.color.g,
            backdrop.color.b,
            (backdrop.opacity * 255.0).round() as u8,
        ));

        let center_x = (width as f32) / 2.0;
        let center_y = (height as f32) / 2.0;

        let label = match &content.body {
            OverlayBody::Indicator(style) => {
                self.draw_spinner(&mut pixmap, center_x, center_y);
                style.label.as_deref()
            }
            // TextBody is the only custom body this surface renders
            // natively; unknown payloads fall back to the backdrop alone.
            OverlayBody::Custom(custom) => custom
                .as_any()
                .downcast_ref::<TextBody>()
                .map(|body| body.text.as_str()),
        };

        if let Some(text) = label {
            let label_top = center_y + Self::SPINNER_RADIUS + Self::LABEL_GAP;
            self.draw_label(&mut pixmap, text, center_x, label_top);
        }

        Ok(pixmap)
    }

    /// Draws the indicator as a ring of dots with fading trail
    fn draw_spinner(&self, pixmap: &mut Pixmap, center_x: f32, center_y: f32) {
        for dot in 0..Self::SPINNER_DOTS {
            let angle = (dot as f32) * std::f32::consts::TAU / (Self::SPINNER_DOTS as f32);
            let x = center_x + angle.cos() * Self::SPINNER_RADIUS;
            let y = center_y + angle.sin() * Self::SPINNER_RADIUS;
            let alpha =
                60.0 + 195.0 * (dot as f32) / ((Self::SPINNER_DOTS - 1) as f32);

            let mut path_builder = PathBuilder::new();
            path_builder.push_circle(x, y, Self::DOT_RADIUS);
            if let Some(path) = path_builder.finish() {
                let mut paint = Paint::default();
                paint.set_color(Color::from_rgba8(255, 255, 255, alpha as u8));
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
    }

    /// Draws a single line of white text centered on `center_x`
    fn draw_label(&self, pixmap: &mut Pixmap, text: &str, center_x: f32, top: f32) {
        let Some(font) = &self.font else {
            log::debug!("no system font available, skipping overlay label");
            return;
        };

        let scale = PxScale::from(Self::LABEL_SIZE);
        let scaled = font.as_scaled(scale);

        // Lay the line out at the origin first so it can be centered
        let mut glyphs: Vec<Glyph> = Vec::new();
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        let origin_x = center_x - caret / 2.0;
        let baseline = top + scaled.ascent();
        let pixmap_width = pixmap.width() as i32;
        let pixmap_height = pixmap.height() as i32;
        let pixels = pixmap.pixels_mut();

        for mut glyph in glyphs {
            glyph.position.x += origin_x;
            glyph.position.y += baseline;

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = (bounds.min.x as i32) + (gx as i32);
                    let py = (bounds.min.y as i32) + (gy as i32);
                    if px < 0 || py < 0 || px >= pixmap_width || py >= pixmap_height {
                        return;
                    }

                    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u16;
                    if alpha == 0 {
                        return;
                    }

                    // Source is white at `alpha`, already premultiplied
                    let index = (py as usize) * (pixmap_width as usize) + (px as usize);
                    let dst = pixels[index];
                    let inverse = 255 - alpha;
                    let r = (alpha + (dst.red() as u16) * inverse / 255) as u8;
                    let g = (alpha + (dst.green() as u16) * inverse / 255) as u8;
                    let b = (alpha + (dst.blue() as u16) * inverse / 255) as u8;
                    let a = (alpha + (dst.alpha() as u16) * inverse / 255) as u8;
                    if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, a) {
                        pixels[index] = blended;
                    }
                });
            }
        }
    }
}

impl Default for FramePainter {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads a system UI font for label rendering
///
/// Label rendering is best-effort; a machine with none of the candidate
/// fonts simply gets an unlabeled overlay.
fn load_system_font() -> Option<FontVec> {
    let windir = std::env::var_os("WINDIR")?;
    let fonts = std::path::Path::new(&windir).join("Fonts");
    for candidate in ["segoeui.ttf", "arial.ttf", "tahoma.ttf"] {
        if let Ok(data) = std::fs::read(fonts.join(candidate)) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                return Some(font);
            }
        }
    }
    None
}
