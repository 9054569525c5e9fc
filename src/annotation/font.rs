use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Glyph edge of the built-in bitmap font, before scaling.
const GLYPH_SIZE: u32 = 8;

/// Largest block size for a bitmap font pixel; glyphs top out at 512 px.
pub const MAX_BITMAP_SCALE: u32 = 64;

/// Font used to render face labels.
pub enum LabelFont {
    TrueType { font: FontVec, scale: PxScale },
    /// Built-in 8x8 bitmap glyphs, each pixel drawn as a `scale` x `scale` block.
    Bitmap { scale: u32 },
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("scale", &scale.y)
                .finish(),
            LabelFont::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}

impl LabelFont {
    /// Load a TrueType/OpenType font file at `size` pixels.
    pub fn load(path: &Path, size: u32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(LabelFont::TrueType {
            font,
            scale: PxScale::from(size.max(1) as f32),
        })
    }

    /// The built-in bitmap font, scaled to roughly `size` pixels.
    pub fn builtin(size: u32) -> Self {
        let scale = (size as f32 / GLYPH_SIZE as f32).round() as u32;
        LabelFont::Bitmap {
            scale: scale.clamp(1, MAX_BITMAP_SCALE),
        }
    }

    /// Try each candidate path in order, falling back to [`LabelFont::builtin`].
    pub fn load_or_builtin(candidates: &[PathBuf], size: u32) -> Self {
        let mut last_error = None;
        for path in candidates {
            match Self::load(path, size) {
                Ok(font) => {
                    debug!("Loaded font {}", path.display());
                    return font;
                }
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) => warn!("{}. Using the built-in font.", e),
            None => warn!("No font configured. Using the built-in font."),
        }
        Self::builtin(size)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Bitmap { .. })
    }

    /// Width and height in pixels of `text` rendered on one line.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            LabelFont::TrueType { font, scale } => text_size(*scale, font, text),
            LabelFont::Bitmap { scale } => {
                let glyph = GLYPH_SIZE.saturating_mul(*scale);
                let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                (count.saturating_mul(glyph), glyph)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the
    /// image are clipped.
    pub fn draw(&self, image: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>) {
        match self {
            LabelFont::TrueType { font, scale } => {
                draw_text_mut(image, color, x, y, *scale, font, text)
            }
            LabelFont::Bitmap { scale } => {
                let advance = (GLYPH_SIZE * (*scale).min(MAX_BITMAP_SCALE)) as i32;
                let mut glyph_x = x;
                for ch in text.chars() {
                    if glyph_x >= image.width() as i32 {
                        break;
                    }
                    draw_bitmap_glyph(image, glyph_rows(ch), glyph_x, y, *scale, color);
                    glyph_x = glyph_x.saturating_add(advance);
                }
            }
        }
    }
}

fn glyph_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_glyph(
    image: &mut RgbImage,
    rows: [u8; 8],
    x: i32,
    y: i32,
    scale: u32,
    color: Rgb<u8>,
) {
    let (width, height) = image.dimensions();
    let scale = scale.min(MAX_BITMAP_SCALE) as i32;

    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_SIZE as i32 {
            // Bit 0 is the leftmost pixel.
            if bits & (1u8 << col) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + col * scale + dx;
                    let py = y + row as i32 * scale + dy;
                    if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                        image.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}
