use std::str::FromStr;

use image::Rgb;

/// Name used when the service does not report one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Face location as fractions of the image width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedBox {
    /// Convert to pixel coordinates on a `width` x `height` canvas.
    ///
    /// Every edge is clamped to the canvas, so a box that overhangs the frame
    /// is cut at the border rather than producing out-of-canvas coordinates.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelBox {
        let w = width as f32;
        let h = height as f32;
        let left = scale(self.left, w);
        let top = scale(self.top, h);
        let right = scale(self.left + self.width, w);
        let bottom = scale(self.top + self.height, h);

        PixelBox {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }
}

// Multiplied in f32 so that e.g. 0.7 * 1000 floors to 700, not 699.
fn scale(fraction: f32, extent: f32) -> u32 {
    (fraction * extent).floor().clamp(0.0, extent) as u32
}

/// Face bounding box in pixels. Corners are inclusive, as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// A celebrity face reported by the recognition service, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub bounding_box: NormalizedBox,
    pub name: String,
    /// Match confidence in `[0, 100]`.
    pub confidence: f32,
}

impl DetectedFace {
    pub fn meets_threshold(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0 };
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts a handful of color names or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "green" => return Ok(Color::GREEN),
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            "red" => return Ok(Color::RED),
            "blue" => return Ok(Color::BLUE),
            "yellow" => return Ok(Color::YELLOW),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("unknown color '{}' (use a name or #rrggbb)", s))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid color '{}': {}", s, e))
        };
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}
