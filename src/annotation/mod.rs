pub mod font;

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

pub use font::LabelFont;

use crate::error::{Error, Result};
use crate::models::{Color, DetectedFace, PixelBox};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 85.0;
pub const DEFAULT_FONT_PATH: &str = "Ubuntu-R.ttf";
pub const DEFAULT_FONT_SIZE: u32 = 18;
pub const MAX_FONT_SIZE: u32 = 512;

/// Rectangle outline thickness in pixels.
pub const BOX_LINE_WIDTH: u32 = 2;

/// How faces are drawn. Built once per run and only read afterwards.
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    /// Faces with a lower confidence are not drawn. Equal is drawn.
    pub confidence_threshold: f32,
    pub font_path: PathBuf,
    pub font_size: u32,
    pub box_color: Color,
    pub text_color: Color,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            box_color: Color::GREEN,
            text_color: Color::WHITE,
        }
    }
}

/// What one annotation pass drew.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub drawn: usize,
    pub below_threshold: usize,
}

/// Draws detection results onto copies of images.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: AnnotationConfig,
    /// Extra directories searched for a relative font path.
    font_dirs: Vec<PathBuf>,
}

impl Annotator {
    pub fn new(config: AnnotationConfig) -> Self {
        Self {
            config,
            font_dirs: Vec::new(),
        }
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// The configured font, or the built-in one if it cannot be loaded.
    pub fn load_font(&self) -> LabelFont {
        let path = &self.config.font_path;
        let mut candidates = vec![path.clone()];
        if path.is_relative() {
            candidates.extend(self.font_dirs.iter().map(|dir| dir.join(path)));
        }
        LabelFont::load_or_builtin(&candidates, self.config.font_size)
    }

    /// Draw `faces` onto the image at `source` and write the result to `dest`,
    /// replacing any existing file.
    ///
    /// The output is written to a temporary file next to `dest` and renamed
    /// into place, so a failure never leaves a partial file behind.
    pub fn annotate(
        &self,
        source: &Path,
        dest: &Path,
        faces: &[DetectedFace],
    ) -> Result<AnnotationSummary> {
        let mut image = ImageReader::open(source)
            .map_err(|e| Error::image_io(source, e))?
            .with_guessed_format()
            .map_err(|e| Error::image_io(source, e))?
            .decode()
            .map_err(|e| Error::image_io(source, e))?
            .to_rgb8();
        debug!("Loaded {}: {}x{}", source.display(), image.width(), image.height());

        let font = self.load_font();
        let summary = self.annotate_in_place(&mut image, faces, &font);

        save_atomically(&image, dest)?;
        info!("Results saved to: {}", dest.display());
        Ok(summary)
    }

    /// Draw a box and a label for every face at or above the threshold,
    /// in the order given.
    pub fn annotate_in_place(
        &self,
        image: &mut RgbImage,
        faces: &[DetectedFace],
        font: &LabelFont,
    ) -> AnnotationSummary {
        let (width, height) = image.dimensions();
        let mut summary = AnnotationSummary::default();

        for face in faces {
            if !face.meets_threshold(self.config.confidence_threshold) {
                debug!(
                    "Skipping {} ({:.2} < {:.2})",
                    face.name, face.confidence, self.config.confidence_threshold
                );
                summary.below_threshold += 1;
                continue;
            }

            let bbox = face.bounding_box.to_pixels(width, height);
            debug!(
                "Drawing {} at ({}, {})-({}, {})",
                face.name, bbox.left, bbox.top, bbox.right, bbox.bottom
            );
            draw_box(image, bbox, self.config.box_color);
            draw_label(image, bbox, &face.name, font, &self.config);
            summary.drawn += 1;
        }

        summary
    }
}

/// Outline `bbox` with a [`BOX_LINE_WIDTH`] border growing inward.
fn draw_box(image: &mut RgbImage, bbox: PixelBox, color: Color) {
    for inset in 0..BOX_LINE_WIDTH {
        let w = (bbox.width() + 1).saturating_sub(2 * inset);
        let h = (bbox.height() + 1).saturating_sub(2 * inset);
        if w == 0 || h == 0 {
            break;
        }
        let rect =
            Rect::at((bbox.left + inset) as i32, (bbox.top + inset) as i32).of_size(w, h);
        draw_hollow_rect_mut(image, rect, color.into());
    }
}

/// Top-left corner of a `label_width` x `label_height` label sitting on top of
/// `bbox`, kept inside the image.
///
/// A label wider or taller than the image starts at 0 and is clipped on the
/// right or bottom.
pub fn label_anchor(
    bbox: PixelBox,
    label_width: u32,
    label_height: u32,
    image_width: u32,
    image_height: u32,
) -> (u32, u32) {
    let x = bbox.left.min(image_width.saturating_sub(label_width));
    let y = bbox
        .top
        .saturating_sub(label_height)
        .min(image_height.saturating_sub(label_height));
    (x, y)
}

fn draw_label(
    image: &mut RgbImage,
    bbox: PixelBox,
    name: &str,
    font: &LabelFont,
    config: &AnnotationConfig,
) {
    let (label_width, label_height) = font.text_size(name);
    if label_width == 0 || label_height == 0 {
        return;
    }
    let (x, y) = label_anchor(bbox, label_width, label_height, image.width(), image.height());

    let background = Rect::at(x as i32, y as i32).of_size(label_width, label_height);
    draw_filled_rect_mut(image, background, config.box_color.into());
    font.draw(image, name, x as i32, y as i32, config.text_color.into());
}

fn save_atomically(image: &RgbImage, dest: &Path) -> Result<()> {
    let format = ImageFormat::from_path(dest).map_err(|e| Error::image_io(dest, e))?;
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".annotating-")
        .tempfile_in(dir)
        .map_err(|e| Error::image_io(dest, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|e| Error::image_io(dest, e))?;
        writer
            .into_inner()
            .map_err(|e| Error::image_io(dest, e.into_error()))?;
    }
    tmp.persist(dest).map_err(|e| Error::image_io(dest, e.error))?;
    Ok(())
}
