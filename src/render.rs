//! Icon renderer: rasterizes one glyph from the icon font onto a square
//! transparent canvas and writes it out as a PNG.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::imageops::FilterType;
use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::color::ColorSpec;
use crate::error::{IconError, Result};
use crate::stylesheet::{self, IconCatalog};

/// Smallest canvas the glyph is ever rasterized on. Requests below this are
/// rendered at this size and downscaled at the end; small font renders tend
/// to crop glyph edges.
pub const MIN_CANVAS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleMode {
    /// Shrink the font size until the glyph fits the canvas width.
    Auto,
    /// Fixed fraction of the canvas size.
    Factor(f32),
}

#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub icon: String,
    pub size: u32,
    pub color: ColorSpec,
    pub scale: ScaleMode,
    /// Output filename, `<icon>.png` when unset.
    pub filename: Option<String>,
    pub out_dir: PathBuf,
}

#[derive(Debug)]
pub struct IconRenderer {
    catalog: IconCatalog,
    common_prefix: String,
    font: FontVec,
}

impl IconRenderer {
    /// Loads the stylesheet catalog and the font file once; both stay
    /// read-only for the rest of the run.
    pub fn new(stylesheet: &Path, font_path: &Path, keep_prefix: bool) -> Result<Self> {
        let (catalog, common_prefix) = stylesheet::load(stylesheet, keep_prefix)?;
        let data = fs::read(font_path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| IconError::Font(format!("{}: {e}", font_path.display())))?;
        Ok(Self {
            catalog,
            common_prefix,
            font,
        })
    }

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    pub fn common_prefix(&self) -> &str {
        &self.common_prefix
    }

    /// Renders the requested icon and returns the path of the written PNG.
    pub fn render(&self, request: &RenderRequest) -> Result<PathBuf> {
        let glyph = self
            .catalog
            .get(&request.icon)
            .ok_or_else(|| IconError::Lookup(request.icon.clone()))?;
        let fill = request.color.resolve()?;

        let requested = request.size;
        let size = requested.max(MIN_CANVAS);

        let mut font_px = match request.scale {
            ScaleMode::Auto => size as f32,
            ScaleMode::Factor(f) => (size as f32 * f).trunc(),
        };
        if let ScaleMode::Auto = request.scale {
            font_px = fit_font_size(size as f32, font_px, |px| self.advance(glyph, px));
        }
        let width = self.advance(glyph, font_px);
        log::debug!(
            "{}: glyph U+{:04X}, font {}px, width {:.1}px",
            request.icon,
            glyph as u32,
            font_px,
            width
        );

        // Height is treated as zero on purpose, matching the legacy
        // renderer: centered horizontally, a quarter of the canvas from
        // the top vertically.
        let x = (size as f32 - width) / 2.0;
        let y = size as f32 / 4.0;

        let mask = self.rasterize_mask(glyph, font_px, size, x, y);
        // The solid fill with the mask as its alpha channel is the final
        // antialiased glyph; any alpha in the fill color is replaced by
        // the mask.
        let mut out = colorize(&mask, fill);

        if requested != size {
            out = image::imageops::resize(&out, requested, requested, FilterType::Lanczos3);
        }

        fs::create_dir_all(&request.out_dir)?;
        let filename = request
            .filename
            .clone()
            .unwrap_or_else(|| format!("{}.png", request.icon));
        let path = request.out_dir.join(filename);
        out.save_with_format(&path, image::ImageFormat::Png)?;
        Ok(path)
    }

    /// Horizontal advance of the glyph at the given font pixel size, the
    /// same width measure the legacy renderer used for fitting.
    fn advance(&self, glyph: char, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        scaled.h_advance(self.font.glyph_id(glyph))
    }

    /// Draws the glyph's coverage into an 8-bit mask on a black canvas.
    fn rasterize_mask(&self, glyph: char, px: f32, size: u32, x: f32, y: f32) -> GrayImage {
        let mut mask = GrayImage::new(size, size);
        let scale = PxScale::from(px);
        let baseline = y + self.font.as_scaled(scale).ascent();
        let positioned = self
            .font
            .glyph_id(glyph)
            .with_scale_and_position(scale, point(x, baseline));
        if let Some(outlined) = self.font.outline_glyph(positioned) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = gx as i64 + bounds.min.x as i64;
                let px_y = gy as i64 + bounds.min.y as i64;
                if px_x >= 0 && px_y >= 0 && (px_x as u32) < size && (px_y as u32) < size {
                    mask.put_pixel(
                        px_x as u32,
                        px_y as u32,
                        Luma([(coverage * 255.0) as u8]),
                    );
                }
            });
        }
        mask
    }
}

/// Auto-fit search: shrinks the font size until the measured glyph width is
/// no larger than `target`.
///
/// The measured height is treated as zero throughout, so only the width
/// participates in the fit test. Every second iteration the damping factor
/// decays by 0.99, which bounds the loop even when integer truncation keeps
/// the width hovering just above the target.
pub(crate) fn fit_font_size(
    target: f32,
    initial: f32,
    mut measure: impl FnMut(f32) -> f32,
) -> f32 {
    let mut font_px = initial;
    let mut factor = 1.0f32;
    let mut iteration = 0u32;

    loop {
        let width = measure(font_px);
        if width <= target || font_px <= 1.0 {
            return font_px;
        }
        font_px = (target * target / width * factor).trunc();
        iteration += 1;
        if iteration % 2 == 0 {
            factor *= 0.99;
        }
    }
}

fn colorize(mask: &GrayImage, fill: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        let Luma([alpha]) = *mask.get_pixel(x, y);
        Rgba([fill[0], fill[1], fill[2], alpha])
    })
}
