//! Glyph rasterisation and bitmap scaling.

use freetype::face::LoadFlag;
use freetype::bitmap::PixelMode;

use crate::error::{Error, Result};

/// The pixel result of rasterising one glyph.
#[derive(Debug, Clone)]
pub struct GlyphRaster {
    pub width: usize,
    pub height: usize,
    /// Horizontal bearing: left edge of the bitmap relative to the origin.
    pub left: i32,
    /// Vertical bearing: top edge of the bitmap above the baseline.
    pub top: i32,
    /// Horizontal advance in (fractional) pixels.
    pub advance: f32,
    /// The bitmap carries its own colors (emoji) and must not be
    /// color-modulated at composite time.
    pub is_color: bool,
    /// BGRA pixels, row-major, tightly packed.
    pub data: Vec<u8>,
}

/// Load and render a glyph from a face that already has its size applied.
///
/// 8-bit gray coverage expands to BGRA by replicating the gray byte into
/// every channel including alpha; native BGRA copies through. When
/// `fit_height` is given (fixed-size bitmap faces), oversize bitmaps are
/// repeatedly halved by 2×2 box averaging.
pub fn rasterize(face: &freetype::Face, glyph_index: u32, fit_height: Option<usize>) -> Result<GlyphRaster> {
    face.load_glyph(glyph_index, LoadFlag::RENDER | LoadFlag::COLOR)?;

    let slot = face.glyph();
    let bitmap = slot.bitmap();
    let width = bitmap.width().max(0) as usize;
    let height = bitmap.rows().max(0) as usize;
    let pitch = bitmap.pitch();
    let buffer = bitmap.buffer();
    if pitch < 0 {
        return Err(Error::Font(format!("bottom-up bitmap for glyph {glyph_index}")));
    }

    let mut data = vec![0u8; width * height * 4];
    let mut is_color = false;

    match bitmap.pixel_mode() {
        Ok(PixelMode::Gray) => {
            for y in 0..height {
                let row = &buffer[y * pitch as usize..];
                for x in 0..width {
                    let g = row[x];
                    let px = &mut data[(y * width + x) * 4..(y * width + x) * 4 + 4];
                    px.fill(g);
                }
            }
        }
        Ok(PixelMode::Bgra) => {
            is_color = true;
            for y in 0..height {
                let src = &buffer[y * pitch as usize..y * pitch as usize + width * 4];
                data[y * width * 4..(y + 1) * width * 4].copy_from_slice(src);
            }
        }
        mode => {
            return Err(Error::Font(format!(
                "unsupported glyph pixel mode {mode:?} for glyph {glyph_index}"
            )));
        }
    }

    let mut raster = GlyphRaster {
        width,
        height,
        left: slot.bitmap_left(),
        top: slot.bitmap_top(),
        advance: slot.advance().x as f32 / 64.0,
        is_color,
        data,
    };

    if let Some(cell_height) = fit_height {
        downscale_to_fit(&mut raster, cell_height);
    }

    Ok(raster)
}

/// Halve the raster with a 2×2 box filter while a further halving still
/// leaves it at least `cell_height` tall, scaling the bearings and the
/// advance along with it.
// TODO: a fractional resampling step for strikes that land between 1x and
// 2x of the cell height; box halving alone leaves those oversize.
pub fn downscale_to_fit(raster: &mut GlyphRaster, cell_height: usize) {
    let mut scale = 1.0f32;

    while cell_height > 0 && raster.height / 2 >= cell_height {
        let (w, h, data) = box_halve(raster.width, raster.height, &raster.data);
        raster.width = w;
        raster.height = h;
        raster.data = data;
        scale *= 0.5;
    }

    if scale < 1.0 {
        raster.left = (raster.left as f32 * scale).round() as i32;
        raster.top = (raster.top as f32 * scale).round() as i32;
        raster.advance *= scale;
    }
}

/// Average 2×2 pixel blocks of a BGRA bitmap, clamping at odd edges.
fn box_halve(width: usize, height: usize, data: &[u8]) -> (usize, usize, Vec<u8>) {
    let new_w = width.div_ceil(2).max(1);
    let new_h = height.div_ceil(2).max(1);
    let mut out = vec![0u8; new_w * new_h * 4];

    let sample = |x: usize, y: usize, c: usize| -> u32 {
        let x = x.min(width - 1);
        let y = y.min(height - 1);
        u32::from(data[(y * width + x) * 4 + c])
    };

    for y in 0..new_h {
        for x in 0..new_w {
            for c in 0..4 {
                let sum = sample(2 * x, 2 * y, c)
                    + sample(2 * x + 1, 2 * y, c)
                    + sample(2 * x, 2 * y + 1, c)
                    + sample(2 * x + 1, 2 * y + 1, c);
                out[(y * new_w + x) * 4 + c] = (sum / 4) as u8;
            }
        }
    }

    (new_w, new_h, out)
}
