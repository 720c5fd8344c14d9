//! Font and glyph cache.
//!
//! Resolves one fontconfig fallback chain per style (regular, bold,
//! italic, bold italic), loads faces through FreeType on first use, and
//! caches one raster per (face, glyph index) for the current size.
//! Missing bold/italic chains silently degrade to the regular chain; a
//! missing regular chain is a fatal startup error.

pub mod fc;
pub mod raster;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use log::warn;

pub use raster::GlyphRaster;

use crate::error::{Error, Result};

pub const MIN_FONT_SIZE: f32 = 4.0;
pub const MAX_FONT_SIZE: f32 = 96.0;

/// Cell geometry derived from the primary regular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub cell_width: usize,
    pub cell_height: usize,
    /// Signed distance from the baseline to the bottom of the cell
    /// (negative below the baseline).
    pub descender: i32,
    /// Baseline offset from the top of the cell.
    pub baseline: i32,
}

/// Index of a loaded (or load-pending) face.
pub type FaceId = usize;

struct FaceSlot {
    path: PathBuf,
    face: Option<freetype::Face>,
    /// Loading failed before; don't retry every lookup.
    broken: bool,
}

/// Font-face resolution, rasterisation, and the per-size raster cache.
pub struct FontCache {
    library: freetype::Library,
    faces: Vec<FaceSlot>,
    /// Fallback chains per style (indexed by `Style::font_style()`).
    chains: [Vec<FaceId>; 4],
    metrics: Metrics,
    size: f32,
    rasters: HashMap<(FaceId, u32), GlyphRaster>,
    /// Codepoints already reported as unmappable (warn once each).
    unmappable: HashSet<char>,
}

impl FontCache {
    /// Resolve the four style chains for `family` and load the primary
    /// regular face eagerly (it supplies the cell metrics). The remaining
    /// faces load on first use.
    pub fn new(family: &str, size: f32) -> Result<Self> {
        let library = freetype::Library::init()?;
        let size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);

        let mut faces: Vec<FaceSlot> = Vec::new();
        let mut by_path: HashMap<PathBuf, FaceId> = HashMap::new();
        let mut chains: [Vec<FaceId>; 4] = Default::default();

        for (style, &(bold, italic)) in
            [(false, false), (true, false), (false, true), (true, true)].iter().enumerate()
        {
            for path in fc::sorted_font_paths(family, bold, italic) {
                let id = *by_path.entry(path.clone()).or_insert_with(|| {
                    faces.push(FaceSlot { path, face: None, broken: false });
                    faces.len() - 1
                });
                if !chains[style].contains(&id) {
                    chains[style].push(id);
                }
            }
            if style > 0 && chains[style].is_empty() {
                chains[style] = chains[0].clone();
            }
        }

        if chains[0].is_empty() {
            return Err(Error::Font(format!("no font found for family {family:?}")));
        }

        let mut cache = Self {
            library,
            faces,
            chains,
            metrics: Metrics { cell_width: 1, cell_height: 1, descender: 0, baseline: 1 },
            size,
            rasters: HashMap::new(),
            unmappable: HashSet::new(),
        };

        let primary = cache.chains[0][0];
        if cache.ensure_loaded(primary).is_none() {
            return Err(Error::Font(format!(
                "cannot load primary face {:?}",
                cache.faces[primary].path
            )));
        }
        cache.metrics = cache.compute_metrics();
        Ok(cache)
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Change the point size: re-applies the size to every loaded face,
    /// recomputes the metrics, and flushes the raster cache.
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        for id in 0..self.faces.len() {
            if self.faces[id].face.is_some() {
                self.apply_size(id);
            }
        }
        self.rasters.clear();
        self.metrics = self.compute_metrics();
    }

    /// Find the face and glyph index covering `cp` for a style, searching
    /// the style's fallback chain in order. Unmappable codepoints warn
    /// once and substitute U+FFFD; if that fails too, `None` (the caller
    /// skips the cell).
    pub fn glyph_for(&mut self, cp: char, style: u8) -> Option<(FaceId, u32)> {
        if let Some(found) = self.search_chain(cp, style) {
            return Some(found);
        }

        if self.unmappable.insert(cp) {
            warn!("no font covers U+{:04X}; substituting U+FFFD", cp as u32);
        }
        self.search_chain('\u{fffd}', style)
    }

    /// The cached raster for a glyph, rasterising at most once per
    /// (face, glyph) for the current size.
    pub fn raster(&mut self, face_id: FaceId, glyph_index: u32) -> Result<&GlyphRaster> {
        if !self.rasters.contains_key(&(face_id, glyph_index)) {
            self.ensure_loaded(face_id)
                .ok_or_else(|| Error::Font(format!("face {face_id} unavailable")))?;
            let slot = &self.faces[face_id];
            let face = slot.face.as_ref().expect("ensured above");
            let fit = if face.is_scalable() { None } else { Some(self.metrics.cell_height) };
            let raster = raster::rasterize(face, glyph_index, fit)?;
            self.rasters.insert((face_id, glyph_index), raster);
        }
        Ok(&self.rasters[&(face_id, glyph_index)])
    }

    fn search_chain(&mut self, cp: char, style: u8) -> Option<(FaceId, u32)> {
        let chain = self.chains[usize::from(style.min(3))].clone();
        for id in chain {
            if self.ensure_loaded(id).is_none() {
                continue;
            }
            let face = self.faces[id].face.as_ref().expect("ensured above");
            let index = face.get_char_index(u64::from(cp) as usize);
            if index != 0 {
                return Some((id, index));
            }
        }
        None
    }

    /// Load a face on demand and apply the current size. Returns `None`
    /// (after a one-time warning) for unreadable font files.
    fn ensure_loaded(&mut self, id: FaceId) -> Option<()> {
        if self.faces[id].face.is_some() {
            return Some(());
        }
        if self.faces[id].broken {
            return None;
        }

        match self.library.new_face(&self.faces[id].path, 0) {
            Ok(face) => {
                self.faces[id].face = Some(face);
                self.apply_size(id);
                Some(())
            }
            Err(e) => {
                warn!("cannot load font {:?}: {e}", self.faces[id].path);
                self.faces[id].broken = true;
                None
            }
        }
    }

    /// Apply the current size: 26.6 fixed point for outline faces,
    /// strike 0 for fixed-size bitmap faces.
    fn apply_size(&mut self, id: FaceId) {
        let size = self.size;
        let Some(face) = self.faces[id].face.as_ref() else { return };

        if face.is_scalable() {
            let units = (size * 64.0) as isize;
            if let Err(e) = face.set_char_size(units, 0, 0, 0) {
                warn!("set_char_size failed for {:?}: {e}", self.faces[id].path);
            }
        } else if let Err(e) = select_size(face, 0) {
            warn!("select_size(0) failed for {:?}: {e}", self.faces[id].path);
        }
    }

    fn compute_metrics(&self) -> Metrics {
        let primary = self.chains[0][0];
        let face = self.faces[primary].face.as_ref().expect("primary face is loaded");
        let raw = face.raw();

        let upem = f32::from(raw.units_per_EM.max(1));
        let scale = self.size / upem;

        let cell_width = (f32::from(raw.max_advance_width) * scale).ceil().max(1.0) as usize;
        let cell_height = (f32::from(raw.height) * scale).ceil().max(1.0) as usize;
        let descender = (f32::from(raw.descender) * scale).round() as i32;
        let baseline = cell_height as i32 + descender;

        Metrics { cell_width, cell_height, descender, baseline }
    }
}
