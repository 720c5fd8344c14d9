//! XRender glyph-set upload bookkeeping.
//!
//! Every glyph the window ever shows lives in one server-side glyph set,
//! keyed by a packed identifier of the cell's font style and codepoint.
//! Two growable bitsets remember which identifiers are uploaded and which
//! are color bitmaps (so compositing skips color modulation for them).

use log::warn;
use xcb::render;

use crate::error::Result;
use crate::font::FontCache;

/// Upper bound on packed identifiers: 2 style bits + 21 codepoint bits.
pub const MAX_GLYPH_ID: u32 = 1 << 23;

/// Pack a font style and codepoint into an XRender glyph identifier.
pub fn pack(style: u8, cp: char) -> u32 {
    (u32::from(style & 0x3) << 21) | cp as u32
}

/// A growable bitset, doubling up to `MAX_GLYPH_ID` bits.
#[derive(Debug, Default)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub fn contains(&self, bit: u32) -> bool {
        self.words
            .get(bit as usize / 64)
            .is_some_and(|&w| w >> (bit % 64) & 1 == 1)
    }

    pub fn insert(&mut self, bit: u32) {
        if bit >= MAX_GLYPH_ID {
            return;
        }
        let word = bit as usize / 64;
        if word >= self.words.len() {
            let mut len = self.words.len().max(64);
            while len <= word {
                len *= 2;
            }
            self.words.resize(len.min(MAX_GLYPH_ID as usize / 64), 0);
        }
        self.words[word] |= 1 << (bit % 64);
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

/// The server-side glyph set plus client-side upload state.
pub struct GlyphStore {
    glyphset: render::Glyphset,
    format: render::Pictformat,
    uploaded: BitSet,
    color: BitSet,
    /// Identifiers with no glyph in any face: the cell renders empty.
    skipped: BitSet,
}

impl GlyphStore {
    pub fn new(conn: &xcb::Connection, format: render::Pictformat) -> Result<Self> {
        let glyphset: render::Glyphset = conn.generate_id();
        conn.send_and_check_request(&render::CreateGlyphSet { gsid: glyphset, format })?;
        Ok(Self {
            glyphset,
            format,
            uploaded: BitSet::default(),
            color: BitSet::default(),
            skipped: BitSet::default(),
        })
    }

    pub fn glyphset(&self) -> render::Glyphset {
        self.glyphset
    }

    /// Whether this identifier has a composable glyph uploaded.
    pub fn drawable(&self, id: u32) -> bool {
        self.uploaded.contains(id) && !self.skipped.contains(id)
    }

    /// Whether the uploaded glyph is a color bitmap.
    pub fn is_color(&self, id: u32) -> bool {
        self.color.contains(id)
    }

    /// Upload the glyph for (style, codepoint) if it is not present yet.
    /// Rasterisation happens at most once per identifier per size.
    pub fn ensure(
        &mut self,
        conn: &xcb::Connection,
        font: &mut FontCache,
        cell_width: usize,
        cp: char,
        style: u8,
    ) -> Result<()> {
        let id = pack(style, cp);
        if self.uploaded.contains(id) {
            return Ok(());
        }
        self.uploaded.insert(id);

        let Some((face, glyph_index)) = font.glyph_for(cp, style) else {
            self.skipped.insert(id);
            return Ok(());
        };

        let raster = match font.raster(face, glyph_index) {
            Ok(raster) => raster,
            Err(e) => {
                warn!("rasterising U+{:04X} failed: {e}", cp as u32);
                self.skipped.insert(id);
                return Ok(());
            }
        };

        if raster.is_color {
            self.color.insert(id);
        }

        let info = render::Glyphinfo {
            width: raster.width as u16,
            height: raster.height as u16,
            x: (-raster.left) as i16,
            y: raster.top as i16,
            // Pen advance is the cell width, regardless of what the font
            // reports, so runs stay on the grid.
            x_off: cell_width as i16,
            y_off: 0,
        };
        conn.send_and_check_request(&render::AddGlyphs {
            glyphset: self.glyphset,
            glyphids: &[id],
            glyphs: &[info],
            data: &raster.data,
        })?;
        Ok(())
    }

    /// Drop every uploaded glyph (font size changed) and start a fresh
    /// glyph set.
    pub fn reset(&mut self, conn: &xcb::Connection) -> Result<()> {
        conn.send_request(&render::FreeGlyphSet { glyphset: self.glyphset });
        let glyphset: render::Glyphset = conn.generate_id();
        conn.send_and_check_request(&render::CreateGlyphSet { gsid: glyphset, format: self.format })?;
        self.glyphset = glyphset;
        self.uploaded.clear();
        self.color.clear();
        self.skipped.clear();
        Ok(())
    }
}
