//! CPU-side frame assembly and XRender composition.
//!
//! A frame is built from two `cols × rows` pixel grids (cell backgrounds
//! and foreground colors) that XRender upscales to the window, plus glyph
//! runs composited per row through one shared glyph set. The final buffer
//! is copied to the window in one blit.

pub mod glyphs;

use xcb::{render, x, Xid};

use ruxterm_core::cell::StyleFlags;
use ruxterm_core::grid::{CursorShape, Grid, PrivateModes};
use ruxterm_core::index::Line;
use ruxterm_core::{Palette, Rgb};

use crate::error::{Error, Result};
use crate::font::FontCache;
use crate::window::X11Window;

use self::glyphs::{pack, GlyphStore};

/// Largest glyph count in one composite element (protocol header limit).
const MAX_RUN: usize = 252;

pub struct Renderer {
    argb32: render::Pictformat,
    rgb24: render::Pictformat,

    /// Window-sized, window-depth composition target.
    back: Surface,
    /// Window-sized ARGB buffer the glyph runs render into.
    glyph_buf: Surface,
    /// Window-sized ARGB buffer holding the upscaled foreground colors,
    /// sampled by the glyph composite.
    fg_colors: Surface,
    /// Cell-resolution background and foreground color grids.
    small_bg: Surface,
    small_fg: Surface,

    /// GC for uploading into depth-32 pixmaps.
    gc32: x::Gcontext,
    store: GlyphStore,

    width: u16,
    height: u16,
    cols: usize,
    rows: usize,
    bg_pixels: Vec<u32>,
    fg_pixels: Vec<u32>,
    glyph_cmds: Vec<u8>,
}

struct Surface {
    pixmap: x::Pixmap,
    picture: render::Picture,
}

impl Renderer {
    pub fn new(window: &X11Window, cols: usize, rows: usize) -> Result<Self> {
        let conn = window.conn();
        let (argb32, rgb24) = find_formats(conn)?;
        let store = GlyphStore::new(conn, argb32)?;
        let (width, height) = window.size();

        let back = alloc_surface(conn, window, 24, rgb24, width, height)?;
        let glyph_buf = alloc_surface(conn, window, 32, argb32, width, height)?;
        let fg_colors = alloc_surface(conn, window, 32, argb32, width, height)?;
        let small_bg = alloc_surface(conn, window, 32, argb32, cols as u16, rows as u16)?;
        let small_fg = alloc_surface(conn, window, 32, argb32, cols as u16, rows as u16)?;

        let gc32: x::Gcontext = conn.generate_id();
        conn.send_and_check_request(&x::CreateGc {
            cid: gc32,
            drawable: x::Drawable::Pixmap(small_bg.pixmap),
            value_list: &[],
        })?;

        Ok(Self {
            argb32,
            rgb24,
            back,
            glyph_buf,
            fg_colors,
            small_bg,
            small_fg,
            gc32,
            store,
            width,
            height,
            cols,
            rows,
            bg_pixels: vec![0; cols * rows],
            fg_pixels: vec![0; cols * rows],
            glyph_cmds: Vec::new(),
        })
    }

    /// Recreate every size-dependent surface after a window resize or a
    /// cell-geometry change.
    pub fn resize(&mut self, window: &X11Window, cols: usize, rows: usize) -> Result<()> {
        let conn = window.conn();
        let (width, height) = window.size();

        for surface in [&self.back, &self.glyph_buf, &self.fg_colors, &self.small_bg, &self.small_fg] {
            surface.free(conn);
        }

        self.back = alloc_surface(conn, window, 24, self.rgb24, width, height)?;
        self.glyph_buf = alloc_surface(conn, window, 32, self.argb32, width, height)?;
        self.fg_colors = alloc_surface(conn, window, 32, self.argb32, width, height)?;
        self.small_bg = alloc_surface(conn, window, 32, self.argb32, cols as u16, rows as u16)?;
        self.small_fg = alloc_surface(conn, window, 32, self.argb32, cols as u16, rows as u16)?;

        self.width = width;
        self.height = height;
        self.cols = cols;
        self.rows = rows;
        self.bg_pixels.resize(cols * rows, 0);
        self.fg_pixels.resize(cols * rows, 0);
        Ok(())
    }

    /// Flush all uploaded glyphs (font size changed).
    pub fn flush_glyphs(&mut self, window: &X11Window) -> Result<()> {
        self.store.reset(window.conn())
    }

    /// Compose one frame of the grid onto the window.
    pub fn draw(
        &mut self,
        window: &X11Window,
        grid: &Grid,
        palette: &Palette,
        font: &mut FontCache,
        cursor_shape: CursorShape,
    ) -> Result<()> {
        let conn = window.conn();
        let metrics = font.metrics();
        let (cell_w, cell_h) = (metrics.cell_width, metrics.cell_height);
        let cols = self.cols.min(grid.cols());
        let rows = self.rows.min(grid.rows());
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        // 1. Upload any glyphs the grid needs that the set lacks yet.
        for row in 0..rows {
            for cell in &grid.row(Line(row as i32))[..cols] {
                if glyph_candidate(cell.ch) && !cell.is_wide_spacer() {
                    self.store.ensure(conn, font, cell_w, cell.ch, cell.style.font_style())?;
                }
            }
        }

        // 2. Centred padding of the cell grid inside the window.
        let grid_w = (cols * cell_w) as i32;
        let grid_h = (rows * cell_h) as i32;
        let pad_x = (i32::from(self.width) - grid_w).max(0) / 2;
        let pad_y = (i32::from(self.height) - grid_h).max(0) / 2;

        // 3. Resolve per-cell colors into the two small grids.
        let default_bg = palette.background();
        let mut prev_bg = default_bg.as_argb();
        let mut prev_fg = palette.foreground().as_argb();
        for row in 0..rows {
            let cells = grid.row(Line(row as i32));
            for (col, cell) in cells[..cols].iter().enumerate() {
                let (bg, fg) = if cell.flags.contains(ruxterm_core::CellFlags::INHERIT_STYLE) {
                    (prev_bg, prev_fg)
                } else {
                    let mut bg = palette.resolve_bg(cell.style.bg);
                    let mut fg = palette.resolve_fg(cell.style.fg);
                    if cell.style.flags.contains(StyleFlags::INVERSE) {
                        std::mem::swap(&mut bg, &mut fg);
                    }
                    let mut fg = fg.as_argb();
                    // XRender color-modulates non-color glyphs only; color
                    // bitmaps keep their own pixels under a white source.
                    if self.store.is_color(pack(cell.style.font_style(), cell.ch)) {
                        fg = Rgb::new(0xff, 0xff, 0xff).as_argb();
                    }
                    (bg.as_argb(), fg)
                };
                prev_bg = bg;
                prev_fg = fg;
                self.bg_pixels[row * cols + col] = bg;
                self.fg_pixels[row * cols + col] = fg;
            }
        }

        // 4. Cursor: block shapes swap the cell's two pixels; thin shapes
        // stage a rectangle drawn after compositing.
        let mut cursor_rect: Option<x::Rectangle> = None;
        if grid.modes().contains(PrivateModes::CURSOR_VISIBLE) {
            let cur_row = grid.cursor().line().min(rows - 1);
            let cur_col = grid.cursor().col().min(cols - 1);
            let idx = cur_row * cols + cur_col;
            match cursor_shape {
                CursorShape::Block => {
                    let bg = self.bg_pixels[idx];
                    self.bg_pixels[idx] = self.fg_pixels[idx];
                    self.fg_pixels[idx] = bg;
                }
                CursorShape::Bar => {
                    cursor_rect = Some(x::Rectangle {
                        x: (pad_x + (cur_col * cell_w) as i32) as i16,
                        y: (pad_y + (cur_row * cell_h) as i32) as i16,
                        width: (cell_w / 8).max(1) as u16,
                        height: cell_h as u16,
                    });
                }
                CursorShape::Underline => {
                    let thickness = (cell_h / 10).max(1);
                    cursor_rect = Some(x::Rectangle {
                        x: (pad_x + (cur_col * cell_w) as i32) as i16,
                        y: (pad_y + ((cur_row + 1) * cell_h - thickness) as i32) as i16,
                        width: cell_w as u16,
                        height: thickness as u16,
                    });
                }
            }
        }

        // 5a. Clear the frame to the default background.
        fill_rect(
            conn,
            self.back.picture,
            render::PictOp::Src,
            color16(default_bg, 0xffff),
            0,
            0,
            self.width,
            self.height,
        );

        // 5b. Upload both small grids and upscale them.
        self.upload_small(conn, &self.small_bg, &self.bg_pixels, cols, rows)?;
        self.upload_small(conn, &self.small_fg, &self.fg_pixels, cols, rows)?;
        let transform = scale_transform(cell_w, cell_h);
        for surface in [&self.small_bg, &self.small_fg] {
            conn.send_request(&render::SetPictureTransform {
                picture: surface.picture,
                transform,
            });
            conn.send_request(&render::SetPictureFilter {
                picture: surface.picture,
                filter: b"nearest",
                values: &[],
            });
        }
        composite(
            conn,
            render::PictOp::Src,
            self.small_bg.picture,
            self.back.picture,
            (0, 0),
            (pad_x, pad_y),
            (grid_w as u16, grid_h as u16),
        );
        composite(
            conn,
            render::PictOp::Src,
            self.small_fg.picture,
            self.fg_colors.picture,
            (0, 0),
            (pad_x, pad_y),
            (grid_w as u16, grid_h as u16),
        );

        // 5c. Render the glyph runs into a transparent buffer, sampling
        // the upscaled foreground colors, then lay them over the frame.
        fill_rect(
            conn,
            self.glyph_buf.picture,
            render::PictOp::Src,
            render::Color { red: 0, green: 0, blue: 0, alpha: 0 },
            0,
            0,
            self.width,
            self.height,
        );
        if let Some((first_x, first_y)) = self.build_glyph_runs(grid, cols, rows, cell_w, cell_h, pad_x, pad_y, metrics.baseline)
        {
            conn.send_request(&render::CompositeGlyphs32 {
                op: render::PictOp::Over,
                src: self.fg_colors.picture,
                dst: self.glyph_buf.picture,
                mask_format: self.argb32,
                glyphset: self.store.glyphset(),
                src_x: first_x as i16,
                src_y: first_y as i16,
                glyphcmds: &self.glyph_cmds,
            });
        }
        composite(
            conn,
            render::PictOp::Over,
            self.glyph_buf.picture,
            self.back.picture,
            (pad_x, pad_y),
            (pad_x, pad_y),
            (grid_w as u16, grid_h as u16),
        );

        // 5d. Thin cursor shapes paint over the finished text.
        if let Some(rect) = cursor_rect {
            conn.send_request(&render::FillRectangles {
                op: render::PictOp::Over,
                dst: self.back.picture,
                color: color16(palette.cursor_color(), 0xffff),
                rects: &[rect],
            });
        }

        // 5e. Blit to the window.
        conn.send_request(&x::CopyArea {
            src_drawable: x::Drawable::Pixmap(self.back.pixmap),
            dst_drawable: x::Drawable::Window(window.window()),
            gc: window.gc(),
            src_x: 0,
            src_y: 0,
            dst_x: 0,
            dst_y: 0,
            width: self.width,
            height: self.height,
        });
        conn.flush()?;
        Ok(())
    }

    /// Upload a small color grid into its pixmap.
    fn upload_small(
        &self,
        conn: &xcb::Connection,
        surface: &Surface,
        pixels: &[u32],
        cols: usize,
        rows: usize,
    ) -> Result<()> {
        let mut data = Vec::with_capacity(cols * rows * 4);
        for &px in &pixels[..cols * rows] {
            data.extend_from_slice(&px.to_ne_bytes());
        }
        conn.send_and_check_request(&x::PutImage {
            format: x::ImageFormat::ZPixmap,
            drawable: x::Drawable::Pixmap(surface.pixmap),
            gc: self.gc32,
            width: cols as u16,
            height: rows as u16,
            dst_x: 0,
            dst_y: 0,
            left_pad: 0,
            depth: 32,
            data: &data,
        })?;
        Ok(())
    }

    /// Encode the frame's glyph runs. Each row emits one element per
    /// contiguous run of drawable glyphs; after a row the pen returns by
    /// `{-run·cell_width, +cell_height}` through the next element's
    /// relative offset. Returns the first glyph origin, or `None` for an
    /// all-blank frame.
    fn build_glyph_runs(
        &mut self,
        grid: &Grid,
        cols: usize,
        rows: usize,
        cell_w: usize,
        cell_h: usize,
        pad_x: i32,
        pad_y: i32,
        baseline: i32,
    ) -> Option<(i32, i32)> {
        self.glyph_cmds.clear();
        let mut pen = (0i32, 0i32);
        let mut first = None;
        let mut run: Vec<u32> = Vec::with_capacity(cols);

        for row in 0..rows {
            let origin_y = pad_y + (row * cell_h) as i32 + baseline;
            let cells = grid.row(Line(row as i32));

            let mut col = 0;
            while col < cols {
                run.clear();
                let start = col;
                while col < cols {
                    let cell = &cells[col];
                    if !glyph_candidate(cell.ch) || cell.is_wide_spacer() {
                        break;
                    }
                    let id = pack(cell.style.font_style(), cell.ch);
                    if !self.store.drawable(id) {
                        break;
                    }
                    run.push(id);
                    col += 1;
                }
                if run.is_empty() {
                    col += 1;
                    continue;
                }

                let mut origin_x = pad_x + (start * cell_w) as i32;
                first.get_or_insert((origin_x, origin_y));
                for chunk in run.chunks(MAX_RUN) {
                    let dx = origin_x - pen.0;
                    let dy = origin_y - pen.1;
                    self.glyph_cmds.push(chunk.len() as u8);
                    self.glyph_cmds.extend_from_slice(&[0, 0, 0]);
                    self.glyph_cmds.extend_from_slice(&(dx as i16).to_ne_bytes());
                    self.glyph_cmds.extend_from_slice(&(dy as i16).to_ne_bytes());
                    for &id in chunk {
                        self.glyph_cmds.extend_from_slice(&id.to_ne_bytes());
                    }
                    origin_x += (chunk.len() * cell_w) as i32;
                    pen = (origin_x, origin_y);
                }
            }
        }

        first
    }
}

/// Whether a codepoint produces a glyph run entry at all.
fn glyph_candidate(ch: char) -> bool {
    ch != '\0' && ch != ' '
}

/// Allocate a pixmap of the given depth with a picture over it.
fn alloc_surface(
    conn: &xcb::Connection,
    window: &X11Window,
    depth: u8,
    format: render::Pictformat,
    width: u16,
    height: u16,
) -> Result<Surface> {
    let pixmap: x::Pixmap = conn.generate_id();
    conn.send_and_check_request(&x::CreatePixmap {
        depth,
        pid: pixmap,
        drawable: x::Drawable::Window(window.window()),
        width: width.max(1),
        height: height.max(1),
    })?;

    let picture: render::Picture = conn.generate_id();
    conn.send_and_check_request(&render::CreatePicture {
        pid: picture,
        drawable: x::Drawable::Pixmap(pixmap),
        format,
        value_list: &[],
    })?;

    Ok(Surface { pixmap, picture })
}

impl Surface {
    fn free(&self, conn: &xcb::Connection) {
        conn.send_request(&render::FreePicture { picture: self.picture });
        conn.send_request(&x::FreePixmap { pixmap: self.pixmap });
    }
}

/// The transform that upscales a cell-resolution picture by the cell size
/// (XRender transforms map destination samples back into the source).
fn scale_transform(cell_w: usize, cell_h: usize) -> render::Transform {
    const ONE: i32 = 1 << 16;
    render::Transform {
        matrix11: ONE / cell_w.max(1) as i32,
        matrix12: 0,
        matrix13: 0,
        matrix21: 0,
        matrix22: ONE / cell_h.max(1) as i32,
        matrix23: 0,
        matrix31: 0,
        matrix32: 0,
        matrix33: ONE,
    }
}

fn color16(rgb: Rgb, alpha: u16) -> render::Color {
    render::Color {
        red: u16::from(rgb.r) << 8 | u16::from(rgb.r),
        green: u16::from(rgb.g) << 8 | u16::from(rgb.g),
        blue: u16::from(rgb.b) << 8 | u16::from(rgb.b),
        alpha,
    }
}

fn fill_rect(
    conn: &xcb::Connection,
    dst: render::Picture,
    op: render::PictOp,
    color: render::Color,
    x: i16,
    y: i16,
    width: u16,
    height: u16,
) {
    conn.send_request(&render::FillRectangles {
        op,
        dst,
        color,
        rects: &[x::Rectangle { x, y, width, height }],
    });
}

fn composite(
    conn: &xcb::Connection,
    op: render::PictOp,
    src: render::Picture,
    dst: render::Picture,
    (src_x, src_y): (i32, i32),
    (dst_x, dst_y): (i32, i32),
    (width, height): (u16, u16),
) {
    conn.send_request(&render::Composite {
        op,
        src,
        mask: render::Picture::none(),
        dst,
        src_x: src_x as i16,
        src_y: src_y as i16,
        mask_x: 0,
        mask_y: 0,
        dst_x: dst_x as i16,
        dst_y: dst_y as i16,
        width,
        height,
    });
}

/// Locate the standard ARGB32 and RGB24 picture formats.
fn find_formats(conn: &xcb::Connection) -> Result<(render::Pictformat, render::Pictformat)> {
    let cookie = conn.send_request(&render::QueryPictFormats {});
    let reply = conn.wait_for_reply(cookie)?;

    let mut argb32 = None;
    let mut rgb24 = None;
    for pf in reply.formats() {
        if pf.r#type != render::PictType::Direct {
            continue;
        }
        let d = &pf.direct;
        let rgb_shifts = d.red_shift == 16 && d.green_shift == 8 && d.blue_shift == 0;
        if pf.depth == 32 && rgb_shifts && d.alpha_shift == 24 && d.alpha_mask == 0xff {
            argb32.get_or_insert(pf.id);
        }
        if pf.depth == 24 && rgb_shifts && d.alpha_mask == 0 {
            rgb24.get_or_insert(pf.id);
        }
    }

    match (argb32, rgb24) {
        (Some(argb32), Some(rgb24)) => Ok((argb32, rgb24)),
        _ => Err(Error::Render("server lacks ARGB32/RGB24 picture formats".into())),
    }
}
