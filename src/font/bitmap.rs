//! TTF/OTF-backed glyph provider
//!
//! Rasterizes a fixed character set with fontdue at construction time
//! and shelf-packs the bitmaps into 256x256 alpha sheets. A glyph that
//! no longer fits starts the next sheet, so large character sets span
//! several sheets the way a baked console font does.
//!
//! The result is immutable: sheet count, dimensions, and glyph metrics
//! never change after `from_bytes` returns.

use std::collections::HashMap;

use fontdue::{Font, FontSettings};
use log::{debug, info, warn};
use thiserror::Error;

use super::provider::{GlyphPos, GlyphProvider, PixelFormat, Rect, SheetImage};

/// Sheet dimensions (pixels, square)
const SHEET_SIZE: u32 = 256;

/// Padding between packed glyphs to prevent sampling bleed
const GLYPH_PAD: u32 = 2;

/// Errors from building a [`BitmapFont`]
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be parsed
    #[error("failed to parse font: {0}")]
    Parse(String),
    /// The font carries no horizontal line metrics
    #[error("font has no horizontal line metrics")]
    NoLineMetrics,
}

/// Shelf packer over one fixed-size sheet.
///
/// Rows grow left to right; a full row moves the cursor down by the
/// tallest glyph placed in it.
struct ShelfPacker {
    width: u32,
    height: u32,
    pad: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    fn new(width: u32, height: u32, pad: u32) -> Self {
        Self {
            width,
            height,
            pad,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
        }
    }

    /// Reserve a `w` x `h` region, returning its top-left corner.
    ///
    /// Returns `None` when the sheet is full; the region is not
    /// reserved in that case.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w > self.width || h > self.height {
            return None;
        }
        if self.cursor_x + w > self.width {
            self.cursor_y += self.row_height + self.pad;
            self.cursor_x = 0;
            self.row_height = 0;
        }
        if self.cursor_y + h > self.height {
            return None;
        }
        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.pad;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }
}

/// One baked alpha sheet
struct Sheet {
    data: Vec<u8>,
}

/// Per-glyph record: sheet placement plus natural-size metrics.
///
/// Vertex offsets are in pixels at scale 1.0, top-left origin,
/// y growing downward.
struct GlyphRec {
    sheet: usize,
    tex: Rect,
    vtx: Rect,
    advance: f32,
}

/// Fixed-charset bitmap font backed by fontdue rasterization
pub struct BitmapFont {
    sheets: Vec<Sheet>,
    glyphs: Vec<GlyphRec>,
    index: HashMap<char, u16>,
    line_feed: f32,
}

impl BitmapFont {
    /// Rasterize `charset` from a TTF/OTF at `size_px` and bake the
    /// sheet set.
    ///
    /// Characters the font has no glyph for are skipped (they will
    /// report as not renderable). Duplicate charset entries are
    /// harmless.
    pub fn from_bytes(
        font_data: &[u8],
        size_px: f32,
        charset: impl IntoIterator<Item = char>,
    ) -> Result<Self, FontError> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        let metrics = font
            .horizontal_line_metrics(size_px)
            .ok_or(FontError::NoLineMetrics)?;
        let ascent = metrics.ascent;
        let line_feed = metrics.new_line_size;

        let mut sheets: Vec<Sheet> = Vec::new();
        let mut glyphs: Vec<GlyphRec> = Vec::new();
        let mut index: HashMap<char, u16> = HashMap::new();

        let mut packer = ShelfPacker::new(SHEET_SIZE, SHEET_SIZE, GLYPH_PAD);
        let mut data = vec![0u8; (SHEET_SIZE * SHEET_SIZE) as usize];

        for ch in charset {
            if index.contains_key(&ch) {
                continue;
            }
            if font.lookup_glyph_index(ch) == 0 {
                debug!("No glyph for U+{:04X}, skipping", ch as u32);
                continue;
            }

            let (m, bitmap) = font.rasterize(ch, size_px);
            let bw = m.width as u32;
            let bh = m.height as u32;

            let (x0, y0) = match packer.place(bw, bh) {
                Some(pos) => pos,
                None => {
                    if bw > SHEET_SIZE || bh > SHEET_SIZE {
                        warn!("Glyph U+{:04X} exceeds sheet size, skipping", ch as u32);
                        continue;
                    }
                    // Sheet full: bake it and start the next one
                    sheets.push(Sheet { data });
                    data = vec![0u8; (SHEET_SIZE * SHEET_SIZE) as usize];
                    packer = ShelfPacker::new(SHEET_SIZE, SHEET_SIZE, GLYPH_PAD);
                    match packer.place(bw, bh) {
                        Some(pos) => pos,
                        None => {
                            warn!("Glyph U+{:04X} does not fit a fresh sheet", ch as u32);
                            continue;
                        }
                    }
                }
            };

            // Copy the coverage bitmap into the sheet
            for y in 0..bh {
                let src = (y * bw) as usize;
                let dst = ((y0 + y) * SHEET_SIZE + x0) as usize;
                data[dst..dst + bw as usize].copy_from_slice(&bitmap[src..src + bw as usize]);
            }

            let s = SHEET_SIZE as f32;
            // fontdue's ymin is measured up from the baseline; convert
            // to top-left origin with y growing downward
            let top = ascent - (m.ymin as f32 + m.height as f32);
            let rec = GlyphRec {
                sheet: sheets.len(),
                tex: Rect {
                    left: x0 as f32 / s,
                    right: (x0 + bw) as f32 / s,
                    top: y0 as f32 / s,
                    bottom: (y0 + bh) as f32 / s,
                },
                vtx: Rect {
                    left: m.xmin as f32,
                    right: m.xmin as f32 + m.width as f32,
                    top,
                    bottom: top + m.height as f32,
                },
                advance: m.advance_width,
            };

            index.insert(ch, glyphs.len() as u16);
            glyphs.push(rec);
        }

        sheets.push(Sheet { data });

        info!(
            "Bitmap font baked: {} glyphs across {} sheet(s) at {:.1}px",
            glyphs.len(),
            sheets.len(),
            size_px
        );

        Ok(Self {
            sheets,
            glyphs,
            index,
            line_feed,
        })
    }

    /// The printable ASCII range, the usual charset for HUD text
    pub fn ascii() -> impl Iterator<Item = char> {
        (0x20u8..=0x7E).map(|c| c as char)
    }
}

impl GlyphProvider for BitmapFont {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_image(&self, index: usize) -> SheetImage<'_> {
        SheetImage {
            data: &self.sheets[index].data,
            format: PixelFormat::A8,
            width: SHEET_SIZE,
            height: SHEET_SIZE,
        }
    }

    fn glyph_index(&self, code_point: char) -> Option<u16> {
        self.index.get(&code_point).copied()
    }

    fn glyph_pos(&self, glyph_index: u16, size: f32) -> GlyphPos {
        let rec = &self.glyphs[glyph_index as usize];
        GlyphPos {
            vtx: Rect {
                left: rec.vtx.left * size,
                right: rec.vtx.right * size,
                top: rec.vtx.top * size,
                bottom: rec.vtx.bottom * size,
            },
            tex: rec.tex,
            sheet_index: rec.sheet,
            x_advance: rec.advance * size,
        }
    }

    fn line_feed(&self) -> f32 {
        self.line_feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_packer_rows() {
        let mut p = ShelfPacker::new(100, 100, 2);
        assert_eq!(p.place(40, 10), Some((0, 0)));
        assert_eq!(p.place(40, 20), Some((42, 0)));
        // Doesn't fit the row: wraps below the tallest glyph so far
        assert_eq!(p.place(40, 10), Some((0, 22)));
    }

    #[test]
    fn test_shelf_packer_full() {
        let mut p = ShelfPacker::new(32, 32, 0);
        assert_eq!(p.place(32, 32), Some((0, 0)));
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn test_shelf_packer_oversized() {
        let mut p = ShelfPacker::new(32, 32, 0);
        assert_eq!(p.place(64, 8), None);
        // Rejection must not consume space
        assert_eq!(p.place(32, 32), Some((0, 0)));
    }

    #[test]
    fn test_zero_sized_place() {
        let mut p = ShelfPacker::new(16, 16, 1);
        // Empty bitmaps (space) still get a valid, zero-area slot
        assert_eq!(p.place(0, 0), Some((0, 0)));
    }
}
