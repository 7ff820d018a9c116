//! Per-code-point quad layout
//!
//! Maps one code point to the quad the batcher emits: vertex offsets
//! and texture coordinates scaled by the draw size, the sheet the
//! glyph lives on, and the advance to the next pen position.

use crate::font::{GlyphProvider, Rect};

/// One glyph's quad, ready for vertex emission
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    /// Vertex offsets relative to the pen position
    pub vtx: Rect,
    /// Texture coordinates within the glyph's sheet
    pub tex: Rect,
    /// Sheet the glyph's bitmap lives on
    pub sheet: usize,
    /// Horizontal advance after drawing this glyph
    pub x_advance: f32,
}

/// Lay out one code point at the given size.
///
/// Returns `None` for code points with no visible glyph (control
/// characters other than newline, unmapped code points); the caller
/// skips those without emitting geometry. Newline never reaches this
/// function: the batcher handles it as a cursor operation.
pub fn layout<P: GlyphProvider + ?Sized>(
    provider: &P,
    code_point: char,
    size: f32,
) -> Option<GlyphQuad> {
    let index = provider.glyph_index(code_point)?;
    let pos = provider.glyph_pos(index, size);
    Some(GlyphQuad {
        vtx: pos.vtx,
        tex: pos.tex,
        sheet: pos.sheet_index,
        x_advance: pos.x_advance,
    })
}
