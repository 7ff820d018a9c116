//! Draw batcher
//!
//! Walks a decoded string and submits one textured quad per glyph,
//! rebinding the sheet texture and texture environment only when the
//! sheet changes. Immediate mode: every draw call's GPU commands are
//! submitted before `draw_text` returns.

use anyhow::Result;
use log::trace;

use crate::config::Config;
use crate::constants::{GLYPH_DEPTH, GLYPH_TEXTURE_UNIT, STRING_VERTEX_CAPACITY, VERTICES_PER_QUAD};
use crate::font::GlyphProvider;
use crate::gpu::{ortho_projection, Gpu, TexEnv, Vertex, VertexAttr};
use crate::text::cache::StringCache;
use crate::text::layout::layout;
use crate::text::sheets::SheetSet;

/// Vertex attribute layout: position (3 floats), texcoord (2 floats)
const TEXT_ATTRS: [VertexAttr; 2] = [
    VertexAttr {
        location: 0,
        components: 3,
    },
    VertexAttr {
        location: 1,
        components: 2,
    },
];

/// Text rendering context: glyph sheets, string cache, projection.
///
/// Owns the font provider for its lifetime. Single threaded; every
/// operation takes `&mut self`, so concurrent use requires external
/// synchronization by construction.
pub struct TextRenderer<P> {
    provider: P,
    sheets: SheetSet,
    cache: StringCache,
    projection: [f32; 16],
}

impl<P: GlyphProvider> TextRenderer<P> {
    /// Initialize the subsystem: upload the provider's glyph sheets
    /// and set up the screen-space projection.
    pub fn new<G: Gpu>(gpu: &mut G, provider: P, config: &Config) -> Result<Self> {
        let sheets = SheetSet::new(gpu, &provider)?;
        Ok(Self {
            provider,
            sheets,
            cache: StringCache::new(config.cache.limit),
            projection: ortho_projection(config.display.width, config.display.height),
        })
    }

    /// Draw a string at `(x, y)` (top-left of the first line).
    ///
    /// `size` scales the font's natural glyph size; `color` is packed
    /// RGBA applied through the texture environment, so cached
    /// geometry is color independent.
    pub fn draw_str<G: Gpu>(
        &mut self,
        gpu: &mut G,
        x: f32,
        y: f32,
        size: f32,
        color: u32,
        text: &str,
    ) -> Result<()> {
        self.draw_text(gpu, x, y, size, color, text.as_bytes())
    }

    /// Draw a byte string at `(x, y)`.
    ///
    /// Decoding stops silently at the first invalid UTF-8 sequence or
    /// NUL byte; whatever was emitted up to that point is drawn. A
    /// string longer than the buffer capacity (1024 glyphs) is
    /// silently cut at the capacity. The only error is unrecoverable
    /// vertex buffer allocation failure.
    pub fn draw_text<G: Gpu>(
        &mut self,
        gpu: &mut G,
        x: f32,
        y: f32,
        size: f32,
        color: u32,
        text: &[u8],
    ) -> Result<()> {
        gpu.set_projection(&self.projection);

        let buffer = match self.cache.acquire(gpu, text)? {
            Some(buffer) => buffer,
            None => return Ok(()),
        };

        gpu.configure_attrs(&TEXT_ATTRS);
        gpu.bind_vertex_buffer(buffer);

        // Write cursor resets every draw: a cache hit reuses storage,
        // never stale vertex contents
        let mut pos = 0usize;
        let mut cur_x = x;
        let mut cur_y = y;
        let mut last_sheet: Option<usize> = None;

        for ch in decode_prefix(text).chars() {
            if ch == '\0' {
                break;
            }
            if ch == '\n' {
                cur_x = x;
                cur_y += size * self.provider.line_feed();
                continue;
            }

            let quad = match layout(&self.provider, ch, size) {
                Some(quad) => quad,
                None => {
                    trace!("No glyph for U+{:04X}, skipping", ch as u32);
                    continue;
                }
            };

            // Rebind only on sheet boundaries, not per glyph
            if last_sheet != Some(quad.sheet) {
                last_sheet = Some(quad.sheet);
                gpu.bind_texture(GLYPH_TEXTURE_UNIT, self.sheets.texture(quad.sheet));
                gpu.set_tex_env(&TexEnv::text_tint(color));
            }

            if pos + VERTICES_PER_QUAD > STRING_VERTEX_CAPACITY {
                break; // remaining glyphs are silently dropped
            }

            // Quad corners in triangle-strip order
            let vertices = [
                vertex(cur_x + quad.vtx.left, cur_y + quad.vtx.bottom, quad.tex.left, quad.tex.bottom),
                vertex(cur_x + quad.vtx.right, cur_y + quad.vtx.bottom, quad.tex.right, quad.tex.bottom),
                vertex(cur_x + quad.vtx.left, cur_y + quad.vtx.top, quad.tex.left, quad.tex.top),
                vertex(cur_x + quad.vtx.right, cur_y + quad.vtx.top, quad.tex.right, quad.tex.top),
            ];
            gpu.write_vertices(buffer, pos, &vertices);
            gpu.draw_strip(pos, VERTICES_PER_QUAD);

            pos += VERTICES_PER_QUAD;
            cur_x += quad.x_advance;
        }

        Ok(())
    }

    /// The string cache (instrumentation: entry and allocation counts)
    pub fn cache(&self) -> &StringCache {
        &self.cache
    }

    /// The glyph sheet set
    pub fn sheets(&self) -> &SheetSet {
        &self.sheets
    }

    /// The font provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Tear down the subsystem, releasing sheet textures and every
    /// cached vertex buffer.
    pub fn destroy<G: Gpu>(self, gpu: &mut G) {
        self.cache.destroy(gpu);
        self.sheets.destroy(gpu);
    }
}

fn vertex(vx: f32, vy: f32, tx: f32, ty: f32) -> Vertex {
    Vertex {
        position: [vx, vy, GLYPH_DEPTH],
        texcoord: [tx, ty],
    }
}

/// Longest valid UTF-8 prefix of `bytes`.
///
/// Rendering stops at the first invalid sequence; bytes before it
/// still draw.
fn decode_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prefix_valid() {
        assert_eq!(decode_prefix(b"hello"), "hello");
        assert_eq!(decode_prefix("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_decode_prefix_stops_at_invalid() {
        assert_eq!(decode_prefix(b"ok\xFFrest"), "ok");
        assert_eq!(decode_prefix(b"\xFF"), "");
    }

    #[test]
    fn test_decode_prefix_truncated_sequence() {
        // First two bytes of a three-byte sequence
        assert_eq!(decode_prefix(b"ab\xE3\x81"), "ab");
    }
}
