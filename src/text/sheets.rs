//! Glyph sheet registry
//!
//! Uploads every provider sheet into a GPU texture once at init and
//! hands out texture handles by sheet index. The provider keeps
//! ownership of the pixel buffers; only the textures are released at
//! teardown.

use anyhow::{Context, Result};
use log::info;

use crate::font::GlyphProvider;
use crate::gpu::{Gpu, Sampling, TextureId};

/// The set of GPU textures backing the glyph atlas.
///
/// Sheet count and per-sheet dimensions are fixed at creation.
pub struct SheetSet {
    textures: Vec<TextureId>,
}

impl SheetSet {
    /// Upload every provider sheet with linear filtering and
    /// edge-clamp wrapping.
    pub fn new<G: Gpu, P: GlyphProvider + ?Sized>(gpu: &mut G, provider: &P) -> Result<Self> {
        let count = provider.sheet_count();
        let mut textures = Vec::with_capacity(count);
        for i in 0..count {
            let image = provider.sheet_image(i);
            let tex = gpu
                .create_texture(&image, Sampling::linear_clamp())
                .with_context(|| format!("Failed to upload glyph sheet {}", i))?;
            textures.push(tex);
        }

        info!("Glyph sheet set ready: {} sheet(s)", count);
        Ok(Self { textures })
    }

    /// Number of sheets
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture for a sheet index.
    ///
    /// Sheet indices always come from the glyph provider; an
    /// out-of-range index is a caller bug and panics.
    pub fn texture(&self, index: usize) -> TextureId {
        self.textures[index]
    }

    /// Release the textures (not the provider's pixel buffers)
    pub fn destroy<G: Gpu>(self, gpu: &mut G) {
        for tex in self.textures {
            gpu.delete_texture(tex);
        }
    }
}
