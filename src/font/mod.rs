//! Glyph providers
//!
//! Handles:
//! - The [`GlyphProvider`] trait the renderer consumes: sheet images,
//!   code point to glyph index mapping, per-glyph quad metrics
//! - TTF/OTF-backed provider (fontdue) that rasterizes a fixed
//!   character set into alpha sheets at construction (`ttf` feature)

pub mod provider;

#[cfg(feature = "ttf")]
pub mod bitmap;

pub use provider::{GlyphPos, GlyphProvider, PixelFormat, Rect, SheetImage};

#[cfg(feature = "ttf")]
#[allow(unused_imports)]
pub use bitmap::{BitmapFont, FontError};
