//! Text rendering core
//!
//! Handles:
//! - Glyph sheet registry (one GPU texture per provider sheet)
//! - Per-code-point quad layout
//! - String vertex cache (one fixed-capacity buffer per distinct string)
//! - The draw batcher walking decoded text and submitting quads

pub mod cache;
pub mod layout;
pub mod renderer;
pub mod sheets;

pub use cache::StringCache;
pub use layout::{layout, GlyphQuad};
pub use renderer::TextRenderer;
pub use sheets::SheetSet;
