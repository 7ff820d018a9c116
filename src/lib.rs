//! quadtext - GPU glyph-sheet text renderer for handheld console framebuffers
//!
//! Renders UTF-8 strings as textured quads against a set of pre-rendered
//! glyph texture sheets, batching texture binds by sheet and caching the
//! per-string vertex buffer across draws.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │           TextRenderer::draw_text        │
//! ├──────────────────────────────────────────┤
//! │  StringCache (vertex buffer per string)  │
//! │                    ↓                     │
//! │  Glyph layout (code point → sheet quad)  │
//! │                    ↓                     │
//! │  SheetSet (texture bind on sheet change) │
//! │                    ↓                     │
//! │  Gpu (attrs, tex env, strip draw calls)  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The font subsystem ([`font::GlyphProvider`]) and the GPU
//! ([`gpu::Gpu`]) sit behind traits; `quadtext` ships a fontdue-backed
//! provider (`ttf` feature) and a glow-backed device (`gl` feature).
//!
//! Rendering is single threaded and immediate mode: every draw call
//! submits its GPU commands before returning. One draw call is issued
//! per glyph; only texture binds are coalesced across sheet runs.

pub mod config;
pub mod constants;
pub mod font;
pub mod gpu;
pub mod text;
pub mod utils;

pub use config::Config;
pub use font::{GlyphPos, GlyphProvider, PixelFormat, Rect, SheetImage};
pub use gpu::{Gpu, TexEnv, Vertex, VertexAttr};
pub use text::renderer::TextRenderer;
