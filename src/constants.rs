//! Global constants for quadtext
//!
//! Consolidates buffer sizing, display, and depth constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Vertex Buffer Sizing
// ============================================================================

/// Maximum glyph quads a single cached string buffer can hold
pub const MAX_QUADS_PER_STRING: usize = 1024;

/// Vertices per glyph quad (triangle strip)
pub const VERTICES_PER_QUAD: usize = 4;

/// Fixed vertex capacity of every cached string buffer
pub const STRING_VERTEX_CAPACITY: usize = MAX_QUADS_PER_STRING * VERTICES_PER_QUAD;

// ============================================================================
// Display Constants
// ============================================================================

/// Default target framebuffer width (pixels)
pub const DEFAULT_SCREEN_WIDTH: f32 = 320.0;

/// Default target framebuffer height (pixels)
pub const DEFAULT_SCREEN_HEIGHT: f32 = 240.0;

// ============================================================================
// Rendering Constants
// ============================================================================

/// Fixed depth for every glyph vertex (mid-range, orthographic)
pub const GLYPH_DEPTH: f32 = 0.5;

/// Texture unit the active glyph sheet is bound to
pub const GLYPH_TEXTURE_UNIT: u32 = 0;
