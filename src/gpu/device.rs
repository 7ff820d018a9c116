//! GPU device interface
//!
//! Models the fixed-function slice of the target hardware the text
//! path needs: texture binding, a combiner-style texture environment,
//! vertex attribute/buffer state, and immediate triangle-strip draws.
//! Vertex buffers handed out by a device must be DMA-coherent and stay
//! valid while submitted draws are outstanding.

use anyhow::Result;

use crate::font::SheetImage;

/// One text vertex: position plus texture coordinate.
///
/// Quads are drawn as 4-vertex triangle strips in the order
/// bottom-left, bottom-right, top-left, top-right.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

/// Handle to a device texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Handle to a device vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferId(pub u32);

/// One float vertex attribute in the active layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttr {
    /// Shader input location
    pub location: u32,
    /// Number of f32 components
    pub components: u8,
}

/// Texture environment input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSource {
    /// Sampled glyph texture on unit 0
    Texture0,
    /// Environment constant color
    Constant,
}

/// Texture environment combine function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineFunc {
    Replace,
    Modulate,
}

/// Texture environment stage configuration.
///
/// Controls how the sampled glyph coverage combines with the constant
/// color into the output fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexEnv {
    /// RGB channel source
    pub rgb_source: EnvSource,
    /// Alpha channel sources (combined by `alpha_combine`)
    pub alpha_sources: (EnvSource, EnvSource),
    /// RGB combine function
    pub rgb_combine: CombineFunc,
    /// Alpha combine function
    pub alpha_combine: CombineFunc,
    /// Environment constant color (packed RGBA)
    pub constant: u32,
}

impl TexEnv {
    /// The text tint environment: RGB replaced by the constant color,
    /// alpha = glyph coverage modulated by the constant alpha.
    pub fn text_tint(color: u32) -> Self {
        Self {
            rgb_source: EnvSource::Constant,
            alpha_sources: (EnvSource::Texture0, EnvSource::Constant),
            rgb_combine: CombineFunc::Replace,
            alpha_combine: CombineFunc::Modulate,
            constant: color,
        }
    }
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
}

/// Texture sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
}

impl Sampling {
    /// Linear filtering with edge clamp on both axes, the mode every
    /// glyph sheet uses
    pub const fn linear_clamp() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
        }
    }
}

/// Device operations the text renderer drives.
///
/// Single threaded; calls take effect immediately in submission order.
pub trait Gpu {
    /// Upload a sheet image into a new texture
    fn create_texture(&mut self, image: &SheetImage<'_>, sampling: Sampling) -> Result<TextureId>;

    /// Release a texture
    fn delete_texture(&mut self, texture: TextureId);

    /// Bind a texture to a sampler unit
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    /// Configure the texture environment stage
    fn set_tex_env(&mut self, env: &TexEnv);

    /// Upload the vertex-stage 4x4 transform (column-major)
    fn set_projection(&mut self, matrix: &[f32; 16]);

    /// Configure the active vertex attribute layout
    fn configure_attrs(&mut self, attrs: &[VertexAttr]);

    /// Allocate a DMA-coherent vertex buffer holding `capacity` vertices
    fn create_vertex_buffer(&mut self, capacity: usize) -> Result<VertexBufferId>;

    /// Release a vertex buffer
    fn delete_vertex_buffer(&mut self, buffer: VertexBufferId);

    /// Bind a vertex buffer as the active vertex source
    fn bind_vertex_buffer(&mut self, buffer: VertexBufferId);

    /// Write vertices into a buffer starting at vertex slot `first`
    fn write_vertices(&mut self, buffer: VertexBufferId, first: usize, vertices: &[Vertex]);

    /// Draw `count` vertices from the bound buffer as a triangle
    /// strip, starting at vertex slot `first`
    fn draw_strip(&mut self, first: usize, count: usize);
}

/// Generate orthographic projection matrix (top-left origin)
///
/// Map pixel coordinates (0,0)-(width,height)
/// to NDC (-1,-1)-(1,1)
pub fn ortho_projection(width: f32, height: f32) -> [f32; 16] {
    let l = 0.0_f32;
    let r = width;
    let t = 0.0_f32; // top
    let b = height; // bottom
    let n = -1.0_f32;
    let f = 1.0_f32;

    // Column-major (OpenGL convention)
    [
        2.0 / (r - l),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (t - b),
        0.0,
        0.0,
        0.0,
        0.0,
        -2.0 / (f - n),
        0.0,
        -(r + l) / (r - l),
        -(t + b) / (t - b),
        -(f + n) / (f - n),
        1.0,
    ]
}
