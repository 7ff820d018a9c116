//! GPU abstraction
//!
//! Handles:
//! - The [`Gpu`] trait the renderer drives: textures, texture
//!   environment, vertex buffers, triangle-strip draws
//! - glow-backed OpenGL ES device (`gl` feature)

pub mod device;

#[cfg(feature = "gl")]
pub mod gl;
#[cfg(feature = "gl")]
pub mod shader;

pub use device::{
    ortho_projection, CombineFunc, EnvSource, Filter, Gpu, Sampling, TexEnv, TextureId, Vertex,
    VertexAttr, VertexBufferId, Wrap,
};

#[cfg(feature = "gl")]
#[allow(unused_imports)]
pub use gl::GlDevice;
