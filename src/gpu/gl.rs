//! glow-backed GPU device
//!
//! Implements [`Gpu`] on OpenGL ES 3.0 via glow. The fixed-function
//! texture environment is emulated by the text shader: the supported
//! configuration is the text tint (RGB from the constant color, alpha
//! = coverage x constant alpha); anything else is clamped to it with
//! a warning.

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::{info, warn};

use crate::font::{PixelFormat, SheetImage};
use crate::gpu::device::{
    CombineFunc, EnvSource, Filter, Gpu, Sampling, TexEnv, TextureId, Vertex, VertexAttr,
    VertexBufferId, Wrap,
};
use crate::gpu::shader::TextShader;
use crate::utils::color::unpack_rgba;

/// OpenGL ES device
pub struct GlDevice {
    gl: glow::Context,
    shader: TextShader,
    vao: glow::VertexArray,
    textures: Vec<Option<glow::Texture>>,
    buffers: Vec<Option<glow::Buffer>>,
    /// Attribute layout to apply when a buffer is bound
    attrs: Vec<VertexAttr>,
    attrs_dirty: bool,
    projection: [f32; 16],
    env_color: [f32; 4],
}

impl GlDevice {
    /// Wrap an OpenGL ES context
    pub fn new(gl: glow::Context) -> Result<Self> {
        let shader = TextShader::new(&gl)?;
        let vao = unsafe {
            gl.create_vertex_array()
                .map_err(|e| anyhow!("Failed to create VAO: {}", e))?
        };

        info!("GL device initialized");

        Ok(Self {
            gl,
            shader,
            vao,
            textures: Vec::new(),
            buffers: Vec::new(),
            attrs: Vec::new(),
            attrs_dirty: false,
            projection: [0.0; 16],
            env_color: [1.0; 4],
        })
    }

    /// Access the underlying context (shared with other render passes)
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Release every device object still alive
    pub fn destroy(self) {
        unsafe {
            for tex in self.textures.into_iter().flatten() {
                self.gl.delete_texture(tex);
            }
            for buf in self.buffers.into_iter().flatten() {
                self.gl.delete_buffer(buf);
            }
            self.gl.delete_vertex_array(self.vao);
        }
        self.shader.destroy(&self.gl);
    }

    fn texture(&self, id: TextureId) -> glow::Texture {
        self.textures[id.0 as usize].expect("texture already deleted")
    }

    fn buffer(&self, id: VertexBufferId) -> glow::Buffer {
        self.buffers[id.0 as usize].expect("vertex buffer already deleted")
    }

    fn apply_attrs(&mut self) {
        let stride: i32 = self.attrs.iter().map(|a| a.components as i32 * 4).sum();
        let mut offset = 0i32;
        unsafe {
            for attr in &self.attrs {
                self.gl.enable_vertex_attrib_array(attr.location);
                self.gl.vertex_attrib_pointer_f32(
                    attr.location,
                    attr.components as i32,
                    glow::FLOAT,
                    false,
                    stride,
                    offset,
                );
                offset += attr.components as i32 * 4;
            }
        }
        self.attrs_dirty = false;
    }
}

impl Gpu for GlDevice {
    fn create_texture(&mut self, image: &SheetImage<'_>, sampling: Sampling) -> Result<TextureId> {
        let tex = unsafe {
            let tex = self
                .gl
                .create_texture()
                .map_err(|e| anyhow!("Failed to create texture: {}", e))?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(tex));

            let (internal, format) = match image.format {
                PixelFormat::A8 => (glow::R8, glow::RED),
                PixelFormat::Rgba8 => (glow::RGBA8, glow::RGBA),
            };
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal as i32,
                image.width as i32,
                image.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(image.data),
            );

            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                gl_filter(sampling.min_filter) as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                gl_filter(sampling.mag_filter) as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                gl_wrap(sampling.wrap_s) as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                gl_wrap(sampling.wrap_t) as i32,
            );

            // The shader samples coverage from .r; route RGBA sheets'
            // alpha there
            if image.format == PixelFormat::Rgba8 {
                self.gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_SWIZZLE_R,
                    glow::ALPHA as i32,
                );
            }

            self.gl.bind_texture(glow::TEXTURE_2D, None);
            tex
        };

        self.textures.push(Some(tex));
        Ok(TextureId(self.textures.len() as u32 - 1))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(tex) = self.textures[texture.0 as usize].take() {
            unsafe {
                self.gl.delete_texture(tex);
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        let tex = self.texture(texture);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(tex));
        }
    }

    fn set_tex_env(&mut self, env: &TexEnv) {
        let supported = env.rgb_source == EnvSource::Constant
            && env.rgb_combine == CombineFunc::Replace
            && env.alpha_sources == (EnvSource::Texture0, EnvSource::Constant)
            && env.alpha_combine == CombineFunc::Modulate;
        if !supported {
            warn!("Unsupported texture environment, using text tint");
        }
        self.env_color = unpack_rgba(env.constant);
    }

    fn set_projection(&mut self, matrix: &[f32; 16]) {
        self.projection = *matrix;
    }

    fn configure_attrs(&mut self, attrs: &[VertexAttr]) {
        self.attrs = attrs.to_vec();
        self.attrs_dirty = true;
    }

    fn create_vertex_buffer(&mut self, capacity: usize) -> Result<VertexBufferId> {
        let buf = unsafe {
            let buf = self
                .gl
                .create_buffer()
                .map_err(|e| anyhow!("Failed to create vertex buffer: {}", e))?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buf));
            self.gl.buffer_data_size(
                glow::ARRAY_BUFFER,
                (capacity * std::mem::size_of::<Vertex>()) as i32,
                glow::DYNAMIC_DRAW,
            );
            buf
        };

        self.buffers.push(Some(buf));
        Ok(VertexBufferId(self.buffers.len() as u32 - 1))
    }

    fn delete_vertex_buffer(&mut self, buffer: VertexBufferId) {
        if let Some(buf) = self.buffers[buffer.0 as usize].take() {
            unsafe {
                self.gl.delete_buffer(buf);
            }
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: VertexBufferId) {
        let buf = self.buffer(buffer);
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buf));
        }
        if self.attrs_dirty {
            self.apply_attrs();
        }
    }

    fn write_vertices(&mut self, buffer: VertexBufferId, first: usize, vertices: &[Vertex]) {
        let buf = self.buffer(buffer);
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buf));
            self.gl.buffer_sub_data_u8_slice(
                glow::ARRAY_BUFFER,
                (first * std::mem::size_of::<Vertex>()) as i32,
                vertex_bytes(vertices),
            );
        }
    }

    fn draw_strip(&mut self, first: usize, count: usize) {
        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.shader.bind(&self.gl);
            self.shader.set_projection(&self.gl, &self.projection);
            self.shader.set_env_color(&self.gl, &self.env_color);
            self.shader.set_atlas_unit(&self.gl, 0);

            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_arrays(glow::TRIANGLE_STRIP, first as i32, count as i32);

            self.gl.disable(glow::BLEND);
        }
    }
}

fn gl_filter(filter: Filter) -> u32 {
    match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
    }
}

fn gl_wrap(wrap: Wrap) -> u32 {
    match wrap {
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        Wrap::Repeat => glow::REPEAT,
    }
}

/// &[Vertex] -> &[u8] conversion (minimal implementation without bytemuck)
fn vertex_bytes(slice: &[Vertex]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}
