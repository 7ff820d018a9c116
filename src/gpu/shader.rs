//! Shader management
//!
//! GLSL ES 3.00 shader compilation and linking for the glow device.

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::info;

/// Text vertex shader (GLSL ES 3.00)
///
/// Input:
///   a_pos: Vertex position (pixels, z = depth)
///   a_uv:  Texture coordinates
/// Uniform:
///   u_projection: Orthographic projection matrix
const TEXT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_pos;
layout(location = 1) in vec2 a_uv;

uniform mat4 u_projection;

out vec2 v_uv;

void main() {
    gl_Position = u_projection * vec4(a_pos, 1.0);
    v_uv = a_uv;
}
"#;

/// Text fragment shader
///
/// Implements the fixed-function text environment: RGB is replaced by
/// the constant color, alpha is the glyph coverage modulated by the
/// constant alpha.
const TEXT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_atlas;
uniform vec4 u_env_color;

out vec4 frag_color;

void main() {
    float coverage = texture(u_atlas, v_uv).r;
    frag_color = vec4(u_env_color.rgb, coverage * u_env_color.a);
}
"#;

/// Compiled text shader program
pub struct TextShader {
    program: glow::Program,
    pub u_projection: glow::UniformLocation,
    pub u_atlas: glow::UniformLocation,
    pub u_env_color: glow::UniformLocation,
}

impl TextShader {
    /// Compile and link the text shader
    pub fn new(gl: &glow::Context) -> Result<Self> {
        let program = compile_program(gl, TEXT_VERTEX_SHADER, TEXT_FRAGMENT_SHADER)?;

        let u_projection = unsafe {
            gl.get_uniform_location(program, "u_projection")
                .ok_or_else(|| anyhow!("u_projection uniform not found"))?
        };
        let u_atlas = unsafe {
            gl.get_uniform_location(program, "u_atlas")
                .ok_or_else(|| anyhow!("u_atlas uniform not found"))?
        };
        let u_env_color = unsafe {
            gl.get_uniform_location(program, "u_env_color")
                .ok_or_else(|| anyhow!("u_env_color uniform not found"))?
        };

        info!("Text shader compiled");
        Ok(Self {
            program,
            u_projection,
            u_atlas,
            u_env_color,
        })
    }

    /// Activate the shader
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    /// Set orthographic projection matrix
    pub fn set_projection(&self, gl: &glow::Context, matrix: &[f32; 16]) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(&self.u_projection), false, matrix);
        }
    }

    /// Set atlas texture unit
    pub fn set_atlas_unit(&self, gl: &glow::Context, unit: i32) {
        unsafe {
            gl.uniform_1_i32(Some(&self.u_atlas), unit);
        }
    }

    /// Set the environment constant color
    pub fn set_env_color(&self, gl: &glow::Context, color: &[f32; 4]) {
        unsafe {
            gl.uniform_4_f32_slice(Some(&self.u_env_color), color);
        }
    }

    /// Release resources
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

/// Compile shader and link program
fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program> {
    unsafe {
        let vs = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
        let fs = compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src)?;

        let program = gl
            .create_program()
            .map_err(|e| anyhow!("Failed to create program: {}", e))?;

        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(anyhow!("Shader link failed: {}", log));
        }

        // Shader objects no longer needed after linking
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        Ok(program)
    }
}

/// Compile individual shader
fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|e| anyhow!("Failed to create shader: {}", e))?;

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            let type_name = match shader_type {
                glow::VERTEX_SHADER => "vertex",
                glow::FRAGMENT_SHADER => "fragment",
                _ => "unknown",
            };
            return Err(anyhow!("{} shader compile failed: {}", type_name, log));
        }

        Ok(shader)
    }
}
