//! Full-viewport textured quad
//!
//! Four interleaved vertices drawn as a triangle fan, sampling a 2×2 sRGB
//! texture through the program the shader builder produces.

use glow::*;
use shader::{ShaderError, ShaderSource, build_program};
use tracing::{debug, info};

use crate::config::{QuadConfig, TextureConfig};

// Shader bodies - the shared header is added by the builder
const VERTEX_SHADER_SOURCE: &str = include_str!("../shaders/quad.vert");
const FRAGMENT_SHADER_SOURCE: &str = include_str!("../shaders/quad.frag");
const UV_FRAGMENT_SHADER_SOURCE: &str = include_str!("../shaders/quad_uv.frag");

/// Position (3) + texture coordinate (2)
pub const FLOATS_PER_VERTEX: usize = 5;
pub const QUAD_VERTEX_COUNT: i32 = 4;

#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; FLOATS_PER_VERTEX * 4] = [
    -1.0, -1.0, 0.0,  0.0, 0.0,
     1.0, -1.0, 0.0,  1.0, 0.0,
     1.0,  1.0, 0.0,  1.0, 1.0,
    -1.0,  1.0, 0.0,  0.0, 1.0,
];

pub const CHECKER_SIZE: i32 = 2;

/// Red, green / blue, yellow
#[rustfmt::skip]
pub const CHECKER_PIXELS: [u8; 12] = [
    255, 0, 0,    0, 255, 0,
    0, 0, 255,    255, 255, 0,
];

const STRIDE: i32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;
const TEX_COORD_OFFSET: i32 = (3 * std::mem::size_of::<f32>()) as i32;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("{0}")]
    Gl(String),
}

/// Vertex + fragment sources for the quad program
pub fn quad_sources(show_uv: bool) -> [ShaderSource<'static>; 2] {
    let fragment = if show_uv {
        UV_FRAGMENT_SHADER_SOURCE
    } else {
        FRAGMENT_SHADER_SOURCE
    };
    [
        ShaderSource::vertex(VERTEX_SHADER_SOURCE),
        ShaderSource::fragment(fragment),
    ]
}

/// GPU resources for the quad
pub struct QuadScene {
    program: Program,
    vao: VertexArray,
    texture: Texture,
    clear_color: [f32; 4],
}

impl QuadScene {
    /// Build the program and upload geometry and texture
    ///
    /// # Safety
    /// Requires an active OpenGL ES 3.0 context
    pub unsafe fn new(gl: &Context, config: &QuadConfig) -> Result<Self, SceneError> {
        unsafe {
            let program = build_program(gl, "quad", &quad_sources(config.render.show_uv))?;

            gl.use_program(Some(program));
            match gl.get_uniform_location(program, "u_tex") {
                Some(loc) => gl.uniform_1_i32(Some(&loc), 0), // Texture unit 0
                None => debug!("u_tex is not active in the quad program"),
            }

            let vao = Self::upload_quad(gl)?;
            let texture = Self::upload_texture(gl, &config.texture)?;

            info!(
                show_uv = config.render.show_uv,
                min_filter = ?config.texture.min_filter,
                mag_filter = ?config.texture.mag_filter,
                "quad scene ready"
            );

            Ok(Self {
                program,
                vao,
                texture,
                clear_color: config.render.clear_color,
            })
        }
    }

    unsafe fn upload_quad(gl: &Context) -> Result<VertexArray, SceneError> {
        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|e| SceneError::Gl(format!("Failed to create VAO: {}", e)))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl
                .create_buffer()
                .map_err(|e| SceneError::Gl(format!("Failed to create VBO: {}", e)))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                STATIC_DRAW,
            );

            // Position attribute (location 0)
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, FLOAT, false, STRIDE, 0);

            // Texture coordinate attribute (location 1)
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, FLOAT, false, STRIDE, TEX_COORD_OFFSET);

            gl.bind_vertex_array(None);
            Ok(vao)
        }
    }

    unsafe fn upload_texture(gl: &Context, config: &TextureConfig) -> Result<Texture, SceneError> {
        unsafe {
            gl.active_texture(TEXTURE0);
            let texture = gl
                .create_texture()
                .map_err(|e| SceneError::Gl(format!("Failed to create texture: {}", e)))?;
            gl.bind_texture(TEXTURE_2D, Some(texture));

            // Rows of 2 RGB texels are 6 bytes, not 4-byte aligned
            gl.pixel_store_i32(UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                TEXTURE_2D,
                0,
                SRGB8 as i32,
                CHECKER_SIZE,
                CHECKER_SIZE,
                0,
                RGB,
                UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(&CHECKER_PIXELS[..])),
            );
            gl.generate_mipmap(TEXTURE_2D);

            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_S, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_T, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, config.min_filter.gl() as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, config.mag_filter.gl() as i32);

            Ok(texture)
        }
    }

    /// Clear and draw the quad over the whole viewport
    ///
    /// # Safety
    /// Requires the context the scene was created with to be current
    pub unsafe fn draw(&self, gl: &Context, width: u32, height: u32) {
        unsafe {
            let [r, g, b, a] = self.clear_color;
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(r, g, b, a);
            gl.clear(COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.active_texture(TEXTURE0);
            gl.bind_texture(TEXTURE_2D, Some(self.texture));
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLE_FAN, 0, QUAD_VERTEX_COUNT);
            gl.bind_vertex_array(None);
        }
    }
}
