//! Shader program builder for OpenGL ES 3.0 / WebGL 2.0
//!
//! Every stage body is compiled behind a shared header ([`SHADER_HEADER`]),
//! the compiled stages are linked into one program and then thrown away.
//! Compile and link failures come back as [`ShaderError`] values that carry
//! the driver log together with a line-numbered listing of exactly what was
//! compiled, so the line numbers in the log can be read straight off the
//! listing.
//!
//! ```ignore
//! use shader::{ShaderSource, build_program};
//!
//! let sources = [
//!     ShaderSource::vertex(include_str!("quad.vert")),
//!     ShaderSource::fragment(include_str!("quad.frag")),
//! ];
//! let program = unsafe { build_program(&gl, "quad", &sources) }
//!     .unwrap_or_else(|err| shader::abort_with_report(&err));
//! ```

mod builder;
mod context;
mod error;
mod header;
mod listing;
mod stage;

#[cfg(test)]
mod mock;

pub use builder::{build_program, compile_stage, link_program};
pub use context::ShaderContext;
pub use error::{Result, ShaderError, StageListing, abort_with_report};
pub use header::{SHADER_HEADER, header_line_count, with_header};
pub use listing::{SourceListing, annotate_with_header};
pub use stage::{ShaderSource, ShaderStage, sources_from_parts};
