//! Shader stages and stage sources

use std::fmt;

use crate::header::with_header;
use crate::listing::SourceListing;

/// One programmable stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    /// Needs an OpenGL ES 3.1 context
    Compute,
}

impl ShaderStage {
    /// Short label used in diagnostics
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertex => "VERT",
            Self::Fragment => "FRAG",
            Self::Compute => "COMP",
        }
    }

    /// GL shader type enum for this stage
    pub const fn gl_type(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
            Self::Compute => glow::COMPUTE_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stage body paired with the stage it compiles as.
///
/// `code` is the body only; the shared header is added at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource<'a> {
    pub code: &'a str,
    pub stage: ShaderStage,
}

impl<'a> ShaderSource<'a> {
    pub const fn new(code: &'a str, stage: ShaderStage) -> Self {
        Self { code, stage }
    }

    pub const fn vertex(code: &'a str) -> Self {
        Self::new(code, ShaderStage::Vertex)
    }

    pub const fn fragment(code: &'a str) -> Self {
        Self::new(code, ShaderStage::Fragment)
    }

    /// Full text submitted to the compiler
    pub fn full_source(&self) -> String {
        with_header(self.code)
    }

    /// Numbered listing of header + body
    pub fn listing(&self) -> SourceListing<'a> {
        SourceListing::with_header(self.code)
    }
}

/// Pair parallel slices of stage bodies and stage kinds.
///
/// # Panics
/// If the slices differ in length. Nothing is compiled in that case.
pub fn sources_from_parts<'a>(codes: &[&'a str], stages: &[ShaderStage]) -> Vec<ShaderSource<'a>> {
    assert_eq!(
        codes.len(),
        stages.len(),
        "got {} shader sources for {} stage kinds",
        codes.len(),
        stages.len()
    );

    codes
        .iter()
        .zip(stages)
        .map(|(&code, &stage)| ShaderSource::new(code, stage))
        .collect()
}
