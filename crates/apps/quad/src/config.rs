use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::runner::DebugMode;

/// Configuration loaded from config.toml
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct QuadConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub texture: TextureConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "webgl".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    /// Output interpolated texture coordinates instead of the texture sample
    pub show_uv: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.1, 1.0],
            show_uv: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TextureConfig {
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
}

/// Texture minification filter
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MinFilter {
    Nearest,
    Linear,
    #[default]
    LinearMipmapLinear,
}

impl MinFilter {
    pub const fn gl(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
            Self::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}

/// Texture magnification filter
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MagFilter {
    Nearest,
    #[default]
    Linear,
}

impl MagFilter {
    pub const fn gl(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl QuadConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<QuadConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    QuadConfig::from_toml_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Textured quad on OpenGL ES 3.0
#[derive(Parser, Debug, Clone)]
#[command(name = "quad")]
#[command(about = "Renders a textured quad through the shader program builder")]
pub struct Args {
    /// Load configuration from a TOML file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,

    /// Show texture coordinates instead of the texture
    #[arg(long)]
    pub show_uv: bool,

    /// Run N frames, save the last one and exit
    #[arg(long, value_name = "FRAMES")]
    pub debug: Option<u64>,

    /// Where debug mode saves the last frame
    #[arg(long, value_name = "PATH", default_value = "output/frame_last.png")]
    pub output: PathBuf,
}

impl Args {
    /// Config file (or defaults when none was given) with flags applied on top
    pub fn load_config(&self) -> Result<QuadConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => QuadConfig::default(),
        };
        Ok(self.apply_to(config))
    }

    /// Apply command line overrides to a configuration
    pub fn apply_to(&self, mut config: QuadConfig) -> QuadConfig {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(ref title) = self.title {
            config.window.title = title.clone();
        }
        if self.show_uv {
            config.render.show_uv = true;
        }
        config
    }

    pub fn debug_mode(&self) -> Option<DebugMode> {
        self.debug.map(|frames| DebugMode {
            frames,
            output_path: self.output.clone(),
        })
    }
}
