// Textured quad demo
// Builds its program through the shader crate and redraws it every frame

pub mod config;
pub mod runner;
pub mod scene;

// Re-export commonly used types
pub use config::{Args, ConfigError, MagFilter, MinFilter, QuadConfig, load_config};
pub use runner::{DebugMode, QuadApp};
pub use scene::{QuadScene, SceneError, quad_sources};
