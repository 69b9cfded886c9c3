//! Rendering configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Far plane of the orthographic orbit view
    pub ortho_far_plane: f32,

    /// Edge length of every layer in the scene texture array (pixels)
    pub texture_size: u32,

    /// Edge length of each skybox face (pixels)
    pub skybox_size: u32,

    /// Directory searched for texture and skybox images
    pub assets_dir: PathBuf,

    /// Length of the axis gizmo
    pub axes_length: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 600,
            window_height: 600,
            ortho_far_plane: 500.0,
            texture_size: 256,
            skybox_size: 512,
            assets_dir: PathBuf::from("assets"),
            axes_length: 2.0,
        }
    }
}

impl RenderConfig {
    /// Width over height; a zero height (minimised window) yields 1
    pub fn aspect_ratio(&self) -> f32 {
        if self.window_height == 0 {
            1.0
        } else {
            self.window_width as f32 / self.window_height as f32
        }
    }
}
