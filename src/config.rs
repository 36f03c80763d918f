use anyhow::Result;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use vrshell_render::Color;

pub const DEFAULT_CONFIG_PATH: &str = "config/vrshell.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Beam and cursor color as `0xRRGGBB`.
    pub pointer_color: u32,
    /// Model file for each model index, handed to the model loader.
    pub controller_models: Vec<String>,
    /// Downward tilt of the beam relative to the controller, in degrees.
    pub beam_pitch_degrees: f32,
    pub window: WindowConfig,
    /// Frame the content window with resize bars and handles.
    pub resizer_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in meters.
    pub width: f32,
    /// Height in meters.
    pub height: f32,
    /// Distance in front of the origin, along -Z.
    pub distance: f32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            pointer_color: 0xFFFFFF,
            controller_models: vec![
                "controller_left.obj".to_string(),
                "controller_right.obj".to_string(),
            ],
            beam_pitch_degrees: 0.0,
            window: WindowConfig::default(),
            resizer_enabled: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 2.25,
            distance: 2.5,
            texture_width: 1920,
            texture_height: 1080,
        }
    }
}

impl ShellConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ShellConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ShellConfig::default()
                }
            },
            Err(err) => {
                if path == Path::new(DEFAULT_CONFIG_PATH)
                    && err.kind() == std::io::ErrorKind::NotFound
                {
                    warn!("Shell config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                ShellConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn pointer_color(&self) -> Color {
        Color::from_rgb_hex(self.pointer_color)
    }

    /// Beam pose relative to the controller; identity when the pitch is zero.
    pub fn beam_transform(&self) -> Mat4 {
        if self.beam_pitch_degrees == 0.0 {
            Mat4::IDENTITY
        } else {
            Mat4::from_rotation_x(-self.beam_pitch_degrees.to_radians())
        }
    }
}
