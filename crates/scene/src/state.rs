use vrshell_render::Color;

/// Opaque handle to a texture owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Phong-style material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient color.
    pub ambient: Color,
    /// Diffuse color.
    pub diffuse: Color,
    /// Specular color.
    pub specular: Color,
    /// Specular exponent.
    pub specular_exponent: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            diffuse: Color::WHITE,
            specular: Color::BLACK,
            specular_exponent: 0.0,
        }
    }
}

impl Material {
    /// A flat material using `color` for ambient and diffuse with no specular term.
    pub fn flat(color: Color) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            ..Default::default()
        }
    }
}

/// Render state attached to a geometry node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Surface material.
    pub material: Material,
    /// Whether scene lights affect this geometry.
    pub lights_enabled: bool,
    /// Bound texture, if any.
    pub texture: Option<TextureHandle>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            material: Material::default(),
            lights_enabled: true,
            texture: None,
        }
    }
}
