/// Linear RGBA color used for materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel (0.0 to 1.0).
    pub r: f32,
    /// Green channel (0.0 to 1.0).
    pub g: f32,
    /// Blue channel (0.0 to 1.0).
    pub b: f32,
    /// Alpha channel (0.0 to 1.0).
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Construct from explicit channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Decode a packed `0xRRGGBBAA` value.
    pub fn from_rgba_hex(value: u32) -> Self {
        Self {
            r: channel(value >> 24),
            g: channel(value >> 16),
            b: channel(value >> 8),
            a: channel(value),
        }
    }

    /// Decode a packed `0xRRGGBB` value as an opaque color.
    pub fn from_rgb_hex(value: u32) -> Self {
        Self {
            r: channel(value >> 16),
            g: channel(value >> 8),
            b: channel(value),
            a: 1.0,
        }
    }

    /// Channels as an array, in RGBA order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(value: [f32; 4]) -> Self {
        Color::new(value[0], value[1], value[2], value[3])
    }
}

fn channel(bits: u32) -> f32 {
    (bits & 0xFF) as f32 / 255.0
}
