// Simple color struct, created from an unsigned 32 representing RRGGBBAA
#[derive(Copy, Clone)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = (num >> 0) as u8;

        Color { r, g, b, a }
    }

    /// CSS rgba() string with the alpha channel scaled by `opacity` in
    /// [0, 1], on top of the color's own base alpha.
    pub fn to_css_with_opacity(&self, opacity: f64) -> String {
        let alpha = (self.a as f64 / 255.0) * opacity.max(0.0).min(1.0);
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha)
    }
}

/// Site theme flag; the only input the particle field takes from the rest
/// of the page. Picks the glyph color and its base opacity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn particle_color(self) -> Color {
        match self {
            // Pale lavender over the dark background.
            Theme::Dark => Color::from_u32(0xd8d4f0cc),
            // Deep indigo over the light background.
            Theme::Light => Color::from_u32(0x3b3370aa),
        }
    }
}
