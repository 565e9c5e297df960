#[cfg(feature = "egui")]
use egui::Color32;

/// An opaque 8-bit RGB color, opacity is carried separately by the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Default stroke color offered when choosing a style.
    pub const DEFAULT_STROKE: Color = Color::BLACK;
    /// Default fill color offered when choosing a style.
    pub const DEFAULT_FILL: Color = Color::GRAY;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
        }
    }

    #[cfg(feature = "egui")]
    pub fn to_color32(&self, opacity: f64) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, alpha)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from(value: [u8; 3]) -> Self {
        Color::new(value[0], value[1], value[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(value: Color) -> Self {
        [value.r, value.g, value.b]
    }
}

/// Deterministic pastel color for the given index, used to tell shapes apart when debugging.
pub fn generate_pastel_color(index: u64) -> Color {
    // golden-ratio hue stepping keeps neighbouring indices visually distinct
    let hue = (index as f64 * 0.618_033_988_749_895).fract();
    hsv_to_rgb(hue, 0.35, 0.95)
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Color {
    let sector = (hue * 6.0).floor();
    let f = hue * 6.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - f * saturation);
    let t = value * (1.0 - (1.0 - f) * saturation);

    let (r, g, b) = match sector as u8 % 6 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    let to_u8 = |component: f64| (component * 255.0).round() as u8;
    Color::new(to_u8(r), to_u8(g), to_u8(b))
}
