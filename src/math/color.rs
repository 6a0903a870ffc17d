/// A RGBA `Color`. Each color component is a floating point value
/// with a range from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub const fn black() -> Self {
        Color::new(0.0, 0.0, 0.0, 1.0)
    }

    pub const fn white() -> Self {
        Color::new(1.0, 1.0, 1.0, 1.0)
    }

    pub const fn transparent() -> Self {
        Color::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Creates `Color` from a u32 encoded `RGBA`.
    pub fn from_rgba_u32(encoded: u32) -> Self {
        let c = |shift: u32| ((encoded >> shift) & 0xFF) as f32 / 255.0;
        Color::new(c(24), c(16), c(8), c(0))
    }

    /// Clamps every component into [0, 1].
    pub fn clip(self) -> Self {
        let f = |v: f32| v.max(0.0).min(1.0);
        Color::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }
}

impl Into<[f32; 4]> for Color {
    fn into(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(v: [f32; 4]) -> Self {
        Color::new(v[0], v[1], v[2], v[3])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encoding() {
        let c = Color::from_rgba_u32(0xFF00_00FF);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).clip(), Color::new(1.0, 0.0, 0.5, 1.0));
    }
}
