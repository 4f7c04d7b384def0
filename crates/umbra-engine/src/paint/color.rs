/// Linear RGBA color, straight (non-premultiplied) alpha.
///
/// Shading math runs in linear space; hex literals are treated as sRGB and
/// decoded on construction. The sRGB surface re-encodes on store, so a hex
/// color shown unlit comes out as authored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::linear(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::linear(0.0, 0.0, 0.0);

    /// Opaque color from linear components.
    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` sRGB literal.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_srgb_u8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
            0xff,
        )
    }

    /// Color from straight sRGB bytes. Alpha is linear already and kept as is.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// RGB scaled by `k`; used to fold light intensity into the color.
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        Self { r: self.r * k, g: self.g * k, b: self.b * k, a: self.a }
    }

    #[inline]
    pub fn rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Premultiplied RGBA, as expected by the overlay blend state.
    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn hex_extremes_map_to_unit_range() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn hex_channels_are_decoded_from_srgb() {
        // 0x40 = 64/255 ≈ 0.251 sRGB ≈ 0.0513 linear.
        let c = Color::from_hex(0x404040);
        assert!(close(c.r, 0.051_269));
        assert!(close(c.g, c.r) && close(c.b, c.r));

        let c = Color::from_hex(0x6699ff);
        assert!(close(c.r, 0.132_868));
        assert!(close(c.g, 0.318_547));
        assert!(close(c.b, 1.0));
    }

    #[test]
    fn premultiplied_scales_rgb_by_alpha() {
        let c = Color::linear(1.0, 0.5, 0.0).with_alpha(0.5);
        assert_eq!(c.premultiplied(), [0.5, 0.25, 0.0, 0.5]);
    }
}
