//! Named colors.
//!
//! Values are X11 color names, sRGB-encoded in `0..=1`. Convert with
//! [`Palette::to_linear`] before handing them to a shader.

use glam::Vec3;

const fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Immutable table of named colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub black: Vec3,
    pub white: Vec3,
    pub grey: Vec3,
    pub red: Vec3,
    pub green: Vec3,
    pub blue: Vec3,
    pub yellow: Vec3,
    pub orange: Vec3,
    pub bisque: Vec3,
    pub bisque4: Vec3,
    pub steel_blue: Vec3,
}

impl Palette {
    pub const BLACK: Vec3 = rgb8(0, 0, 0);
    pub const WHITE: Vec3 = rgb8(255, 255, 255);
    pub const GREY: Vec3 = rgb8(190, 190, 190);
    pub const RED: Vec3 = rgb8(255, 0, 0);
    pub const GREEN: Vec3 = rgb8(0, 255, 0);
    pub const BLUE: Vec3 = rgb8(0, 0, 255);
    pub const YELLOW: Vec3 = rgb8(255, 255, 0);
    pub const ORANGE: Vec3 = rgb8(255, 165, 0);
    pub const BISQUE: Vec3 = rgb8(255, 228, 196);
    pub const BISQUE4: Vec3 = rgb8(139, 125, 107);
    pub const STEEL_BLUE: Vec3 = rgb8(70, 130, 180);

    /// Converts an sRGB-encoded color to linear RGB.
    pub fn to_linear(color: Vec3) -> Vec3 {
        fn channel(c: f32) -> f32 {
            if c <= 0.040_45 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Vec3::new(channel(color.x), channel(color.y), channel(color.z))
    }

    /// Looks a color up by its snake_case name.
    pub fn get(&self, name: &str) -> Option<Vec3> {
        let color = match name {
            "black" => self.black,
            "white" => self.white,
            "grey" | "gray" => self.grey,
            "red" => self.red,
            "green" => self.green,
            "blue" => self.blue,
            "yellow" => self.yellow,
            "orange" => self.orange,
            "bisque" => self.bisque,
            "bisque4" => self.bisque4,
            "steel_blue" => self.steel_blue,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: Self::BLACK,
            white: Self::WHITE,
            grey: Self::GREY,
            red: Self::RED,
            green: Self::GREEN,
            blue: Self::BLUE,
            yellow: Self::YELLOW,
            orange: Self::ORANGE,
            bisque: Self::BISQUE,
            bisque4: Self::BISQUE4,
            steel_blue: Self::STEEL_BLUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.get("orange"), Some(Palette::ORANGE));
        assert_eq!(palette.get("gray"), palette.get("grey"));
        assert_eq!(palette.get("chartreuse"), None);
    }

    #[test]
    fn test_to_linear() {
        assert_eq!(Palette::to_linear(Palette::BLACK), Vec3::ZERO);
        assert!((Palette::to_linear(Palette::WHITE) - Vec3::ONE).length() < 1e-6);
        let orange = Palette::to_linear(Palette::ORANGE);
        assert!((orange.y - 0.3763).abs() < 1e-3);
        assert!(orange.y < Palette::ORANGE.y);
    }

    #[test]
    fn test_bisque4_value() {
        let c = Palette::BISQUE4;
        assert!((c.x - 139.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 107.0 / 255.0).abs() < 1e-6);
    }
}
