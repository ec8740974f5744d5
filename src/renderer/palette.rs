//! Tier palette and color blending

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    fn from_vec3(v: Vec3) -> Self {
        let v = v.round().clamp(Vec3::ZERO, Vec3::splat(255.0));
        Self::new(v.x as u8, v.y as u8, v.z as u8)
    }

    /// Linear blend toward `other`; `t` is clamped to 0..=1
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Self::from_vec3(self.to_vec3().lerp(other.to_vec3(), t.clamp(0.0, 1.0)))
    }
}

pub const UNCRACKED: Rgb = Rgb::new(180, 0, 0);
pub const EDGE: Rgb = Rgb::WHITE;
pub const HEADER_BG: Rgb = Rgb::new(18, 18, 30);

/// Color of cracked cells
pub fn cracked_color(tier: u8) -> Rgb {
    match tier {
        2 => Rgb::new(200, 120, 0),
        3.. => Rgb::new(0, 180, 220),
        _ => Rgb::WHITE,
    }
}

/// Header label and accent bar color
pub fn label_color(tier: u8) -> Rgb {
    match tier {
        2 => Rgb::new(255, 180, 80),
        3.. => Rgb::new(80, 200, 255),
        _ => Rgb::WHITE,
    }
}
