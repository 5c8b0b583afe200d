//! Small numerical toolkit shared by every effect: vectors, interpolation, easing and hash noise.
//!
//! Everything here is pure and allocation-free. Noise is integer-hash based so results are
//! identical across platforms for the same seed.

use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Mul;
use std::ops::MulAssign;
use std::ops::Neg;
use std::ops::Sub;
use std::ops::SubAssign;

/// Terminal cells are roughly twice as tall as they are wide.
///
/// Effects that want round shapes multiply row distances by this before measuring.
pub const CELL_ASPECT: f32 = 2.0;

/// Distances below this are treated as zero before normalizing a direction.
pub const MIN_DISTANCE: f32 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or zero when the length is below [`MIN_DISTANCE`].
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len < MIN_DISTANCE || !len.is_finite() {
            return Vec2::ZERO;
        }
        self * len.recip()
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }

    /// Converts a row-major cell delta into an aspect-corrected delta.
    pub fn aspect_corrected(self) -> Vec2 {
        Vec2::new(self.x, self.y * CELL_ASPECT)
    }

    pub fn from_angle(radians: f32) -> Vec2 {
        Vec2::new(radians.cos(), radians.sin())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `v` falls between `a` and `b`, clamped to [0, 1]. Returns 0 for an empty range.
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    let span = b - a;
    if span.abs() < f32::EPSILON {
        return 0.0;
    }
    clamp01((v - a) / span)
}

pub fn remap(v: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    lerp(to.0, to.1, inverse_lerp(from.0, from.1, v))
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = inverse_lerp(edge0, edge1, x);
    t * t * (3.0 - 2.0 * t)
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = clamp01(t);
    -((std::f32::consts::PI * t).cos() - 1.0) / 2.0
}

/// Overshoots slightly past 1 before settling.
pub fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.701_58;
    const C3: f32 = C1 + 1.0;
    let t = clamp01(t);
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

/// Integer hash mapped to [0, 1].
pub fn hash01(seed: u32) -> f32 {
    let mut x = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    x ^= x >> 16;
    x = x.wrapping_mul(2_246_822_519);
    x ^= x >> 13;
    x = x.wrapping_mul(3_266_489_917);
    x ^= x >> 16;
    (x as f32) / (u32::MAX as f32)
}

/// Hash of a lattice coordinate, in [0, 1].
pub fn hash2(x: i32, y: i32, seed: u32) -> f32 {
    let h = (x as u32)
        .wrapping_mul(0x27d4_eb2d)
        .wrapping_add((y as u32).wrapping_mul(0x1656_67b1))
        .wrapping_add(seed.wrapping_mul(0x9e37_79b9));
    hash01(h)
}

/// Bilinear value noise in [0, 1] with a smoothstep fade between lattice points.
pub fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as i32, y0 as i32);

    let a = hash2(ix, iy, seed);
    let b = hash2(ix + 1, iy, seed);
    let c = hash2(ix, iy + 1, seed);
    let d = hash2(ix + 1, iy + 1, seed);

    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);
    lerp(lerp(a, b, ux), lerp(c, d, ux), uy)
}

/// Fractal sum of `octaves` (clamped to 1..=4) layers of [`value_noise`], normalized to [0, 1].
pub fn fbm(x: f32, y: f32, seed: u32, octaves: u8) -> f32 {
    let octaves = octaves.clamp(1, 4);
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut sum = 0.0;
    let mut norm = 0.0;
    for o in 0..octaves {
        sum += value_noise(x * freq, y * freq, seed.wrapping_add(o as u32 * 101)) * amp;
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    clamp01(sum / norm)
}

/// Wraps `v` into `[0, max)`. A non-positive `max` yields 0.
pub fn wrap(v: f32, max: f32) -> f32 {
    if max <= 0.0 || !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(max);
    if r >= max { 0.0 } else { r }
}
