//! Hash and value noise for domain warp and film grain
//!
//! Both are evaluated in `f32` with the same constants the WGSL shader uses,
//! so CPU and GPU frames stay close.

use glam::Vec2;
use noise::NoiseFn;

/// Pseudo-random value in `0..1` derived from a 2D coordinate
pub fn hash(p: Vec2) -> f32 {
    let v = p.dot(Vec2::new(127.1, 311.7)).sin() * 43758.545;
    v - v.floor()
}

/// Lattice value noise with smoothstep interpolation, in `0..1`
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (3.0 - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::X);
    let c = hash(i + Vec2::Y);
    let d = hash(i + Vec2::ONE);

    let top = a + (b - a) * f.x;
    let bottom = c + (d - c) * f.x;
    top + (bottom - top) * f.y
}

/// [`value_noise`] as a [`NoiseFn`], so it can stand in wherever a
/// `noise` generator is accepted
#[derive(Debug, Clone, Copy, Default)]
pub struct HashValueNoise;

impl NoiseFn<f64, 2> for HashValueNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        f64::from(value_noise(Vec2::new(point[0] as f32, point[1] as f32)))
    }
}

/// Sample any 2D noise generator at a `Vec2`
pub fn sample2<N: NoiseFn<f64, 2> + ?Sized>(noise: &N, p: Vec2) -> f32 {
    noise.get([f64::from(p.x), f64::from(p.y)]) as f32
}
