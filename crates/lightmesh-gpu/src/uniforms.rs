//! Uniform buffer layout shared with `gradient.wgsl`

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lightmesh_core::MAX_LIGHTS;
use lightmesh_core::frame::FrameSnapshot;

/// One light, packed as three `vec4<f32>`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// position.xy, radius, intensity
    pub geometry: [f32; 4],
    /// rgb, softness
    pub color: [f32; 4],
    /// stretch, angle, shape id, shape size
    pub shape: [f32; 4],
}

/// Frame uniforms: globals followed by a fixed array of lights
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub blend_power: f32,
    pub contrast: f32,
    pub bloom: f32,
    pub grain: f32,
    pub chromatic_aberration: f32,
    pub vignette: f32,
    pub scanline_frequency: f32,
    pub scanline_intensity: f32,
    pub warp_amount: f32,
    pub light_count: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl FrameUniforms {
    /// Pack a snapshot for an output of the given size
    pub fn from_snapshot(snapshot: &FrameSnapshot, resolution: Vec2) -> Self {
        let g = &snapshot.globals;
        let mut lights = [GpuLight::default(); MAX_LIGHTS];
        let mut count = 0;

        for (slot, light) in lights.iter_mut().zip(snapshot.lights.lights()) {
            let s = &light.source;
            *slot = GpuLight {
                geometry: [s.position.x, s.position.y, s.radius, s.intensity],
                color: [light.color.x, light.color.y, light.color.z, s.softness],
                shape: [s.stretch, s.angle, s.shape.id() as f32, s.shape_size],
            };
            count += 1;
        }

        Self {
            resolution: resolution.to_array(),
            time: snapshot.time,
            blend_power: g.blend_power,
            contrast: g.contrast,
            bloom: g.bloom,
            grain: g.grain,
            chromatic_aberration: g.chromatic_aberration,
            vignette: g.vignette,
            scanline_frequency: g.scanline_frequency,
            scanline_intensity: g.scanline_intensity,
            warp_amount: g.warp_amount,
            light_count: count,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
            lights,
        }
    }
}
