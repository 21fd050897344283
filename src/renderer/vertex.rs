//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Colored vertex in normalized device coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Scale the RGB channels, keeping alpha
pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [
        (color[0] * factor).min(1.0),
        (color[1] * factor).min(1.0),
        (color[2] * factor).min(1.0),
        color[3],
    ]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    pub const SKY_TOP: [f32; 4] = hex(0x1e1b4b, 1.0);
    pub const SKY_BOTTOM: [f32; 4] = hex(0x312e81, 1.0);
    pub const MOON: [f32; 4] = hex(0xfef3c7, 0.9);
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const CASTLE: [f32; 4] = hex(0x0f172a, 0.85);
    pub const GROUND: [f32; 4] = hex(0x166534, 1.0);
    pub const GRID_LINE: [f32; 4] = hex(0x14532d, 1.0);

    pub const ARCHER_TUNIC: [f32; 4] = hex(0x15803d, 1.0);
    pub const ARCHER_SKIN: [f32; 4] = hex(0xfcd34d, 1.0);
    pub const ARCHER_HOOD: [f32; 4] = hex(0x14532d, 1.0);
    pub const BOW: [f32; 4] = hex(0x92400e, 1.0);

    /// Enemy body color per rank, weakest first
    pub const ENEMY: [[f32; 4]; 3] = [hex(0x6b7280, 1.0), hex(0xb91c1c, 1.0), hex(0x7c3aed, 1.0)];
    pub const ENEMY_EYE: [f32; 4] = hex(0xfde047, 1.0);
    pub const CROWN: [f32; 4] = hex(0xfbbf24, 1.0);

    pub const ENEMY_ARROW: [f32; 4] = hex(0xdc2626, 1.0);
    pub const ARROW_SHAFT: [f32; 4] = hex(0x78350f, 1.0);
    pub const ARROW_HEAD: [f32; 4] = hex(0xd1d5db, 1.0);

    pub const HEART: [f32; 4] = hex(0xef4444, 1.0);
    pub const HEART_EMPTY: [f32; 4] = hex(0x4b5563, 0.6);
    pub const BAR_BACK: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const BAR_FILL: [f32; 4] = hex(0xfbbf24, 1.0);

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
