//! Shape generation for 2D primitives
//!
//! Every function returns a flat triangle list in whatever 2D space its
//! inputs are given in; callers project afterwards.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn vert(p: Vec2, color: [f32; 4]) -> Vertex {
    Vertex::new(p.x, p.y, color)
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![vert(a, color), vert(b, color), vert(c, color)]
}

/// Convex quad given in winding order
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        vert(a, color),
        vert(b, color),
        vert(c, color),
        vert(a, color),
        vert(c, color),
        vert(d, color),
    ]
}

/// Axis-aligned rectangle between two corners
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad(min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), color)
}

/// Rectangle centered on `center`
pub fn centered_rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    rect(center - half, center + half, color)
}

/// Rectangle with one color along the `min.y` edge and another along `max.y`
pub fn gradient_rect(
    min: Vec2,
    max: Vec2,
    min_color: [f32; 4],
    max_color: [f32; 4],
) -> Vec<Vertex> {
    let a = vert(min, min_color);
    let b = vert(Vec2::new(max.x, min.y), min_color);
    let c = vert(max, max_color);
    let d = vert(Vec2::new(min.x, max.y), max_color);
    vec![a, b, c, a, c, d]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(vert(center, color));
        vertices.push(vert(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(vert(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let dir1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let dir2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

/// Heart icon, `size` across; y grows downward
pub fn heart(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let r = size / 4.0;
    let top = center.y - size / 4.0;
    let mut vertices = circle(Vec2::new(center.x - r, top), r, color, 12);
    vertices.extend(circle(Vec2::new(center.x + r, top), r, color, 12));
    vertices.extend(triangle(
        Vec2::new(center.x - 2.0 * r, top + r * 0.3),
        Vec2::new(center.x + 2.0 * r, top + r * 0.3),
        Vec2::new(center.x, center.y + size / 2.0),
        color,
    ));
    vertices
}
