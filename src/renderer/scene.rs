//! Snapshot to triangle list
//!
//! Pure functions: a [`FrameSnapshot`] and a [`Projection`] in, NDC vertices
//! out. The 2D scene is drawn in canvas pixels and projected at the end; the
//! 3D scene projects box corners one face at a time.

use glam::{Vec2, Vec3};

use super::shapes;
use super::vertex::{Vertex, colors, hex, shade};
use super::view::{CAMERA_EYE, Projection};
use crate::sim::{ArrowView, EnemyView, FrameSnapshot, PlayerView};

/// Heart slots shown even after lives are lost
const HEART_SLOTS: u8 = 3;
const STAR_COUNT: u32 = 40;

/// Build the full frame
pub fn build(snapshot: &FrameSnapshot, projection: &Projection) -> Vec<Vertex> {
    match projection {
        Projection::Planar { .. } => {
            let mut vertices = planar_scene(snapshot);
            for v in &mut vertices {
                let p = projection.canvas_to_ndc(Vec2::from(v.position));
                v.position = p.to_array();
            }
            vertices
        }
        Projection::Perspective { .. } => volumetric_scene(snapshot, projection),
    }
}

// === 2D ===

fn planar_scene(snap: &FrameSnapshot) -> Vec<Vertex> {
    let w = snap.playfield.move_extent();
    let h = snap.playfield.advance_extent();
    let mut out = Vec::with_capacity(4096);

    backdrop(&mut out, w, h);

    for enemy in &snap.enemies {
        enemy_2d(&mut out, enemy);
    }
    if snap.player.active {
        archer_2d(&mut out, &snap.player);
    }
    for arrow in &snap.arrows {
        arrow_2d(&mut out, arrow);
    }

    hud_2d(&mut out, snap, w);
    out
}

fn backdrop(out: &mut Vec<Vertex>, w: f32, h: f32) {
    out.extend(shapes::gradient_rect(
        Vec2::ZERO,
        Vec2::new(w, h),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));

    // Fixed scatter so the sky doesn't flicker
    for i in 0..STAR_COUNT {
        let r = if i % 3 == 0 { 1.5 } else { 1.0 };
        let x = r + (i * 97 % 101) as f32 / 101.0 * (w - 2.0 * r);
        let y = r + (i * 53 % 61) as f32 / 61.0 * h * 0.5;
        out.extend(shapes::circle(Vec2::new(x, y), r, colors::STAR, 6));
    }

    let moon = Vec2::new(w * 0.85, h * 0.12);
    let halo = [colors::MOON[0], colors::MOON[1], colors::MOON[2], 0.2];
    out.extend(shapes::ring(moon, 24.0, 30.0, halo, 24));
    out.extend(shapes::circle(moon, 24.0, colors::MOON, 24));

    // Castle wall with towers and battlements along the bottom
    let wall_top = h - 60.0;
    out.extend(shapes::rect(Vec2::new(0.0, wall_top), Vec2::new(w, h), colors::CASTLE));
    let towers = 5;
    let tower_w = w / 10.0;
    for t in 0..towers {
        let cx = (t as f32 + 0.5) * w / towers as f32;
        let top = wall_top - 50.0;
        out.extend(shapes::rect(
            Vec2::new(cx - tower_w / 2.0, top),
            Vec2::new(cx + tower_w / 2.0, wall_top),
            colors::CASTLE,
        ));
        let merlon = tower_w / 5.0;
        for m in [0.0, 2.0, 4.0] {
            let x = cx - tower_w / 2.0 + m * merlon;
            out.extend(shapes::rect(
                Vec2::new(x, top - merlon),
                Vec2::new(x + merlon, top),
                colors::CASTLE,
            ));
        }
    }
}

fn enemy_2d(out: &mut Vec<Vertex>, enemy: &EnemyView) {
    let c = enemy.pos.truncate();
    let s = enemy.size.truncate();
    let kind = (enemy.kind as usize).min(colors::ENEMY.len() - 1);
    let body = colors::ENEMY[kind];

    // Helmeted head over a shield-shaped body
    out.extend(shapes::rect(
        Vec2::new(c.x - s.x * 0.4, c.y - s.y * 0.1),
        Vec2::new(c.x + s.x * 0.4, c.y + s.y * 0.3),
        shade(body, 0.8),
    ));
    out.extend(shapes::triangle(
        Vec2::new(c.x - s.x * 0.4, c.y + s.y * 0.3),
        Vec2::new(c.x + s.x * 0.4, c.y + s.y * 0.3),
        Vec2::new(c.x, c.y + s.y * 0.5),
        shade(body, 0.8),
    ));
    out.extend(shapes::circle(
        Vec2::new(c.x, c.y - s.y * 0.2),
        s.x * 0.25,
        body,
        16,
    ));
    for side in [-1.0, 1.0] {
        out.extend(shapes::circle(
            Vec2::new(c.x + side * s.x * 0.1, c.y - s.y * 0.22),
            s.x * 0.05,
            colors::ENEMY_EYE,
            8,
        ));
    }

    match kind {
        // Knights wear crowns
        2 => {
            let base = c.y - s.y * 0.4;
            for i in 0..3 {
                let x = c.x - s.x * 0.2 + i as f32 * s.x * 0.2;
                out.extend(shapes::triangle(
                    Vec2::new(x - s.x * 0.08, base),
                    Vec2::new(x + s.x * 0.08, base),
                    Vec2::new(x, c.y - s.y * 0.55),
                    colors::CROWN,
                ));
            }
        }
        // Brutes get horns
        1 => {
            for side in [-1.0, 1.0] {
                let root = Vec2::new(c.x + side * s.x * 0.2, c.y - s.y * 0.35);
                out.extend(shapes::triangle(
                    root,
                    root + Vec2::new(side * s.x * 0.1, 0.0),
                    root + Vec2::new(side * s.x * 0.25, -s.y * 0.15),
                    colors::ARROW_HEAD,
                ));
            }
        }
        _ => {}
    }
}

fn archer_2d(out: &mut Vec<Vertex>, player: &PlayerView) {
    let c = player.pos.truncate();
    let s = player.size.truncate();

    out.extend(shapes::rect(
        Vec2::new(c.x - s.x * 0.3, c.y - s.y * 0.1),
        Vec2::new(c.x + s.x * 0.3, c.y + s.y * 0.5),
        colors::ARCHER_TUNIC,
    ));
    out.extend(shapes::circle(
        Vec2::new(c.x, c.y - s.y * 0.25),
        s.x * 0.2,
        colors::ARCHER_SKIN,
        16,
    ));
    out.extend(shapes::triangle(
        Vec2::new(c.x - s.x * 0.25, c.y - s.y * 0.25),
        Vec2::new(c.x + s.x * 0.25, c.y - s.y * 0.25),
        Vec2::new(c.x, c.y - s.y * 0.5),
        colors::ARCHER_HOOD,
    ));
    // Bow held up and to the right
    out.extend(shapes::rect(
        Vec2::new(c.x + s.x * 0.35, c.y - s.y * 0.4),
        Vec2::new(c.x + s.x * 0.42, c.y + s.y * 0.2),
        colors::BOW,
    ));
}

fn arrow_2d(out: &mut Vec<Vertex>, arrow: &ArrowView) {
    let c = arrow.pos.truncate();
    let s = arrow.size.truncate();
    let (shaft, head, tip_dir) = if arrow.from_player {
        let color = arrow.color.map_or(colors::ARROW_SHAFT, |rgb| hex(rgb, 1.0));
        (color, colors::ARROW_HEAD, -1.0)
    } else {
        (colors::ENEMY_ARROW, colors::ENEMY_ARROW, 1.0)
    };

    out.extend(shapes::centered_rect(c, Vec2::new(s.x * 0.5, s.y), shaft));
    let tip = Vec2::new(c.x, c.y + tip_dir * s.y / 2.0);
    let back = tip.y - tip_dir * s.y * 0.3;
    out.extend(shapes::triangle(
        Vec2::new(c.x - s.x, back),
        Vec2::new(c.x + s.x, back),
        tip,
        head,
    ));
}

fn hud_2d(out: &mut Vec<Vertex>, snap: &FrameSnapshot, w: f32) {
    let slots = HEART_SLOTS.max(snap.player.lives);
    for i in 0..slots {
        let color = if i < snap.player.lives {
            colors::HEART
        } else {
            colors::HEART_EMPTY
        };
        out.extend(shapes::heart(Vec2::new(22.0 + i as f32 * 28.0, 22.0), 20.0, color));
    }

    let bar_w = (w * 0.25).min(160.0);
    let min = Vec2::new(w - bar_w - 12.0, 14.0);
    let max = Vec2::new(w - 12.0, 24.0);
    out.extend(shapes::rect(min, max, colors::BAR_BACK));
    let fill = bar_w * snap.progress.clamp(0.0, 1.0);
    if fill > 0.0 {
        out.extend(shapes::rect(min, Vec2::new(min.x + fill, max.y), colors::BAR_FILL));
    }
}

// === 3D ===

/// Shaded box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 4],
}

/// Every box in the frame, farthest from the camera first
pub fn volumetric_boxes(snap: &FrameSnapshot, projection: &Projection) -> Vec<Box3> {
    let mut boxes = Vec::with_capacity(snap.enemies.len() + snap.arrows.len() + 1);
    if snap.player.active {
        boxes.push(Box3 {
            center: snap.player.pos,
            size: snap.player.size,
            color: colors::ARCHER_TUNIC,
        });
    }
    for enemy in &snap.enemies {
        let kind = (enemy.kind as usize).min(colors::ENEMY.len() - 1);
        boxes.push(Box3 {
            center: enemy.pos,
            size: enemy.size,
            color: colors::ENEMY[kind],
        });
    }
    for arrow in &snap.arrows {
        let color = match (arrow.from_player, arrow.color) {
            (true, Some(rgb)) => hex(rgb, 1.0),
            (true, None) => colors::ARROW_SHAFT,
            (false, _) => colors::ENEMY_ARROW,
        };
        boxes.push(Box3 {
            center: arrow.pos,
            size: arrow.size,
            color,
        });
    }

    boxes.sort_by(|a, b| {
        projection
            .depth(b.center)
            .total_cmp(&projection.depth(a.center))
    });
    boxes
}

fn volumetric_scene(snap: &FrameSnapshot, projection: &Projection) -> Vec<Vertex> {
    let field = &snap.playfield;
    let mut out = Vec::with_capacity(2048);

    let ground = [
        Vec3::new(field.move_min, 0.0, field.advance_min),
        Vec3::new(field.move_max, 0.0, field.advance_min),
        Vec3::new(field.move_max, 0.0, field.advance_max),
        Vec3::new(field.move_min, 0.0, field.advance_max),
    ];
    face(&mut out, projection, ground, colors::GROUND);

    // Lane markings every quarter of the field
    for i in 0..=4 {
        let x = field.move_min + field.move_extent() * i as f32 / 4.0;
        let lane = [
            Vec3::new(x - 0.03, 0.001, field.advance_min),
            Vec3::new(x + 0.03, 0.001, field.advance_min),
            Vec3::new(x + 0.03, 0.001, field.advance_max),
            Vec3::new(x - 0.03, 0.001, field.advance_max),
        ];
        face(&mut out, projection, lane, colors::GRID_LINE);
    }

    for b in volumetric_boxes(snap, projection) {
        box_faces(&mut out, projection, &b);
    }
    out
}

fn face(out: &mut Vec<Vertex>, projection: &Projection, corners: [Vec3; 4], color: [f32; 4]) {
    let mut ndc = [Vec2::ZERO; 4];
    for (slot, corner) in ndc.iter_mut().zip(corners) {
        match projection.project(corner) {
            Some(p) => *slot = p,
            None => return,
        }
    }
    out.extend(shapes::quad(ndc[0], ndc[1], ndc[2], ndc[3], color));
}

/// Emit the faces that point toward the camera
fn box_faces(out: &mut Vec<Vertex>, projection: &Projection, b: &Box3) {
    let eye = projection.eye().unwrap_or(CAMERA_EYE);
    let lo = b.center - b.size / 2.0;
    let hi = b.center + b.size / 2.0;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    // Sides first so the top face paints over their shared edge
    if eye.x < lo.x {
        let side = [
            corner(lo.x, lo.y, lo.z),
            corner(lo.x, lo.y, hi.z),
            corner(lo.x, hi.y, hi.z),
            corner(lo.x, hi.y, lo.z),
        ];
        face(out, projection, side, shade(b.color, 0.6));
    } else if eye.x > hi.x {
        let side = [
            corner(hi.x, lo.y, lo.z),
            corner(hi.x, lo.y, hi.z),
            corner(hi.x, hi.y, hi.z),
            corner(hi.x, hi.y, lo.z),
        ];
        face(out, projection, side, shade(b.color, 0.6));
    }

    if eye.z > hi.z {
        let front = [
            corner(lo.x, lo.y, hi.z),
            corner(hi.x, lo.y, hi.z),
            corner(hi.x, hi.y, hi.z),
            corner(lo.x, hi.y, hi.z),
        ];
        face(out, projection, front, shade(b.color, 0.8));
    } else if eye.z < lo.z {
        let back = [
            corner(lo.x, lo.y, lo.z),
            corner(hi.x, lo.y, lo.z),
            corner(hi.x, hi.y, lo.z),
            corner(lo.x, hi.y, lo.z),
        ];
        face(out, projection, back, shade(b.color, 0.8));
    }

    if eye.y > hi.y {
        let top = [
            corner(lo.x, hi.y, lo.z),
            corner(hi.x, hi.y, lo.z),
            corner(hi.x, hi.y, hi.z),
            corner(lo.x, hi.y, hi.z),
        ];
        face(out, projection, top, b.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::view::OrbitCamera;
    use crate::sim::{Arrow, GameState};
    use crate::tuning::Tuning;

    fn planar_snapshot() -> (GameState, Projection) {
        let state = GameState::new(Tuning::planar_sized(800.0, 600.0));
        let camera = OrbitCamera::default();
        let proj = Projection::for_playfield(&state.tuning.playfield, &camera, 800.0 / 600.0);
        (state, proj)
    }

    #[test]
    fn test_planar_scene_stays_on_screen() {
        let (state, proj) = planar_snapshot();
        let verts = build(&FrameSnapshot::capture(&state), &proj);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        for v in &verts {
            assert!(v.position[0].abs() <= 1.0 + 1e-4, "{:?}", v.position);
            assert!(v.position[1].abs() <= 1.0 + 1e-4, "{:?}", v.position);
        }
    }

    #[test]
    fn test_inactive_entities_are_not_drawn() {
        let (mut state, proj) = planar_snapshot();
        let full = build(&FrameSnapshot::capture(&state), &proj).len();

        state.player.body.active = false;
        let no_player = build(&FrameSnapshot::capture(&state), &proj).len();
        assert!(no_player < full);

        for enemy in state.enemies.values_mut() {
            enemy.body.active = false;
        }
        let empty = build(&FrameSnapshot::capture(&state), &proj).len();
        assert!(empty < no_player);
    }

    #[test]
    fn test_player_arrow_uses_its_color() {
        let (mut state, proj) = planar_snapshot();
        state
            .arrows
            .insert(Arrow::player(Vec3::new(400.0, 300.0, 0.0), state.tuning.arrow_size, 0x3b82f6));
        let verts = build(&FrameSnapshot::capture(&state), &proj);
        assert!(verts.iter().any(|v| v.color == hex(0x3b82f6, 1.0)));
    }

    #[test]
    fn test_progress_bar_grows() {
        let (mut state, proj) = planar_snapshot();
        // Crowns share the bar's gold, so count rather than look for the color
        let gold = |state: &GameState| {
            build(&FrameSnapshot::capture(state), &proj)
                .iter()
                .filter(|v| v.color == colors::BAR_FILL)
                .count()
        };
        let before = gold(&state);
        state.enemies_defeated = 5;
        assert_eq!(gold(&state), before + 6);
    }

    #[test]
    fn test_boxes_sorted_back_to_front() {
        let state = GameState::new(Tuning::volumetric());
        let proj = Projection::perspective(16.0 / 9.0);
        let boxes = volumetric_boxes(&FrameSnapshot::capture(&state), &proj);
        assert_eq!(boxes.len(), 16);
        for pair in boxes.windows(2) {
            assert!(proj.depth(pair[0].center) >= proj.depth(pair[1].center));
        }
        // The archer is closest to the camera
        assert_eq!(boxes.last().map(|b| b.color), Some(colors::ARCHER_TUNIC));
    }

    #[test]
    fn test_volumetric_scene_draws_ground_and_boxes() {
        let state = GameState::new(Tuning::volumetric());
        let proj = Projection::perspective(16.0 / 9.0);
        let verts = build(&FrameSnapshot::capture(&state), &proj);
        assert!(verts.iter().any(|v| v.color == colors::GROUND));
        assert!(verts.iter().any(|v| v.color == colors::ARCHER_TUNIC));
        assert_eq!(verts.len() % 3, 0);
    }

    #[test]
    fn test_orbited_camera_sees_back_faces() {
        let state = GameState::new(Tuning::volumetric());
        let snap = FrameSnapshot::capture(&state);
        let mut camera = OrbitCamera::default();
        // Half a turn puts the camera behind the formation
        camera.drag(std::f32::consts::PI / 0.005, 0.0);
        let proj = Projection::orbit(&camera, 16.0 / 9.0);

        let boxes = volumetric_boxes(&snap, &proj);
        // The archer is now the farthest box
        assert_eq!(boxes.first().map(|b| b.color), Some(colors::ARCHER_TUNIC));

        let mut faces = Vec::new();
        box_faces(&mut faces, &proj, &boxes[0]);
        let lo_z = boxes[0].center.z - boxes[0].size.z / 2.0;
        let back = shade(colors::ARCHER_TUNIC, 0.8);
        assert!(faces.iter().any(|v| v.color == back));
        assert!(proj.eye().is_some_and(|eye| eye.z < lo_z));
    }
}
