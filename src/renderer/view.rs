//! World to normalized device coordinates
//!
//! The 2D view maps canvas pixels (origin top-left, y down) onto the surface,
//! letterboxed to keep the canvas aspect. The 3D view is a perspective camera
//! orbiting the origin, starting above and behind the archer.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::tuning::{Dimensions, Playfield};

/// Starting camera position for the 3D view
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 5.0, 10.0);
/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 60.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

/// Lowest camera elevation, keeps the eye above the ground plane
const MIN_PITCH: f32 = std::f32::consts::FRAC_PI_2 - std::f32::consts::PI / 2.2;
/// Highest camera elevation, just short of straight down
const MAX_PITCH: f32 = 1.5;
/// Radians of orbit per dragged CSS pixel
const ORBIT_SPEED: f32 = 0.005;

/// Mouse-driven orbit around the origin, no zoom or pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Rotation about +y, 0 looks down -z
    pub yaw: f32,
    /// Elevation above the ground plane
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: CAMERA_EYE.x.atan2(CAMERA_EYE.z),
            pitch: CAMERA_EYE.y.atan2(CAMERA_EYE.x.hypot(CAMERA_EYE.z)),
            distance: CAMERA_EYE.length(),
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let flat = self.distance * self.pitch.cos();
        Vec3::new(
            flat * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            flat * self.yaw.cos(),
        )
    }

    /// Apply a mouse drag in CSS pixels
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(MIN_PITCH, MAX_PITCH);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Planar {
        width: f32,
        height: f32,
        /// Surface width / height
        surface_aspect: f32,
    },
    Perspective {
        view_proj: Mat4,
        eye: Vec3,
    },
}

impl Projection {
    pub fn planar(width: f32, height: f32, surface_aspect: f32) -> Self {
        Projection::Planar {
            width,
            height,
            surface_aspect,
        }
    }

    /// Perspective from the starting camera pose
    pub fn perspective(surface_aspect: f32) -> Self {
        Self::orbit(&OrbitCamera::default(), surface_aspect)
    }

    pub fn orbit(camera: &OrbitCamera, surface_aspect: f32) -> Self {
        let eye = camera.eye();
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            CAMERA_FOV_DEGREES.to_radians(),
            surface_aspect.max(f32::EPSILON),
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        Projection::Perspective {
            view_proj: proj * view,
            eye,
        }
    }

    /// Projection matching a playfield's coordinate convention
    pub fn for_playfield(field: &Playfield, camera: &OrbitCamera, surface_aspect: f32) -> Self {
        match field.dims {
            Dimensions::Planar => {
                Self::planar(field.move_extent(), field.advance_extent(), surface_aspect)
            }
            Dimensions::Volumetric => Self::orbit(camera, surface_aspect),
        }
    }

    /// Camera position, `None` for the flat view
    pub fn eye(&self) -> Option<Vec3> {
        match *self {
            Projection::Planar { .. } => None,
            Projection::Perspective { eye, .. } => Some(eye),
        }
    }

    /// Letterbox scale applied to canvas NDC, `(1, 1)` for perspective
    fn letterbox(&self) -> Vec2 {
        match *self {
            Projection::Planar {
                width,
                height,
                surface_aspect,
            } => {
                let canvas_aspect = width / height.max(f32::EPSILON);
                if surface_aspect > canvas_aspect {
                    Vec2::new(canvas_aspect / surface_aspect, 1.0)
                } else {
                    Vec2::new(1.0, surface_aspect / canvas_aspect)
                }
            }
            Projection::Perspective { .. } => Vec2::ONE,
        }
    }

    /// Project a canvas point (2D view only; depth is ignored)
    pub fn canvas_to_ndc(&self, p: Vec2) -> Vec2 {
        match *self {
            Projection::Planar { width, height, .. } => {
                let ndc = Vec2::new(p.x / width * 2.0 - 1.0, 1.0 - p.y / height * 2.0);
                ndc * self.letterbox()
            }
            Projection::Perspective { .. } => p,
        }
    }

    /// Project a world point to NDC
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        match *self {
            Projection::Planar { .. } => Some(self.canvas_to_ndc(p.truncate())),
            Projection::Perspective { view_proj, .. } => {
                let clip = view_proj * p.extend(1.0);
                if clip.w <= CAMERA_NEAR {
                    return None;
                }
                Some(clip.xy() / clip.w)
            }
        }
    }

    /// Distance from the viewer, larger is farther
    pub fn depth(&self, p: Vec3) -> f32 {
        self.eye().map_or(0.0, |eye| p.distance(eye))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_planar_corners() {
        let proj = Projection::planar(800.0, 600.0, 800.0 / 600.0);
        assert!(close(proj.canvas_to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0)));
        assert!(close(proj.canvas_to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(close(proj.canvas_to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO));
    }

    #[test]
    fn test_planar_letterbox() {
        // Surface twice as wide as the canvas aspect: bars left and right
        let proj = Projection::planar(800.0, 600.0, 8.0 / 3.0);
        let right = proj.canvas_to_ndc(Vec2::new(800.0, 300.0));
        assert!((right.x - 0.5).abs() < 1e-4);

        // Tall surface: bars top and bottom
        let proj = Projection::planar(800.0, 600.0, 2.0 / 3.0);
        let top = proj.canvas_to_ndc(Vec2::new(400.0, 0.0));
        assert!((top.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_perspective_centers_origin() {
        let proj = Projection::perspective(16.0 / 9.0);
        assert!(close(proj.project(Vec3::ZERO).unwrap(), Vec2::ZERO));
        // Right of the origin lands right of center
        assert!(proj.project(Vec3::new(4.0, 0.0, 0.0)).unwrap().x > 0.0);
        // Behind the camera is culled
        assert!(proj.project(Vec3::new(0.0, 5.0, 20.0)).is_none());
    }

    #[test]
    fn test_perspective_shrinks_with_distance() {
        let proj = Projection::perspective(1.0);
        let near = proj.project(Vec3::new(1.0, 0.0, 5.0)).unwrap();
        let far = proj.project(Vec3::new(1.0, 0.0, -5.0)).unwrap();
        assert!(near.x > far.x);
        assert!(proj.depth(Vec3::new(0.0, 0.0, -5.0)) > proj.depth(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_for_playfield() {
        let camera = OrbitCamera::default();
        let field = Tuning::planar_sized(640.0, 480.0).playfield;
        let planar = Projection::for_playfield(&field, &camera, 1.0);
        assert!(matches!(
            planar,
            Projection::Planar { width, height, .. } if width == 640.0 && height == 480.0
        ));
        assert_eq!(planar.eye(), None);
        let volume = Projection::for_playfield(&Tuning::volumetric().playfield, &camera, 1.0);
        assert!(matches!(volume, Projection::Perspective { .. }));
    }

    #[test]
    fn test_orbit_starts_at_default_eye() {
        let eye = OrbitCamera::default().eye();
        assert!((eye - CAMERA_EYE).length() < 1e-4);
        assert_eq!(Projection::perspective(1.0).eye(), Some(OrbitCamera::default().eye()));
    }

    #[test]
    fn test_orbit_drag_keeps_distance_and_stays_above_ground() {
        let mut camera = OrbitCamera::default();
        let distance = camera.eye().length();

        camera.drag(300.0, 0.0);
        assert!(camera.eye().x < 0.0);
        assert!((camera.eye().length() - distance).abs() < 1e-3);

        camera.drag(0.0, -10_000.0);
        assert_eq!(camera.pitch, MIN_PITCH);
        assert!(camera.eye().y > 0.0);

        camera.drag(0.0, 10_000.0);
        assert_eq!(camera.pitch, MAX_PITCH);
    }
}
