//! Orbit and chase cameras with their view-projection matrices.

use glam::{Mat4, Vec3};

use crate::params::{ChaseCamera, OrbitPreset, RenderConfig};
use crate::vehicle::CarState;

/// Which camera drives the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Orthographic view orbiting the origin
    #[default]
    Orbit,
    /// Perspective view following the driven car
    Chase,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Orbit => ViewMode::Chase,
            ViewMode::Chase => ViewMode::Orbit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Orbit => "Orbit",
            ViewMode::Chase => "Chase",
        }
    }
}

/// Orbit camera state, changed by the arrow/zoom/reset keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub azimuth_deg: i32,
    pub elevation_deg: i32,
    pub dim: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_preset(&OrbitPreset::RESET)
    }
}

impl OrbitCamera {
    /// Step used by the zoom keys
    pub const ZOOM_STEP: f32 = 0.1;

    /// Step used by the arrow keys (degrees)
    pub const ROTATE_STEP: i32 = 5;

    /// `dim` never zooms in past this
    pub const MIN_DIM: f32 = 1.0;

    pub fn from_preset(preset: &OrbitPreset) -> Self {
        Self {
            azimuth_deg: preset.azimuth_deg,
            elevation_deg: preset.elevation_deg,
            dim: preset.dim,
        }
    }

    pub fn apply_preset(&mut self, preset: &OrbitPreset) {
        *self = Self::from_preset(preset);
    }

    /// Change azimuth, keeping it within (-360, 360)
    pub fn rotate(&mut self, delta_deg: i32) {
        self.azimuth_deg = (self.azimuth_deg + delta_deg) % 360;
    }

    /// Restore the reset angles, keeping the current zoom
    pub fn reset_angles(&mut self) {
        self.azimuth_deg = OrbitPreset::RESET.azimuth_deg;
        self.elevation_deg = OrbitPreset::RESET.elevation_deg;
    }

    pub fn zoom_out(&mut self) {
        self.dim += Self::ZOOM_STEP;
    }

    pub fn zoom_in(&mut self) {
        if self.dim > Self::MIN_DIM {
            self.dim -= Self::ZOOM_STEP;
        }
    }

    /// Eye on a sphere of radius `2 dim` around the origin
    pub fn eye(&self) -> Vec3 {
        let (th, ph) = (
            (self.azimuth_deg as f32).to_radians(),
            (self.elevation_deg as f32).to_radians(),
        );
        let r = 2.0 * self.dim;
        Vec3::new(-r * th.sin() * ph.cos(), r * ph.sin(), r * th.cos() * ph.cos())
    }

    pub fn up(&self) -> Vec3 {
        Vec3::new(0.0, (self.elevation_deg as f32).to_radians().cos(), 0.0)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, self.up())
    }

    /// Orthographic box `±aspect·dim × ±dim`, depth from `-dim` to `far`
    pub fn projection(&self, aspect: f32, far: f32) -> Mat4 {
        let d = self.dim;
        Mat4::orthographic_rh(-aspect * d, aspect * d, -d, d, -d, far)
    }
}

/// Matrices for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameCamera {
    pub view_proj: Mat4,
    pub eye: Vec3,
    /// Inverse of a rotation-only perspective view, for skybox lookups
    pub sky_inv_view_proj: Mat4,
}

/// Build the frame's matrices for the active view
///
/// # Arguments
/// * `mode` - Orbit or chase
/// * `orbit` - Orbit camera angles and extent
/// * `car` - Driven car (chase view follows it)
/// * `chase` - Chase camera placement and lens
/// * `config` - Window size and orthographic far plane
pub fn frame_camera(
    mode: ViewMode,
    orbit: &OrbitCamera,
    car: &CarState,
    chase: &ChaseCamera,
    config: &RenderConfig,
) -> FrameCamera {
    let aspect = config.aspect_ratio();
    let (view, proj, eye, target, up) = match mode {
        ViewMode::Orbit => {
            let eye = orbit.eye();
            (
                orbit.view(),
                orbit.projection(aspect, config.ortho_far_plane),
                eye,
                Vec3::ZERO,
                orbit.up(),
            )
        }
        ViewMode::Chase => {
            let eye = car.chase_eye(chase);
            let target = car.chase_target(chase);
            (
                Mat4::look_at_rh(eye, target, Vec3::Y),
                chase_projection(chase, aspect),
                eye,
                target,
                Vec3::Y,
            )
        }
    };

    FrameCamera {
        view_proj: proj * view,
        eye,
        sky_inv_view_proj: sky_matrix(target - eye, up, chase, aspect).inverse(),
    }
}

pub fn chase_projection(chase: &ChaseCamera, aspect: f32) -> Mat4 {
    Mat4::perspective_rh(
        chase.fov_degrees.to_radians(),
        aspect,
        chase.near_plane,
        chase.far_plane,
    )
}

/// Rotation-only view with a perspective lens, so the sky is a pure
/// direction lookup in both views
fn sky_matrix(forward: Vec3, up: Vec3, chase: &ChaseCamera, aspect: f32) -> Mat4 {
    let up = if up.length_squared() < 1e-8 { Vec3::Y } else { up };
    let forward = if forward.length_squared() < 1e-12 {
        Vec3::NEG_Z
    } else {
        forward
    };
    chase_projection(chase, aspect) * Mat4::look_to_rh(Vec3::ZERO, forward, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_eye_formula() {
        let cam = OrbitCamera {
            azimuth_deg: 0,
            elevation_deg: 0,
            dim: 5.0,
        };
        let eye = cam.eye();
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 10.0, epsilon = 1e-5);

        let cam = OrbitCamera {
            azimuth_deg: 90,
            ..cam
        };
        assert_relative_eq!(cam.eye().x, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_eye_distance() {
        let cam = OrbitCamera::default();
        assert_relative_eq!(cam.eye().length(), 16.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut cam = OrbitCamera::default();
        for _ in 0..60 {
            cam.rotate(OrbitCamera::ROTATE_STEP);
        }
        assert_eq!(cam.azimuth_deg, (105 + 300) % 360);
        cam.azimuth_deg = -355;
        cam.rotate(-OrbitCamera::ROTATE_STEP);
        assert_eq!(cam.azimuth_deg, 0);
    }

    #[test]
    fn test_reset_keeps_zoom() {
        let mut cam = OrbitCamera::from_preset(&OrbitPreset::GARAGE);
        cam.reset_angles();
        assert_eq!((cam.azimuth_deg, cam.elevation_deg), (105, 20));
        assert_eq!(cam.dim, 10.0);
    }

    #[test]
    fn test_zoom_in_stops_near_one() {
        let mut cam = OrbitCamera::from_preset(&OrbitPreset::CAR);
        for _ in 0..100 {
            cam.zoom_in();
        }
        assert!(cam.dim <= OrbitCamera::MIN_DIM + 1e-4);
        assert!(cam.dim > OrbitCamera::MIN_DIM - OrbitCamera::ZOOM_STEP - 1e-3);
        let before = cam.dim;
        cam.zoom_out();
        assert_relative_eq!(cam.dim - before, OrbitCamera::ZOOM_STEP, epsilon = 1e-5);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let cam = OrbitCamera::default();
        let m = cam.projection(1.0, 500.0) * cam.view();
        let p = m.project_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert!((0.0..=1.0).contains(&p.z));
    }

    #[test]
    fn test_orthographic_edges() {
        let cam = OrbitCamera {
            azimuth_deg: 0,
            elevation_deg: 0,
            dim: 4.0,
        };
        let m = cam.projection(2.0, 500.0) * cam.view();
        // Looking down -Z from +Z: world +X is screen right
        let p = m.project_point3(Vec3::new(8.0, 4.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_chase_frame_looks_at_car() {
        let car = CarState::default();
        let chase = ChaseCamera::default();
        let frame = frame_camera(
            ViewMode::Chase,
            &OrbitCamera::default(),
            &car,
            &chase,
            &RenderConfig::default(),
        );
        assert_eq!(frame.eye, car.chase_eye(&chase));
        let p = frame.view_proj.project_point3(car.chase_target(&chase));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sky_matrix_ignores_translation() {
        let config = RenderConfig::default();
        let chase = ChaseCamera::default();
        let mut near = CarState::default();
        let a = frame_camera(ViewMode::Chase, &OrbitCamera::default(), &near, &chase, &config);
        near.position += Vec3::new(50.0, 0.0, -20.0);
        let b = frame_camera(ViewMode::Chase, &OrbitCamera::default(), &near, &chase, &config);
        assert!(a.sky_inv_view_proj.abs_diff_eq(b.sky_inv_view_proj, 1e-3));
        assert!(!a.view_proj.abs_diff_eq(b.view_proj, 1e-3));
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::Orbit.toggle(), ViewMode::Chase);
        assert_eq!(ViewMode::Chase.toggle().label(), "Orbit");
    }
}
