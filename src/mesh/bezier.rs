//! Quadratic Bezier profile and the surface of revolution swept from it.
//!
//! The cockpit canopy is a profile curve in the XZ plane revolved half a
//! turn around the X axis, closed with a flat disc at the far end.

use glam::{Vec2, Vec3};

use super::{primitives, MeshBuilder};

/// Profile samples along the curve
pub const CURVE_SAMPLES: usize = 50;

/// Angular steps of the half-turn sweep
pub const SWEEP_STEPS: usize = 50;

/// Quadratic Bezier curve defined by three control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl QuadraticBezier {
    pub const fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }

    /// Canopy profile used for the car cockpit
    pub const fn cockpit() -> Self {
        Self::new(
            Vec3::new(0.255, 0.0, 0.0),
            Vec3::new(-0.102, 0.0, 0.470),
            Vec3::new(-0.526, 0.0, 0.360),
        )
    }

    /// B(t) = (1-t)^2 P0 + 2(1-t)t P1 + t^2 P2
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let mt = 1.0 - t;
        self.p0 * (mt * mt) + self.p1 * (2.0 * mt * t) + self.p2 * (t * t)
    }

    /// `samples + 1` evenly spaced points from t=0 to t=1 inclusive
    pub fn sample(&self, samples: usize) -> Vec<Vec3> {
        if samples == 0 {
            return vec![self.p0];
        }
        (0..=samples)
            .map(|i| self.evaluate(i as f32 / samples as f32))
            .collect()
    }
}

/// Sweep `profile` (XZ plane) from -180° to 0° about the X axis, then cap
/// the last profile point with a disc facing -X
///
/// A profile with fewer than two points emits nothing.
pub fn surface_of_revolution(b: &mut MeshBuilder, profile: &[Vec3], steps: usize) {
    if profile.len() < 2 || steps == 0 {
        return;
    }
    let last = profile.len() - 1;

    // Finite-difference tangent; the final point reuses the previous segment
    let tangents: Vec<(f32, f32)> = (0..profile.len())
        .map(|i| {
            let (a, c) = if i < last {
                (profile[i], profile[i + 1])
            } else {
                (profile[i - 1], profile[i])
            };
            (c.x - a.x, c.z - a.z)
        })
        .collect();

    let angle = |j: usize| (-180.0 + 180.0 * j as f32 / steps as f32).to_radians();
    let place = |p: Vec3, theta: f32| Vec3::new(p.x, -p.z * theta.sin(), p.z * theta.cos());
    let normal = |(dx, dz): (f32, f32), theta: f32| {
        -Vec3::new(-dz, -dx * theta.sin(), dx * theta.cos()).normalize_or_zero()
    };

    for j in 0..steps {
        let (t1, t2) = (angle(j), angle(j + 1));
        let strip: Vec<[(Vec3, Vec3, Vec2); 2]> = profile
            .iter()
            .zip(&tangents)
            .map(|(&p, &d)| {
                [
                    (place(p, t1), normal(d, t1), Vec2::ZERO),
                    (place(p, t2), normal(d, t2), Vec2::ZERO),
                ]
            })
            .collect();
        b.strip(&strip);
    }

    let end = profile[last];
    let rim: Vec<(Vec3, Vec3, Vec2)> = (0..=steps)
        .map(|j| (place(Vec3::new(end.x, 0.0, end.z), angle(j)), Vec3::NEG_X, Vec2::ZERO))
        .collect();
    b.fan((Vec3::new(end.x, 0.0, 0.0), Vec3::NEG_X, Vec2::ZERO), &rim);
}

/// Full cockpit canopy from the default profile
pub fn cockpit(b: &mut MeshBuilder) {
    let profile = QuadraticBezier::cockpit().sample(CURVE_SAMPLES);
    surface_of_revolution(b, &profile, SWEEP_STEPS);
}

/// The profile itself as a thin tube (debug overlay for the canopy edge)
pub fn profile_line(b: &mut MeshBuilder, curve: &QuadraticBezier, samples: usize, thickness: f32) {
    let points = curve.sample(samples);
    for pair in points.windows(2) {
        primitives::beam(b, pair[0], pair[1], thickness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints_match_control_points() {
        let curve = QuadraticBezier::cockpit();
        assert_eq!(curve.evaluate(0.0), curve.p0);
        assert_relative_eq!(curve.evaluate(1.0).x, curve.p2.x, epsilon = 1e-6);
        assert_relative_eq!(curve.evaluate(1.0).z, curve.p2.z, epsilon = 1e-6);
    }

    #[test]
    fn test_midpoint_formula() {
        let curve = QuadraticBezier::cockpit();
        let mid = curve.evaluate(0.5);
        // 0.25 P0 + 0.5 P1 + 0.25 P2
        assert_relative_eq!(mid.x, 0.25 * 0.255 + 0.5 * -0.102 + 0.25 * -0.526, epsilon = 1e-6);
        assert_relative_eq!(mid.z, 0.5 * 0.470 + 0.25 * 0.360, epsilon = 1e-6);
    }

    #[test]
    fn test_sample_count_is_inclusive() {
        let points = QuadraticBezier::cockpit().sample(CURVE_SAMPLES);
        assert_eq!(points.len(), CURVE_SAMPLES + 1);
    }

    #[test]
    fn test_canopy_is_upper_half_dome() {
        let mut b = MeshBuilder::new();
        cockpit(&mut b);
        let mesh = b.finish();
        let strip_vertices = SWEEP_STEPS * (CURVE_SAMPLES + 1) * 2;
        let cap_vertices = 1 + SWEEP_STEPS + 1;
        assert_eq!(mesh.vertex_count(), strip_vertices + cap_vertices);

        let (lo, hi) = mesh.bounds().unwrap();
        assert!(lo.y > -1e-5, "canopy must not dip below its base, got {}", lo.y);
        assert_relative_eq!(hi.x, 0.255, epsilon = 1e-5);
        assert_relative_eq!(lo.x, -0.526, epsilon = 1e-5);
        // Widest radius is the curve's peak distance from the X axis
        assert!(hi.y > 0.3 && hi.y < 0.47);
    }

    #[test]
    fn test_canopy_normals_are_unit() {
        let mut b = MeshBuilder::new();
        cockpit(&mut b);
        for v in b.finish().vertices {
            assert_relative_eq!(Vec3::from_array(v.normal).length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_end_cap_faces_negative_x() {
        let mut b = MeshBuilder::new();
        cockpit(&mut b);
        let mesh = b.finish();
        let cap = &mesh.vertices[mesh.vertex_count() - 1];
        assert_eq!(cap.normal, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_short_profile_emits_nothing() {
        let mut b = MeshBuilder::new();
        surface_of_revolution(&mut b, &[Vec3::X], SWEEP_STEPS);
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_profile_line_follows_curve() {
        let mut b = MeshBuilder::new();
        profile_line(&mut b, &QuadraticBezier::cockpit(), 10, 0.01);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 10 * 24);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!(lo.x < -0.5 && hi.x > 0.25);
    }
}
