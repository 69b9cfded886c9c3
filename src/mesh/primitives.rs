//! Parametric shapes: boxes, trapezoids, cylinders, prisms, spheres, tori.
//!
//! Every routine emits into a `MeshBuilder` in the builder's current frame,
//! so callers place parts with `translate`/`rotate_*`/`scale` first.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Quat, Vec2, Vec3};

use super::MeshBuilder;

/// Box centred at `center` with half-extents `half`, rotated `rot_y_deg` about Y
///
/// `tex_repeat` scales the 0..1 face UVs; pass `[0.0, 0.0]` for untextured.
pub fn cube(b: &mut MeshBuilder, center: [f32; 3], half: [f32; 3], rot_y_deg: f32, tex_repeat: [f32; 2]) {
    b.push();
    b.translate(center[0], center[1], center[2]);
    b.rotate_y(rot_y_deg);
    b.scale(half[0], half[1], half[2]);

    let [ru, rv] = tex_repeat;
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(ru, 0.0),
        Vec2::new(ru, rv),
        Vec2::new(0.0, rv),
    ];
    let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    // Front
    b.quad([v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.)], Vec3::Z, uvs);
    // Back
    b.quad([v(1., -1., -1.), v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.)], Vec3::NEG_Z, uvs);
    // Right
    b.quad([v(1., -1., 1.), v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.)], Vec3::X, uvs);
    // Left
    b.quad([v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.)], Vec3::NEG_X, uvs);
    // Top
    b.quad([v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.), v(-1., 1., -1.)], Vec3::Y, uvs);
    // Bottom
    b.quad([v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.)], Vec3::NEG_Y, uvs);

    b.pop();
}

/// Untextured box
pub fn solid_box(b: &mut MeshBuilder, center: [f32; 3], half: [f32; 3]) {
    cube(b, center, half, 0.0, [0.0, 0.0]);
}

/// Frustum-like block with its base on y=0 and top at y=`height`
///
/// `top` and `bottom` are half-widths along (X, Z).
pub fn trapezoid(b: &mut MeshBuilder, top: [f32; 2], bottom: [f32; 2], height: f32) {
    let [tx, tz] = top;
    let [bx, bz] = bottom;
    let h = height;
    let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let no_uv = [Vec2::ZERO; 4];

    // Front (+Z)
    b.quad(
        [v(-bx, 0., bz), v(bx, 0., bz), v(tx, h, tz), v(-tx, h, tz)],
        Vec3::new(0.0, bz - tz, 2.0).normalize(),
        no_uv,
    );
    // Back (-Z)
    b.quad(
        [v(bx, 0., -bz), v(-bx, 0., -bz), v(-tx, h, -tz), v(tx, h, -tz)],
        Vec3::new(0.0, bz - tz, -2.0).normalize(),
        no_uv,
    );
    // Right (+X)
    b.quad(
        [v(bx, 0., bz), v(bx, 0., -bz), v(tx, h, -tz), v(tx, h, tz)],
        Vec3::new(2.0, bx - tx, 0.0).normalize(),
        no_uv,
    );
    // Left (-X)
    b.quad(
        [v(-bx, 0., -bz), v(-bx, 0., bz), v(-tx, h, tz), v(-tx, h, -tz)],
        Vec3::new(-2.0, bx - tx, 0.0).normalize(),
        no_uv,
    );
    // Top
    b.quad([v(-tx, h, tz), v(tx, h, tz), v(tx, h, -tz), v(-tx, h, -tz)], Vec3::Y, no_uv);
    // Bottom
    b.quad([v(-bx, 0., -bz), v(bx, 0., -bz), v(bx, 0., bz), v(-bx, 0., bz)], Vec3::NEG_Y, no_uv);
}

/// Capped cylinder along local Y, centred on `center`, rotated by `rot` (X, Y, Z degrees)
///
/// Fewer than three slices emits nothing.
pub fn cylinder(
    b: &mut MeshBuilder,
    center: [f32; 3],
    radius: f32,
    height: f32,
    slices: u32,
    rot: [f32; 3],
    tex_repeat: [f32; 2],
) {
    if slices < 3 {
        return;
    }
    b.push();
    b.translate(center[0], center[1], center[2]);
    b.rotate_xyz(rot);

    let half = height / 2.0;
    let ring: Vec<(f32, f32)> = (0..=slices)
        .map(|i| {
            let theta = TAU * i as f32 / slices as f32;
            (theta.cos(), theta.sin())
        })
        .collect();

    // Side
    let side: Vec<[(Vec3, Vec3, Vec2); 2]> = ring
        .iter()
        .enumerate()
        .map(|(i, &(c, s))| {
            let n = Vec3::new(c, 0.0, s);
            let u = i as f32 / slices as f32 * tex_repeat[0];
            [
                (Vec3::new(radius * c, -half, radius * s), n, Vec2::new(u, 0.0)),
                (Vec3::new(radius * c, half, radius * s), n, Vec2::new(u, tex_repeat[1])),
            ]
        })
        .collect();
    b.strip(&side);

    // Caps
    for (y, n) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let rim: Vec<(Vec3, Vec3, Vec2)> = ring
            .iter()
            .map(|&(c, s)| {
                (
                    Vec3::new(radius * c, y, radius * s),
                    n,
                    Vec2::new(0.5 + 0.5 * c, 0.5 + 0.5 * s),
                )
            })
            .collect();
        b.fan((Vec3::new(0.0, y, 0.0), n, Vec2::splat(0.5)), &rim);
    }

    b.pop();
}

/// Untextured cylinder
pub fn rod(b: &mut MeshBuilder, center: [f32; 3], radius: f32, height: f32, slices: u32, rot: [f32; 3]) {
    cylinder(b, center, radius, height, slices, rot, [0.0, 0.0]);
}

/// Triangular prism: triangle in XY (apex up), extruded along Z
pub fn prism(b: &mut MeshBuilder, base: f32, height: f32, depth: f32) {
    let hb = base / 2.0;
    let hd = depth / 2.0;
    let hh = height / 2.0;
    let no_uv = [Vec2::ZERO; 4];

    for (z, n) in [(hd, Vec3::Z), (-hd, Vec3::NEG_Z)] {
        let a = b.vertex(Vec3::new(-hb, -hh, z), n, Vec2::ZERO);
        let c = b.vertex(Vec3::new(hb, -hh, z), n, Vec2::ZERO);
        let d = b.vertex(Vec3::new(0.0, hh, z), n, Vec2::ZERO);
        if z > 0.0 {
            b.triangle(a, c, d);
        } else {
            b.triangle(a, d, c);
        }
    }

    let slant = Vec3::new(height, hb, 0.0).normalize();
    // Left side
    b.quad(
        [
            Vec3::new(-hb, -hh, -hd),
            Vec3::new(-hb, -hh, hd),
            Vec3::new(0.0, hh, hd),
            Vec3::new(0.0, hh, -hd),
        ],
        Vec3::new(-slant.x, slant.y, 0.0),
        no_uv,
    );
    // Right side
    b.quad(
        [
            Vec3::new(hb, -hh, hd),
            Vec3::new(hb, -hh, -hd),
            Vec3::new(0.0, hh, -hd),
            Vec3::new(0.0, hh, hd),
        ],
        slant,
        no_uv,
    );
    // Bottom
    b.quad(
        [
            Vec3::new(-hb, -hh, -hd),
            Vec3::new(hb, -hh, -hd),
            Vec3::new(hb, -hh, hd),
            Vec3::new(-hb, -hh, hd),
        ],
        Vec3::NEG_Y,
        no_uv,
    );
}

/// Flat `w × h` rectangle in local XY with +Z normal, placed at `center`
/// and rotated by `rot` (X, Y, Z degrees)
pub fn rectangle(b: &mut MeshBuilder, center: [f32; 3], w: f32, h: f32, rot: [f32; 3]) {
    textured_rectangle(b, center, w, h, rot, [0.0, 0.0]);
}

/// Rectangle with UVs spanning `uv_repeat`
pub fn textured_rectangle(
    b: &mut MeshBuilder,
    center: [f32; 3],
    w: f32,
    h: f32,
    rot: [f32; 3],
    uv_repeat: [f32; 2],
) {
    b.push();
    b.translate(center[0], center[1], center[2]);
    b.rotate_xyz(rot);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let [ru, rv] = uv_repeat;
    b.quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
        [
            Vec2::new(0.0, rv),
            Vec2::new(ru, rv),
            Vec2::new(ru, 0.0),
            Vec2::new(0.0, 0.0),
        ],
    );
    b.pop();
}

/// Latitude/longitude sphere with `step_deg` bands
pub fn sphere(b: &mut MeshBuilder, center: [f32; 3], radius: f32, step_deg: u32) {
    if step_deg == 0 || step_deg > 90 {
        return;
    }
    b.push();
    b.translate(center[0], center[1], center[2]);
    b.uniform_scale(radius);

    let point = |th: f32, ph: f32| {
        let (th, ph) = (th.to_radians(), ph.to_radians());
        Vec3::new(th.sin() * ph.cos(), th.cos() * ph.cos(), ph.sin())
    };
    let step = step_deg as i32;
    let mut ph = -90;
    while ph < 90 {
        let band: Vec<[(Vec3, Vec3, Vec2); 2]> = (0..=360)
            .step_by((2 * step) as usize)
            .map(|th| {
                let p0 = point(th as f32, ph as f32);
                let p1 = point(th as f32, (ph + step) as f32);
                [(p0, p0, Vec2::ZERO), (p1, p1, Vec2::ZERO)]
            })
            .collect();
        b.strip(&band);
        ph += step;
    }
    b.pop();
}

/// Partial torus in the local XY plane (tube around Z)
///
/// Sweeps from `start_deg` to `end_deg`; a sweep short of a full turn gets
/// flat end caps. Zero major segments or fewer than three minor segments
/// emits nothing.
pub fn torus(
    b: &mut MeshBuilder,
    major: f32,
    minor: f32,
    n_major: u32,
    n_minor: u32,
    start_deg: f32,
    end_deg: f32,
) {
    if n_major == 0 || n_minor < 3 {
        return;
    }
    let start = start_deg.to_radians();
    let end = end_deg.to_radians();
    let range = end - start;

    let surface = |u: f32, v: f32| {
        let r = major + minor * v.cos();
        (
            Vec3::new(r * u.cos(), r * u.sin(), minor * v.sin()),
            Vec3::new(v.cos() * u.cos(), v.cos() * u.sin(), v.sin()),
        )
    };

    for i in 0..n_major {
        let u1 = start + range * i as f32 / n_major as f32;
        let u2 = start + range * (i + 1) as f32 / n_major as f32;
        let strip: Vec<[(Vec3, Vec3, Vec2); 2]> = (0..=n_minor)
            .map(|j| {
                let v = TAU * j as f32 / n_minor as f32;
                let (p1, n1) = surface(u1, v);
                let (p2, n2) = surface(u2, v);
                [(p1, n1, Vec2::ZERO), (p2, n2, Vec2::ZERO)]
            })
            .collect();
        b.strip(&strip);
    }

    if (range - 2.0 * PI).abs() > 0.01 {
        let caps = [
            (start, Vec3::new(-start.sin(), start.cos(), 0.0)),
            (end, Vec3::new(end.sin(), -end.cos(), 0.0)),
        ];
        for (angle, n) in caps {
            let center = Vec3::new(major * angle.cos(), major * angle.sin(), 0.0);
            let rim: Vec<(Vec3, Vec3, Vec2)> = (0..=n_minor)
                .map(|j| {
                    let v = TAU * j as f32 / n_minor as f32;
                    (surface(angle, v).0, n, Vec2::ZERO)
                })
                .collect();
            b.fan((center, n, Vec2::ZERO), &rim);
        }
    }
}

/// Straight segment drawn as a square-section beam
///
/// Stands in for GL lines (fence rails, wires, axes) so they keep a visible
/// width regardless of the backend's line support.
pub fn beam(b: &mut MeshBuilder, from: Vec3, to: Vec3, thickness: f32) {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }
    let rotation = Quat::from_rotation_arc(Vec3::X, delta / length);
    b.push();
    b.multiply(Mat4::from_rotation_translation(rotation, (from + to) * 0.5));
    solid_box(b, [0.0; 3], [length / 2.0, thickness / 2.0, thickness / 2.0]);
    b.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_counts_and_normals() {
        let mut b = MeshBuilder::new();
        solid_box(&mut b, [0.0; 3], [1.0, 2.0, 3.0]);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
            // Axis-aligned faces only
            assert_relative_eq!(n.abs().max_element(), 1.0, epsilon = 1e-5);
        }
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(hi, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lo, -hi);
    }

    #[test]
    fn test_trapezoid_side_normals_tilt_up_when_tapering() {
        let mut b = MeshBuilder::new();
        trapezoid(&mut b, [0.2, 0.2], [0.35, 0.35], 1.5);
        let mesh = b.finish();
        assert_eq!(mesh.triangle_count(), 12);
        // Front face normal = normalize(0, b - t, 2)
        let front = Vec3::from_array(mesh.vertices[0].normal);
        let expected = Vec3::new(0.0, 0.15, 2.0).normalize();
        assert_relative_eq!(front.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(front.z, expected.z, epsilon = 1e-5);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(lo.y, 0.0);
        assert_relative_eq!(hi.y, 1.5);
    }

    #[test]
    fn test_cylinder_vertex_count() {
        let slices = 20;
        let mut b = MeshBuilder::new();
        rod(&mut b, [0.0; 3], 0.5, 2.0, slices, [0.0; 3]);
        let mesh = b.finish();
        let ring = (slices + 1) as usize;
        // Side strip + two fans (centre + ring)
        assert_eq!(mesh.vertex_count(), ring * 2 + 2 * (ring + 1));
        assert_eq!(mesh.triangle_count(), slices as usize * 2 + 2 * slices as usize);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(hi.y, 1.0);
        assert_relative_eq!(lo.y, -1.0);
    }

    #[test]
    fn test_cylinder_side_normals_are_radial() {
        let mut b = MeshBuilder::new();
        rod(&mut b, [0.0; 3], 2.0, 1.0, 8, [0.0; 3]);
        let mesh = b.finish();
        for v in mesh.vertices.iter().take(18) {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            let radial = Vec3::new(p.x, 0.0, p.z).normalize();
            assert_relative_eq!(n.dot(radial), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_degenerate_cylinder_is_empty() {
        let mut b = MeshBuilder::new();
        rod(&mut b, [0.0; 3], 1.0, 1.0, 2, [0.0; 3]);
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_rotated_cylinder_lies_along_z() {
        let mut b = MeshBuilder::new();
        rod(&mut b, [0.0; 3], 0.1, 4.0, 8, [90.0, 0.0, 0.0]);
        let (lo, hi) = b.finish().bounds().unwrap();
        assert_relative_eq!(hi.z - lo.z, 4.0, epsilon = 1e-4);
        assert!(hi.y - lo.y < 0.3);
    }

    #[test]
    fn test_full_torus_has_no_caps() {
        let mut b = MeshBuilder::new();
        torus(&mut b, 1.0, 0.2, 8, 6, 0.0, 360.0);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 8 * 7 * 2);
        for v in &mesh.vertices {
            // Every point sits exactly `minor` away from the centre circle
            let p = Vec3::from_array(v.position);
            let ring = Vec3::new(p.x, p.y, 0.0).normalize();
            assert_relative_eq!((p - ring).length(), 0.2, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_partial_torus_has_caps() {
        let mut b = MeshBuilder::new();
        torus(&mut b, 0.4, 0.06, 32, 10, 150.0, -150.0);
        let mesh = b.finish();
        let body = 32 * 11 * 2;
        let caps = 2 * (1 + 11);
        assert_eq!(mesh.vertex_count(), body + caps);
    }

    #[test]
    fn test_reverse_full_sweep_gets_caps() {
        let count = |start: f32, end: f32| {
            let mut b = MeshBuilder::new();
            torus(&mut b, 1.0, 0.2, 8, 6, start, end);
            b.finish().vertex_count()
        };
        let full = count(0.0, 360.0);
        assert_eq!(full, 8 * 7 * 2);
        // Only a forward full turn closes the tube
        assert_eq!(count(180.0, -180.0), full + 2 * (1 + 7));
    }

    #[test]
    fn test_torus_rejects_degenerate_segments() {
        let mut b = MeshBuilder::new();
        torus(&mut b, 1.0, 0.1, 0, 8, 0.0, 90.0);
        torus(&mut b, 1.0, 0.1, 8, 2, 0.0, 90.0);
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_sphere_normals_match_positions() {
        let mut b = MeshBuilder::new();
        sphere(&mut b, [0.0; 3], 1.0, 10);
        let mesh = b.finish();
        assert!(!mesh.is_empty());
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-4);
            assert_relative_eq!(p.dot(Vec3::from_array(v.normal)), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_prism_counts() {
        let mut b = MeshBuilder::new();
        prism(&mut b, 0.1, 0.1, 3.0);
        let mesh = b.finish();
        assert_eq!(mesh.triangle_count(), 2 + 3 * 2);
    }

    #[test]
    fn test_rectangle_rotated_to_floor() {
        let mut b = MeshBuilder::new();
        rectangle(&mut b, [0.0; 3], 2.0, 1.0, [-90.0, 0.0, 0.0]);
        let mesh = b.finish();
        let n = Vec3::from_array(mesh.vertices[0].normal);
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_beam_spans_endpoints() {
        let mut b = MeshBuilder::new();
        beam(&mut b, Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 0.02);
        let (lo, hi) = b.finish().bounds().unwrap();
        assert_relative_eq!(lo.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hi.z, 2.0, epsilon = 1e-5);
        assert!(hi.x - lo.x < 0.03);
    }

    #[test]
    fn test_zero_length_beam_is_empty() {
        let mut b = MeshBuilder::new();
        beam(&mut b, Vec3::ONE, Vec3::ONE, 0.02);
        assert!(b.finish().is_empty());
    }
}
