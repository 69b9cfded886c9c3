//! Track pieces: straight blocks, curved blocks and their kerbs.
//!
//! Pieces are laid flat at y=0 in the builder's frame; kerbs sit 0.01 above
//! the asphalt so they never z-fight with it.

use glam::{Vec2, Vec3};

use super::{Material, MeshBuilder};
use crate::texture::TextureSlot;

/// Width of a kerb strip
pub const CURB_WIDTH: f32 = 0.2;

/// Height of kerbs above the asphalt
pub const CURB_LIFT: f32 = 0.01;

/// Alternating red/white kerb segments per piece
pub const CURB_SEGMENTS: u32 = 8;

/// Arc segments per turn
pub const TURN_SEGMENTS: u32 = 16;

/// Spacing between barricades along a straight
pub const BARRICADE_SPACING: f32 = 1.0;

/// Consecutive barricades sharing one sponsor board
pub const BARRICADES_PER_SPONSOR: usize = 10;

pub const ASPHALT: Material =
    Material::new([0.4; 3], [0.7; 3], [0.2; 3], 10.0);

const CURB_RED: Material = Material::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.3; 3], 20.0);
const CURB_WHITE: Material = Material::new([1.0; 3], [1.0; 3], [0.3; 3], 20.0);

/// Kerb colour for segment `i`
pub fn curb_material(i: u32) -> Material {
    if i % 2 == 0 {
        CURB_RED
    } else {
        CURB_WHITE
    }
}

/// Which way a turn bends, seen from its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Sweeps toward +Z
    Right,
    /// Mirror image, sweeps toward -Z
    Left,
}

impl TurnDirection {
    fn z_sign(self) -> f32 {
        match self {
            TurnDirection::Right => 1.0,
            TurnDirection::Left => -1.0,
        }
    }
}

/// Straight block `width × length` centred on the origin, running along Z
pub fn straight(b: &mut MeshBuilder, width: f32, length: f32, curbs: bool) {
    let (hw, hl) = (width / 2.0, length / 2.0);
    let saved = b.material();

    b.set_material(ASPHALT.with_texture(TextureSlot::Asphalt));
    b.quad(
        [
            Vec3::new(-hw, 0.0, -hl),
            Vec3::new(hw, 0.0, -hl),
            Vec3::new(hw, 0.0, hl),
            Vec3::new(-hw, 0.0, hl),
        ],
        Vec3::Y,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(width * 2.0, 0.0),
            Vec2::new(width * 2.0, length * 2.0),
            Vec2::new(0.0, length * 2.0),
        ],
    );

    if curbs {
        let seg = length / CURB_SEGMENTS as f32;
        for i in 0..CURB_SEGMENTS {
            let z0 = -hl + i as f32 * seg;
            let z1 = z0 + seg;
            b.set_material(curb_material(i));
            for (x0, x1) in [(-hw, -hw + CURB_WIDTH), (hw - CURB_WIDTH, hw)] {
                b.flat_quad(
                    [
                        Vec3::new(x0, CURB_LIFT, z0),
                        Vec3::new(x1, CURB_LIFT, z0),
                        Vec3::new(x1, CURB_LIFT, z1),
                        Vec3::new(x0, CURB_LIFT, z1),
                    ],
                    Vec3::Y,
                );
            }
        }
    }

    b.set_material(saved);
}

/// Curved block: an annulus sector from angle 0 to `degrees`, centred on the
/// origin, between `inner_radius` and `inner_radius + width`
pub fn turn(
    b: &mut MeshBuilder,
    inner_radius: f32,
    width: f32,
    degrees: f32,
    direction: TurnDirection,
    curbs: bool,
) {
    let outer_radius = inner_radius + width;
    let zs = direction.z_sign();
    let at = |r: f32, a: f32, y: f32| Vec3::new(r * a.cos(), y, zs * r * a.sin());
    let saved = b.material();

    b.set_material(ASPHALT.with_texture(TextureSlot::Asphalt));
    let step = degrees.to_radians() / TURN_SEGMENTS as f32;
    for i in 0..TURN_SEGMENTS {
        let (a1, a2) = (i as f32 * step, (i + 1) as f32 * step);
        let (v1, v2) = (
            i as f32 / TURN_SEGMENTS as f32,
            (i + 1) as f32 / TURN_SEGMENTS as f32,
        );
        b.quad(
            [
                at(inner_radius, a1, 0.0),
                at(outer_radius, a1, 0.0),
                at(outer_radius, a2, 0.0),
                at(inner_radius, a2, 0.0),
            ],
            Vec3::Y,
            [
                Vec2::new(0.0, v1),
                Vec2::new(1.0, v1),
                Vec2::new(1.0, v2),
                Vec2::new(0.0, v2),
            ],
        );
    }

    if curbs {
        let step = degrees.to_radians() / CURB_SEGMENTS as f32;
        for i in 0..CURB_SEGMENTS {
            let (a1, a2) = (i as f32 * step, (i + 1) as f32 * step);
            b.set_material(curb_material(i));
            for (r0, r1) in [
                (inner_radius, inner_radius + CURB_WIDTH),
                (outer_radius - CURB_WIDTH, outer_radius),
            ] {
                b.flat_quad(
                    [
                        at(r0, a1, CURB_LIFT),
                        at(r1, a1, CURB_LIFT),
                        at(r1, a2, CURB_LIFT),
                        at(r0, a2, CURB_LIFT),
                    ],
                    Vec3::Y,
                );
            }
        }
    }

    b.set_material(saved);
}

/// Where a barricade stands beside a straight, in the straight's frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarricadeSlot {
    pub position: Vec3,
    /// Rotation about Y so the board faces the road
    pub rotation_deg: f32,
    /// Index into the sponsor board list
    pub sponsor: usize,
}

/// Barricades lining both edges of a straight, one pair every
/// `BARRICADE_SPACING` units; boards change sponsor every
/// `BARRICADES_PER_SPONSOR` pairs
///
/// No sponsors means no barricades.
pub fn barricade_slots(width: f32, length: f32, sponsors: usize) -> Vec<BarricadeSlot> {
    if sponsors == 0 {
        return Vec::new();
    }
    let (hw, hl) = (width / 2.0, length / 2.0);
    let mut slots = Vec::new();
    let mut count = 0usize;
    loop {
        let z = -hl + count as f32 * BARRICADE_SPACING;
        if z >= hl {
            break;
        }
        let sponsor = (count / BARRICADES_PER_SPONSOR) % sponsors;
        slots.push(BarricadeSlot {
            position: Vec3::new(-hw, 0.0, z),
            rotation_deg: 0.0,
            sponsor,
        });
        slots.push(BarricadeSlot {
            position: Vec3::new(hw, 0.0, z),
            rotation_deg: 180.0,
            sponsor,
        });
        count += 1;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_without_curbs_is_one_quad() {
        let mut b = MeshBuilder::new();
        straight(&mut b, 4.0, 35.0, false);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertices[2].uv, [8.0, 70.0]);
        assert_eq!(mesh.vertices[0].texture, TextureSlot::Asphalt.layer());
    }

    #[test]
    fn test_straight_curbs_alternate() {
        let mut b = MeshBuilder::new();
        straight(&mut b, 4.0, 16.0, true);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 4 + CURB_SEGMENTS as usize * 2 * 4);

        // First kerb quad is red, the next pair white
        let first_curb = &mesh.vertices[4];
        assert_eq!(first_curb.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(first_curb.position[1], CURB_LIFT);
        let second_pair = &mesh.vertices[4 + 8];
        assert_eq!(second_pair.diffuse, [1.0, 1.0, 1.0]);
        assert_eq!(second_pair.texture, TextureSlot::White.layer());
    }

    #[test]
    fn test_straight_restores_material() {
        let mut b = MeshBuilder::new();
        let custom = Material::new([0.0; 3], [0.5; 3], [0.0; 3], 1.0);
        b.set_material(custom);
        straight(&mut b, 2.5, 10.0, true);
        assert_eq!(b.material(), custom);
    }

    #[test]
    fn test_right_turn_sweeps_positive_z() {
        let mut b = MeshBuilder::new();
        turn(&mut b, 5.0, 4.0, 90.0, TurnDirection::Right, false);
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), TURN_SEGMENTS as usize * 4);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.z > -1e-4);
            let r = Vec2::new(p.x, p.z).length();
            assert!(r > 5.0 - 1e-4 && r < 9.0 + 1e-4);
        }
        let (_, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(hi.z, 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_left_turn_mirrors_right() {
        let mut right = MeshBuilder::new();
        turn(&mut right, 5.0, 4.0, 50.0, TurnDirection::Right, true);
        let mut left = MeshBuilder::new();
        turn(&mut left, 5.0, 4.0, 50.0, TurnDirection::Left, true);
        let (right, left) = (right.finish(), left.finish());
        assert_eq!(right.vertex_count(), left.vertex_count());
        for (r, l) in right.vertices.iter().zip(&left.vertices) {
            assert_eq!(r.position[0], l.position[0]);
            assert_eq!(r.position[2], -l.position[2]);
        }
    }

    #[test]
    fn test_turn_curb_count() {
        let mut b = MeshBuilder::new();
        turn(&mut b, 5.0, 2.5, 130.0, TurnDirection::Right, true);
        let mesh = b.finish();
        assert_eq!(
            mesh.vertex_count(),
            (TURN_SEGMENTS + CURB_SEGMENTS * 2) as usize * 4
        );
    }

    #[test]
    fn test_barricade_slots_line_both_edges() {
        let slots = barricade_slots(4.0, 35.0, 3);
        assert_eq!(slots.len(), 35 * 2);
        assert_eq!(slots[0].position, Vec3::new(-2.0, 0.0, -17.5));
        assert_eq!(slots[0].rotation_deg, 0.0);
        assert_eq!(slots[1].position, Vec3::new(2.0, 0.0, -17.5));
        assert_eq!(slots[1].rotation_deg, 180.0);
    }

    #[test]
    fn test_barricade_sponsors_rotate_every_ten() {
        let slots = barricade_slots(4.0, 35.0, 3);
        let sponsors: Vec<usize> = slots.iter().step_by(2).map(|s| s.sponsor).collect();
        assert!(sponsors[..10].iter().all(|&s| s == 0));
        assert!(sponsors[10..20].iter().all(|&s| s == 1));
        assert!(sponsors[20..30].iter().all(|&s| s == 2));
        assert!(sponsors[30..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_no_sponsors_means_no_barricades() {
        assert!(barricade_slots(2.5, 35.0, 0).is_empty());
    }
}
