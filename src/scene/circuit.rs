//! Circuit layout: ground, pit building row, pit lane and the track loop.
//!
//! Coordinates here are circuit-local; the scene shifts the whole layout by
//! `CIRCUIT_OFFSET` along X so the start grid sits near the world origin.

use glam::{Vec2, Vec3};

use super::{garage, props, Livery};
use crate::mesh::primitives::{beam, rod};
use crate::mesh::road::{self, TurnDirection};
use crate::mesh::{Material, MeshBuilder};
use crate::texture::TextureSlot;

/// Circuit-local X of each pit garage
pub const GARAGE_POSITIONS: [f32; 5] = [5.0, 12.0, 19.0, 26.0, 33.0];

/// Half the edge of the square ground plane
pub const GROUND_HALF_EXTENT: f32 = 80.0;

const GARAGE_SCALE: f32 = 0.22 * 0.8;

const NO_SPONSORS: &[TextureSlot] = &[];

/// A straight with optional kerbs and sponsor barricades on both edges
fn road_block(
    b: &mut MeshBuilder,
    at: Vec2,
    rotation_deg: f32,
    width: f32,
    length: f32,
    curbs: bool,
    sponsors: &[TextureSlot],
) {
    b.scoped(|b| {
        b.translate(at.x, 0.0, at.y);
        b.rotate_y(rotation_deg);
        road::straight(b, width, length, curbs);
        for slot in road::barricade_slots(width, length, sponsors.len()) {
            b.scoped(|b| {
                b.translate(slot.position.x, slot.position.y, slot.position.z);
                b.rotate_y(slot.rotation_deg);
                props::barricade(b, sponsors[slot.sponsor]);
            });
        }
    });
}

/// Parameters of one curved piece
struct Bend {
    at: Vec2,
    rotation_deg: f32,
    inner_radius: f32,
    width: f32,
    degrees: f32,
    direction: TurnDirection,
    curbs: bool,
}

fn bend(b: &mut MeshBuilder, bend: Bend) {
    b.scoped(|b| {
        b.translate(bend.at.x, 0.0, bend.at.y);
        b.rotate_y(bend.rotation_deg);
        road::turn(
            b,
            bend.inner_radius,
            bend.width,
            bend.degrees,
            bend.direction,
            bend.curbs,
        );
    });
}

/// Emit the full circuit
///
/// `livery` paints the cars and posters inside the pit garages.
pub fn build(b: &mut MeshBuilder, livery: &Livery) {
    let saved = b.material();
    ground(b);
    pit_building(b, livery);
    track(b);
    scenery(b);
    b.set_material(saved);
}

fn ground(b: &mut MeshBuilder) {
    let e = GROUND_HALF_EXTENT;
    let uv = Vec2::new;

    b.set_material(
        Material::new([0.5; 3], [0.6; 3], [0.2; 3], 10.0).with_texture(TextureSlot::Concrete),
    );
    b.quad(
        [
            Vec3::new(-e, -0.01, -e),
            Vec3::new(e, -0.01, -e),
            Vec3::new(e, -0.01, e),
            Vec3::new(-e, -0.01, e),
        ],
        Vec3::Y,
        [uv(0.0, 0.0), uv(0.0, 40.0), uv(40.0, 40.0), uv(40.0, 0.0)],
    );

    // Infield grass between the main straight and the pit lane
    b.set_material(
        Material::new([0.1, 0.3, 0.1], [0.2, 0.5, 0.2], [0.05, 0.1, 0.05], 5.0)
            .with_texture(TextureSlot::Grass),
    );
    b.quad(
        [
            Vec3::new(-3.0, -0.001, 0.0),
            Vec3::new(-3.0, -0.001, 11.0),
            Vec3::new(43.0, -0.001, 11.0),
            Vec3::new(43.0, -0.001, 0.0),
        ],
        Vec3::Y,
        [uv(0.0, 0.0), uv(0.0, 5.0), uv(40.0, 5.0), uv(40.0, 0.0)],
    );
}

/// Garages facing the pit lane, the tyre wall and the pit fence
fn pit_building(b: &mut MeshBuilder, livery: &Livery) {
    for x in GARAGE_POSITIONS {
        b.scoped(|b| {
            b.translate(x, 0.0, 14.0);
            b.rotate_y(180.0);
            b.uniform_scale(GARAGE_SCALE);
            garage::build(b, livery);
        });
    }

    b.scoped(|b| {
        b.translate(0.0, 0.0, 8.0);
        b.uniform_scale(0.3);
        props::tyre_barrier_row(b, 60, 2.0);
    });

    b.set_material(Material::new([0.3; 3], [0.5; 3], [0.3; 3], 40.0));
    b.scoped(|b| {
        b.uniform_scale(0.7);
        for i in 0..15 {
            rod(b, [i as f32 * 4.0, 0.0, 7.0], 0.05, 3.0, 8, [0.0; 3]);
        }
        for j in 0..6 {
            let y = 0.3 + j as f32 * 0.2;
            beam(b, Vec3::new(0.0, y, 7.0), Vec3::new(56.0, y, 7.0), 0.03);
        }
    });
}

fn track(b: &mut MeshBuilder) {
    use TurnDirection::{Left, Right};
    let sponsors = &TextureSlot::SPONSORS[..];
    let at = Vec2::new;

    b.scoped(|b| {
        b.translate(20.0, 0.0, 0.0);

        // Start/finish straight and the pit lane beside it
        road_block(b, at(0.0, 0.0), 90.0, 4.0, 35.0, false, sponsors);
        road_block(b, at(0.0, 10.0), 90.0, 2.5, 35.0, false, NO_SPONSORS);
        bend(
            b,
            Bend {
                at: at(17.5, 16.25),
                rotation_deg: 90.0,
                inner_radius: 5.0,
                width: 2.5,
                degrees: 90.0,
                direction: Right,
                curbs: false,
            },
        );

        // First right-hander onto the back straight
        bend(
            b,
            Bend {
                at: at(17.5, 7.0),
                rotation_deg: 90.0,
                inner_radius: 5.0,
                width: 4.0,
                degrees: 90.0,
                direction: Right,
                curbs: true,
            },
        );
        road_block(b, at(24.5, 24.0), 0.0, 4.0, 35.0, true, NO_SPONSORS);

        // The long 130 degree hairpin
        b.scoped(|b| {
            b.translate(17.5, 0.0, 41.5);
            b.rotate_y(-60.0);
            bend(
                b,
                Bend {
                    at: at(0.0, 0.0),
                    rotation_deg: 60.0,
                    inner_radius: 5.0,
                    width: 4.0,
                    degrees: 130.0,
                    direction: Right,
                    curbs: true,
                },
            );
        });

        road_block(b, at(0.0, 35.9), 50.0, 4.0, 35.0, false, sponsors);
    });

    road_block(b, at(4.5, 23.0), 50.0, 4.0, 18.0, false, NO_SPONSORS);
    b.scoped(|b| {
        b.translate(2.5, 0.0, 7.0);
        b.rotate_y(180.0);
        bend(
            b,
            Bend {
                at: at(0.0, 0.0),
                rotation_deg: 0.0,
                inner_radius: 5.0,
                width: 4.0,
                degrees: 90.0,
                direction: Right,
                curbs: true,
            },
        );
    });

    // Pit lane entry
    b.scoped(|b| {
        b.translate(2.5, 0.0, 16.25);
        b.rotate_y(180.0);
        bend(
            b,
            Bend {
                at: at(0.0, 0.0),
                rotation_deg: 0.0,
                inner_radius: 5.0,
                width: 2.5,
                degrees: 90.0,
                direction: Right,
                curbs: false,
            },
        );
    });

    road_block(b, at(-4.5, 9.8), 0.0, 4.0, 6.0, false, NO_SPONSORS);
    bend(
        b,
        Bend {
            at: at(2.5, 12.2),
            rotation_deg: 180.0,
            inner_radius: 5.0,
            width: 4.0,
            degrees: 50.0,
            direction: Left,
            curbs: false,
        },
    );
}

/// Grandstand opposite the pits with a row of trees behind it
fn scenery(b: &mut MeshBuilder) {
    props::grandstand(b, Vec3::new(20.0, 0.0, -5.0), 18.0, 2.5, 2.0);
    for i in 0..7 {
        props::tree(b, Vec3::new(2.0 + i as f32 * 6.0, 0.0, -8.0), 1.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circuit_mesh() -> crate::mesh::Mesh {
        let mut b = MeshBuilder::new();
        build(&mut b, &Livery::FERRARI);
        b.finish()
    }

    #[test]
    fn test_ground_bounds() {
        let (lo, hi) = circuit_mesh().bounds().unwrap();
        assert_relative_eq!(lo.x, -GROUND_HALF_EXTENT);
        assert_relative_eq!(hi.z, GROUND_HALF_EXTENT);
    }

    #[test]
    fn test_every_surface_texture_used() {
        let mesh = circuit_mesh();
        for slot in [
            TextureSlot::Asphalt,
            TextureSlot::Concrete,
            TextureSlot::Grass,
            TextureSlot::Bark,
            TextureSlot::Bush,
        ]
        .into_iter()
        .chain(TextureSlot::SPONSORS)
        {
            assert!(
                mesh.vertices.iter().any(|v| v.texture == slot.layer()),
                "{slot:?} missing"
            );
        }
    }

    #[test]
    fn test_sponsor_boards_on_two_straights() {
        let mesh = circuit_mesh();
        let boards = mesh
            .vertices
            .iter()
            .filter(|v| TextureSlot::SPONSORS.iter().any(|s| s.layer() == v.texture))
            .count();
        // 35 barricade pairs on each of two straights, 4 vertices per board
        assert_eq!(boards, 2 * 35 * 2 * 4);
    }

    #[test]
    fn test_start_straight_runs_along_x() {
        let mut b = MeshBuilder::new();
        road_block(&mut b, Vec2::new(20.0, 0.0), 90.0, 4.0, 35.0, false, NO_SPONSORS);
        let (lo, hi) = b.finish().bounds().unwrap();
        assert_relative_eq!(lo.x, 2.5, epsilon = 1e-4);
        assert_relative_eq!(hi.x, 37.5, epsilon = 1e-4);
        assert_relative_eq!(hi.z, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_five_garages() {
        let mesh = circuit_mesh();
        let mut single = MeshBuilder::new();
        garage::build(&mut single, &Livery::FERRARI);
        let per_garage = single.vertex_count();
        assert!(mesh.vertex_count() > 5 * per_garage);
    }
}
