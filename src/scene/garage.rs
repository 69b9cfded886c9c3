//! A team garage: a 16 × 12 × 6 box open at +Z, furnished, with the team's
//! car parked inside.

use glam::{Vec2, Vec3};

use super::{car, props, Livery};
use crate::mesh::primitives::{rod, solid_box};
use crate::mesh::{Material, MeshBuilder};
use crate::texture::TextureSlot;

const HALF_WIDTH: f32 = 8.0;
const HALF_DEPTH: f32 = 6.0;
const HEIGHT: f32 = 6.0;

const fn mat(ambient: [f32; 3], diffuse: [f32; 3], specular: f32, shininess: f32) -> Material {
    Material::new(ambient, diffuse, [specular; 3], shininess)
}

const FLOOR: Material = mat([0.15; 3], [0.3; 3], 0.1, 10.0);
const WALL: Material = mat([0.2, 0.2, 0.22], [0.4, 0.4, 0.45], 0.1, 10.0);
const CEILING: Material = mat([0.25; 3], [0.5; 3], 0.2, 20.0);
const SAFETY_YELLOW: Material = Material::new([1.0, 1.0, 0.1], [1.0, 1.0, 0.2], [0.3; 3], 30.0);
const STEEL: Material = mat([0.2, 0.2, 0.22], [0.4, 0.4, 0.42], 0.3, 30.0);
const RUBBER: Material = mat([0.01; 3], [0.05; 3], 0.1, 5.0);

/// Emit a garage at the origin, floor at y=0
pub fn build(b: &mut MeshBuilder, livery: &Livery) {
    let saved = b.material();

    b.set_material(SAFETY_YELLOW);
    b.scoped(|b| {
        b.translate(-2.0, 0.01, 12.0);
        b.rotate_y(180.0);
        props::bracket_marking(b, 4.8);
    });

    shell(b);
    lighting_panels(b);
    tool_cabinet(b);
    workbench_and_tyres(b);
    computer_desk(b);
    team_poster(b, livery);
    wall_details(b);
    floor_equipment(b);

    b.set_material(SAFETY_YELLOW);
    for (x0, x1) in [(3.0, 3.2), (-3.2, -3.0)] {
        props::ground_rect(b, [x0, x1], [-5.0, 5.0], 0.01);
    }

    b.scoped(|b| {
        b.rotate_y(-90.0);
        car::build(b, livery, 0.0, false);
    });

    b.set_material(saved);
}

/// Floor, back and side walls, ceiling and the name banner over the door
fn shell(b: &mut MeshBuilder) {
    let (w, d, h) = (HALF_WIDTH, HALF_DEPTH, HEIGHT);
    let v = Vec3::new;
    let uv = Vec2::new;

    b.set_material(FLOOR.with_texture(TextureSlot::Concrete));
    b.quad(
        [v(-w, 0.0, -d), v(w, 0.0, -d), v(w, 0.0, d), v(-w, 0.0, d)],
        Vec3::Y,
        [uv(0.0, 0.0), uv(8.0, 0.0), uv(8.0, 6.0), uv(0.0, 6.0)],
    );

    b.set_material(WALL.with_texture(TextureSlot::Concrete));
    b.quad(
        [v(-w, 0.0, -d), v(w, 0.0, -d), v(w, h, -d), v(-w, h, -d)],
        Vec3::Z,
        [uv(0.0, 0.0), uv(8.0, 0.0), uv(8.0, 3.0), uv(0.0, 3.0)],
    );
    let side_uv = [uv(0.0, 0.0), uv(6.0, 0.0), uv(6.0, 3.0), uv(0.0, 3.0)];
    b.quad(
        [v(-w, 0.0, -d), v(-w, 0.0, d), v(-w, h, d), v(-w, h, -d)],
        Vec3::X,
        side_uv,
    );
    b.quad(
        [v(w, 0.0, d), v(w, 0.0, -d), v(w, h, -d), v(w, h, d)],
        Vec3::NEG_X,
        side_uv,
    );

    b.set_material(CEILING);
    b.flat_quad(
        [v(-w, h, -d), v(w, h, -d), v(w, h, d), v(-w, h, d)],
        Vec3::NEG_Y,
    );

    b.set_material(mat([0.2; 3], [0.4; 3], 0.2, 30.0));
    b.scoped(|b| {
        b.rotate_y(90.0);
        solid_box(b, [0.0, 7.0, 0.0], [0.1, 1.2, 2.5]);
    });
}

fn lighting_panels(b: &mut MeshBuilder) {
    b.set_material(mat([0.9, 0.9, 0.85], [1.0, 1.0, 0.95], 0.8, 80.0));
    for i in 0..3 {
        for j in 0..2 {
            let (x, z) = (-4.0 + i as f32 * 4.0, -2.0 + j as f32 * 4.0);
            let y = HEIGHT - 0.05;
            b.flat_quad(
                [
                    Vec3::new(x - 0.9, y, z - 0.6),
                    Vec3::new(x + 0.9, y, z - 0.6),
                    Vec3::new(x + 0.9, y, z + 0.6),
                    Vec3::new(x - 0.9, y, z + 0.6),
                ],
                Vec3::NEG_Y,
            );
        }
    }
}

fn tool_cabinet(b: &mut MeshBuilder) {
    b.scoped(|b| {
        b.translate(-0.3, 0.0, 0.3);
        b.set_material(mat([0.7, 0.1, 0.1], [0.9, 0.2, 0.2], 0.3, 40.0));
        solid_box(b, [-6.0, 1.2, -4.5], [1.0, 1.2, 1.5]);

        b.set_material(mat([0.5; 3], [0.7; 3], 0.4, 50.0));
        solid_box(b, [-6.0, 2.45, -4.5], [1.05, 0.06, 1.55]);

        b.set_material(mat([0.5, 0.08, 0.08], [0.7, 0.15, 0.15], 0.2, 30.0));
        for i in 0..5 {
            solid_box(b, [-5.5, 0.4 + i as f32 * 0.45, -4.5], [0.9, 0.2, 1.4]);
        }
    });
}

fn workbench_and_tyres(b: &mut MeshBuilder) {
    b.set_material(mat([0.4, 0.35, 0.3], [0.6, 0.5, 0.45], 0.1, 10.0));
    solid_box(b, [6.0, 1.1, -4.3], [1.2, 0.08, 1.5]);
    b.set_material(mat([0.35, 0.3, 0.25], [0.55, 0.45, 0.4], 0.1, 10.0));
    solid_box(b, [4.9, 0.55, -4.5], [0.08, 0.55, 1.4]);
    solid_box(b, [7.1, 0.55, -4.5], [0.08, 0.55, 1.4]);

    // Tyre rack
    b.set_material(STEEL);
    rod(b, [6.5, 2.0, 0.5], 0.05, 4.0, 8, [0.0; 3]);
    rod(b, [7.5, 2.0, 0.5], 0.05, 4.0, 8, [0.0; 3]);
    for i in 1..=4 {
        rod(b, [7.0, i as f32 * 0.8, 0.5], 0.05, 1.0, 8, [90.0, 0.0, -90.0]);
    }
    b.set_material(RUBBER);
    for i in 0..4 {
        rod(b, [7.0, 0.8 + i as f32 * 0.8, 0.5], 0.35, 0.25, 16, [90.0, 0.0, -90.0]);
    }
}

fn computer_desk(b: &mut MeshBuilder) {
    b.scoped(|b| {
        b.translate(-6.85, 0.0, 2.0);
        b.rotate_y(90.0);

        b.set_material(mat([0.15, 0.15, 0.17], [0.3, 0.3, 0.35], 0.2, 30.0));
        solid_box(b, [0.0, 0.8, 0.0], [1.0, 0.08, 1.0]);

        b.set_material(STEEL);
        for (x, z) in [(-0.8, -0.4), (-0.8, 0.4), (0.8, -0.4), (0.8, 0.4)] {
            rod(b, [x, 0.4, z], 0.04, 0.8, 6, [0.0; 3]);
        }

        // Monitor, bezel and screen stacked front to back
        b.set_material(mat([0.05; 3], [0.1; 3], 0.3, 40.0));
        solid_box(b, [0.0, 1.3, 0.0], [0.55, 0.4, 0.04]);
        b.set_material(mat([0.02; 3], [0.05; 3], 0.2, 50.0));
        solid_box(b, [0.0, 1.3, 0.04], [0.57, 0.42, 0.02]);
        b.set_material(Material::new([0.1, 0.3, 0.6], [0.2, 0.5, 1.0], [0.5, 0.7, 1.0], 60.0));
        solid_box(b, [0.0, 1.3, 0.055], [0.5, 0.35, 0.01]);

        b.set_material(mat([0.3, 0.3, 0.32], [0.5, 0.5, 0.52], 0.4, 50.0));
        solid_box(b, [0.0, 0.9, 0.0], [0.08, 0.06, 0.08]);
        rod(b, [0.0, 0.95, 0.0], 0.025, 0.28, 6, [0.0; 3]);

        b.set_material(mat([0.1, 0.1, 0.12], [0.2, 0.2, 0.22], 0.1, 20.0));
        solid_box(b, [0.0, 0.88, 0.45], [0.4, 0.025, 0.18]);
        b.set_material(mat([0.15, 0.15, 0.17], [0.25, 0.25, 0.27], 0.3, 40.0));
        solid_box(b, [0.7, 0.88, 0.25], [0.07, 0.02, 0.1]);
    });
}

fn team_poster(b: &mut MeshBuilder, livery: &Livery) {
    b.set_material(Material::new(
        livery.body.map(|c| c * 0.9),
        livery.body,
        [0.3; 3],
        40.0,
    ));
    solid_box(b, [0.0, 4.0, -5.95], [2.8, 1.4, 0.02]);

    b.set_material(mat([1.0; 3], [1.0; 3], 0.5, 60.0));
    solid_box(b, [0.0, 4.0, -5.93], [2.9, 1.5, 0.015]);

    b.set_material(livery.fin_paint());
    solid_box(b, [-0.9, 4.0, -5.9], [0.3, 1.0, 0.01]);
    solid_box(b, [0.9, 4.0, -5.9], [0.3, 1.0, 0.01]);
    solid_box(b, [0.0, 4.0, -5.9], [0.4, 0.7, 0.01]);
}

/// Pit board leaning on the left wall and the tool board on the right
fn wall_details(b: &mut MeshBuilder) {
    b.set_material(mat([1.0; 3], [1.0; 3], 0.2, 10.0));
    b.scoped(|b| {
        b.translate(-7.7, 1.0, -1.0);
        b.rotate_z(15.0);
        solid_box(b, [0.0; 3], [0.03, 0.7, 0.5]);
    });
    b.set_material(mat([0.3; 3], [0.5; 3], 0.2, 20.0));
    rod(b, [-7.7, 0.3, -1.0], 0.02, 0.7, 6, [0.0; 3]);

    b.set_material(mat([0.6, 0.5, 0.4], [0.8, 0.7, 0.6], 0.1, 10.0));
    solid_box(b, [7.95, 3.0, 3.0], [0.03, 1.5, 1.2]);
    b.set_material(Material::new([0.5, 0.5, 0.55], [0.8, 0.8, 0.85], [1.0; 3], 100.0));
    for i in 0..4 {
        let z = 2.2 + i as f32 * 0.5;
        rod(b, [7.9, 3.5, z], 0.02, 0.4, 6, [90.0, 0.0, 0.0]);
        rod(b, [7.9, 2.5, z], 0.02, 0.4, 6, [90.0, 0.0, 0.0]);
    }
}

/// Air compressor and the two jack stands
fn floor_equipment(b: &mut MeshBuilder) {
    b.set_material(mat([0.9, 0.5, 0.1], [1.0, 0.6, 0.2], 0.4, 40.0));
    solid_box(b, [5.5, 0.4, -1.5], [0.4, 0.4, 0.5]);
    rod(b, [5.5, 0.8, -1.5], 0.25, 0.6, 12, [0.0; 3]);
    b.set_material(mat([0.8; 3], [1.0; 3], 0.6, 70.0));
    rod(b, [5.5, 0.5, -1.5], 0.06, 0.025, 10, [90.0, 0.0, 0.0]);

    b.set_material(mat([0.9, 0.7, 0.1], [1.0, 0.8, 0.2], 0.5, 60.0));
    for (x, z) in [(-2.5, 1.8), (2.5, 1.5)] {
        b.scoped(|b| {
            b.translate(x, 0.0, z);
            solid_box(b, [0.0, 0.15, 0.0], [0.15; 3]);
            rod(b, [0.0, 0.28, 0.0], 0.04, 0.4, 6, [0.0; 3]);
            solid_box(b, [0.0, 0.5, 0.0], [0.12, 0.03, 0.12]);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn garage_mesh() -> crate::mesh::Mesh {
        let mut b = MeshBuilder::new();
        build(&mut b, &Livery::FERRARI);
        b.finish()
    }

    #[test]
    fn test_garage_extent() {
        let (lo, hi) = garage_mesh().bounds().unwrap();
        assert_relative_eq!(lo.x, -HALF_WIDTH, epsilon = 1e-3);
        assert_relative_eq!(hi.x, HALF_WIDTH, epsilon = 1e-3);
        // Only the pit board handle dips into the floor
        assert!(lo.y <= 0.0 && lo.y > -0.1);
        // Banner rises above the roof; the bracket marking sits out front
        assert!(hi.y > HEIGHT);
        assert!(hi.z > HALF_DEPTH);
    }

    #[test]
    fn test_floor_and_walls_are_concrete() {
        let mesh = garage_mesh();
        let concrete = mesh
            .vertices
            .iter()
            .filter(|v| v.texture == TextureSlot::Concrete.layer())
            .count();
        assert_eq!(concrete, 4 * 4);
    }

    #[test]
    fn test_parked_car_faces_the_door() {
        let mesh = garage_mesh();
        let body = Livery::FERRARI.body_paint();
        // Car body vertices with diffuse paint; the nose points toward +Z after the yaw
        let max_z = mesh
            .vertices
            .iter()
            .filter(|v| v.diffuse == body.diffuse && v.specular[3] == body.shininess)
            .map(|v| v.position[2])
            .fold(f32::MIN, f32::max);
        assert!(max_z > 2.5);
    }
}
