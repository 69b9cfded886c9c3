//! Trackside props: tyre walls, sponsor barricades, gantries, start lights,
//! TV camera, grandstand, trees and track markings.

use glam::{Vec2, Vec3};

use crate::mesh::primitives::{
    beam, cube, cylinder, prism, rod, solid_box, sphere, textured_rectangle,
};
use crate::mesh::{Material, MeshBuilder};
use crate::texture::TextureSlot;

/// Tyre colours used along a barrier row, five stacks each
pub const TYRE_COLOURS: [[f32; 3]; 3] = [[0.9, 0.1, 0.1], [1.0, 1.0, 0.2], [0.2, 0.4, 0.9]];

/// Tyres per stack
pub const TYRES_PER_STACK: u32 = 4;

const STEEL_GREY: Material = Material::new([0.3; 3], [0.5; 3], [0.3; 3], 40.0);
const POST_GREY: Material = Material::new([0.6; 3], [0.7; 3], [0.9; 3], 80.0);
const GLOW_RED: [f32; 3] = [0.8, 0.0, 0.0];

fn signal_red() -> Material {
    Material::new([0.3, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.5, 0.5], 100.0).with_emission(GLOW_RED)
}

/// Flat rectangle on the ground plane, facing up
pub fn ground_rect(b: &mut MeshBuilder, x: [f32; 2], z: [f32; 2], y: f32) {
    b.flat_quad(
        [
            Vec3::new(x[0], y, z[0]),
            Vec3::new(x[0], y, z[1]),
            Vec3::new(x[1], y, z[1]),
            Vec3::new(x[1], y, z[0]),
        ],
        Vec3::Y,
    );
}

/// Square-bracket shaped ground marking opening toward -X
///
/// `inner_x` is where the two short arms begin; the back bar sits at
/// x 5.0..5.2 and the arms at |z| 2.0..2.5.
pub fn bracket_marking(b: &mut MeshBuilder, inner_x: f32) {
    ground_rect(b, [inner_x, 5.2], [2.0, 2.5], 0.01);
    ground_rect(b, [inner_x, 5.2], [-2.5, -2.0], 0.01);
    ground_rect(b, [5.0, 5.2], [-2.5, 2.5], 0.01);
}

/// White grid-slot marking in front of a parked car
pub fn grid_marking(b: &mut MeshBuilder) {
    let saved = b.material();
    b.set_material(Material::new([1.0; 3], [1.0; 3], [0.3; 3], 30.0));
    b.scoped(|b| {
        b.uniform_scale(0.3);
        bracket_marking(b, 4.4);
    });
    b.set_material(saved);
}

/// A stack of tyres lying flat
pub fn tyre_stack(b: &mut MeshBuilder, count: u32, color: [f32; 3]) {
    let wall = Material::new(color.map(|c| c * 0.3), color, [0.1; 3], 10.0);
    let hole = Material::new([0.05; 3], [0.1; 3], [0.05; 3], 5.0);
    for i in 0..count {
        b.scoped(|b| {
            b.translate(0.0, 0.15 + i as f32 * 0.28, 0.0);
            b.rotate_x(90.0);
            b.set_material(wall);
            rod(b, [0.0; 3], 0.3, 0.25, 16, [90.0, 0.0, 0.0]);
            b.set_material(hole);
            rod(b, [0.0; 3], 0.15, 0.26, 12, [90.0, 0.0, 0.0]);
        });
    }
}

/// Row of tyre stacks along +X, colour changing every five stacks
pub fn tyre_barrier_row(b: &mut MeshBuilder, count: u32, spacing: f32) {
    for i in 0..count {
        let color = TYRE_COLOURS[(i as usize / 5) % TYRE_COLOURS.len()];
        b.scoped(|b| {
            b.translate(i as f32 * spacing, 0.0, 0.0);
            tyre_stack(b, TYRES_PER_STACK, color);
        });
    }
}

/// Sponsor barricade: two posts with braces, a textured board and wires
///
/// Runs one unit along +Z from the origin, board facing ±X.
pub fn barricade(b: &mut MeshBuilder, sponsor: TextureSlot) {
    let saved = b.material();
    b.push();
    b.uniform_scale(0.33);
    b.translate(0.0, 1.5, 0.0);

    b.set_material(POST_GREY);
    for z in [0.0, 3.0] {
        b.scoped(|b| {
            b.translate(0.0, 0.0, z);
            b.scoped(|b| {
                b.rotate_x(90.0);
                prism(b, 0.1, 0.1, 3.0);
            });
            b.scoped(|b| {
                b.translate(0.38, 1.78, 0.0);
                b.rotate_x(90.0);
                b.rotate_y(-50.0);
                prism(b, 0.1, 0.1, 1.0);
            });
        });
    }

    b.set_material(Material::new([0.5; 3], [0.9; 3], [0.3; 3], 20.0).with_texture(sponsor));
    textured_rectangle(b, [0.0, -0.75, 1.5], 3.0, 1.5, [0.0, 90.0, 0.0], [1.0, 1.0]);

    b.set_material(POST_GREY);
    let wires = 8;
    let spacing = 1.4 / wires as f32;
    for i in 1..=wires {
        let y = i as f32 * spacing;
        beam(b, Vec3::new(0.0, y, 0.0), Vec3::new(0.0, y, 3.0), 0.02);
    }

    b.pop();
    b.set_material(saved);
}

/// Unit lattice cube of thin struts, spanning x and z 0..1 and y 0..1
pub fn frame_box(b: &mut MeshBuilder) {
    const R: f32 = 0.05;
    b.scoped(|b| {
        b.translate(0.0, 0.5, 0.0);
        for (x, z) in [(0.0, 1.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            rod(b, [x, 0.0, z], R, 1.1, 4, [0.0; 3]);
        }
        for y in [0.5, -0.5] {
            rod(b, [0.5, y, 1.0], R, 1.0, 4, [0.0, 0.0, 90.0]);
            rod(b, [0.0, y, 0.5], R, 1.0, 4, [90.0, 0.0, 0.0]);
            rod(b, [0.5, y, 0.0], R, 1.0, 4, [0.0, 0.0, 90.0]);
            rod(b, [1.0, y, 0.5], R, 1.0, 4, [90.0, 0.0, 0.0]);
        }
        for x in [0.0, 1.0] {
            rod(b, [x, 0.0, 0.5], R, 1.42, 4, [45.0, 0.0, 0.0]);
            rod(b, [x, 0.0, 0.5], R, 1.42, 4, [-45.0, 0.0, 0.0]);
        }
    });
}

/// What hangs from a support gantry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GantryKind {
    /// Three start-light housings across the middle of the span
    TrafficLights,
    /// A broadcast camera on top of the far leg
    TvCamera,
}

/// Multiples of `unit` from 0 while below `limit` (or up to it when `inclusive`)
fn lattice_steps(limit: f32, unit: f32, inclusive: bool) -> impl Iterator<Item = f32> {
    let slack = if inclusive { unit * 1e-3 } else { -unit * 1e-3 };
    (0..)
        .map(move |i| i as f32 * unit)
        .take_while(move |&v| v <= limit + slack)
}

/// Lattice gantry: two legs `height` tall, `width` apart along +Z, joined
/// by a top span
pub fn support_gantry(b: &mut MeshBuilder, height: f32, width: f32, unit: f32, kind: GantryKind) {
    let saved = b.material();
    match kind {
        GantryKind::TrafficLights => {
            for dz in [1.0, 0.0, -1.0] {
                b.scoped(|b| {
                    b.translate(0.0, height, width / 2.0 + dz);
                    b.uniform_scale(0.16);
                    traffic_light(b);
                });
            }
        }
        GantryKind::TvCamera => b.scoped(|b| {
            b.translate(0.0, height + unit * 1.5, width);
            b.rotate_y(-8.0);
            b.rotate_z(10.0);
            b.uniform_scale(0.3);
            tv_camera(b);
        }),
    }

    b.set_material(STEEL_GREY);
    let lattice = |b: &mut MeshBuilder, at: Vec3| {
        b.scoped(|b| {
            b.translate(at.x, at.y, at.z);
            b.uniform_scale(unit);
            frame_box(b);
        });
    };
    for y in lattice_steps(height, unit, false) {
        lattice(b, Vec3::new(0.0, y, 0.0));
        lattice(b, Vec3::new(0.0, y, width));
    }
    for z in lattice_steps(width, unit, true) {
        lattice(b, Vec3::new(0.0, height, z));
    }
    b.set_material(saved);
}

/// Start-light housing with three glowing red lamps on its -X face
pub fn traffic_light(b: &mut MeshBuilder) {
    b.set_material(Material::new([0.1; 3], [0.1; 3], [0.3; 3], 10.0));
    cube(b, [0.0; 3], [1.0, 3.0, 1.0], 0.0, [0.0, 0.0]);
    b.set_material(signal_red());
    for y in [1.5, 0.0, -1.5] {
        sphere(b, [-0.5, y, 0.0], 0.8, 15);
    }
}

/// Broadcast camera, lens toward -X
pub fn tv_camera(b: &mut MeshBuilder) {
    b.set_material(Material::new([0.15; 3], [0.3; 3], [0.6; 3], 60.0));
    solid_box(b, [0.0; 3], [0.9, 0.5, 0.6]);
    b.set_material(Material::new([0.15; 3], [0.3; 3], [0.8, 0.7, 0.8], 60.0));
    solid_box(b, [0.0; 3], [0.8, 0.6, 0.7]);

    let chrome = Material::new([0.3; 3], [0.5; 3], [0.9; 3], 100.0);
    b.set_material(chrome);
    rod(b, [-1.0, 0.0, 0.0], 0.2, 0.5, 20, [0.0, 0.0, 90.0]);
    b.set_material(Material::new([0.05; 3], [0.2; 3], [0.4; 3], 40.0));
    rod(b, [-1.6, 0.0, 0.0], 0.4, 0.6, 20, [0.0; 3]);

    b.set_material(chrome);
    b.scoped(|b| {
        b.translate(0.5, -0.5, 0.0);
        b.rotate_z(90.0);
        rod(b, [0.0; 3], 0.15, 2.0, 20, [0.0, 0.0, 90.0]);
    });

    b.set_material(Material::new([0.2, 0.25, 0.3], [0.3, 0.4, 0.5], [0.95, 0.98, 1.0], 128.0));
    sphere(b, [-1.75, 0.0, 0.0], 0.28, 15);

    // Tally light
    b.set_material(signal_red());
    solid_box(b, [-0.65, 0.65, 0.35], [0.04; 3]);
}

/// Concrete stand block with rows of windows on its front and back faces
///
/// `base` is the centre of the footprint at ground level.
pub fn grandstand(b: &mut MeshBuilder, base: Vec3, width: f32, height: f32, depth: f32) {
    const ROWS: u32 = 5;
    const COLS: u32 = 6;
    const INSET: f32 = 0.01;

    let saved = b.material();
    b.set_material(
        Material::new([0.14; 3], [0.6; 3], [0.2; 3], 10.0).with_texture(TextureSlot::Concrete),
    );
    cube(
        b,
        [base.x, base.y + height / 2.0, base.z],
        [width / 2.0, height / 2.0, depth / 2.0],
        0.0,
        [width / 2.0, height / 2.0],
    );

    b.set_material(Material::new([0.1, 0.2, 0.4], [0.2, 0.4, 0.8], [0.5; 3], 80.0));
    let (cell_w, cell_h) = (width / COLS as f32, height / ROWS as f32);
    let (hw, hh) = (cell_w * 0.3, cell_h * 0.3);
    for i in 0..COLS {
        for j in 0..ROWS {
            let x = base.x - width / 2.0 + (i as f32 + 0.5) * cell_w;
            let y = base.y + (j as f32 + 0.5) * cell_h;
            for (side, n) in [(1.0, Vec3::Z), (-1.0, Vec3::NEG_Z)] {
                let z = base.z + side * (depth / 2.0 + INSET);
                b.flat_quad(
                    [
                        Vec3::new(x - hw, y - hh, z),
                        Vec3::new(x + hw, y - hh, z),
                        Vec3::new(x + hw, y + hh, z),
                        Vec3::new(x - hw, y + hh, z),
                    ],
                    n,
                );
            }
        }
    }
    b.set_material(saved);
}

/// Bark trunk with a three-cube canopy; `base` is the foot of the trunk
pub fn tree(b: &mut MeshBuilder, base: Vec3, scale: f32) {
    let saved = b.material();
    b.set_material(
        Material::new([0.08, 0.04, 0.02], [0.4, 0.2, 0.1], [0.05; 3], 2.0)
            .with_texture(TextureSlot::Bark),
    );
    cylinder(
        b,
        [base.x, base.y + 0.3 * scale, base.z],
        0.1 * scale,
        0.6 * scale,
        8,
        [0.0; 3],
        [1.0, 1.0],
    );

    b.set_material(
        Material::new([0.1, 0.2, 0.1], [0.4, 0.8, 0.4], [0.1, 0.2, 0.1], 10.0)
            .with_texture(TextureSlot::Bush),
    );
    b.scoped(|b| {
        b.translate(base.x, base.y + 0.7 * scale, base.z);
        b.uniform_scale(0.4 * scale);
        cube(b, [0.0; 3], [1.0; 3], 0.0, [1.0, 1.0]);
        cube(b, [0.0, 0.3, 0.0], [0.8; 3], 0.0, [1.0, 1.0]);
        cube(b, [0.0, -0.3, 0.0], [0.8; 3], 0.0, [1.0, 1.0]);
    });
    b.set_material(saved);
}

/// Two-row chequered line across a track running along X
///
/// Centred on the origin, spanning `track_width` in Z and `2 × square` in X.
pub fn start_finish_line(b: &mut MeshBuilder, track_width: f32, squares: u32) {
    if squares == 0 {
        return;
    }
    let white = Material::new([0.2; 3], [1.0; 3], [0.2; 3], 10.0);
    let black = Material::new([0.0; 3], [0.0; 3], [0.05; 3], 5.0);
    let saved = b.material();
    let size = track_width / squares as f32;
    for row in 0..2u32 {
        let x0 = (row as f32 - 1.0) * size;
        for i in 0..squares {
            b.set_material(if (i + row) % 2 == 0 { white } else { black });
            let z0 = -track_width / 2.0 + i as f32 * size;
            ground_rect(b, [x0, x0 + size], [z0, z0 + size], 0.012);
        }
    }
    b.set_material(saved);
}

/// Thin-bar glyph for an axis label (`'X'`, `'Y'` or `'Z'`), standing in
/// the XY plane with its lower-left corner at the origin
pub fn axis_glyph(b: &mut MeshBuilder, letter: char, size: f32, thickness: f32) {
    let p = |x: f32, y: f32| Vec3::new(x * size, y * size, 0.0);
    let strokes: &[(Vec2, Vec2)] = match letter {
        'X' => &[
            (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
            (Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)),
        ],
        'Y' => &[
            (Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.5)),
            (Vec2::new(1.0, 1.0), Vec2::new(0.5, 0.5)),
            (Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.0)),
        ],
        'Z' => &[
            (Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)),
            (Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
        ],
        _ => &[],
    };
    for (a, c) in strokes {
        beam(b, p(a.x, a.y), p(c.x, c.y), thickness);
    }
}
