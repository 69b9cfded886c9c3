//! The F1 car model.
//!
//! Built in car-local units: nose toward +X, ground at y=0, roughly 7 units
//! long. Scene code scales it down (0.2 on the circuit).

use super::Livery;
use crate::mesh::bezier::{self, QuadraticBezier, CURVE_SAMPLES};
use crate::mesh::primitives::{cylinder, rectangle, rod, solid_box, torus, trapezoid};
use crate::mesh::{Material, MeshBuilder};

/// Front wheels turn by this fraction of the steering angle
pub const WHEEL_STEER_RATIO: f32 = 0.4;

/// Height of the chassis origin above the ground
const RIDE_HEIGHT: f32 = 0.65;

const SUSPENSION: Material = Material::new([0.25, 0.25, 0.28], [0.4, 0.4, 0.43], [1.0; 3], 100.0);
const TYRE: Material = Material::new([0.01; 3], [0.05; 3], [0.1; 3], 5.0);
const BRAKE_LIGHT_OFF: Material = Material::new([0.3, 0.0, 0.0], [0.3, 0.0, 0.0], [0.1, 0.0, 0.0], 10.0);

fn brake_light_on() -> Material {
    Material::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.3, 0.3], 50.0).with_emission([1.0, 0.0, 0.0])
}

/// One tapered body section lying along X
fn body_section(b: &mut MeshBuilder, at: [f32; 3], pitch_deg: f32, top: [f32; 2], bottom: [f32; 2], length: f32) {
    b.scoped(|b| {
        b.translate(at[0], at[1], at[2]);
        b.rotate_z(pitch_deg);
        b.rotate_z(-90.0);
        trapezoid(b, top, bottom, length);
    });
}

/// Emit a complete car
///
/// # Arguments
/// * `livery` - Body, wing and halo colours
/// * `steering_deg` - Current steering angle; front wheels turn by `-0.4×` it
/// * `braking` - Lights the rear brake lamp
pub fn build(b: &mut MeshBuilder, livery: &Livery, steering_deg: f32, braking: bool) {
    let saved = b.material();
    b.push();
    b.translate(0.0, RIDE_HEIGHT, 0.0);

    b.set_material(livery.body_paint());
    body_section(b, [0.0, 0.0, 0.0], 0.0, [0.2, 0.2], [0.35, 0.35], 1.5);
    body_section(b, [1.45, 0.0, 0.0], -8.0, [0.12, 0.12], [0.21, 0.21], 1.0);
    body_section(b, [2.42, -0.12, 0.0], -15.0, [0.1, 0.1], [0.12, 0.12], 0.4);
    body_section(b, [-1.5, 0.0, 0.0], 0.0, [0.35, 0.35], [0.35, 1.0], 1.5);
    solid_box(b, [-2.25, 0.0, 0.0], [0.75, 0.35, 1.0]);
    body_section(b, [-4.0, 0.0, 0.0], 0.0, [0.35, 1.0], [0.35, 0.6], 1.0);
    solid_box(b, [-4.3, 0.0, 0.0], [0.6, 0.35, 0.6]);

    rear_wing(b, livery);

    b.set_material(if braking { brake_light_on() } else { BRAKE_LIGHT_OFF });
    solid_box(b, [-4.65, 0.5, 0.0], [0.08, 0.15, 0.1]);

    b.set_material(livery.fin_paint());
    rectangle(b, [2.4, -0.15, 0.6], 0.45, 1.5, [-90.0, 0.0, -18.0]);
    rectangle(b, [2.4, -0.15, -0.6], 0.45, 1.5, [-90.0, 0.0, 18.0]);

    suspension(b);
    wheels(b, steering_deg);

    b.set_material(livery.body_paint());
    b.scoped(|b| {
        b.translate(-3.7, 0.15, 0.0);
        b.rotate_y(180.0);
        b.scale(3.0, 2.2, 1.0);
        bezier::profile_line(b, &QuadraticBezier::cockpit(), CURVE_SAMPLES, 0.01);
        bezier::cockpit(b);
    });
    body_section(b, [-1.3, 0.5, 0.0], -25.0, [0.3, 0.3], [0.2, 0.2], 1.5);

    b.set_material(livery.halo_paint());
    b.scoped(|b| {
        b.translate(-1.8, 0.8, 0.0);
        b.rotate_x(90.0);
        b.rotate_y(-5.0);
        b.scale(1.4, 1.0, 0.5);
        torus(b, 0.4, 0.06, 32, 10, 150.0, -150.0);
    });
    rod(b, [-1.15, 0.36, 0.0], 0.04, 0.8, 4, [0.0, 0.0, 10.0]);

    b.pop();
    b.set_material(saved);
}

fn rear_wing(b: &mut MeshBuilder, livery: &Livery) {
    b.set_material(livery.fin_paint());
    let x = -4.4;
    // Main plane, then end plates and the two swept supports
    rectangle(b, [x, 1.06, 0.0], 0.45, 1.6, [-90.0, 0.0, 0.0]);
    rectangle(b, [x, 1.11, 0.8], 0.45, 0.1, [0.0; 3]);
    rectangle(b, [x, 1.11, -0.8], 0.45, 0.1, [0.0; 3]);
    rectangle(b, [x, 0.16, -0.39], 0.45, 1.0, [0.0; 3]);
    rectangle(b, [x, 0.16, 0.39], 0.45, 1.0, [0.0; 3]);
    rectangle(b, [x, 0.85, -0.6], 0.45, 0.62, [-45.0, 0.0, 0.0]);
    rectangle(b, [x, 0.85, 0.6], 0.45, 0.62, [45.0, 0.0, 0.0]);
}

fn suspension(b: &mut MeshBuilder) {
    b.set_material(SUSPENSION);
    for (x, y) in [(1.0, 0.11), (-4.0, 0.15)] {
        // Upper and lower arms on each side, splayed in opposite directions
        rod(b, [x, y, -0.175], 0.025, 2.8, 20, [90.0, 10.0, -10.0]);
        rod(b, [x, -y, -0.175], 0.025, 2.8, 20, [90.0, 10.0, 10.0]);
        rod(b, [x, y, 0.175], 0.025, 2.8, 20, [90.0, 10.0, 10.0]);
        rod(b, [x, -y, 0.175], 0.025, 2.8, 20, [90.0, 10.0, -10.0]);
    }

    // Airbox handle above the cockpit
    rod(b, [-2.2, 0.88, 0.0], 0.02, 0.38, 8, [0.0; 3]);
    rod(b, [-2.2, 1.06, 0.0], 0.02, 0.2, 8, [90.0, 0.0, 0.0]);
}

fn wheels(b: &mut MeshBuilder, steering_deg: f32) {
    b.set_material(TYRE);
    let wheel = |b: &mut MeshBuilder, x: f32, z: f32| {
        cylinder(b, [x, 0.0, z], 0.6, 0.6, 20, [90.0, 0.0, 0.0], [0.0, 0.0]);
    };
    for z in [-1.35, 1.35] {
        b.scoped(|b| {
            b.rotate_y(-steering_deg * WHEEL_STEER_RATIO);
            wheel(b, 1.0, z);
        });
        wheel(b, -4.0, z);
    }
}
