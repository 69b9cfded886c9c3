//! Scene assembly: which meshes make up each display mode.
//!
//! The static mesh is rebuilt only when the display mode changes. The
//! dynamic mesh (driven car, light marker, axes) is rebuilt every frame.

pub mod car;
pub mod circuit;
pub mod garage;
pub mod props;

use glam::Vec3;

use crate::mesh::primitives::{beam, sphere};
use crate::mesh::{Material, Mesh, MeshBuilder};
use crate::params::{LightingParams, OrbitPreset, RenderConfig};
use crate::vehicle::CarState;

/// The three team colours of a car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Livery {
    pub body: [f32; 3],
    pub fins: [f32; 3],
    pub halo: [f32; 3],
}

impl Livery {
    pub const FERRARI: Self = Self {
        body: [0.9, 0.0, 0.0],
        fins: [0.0, 0.0, 0.0],
        halo: [0.0, 0.0, 0.0],
    };

    pub const MCLAREN: Self = Self {
        body: [1.0, 0.5, 0.0],
        fins: [0.0, 0.4, 0.75],
        halo: [0.0, 0.4, 0.75],
    };

    pub const MERCEDES: Self = Self {
        body: [0.0, 0.85, 0.75],
        fins: [0.05, 0.05, 0.05],
        halo: [0.05, 0.05, 0.05],
    };

    pub const RED_BULL: Self = Self {
        body: [0.0, 0.15, 0.45],
        fins: [1.0, 0.9, 0.0],
        halo: [1.0, 0.9, 0.0],
    };

    pub const ASTON_MARTIN: Self = Self {
        body: [0.0, 0.35, 0.25],
        fins: [0.0, 0.8, 0.4],
        halo: [0.9, 0.75, 0.3],
    };

    pub fn body_paint(&self) -> Material {
        Material::paint(self.body, 1.3, 1.0, 100.0)
    }

    pub fn fin_paint(&self) -> Material {
        Material::paint(self.fins, 1.2, 0.8, 80.0)
    }

    pub fn halo_paint(&self) -> Material {
        Material::paint(self.halo, 1.4, 1.2, 120.0)
    }
}

/// What the static mesh shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Circuit,
    Garage,
    Car,
}

impl DisplayMode {
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Circuit => DisplayMode::Garage,
            DisplayMode::Garage => DisplayMode::Car,
            DisplayMode::Car => DisplayMode::Circuit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Circuit => "F1 Racing Circuit",
            DisplayMode::Garage => "F1 Garage",
            DisplayMode::Car => "F1 Car",
        }
    }

    /// Orbit camera applied when this mode is entered
    pub fn preset(self) -> OrbitPreset {
        match self {
            DisplayMode::Circuit => OrbitPreset::CIRCUIT,
            DisplayMode::Garage => OrbitPreset::GARAGE,
            DisplayMode::Car => OrbitPreset::CAR,
        }
    }

    /// Only the circuit can be driven
    pub fn is_drivable(self) -> bool {
        self == DisplayMode::Circuit
    }
}

/// World X offset applied to the circuit layout
pub const CIRCUIT_OFFSET: f32 = -15.0;

/// Scale of cars placed on the circuit
pub const CAR_SCALE: f32 = 0.2;

/// Livery of the driven car
pub const DRIVEN_LIVERY: Livery = Livery::MCLAREN;

/// Parked grid cars (world x, z) and their liveries
const PARKED_CARS: [([f32; 2], Livery); 4] = [
    ([6.0, -1.0], Livery::FERRARI),
    ([2.0, -1.0], Livery::MERCEDES),
    ([0.0, 1.0], Livery::RED_BULL),
    ([-2.0, -1.0], Livery::ASTON_MARTIN),
];

/// Grid slot markings, one per car including the driven car's start slot
const GRID_SLOTS: [[f32; 2]; 5] = [[6.0, -1.0], [4.0, 1.0], [2.0, -1.0], [0.0, 1.0], [-2.0, -1.0]];

const START_GANTRY: Vec3 = Vec3::new(12.0, 0.0, -3.0);
const CAMERA_GANTRY: Vec3 = Vec3::new(-10.0, 0.0, -3.0);
const GANTRY_HEIGHT: f32 = 3.0;
const GANTRY_WIDTH: f32 = 5.5;
const GANTRY_UNIT: f32 = 0.5;

/// World X of the chequered start/finish line
pub const START_LINE_X: f32 = 7.5;

fn driven_car(state: &CarState) -> Mesh {
    let mut b = MeshBuilder::new();
    b.translate(state.position.x, state.position.y, state.position.z);
    b.rotate_y(state.heading_deg);
    b.uniform_scale(CAR_SCALE);
    car::build(&mut b, &DRIVEN_LIVERY, state.steering_deg, state.braking);
    b.finish()
}

/// Unlit white used for the light marker and axes
fn marker_material() -> Material {
    Material::new([0.0; 3], [0.0; 3], [0.0; 3], 1.0).with_emission([1.0; 3])
}

/// Per-frame inputs to the dynamic mesh
#[derive(Debug, Clone, Copy)]
pub struct DynamicScene<'a> {
    pub mode: DisplayMode,
    pub car: &'a CarState,
    /// Light position; `None` hides the marker (lighting off)
    pub light: Option<Vec3>,
    pub axes: bool,
}

/// Builds the static and per-frame meshes
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    axes_length: f32,
    marker_radius: f32,
}

impl SceneBuilder {
    pub fn new(config: &RenderConfig, lighting: &LightingParams) -> Self {
        Self {
            axes_length: config.axes_length,
            marker_radius: lighting.marker_radius,
        }
    }

    /// Geometry that only changes with the display mode
    pub fn build_static(&self, mode: DisplayMode) -> Mesh {
        let mut b = MeshBuilder::new();
        match mode {
            DisplayMode::Circuit => self.circuit_scene(&mut b),
            DisplayMode::Garage => garage::build(&mut b, &Livery::FERRARI),
            DisplayMode::Car => car::build(&mut b, &Livery::FERRARI, 0.0, false),
        }
        let mesh = b.finish();
        log::debug!(
            "{} static mesh: {} vertices, {} triangles",
            mode.label(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        if let Some((lo, hi)) = mesh.bounds() {
            log::debug!("{} extent: {lo} to {hi}", mode.label());
        }
        mesh
    }

    fn circuit_scene(&self, b: &mut MeshBuilder) {
        b.scoped(|b| {
            b.translate(START_GANTRY.x, START_GANTRY.y, START_GANTRY.z);
            props::support_gantry(
                b,
                GANTRY_HEIGHT,
                GANTRY_WIDTH,
                GANTRY_UNIT,
                props::GantryKind::TrafficLights,
            );
        });
        b.scoped(|b| {
            b.translate(CAMERA_GANTRY.x, CAMERA_GANTRY.y, CAMERA_GANTRY.z);
            props::support_gantry(
                b,
                GANTRY_HEIGHT,
                GANTRY_WIDTH,
                GANTRY_UNIT,
                props::GantryKind::TvCamera,
            );
        });

        b.scoped(|b| {
            b.translate(CIRCUIT_OFFSET, 0.0, 0.0);
            circuit::build(b, &Livery::FERRARI);
        });

        b.scoped(|b| {
            b.translate(START_LINE_X, 0.0, 0.0);
            props::start_finish_line(b, 4.0, 16);
        });

        for [x, z] in GRID_SLOTS {
            b.scoped(|b| {
                b.translate(x, 0.0, z);
                props::grid_marking(b);
            });
        }
        for ([x, z], livery) in PARKED_CARS {
            b.scoped(|b| {
                b.translate(x, 0.0, z);
                b.uniform_scale(CAR_SCALE);
                car::build(b, &livery, 0.0, false);
            });
        }
    }

    /// Geometry rebuilt every frame
    pub fn build_dynamic(&self, scene: &DynamicScene) -> Mesh {
        let mut mesh = if scene.mode.is_drivable() {
            driven_car(scene.car)
        } else {
            Mesh::new()
        };
        mesh.append(&self.overlay(scene));
        mesh
    }

    /// Light marker and axes, drawn unlit
    fn overlay(&self, scene: &DynamicScene) -> Mesh {
        let mut b = MeshBuilder::new();
        b.set_material(marker_material());
        if let Some(light) = scene.light {
            sphere(&mut b, light.to_array(), self.marker_radius, 10);
        }
        if scene.axes {
            self.axes(&mut b);
        }
        b.finish()
    }

    fn axes(&self, b: &mut MeshBuilder) {
        let len = self.axes_length;
        let thickness = len * 0.005;
        let glyph = len * 0.05;
        for (axis, letter) in [(Vec3::X, 'X'), (Vec3::Y, 'Y'), (Vec3::Z, 'Z')] {
            let tip = axis * len;
            beam(b, Vec3::ZERO, tip, thickness);
            b.scoped(|b| {
                b.translate(tip.x, tip.y, tip.z);
                props::axis_glyph(b, letter, glyph, thickness);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SceneBuilder {
        SceneBuilder::new(&RenderConfig::default(), &LightingParams::default())
    }

    #[test]
    fn test_mode_cycle() {
        let mut mode = DisplayMode::default();
        let mut seen = vec![];
        for _ in 0..3 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, DisplayMode::Circuit);
        assert_eq!(
            seen,
            vec![DisplayMode::Circuit, DisplayMode::Garage, DisplayMode::Car]
        );
    }

    #[test]
    fn test_mode_presets() {
        assert_eq!(DisplayMode::Circuit.preset().dim, 6.0);
        assert_eq!(DisplayMode::Garage.preset().azimuth_deg, -25);
        assert_eq!(DisplayMode::Car.preset().elevation_deg, 15);
        assert!(DisplayMode::Circuit.is_drivable());
        assert!(!DisplayMode::Garage.is_drivable());
    }

    #[test]
    fn test_static_meshes_grow_with_content() {
        let scenes = builder();
        let car = scenes.build_static(DisplayMode::Car).vertex_count();
        let garage = scenes.build_static(DisplayMode::Garage).vertex_count();
        let circuit = scenes.build_static(DisplayMode::Circuit).vertex_count();
        assert!(car > 0);
        assert!(garage > car);
        assert!(circuit > garage * 5);
    }

    #[test]
    fn test_dynamic_car_only_on_circuit() {
        let scenes = builder();
        let car = CarState::default();
        let mut scene = DynamicScene {
            mode: DisplayMode::Circuit,
            car: &car,
            light: None,
            axes: false,
        };
        let on_circuit = scenes.build_dynamic(&scene);
        assert!(!on_circuit.is_empty());
        let (lo, hi) = on_circuit.bounds().unwrap();
        // Scaled car around its start slot
        assert!(lo.x < 4.0 && hi.x > 4.0);
        assert!(hi.x - lo.x < 2.0);

        scene.mode = DisplayMode::Garage;
        assert!(scenes.build_dynamic(&scene).is_empty());
    }

    #[test]
    fn test_light_marker_and_axes_are_unlit() {
        let scenes = builder();
        let car = CarState::default();
        let scene = DynamicScene {
            mode: DisplayMode::Car,
            car: &car,
            light: Some(Vec3::new(0.0, 4.0, 6.0)),
            axes: true,
        };
        let mesh = scenes.build_dynamic(&scene);
        assert!(!mesh.is_empty());
        assert!(mesh.vertices.iter().all(|v| v.emission == [1.0; 3]));
        let (_, hi) = mesh.bounds().unwrap();
        assert!(hi.y >= 4.0);
    }

    #[test]
    fn test_driven_car_turns_with_heading() {
        let scenes = builder();
        let car = CarState {
            heading_deg: 90.0,
            ..Default::default()
        };
        let mesh = scenes.build_dynamic(&DynamicScene {
            mode: DisplayMode::Circuit,
            car: &car,
            light: None,
            axes: false,
        });
        let (lo, hi) = mesh.bounds().unwrap();
        // Facing -Z the car is longer in Z than in X
        assert!(hi.z - lo.z > hi.x - lo.x);
    }

    #[test]
    fn test_overlay_follows_car_in_one_mesh() {
        let scenes = builder();
        let car = CarState::default();
        let mut scene = DynamicScene {
            mode: DisplayMode::Circuit,
            car: &car,
            light: None,
            axes: false,
        };
        let car_only = scenes.build_dynamic(&scene);
        scene.light = Some(Vec3::new(0.0, 4.0, 6.0));
        let mesh = scenes.build_dynamic(&scene);

        let n = car_only.vertex_count();
        assert!(mesh.vertex_count() > n);
        assert_eq!(mesh.indices[..car_only.indices.len()], car_only.indices[..]);
        assert!(mesh.indices[car_only.indices.len()..]
            .iter()
            .all(|&i| (i as usize) >= n && (i as usize) < mesh.vertex_count()));
        assert!(mesh.vertices[n..].iter().all(|v| v.emission == [1.0; 3]));
    }
}
