//! Parameter definitions with units and documented semantics.
//!
//! World units are "track units": the start straight is 4 units wide and a
//! car at grid scale is roughly 1.4 units long.
//! All magic numbers are extracted here with:
//! - Units (track units, degrees, seconds)
//! - Documented ranges and meanings
//! - Type safety where possible

mod camera;
mod car;
mod lighting;
mod render;
mod weather;

// Re-export all types
pub use camera::{ChaseCamera, OrbitPreset};
pub use car::CarPhysics;
pub use lighting::LightingParams;
pub use render::RenderConfig;
pub use weather::{FogParams, RainParams};
