//! Paddock library - F1 circuit scene, car physics, weather and rendering

pub mod camera;
pub mod cli;
pub mod controls;
pub mod error;
pub mod lighting;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod texture;
pub mod vehicle;
pub mod weather;
