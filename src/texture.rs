//! Scene textures and skybox faces.
//!
//! Images are read from the assets directory when present. Anything missing
//! is generated procedurally so the demo always starts.

use std::path::Path;

use image::{imageops::FilterType, Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};

use crate::error::{Error, Result};
use crate::weather::TimeOfDay;

/// Layer of the scene texture array
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    White,
    Asphalt,
    Concrete,
    Grass,
    Bark,
    Bush,
    Pirelli,
    RedBull,
    Nvidia,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 9] = [
        TextureSlot::White,
        TextureSlot::Asphalt,
        TextureSlot::Concrete,
        TextureSlot::Grass,
        TextureSlot::Bark,
        TextureSlot::Bush,
        TextureSlot::Pirelli,
        TextureSlot::RedBull,
        TextureSlot::Nvidia,
    ];

    /// Sponsor boards cycled along barricaded straights
    pub const SPONSORS: [TextureSlot; 3] =
        [TextureSlot::Pirelli, TextureSlot::RedBull, TextureSlot::Nvidia];

    pub fn layer(self) -> u32 {
        self as u32
    }

    /// Asset file name, `None` for the built-in white layer
    pub fn file_name(self) -> Option<&'static str> {
        match self {
            TextureSlot::White => None,
            TextureSlot::Asphalt => Some("asphalt.bmp"),
            TextureSlot::Concrete => Some("concrete.bmp"),
            TextureSlot::Grass => Some("grass.bmp"),
            TextureSlot::Bark => Some("bark.bmp"),
            TextureSlot::Bush => Some("bush.bmp"),
            TextureSlot::Pirelli => Some("pirelli.bmp"),
            TextureSlot::RedBull => Some("redbull.bmp"),
            TextureSlot::Nvidia => Some("nvidia.bmp"),
        }
    }
}

/// Cube face order expected by the GPU: +X, -X, +Y, -Y, +Z, -Z
const FACE_PREFIXES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

fn skybox_file_name(face: usize, time: TimeOfDay) -> String {
    let suffix = match time {
        TimeOfDay::Day => "Morn",
        TimeOfDay::Night => "Night",
    };
    format!("{}{}.bmp", FACE_PREFIXES[face], suffix)
}

/// Load `file` from `dir` resized to `size`², or `None` when it does not exist
fn load_image(dir: &Path, file: &str, size: u32) -> Result<Option<RgbaImage>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let img = image::open(&path).map_err(|source| Error::Texture {
        path: path.clone(),
        source,
    })?;
    log::debug!("Loaded {}", path.display());
    Ok(Some(
        img.resize_exact(size, size, FilterType::Triangle)
            .into_rgba8(),
    ))
}

/// Load every scene texture layer, generating missing ones
pub fn load_scene_textures(dir: &Path, size: u32, seed: u32) -> Result<Vec<RgbaImage>> {
    let generator = TextureGenerator::new(seed);
    TextureSlot::ALL
        .iter()
        .map(|&slot| {
            let loaded = match slot.file_name() {
                Some(file) => load_image(dir, file, size)?,
                None => None,
            };
            Ok(loaded.unwrap_or_else(|| {
                if let Some(file) = slot.file_name() {
                    log::warn!("{} not found, using generated texture", file);
                }
                generator.scene_texture(slot, size)
            }))
        })
        .collect()
}

/// Load the six skybox faces for a time of day, generating missing ones
pub fn load_skybox(dir: &Path, time: TimeOfDay, size: u32, seed: u32) -> Result<Vec<RgbaImage>> {
    let generator = TextureGenerator::new(seed);
    (0..6)
        .map(|face| {
            let file = skybox_file_name(face, time);
            Ok(match load_image(dir, &file, size)? {
                Some(img) => img,
                None => {
                    log::warn!("{} not found, using generated sky", file);
                    generator.sky_face(face, time, size)
                }
            })
        })
        .collect()
}

/// Procedural stand-ins for the texture assets
pub struct TextureGenerator {
    perlin: Perlin,
}

impl TextureGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Fractal noise in roughly [-1, 1]
    fn fbm(&self, x: f64, y: f64, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            sum += self.perlin.get([x * freq, y * freq]) * amp;
            norm += amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        (sum / norm) as f32
    }

    fn fill(size: u32, mut f: impl FnMut(f64, f64) -> [f32; 3]) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let u = x as f64 / size as f64;
            let v = y as f64 / size as f64;
            let [r, g, b] = f(u, v);
            Rgba([to_byte(r), to_byte(g), to_byte(b), 255])
        })
    }

    pub fn scene_texture(&self, slot: TextureSlot, size: u32) -> RgbaImage {
        match slot {
            TextureSlot::White => Self::fill(size, |_, _| [1.0; 3]),
            TextureSlot::Asphalt => Self::fill(size, |u, v| {
                let grain = self.fbm(u * 64.0, v * 64.0, 3) * 0.12;
                let g = 0.32 + grain;
                [g, g, g * 1.02]
            }),
            TextureSlot::Concrete => Self::fill(size, |u, v| {
                let blotch = self.fbm(u * 8.0, v * 8.0, 4) * 0.08;
                let grain = self.fbm(u * 96.0 + 13.0, v * 96.0, 1) * 0.04;
                let g = 0.62 + blotch + grain;
                [g, g, g * 0.98]
            }),
            TextureSlot::Grass => Self::fill(size, |u, v| {
                let n = self.fbm(u * 24.0, v * 24.0, 4);
                [0.18 + n * 0.05, 0.45 + n * 0.12, 0.15 + n * 0.04]
            }),
            TextureSlot::Bark => Self::fill(size, |u, v| {
                let ridges = (self.fbm(u * 4.0, v * 32.0, 3) * 6.0).sin() * 0.08;
                [0.40 + ridges, 0.26 + ridges, 0.14 + ridges * 0.5]
            }),
            TextureSlot::Bush => Self::fill(size, |u, v| {
                let leaves = self.fbm(u * 40.0, v * 40.0, 2).abs();
                [0.15 + leaves * 0.1, 0.40 + leaves * 0.35, 0.12 + leaves * 0.08]
            }),
            TextureSlot::Pirelli => Self::sponsor_board(size, [1.0, 0.84, 0.0], [0.05, 0.05, 0.05]),
            TextureSlot::RedBull => Self::sponsor_board(size, [0.05, 0.12, 0.35], [0.85, 0.1, 0.15]),
            TextureSlot::Nvidia => Self::sponsor_board(size, [0.1, 0.1, 0.1], [0.46, 0.73, 0.0]),
        }
    }

    /// Two-tone board with a centred band, standing in for a sponsor logo
    fn sponsor_board(size: u32, background: [f32; 3], band: [f32; 3]) -> RgbaImage {
        Self::fill(size, |_, v| {
            if (0.35..0.65).contains(&v) {
                band
            } else {
                background
            }
        })
    }

    pub fn sky_face(&self, face: usize, time: TimeOfDay, size: u32) -> RgbaImage {
        Self::fill(size, |u, v| {
            let dir = cube_face_direction(face, u as f32, v as f32);
            let up = dir[1];
            match time {
                TimeOfDay::Day => {
                    let t = up.clamp(0.0, 1.0);
                    let horizon = [0.85, 0.88, 0.92];
                    let zenith = [0.30, 0.55, 0.90];
                    let ground = [0.45, 0.48, 0.45];
                    if up < 0.0 {
                        lerp3(horizon, ground, (-up).min(1.0))
                    } else {
                        let cloud = self
                            .fbm(dir[0] as f64 * 3.0 / (t as f64 + 0.2), dir[2] as f64 * 3.0 / (t as f64 + 0.2), 4)
                            .max(0.0)
                            * t
                            * 0.6;
                        lerp3(lerp3(horizon, zenith, t.sqrt()), [1.0; 3], cloud)
                    }
                }
                TimeOfDay::Night => {
                    let t = up.clamp(0.0, 1.0);
                    let base = lerp3([0.08, 0.09, 0.14], [0.01, 0.01, 0.04], t);
                    let star = self.perlin.get([
                        dir[0] as f64 * 180.0,
                        dir[1] as f64 * 180.0,
                        dir[2] as f64 * 180.0,
                    ]) as f32;
                    if up > 0.05 && star > 0.62 {
                        [0.9, 0.9, 1.0]
                    } else {
                        base
                    }
                }
            }
        })
    }
}

/// Direction through texel (u, v) of a cube face, matching the GPU cube layout
pub fn cube_face_direction(face: usize, u: f32, v: f32) -> [f32; 3] {
    let a = 2.0 * u - 1.0;
    let b = 2.0 * v - 1.0;
    let d = match face {
        0 => [1.0, -b, -a],
        1 => [-1.0, -b, a],
        2 => [a, 1.0, b],
        3 => [a, -1.0, -b],
        4 => [a, -b, 1.0],
        _ => [-a, -b, -1.0],
    };
    let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    [d[0] / len, d[1] / len, d[2] / len]
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
