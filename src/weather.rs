//! Day/night state, night fog and the rain particle field.
//!
//! Rain drops are scattered once on the CPU and animated entirely on the
//! GPU from a shared clock; `drop_position` and `splash_phase` compute the
//! same motion on the CPU so it can be checked without a device.

use bytemuck::{Pod, Zeroable};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::camera::ViewMode;
use crate::params::{FogParams, RainParams};

/// Time of day, selects skybox, light levels, fog and rain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    pub fn toggle(self) -> Self {
        match self {
            TimeOfDay::Day => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Day,
        }
    }

    pub fn is_night(self) -> bool {
        self == TimeOfDay::Night
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Day => "Day",
            TimeOfDay::Night => "Night",
        }
    }
}

/// How fog density grows with eye distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FogMode {
    Off,
    /// Fully clear at `start`, fully fogged at `end`
    Linear { start: f32, end: f32 },
    /// `exp(-(density * d)^2)`
    Exp2 { density: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub mode: FogMode,
}

impl Fog {
    /// Fog for the current time of day and view: none by day, linear in the
    /// orbit view and exponential-squared in the chase view at night
    pub fn select(params: &FogParams, time: TimeOfDay, view: ViewMode) -> Self {
        let mode = match (time, view) {
            (TimeOfDay::Day, _) => FogMode::Off,
            (TimeOfDay::Night, ViewMode::Orbit) => FogMode::Linear {
                start: params.linear_start,
                end: params.linear_end,
            },
            (TimeOfDay::Night, ViewMode::Chase) => FogMode::Exp2 {
                density: params.exp2_density,
            },
        };
        Self {
            color: params.color,
            mode,
        }
    }

    /// Fraction of the surface colour that survives at `distance` (1 = clear)
    pub fn factor(&self, distance: f32) -> f32 {
        let f = match self.mode {
            FogMode::Off => 1.0,
            FogMode::Linear { start, end } => {
                if end <= start {
                    if distance < end {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    (end - distance) / (end - start)
                }
            }
            FogMode::Exp2 { density } => (-(density * distance).powi(2)).exp(),
        };
        f.clamp(0.0, 1.0)
    }

    /// Packed for the shader: `[mode, start, end, density]`, mode 0/1/2
    pub fn packed(&self) -> [f32; 4] {
        match self.mode {
            FogMode::Off => [0.0, 0.0, 0.0, 0.0],
            FogMode::Linear { start, end } => [1.0, start, end, 0.0],
            FogMode::Exp2 { density } => [2.0, 0.0, 0.0, density],
        }
    }
}

/// One rain drop (instance data)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RainDrop {
    pub offset_x: f32,
    pub offset_z: f32,
    pub speed: f32,
    pub length: f32,
}

impl RainDrop {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RainDrop>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    /// Per-drop phase offset in [0, 1) so drops don't fall in lockstep
    ///
    /// The shader uses the same hash.
    pub fn phase(&self) -> f32 {
        let h = (self.offset_x * 12.9898 + self.offset_z * 78.233).sin() * 43758.547;
        h - h.floor()
    }
}

/// Scattered drops plus the shared rain clock
pub struct RainField {
    pub params: RainParams,
    pub drops: Vec<RainDrop>,
    pub time: f32,
}

impl RainField {
    /// Scatter `params.drop_count` drops uniformly over the rain square
    pub fn new(params: RainParams, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = params.area * 0.5;
        let (speed_lo, speed_hi) = params.speed_range;
        let (len_lo, len_hi) = params.length_range;

        let drops = (0..params.drop_count)
            .map(|_| RainDrop {
                offset_x: rng.gen_range(-1.0f32..=1.0) * half,
                offset_z: rng.gen_range(-1.0f32..=1.0) * half,
                speed: speed_lo + rng.gen::<f32>() * (speed_hi - speed_lo),
                length: len_lo + rng.gen::<f32>() * (len_hi - len_lo),
            })
            .collect();

        Self {
            params,
            drops,
            time: 0.0,
        }
    }

    /// One physics tick of the rain clock
    pub fn advance(&mut self) {
        self.time += self.params.time_step;
        if self.time > self.params.time_wrap {
            self.time = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

// CPU copies of the motion in rain.wgsl. The GPU animates the drops; these
// exist so the motion can be checked without a device.

/// Progress through the current fall, 0 at the top and 1 at the ground
pub fn fall_cycle(p: &RainParams, drop: &RainDrop, time: f32) -> f32 {
    let c = time * drop.speed / p.height + drop.phase();
    c - c.floor()
}

/// Head of the streak at `time`
pub fn drop_position(p: &RainParams, drop: &RainDrop, time: f32) -> [f32; 3] {
    let cycle = fall_cycle(p, drop, time);
    let y = p.height - cycle * p.height;
    let fallen = p.height - y;

    let swirl = p.turbulence_freq * cycle + time * p.turbulence_speed;
    let x = drop.offset_x + p.wind_strength * fallen + p.turbulence_amp * (swirl + drop.offset_z).sin();
    let z = drop.offset_z + p.turbulence_amp * (swirl + drop.offset_x).cos();
    [x, y, z]
}

/// Where the drop lands (end of its fall, full wind drift)
pub fn impact_point(p: &RainParams, drop: &RainDrop) -> [f32; 2] {
    [drop.offset_x + p.wind_strength * p.height, drop.offset_z]
}

/// Splash progress in [0, 1) during the short window after impact
pub fn splash_phase(p: &RainParams, drop: &RainDrop, time: f32) -> Option<f32> {
    if p.splash_duration <= 0.0 {
        return None;
    }
    let cycle = fall_cycle(p, drop, time);
    (cycle < p.splash_duration).then(|| cycle / p.splash_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drop_at(x: f32, z: f32) -> RainDrop {
        RainDrop {
            offset_x: x,
            offset_z: z,
            speed: 8.0,
            length: 0.5,
        }
    }

    #[test]
    fn test_time_of_day_toggles() {
        assert_eq!(TimeOfDay::Day.toggle(), TimeOfDay::Night);
        assert_eq!(TimeOfDay::Night.toggle(), TimeOfDay::Day);
        assert!(TimeOfDay::Night.is_night());
        assert_eq!(TimeOfDay::default(), TimeOfDay::Day);
    }

    #[test]
    fn test_no_fog_by_day() {
        let fog = Fog::select(&FogParams::default(), TimeOfDay::Day, ViewMode::Chase);
        assert_eq!(fog.mode, FogMode::Off);
        assert_eq!(fog.factor(1000.0), 1.0);
    }

    #[test]
    fn test_linear_fog_in_orbit_view() {
        let fog = Fog::select(&FogParams::default(), TimeOfDay::Night, ViewMode::Orbit);
        assert_eq!(fog.factor(5.0), 1.0);
        assert_relative_eq!(fog.factor(25.0), 0.5);
        assert_eq!(fog.factor(50.0), 0.0);
    }

    #[test]
    fn test_exp2_fog_in_chase_view() {
        let fog = Fog::select(&FogParams::default(), TimeOfDay::Night, ViewMode::Chase);
        assert_eq!(fog.packed()[0], 2.0);
        assert_eq!(fog.factor(0.0), 1.0);
        // exp(-(0.06 * 10)^2) = exp(-0.36)
        assert_relative_eq!(fog.factor(10.0), (-0.36f32).exp(), epsilon = 1e-6);
        assert!(fog.factor(40.0) < 0.01);
    }

    #[test]
    fn test_rain_field_is_deterministic_per_seed() {
        let a = RainField::new(RainParams::default(), 7);
        let b = RainField::new(RainParams::default(), 7);
        let c = RainField::new(RainParams::default(), 8);
        assert_eq!(a.drops, b.drops);
        assert_ne!(a.drops, c.drops);
        assert_eq!(a.len(), 5000);
    }

    #[test]
    fn test_drops_within_ranges() {
        let params = RainParams::default();
        let field = RainField::new(params.clone(), 42);
        for d in &field.drops {
            assert!(d.offset_x.abs() <= params.area / 2.0);
            assert!(d.offset_z.abs() <= params.area / 2.0);
            assert!(d.speed >= 5.0 && d.speed <= 11.0);
            assert!(d.length >= 0.2 && d.length <= 0.8);
        }
    }

    #[test]
    fn test_zero_drops_is_empty() {
        let params = RainParams {
            drop_count: 0,
            ..RainParams::default()
        };
        assert!(RainField::new(params, 1).is_empty());
    }

    #[test]
    fn test_rain_clock_wraps() {
        let mut field = RainField::new(
            RainParams {
                drop_count: 1,
                ..RainParams::default()
            },
            1,
        );
        field.advance();
        assert_relative_eq!(field.time, 0.05);
        field.time = 999.99;
        field.advance();
        assert_eq!(field.time, 0.0);
    }

    #[test]
    fn test_drop_stays_between_ground_and_sky() {
        let params = RainParams::default();
        let drop = drop_at(3.0, -4.0);
        for step in 0..400 {
            let [_, y, _] = drop_position(&params, &drop, step as f32 * 0.05);
            assert!(y > 0.0 && y <= params.height, "y = {y}");
        }
    }

    #[test]
    fn test_wind_drifts_drop_downwind() {
        let params = RainParams {
            turbulence_amp: 0.0,
            ..RainParams::default()
        };
        let drop = drop_at(0.0, 0.0);
        // Find a time late in the fall
        let t = (0..1000)
            .map(|i| i as f32 * 0.01)
            .find(|&t| fall_cycle(&params, &drop, t) > 0.9)
            .unwrap();
        let [x, y, _] = drop_position(&params, &drop, t);
        assert_relative_eq!(x, params.wind_strength * (params.height - y), epsilon = 1e-4);
        assert!(x > 0.0);
    }

    #[test]
    fn test_splash_only_right_after_impact() {
        let params = RainParams::default();
        let drop = drop_at(1.0, 2.0);
        let mut seen_splash = false;
        for i in 0..2000 {
            let t = i as f32 * 0.01;
            let cycle = fall_cycle(&params, &drop, t);
            match splash_phase(&params, &drop, t) {
                Some(s) => {
                    seen_splash = true;
                    assert!(cycle < params.splash_duration);
                    assert!((0.0..1.0).contains(&s));
                }
                None => assert!(cycle >= params.splash_duration),
            }
        }
        assert!(seen_splash);
    }

    #[test]
    fn test_impact_point_includes_full_drift() {
        let params = RainParams::default();
        let [x, z] = impact_point(&params, &drop_at(2.0, 3.0));
        assert_relative_eq!(x, 2.0 + 0.25 * 30.0);
        assert_eq!(z, 3.0);
    }

    #[test]
    fn test_phase_in_unit_range() {
        for i in 0..100 {
            let p = drop_at(i as f32 * 1.7 - 60.0, i as f32 * -0.9 + 40.0).phase();
            assert!((0.0..1.0).contains(&p));
        }
    }
}
