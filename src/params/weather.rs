//! Fog and rain parameters.

/// Night fog settings
#[derive(Debug, Clone)]
pub struct FogParams {
    /// Fog colour (linear RGB)
    pub color: [f32; 3],

    /// Linear fog start distance (orbit view)
    pub linear_start: f32,

    /// Linear fog end distance (orbit view)
    pub linear_end: f32,

    /// Exponential-squared density (chase view)
    pub exp2_density: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: [0.65, 0.70, 0.75],
            linear_start: 10.0,
            linear_end: 40.0,
            exp2_density: 0.06,
        }
    }
}

/// Rain particle settings
#[derive(Debug, Clone)]
pub struct RainParams {
    /// Number of drops in the instance buffer
    pub drop_count: u32,

    /// Edge length of the square (centred on the origin) drops are scattered over
    pub area: f32,

    /// Height drops fall from
    pub height: f32,

    /// Fall speed range (units per rain-time unit)
    pub speed_range: (f32, f32),

    /// Streak length range
    pub length_range: (f32, f32),

    /// Constant sideways drift per unit of fall
    pub wind_strength: f32,

    /// Turbulence amplitude
    pub turbulence_amp: f32,

    /// Turbulence spatial frequency
    pub turbulence_freq: f32,

    /// Turbulence temporal speed
    pub turbulence_speed: f32,

    /// Rain time added per physics tick
    pub time_step: f32,

    /// Rain time wraps to zero past this value
    pub time_wrap: f32,

    /// Fraction of a fall cycle the ground splash stays visible
    pub splash_duration: f32,

    /// Final radius of the splash ring
    pub splash_radius: f32,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            drop_count: 5000,
            area: 120.0,
            height: 30.0,
            speed_range: (5.0, 11.0),
            length_range: (0.2, 0.8),
            wind_strength: 0.25,
            turbulence_amp: 0.12,
            turbulence_freq: 12.0,
            turbulence_speed: 4.0,
            time_step: 0.05,
            time_wrap: 1000.0,
            splash_duration: 0.15,
            splash_radius: 0.25,
        }
    }
}
