//! Scene light parameters.

/// Single orbiting point light
#[derive(Debug, Clone)]
pub struct LightingParams {
    /// Ambient intensity (percent)
    pub ambient_pct: f32,

    /// Diffuse intensity (percent)
    pub diffuse_pct: f32,

    /// Specular intensity (percent)
    pub specular_pct: f32,

    /// Orbit radius, toggled between the two values by F3
    pub distance: f32,

    /// Alternate orbit radius
    pub near_distance: f32,

    /// Light height above the ground
    pub elevation: f32,

    /// Step for the elevation keys
    pub elevation_step: f32,

    /// Orbit angular speed (degrees per second)
    pub orbit_speed_deg_per_s: f32,

    /// Multiplier applied to ambient and diffuse at night
    pub night_dimming: f32,

    /// Radius of the marker ball drawn at the light
    pub marker_radius: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            ambient_pct: 50.0,
            diffuse_pct: 80.0,
            specular_pct: 80.0,
            distance: 6.0,
            near_distance: 1.0,
            elevation: 4.0,
            elevation_step: 0.1,
            orbit_speed_deg_per_s: 90.0,
            night_dimming: 0.7,
            marker_radius: 0.1,
        }
    }
}
