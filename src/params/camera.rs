//! Camera presets for the orbit and chase views.

/// Orbit view angles and extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPreset {
    /// Azimuth (degrees)
    pub azimuth_deg: i32,

    /// Elevation (degrees)
    pub elevation_deg: i32,

    /// Half-height of the orthographic view volume (track units)
    pub dim: f32,
}

impl OrbitPreset {
    /// Angles restored by the reset key
    pub const RESET: Self = Self {
        azimuth_deg: 105,
        elevation_deg: 20,
        dim: 8.0,
    };

    /// Full circuit overview
    pub const CIRCUIT: Self = Self {
        azimuth_deg: 105,
        elevation_deg: 20,
        dim: 6.0,
    };

    /// Single garage close-up
    pub const GARAGE: Self = Self {
        azimuth_deg: -25,
        elevation_deg: 10,
        dim: 10.0,
    };

    /// Single car close-up
    pub const CAR: Self = Self {
        azimuth_deg: -125,
        elevation_deg: 15,
        dim: 4.0,
    };
}

impl Default for OrbitPreset {
    fn default() -> Self {
        Self::RESET
    }
}

/// Chase camera placement relative to the driven car
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    /// Distance behind the car along its heading
    pub distance_behind: f32,

    /// Height of the eye above the car origin
    pub eye_height: f32,

    /// Height of the look-at point above the car origin
    pub target_height: f32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            distance_behind: 2.0,
            eye_height: 0.45,
            target_height: 0.2,
            fov_degrees: 60.0,
            near_plane: 0.01,
            far_plane: 100.0,
        }
    }
}
