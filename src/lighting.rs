//! The single orbiting scene light.

use glam::Vec3;

use crate::params::LightingParams;
use crate::weather::TimeOfDay;

/// Light intensities as fractions (0..1), applied to material colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

/// Orbiting point light with the user toggles that affect it
#[derive(Debug, Clone)]
pub struct Light {
    params: LightingParams,
    pub enabled: bool,
    /// Current orbit radius
    pub distance: f32,
    /// Current height above the ground
    pub elevation: f32,
    /// Current orbit angle (degrees)
    pub azimuth_deg: f32,
}

impl Light {
    pub fn new(params: LightingParams) -> Self {
        Self {
            enabled: true,
            distance: params.distance,
            elevation: params.elevation,
            azimuth_deg: 90.0,
            params,
        }
    }

    /// Set orbit angle from total elapsed time
    pub fn update(&mut self, elapsed_s: f32) {
        self.azimuth_deg = (self.params.orbit_speed_deg_per_s * elapsed_s).rem_euclid(360.0);
    }

    pub fn position(&self) -> Vec3 {
        let zh = self.azimuth_deg.to_radians();
        Vec3::new(
            self.distance * zh.cos(),
            self.elevation,
            self.distance * zh.sin(),
        )
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Switch between the far and near orbit radius
    pub fn toggle_distance(&mut self) {
        self.distance = if self.distance == self.params.near_distance {
            self.params.distance
        } else {
            self.params.near_distance
        };
    }

    pub fn raise(&mut self) {
        self.elevation += self.params.elevation_step;
    }

    pub fn lower(&mut self) {
        self.elevation -= self.params.elevation_step;
    }

    /// Intensities for the time of day; night dims ambient and diffuse
    pub fn levels(&self, time: TimeOfDay) -> LightLevels {
        let dim = if time.is_night() {
            self.params.night_dimming
        } else {
            1.0
        };
        LightLevels {
            ambient: 0.01 * self.params.ambient_pct * dim,
            diffuse: 0.01 * self.params.diffuse_pct * dim,
            specular: 0.01 * self.params.specular_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_light_orbits_at_ninety_degrees_per_second() {
        let mut light = Light::new(LightingParams::default());
        light.update(1.0);
        assert_relative_eq!(light.azimuth_deg, 90.0);
        let p = light.position();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 6.0, epsilon = 1e-5);
        assert_eq!(p.y, 4.0);

        light.update(5.0);
        assert_relative_eq!(light.azimuth_deg, 90.0);
    }

    #[test]
    fn test_distance_toggle() {
        let mut light = Light::new(LightingParams::default());
        light.toggle_distance();
        assert_eq!(light.distance, 1.0);
        light.toggle_distance();
        assert_eq!(light.distance, 6.0);
    }

    #[test]
    fn test_elevation_steps() {
        let mut light = Light::new(LightingParams::default());
        light.raise();
        light.raise();
        light.lower();
        assert_relative_eq!(light.elevation, 4.1, epsilon = 1e-5);
    }

    #[test]
    fn test_night_dims_ambient_and_diffuse_only() {
        let light = Light::new(LightingParams::default());
        let day = light.levels(TimeOfDay::Day);
        let night = light.levels(TimeOfDay::Night);
        assert_relative_eq!(day.ambient, 0.5);
        assert_relative_eq!(day.diffuse, 0.8);
        assert_relative_eq!(night.ambient, 0.35, epsilon = 1e-6);
        assert_relative_eq!(night.diffuse, 0.56, epsilon = 1e-6);
        assert_eq!(day.specular, night.specular);
    }

    #[test]
    fn test_toggle() {
        let mut light = Light::new(LightingParams::default());
        assert!(light.enabled);
        light.toggle();
        assert!(!light.enabled);
    }
}
