//! Driven-car physics parameters.

/// Tuning for the arcade car integrator
///
/// Velocities are in track units per physics tick; angles in degrees.
#[derive(Debug, Clone)]
pub struct CarPhysics {
    /// Forward speed cap (reverse is capped at half of this)
    pub max_velocity: f32,

    /// Velocity added per input tick while throttle or reverse is held
    pub acceleration: f32,

    /// Friction removed per physics tick
    pub deceleration: f32,

    /// Heading change per input tick while steering
    pub turn_speed_deg: f32,

    /// Front wheel angle while a steering key is held
    pub steering_lock_deg: f32,

    /// Steering angle recovered per physics tick when released
    pub steering_return_deg: f32,

    /// Below this speed the car is treated as stationary
    pub rest_threshold: f32,
}

impl Default for CarPhysics {
    fn default() -> Self {
        Self {
            max_velocity: 0.3,
            acceleration: 0.06,
            deceleration: 0.008,
            turn_speed_deg: 2.5,
            steering_lock_deg: 25.0,
            steering_return_deg: 0.5,
            rest_threshold: 0.001,
        }
    }
}

impl CarPhysics {
    /// Reverse speed cap (negative)
    pub fn min_velocity(&self) -> f32 {
        -self.max_velocity * 0.5
    }
}
