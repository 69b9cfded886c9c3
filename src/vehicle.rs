//! Arcade car physics for the driven car and the fixed-rate tick clock.

use glam::Vec3;

use crate::params::{CarPhysics, ChaseCamera};

/// Driven car state
#[derive(Debug, Clone, PartialEq)]
pub struct CarState {
    pub position: Vec3,
    /// Heading about +Y (degrees, kept in [0, 360))
    pub heading_deg: f32,
    /// Signed speed along the heading (units per physics tick)
    pub velocity: f32,
    /// Front wheel angle (degrees, positive = right)
    pub steering_deg: f32,
    pub braking: bool,
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            position: Vec3::new(4.0, 0.0, 1.0),
            heading_deg: 0.0,
            velocity: 0.1,
            steering_deg: 0.0,
            braking: false,
        }
    }
}

/// Driving keys held during an input tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarInput {
    pub throttle: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

impl CarInput {
    pub fn is_idle(&self) -> bool {
        !(self.throttle || self.reverse || self.left || self.right)
    }
}

/// Move `value` toward zero by `step` without crossing it
fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}

fn wrap_degrees(deg: f32) -> f32 {
    let w = deg.rem_euclid(360.0);
    if w >= 360.0 {
        0.0
    } else {
        w
    }
}

impl CarState {
    /// Unit vector the car drives along
    ///
    /// Heading 0 faces +X, so the car model (nose on +X) needs no extra yaw.
    pub fn forward(&self) -> Vec3 {
        let rad = (90.0 + self.heading_deg).to_radians();
        Vec3::new(rad.sin(), 0.0, rad.cos())
    }

    /// Apply one key-repeat tick of driving input
    pub fn apply_input(&mut self, input: &CarInput, p: &CarPhysics) {
        if input.throttle {
            self.velocity = (self.velocity + p.acceleration).min(p.max_velocity);
            self.braking = false;
        }
        if input.reverse {
            self.velocity = (self.velocity - p.acceleration).max(p.min_velocity());
            self.braking = true;
        }
        if input.left {
            self.heading_deg = wrap_degrees(self.heading_deg + p.turn_speed_deg);
            self.steering_deg = -p.steering_lock_deg;
        }
        if input.right {
            self.heading_deg = wrap_degrees(self.heading_deg - p.turn_speed_deg);
            self.steering_deg = p.steering_lock_deg;
        }
    }

    /// Advance one physics tick: friction, steering return, then motion
    pub fn step(&mut self, p: &CarPhysics) {
        if self.velocity >= 0.0 {
            self.braking = false;
        }
        self.velocity = approach_zero(self.velocity, p.deceleration);
        self.steering_deg = approach_zero(self.steering_deg, p.steering_return_deg);

        if self.velocity.abs() > p.rest_threshold {
            self.position += self.forward() * self.velocity;
        }
    }

    /// Chase camera eye: behind the car along its heading, raised
    pub fn chase_eye(&self, cam: &ChaseCamera) -> Vec3 {
        self.position - self.forward() * cam.distance_behind + Vec3::Y * cam.eye_height
    }

    /// Chase camera look-at point just above the car
    pub fn chase_target(&self, cam: &ChaseCamera) -> Vec3 {
        self.position + Vec3::Y * cam.target_height
    }
}

/// Turns variable frame time into whole fixed-length ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    period_s: f32,
    accumulator_s: f32,
    max_ticks: u32,
}

impl FixedTimestep {
    /// Physics ticks per second
    pub const PHYSICS_HZ: f32 = 100.0;

    /// Key-repeat ticks per second
    pub const INPUT_HZ: f32 = 20.0;

    /// Longest backlog worked off after a stall
    pub const MAX_TICKS_PER_FRAME: u32 = 10;

    pub fn new(hz: f32) -> Self {
        Self {
            period_s: 1.0 / hz.max(f32::EPSILON),
            accumulator_s: 0.0,
            max_ticks: Self::MAX_TICKS_PER_FRAME,
        }
    }

    pub fn physics() -> Self {
        Self::new(Self::PHYSICS_HZ)
    }

    pub fn input() -> Self {
        Self::new(Self::INPUT_HZ)
    }

    pub fn period_s(&self) -> f32 {
        self.period_s
    }

    /// Add `dt_s` of frame time and return how many ticks are due
    ///
    /// Backlog beyond the per-frame cap is dropped.
    pub fn advance(&mut self, dt_s: f32) -> u32 {
        self.accumulator_s += dt_s.max(0.0);
        let due = (self.accumulator_s / self.period_s).floor();
        if due <= 0.0 {
            return 0;
        }
        if due >= self.max_ticks as f32 {
            self.accumulator_s = 0.0;
            return self.max_ticks;
        }
        self.accumulator_s -= due * self.period_s;
        due as u32
    }

    /// Drop any accumulated time (e.g. restart key repeat)
    pub fn reset(&mut self) {
        self.accumulator_s = 0.0;
    }

    /// Start with a negative balance so the first tick waits `delay_s` longer
    pub fn delay(&mut self, delay_s: f32) {
        self.accumulator_s = -delay_s;
    }
}
