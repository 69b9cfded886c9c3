//! Keyboard bindings, held-key tracking and view gating.

use winit::keyboard::KeyCode;

use crate::camera::{OrbitCamera, ViewMode};
use crate::scene::DisplayMode;
use crate::vehicle::CarInput;

/// Wait before a held key starts repeating (seconds)
pub const KEY_REPEAT_DELAY_S: f32 = 0.5;

/// What a key does to the app state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Orbit azimuth change in degrees
    Rotate(i32),
    ZoomOut,
    ZoomIn,
    LowerLight,
    RaiseLight,
    ResetAngles,
    ToggleRain,
    ToggleTime,
    NextMode,
    ToggleView,
    ToggleLight,
    ToggleAxes,
    ToggleLightDistance,
}

impl Action {
    /// Map a key to its action
    ///
    /// Repeat ticks only fire the continuous actions (rotation, zoom, light
    /// height); toggles happen once per press.
    pub fn for_key(key: KeyCode, repeat: bool) -> Option<Self> {
        let continuous = match key {
            KeyCode::ArrowRight => Some(Action::Rotate(OrbitCamera::ROTATE_STEP)),
            KeyCode::ArrowLeft => Some(Action::Rotate(-OrbitCamera::ROTATE_STEP)),
            KeyCode::F1 => Some(Action::ZoomOut),
            KeyCode::F2 => Some(Action::ZoomIn),
            KeyCode::BracketLeft => Some(Action::LowerLight),
            KeyCode::BracketRight => Some(Action::RaiseLight),
            _ => None,
        };
        if continuous.is_some() || repeat {
            return continuous;
        }
        match key {
            KeyCode::Escape => Some(Action::Quit),
            KeyCode::Digit0 => Some(Action::ResetAngles),
            KeyCode::KeyR => Some(Action::ToggleRain),
            KeyCode::KeyN => Some(Action::ToggleTime),
            KeyCode::KeyM => Some(Action::NextMode),
            KeyCode::KeyP => Some(Action::ToggleView),
            KeyCode::KeyL => Some(Action::ToggleLight),
            KeyCode::KeyQ => Some(Action::ToggleAxes),
            KeyCode::F3 => Some(Action::ToggleLightDistance),
            _ => None,
        }
    }
}

/// Keys currently held down, in press order
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: Vec<KeyCode>,
}

impl HeldKeys {
    /// Record a press; returns false if the key was already held
    pub fn press(&mut self, key: KeyCode) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.retain(|&k| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Actions for one repeat tick
    pub fn repeat_actions(&self) -> Vec<Action> {
        self.keys
            .iter()
            .filter_map(|&k| Action::for_key(k, true))
            .collect()
    }

    /// Driving keys currently held (WASD)
    pub fn car_input(&self) -> CarInput {
        let held = |k| self.keys.contains(&k);
        CarInput {
            throttle: held(KeyCode::KeyW),
            reverse: held(KeyCode::KeyS),
            left: held(KeyCode::KeyA),
            right: held(KeyCode::KeyD),
        }
    }
}

/// Driving needs the chase view on a drivable scene
pub fn can_drive(view: ViewMode, mode: DisplayMode) -> bool {
    view == ViewMode::Chase && mode.is_drivable()
}

/// Chase view falls back to orbit where there is no car to follow
pub fn allowed_view(view: ViewMode, mode: DisplayMode) -> ViewMode {
    if view == ViewMode::Chase && !mode.is_drivable() {
        ViewMode::Orbit
    } else {
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_fire_once_per_press() {
        assert_eq!(Action::for_key(KeyCode::KeyR, false), Some(Action::ToggleRain));
        assert_eq!(Action::for_key(KeyCode::KeyR, true), None);
        assert_eq!(Action::for_key(KeyCode::KeyM, true), None);
        assert_eq!(Action::for_key(KeyCode::Escape, true), None);
        assert_eq!(Action::for_key(KeyCode::Digit0, false), Some(Action::ResetAngles));
    }

    #[test]
    fn test_continuous_keys_repeat() {
        for repeat in [false, true] {
            assert_eq!(Action::for_key(KeyCode::ArrowRight, repeat), Some(Action::Rotate(5)));
            assert_eq!(Action::for_key(KeyCode::ArrowLeft, repeat), Some(Action::Rotate(-5)));
            assert_eq!(Action::for_key(KeyCode::F1, repeat), Some(Action::ZoomOut));
            assert_eq!(Action::for_key(KeyCode::BracketRight, repeat), Some(Action::RaiseLight));
        }
        // Up/down arrows are unbound
        assert_eq!(Action::for_key(KeyCode::ArrowUp, false), None);
    }

    #[test]
    fn test_held_keys_repeat_only_continuous() {
        let mut held = HeldKeys::default();
        assert!(held.press(KeyCode::ArrowLeft));
        assert!(!held.press(KeyCode::ArrowLeft));
        held.press(KeyCode::KeyN);
        held.press(KeyCode::F2);
        assert_eq!(
            held.repeat_actions(),
            vec![Action::Rotate(-5), Action::ZoomIn]
        );

        held.release(KeyCode::ArrowLeft);
        held.release(KeyCode::KeyN);
        held.release(KeyCode::F2);
        assert!(held.is_empty());
        assert!(held.repeat_actions().is_empty());
    }

    #[test]
    fn test_car_input_from_wasd() {
        let mut held = HeldKeys::default();
        assert!(held.car_input().is_idle());
        held.press(KeyCode::KeyW);
        held.press(KeyCode::KeyD);
        assert_eq!(
            held.car_input(),
            CarInput {
                throttle: true,
                right: true,
                ..Default::default()
            }
        );
        // Driving keys are not actions
        assert!(held.repeat_actions().is_empty());
    }

    #[test]
    fn test_chase_only_where_drivable() {
        assert!(can_drive(ViewMode::Chase, DisplayMode::Circuit));
        assert!(!can_drive(ViewMode::Orbit, DisplayMode::Circuit));
        assert!(!can_drive(ViewMode::Chase, DisplayMode::Garage));

        assert_eq!(allowed_view(ViewMode::Chase, DisplayMode::Circuit), ViewMode::Chase);
        assert_eq!(allowed_view(ViewMode::Chase, DisplayMode::Garage), ViewMode::Orbit);
        assert_eq!(allowed_view(ViewMode::Chase, DisplayMode::Car), ViewMode::Orbit);
        assert_eq!(allowed_view(ViewMode::Orbit, DisplayMode::Car), ViewMode::Orbit);
    }
}
