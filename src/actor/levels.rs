use serde::{Deserialize, Serialize};
use strum::Display;

use crate::common::config::LevelSettings;

#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LevelTarget {
    Brightness,
    Volume,
}

/// Brightness and volume, both clamped to 0..=100 and adjusted in fixed
/// steps. A focus target picks which one receives adjustment input; toggling
/// focus is a pure state change with no side effect.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    brightness: i32,
    volume: i32,
    focus: LevelTarget,
    step: i32,
}

impl Levels {
    pub fn new(settings: &LevelSettings) -> Self {
        Self {
            brightness: settings.brightness.clamp(0, 100),
            volume: settings.volume.clamp(0, 100),
            focus: LevelTarget::Brightness,
            step: settings.step.max(1),
        }
    }

    pub fn brightness(&self) -> i32 { self.brightness }

    pub fn volume(&self) -> i32 { self.volume }

    pub fn focus(&self) -> LevelTarget { self.focus }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            LevelTarget::Brightness => LevelTarget::Volume,
            LevelTarget::Volume => LevelTarget::Brightness,
        };
    }

    /// Adjusts `target` by `steps` increments and returns the new absolute
    /// value. The caller forwards that value to the system-control
    /// collaborator; no OS call happens here.
    pub fn adjust(&mut self, target: LevelTarget, steps: i32) -> i32 {
        let slot = match target {
            LevelTarget::Brightness => &mut self.brightness,
            LevelTarget::Volume => &mut self.volume,
        };
        *slot = (*slot + steps * self.step).clamp(0, 100);
        *slot
    }

    /// Adjusts whichever target currently has focus.
    pub fn adjust_focused(&mut self, steps: i32) -> (LevelTarget, i32) {
        let target = self.focus;
        (target, self.adjust(target, steps))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn levels() -> Levels { Levels::new(&LevelSettings::default()) }

    #[test]
    fn starts_at_configured_values_with_brightness_focused() {
        let levels = levels();
        assert_eq!(levels.brightness(), 100);
        assert_eq!(levels.volume(), 85);
        assert_eq!(levels.focus(), LevelTarget::Brightness);
    }

    #[test]
    fn adjust_moves_in_fixed_steps_and_clamps() {
        let mut levels = levels();
        assert_eq!(levels.adjust(LevelTarget::Volume, 1), 90);
        assert_eq!(levels.adjust(LevelTarget::Volume, 3), 100);
        assert_eq!(levels.adjust(LevelTarget::Brightness, -25), 0);
    }

    #[test]
    fn focus_toggle_routes_adjustment() {
        let mut levels = levels();
        levels.switch_focus();
        let (target, value) = levels.adjust_focused(-1);
        assert_eq!(target, LevelTarget::Volume);
        assert_eq!(value, 80);
        assert_eq!(levels.brightness(), 100);
        levels.switch_focus();
        assert_eq!(levels.focus(), LevelTarget::Brightness);
    }
}
