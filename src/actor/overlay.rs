use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::ShellError;

/// Modal menu surfaces. At most one is visible at a time; opening one closes
/// any other.
#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MenuKind {
    Start,
    Wallpaper,
    Levels,
}

/// Lock and menu visibility. The two axes are independent except for one
/// invariant: while locked no menu is open, and none can be opened.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    locked: bool,
    active_menu: Option<MenuKind>,
}

impl OverlayState {
    pub fn new() -> Self { Self::default() }

    pub fn locked(&self) -> bool { self.locked }

    pub fn active_menu(&self) -> Option<MenuKind> { self.active_menu }

    /// Rejects any operation that must not run while the screen is locked.
    pub fn ensure_unlocked(&self, op: &'static str) -> Result<(), ShellError> {
        if self.locked {
            Err(ShellError::InvalidState(op))
        } else {
            Ok(())
        }
    }

    pub fn open_menu(&mut self, kind: MenuKind) -> Result<(), ShellError> {
        self.ensure_unlocked("open menu")?;
        self.active_menu = Some(kind);
        Ok(())
    }

    pub fn close_menus(&mut self) -> Result<(), ShellError> {
        self.ensure_unlocked("close menus")?;
        self.active_menu = None;
        Ok(())
    }

    /// Valid from any state; closes any open menu as a side effect.
    pub fn lock(&mut self) {
        self.locked = true;
        self.active_menu = None;
    }

    /// The only transition out of the locked state.
    pub fn unlock(&mut self) -> Result<(), ShellError> {
        if !self.locked {
            return Err(ShellError::InvalidState("unlock"));
        }
        self.locked = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn opening_a_menu_replaces_the_previous_one() {
        let mut overlay = OverlayState::new();
        overlay.open_menu(MenuKind::Start).unwrap();
        overlay.open_menu(MenuKind::Wallpaper).unwrap();
        assert_eq!(overlay.active_menu(), Some(MenuKind::Wallpaper));
    }

    #[test]
    fn locking_always_clears_the_menu() {
        let mut overlay = OverlayState::new();
        overlay.open_menu(MenuKind::Levels).unwrap();
        overlay.lock();
        assert!(overlay.locked());
        assert_eq!(overlay.active_menu(), None);
    }

    #[test]
    fn no_menu_can_open_while_locked() {
        let mut overlay = OverlayState::new();
        overlay.lock();
        assert_eq!(
            overlay.open_menu(MenuKind::Start),
            Err(ShellError::InvalidState("open menu"))
        );
        assert_eq!(overlay.active_menu(), None);
        assert!(overlay.locked());
    }

    #[test]
    fn unlock_is_the_only_exit_from_locked() {
        let mut overlay = OverlayState::new();
        overlay.lock();
        assert_eq!(
            overlay.close_menus(),
            Err(ShellError::InvalidState("close menus"))
        );
        overlay.unlock().unwrap();
        assert!(!overlay.locked());
        assert_eq!(overlay.active_menu(), None);
    }

    #[test]
    fn unlock_while_unlocked_is_rejected() {
        let mut overlay = OverlayState::new();
        assert_eq!(
            overlay.unlock(),
            Err(ShellError::InvalidState("unlock"))
        );
    }

    #[test]
    fn lock_is_idempotent_from_any_state() {
        let mut overlay = OverlayState::new();
        overlay.lock();
        overlay.lock();
        assert!(overlay.locked());
    }
}
