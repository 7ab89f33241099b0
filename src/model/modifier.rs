// SPDX-License-Identifier: GPL-3.0-only

//! Modifier state machine.
//!
//! The keyboard keeps a [`ModifierMask`] of active modifiers. How a
//! modifier-bearing key changes that mask depends on the
//! [`ModifierBehavior`]:
//!
//! - **None** (momentary): the modifier is active while the key is held.
//! - **Lock**: each press toggles the modifier.
//! - **Latch**: a press arms the modifier for one shot; the press of the next
//!   non-modifier key clears it.
//!
//! After every transition the symbol level is derived from the mask: `Mod5`
//! (AltGr) contributes 2 and `Shift` contributes 1.
//!
//! # Example
//!
//! ```rust,ignore
//! use oskboard::model::{ModifierBehavior, ModifierMask, ModifierState};
//!
//! let mut state = ModifierState::new(ModifierBehavior::Lock);
//! state.press(ModifierMask::SHIFT);
//! assert_eq!(state.level(), 1);
//! state.press(ModifierMask::SHIFT);
//! assert_eq!(state.level(), 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::model::symbol::ModifierMask;

/// Policy for how modifier keys affect the global modifier mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierBehavior {
    /// Momentary: set on press, cleared on release
    #[default]
    None,
    /// Toggled by each press
    Lock,
    /// One-shot until the next non-modifier key press
    Latch,
}

/// Level selected by a modifier mask: `Mod5` adds 2, `Shift` adds 1.
pub fn level_for_modifiers(modifiers: ModifierMask) -> i32 {
    let mut level = 0;
    if modifiers.intersects(ModifierMask::MOD5) {
        level += 2;
    }
    if modifiers.intersects(ModifierMask::SHIFT) {
        level += 1;
    }
    level
}

/// Tracks the active modifiers of a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    behavior: ModifierBehavior,
    modifiers: ModifierMask,
}

impl ModifierState {
    #[must_use]
    pub fn new(behavior: ModifierBehavior) -> Self {
        Self {
            behavior,
            modifiers: ModifierMask::EMPTY,
        }
    }

    pub fn behavior(&self) -> ModifierBehavior {
        self.behavior
    }

    /// Changes the behavior. Active modifiers are kept.
    pub fn set_behavior(&mut self, behavior: ModifierBehavior) {
        self.behavior = behavior;
    }

    pub fn modifiers(&self) -> ModifierMask {
        self.modifiers
    }

    /// Level derived from the current modifiers.
    #[must_use]
    pub fn level(&self) -> i32 {
        level_for_modifiers(self.modifiers)
    }

    /// Applies the press of a key whose symbol carries `mask`.
    ///
    /// Returns `true` if the modifier mask changed. An empty mask is a no-op.
    pub fn press(&mut self, mask: ModifierMask) -> bool {
        if mask.is_empty() {
            return false;
        }
        let before = self.modifiers;
        self.modifiers = match self.behavior {
            ModifierBehavior::None => self.modifiers | mask,
            ModifierBehavior::Lock => self.modifiers ^ mask,
            ModifierBehavior::Latch => (self.modifiers ^ mask) & mask,
        };
        before != self.modifiers
    }

    /// Applies the release of a key whose symbol carries `mask`.
    ///
    /// Only the momentary behavior clears bits on release.
    pub fn release(&mut self, mask: ModifierMask) -> bool {
        if mask.is_empty() || self.behavior != ModifierBehavior::None {
            return false;
        }
        let before = self.modifiers;
        self.modifiers &= !mask;
        before != self.modifiers
    }

    /// Clears latched modifiers after a non-modifier key press.
    ///
    /// Does nothing unless the behavior is `Latch`.
    pub fn clear_latched(&mut self) -> bool {
        if self.behavior != ModifierBehavior::Latch || self.modifiers.is_empty() {
            return false;
        }
        self.modifiers = ModifierMask::EMPTY;
        true
    }

    /// Clears every modifier regardless of behavior.
    pub fn reset(&mut self) -> bool {
        let changed = !self.modifiers.is_empty();
        self.modifiers = ModifierMask::EMPTY;
        changed
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test momentary modifiers follow the key
    #[test]
    fn test_none_behavior_press_release() {
        let mut state = ModifierState::new(ModifierBehavior::None);

        assert!(state.press(ModifierMask::SHIFT));
        assert_eq!(state.level(), 1);

        assert!(state.release(ModifierMask::SHIFT));
        assert_eq!(state.modifiers(), ModifierMask::EMPTY);
        assert_eq!(state.level(), 0);
    }

    /// Test lock toggles and survives release
    #[test]
    fn test_lock_behavior_toggles() {
        let mut state = ModifierState::new(ModifierBehavior::Lock);
        let original = state;

        state.press(ModifierMask::SHIFT);
        assert!(!state.release(ModifierMask::SHIFT), "release keeps locked bits");
        assert_eq!(state.level(), 1);

        state.press(ModifierMask::SHIFT);
        assert_eq!(state, original, "second press restores the original state");
    }

    /// Test latch keeps only the pressed bits
    #[test]
    fn test_latch_behavior_replaces() {
        let mut state = ModifierState::new(ModifierBehavior::Latch);

        state.press(ModifierMask::SHIFT);
        assert_eq!(state.modifiers(), ModifierMask::SHIFT);

        state.press(ModifierMask::MOD5);
        assert_eq!(
            state.modifiers(),
            ModifierMask::MOD5,
            "a different latch replaces the previous one"
        );
        assert_eq!(state.level(), 2);

        state.press(ModifierMask::MOD5);
        assert_eq!(state.modifiers(), ModifierMask::EMPTY, "same latch twice disarms it");

        state.press(ModifierMask::SHIFT);
        assert!(state.clear_latched());
        assert_eq!(state.level(), 0);
        assert!(!state.clear_latched());
    }

    #[test]
    fn test_clear_latched_ignored_for_other_behaviors() {
        let mut state = ModifierState::new(ModifierBehavior::Lock);
        state.press(ModifierMask::SHIFT);
        assert!(!state.clear_latched());
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn test_empty_mask_is_noop() {
        let mut state = ModifierState::new(ModifierBehavior::None);
        assert!(!state.press(ModifierMask::EMPTY));
        assert!(!state.release(ModifierMask::EMPTY));
    }

    #[test]
    fn test_level_derivation() {
        assert_eq!(level_for_modifiers(ModifierMask::EMPTY), 0);
        assert_eq!(level_for_modifiers(ModifierMask::SHIFT), 1);
        assert_eq!(level_for_modifiers(ModifierMask::MOD5), 2);
        assert_eq!(level_for_modifiers(ModifierMask::MOD5 | ModifierMask::SHIFT), 3);
        assert_eq!(level_for_modifiers(ModifierMask::CONTROL), 0);
    }
}
