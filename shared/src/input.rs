//! Held-key state read by the character controller once per tick.
//!
//! The state is an explicitly owned value: event handlers mutate it, the tick reads it.
//! Nothing here knows about a windowing or input library.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::bitmask_flags::BitmaskFlags;
use crate::define_bitmask_flags;

define_bitmask_flags!(Key, u8, {
    Forward,
    Back,
    Left,
    Right,
    Shift,
});

/// The four keys that produce locomotion.
pub const DIRECTION_KEYS: [Key; 4] = [Key::Forward, Key::Back, Key::Left, Key::Right];

impl Key {
    /// Label of the keyboard key bound to this action.
    pub fn name(&self) -> &'static str {
        match self {
            Key::Forward => "w",
            Key::Back => "s",
            Key::Left => "a",
            Key::Right => "d",
            Key::Shift => "shift",
        }
    }
}

/// Pressed state of every [`Key`]. Unknown keys are simply not tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pressed: BitmaskFlags<u8>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state with the given keys held.
    pub fn with_pressed(keys: &[Key]) -> Self {
        let mut state = Self::default();
        for &key in keys {
            state.key_down(key);
        }
        state
    }

    pub fn key_down(&mut self, key: Key) {
        self.pressed.add(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(key);
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        self.pressed.set(key, pressed);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.has(key)
    }

    /// Is any of [`DIRECTION_KEYS`] held?
    pub fn any_direction(&self) -> bool {
        self.pressed.has_any(&DIRECTION_KEYS)
    }

    /// Release everything. Key-up events never arrive once the window loses focus.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Heading correction (radians, around +Y) applied to camera-forward.
    ///
    /// Forward is checked before back, and both before left/right alone, so
    /// contradictory combinations resolve deterministically:
    /// - forward wins over back,
    /// - left wins over right.
    pub fn direction_offset(&self) -> f32 {
        let left = self.is_pressed(Key::Left);
        let right = self.is_pressed(Key::Right);

        if self.is_pressed(Key::Forward) {
            if left {
                FRAC_PI_4
            } else if right {
                -FRAC_PI_4
            } else {
                0.0
            }
        } else if self.is_pressed(Key::Back) {
            if left {
                FRAC_PI_4 + FRAC_PI_2
            } else if right {
                -FRAC_PI_4 - FRAC_PI_2
            } else {
                PI
            }
        } else if left {
            FRAC_PI_2
        } else if right {
            -FRAC_PI_2
        } else {
            0.0
        }
    }
}
