//! Keyboard input polled once per frame and mapped to scene actions.
//!
//! # Invariants
//! - Input is polled, not queued: a held key produces its action every frame.
//! - The scene never sees window-system key codes, only [`Key`] and [`Action`].

pub mod action;
pub mod keyboard;

pub use action::Action;
pub use keyboard::{Key, KeySource, KeyboardState, poll_actions};
