use crate::action::Action;
use solar_common::OrbitDirection;
use std::collections::HashSet;

/// Keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    W,
    A,
    S,
    D,
    Space,
}

/// Anything that can answer "is this key held right now".
///
/// The desktop app backs this with window events; tests use a fixed set.
pub trait KeySource {
    fn is_pressed(&self, key: Key) -> bool;
}

/// Held-key set fed by press/release events.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            if self.held.insert(key) {
                tracing::trace!(?key, "key down");
            }
        } else if self.held.remove(&key) {
            tracing::trace!(?key, "key up");
        }
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl KeySource for KeyboardState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Key bindings, checked in this order every frame.
const BINDINGS: [(Key, Action); 6] = [
    (Key::Escape, Action::Quit),
    (Key::W, Action::OrbitCamera(OrbitDirection::Up)),
    (Key::S, Action::OrbitCamera(OrbitDirection::Down)),
    (Key::D, Action::OrbitCamera(OrbitDirection::Right)),
    (Key::A, Action::OrbitCamera(OrbitDirection::Left)),
    (Key::Space, Action::ToggleAnimation),
];

/// Poll every bound key and return the actions whose key is held.
///
/// Held keys repeat every frame; debouncing is the consumer's job.
pub fn poll_actions(source: &impl KeySource) -> Vec<Action> {
    BINDINGS
        .iter()
        .filter(|(key, _)| source.is_pressed(*key))
        .map(|(_, action)| *action)
        .collect()
}
