use solar_common::OrbitDirection;

/// A high-level action produced from the polled keyboard state.
///
/// The scene consumes actions, never raw key codes. This keeps the composer
/// testable without a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ask the window to close.
    Quit,
    /// Orbit the camera one step in the given direction.
    OrbitCamera(OrbitDirection),
    /// Pause or resume the animation (debounced by the scene).
    ToggleAnimation,
}
