use solar_common::BodyKind;

/// Errors from assembling a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("{body} orbits {parent}, which is not placed before it")]
    ParentNotPlaced { body: BodyKind, parent: BodyKind },
    #[error("{0} appears more than once")]
    DuplicateBody(BodyKind),
}
