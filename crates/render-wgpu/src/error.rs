use solar_common::ModelHandle;

/// Errors from submitting a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("frame references model {0:?}, which was never uploaded")]
    UnknownModel(ModelHandle),
    #[error("frame needs {needed} draw slots but only {capacity} are allocated")]
    TooManyDraws { needed: usize, capacity: usize },
}
