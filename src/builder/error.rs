//! Build errors for machine construction.

use thiserror::Error;

/// Errors that can occur when composing and building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No root region specified. Call .root(region) before .build()")]
    MissingRoot,

    #[error("The root must be a composite or orthogonal region, not a single leaf")]
    LeafRoot,

    #[error("Too many states in the tree: {count} (at most 255 are supported)")]
    TooManyStates { count: usize },

    #[error("State type `{name}` appears more than once in the tree")]
    DuplicateState { name: &'static str },

    #[error("Region `{name}` must have at least one child")]
    EmptyRegion { name: &'static str },
}
