//! Error taxonomy for the reconciliation pipeline.
//!
//! `InvalidQuantity` and `InvalidCapacity` are raised by the pure
//! components (C1, C6) and are fatal to the pass that raised them.
//! `ExternalUnavailable` wraps a cluster or cloud API failure, also
//! fatal to the pass. `Constrained` is not part of this enum: a clamp
//! is a warning, not an error, and is surfaced via `log::warn!` from
//! the resize applier without aborting anything (spec.md §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoscalerError {
    #[error("invalid resource quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("node capacity for resource {resource:?} is {capacity} but {needed} is needed")]
    InvalidCapacity {
        resource: String,
        capacity: f64,
        needed: f64,
    },

    #[error("external API unavailable: {0}")]
    ExternalUnavailable(String),
}

impl From<kube::Error> for AutoscalerError {
    fn from(err: kube::Error) -> Self {
        AutoscalerError::ExternalUnavailable(err.to_string())
    }
}
