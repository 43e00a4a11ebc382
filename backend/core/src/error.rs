use thiserror::Error;

/// Top-level error type for the Mealflow fulfillment backend.
///
/// Conversational outcomes (quantity mismatch, order not found, a failed
/// line-item insert during checkout) are not faults: the handlers recover
/// from those by replying with fulfillment text. Only conditions that abort
/// the request end up here.
#[derive(Debug, Error)]
pub enum FulfillError {
    /// The upstream intent display name matched none of the routable
    /// intent/context keys.
    #[error("unknown intent: {0:?}")]
    UnknownIntent(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
