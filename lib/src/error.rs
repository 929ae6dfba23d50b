use thiserror::Error;

/// Errors surfaced by the reduction entry points.
///
/// Precondition violations inside the core (popping an empty heap mid-run,
/// updating a node that left the heap) are programming errors and fail fast
/// via debug assertions rather than propagating as a variant here.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// An input element could not be converted to a point, or the input was
    /// not a sequence at all.
    #[error("could not convert to point: {0}")]
    Conversion(String),

    /// The requested reduction algorithm name is not recognized.
    #[error("unsupported reduction algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
