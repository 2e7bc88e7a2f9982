use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplingError {
    /// Cooperative cancellation was observed mid refresh.
    #[error("refresh cancelled")]
    Cancelled,
    /// The dataset could not produce a required section.
    #[error("dataset read failed: {0}")]
    DatasetRead(String),
    /// A host collaborator could not be resolved at activation.
    #[error("could not resolve {0}")]
    Unresolved(&'static str),
}
