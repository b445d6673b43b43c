/// Errors surfaced by the canonicalization pipeline.
///
/// Lines that carry no domain are not errors; they are counted in
/// [`CanonStats`](crate::pipeline::CanonStats) and skipped.
#[derive(Debug, thiserror::Error)]
pub enum CanonError {
    #[error("No usable domains in input")]
    EmptyInput,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
