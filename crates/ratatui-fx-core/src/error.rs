use thiserror::Error;

/// Errors raised at the catalog boundary.
///
/// Effects themselves never fail: invalid configuration is coerced to defaults and a missing or
/// zero-sized render target turns drawing into a no-op. These variants only surface when a caller
/// asks for something that cannot be coerced, like an unknown slug or a props document that is
/// not JSON.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("invalid props: {0}")]
    InvalidProps(String),

    #[error("props are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FxError>;
