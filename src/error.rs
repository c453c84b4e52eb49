use thiserror::Error;

/// Errors raised while building a gauge layout or loading its configuration.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// A tick, label or segment boundary lies outside the gauge range.
    #[error("value '{value}' is outside the valid range of the gauge ({min} to {max})")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("invalid gauge range: max ({max}) must be greater than min ({min}) and both finite")]
    InvalidRange { min: f64, max: f64 },

    /// Tick and label lists must be ascending; repeated values are allowed.
    #[error("value '{value}' follows '{previous}' but lists must be ascending")]
    Descending { previous: f64, value: f64 },

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
