//! Error types for orrery.
//!
//! Every fallible operation returns `Result<T, OrreryError>`; library code
//! does not panic on bad input.

use thiserror::Error;

/// Result type alias for orrery operations.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Unified error type for all orrery operations.
///
/// Variants are split into client errors (a request named something that
/// cannot be computed) and server errors (I/O, encoding, configuration).
#[derive(Debug, Error)]
pub enum OrreryError {
    // ===== Request Errors =====
    /// Eccentricity outside the closed-orbit range `[0, 1)`.
    #[error("eccentricity {ecc} is outside [0, 1): open orbits are not supported")]
    InvalidEccentricity {
        /// Offending eccentricity.
        ecc: f64,
    },

    /// Body name not present in the registry.
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// A task received the wrong number of bodies.
    #[error("{task} requires exactly {expected} bodies, got {actual}")]
    BodyCount {
        /// Task that rejected the selection.
        task: &'static str,
        /// Required number of bodies.
        expected: usize,
        /// Number of bodies supplied.
        actual: usize,
    },

    /// A task received no bodies at all.
    #[error("{0} requires at least one body")]
    EmptySelection(&'static str),

    /// Time grid handed to the Kepler solver is unusable.
    #[error("invalid time grid: {0}")]
    InvalidTimes(String),

    /// A requested time lies outside the solver's interpolation range.
    #[error("time {time} lies outside the solved range [{min}, {max}]")]
    TimeOutOfRange {
        /// Requested time (years).
        time: f64,
        /// First tabulated time.
        min: f64,
        /// Last tabulated time.
        max: f64,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O and Output Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// GIF encoder failure.
    #[error("GIF encoding error: {0}")]
    Encoding(#[from] gif::EncodingError),

    /// Figure could not be rendered.
    #[error("Render error: {0}")]
    Render(String),
}

impl OrreryError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create an invalid-times error.
    #[must_use]
    pub fn invalid_times(message: impl Into<String>) -> Self {
        Self::InvalidTimes(message.into())
    }

    /// Check whether this error was caused by the request rather than the
    /// server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEccentricity { .. }
                | Self::UnknownBody(_)
                | Self::BodyCount { .. }
                | Self::EmptySelection(_)
                | Self::InvalidTimes(_)
                | Self::TimeOutOfRange { .. }
        )
    }
}
