//! Error types for the fingerprinting engine.
//!
//! Only configuration and lookup problems are surfaced as errors. Probe
//! failures are recorded as data on the observation and hypothesis
//! evaluation failures are absorbed by the match engine.

use thiserror::Error;

/// Errors that can occur while setting up or driving a fingerprint run.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The target configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A capability name was requested that the configuration does not define.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// Two capabilities share a name.
    #[error("duplicate capability: {0}")]
    DuplicateCapability(String),
}

/// Result type for fingerprinting operations.
pub type FingerprintResult<T> = Result<T, FingerprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = FingerprintError::Configuration("base_url is empty".into());
        assert_eq!(err.to_string(), "configuration error: base_url is empty");

        let err = FingerprintError::UnknownCapability("warp".into());
        assert_eq!(err.to_string(), "unknown capability: warp");

        let err = FingerprintError::DuplicateCapability("zap".into());
        assert_eq!(err.to_string(), "duplicate capability: zap");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FingerprintError>();
    }
}
