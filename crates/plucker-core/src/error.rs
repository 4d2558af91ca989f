//! Error types for synthesis.

use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur while resolving notes or synthesizing audio.
///
/// Every variant is a caller-correctable input problem; none of them are
/// transient, so retrying the same call can never succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Malformed note name or pitch.
    #[error("invalid pitch '{input}': {reason}")]
    InvalidPitch {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Excitation buffer length that is zero or cannot be computed.
    #[error("invalid buffer length: {reason}")]
    InvalidBufferLength {
        /// Why the length was rejected.
        reason: String,
    },

    /// Invalid synthesis parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameters {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl SynthError {
    /// Creates an invalid pitch error.
    pub fn invalid_pitch(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPitch {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid buffer length error.
    pub fn invalid_buffer_length(reason: impl Into<String>) -> Self {
        Self::InvalidBufferLength {
            reason: reason.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SynthError::InvalidPitch { .. } => "SYNTH_001",
            SynthError::InvalidBufferLength { .. } => "SYNTH_002",
            SynthError::InvalidParameters { .. } => "SYNTH_003",
        }
    }

    /// Prefixes the error message with context, keeping the variant.
    ///
    /// Used by the chord mixer to name the voice that failed.
    pub fn in_voice(self, voice: &str) -> Self {
        match self {
            SynthError::InvalidPitch { input, reason } => SynthError::InvalidPitch {
                input,
                reason: format!("voice {}: {}", voice, reason),
            },
            SynthError::InvalidBufferLength { reason } => SynthError::InvalidBufferLength {
                reason: format!("voice {}: {}", voice, reason),
            },
            SynthError::InvalidParameters { name, message } => SynthError::InvalidParameters {
                name,
                message: format!("voice {}: {}", voice, message),
            },
        }
    }
}
