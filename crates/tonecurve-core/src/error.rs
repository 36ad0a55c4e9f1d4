//! Errors for host-facing conversions.
//!
//! Pointer handling and curve mutation never fail; out-of-range input is
//! clamped or ignored. Only values crossing the host boundary (channel
//! indices, configuration) are validated.

#[derive(Debug, thiserror::Error)]
pub enum ToneCurveError {
    #[error("channel index out of range: {0} (expected 0..=3)")]
    InvalidChannel(u8),
    #[error("failed to parse editor config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid editor config: {0}")]
    InvalidConfig(&'static str),
}
