//! Shared error type across ownergate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Upstream item lacks its identifier field.
    MissingIdentifier,
    /// Body could not be decoded into the expected shape.
    DecodeFailed,
    /// Rewritten body could not be serialized.
    EncodeFailed,
    /// Invalid input / configuration.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MissingIdentifier => "MISSING_IDENTIFIER",
            ClientCode::DecodeFailed => "DECODE_FAILED",
            ClientCode::EncodeFailed => "ENCODE_FAILED",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, OwnerGateError>;

/// Unified error type used by core and gateway.
///
/// Access denial is not represented here: it is a regular outcome of the
/// engine, see [`crate::engine::InspectOutcome`].
#[derive(Debug, Error)]
pub enum OwnerGateError {
    #[error("resource identifier not found (field `{field}`)")]
    MissingIdentifier { field: String },
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl OwnerGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            OwnerGateError::MissingIdentifier { .. } => ClientCode::MissingIdentifier,
            OwnerGateError::Decode(_) => ClientCode::DecodeFailed,
            OwnerGateError::Encode(_) => ClientCode::EncodeFailed,
            OwnerGateError::BadRequest(_) => ClientCode::BadRequest,
            OwnerGateError::Internal(_) => ClientCode::Internal,
        }
    }
}
