//! Error types for the storefront API client.
//!
//! # Design
//! The views treat every variant the same way (a network-or-server failure);
//! the variants exist so the log line says what actually went wrong. There is
//! deliberately no not-found or conflict variant: a non-2xx status of any kind
//! lands in `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `ShopClient` and by transports executing its requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status outside 2xx.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type,
    /// or it violated a cart/catalog invariant.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
