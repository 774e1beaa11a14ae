//! Error types for the Pi-hole client
//!
//! This module defines all error types used throughout the workspace.

use std::fmt;

use thiserror::Error;

/// Result type alias for Pi-hole client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of entity a "not found" error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Local DNS host record (A record)
    DnsRecord,
    /// Local CNAME record
    CnameRecord,
    /// Allow/deny list domain entry
    Domain,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::DnsRecord => "DNS record",
            EntityKind::CnameRecord => "CNAME record",
            EntityKind::Domain => "domain",
        };
        f.write_str(name)
    }
}

/// Failure reported by the authentication endpoints
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The appliance rejected the login request (wrong password, malformed body)
    #[error("bad session request: {0}")]
    BadRequest(String),

    /// The appliance is rate limiting login attempts
    #[error("too many session requests: {0}")]
    TooManyRequests(String),

    /// The session used for the request is stale or forged
    #[error("unauthorized session request: {0}")]
    Unauthorized(String),

    /// The session does not exist (already logged out or expired)
    #[error("session not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("unexpected status code {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Message reported by the appliance
        message: String,
    },
}

/// Core error type for the Pi-hole client
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration, detected before any network activity
    #[error("Invalid client configuration: {0}")]
    ClientValidation(String),

    /// Login or logout failed
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthFailure),

    /// The requested entity does not exist on the appliance
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Entity kind
        kind: EntityKind,
        /// Lookup key (usually the domain)
        key: String,
    },

    /// Sending the request failed, with the call that triggered it
    #[error("failed to send request {method} {target}: {source}")]
    Transport {
        /// HTTP method
        method: String,
        /// Path or legacy action descriptor
        target: String,
        /// Underlying transport failure
        #[source]
        source: Box<Error>,
    },

    /// Raw HTTP client failure reported by a transport
    #[error("HTTP error: {0}")]
    Http(String),

    /// Malformed or unexpected response payload
    #[error("failed to decode {context}: {reason}")]
    Decode {
        /// What was being decoded
        context: String,
        /// Why decoding failed
        reason: String,
    },

    /// An entity call returned a status the operation does not expect
    #[error("{operation} received unexpected status code {status}: {body}")]
    UnexpectedStatus {
        /// Operation that was running
        operation: String,
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The legacy API acknowledged the request with `success: false`
    #[error("{operation} rejected by appliance: {message}")]
    Rejected {
        /// Operation that was running
        operation: String,
        /// Message reported by the appliance
        message: String,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ClientValidation(msg.into())
    }

    /// Create a "not found" error for an entity
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create a raw HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Wrap a transport failure with the call context
    pub fn transport(method: impl fmt::Display, target: impl fmt::Display, source: Error) -> Self {
        Self::Transport {
            method: method.to_string(),
            target: target.to_string(),
            source: Box::new(source),
        }
    }

    /// Create a decoding error
    pub fn decode(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an unexpected status error for an entity operation
    pub fn unexpected_status(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a legacy "success: false" error
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this is an entity "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The authentication failure, if this error is one
    pub fn auth_failure(&self) -> Option<&AuthFailure> {
        match self {
            Self::Authentication(failure) => Some(failure),
            _ => None,
        }
    }
}
