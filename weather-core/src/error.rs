use std::collections::BTreeMap;

use thiserror::Error as ThisError;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure that crosses a service boundary is one of these variants.
///
/// The web layer renders errors from this taxonomy alone, so components never
/// write responses of their own.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// User-correctable input problem (HTTP 400).
    #[error("{message}")]
    Validation {
        message: String,
        /// Field name -> human-readable message for each offending field.
        fields: BTreeMap<String, String>,
    },

    /// Failure attributable to an upstream service or the transport.
    ///
    /// Displays as the user-facing `"Service error with {service}: ..."` form.
    #[error("Service error with {service}: {message}")]
    Api {
        message: String,
        status_code: u16,
        /// Origin of the failure, e.g. "OpenWeatherMap" or "HTTP Client".
        service: String,
    },

    /// Anything not raised by this workspace's own code (HTTP 500).
    #[error("{message}")]
    Unknown { message: String },
}

impl Error {
    /// Validation failure without field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Validation failure where the message doubles as the single field's detail.
    pub fn validation_for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let fields = BTreeMap::from([(field.into(), message.clone())]);
        Self::Validation { message, fields }
    }

    /// Validation failure with an explicit field -> message mapping.
    pub fn validation_with_fields(
        message: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            fields,
        }
    }

    /// Upstream or transport failure attributed to `service`.
    pub fn api(message: impl Into<String>, status_code: u16, service: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            service: service.into(),
        }
    }

    /// Uncategorized failure, treated as an internal error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// HTTP status code this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Api { status_code, .. } => *status_code,
            Self::Unknown { .. } => 500,
        }
    }

    /// The raw message, without the `Api` user-facing prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Api { message, .. }
            | Self::Unknown { message } => message,
        }
    }
}
