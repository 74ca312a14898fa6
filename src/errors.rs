use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Rejected user input; the message is shown as is
    #[error("{message}")]
    Validation { message: String },

    /// Negative or non-finite price
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    /// No supplier with this id
    #[error("Supplier not found: {id}")]
    SupplierNotFound { id: i64 },

    /// A known id is already the largest representable one
    #[error("No identifiers left after {last}")]
    IdsExhausted { last: i64 },

    /// The request never got an HTTP answer
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Remote endpoint returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// A body did not match the expected JSON shape
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A timestamp in neither RFC 3339 nor zone-less ISO form
    #[error("Unrecognised timestamp: {value}")]
    Timestamp { value: String },

    /// Endpoint storage failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Socket or file failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by bad user input rather than the environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidAmount { .. })
    }

    /// True for failed or rejected calls to the remote endpoint.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Remote { .. } | Self::Decode(_) | Self::Timestamp { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
