//! Error types for the zdrift library

use thiserror::Error;

/// Result type alias for zdrift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for a reconciliation run
///
/// Every variant is fatal: the run surfaces the first error and aborts
/// without retrying. Unexpected filesystem entries seen while walking the
/// desired-state tree are not errors; they are collected as anomalies on
/// the walk outcome and logged as warnings.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or runtime arguments failed schema validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote API could not be reached or reported a failure
    #[error("remote api failure in {operation}: {message}")]
    Remote {
        /// API operation that failed (e.g. `template.get`)
        operation: String,
        /// Detail from the transport or the API error object
        message: String,
    },

    /// Malformed structured content, remote or local
    #[error("malformed document ({context}): {source}")]
    Parse {
        /// What was being parsed (file path or template name)
        context: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem read or write failure
    #[error("i/o failure ({context}): {source}")]
    Io {
        /// Operation and path that failed
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a [`Error::Remote`] from an operation name and any displayable failure
    pub fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Build a [`Error::Parse`] with context naming the document
    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Build a [`Error::Io`] with context naming the operation and path
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
