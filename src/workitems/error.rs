//! Error types exposed by the work item layer.

use thiserror::Error;

/// Errors surfaced while talking to the Azure DevOps work item store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkItemError {
    /// No access token was configured.
    #[error("Azure DevOps access token is required (use --token or SYSTEM_ACCESSTOKEN)")]
    MissingToken,

    /// The organisation URL is missing or cannot be turned into an endpoint.
    #[error("Azure DevOps URL is invalid: {0}")]
    InvalidUrl(String),

    /// Azure DevOps rejected the credentials.
    #[error("Azure DevOps rejected the token: {message}")]
    Authentication {
        /// Error message returned with the 401/403 response.
        message: String,
    },

    /// Azure DevOps returned a non-authentication API error.
    #[error("Azure DevOps API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling Azure DevOps.
    #[error("network error talking to Azure DevOps: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("unexpected Azure DevOps response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },
}
