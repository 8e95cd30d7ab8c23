//! Error types for latvia-explorer

use thiserror::Error;

/// Rate-limit guidance shown alongside quota failures
pub const QUOTA_HELP_URL: &str = "https://ai.google.dev/gemini-api/docs/rate-limits";

/// Main error type for latvia-explorer operations
#[derive(Error, Debug)]
pub enum Error {
    /// The seed coordinate handed to a query is not a usable number pair
    #[error("Invalid seed coordinate: {0}")]
    InvalidSeed(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// The content provider failed or answered with something unusable
    #[error("Content provider failed: {0}")]
    Dispatch(String),

    /// The provider reported a rate-limit or billing quota condition
    #[error("Content provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("No API key configured for the content provider")]
    CredentialMissing,

    /// A newer query was issued while this one was in flight
    #[error("Query {ticket} was superseded by a newer query")]
    Superseded { ticket: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// True for the quota subtype of a dispatch failure
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }

    /// True for any failure of the remote call itself
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(
            self,
            Self::Dispatch(_) | Self::QuotaExceeded(_) | Self::Http(_) | Self::Json(_)
        )
    }

    /// Message shown to the person using the app
    ///
    /// Provider and seed failures get a localized message; anything else
    /// keeps its own description so the cause is not lost.
    pub fn user_message(&self) -> String {
        match self {
            Self::QuotaExceeded(_) => format!(
                "Kvota pārsniegta. Lūdzu, pārbaudiet savu Gemini API plānu un norēķinu informāciju: {}",
                QUOTA_HELP_URL
            ),
            Self::CredentialMissing => "API atslēga trūkst vai ir nederīga.".to_string(),
            Self::Config(msg) => format!("Konfigurācijas kļūda: {}", msg),
            Self::Dispatch(_) | Self::InvalidSeed(_) => {
                "Neizdevās iegūt informāciju. Lūdzu, mēģiniet vēlreiz.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for latvia-explorer operations
pub type Result<T> = std::result::Result<T, Error>;
