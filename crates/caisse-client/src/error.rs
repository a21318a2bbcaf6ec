//! # Client Error Types
//!
//! Error types for backend calls and session operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Not found     │  │   Transport     │  │   Server rejection      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ ArticleNotFound │  │ Transport       │  │ Rejected (message is    │ │
//! │  │                 │  │ InvalidResponse │  │ shown verbatim)         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐ │
//! │  │  Local input    │  │  Configuration                              │ │
//! │  │                 │  │                                             │ │
//! │  │ EmptyCart       │  │ InvalidConfig  InvalidUrl                   │ │
//! │  │ Core(..)        │  │ ConfigLoadFailed  ConfigSaveFailed          │ │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  None of these is retried automatically; the cart is left as it was.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caisse_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown for any connectivity failure.
pub const TRANSPORT_MESSAGE: &str = "Impossible de contacter le serveur. Vérifiez votre connexion.";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Lookup
    // =========================================================================
    /// No article matches a scanned barcode.
    #[error("Article not found: {barcode}")]
    ArticleNotFound { barcode: String },

    // =========================================================================
    // Transport
    // =========================================================================
    /// Connection refused, timeout, DNS failure...
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered something that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Business rules
    // =========================================================================
    /// The backend refused the invoice (out of stock, inactive article...).
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Submission attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart rule or input validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The checkout page did not contain a CSRF token.
    #[error("CSRF token not found on checkout page")]
    MissingCsrfToken,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Connectivity problems: the request may never have reached the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::InvalidResponse(_)
        )
    }

    /// The backend understood the request and said no.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Text shown to the cashier.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::ArticleNotFound { .. } => {
                "Article non trouvé dans la base de données".to_string()
            }
            ClientError::Transport(_) | ClientError::InvalidResponse(_) => {
                TRANSPORT_MESSAGE.to_string()
            }
            ClientError::Rejected(message) => format!(
                "Erreur serveur lors de la création de la facture : {}",
                message
            ),
            ClientError::EmptyCart | ClientError::Core(CoreError::EmptyCart) => {
                "Le panier est vide".to_string()
            }
            ClientError::Core(CoreError::Validation(err)) => format!("Saisie invalide : {}", err),
            ClientError::Core(err) => err.to_string(),
            ClientError::MissingCsrfToken => {
                "Session expirée, rechargez la page de caisse".to_string()
            }
            other => other.to_string(),
        }
    }
}
