//! Error types and handling for the `FlightIdeas` application

use thiserror::Error;

/// Main error type for the `FlightIdeas` application
#[derive(Error, Debug)]
pub enum FlightIdeasError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Required request fields were absent or empty
    #[error("Missing required parameters: {}", fields.join(", "))]
    MissingParameters { fields: Vec<String> },
}

impl FlightIdeasError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a missing-parameters error from the offending field names
    pub fn missing_parameters<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameters {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the caller is at fault (maps to HTTP 400)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FlightIdeasError::Validation { .. } | FlightIdeasError::MissingParameters { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlightIdeasError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            FlightIdeasError::Validation { .. } | FlightIdeasError::MissingParameters { .. } => {
                self.to_string()
            }
        }
    }
}
