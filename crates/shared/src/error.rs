use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Network,
    MalformedResponse,
    EnrichmentFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    #[error("{resource} not found (status {status})")]
    NotFound { resource: String, status: u16 },
    #[error("network error while fetching {resource}: {message}")]
    Network { resource: String, message: String },
    #[error("malformed response for {resource}: {message}")]
    MalformedResponse { resource: String, message: String },
    #[error("enrichment failed: {0}")]
    EnrichmentFailure(String),
}

impl DexError {
    pub fn not_found(resource: impl Into<String>, status: u16) -> Self {
        Self::NotFound {
            resource: resource.into(),
            status,
        }
    }

    pub fn network(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn malformed(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Network { .. } => ErrorCode::Network,
            Self::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            Self::EnrichmentFailure(_) => ErrorCode::EnrichmentFailure,
        }
    }

    /// Message shown to the user when a primary fetch fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "No Pokémon matched that name or number.".to_string(),
            Self::Network { .. } => {
                "Could not reach the Pokémon service; check your connection and retry.".to_string()
            }
            Self::MalformedResponse { .. } => {
                "The Pokémon service returned data we could not read.".to_string()
            }
            Self::EnrichmentFailure(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variants() {
        assert_eq!(DexError::not_found("pokemon/x", 404).code(), ErrorCode::NotFound);
        assert_eq!(
            DexError::network("pokemon/x", "refused").code(),
            ErrorCode::Network
        );
        assert_eq!(
            DexError::malformed("pokemon/x", "eof").code(),
            ErrorCode::MalformedResponse
        );
        assert_eq!(
            DexError::EnrichmentFailure("chain".into()).code(),
            ErrorCode::EnrichmentFailure
        );
    }

    #[test]
    fn display_includes_resource() {
        let err = DexError::not_found("pokemon/missingno", 404);
        assert_eq!(err.to_string(), "pokemon/missingno not found (status 404)");
    }
}
