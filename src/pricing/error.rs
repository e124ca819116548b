use thiserror::Error;

/// Failure talking to a single upstream price source.
///
/// Never crosses the adapter boundary: adapters turn it into
/// [`PriceLookup::NoData`](crate::models::PriceLookup::NoData).
#[derive(Error, Debug)]
pub enum PriceSourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit error: {0}")]
    RateLimit(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PriceSourceError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(source: &str, status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => PriceSourceError::Authentication(format!(
                "{source} rejected the credentials ({status})"
            )),
            429 => PriceSourceError::RateLimit(format!("{source} rate limit exceeded")),
            _ => PriceSourceError::Api(format!("{source} returned {status}: {body}")),
        }
    }
}

impl From<reqwest::Error> for PriceSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PriceSourceError::Parse(err.to_string())
        } else {
            PriceSourceError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceSourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            PriceSourceError::from_status("Kiwi", StatusCode::UNAUTHORIZED, ""),
            PriceSourceError::Authentication(_)
        ));
        assert!(matches!(
            PriceSourceError::from_status("Kiwi", StatusCode::TOO_MANY_REQUESTS, ""),
            PriceSourceError::RateLimit(_)
        ));
        let err = PriceSourceError::from_status("Kiwi", StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
    }
}
