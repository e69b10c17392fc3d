use thiserror::Error;

/// Errors surfaced by the carrier client and the rate-shopping path.
///
/// Carrier API failures propagate unchanged — no retry, no fallback rate;
/// the checkout flow decides what to present.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("carrier API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("carrier client configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, RateError>;
