//! Error types shared by every portal surface.

/// Failure of a single gateway request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, connection reset, CORS, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// A response arrived with a non-2xx status at a call site that checks it.
    /// Renders as the bare status code, which is what the panels show.
    #[error("{status}")]
    Status { status: u16 },

    /// The body could not be read as the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api origin '{0}' must start with http:// or https://")]
    InvalidOrigin(String),

    #[error("poll interval '{0}' must be a positive number of milliseconds")]
    InvalidPollInterval(String),
}

/// Rejection of a claim form before anything is sent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClaimFormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),

    #[error("amount must be at least 1")]
    AmountTooSmall,
}
