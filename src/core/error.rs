use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum IssError {
    /// An error occurred during an HTTP request (DNS, TCP, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The proxy URL given to the builder was rejected.
    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A login was requested on a client built without credentials.
    #[error("no credentials configured for MOEX Passport login")]
    MissingCredentials,

    /// The passport endpoint answered, but did not grant a session cookie.
    #[error("session cookie `{name}` was not set by the passport endpoint")]
    SessionCookieMissing {
        /// Name of the cookie that was expected.
        name: &'static str,
    },

    /// A valid real-time session could not be established after re-authentication.
    #[error("real-time session unavailable: authentication did not yield a valid session")]
    AuthUnavailable,

    /// A paginated fetch aborted at the given `start` offset. No partial data is returned.
    #[error("paged fetch aborted at start={start}: {source}")]
    Fetch {
        /// The offset of the page request that failed.
        start: u64,
        /// The underlying transport or decode error.
        #[source]
        source: Box<IssError>,
    },

    /// The response body was not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// An invalid date range was provided (`from` must not be after `till`).
    #[error("invalid date range: from must not be after till")]
    InvalidDates,
}

impl IssError {
    /// Returns the innermost error, unwrapping any [`IssError::Fetch`] layers.
    pub fn root(&self) -> &IssError {
        match self {
            IssError::Fetch { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for transport-level failures (network errors and non-2xx statuses).
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), IssError::Http(_) | IssError::Status { .. })
    }

    /// True when the response could not be decoded into the expected shape.
    pub fn is_decode(&self) -> bool {
        matches!(self.root(), IssError::Json(_) | IssError::Data(_))
    }
}
