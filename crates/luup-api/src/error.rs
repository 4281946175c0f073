use thiserror::Error;

/// Top-level error type for the `luup-api` crate.
///
/// Argument errors are raised locally before any network activity.
/// Everything else comes from the HTTP transport; response bodies are
/// never inspected, so a Luup error string returned with HTTP 200 is a
/// successful call as far as this crate is concerned.
#[derive(Debug, Error)]
pub enum Error {
    // ── Arguments ───────────────────────────────────────────────────
    /// A required request field (`id`, `action`, `Variable`, ...) was empty.
    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    /// An argument was present but unusable (e.g. a whitespace-only name).
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The controller answered with a non-success status.
    #[error("Controller returned HTTP {status}")]
    Status { status: u16, body: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (TLS backend, bad CA file, ...).
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl Error {
    /// Returns `true` for errors raised before any request was sent.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the controller answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn blank_name(name: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            reason: "cannot be empty or pure whitespace".into(),
        }
    }
}
