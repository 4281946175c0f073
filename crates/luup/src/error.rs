//! CLI error types with miette diagnostics.
//!
//! Maps `luup_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use luup_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(luup::connection_failed),
        help(
            "Check that the controller is powered on and reachable.\n\
             Local endpoints normally listen on port 3480: http://<ip>:3480/data_request"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: luup_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(luup::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout {
        #[source]
        source: luup_api::Error,
    },

    #[error("Could not set up the HTTP client: {message}")]
    #[diagnostic(
        code(luup::client_setup),
        help("Check the ca_cert path in your profile, or use --insecure (-k).")
    )]
    ClientSetup { message: String },

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller returned HTTP {status}")]
    #[diagnostic(code(luup::http_status), help("Response body: {body}"))]
    HttpStatus { status: u16, body: String },

    #[error("Luup engine did not answer OK to '{request}'")]
    #[diagnostic(
        code(luup::engine_not_ready),
        help("The engine may still be starting up. Retry in a few seconds.")
    )]
    EngineNotReady { request: String },

    #[error(transparent)]
    #[diagnostic(code(luup::request_failed))]
    Request(luup_api::Error),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(luup::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(luup::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: luup config init --name {name} --url <endpoint>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(luup::no_config),
        help(
            "Create a profile with: luup config init --url http://<ip>:3480/data_request\n\
             Or pass --controller / set LUUP_CONTROLLER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(luup::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ClientSetup { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::HttpStatus { status: 404, .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── luup_api::Error → CliError mapping ──────────────────────────────

impl From<luup_api::Error> for CliError {
    fn from(err: luup_api::Error) -> Self {
        match err {
            luup_api::Error::MissingArgument { name } => CliError::Validation {
                field: name.into(),
                reason: "must not be empty".into(),
            },

            luup_api::Error::InvalidArgument { name, reason } => CliError::Validation {
                field: name.into(),
                reason,
            },

            luup_api::Error::Transport(ref e) if e.is_timeout() => CliError::Timeout { source: err },

            luup_api::Error::Transport(ref e) if e.is_connect() => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), |u| strip_query(u).to_string()),
                source: err,
            },

            luup_api::Error::Status { status, body } => CliError::HttpStatus { status, body },

            luup_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "controller".into(),
                reason: format!("invalid URL: {e}"),
            },

            luup_api::Error::Client(message) => CliError::ClientSetup { message },

            other => CliError::Request(other),
        }
    }
}

fn strip_query(url: &url::Url) -> url::Url {
    let mut bare = url.clone();
    bare.set_query(None);
    bare
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_are_usage_errors() {
        let err = CliError::from(luup_api::Error::MissingArgument { name: "action" });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "action"));
    }

    #[test]
    fn http_status_codes() {
        let not_found = CliError::from(luup_api::Error::Status {
            status: 404,
            body: String::new(),
        });
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let server = CliError::from(luup_api::Error::Status {
            status: 500,
            body: "busy".into(),
        });
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn config_validation_keeps_its_field() {
        let err = CliError::from(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Invalid value for timeout: must be at least 1 second");
    }
}
