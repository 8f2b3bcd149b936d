//! # Structured Logging
//!
//! Span macros shared by the API client and the CLI. Every outbound request
//! runs inside a `request_span!` carrying a fresh request id, so the debug
//! lines logged for one call can be grouped.

/// Create a tracing span for one outbound API request.
///
/// Extra fields may follow the path:
///
/// ```rust,ignore
/// let span = request_span!("GET", "/packages", page = 2);
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "api_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "api_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a CLI command
#[macro_export]
macro_rules! command_span {
    ($command:expr) => {
        tracing::debug_span!("cli_command", command = %$command)
    };
    ($command:expr, $($field:tt)*) => {
        tracing::debug_span!("cli_command", command = %$command, $($field)*)
    };
}

/// Log the resolved client settings once at startup
pub fn log_client_config(config: &crate::api::ClientConfig) {
    tracing::debug!(
        base_url = %config.base_url,
        timeout_secs = config.timeout,
        verbose = config.verbose,
        "TravelBook client configuration"
    );
}
