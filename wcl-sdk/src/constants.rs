// ABOUTME: Centralized constants for the Warcraft Logs SDK
// ABOUTME: Contains endpoints, retry configuration, timeouts and pagination limits

/// Retry configuration constants
pub mod retry {
    use std::time::Duration;

    /// Maximum number of transport-level retry attempts
    pub const MAX_RETRIES: u32 = 3;

    /// Initial delay before first retry
    pub const INITIAL_DELAY: Duration = Duration::from_millis(100);

    /// Maximum delay between retries
    pub const MAX_DELAY: Duration = Duration::from_secs(10);

    /// Backoff multiplier for exponential backoff
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
}

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Warcraft Logs API URLs
pub mod urls {
    /// GraphQL endpoint for client-credential access
    pub const WCL_API_CLIENT: &str = "https://www.warcraftlogs.com/api/v2/client";

    /// OAuth token exchange URL
    pub const WCL_OAUTH_TOKEN: &str = "https://www.warcraftlogs.com/oauth/token";
}

/// Authentication constants
pub mod auth {
    /// Message the API puts in a top-level `error` field for a rejected credential
    pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";

    /// `extensions.code` value carried by GraphQL errors for a rejected credential
    pub const UNAUTHENTICATED_CODE: &str = "UNAUTHENTICATED";

    /// Default on-disk location of the cached OAuth token
    pub const DEFAULT_TOKEN_PATH: &str = "token.tk";

    /// Lifetime assumed for a token response that omits `expires_in`
    pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
}

/// Pagination limits
pub mod pagination {
    /// Upper bound on pages fetched for a single logical query
    pub const MAX_PAGES: usize = 1000;
}
