/// Production endpoint of the platform API.
pub const DEFAULT_BASE_URL: &str = "https://api.turso.tech";

/// Configures HTTP timeout behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Timeout for multipart uploads in milliseconds; `None` disables it.
    ///
    /// Database seeds can be large, so uploads are only bounded by the
    /// caller dropping the future unless this is set.
    pub upload_timeout_ms: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            upload_timeout_ms: None,
        }
    }
}
