/// Default WebSocket endpoint path.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Default maximum inbound message size in bytes.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4096;

/// Beacon server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Path that accepts WebSocket upgrade requests.
    pub ws_path: String,
    /// Maximum inbound message size in bytes. Frames above this limit fail
    /// the offending session at the transport layer instead of being
    /// silently truncated.
    pub max_frame_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default, so this never fails.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            ws_path: std::env::var("WS_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_WS_PATH.to_string()),
            max_frame_bytes: std::env::var("MAX_FRAME_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_FRAME_BYTES),
        }
    }
}
