use serde::Deserialize;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 6000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 6000;
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Options for a [`Resolver`](crate::Resolver).
///
/// Every field is optional so the struct can be embedded verbatim in an
/// application's own configuration file; unset fields fall back to the
/// defaults above at the point of use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConfig {
    /// User agent sent with every fetch
    pub user_agent: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
    /// How many levels of nested playlists to follow
    pub max_depth: Option<usize>,
    /// When set, top-level fetch and parse failures are logged and an
    /// empty or partially filled playlist is returned instead of an error
    #[serde(default)]
    pub degrade_on_error: bool,
}
