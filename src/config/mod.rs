//! Configuration management
//!
//! Two layers:
//! - [`ClientConfig`]: backend and push-channel base URLs baked into the
//!   client at build time (`EVENT_HIVE_API_URL`, `EVENT_HIVE_PUSH_URL`).
//! - [`ServerConfig`]: settings for the host process that serves the app,
//!   loaded from `event-hive.toml` and `EVENT_HIVE_*` environment variables.

use anyhow::{anyhow, Result};

/// Backend used when no URL is configured at build time
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Socket.IO endpoint path and query for a v4 server over WebSocket
const SOCKET_IO_PATH: &str = "/socket.io/";
const SOCKET_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Client-side endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API base, no trailing slash
    pub api_base: String,
    /// Push server base (http/https form; converted to ws/wss on connect)
    pub push_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

impl ClientConfig {
    /// Resolve from the environment captured at compile time
    pub fn from_build_env() -> Self {
        Self::resolve(
            option_env!("EVENT_HIVE_API_URL"),
            option_env!("EVENT_HIVE_PUSH_URL"),
        )
    }

    /// Resolve from explicit values. The push base falls back to the API
    /// base, which falls back to [`DEFAULT_BACKEND_URL`].
    pub fn resolve(api_base: Option<&str>, push_base: Option<&str>) -> Self {
        let api_base = api_base
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
            .trim_end_matches('/')
            .to_string();
        let push_base = push_base
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| api_base.clone());
        Self {
            api_base,
            push_base,
        }
    }

    /// WebSocket URL of the Socket.IO endpoint on the push server
    pub fn push_socket_url(&self) -> Result<String> {
        let mut url = url::Url::parse(&self.push_base)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(anyhow!("unsupported push scheme: {other}")),
        };
        url.set_scheme(scheme)
            .map_err(|_| anyhow!("cannot switch {} to {scheme}", self.push_base))?;
        url.set_path(SOCKET_IO_PATH);
        url.set_query(Some(SOCKET_IO_QUERY));
        Ok(url.into())
    }
}

#[cfg(feature = "server")]
pub use server::{load_server_config, ServerConfig};

#[cfg(feature = "server")]
mod server {
    use anyhow::{Context, Result};
    use serde::Deserialize;
    use std::net::{IpAddr, SocketAddr};
    use std::path::PathBuf;

    /// Read from the working directory unless `EVENT_HIVE_CONFIG` names a file
    const CONFIG_FILE: &str = "event-hive.toml";

    /// Host process settings
    #[derive(Debug, Deserialize)]
    pub struct ServerConfig {
        pub host: IpAddr,
        pub port: u16,
    }

    impl ServerConfig {
        pub fn addr(&self) -> SocketAddr {
            SocketAddr::new(self.host, self.port)
        }
    }

    fn config_path() -> PathBuf {
        std::env::var_os("EVENT_HIVE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// `PORT` as injected by hosting platforms. A malformed value is ignored.
    fn platform_port() -> Option<u16> {
        let raw = std::env::var("PORT").ok()?;
        match raw.trim().parse() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!("Ignoring PORT={:?}: not a port number", raw);
                None
            }
        }
    }

    /// Layers, weakest first: defaults, the config file, `EVENT_HIVE_*`
    /// variables. `PORT` applies only while `EVENT_HIVE_PORT` is unset.
    pub fn load_server_config() -> Result<ServerConfig> {
        let path = config_path();

        let mut builder = ::config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(::config::File::from(path.as_path()).required(false))
            .add_source(::config::Environment::with_prefix("EVENT_HIVE").try_parsing(true));

        if std::env::var_os("EVENT_HIVE_PORT").is_none() {
            if let Some(port) = platform_port() {
                builder = builder.set_override("port", port)?;
            }
        }

        builder
            .build()?
            .try_deserialize()
            .with_context(|| format!("invalid server settings (file: {})", path.display()))
    }
}
