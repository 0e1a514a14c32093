use serde::Deserialize;

/// Server construction configuration.
///
/// Deserializable from YAML; every section has defaults so a partial file
/// (or none at all) is valid. [`Config::validate`] is called by
/// `WebServer::new` and fails fast on unusable values.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub sessions: SessionConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Addresses the accept loop binds to. At least one is required.
    pub listen_addrs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Root directory static file paths resolve under.
    pub root_dir: String,
    /// File name appended when a request path has no extension.
    pub index_file: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether cookie-backed sessions are resolved per request.
    pub enabled: bool,
    /// Idle timeout in seconds; also the sweep interval. Must be >= 1.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticFilesConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addrs: vec!["127.0.0.1:8080".to_string()],
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root_dir: ".".to_string(),
            index_file: "home.html".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 1000,
        }
    }
}

impl Config {
    /// Loads configuration from the file named by `TINYWEB_CONFIG`,
    /// falling back to defaults with a `LISTEN` address override.
    pub fn load() -> anyhow::Result<Self> {
        let cfg = match std::env::var("TINYWEB_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&raw)?
            }
            Err(_) => {
                let mut cfg = Config::default();
                if let Ok(addr) = std::env::var("LISTEN") {
                    cfg.server.listen_addrs = vec![addr];
                }
                cfg
            }
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen_addrs.is_empty() {
            anyhow::bail!("at least one listen address is required");
        }

        if self.sessions.enabled && self.sessions.timeout_secs < 1 {
            anyhow::bail!("session timeout must be at least 1 second");
        }

        Ok(())
    }
}
