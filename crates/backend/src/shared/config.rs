use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of the bundled frontend, relative to the working directory
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5001,
            static_dir: "static".into(),
        }
    }
}

impl ServerConfig {
    /// Port to bind; the `PORT` environment variable wins over the file
    pub fn effective_port(&self) -> u16 {
        port_override(std::env::var("PORT").ok().as_deref()).unwrap_or(self.port)
    }
}

fn port_override(raw: Option<&str>) -> Option<u16> {
    let raw = raw?.trim();
    match raw.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring invalid PORT value: {:?}", raw);
            None
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/crm.db"

[server]
host = "0.0.0.0"
port = 5001
static_dir = "static"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(&config.database.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/crm.db");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.static_dir, "static");
    }

    #[test]
    fn test_server_section_is_optional() {
        let config: Config = toml::from_str("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/x.db")
        );
    }

    #[test]
    fn test_port_override() {
        assert_eq!(port_override(Some("8080")), Some(8080));
        assert_eq!(port_override(Some(" 8080 ")), Some(8080));
        assert_eq!(port_override(Some("http")), None);
        assert_eq!(port_override(None), None);
    }
}
