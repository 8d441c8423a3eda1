//! Layered configuration: defaults, optional TOML file, `CABINET__*` env.

use std::path::Path;

use anyhow::{Context, Result};
use cabinet_core::{ClinicSettings, ProfileSettings, ReportSettings, StatsSettings, StoreSettings};
use config::{Config, Environment, File};
use serde::Deserialize;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "cabinet";

/// HTTP listener and CORS settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            cors_origins: vec!["http://localhost:3000".to_string()],
            log_json: false,
        }
    }
}

/// Whole application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub profile: ProfileSettings,
    pub stats: StatsSettings,
    pub report: ReportSettings,
}

impl AppConfig {
    /// Settings for the core clinic.
    pub fn clinic_settings(&self) -> ClinicSettings {
        ClinicSettings {
            store: self.store.clone(),
            profile: self.profile.clone(),
            stats: self.stats,
            report: self.report,
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist; otherwise `cabinet.{toml,yaml,json}` is
/// read when present. Environment variables such as
/// `CABINET__STORE__BACKEND=document` override both.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let env = Environment::with_prefix("CABINET")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
        .try_parsing(true);

    let config = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()
        .context("Failed to read configuration")?;

    config
        .try_deserialize()
        .context("Failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_core::{IdScheme, StoreBackend};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.profile.recompute_occupancy);
        assert!(config.stats.month_histogram);
        assert!(config.report.stop_at_margin);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cabinet.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[store]
backend = "document"
id_scheme = "current-size"
seed_demo = true

[profile]
nom = "Cabinet du Port"
recompute_occupancy = false

[stats]
month_histogram = false
"#
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.backend, StoreBackend::Document);
        assert_eq!(config.store.id_scheme, IdScheme::CurrentSize);
        assert!(config.store.seed_demo);
        assert_eq!(config.profile.nom, "Cabinet du Port");
        assert!(!config.profile.recompute_occupancy);
        assert!(!config.stats.month_histogram);

        let settings = config.clinic_settings();
        assert_eq!(settings.profile.nom, "Cabinet du Port");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
