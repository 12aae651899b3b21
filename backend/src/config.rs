//! Runtime configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults;
//! 2. an optional `registrar.toml` in the working directory (or the file named by
//!    `REGISTRAR_CONFIG`);
//! 3. environment variables prefixed with `REGISTRAR_`, e.g. `REGISTRAR_PORT=9090`.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "registrar.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory receiving uploaded documents and photos.
    pub upload_dir: PathBuf,
    /// Largest accepted file part, in bytes.
    pub max_upload_bytes: u64,
    /// Students promoted per transaction by the promotion job.
    pub promotion_batch_size: usize,
    pub json_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("registrar.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            promotion_batch_size: 50,
            json_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = env::var("REGISTRAR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let defaults = AppConfig::default();

        let cfg = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path.to_string_lossy().to_string())?
            .set_default("upload_dir", defaults.upload_dir.to_string_lossy().to_string())?
            .set_default("max_upload_bytes", defaults.max_upload_bytes as i64)?
            .set_default("promotion_batch_size", defaults.promotion_batch_size as i64)?
            .set_default("json_limit_bytes", defaults.json_limit_bytes as i64)?
            .add_source(
                config::File::with_name(&file)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("REGISTRAR").try_parsing(true))
            .build()?;

        let loaded: AppConfig = cfg.try_deserialize()?;
        Ok(loaded.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.promotion_batch_size == 0 {
            self.promotion_batch_size = AppConfig::default().promotion_batch_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_batch_size_falls_back_to_default() {
        let cfg = AppConfig {
            promotion_batch_size: 0,
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.promotion_batch_size, 50);
    }

    #[test]
    fn loads_defaults_without_file_or_env() {
        let cfg = AppConfig::load().expect("defaults load");
        assert!(cfg.max_upload_bytes > 0);
        assert!(!cfg.host.is_empty());
    }
}
