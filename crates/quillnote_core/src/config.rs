//! Layered runtime settings.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `QUILLNOTE__<SECTION>__<KEY>` environment variables

use crate::logging::default_log_level;
use ::config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "QUILLNOTE";
pub const DEFAULT_DB_PATH: &str = "quillnote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite database file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// Absolute log directory; file logging stays off when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from defaults, `file` (when given) and the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(file, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Like [`Settings::load`], reading variables from `vars` instead of the
    /// process environment.
    pub fn load_with_env(
        file: Option<&Path>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::build(
            file,
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(Some(vars)),
        )
    }

    fn build(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("database.path", DEFAULT_DB_PATH)?
            .set_default("logging.level", default_log_level())?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder.add_source(env).build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, DEFAULT_DB_PATH};
    use crate::logging::default_log_level;
    use ::config::Map;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::load_with_env(None, Map::new()).unwrap();
        assert_eq!(settings.database.path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(settings.logging.level, default_log_level());
        assert_eq!(settings.logging.dir, None);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\npath = \"from-file.sqlite3\"\n\n[logging]\nlevel = \"warn\"\ndir = \"/var/log/quillnote\""
        )
        .unwrap();

        let mut vars = Map::new();
        vars.insert(
            "QUILLNOTE__DATABASE__PATH".to_string(),
            "from-env.sqlite3".to_string(),
        );

        let settings = Settings::load_with_env(Some(file.path()), vars).unwrap();
        assert_eq!(settings.database.path, PathBuf::from("from-env.sqlite3"));
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(
            settings.logging.dir,
            Some(PathBuf::from("/var/log/quillnote"))
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(Settings::load_with_env(Some(&missing), Map::new()).is_err());
    }
}
