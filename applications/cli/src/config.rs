/// CLI configuration
///
/// Sources, lowest priority first: built-in defaults, `tilawa.toml` (or the
/// file given with `--config`), then `TILAWA_<SECTION>__<KEY>` environment
/// variables (e.g. `TILAWA_STORAGE__DATABASE_URL`).
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tilawa_core::Reciter;
use tilawa_playback::PlaybackConfig;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tilawa.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_resolver")]
    pub resolver: ResolverSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolverSettings {
    /// Audio URL with `{reciter}`, `{sura}` and `{ayah}` placeholders
    #[serde(default = "default_url_template")]
    pub url_template: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// How long the simulated engine "plays" each queue entry at 1x
    #[serde(default = "default_simulated_track_ms")]
    pub simulated_track_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_reciter_id")]
    pub default_reciter_id: String,

    #[serde(default = "default_reciter_name")]
    pub default_reciter_name: String,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// A missing file is only an error when it was asked for explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        Self::load_from(file.as_deref(), environment())
    }

    fn load_from(file: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(file) = file {
            settings = settings.add_source(config::File::from(file));
        }
        settings = settings.add_source(env);

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let template = &self.resolver.url_template;
        if template.trim().is_empty() {
            return Err(CliError::Config(
                "resolver.url_template must not be empty".to_string(),
            ));
        }
        for placeholder in ["{sura}", "{ayah}"] {
            if !template.contains(placeholder) {
                return Err(CliError::Config(format!(
                    "resolver.url_template is missing the {placeholder} placeholder"
                )));
            }
        }

        if self.engine.simulated_track_ms == 0 {
            return Err(CliError::Config(
                "engine.simulated_track_ms must be positive".to_string(),
            ));
        }

        if self.playback.default_reciter_id.trim().is_empty() {
            return Err(CliError::Config(
                "playback.default_reciter_id must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Player configuration seeded from these settings
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            default_reciter: Reciter::new(
                self.playback.default_reciter_id.clone(),
                self.playback.default_reciter_name.clone(),
            ),
            ..PlaybackConfig::default()
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("TILAWA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://tilawa.db".to_string()
}

fn default_resolver() -> ResolverSettings {
    ResolverSettings {
        url_template: default_url_template(),
    }
}

fn default_url_template() -> String {
    "https://everyayah.com/data/{reciter}/{sura}{ayah}.mp3".to_string()
}

fn default_engine() -> EngineSettings {
    EngineSettings {
        simulated_track_ms: default_simulated_track_ms(),
    }
}

fn default_simulated_track_ms() -> u64 {
    1500
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        default_reciter_id: default_reciter_id(),
        default_reciter_name: default_reciter_name(),
    }
}

fn default_reciter_id() -> String {
    Reciter::default().id
}

fn default_reciter_name() -> String {
    Reciter::default().name
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            resolver: default_resolver(),
            engine: default_engine(),
            playback: default_playback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty_env() -> config::Environment {
        environment().source(Some(config::Map::new()))
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = CliConfig::load_from(None, empty_env()).unwrap();

        assert_eq!(config, CliConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[storage]
database_url = "sqlite:///tmp/recitation.db"

[engine]
simulated_track_ms = 250
"#
        )
        .unwrap();

        let config = CliConfig::load_from(Some(file.path()), empty_env()).unwrap();

        assert_eq!(config.storage.database_url, "sqlite:///tmp/recitation.db");
        assert_eq!(config.engine.simulated_track_ms, 250);
        assert_eq!(config.resolver, default_resolver());
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\nsimulated_track_ms = 250").unwrap();

        let mut vars = config::Map::new();
        vars.insert("TILAWA_ENGINE__SIMULATED_TRACK_MS".to_string(), "40".to_string());
        vars.insert(
            "TILAWA_PLAYBACK__DEFAULT_RECITER_ID".to_string(),
            "Husary_64kbps".to_string(),
        );

        let config =
            CliConfig::load_from(Some(file.path()), environment().source(Some(vars))).unwrap();

        assert_eq!(config.engine.simulated_track_ms, 40);
        assert_eq!(config.playback.default_reciter_id, "Husary_64kbps");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = CliConfig::load(Some(Path::new("/definitely/not/here/tilawa.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_templates() {
        let mut config = CliConfig::default();

        config.resolver.url_template = "  ".to_string();
        assert!(config.validate().is_err());

        config.resolver.url_template = "https://cdn/{reciter}/{sura}.mp3".to_string();
        assert!(config.validate().is_err());

        config.resolver.url_template = "https://cdn/{reciter}/{ayah}.mp3".to_string();
        assert!(config.validate().is_err());

        config.resolver.url_template = "https://cdn/{sura}/{ayah}.mp3".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_track_duration() {
        let mut config = CliConfig::default();
        config.engine.simulated_track_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_playback_config_uses_default_reciter() {
        let mut config = CliConfig::default();
        config.playback.default_reciter_id = "Husary_64kbps".to_string();
        config.playback.default_reciter_name = "Mahmoud Khalil Al-Husary".to_string();

        let playback = config.playback_config();

        assert_eq!(playback.default_reciter.id, "Husary_64kbps");
        assert_eq!(playback.default_reciter.name, "Mahmoud Khalil Al-Husary");
    }
}
