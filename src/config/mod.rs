//! The `config` module loads application settings.
//!
//! Sources, later ones overriding earlier ones:
//! - an optional file (`config/default.toml` or any format the `config`
//!   crate understands)
//! - environment variables prefixed with `ROOMCAST_`, nested with `__`,
//!   e.g. `ROOMCAST_HUB__OVERFLOW_POLICY=disconnect`
//!
//! Every key is optional; missing values fall back to `Settings::default()`.

mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{HubSettings, LoggingSettings, Settings};

const DEFAULT_CONFIG_PATH: &str = "config/default";
const ENV_PREFIX: &str = "ROOMCAST";

/// Reads `config/default.*` (if present) and `ROOMCAST_*` variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Loads the configuration from `path` (extension optional) and environment
/// variables, then merges it over the defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let settings = Settings {
        hub: HubSettings {
            listener_capacity: partial
                .hub
                .as_ref()
                .and_then(|h| h.listener_capacity)
                .unwrap_or(default.hub.listener_capacity),
            overflow_policy: partial
                .hub
                .as_ref()
                .and_then(|h| h.overflow_policy)
                .unwrap_or(default.hub.overflow_policy),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    };

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.hub.listener_capacity == 0 {
        return Err(ConfigError::Message(
            "hub.listener_capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
