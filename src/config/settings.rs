use serde::Deserialize;

use crate::hub::{HubConfig, OverflowPolicy, config::DEFAULT_LISTENER_CAPACITY};

/// Resolved settings: every field has a value once loading is done.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub hub: HubSettings,
    pub logging: LoggingSettings,
}

/// Listener buffer size and the policy applied when a buffer is full.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HubSettings {
    pub listener_capacity: usize,
    pub overflow_policy: OverflowPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Shape of the raw file/environment input; any section or key may be absent.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub hub: Option<PartialHubSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub listener_capacity: Option<usize>,
    pub overflow_policy: Option<OverflowPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Buffer of 64, drop policy, `info` logging.
impl Default for Settings {
    fn default() -> Self {
        Self {
            hub: HubSettings {
                listener_capacity: DEFAULT_LISTENER_CAPACITY,
                overflow_policy: OverflowPolicy::default(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl From<&HubSettings> for HubConfig {
    fn from(settings: &HubSettings) -> Self {
        HubConfig {
            listener_capacity: settings.listener_capacity,
            overflow_policy: settings.overflow_policy,
        }
    }
}
