use std::{fmt, fs, path::Path, str::FromStr, time::Duration};

use chrono::NaiveDate;
use serde::Deserialize;
use shared::domain::EventConfig;
use url::Url;

use crate::error::ConfigError;

/// Placeholder left in place until a webhook is deployed.
pub const UNCONFIGURED_ENDPOINT: &str = "YOUR_GOOGLE_APPS_SCRIPT_URL_HERE";

pub const DEFAULT_SETTINGS_FILE: &str = "rsvp.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEndpoint {
    Unconfigured,
    Configured(Url),
}

impl DeliveryEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == UNCONFIGURED_ENDPOINT {
            return Ok(Self::Unconfigured);
        }

        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            key: "delivery_endpoint",
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "delivery_endpoint",
                value: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(Self::Configured(url))
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Unconfigured => None,
            Self::Configured(url) => Some(url),
        }
    }
}

impl fmt::Display for DeliveryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("<unconfigured>"),
            Self::Configured(url) => write!(f, "{url}"),
        }
    }
}

/// What happens to guest rows when the guest count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecountPolicy {
    /// Rows at surviving indices keep their name, meal, and dietary choices.
    #[default]
    Preserve,
    /// Every row starts over from blank.
    Rebuild,
}

impl FromStr for RecountPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "rebuild" => Ok(Self::Rebuild),
            other => Err(ConfigError::InvalidValue {
                key: "recount_policy",
                value: other.to_string(),
                reason: "expected 'preserve' or 'rebuild'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub event_date: NaiveDate,
    pub manually_opened: bool,
    pub lead_time_days: u32,
    pub delivery_endpoint: DeliveryEndpoint,
    pub refresh_interval: Duration,
    pub max_guests: u8,
    pub recount_policy: RecountPolicy,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            event_date: NaiveDate::from_ymd_opt(2027, 6, 19).unwrap_or_default(),
            manually_opened: false,
            lead_time_days: 42,
            delivery_endpoint: DeliveryEndpoint::Unconfigured,
            refresh_interval: Duration::from_secs(3600),
            max_guests: 8,
            recount_policy: RecountPolicy::Preserve,
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl Settings {
    pub fn event_config(&self) -> EventConfig {
        EventConfig::new(self.event_date, self.manually_opened, self.lead_time_days)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    event_date: Option<NaiveDate>,
    manually_opened: Option<bool>,
    lead_time_days: Option<u32>,
    delivery_endpoint: Option<String>,
    refresh_interval_secs: Option<u64>,
    max_guests: Option<u8>,
    recount_policy: Option<RecountPolicy>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the settings file when present, then environment overrides.
///
/// An explicit `path` must exist; without one, `rsvp.toml` in the working
/// directory is read only if it is there.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let file_path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(file_path) {
        Ok(raw) => apply_file(&mut settings, &raw)?,
        Err(source) if path.is_some() => {
            return Err(ConfigError::Read {
                path: file_path.to_path_buf(),
                source,
            });
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    validate(&settings)?;
    Ok(settings)
}

pub fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), ConfigError> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.event_date {
        settings.event_date = v;
    }
    if let Some(v) = file_cfg.manually_opened {
        settings.manually_opened = v;
    }
    if let Some(v) = file_cfg.lead_time_days {
        settings.lead_time_days = v;
    }
    if let Some(v) = file_cfg.delivery_endpoint {
        settings.delivery_endpoint = DeliveryEndpoint::parse(&v)?;
    }
    if let Some(v) = file_cfg.refresh_interval_secs {
        settings.refresh_interval = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.max_guests {
        settings.max_guests = v;
    }
    if let Some(v) = file_cfg.recount_policy {
        settings.recount_policy = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(v);
    }
    Ok(())
}

/// Reads `RSVP_*` keys, with `APP__*` spellings taking precedence.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |suffix: &str| {
        lookup(&format!("APP__{suffix}")).or_else(|| lookup(&format!("RSVP_{suffix}")))
    };

    if let Some(v) = get("EVENT_DATE") {
        settings.event_date = parse_value("event_date", &v)?;
    }
    if let Some(v) = get("MANUALLY_OPENED") {
        settings.manually_opened = parse_value("manually_opened", &v)?;
    }
    if let Some(v) = get("LEAD_TIME_DAYS") {
        settings.lead_time_days = parse_value("lead_time_days", &v)?;
    }
    if let Some(v) = get("DELIVERY_ENDPOINT") {
        settings.delivery_endpoint = DeliveryEndpoint::parse(&v)?;
    }
    if let Some(v) = get("REFRESH_INTERVAL_SECS") {
        settings.refresh_interval = Duration::from_secs(parse_value("refresh_interval_secs", &v)?);
    }
    if let Some(v) = get("MAX_GUESTS") {
        settings.max_guests = parse_value("max_guests", &v)?;
    }
    if let Some(v) = get("RECOUNT_POLICY") {
        settings.recount_policy = v.parse()?;
    }
    if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = Duration::from_secs(parse_value("request_timeout_secs", &v)?);
    }
    Ok(())
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.max_guests == 0 {
        return Err(ConfigError::InvalidValue {
            key: "max_guests",
            value: "0".to_string(),
            reason: "at least one guest must be allowed".to_string(),
        });
    }
    if settings.refresh_interval.is_zero() {
        return Err(ConfigError::InvalidValue {
            key: "refresh_interval_secs",
            value: "0".to_string(),
            reason: "interval must be positive".to_string(),
        });
    }
    if settings.request_timeout.is_zero() {
        return Err(ConfigError::InvalidValue {
            key: "request_timeout_secs",
            value: "0".to_string(),
            reason: "timeout must be positive".to_string(),
        });
    }
    Ok(())
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
