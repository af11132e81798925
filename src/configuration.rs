use crate::errors::AppError;
use crate::validation::ValidatedEmail;
use config::{Config, Environment, File};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub message: MessageSettings,
    pub email_client: EmailClientSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
#[serde(default)]
pub struct InputSettings {
    pub load_list: PathBuf,
    pub carrier_list: PathBuf,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            load_list: PathBuf::from("distro_folder/load_list.xlsx"),
            carrier_list: PathBuf::from("distro_folder/carrier_list.xlsx"),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
#[serde(default)]
pub struct MessageSettings {
    pub subject_prefix: String,
    pub greeting: String,
    pub sign_off: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            subject_prefix: "Available Loads True Blue SCM".into(),
            greeting: "Dear Carrier,\n\nHere are the available loads:\n\n".into(),
            sign_off: "\nThank you,\nTrue Blue SCM Team".into(),
        }
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// print every email to stdout instead of sending it
    #[default]
    Console,
    Http,
    Smtp,
}

#[derive(serde::Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EmailClientSettings {
    pub backend: MailBackend,
    pub sender_email: String,
    pub base_url: String,
    pub authorization_token: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
}

impl Default for EmailClientSettings {
    fn default() -> Self {
        Self {
            backend: MailBackend::Console,
            sender_email: "dispatch@truebluescm.com".into(),
            base_url: "http://127.0.0.1:8025".into(),
            authorization_token: String::new(),
            timeout_milliseconds: 10_000,
            smtp_host: String::new(),
            smtp_username: String::new(),
            smtp_password: String::new(),
        }
    }
}

impl EmailClientSettings {
    pub fn parse_sender(&self) -> anyhow::Result<ValidatedEmail> {
        ValidatedEmail::parse(&self.sender_email)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TelemetrySettings {
    /// fallback filter when RUST_LOG is unset
    pub filter: String,
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}

/// Reads `config/base.yaml` and `config/{APP_ENV}.yaml` from the working
/// directory, then `APP__SECTION__KEY` overrides. Missing files fall back
/// to the built-in defaults.
pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()
        .map_err(|e| AppError::ConfigError(format!("error to find current dir: {e}")))?;

    let env: Env = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    get_configuration_from(&base_path.join("config"), env)
}

pub fn get_configuration_from(config_dir: &Path, env: Env) -> Result<Settings, AppError> {
    let additional_conf_name = format!("{}.yaml", env.as_str());

    let settings = Config::builder()
        .add_source(File::from(config_dir.join("base.yaml")).required(false))
        .add_source(File::from(config_dir.join(additional_conf_name)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()
        .map_err(|e| AppError::ConfigError(e.to_string()))?;
    settings
        .try_deserialize::<Settings>()
        .map_err(|e| AppError::ConfigError(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    pub fn as_str(&self) -> &str {
        match self {
            Env::Local => "local",
            Env::Production => "production",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(AppError::EnvError(value)),
        }
    }
}
