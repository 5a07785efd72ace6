use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default provider API host.
pub const DEFAULT_API_HOST: &str = "https://api.sdkwa.pro";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the instance id.
pub const ENV_ID_INSTANCE: &str = "SDKWA_ID_INSTANCE";
/// Environment variable holding the instance API token.
pub const ENV_API_TOKEN: &str = "SDKWA_API_TOKEN";
/// Environment variable overriding the API host.
pub const ENV_API_HOST: &str = "SDKWA_API_HOST";
/// Environment variable holding the user id.
pub const ENV_USER_ID: &str = "SDKWA_USER_ID";
/// Environment variable holding the user token.
pub const ENV_USER_TOKEN: &str = "SDKWA_USER_TOKEN";

/// Messenger transport an instance runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Messenger {
    #[default]
    WhatsApp,
    Telegram,
}

impl Messenger {
    /// Path segment used in endpoint URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Telegram => "telegram",
        }
    }
}

impl fmt::Display for Messenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Messenger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(Self::WhatsApp),
            "telegram" => Ok(Self::Telegram),
            other => Err(Error::Configuration(format!(
                "invalid messenger type '{other}', must be 'whatsapp' or 'telegram'"
            ))),
        }
    }
}

/// Connection settings for one provider instance.
#[derive(Clone)]
pub struct SdkwaConfig {
    /// Instance identifier.
    pub id_instance: String,

    /// Instance API token, sent as a bearer token.
    pub api_token_instance: String,

    /// Base URL of the provider API. Override this for testing against a
    /// mock server.
    pub api_host: String,

    /// Optional user id, sent as `x-user-id`.
    pub user_id: Option<String>,

    /// Optional user token, sent as `x-user-token`.
    pub user_token: Option<String>,

    /// Messenger used when none is selected explicitly.
    pub messenger: Messenger,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Accept invalid TLS certificates. Only meant for self-hosted test
    /// deployments.
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for SdkwaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkwaConfig")
            .field("id_instance", &self.id_instance)
            .field("api_token_instance", &"[REDACTED]")
            .field("api_host", &self.api_host)
            .field("user_id", &self.user_id)
            .field("user_token", &self.user_token.as_ref().map(|_| "[REDACTED]"))
            .field("messenger", &self.messenger)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl SdkwaConfig {
    /// Create a configuration for the given instance credentials.
    ///
    /// Uses the default API host (`https://api.sdkwa.pro`).
    pub fn new(id_instance: impl Into<String>, api_token_instance: impl Into<String>) -> Self {
        Self {
            id_instance: id_instance.into(),
            api_token_instance: api_token_instance.into(),
            api_host: DEFAULT_API_HOST.to_owned(),
            user_id: None,
            user_token: None,
            messenger: Messenger::default(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Read the configuration from `SDKWA_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let id_instance = lookup(ENV_ID_INSTANCE).ok_or_else(|| {
            Error::Configuration(format!(
                "id_instance is required, set it directly or via {ENV_ID_INSTANCE}"
            ))
        })?;
        let api_token = lookup(ENV_API_TOKEN).ok_or_else(|| {
            Error::Configuration(format!(
                "api_token_instance is required, set it directly or via {ENV_API_TOKEN}"
            ))
        })?;

        let mut config = Self::new(id_instance, api_token);
        if let Some(host) = lookup(ENV_API_HOST) {
            config.api_host = host;
        }
        config.user_id = lookup(ENV_USER_ID);
        config.user_token = lookup(ENV_USER_TOKEN);
        config.validate()
    }

    /// Set the API host.
    #[must_use]
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the user credentials sent alongside the instance token.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>, user_token: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.user_token = Some(user_token.into());
        self
    }

    /// Set the default messenger.
    #[must_use]
    pub fn with_messenger(mut self, messenger: Messenger) -> Self {
        self.messenger = messenger;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates.
    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Normalize and check the configuration.
    ///
    /// Trims whitespace from every credential, strips trailing slashes from
    /// the host, drops blank optional credentials, and rejects empty
    /// required ones.
    pub fn validate(mut self) -> Result<Self, Error> {
        self.id_instance = self.id_instance.trim().to_owned();
        self.api_token_instance = self.api_token_instance.trim().to_owned();
        self.api_host = self.api_host.trim().trim_end_matches('/').to_owned();
        self.user_id = normalize_optional(self.user_id.take());
        self.user_token = normalize_optional(self.user_token.take());

        if self.id_instance.is_empty() {
            return Err(Error::Configuration("id_instance cannot be empty".into()));
        }
        if self.api_token_instance.is_empty() {
            return Err(Error::Configuration(
                "api_token_instance cannot be empty".into(),
            ));
        }
        if self.api_host.is_empty() {
            return Err(Error::Configuration("api_host cannot be empty".into()));
        }
        Ok(self)
    }
}

/// User-level credentials for instance management.
#[derive(Clone)]
pub struct UserConfig {
    /// User identifier, sent as `x-user-id`.
    pub user_id: String,

    /// User token, sent as `x-user-token`.
    pub user_token: String,

    /// Base URL of the provider API.
    pub api_host: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("user_id", &self.user_id)
            .field("user_token", &"[REDACTED]")
            .field("api_host", &self.api_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl UserConfig {
    /// Create a configuration for the given user credentials.
    pub fn new(user_id: impl Into<String>, user_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_token: user_token.into(),
            api_host: DEFAULT_API_HOST.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API host.
    #[must_use]
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Normalize and check the configuration.
    pub fn validate(mut self) -> Result<Self, Error> {
        self.user_id = self.user_id.trim().to_owned();
        self.user_token = self.user_token.trim().to_owned();
        self.api_host = self.api_host.trim().trim_end_matches('/').to_owned();

        if self.user_id.is_empty() || self.user_token.is_empty() {
            return Err(Error::Configuration(
                "user_id and user_token are required for instance management".into(),
            ));
        }
        if self.api_host.is_empty() {
            return Err(Error::Configuration("api_host cannot be empty".into()));
        }
        Ok(self)
    }
}

impl TryFrom<&SdkwaConfig> for UserConfig {
    type Error = Error;

    fn try_from(config: &SdkwaConfig) -> Result<Self, Self::Error> {
        match (&config.user_id, &config.user_token) {
            (Some(id), Some(token)) => Self::new(id.clone(), token.clone())
                .with_api_host(config.api_host.clone())
                .with_timeout(config.timeout)
                .validate(),
            _ => Err(Error::Configuration(
                "user_id and user_token are required for instance management".into(),
            )),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = SdkwaConfig::new("1101", "token");
        assert_eq!(config.api_host, "https://api.sdkwa.pro");
        assert_eq!(config.messenger, Messenger::WhatsApp);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.accept_invalid_certs);
        assert!(config.user_id.is_none());
    }

    #[test]
    fn validate_trims_credentials_and_host() {
        let config = SdkwaConfig::new("  1101 ", "\ttoken\n")
            .with_api_host(" https://example.test/// ")
            .with_user(" u-1 ", "   ")
            .validate()
            .unwrap();
        assert_eq!(config.id_instance, "1101");
        assert_eq!(config.api_token_instance, "token");
        assert_eq!(config.api_host, "https://example.test");
        assert_eq!(config.user_id.as_deref(), Some("u-1"));
        assert!(config.user_token.is_none());
    }

    #[test]
    fn validate_rejects_blank_credentials() {
        let err = SdkwaConfig::new("   ", "token").validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("id_instance")));

        let err = SdkwaConfig::new("1101", "").validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("api_token_instance")));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let config = SdkwaConfig::from_lookup(lookup(&[
            (ENV_ID_INSTANCE, "1101"),
            (ENV_API_TOKEN, "token"),
            (ENV_API_HOST, "http://localhost:9999/"),
            (ENV_USER_ID, "u-1"),
            (ENV_USER_TOKEN, "ut"),
        ]))
        .unwrap();
        assert_eq!(config.id_instance, "1101");
        assert_eq!(config.api_host, "http://localhost:9999");
        assert_eq!(config.user_id.as_deref(), Some("u-1"));
        assert_eq!(config.user_token.as_deref(), Some("ut"));
    }

    #[test]
    fn from_lookup_requires_instance_credentials() {
        let err = SdkwaConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "token")])).unwrap_err();
        assert!(err.to_string().contains(ENV_ID_INSTANCE));

        let err = SdkwaConfig::from_lookup(lookup(&[(ENV_ID_INSTANCE, "1101")])).unwrap_err();
        assert!(err.to_string().contains(ENV_API_TOKEN));
    }

    #[test]
    fn from_lookup_defaults_host() {
        let config = SdkwaConfig::from_lookup(lookup(&[
            (ENV_ID_INSTANCE, "1101"),
            (ENV_API_TOKEN, "token"),
        ]))
        .unwrap();
        assert_eq!(config.api_host, DEFAULT_API_HOST);
    }

    #[test]
    fn debug_redacts_tokens() {
        let config =
            SdkwaConfig::new("1101", "test-placeholder-value").with_user("u-1", "user-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-placeholder-value"));
        assert!(!debug.contains("user-secret"));
        assert!(debug.contains("1101"));

        let user = UserConfig::new("u-1", "user-secret");
        assert!(!format!("{user:?}").contains("user-secret"));
    }

    #[test]
    fn messenger_parsing() {
        assert_eq!("telegram".parse::<Messenger>().unwrap(), Messenger::Telegram);
        assert_eq!(Messenger::WhatsApp.to_string(), "whatsapp");
        assert!(matches!(
            "viber".parse::<Messenger>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn user_config_from_instance_config() {
        let config = SdkwaConfig::new("1101", "token")
            .with_api_host("http://localhost:1")
            .with_user("u-1", "ut");
        let user = UserConfig::try_from(&config).unwrap();
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.api_host, "http://localhost:1");

        let err = UserConfig::try_from(&SdkwaConfig::new("1101", "token")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
