use std::fmt;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ConfigError;

/// Project identifier used when no environment is configured.
pub const DEFAULT_ENVIRONMENT: &str = "1a5";

/// Prefix of the environment variables read by [`RancherClientConfig::from_env`].
pub const ENV_PREFIX: &str = "RANCHER_";

/// Rancher API secret key.
///
/// `Debug` and `Display` print `[REDACTED]`; the backing buffer is zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access to the key, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Connection settings for one Rancher environment.
///
/// Call [`validate`](Self::validate) (done by
/// [`RancherClient::new`](crate::RancherClient::new)) to check that every
/// required field is present.
///
/// Loadable from any `figment` source; see [`from_figment`](Self::from_figment).
#[derive(Clone, Debug, Deserialize)]
pub struct RancherClientConfig {
    /// Rancher server host name or address (no scheme).
    pub host: String,

    /// Rancher server TCP port.
    pub port: u16,

    /// API access key (the Basic-Auth user name).
    pub access_key: String,

    /// API secret key (the Basic-Auth password).
    pub secret_key: SecretKey,

    /// Environment (project) identifier used as the `/projects/{id}` segment.
    /// Falls back to [`DEFAULT_ENVIRONMENT`] when unset.
    #[serde(default)]
    pub environment: Option<String>,
}

impl RancherClientConfig {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            access_key: access_key.into(),
            secret_key: SecretKey::new(secret_key),
            environment: None,
        }
    }

    /// Target a specific environment instead of [`DEFAULT_ENVIRONMENT`].
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Environment segment used in request paths.
    #[must_use]
    pub fn environment_id(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Check every field and report all violations at once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing each of:
    /// - `host` empty
    /// - `port` zero
    /// - `access_key` empty
    /// - `secret_key` empty
    /// - `environment` set but empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.host.trim().is_empty() {
            violations.push("host must be a non-empty string".to_owned());
        }
        if self.port == 0 {
            violations.push("port must be a non-zero number".to_owned());
        }
        if self.access_key.is_empty() {
            violations.push("access_key must be a non-empty string".to_owned());
        }
        if self.secret_key.expose().is_empty() {
            violations.push("secret_key must be a non-empty string".to_owned());
        }
        if self.environment.as_deref().is_some_and(str::is_empty) {
            violations.push("environment must not be empty when set".to_owned());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { violations })
        }
    }

    /// Extract the configuration from a prepared `Figment`.
    ///
    /// Only extraction happens here; [`validate`](Self::validate) runs when
    /// the client is constructed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a required key is missing or has the
    /// wrong type (e.g. a non-numeric `port`).
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// Load from `RANCHER_HOST`, `RANCHER_PORT`, `RANCHER_ACCESS_KEY`,
    /// `RANCHER_SECRET_KEY` and the optional `RANCHER_ENVIRONMENT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] under the same conditions as
    /// [`from_figment`](Self::from_figment).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::new().merge(Env::prefixed(ENV_PREFIX)))
    }
}
