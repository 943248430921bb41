use std::{fmt::Debug, time::Duration};

use bon::Builder;
use url::Url;

use crate::errors::{Error, Result};

pub const SANDBOX_BASE_URL: &str = "https://api.test.netbanx.com";
pub const PRODUCTION_BASE_URL: &str = "https://api.netbanx.com";

/// Which gateway host the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_mode(sandbox_mode: bool) -> Self {
        if sandbox_mode {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Per-request time budgets. These are limits, never retried.
///
/// The HTTP client enforces `connect` on its own but has no separate write or
/// read deadline, so `write` and `read` only widen the whole-request window
/// (see [`Timeouts::total`]). With the defaults a response that stalls for
/// 12s is still accepted as long as the request finishes within 17s.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    #[builder(default = Duration::from_secs(5))]
    pub connect: Duration,
    #[builder(default = Duration::from_secs(2))]
    pub write: Duration,
    #[builder(default = Duration::from_secs(10))]
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts::builder().build()
    }
}

impl Timeouts {
    /// Whole-request budget. The HTTP client only enforces connect and
    /// total deadlines, so write and read share one window.
    pub fn total(&self) -> Duration {
        self.connect + self.write + self.read
    }
}

/// Client configuration.
///
/// Every field is optional. Credentials default to empty, sandbox mode
/// defaults to on. The configuration is fixed once a client is built from it.
#[derive(Builder, Clone, PartialEq, Eq)]
pub struct Config {
    /// Card payments account number, used by purchases.
    #[builder(into, default)]
    pub account_number: String,
    /// API key, sent as the basic auth user.
    #[builder(into, default)]
    pub api_key: String,
    /// API secret, sent as the basic auth password.
    #[builder(into, default)]
    pub api_secret: String,
    #[builder(default = true)]
    pub sandbox_mode: bool,
    /// Overrides the host derived from `sandbox_mode`.
    pub base_url: Option<Url>,
    #[builder(default)]
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_number", &self.account_number)
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("sandbox_mode", &self.sandbox_mode)
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Config {
    pub const ENV_ACCOUNT_NUMBER: &'static str = "NETBANX_ACCOUNT_NUMBER";
    pub const ENV_API_KEY: &'static str = "NETBANX_API_KEY";
    pub const ENV_API_SECRET: &'static str = "NETBANX_API_SECRET";
    pub const ENV_SANDBOX: &'static str = "NETBANX_SANDBOX";
    pub const ENV_BASE_URL: &'static str = "NETBANX_BASE_URL";

    /// Reads the configuration from `NETBANX_*` environment variables.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sandbox_mode = match lookup(Self::ENV_SANDBOX) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("{} must be a boolean, got '{raw}'", Self::ENV_SANDBOX))
            })?,
            None => true,
        };

        let base_url = lookup(Self::ENV_BASE_URL)
            .filter(|raw| !raw.is_empty())
            .map(|raw| Url::parse(&raw))
            .transpose()?;

        Ok(Config::builder()
            .account_number(lookup(Self::ENV_ACCOUNT_NUMBER).unwrap_or_default())
            .api_key(lookup(Self::ENV_API_KEY).unwrap_or_default())
            .api_secret(lookup(Self::ENV_API_SECRET).unwrap_or_default())
            .sandbox_mode(sandbox_mode)
            .maybe_base_url(base_url)
            .build())
    }

    pub fn environment(&self) -> Environment {
        Environment::from_sandbox_mode(self.sandbox_mode)
    }

    /// The host requests go to: the override if set, else the environment's.
    pub fn resolve_base_url(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(self.environment().base_url())?),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            account_number: self.account_number.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }
}

/// The credential fields of a [`Config`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_number: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// True iff all three fields are non-empty.
    pub fn is_present(&self) -> bool {
        !self.account_number.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_number", &self.account_number)
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "[REDACTED]" }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
