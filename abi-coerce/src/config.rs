//! Builder configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Environment variable selecting the [`SkipPolicy`] used by [`crate::build_args`].
pub const SKIP_POLICY_ENV: &str = "ABI_COERCE_SKIP_POLICY";

/// What the argument builder does with parameters whose input is not applicable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipPolicy {
    /// Leave [`crate::TypedValue::Skip`] in the list for the caller to handle.
    #[default]
    Keep,
    /// Fail the build as if the field were missing.
    Reject,
    /// Substitute the zero value of the declared type.
    Zero,
}

impl SkipPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipPolicy::Keep => "keep",
            SkipPolicy::Reject => "reject",
            SkipPolicy::Zero => "zero",
        }
    }
}

impl fmt::Display for SkipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(SkipPolicy::Keep),
            "reject" => Ok(SkipPolicy::Reject),
            "zero" => Ok(SkipPolicy::Zero),
            other => Err(format!("unknown skip policy `{other}`")),
        }
    }
}

/// Settings for [`crate::build_args_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgsConfig {
    #[serde(default)]
    pub skip_policy: SkipPolicy,
}

static ARGS_CONFIG: OnceCell<ArgsConfig> = OnceCell::new();

impl ArgsConfig {
    pub fn new(skip_policy: SkipPolicy) -> Self {
        Self { skip_policy }
    }

    /// Read the configuration from the environment without caching it.
    /// Unset or unrecognised values fall back to the defaults.
    pub fn from_env() -> Self {
        let skip_policy = match env::var(SKIP_POLICY_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring {SKIP_POLICY_ENV}, using default");
                SkipPolicy::default()
            }),
            Err(_) => SkipPolicy::default(),
        };
        Self { skip_policy }
    }

    /// Load configuration from environment variables.
    /// Cached after the first call.
    pub fn load() -> &'static ArgsConfig {
        ARGS_CONFIG.get_or_init(|| {
            let config = Self::from_env();
            tracing::debug!(skip_policy = %config.skip_policy, "loaded argument builder config");
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        // SAFETY: env-mutating tests are serialized.
        unsafe {
            match value {
                Some(v) => env::set_var(SKIP_POLICY_ENV, v),
                None => env::remove_var(SKIP_POLICY_ENV),
            }
        }
        let out = f();
        unsafe { env::remove_var(SKIP_POLICY_ENV) };
        out
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("keep".parse::<SkipPolicy>(), Ok(SkipPolicy::Keep));
        assert_eq!(" Reject ".parse::<SkipPolicy>(), Ok(SkipPolicy::Reject));
        assert_eq!("ZERO".parse::<SkipPolicy>(), Ok(SkipPolicy::Zero));
        assert!("drop".parse::<SkipPolicy>().is_err());
    }

    #[test]
    fn policy_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SkipPolicy::Reject).unwrap(),
            "\"reject\""
        );
        let config: ArgsConfig = serde_json::from_str(r#"{"skip_policy":"zero"}"#).unwrap();
        assert_eq!(config, ArgsConfig::new(SkipPolicy::Zero));
        let config: ArgsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.skip_policy, SkipPolicy::Keep);
    }

    #[test]
    #[serial]
    fn from_env_reads_policy() {
        assert_eq!(
            with_env(Some("zero"), ArgsConfig::from_env).skip_policy,
            SkipPolicy::Zero
        );
        assert_eq!(
            with_env(None, ArgsConfig::from_env).skip_policy,
            SkipPolicy::Keep
        );
    }

    #[test]
    #[serial]
    fn from_env_ignores_unknown_values() {
        assert_eq!(
            with_env(Some("sometimes"), ArgsConfig::from_env).skip_policy,
            SkipPolicy::Keep
        );
    }
}
