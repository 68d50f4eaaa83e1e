//! Injector options and their environment / JSON sources.
//!
//! Options tune behavior that is not part of any single contract: the lifetime
//! applied to contracts that never choose one, the maximum resolution depth and
//! whether every contract is verified when the injector is built.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "COVENANT";

/// Deepest resolution chain allowed before [`DiError::DepthExceeded`].
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Injector-wide options.
///
/// # Examples
///
/// ```rust
/// use covenant_di::{InjectorConfiguration, InjectorOptions, Lifetime};
///
/// let options = InjectorOptions::default()
///     .with_default_lifetime(Lifetime::Singleton)
///     .with_max_depth(64);
///
/// let mut config = InjectorConfiguration::new();
/// config.with_options(options);
/// assert_eq!(config.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorOptions {
    /// Lifetime of contracts that never selected one
    pub default_lifetime: Lifetime,
    /// Maximum nesting of resolutions on one thread
    pub max_depth: usize,
    /// Check every constructed contract for a selectable constructor at build time
    pub verify_on_build: bool,
}

impl Default for InjectorOptions {
    fn default() -> Self {
        Self {
            default_lifetime: Lifetime::Transient,
            max_depth: DEFAULT_MAX_DEPTH,
            verify_on_build: false,
        }
    }
}

impl InjectorOptions {
    /// Sets the lifetime of contracts that never selected one.
    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    /// Sets the maximum resolution depth. Values below 1 are raised to 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Enables build-time verification of constructed contracts.
    pub fn with_verify_on_build(mut self, verify: bool) -> Self {
        self.verify_on_build = verify;
        self
    }

    /// Reads options from `COVENANT_*` environment variables.
    ///
    /// See [`from_env_with_prefix`](Self::from_env_with_prefix).
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Reads options from environment variables with the given prefix.
    ///
    /// | Variable                      | Value                        |
    /// |-------------------------------|------------------------------|
    /// | `{PREFIX}_DEFAULT_LIFETIME`   | `singleton` or `transient`   |
    /// | `{PREFIX}_MAX_DEPTH`          | positive integer             |
    /// | `{PREFIX}_VERIFY_ON_BUILD`    | `true` or `false`            |
    ///
    /// Unset variables keep their defaults. Malformed values are rejected with
    /// [`DiError::InvalidArgument`].
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(value) = read_var(&prefix, "DEFAULT_LIFETIME") {
            options.default_lifetime = Lifetime::parse(&value).ok_or(DiError::InvalidArgument {
                argument: "DEFAULT_LIFETIME",
                reason: "expected 'singleton' or 'transient'",
            })?;
        }

        if let Some(value) = read_var(&prefix, "MAX_DEPTH") {
            options.max_depth = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|depth| *depth > 0)
                .ok_or(DiError::InvalidArgument {
                    argument: "MAX_DEPTH",
                    reason: "expected a positive integer",
                })?;
        }

        if let Some(value) = read_var(&prefix, "VERIFY_ON_BUILD") {
            options.verify_on_build =
                value
                    .trim()
                    .to_ascii_lowercase()
                    .parse::<bool>()
                    .map_err(|_| DiError::InvalidArgument {
                        argument: "VERIFY_ON_BUILD",
                        reason: "expected 'true' or 'false'",
                    })?;
        }

        tracing::debug!(?options, prefix = %prefix, "injector options read from environment");
        Ok(options)
    }

    /// Parses options from a JSON document. Missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let options: Self = serde_json::from_str(json).map_err(|error| {
            tracing::warn!(%error, "rejected injector options");
            DiError::InvalidArgument {
                argument: "options",
                reason: "invalid JSON injector options",
            }
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> DiResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|error| {
            tracing::warn!(%error, path = %path.as_ref().display(), "cannot read injector options");
            DiError::InvalidArgument {
                argument: "path",
                reason: "options file cannot be read",
            }
        })?;
        Self::from_json_str(&content)
    }

    /// Rejects options no injector can run with, such as a zero depth set
    /// directly on the field or deserialized by the caller.
    pub(crate) fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidArgument {
                argument: "max_depth",
                reason: "expected a positive integer",
            });
        }
        Ok(())
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix, name)).ok()
}
