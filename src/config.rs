// ============================================================================
// Arithmetic Configuration
// Selection of the wide multiply/divide backend at process start-up
// ============================================================================

use crate::wide::detector::CpuCapabilities;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable holding the backend preference.
pub const BACKEND_ENV: &str = "FIXEDPOINT_BACKEND";

/// Environment variable enabling or disabling the start-up probe.
pub const PROBE_ENV: &str = "FIXEDPOINT_PROBE";

// ============================================================================
// Backend Preference
// ============================================================================

/// Which wide multiply/divide implementation to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackendPreference {
    /// Accelerated when the CPU supports it, portable otherwise
    #[default]
    Auto,
    /// Native 128-bit intermediate
    Accelerated,
    /// Two-limb 64-bit arithmetic, available everywhere
    Portable,
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            BackendPreference::Accelerated => write!(f, "accelerated"),
            BackendPreference::Portable => write!(f, "portable"),
        }
    }
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(BackendPreference::Auto),
            "accelerated" | "native" => Ok(BackendPreference::Accelerated),
            "portable" | "fallback" => Ok(BackendPreference::Portable),
            other => Err(format!("unknown backend preference '{}'", other)),
        }
    }
}

// ============================================================================
// Arithmetic Configuration
// ============================================================================

/// Process-wide arithmetic settings, consumed by `wide::install`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArithmeticConfig {
    /// Backend to install
    pub backend: BackendPreference,

    /// Cross-check the accelerated backend against the portable one before
    /// installing it; on mismatch the portable backend is installed instead
    pub probe_on_install: bool,
}

impl Default for ArithmeticConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            probe_on_install: true,
        }
    }
}

impl ArithmeticConfig {
    /// Create a configuration with the given backend preference.
    pub fn new(backend: BackendPreference) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Builder method: Set backend preference
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Builder method: Enable or disable the start-up probe
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe_on_install = probe;
        self
    }

    /// Read `FIXEDPOINT_BACKEND` and `FIXEDPOINT_PROBE`; unset variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(BACKEND_ENV) {
            config.backend = value.parse()?;
        }
        if let Some(value) = lookup(PROBE_ENV) {
            config.probe_on_install = parse_flag(&value)
                .ok_or_else(|| format!("{} must be 0, 1, true or false, got '{}'", PROBE_ENV, value))?;
        }
        Ok(config)
    }

    /// Validate the configuration against the running CPU
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == BackendPreference::Accelerated
            && !CpuCapabilities::detect().supports_accelerated()
        {
            return Err(format!(
                "accelerated backend requested but not supported on {}",
                CpuCapabilities::detect()
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
