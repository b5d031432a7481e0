//! # Stable-build Signal
//!
//! The signal is the raw value of the stable-build property (`otel.stable`
//! by default) as the invoking build supplied it. It may be absent, or hold
//! any string.
//!
//! Only the exact, case-sensitive string `true` flags a stable build. There is
//! no trimming and no general boolean parsing: `"True"`, `"1"`, `"yes"` and
//! `" true"` all select the alpha version. A misspelled flag must never
//! produce a stable release.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::defaults::STABLE_SIGNAL_VALUE;
use crate::error::{Error, Result};

/// The raw value of the stable-build property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSignal {
    value: Option<String>,
}

/// How values other than `true` and `false` are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalMode {
    /// Anything but exactly `true` selects alpha.
    #[default]
    Lenient,
    /// A present value must be exactly `true` or `false`.
    Strict,
}

impl ConfigSignal {
    /// A signal for a build that did not set the property.
    pub fn absent() -> Self {
        Self { value: None }
    }

    /// A signal for a build that set the property to `value`.
    pub fn present(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// The raw value, if the property was set.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the property was set at all.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// True only for the exact string `true`.
    pub fn is_stable(&self) -> bool {
        self.value.as_deref() == Some(STABLE_SIGNAL_VALUE)
    }

    /// True when the value reads like "yes" to a person but is not exactly `true`.
    ///
    /// Such values select alpha, which is easy to miss, so callers log them.
    pub fn is_near_miss(&self) -> bool {
        match self.value.as_deref() {
            Some(value) if value != STABLE_SIGNAL_VALUE => truthy_pattern().is_match(value),
            _ => false,
        }
    }

    /// Check the value against `mode`.
    ///
    /// Lenient mode accepts everything. Strict mode rejects a present value
    /// other than `true` or `false`; an absent value is always accepted.
    pub fn validate(&self, property: &str, mode: SignalMode) -> Result<()> {
        match (mode, self.value.as_deref()) {
            (SignalMode::Lenient, _) | (_, None) | (_, Some("true")) | (_, Some("false")) => {
                Ok(())
            }
            (SignalMode::Strict, Some(value)) => Err(Error::InvalidSignal {
                property: property.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl From<Option<String>> for ConfigSignal {
    fn from(value: Option<String>) -> Self {
        Self { value }
    }
}

impl From<Option<&str>> for ConfigSignal {
    fn from(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
        }
    }
}

impl fmt::Display for ConfigSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{:?}", value),
            None => write!(f, "<absent>"),
        }
    }
}

fn truthy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(true|1|yes|y|on|stable)\s*$").expect("truthy pattern is valid")
    })
}
