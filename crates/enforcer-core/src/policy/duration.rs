//! Go-style duration strings (`"24h"`, `"1h30m"`, `"90s"`).
//!
//! Policies are authored in the same duration grammar the cluster API uses
//! for `metav1.Duration`, so a policy manifest can be copied verbatim.

use std::fmt;

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PolicyError;

lazy_static! {
    /// A complete duration: one or more `<number><unit>` components.
    static ref DURATION_PATTERN: Regex = Regex::new(
        r"^(?:(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:ns|us|µs|μs|ms|s|m|h))+$"
    ).unwrap();

    /// A single `<number><unit>` component. `ms` must precede `m`.
    static ref COMPONENT_PATTERN: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]*)?|\.[0-9]+)(ns|us|µs|μs|ms|s|m|h)"
    ).unwrap();
}

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MINUTE: f64 = 60.0 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: f64 = 60.0 * NANOS_PER_MINUTE;

/// A non-negative duration parsed from a Go duration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DurationSpec(Duration);

impl DurationSpec {
    /// Parse a Go duration string. `"0"` is accepted as zero.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let text = text.trim();
        if text == "0" {
            return Ok(Self::zero());
        }

        if !DURATION_PATTERN.is_match(text) {
            return Err(PolicyError::InvalidDuration(text.to_string()));
        }

        let mut total_nanos = 0.0_f64;
        for component in COMPONENT_PATTERN.captures_iter(text) {
            let value: f64 = component[1]
                .parse()
                .map_err(|_| PolicyError::InvalidDuration(text.to_string()))?;
            let unit = match &component[2] {
                "ns" => 1.0,
                "us" | "µs" | "μs" => NANOS_PER_MICRO,
                "ms" => NANOS_PER_MILLI,
                "s" => NANOS_PER_SECOND,
                "m" => NANOS_PER_MINUTE,
                _ => NANOS_PER_HOUR,
            };
            total_nanos += value * unit;
        }

        if !total_nanos.is_finite() || total_nanos > i64::MAX as f64 {
            return Err(PolicyError::InvalidDuration(text.to_string()));
        }

        Ok(Self(Duration::nanoseconds(total_nanos.round() as i64)))
    }

    pub fn zero() -> Self {
        Self(Duration::zero())
    }

    pub fn hours(hours: i64) -> Self {
        Self(Duration::hours(hours))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self(Duration::minutes(minutes))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The underlying chrono duration.
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for DurationSpec {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Duration> for DurationSpec {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl fmt::Display for DurationSpec {
    /// Largest whole unit that represents the value exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = match self.0.num_nanoseconds() {
            Some(n) => n,
            None => return write!(f, "{}h", self.0.num_hours()),
        };

        const UNITS: [(i64, &str); 5] = [
            (3_600_000_000_000, "h"),
            (60_000_000_000, "m"),
            (1_000_000_000, "s"),
            (1_000_000, "ms"),
            (1_000, "us"),
        ];

        if nanos == 0 {
            return f.write_str("0s");
        }
        for (size, suffix) in UNITS {
            if nanos % size == 0 {
                return write!(f, "{}{}", nanos / size, suffix);
            }
        }
        write!(f, "{}ns", nanos)
    }
}

impl Serialize for DurationSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DurationSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DurationSpec::parse(&text).map_err(serde::de::Error::custom)
    }
}
