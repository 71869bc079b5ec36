//! # keyvec Configuration Module
//!
//! Wire-format constants live in [`constants`]. The only runtime knob is the
//! [`DeserializationMode`] a caller picks when parsing a serialized vector.
//!
//! ## Module Organization
//!
//! - [`constants`]: Numeric layout values shared by reader and writer
//! - [`DeserializationMode`]: Greedy, lazy or progressive materialization

pub mod constants;
pub use constants::*;

use std::fmt;
use std::str::FromStr;

use eyre::{bail, Result};

/// How a parsed vector materializes its elements.
///
/// | Mode | Decode cost | Identity of repeated lookups |
/// |------|-------------|------------------------------|
/// | `Greedy` | all elements, once, at parse | same instance |
/// | `Lazy` | every access | distinct, value-equal instances |
/// | `Progressive` | once per accessed element | same instance |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeserializationMode {
    #[default]
    Greedy,
    Lazy,
    Progressive,
}

impl DeserializationMode {
    pub const ALL: [DeserializationMode; 3] = [
        DeserializationMode::Greedy,
        DeserializationMode::Lazy,
        DeserializationMode::Progressive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DeserializationMode::Greedy => "greedy",
            DeserializationMode::Lazy => "lazy",
            DeserializationMode::Progressive => "progressive",
        }
    }

    /// Whether two lookups of the same key return the same record instance.
    pub fn caches_records(&self) -> bool {
        !matches!(self, DeserializationMode::Lazy)
    }
}

impl fmt::Display for DeserializationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeserializationMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(DeserializationMode::Greedy),
            "lazy" => Ok(DeserializationMode::Lazy),
            "progressive" => Ok(DeserializationMode::Progressive),
            other => bail!("unknown deserialization mode: '{}'", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_greedy() {
        assert_eq!(DeserializationMode::default(), DeserializationMode::Greedy);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(
            "Progressive".parse::<DeserializationMode>().unwrap(),
            DeserializationMode::Progressive
        );
        assert_eq!(
            " lazy ".parse::<DeserializationMode>().unwrap(),
            DeserializationMode::Lazy
        );
    }

    #[test]
    fn mode_rejects_unknown_names() {
        let err = "eager".parse::<DeserializationMode>().unwrap_err();
        assert!(err.to_string().contains("eager"));
    }

    #[test]
    fn mode_display_round_trips_through_from_str() {
        for mode in DeserializationMode::ALL {
            assert_eq!(mode.to_string().parse::<DeserializationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn only_lazy_mode_skips_record_caching() {
        assert!(DeserializationMode::Greedy.caches_records());
        assert!(!DeserializationMode::Lazy.caches_records());
        assert!(DeserializationMode::Progressive.caches_records());
    }
}
