//! Factory configuration.
//!
//! Controls how events are wrapped into envelopes. Building the events
//! themselves needs no configuration.

use std::collections::BTreeMap;

use crate::FactoryError;

/// Origin used when none is configured.
pub const DEFAULT_ORIGIN: &str = "sonde";

/// Envelope metadata stamped by the factory (env-driven).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Name of the emitting component.
    pub origin: String,

    /// Deployment the emitter runs in.
    pub deployment: Option<String>,

    /// Job name of the emitter.
    pub job: Option<String>,

    /// Index of the emitter within its job.
    pub index: Option<String>,

    /// Address of the emitter.
    pub ip: Option<String>,

    /// Tags attached to every envelope.
    pub tags: BTreeMap<String, String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            deployment: None,
            job: None,
            index: None,
            ip: None,
            tags: BTreeMap::new(),
        }
    }
}

impl FactoryConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SONDE_ORIGIN` (default `sonde`)
    /// - `SONDE_DEPLOYMENT`, `SONDE_JOB`, `SONDE_INDEX`, `SONDE_IP`
    /// - `SONDE_TAGS` as `key=value` pairs separated by commas
    pub fn from_env() -> Result<Self, FactoryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FactoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let origin = match lookup("SONDE_ORIGIN") {
            Some(origin) if origin.trim().is_empty() => {
                return Err(FactoryError::Config(
                    "SONDE_ORIGIN cannot be empty".to_string(),
                ))
            }
            Some(origin) => origin,
            None => DEFAULT_ORIGIN.to_string(),
        };

        let tags = match non_empty("SONDE_TAGS") {
            Some(raw) => parse_tags(&raw)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            origin,
            deployment: non_empty("SONDE_DEPLOYMENT"),
            job: non_empty("SONDE_JOB"),
            index: non_empty("SONDE_INDEX"),
            ip: non_empty("SONDE_IP"),
            tags,
        })
    }
}

fn parse_tags(raw: &str) -> Result<BTreeMap<String, String>, FactoryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                FactoryError::Config(format!("SONDE_TAGS entry '{pair}' must be key=value"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(FactoryError::Config(format!(
                    "SONDE_TAGS entry '{pair}' has an empty key"
                )));
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}
