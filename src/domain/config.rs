use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Runtime load configuration.
///
/// One instance is shared by the whole engine and is always replaced as a
/// whole, never merged field by field. Field names on the wire follow the
/// control surface's JSON contract (`Url`, `Clients`, `RequestsPerSecondTarget`).
/// Decoding is lenient: keys match case-insensitively, missing or `null`
/// fields keep their zero value and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadConfig {
    /// Target URL every worker issues its GET against
    pub url: String,
    /// Desired number of concurrent workers
    pub clients: u32,
    /// Aggregate dispatch rate; 0 means dispatch nothing
    pub requests_per_second_target: u32,
}

impl LoadConfig {
    pub fn new(url: impl Into<String>, clients: u32, requests_per_second_target: u32) -> Self {
        Self {
            url: url.into(),
            clients,
            requests_per_second_target,
        }
    }

    pub fn desired_workers(&self) -> usize {
        self.clients as usize
    }

    /// Delay between two dispatch tokens at the configured rate.
    ///
    /// Returns `None` when the rate is zero.
    pub fn inter_token_delay(&self) -> Option<Duration> {
        inter_token_delay(self.requests_per_second_target)
    }
}

impl<'de> Deserialize<'de> for LoadConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LoadConfigVisitor)
    }
}

struct LoadConfigVisitor;

impl<'de> Visitor<'de> for LoadConfigVisitor {
    type Value = LoadConfig;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a load configuration object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<LoadConfig, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut config = LoadConfig::default();
        while let Some(key) = map.next_key::<String>()? {
            // A null value leaves whatever the field already holds
            if key.eq_ignore_ascii_case("url") {
                if let Some(url) = map.next_value::<Option<String>>()? {
                    config.url = url;
                }
            } else if key.eq_ignore_ascii_case("clients") {
                if let Some(clients) = map.next_value::<Option<u32>>()? {
                    config.clients = clients;
                }
            } else if key.eq_ignore_ascii_case("requestsPerSecondTarget") {
                if let Some(rate) = map.next_value::<Option<u32>>()? {
                    config.requests_per_second_target = rate;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(config)
    }

    fn visit_unit<E>(self) -> Result<LoadConfig, E>
    where
        E: de::Error,
    {
        Ok(LoadConfig::default())
    }
}

/// `1s / rate`, or `None` for a zero rate.
pub fn inter_token_delay(rate: u32) -> Option<Duration> {
    if rate == 0 {
        None
    } else {
        Some(Duration::from_secs(1) / rate)
    }
}
