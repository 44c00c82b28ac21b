use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the users directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UsersDirectoryConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Largest page a single list call may return; also used for `page_size == 0`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Upper bound, in characters, for every textual user field.
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_storage_timeout", with = "duration_serde")]
    pub storage_timeout: Duration,

    #[serde(default = "default_event_timeout", with = "duration_serde")]
    pub event_timeout: Duration,

    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_dsn")]
    pub dsn: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: default_dsn(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for UsersDirectoryConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            max_page_size: default_max_page_size(),
            min_password_length: default_min_password_length(),
            max_field_length: default_max_field_length(),
            bcrypt_cost: default_bcrypt_cost(),
            storage_timeout: default_storage_timeout(),
            event_timeout: default_event_timeout(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_dsn() -> String {
    "sqlite::memory:".to_owned()
}

fn default_max_connections() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    10
}

fn default_min_password_length() -> usize {
    8
}

fn default_max_field_length() -> usize {
    255
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_storage_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_event_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_event_channel_capacity() -> usize {
    1024
}

/// Serde support for humantime durations (`"10s"`, `"250ms"`).
pub mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    /// # Errors
    /// Returns the serializer's error.
    pub fn serialize<S>(value: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&humantime::format_duration(*value).to_string())
    }

    /// # Errors
    /// Fails when the input is not a humantime duration string.
    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a duration"))
    }
}
