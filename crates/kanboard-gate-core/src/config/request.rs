//! Per-call retry and timeout policy

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds for one `RpcClient::call`
///
/// A call makes at most `max_retries + 1` attempts, waits `retry_delay`
/// before each retry, and gives each attempt `timeout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay", rename = "retry_delay_ms", with = "duration_ms")]
    pub retry_delay: Duration,
    #[serde(default = "default_timeout", rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Emit per-attempt info lines
    #[serde(default = "default_logging_enabled")]
    pub logging_enabled: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_logging_enabled() -> bool {
    true
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            timeout: default_timeout(),
            logging_enabled: default_logging_enabled(),
        }
    }
}

impl RequestConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Total attempts a call may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
