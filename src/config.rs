use std::time::Duration;

/// How long a transfer waits for funds before its single retry.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(3);

/// Runtime settings for the transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub retry_wait: Duration,
}

impl EngineConfig {
    pub fn with_retry_wait(retry_wait: Duration) -> Self {
        Self { retry_wait }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_wait: DEFAULT_RETRY_WAIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_wait() {
        assert_eq!(EngineConfig::default().retry_wait, Duration::from_secs(3));
        assert_eq!(
            EngineConfig::with_retry_wait(Duration::from_millis(10)).retry_wait,
            Duration::from_millis(10)
        );
    }
}
