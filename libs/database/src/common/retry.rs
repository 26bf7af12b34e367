use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff settings used while waiting for the database to come up.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each delay to 50-100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    fn next_delay(&self, delay: u64) -> u64 {
        ((delay as f64 * self.backoff_multiplier) as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    /// 5 retries starting at 200ms, capped at 5s, with jitter.
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// The last error is returned once `max_retries` is exhausted.
///
/// # Example
/// ```ignore
/// use database::common::{RetryConfig, retry_with_backoff};
///
/// let db = retry_with_backoff(|| connect(opts.clone()), RetryConfig::new()).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= config.max_retries => {
                warn!("Giving up after {} attempts: {}", attempt + 1, e);
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                let wait = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {}ms",
                    attempt, config.max_retries, e, wait
                );

                tokio::time::sleep(Duration::from_millis(wait)).await;
                delay = config.next_delay(delay);
            }
        }
    }
}

fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * factor) as u64
}
