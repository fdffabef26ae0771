//! Gemensam policy för nya försök: exponentiell backoff med full jitter

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::models::RetrySettings;
use crate::utils::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetrySettings::default().into()
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Endast ett försök
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Övre gräns för väntan före försök nummer `attempt + 1` (attempt räknas från 1)
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }

    /// Slumpad väntan i [0, ceiling]
    pub fn delay(&self, attempt: u32, rng: &mut impl Rng) -> Duration {
        let ceiling = self.ceiling(attempt).as_millis() as u64;
        if ceiling == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.gen_range(0..=ceiling))
    }

    /// Kör `op` tills den lyckas, ger ett fel som inte är tillfälligt
    /// eller försöken tar slut
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay(attempt, &mut rand::thread_rng());
                    tracing::warn!(
                        "{} misslyckades (försök {} av {}): {}, väntar {:?}",
                        what,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
        }
    }

    #[test]
    fn test_ceiling_grows_and_caps() {
        let p = policy(10);
        assert_eq!(p.ceiling(1), Duration::from_millis(100));
        assert_eq!(p.ceiling(2), Duration::from_millis(200));
        assert_eq!(p.ceiling(4), Duration::from_millis(800));
        assert_eq!(p.ceiling(5), Duration::from_millis(1000));
        assert_eq!(p.ceiling(40), Duration::from_millis(1000));
    }

    #[test]
    fn test_delay_within_ceiling() {
        let p = policy(10);
        let mut rng = StdRng::seed_from_u64(1);
        for attempt in 1..8 {
            for _ in 0..20 {
                assert!(p.delay(attempt, &mut rng) <= p.ceiling(attempt));
            }
        }
        assert_eq!(RetryPolicy::none().delay(3, &mut rng), Duration::ZERO);
    }

    #[test]
    fn test_from_settings_needs_one_attempt() {
        let settings = RetrySettings {
            max_attempts: 0,
            base_delay_ms: 10,
            max_delay_ms: 20,
        };
        assert_eq!(RetryPolicy::from(settings).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = policy(3)
            .run("test", move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(AppError::Api { status: 503, body: String::new() })
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: AppResult<()> = policy(2)
            .run("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AppError::Api { status: 429, body: String::new() })
            })
            .await;

        assert!(matches!(result, Err(AppError::Api { status: 429, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: AppResult<()> = policy(5)
            .run("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AppError::MissingApiKey)
            })
            .await;

        assert!(matches!(result, Err(AppError::MissingApiKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
