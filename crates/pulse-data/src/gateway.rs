//! Outbound call pacing.
//!
//! Every upstream request goes through one [`Gateway`]. It enforces a
//! minimum spacing between the end of one call and the start of the next,
//! and applies a per-call deadline.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pulse_core::error::ProviderError;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Gateway configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Minimum time between one call completing and the next starting
    pub min_delay: Duration,
    /// Deadline for a single call
    pub call_timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            call_timeout: Duration::from_secs(15),
        }
    }
}

/// Counters for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayStats {
    /// Calls issued
    pub calls: u64,
    /// Calls that failed or timed out
    pub failures: u64,
    /// Total time callers spent suspended for pacing
    pub total_wait: Duration,
}

/// Paced, serialized access to the upstream provider.
#[derive(Debug)]
pub struct Gateway {
    options: GatewayOptions,
    /// Completion time of the previous call. Held for the whole
    /// wait/call/record sequence so concurrent callers queue up.
    last_call: Mutex<Option<Instant>>,
    calls: AtomicU64,
    failures: AtomicU64,
    waited_micros: AtomicU64,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(options: GatewayOptions) -> Self {
        Self {
            options,
            last_call: Mutex::new(None),
            calls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            waited_micros: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> GatewayOptions {
        self.options
    }

    /// Run one upstream call under the pacing and timeout rules.
    ///
    /// `operation` names the call in logs and timeout errors. Completion
    /// time is recorded whether the call succeeded or not.
    pub async fn execute<T, Fut>(&self, operation: &str, call: Fut) -> Result<T, ProviderError>
    where
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.options.min_delay {
                let wait = self.options.min_delay - elapsed;
                debug!(
                    operation,
                    waited_ms = wait.as_millis() as u64,
                    "Pacing outbound call"
                );
                tokio::time::sleep(wait).await;
                self.waited_micros
                    .fetch_add(wait.as_micros() as u64, Ordering::Relaxed);
            }
        }

        let result = match tokio::time::timeout(self.options.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                operation: operation.to_string(),
                after_ms: self.options.call_timeout.as_millis() as u64,
            }),
        };

        *last_call = Some(Instant::now());
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Err(err) = &result {
            self.failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                operation,
                error = %err,
                rate_limited = err.is_rate_limited(),
                "Outbound call failed"
            );
        }

        result
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            calls: self.calls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            total_wait: Duration::from_micros(self.waited_micros.load(Ordering::Relaxed)),
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(GatewayOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn gateway(min_delay_ms: u64, timeout_ms: u64) -> Gateway {
        Gateway::new(GatewayOptions {
            min_delay: Duration::from_millis(min_delay_ms),
            call_timeout: Duration::from_millis(timeout_ms),
        })
    }

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let gw = gateway(200, 1_000);
        let start = std::time::Instant::now();

        let value = gw.execute("first", async { Ok::<_, ProviderError>(7) }).await;

        assert_eq!(value.unwrap(), 7);
        assert!(start.elapsed() < Duration::from_millis(150));
        assert_eq!(gw.stats().total_wait, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_back_to_back_calls_are_spaced() {
        let gw = gateway(40, 1_000);
        let start = std::time::Instant::now();

        for i in 0..4 {
            gw.execute("seq", async move { Ok::<_, ProviderError>(i) })
                .await
                .unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(3 * 40));
        let stats = gw.stats();
        assert_eq!(stats.calls, 4);
        assert!(stats.total_wait > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let gw = Arc::new(gateway(30, 1_000));
        let starts = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gw = gw.clone();
            let starts = starts.clone();
            handles.push(tokio::spawn(async move {
                gw.execute("concurrent", async {
                    starts.lock().unwrap().push(std::time::Instant::now());
                    Ok::<_, ProviderError>(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut starts = starts.lock().unwrap().clone();
        starts.sort();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(30));
        }
    }

    #[tokio::test]
    async fn test_timeout_becomes_provider_error() {
        let gw = gateway(0, 20);

        let result = gw
            .execute("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ProviderError>(())
            })
            .await;

        match result {
            Err(ProviderError::Timeout {
                operation,
                after_ms,
            }) => {
                assert_eq!(operation, "slow");
                assert_eq!(after_ms, 20);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(gw.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_failed_call_still_paces_next() {
        let gw = gateway(50, 1_000);

        let _ = gw
            .execute("fails", async {
                Err::<(), _>(ProviderError::Transport("connection reset".into()))
            })
            .await;

        let start = std::time::Instant::now();
        gw.execute("next", async { Ok::<_, ProviderError>(()) })
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
