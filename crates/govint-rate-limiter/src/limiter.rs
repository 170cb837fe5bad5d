//! The Rate Limiter (C3): per-model token-per-minute budgets, refreshed
//! every minute. Excess requests block up to the caller's timeout rather
//! than failing immediately, matching §5's "block up to the per-call
//! timeout" rule.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::RateLimiterError;

struct ModelBudget {
    capacity: u64,
    used: u64,
    window_start: Instant,
}

impl ModelBudget {
    fn new(capacity: u64) -> Self {
        Self {
            capacity,
            used: 0,
            window_start: Instant::now(),
        }
    }

    fn roll_window_if_expired(&mut self, now: Instant) {
        if now.duration_since(self.window_start) >= Duration::from_secs(60) {
            self.used = 0;
            self.window_start = now;
        }
    }

    fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.used)
    }

    fn time_until_reset(&self, now: Instant) -> Duration {
        Duration::from_secs(60).saturating_sub(now.duration_since(self.window_start))
    }
}

/// Tracks token budgets for every model configured under
/// `models.llm_models.tpm_capacities`.
pub struct RateLimiter {
    budgets: Mutex<HashMap<String, ModelBudget>>,
}

impl RateLimiter {
    pub fn new(tpm_capacities: HashMap<String, u64>) -> Self {
        let budgets = tpm_capacities
            .into_iter()
            .map(|(model, capacity)| (model, ModelBudget::new(capacity)))
            .collect();
        Self {
            budgets: Mutex::new(budgets),
        }
    }

    /// Reserve `tokens` against `model`'s current-minute budget, waiting
    /// (in bounded increments) for a refresh if the budget is currently
    /// exhausted. Returns `Timeout` if `timeout` elapses first.
    pub async fn acquire(
        &self,
        model: &str,
        tokens: u64,
        timeout: Duration,
    ) -> Result<(), RateLimiterError> {
        let deadline = Instant::now() + timeout;
        let waited_start = Instant::now();

        loop {
            {
                let mut budgets = self.budgets.lock().await;
                let budget = budgets
                    .get_mut(model)
                    .ok_or_else(|| RateLimiterError::UnknownModel(model.to_string()))?;

                let now = Instant::now();
                budget.roll_window_if_expired(now);

                if tokens > budget.capacity {
                    return Err(RateLimiterError::RequestExceedsCapacity {
                        requested: tokens,
                        capacity: budget.capacity,
                    });
                }

                if budget.remaining() >= tokens {
                    budget.used += tokens;
                    debug!(model, tokens, remaining = budget.remaining(), "token budget reserved");
                    return Ok(());
                }
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(model, tokens, "rate limiter timed out waiting for budget");
                return Err(RateLimiterError::Timeout {
                    model: model.to_string(),
                    waited_ms: now.duration_since(waited_start).as_millis() as u64,
                });
            }

            let budgets = self.budgets.lock().await;
            let wait_for_reset = budgets
                .get(model)
                .map(|b| b.time_until_reset(now))
                .unwrap_or(Duration::from_secs(1));
            drop(budgets);

            let remaining_timeout = deadline.saturating_duration_since(now);
            tokio::time::sleep(wait_for_reset.min(remaining_timeout)).await;
        }
    }

    /// Release tokens back to the current window without waiting for the
    /// minute to roll over — used when a call fails after tokens were
    /// reserved but before the request was actually sent.
    pub async fn release(&self, model: &str, tokens: u64) {
        let mut budgets = self.budgets.lock().await;
        if let Some(budget) = budgets.get_mut(model) {
            budget.used = budget.used.saturating_sub(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacities(model: &str, cap: u64) -> HashMap<String, u64> {
        let mut m = HashMap::new();
        m.insert(model.to_string(), cap);
        m
    }

    #[tokio::test]
    async fn acquire_succeeds_within_capacity() {
        let limiter = RateLimiter::new(capacities("gpt", 1000));
        limiter.acquire("gpt", 500, Duration::from_millis(100)).await.unwrap();
        limiter.acquire("gpt", 500, Duration::from_millis(100)).await.unwrap();
    }

    #[tokio::test]
    async fn acquire_rejects_single_request_over_capacity() {
        let limiter = RateLimiter::new(capacities("gpt", 100));
        let err = limiter.acquire("gpt", 1000, Duration::from_millis(100)).await;
        assert!(matches!(err, Err(RateLimiterError::RequestExceedsCapacity { .. })));
    }

    #[tokio::test]
    async fn acquire_unknown_model_errors() {
        let limiter = RateLimiter::new(HashMap::new());
        let err = limiter.acquire("nope", 10, Duration::from_millis(10)).await;
        assert!(matches!(err, Err(RateLimiterError::UnknownModel(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_times_out_when_budget_stays_exhausted() {
        let limiter = RateLimiter::new(capacities("gpt", 10));
        limiter.acquire("gpt", 10, Duration::from_millis(10)).await.unwrap();
        let err = limiter.acquire("gpt", 10, Duration::from_millis(50)).await;
        assert!(matches!(err, Err(RateLimiterError::Timeout { .. })));
    }

    #[tokio::test]
    async fn release_restores_budget_without_waiting_for_reset() {
        let limiter = RateLimiter::new(capacities("gpt", 10));
        limiter.acquire("gpt", 10, Duration::from_millis(10)).await.unwrap();
        limiter.release("gpt", 10).await;
        limiter.acquire("gpt", 10, Duration::from_millis(10)).await.unwrap();
    }
}
