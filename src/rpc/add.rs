use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use tokio::time::sleep;
use tracing::trace;

use crate::config::LatencyConfig;
use crate::error::RpcError;

use super::Method;

/// The stock `add` method: sums a list of numbers.
///
/// Each call first sleeps for a random duration within the configured
/// bounds. The variable per-call latency is what makes completion order
/// diverge from submission order, which downstream consumers of the
/// protocol are expected to tolerate.
pub struct Add {
    latency: LatencyConfig,
}

impl Add {
    pub fn new(latency: LatencyConfig) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Method for Add {
    async fn call(&self, params: Vec<Value>) -> Result<Value, RpcError> {
        let values = match params.as_slice() {
            [Value::Array(values)] => values,
            _ => {
                return Err(RpcError::InvalidParams(
                    "expected a single array of numbers".into(),
                ))
            }
        };

        if let Some(delay) = sample_delay(&self.latency) {
            trace!("simulating {}ms of processing", delay.as_millis());
            sleep(delay).await;
        }

        sum_numbers(values)
    }
}

fn sample_delay(latency: &LatencyConfig) -> Option<Duration> {
    if !latency.enabled {
        return None;
    }

    let mut rng = rand::thread_rng();
    Some(Duration::from_millis(
        rng.gen_range(latency.min_ms..=latency.max_ms),
    ))
}

/// Integer inputs produce an integer sum; anything else falls back to
/// float arithmetic.
fn sum_numbers(values: &[Value]) -> Result<Value, RpcError> {
    let mut float_sum = 0.0_f64;
    let mut int_sum = 0_i64;
    let mut integral = true;

    for value in values {
        let number = value
            .as_f64()
            .ok_or_else(|| RpcError::InvalidParams(format!("{value} is not a number")))?;
        float_sum += number;

        match value.as_i64() {
            Some(int) if integral => int_sum = int_sum.wrapping_add(int),
            _ => integral = false,
        }
    }

    if integral {
        return Ok(Value::from(int_sum));
    }

    serde_json::Number::from_f64(float_sum)
        .map(Value::Number)
        .ok_or_else(|| RpcError::InvalidParams("sum is not a finite number".into()))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn bounded(min_ms: u64, max_ms: u64) -> LatencyConfig {
        LatencyConfig {
            enabled: true,
            min_ms,
            max_ms,
        }
    }

    #[test]
    fn disabled_latency_never_samples() {
        let latency = LatencyConfig {
            enabled: false,
            min_ms: 10,
            max_ms: 250,
        };

        assert!(sample_delay(&latency).is_none());
    }

    #[test]
    fn sampled_delay_stays_within_bounds() {
        let latency = bounded(5, 9);

        for _ in 0..64 {
            let delay = sample_delay(&latency).unwrap();
            assert!(delay >= Duration::from_millis(5));
            assert!(delay <= Duration::from_millis(9));
        }
    }

    #[tokio::test]
    async fn call_waits_at_least_the_minimum_latency() {
        let add = Add::new(bounded(20, 30));

        let start = Instant::now();
        add.call(vec![serde_json::json!([1, 2])]).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
