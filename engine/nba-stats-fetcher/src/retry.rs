use crate::config::RetryConfig;
use anyhow::Result;
use std::future::Future;
use tokio::time::sleep;
use tracing::warn;

/// Run `f` until it succeeds or the retry budget is spent, backing off
/// exponentially between attempts. The last error is returned.
pub async fn run_with_retry<F, Fut, T>(mut f: F, retry_config: &RetryConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = retry_config.initial_delay();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt > retry_config.max_retries {
                    return Err(e);
                }

                warn!("Attempt {} failed: {:#}, retrying in {:?}", attempt, e, delay);
                sleep(delay).await;
                delay = retry_config.next_delay(delay);
            }
        }
    }
}
