use std::{fmt::Display, future::Future, time::Duration};

use tracing::warn;

/// Runs `op` up to `max_attempts` times, sleeping `delay` between failed
/// attempts. There is no sleep after the last attempt. The closure receives
/// the 1-based attempt number.
pub async fn retry_fixed<T, E, F, Fut>(
    operation: &str,
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    operation, attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_success() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<u32, String> = retry_fixed("upload", 3, Duration::from_secs(1), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 2 { Ok(attempt) } else { Err("boom".to_string()) }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts_without_trailing_delay() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<(), String> = retry_fixed("upload", 3, Duration::from_secs(1), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {attempt} failed")) }
        })
        .await;

        assert_eq!(result, Err("attempt 3 failed".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);

        let _: Result<(), &str> = retry_fixed("upload", 0, Duration::from_secs(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("nope") }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
