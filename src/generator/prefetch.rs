use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::generator::ArticleSource;
use crate::generator::pool::ArticlePool;

/// Granularity of sleeps, bounding how long `stop` waits for the worker.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug)]
pub struct PrefetchSettings {
    /// Pause between checks while the pool is full.
    pub idle_interval: Duration,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// Upper bound of the random delay added to each backoff.
    pub jitter: Duration,
}

impl Default for PrefetchSettings {
    fn default() -> Self {
        Self {
            idle_interval: Duration::from_millis(500),
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            jitter: Duration::from_millis(250),
        }
    }
}

impl PrefetchSettings {
    /// Exponential delay for the given number of consecutive failures.
    pub fn backoff_for(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32 << (failures - 1).min(16);
        self.base_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Handle to the background thread that keeps an [`ArticlePool`] topped up.
pub struct Prefetcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Prefetcher {
    pub fn spawn<S>(pool: Arc<ArticlePool>, mut source: S, settings: PrefetchSettings) -> Self
    where
        S: ArticleSource + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            tracing::debug!("article prefetch started");
            while !worker_stop.load(Ordering::Relaxed) {
                if pool.is_full() {
                    sleep_unless_stopped(settings.idle_interval, &worker_stop);
                    continue;
                }

                let fetched = match source.fetch() {
                    Ok(article) if article.is_fallback() => {
                        Err("source returned the placeholder article".to_string())
                    }
                    Ok(article) => Ok(article),
                    Err(e) => Err(e.to_string()),
                };

                match fetched {
                    Ok(article) => {
                        let url = article.url.clone();
                        if pool.try_add(article) {
                            tracing::debug!(%url, buffered = pool.len(), "prefetched article");
                        } else {
                            sleep_unless_stopped(settings.idle_interval, &worker_stop);
                        }
                    }
                    Err(reason) => {
                        pool.record_fetch_failure();
                        let failures = pool.fetch_failures();
                        let delay = settings.backoff_for(failures) + jitter(settings.jitter);
                        tracing::warn!(error = %reason, failures, ?delay, "article prefetch failed");
                        sleep_unless_stopped(delay, &worker_stop);
                    }
                }
            }
            tracing::debug!("article prefetch stopped");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the worker and wait for it to exit. An in-flight request still
    /// runs to completion.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("article prefetch thread panicked");
        }
    }
}

impl Drop for Prefetcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + total;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}
