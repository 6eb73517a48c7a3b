use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::generator::article::Article;

pub const DEFAULT_TARGET_SIZE: usize = 3;
pub const DEFAULT_HISTORY_SIZE: usize = 10;

struct PoolState {
    ready: VecDeque<Article>,
    recent_urls: VecDeque<String>,
    fetch_failures: u32,
}

/// Prefetch buffer shared between one background producer and the
/// session-start consumer.
///
/// Articles whose URL was handed out within the last `history_size` takes are
/// rejected on insert, so the same passage is not served twice in a row. All
/// state sits behind a single lock and no operation waits for the other side.
pub struct ArticlePool {
    state: Mutex<PoolState>,
    target_size: usize,
    history_size: usize,
}

impl Default for ArticlePool {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SIZE, DEFAULT_HISTORY_SIZE)
    }
}

impl ArticlePool {
    pub fn new(target_size: usize, history_size: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                ready: VecDeque::with_capacity(target_size),
                recent_urls: VecDeque::with_capacity(history_size),
                fetch_failures: 0,
            }),
            target_size,
            history_size,
        }
    }

    // Poisoning is ignored; every update leaves the state consistent.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pop the oldest ready article and remember its URL. Buffered copies of
    /// a recently served URL are dropped.
    pub fn try_take(&self) -> Option<Article> {
        let mut state = self.lock();
        let article = loop {
            let candidate = state.ready.pop_front()?;
            if state.recent_urls.contains(&candidate.url) {
                tracing::debug!(url = %candidate.url, "dropping recently served article");
                continue;
            }
            break candidate;
        };
        if self.history_size > 0 {
            if state.recent_urls.len() >= self.history_size {
                state.recent_urls.pop_front();
            }
            state.recent_urls.push_back(article.url.clone());
        }
        tracing::debug!(url = %article.url, remaining = state.ready.len(), "took article from pool");
        Some(article)
    }

    pub fn is_duplicate(&self, article: &Article) -> bool {
        self.lock().recent_urls.iter().any(|url| *url == article.url)
    }

    /// Queue `article` unless it was served recently or is already buffered.
    /// Returns whether it was added.
    pub fn try_add(&self, article: Article) -> bool {
        let mut state = self.lock();
        if state.recent_urls.contains(&article.url) {
            tracing::debug!(url = %article.url, "discarding recently used article");
            return false;
        }
        if state.ready.iter().any(|queued| queued.url == article.url) {
            tracing::debug!(url = %article.url, "discarding article already buffered");
            return false;
        }
        state.ready.push_back(article);
        state.fetch_failures = 0;
        true
    }

    pub fn is_full(&self) -> bool {
        self.lock().ready.len() >= self.target_size
    }

    pub fn len(&self) -> usize {
        self.lock().ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record_fetch_failure(&self) {
        let mut state = self.lock();
        state.fetch_failures = state.fetch_failures.saturating_add(1);
    }

    pub fn fetch_failures(&self) -> u32 {
        self.lock().fetch_failures
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn article(n: usize) -> Article {
        Article::new(format!("Title {n}"), format!("https://en.wikipedia.org/wiki/{n}"), "text")
    }

    #[test]
    fn test_take_from_empty_pool() {
        let pool = ArticlePool::default();
        assert!(pool.try_take().is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let pool = ArticlePool::default();
        pool.try_add(article(1));
        pool.try_add(article(2));
        assert_eq!(pool.try_take().unwrap().url, article(1).url);
        assert_eq!(pool.try_take().unwrap().url, article(2).url);
    }

    #[test]
    fn test_is_full_tracks_count() {
        let pool = ArticlePool::new(2, 10);
        assert!(!pool.is_full());
        assert!(pool.try_add(article(1)));
        assert!(!pool.is_full());
        assert!(pool.try_add(article(2)));
        assert!(pool.is_full());
        pool.try_take();
        assert!(!pool.is_full());
    }

    #[test]
    fn test_taken_article_becomes_duplicate() {
        let pool = ArticlePool::default();
        let a = article(7);
        assert!(!pool.is_duplicate(&a));
        pool.try_add(a.clone());
        // Queued but not yet served.
        assert!(!pool.is_duplicate(&a));

        let taken = pool.try_take().unwrap();
        assert_eq!(taken, a);
        assert!(pool.is_duplicate(&a));

        assert!(!pool.try_add(a.clone()));
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_same_url_is_buffered_once() {
        let pool = ArticlePool::default();
        let a = article(3);
        assert!(pool.try_add(a.clone()));
        assert!(!pool.try_add(a.clone()));
        assert_eq!(pool.len(), 1);

        assert_eq!(pool.try_take(), Some(a));
        assert!(pool.try_take().is_none());
    }

    #[test]
    fn test_history_window_slides() {
        let pool = ArticlePool::new(3, 2);
        for n in 0..3 {
            pool.try_add(article(n));
            pool.try_take();
        }
        // Oldest URL fell out of the two-entry window.
        assert!(!pool.is_duplicate(&article(0)));
        assert!(pool.is_duplicate(&article(1)));
        assert!(pool.is_duplicate(&article(2)));
        assert!(pool.try_add(article(0)));
    }

    #[test]
    fn test_failure_counter_resets_on_insert() {
        let pool = ArticlePool::default();
        pool.record_fetch_failure();
        pool.record_fetch_failure();
        assert_eq!(pool.fetch_failures(), 2);

        pool.try_add(article(1));
        assert_eq!(pool.fetch_failures(), 0);
    }

    #[test]
    fn test_duplicate_insert_keeps_failure_count() {
        let pool = ArticlePool::default();
        pool.try_add(article(1));
        pool.try_take();
        pool.record_fetch_failure();
        assert!(!pool.try_add(article(1)));
        assert_eq!(pool.fetch_failures(), 1);
    }

    #[test]
    fn test_concurrent_producer_and_consumer() {
        let pool = Arc::new(ArticlePool::new(4, 100));
        let producer = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut n = 0;
                while n < 50 {
                    if !pool.is_full() {
                        pool.try_add(article(n));
                        n += 1;
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut taken = Vec::new();
        while taken.len() < 50 {
            match pool.try_take() {
                Some(a) => taken.push(a.url),
                None => thread::yield_now(),
            }
        }
        producer.join().unwrap();

        let expected: Vec<String> = (0..50).map(|n| article(n).url).collect();
        assert_eq!(taken, expected);
    }
}
