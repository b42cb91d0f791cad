//! In-flight Fetch Registry
//!
//! Coalesces concurrent cache misses on the same key into a single upstream
//! fetch. The first caller for a key runs its fetch; callers that arrive while
//! it is pending wait for the same result instead of starting their own.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

/// Shared result slot for one key and the number of callers attached to it.
#[derive(Debug)]
struct Pending<T> {
    cell: Arc<OnceCell<T>>,
    waiters: usize,
}

// == In-flight Registry ==
/// Map from cache key to the pending result of the fetch for that key.
///
/// Successful results are shared with every waiter. A failed or cancelled
/// fetch is not: the next waiter in line runs its own fetch.
#[derive(Debug)]
pub struct InFlight<T> {
    pending: Mutex<HashMap<String, Pending<T>>>,
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> InFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Run ==
    /// Runs `fetch` for `key` unless a fetch for `key` is already pending, in
    /// which case the pending result is awaited and returned.
    ///
    /// The key stays registered until its last waiter returns or is dropped.
    pub async fn run<F, Fut, E>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = self.register(key);
        let _registration = Registration {
            inflight: self,
            key,
            cell: &cell,
        };

        let result = cell.get_or_try_init(fetch).await.cloned();
        result
    }

    /// Number of keys with a registered fetch.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn register(&self, key: &str) -> Arc<OnceCell<T>> {
        let mut pending = self.lock();
        let entry = pending.entry(key.to_string()).or_insert_with(|| Pending {
            cell: Arc::new(OnceCell::new()),
            waiters: 0,
        });
        entry.waiters += 1;
        entry.cell.clone()
    }

    /// Detaches one waiter from `key`, dropping the registration with the
    /// last one if it still points at `cell`.
    ///
    /// Later callers then start a fresh fetch instead of reusing a settled
    /// result; by that point the result is in the cache.
    fn release(&self, key: &str, cell: &Arc<OnceCell<T>>) {
        let mut pending = self.lock();
        let finished = match pending.get_mut(key) {
            Some(entry) if Arc::ptr_eq(&entry.cell, cell) => {
                entry.waiters = entry.waiters.saturating_sub(1);
                entry.waiters == 0
            }
            _ => false,
        };
        if finished {
            pending.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Pending<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a waiter on drop, so a caller cancelled mid-fetch still
/// deregisters.
struct Registration<'a, T: Clone> {
    inflight: &'a InFlight<T>,
    key: &'a str,
    cell: &'a Arc<OnceCell<T>>,
}

impl<T: Clone> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.inflight.release(self.key, self.cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_runs_share_one_fetch() {
        let inflight = Arc::new(InFlight::<Arc<String>>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let inflight = inflight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                inflight
                    .run("gallery:db:1", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>(Arc::new("payload".to_string()))
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert!(inflight.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let inflight = Arc::new(InFlight::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let a = {
            let calls = calls.clone();
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight
                    .run("a", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };
        let b = {
            let calls = calls.clone();
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight
                    .run("b", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, String>(2)
                    })
                    .await
            })
        };

        assert_eq!(a.await.unwrap(), Ok(1));
        assert_eq!(b.await.unwrap(), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_shared() {
        let inflight = InFlight::<u32>::new();

        let first = inflight
            .run("key", || async { Err::<u32, _>("upstream down".to_string()) })
            .await;
        assert_eq!(first, Err("upstream down".to_string()));
        assert!(inflight.is_empty());

        let second = inflight.run("key", || async { Ok::<_, String>(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_sequential_runs_fetch_again() {
        let inflight = InFlight::<u32>::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            inflight
                .run("key", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(1)
                })
                .await
                .unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancelled_leader_deregisters() {
        let inflight = Arc::new(InFlight::<u32>::new());

        let leader = {
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight
                    .run("gallery:db:abandoned", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(inflight.len(), 1);

        leader.abort();
        assert!(leader.await.unwrap_err().is_cancelled());
        assert!(inflight.is_empty(), "Cancelled fetch should not stay registered");
    }

    #[tokio::test]
    async fn test_follower_takes_over_after_leader_cancelled() {
        let inflight = Arc::new(InFlight::<u32>::new());

        let leader = {
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight
                    .run("key", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let follower = {
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight.run("key", || async { Ok::<_, String>(2) }).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(inflight.len(), 1);

        leader.abort();
        assert_eq!(follower.await.unwrap(), Ok(2));
        assert!(inflight.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_follower_keeps_leader_registered() {
        let inflight = Arc::new(InFlight::<u32>::new());

        let leader = {
            let inflight = inflight.clone();
            tokio::spawn(async move {
                inflight
                    .run("key", || async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let follower = {
            let inflight = inflight.clone();
            tokio::spawn(async move { inflight.run("key", || async { Ok::<_, String>(2) }).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        follower.abort();
        let _ = follower.await;
        assert_eq!(inflight.len(), 1);

        assert_eq!(leader.await.unwrap(), Ok(1));
        assert!(inflight.is_empty());
    }
}
