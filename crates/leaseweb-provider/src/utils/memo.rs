//! Per-key, populate-once cache

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Map of keys to values computed at most once.
///
/// Concurrent first uses of a key wait on the same initialisation. A failed
/// initialisation leaves the key empty so the next caller retries. Entries
/// are never invalidated.
pub struct Memo<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_try_init<E, F, Fut>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
            cells.entry(key).or_default().clone()
        };
        cell.get_or_try_init(init).await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_first_use_initialises_once() {
        let memo: Arc<Memo<&str, u32>> = Arc::new(Memo::new());
        let inits = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let (memo, inits) = (memo.clone(), inits.clone());
            tasks.push(tokio::spawn(async move {
                memo.get_or_try_init("eu-west-3", || async {
                    inits.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok::<_, ()>(7)
                })
                .await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(7));
        }
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_retried() {
        let memo: Memo<u8, u8> = Memo::new();
        assert_eq!(
            memo.get_or_try_init(1, || async { Err("down") }).await,
            Err("down")
        );
        assert_eq!(
            memo.get_or_try_init(1, || async { Ok::<_, &str>(2) }).await,
            Ok(2)
        );
        assert_eq!(
            memo.get_or_try_init(1, || async { Ok::<_, &str>(3) }).await,
            Ok(2)
        );
    }
}
