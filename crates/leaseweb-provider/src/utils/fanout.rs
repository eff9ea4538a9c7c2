//! Parallel detail fetches

use super::call;
use leaseweb_framework::Context;
use leaseweb_sdk::SdkError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Fetch one detail per id concurrently, at most `limit` at a time.
///
/// Results come back sorted by id whatever order the workers finish in. The
/// first failure cancels the remaining workers and is returned; so is a
/// cancellation of `ctx`.
pub async fn fan_out<I, T, F, Fut>(
    ctx: &Context,
    ids: Vec<I>,
    limit: Option<usize>,
    fetch: F,
) -> Result<Vec<T>, SdkError>
where
    I: Ord + Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
{
    let workers_ctx = ctx.child();
    let semaphore = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut workers = JoinSet::new();

    debug!(count = ids.len(), ?limit, "Fetching details");
    for id in ids {
        let ctx = workers_ctx.clone();
        let semaphore = semaphore.clone();
        let detail = fetch(id.clone());
        workers.spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => Some(
                    semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| SdkError::Cancelled)?,
                ),
                None => None,
            };
            let item = call(&ctx, detail).await?;
            Ok::<_, SdkError>((id, item))
        });
    }

    let mut results = Vec::with_capacity(workers.len());
    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| SdkError::Transport(format!("detail worker failed: {}", e)))
            .and_then(|result| result);
        match outcome {
            Ok(pair) => results.push(pair),
            Err(e) => {
                workers_ctx.cancel();
                workers.abort_all();
                return Err(e);
            }
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results.into_iter().map(|(_, item)| item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_results_sorted_by_id() {
        let ids = vec![3u64, 1, 2];
        let items = fan_out(&Context::new(), ids, None, |id| async move {
            // later ids finish first
            tokio::time::sleep(Duration::from_millis(100 - id * 10)).await;
            Ok(format!("detail-{}", id))
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["detail-1", "detail-2", "detail-3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_error_aborts_the_rest() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = completed.clone();
        let result = fan_out(&Context::new(), vec![1u64, 2, 3], None, move |id| {
            let counter = counter.clone();
            async move {
                if id == 2 {
                    return Err(SdkError::Api {
                        status: 404,
                        body: String::new(),
                    });
                }
                tokio::time::sleep(Duration::from_secs(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(id)
            }
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(404));
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_bounds_concurrency() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (r, p) = (running.clone(), peak.clone());
        let items = fan_out(&Context::new(), (0u64..6).collect(), Some(2), move |id| {
            let (running, peak) = (r.clone(), p.clone());
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(id)
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_context() {
        let ctx = Context::new();
        ctx.cancel();
        let result = fan_out(&ctx, vec![1u64], None, |id| async move { Ok(id) }).await;
        assert!(matches!(result, Err(SdkError::Cancelled)));
    }

    #[tokio::test]
    async fn test_no_ids() {
        let ctx = Context::new();
        let items: Vec<u64> = fan_out(&ctx, vec![], None, |id: u64| async move { Ok(id) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
