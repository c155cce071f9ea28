use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

/// Spawns a loop that runs `refresh` on every tick of `period` and whenever
/// `wake` is notified, until `token` is cancelled.
///
/// The first refresh happens immediately. A refresh in flight when the token
/// is cancelled is abandoned. Failed refreshes are not retried; the next tick
/// is the retry.
pub fn spawn_poller<F, Fut>(
    name: &'static str,
    period: Duration,
    token: CancellationToken,
    wake: Arc<Notify>,
    mut refresh: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let span = tracing::debug_span!("poller", name);
    tokio::spawn(
        async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut woken = Box::pin(wake.notified());

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                    _ = &mut woken => {
                        debug!("Refreshing after invalidation");
                    }
                }

                // Re-arm before fetching so invalidations that land mid-fetch
                // trigger another refresh.
                woken.set(wake.notified());

                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = refresh() => {}
                }
            }

            debug!("Poller stopped");
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(
        count: &Arc<AtomicUsize>,
    ) -> impl FnMut() -> std::future::Ready<()> + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    async fn wait_for_count(counter: &AtomicUsize, at_least: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while counter.load(Ordering::SeqCst) < at_least {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("poller did not reach expected refresh count");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_immediately_then_every_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let wake = Arc::new(Notify::new());
        let handle = spawn_poller(
            "test",
            Duration::from_secs(3),
            token.clone(),
            wake,
            counting(&count),
        );

        wait_for_count(&count, 1).await;
        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_wake_triggers_out_of_band_refresh() {
        let count = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let wake = Arc::new(Notify::new());
        let handle = spawn_poller(
            "test",
            Duration::from_secs(60),
            token.clone(),
            Arc::clone(&wake),
            counting(&count),
        );

        wait_for_count(&count, 1).await;
        wake.notify_waiters();
        wait_for_count(&count, 2).await;

        token.cancel();
        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel_abandons_refresh_in_flight() {
        let token = CancellationToken::new();
        let started = Arc::new(Notify::new());
        let refresh = {
            let started = Arc::clone(&started);
            move || {
                let started = Arc::clone(&started);
                async move {
                    started.notify_one();
                    std::future::pending::<()>().await;
                }
            }
        };
        let handle = spawn_poller(
            "test",
            Duration::from_secs(60),
            token.clone(),
            Arc::new(Notify::new()),
            refresh,
        );

        started.notified().await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("poller should stop while a refresh is pending")
            .unwrap();
    }
}
