use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::{DashboardError, ViewState};

/// Periodic refresh running on its own task.
///
/// The first fetch starts immediately, then one per `period`. Dropping the
/// handle (or calling [`PollHandle::stop`]) cancels the task, including a
/// fetch in flight.
#[derive(Debug)]
pub struct PollHandle<T> {
    task: JoinHandle<()>,
    updates: watch::Receiver<ViewState<T>>,
}

impl<T> PollHandle<T>
where
    T: Send + Sync + 'static,
{
    pub fn spawn<F, Fut>(period: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, DashboardError>> + Send + 'static,
    {
        let (sender, updates) = watch::channel(ViewState::Loading);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let state = ViewState::from_result(fetch().await);
                if sender.send(state).is_err() {
                    debug!("poll receiver gone; stopping");
                    break;
                }
            }
        });

        Self { task, updates }
    }

    /// Wait for the next refresh. Returns `false` once the task has ended.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    pub fn current(&self) -> watch::Ref<'_, ViewState<T>> {
        self.updates.borrow()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl FnMut() -> std::future::Ready<Result<usize, DashboardError>> + Send + 'static {
        move || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst) + 1))
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_per_period() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut poll = PollHandle::spawn(Duration::from_secs(60), counting_fetch(calls.clone()));
        assert!(poll.current().is_loading());

        assert!(poll.changed().await);
        assert_eq!(*poll.current(), ViewState::Loaded(1));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(poll.changed().await);
        assert_eq!(*poll.current(), ViewState::Loaded(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_refreshes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut poll = PollHandle::spawn(Duration::from_secs(60), counting_fetch(calls.clone()));
        assert!(poll.changed().await);

        poll.stop();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut poll = PollHandle::spawn(Duration::from_secs(1), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if n == 0 {
                Err(DashboardError::Transport(String::from("connection refused")))
            } else {
                Ok(n)
            })
        });

        assert!(poll.changed().await);
        assert_eq!(
            *poll.current(),
            ViewState::Failed(DashboardError::Transport(String::from("connection refused")))
        );
        assert!(poll.changed().await);
        assert_eq!(*poll.current(), ViewState::Loaded(1));
    }
}
