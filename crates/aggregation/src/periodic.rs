use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Timer-driven refresh with an explicit lifecycle. Dropping without `stop` aborts the task.
pub struct PeriodicTask {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Runs `tick` immediately and then once per `period` until stopped.
    pub fn start<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => {
                        debug!("Periodic task stopped");
                        return;
                    }
                    _ = interval.tick() => {
                        tick().await;
                    }
                }
            }
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_periodic_task_ticks_until_stopped() {
        let ticks = Arc::new(AtomicUsize::new(0));

        let task = PeriodicTask::start(Duration::from_millis(10), {
            let ticks = Arc::clone(&ticks);
            move || {
                let ticks = Arc::clone(&ticks);
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        assert!(task.is_running());

        task.stop().await;
        let after_stop = ticks.load(Ordering::SeqCst);

        assert!(after_stop >= 2, "expected several ticks, got {}", after_stop);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(after_stop, ticks.load(Ordering::SeqCst));
    }

    #[actix_rt::test]
    async fn test_dropping_periodic_task_aborts_it() {
        let ticks = Arc::new(AtomicUsize::new(0));

        let task = PeriodicTask::start(Duration::from_millis(10), {
            let ticks = Arc::clone(&ticks);
            move || {
                let ticks = Arc::clone(&ticks);
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(25)).await;
        drop(task);
        tokio::time::sleep(Duration::from_millis(5)).await;
        let after_drop = ticks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(after_drop, ticks.load(Ordering::SeqCst));
    }
}
