//! Cancellable debounce timer.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// One scheduled run. Dropping the handle cancels it.
///
/// Cancellation only stops a timer that has not fired yet: once the delay
/// elapsed, the scheduled future runs to completion.
#[derive(Debug)]
pub struct TimerHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Run `future` on `runtime` after `delay`.
    pub fn spawn<F>(runtime: &Handle, delay: Duration, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (cancel, cancelled) = oneshot::channel::<()>();
        let task = runtime.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = cancelled => return,
            }
            future.await;
        });
        Self {
            cancel: Some(cancel),
            task,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // Fails only when the timer already fired.
            let _ = cancel.send(());
        }
    }

    /// Whether the timer neither fired nor was cancelled.
    pub fn is_pending(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| !cancel.is_closed())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Trailing-edge debounce: at most one pending run, each schedule replaces
/// the previous one.
#[derive(Debug)]
pub struct DebounceTimer {
    runtime: Handle,
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl DebounceTimer {
    pub fn new(runtime: Handle, delay: Duration) -> Self {
        Self {
            runtime,
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending run and schedule `future` after the delay.
    pub fn schedule<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(TimerHandle::spawn(&self.runtime, self.delay, future));
    }

    /// Cancel the pending run, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(mut handle) => {
                let was_pending = handle.is_pending();
                handle.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(TimerHandle::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>>) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let make = move || {
            let inner = Arc::clone(&inner);
            Box::pin(async move {
                inner.fetch_add(1, Ordering::SeqCst);
            }) as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>
        };
        (count, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (count, make) = counter();
        let mut timer = DebounceTimer::new(Handle::current(), Duration::from_millis(100));
        timer.schedule(make());
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_run() {
        let (count, make) = counter();
        let mut timer = DebounceTimer::new(Handle::current(), Duration::from_millis(100));
        for _ in 0..5 {
            timer.schedule(make());
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let (count, make) = counter();
        let mut timer = DebounceTimer::new(Handle::current(), Duration::from_millis(100));
        timer.schedule(make());
        assert!(timer.cancel());
        assert!(!timer.cancel());

        let handle = TimerHandle::spawn(&Handle::current(), Duration::from_millis(10), make());
        drop(handle);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
