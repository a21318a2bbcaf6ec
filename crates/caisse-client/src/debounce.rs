//! # Debouncer
//!
//! Trailing-edge debounce with a single pending slot.
//!
//! ```text
//!  keystrokes   p    pa   pai  pain
//!  time (ms)    0    80   150  210 ─────────── 510
//!  timer        ├──X ├──X ├──X ├──────────────►│ fire("pain")
//!                  cancelled               quiet period elapsed
//! ```
//!
//! Only the timer is cancelled. Once it fires, the work runs on its own task,
//! so a later keystroke never aborts a request already in flight.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Default quiet period for the search box.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `work` to run after the quiet period, replacing whatever
    /// was scheduled before.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(work);
        }));
    }

    /// Drops the pending call, if any. Returns true when a timer was still
    /// running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

    /// Returns the shared call log and a factory of jobs appending to it.
    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Job) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let make = move |value: &str| -> Job {
            let sink = sink.clone();
            let value = value.to_string();
            Box::pin(async move {
                sink.lock().unwrap().push(value);
            })
        };
        (calls, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_fires() {
        let (calls, make) = recorder();
        let mut debouncer = Debouncer::default();

        for query in ["p", "pa", "pai", "pain"] {
            debouncer.call(make(query));
            sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().unwrap().is_empty());

        sleep(Duration::from_millis(250)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["pain".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_quiet_period() {
        let (calls, make) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.call(make("lait"));
        sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_fire() {
        let (calls, make) = recorder();
        let mut debouncer = Debouncer::default();

        debouncer.call(make("pain"));
        sleep(Duration::from_millis(400)).await;
        debouncer.call(make("lait"));
        sleep(Duration::from_millis(400)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["pain".to_string(), "lait".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (calls, make) = recorder();
        let mut debouncer = Debouncer::default();

        debouncer.call(make("savon"));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().unwrap().is_empty());
    }
}
