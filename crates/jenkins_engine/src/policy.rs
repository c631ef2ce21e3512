use std::time::Duration;

use jenkins_logging::{jenkins_debug, jenkins_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Receiving end of an update policy.
pub struct UpdateSignal {
    rx: Option<mpsc::Receiver<()>>,
}

impl UpdateSignal {
    fn inert() -> Self {
        Self { rx: None }
    }

    /// Waits for the next tick. Returns `false` once the policy can no longer fire.
    pub async fn fired(&mut self) -> bool {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await.is_some(),
            None => false,
        }
    }
}

/// Decides when every tracked indicator gets re-polled.
pub enum UpdatePolicy {
    /// Never fires.
    Null,
    Periodic(PeriodicUpdatePolicy),
}

impl UpdatePolicy {
    pub fn periodic(interval: Duration) -> Self {
        UpdatePolicy::Periodic(PeriodicUpdatePolicy::new(interval))
    }

    /// `0` minutes disables polling.
    pub fn from_minutes(minutes: u64) -> Self {
        if minutes == 0 {
            UpdatePolicy::Null
        } else {
            Self::periodic(Duration::from_secs(minutes * 60))
        }
    }

    /// Must be called at most once, from within a tokio runtime.
    pub fn subscribe(&mut self) -> UpdateSignal {
        match self {
            UpdatePolicy::Null => UpdateSignal::inert(),
            UpdatePolicy::Periodic(policy) => policy.subscribe(),
        }
    }

    pub fn dispose(&mut self) {
        if let UpdatePolicy::Periodic(policy) = self {
            policy.dispose();
        }
    }
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self::periodic(DEFAULT_POLL_INTERVAL)
    }
}

pub struct PeriodicUpdatePolicy {
    interval: Duration,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PeriodicUpdatePolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn subscribe(&mut self) -> UpdateSignal {
        if self.task.is_some() || self.cancel.is_cancelled() {
            jenkins_warn!("Update policy already subscribed or disposed; ignoring subscriber");
            return UpdateSignal::inert();
        }

        // Capacity 1: ticks that arrive while the consumer is busy collapse into one.
        let (tx, rx) = mpsc::channel(1);
        let cancel = self.cancel.clone();
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        match tx.try_send(()) {
                            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                            Err(mpsc::error::TrySendError::Closed(())) => break,
                        }
                    }
                }
            }
            jenkins_debug!("Periodic update policy stopped");
        }));
        UpdateSignal { rx: Some(rx) }
    }

    /// Stops the timer and closes the signal. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.cancel.cancel();
        self.task = None;
    }
}

impl Drop for PeriodicUpdatePolicy {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
