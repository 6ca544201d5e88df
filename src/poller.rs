//! Background polling of the station's current reading.
//!
//! One task owns the poll loop and publishes an immutable [`PollSnapshot`]
//! through a `tokio::sync::watch` channel after every attempt. Consumers hold
//! a receiver and render whatever the latest snapshot says; there is no shared
//! mutable state. Requests are awaited one at a time on the task, so two polls
//! never overlap and a slow response cannot overwrite a newer one.

use crate::config::{MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::station::client::StationClient;
use crate::station::error::StationError;
use crate::types::reading::Reading;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// The published state of the poll loop after some number of attempts.
///
/// `reading` always holds the last successful reading, even while
/// `last_error` is set; a view shows stale-but-real data next to the error
/// message. Before the first success both are in their initial state and
/// [`PollSnapshot::is_loading`] is true.
#[derive(Debug, Clone, Default)]
pub struct PollSnapshot {
    /// Last successfully fetched reading, if any.
    pub reading: Option<Reading>,
    /// Error from the most recent attempt; cleared by the next success.
    pub last_error: Option<Arc<StationError>>,
    /// Instant of the last successful fetch.
    pub updated_at: Option<DateTime<Utc>>,
    /// Total poll attempts so far.
    pub polls: u64,
}

impl PollSnapshot {
    /// True until the first reading has arrived.
    pub fn is_loading(&self) -> bool {
        self.reading.is_none()
    }
}

/// Handle to a running poll task.
///
/// Dropping the handle (or calling [`Poller::shutdown`]) aborts the task,
/// which also cancels any request still in flight; nothing can write a
/// snapshot after teardown.
///
/// # Examples
///
/// ```no_run
/// # use weatherdeck::{Poller, StationClient};
/// # use std::time::Duration;
/// # async fn run() {
/// let station = StationClient::new("http://192.168.5.85");
/// let poller = Poller::spawn(station, Duration::from_secs(30));
///
/// let mut updates = poller.subscribe();
/// while updates.changed().await.is_ok() {
///     let snapshot = updates.borrow().clone();
///     println!("reading: {:?}", snapshot.reading);
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<PollSnapshot>,
}

impl Poller {
    /// Starts polling `station` every `interval`, beginning immediately.
    ///
    /// The interval is clamped to the supported 1 s – 10 min band.
    pub fn spawn(station: StationClient, interval: Duration) -> Self {
        let interval = interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
        let (tx, rx) = watch::channel(PollSnapshot::default());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A tick that fires while a request is still in flight waits for
            // the next full interval instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = station.current().await;
                tx.send_modify(|snapshot| {
                    snapshot.polls += 1;
                    match result {
                        Ok(reading) => {
                            debug!("Poll #{} succeeded", snapshot.polls);
                            snapshot.reading = Some(reading);
                            snapshot.updated_at = Some(Utc::now());
                            snapshot.last_error = None;
                        }
                        Err(e) => {
                            warn!("Poll #{} failed: {}", snapshot.polls, e);
                            snapshot.last_error = Some(Arc::new(e));
                        }
                    }
                });
            }
        });

        Self { handle, rx }
    }

    /// Returns a receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.rx.clone()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> PollSnapshot {
        self.rx.borrow().clone()
    }

    /// Stops the poll loop, cancelling any request in flight.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
