//! Change notifications for the list of mounted volumes.
//!
//! The monitor does not watch anything by itself. Whoever observes OS
//! mount/unmount/rename events (or a timer) calls [`VolumeMonitor::notify`]
//! and subscribers receive a freshly enumerated list. Deliveries are not
//! ordered against concurrent mount or unmount calls, so a list may already be
//! stale when it arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::process::ProcessRunner;
use crate::volume::{MountTable, MountedVolume, VolumeEnumerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&[MountedVolume]) + Send + Sync>;

pub struct VolumeMonitor<T, R> {
    enumerator: VolumeEnumerator<T, R>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    last: Mutex<Option<Vec<MountedVolume>>>,
    next_id: AtomicU64,
}

impl<T: MountTable, R: ProcessRunner> VolumeMonitor<T, R> {
    pub fn new(enumerator: VolumeEnumerator<T, R>) -> VolumeMonitor<T, R> {
        VolumeMonitor {
            enumerator,
            subscribers: Mutex::new(vec![]),
            last: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn enumerator(&self) -> &VolumeEnumerator<T, R> {
        &self.enumerator
    }

    pub fn on_volume_table_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[MountedVolume]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push((id, Arc::new(callback)));
        id
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Re-enumerates and delivers the list to every subscriber.
    pub fn notify(&self) -> Result<Vec<MountedVolume>> {
        let volumes = self.enumerator.list_mounted_volumes()?;
        self.deliver(&volumes);
        *lock(&self.last) = Some(volumes.clone());
        Ok(volumes)
    }

    /// Like [`notify`](Self::notify), but delivers only when the list differs
    /// from the last one delivered. Returns `None` when nothing changed.
    pub fn notify_if_changed(&self) -> Result<Option<Vec<MountedVolume>>> {
        let volumes = self.enumerator.list_mounted_volumes()?;

        {
            let mut last = lock(&self.last);
            if last.as_ref() == Some(&volumes) {
                return Ok(None);
            }
            *last = Some(volumes.clone());
        }

        self.deliver(&volumes);
        Ok(Some(volumes))
    }

    fn deliver(&self, volumes: &[MountedVolume]) {
        // Callbacks may subscribe or unsubscribe, so none run under the lock.
        let subscribers: Vec<Callback> = lock(&self.subscribers)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        tracing::debug!(
            subscribers = subscribers.len(),
            volumes = volumes.len(),
            "volume table changed"
        );
        for callback in subscribers {
            callback(volumes);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A panicking subscriber must not wedge every later notification.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
