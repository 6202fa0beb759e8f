//! Cancellable snapshot subscriptions.
//!
//! A [`Publisher`] fans snapshots out to every live [`Subscription`] under a
//! key. Cancelling (or dropping) a subscription guarantees that no snapshot is
//! observed from it afterwards, including ones already buffered.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

/// Receiving half of a keyed snapshot stream.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    active: Arc<AtomicBool>,
}

impl<T> Subscription<T> {
    /// A subscription that immediately yields `snapshot` and nothing else.
    ///
    /// Lets one-off readers share code with live subscribers.
    #[must_use]
    pub fn once(snapshot: T) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(snapshot);
        Self {
            rx,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stops delivery. Buffered snapshots are discarded.
    pub fn cancel(&mut self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.rx.close();
            while self.rx.try_recv().is_ok() {}
        }
    }

    /// Next buffered snapshot, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        if !self.is_active() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Waits for the next snapshot. `None` once cancelled or the publisher is
    /// gone.
    pub async fn next(&mut self) -> Option<T> {
        if !self.is_active() {
            return None;
        }
        self.rx.recv().await
    }

    /// Drains the buffer and returns only the newest snapshot.
    pub fn latest(&mut self) -> Option<T> {
        let mut newest = None;
        while let Some(snapshot) = self.try_next() {
            newest = Some(snapshot);
        }
        newest
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
struct Sink<T> {
    tx: mpsc::UnboundedSender<T>,
    active: Arc<AtomicBool>,
}

impl<T> Sink<T> {
    fn is_live(&self) -> bool {
        self.active.load(Ordering::Acquire) && !self.tx.is_closed()
    }
}

/// Keyed fan-out of snapshots to subscribers.
#[derive(Debug)]
pub struct Publisher<K, T> {
    sinks: Mutex<HashMap<K, Vec<Sink<T>>>>,
}

impl<K, T> Default for Publisher<K, T> {
    fn default() -> Self {
        Self {
            sinks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, T: Clone> Publisher<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber under `key` and delivers `initial` to it first.
    pub fn subscribe(&self, key: K, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicBool::new(true));
        let _ = tx.send(initial);

        let mut sinks = self.sinks.lock().unwrap_or_else(PoisonError::into_inner);
        sinks.entry(key).or_default().push(Sink {
            tx,
            active: Arc::clone(&active),
        });
        Subscription { rx, active }
    }

    /// Sends `snapshot` to every live subscriber of `key` and prunes the rest.
    ///
    /// Returns how many subscribers received it.
    pub fn publish(&self, key: &K, snapshot: &T) -> usize {
        let mut sinks = self.sinks.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = sinks.get_mut(key) else {
            return 0;
        };
        list.retain(|sink| sink.is_live() && sink.tx.send(snapshot.clone()).is_ok());
        let delivered = list.len();
        if list.is_empty() {
            sinks.remove(key);
        }
        delivered
    }

    /// Whether `key` currently has any live subscriber.
    pub fn has_subscribers(&self, key: &K) -> bool {
        let sinks = self.sinks.lock().unwrap_or_else(PoisonError::into_inner);
        sinks
            .get(key)
            .is_some_and(|list| list.iter().any(Sink::is_live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_receives_initial_then_updates() {
        let publisher: Publisher<&str, Vec<u32>> = Publisher::new();
        let mut sub = publisher.subscribe("a", vec![]);
        assert_eq!(sub.try_next(), Some(vec![]));

        assert_eq!(publisher.publish(&"a", &vec![1]), 1);
        assert_eq!(publisher.publish(&"b", &vec![9]), 0);
        assert_eq!(sub.try_next(), Some(vec![1]));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn cancel_discards_buffered_snapshots() {
        let publisher: Publisher<&str, u32> = Publisher::new();
        let mut sub = publisher.subscribe("a", 0);
        publisher.publish(&"a", &1);
        sub.cancel();

        assert!(!sub.is_active());
        assert_eq!(sub.try_next(), None);
        assert_eq!(publisher.publish(&"a", &2), 0);
        assert!(!publisher.has_subscribers(&"a"));
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let publisher: Publisher<&str, u32> = Publisher::new();
        let sub = publisher.subscribe("a", 0);
        assert!(publisher.has_subscribers(&"a"));
        drop(sub);
        assert!(!publisher.has_subscribers(&"a"));
        assert_eq!(publisher.publish(&"a", &1), 0);
    }

    #[test]
    fn latest_keeps_only_newest() {
        let publisher: Publisher<u8, u32> = Publisher::new();
        let mut sub = publisher.subscribe(1, 0);
        for n in 1..=3 {
            publisher.publish(&1, &n);
        }
        assert_eq!(sub.latest(), Some(3));
        assert_eq!(sub.latest(), None);
    }

    #[tokio::test]
    async fn next_waits_for_publish() {
        let publisher: Arc<Publisher<u8, u32>> = Arc::new(Publisher::new());
        let mut sub = publisher.subscribe(1, 0);
        assert_eq!(sub.next().await, Some(0));

        let remote = Arc::clone(&publisher);
        tokio::spawn(async move {
            remote.publish(&1, &7);
        });
        assert_eq!(sub.next().await, Some(7));
    }

    #[test]
    fn once_yields_single_snapshot() {
        let mut sub = Subscription::once(5);
        assert_eq!(sub.try_next(), Some(5));
        assert_eq!(sub.try_next(), None);
    }
}
