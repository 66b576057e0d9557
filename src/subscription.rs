//! Push-based views over a table's committed snapshots.
//!
//! A [`Subscription`] yields the current snapshot first and then one snapshot
//! per observed change. Snapshots published faster than a subscriber reads
//! them are coalesced; the latest one is always delivered. Dropping a
//! subscription releases it.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::actor_framework::{Entity, Snapshot};

pub struct Subscription<T> {
    receiver: watch::Receiver<Snapshot<T>>,
    primed: bool,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot<T>>) -> Self {
        Self {
            receiver,
            primed: false,
        }
    }

    /// Latest committed snapshot, without waiting.
    pub fn current(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Next snapshot, or `None` once the owning actor has stopped.
    pub async fn next(&mut self) -> Option<Snapshot<T>> {
        if self.primed {
            self.receiver.changed().await.ok()?;
        } else {
            self.primed = true;
        }
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Run `callback` on a background task for the current snapshot and every
    /// change after it.
    pub fn for_each<F>(mut self, mut callback: F) -> SubscriptionHandle
    where
        F: FnMut(&[T]) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(snapshot) = self.next().await {
                callback(snapshot.as_slice());
            }
        });
        SubscriptionHandle { task }
    }
}

/// Subscription to one row of a table.
///
/// Yields the row when first polled and again each time its contents change.
/// Ends (returns `None`) as soon as the row is absent, either because it was
/// deleted or because it never existed.
pub struct RecordSubscription<T: Entity> {
    inner: Subscription<T>,
    id: T::Id,
    last: Option<T>,
    finished: bool,
}

impl<T: Entity> RecordSubscription<T> {
    pub(crate) fn new(inner: Subscription<T>, id: T::Id) -> Self {
        Self {
            inner,
            id,
            last: None,
            finished: false,
        }
    }

    pub fn id(&self) -> &T::Id {
        &self.id
    }

    pub async fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }

        while let Some(snapshot) = self.inner.next().await {
            // snapshots are ordered by id
            let Ok(index) = snapshot.binary_search_by(|row| row.id().cmp(&self.id)) else {
                break;
            };
            let record = &snapshot[index];
            if self.last.as_ref() == Some(record) {
                continue;
            }
            self.last = Some(record.clone());
            return Some(record.clone());
        }

        self.finished = true;
        self.last = None;
        None
    }

    pub fn for_each<F>(mut self, mut callback: F) -> SubscriptionHandle
    where
        F: FnMut(&T) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(record) = self.next().await {
                callback(&record);
            }
        });
        SubscriptionHandle { task }
    }
}

/// Handle to a callback subscription. Unsubscribes when dropped.
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn unsubscribe(self) {
        self.task.abort();
    }

    /// `false` once the subscription was cancelled or its source stopped.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemId};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn widget(id: i64, quantity: u32) -> Item {
        Item::new(ItemId::new(id), "Widget", 2.5, quantity)
    }

    #[tokio::test]
    async fn test_first_next_yields_current_snapshot() {
        let (_tx, rx) = watch::channel(Arc::new(vec![widget(1, 3)]));
        let mut subscription = Subscription::new(rx);

        let first = subscription.next().await.unwrap();
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_record_subscription_skips_unrelated_changes() {
        let (tx, rx) = watch::channel(Arc::new(vec![widget(1, 3)]));
        let mut record = RecordSubscription::new(Subscription::new(rx), ItemId::new(1));

        assert_eq!(record.next().await.unwrap().quantity_in_stock, 3);

        // another row changes, then ours
        tx.send_replace(Arc::new(vec![widget(1, 3), widget(2, 8)]));
        let waiter = tokio::spawn(async move { record.next().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send_replace(Arc::new(vec![widget(1, 2), widget(2, 8)]));

        let next = waiter.await.unwrap().unwrap();
        assert_eq!(next.quantity_in_stock, 2);
    }

    #[tokio::test]
    async fn test_record_subscription_ends_on_delete() {
        let (tx, rx) = watch::channel(Arc::new(vec![widget(1, 3)]));
        let mut record = RecordSubscription::new(Subscription::new(rx), ItemId::new(1));

        assert!(record.next().await.is_some());
        tx.send_replace(Arc::new(Vec::new()));
        assert!(record.next().await.is_none());

        // stays ended even if the id reappears
        tx.send_replace(Arc::new(vec![widget(1, 9)]));
        assert!(record.next().await.is_none());
    }

    #[tokio::test]
    async fn test_record_subscription_for_missing_row() {
        let (_tx, rx) = watch::channel(Arc::new(vec![widget(1, 3)]));
        let mut record = RecordSubscription::new(Subscription::new(rx), ItemId::new(99));
        assert!(record.next().await.is_none());
    }

    #[tokio::test]
    async fn test_for_each_and_unsubscribe() {
        let (tx, rx) = watch::channel(Arc::new(vec![widget(1, 3)]));
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();

        let handle = Subscription::new(rx).for_each(move |items: &[Item]| {
            let _ = seen_tx.send(items.len());
        });

        assert_eq!(seen_rx.recv().await, Some(1));
        tx.send_replace(Arc::new(vec![widget(1, 3), widget(2, 1)]));
        assert_eq!(seen_rx.recv().await, Some(2));

        handle.unsubscribe();
        // the callback (and its sender) is dropped with the aborted task
        assert_eq!(seen_rx.recv().await, None);
    }
}
