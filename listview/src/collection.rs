//! Observable collections of records.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use log::trace;

use crate::record::{Record, RecordId};

/// A change to a collection, delivered to every subscribed listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<R> {
    Added(R),
    Removed(R),
    /// The collection was replaced wholesale; carries the new models in order.
    Reset(Vec<R>),
}

/// Callback receiving collection changes.
///
/// Listeners are called synchronously, in subscription order, after the
/// collection has been updated and with no collection lock held.
pub type Listener<R> = Arc<dyn Fn(&Change<R>) + Send + Sync>;

/// An ordered set of records that notifies listeners about changes.
pub trait Collection: Send + Sync {
    type Record: Record;

    /// Current records, in order.
    fn models(&self) -> Vec<Self::Record>;

    /// Register `listener` until the returned subscription is dropped.
    fn subscribe(&self, listener: Listener<Self::Record>) -> Subscription;
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

struct Listeners<R> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(u64, Listener<R>)>>,
}

/// In-memory [`Collection`] backed by a `Vec`.
///
/// Cheap to clone; clones share the same records and listeners. Records are
/// unique by ID: adding a record whose ID is already present is ignored.
///
/// # Example
///
/// ```
/// use listview::{Model, VecCollection};
///
/// let fruits = VecCollection::new(vec![Model::with_id(1).set("name", "apple")]);
/// fruits.add(Model::with_id(2).set("name", "banana"));
/// assert_eq!(fruits.len(), 2);
/// ```
pub struct VecCollection<R> {
    models: Arc<RwLock<Vec<R>>>,
    listeners: Arc<Listeners<R>>,
}

impl<R> Clone for VecCollection<R> {
    fn clone(&self) -> Self {
        Self {
            models: Arc::clone(&self.models),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<R: Record> Default for VecCollection<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Record> VecCollection<R> {
    pub fn new(models: Vec<R>) -> Self {
        Self {
            models: Arc::new(RwLock::new(models)),
            listeners: Arc::new(Listeners {
                next_id: AtomicU64::new(0),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.read(|models| models.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record with the given ID.
    pub fn get(&self, id: &RecordId) -> Option<R> {
        self.read(|models| {
            models
                .iter()
                .find(|model| model.id().as_ref() == Some(id))
                .cloned()
        })
    }

    /// Append a record and notify listeners.
    ///
    /// Returns false (and notifies nobody) if a record with the same ID is
    /// already present.
    pub fn add(&self, record: R) -> bool {
        let added = self.write(|models| {
            if let Some(id) = record.id()
                && models.iter().any(|model| model.id().as_ref() == Some(&id))
            {
                return false;
            }
            models.push(record.clone());
            true
        });
        if added {
            self.notify(Change::Added(record));
        }
        added
    }

    /// Remove the record with the given ID and notify listeners.
    pub fn remove(&self, id: &RecordId) -> Option<R> {
        let removed = self.write(|models| {
            let index = models
                .iter()
                .position(|model| model.id().as_ref() == Some(id))?;
            Some(models.remove(index))
        })?;
        self.notify(Change::Removed(removed.clone()));
        Some(removed)
    }

    /// Replace all records and notify listeners with a single reset.
    pub fn reset(&self, records: Vec<R>) {
        self.write(|models| *models = records.clone());
        self.notify(Change::Reset(records));
    }

    /// Number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    fn read<T>(&self, f: impl FnOnce(&Vec<R>) -> T) -> T {
        let guard = self
            .models
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Vec<R>) -> T) -> T {
        let mut guard = self
            .models
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn notify(&self, change: Change<R>) {
        // Snapshot so listeners may subscribe, unsubscribe or mutate the
        // collection re-entrantly.
        let listeners: Vec<Listener<R>> = self
            .listeners
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!("notifying {} listener(s)", listeners.len());
        for listener in listeners {
            listener(&change);
        }
    }
}

impl<R: Record> Collection for VecCollection<R> {
    type Record = R;

    fn models(&self) -> Vec<R> {
        self.read(|models| models.clone())
    }

    fn subscribe(&self, listener: Listener<R>) -> Subscription {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, listener));

        let listeners: Weak<Listeners<R>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners
                    .entries
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .retain(|(entry, _)| *entry != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::record::Model;

    fn recorder(collection: &VecCollection<Model>) -> (Arc<Mutex<Vec<String>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = collection.subscribe(Arc::new(move |change: &Change<Model>| {
            let label = match change {
                Change::Added(m) => format!("add {}", m.id().unwrap()),
                Change::Removed(m) => format!("remove {}", m.id().unwrap()),
                Change::Reset(ms) => format!("reset {}", ms.len()),
            };
            sink.lock().unwrap().push(label);
        }));
        (seen, subscription)
    }

    #[test]
    fn notifies_in_order() {
        let collection = VecCollection::new(vec![Model::with_id(1)]);
        let (seen, _subscription) = recorder(&collection);

        collection.add(Model::with_id(2));
        collection.remove(&RecordId::from(1i64));
        collection.reset(vec![Model::with_id(3), Model::with_id(4)]);

        assert_eq!(*seen.lock().unwrap(), vec!["add 2", "remove 1", "reset 2"]);
        assert_eq!(collection.models(), vec![Model::with_id(3), Model::with_id(4)]);
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let collection = VecCollection::new(vec![Model::with_id(1)]);
        let (seen, _subscription) = recorder(&collection);

        assert!(!collection.add(Model::with_id("1")));
        assert_eq!(collection.len(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn removing_unknown_id_is_silent() {
        let collection: VecCollection<Model> = VecCollection::default();
        let (seen, _subscription) = recorder(&collection);

        assert!(collection.remove(&RecordId::from("missing")).is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let collection: VecCollection<Model> = VecCollection::default();
        let (seen, subscription) = recorder(&collection);
        assert_eq!(collection.listener_count(), 1);

        drop(subscription);
        collection.add(Model::with_id(1));

        assert_eq!(collection.listener_count(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }
}
