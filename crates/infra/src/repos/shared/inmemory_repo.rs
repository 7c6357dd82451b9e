use dms_scheduler_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    // A panic in another test thread should not poison every later query
    collection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

/// Inserts `val` unless an item for which `conflicts` returns true already
/// exists. The check and the insert happen under the same lock, so among
/// concurrent callers with conflicting values exactly one succeeds.
pub fn insert_unique<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    conflicts: F,
) -> bool {
    let mut collection = lock(collection);
    if collection.iter().any(|item| conflicts(item)) {
        return false;
    }
    collection.push(val.clone());
    true
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = lock(collection);
    if let Some(item) = collection.iter_mut().find(|item| item.id() == val.id()) {
        *item = val.clone();
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    lock(collection)
        .iter()
        .find(|item| item.id() == val_id)
        .cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn exists<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> bool {
    lock(collection).iter().any(|item| compare(item))
}
