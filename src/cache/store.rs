use std::collections::HashMap;

use parking_lot::RwLock;

use super::value::{CachedValue, Cacheable};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Invalidated,
    Present(CachedValue),
}

/// What the flat namespace holds for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Never written, or dropped by `clear_all`
    Absent,
    /// Written and later invalidated; recomputed on the next read
    Invalidated,
    Present,
}

/// In-process cache shared by the entity services.
///
/// Two independent namespaces:
/// - a flat string-keyed map for derived lookups (`all_countries`,
///   `country_code_<name>`, ...);
/// - a two-level map keyed by cache name and then by entity id.
///
/// Each namespace sits behind its own lock, so every single call is atomic.
/// Nothing expires and nothing is evicted; entries stay until they are
/// invalidated, removed or the cache is cleared.
#[derive(Debug, Default)]
pub struct CommonCache {
    entries: RwLock<HashMap<String, Slot>>,
    indexed: RwLock<HashMap<String, HashMap<i32, CachedValue>>>,
}

impl CommonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<V: Cacheable>(&self, key: impl Into<String>, value: V) {
        self.entries
            .write()
            .insert(key.into(), Slot::Present(value.into_cached()));
    }

    /// Marks the key as invalid. The key stays known to the cache but reads
    /// as a miss until the next `put`.
    pub fn invalidate(&self, key: impl Into<String>) {
        self.entries.write().insert(key.into(), Slot::Invalidated);
    }

    /// Invalidates every key starting with `prefix`, returning how many
    /// present entries were affected.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write();
        let mut affected = 0;
        for (_, slot) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            if matches!(slot, Slot::Present(_)) {
                affected += 1;
            }
            *slot = Slot::Invalidated;
        }
        affected
    }

    pub fn get<V: Cacheable>(&self, key: &str) -> Option<V> {
        match self.entries.read().get(key) {
            Some(Slot::Present(value)) => V::from_cached(value),
            _ => None,
        }
    }

    pub fn entry_state(&self, key: &str) -> EntryState {
        match self.entries.read().get(key) {
            None => EntryState::Absent,
            Some(Slot::Invalidated) => EntryState::Invalidated,
            Some(Slot::Present(_)) => EntryState::Present,
        }
    }

    pub fn put_with_id<V: Cacheable>(&self, cache_name: &str, id: i32, value: V) {
        let mut indexed = self.indexed.write();
        let value = value.into_cached();
        match indexed.get_mut(cache_name) {
            Some(partition) => {
                partition.insert(id, value);
            }
            None => {
                indexed.insert(cache_name.to_string(), HashMap::from([(id, value)]));
            }
        }
    }

    pub fn get_by_id<V: Cacheable>(&self, cache_name: &str, id: i32) -> Option<V> {
        self.indexed
            .read()
            .get(cache_name)
            .and_then(|partition| partition.get(&id))
            .and_then(V::from_cached)
    }

    pub fn remove_by_id(&self, cache_name: &str, id: i32) {
        if let Some(partition) = self.indexed.write().get_mut(cache_name) {
            partition.remove(&id);
        }
    }

    /// Drops a whole id namespace.
    pub fn clear_namespace(&self, cache_name: &str) {
        self.indexed.write().remove(cache_name);
    }

    pub fn clear_all(&self) {
        self.entries.write().clear();
        self.indexed.write().clear();
    }

    /// Number of keys in the flat namespace, invalidated ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.indexed.read().values().all(HashMap::is_empty)
    }

    pub fn indexed_len(&self, cache_name: &str) -> usize {
        self.indexed
            .read()
            .get(cache_name)
            .map_or(0, HashMap::len)
    }
}
