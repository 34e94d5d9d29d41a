use log::trace;
use parking_lot::RwLock;
use std::{hash::Hash, marker::PhantomData, ops::ControlFlow, sync::Arc};

use crate::ordered::Ordered;

/// A handle to an ordered map which is shareable across thread boundaries.
/// Cloning the handle does not copy the map: every clone sees every other
/// clone's writes. Use [`SharedMap::copy`] for an independent map.
pub struct SharedMap<M, K, V>(Arc<RwLock<M>>, PhantomData<K>, PhantomData<V>)
where
    M: Ordered<K, V>,
    K: Eq + Hash,
    V: Clone;

impl<M, K, V> SharedMap<M, K, V>
where
    M: Ordered<K, V>,
    K: Eq + Hash,
    V: Clone,
{
    /// Wraps a map into a shared map accessor. Enforces an additional
    /// constraint of Clone on values, since they can't be lent out past the
    /// lock.
    pub fn with_map(map: M) -> Self {
        Self(Arc::from(RwLock::from(map)), PhantomData, PhantomData)
    }

    /// Sets a value, returning true if the key was new.
    pub fn insert(&self, k: K, v: V) -> bool {
        self.0.write().insert(k, v)
    }

    /// Get a clone of the value for a key.
    pub fn get(&self, k: &K) -> Option<V> {
        self.0.read_recursive().get(k).cloned()
    }

    /// Get a clone of the value for a key, or `default` if it isn't there.
    pub fn get_or_default(&self, k: &K, default: V) -> V {
        self.get(k).unwrap_or(default)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.0.read_recursive().contains_key(k)
    }

    /// Renames a key in place; false if `original` is missing or
    /// `replacement` is taken.
    pub fn replace_key(&self, original: &K, replacement: K) -> bool {
        self.0.write().replace_key(original, replacement)
    }

    /// Removes a key, returning whether it was there.
    pub fn remove(&self, k: &K) -> bool {
        self.0.write().remove(k)
    }

    pub fn clear(&self) {
        self.0.write().clear()
    }

    /// The number of entries at present.
    pub fn len(&self) -> usize {
        self.0.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read_recursive().is_empty()
    }

    /// Walks the entries oldest first while holding the read lock. Writers on
    /// other threads wait until `f` breaks or the walk ends. `f` may read
    /// through this map (reads take the lock recursively, so a waiting writer
    /// can't wedge them) but must not write through it.
    pub fn for_each_from_front<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        self.0.read_recursive().for_each_from_front(f)
    }

    /// Walks the entries newest first while holding the read lock.
    pub fn for_each_from_back<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        self.0.read_recursive().for_each_from_back(f)
    }

    /// Copies the map out from under the lock. The copy is a consistent
    /// snapshot and shares nothing with this handle.
    pub fn copy(&self) -> M
    where
        M: Clone,
    {
        let map = self.0.read_recursive();
        trace!("copying shared map of {} entries", map.len());
        (*map).clone()
    }
}

impl<M, K, V> Clone for SharedMap<M, K, V>
where
    M: Ordered<K, V>,
    K: Eq + Hash,
    V: Clone,
{
    fn clone(&self) -> Self {
        SharedMap(self.0.clone(), PhantomData, PhantomData)
    }
}
