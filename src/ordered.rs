use std::{hash::Hash, ops::ControlFlow};

/// Describes what an insertion-ordered map is.
pub trait Ordered<K, V>
where
    K: Eq + Hash,
{
    /// Sets the value for a key. Returns true if the key was new, in which
    /// case it lands at the back of the map. Overwriting an existing key
    /// leaves it where it is and returns false, even if the value is the same.
    fn insert(&mut self, k: K, v: V) -> bool;

    /// Get the value stored for a key.
    fn get(&self, k: &K) -> Option<&V>;

    /// Get a mutable reference to the value stored for a key. Does not affect
    /// ordering.
    fn get_mut(&mut self, k: &K) -> Option<&mut V>;

    /// Get the value stored for a key, or `default` if there isn't one. The
    /// default is never stored.
    fn get_or_default<'a>(&'a self, k: &K, default: &'a V) -> &'a V {
        self.get(k).unwrap_or(default)
    }

    /// Whether the key is in the map.
    fn contains_key(&self, k: &K) -> bool;

    /// Renames `original` to `replacement`, keeping its value and its place
    /// in the order. Returns false and changes nothing if `original` isn't
    /// there or `replacement` already is.
    fn replace_key(&mut self, original: &K, replacement: K) -> bool;

    /// Removes a key, returning whether it was there.
    fn remove(&mut self, k: &K) -> bool;

    /// Empties the map.
    fn clear(&mut self);

    /// The number of entries in the map.
    fn len(&self) -> usize;

    /// Whether the map has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands each entry to `f` from the oldest insertion to the newest,
    /// stopping as soon as `f` breaks.
    fn for_each_from_front<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>;

    /// Hands each entry to `f` from the newest insertion to the oldest,
    /// stopping as soon as `f` breaks.
    fn for_each_from_back<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>;
}
