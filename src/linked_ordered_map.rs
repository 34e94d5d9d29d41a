//! An insertion-ordered map whose order lives in an arena-backed linked list,
//! so removing or renaming a key never has to go looking for it.

use log::trace;
use std::{
    borrow::Borrow,
    collections::{
        hash_map::{Entry, RandomState},
        HashMap,
    },
    fmt,
    hash::{BuildHasher, Hash},
    iter::{FromIterator, Rev},
    ops::ControlFlow,
};

use crate::linked_list::{self, LinkedList, NodeHandle};
use crate::ordered::Ordered;

/// Stores a value with the handle to its key's node in the order list.
struct Slot<V> {
    /// The value being stored.
    value: V,

    /// A handle to this entry's position in the order list.
    node: NodeHandle,
}

/// Behaves exactly like [`OrderedMap`](crate::OrderedMap), but `remove` and
/// `replace_key` are O(1) rather than O(n). The price is a handle stored per
/// entry and freelisted list slots which are only reclaimed by later inserts.
pub struct LinkedOrderedMap<K, V, S = RandomState> {
    storage: HashMap<K, Slot<V>, S>,
    order: LinkedList<K>,
}

/// Iterates over the entries of a [`LinkedOrderedMap`] in insertion order, or
/// in reverse.
pub struct Iter<'a, K, V, S> {
    keys: linked_list::Iter<'a, K>,
    storage: &'a HashMap<K, Slot<V>, S>,
}

/// Iterates over the keys of a [`LinkedOrderedMap`] in insertion order.
pub struct Keys<'a, K> {
    keys: linked_list::Iter<'a, K>,
}

/// Iterates over the values of a [`LinkedOrderedMap`] in insertion order.
pub struct Values<'a, K, V, S> {
    inner: Iter<'a, K, V, S>,
}

impl<K, V> LinkedOrderedMap<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LinkedOrderedMap::with_capacity_and_hash_builder(
            capacity,
            Default::default(),
        )
    }

    /// Makes a map holding `elements`, inserted in the order given.
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let elements = elements.into_iter();
        let mut m = LinkedOrderedMap::with_capacity(elements.size_hint().0);
        m.extend(elements);
        m
    }
}

impl<K, V, S> LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn with_capacity_and_hash_builder(
        capacity: usize,
        hash_builder: S,
    ) -> Self {
        Self {
            storage: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            order: LinkedList::with_capacity(capacity),
        }
    }

    /// Sets the value for a key. Returns true if the key is new, false if an
    /// existing value was overwritten in place.
    pub fn insert(&mut self, k: K, v: V) -> bool {
        let inserted = match self.storage.entry(k) {
            Entry::Occupied(mut e) => {
                e.get_mut().value = v;
                false
            }
            Entry::Vacant(e) => {
                let node = self.order.push_back(e.key().clone());
                e.insert(Slot { value: v, node });
                true
            }
        };

        #[cfg(test)]
        self.continuity_test();

        inserted
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.get(k).map(|slot| &slot.value)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.get_mut(k).map(|slot| &mut slot.value)
    }

    pub fn get_or_default<'a, Q>(&'a self, k: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(k).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.contains_key(k)
    }

    /// Renames a key without moving it. Returns false and does nothing when
    /// `original` is missing or `replacement` is already taken.
    pub fn replace_key<Q>(&mut self, original: &Q, replacement: K) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.storage.contains_key::<K>(&replacement) {
            trace!("replace_key rejected: replacement key already present");
            return false;
        }

        let slot = match self.storage.remove(original) {
            Some(slot) => slot,
            None => {
                trace!("replace_key rejected: original key not present");
                return false;
            }
        };

        self.order.replace(slot.node, replacement.clone());
        self.storage.insert(replacement, slot);

        #[cfg(test)]
        self.continuity_test();

        true
    }

    pub fn remove<Q>(&mut self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(k).is_some()
    }

    /// Removes a key, handing back its value.
    pub fn take<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.storage.remove(k)?;
        self.order.remove(slot.node);

        #[cfg(test)]
        self.continuity_test();

        Some(slot.value)
    }

    /// The oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.entry_at(self.order.head())
    }

    /// The newest entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.entry_at(self.order.tail())
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            keys: self.order.iter(),
            storage: &self.storage,
        }
    }

    /// Entries from the newest insertion to the oldest.
    pub fn iter_from_back(&self) -> Rev<Iter<'_, K, V, S>> {
        self.iter().rev()
    }

    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            keys: self.order.iter(),
        }
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values { inner: self.iter() }
    }

    /// Makes an independent map with the same entries in the same order. The
    /// copy's list is compact; none of the source's free slots come along.
    pub fn copy(&self) -> Self
    where
        V: Clone,
        S: Clone,
    {
        let mut m = LinkedOrderedMap::with_capacity_and_hash_builder(
            self.len(),
            self.storage.hasher().clone(),
        );
        for (k, v) in self.iter() {
            m.insert(k.clone(), v.clone());
        }
        m
    }

    fn entry_at(&self, node: Option<NodeHandle>) -> Option<(&K, &V)> {
        let k = self.order.get(node?)?;
        self.storage.get(k).map(|slot| (k, &slot.value))
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        assert_eq!(self.storage.len(), self.order.len());

        // every slot's handle points back at its own key
        for (k, slot) in self.storage.iter() {
            assert!(self.order.get(slot.node) == Some(k));
        }

        // and the list walks the same distance both ways
        assert_eq!(self.len(), self.order.iter().count());
        assert_eq!(self.len(), self.order.iter().rev().count());
    }
}

impl<K, V, S> Ordered<K, V> for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn insert(&mut self, k: K, v: V) -> bool {
        LinkedOrderedMap::insert(self, k, v)
    }

    fn get(&self, k: &K) -> Option<&V> {
        LinkedOrderedMap::get(self, k)
    }

    fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        LinkedOrderedMap::get_mut(self, k)
    }

    fn contains_key(&self, k: &K) -> bool {
        LinkedOrderedMap::contains_key(self, k)
    }

    fn replace_key(&mut self, original: &K, replacement: K) -> bool {
        LinkedOrderedMap::replace_key(self, original, replacement)
    }

    fn remove(&mut self, k: &K) -> bool {
        LinkedOrderedMap::remove(self, k)
    }

    fn clear(&mut self) {
        LinkedOrderedMap::clear(self)
    }

    fn len(&self) -> usize {
        LinkedOrderedMap::len(self)
    }

    fn for_each_from_front<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        for (k, v) in self.iter() {
            if f(k, v).is_break() {
                return;
            }
        }
    }

    fn for_each_from_back<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        for (k, v) in self.iter_from_back() {
            if f(k, v).is_break() {
                return;
            }
        }
    }
}

impl<K, V, S> Default for LinkedOrderedMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self {
            storage: HashMap::default(),
            order: LinkedList::with_capacity(0),
        }
    }
}

impl<K, V, S> Clone for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K, V, S> fmt::Debug for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when the same entries sit in the same order.
impl<K, V, S> PartialEq for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K, V, S> Eq for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedOrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.keys.next()?;
        self.storage.get(k).map(|slot| (k, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K, V, S> DoubleEndedIterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let k = self.keys.next_back()?;
        self.storage.get(k).map(|slot| (k, &slot.value))
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K, V, S> Iterator for Values<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
