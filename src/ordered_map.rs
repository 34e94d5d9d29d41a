//! A HashMap paired with a Vec of its keys. The Vec remembers the order keys
//! were first inserted in, which is the order the map iterates in.

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
    slice,
};

use crate::ordered::Ordered;

/// A map which iterates in insertion order. Lookups go through the HashMap
/// and are O(1); `remove` and `replace_key` have to find the key's slot in
/// the order Vec by linear scan, so they are O(n). See
/// [`LinkedOrderedMap`](crate::LinkedOrderedMap) if that hurts.
pub struct OrderedMap<K, V, S = RandomState> {
    store: HashMap<K, V, S>,
    order: Vec<K>,
}

/// Iterates over the entries of an [`OrderedMap`] in insertion order. Runs
/// backwards too, which is how [`OrderedMap::iter_from_back`] works.
pub struct Iter<'a, K, V, S> {
    keys: slice::Iter<'a, K>,
    store: &'a HashMap<K, V, S>,
}

/// Iterates over the keys of an [`OrderedMap`] in insertion order.
pub struct Keys<'a, K> {
    keys: slice::Iter<'a, K>,
}

/// Iterates over the values of an [`OrderedMap`] in insertion order.
pub struct Values<'a, K, V, S> {
    inner: Iter<'a, K, V, S>,
}

impl<K, V> OrderedMap<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a map with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap::with_capacity_and_hash_builder(
            capacity,
            Default::default(),
        )
    }

    /// Makes a map holding `elements`, inserted in the order given. Later
    /// duplicates overwrite earlier ones without moving them.
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let elements = elements.into_iter();
        let mut m = OrderedMap::with_capacity(elements.size_hint().0);
        m.extend(elements);
        m
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn with_capacity_and_hash_builder(
        capacity: usize,
        hash_builder: S,
    ) -> Self {
        Self {
            store: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Sets the value for a key. Returns true if the key is new, in which
    /// case it goes to the back. Returns false if an existing value was
    /// overwritten, which does not move the key.
    pub fn insert(&mut self, k: K, v: V) -> bool {
        let inserted = match self.store.entry(k) {
            Entry::Occupied(mut e) => {
                e.insert(v);
                false
            }
            Entry::Vacant(e) => {
                self.order.push(e.key().clone());
                e.insert(v);
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
        self.store.get(k)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get_mut(k)
    }

    /// Gets the value for a key, or `default` if the key isn't there. Does
    /// not store `default`.
    pub fn get_or_default<'a, Q>(&'a self, k: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(k).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains_key(k)
    }

    /// Renames a key in place. Fails, changing nothing, when `original` is
    /// missing or `replacement` is already taken; the two cases look the same
    /// to the caller.
    pub fn replace_key<Q>(&mut self, original: &Q, replacement: K) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.store.contains_key::<K>(&replacement) {
            trace!("replace_key rejected: replacement key already present");
            return false;
        }

        let value = match self.store.remove(original) {
            Some(value) => value,
            None => {
                trace!("replace_key rejected: original key not present");
                return false;
            }
        };

        if let Some(slot) = self
            .order
            .iter_mut()
            .find(|k| <K as Borrow<Q>>::borrow(&**k) == original)
        {
            *slot = replacement.clone();
        }
        self.store.insert(replacement, value);

        #[cfg(test)]
        self.continuity_test();

        true
    }

    /// Removes a key, returning whether it was there.
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
        let value = self.store.remove(k)?;

        if let Some(idx) = self
            .order
            .iter()
            .position(|o| <K as Borrow<Q>>::borrow(o) == k)
        {
            self.order.remove(idx);
        }

        #[cfg(test)]
        self.continuity_test();

        Some(value)
    }

    /// The oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.order.first().and_then(|k| self.store.get_key_value(k))
    }

    /// The newest entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.order.last().and_then(|k| self.store.get_key_value(k))
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries from the front (oldest insertion) to the back.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            keys: self.order.iter(),
            store: &self.store,
        }
    }

    /// Entries from the back (newest insertion) to the front. Overwriting a
    /// key's value does not make it newer.
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

    /// Makes an independent map with the same entries in the same order.
    pub fn copy(&self) -> Self
    where
        V: Clone,
        S: Clone,
    {
        let mut m = OrderedMap::with_capacity_and_hash_builder(
            self.len(),
            self.store.hasher().clone(),
        );
        for (k, v) in self.iter() {
            m.insert(k.clone(), v.clone());
        }
        m
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        use std::collections::HashSet;

        assert_eq!(self.store.len(), self.order.len());

        // every key in the order exists in the store, exactly once
        let mut seen = HashSet::with_capacity(self.order.len());
        for k in self.order.iter() {
            assert!(self.store.contains_key(k));
            assert!(seen.insert(k));
        }
    }
}

impl<K, V, S> Ordered<K, V> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn insert(&mut self, k: K, v: V) -> bool {
        OrderedMap::insert(self, k, v)
    }

    fn get(&self, k: &K) -> Option<&V> {
        OrderedMap::get(self, k)
    }

    fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        OrderedMap::get_mut(self, k)
    }

    fn contains_key(&self, k: &K) -> bool {
        OrderedMap::contains_key(self, k)
    }

    fn replace_key(&mut self, original: &K, replacement: K) -> bool {
        OrderedMap::replace_key(self, original, replacement)
    }

    fn remove(&mut self, k: &K) -> bool {
        OrderedMap::remove(self, k)
    }

    fn clear(&mut self) {
        OrderedMap::clear(self)
    }

    fn len(&self) -> usize {
        OrderedMap::len(self)
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

impl<K, V, S> Default for OrderedMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self {
            store: HashMap::default(),
            order: Vec::new(),
        }
    }
}

impl<K, V, S> Clone for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K, V, S> fmt::Debug for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same entries in the same order.
impl<K, V, S> PartialEq for OrderedMap<K, V, S>
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

impl<K, V, S> Eq for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
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

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
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

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S>
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
        self.store.get(k).map(|v| (k, v))
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
        self.store.get(k).map(|v| (k, v))
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

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        collections::hash_map::DefaultHasher,
        hash::BuildHasherDefault,
        ops::ControlFlow,
    };

    use super::OrderedMap;
    use crate::Ordered;

    fn abc() -> OrderedMap<&'static str, u32> {
        OrderedMap::from_elements(vec![("a", 1), ("b", 2), ("c", 3)])
    }

    #[test]
    fn test_insertion_order() {
        let mut m = OrderedMap::with_capacity(4);

        assert!(m.insert(3u32, "three"));
        assert!(m.insert(1, "one"));
        assert!(m.insert(4, "four"));
        assert!(m.insert(2, "two"));

        assert_eq!(vec![3, 1, 4, 2], m.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec![2, 4, 1, 3],
            m.iter_from_back().map(|(k, _)| *k).collect::<Vec<_>>()
        );
        assert_eq!(Some((&3, &"three")), m.front());
        assert_eq!(Some((&2, &"two")), m.back());
    }

    /// Overwriting a value keeps the key where it was, even when seen from
    /// the back.
    #[test]
    fn test_reinsert_keeps_position() {
        let mut m = OrderedMap::new();

        assert!(m.insert("k1", "v1"));
        assert!(m.insert("k2", "v2"));
        assert!(!m.insert("k1", "v1'"));
        // same value still counts as an overwrite
        assert!(!m.insert("k2", "v2"));

        assert_eq!(vec!["k1", "k2"], m.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec![("k2", "v2"), ("k1", "v1'")],
            m.iter_from_back()
                .map(|(k, v)| (*k, *v))
                .collect::<Vec<_>>()
        );
        assert_eq!(Some(&"v1'"), m.get("k1"));
        assert_eq!(2, m.len());
    }

    #[test]
    fn test_replace_key_keeps_position() {
        let mut m = abc();

        assert!(m.replace_key("b", "x"));

        assert_eq!(vec!["a", "x", "c"], m.keys().copied().collect::<Vec<_>>());
        assert_eq!(Some(&2), m.get("x"));
        assert!(!m.contains_key("b"));
        assert_eq!(3, m.len());
    }

    #[test]
    fn test_replace_key_rejection() {
        let mut m = abc();

        assert!(!m.replace_key("nope", "x"));
        assert_eq!(abc(), m);

        // would clobber "c"
        assert!(!m.replace_key("a", "c"));
        assert_eq!(Some(&1), m.get("a"));
        assert_eq!(Some(&3), m.get("c"));
        assert_eq!(abc(), m);

        // renaming a key to itself is a collision too
        assert!(!m.replace_key("a", "a"));
        assert_eq!(abc(), m);
    }

    #[test]
    fn test_remove() {
        let mut m = abc();

        assert!(m.remove("b"));
        assert!(!m.contains_key("b"));
        assert_eq!(vec!["a", "c"], m.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec!["c", "a"],
            m.iter_from_back().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        assert!(!m.remove("b"));
        assert_eq!(2, m.len());

        assert_eq!(Some(1), m.take("a"));
        assert_eq!(Some(3), m.take("c"));
        assert!(m.is_empty());
        assert_eq!(None, m.front());
    }

    /// A removed key that comes back is a new key, so it goes to the back.
    #[test]
    fn test_remove_then_reinsert() {
        let mut m = abc();

        assert!(m.remove("a"));
        assert!(m.insert("a", 10));

        assert_eq!(vec!["b", "c", "a"], m.keys().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_get_or_default_does_not_insert() {
        let m = abc();

        assert_eq!(&1, m.get_or_default("a", &99));
        assert_eq!(&99, m.get_or_default("z", &99));
        assert!(!m.contains_key("z"));
        assert_eq!(3, m.len());
    }

    #[test]
    fn test_copy_independence() {
        let mut m = abc();
        let mut m2 = m.copy();

        assert_eq!(m, m2);

        m2.insert("d", 4);
        m2.remove("a");
        assert_eq!(abc(), m);

        m.insert("b", 20);
        assert_eq!(Some(&2), m2.get("b"));
        assert_eq!(vec!["b", "c", "d"], m2.keys().copied().collect::<Vec<_>>());

        let m3 = m.clone();
        assert_eq!(m, m3);
    }

    /// Every key traversal finds is a key the map claims to have, and the
    /// other way around.
    #[test]
    fn test_keys_match_membership() {
        let mut m = OrderedMap::new();
        for i in 0..50u32 {
            m.insert(i % 17, i);
            if i % 5 == 0 {
                m.remove(&(i % 7));
            }
            if i % 9 == 0 {
                m.replace_key(&(i % 17), 100 + i);
            }
        }

        let keys: Vec<u32> = m.keys().copied().collect();
        assert_eq!(m.len(), keys.len());
        for k in keys.iter() {
            assert!(m.contains_key(k));
        }
        for k in 0..200u32 {
            assert_eq!(m.contains_key(&k), keys.contains(&k));
        }
    }

    #[test]
    fn test_early_termination() {
        let m = abc();
        let visited = Cell::new(0);

        let first = m
            .iter()
            .inspect(|_| visited.set(visited.get() + 1))
            .next();
        assert_eq!(Some((&"a", &1)), first);
        assert_eq!(1, visited.get());

        let mut seen = 0;
        m.for_each_from_back(|k, _| {
            seen += 1;
            assert_eq!("c", *k);
            ControlFlow::Break(())
        });
        assert_eq!(1, seen);
    }

    #[test]
    fn test_values_and_reads_during_iteration() {
        let m = abc();

        let mut total = 0;
        for (k, v) in &m {
            assert!(m.contains_key(k));
            assert_eq!(Some(v), m.get(k));
            total += v;
        }
        assert_eq!(6, total);
        assert_eq!(vec![1, 2, 3], m.values().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_debug_in_order() {
        let m = OrderedMap::from_elements(vec![(2, 'b'), (1, 'a')]);
        assert_eq!("{2: 'b', 1: 'a'}", format!("{:?}", m));
    }

    /// Building from pairs goes through insert, so a repeated key keeps its
    /// first position and its last value.
    #[test]
    fn test_from_elements_duplicates() {
        let m = OrderedMap::from_elements(vec![("a", 1), ("b", 2), ("a", 3)]);

        assert_eq!(2, m.len());
        assert_eq!(
            vec![("a", 3), ("b", 2)],
            m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_collect_and_extend() {
        let mut m: OrderedMap<u32, char> =
            vec![(3, 'c'), (1, 'a'), (3, 'C')].into_iter().collect();
        assert_eq!(vec![(&3, &'C'), (&1, &'a')], m.iter().collect::<Vec<_>>());

        m.extend(vec![(2, 'b'), (1, 'A')]);
        assert_eq!(vec![3, 1, 2], m.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec!['C', 'A', 'b'],
            m.values().copied().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_custom_hash_builder() {
        let hash_builder = BuildHasherDefault::<DefaultHasher>::default();
        let mut m: OrderedMap<&str, u32, _> =
            OrderedMap::with_capacity_and_hash_builder(2, hash_builder);

        assert!(m.insert("x", 1));
        assert!(m.insert("y", 2));
        assert!(m.replace_key("x", "z"));
        assert!(m.remove("y"));

        let copied = m.copy();
        assert_eq!(m, copied);
        assert_eq!(
            vec![("z", 1)],
            copied.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn readme_snippet() {
        let mut m: OrderedMap<String, u32> = OrderedMap::new();

        m.insert("first".to_owned(), 1);
        m.insert("second".to_owned(), 2);
        m.insert("first".to_owned(), 3);

        assert_eq!(
            vec![("first", 3), ("second", 2)],
            m.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>()
        );
    }
}
