use std::hash::Hash;

use crate::ordered::Ordered;

/// Appends `v` to the values held under `k`. A key seen for the first time
/// gets a one-element Vec and goes to the back of the map. Hands the map back
/// so calls can be chained.
pub fn append_multi_map<M, K, V>(map: &mut M, k: K, v: V) -> &mut M
where
    M: Ordered<K, Vec<V>>,
    K: Eq + Hash,
{
    if let Some(values) = map.get_mut(&k) {
        values.push(v);
    } else {
        map.insert(k, vec![v]);
    }

    map
}
