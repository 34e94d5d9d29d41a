//! Hash maps which remember the order their keys were first inserted in.
//!
//! [`OrderedMap`] keeps a Vec of keys beside a HashMap; [`LinkedOrderedMap`]
//! threads its keys through an arena linked list instead, trading a little
//! memory for O(1) removal. Both implement [`Ordered`], which is what
//! [`append_multi_map`] and [`SharedMap`] work in terms of.
//!
//! ```
//! use mysterious_map::OrderedMap;
//!
//! let mut m = OrderedMap::new();
//! m.insert("b", 2);
//! m.insert("a", 1);
//! m.insert("b", 20); // overwrites, doesn't move
//!
//! assert_eq!(vec![(&"b", &20), (&"a", &1)], m.iter().collect::<Vec<_>>());
//! ```

mod linked_list;
pub mod linked_ordered_map;
mod multi_map;
mod ordered;
pub mod ordered_map;
#[cfg(feature = "shared_map")]
mod shared_map;

pub use linked_ordered_map::LinkedOrderedMap;
pub use multi_map::append_multi_map;
pub use ordered::Ordered;
pub use ordered_map::OrderedMap;
#[cfg(feature = "shared_map")]
pub use shared_map::SharedMap;

