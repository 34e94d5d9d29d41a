//! A circular doubly linked list that flattens all its nodes onto a Vec for
//! storage, gaining data locality and O(1) removal given a node's handle.

use log::trace;

/// Index of a node in the linked list's storage vec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeHandle(usize);

/// A node that lives in a linked list.
struct Node<T> {
    /// The value being stored. Taken out when the node is freelisted.
    value: Option<T>,

    /// The index of the node previous to this one.
    prev: NodeHandle,

    /// The index of the next node in the list.
    next: NodeHandle,
}

/// One contiguous Vec of nodes addressed by their position in the Vec, with
/// removed slots freelisted and reused by later pushes. There is no
/// compaction.
///
/// The list is circular: the head's `prev` is the tail, so pushing to the back
/// and popping either end need nothing but the head. Handles leak out of the
/// list on purpose; LinkedOrderedMap stores them beside each value so a key
/// can be unlinked or renamed without walking the list.
pub(crate) struct LinkedList<T> {
    /// The nodes in the list, live and free.
    store: Vec<Node<T>>,

    /// Entries in the list which aren't in use anymore. These will be reused.
    free: Vec<NodeHandle>,

    /// The first node in the list.
    head: Option<NodeHandle>,
}

/// Walks a [`LinkedList`] from either end.
pub(crate) struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<T> LinkedList<T> {
    /// Creates a new linked list with a specific capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
        }
    }

    /// The length of this linked list.
    pub(crate) fn len(&self) -> usize {
        self.store.len() - self.free.len()
    }

    /// Gets an element from the list.
    pub(crate) fn get(&self, node: NodeHandle) -> Option<&T> {
        self.store.get(node.0).and_then(|n| n.value.as_ref())
    }

    /// Swaps the value held by a live node, returning the old one. The node
    /// keeps its place in the chain.
    pub(crate) fn replace(&mut self, node: NodeHandle, t: T) -> Option<T> {
        self.store
            .get_mut(node.0)
            .and_then(|n| n.value.as_mut())
            .map(|v| std::mem::replace(v, t))
    }

    /// The first node in the list.
    pub(crate) fn head(&self) -> Option<NodeHandle> {
        self.head
    }

    /// The last node in the list.
    pub(crate) fn tail(&self) -> Option<NodeHandle> {
        self.head.map(|head| self.store[head.0].prev)
    }

    /// Pushes t onto the back of the list and returns a handle to the node.
    pub(crate) fn push_back(&mut self, t: T) -> NodeHandle {
        // use the first available location in the storage vec, or infer what
        // the next location will be on push.
        let idx = match self.free.pop() {
            Some(idx) => {
                trace!("reusing freelisted list slot {}", idx.0);
                idx
            }
            None => NodeHandle(self.store.len()),
        };

        let mut n = Node {
            value: Some(t),
            prev: idx,
            next: idx,
        };

        if let Some(head) = self.head {
            // link this node in between the tail and the head
            let tail = self.store[head.0].prev;
            n.prev = tail;
            n.next = head;

            self.store[tail.0].next = idx;
            self.store[head.0].prev = idx;
        } else {
            self.head = Some(idx);
        }

        if self.store.len() <= idx.0 {
            self.store.push(n);
        } else {
            self.store[idx.0] = n;
        }

        idx
    }

    /// Remove an arbitrary node from the list, returning its value. Handles
    /// which are already free give back None.
    pub(crate) fn remove(&mut self, node: NodeHandle) -> Option<T> {
        let value = self.store.get_mut(node.0)?.value.take()?;

        if self.len() == 1 {
            // just reset head and freelist the node
            self.head = None;
        } else {
            let prev = self.store[node.0].prev;
            let next = self.store[node.0].next;

            if self.head == Some(node) {
                self.head = Some(next);
            }

            // link prev to next and next to prev so node doesn't exist in the
            // chain anymore
            self.store[prev.0].next = next;
            self.store[next.0].prev = prev;
        }

        self.free.push(node);
        Some(value)
    }

    /// Clears this linked list. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
        self.head = None;
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head(),
            back: self.tail(),
            remaining: self.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front?;
        self.remaining -= 1;
        self.front = Some(self.list.store[node.0].next);
        self.list.get(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back?;
        self.remaining -= 1;
        self.back = Some(self.list.store[node.0].prev);
        self.list.get(node)
    }
}
