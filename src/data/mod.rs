//! Ordered containers.
//!
//! A [`Sequence`] is a doubly-linked list whose nodes live in an arena:
//! a `Vec` of slots, where links between nodes are slot indices.
//!
//! -   Index 0 is always reserved for the nil position. It is never occupied,
//!     so a link of 0 means "no neighbor", and any lookup that finds nothing
//!     answers with [`Position::NIL`].
//! -   Removed nodes leave their slot on a free list, and the slot's generation is bumped.
//!     A [`Position`] records the generation it was issued for, so a position to a removed
//!     element is recognized as stale instead of silently reaching whatever reuses the slot.
//! -   Every sequence gets its own owner id; positions from another sequence are rejected.
//!
//! Inserting or removing never moves other nodes, so all other positions stay valid.

mod position;

use std::sync::atomic::{AtomicU32, Ordering};

pub use position::Position;

/// Source of sequence owner ids. 0 is the owner of the nil position.
static NEXT_OWNER: AtomicU32 = AtomicU32::new(1);

/// Why a [`Sequence`] rejected a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("the nil position does not refer to an element")]
    NilPosition,
    #[error("position {0} belongs to another sequence")]
    ForeignPosition(Position),
    #[error("position {0} refers to an element that was removed")]
    StalePosition(Position),
}

struct Node<T> {
    value: T,
    prev: u32,
    next: u32,
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

impl<T> Slot<T> {
    const fn vacant() -> Self {
        Slot {
            generation: 0,
            node: None,
        }
    }
}

/// An ordered sequence of owned elements with stable positions.
pub struct Sequence<T> {
    owner: u32,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    first: u32,
    last: u32,
    len: usize,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Sequence {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            slots: vec![Slot::vacant()],
            free: Vec::new(),
            first: 0,
            last: 0,
            len: 0,
        }
    }

    /// Release every element.
    ///
    /// All positions previously issued by this sequence become stale.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate().skip(1) {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(idx as u32);
            }
        }
        self.first = 0;
        self.last = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first element, or nil if empty.
    pub fn begin(&self) -> Position {
        self.position(self.first)
    }

    /// Position of the last element, or nil if empty.
    pub fn end(&self) -> Position {
        self.position(self.last)
    }

    /// Position of the element at `index`, or nil if out of range.
    ///
    /// Walks from whichever end is closer; the midpoint walks forward.
    pub fn entry(&self, index: usize) -> Position {
        if index >= self.len {
            return Position::NIL;
        }
        let mut slot;
        if index <= self.len / 2 {
            slot = self.first;
            for _ in 0..index {
                slot = self.node(slot).map_or(0, |n| n.next);
            }
        } else {
            slot = self.last;
            for _ in index + 1..self.len {
                slot = self.node(slot).map_or(0, |n| n.prev);
            }
        }
        self.position(slot)
    }

    /// Insert `value` immediately after `after`; the nil position inserts at the front.
    ///
    /// Returns the position of the new element.
    pub fn insert_after(&mut self, after: Position, value: T) -> Result<Position, SequenceError> {
        let prev = if after.is_nil() {
            0
        } else {
            self.resolve(after)?
        };
        let next = if prev == 0 {
            self.first
        } else {
            self.node(prev).map_or(0, |n| n.next)
        };

        let slot = self.allocate(Node { value, prev, next });
        match self.node_mut(prev) {
            Some(n) => n.next = slot,
            None => self.first = slot,
        }
        match self.node_mut(next) {
            Some(n) => n.prev = slot,
            None => self.last = slot,
        }
        self.len += 1;
        Ok(self.position(slot))
    }

    /// Append `value` after the last element.
    pub fn push_back(&mut self, value: T) -> Position {
        let slot = self.allocate(Node {
            value,
            prev: self.last,
            next: 0,
        });
        match self.node_mut(self.last) {
            Some(n) => n.next = slot,
            None => self.first = slot,
        }
        self.last = slot;
        self.len += 1;
        self.position(slot)
    }

    /// Insert `value` before the first element.
    pub fn push_front(&mut self, value: T) -> Position {
        let slot = self.allocate(Node {
            value,
            prev: 0,
            next: self.first,
        });
        match self.node_mut(self.first) {
            Some(n) => n.prev = slot,
            None => self.last = slot,
        }
        self.first = slot;
        self.len += 1;
        self.position(slot)
    }

    /// Unlink the element at `at` and hand back its value.
    ///
    /// Only `at` is invalidated.
    pub fn remove(&mut self, at: Position) -> Result<T, SequenceError> {
        let slot = self.resolve(at)?;
        let entry = &mut self.slots[slot as usize];
        let node = entry.node.take().ok_or(SequenceError::StalePosition(at))?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);

        match self.node_mut(node.prev) {
            Some(n) => n.next = node.next,
            None => self.first = node.next,
        }
        match self.node_mut(node.next) {
            Some(n) => n.prev = node.prev,
            None => self.last = node.prev,
        }
        self.len -= 1;
        Ok(node.value)
    }

    /// The element at `at`, if `at` refers to a live element of this sequence.
    pub fn current(&self, at: Position) -> Option<&T> {
        let slot = self.resolve(at).ok()?;
        self.node(slot).map(|n| &n.value)
    }

    pub fn current_mut(&mut self, at: Position) -> Option<&mut T> {
        let slot = self.resolve(at).ok()?;
        self.node_mut(slot).map(|n| &mut n.value)
    }

    /// Step `at` to the next element; stepping off the end yields nil.
    ///
    /// Returns false, leaving `at` untouched, if `at` was not a live position.
    pub fn advance(&self, at: &mut Position) -> bool {
        self.step(at, |n| n.next)
    }

    /// Step `at` to the previous element; stepping off the front yields nil.
    ///
    /// Returns false, leaving `at` untouched, if `at` was not a live position.
    pub fn retreat(&self, at: &mut Position) -> bool {
        self.step(at, |n| n.prev)
    }

    /// Whether `at` has no predecessor. Invalid positions are vacuously first.
    pub fn is_first(&self, at: Position) -> bool {
        match self.resolve(at) {
            Ok(slot) => self.node(slot).map_or(true, |n| n.prev == 0),
            Err(_) => true,
        }
    }

    /// Whether `at` has no successor. Invalid positions are vacuously last.
    pub fn is_last(&self, at: Position) -> bool {
        match self.resolve(at) {
            Ok(slot) => self.node(slot).map_or(true, |n| n.next == 0),
            Err(_) => true,
        }
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            sequence: self,
            front: self.first,
            back: self.last,
            remaining: self.len,
        }
    }

    /// Check that `at` is a live position of this sequence, and get its slot.
    fn resolve(&self, at: Position) -> Result<u32, SequenceError> {
        if at.is_nil() {
            return Err(SequenceError::NilPosition);
        }
        if at.owner != self.owner {
            return Err(SequenceError::ForeignPosition(at));
        }
        match self.slots.get(at.slot as usize) {
            Some(slot) if slot.generation == at.generation && slot.node.is_some() => Ok(at.slot),
            _ => Err(SequenceError::StalePosition(at)),
        }
    }

    fn position(&self, slot: u32) -> Position {
        match self.slots.get(slot as usize) {
            Some(s) if slot != 0 => Position {
                owner: self.owner,
                slot,
                generation: s.generation,
            },
            _ => Position::NIL,
        }
    }

    fn step(&self, at: &mut Position, link: impl Fn(&Node<T>) -> u32) -> bool {
        let Ok(slot) = self.resolve(*at) else {
            return false;
        };
        let target = self.node(slot).map_or(0, link);
        *at = self.position(target);
        true
    }

    fn node(&self, slot: u32) -> Option<&Node<T>> {
        if slot == 0 {
            return None;
        }
        self.slots.get(slot as usize)?.node.as_ref()
    }

    fn node_mut(&mut self, slot: u32) -> Option<&mut Node<T>> {
        if slot == 0 {
            return None;
        }
        self.slots.get_mut(slot as usize)?.node.as_mut()
    }

    fn allocate(&mut self, node: Node<T>) -> u32 {
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize].node = Some(node);
            return slot;
        }
        assert!(
            self.slots.len() < u32::MAX as usize,
            "sequence capacity overflow"
        );
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        slot
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Sequence::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`Sequence`].
pub struct Iter<'a, T> {
    sequence: &'a Sequence<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.front)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.back)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
