//! The work-list family behind the generation algorithms.
//!
//! Every variant is first-in-first-out among distinct retained items; they
//! differ only in what happens when the same string is enqueued twice.
//! String generation uses [`StringQueue`] implementations, derivation
//! tracking uses [`PathQueue`] implementations.

use std::cell::Cell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::engine::DerivationPath;

/// One slot of a string-generation queue.
///
/// `DepthMark` is the sentinel that delimits one breadth-first level from
/// the next; it is distinguishable from any string by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// An in-progress or finished string
    Text(String),
    /// Depth-separator marker
    DepthMark,
}

/// Queue surface used by the string-generation algorithm
pub trait StringQueue {
    /// Enqueue an item, subject to the variant's duplicate policy
    fn put(&mut self, item: Item);

    /// Remove and return the front item, if any
    fn take(&mut self) -> Option<Item>;

    /// Whether no items remain
    fn is_empty(&self) -> bool;
}

/// Queue with no duplicate handling: always append, pop front
#[derive(Debug, Default)]
pub struct PlainQueue {
    items: VecDeque<Item>,
}

impl PlainQueue {
    pub fn new() -> Self {
        PlainQueue::default()
    }
}

impl StringQueue for PlainQueue {
    fn put(&mut self, item: Item) {
        self.items.push_back(item);
    }

    fn take(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Membership structure backing a [`DedupQueue`].
///
/// `contains` takes `&mut self` because the counting variant tallies a
/// duplicate's multiplicity as a side effect of the presence test.
pub trait Membership {
    fn contains(&mut self, value: &str) -> bool;
    fn add(&mut self, value: &str);
    fn remove(&mut self, value: &str);
}

/// Plain membership set with no multiplicity bookkeeping
#[derive(Debug, Default)]
pub struct UniqueSet {
    values: HashSet<String>,
}

impl UniqueSet {
    pub fn new() -> Self {
        UniqueSet::default()
    }
}

impl Membership for UniqueSet {
    fn contains(&mut self, value: &str) -> bool {
        self.values.contains(value)
    }

    fn add(&mut self, value: &str) {
        self.values.insert(value.to_string());
    }

    fn remove(&mut self, value: &str) {
        self.values.remove(value);
    }
}

/// Multiplicity carried from the string most recently removed from a
/// [`CountingSet`] onto every string it derives.
///
/// The carry is scoped to one generation run: the dispatcher creates one
/// cell and hands clones to the queue's membership set and the output set,
/// so concurrent runs never share state.
#[derive(Debug, Clone)]
pub struct Carry(Rc<Cell<usize>>);

impl Carry {
    pub fn new() -> Self {
        Carry(Rc::new(Cell::new(1)))
    }

    fn get(&self) -> usize {
        self.0.get()
    }

    fn set(&self, count: usize) {
        self.0.set(count);
    }
}

impl Default for Carry {
    fn default() -> Self {
        Carry::new()
    }
}

/// Membership set that tracks how many independent derivations reached each
/// value, not just whether one exists.
///
/// `add` increases a value's count by the current carry (1 when absent);
/// `remove` pops the value's count into the carry; `insert` writes the carry
/// as the value's count directly and is only used for emitting finished
/// strings. A `contains` hit on a present value tallies the carry forward,
/// because a duplicate mid-generation means another path reached the same
/// still-nonterminal string.
#[derive(Debug)]
pub struct CountingSet {
    counts: HashMap<String, usize>,
    carry: Carry,
}

impl CountingSet {
    pub fn new(carry: Carry) -> Self {
        CountingSet {
            counts: HashMap::new(),
            carry,
        }
    }

    /// Record a finished string with the multiplicity of the string it was
    /// derived from
    pub fn insert(&mut self, value: String) {
        self.counts.insert(value, self.carry.get());
    }

    /// Consume the set, yielding the accumulated occurrence counts
    pub fn into_counts(self) -> HashMap<String, usize> {
        self.counts
    }
}

impl Membership for CountingSet {
    fn contains(&mut self, value: &str) -> bool {
        if self.counts.contains_key(value) {
            self.add(value);
            return true;
        }
        false
    }

    fn add(&mut self, value: &str) {
        *self.counts.entry(value.to_string()).or_insert(0) += self.carry.get();
    }

    fn remove(&mut self, value: &str) {
        if let Some(count) = self.counts.remove(value) {
            self.carry.set(count);
        }
    }
}

/// Queue that only enqueues a string if it is not already waiting.
///
/// A string removed by `take` leaves the membership set again, so it can be
/// re-derived later in the run. Depth markers bypass the membership set.
#[derive(Debug)]
pub struct DedupQueue<M: Membership> {
    items: VecDeque<Item>,
    members: M,
}

impl<M: Membership> DedupQueue<M> {
    pub fn new(members: M) -> Self {
        DedupQueue {
            items: VecDeque::new(),
            members,
        }
    }
}

impl<M: Membership> StringQueue for DedupQueue<M> {
    fn put(&mut self, item: Item) {
        match item {
            Item::DepthMark => self.items.push_back(Item::DepthMark),
            Item::Text(text) => {
                if !self.members.contains(&text) {
                    self.members.add(&text);
                    self.items.push_back(Item::Text(text));
                }
            }
        }
    }

    fn take(&mut self) -> Option<Item> {
        let item = self.items.pop_front()?;
        if let Item::Text(text) = &item {
            self.members.remove(text);
        }
        Some(item)
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Queue surface used by the derivation-tracking algorithm: items are
/// strings keyed to the derivation paths that reached them
pub trait PathQueue {
    /// Enqueue paths for a string, subject to the variant's merge policy
    fn put(&mut self, text: String, paths: Vec<DerivationPath>);

    /// Remove and return the front string with its accumulated paths
    fn take(&mut self) -> Option<(String, Vec<DerivationPath>)>;

    /// Whether no items remain
    fn is_empty(&self) -> bool;
}

/// Path queue that merges: paths for a recurring string accumulate
#[derive(Debug, Default)]
pub struct AdditiveQueue {
    order: VecDeque<String>,
    paths: HashMap<String, Vec<DerivationPath>>,
}

impl AdditiveQueue {
    pub fn new() -> Self {
        AdditiveQueue::default()
    }
}

impl PathQueue for AdditiveQueue {
    fn put(&mut self, text: String, paths: Vec<DerivationPath>) {
        if let Some(existing) = self.paths.get_mut(&text) {
            existing.extend(paths);
        } else {
            self.order.push_back(text.clone());
            self.paths.insert(text, paths);
        }
    }

    fn take(&mut self) -> Option<(String, Vec<DerivationPath>)> {
        let text = self.order.pop_front()?;
        let paths = self.paths.remove(&text).unwrap_or_default();
        Some((text, paths))
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Path queue that keeps the first arrival: paths for a recurring string
/// are discarded
#[derive(Debug, Default)]
pub struct ConservativeQueue {
    order: VecDeque<String>,
    paths: HashMap<String, Vec<DerivationPath>>,
}

impl ConservativeQueue {
    pub fn new() -> Self {
        ConservativeQueue::default()
    }
}

impl PathQueue for ConservativeQueue {
    fn put(&mut self, text: String, paths: Vec<DerivationPath>) {
        if !self.paths.contains_key(&text) {
            self.order.push_back(text.clone());
            self.paths.insert(text, paths);
        }
    }

    fn take(&mut self) -> Option<(String, Vec<DerivationPath>)> {
        let text = self.order.pop_front()?;
        let paths = self.paths.remove(&text).unwrap_or_default();
        Some((text, paths))
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
