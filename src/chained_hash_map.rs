//! ChainedHashMap: separate-chaining table with stable handles.
//!
//! Entries live in a generational arena; each bucket holds the arena key of
//! its chain head and each entry links to the next one in its chain. Rehash
//! only relinks entries, so handles survive growth.

use crate::capacity::{growth_capacity, next_capacity, select_capacity, Growth, MIN_CAPACITY};
use crate::config::{DuplicatePolicy, TableConfig};
use crate::error::{Result, TableError};
use crate::hash::{hash_key, reduce};
use core::fmt;
use log::{debug, trace, warn};
use slotmap::{DefaultKey, SlotMap};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, V>(&self, map: &'a ChainedHashMap<V>) -> Option<&'a str> {
        map.handle_key(*self)
    }

    pub fn value<'a, V>(&self, map: &'a ChainedHashMap<V>) -> Option<&'a V> {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, V>(&self, map: &'a mut ChainedHashMap<V>) -> Option<&'a mut V> {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Node<V> {
    key: Box<str>,
    value: V,
    hash: u32,
    next: Option<DefaultKey>,
}

/// Outcome of a successful [`ChainedHashMap::insert`].
#[derive(Debug)]
pub struct Inserted<V> {
    /// Handle to the entry now holding the key.
    pub handle: Handle,
    /// Previous value, when [`DuplicatePolicy::Replace`] overwrote one.
    pub displaced: Option<V>,
}

pub struct ChainedHashMap<V> {
    config: TableConfig,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    nodes: SlotMap<DefaultKey, Node<V>>,
    growth_exhausted: bool,
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Option<DefaultKey>>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::allocation::<Option<DefaultKey>>(capacity))?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

fn copy_key(key: &str) -> Result<Box<str>> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|_| TableError::allocation::<u8>(key.len()))?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

impl<V> ChainedHashMap<V> {
    /// Empty table with the default configuration (13 buckets).
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            buckets: vec![None; MIN_CAPACITY],
            nodes: SlotMap::with_key(),
            growth_exhausted: false,
        }
    }

    /// Empty table whose bucket count is the first ladder value `>= hint`.
    pub fn with_capacity_hint(hint: usize) -> Result<Self> {
        Self::with_config(TableConfig::new().capacity_hint(hint))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let capacity = select_capacity(config.capacity_hint)?;
        let buckets = alloc_buckets(capacity)?;
        trace!(
            "created table: hint {} -> {} buckets, duplicates {:?}",
            config.capacity_hint,
            capacity,
            config.duplicates
        );
        Ok(Self {
            config,
            buckets,
            nodes: SlotMap::with_key(),
            growth_exhausted: false,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of buckets; always a ladder value.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    fn find_raw(&self, key: &str, hash: u32) -> Option<DefaultKey> {
        let mut cur = self.buckets[reduce(hash, self.capacity())];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash && &*node.key == key {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        self.find_raw(key, hash_key(key)).map(Handle::new)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_raw(key, hash_key(key)).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let k = self.find_raw(key, hash_key(key))?;
        self.nodes.get(k).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find_raw(key, hash_key(key))?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    /// Inserts `value` under a private copy of `key`.
    ///
    /// An existing key is handled according to the configured
    /// [`DuplicatePolicy`]. When the new entry pushes the load factor past
    /// the configured maximum, the table grows to the next ladder capacity
    /// that restores the bound before returning. Every allocation happens
    /// before the table is touched, so an error leaves it unchanged.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Inserted<V>> {
        let hash = hash_key(key);
        if let Some(k) = self.find_raw(key, hash) {
            return match self.config.duplicates {
                DuplicatePolicy::Reject => Err(TableError::DuplicateKey {
                    key: key.to_owned(),
                }),
                DuplicatePolicy::Replace => {
                    let old = core::mem::replace(&mut self.nodes[k].value, value);
                    Ok(Inserted {
                        handle: Handle::new(k),
                        displaced: Some(old),
                    })
                }
            };
        }

        let key = copy_key(key)?;
        let grown = match self.growth_target(self.len() + 1) {
            Some(capacity) => Some(alloc_buckets(capacity)?),
            None => None,
        };

        let bucket = reduce(hash, self.capacity());
        let next = self.buckets[bucket];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.buckets[bucket] = Some(k);

        if let Some(buckets) = grown {
            self.migrate(buckets);
        }
        Ok(Inserted {
            handle: Handle::new(k),
            displaced: None,
        })
    }

    fn growth_target(&mut self, len: usize) -> Option<usize> {
        let growth = growth_capacity(len, self.capacity(), self.config.max_load_factor);
        self.resolve_growth(growth)
    }

    // Latches the exhaustion warning so it is logged once until a rehash
    // moves the table below the top rung.
    fn resolve_growth(&mut self, growth: Growth) -> Option<usize> {
        match growth {
            Growth::Within => None,
            Growth::Grow(capacity) => Some(capacity),
            Growth::Exhausted => {
                if !self.growth_exhausted {
                    self.growth_exhausted = true;
                    warn!(
                        "capacity ladder exhausted at {} buckets; load factor will exceed {}",
                        self.capacity(),
                        self.config.max_load_factor
                    );
                }
                None
            }
        }
    }

    /// Moves every entry into `buckets`, relinking in place.
    fn migrate(&mut self, buckets: Vec<Option<DefaultKey>>) {
        let old = core::mem::replace(&mut self.buckets, buckets);
        let old_capacity = old.len();
        let capacity = self.buckets.len();
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let b = reduce(node.hash, capacity);
                node.next = self.buckets[b];
                self.buckets[b] = Some(k);
            }
        }
        if next_capacity(capacity).is_some() {
            self.growth_exhausted = false;
        }
        debug!(
            "rehashed {} entries: {} -> {} buckets",
            self.len(),
            old_capacity,
            capacity
        );
    }

    /// Rebuilds the table with the first ladder capacity `>= hint`.
    ///
    /// May shrink. Inserts that follow still grow the table as needed.
    pub fn rehash(&mut self, hint: usize) -> Result<()> {
        let capacity = select_capacity(hint)?;
        if capacity == self.capacity() {
            return Ok(());
        }
        let buckets = alloc_buckets(capacity)?;
        self.migrate(buckets);
        Ok(())
    }

    // Unlinks the first entry in `bucket` matching `pred` and returns its key.
    fn unlink<F>(&mut self, bucket: usize, pred: F) -> Option<DefaultKey>
    where
        F: Fn(DefaultKey, &Node<V>) -> bool,
    {
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if pred(k, node) {
                let next = node.next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.nodes[p].next = next,
                }
                return Some(k);
            }
            prev = Some(k);
            cur = node.next;
        }
        None
    }

    /// Removes `key` and returns its value; `None` if absent.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let hash = hash_key(key);
        let bucket = reduce(hash, self.capacity());
        let k = self.unlink(bucket, |_, n| n.hash == hash && &*n.key == key)?;
        self.nodes.remove(k).map(|n| n.value)
    }

    /// Removes `key`, passing its value to `destructor`. Absent keys are a
    /// no-op. Returns whether an entry was removed.
    pub fn delete<F>(&mut self, key: &str, destructor: F) -> bool
    where
        F: FnOnce(V),
    {
        match self.remove(key) {
            Some(v) => {
                destructor(v);
                true
            }
            None => false,
        }
    }

    /// Removes the entry behind `handle`, returning its key and value.
    pub fn remove_entry(&mut self, handle: Handle) -> Option<(String, V)> {
        let h = handle.raw_handle();
        let bucket = reduce(self.nodes.get(h)?.hash, self.capacity());
        let k = self.unlink(bucket, |k, _| k == h)?;
        self.nodes.remove(k).map(|n| (n.key.into_string(), n.value))
    }

    /// Drops every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.nodes.clear();
    }

    /// Tears the table down, handing each value to `destructor` in
    /// bucket order.
    pub fn destroy<F>(mut self, mut destructor: F)
    where
        F: FnMut(V),
    {
        let buckets = core::mem::take(&mut self.buckets);
        for head in buckets {
            let mut cur = head;
            while let Some(k) = cur {
                let Some(node) = self.nodes.remove(k) else {
                    break;
                };
                cur = node.next;
                destructor(node.value);
            }
        }
    }

    /// Visits every entry in bucket-index order, then chain order. The
    /// visitor receives the bucket index, key and value.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &str, &V),
    {
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            while let Some(node) = cur.and_then(|k| self.nodes.get(k)) {
                visitor(bucket, &*node.key, &node.value);
                cur = node.next;
            }
        }
    }

    /// Entries in bucket-index order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: &self.buckets,
            nodes: &self.nodes,
            bucket: 0,
            cur: None,
            remaining: self.nodes.len(),
        }
    }

    /// Mutable access to every value, in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.nodes.values_mut().map(|n| &mut n.value)
    }

    /// Mutable access to every entry, in no particular order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&str> {
        self.nodes.get(h.raw_handle()).map(|n| &*n.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.nodes.get(h.raw_handle()).map(|n| &n.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.nodes.get_mut(h.raw_handle()).map(|n| &mut n.value)
    }

    #[cfg(test)]
    pub(crate) fn chain_len(&self, bucket: usize) -> usize {
        let mut n = 0;
        let mut cur = self.buckets[bucket];
        while let Some(node) = cur.and_then(|k| self.nodes.get(k)) {
            n += 1;
            cur = node.next;
        }
        n
    }
}

impl<V> Default for ChainedHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for ChainedHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k, v)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a ChainedHashMap<V> {
    type Item = (Handle, &'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over entries of a `ChainedHashMap` in bucket order.
pub struct Iter<'a, V> {
    buckets: &'a [Option<DefaultKey>],
    nodes: &'a SlotMap<DefaultKey, Node<V>>,
    bucket: usize,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Handle, &'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let node = self.nodes.get(k)?;
                self.cur = node.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((Handle::new(k), &*node.key, &node.value));
            }
            self.cur = *self.buckets.get(self.bucket)?;
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Iterator over mutable entries of a `ChainedHashMap`.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Node<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (Handle, &'a str, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, n)| (Handle::new(k), &*n.key, &mut n.value))
    }
}
