//! chained-hashmap: a separate-chaining hash table keyed by strings.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable associative container for string keys and
//!   arbitrary values, with growth driven by a fixed ladder of prime
//!   bucket counts.
//! - Layers:
//!   - `hash`: 33-multiplier rolling hash over the first 32 key bytes,
//!     reduced modulo the bucket count.
//!   - `capacity`: the ladder of allowed bucket counts (13 up to
//!     134217689) and the lookups that pick a rung.
//!   - `ChainedHashMap<V>`: bucket heads over a generational arena of
//!     entries; chains are singly linked through arena keys.
//!   - `text` / `quad`: line reading, key cleanup and the sample dataset
//!     loader used by the command-line driver.
//!
//! Constraints
//! - Single-threaded; callers sharing a table across threads must wrap
//!   the whole table in one lock, since growth touches every bucket.
//! - Keys are copied on insert and unique: duplicates are rejected or
//!   replace the stored value, per `DuplicatePolicy`.
//! - After every successful insert `len / capacity <= max_load_factor`,
//!   unless the ladder is exhausted.
//! - Capacity is always a ladder value and only grows on insert; an
//!   explicit `rehash` may shrink it.
//!
//! Hashing and rehashing invariants
//! - Each entry stores its full 32-bit hash. A rehash reduces the stored
//!   hash against the new bucket count and relinks the entry; no key bytes
//!   are read and no entry is reallocated, so `Handle`s stay valid.
//! - Every allocation an insert needs (key copy, grown bucket array) is
//!   made before the table changes. An allocation error leaves the table
//!   exactly as it was.
//!
//! Notes and non-goals
//! - No persistence and no seeded or collision-resistant hashing.
//! - Values are owned by the table. `delete` and `destroy` take a closure
//!   that receives each released value; anything else is dropped normally.

pub mod capacity;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod error;
pub mod hash;
pub mod quad;
pub mod text;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Handle, Inserted, Iter, IterMut};
pub use config::{DuplicatePolicy, TableConfig};
pub use error::{Result, TableError};
