#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can
// inspect chain structure through test-only helpers.

use crate::capacity::is_ladder_capacity;
use crate::chained_hash_map::{ChainedHashMap, Handle};
use crate::config::{DuplicatePolicy, TableConfig};
use crate::error::TableError;
use crate::hash::bucket_index;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Delete(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Rehash(usize),
    Iterate,
}

fn arb_scenario(key_re: &'static str) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec(key_re, 1..=40).prop_flat_map(move |pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                key_re.prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..2_000).prop_map(OpI::Rehash),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs `ops` against a std HashMap model and checks structural invariants
// after each step:
// - every entry sits in the chain `bucket_index(key, capacity)`;
// - `len` matches the model and the chain total;
// - capacity is a ladder value, and never shrinks except by `rehash`;
// - after inserting a new key, `len / capacity <= 0.80`.
fn run_state_machine(
    policy: DuplicatePolicy,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let config = TableConfig::new().capacity_hint(0).duplicates(policy);
    let mut sut: ChainedHashMap<i32> = ChainedHashMap::with_config(config).unwrap();
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        let cap_before = sut.capacity();
        let mut rehashed = false;
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k, v) {
                    Ok(ins) => {
                        match policy {
                            DuplicatePolicy::Reject => {
                                prop_assert!(!already, "insert must fail on duplicate");
                                prop_assert!(ins.displaced.is_none());
                            }
                            DuplicatePolicy::Replace => {
                                prop_assert_eq!(ins.displaced, model.get(k).copied());
                            }
                        }
                        if let Some(prev) = live.insert(k.clone(), ins.handle) {
                            prop_assert_eq!(prev, ins.handle, "replace keeps the entry");
                        }
                        model.insert(k.clone(), v);
                        if !already {
                            prop_assert!(sut.load_factor() <= 0.80);
                        }
                    }
                    Err(TableError::DuplicateKey { key }) => {
                        prop_assert_eq!(policy, DuplicatePolicy::Reject);
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(&key, k);
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {}", e),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let mut released = None;
                let removed = sut.delete(k, |v| released = Some(v));
                let expected = model.remove(k);
                prop_assert_eq!(removed, expected.is_some());
                prop_assert_eq!(released, expected);
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                if let Some(h) = sut.find(k) {
                    prop_assert_eq!(Some(&h), live.get(k), "handle must be stable");
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    let vr = h.value_mut(&mut sut);
                    prop_assert!(vr.is_some(), "live handle should resolve");
                    if let Some(vr) = vr {
                        *vr = vr.wrapping_add(d);
                    }
                    if let Some(mv) = model.get_mut(k) {
                        *mv = mv.wrapping_add(d);
                    }
                }
            }
            OpI::Rehash(hint) => {
                sut.rehash(hint).unwrap();
                rehashed = true;
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<String> = sut.iter().map(|(_, k, _)| k.to_string()).collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        prop_assert!(is_ladder_capacity(sut.capacity()));
        if !rehashed {
            prop_assert!(sut.capacity() >= cap_before, "capacity only grows on insert");
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());

        let mut total = 0;
        let cap = sut.capacity();
        let mut placement_ok = true;
        sut.for_each(|b, k, _| {
            total += 1;
            placement_ok &= b == bucket_index(k, cap);
        });
        prop_assert!(placement_ok, "entry found outside its bucket");
        prop_assert_eq!(total, model.len());
        let chained: usize = (0..cap).map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(chained, model.len(), "chain lengths must add up to len");

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        for (k, &h) in &live {
            prop_assert_eq!(h.key(&sut), Some(k.as_str()));
        }
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap
// under both duplicate policies.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_reject((pool, ops) in arb_scenario("[a-z]{0,6}")) {
        run_state_machine(DuplicatePolicy::Reject, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_replace((pool, ops) in arb_scenario("[a-z]{0,6}")) {
        run_state_machine(DuplicatePolicy::Replace, pool, ops)?;
    }
}

// Property: same invariants with keys that share a 32-byte prefix, so every
// key lands in one chain and lookups depend on key comparison alone.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(
        (pool, ops) in arb_scenario("a{32}[a-c]{0,3}")
    ) {
        run_state_machine(DuplicatePolicy::Reject, pool, ops)?;
    }
}

proptest! {
    // Property: a rehash to any ladder capacity preserves every key/value.
    #[test]
    fn prop_rehash_preserves_membership(
        keys in proptest::collection::hash_set("[a-zA-Z0-9]{1,12}", 0..300),
        hint in 0usize..20_000,
    ) {
        let mut m = ChainedHashMap::new();
        for (i, k) in keys.iter().enumerate() {
            m.insert(k, i).unwrap();
        }
        let before: HashMap<String, usize> =
            m.iter().map(|(_, k, v)| (k.to_string(), *v)).collect();
        m.rehash(hint).unwrap();
        prop_assert_eq!(m.len(), before.len());
        for (k, v) in &before {
            prop_assert_eq!(m.get(k), Some(v));
        }
    }
}
