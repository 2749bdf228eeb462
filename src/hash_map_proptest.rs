#![cfg(test)]

// Property tests for HashMap kept inside the crate so they can reach
// internal geometry (capacity, threshold) without feature gates.

use crate::error::Error;
use crate::hash_map::{HashMap, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::policy::HashFn;
use crate::Cursor;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, BTreeSet};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(usize),
    ContainsValue(i32),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i32>, Vec<Op>)> {
    proptest::collection::vec(-64..64i32, 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::Get),
            idx.clone().prop_map(Op::Contains),
            any::<i32>().prop_map(Op::ContainsValue),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<H>(mut sut: HashMap<i32, i32, H>, pool: &[i32], ops: Vec<Op>) -> Result<(), TestCaseError>
where
    H: crate::Hasher<i32>,
{
    let mut model: BTreeMap<i32, i32> = BTreeMap::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i];
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = pool[i];
                match model.remove(&k) {
                    Some(mv) => prop_assert_eq!(sut.remove(&k), Ok(mv)),
                    None => prop_assert_eq!(sut.remove(&k), Err(Error::NotFound)),
                }
            }
            Op::Get(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.get(&k).ok(), model.get(&k));
            }
            Op::Contains(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|x| *x == v));
            }
            Op::Mutate(i, d) => {
                let k = pool[i];
                let got = sut.get_mut(&k);
                match model.get_mut(&k) {
                    Some(mv) => {
                        let sv = got.expect("present in model");
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    None => prop_assert_eq!(got, Err(Error::NotFound)),
                }
            }
            Op::Iterate => {
                let got: BTreeMap<i32, i32> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(&got, &model);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= last_capacity, "capacity never shrinks");
        last_capacity = sut.capacity();
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::BTreeMap.
// Invariants exercised across random operation sequences:
// - `insert` returns exactly the model's previous value.
// - `get`/`get_mut`/`contains_key`/`contains_value` parity with the model.
// - Keyed `remove` returns the model's value or `NotFound`, nothing else.
// - `iter` yields each live entry exactly once; the full key→value map
//   equals the model.
// - `len`/`is_empty` parity and monotone capacity after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(HashMap::new(), &pool, ops)?;
    }
}

// Property: Same state-machine invariants under worst-case collisions: a
// constant policy lines every entry up in a single chain, so every lookup
// and removal exercises equality probing along it.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: HashMap<i32, i32, HashFn<fn(&i32) -> i64>> =
            HashMap::with_hasher(HashFn(|_| 0));
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: Capacity follows the growth law exactly. An identity policy
// makes the engine's geometry deterministic, so a step-by-step simulation
// of "grow to 2c + 1 when the incoming entry would pass the threshold"
// must match the real capacity after every single insert.
proptest! {
    #[test]
    fn prop_capacity_follows_growth_law(n in 0usize..400) {
        let mut sut = HashMap::with_hasher(HashFn(|k: &i32| *k as i64));
        let mut capacity = DEFAULT_CAPACITY;
        let mut threshold = (capacity as f64 * DEFAULT_LOAD_FACTOR) as usize;
        for k in 0..n as i32 {
            if (k as usize) + 1 > threshold {
                capacity = capacity * 2 + 1;
                threshold = (capacity as f64 * DEFAULT_LOAD_FACTOR) as usize;
            }
            sut.insert(k, k);
            prop_assert_eq!(sut.capacity(), capacity);
        }
        // no entry is lost across however many rehashes happened
        for k in 0..n as i32 {
            prop_assert_eq!(sut.get(&k), Ok(&k));
        }
    }
}

// Property: A cursor yields every entry exactly once, and removing a
// predicate's worth of entries mid-walk deletes exactly those, leaving the
// rest linked and reachable.
proptest! {
    #[test]
    fn prop_cursor_removal_partitions(keys in proptest::collection::btree_set(-100..100i32, 0..32)) {
        let mut sut: HashMap<i32, i32> = HashMap::new();
        for &k in &keys {
            sut.insert(k, k);
        }

        let mut yielded = BTreeSet::new();
        let mut removed = 0usize;
        let mut cursor = sut.cursor_mut();
        while cursor.has_next() {
            let (&k, _) = cursor.next().unwrap();
            prop_assert!(yielded.insert(k), "an entry was yielded twice");
            if k.rem_euclid(2) != 0 {
                let (rk, rv) = cursor.remove().unwrap();
                prop_assert_eq!(rk, k);
                prop_assert_eq!(rv, k);
                removed += 1;
            }
        }
        prop_assert_eq!(cursor.next().unwrap_err(), Error::NotFound);
        drop(cursor);

        prop_assert_eq!(&yielded, &keys);
        prop_assert_eq!(sut.len(), keys.len() - removed);
        for &k in &keys {
            prop_assert_eq!(sut.contains_key(&k), k.rem_euclid(2) == 0);
        }
    }
}
