#![cfg(test)]

// Property tests for TreeMap kept inside the crate so the structural
// invariant checker can reach node colors and links directly.

use crate::error::Error;
use crate::policy::ReverseOrder;
use crate::tree_map::TreeMap;
use crate::Cursor;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Pool-indexed operations, same shrinking scheme as the hash suite.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(usize),
    ContainsValue(i32),
    Mutate(usize, i32),
    Bounds,
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
            Just(Op::Bounds),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::BTreeMap,
// with the red-black structural rules re-checked after every single op.
// Invariants exercised across random operation sequences:
// - `insert` returns exactly the model's previous value.
// - `get`/`get_mut`/`contains_key`/`contains_value` parity with the model.
// - Keyed `remove` returns the model's value or `NotFound`, nothing else.
// - `first_key`/`last_key` match the model's bounds, `NotFound` when empty.
// - `iter` equals the model's ascending sequence, order included.
// - Black root, no red-red edge, uniform black height, consistent parent
//   links, and full reachability after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: TreeMap<i32, i32> = TreeMap::new();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();

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
                Op::Bounds => {
                    prop_assert_eq!(sut.first_key().ok(), model.keys().next());
                    prop_assert_eq!(sut.last_key().ok(), model.keys().next_back());
                }
                Op::Iterate => {
                    let got: Vec<(i32, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                    let expect: Vec<(i32, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(got, expect);
                }
            }

            // Post-conditions after each op
            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}

// Property: A cursor yields the full ascending sequence exactly once even
// while deleting a predicate's worth of entries mid-walk; afterwards the
// tree still satisfies every structural rule and holds exactly the
// complement.
proptest! {
    #[test]
    fn prop_cursor_removal_keeps_order(
        keys in proptest::collection::btree_set(-100..100i32, 0..32),
        modulus in 2..5i32,
    ) {
        let mut sut: TreeMap<i32, i32> = TreeMap::new();
        for &k in &keys {
            sut.insert(k, k);
        }

        let mut yielded = Vec::new();
        let mut cursor = sut.cursor_mut();
        while cursor.has_next() {
            let (&k, _) = cursor.next().unwrap();
            yielded.push(k);
            if k.rem_euclid(modulus) == 0 {
                prop_assert_eq!(cursor.remove().unwrap().0, k);
            }
        }
        prop_assert_eq!(cursor.next().unwrap_err(), Error::NotFound);
        drop(cursor);

        sut.assert_invariants();
        let expect_yield: Vec<i32> = keys.iter().copied().collect();
        prop_assert_eq!(yielded, expect_yield);
        let remaining: Vec<i32> = sut.iter().map(|(k, _)| *k).collect();
        let expect_remain: Vec<i32> = keys
            .iter()
            .copied()
            .filter(|k| k.rem_euclid(modulus) != 0)
            .collect();
        prop_assert_eq!(remaining, expect_remain);
    }
}

// Property: Ordering belongs entirely to the policy. Under ReverseOrder
// the same keys iterate descending, the invariants hold relative to the
// policy, and `first_key` is the numeric maximum.
proptest! {
    #[test]
    fn prop_reverse_comparator_iterates_descending(
        keys in proptest::collection::btree_set(-100..100i32, 0..32),
    ) {
        let mut sut = TreeMap::with_comparator(ReverseOrder);
        for &k in &keys {
            sut.insert(k, ());
            sut.assert_invariants();
        }
        let got: Vec<i32> = sut.iter().map(|(k, _)| *k).collect();
        let expect: Vec<i32> = keys.iter().rev().copied().collect();
        prop_assert_eq!(got, expect);
        prop_assert_eq!(sut.first_key().ok(), keys.iter().next_back());
    }
}
