// HashSet and TreeSet behavior suite (consolidated).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Composition: every set is its map with () values, so the map's
//   growth, ordering, and traversal rules apply unchanged.
// - Reporting: insert answers "was it new?", remove answers "was it
//   present?"; neither fails.
// - Identity: an element already present is left in place by a repeat
//   insert.
// - Cursors: yield elements only, remove to the owned element, same
//   protocol errors as the maps.
use mapset::{Cursor, Error, HashFn, HashSet, TreeSet};
use std::collections::BTreeSet;

// Test: insert/remove reporting on the hash set.
// Assumes: map insert returns None exactly for new keys.
// Verifies: bool answers track presence exactly; len follows.
#[test]
fn hash_set_reports_membership_changes() {
    let mut s = HashSet::new();
    assert!(s.insert("a"));
    assert!(s.insert("b"));
    assert!(!s.insert("a"));
    assert_eq!(s.len(), 2);
    assert!(s.contains(&"a"));
    assert!(s.remove(&"a"));
    assert!(!s.remove(&"a"));
    assert_eq!(s.len(), 1);
    assert!(!s.contains(&"a"));
}

// Test: the backing map's geometry shows through.
// Assumes: () values change nothing about growth.
// Verifies: with_capacity is honored and the capacity ladder is the
// map's; 100 elements cross to 191 buckets.
#[test]
fn hash_set_inherits_map_growth() {
    let s: HashSet<i32> = HashSet::with_capacity(5);
    assert_eq!(s.capacity(), 5);
    let mut s2 = HashSet::new();
    for k in 1..=100 {
        s2.insert(k);
    }
    assert_eq!(s2.capacity(), 191);
    assert_eq!(s2.len(), 100);
    for k in 1..=100 {
        assert!(s2.contains(&k));
    }
}

// Test: a supplied policy drives placement.
// Assumes: HashFn passes codes through.
// Verifies: a constant policy still yields correct membership with every
// element in one chain.
#[test]
fn hash_set_with_constant_policy() {
    let mut s = HashSet::with_hasher(HashFn(|_: &i32| 0));
    for k in 0..25 {
        assert!(s.insert(k));
    }
    assert_eq!(s.len(), 25);
    for k in 0..25 {
        assert!(s.contains(&k));
    }
    for k in (0..25).step_by(2) {
        assert!(s.remove(&k));
    }
    for k in 0..25 {
        assert_eq!(s.contains(&k), k % 2 == 1);
    }
}

// Test: hash set iteration completeness.
// Assumes: nothing about order.
// Verifies: exactly the live element set is yielded, each once.
#[test]
fn hash_set_iterates_each_element_once() {
    let mut s = HashSet::new();
    for k in 0..40 {
        s.insert(k);
    }
    for k in (0..40).step_by(5) {
        s.remove(&k);
    }
    let mut seen = BTreeSet::new();
    for &k in s.iter() {
        assert!(seen.insert(k), "element {k} yielded twice");
    }
    let expected: BTreeSet<i32> = (0..40).filter(|k| k % 5 != 0).collect();
    assert_eq!(seen, expected);
}

// Test: hash set cursor protocol and filtering.
// Assumes: the map cursor's order and errors carry over.
// Verifies: protocol errors match the maps'; removal filters in place and
// hands back the owned element.
#[test]
fn hash_set_cursor_filters() {
    let mut s: HashSet<i32> = (0..20).collect();
    let mut c = s.cursor_mut();
    assert_eq!(c.remove().unwrap_err(), Error::InvalidCursor);
    let mut removed = 0;
    while c.has_next() {
        let &k = c.next().unwrap();
        if k >= 10 {
            assert_eq!(c.remove(), Ok(k));
            assert_eq!(c.remove().unwrap_err(), Error::InvalidCursor);
            removed += 1;
        }
    }
    assert_eq!(c.next().unwrap_err(), Error::NotFound);
    drop(c);
    assert_eq!(removed, 10);
    assert_eq!(s.len(), 10);
    for k in 0..20 {
        assert_eq!(s.contains(&k), k < 10);
    }
}

// Test: insert/remove reporting on the tree set.
// Assumes: map insert returns None exactly for new keys.
// Verifies: bool answers track presence; the repeat insert leaves the
// original element in place.
#[test]
fn tree_set_reports_membership_changes() {
    let mut s = TreeSet::new();
    assert!(s.insert(5));
    assert!(s.insert(3));
    assert!(!s.insert(5));
    assert_eq!(s.len(), 2);
    assert!(s.remove(&5));
    assert!(!s.remove(&5));
    assert_eq!(s.len(), 1);
}

// Test: sorted iteration and bounds.
// Assumes: natural order.
// Verifies: elements iterate ascending; first/last agree with the ends
// and report NotFound on empty.
#[test]
fn tree_set_sorted_with_bounds() {
    let mut s = TreeSet::new();
    for k in [9, 1, 5, 3, 7] {
        s.insert(k);
    }
    let elements: Vec<i32> = s.iter().copied().collect();
    assert_eq!(elements, vec![1, 3, 5, 7, 9]);
    assert_eq!(s.first(), Ok(&1));
    assert_eq!(s.last(), Ok(&9));
    s.clear();
    assert_eq!(s.first(), Err(Error::NotFound));
    assert_eq!(s.last(), Err(Error::NotFound));
}

// Test: the documented removal scenario through the set face.
// Assumes: the set delegates to the tree map unchanged.
// Verifies: [50, 30, 70, 20, 40, 60, 80] minus 30 iterates as
// [20, 40, 50, 60, 70, 80].
#[test]
fn tree_set_scenario_remove_30() {
    let mut s = TreeSet::new();
    for k in [50, 30, 70, 20, 40, 60, 80] {
        s.insert(k);
    }
    assert!(s.remove(&30));
    let elements: Vec<i32> = s.iter().copied().collect();
    assert_eq!(elements, vec![20, 40, 50, 60, 70, 80]);
}

// Test: tree set cursor keeps ascending order across removals.
// Assumes: the map cursor's successor walk carries over.
// Verifies: yields stay ascending and complete while removing, and the
// remaining set is the complement.
#[test]
fn tree_set_cursor_removes_in_order() {
    let mut s: TreeSet<i32> = (1..=12).collect();
    let mut yielded = Vec::new();
    let mut c = s.cursor_mut();
    while c.has_next() {
        let &k = c.next().unwrap();
        yielded.push(k);
        if k % 3 == 0 {
            assert_eq!(c.remove(), Ok(k));
        }
    }
    drop(c);
    assert_eq!(yielded, (1..=12).collect::<Vec<_>>());
    let rest: Vec<i32> = s.iter().copied().collect();
    assert_eq!(rest, vec![1, 2, 4, 5, 7, 8, 10, 11]);
}

// Test: clone independence for both sets.
// Assumes: deep copy re-inserts every element.
// Verifies: mutating the clone never reaches the source.
#[test]
fn clones_are_independent() {
    let mut hs: HashSet<i32> = (0..8).collect();
    let mut hs2 = hs.clone();
    hs2.remove(&3);
    assert!(hs.contains(&3));
    assert_eq!(hs2.len(), 7);
    hs.insert(100);
    assert!(!hs2.contains(&100));

    let ts: TreeSet<i32> = (0..8).collect();
    let mut ts2 = ts.clone();
    ts2.remove(&0);
    assert_eq!(ts.first(), Ok(&0));
    assert_eq!(ts2.first(), Ok(&1));
}

// Test: collection conversions.
// Assumes: duplicates collapse.
// Verifies: FromIterator and Extend agree with repeated insert for both
// sets.
#[test]
fn from_iterator_and_extend() {
    let mut hs: HashSet<i32> = [1, 2, 2, 3].into_iter().collect();
    assert_eq!(hs.len(), 3);
    hs.extend([3, 4]);
    assert_eq!(hs.len(), 4);

    let mut ts: TreeSet<i32> = [3, 1, 3, 2].into_iter().collect();
    assert_eq!(ts.len(), 3);
    ts.extend([0, 2]);
    let elements: Vec<i32> = ts.iter().copied().collect();
    assert_eq!(elements, vec![0, 1, 2, 3]);
}

// Test: debug formatting.
// Assumes: set-style output via the standard debug builders.
// Verifies: a tree set prints its elements sorted as a braced list.
#[test]
fn debug_formats_as_set() {
    let mut ts = TreeSet::new();
    ts.insert(2);
    ts.insert(1);
    assert_eq!(format!("{ts:?}"), "{1, 2}");
    let mut hs = HashSet::new();
    hs.insert(7);
    assert_eq!(format!("{hs:?}"), "{7}");
}
