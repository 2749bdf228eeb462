//! Red-black tree map with a pluggable ordering policy.
//!
//! Nodes live in a slot arena; parent and child links are
//! `Option<DefaultKey>`, and an absent link counts as a black nil wherever
//! the rebalancing logic inspects colors. All rebalancing is link and color
//! surgery only: once a key/value pair is stored, the only thing that moves
//! it is the two-child removal case, which rehouses the in-order
//! predecessor in a fresh node taking over the removed node's place.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::guard::ReentryCheck;
use crate::policy::{Comparator, NaturalOrder};
use core::cmp::Ordering;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Where a key descent ended: at the key itself, or at the link a new node
/// would hang from (`None` when the tree is empty).
enum Descent {
    Found(DefaultKey),
    Vacant(Option<(DefaultKey, Side)>),
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<DefaultKey>,
    left: Option<DefaultKey>,
    right: Option<DefaultKey>,
}

/// Ordered map over a caller-chosen [`Comparator`] policy.
///
/// Lookups, insertion, and removal are O(log n); traversal is ascending
/// comparator order. Keys that compare [`Ordering::Equal`] are the same key:
/// inserting one replaces the stored value and keeps the stored key.
pub struct TreeMap<K, V, C = NaturalOrder> {
    cmp: C,
    nodes: SlotMap<DefaultKey, Node<K, V>>, // node storage, generational keys
    root: Option<DefaultKey>,
    check: ReentryCheck,
}

impl<K, V> TreeMap<K, V> {
    /// An empty map ordered by the key type's own [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            cmp,
            nodes: SlotMap::with_key(),
            root: None,
            check: ReentryCheck::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        let _t = self.check.enter();
        self.root = None;
        self.nodes.clear();
    }

    /// True if any entry holds `value`. In-order scan of the whole tree.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let _t = self.check.enter();
        let mut cursor = self.first_node();
        while let Some(node) = cursor {
            if self.nodes[node].value == *value {
                return true;
            }
            cursor = self.successor(node);
        }
        false
    }

    /// The smallest key, or [`Error::NotFound`] on an empty map.
    pub fn first_key(&self) -> Result<&K> {
        match self.first_node() {
            Some(n) => Ok(&self.nodes[n].key),
            None => Err(Error::NotFound),
        }
    }

    /// The largest key, or [`Error::NotFound`] on an empty map.
    pub fn last_key(&self) -> Result<&K> {
        match self.last_node() {
            Some(n) => Ok(&self.nodes[n].key),
            None => Err(Error::NotFound),
        }
    }

    pub fn first_entry(&self) -> Result<(&K, &V)> {
        match self.first_node() {
            Some(n) => {
                let node = &self.nodes[n];
                Ok((&node.key, &node.value))
            }
            None => Err(Error::NotFound),
        }
    }

    pub fn last_entry(&self) -> Result<(&K, &V)> {
        match self.last_node() {
            Some(n) => {
                let node = &self.nodes[n];
                Ok((&node.key, &node.value))
            }
            None => Err(Error::NotFound),
        }
    }

    /// Iterates entries in ascending comparator order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: self,
            next: self.first_node(),
        }
    }

    /// A removal-capable cursor in ascending order. The cursor borrows the
    /// map exclusively for its lifetime.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let next = self.first_node();
        CursorMut {
            tree: self,
            next,
            last: None,
        }
    }

    fn is_red(&self, node: Option<DefaultKey>) -> bool {
        match node {
            Some(n) => self.nodes[n].color == Color::Red,
            None => false, // absent links are black nils
        }
    }

    fn first_node(&self) -> Option<DefaultKey> {
        let mut cursor = self.root?;
        while let Some(left) = self.nodes[cursor].left {
            cursor = left;
        }
        Some(cursor)
    }

    fn last_node(&self) -> Option<DefaultKey> {
        let mut cursor = self.root?;
        while let Some(right) = self.nodes[cursor].right {
            cursor = right;
        }
        Some(cursor)
    }

    /// In-order successor: leftmost of the right subtree, else the nearest
    /// ancestor reached from a left link.
    fn successor(&self, node: DefaultKey) -> Option<DefaultKey> {
        if let Some(mut cursor) = self.nodes[node].right {
            while let Some(left) = self.nodes[cursor].left {
                cursor = left;
            }
            return Some(cursor);
        }
        let mut cursor = node;
        let mut parent = self.nodes[cursor].parent;
        while let Some(p) = parent {
            if self.nodes[p].right == Some(cursor) {
                cursor = p;
                parent = self.nodes[p].parent;
            } else {
                return Some(p);
            }
        }
        None
    }

    /// Rotates `node` down to the left; its right child takes its place.
    /// Links only, colors untouched.
    fn rotate_left(&mut self, node: DefaultKey) {
        let child = self.nodes[node]
            .right
            .expect("left rotation requires a right child");
        let inner = self.nodes[child].left;
        self.nodes[node].right = inner;
        if let Some(i) = inner {
            self.nodes[i].parent = Some(node);
        }
        let parent = self.nodes[node].parent;
        self.nodes[child].parent = parent;
        match parent {
            Some(p) => {
                if self.nodes[p].left == Some(node) {
                    self.nodes[p].left = Some(child);
                } else {
                    self.nodes[p].right = Some(child);
                }
            }
            None => self.root = Some(child),
        }
        self.nodes[child].left = Some(node);
        self.nodes[node].parent = Some(child);
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, node: DefaultKey) {
        let child = self.nodes[node]
            .left
            .expect("right rotation requires a left child");
        let inner = self.nodes[child].right;
        self.nodes[node].left = inner;
        if let Some(i) = inner {
            self.nodes[i].parent = Some(node);
        }
        let parent = self.nodes[node].parent;
        self.nodes[child].parent = parent;
        match parent {
            Some(p) => {
                if self.nodes[p].left == Some(node) {
                    self.nodes[p].left = Some(child);
                } else {
                    self.nodes[p].right = Some(child);
                }
            }
            None => self.root = Some(child),
        }
        self.nodes[child].right = Some(node);
        self.nodes[node].parent = Some(child);
    }

    /// Restores the red-black rules after linking the fresh red `node`, and
    /// leaves the root black.
    fn insert_fixup(&mut self, mut node: DefaultKey) {
        loop {
            let parent = match self.nodes[node].parent {
                Some(p) if self.nodes[p].color == Color::Red => p,
                _ => break,
            };
            let grandparent = match self.nodes[parent].parent {
                Some(g) => g,
                None => break,
            };
            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;
                if self.is_red(uncle) {
                    self.nodes[parent].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[grandparent].color = Color::Red;
                    node = grandparent;
                } else {
                    if self.nodes[parent].right == Some(node) {
                        // inner grandchild: rotate it outward first
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.nodes[node].parent.expect("fixup node keeps a parent");
                    let grandparent = self.nodes[parent]
                        .parent
                        .expect("a red parent is never the root");
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.is_red(uncle) {
                    self.nodes[parent].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[grandparent].color = Color::Red;
                    node = grandparent;
                } else {
                    if self.nodes[parent].left == Some(node) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.nodes[node].parent.expect("fixup node keeps a parent");
                    let grandparent = self.nodes[parent]
                        .parent
                        .expect("a red parent is never the root");
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Deletes `node` from the tree and returns its pair.
    ///
    /// With at most one child, the node itself is spliced out and its lone
    /// subtree promoted. With two children, the in-order predecessor is
    /// spliced out instead and its pair rehoused in a fresh node that takes
    /// over `node`'s links and color, so the predecessor's position in the
    /// traversal order is the only one that changes. Successors of `node`
    /// keep their slots either way, which is what lets a cursor keep
    /// walking after removal.
    fn remove_node(&mut self, node: DefaultKey) -> (K, V) {
        let splice = if self.nodes[node].left.is_none() || self.nodes[node].right.is_none() {
            node
        } else {
            let mut pred = self.nodes[node]
                .left
                .expect("a two-child node has a left child");
            while let Some(right) = self.nodes[pred].right {
                pred = right;
            }
            pred
        };

        let child = self.nodes[splice].left.or(self.nodes[splice].right);
        let splice_parent = self.nodes[splice].parent;
        let spliced_black = self.nodes[splice].color == Color::Black;

        // unlink the spliced node, promoting its lone subtree
        if let Some(c) = child {
            self.nodes[c].parent = splice_parent;
        }
        match splice_parent {
            Some(p) => {
                if self.nodes[p].left == Some(splice) {
                    self.nodes[p].left = child;
                } else {
                    self.nodes[p].right = child;
                }
            }
            None => self.root = child,
        }
        let spliced = self
            .nodes
            .remove(splice)
            .expect("spliced node is live in the arena");

        let mut fix_parent = splice_parent;
        let removed = if splice == node {
            (spliced.key, spliced.value)
        } else {
            // rehouse the predecessor's pair at the removed node's position
            let target = self
                .nodes
                .remove(node)
                .expect("removed node is live in the arena");
            let repl = self.nodes.insert(Node {
                key: spliced.key,
                value: spliced.value,
                color: target.color,
                parent: target.parent,
                left: target.left,
                right: target.right,
            });
            if let Some(l) = target.left {
                self.nodes[l].parent = Some(repl);
            }
            if let Some(r) = target.right {
                self.nodes[r].parent = Some(repl);
            }
            match target.parent {
                Some(p) => {
                    if self.nodes[p].left == Some(node) {
                        self.nodes[p].left = Some(repl);
                    } else {
                        self.nodes[p].right = Some(repl);
                    }
                }
                None => self.root = Some(repl),
            }
            if fix_parent == Some(node) {
                fix_parent = Some(repl);
            }
            (target.key, target.value)
        };

        match fix_parent {
            Some(parent) if spliced_black => self.delete_fixup(child, parent),
            None => {
                // the lone subtree became the root; keep the root black
                if let Some(c) = child {
                    self.nodes[c].color = Color::Black;
                }
            }
            _ => {}
        }
        removed
    }

    /// Rebalances after splicing out a black node. `node` is the promoted
    /// subtree (possibly absent, counting as black) carrying the missing
    /// black, `parent` its current parent.
    fn delete_fixup(&mut self, mut node: Option<DefaultKey>, mut parent: DefaultKey) {
        while node != self.root && !self.is_red(node) {
            if self.nodes[parent].left == node {
                let mut sibling = self.nodes[parent]
                    .right
                    .expect("a black deficiency implies a sibling");
                if self.nodes[sibling].color == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[parent].color = Color::Red;
                    self.rotate_left(parent);
                    sibling = self.nodes[parent]
                        .right
                        .expect("rotation leaves a sibling");
                }
                if !self.is_red(self.nodes[sibling].left) && !self.is_red(self.nodes[sibling].right)
                {
                    self.nodes[sibling].color = Color::Red;
                    node = Some(parent);
                    parent = match self.nodes[parent].parent {
                        Some(p) => p,
                        None => break, // the deficiency reached the root
                    };
                } else {
                    if !self.is_red(self.nodes[sibling].right) {
                        if let Some(inner) = self.nodes[sibling].left {
                            self.nodes[inner].color = Color::Black;
                        }
                        self.nodes[sibling].color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = self.nodes[parent]
                            .right
                            .expect("rotation leaves a sibling");
                    }
                    self.nodes[sibling].color = self.nodes[parent].color;
                    self.nodes[parent].color = Color::Black;
                    if let Some(outer) = self.nodes[sibling].right {
                        self.nodes[outer].color = Color::Black;
                    }
                    self.rotate_left(parent);
                    node = self.root;
                }
            } else {
                let mut sibling = self.nodes[parent]
                    .left
                    .expect("a black deficiency implies a sibling");
                if self.nodes[sibling].color == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[parent].color = Color::Red;
                    self.rotate_right(parent);
                    sibling = self.nodes[parent]
                        .left
                        .expect("rotation leaves a sibling");
                }
                if !self.is_red(self.nodes[sibling].left) && !self.is_red(self.nodes[sibling].right)
                {
                    self.nodes[sibling].color = Color::Red;
                    node = Some(parent);
                    parent = match self.nodes[parent].parent {
                        Some(p) => p,
                        None => break,
                    };
                } else {
                    if !self.is_red(self.nodes[sibling].left) {
                        if let Some(inner) = self.nodes[sibling].right {
                            self.nodes[inner].color = Color::Black;
                        }
                        self.nodes[sibling].color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = self.nodes[parent]
                            .left
                            .expect("rotation leaves a sibling");
                    }
                    self.nodes[sibling].color = self.nodes[parent].color;
                    self.nodes[parent].color = Color::Black;
                    if let Some(outer) = self.nodes[sibling].left {
                        self.nodes[outer].color = Color::Black;
                    }
                    self.rotate_right(parent);
                    node = self.root;
                }
            }
        }
        if let Some(n) = node {
            self.nodes[n].color = Color::Black;
        }
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    /// Descends for `key`. Caller holds the reentry token; this runs the
    /// comparator.
    fn locate(&self, key: &K) -> Option<DefaultKey> {
        let mut cursor = self.root;
        while let Some(node) = cursor {
            cursor = match self.cmp.compare(key, &self.nodes[node].key) {
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Inserts `key` → `value`. An equal key has its value replaced in
    /// place, keeping the stored key and the node's color, and the previous
    /// value is returned. Otherwise a red node is linked at the descent's
    /// end and the tree rebalanced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let descent = {
            let _t = self.check.enter();
            let mut attach = None;
            let mut cursor = self.root;
            let mut found = None;
            while let Some(node) = cursor {
                match self.cmp.compare(&key, &self.nodes[node].key) {
                    Ordering::Less => {
                        attach = Some((node, Side::Left));
                        cursor = self.nodes[node].left;
                    }
                    Ordering::Greater => {
                        attach = Some((node, Side::Right));
                        cursor = self.nodes[node].right;
                    }
                    Ordering::Equal => {
                        found = Some(node);
                        break;
                    }
                }
            }
            match found {
                Some(node) => Descent::Found(node),
                None => Descent::Vacant(attach),
            }
        };
        match descent {
            Descent::Found(node) => {
                Some(core::mem::replace(&mut self.nodes[node].value, value))
            }
            Descent::Vacant(attach) => {
                let slot = self.nodes.insert(Node {
                    key,
                    value,
                    color: Color::Red,
                    parent: attach.map(|(p, _)| p),
                    left: None,
                    right: None,
                });
                match attach {
                    Some((p, Side::Left)) => self.nodes[p].left = Some(slot),
                    Some((p, Side::Right)) => self.nodes[p].right = Some(slot),
                    None => self.root = Some(slot),
                }
                self.insert_fixup(slot);
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        let _t = self.check.enter();
        match self.locate(key) {
            Some(node) => Ok(&self.nodes[node].value),
            None => Err(Error::NotFound),
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let node = {
            let _t = self.check.enter();
            self.locate(key)
        };
        match node {
            Some(node) => Ok(&mut self.nodes[node].value),
            None => Err(Error::NotFound),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let _t = self.check.enter();
        self.locate(key).is_some()
    }

    /// Removes `key`, returning its value, or [`Error::NotFound`] with the
    /// map untouched.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let node = {
            let _t = self.check.enter();
            self.locate(key)
        };
        match node {
            Some(node) => Ok(self.remove_node(node).1),
            None => Err(Error::NotFound),
        }
    }
}

impl<K, V, C> Clone for TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone,
{
    /// Deep copy: every pair re-inserted into fresh storage, same policy
    /// instance.
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(self.cmp.clone());
        for (key, value) in self.iter() {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C> fmt::Debug for TreeMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Immutable entry iterator in ascending comparator order.
pub struct Iter<'a, K, V, C> {
    tree: &'a TreeMap<K, V, C>,
    next: Option<DefaultKey>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let tree = self.tree;
        self.next = tree.successor(current);
        let node = &tree.nodes[current];
        Some((&node.key, &node.value))
    }
}

/// Removal-capable cursor returned by [`TreeMap::cursor_mut`].
pub struct CursorMut<'a, K, V, C> {
    tree: &'a mut TreeMap<K, V, C>,
    next: Option<DefaultKey>,
    last: Option<DefaultKey>,
}

impl<K, V, C> Cursor for CursorMut<'_, K, V, C> {
    type Item<'c>
        = (&'c K, &'c mut V)
    where
        Self: 'c;
    type Removed = (K, V);

    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next(&mut self) -> Result<Self::Item<'_>> {
        let current = self.next.ok_or(Error::NotFound)?;
        self.next = self.tree.successor(current);
        self.last = Some(current);
        let node = &mut self.tree.nodes[current];
        Ok((&node.key, &mut node.value))
    }

    /// Removes the entry the last `next` yielded. The saved successor is
    /// never the node that gets spliced, so the walk continues undisturbed.
    fn remove(&mut self) -> Result<(K, V)> {
        let node = self.last.take().ok_or(Error::InvalidCursor)?;
        Ok(self.tree.remove_node(node))
    }
}

#[cfg(test)]
impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    /// Asserts every structural rule: black root, no red-red edge, uniform
    /// black height, consistent parent links, full reachability, strictly
    /// increasing in-order keys.
    pub(crate) fn assert_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.nodes[root].color, Color::Black, "root must be black");
            assert_eq!(self.nodes[root].parent, None, "root has no parent");
        }
        let (_, count) = self.check_subtree(self.root, None);
        assert_eq!(count, self.nodes.len(), "every node reachable from root");
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.first_node();
        while let Some(node) = cursor {
            if let Some(p) = prev {
                assert_eq!(
                    self.cmp.compare(&self.nodes[p].key, &self.nodes[node].key),
                    Ordering::Less,
                    "in-order keys must strictly increase"
                );
            }
            prev = Some(node);
            cursor = self.successor(node);
        }
    }

    /// Returns (black height, node count) of the subtree, asserting the
    /// color and link rules on the way down.
    fn check_subtree(
        &self,
        node: Option<DefaultKey>,
        parent: Option<DefaultKey>,
    ) -> (usize, usize) {
        let n = match node {
            Some(n) => n,
            None => return (1, 0),
        };
        let data = &self.nodes[n];
        assert_eq!(data.parent, parent, "parent link must match tree shape");
        if data.color == Color::Red {
            assert!(
                !self.is_red(data.left) && !self.is_red(data.right),
                "a red node cannot have a red child"
            );
        }
        let (left_height, left_count) = self.check_subtree(data.left, Some(n));
        let (right_height, right_count) = self.check_subtree(data.right, Some(n));
        assert_eq!(left_height, right_height, "black height must be uniform");
        let height = left_height + usize::from(data.color == Color::Black);
        (height, left_count + right_count + 1)
    }
}
