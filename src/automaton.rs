//! Trie / Aho-Corasick automaton over sequences of hashable items.
//!
//! Built for token-id sequences (the byte-oriented multi-pattern crates do
//! not fit a token alphabet), but generic over any `Eq + Hash + Clone` item.
//! Usage is two-phase: [`Trie::insert`] the patterns, [`Trie::build`] the
//! failure links, then [`Trie::find_all`] scans a haystack once and reports
//! every pattern occurrence, overlapping and nested ones included.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

const ROOT: u32 = 0;

#[derive(Debug)]
struct Node<T, V> {
    children: HashMap<T, u32>,
    /// Failure link: the node for the longest proper suffix of this node's
    /// sequence that is also in the trie. Meaningful only after `build`.
    fail: u32,
    value: Option<V>,
}

impl<T, V> Node<T, V> {
    fn new() -> Self {
        Node {
            children: HashMap::new(),
            fail: ROOT,
            value: None,
        }
    }
}

#[derive(Debug)]
pub struct Trie<T, V> {
    nodes: Vec<Node<T, V>>,
    len: usize,
    built: bool,
}

impl<T, V> Default for Trie<T, V>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Trie::new()
    }
}

impl<T, V> Trie<T, V>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Trie {
            nodes: vec![Node::new()],
            len: 0,
            built: false,
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a sequence and its value. If the sequence is already present
    /// its value is replaced and the previous one returned. Empty sequences
    /// are ignored.
    pub fn insert(&mut self, seq: &[T], value: V) -> Option<V> {
        if seq.is_empty() {
            return None;
        }

        let mut node = ROOT;
        for item in seq {
            let existing = self.nodes[node as usize].children.get(item).copied();
            node = match existing {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as u32;
                    self.nodes.push(Node::new());
                    self.nodes[node as usize].children.insert(item.clone(), next);
                    self.built = false;
                    next
                }
            };
        }

        let previous = self.nodes[node as usize].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Value stored for exactly this sequence, if any.
    pub fn get(&self, seq: &[T]) -> Option<&V> {
        self.node_of(seq)
            .and_then(|node| self.nodes[node as usize].value.as_ref())
    }

    /// True if a value is stored for exactly this sequence.
    #[allow(dead_code)]
    pub fn contains(&self, seq: &[T]) -> bool {
        self.get(seq).is_some()
    }

    /// True if the sequence is a prefix of any inserted sequence.
    #[allow(dead_code)]
    pub fn is_prefix(&self, seq: &[T]) -> bool {
        self.node_of(seq).is_some()
    }

    fn node_of(&self, seq: &[T]) -> Option<u32> {
        let mut node = ROOT;
        for item in seq {
            node = *self.nodes[node as usize].children.get(item)?;
        }
        Some(node)
    }

    /// Wire the failure links, turning the trie into a search automaton.
    ///
    /// Breadth-first over the trie: a node's failure link points to the node
    /// for the longest proper suffix of its sequence that is also a trie
    /// path; depth-one nodes and unmatched suffixes fail to the root.
    pub fn build(&mut self) {
        let mut queue = VecDeque::new();

        let first: Vec<u32> = self.nodes[ROOT as usize].children.values().copied().collect();
        for node in first {
            self.nodes[node as usize].fail = ROOT;
            queue.push_back(node);
        }

        while let Some(current) = queue.pop_front() {
            let edges: Vec<(T, u32)> = self.nodes[current as usize]
                .children
                .iter()
                .map(|(item, &child)| (item.clone(), child))
                .collect();

            for (item, child) in edges {
                queue.push_back(child);

                // walk the failure chain until a state with an `item` edge
                let mut state = self.nodes[current as usize].fail;
                let fail = loop {
                    if let Some(&next) = self.nodes[state as usize].children.get(&item) {
                        break next;
                    }
                    if state == ROOT {
                        break ROOT;
                    }
                    state = self.nodes[state as usize].fail;
                };
                self.nodes[child as usize].fail = fail;
            }
        }

        self.built = true;
    }

    /// Scan `haystack` once, yielding `(end_index, value)` for every inserted
    /// sequence that ends at each position. Requires [`build`](Trie::build).
    pub fn find_all(&self, haystack: &[T]) -> Vec<(usize, &V)> {
        debug_assert!(self.built, "find_all called before build");

        let mut hits = Vec::new();
        let mut state = ROOT;
        for (index, item) in haystack.iter().enumerate() {
            state = loop {
                if let Some(&next) = self.nodes[state as usize].children.get(item) {
                    break next;
                }
                if state == ROOT {
                    break ROOT;
                }
                state = self.nodes[state as usize].fail;
            };

            // every pattern ending here lies on the failure chain
            let mut chain = state;
            while chain != ROOT {
                if let Some(value) = &self.nodes[chain as usize].value {
                    hits.push((index, value));
                }
                chain = self.nodes[chain as usize].fail;
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut trie: Trie<char, u32> = Trie::new();
        assert!(trie.is_empty());

        assert_eq!(trie.insert(&chars("he"), 1), None);
        assert_eq!(trie.insert(&chars("hers"), 2), None);
        assert_eq!(trie.len(), 2);

        assert_eq!(trie.get(&chars("he")), Some(&1));
        assert_eq!(trie.get(&chars("hers")), Some(&2));
        assert_eq!(trie.get(&chars("her")), None);
        assert_eq!(trie.get(&chars("x")), None);
    }

    #[test]
    fn test_insert_replaces_and_returns_previous() {
        let mut trie: Trie<char, u32> = Trie::new();
        assert_eq!(trie.insert(&chars("he"), 1), None);
        assert_eq!(trie.insert(&chars("he"), 2), Some(1));
        assert_eq!(trie.get(&chars("he")), Some(&2));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_empty_sequence_is_ignored() {
        let mut trie: Trie<char, u32> = Trie::new();
        assert_eq!(trie.insert(&[], 1), None);
        assert!(trie.is_empty());
    }

    #[test]
    fn test_prefix_vs_terminal() {
        let mut trie: Trie<char, u32> = Trie::new();
        trie.insert(&chars("hers"), 1);

        assert!(trie.is_prefix(&chars("he")));
        assert!(trie.is_prefix(&chars("hers")));
        assert!(!trie.is_prefix(&chars("x")));

        assert!(!trie.contains(&chars("he")));
        assert!(trie.contains(&chars("hers")));
    }

    #[test]
    fn test_find_all_overlapping() {
        // the classic he/she/his/hers corpus
        let mut trie: Trie<char, &str> = Trie::new();
        for pattern in ["he", "she", "his", "hers"] {
            trie.insert(&chars(pattern), pattern);
        }
        trie.build();

        let hits: Vec<(usize, &str)> = trie
            .find_all(&chars("ushers"))
            .into_iter()
            .map(|(index, &value)| (index, value))
            .collect();

        // "she" and "he" both end on the `e` (index 3), "hers" on the final `s`
        assert_eq!(hits, vec![(3, "she"), (3, "he"), (5, "hers")]);
    }

    #[test]
    fn test_find_all_over_token_ids() {
        let mut trie: Trie<u32, usize> = Trie::new();
        trie.insert(&[1, 2, 3], 0);
        trie.insert(&[2, 3], 1);
        trie.build();

        let hits = trie.find_all(&[1, 2, 3]);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&(2, &0)));
        assert!(hits.contains(&(2, &1)));
    }

    #[test]
    fn test_find_all_nothing() {
        let mut trie: Trie<u32, usize> = Trie::new();
        trie.insert(&[7, 8], 0);
        trie.build();
        assert!(trie.find_all(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_restart_after_mismatch() {
        let mut trie: Trie<char, u32> = Trie::new();
        trie.insert(&chars("abab"), 1);
        trie.build();

        // overlapping occurrences share the `ab` suffix/prefix
        let hits = trie.find_all(&chars("ababab"));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 3);
        assert_eq!(hits[1].0, 5);
    }
}
