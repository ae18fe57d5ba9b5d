use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use super::frequency::FrequencyTable;
use super::Symbol;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S: Symbol> {
    /// A leaf node contains a symbol and its frequency.
    Leaf { symbol: S, freq: u64 },
    /// An internal node with left and right children and combined frequency.
    Internal {
        freq: u64,
        left: Box<HuffmanNode<S>>,
        right: Box<HuffmanNode<S>>,
    },
}

impl<S: Symbol> HuffmanNode<S> {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Edges on the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A heap entry ordered so the smallest frequency pops first, and among
/// equal frequencies the node created earliest.
#[derive(Debug)]
struct NodeWrapper<S: Symbol> {
    node: HuffmanNode<S>,
    seq: usize,
}

impl<S: Symbol> NodeWrapper<S> {
    fn key(&self) -> (u64, usize) {
        (self.node.freq(), self.seq)
    }
}

impl<S: Symbol> PartialEq for NodeWrapper<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<S: Symbol> Eq for NodeWrapper<S> {}

impl<S: Symbol> Ord for NodeWrapper<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: BinaryHeap is a max-heap.
        other.key().cmp(&self.key())
    }
}

impl<S: Symbol> PartialOrd for NodeWrapper<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree given a frequency table.
/// Returns `None` if the frequency table is empty.
///
/// Leaves are created in the table's first-appearance order and every merged
/// node receives the next sequence number, so ties resolve exactly as a
/// left-to-right minimum scan over a list with merged nodes appended would.
/// The first node popped becomes the left child.
///
/// # Example
///
/// ```
/// use huffpack::compression::{huffman::build_tree, FrequencyTable};
///
/// let freq = FrequencyTable::from_symbols(b"aaabbc");
/// let root = build_tree(&freq).unwrap();
/// assert_eq!(root.freq(), 6);
/// assert_eq!(root.leaf_count(), 3);
/// ```
pub fn build_tree<S: Symbol>(freq_table: &FrequencyTable<S>) -> Option<HuffmanNode<S>> {
    let mut heap: BinaryHeap<NodeWrapper<S>> = freq_table
        .iter()
        .enumerate()
        .map(|(seq, (symbol, freq))| NodeWrapper {
            node: HuffmanNode::Leaf { symbol, freq },
            seq,
        })
        .collect();
    let mut next_seq = heap.len();

    while let Some(first) = heap.pop() {
        let Some(second) = heap.pop() else {
            return Some(first.node);
        };
        let freq = first.node.freq() + second.node.freq();
        trace!(
            "merging nodes #{} ({}) and #{} ({}) into #{}",
            first.seq,
            first.node.freq(),
            second.seq,
            second.node.freq(),
            next_seq
        );
        heap.push(NodeWrapper {
            node: HuffmanNode::Internal {
                freq,
                left: Box::new(first.node),
                right: Box::new(second.node),
            },
            seq: next_seq,
        });
        next_seq += 1;
    }

    None
}
