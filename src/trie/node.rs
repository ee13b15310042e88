//! Nodes of the [`PrefixTrie`](crate::PrefixTrie) and the directions used to walk between them.

use crate::network::bit_at;
use crate::{Error, Network};

/// A single node in the trie arena. Nodes reference each other by their index in the arena.
#[derive(Clone, Debug)]
pub(crate) struct Node<P> {
    /// The (masked) network this node represents.
    pub(crate) network: P,
    /// Number of bits consumed from the root to this node. Always equal to the prefix length.
    pub(crate) num_bits_skipped: u8,
    /// `true` if `network` was inserted and not removed since.
    pub(crate) has_entry: bool,
    /// Index of the parent node. Only the root has none.
    pub(crate) parent: Option<usize>,
    /// Child slots, indexed by the bit at this node's target bit position.
    pub(crate) children: [Option<usize>; 2],
}

impl<P: Network> Node<P> {
    pub(crate) fn root() -> Self {
        Self {
            network: P::root(),
            num_bits_skipped: 0,
            has_entry: false,
            parent: None,
            children: [None, None],
        }
    }

    /// Create a detached node for `network` (which must already be masked).
    pub(crate) fn new(network: P, has_entry: bool) -> Self {
        Self {
            num_bits_skipped: network.prefix_len(),
            network,
            has_entry,
            parent: None,
            children: [None, None],
        }
    }

    /// The bit that this node uses to select a child: `(width - 1) - num_bits_skipped`. A node
    /// that consumed all bits yields a negative position.
    #[inline(always)]
    pub(crate) fn target_bit_position(&self) -> i32 {
        target_bit_position::<P>(self.num_bits_skipped)
    }

    /// The child slot that `number` falls into.
    #[inline(always)]
    pub(crate) fn target_bit(&self, number: P::Number) -> Result<usize, Error> {
        bit_at(number, self.target_bit_position())
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children == [None, None]
    }
}

impl<P> Node<P> {
    pub(crate) fn children_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    /// The first occupied child slot, if any.
    pub(crate) fn sole_child(&self) -> Option<usize> {
        self.children.iter().flatten().next().copied()
    }

    /// The slot in which `child` is stored.
    pub(crate) fn slot_of(&self, child: usize) -> Option<usize> {
        self.children.iter().position(|c| *c == Some(child))
    }
}

#[inline(always)]
pub(crate) fn target_bit_position<P: Network>(num_bits_skipped: u8) -> i32 {
    P::width() as i32 - 1 - num_bits_skipped as i32
}

pub(crate) enum Direction {
    /// The network is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize },
    /// The network is not part of the trie.
    Missing,
}

pub(crate) enum DirectionForInsert<P> {
    /// The network is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize },
    /// Insert a new leaf into the empty slot `bit`.
    NewLeaf { bit: usize },
    /// The network diverges from the child in slot `bit` before the child's prefix ends. Insert
    /// `branch` into slot `bit` and move the old child to `child_bit` of the branch. If
    /// `leaf_bit` is `None`, then the branch is the network itself, otherwise the network is
    /// added as a new leaf at `leaf_bit` of the branch.
    NewBranch {
        branch: P,
        bit: usize,
        child_bit: usize,
        leaf_bit: Option<usize>,
    },
}
