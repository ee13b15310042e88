//! Implementation of the path-compressed prefix trie.

use log::{debug, trace};

use crate::{Error, Network, NetworkNumber};

mod iter;
pub(crate) mod node;

pub use iter::*;
pub(crate) use node::Node;
use node::{target_bit_position, Direction, DirectionForInsert};

/// Set of CIDR networks organized as a path-compressed binary trie.
///
/// Each node consumes one bit of the address to select one of its two children. Nodes are only
/// materialized for inserted networks and for the points at which two inserted networks diverge,
/// so any lookup visits at most `width + 1` nodes, independent of the number of stored networks.
///
/// The trie does no internal locking. All mutations require `&mut self`; to share a trie between
/// threads, wrap it into a lock, or publish immutable snapshots and build the next version on the
/// side.
#[derive(Clone)]
pub struct PrefixTrie<P> {
    pub(crate) table: Vec<Node<P>>,
    free: Vec<usize>,
    count: usize,
}

impl<P> Default for PrefixTrie<P>
where
    P: Network,
{
    fn default() -> Self {
        Self {
            table: vec![Node::root()],
            free: Vec::new(),
            count: 0,
        }
    }
}

impl<P> PrefixTrie<P>
where
    P: Network,
{
    /// Create an empty trie. Its root represents the entire address space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trie with space for at least `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Vec::with_capacity(capacity.max(1));
        table.push(Node::root());
        Self {
            table,
            free: Vec::new(),
            count: 0,
        }
    }

    /// Number of networks stored in the trie.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// assert_eq!(trie.len(), 0);
    /// trie.insert("192.168.0.0/24".parse()?)?;
    /// trie.insert("192.168.0.0/24".parse()?)?;
    /// assert_eq!(trie.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no network is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Insert a network into the trie. Host bits of `network` are ignored. Inserting a network
    /// that is already present only marks it as present again. Returns whether the network was
    /// newly inserted.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// assert!(trie.insert("192.168.0.0/23".parse()?)?);
    /// assert!(trie.insert("192.168.1.0/24".parse()?)?);
    /// assert!(!trie.insert("192.168.1.0/24".parse()?)?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, network: P) -> Result<bool, Error> {
        let network = network.masked(network.prefix_len());
        let mut idx = 0;
        loop {
            match self.get_direction_for_insert(idx, &network)? {
                DirectionForInsert::Enter { next } => idx = next,
                DirectionForInsert::Reached => {
                    let node = &mut self.table[idx];
                    if node.has_entry {
                        return Ok(false);
                    }
                    trace!("set entry on existing node {}", idx);
                    node.has_entry = true;
                    self.count += 1;
                    return Ok(true);
                }
                DirectionForInsert::NewLeaf { bit } => {
                    let leaf = self.new_node(network, true);
                    trace!("attach leaf {} at slot {} of {}", leaf, bit, idx);
                    self.set_child(idx, bit, Some(leaf));
                    self.count += 1;
                    return Ok(true);
                }
                DirectionForInsert::NewBranch {
                    branch,
                    bit,
                    child_bit,
                    leaf_bit,
                } => {
                    let branch = self.new_node(branch, leaf_bit.is_none());
                    trace!(
                        "split slot {} of {} at /{}",
                        bit,
                        idx,
                        self.table[branch].num_bits_skipped
                    );
                    let child = self.set_child(idx, bit, Some(branch));
                    self.set_child(branch, child_bit, child);
                    if let Some(leaf_bit) = leaf_bit {
                        debug_assert_ne!(leaf_bit, child_bit);
                        let leaf = self.new_node(network, true);
                        self.set_child(branch, leaf_bit, Some(leaf));
                    }
                    self.count += 1;
                    return Ok(true);
                }
            }
        }
    }

    /// Remove a network from the trie, and return it if it was present. Host bits of `network` are
    /// ignored. A network that is not stored yields `Ok(None)` and leaves the trie untouched.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// let network: Ipv4Net = "192.168.0.0/25".parse()?;
    /// trie.insert(network)?;
    /// assert_eq!(trie.remove(&network)?, Some(network));
    /// assert_eq!(trie.remove(&network)?, None);
    /// assert_eq!(trie.remove(&"10.0.0.0/8".parse()?)?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove(&mut self, network: &P) -> Result<Option<P>, Error> {
        let idx = match self.find(network)? {
            Some(idx) if self.table[idx].has_entry => idx,
            _ => return Ok(None),
        };
        let removed = self.table[idx].network.clone();
        self.remove_node(idx);
        Ok(Some(removed))
    }

    /// Check whether `address` is part of any network stored in the trie.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::{IpAddr, Ipv4Addr};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// trie.insert("192.168.0.0/24".parse()?)?;
    /// assert!(trie.contains(Ipv4Addr::new(192, 168, 0, 1))?);
    /// assert!(!trie.contains(Ipv4Addr::new(192, 168, 1, 1))?);
    /// assert_eq!(
    ///     trie.contains("::1".parse::<IpAddr>()?),
    ///     Err(Error::InvalidAddressInput)
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn contains<A>(&self, address: A) -> Result<bool, Error>
    where
        A: NetworkNumber<P::Number>,
    {
        let number = to_number(&address)?;
        let mut idx = 0;
        loop {
            let node = &self.table[idx];
            if !node.network.contains_number(number) {
                return Ok(false);
            }
            if node.has_entry {
                return Ok(true);
            }
            match self.next_towards(idx, number)? {
                Some(next) => idx = next,
                None => return Ok(false),
            }
        }
    }

    /// Get all stored networks that contain `address`, ordered from the least specific to the
    /// most specific one.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// trie.insert("192.168.0.0/24".parse()?)?;
    /// trie.insert("192.168.0.0/25".parse()?)?;
    /// trie.insert("192.168.1.0/24".parse()?)?;
    /// assert_eq!(
    ///     trie.containing_networks(Ipv4Addr::new(192, 168, 0, 1))?,
    ///     vec!["192.168.0.0/24".parse::<Ipv4Net>()?, "192.168.0.0/25".parse()?],
    /// );
    /// assert!(trie.containing_networks(Ipv4Addr::new(10, 0, 0, 1))?.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn containing_networks<A>(&self, address: A) -> Result<Vec<P>, Error>
    where
        A: NetworkNumber<P::Number>,
    {
        let number = to_number(&address)?;
        let mut result = Vec::new();
        let mut idx = 0;
        loop {
            let node = &self.table[idx];
            if !node.network.contains_number(number) {
                return Ok(result);
            }
            if node.has_entry {
                result.push(node.network.clone());
            }
            match self.next_towards(idx, number)? {
                Some(next) => idx = next,
                None => return Ok(result),
            }
        }
    }

    /// Get the most specific stored network that contains `address`.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// trie.insert("192.168.0.0/23".parse()?)?;
    /// trie.insert("192.168.1.0/24".parse()?)?;
    /// assert_eq!(trie.longest_match(Ipv4Addr::new(192, 168, 1, 1))?, Some("192.168.1.0/24".parse()?));
    /// assert_eq!(trie.longest_match(Ipv4Addr::new(192, 168, 0, 1))?, Some("192.168.0.0/23".parse()?));
    /// assert_eq!(trie.longest_match(Ipv4Addr::new(192, 168, 2, 1))?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn longest_match<A>(&self, address: A) -> Result<Option<P>, Error>
    where
        A: NetworkNumber<P::Number>,
    {
        let number = to_number(&address)?;
        let mut best_match: Option<usize> = None;
        let mut idx = 0;
        loop {
            let node = &self.table[idx];
            if !node.network.contains_number(number) {
                break;
            }
            if node.has_entry {
                best_match = Some(idx);
            }
            match self.next_towards(idx, number)? {
                Some(next) => idx = next,
                None => break,
            }
        }
        Ok(best_match.map(|idx| self.table[idx].network.clone()))
    }

    /// Check if exactly `network` is stored in the trie (without any prefix matching).
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?)?;
    /// assert!(trie.contains_network(&"192.168.1.0/24".parse()?)?);
    /// assert!(!trie.contains_network(&"192.168.0.0/23".parse()?)?);
    /// assert!(!trie.contains_network(&"192.168.1.128/25".parse()?)?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn contains_network(&self, network: &P) -> Result<bool, Error> {
        Ok(self
            .find(network)?
            .map(|idx| self.table[idx].has_entry)
            .unwrap_or(false))
    }

    /// The largest number of bits consumed by any node of the trie. This never exceeds the
    /// address width.
    pub fn depth(&self) -> u8 {
        let mut depth = 0;
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            let node = &self.table[idx];
            depth = depth.max(node.num_bits_skipped);
            stack.extend(node.children.iter().flatten());
        }
        depth
    }

    /// Remove all networks but keep the allocated memory.
    pub fn clear(&mut self) {
        self.table.clear();
        self.free.clear();
        self.table.push(Node::root());
        self.count = 0;
    }
}

/// Private function implementations
impl<P> PrefixTrie<P>
where
    P: Network,
{
    /// Find the node that represents exactly `network`, regardless of its entry flag.
    fn find(&self, network: &P) -> Result<Option<usize>, Error> {
        let network = network.masked(network.prefix_len());
        let mut idx = 0;
        loop {
            match self.get_direction(idx, &network)? {
                Direction::Reached => return Ok(Some(idx)),
                Direction::Enter { next } => idx = next,
                Direction::Missing => return Ok(None),
            }
        }
    }

    /// The child of `idx` in the direction of `number`. A leaf has nowhere to go, so no bit is
    /// computed for it.
    fn next_towards(&self, idx: usize, number: P::Number) -> Result<Option<usize>, Error> {
        let node = &self.table[idx];
        if node.is_leaf() {
            return Ok(None);
        }
        Ok(node.children[node.target_bit(number)?])
    }

    /// Set the child of `idx` in slot `bit` and return the old one.
    #[inline(always)]
    fn set_child(&mut self, idx: usize, bit: usize, child: Option<usize>) -> Option<usize> {
        if let Some(child) = child {
            self.table[child].parent = Some(idx);
        }
        std::mem::replace(&mut self.table[idx].children[bit], child)
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self, network: P, has_entry: bool) -> usize {
        let node = Node::new(network, has_entry);
        if let Some(idx) = self.free.pop() {
            self.table[idx] = node;
            idx
        } else {
            self.table.push(node);
            self.table.len() - 1
        }
    }

    /// Clear the entry of `idx` and drop the node if it is no longer needed as a branch point.
    /// Its parent is dropped as well if it would be left as a pass-through node.
    fn remove_node(&mut self, idx: usize) {
        self.table[idx].has_entry = false;
        self.count -= 1;

        let node = &self.table[idx];
        let Some(parent) = node.parent else {
            // the root always stays
            return;
        };
        match node.children_count() {
            2 => trace!("keep {} as a branch point", idx),
            1 => {
                let child = node.sole_child();
                self.splice(idx, child);
            }
            _ => {
                self.splice(idx, None);
                let par = &self.table[parent];
                if par.parent.is_some() && !par.has_entry && par.children_count() == 1 {
                    let sibling = par.sole_child();
                    self.splice(parent, sibling);
                }
            }
        }
    }

    /// Replace `idx` by `replacement` in the child slot of its parent, and free `idx`.
    fn splice(&mut self, idx: usize, replacement: Option<usize>) {
        let Some(parent) = self.table[idx].parent else {
            return;
        };
        let Some(slot) = self.table[parent].slot_of(idx) else {
            debug!("node {} is not a child of its parent {}", idx, parent);
            return;
        };
        trace!("splice {} out of slot {} of {}", idx, slot, parent);
        self.set_child(parent, slot, replacement);
        let node = &mut self.table[idx];
        node.parent = None;
        node.children = [None, None];
        node.has_entry = false;
        self.free.push(idx);
    }

    /// Get the directions from some node `cur` to get to `network`.
    #[inline(always)]
    fn get_direction(&self, cur: usize, network: &P) -> Result<Direction, Error> {
        let node = &self.table[cur];
        if node.network.same_network(network) {
            return Ok(Direction::Reached);
        }
        if node.num_bits_skipped >= network.prefix_len() {
            return Ok(Direction::Missing);
        }
        let bit = node.target_bit(network.number())?;
        Ok(match node.children[bit] {
            Some(child) if self.table[child].network.contains_network(network) => {
                Direction::Enter { next: child }
            }
            _ => Direction::Missing,
        })
    }

    /// Get the directions from some node `cur` to insert `network`. `cur` must contain
    /// `network`. Every bit that the insert needs is computed here, so nothing is modified if this
    /// fails.
    #[inline(always)]
    fn get_direction_for_insert(
        &self,
        cur: usize,
        network: &P,
    ) -> Result<DirectionForInsert<P>, Error> {
        let node = &self.table[cur];
        if node.network.same_network(network) {
            return Ok(DirectionForInsert::Reached);
        }
        let bit = node.target_bit(network.number())?;
        let Some(child) = node.children[bit] else {
            return Ok(DirectionForInsert::NewLeaf { bit });
        };
        let child_node = &self.table[child];
        let common = network.common_prefix_len(&child_node.network);
        if common >= child_node.num_bits_skipped {
            // the child's prefix accounts for the divergence
            return Ok(DirectionForInsert::Enter { next: child });
        }
        let branch = network.masked(common);
        let position = target_bit_position::<P>(common);
        let child_bit = crate::network::bit_at(child_node.network.number(), position)?;
        let leaf_bit = if common == network.prefix_len() {
            None
        } else {
            Some(crate::network::bit_at(network.number(), position)?)
        };
        Ok(DirectionForInsert::NewBranch {
            branch,
            bit,
            child_bit,
            leaf_bit,
        })
    }
}

fn to_number<R, A: NetworkNumber<R>>(address: &A) -> Result<R, Error> {
    address.to_number().ok_or_else(|| {
        debug!(
            "rejected address that does not fit a {}-bit number",
            std::mem::size_of::<R>() * 8
        );
        Error::InvalidAddressInput
    })
}

impl<P> PartialEq for PrefixTrie<P>
where
    P: Network,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.same_network(b))
    }
}

impl<P> Eq for PrefixTrie<P> where P: Network {}

#[cfg(test)]
impl<P> PrefixTrie<P>
where
    P: Network + std::fmt::Debug,
{
    /// Pre-order list of all reachable nodes as `(network, has_entry, level)`.
    pub(crate) fn structure(&self) -> Vec<(P, bool, usize)> {
        let mut result = Vec::new();
        let mut stack = vec![(0, 0)];
        while let Some((idx, level)) = stack.pop() {
            let node = &self.table[idx];
            result.push((node.network.clone(), node.has_entry, level));
            stack.extend(node.children.iter().rev().flatten().map(|c| (*c, level + 1)));
        }
        result
    }

    /// Check all structural invariants of the trie.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let root = &self.table[0];
        if root.parent.is_some() || root.num_bits_skipped != 0 || root.network.prefix_len() != 0 {
            return Err(format!("invalid root {:?}", root));
        }
        let mut count = 0;
        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            let node = &self.table[idx];
            if !seen.insert(idx) {
                return Err(format!("node {} is reachable twice", idx));
            }
            if node.num_bits_skipped != node.network.prefix_len() || node.num_bits_skipped > P::width()
            {
                return Err(format!("invalid depth of {:?}", node));
            }
            if node.network.number() != node.network.masked_number() {
                return Err(format!("network of {:?} is not masked", node));
            }
            if node.has_entry {
                count += 1;
            } else if idx != 0 && node.children_count() < 2 {
                return Err(format!("pass-through node {:?}", node));
            }
            for (bit, child) in node.children.iter().enumerate() {
                let Some(child) = *child else { continue };
                let c = &self.table[child];
                if c.parent != Some(idx) {
                    return Err(format!("wrong parent of {:?}", c));
                }
                if c.num_bits_skipped <= node.num_bits_skipped
                    || !node.network.contains_network(&c.network)
                {
                    return Err(format!("{:?} is not an extension of {:?}", c, node));
                }
                if node.target_bit(c.network.number()) != Ok(bit) {
                    return Err(format!("{:?} is in the wrong slot of {:?}", c, node));
                }
                stack.push(child);
            }
        }
        if count != self.count {
            return Err(format!("counted {} entries, expected {}", count, self.count));
        }
        if seen.len() + self.free.len() != self.table.len() {
            return Err(format!(
                "{} reachable and {} free nodes, but {} allocated",
                seen.len(),
                self.free.len(),
                self.table.len()
            ));
        }
        Ok(())
    }
}
