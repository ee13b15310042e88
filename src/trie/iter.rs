//! Module that contains the implementation for the iterators

use log::debug;

use crate::*;

/// An iterator over all networks of a [`PrefixTrie`] in lexicographic order. A node's own network
/// is yielded before the networks below it, and slot `0` is visited before slot `1`.
#[derive(Clone)]
pub struct Iter<'a, P> {
    pub(crate) trie: &'a PrefixTrie<P>,
    pub(crate) nodes: Vec<usize>,
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<&'a P> {
        while let Some(cur) = self.nodes.pop() {
            let node = &self.trie.table[cur];
            self.nodes.extend(node.children.iter().rev().flatten());
            if node.has_entry {
                return Some(&node.network);
            }
        }
        None
    }
}

/// An iterator over all owned networks of a [`PrefixTrie`] in lexicographic order.
#[derive(Clone)]
pub struct IntoIter<P> {
    trie: PrefixTrie<P>,
    nodes: Vec<usize>,
}

impl<P: Network> Iterator for IntoIter<P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        while let Some(cur) = self.nodes.pop() {
            let node = &mut self.trie.table[cur];
            self.nodes.extend(node.children.iter().rev().flatten());
            if std::mem::take(&mut node.has_entry) {
                return Some(std::mem::replace(&mut node.network, P::root()));
            }
        }
        None
    }
}

impl<P: Network> IntoIterator for PrefixTrie<P> {
    type Item = P;

    type IntoIter = IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            trie: self,
            nodes: vec![0],
        }
    }
}

impl<'a, P> IntoIterator for &'a PrefixTrie<P> {
    type Item = &'a P;

    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            trie: self,
            nodes: vec![0],
        }
    }
}

impl<P> PrefixTrie<P> {
    /// An iterator visiting all networks in lexicographic order. The iterator element type is
    /// `&P`.
    ///
    /// ```
    /// # use cidr_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?)?;
    /// trie.insert("10.0.0.0/8".parse()?)?;
    /// trie.insert("192.168.0.0/16".parse()?)?;
    /// assert_eq!(
    ///     trie.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
    ///     vec!["10.0.0.0/8", "192.168.0.0/16", "192.168.1.0/24"],
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, P> {
        self.into_iter()
    }

    /// Walk the trie depth-first and yield every stored network. Every call starts a new
    /// traversal. This is the same as [`Self::iter`].
    #[inline(always)]
    pub fn walk_depth(&self) -> Iter<'_, P> {
        self.iter()
    }
}

impl<P> FromIterator<P> for PrefixTrie<P>
where
    P: Network,
{
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<P> Extend<P> for PrefixTrie<P>
where
    P: Network,
{
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for network in iter {
            if let Err(e) = self.insert(network) {
                debug!("skipped network while extending the trie: {}", e);
            }
        }
    }
}
