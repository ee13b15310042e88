//! The query contract shared by all CIDR set implementations.

use crate::{Error, Network, NetworkNumber, PrefixTrie};

/// A set of CIDR networks that answers containment queries for single addresses.
///
/// [`PrefixTrie`] is the implementation provided by this crate. Code that is generic over a
/// `Ranger` can swap it for any other storage engine with the same semantics.
///
/// ```
/// # use cidr_trie::*;
/// # use ipnet::Ipv4Net;
/// # use std::net::Ipv4Addr;
/// fn is_blocked<R: Ranger>(acl: &R, addr: Ipv4Addr) -> Result<bool, Error>
/// where
///     Ipv4Addr: NetworkNumber<<R::Network as Network>::Number>,
/// {
///     acl.contains(addr)
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut acl: PrefixTrie<Ipv4Net> = PrefixTrie::new();
/// Ranger::insert(&mut acl, "10.0.0.0/8".parse()?)?;
/// assert!(is_blocked(&acl, Ipv4Addr::new(10, 1, 2, 3))?);
/// assert!(!is_blocked(&acl, Ipv4Addr::new(11, 1, 2, 3))?);
/// # Ok(())
/// # }
/// ```
pub trait Ranger {
    /// The type of networks stored in the set.
    type Network: Network;

    /// Add `network` to the set. Adding a network twice has no further effect.
    fn insert(&mut self, network: Self::Network) -> Result<(), Error>;

    /// Remove exactly `network` from the set. Returns `Ok(None)` if it was not present.
    fn remove(&mut self, network: &Self::Network) -> Result<Option<Self::Network>, Error>;

    /// Check if `address` is part of any network in the set.
    fn contains<A>(&self, address: A) -> Result<bool, Error>
    where
        A: NetworkNumber<<Self::Network as Network>::Number>;

    /// All networks in the set that contain `address`, from the least to the most specific one.
    fn containing_networks<A>(&self, address: A) -> Result<Vec<Self::Network>, Error>
    where
        A: NetworkNumber<<Self::Network as Network>::Number>;
}

impl<P: Network> Ranger for PrefixTrie<P> {
    type Network = P;

    fn insert(&mut self, network: P) -> Result<(), Error> {
        PrefixTrie::insert(self, network).map(|_| ())
    }

    fn remove(&mut self, network: &P) -> Result<Option<P>, Error> {
        PrefixTrie::remove(self, network)
    }

    fn contains<A>(&self, address: A) -> Result<bool, Error>
    where
        A: NetworkNumber<P::Number>,
    {
        PrefixTrie::contains(self, address)
    }

    fn containing_networks<A>(&self, address: A) -> Result<Vec<P>, Error>
    where
        A: NetworkNumber<P::Number>,
    {
        PrefixTrie::containing_networks(self, address)
    }
}
