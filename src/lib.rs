//! This crate provides a path-compressed binary trie over CIDR networks. For a dynamic set of
//! networks, it answers whether an address is contained in any of them, and lists all networks that
//! contain an address, from the least to the most specific one. This is the all-prefix-match
//! problem found in firewalls, route tables, and IP-based access-control lists.
//!
//! Networks can be [`ipnet::Ipv4Net`](https://docs.rs/ipnet) (feature `ipnet`, enabled by
//! default), [`ipnetwork::Ipv4Network`](https://crates.io/crates/ipnetwork) (feature `ipnetwork`),
//! [`cidr::Ipv4Cidr`](https://crates.io/crates/cidr) (feature `cidr`), or any tuple `(R, u8)`,
//! where `R` is any unsigned primitive integer (`u8`, `u16`, `u32`, `u64`, `u128`, or `usize`).
//! Queries take any address that implements [`NetworkNumber`], e.g. [`std::net::Ipv4Addr`],
//! [`std::net::IpAddr`], or raw bytes.
//!
//! ```
//! # use cidr_trie::*;
//! # use ipnet::Ipv4Net;
//! # use std::net::Ipv4Addr;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut trie: PrefixTrie<Ipv4Net> = PrefixTrie::new();
//! trie.insert("192.168.0.0/24".parse()?)?;
//! trie.insert("192.168.0.0/25".parse()?)?;
//! trie.insert("192.168.1.0/24".parse()?)?;
//!
//! assert!(trie.contains(Ipv4Addr::new(192, 168, 0, 1))?);
//! assert!(trie.contains(Ipv4Addr::new(192, 168, 1, 5))?);
//! assert!(!trie.contains(Ipv4Addr::new(10, 0, 0, 1))?);
//! assert_eq!(
//!     trie.containing_networks(Ipv4Addr::new(192, 168, 0, 1))?,
//!     vec!["192.168.0.0/24".parse::<Ipv4Net>()?, "192.168.0.0/25".parse()?],
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each node consists of a network, a flag telling whether that network was inserted, a link to
//! its parent, and two optional children. To select a child, a node looks at its *target bit*: the
//! most significant bit of the address that is **not** part of its own prefix. Bits are indexed
//! from the least significant bit, so the target bit of a node with prefix length `l` in a trie of
//! width `w` is `w - 1 - l`. If it is not set, we take slot `0`, and otherwise slot `1`.
//!
//! Nodes are only created for inserted networks and for the bit at which two inserted networks
//! diverge. A chain of nodes with a single child is never materialized (*path compression*), so the
//! depth of the trie, and the cost of every operation, is bounded by the address width. All nodes
//! live in a single arena and refer to each other by index.
//!
//! | Operation                       | Complexity |
//! |---------------------------------|------------|
//! | `insert`, `remove`              | `O(w)`     |
//! | `contains`, `containing_networks`, `longest_match` | `O(w)` |
//! | `iter`                          | `O(n)`     |
//! | `len` and `is_empty`            | `O(1)`     |
//!
//! # Concurrency
//!
//! There is no internal locking. Mutations need `&mut self`, so the borrow checker forces callers
//! to serialize writers against readers, e.g. with a `RwLock`, or by publishing immutable
//! snapshots.
//!
//! # TODO
//!
//! Level compression, i.e., nodes that consume more than one bit based on the density of their
//! children, as used by the Linux FIB (LC-trie).

#![deny(missing_docs)]

mod address;
mod error;
mod fmt;
mod network;
mod ranger;
#[cfg(feature = "serde")]
mod serde;
#[cfg(test)]
mod fuzzing;

pub mod trie;

pub use address::NetworkNumber;
pub use error::Error;
pub use network::{bit_at, divergence_position, Network};
pub use ranger::Ranger;
pub use trie::PrefixTrie;
