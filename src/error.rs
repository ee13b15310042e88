//! Errors returned by the [`PrefixTrie`](crate::PrefixTrie).

use std::fmt;

/// Possible errors returned by the trie operations. A query that finds nothing is not an error;
/// absence is always reported as `false`, `None`, or an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The address passed to a query cannot be interpreted as a number of the width the trie was
    /// built for, e.g., an IPv6 address passed to an IPv4 trie. This is raised before the trie is
    /// traversed.
    InvalidAddressInput,
    /// A bit position computed while descending the trie lies outside of the address. This
    /// indicates a width mismatch between a stored network and the query, or a broken trie. The
    /// operation was aborted before anything was modified.
    InvalidBitPosition {
        /// The requested bit position, counted from the least significant bit.
        position: i32,
        /// The width of the address in bits.
        width: u32,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidAddressInput => {
                write!(f, "Error: The address cannot be interpreted at this width.")
            }
            Error::InvalidBitPosition { position, width } => write!(
                f,
                "Error: Bit position {} is out of range for a {}-bit address.",
                position, width
            ),
        }
    }
}
