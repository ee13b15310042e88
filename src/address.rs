//! Conversion of query addresses into the fixed-width number of a trie.

use std::net::{IpAddr, Ipv4Addr};

/// Something that can be interpreted as an address of the number type `R`. Queries on a
/// [`PrefixTrie`](crate::PrefixTrie) accept any `NetworkNumber` of the trie's
/// [`Network::Number`](crate::Network::Number), and fail with
/// [`Error::InvalidAddressInput`](crate::Error::InvalidAddressInput) if the conversion returns
/// `None`.
///
/// ```
/// # use cidr_trie::*;
/// # use std::net::{IpAddr, Ipv4Addr};
/// assert_eq!(NetworkNumber::<u32>::to_number(&Ipv4Addr::new(10, 0, 0, 1)), Some(0x0a000001));
/// assert_eq!(NetworkNumber::<u32>::to_number(&[10u8, 0, 0, 1][..]), Some(0x0a000001));
/// assert_eq!(NetworkNumber::<u32>::to_number(&"::1".parse::<IpAddr>().unwrap()), None);
/// ```
pub trait NetworkNumber<R> {
    /// Get the number that represents `self`, or `None` if `self` does not fit `R`.
    fn to_number(&self) -> Option<R>;
}

impl<R, T> NetworkNumber<R> for &T
where
    T: NetworkNumber<R> + ?Sized,
{
    fn to_number(&self) -> Option<R> {
        (**self).to_number()
    }
}

impl NetworkNumber<u32> for Ipv4Addr {
    fn to_number(&self) -> Option<u32> {
        Some(u32::from(*self))
    }
}

/// IPv4 addresses, and IPv6 addresses that are IPv4-mapped (`::ffff:a.b.c.d`).
impl NetworkNumber<u32> for IpAddr {
    fn to_number(&self) -> Option<u32> {
        match self {
            IpAddr::V4(addr) => addr.to_number(),
            IpAddr::V6(addr) => addr.to_ipv4_mapped().map(u32::from),
        }
    }
}

/// Raw bytes in network byte order: either the 4 bytes of an IPv4 address, or the 16 bytes of an
/// IPv4-mapped IPv6 address.
impl NetworkNumber<u32> for [u8] {
    fn to_number(&self) -> Option<u32> {
        match self.len() {
            4 => Some(u32::from_be_bytes([self[0], self[1], self[2], self[3]])),
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(self);
                std::net::Ipv6Addr::from(octets)
                    .to_ipv4_mapped()
                    .map(u32::from)
            }
            _ => None,
        }
    }
}

impl NetworkNumber<u32> for [u8; 4] {
    fn to_number(&self) -> Option<u32> {
        Some(u32::from_be_bytes(*self))
    }
}

macro_rules! impl_primitive_number {
    ($($t:ty),*) => {
        $(
            impl NetworkNumber<$t> for $t {
                fn to_number(&self) -> Option<$t> {
                    Some(*self)
                }
            }
        )*
    };
}

impl_primitive_number!(u8, u16, u32, u64, u128, usize);
