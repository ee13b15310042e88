//! Description of the generic type `Network`.

#[cfg(feature = "cidr")]
use cidr::Ipv4Cidr;
#[cfg(feature = "ipnet")]
use ipnet::Ipv4Net;
#[cfg(feature = "ipnetwork")]
use ipnetwork::Ipv4Network;
#[cfg(any(feature = "ipnet", feature = "ipnetwork", feature = "cidr"))]
use std::net::Ipv4Addr;

use num_traits::{CheckedShr, PrimInt, Unsigned, Zero};

use crate::Error;

/// Trait for defining CIDR networks stored in a [`PrefixTrie`](crate::PrefixTrie).
///
/// A network is a fixed-width number together with a prefix length. The width of the number
/// (`Self::Number`) is the address width of the trie. Bits are counted from the least significant
/// bit, i.e., bit `width - 1` is the first bit of the address and the first one that the trie looks
/// at.
pub trait Network: Sized + Clone {
    /// How can the network be represented. This must be one of `u8`, `u16`, `u32`, `u64`, or
    /// `u128`.
    type Number: Unsigned + PrimInt + Zero + CheckedShr;

    /// Get raw representation of the address, ignoring the prefix length. Host bits may be set.
    fn number(&self) -> Self::Number;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// Create a new network from the raw number and the prefix length. All bits beyond the prefix
    /// length are cleared, and the length is capped at the width of the number.
    fn from_number_len(number: Self::Number, len: u8) -> Self;

    /// Number of bits in an address.
    fn width() -> u8 {
        Self::Number::zero().count_zeros() as u8
    }

    /// mask `self.number()` using `self.prefix_len()`. If you can guarantee that the number is
    /// already masked, then simply re-implement this function for your type.
    fn masked_number(&self) -> Self::Number {
        self.number() & mask_from_prefix_len(self.prefix_len())
    }

    /// Create a new network with the same address, masked to `len` bits.
    fn masked(&self, len: u8) -> Self {
        Self::from_number_len(self.number(), len)
    }

    /// Create a network that contains every address.
    fn root() -> Self {
        Self::from_number_len(Self::Number::zero(), 0)
    }

    /// Compare two networks. Two networks are the same if their prefix lengths are equal and
    /// their addresses are equal after masking.
    fn same_network(&self, other: &Self) -> bool {
        self.masked_number() == other.masked_number() && self.prefix_len() == other.prefix_len()
    }

    /// Check if `self` contains `other`. This function also returns `true` if both are the same.
    fn contains_network(&self, other: &Self) -> bool {
        if self.prefix_len() > other.prefix_len() {
            return false;
        }
        other.number() & mask_from_prefix_len(self.prefix_len()) == self.masked_number()
    }

    /// Check if the address `number` is part of `self`.
    fn contains_number(&self, number: Self::Number) -> bool {
        number & mask_from_prefix_len(self.prefix_len()) == self.masked_number()
    }

    /// The highest-order bit position at which the (masked) addresses of both networks differ, or
    /// `None` if they are equal.
    fn divergence_position(&self, other: &Self) -> Option<u32> {
        divergence_position(self.masked_number(), other.masked_number())
    }

    /// Length of the longest prefix that is shared by both networks.
    fn common_prefix_len(&self, other: &Self) -> u8 {
        let width = Self::width();
        let common = match self.divergence_position(other) {
            Some(pos) => width - 1 - pos as u8,
            None => width,
        };
        common.min(self.prefix_len()).min(other.prefix_len())
    }
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

/// Extract bit `position` of `number`, where 0 is the least significant bit.
pub fn bit_at<R: PrimInt>(number: R, position: i32) -> Result<usize, Error> {
    let width = R::zero().count_zeros();
    if position < 0 || position as u32 >= width {
        return Err(Error::InvalidBitPosition { position, width });
    }
    if (number >> position as usize) & R::one() == R::zero() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// The highest-order bit position at which `a` and `b` differ (0 is the least significant bit),
/// or `None` if `a == b`.
pub fn divergence_position<R: PrimInt>(a: R, b: R) -> Option<u32> {
    let diff = a ^ b;
    if diff.is_zero() {
        None
    } else {
        Some(R::zero().count_zeros() - 1 - diff.leading_zeros())
    }
}

#[cfg(feature = "ipnet")]
impl Network for Ipv4Net {
    type Number = u32;

    fn number(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_number_len(number: u32, len: u8) -> Self {
        let len = len.min(32);
        let addr = Ipv4Addr::from(number & mask_from_prefix_len::<u32>(len));
        Ipv4Net::new(addr, len).unwrap_or_default()
    }

    fn masked_number(&self) -> u32 {
        self.network().into()
    }

    fn root() -> Self {
        Default::default()
    }

    fn contains_network(&self, other: &Self) -> bool {
        self.contains(other)
    }

    fn contains_number(&self, number: u32) -> bool {
        self.contains(&Ipv4Addr::from(number))
    }
}

#[cfg(feature = "ipnetwork")]
impl Network for Ipv4Network {
    type Number = u32;

    fn number(&self) -> u32 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn from_number_len(number: u32, len: u8) -> Self {
        let len = len.min(32);
        let addr = Ipv4Addr::from(number & mask_from_prefix_len::<u32>(len));
        Ipv4Network::new(addr, len).unwrap_or_else(|_| Ipv4Network::from(addr))
    }

    fn masked_number(&self) -> u32 {
        self.network().into()
    }
}

#[cfg(feature = "cidr")]
impl Network for Ipv4Cidr {
    type Number = u32;

    fn number(&self) -> u32 {
        self.first_address().into()
    }

    fn prefix_len(&self) -> u8 {
        self.network_length()
    }

    fn from_number_len(number: u32, len: u8) -> Self {
        let len = len.min(32);
        let addr = Ipv4Addr::from(number & mask_from_prefix_len::<u32>(len));
        Ipv4Cidr::new(addr, len).unwrap_or_else(|_| Ipv4Cidr::new_host(addr))
    }

    fn masked_number(&self) -> u32 {
        self.first_address().into()
    }
}

impl<R> Network for (R, u8)
where
    R: Unsigned + PrimInt + Zero + CheckedShr,
{
    type Number = R;

    fn number(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_number_len(number: R, len: u8) -> Self {
        let len = len.min(R::zero().count_zeros() as u8);
        (number & mask_from_prefix_len(len), len)
    }
}
