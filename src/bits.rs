//! Conversions between CIDR prefixes and their bit-path representation.
//!
//! A prefix of length `n` is keyed in the trie by its first `n` address bits,
//! most-significant bit first. Bit 0 of the path is the high-order bit of the
//! first address octet, so more-specific prefixes always sit strictly deeper
//! than their supernets.

use std::net::IpAddr;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use num_traits::{PrimInt, Zero};

use crate::error::Error;

/// Convert a CIDR into its bit path of length `prefix_len()`.
///
/// Host bits below the mask are ignored. Fails with [`Error::InvalidPrefix`]
/// for `/0` prefixes, which have an empty path and cannot be stored.
pub(crate) fn cidr_to_bits(cidr: &IpNet) -> Result<Vec<bool>, Error> {
    if cidr.prefix_len() == 0 {
        return Err(Error::InvalidPrefix(*cidr));
    }
    Ok(match cidr {
        IpNet::V4(net) => repr_to_bits(u32::from(net.network()), cidr.prefix_len()),
        IpNet::V6(net) => repr_to_bits(u128::from(net.network()), cidr.prefix_len()),
    })
}

/// Convert a concrete address into its full-width bit path (/32 or /128).
pub(crate) fn ip_to_bits(addr: IpAddr) -> Vec<bool> {
    match addr {
        IpAddr::V4(addr) => repr_to_bits(u32::from(addr), 32),
        IpAddr::V6(addr) => repr_to_bits(u128::from(addr), 128),
    }
}

/// Rebuild the CIDR a bit path describes. Unspecified trailing bits are
/// zero, and the mask has exactly `bits.len()` leading ones.
pub(crate) fn bits_to_cidr(bits: &[bool], is_v6: bool) -> IpNet {
    let len = bits.len() as u8;
    if is_v6 {
        IpNet::V6(Ipv6Net::new(bits_to_repr::<u128>(bits).into(), len).unwrap())
    } else {
        IpNet::V4(Ipv4Net::new(bits_to_repr::<u32>(bits).into(), len).unwrap())
    }
}

/// Read the first `len` bits of `repr`, counted from the left, where bit 0
/// is the most significant bit.
fn repr_to_bits<R: PrimInt + Zero>(repr: R, len: u8) -> Vec<bool> {
    let width = R::zero().count_zeros() as u8;
    debug_assert!(len <= width);
    (0..len)
        .map(|bit| repr & (R::one() << (width - 1 - bit) as usize) != R::zero())
        .collect()
}

/// Fold a bit path back into the address representation, left-aligned.
fn bits_to_repr<R: PrimInt + Zero>(bits: &[bool]) -> R {
    let width = R::zero().count_zeros() as usize;
    debug_assert!(bits.len() <= width);
    bits.iter()
        .enumerate()
        .filter(|(_, bit)| **bit)
        .fold(R::zero(), |repr, (i, _)| {
            repr | (R::one() << (width - 1 - i))
        })
}
