//! Bit vectors and bit matrices over GF(2).
//!
//! Cells are stored one per byte and always hold 0 or 1; every constructor
//! that accepts external data validates this.

mod matrix;
mod vector;

pub use matrix::BitMatrix;
pub use vector::BitVector;

use crate::{Error, Result};
use itertools::Itertools;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Sample `n` independent uniform bits from a cryptographically secure
/// generator.
pub fn sample_bits<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Vec<u8> {
    let mut bytes = Zeroizing::new(vec![0u8; n.div_ceil(8)]);
    rng.fill_bytes(bytes.as_mut_slice());
    (0..n).map(|k| (bytes[k / 8] >> (k % 8)) & 1).collect()
}

/// Pack bits eight to a byte, least significant bit first. The last byte is
/// padded with zeros.
pub(crate) fn pack<'a, I>(bits: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a u8>,
{
    bits.into_iter()
        .chunks(8)
        .into_iter()
        .map(|chunk| {
            chunk
                .enumerate()
                .fold(0u8, |byte, (k, &bit)| byte | ((bit & 1) << k))
        })
        .collect()
}

/// Unpack `n` bits packed by [`pack`], rejecting wrong lengths and set
/// padding bits.
pub(crate) fn unpack(bytes: &[u8], n: usize) -> Result<Vec<u8>> {
    let expected = n.div_ceil(8);
    if bytes.len() != expected {
        return Err(Error::InvalidPackedLength(expected, bytes.len()));
    }
    if n % 8 != 0 && bytes[expected - 1] >> (n % 8) != 0 {
        return Err(Error::NonZeroPadding);
    }
    Ok((0..n).map(|k| (bytes[k / 8] >> (k % 8)) & 1).collect())
}

/// Check that every cell of `data` is binary.
pub(crate) fn check_binary(data: &[u8]) -> Result<()> {
    match data.iter().position(|&b| b > 1) {
        Some(index) => Err(Error::NonBinary {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}
