use super::check_binary;
use crate::{Error, Result};
use itertools::Itertools;
use ndarray::Array1;

/// A vector over GF(2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    bits: Array1<u8>,
}

impl BitVector {
    /// The all-zero vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: Array1::zeros(len),
        }
    }

    /// Create a vector whose bit `i` is `f(i)`.
    pub fn from_fn<F: FnMut(usize) -> bool>(len: usize, mut f: F) -> Self {
        Self {
            bits: Array1::from_shape_fn(len, |i| f(i) as u8),
        }
    }

    /// Create a vector from cells, each of which must be 0 or 1.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        check_binary(&data)?;
        Ok(Self {
            bits: Array1::from_vec(data),
        })
    }

    /// Length of the vector.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns bit `i`, if it exists.
    pub fn get(&self, i: usize) -> Option<bool> {
        self.bits.get(i).map(|&b| b == 1)
    }

    /// Iterate over the bits.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().map(|&b| b == 1)
    }

    /// Index of the first set bit.
    pub fn first_set(&self) -> Option<usize> {
        self.bits.iter().position(|&b| b == 1)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Whether the vector is a threshold vector: a run of zeros followed by a
    /// run of ones.
    pub fn is_threshold(&self) -> bool {
        self.bits.iter().tuple_windows().all(|(a, b)| a <= b)
    }

    /// Whether every bit set in `other` is also set in `self`.
    pub fn dominates(&self, other: &Self) -> Result<bool> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch(self.len(), other.len()));
        }
        Ok(self.bits.iter().zip(other.bits.iter()).all(|(a, b)| a >= b))
    }

    /// The underlying array.
    pub fn as_array(&self) -> &Array1<u8> {
        &self.bits
    }
}
