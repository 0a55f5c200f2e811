use super::{check_binary, pack, sample_bits, unpack, BitVector};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::{CryptoRng, RngCore};
use std::ops::{BitXor, BitXorAssign};
use zeroize::Zeroize;

/// A `rows × cols` matrix over GF(2).
///
/// In the protocol, rows are indexed by the unary position and columns by the
/// bit of the And-AFE block, so a matrix is a stack of `rows` blocks of
/// `cols` bits each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    bits: Array2<u8>,
}

impl BitMatrix {
    /// The all-zero matrix, identity of the XOR aggregation.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            bits: Array2::zeros((rows, cols)),
        }
    }

    /// A matrix of independent uniform bits.
    pub fn random<R: RngCore + CryptoRng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut data = sample_bits(rows * cols, rng);
        let bits = Array2::from_shape_fn((rows, cols), |(i, j)| data[i * cols + j]);
        data.zeroize();
        Self { bits }
    }

    /// Create a matrix from row-major cells, each of which must be 0 or 1.
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch((rows, cols), (data.len(), 1)));
        }
        check_binary(&data)?;
        let bits = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| Error::ShapeMismatch((rows, cols), (0, 0)))?;
        Ok(Self { bits })
    }

    /// Wrap an existing array, each cell of which must be 0 or 1.
    pub fn from_array(bits: Array2<u8>) -> Result<Self> {
        if let Some((index, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(Error::NonBinary { index, value });
        }
        Ok(Self { bits })
    }

    /// Decode a matrix packed by [`BitMatrix::to_packed`].
    pub fn from_packed(rows: usize, cols: usize, bytes: &[u8]) -> Result<Self> {
        let data = unpack(bytes, rows * cols)?;
        Self::from_shape_vec(rows, cols, data)
    }

    /// Pack the cells in row-major order, eight per byte, least significant
    /// bit first.
    pub fn to_packed(&self) -> Vec<u8> {
        pack(self.bits.iter())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.bits.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.bits.ncols()
    }

    /// The `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        self.bits.dim()
    }

    /// Returns the cell at `(row, col)`, if it exists.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.bits.get((row, col)).copied()
    }

    /// A view of row `i`.
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, u8> {
        self.bits.row(i)
    }

    /// Whether every cell of row `i` is zero.
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row_is_zero(&self, i: usize) -> bool {
        self.bits.row(i).iter().all(|&b| b == 0)
    }

    /// One bit per row, set iff that row is entirely zero.
    pub fn zero_rows(&self) -> BitVector {
        BitVector::from_fn(self.rows(), |i| self.row_is_zero(i))
    }

    /// Overwrite row `i` with fresh uniform bits.
    ///
    /// Panics if `i >= self.rows()`.
    pub fn randomize_row<R: RngCore + CryptoRng>(&mut self, i: usize, rng: &mut R) {
        let mut block = sample_bits(self.cols(), rng);
        self.bits
            .row_mut(i)
            .iter_mut()
            .zip(block.iter())
            .for_each(|(cell, &bit)| *cell = bit);
        block.zeroize();
    }

    /// Number of cells set to one.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Whether every cell is zero.
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// The underlying array.
    pub fn as_array(&self) -> &Array2<u8> {
        &self.bits
    }

    /// XOR `other` into `self`, checking that the shapes agree.
    pub fn try_xor_assign(&mut self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch(self.shape(), other.shape()));
        }
        self.bits.zip_mut_with(&other.bits, |a, &b| *a ^= b);
        Ok(())
    }

    /// XOR of `self` and `other`, checking that the shapes agree.
    pub fn try_xor(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.try_xor_assign(other)?;
        Ok(out)
    }
}

impl BitXorAssign<&BitMatrix> for BitMatrix {
    /// Panics if the shapes differ; use [`BitMatrix::try_xor_assign`] on
    /// untrusted input.
    fn bitxor_assign(&mut self, rhs: &BitMatrix) {
        assert_eq!(self.shape(), rhs.shape(), "Incompatible shapes");
        self.bits.zip_mut_with(&rhs.bits, |a, &b| *a ^= b);
    }
}

impl BitXor<&BitMatrix> for &BitMatrix {
    type Output = BitMatrix;

    fn bitxor(self, rhs: &BitMatrix) -> BitMatrix {
        let mut out = self.clone();
        out ^= rhs;
        out
    }
}

impl Zeroize for BitMatrix {
    fn zeroize(&mut self) {
        self.bits.iter_mut().for_each(|b| b.zeroize());
    }
}

#[cfg(test)]
mod tests {
    use super::BitMatrix;
    use crate::Error;
    use ndarray::array;
    use proptest::prelude::*;
    use rand::{thread_rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use zeroize::Zeroize;

    #[test]
    fn zeros_and_shape() {
        let m = BitMatrix::zeros(3, 5);
        assert_eq!(m.shape(), (3, 5));
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert!(m.is_zero());
        assert!((0..3).all(|i| m.row_is_zero(i)));
        assert_eq!(m.get(2, 4), Some(0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn from_shape_vec_validates() {
        assert_eq!(
            BitMatrix::from_shape_vec(2, 2, vec![0, 1, 1]),
            Err(Error::ShapeMismatch((2, 2), (3, 1)))
        );
        assert_eq!(
            BitMatrix::from_shape_vec(2, 2, vec![0, 1, 2, 1]),
            Err(Error::NonBinary { index: 2, value: 2 })
        );
        let m = BitMatrix::from_shape_vec(2, 2, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(m.get(0, 1), Some(1));
        assert_eq!(m.get(1, 1), Some(0));
    }

    #[test]
    fn from_array_validates() {
        assert!(BitMatrix::from_array(array![[0u8, 1], [1, 1]]).is_ok());
        assert_eq!(
            BitMatrix::from_array(array![[0u8, 1], [3, 1]]),
            Err(Error::NonBinary { index: 2, value: 3 })
        );
    }

    #[test]
    fn zero_rows() {
        let m = BitMatrix::from_shape_vec(3, 2, vec![0, 0, 1, 0, 0, 1]).unwrap();
        let z = m.zero_rows();
        assert_eq!(z.iter().collect::<Vec<_>>(), vec![true, false, false]);
    }

    #[test]
    fn randomize_row_touches_only_that_row() {
        let mut rng = thread_rng();
        let mut m = BitMatrix::zeros(4, 256);
        m.randomize_row(2, &mut rng);
        assert!(m.row_is_zero(0));
        assert!(m.row_is_zero(1));
        assert!(m.row_is_zero(3));
        // 2^-256 chance of a false failure.
        assert!(!m.row_is_zero(2));
    }

    #[test]
    fn xor_shape_mismatch() {
        let mut a = BitMatrix::zeros(2, 3);
        let b = BitMatrix::zeros(3, 2);
        assert_eq!(
            a.try_xor_assign(&b),
            Err(Error::ShapeMismatch((2, 3), (3, 2)))
        );
        assert!(a.try_xor(&b).is_err());
    }

    #[test]
    #[should_panic]
    fn xor_operator_panics_on_shape_mismatch() {
        let _ = &BitMatrix::zeros(2, 3) ^ &BitMatrix::zeros(2, 4);
    }

    #[test]
    fn packed_rejects_wrong_length() {
        let m = BitMatrix::random(3, 5, &mut thread_rng());
        let bytes = m.to_packed();
        assert_eq!(bytes.len(), 2);
        assert_eq!(BitMatrix::from_packed(3, 5, &bytes), Ok(m));
        assert!(BitMatrix::from_packed(3, 6, &bytes).is_err());
        assert!(BitMatrix::from_packed(5, 5, &bytes).is_err());
    }

    #[test]
    fn zeroize_clears() {
        let mut m = BitMatrix::random(8, 64, &mut thread_rng());
        m.zeroize();
        assert!(m.is_zero());
        assert_eq!(m.shape(), (8, 64));
    }

    proptest! {
        #[test]
        fn xor_is_self_inverse(seed: u64, rows in 1usize..12, cols in 1usize..70) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let a = BitMatrix::random(rows, cols, &mut rng);
            let b = BitMatrix::random(rows, cols, &mut rng);
            let c = &a ^ &b;
            prop_assert_eq!(&c ^ &b, a.clone());
            prop_assert!((&a ^ &a).is_zero());
            prop_assert_eq!(&a ^ &BitMatrix::zeros(rows, cols), a);
        }

        #[test]
        fn xor_is_commutative_and_associative(seed: u64, rows in 1usize..12, cols in 1usize..70) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let a = BitMatrix::random(rows, cols, &mut rng);
            let b = BitMatrix::random(rows, cols, &mut rng);
            let c = BitMatrix::random(rows, cols, &mut rng);
            prop_assert_eq!(&a ^ &b, &b ^ &a);
            prop_assert_eq!(&(&a ^ &b) ^ &c, &a ^ &(&b ^ &c));
        }

        #[test]
        fn packing_preserves_cells(seed: u64, rows in 0usize..12, cols in 0usize..70) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let a = BitMatrix::random(rows, cols, &mut rng);
            let bytes = a.to_packed();
            prop_assert_eq!(bytes.len(), (rows * cols).div_ceil(8));
            prop_assert_eq!(BitMatrix::from_packed(rows, cols, &bytes).unwrap(), a);
        }
    }
}
