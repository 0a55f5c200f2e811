use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::{BitMatrix, BitVector};
use afe_traits::{AfeDecoder, AfeEncoder, AfeParametrized};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;

/// The And-AFE, applied independently to each of the `b` bits of a unary
/// vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndAfe {
    par: Arc<MaxAfeParameters>,
}

impl AndAfe {
    /// Create the And-AFE for the given parameters.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        Self { par: par.clone() }
    }
}

impl AfeParametrized for AndAfe {
    type Parameters = MaxAfeParameters;
}

impl AfeEncoder<BitVector> for AndAfe {
    type Encoding = BitMatrix;
    type Error = Error;

    /// Encode each bit of `unary` as a block of `lam` bits: all zeros for a
    /// one, uniformly random bits for a zero.
    fn try_encode<R: RngCore + CryptoRng>(
        &self,
        unary: &BitVector,
        rng: &mut R,
    ) -> Result<BitMatrix> {
        let (rows, cols) = self.par.shape();
        if unary.len() != rows {
            return Err(Error::MathError(afe_math::Error::LengthMismatch(
                rows,
                unary.len(),
            )));
        }

        let mut encoding = BitMatrix::zeros(rows, cols);
        for (i, bit) in unary.iter().enumerate() {
            if !bit {
                encoding.randomize_row(i, rng);
            }
        }
        Ok(encoding)
    }
}

impl AfeDecoder<BitMatrix> for AndAfe {
    type Output = BitVector;
    type Error = Error;

    /// Decode each row to one iff it is entirely zero.
    fn try_decode(&self, aggregate: &BitMatrix) -> Result<BitVector> {
        self.par.check_shape(aggregate)?;
        Ok(aggregate.zero_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::AndAfe;
    use crate::{Error, MaxAfeParameters};
    use afe_math::bits::{BitMatrix, BitVector};
    use afe_traits::{AfeDecoder, AfeEncoder};
    use rand::thread_rng;

    #[test]
    fn encode_true_and_decoy_blocks() {
        let mut rng = thread_rng();
        // Large blocks so that a decoy is never all zero in practice.
        let params = MaxAfeParameters::default_arc(8, 128);
        let and = AndAfe::new(&params);
        let unary = BitVector::from_fn(8, |i| i % 3 == 0);

        let encoding = and.try_encode(&unary, &mut rng).unwrap();
        assert_eq!(encoding.shape(), (8, 128));
        for i in 0..8 {
            assert_eq!(encoding.row_is_zero(i), i % 3 == 0);
        }
    }

    #[test]
    fn decoy_blocks_are_fresh() {
        let mut rng = thread_rng();
        let params = MaxAfeParameters::default_arc(4, 128);
        let and = AndAfe::new(&params);
        let unary = BitVector::zeros(4);
        let e1 = and.try_encode(&unary, &mut rng).unwrap();
        let e2 = and.try_encode(&unary, &mut rng).unwrap();
        assert_ne!(e1, e2);
        assert_ne!(e1.row(0), e1.row(1));
    }

    #[test]
    fn encode_rejects_wrong_length() {
        let params = MaxAfeParameters::default_arc(8, 16);
        let and = AndAfe::new(&params);
        assert_eq!(
            and.try_encode(&BitVector::zeros(7), &mut thread_rng()),
            Err(Error::MathError(afe_math::Error::LengthMismatch(8, 7)))
        );
    }

    #[test]
    fn decode() {
        let params = MaxAfeParameters::default_arc(3, 2);
        let and = AndAfe::new(&params);
        let aggregate = BitMatrix::from_shape_vec(3, 2, vec![1, 0, 0, 0, 0, 1]).unwrap();
        let decoded = and.try_decode(&aggregate).unwrap();
        assert_eq!(decoded.iter().collect::<Vec<_>>(), vec![false, true, false]);

        assert!(matches!(
            and.try_decode(&BitMatrix::zeros(3, 3)),
            Err(Error::MalformedShare(_))
        ));
    }

    #[test]
    fn encode_then_decode_recovers_the_bits() {
        let mut rng = thread_rng();
        let params = MaxAfeParameters::default_arc(32, 128);
        let and = AndAfe::new(&params);
        let unary = BitVector::from_fn(32, |i| i >= 20);
        let encoding = and.try_encode(&unary, &mut rng).unwrap();
        assert_eq!(and.try_decode(&encoding).unwrap(), unary);
    }
}
