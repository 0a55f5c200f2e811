use super::AndAfe;
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::{BitMatrix, BitVector};
use afe_traits::{AfeDecoder, AfeEncoder, AfeParametrized};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use tracing::warn;

/// The Max-AFE: a unary threshold encoding composed with the [`AndAfe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxAfe {
    par: Arc<MaxAfeParameters>,
    and: AndAfe,
}

impl MaxAfe {
    /// Create the Max-AFE for the given parameters.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        Self {
            par: par.clone(),
            and: AndAfe::new(par),
        }
    }

    /// The underlying And-AFE.
    pub fn and_afe(&self) -> &AndAfe {
        &self.and
    }

    /// Encode `secret` as the length-`b` threshold vector whose bit `i` is set
    /// iff `secret <= i`.
    ///
    /// Returns [`Error::OutOfRangeSecret`] if `secret` is not in `[0, b)`.
    pub fn encode_unary(&self, secret: i64) -> Result<BitVector> {
        let secret = self.par.check_secret(secret)?;
        Ok(BitVector::from_fn(self.par.domain_size(), |i| secret <= i))
    }

    /// Decode an AND of threshold vectors to the index of its first set bit.
    ///
    /// Returns [`Error::AggregationInconsistent`] if no bit is set.
    pub fn decode_unary(&self, decoded: &BitVector) -> Result<usize> {
        if decoded.len() != self.par.domain_size() {
            return Err(Error::ConfigurationMismatch(format!(
                "decoded vector has length {}, expected {}",
                decoded.len(),
                self.par.domain_size()
            )));
        }
        decoded.first_set().ok_or_else(|| {
            warn!(
                domain_size = self.par.domain_size(),
                lambda = self.par.lambda(),
                "no decoded row is set"
            );
            Error::AggregationInconsistent
        })
    }
}

impl AfeParametrized for MaxAfe {
    type Parameters = MaxAfeParameters;
}

impl AfeEncoder<i64> for MaxAfe {
    type Encoding = BitMatrix;
    type Error = Error;

    fn try_encode<R: RngCore + CryptoRng>(&self, secret: &i64, rng: &mut R) -> Result<BitMatrix> {
        let unary = self.encode_unary(*secret)?;
        self.and.try_encode(&unary, rng)
    }
}

impl AfeDecoder<BitMatrix> for MaxAfe {
    type Output = usize;
    type Error = Error;

    fn try_decode(&self, aggregate: &BitMatrix) -> Result<usize> {
        let decoded = self.and.try_decode(aggregate)?;
        self.decode_unary(&decoded)
    }
}
