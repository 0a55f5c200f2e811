use super::{SecretSharer, Share};
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use itertools::Itertools;
use rand::{CryptoRng, RngCore};
use std::sync::Arc;

/// Additive sharing over GF(2).
///
/// The shares of the first `n - 1` servers are uniformly random; the share of
/// the last server is the encoding XOR all of them, so the XOR of all `n`
/// shares is the encoding. Each proper subset of the shares is a one-time pad
/// of the encoding and reveals nothing about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorSharing {
    par: Arc<MaxAfeParameters>,
}

impl XorSharing {
    /// Create a sharer for the given parameters.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        Self { par: par.clone() }
    }
}

impl SecretSharer for XorSharing {
    type Secret = BitMatrix;
    type Share = Share;

    fn split<R: RngCore + CryptoRng>(&self, encoding: &BitMatrix, rng: &mut R) -> Result<Vec<Share>> {
        self.par.check_shape(encoding)?;
        let (rows, cols) = self.par.shape();
        let num_servers = self.par.num_servers();

        let mut shares = Vec::with_capacity(num_servers);
        let mut last = encoding.clone();
        for server_id in 0..num_servers - 1 {
            let mask = BitMatrix::random(rows, cols, rng);
            last ^= &mask;
            shares.push(Share {
                par: self.par.clone(),
                server_id,
                matrix: mask,
            });
        }
        shares.push(Share {
            par: self.par.clone(),
            server_id: num_servers - 1,
            matrix: last,
        });
        Ok(shares)
    }

    fn reconstruct(&self, shares: &[Share]) -> Result<BitMatrix> {
        let num_servers = self.par.num_servers();
        if shares.len() < num_servers {
            return Err(Error::TooFewValues(shares.len(), num_servers));
        }
        if shares.len() > num_servers {
            return Err(Error::TooManyValues(shares.len(), num_servers));
        }

        if let Some(server_id) = shares.iter().map(|s| s.server_id).duplicates().next() {
            return Err(Error::InconsistentBatch(format!(
                "two shares for server {}",
                server_id
            )));
        }

        let (rows, cols) = self.par.shape();
        let mut secret = BitMatrix::zeros(rows, cols);
        for share in shares {
            self.par.ensure_compatible(&share.par)?;
            secret.try_xor_assign(&share.matrix)?;
        }
        Ok(secret)
    }
}
