/// Traits for secret sharing operations.
use crate::Result;
use rand::{CryptoRng, RngCore};

/// Trait for splitting a secret into one share per server.
pub trait SecretSharer {
    /// The value being shared.
    type Secret;
    /// One server's share.
    type Share;

    /// Split `secret` into shares, one per server, such that any proper
    /// subset of them is independent of `secret`.
    fn split<R: RngCore + CryptoRng>(
        &self,
        secret: &Self::Secret,
        rng: &mut R,
    ) -> Result<Vec<Self::Share>>;

    /// Reconstruct a secret from the full set of its shares.
    fn reconstruct(&self, shares: &[Self::Share]) -> Result<Self::Secret>;
}
