//! Entry points of the protocol, and the roles that run it over a transport.
//!
//! The functions below operate on in-memory values and are what a driver
//! calls when it moves bits itself. [`Client`], [`Server`] and [`Leader`]
//! speak serialized messages over a [`MessageSender`] / [`MessageReceiver`]
//! pair instead, and [`run_local`] wires them together in one process.

mod local;
mod roles;
mod transport;

pub use local::run_local;
pub use roles::{Client, Leader, Server};
pub use transport::{local_channel, LocalReceiver, LocalSender, MessageReceiver, MessageSender};

use crate::aggregation::xor_reduce;
use crate::encoding::MaxAfe;
use crate::sharing::{SecretSharer, Share, XorSharing};
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use afe_traits::{AfeDecoder, AfeEncoder};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Encode `secret` and split the encoding into one share per server.
///
/// Returns [`Error::OutOfRangeSecret`] if `secret` is not in `[0, b)`; no
/// randomness is drawn in that case.
pub fn encode_and_split<R: RngCore + CryptoRng>(
    secret: i64,
    par: &Arc<MaxAfeParameters>,
    rng: &mut R,
) -> Result<Vec<Share>> {
    let encoding = Zeroizing::new(MaxAfe::new(par).try_encode(&secret, rng)?);
    XorSharing::new(par).split(&encoding, rng)
}

/// Encode and split a batch of secrets in parallel.
///
/// Each client draws from its own `ChaCha20Rng`, seeded from `rng`, so the
/// output only depends on `rng` and not on the scheduling. The shares of the
/// i-th secret are at index i.
pub fn encode_batch<R: RngCore + CryptoRng>(
    secrets: &[i64],
    par: &Arc<MaxAfeParameters>,
    rng: &mut R,
) -> Result<Vec<Vec<Share>>> {
    let seeds: Vec<Zeroizing<<ChaCha20Rng as SeedableRng>::Seed>> = secrets
        .iter()
        .map(|_| {
            let mut seed = Zeroizing::new(<ChaCha20Rng as SeedableRng>::Seed::default());
            rng.fill_bytes(&mut seed[..]);
            seed
        })
        .collect();

    secrets
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(secret, seed)| {
            let mut rng = ChaCha20Rng::from_seed(**seed);
            encode_and_split(*secret, par, &mut rng)
        })
        .collect()
}

/// Aggregate the raw share matrices one server received.
///
/// Returns [`Error::MalformedShare`] if any share is not `b × lam`, and
/// [`Error::TooFewValues`] if there is no share: an all-zero aggregate would
/// decode to a maximum of 0.
pub fn aggregate_server(shares: &[BitMatrix], par: &Arc<MaxAfeParameters>) -> Result<BitMatrix> {
    if shares.is_empty() {
        return Err(Error::TooFewValues(0, 1));
    }
    shares.iter().try_for_each(|share| par.check_shape(share))?;
    Ok(xor_reduce(shares.par_iter(), par.shape()))
}

/// Combine the raw aggregates of every server and decode the maximum.
///
/// Exactly one aggregate per server is required. Returns
/// [`Error::AggregationInconsistent`] if no decoded row is set.
pub fn finalize(server_aggregates: &[BitMatrix], par: &Arc<MaxAfeParameters>) -> Result<usize> {
    let num_servers = par.num_servers();
    if server_aggregates.len() < num_servers {
        return Err(Error::TooFewValues(server_aggregates.len(), num_servers));
    }
    if server_aggregates.len() > num_servers {
        return Err(Error::TooManyValues(server_aggregates.len(), num_servers));
    }
    server_aggregates
        .iter()
        .try_for_each(|aggregate| par.check_shape(aggregate))?;

    let combined = xor_reduce(server_aggregates.par_iter(), par.shape());
    MaxAfe::new(par).try_decode(&combined)
}
