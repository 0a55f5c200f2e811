use super::transport::{MessageReceiver, MessageSender};
use super::encode_and_split;
use crate::aggregation::{Aggregator, LeaderAggregator, ServerAggregate, ServerAggregator};
use crate::sharing::Share;
use crate::{Error, MaxAfeParameters, Result};
use afe_traits::{DeserializeParametrized, Serialize};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A client contributing one secret per run.
#[derive(Debug, Clone)]
pub struct Client {
    par: Arc<MaxAfeParameters>,
}

impl Client {
    /// Create a client for the given parameters.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        Self { par: par.clone() }
    }

    /// Encode `secret`, split it, and send share `i` to `servers[i]`.
    ///
    /// Nothing is sent if the secret is out of range.
    pub fn submit<S, R>(&self, secret: i64, servers: &[S], rng: &mut R) -> Result<()>
    where
        S: MessageSender,
        R: RngCore + CryptoRng,
    {
        if servers.len() != self.par.num_servers() {
            return Err(Error::ConfigurationMismatch(format!(
                "{} server channels for {} servers",
                servers.len(),
                self.par.num_servers()
            )));
        }
        let shares = encode_and_split(secret, &self.par, rng)?;
        for (share, server) in shares.iter().zip(servers) {
            server.send(share.to_bytes())?;
        }
        debug!(servers = servers.len(), "submitted shares");
        Ok(())
    }
}

/// One aggregation server.
///
/// A server only ever sees its own shares and talks to no other server.
#[derive(Debug)]
pub struct Server {
    par: Arc<MaxAfeParameters>,
    aggregator: ServerAggregator,
}

impl Server {
    /// Create the server in slot `server_id`.
    pub fn new(server_id: usize, par: &Arc<MaxAfeParameters>) -> Result<Self> {
        Ok(Self {
            par: par.clone(),
            aggregator: ServerAggregator::new(server_id, par)?,
        })
    }

    /// Fold every share received on `inbox` until all clients hung up, then
    /// send the aggregate to the leader.
    ///
    /// The first malformed or mismatching share aborts the run; no aggregate
    /// is sent in that case.
    pub fn run<R, S>(mut self, inbox: &mut R, leader: &S) -> Result<ServerAggregate>
    where
        R: MessageReceiver,
        S: MessageSender,
    {
        let server_id = self.aggregator.server_id();
        while let Some(bytes) = inbox.recv()? {
            let share = Share::from_bytes(&bytes, &self.par).map_err(|e| {
                warn!(server_id, error = %e, "rejected share");
                e
            })?;
            self.aggregator.absorb(share)?;
        }
        let aggregate = self.aggregator.finish()?;
        leader.send(aggregate.to_bytes())?;
        Ok(aggregate)
    }
}

/// The leader, combining the servers' aggregates and decoding the maximum.
#[derive(Debug, Clone)]
pub struct Leader {
    par: Arc<MaxAfeParameters>,
}

impl Leader {
    /// Create the leader for the given parameters.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        Self { par: par.clone() }
    }

    /// Wait for one aggregate per server on `inbox`, combine them and decode
    /// the maximum.
    ///
    /// Fails with [`Error::TooFewValues`] if the servers hang up before every
    /// aggregate arrived, and if the batch has no client.
    pub fn run<R: MessageReceiver>(&self, inbox: &mut R) -> Result<usize> {
        let mut aggregator = LeaderAggregator::new(&self.par);
        while !aggregator.is_complete() {
            match inbox.recv()? {
                Some(bytes) => {
                    aggregator.absorb(ServerAggregate::from_bytes(&bytes, &self.par)?)?
                }
                None => break,
            }
        }
        let final_aggregate = aggregator.finish()?;
        if final_aggregate.clients() == 0 {
            return Err(Error::TooFewValues(0, 1));
        }
        let max = final_aggregate.decode()?;
        info!(clients = final_aggregate.clients(), "decoded maximum");
        Ok(max)
    }
}
