use super::{xor_reduce, Aggregate, Aggregator};
use crate::sharing::Share;
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use afe_traits::AfeParametrized;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// The XOR of every share one server received in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAggregate {
    pub(crate) par: Arc<MaxAfeParameters>,
    pub(crate) server_id: usize,
    pub(crate) clients: usize,
    pub(crate) matrix: BitMatrix,
}

impl ServerAggregate {
    /// Create the aggregate of `clients` shares for `server_id`.
    pub fn new(
        server_id: usize,
        clients: usize,
        matrix: BitMatrix,
        par: &Arc<MaxAfeParameters>,
    ) -> Result<Self> {
        if server_id >= par.num_servers() {
            return Err(Error::invalid_server_id(server_id, par.num_servers()));
        }
        par.check_shape(&matrix)?;
        Ok(Self {
            par: par.clone(),
            server_id,
            clients,
            matrix,
        })
    }

    /// The server that computed this aggregate.
    pub fn server_id(&self) -> usize {
        self.server_id
    }

    /// The number of shares folded into this aggregate.
    pub fn clients(&self) -> usize {
        self.clients
    }

    /// The bits of the aggregate.
    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// The parameters the aggregate was computed under.
    pub fn parameters(&self) -> &Arc<MaxAfeParameters> {
        &self.par
    }
}

impl AfeParametrized for ServerAggregate {
    type Parameters = MaxAfeParameters;
}

/// A server's running aggregate.
///
/// Shares are folded in as they arrive and dropped right away; the server
/// only ever holds the running XOR.
#[derive(Debug)]
pub struct ServerAggregator {
    par: Arc<MaxAfeParameters>,
    server_id: usize,
    clients: usize,
    aggregate: BitMatrix,
}

impl ServerAggregator {
    /// Start an empty aggregation for `server_id`.
    pub fn new(server_id: usize, par: &Arc<MaxAfeParameters>) -> Result<Self> {
        if server_id >= par.num_servers() {
            return Err(Error::invalid_server_id(server_id, par.num_servers()));
        }
        let (rows, cols) = par.shape();
        Ok(Self {
            par: par.clone(),
            server_id,
            clients: 0,
            aggregate: BitMatrix::zeros(rows, cols),
        })
    }

    /// The server this aggregator runs for.
    pub fn server_id(&self) -> usize {
        self.server_id
    }

    /// The number of shares folded in so far.
    pub fn clients(&self) -> usize {
        self.clients
    }
}

impl Aggregator for ServerAggregator {
    type Input = Share;
    type Output = ServerAggregate;

    fn absorb(&mut self, share: Share) -> Result<()> {
        self.par.ensure_compatible(&share.par)?;
        if share.server_id != self.server_id {
            return Err(Error::malformed_share(
                self.server_id,
                format!("received a share for server {}", share.server_id),
            ));
        }
        self.aggregate
            .try_xor_assign(&share.matrix)
            .map_err(|_| Error::shape_mismatch(self.par.shape(), share.matrix.shape()))?;
        self.clients += 1;
        debug!(
            server_id = self.server_id,
            clients = self.clients,
            "absorbed share"
        );
        Ok(())
    }

    fn finish(self) -> Result<ServerAggregate> {
        info!(
            server_id = self.server_id,
            clients = self.clients,
            "server aggregation complete"
        );
        Ok(ServerAggregate {
            par: self.par,
            server_id: self.server_id,
            clients: self.clients,
            matrix: self.aggregate,
        })
    }
}

impl Aggregate<Share> for ServerAggregate {
    fn from_shares<T>(iter: T) -> Result<Self>
    where
        T: IntoIterator<Item = Share>,
    {
        let shares: Vec<Share> = iter.into_iter().collect();
        let first = shares.first().ok_or(Error::TooFewValues(0, 1))?;
        let par = first.par.clone();
        let server_id = first.server_id;

        for share in &shares {
            par.ensure_compatible(&share.par)?;
            if share.server_id != server_id {
                return Err(Error::malformed_share(
                    server_id,
                    format!("received a share for server {}", share.server_id),
                ));
            }
        }

        let matrix = xor_reduce(shares.par_iter().map(|s| &s.matrix), par.shape());

        Ok(ServerAggregate {
            par,
            server_id,
            clients: shares.len(),
            matrix,
        })
    }
}
