use super::{Aggregate, Aggregator, ServerAggregate};
use crate::encoding::MaxAfe;
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use afe_traits::{AfeDecoder, AfeParametrized};
use std::sync::Arc;
use tracing::{debug, info};

/// The XOR of all servers' aggregates, equal to the XOR of every client's
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalAggregate {
    pub(crate) par: Arc<MaxAfeParameters>,
    pub(crate) clients: usize,
    pub(crate) matrix: BitMatrix,
}

impl FinalAggregate {
    /// The number of clients in the batch.
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

    /// Decode the maximum of the batch.
    ///
    /// The result is wrong with probability at most
    /// [`MaxAfeParameters::soundness_error_bound`].
    pub fn decode(&self) -> Result<usize> {
        MaxAfe::new(&self.par).try_decode(&self.matrix)
    }
}

impl AfeParametrized for FinalAggregate {
    type Parameters = MaxAfeParameters;
}

/// The leader's running combination of server aggregates.
///
/// The leader requires one aggregate from every server, each covering the
/// same number of clients; there is no partial result.
#[derive(Debug)]
pub struct LeaderAggregator {
    par: Arc<MaxAfeParameters>,
    received: Vec<bool>,
    clients: Option<usize>,
    aggregate: BitMatrix,
}

impl LeaderAggregator {
    /// Start an empty combination.
    pub fn new(par: &Arc<MaxAfeParameters>) -> Self {
        let (rows, cols) = par.shape();
        Self {
            par: par.clone(),
            received: vec![false; par.num_servers()],
            clients: None,
            aggregate: BitMatrix::zeros(rows, cols),
        }
    }

    /// The number of server aggregates combined so far.
    pub fn received(&self) -> usize {
        self.received.iter().filter(|r| **r).count()
    }

    /// Whether every server's aggregate has been combined.
    pub fn is_complete(&self) -> bool {
        self.received.iter().all(|r| *r)
    }
}

impl Aggregator for LeaderAggregator {
    type Input = ServerAggregate;
    type Output = FinalAggregate;

    fn absorb(&mut self, aggregate: ServerAggregate) -> Result<()> {
        self.par.ensure_compatible(&aggregate.par)?;
        if self.is_complete() {
            return Err(Error::TooManyValues(
                self.received.len() + 1,
                self.received.len(),
            ));
        }
        if self.received[aggregate.server_id] {
            return Err(Error::InconsistentBatch(format!(
                "two aggregates for server {}",
                aggregate.server_id
            )));
        }
        match self.clients {
            Some(clients) if clients != aggregate.clients => {
                return Err(Error::InconsistentBatch(format!(
                    "server {} aggregated {} shares, expected {}",
                    aggregate.server_id, aggregate.clients, clients
                )));
            }
            _ => self.clients = Some(aggregate.clients),
        }

        self.aggregate
            .try_xor_assign(&aggregate.matrix)
            .map_err(|_| Error::shape_mismatch(self.par.shape(), aggregate.matrix.shape()))?;
        self.received[aggregate.server_id] = true;
        debug!(
            server_id = aggregate.server_id,
            received = self.received(),
            "combined server aggregate"
        );
        Ok(())
    }

    fn finish(self) -> Result<FinalAggregate> {
        if !self.is_complete() {
            return Err(Error::TooFewValues(self.received(), self.received.len()));
        }
        let clients = self.clients.unwrap_or_default();
        info!(
            clients,
            soundness_error_bound = self.par.soundness_error_bound(),
            "final aggregate complete"
        );
        Ok(FinalAggregate {
            par: self.par,
            clients,
            matrix: self.aggregate,
        })
    }
}

impl Aggregate<ServerAggregate> for FinalAggregate {
    fn from_shares<T>(iter: T) -> Result<Self>
    where
        T: IntoIterator<Item = ServerAggregate>,
    {
        let mut aggregates = iter.into_iter().peekable();
        let par = aggregates
            .peek()
            .map(|a| a.par.clone())
            .ok_or(Error::TooFewValues(0, 2))?;
        let mut leader = LeaderAggregator::new(&par);
        for aggregate in aggregates {
            leader.absorb(aggregate)?;
        }
        leader.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{FinalAggregate, LeaderAggregator};
    use crate::aggregation::{Aggregate, Aggregator, ServerAggregate};
    use crate::encoding::MaxAfe;
    use crate::sharing::{SecretSharer, XorSharing};
    use crate::{Error, MaxAfeParameters, MaxAfeParametersBuilder};
    use afe_math::bits::BitMatrix;
    use afe_traits::AfeEncoder;
    use rand::thread_rng;
    use std::sync::Arc;

    fn server_aggregates(par: &Arc<MaxAfeParameters>, secrets: &[i64]) -> Vec<ServerAggregate> {
        let mut rng = thread_rng();
        let max = MaxAfe::new(par);
        let sharer = XorSharing::new(par);
        let shares: Vec<_> = secrets
            .iter()
            .map(|s| {
                let encoding = max.try_encode(s, &mut rng).unwrap();
                sharer.split(&encoding, &mut rng).unwrap()
            })
            .collect();
        (0..par.num_servers())
            .map(|i| ServerAggregate::from_shares(shares.iter().map(|s| s[i].clone())).unwrap())
            .collect()
    }

    #[test]
    fn combine_and_decode() {
        let params = MaxAfeParameters::default_arc(100, 64);
        let aggregates = server_aggregates(&params, &[1, 15, 60, 95, 42, 99, 23]);
        let final_aggregate = FinalAggregate::from_shares(aggregates).unwrap();
        assert_eq!(final_aggregate.clients(), 7);
        assert_eq!(final_aggregate.decode(), Ok(99));
    }

    #[test]
    fn combine_in_any_order() {
        let params = MaxAfeParametersBuilder::new()
            .set_domain_size(20)
            .set_lambda(64)
            .set_num_servers(4)
            .build_arc()
            .unwrap();
        let aggregates = server_aggregates(&params, &[3, 7, 2]);
        let forward = FinalAggregate::from_shares(aggregates.clone()).unwrap();
        let backward = FinalAggregate::from_shares(aggregates.into_iter().rev()).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.decode(), Ok(7));
    }

    #[test]
    fn requires_every_server() {
        let params = MaxAfeParameters::default_arc(10, 32);
        let aggregates = server_aggregates(&params, &[3]);

        let mut leader = LeaderAggregator::new(&params);
        leader.absorb(aggregates[0].clone()).unwrap();
        assert_eq!(leader.received(), 1);
        assert!(!leader.is_complete());
        assert_eq!(leader.finish(), Err(Error::TooFewValues(1, 2)));

        assert_eq!(
            FinalAggregate::from_shares(Vec::<ServerAggregate>::new()),
            Err(Error::TooFewValues(0, 2))
        );
    }

    #[test]
    fn rejects_duplicates_and_extra_aggregates() {
        let params = MaxAfeParameters::default_arc(10, 32);
        let aggregates = server_aggregates(&params, &[3]);

        let mut leader = LeaderAggregator::new(&params);
        leader.absorb(aggregates[0].clone()).unwrap();
        assert!(matches!(
            leader.absorb(aggregates[0].clone()),
            Err(Error::InconsistentBatch(_))
        ));
        leader.absorb(aggregates[1].clone()).unwrap();
        assert_eq!(
            leader.absorb(aggregates[1].clone()),
            Err(Error::TooManyValues(3, 2))
        );
    }

    #[test]
    fn rejects_aggregates_over_different_batches() {
        let params = MaxAfeParameters::default_arc(10, 32);
        let a = server_aggregates(&params, &[3, 4]);
        let b = server_aggregates(&params, &[3]);
        assert!(matches!(
            FinalAggregate::from_shares(vec![a[0].clone(), b[1].clone()]),
            Err(Error::InconsistentBatch(_))
        ));
    }

    #[test]
    fn rejects_mismatched_configuration() {
        let params = MaxAfeParameters::default_arc(10, 32);
        let other = MaxAfeParameters::default_arc(10, 33);
        let aggregates = server_aggregates(&params, &[3]);
        let foreign = ServerAggregate::new(1, 1, BitMatrix::zeros(10, 33), &other).unwrap();
        assert!(matches!(
            FinalAggregate::from_shares(vec![aggregates[0].clone(), foreign]),
            Err(Error::ConfigurationMismatch(_))
        ));
    }
}
