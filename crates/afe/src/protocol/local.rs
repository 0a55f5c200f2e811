use super::roles::{Client, Leader, Server};
use super::transport::local_channel;
use crate::{Error, MaxAfeParameters, Result};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// Run the whole protocol in this process and return the maximum of
/// `secrets`.
///
/// Every server runs on its own thread with its own inbox; the only thing
/// servers hand over is their aggregate, sent to the leader. All secrets are
/// range-checked before any share is sent.
pub fn run_local<R: RngCore + CryptoRng>(
    secrets: &[i64],
    par: &Arc<MaxAfeParameters>,
    rng: &mut R,
) -> Result<usize> {
    if secrets.is_empty() {
        return Err(Error::TooFewValues(0, 1));
    }
    for secret in secrets {
        par.check_secret(*secret)?;
    }
    info!(
        clients = secrets.len(),
        servers = par.num_servers(),
        domain_size = par.domain_size(),
        lambda = par.lambda(),
        "starting local run"
    );

    let (leader_tx, mut leader_rx) = local_channel();
    let (server_txs, server_rxs): (Vec<_>, Vec<_>) =
        (0..par.num_servers()).map(|_| local_channel()).unzip();

    thread::scope(|scope| -> Result<usize> {
        let handles: Vec<_> = server_rxs
            .into_iter()
            .enumerate()
            .map(|(server_id, mut inbox)| {
                let leader_tx = leader_tx.clone();
                scope.spawn(move || -> Result<()> {
                    Server::new(server_id, par)?
                        .run(&mut inbox, &leader_tx)
                        .map(|_| ())
                })
            })
            .collect();
        drop(leader_tx);

        let client = Client::new(par);
        let submitted = secrets
            .iter()
            .try_for_each(|secret| client.submit(*secret, &server_txs, rng));
        // Hanging up lets the servers finish.
        drop(server_txs);

        let mut served = Ok(());
        for handle in handles {
            let result = handle
                .join()
                .unwrap_or_else(|_| Err(Error::TransportError("server thread panicked".into())));
            if served.is_ok() {
                served = result;
            }
        }
        submitted?;
        served?;

        Leader::new(par).run(&mut leader_rx)
    })
}

#[cfg(test)]
mod tests {
    use super::run_local;
    use crate::{Error, MaxAfeParameters, MaxAfeParametersBuilder};
    use rand::thread_rng;

    #[test]
    fn two_servers() {
        let mut rng = thread_rng();
        let params = MaxAfeParameters::default_arc(100, 50);
        assert_eq!(
            run_local(&[1, 15, 60, 95, 42, 99, 23], &params, &mut rng),
            Ok(99)
        );
    }

    #[test]
    fn more_servers() {
        let mut rng = thread_rng();
        let params = MaxAfeParametersBuilder::new()
            .set_domain_size(64)
            .set_lambda(48)
            .set_num_servers(5)
            .build_arc()
            .unwrap();
        assert_eq!(run_local(&[0, 63, 12], &params, &mut rng), Ok(63));
        assert_eq!(run_local(&[0], &params, &mut rng), Ok(0));
    }

    #[test]
    fn rejects_before_sending() {
        let mut rng = thread_rng();
        let params = MaxAfeParameters::default_arc(10, 32);
        assert_eq!(
            run_local(&[], &params, &mut rng),
            Err(Error::TooFewValues(0, 1))
        );
        assert_eq!(
            run_local(&[3, 10], &params, &mut rng),
            Err(Error::OutOfRangeSecret {
                secret: 10,
                domain_size: 10
            })
        );
    }
}
