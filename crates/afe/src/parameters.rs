//! Create parameters for the Max-AFE protocol

use crate::proto::afe::Parameters;
use crate::{Error, ParametersError, Result};
use afe_math::bits::BitMatrix;
use afe_traits::{AfeParameters, Deserialize, Serialize};
use prost::Message;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Version of the serialized parameters; part of the fingerprint, so that
/// parties running different wire versions never aggregate together.
const SERIALIZATION_VERSION: u32 = 1;

/// Default soundness parameter.
pub const DEFAULT_LAMBDA: usize = 50;

/// Default number of aggregation servers.
pub const DEFAULT_NUM_SERVERS: usize = 2;

/// Parameters for the Max-AFE protocol.
///
/// The same parameters must be used by every client, server and the leader
/// of a run. They are immutable once built and are passed explicitly,
/// usually as an `Arc<MaxAfeParameters>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxAfeParameters {
    /// Exclusive upper bound `b` of the secrets; also the length of the
    /// unary encoding.
    domain_size: usize,

    /// Length `lam` of an And-AFE block. A decoy block cancels to zero with
    /// probability `2^-lam`.
    lambda: usize,

    /// Number of servers the encodings are secret-shared between.
    num_servers: usize,
}

impl AfeParameters for MaxAfeParameters {}

impl MaxAfeParameters {
    /// Returns the domain size `b`.
    pub const fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Returns the soundness parameter `lam`.
    pub const fn lambda(&self) -> usize {
        self.lambda
    }

    /// Returns the number of servers.
    pub const fn num_servers(&self) -> usize {
        self.num_servers
    }

    /// Returns the `(b, lam)` shape of encodings, shares and aggregates.
    pub const fn shape(&self) -> (usize, usize) {
        (self.domain_size, self.lambda)
    }

    /// Upper bound on the probability that a run decodes a wrong maximum,
    /// `min(1, b * 2^-lam)` by a union bound over the rows.
    pub fn soundness_error_bound(&self) -> f64 {
        let per_row = (-(self.lambda as f64)).exp2();
        (self.domain_size as f64 * per_row).min(1.0)
    }

    /// SHA-256 digest of the serialized parameters.
    ///
    /// Every message on the wire carries this digest; a receiver rejects
    /// messages whose digest differs from its own.
    pub fn fingerprint(&self) -> [u8; 32] {
        let digest = Sha256::digest(self.to_bytes());
        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(&digest);
        fingerprint
    }

    /// Check that `other` describes the same protocol instance.
    pub fn ensure_compatible(&self, other: &Self) -> Result<()> {
        if self != other {
            return Err(Error::ConfigurationMismatch(format!(
                "expected (b = {}, lam = {}, servers = {}), found (b = {}, lam = {}, servers = {})",
                self.domain_size,
                self.lambda,
                self.num_servers,
                other.domain_size,
                other.lambda,
                other.num_servers
            )));
        }
        Ok(())
    }

    /// Check that `matrix` has the `(b, lam)` shape.
    pub fn check_shape(&self, matrix: &BitMatrix) -> Result<()> {
        if matrix.shape() != self.shape() {
            return Err(Error::shape_mismatch(self.shape(), matrix.shape()));
        }
        Ok(())
    }

    /// Check that `secret` lies in `[0, b)` and return it as an index.
    pub fn check_secret(&self, secret: i64) -> Result<usize> {
        usize::try_from(secret)
            .ok()
            .filter(|s| *s < self.domain_size)
            .ok_or(Error::OutOfRangeSecret {
                secret,
                domain_size: self.domain_size,
            })
    }

    #[cfg(test)]
    #[allow(missing_docs)]
    pub fn default_arc(domain_size: usize, lambda: usize) -> Arc<Self> {
        MaxAfeParametersBuilder::new()
            .set_domain_size(domain_size)
            .set_lambda(lambda)
            .build_arc()
            .unwrap()
    }
}

/// Builder for parameters for the Max-AFE protocol.
#[derive(Debug)]
pub struct MaxAfeParametersBuilder {
    domain_size: usize,
    lambda: usize,
    num_servers: usize,
}

impl MaxAfeParametersBuilder {
    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            domain_size: Default::default(),
            lambda: DEFAULT_LAMBDA,
            num_servers: DEFAULT_NUM_SERVERS,
        }
    }

    /// Sets the domain size `b`. Secrets must lie in `[0, b)`.
    pub fn set_domain_size(&mut self, domain_size: usize) -> &mut Self {
        self.domain_size = domain_size;
        self
    }

    /// Sets the soundness parameter `lam`.
    pub fn set_lambda(&mut self, lambda: usize) -> &mut Self {
        self.lambda = lambda;
        self
    }

    /// Sets the number of servers. Must be at least two.
    pub fn set_num_servers(&mut self, num_servers: usize) -> &mut Self {
        self.num_servers = num_servers;
        self
    }

    /// Build a new `MaxAfeParameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<MaxAfeParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `MaxAfeParameters`.
    pub fn build(&self) -> Result<MaxAfeParameters> {
        if self.domain_size == 0 || u32::try_from(self.domain_size).is_err() {
            return Err(Error::ParametersError(
                ParametersError::InvalidDomainSize(self.domain_size),
            ));
        }
        if self.lambda == 0 || u32::try_from(self.lambda).is_err() {
            return Err(Error::ParametersError(ParametersError::InvalidLambda(
                self.lambda,
            )));
        }
        if self.num_servers < 2 || u32::try_from(self.num_servers).is_err() {
            return Err(Error::ParametersError(
                ParametersError::InvalidServerCount(self.num_servers),
            ));
        }

        Ok(MaxAfeParameters {
            domain_size: self.domain_size,
            lambda: self.lambda,
            num_servers: self.num_servers,
        })
    }
}

impl From<&MaxAfeParameters> for Parameters {
    fn from(params: &MaxAfeParameters) -> Self {
        Parameters {
            version: SERIALIZATION_VERSION,
            domain_size: params.domain_size as u32,
            lambda: params.lambda as u32,
            num_servers: params.num_servers as u32,
        }
    }
}

impl TryFrom<Parameters> for MaxAfeParameters {
    type Error = Error;

    fn try_from(value: Parameters) -> Result<Self> {
        if value.version != SERIALIZATION_VERSION {
            return Err(Error::ParametersError(
                ParametersError::UnsupportedVersion(value.version),
            ));
        }
        MaxAfeParametersBuilder::new()
            .set_domain_size(value.domain_size as usize)
            .set_lambda(value.lambda as usize)
            .set_num_servers(value.num_servers as usize)
            .build()
    }
}

impl Serialize for MaxAfeParameters {
    fn to_bytes(&self) -> Vec<u8> {
        Parameters::from(self).encode_to_vec()
    }
}

impl Deserialize for MaxAfeParameters {
    type Error = Error;

    fn try_deserialize(bytes: &[u8]) -> Result<Self> {
        let params: Parameters = Message::decode(bytes).map_err(|_| Error::SerializationError)?;
        MaxAfeParameters::try_from(params)
    }
}

#[cfg(test)]
mod tests {
    use super::{MaxAfeParameters, MaxAfeParametersBuilder, DEFAULT_LAMBDA, DEFAULT_NUM_SERVERS};
    use crate::proto::afe::Parameters;
    use crate::{Error, ParametersError};
    use afe_math::bits::BitMatrix;
    use afe_traits::{Deserialize, Serialize};
    use prost::Message;

    #[test]
    fn default() {
        let params = MaxAfeParametersBuilder::new()
            .set_domain_size(100)
            .build()
            .unwrap();
        assert_eq!(params.domain_size(), 100);
        assert_eq!(params.lambda(), DEFAULT_LAMBDA);
        assert_eq!(params.num_servers(), DEFAULT_NUM_SERVERS);
        assert_eq!(params.shape(), (100, DEFAULT_LAMBDA));
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert_eq!(
            MaxAfeParametersBuilder::new().build(),
            Err(Error::ParametersError(ParametersError::InvalidDomainSize(0)))
        );
        assert_eq!(
            MaxAfeParametersBuilder::new()
                .set_domain_size(10)
                .set_lambda(0)
                .build(),
            Err(Error::ParametersError(ParametersError::InvalidLambda(0)))
        );
        assert_eq!(
            MaxAfeParametersBuilder::new()
                .set_domain_size(10)
                .set_num_servers(1)
                .build(),
            Err(Error::ParametersError(ParametersError::InvalidServerCount(
                1
            )))
        );
        assert!(MaxAfeParametersBuilder::new()
            .set_domain_size(10)
            .set_num_servers(5)
            .build()
            .is_ok());
    }

    #[test]
    fn soundness_error_bound() {
        let params = MaxAfeParameters::default_arc(100, 50);
        let expected = 100.0 / 2f64.powi(50);
        assert!((params.soundness_error_bound() - expected).abs() < 1e-24);

        // The bound saturates at one.
        let params = MaxAfeParameters::default_arc(100, 1);
        assert_eq!(params.soundness_error_bound(), 1.0);
    }

    #[test]
    fn check_secret() {
        let params = MaxAfeParameters::default_arc(10, 8);
        assert_eq!(params.check_secret(0), Ok(0));
        assert_eq!(params.check_secret(9), Ok(9));
        for secret in [-1, 10, 11, i64::MIN, i64::MAX] {
            assert_eq!(
                params.check_secret(secret),
                Err(Error::OutOfRangeSecret {
                    secret,
                    domain_size: 10
                })
            );
        }
    }

    #[test]
    fn check_shape() {
        let params = MaxAfeParameters::default_arc(10, 8);
        assert!(params.check_shape(&BitMatrix::zeros(10, 8)).is_ok());
        assert!(matches!(
            params.check_shape(&BitMatrix::zeros(10, 7)),
            Err(Error::MalformedShare(_))
        ));
        assert!(matches!(
            params.check_shape(&BitMatrix::zeros(8, 10)),
            Err(Error::MalformedShare(_))
        ));
    }

    #[test]
    fn compatibility_and_fingerprint() {
        let a = MaxAfeParameters::default_arc(10, 8);
        let b = MaxAfeParameters::default_arc(10, 8);
        let c = MaxAfeParameters::default_arc(10, 9);
        assert!(a.ensure_compatible(&b).is_ok());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(matches!(
            a.ensure_compatible(&c),
            Err(Error::ConfigurationMismatch(_))
        ));
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn serialize() {
        let params = MaxAfeParametersBuilder::new()
            .set_domain_size(100)
            .set_lambda(40)
            .set_num_servers(3)
            .build()
            .unwrap();
        let bytes = params.to_bytes();
        assert_eq!(MaxAfeParameters::try_deserialize(&bytes), Ok(params));
        assert_eq!(
            MaxAfeParameters::try_deserialize(&[0xff, 0xff]),
            Err(Error::SerializationError)
        );
    }

    #[test]
    fn deserialize_rejects_other_versions() {
        let bytes = Parameters {
            version: 2,
            domain_size: 10,
            lambda: 10,
            num_servers: 2,
        }
        .encode_to_vec();
        assert_eq!(
            MaxAfeParameters::try_deserialize(&bytes),
            Err(Error::ParametersError(ParametersError::UnsupportedVersion(
                2
            )))
        );
    }
}
