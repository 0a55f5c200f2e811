use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Indicates a client secret outside of `[0, domain_size)`.
    #[error("Secret {secret} is outside of the domain [0, {domain_size})")]
    OutOfRangeSecret {
        /// The rejected secret.
        secret: i64,
        /// The exclusive upper bound of the domain.
        domain_size: usize,
    },

    /// Indicates a share or aggregate with the wrong shape, non-binary cells,
    /// or bytes that do not decode.
    #[error("Malformed share: {0}")]
    MalformedShare(String),

    /// Indicates that decoding found no row set to one.
    #[error("Aggregation inconsistent: no decoded row is set")]
    AggregationInconsistent,

    /// Indicates values produced under different parameters.
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// Indicates server aggregates that do not cover the same batch.
    #[error("Inconsistent batch: {0}")]
    InconsistentBatch(String),

    /// Indicates that too many values were provided.
    #[error("Too many values provided: {0} exceeds limit {1}")]
    TooManyValues(usize, usize),

    /// Indicates that too few values were provided.
    #[error("Too few values provided: {0} is below limit {1}")]
    TooFewValues(usize, usize),

    /// Indicates an error in the underlying mathematical library.
    #[error("{0}")]
    MathError(afe_math::Error),

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(ParametersError),

    /// Indicates a serialization error.
    #[error("Serialization error")]
    SerializationError,

    /// Indicates a failure to deliver or receive a message.
    #[error("Transport error: {0}")]
    TransportError(String),
}

impl From<afe_math::Error> for Error {
    fn from(e: afe_math::Error) -> Self {
        Error::MathError(e)
    }
}

impl Error {
    /// Create a malformed share error for a given server slot.
    pub fn malformed_share<S: Into<String>>(server_id: usize, reason: S) -> Self {
        Self::MalformedShare(format!("server {}: {}", server_id, reason.into()))
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        Self::MalformedShare(format!(
            "expected a {}x{} matrix, found {}x{}",
            expected.0, expected.1, found.0, found.1
        ))
    }

    /// Create an invalid server id error.
    pub fn invalid_server_id(server_id: usize, num_servers: usize) -> Self {
        Self::MalformedShare(format!(
            "Invalid server ID: {}, must be between 0 and {}",
            server_id,
            num_servers.saturating_sub(1)
        ))
    }
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParametersError {
    /// Indicates that the domain size is invalid.
    #[error("Invalid domain size: {0}")]
    InvalidDomainSize(usize),

    /// Indicates that the soundness parameter is invalid.
    #[error("Invalid lambda: {0}")]
    InvalidLambda(usize),

    /// Indicates that the number of servers is invalid.
    #[error("Invalid number of servers: {0}")]
    InvalidServerCount(usize),

    /// Indicates that the serialization version is not supported.
    #[error("Unsupported parameters version: {0}")]
    UnsupportedVersion(u32),
}
