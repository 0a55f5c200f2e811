#![crate_name = "afe_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for Affine-aggregatable Function Encodings (AFEs).

use rand::{CryptoRng, RngCore};
use std::sync::Arc;

/// The parameters of an AFE scheme.
pub trait AfeParameters {}

/// Indicates that an object is parametrized.
pub trait AfeParametrized {
    /// The type of the parameters.
    type Parameters: AfeParameters;
}

/// Encoding of a client value into its aggregatable representation.
///
/// The encoder is the scheme itself; `T` is the type of the value being
/// encoded. Encoders may consume randomness, which must come from a
/// cryptographically secure generator.
pub trait AfeEncoder<T: ?Sized>: AfeParametrized {
    /// The encoded representation.
    type Encoding;
    /// The type of errors.
    type Error;

    /// Attempt to encode `value`.
    fn try_encode<R: RngCore + CryptoRng>(
        &self,
        value: &T,
        rng: &mut R,
    ) -> Result<Self::Encoding, Self::Error>;
}

/// Decoding of an aggregate back into the aggregated statistic.
pub trait AfeDecoder<A: ?Sized>: AfeParametrized {
    /// The decoded statistic.
    type Output;
    /// The type of errors.
    type Error;

    /// Attempt to decode the `aggregate`.
    fn try_decode(&self, aggregate: &A) -> Result<Self::Output, Self::Error>;
}

/// Serialization.
pub trait Serialize {
    /// Serialize `Self` into a vector of bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Deserialization without context.
pub trait Deserialize
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes
    fn try_deserialize(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Deserialization setting an explicit parameter.
pub trait DeserializeParametrized
where
    Self: Sized,
    Self: AfeParametrized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes
    fn from_bytes(bytes: &[u8], par: &Arc<Self::Parameters>) -> Result<Self, Self::Error>;
}
