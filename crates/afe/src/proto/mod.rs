//! Protobuf definitions and serialization for AFE types.

/// Protobuf for the Max-AFE protocol.
pub mod afe;
