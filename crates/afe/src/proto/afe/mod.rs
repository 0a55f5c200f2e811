//! Max-AFE protobuf definitions and serialization.

#[allow(clippy::all)]
mod generated;
mod serialization;

// Re-export generated protobuf types
pub use generated::*;
