#![crate_name = "afe"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]
#![doc = include_str!("../README.md")]

mod errors;
mod parameters;

pub mod aggregation;
pub mod encoding;
pub mod proto;
pub mod protocol;
pub mod sharing;

pub use errors::{Error, ParametersError, Result};
pub use parameters::{
    MaxAfeParameters, MaxAfeParametersBuilder, DEFAULT_LAMBDA, DEFAULT_NUM_SERVERS,
};
pub use protocol::{aggregate_server, encode_and_split, encode_batch, finalize, run_local};

// Test the source code included in the README.
#[macro_use]
extern crate doc_comment;
doctest!("../README.md");
