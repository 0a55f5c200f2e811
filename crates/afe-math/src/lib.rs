#![crate_name = "afe_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical utilities for the afe.rs library.
//!
//! Every aggregate in the Max-AFE protocol lives in GF(2): encodings, shares
//! and aggregates are bit matrices, and addition is XOR.

mod errors;

pub mod bits;

pub use errors::{Error, Result};
