//! The two AFEs the maximum is built from.
//!
//! The Max-AFE encodes a secret `s` in `[0, b)` as the threshold vector whose
//! bit `i` is set iff `s <= i`. The maximum of a batch is the first index at
//! which every client's bit is set, i.e. the first index at which the AND of
//! all threshold vectors is one. The And-AFE makes that AND computable under
//! XOR secret sharing: a set bit becomes an all-zero block of `lam` bits and
//! an unset bit a uniformly random block, so that the XOR of a row over all
//! clients is zero exactly when every client's bit was set, except with
//! probability `2^-lam`.

mod and;
mod max;

pub use and::AndAfe;
pub use max::MaxAfe;
