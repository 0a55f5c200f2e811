//! XOR secret sharing of encodings between the aggregation servers.

mod share;
mod traits;
mod xor;

pub use share::Share;
pub use traits::SecretSharer;
pub use xor::XorSharing;
