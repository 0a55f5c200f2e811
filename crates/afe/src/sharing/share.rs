use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use afe_traits::AfeParametrized;
use std::sync::Arc;
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

/// One server's XOR share of a client's encoding.
///
/// The bits are zeroized when the share is dropped, so that a server keeps
/// nothing of a client once the share has been folded into its aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    #[zeroize(skip)]
    pub(crate) par: Arc<MaxAfeParameters>,
    #[zeroize(skip)]
    pub(crate) server_id: usize,
    pub(crate) matrix: BitMatrix,
}

impl Share {
    /// Create a share destined to `server_id` from its bits.
    ///
    /// Returns [`Error::MalformedShare`] if `server_id` is not a server of
    /// `par` or if `matrix` is not `b × lam`.
    pub fn new(server_id: usize, matrix: BitMatrix, par: &Arc<MaxAfeParameters>) -> Result<Self> {
        if server_id >= par.num_servers() {
            return Err(Error::invalid_server_id(server_id, par.num_servers()));
        }
        par.check_shape(&matrix)?;
        Ok(Self {
            par: par.clone(),
            server_id,
            matrix,
        })
    }

    /// The server this share is destined to.
    pub fn server_id(&self) -> usize {
        self.server_id
    }

    /// The bits of the share.
    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// The parameters the share was produced under.
    pub fn parameters(&self) -> &Arc<MaxAfeParameters> {
        &self.par
    }
}

impl AfeParametrized for Share {
    type Parameters = MaxAfeParameters;
}
