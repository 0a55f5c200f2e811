//! Aggregation of shares by the servers, and of server aggregates by the
//! leader.
//!
//! Both steps are XOR reductions: commutative, associative, with the all-zero
//! matrix as identity. They can be computed incrementally with an
//! [`Aggregator`] or in one go with [`Aggregate`].

mod leader;
mod server;

pub use leader::{FinalAggregate, LeaderAggregator};
pub use server::{ServerAggregate, ServerAggregator};

use crate::Result;
use afe_math::bits::BitMatrix;
use rayon::prelude::*;

/// Aggregate shares in an MPC protocol.
pub trait Aggregate<S>: Sized {
    /// Aggregate shares in an MPC protocol.
    fn from_shares<T>(iter: T) -> Result<Self>
    where
        T: IntoIterator<Item = S>;
}

/// Incremental aggregation, one input at a time.
///
/// Every server of a run is its own instance; instances never share state.
pub trait Aggregator {
    /// What is folded in.
    type Input;
    /// What the aggregation produces.
    type Output;

    /// Fold one input into the running aggregate. The input is not retained.
    fn absorb(&mut self, input: Self::Input) -> Result<()>;

    /// Complete the aggregation.
    fn finish(self) -> Result<Self::Output>;
}

/// XOR a parallel stream of `rows × cols` matrices; the empty stream yields
/// the all-zero matrix.
pub(crate) fn xor_reduce<'a, I>(matrices: I, (rows, cols): (usize, usize)) -> BitMatrix
where
    I: ParallelIterator<Item = &'a BitMatrix>,
{
    matrices
        .fold(
            || BitMatrix::zeros(rows, cols),
            |mut acc, matrix| {
                acc ^= matrix;
                acc
            },
        )
        .reduce(
            || BitMatrix::zeros(rows, cols),
            |mut acc, partial| {
                acc ^= &partial;
                acc
            },
        )
}
