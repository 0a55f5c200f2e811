use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Indicates an invalid shape between two bit matrices.
    #[error("Shape mismatch: expected {0:?}, found {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),

    /// Indicates an invalid length between two bit vectors.
    #[error("Length mismatch: expected {0}, found {1}")]
    LengthMismatch(usize, usize),

    /// Indicates a cell holding something other than 0 or 1.
    #[error("Non-binary value {value} at index {index}")]
    NonBinary {
        /// Row-major index of the offending cell.
        index: usize,
        /// The offending value.
        value: u8,
    },

    /// Indicates packed data of the wrong length.
    #[error("Invalid packed length: expected {0} bytes, found {1}")]
    InvalidPackedLength(usize, usize),

    /// Indicates packed data with set bits past the last cell.
    #[error("Non-zero padding bits in packed data")]
    NonZeroPadding,
}

#[cfg(test)]
mod tests {
    use crate::Error;

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::ShapeMismatch((2, 3), (3, 2)).to_string(),
            "Shape mismatch: expected (2, 3), found (3, 2)"
        );
        assert_eq!(
            Error::NonBinary { index: 4, value: 2 }.to_string(),
            "Non-binary value 2 at index 4"
        );
        assert_eq!(
            Error::InvalidPackedLength(3, 1).to_string(),
            "Invalid packed length: expected 3 bytes, found 1"
        );
    }
}
