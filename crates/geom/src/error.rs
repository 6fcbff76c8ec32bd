use thiserror::Error;

/// The error type shared by the shape model and the generators.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MsdfError {
    /// An argument is outside of the domain of the operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An index does not refer to an existing element.
    #[error("Index {index} is out of bounds (length {len})")]
    OutOfBounds { index: usize, len: usize },
    /// An internal inconsistency.
    #[error("Unknown error: {0}")]
    Unknown(&'static str),
}

pub type MsdfResult<T> = Result<T, MsdfError>;

impl MsdfError {
    /// Returns `OutOfBounds` unless `index < len`.
    #[inline]
    pub fn check_index(index: usize, len: usize) -> MsdfResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(MsdfError::OutOfBounds { index, len })
        }
    }
}

#[test]
fn error_messages() {
    assert_eq!(
        MsdfError::OutOfBounds { index: 3, len: 2 }.to_string(),
        "Index 3 is out of bounds (length 2)"
    );
    assert_eq!(
        MsdfError::InvalidArgument("empty shape").to_string(),
        "Invalid argument: empty shape"
    );
    assert!(MsdfError::check_index(1, 2).is_ok());
    assert_eq!(
        MsdfError::check_index(2, 2),
        Err(MsdfError::OutOfBounds { index: 2, len: 2 })
    );
}
