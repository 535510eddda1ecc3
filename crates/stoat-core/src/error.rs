use crate::shape::Shape;

/// All errors that can occur within the stoat core.
///
/// Every failure is a programming-contract violation surfaced synchronously at
/// the offending call: shape disagreements, bad multi-indices, and writes
/// through handles that do not own their buffer. Nothing here is transient,
/// so there is no retry machinery and no silent recovery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Flat data length disagrees with the declared shape at construction.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Two shapes cannot be unified under the broadcasting rule.
    #[error("shapes {lhs} and {rhs} are not broadcast-compatible")]
    BroadcastMismatch { lhs: Shape, rhs: Shape },

    /// `value()` called on a tensor with more than one element.
    #[error("not a scalar: tensor has shape {shape}")]
    NotAScalar { shape: Shape },

    /// A multi-index has the wrong number of components for the tensor's rank.
    #[error("rank mismatch: expected {expected} index components, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// A multi-index component is outside `[0, shape[k])`.
    #[error("index {index:?} out of bounds for shape {shape}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Shape },

    /// A dimension argument exceeds the tensor's rank.
    #[error("dimension out of range: dim {dim} for rank {rank}")]
    DimOutOfRange { dim: usize, rank: usize },

    /// Narrow/slice range falls outside the dimension.
    #[error("narrow out of bounds: dim {dim}, start {start}, len {len}, dim_size {dim_size}")]
    NarrowOutOfBounds {
        dim: usize,
        start: usize,
        len: usize,
        dim_size: usize,
    },

    /// Reshape target disagrees with the source element count.
    #[error("cannot reshape: source has {src} elements, target shape {dst_shape} has {dst}")]
    ReshapeElementMismatch {
        src: usize,
        dst: usize,
        dst_shape: Shape,
    },

    /// Inner dimensions disagree in a matrix product.
    #[error("matmul shape mismatch: [{m}x{k1}] @ [{k2}x{n}], inner dims must match")]
    MatmulShapeMismatch {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    /// Write attempted through a handle that does not own its buffer
    /// (a broadcast or slicing view).
    #[error("unsupported operation: write through a non-owning view of shape {shape}")]
    ReadOnlyView { shape: Shape },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
