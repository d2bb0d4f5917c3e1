use thiserror::Error;

/// Errors raised when constructing a characteristic curve from loader output.
///
/// These are the only failures the core owns: a well-formed curve can never
/// fail at match time, so the invariants are checked once, here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A curve needs at least one sample to be meaningful.
    #[error("curve has no samples")]
    Empty,

    /// Samples must arrive sorted ascending by the independent variable.
    #[error("samples not sorted ascending at index {0}")]
    Unsorted(usize),
}
