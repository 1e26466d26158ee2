use core::error::Error;
use core::fmt;

/// This enum lets one figure out what kind of error occurred during
/// a `DynBuf` or `MultiDim` operation.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// The requested capacity does not fit the length type.
    CapacityOverflow = 1,
    /// A size computation overflowed `usize`.
    UsizeOverflow,
    /// The byte size of the storage exceeds what a `Layout` can describe.
    LayoutFailure,
    /// The allocator refused the request.
    AllocFailure,
    /// An index was not strictly less than the length or extent it was checked against.
    OutOfRange,
}

/// A type alias for `Result<T, BufErr>`
pub type BufResult<T> = Result<T, BufErr>;

/// This is used to indicate an error during a `DynBuf` or `MultiDim` operation.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufErr(ErrorReason);

impl BufErr {
    pub(crate) const fn new(reason: ErrorReason) -> Self {
        return Self(reason);
    }

    pub(crate) const fn out_of_range() -> Self {
        return Self(ErrorReason::OutOfRange);
    }

    pub const fn reason(self) -> ErrorReason {
        return self.0;
    }
}

impl Error for BufErr {}

impl fmt::Display for BufErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorReason::CapacityOverflow => f.write_str("Capacity type overflowed."),
            ErrorReason::UsizeOverflow => f.write_str("usize overflowed."),
            ErrorReason::LayoutFailure => f.write_str("Failed to create layout."),
            ErrorReason::AllocFailure => f.write_str("An allocation failure occurred."),
            ErrorReason::OutOfRange => f.write_str("Index out of range."),
        }
    }
}
