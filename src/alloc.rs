//! Contains the allocator types and traits used by `DynBuf` and `MultiDim`. The most important
//! being the `AltAllocator` trait, and the `AllocError` type.
//!
//! A wrapper called `Global` around the global allocator of the `alloc` crate is always
//! provided, it is the default allocator of both containers.
//!
//! If the `alloc_api2` feature is enabled, the `AltAllocator` trait is implemented for types
//! that implement the `allocator-api2` `Allocator` trait.

#[cfg(feature = "alloc_api2")]
mod alloc_api2;
mod alt_alloc;
mod global;

use core::error::Error;
use core::fmt;

pub use alt_alloc::AltAllocator;
pub use global::Global;

/// This indicates some sort of memory allocation error for the alt allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllocError;

impl Error for AllocError {}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("A memory allocation error occurred.")
    }
}
