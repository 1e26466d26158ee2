//! # dimbuf
//!
//! The `dimbuf` crate provides two `#[no_std]` container primitives meant to be embedded in
//! numeric code that wants explicit control over where its memory comes from.
//!
//! `DynBuf` is a contiguous growable buffer much like `std::Vec`, but every allocation goes
//! through a pluggable allocator and allocation failures are returned as errors instead of
//! aborting. The first growth reserves 128 slots and every following growth doubles the
//! capacity. Removal is done with `erase_unstable`, which moves the last element into the hole,
//! so it is O(1) but does not keep the order of the remaining elements.
//!
//! `MultiDim` is a dense array whose rank is fixed by a const generic and whose extents are
//! set at runtime with `reshape`. It stores its elements in a single `DynBuf` in row-major
//! order (the last dimension varies fastest) and supports addressing whole sub-blocks with a
//! prefix of the indices through `bound`.
//!
//! The type used for the length and capacity of a `DynBuf` can be customized (e.g. `u16`),
//! which shrinks the buffer header for small buffers.
//!
//! Lastly, the allocator API is not stable yet, so this crate provides an alternate trait
//! `AltAllocator` that works like the `Allocator` trait and can be used with both containers.
//!
//! # Feature Flags
//! * `alloc_api2` - Implements `AltAllocator` for every type implementing the `Allocator`
//! trait from the `allocator-api2` crate.

#![no_std]

extern crate alloc as alloc_crate;

#[cfg(test)]
extern crate std;

pub mod alloc;
mod dyn_buf;
mod multi_dim;
pub mod types;

pub use dyn_buf::DynBuf;
pub use multi_dim::MultiDim;
