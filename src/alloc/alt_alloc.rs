use core::alloc::Layout;
use core::ptr::NonNull;

use super::AllocError;

/// The allocation capability used by `DynBuf` and `MultiDim`.
///
/// The rust allocator API is not stable yet, so this trait stands in for it in
/// a no_std environment. It is a subset of the unstable `Allocator` trait, holding
/// only what a growable buffer needs: obtaining a block, moving to a bigger block
/// and handing a block back. Element construction and destruction are done by the
/// containers themselves, the allocator only ever sees raw bytes.
///
/// This mirrors the safety requirements of the allocator API:
/// <https://doc.rust-lang.org/std/alloc/trait.Allocator.html>
///
/// Two instances of the same allocator type that compare equal (when the type
/// implements `PartialEq`) must be able to free each other's memory. The
/// `assign_from` methods rely on this to hand storage over between containers.
pub unsafe trait AltAllocator {
    /// Allocates a chunk of memory with the given layout.
    ///
    /// On success it returns a pointer to the allocated memory, which may be
    /// larger than requested. If the allocation fails or has some kinda of error
    /// it will return an `AllocError`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Deallocates the chunk of memory pointed at by `ptr`
    ///
    /// This memory must have only been allocated by this allocator (or one that
    /// compares equal to it). The layout must match the layout provided when the
    /// chunk was allocated.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Moves the memory pointed at by `old_ptr` into a block fitting `new_layout`.
    ///
    /// The new layout must be at least as large as the old one and have the
    /// same alignment. The first `old_layout.size()` bytes are carried over.
    ///
    /// If this fails `old_ptr` is still valid and untouched. If it succeeds
    /// `old_ptr` is no longer valid, and the ptr returned must be used instead.
    ///
    /// The default implementation allocates a fresh block, copies the old bytes
    /// over and frees the old block.
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let new = self.allocate(new_layout)?;
        let ptr = new.cast::<u8>();

        unsafe { ptr.copy_from_nonoverlapping(old_ptr, old_layout.size()) };
        unsafe { self.deallocate(old_ptr, old_layout) };
        return Ok(new);
    }
}
