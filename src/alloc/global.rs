use core::alloc::Layout;
use core::ptr::NonNull;

use alloc_crate::alloc;

use super::AllocError;
use super::AltAllocator;

/// A wrapper around the global allocator of the `alloc` crate.
///
/// See:
/// <https://doc.rust-lang.org/alloc/alloc/fn.alloc.html>
///
/// `Global` is stateless, every instance compares equal to every other one,
/// so storage can always be handed over between two containers using it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Global;

unsafe impl AltAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        // alloc::alloc() requires that the layout size be non-zero,
        // but the allocator API does not require this.
        if layout.size() == 0 {
            return Err(AllocError);
        }
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            log::debug!("global allocator refused {} bytes", layout.size());
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(ptr, layout.size()));
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }

    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        if new_layout.size() == 0 {
            return Err(AllocError);
        }
        // realloc() keeps the old alignment.
        if new_layout.align() != old_layout.align() {
            return Err(AllocError);
        }

        let new = unsafe { alloc::realloc(old_ptr.as_ptr(), old_layout, new_layout.size()) };
        let Some(new) = NonNull::new(new) else {
            log::debug!(
                "global allocator refused to grow {} bytes to {} bytes",
                old_layout.size(),
                new_layout.size()
            );
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(new, new_layout.size()));
    }
}
