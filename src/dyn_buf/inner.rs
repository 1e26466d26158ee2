use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;

use crate::alloc::AltAllocator;
use crate::types::BufErr;
use crate::types::BufResult;
use crate::types::ErrorReason;
use crate::types::LengthType;

/// Capacity handed out by the first growth of an empty buffer.
pub(crate) const MIN_GROWTH: u8 = 128;

const fn layout_array(layout: Layout, length: usize) -> BufResult<Layout> {
    let lay = layout.pad_to_align();
    let Some(len) = length.checked_mul(lay.size()) else {
        return Err(BufErr::new(ErrorReason::UsizeOverflow));
    };
    let Ok(lay) = Layout::from_size_align(len, layout.align()) else {
        return Err(BufErr::new(ErrorReason::LayoutFailure));
    };
    return Ok(lay);
}

const fn dangling(align: usize) -> NonNull<u8> {
    // Alignments are never zero.
    return unsafe { NonNull::new_unchecked(align as *mut u8) };
}

/// The untyped half of a `DynBuf`: where the storage lives, how many slots are
/// live, how many are allocated, and who allocated them.
///
/// `Inner` never touches the elements. Every method that needs the element type
/// takes its `Layout` instead, so there is one copy of the growth code per
/// allocator and length type rather than one per element type.
pub(crate) struct Inner<A: AltAllocator, L: LengthType = usize>
where
    usize: TryFrom<L>,
{
    ptr:               NonNull<u8>,
    pub(crate) length: L,
    capacity:          L,
    pub(crate) alloc:  A,
}

impl<A: AltAllocator, L: LengthType> Inner<A, L>
where
    usize: TryFrom<L>,
{
    pub(crate) const fn new_in<T>(alloc: A) -> Self {
        return Self {
            ptr:      dangling(mem::align_of::<T>()),
            length:   L::ZERO_VALUE,
            capacity: L::ZERO_VALUE,
            alloc:    alloc,
        };
    }

    /// Zero sized types never allocate, so their capacity is the largest
    /// length both `L` and `usize` can describe.
    #[inline]
    pub(crate) fn capacity(&self, size: usize) -> L {
        if size == 0 {
            return match L::try_from(usize::MAX) {
                Ok(max) => max,
                Err(_) => L::MAX_VALUE,
            };
        }
        return self.capacity;
    }

    #[inline]
    pub(crate) const fn get_ptr<T>(&self) -> *mut T {
        return self.ptr.as_ptr().cast();
    }

    /// Makes sure at least `target` slots are allocated. When it has to grow,
    /// exactly `target` slots are requested.
    ///
    /// Existing bytes are carried over by the allocator's `grow`. If anything
    /// fails the storage is left exactly as it was.
    pub(crate) fn reserve_exact(&mut self, target: L, layout: Layout) -> BufResult<()> {
        if target <= self.capacity(layout.size()) {
            return Ok(());
        }
        let Ok(cap) = usize::try_from(target) else {
            return Err(BufErr::new(ErrorReason::UsizeOverflow));
        };
        let new_layout = layout_array(layout, cap)?;

        let ret = if self.capacity == L::ZERO_VALUE {
            self.alloc.allocate(new_layout)
        } else {
            // Can't fail, the current capacity was validated when it was allocated.
            let old_layout = layout_array(layout, self.capacity.as_usize())?;
            unsafe { self.alloc.grow(self.ptr, old_layout, new_layout) }
        };
        let Ok(ptr) = ret else {
            log::debug!("failed to reserve {:?} slots of {} bytes", target, layout.size());
            return Err(BufErr::new(ErrorReason::AllocFailure));
        };

        log::trace!("reallocated buffer: {:?} -> {:?} slots", self.capacity, target);
        self.ptr = ptr.cast();
        self.capacity = target;
        return Ok(());
    }

    /// Growth step for appends, called once the buffer is full.
    ///
    /// Empty buffers jump to `MIN_GROWTH` slots, full ones double. If doubling
    /// does not fit `L` the capacity saturates at `L`'s maximum.
    pub(crate) fn grow_amortized(&mut self, layout: Layout) -> BufResult<()> {
        let cap = self.capacity(layout.size());
        if cap == L::MAX_VALUE {
            return Err(BufErr::new(ErrorReason::CapacityOverflow));
        }
        let next = if cap == L::ZERO_VALUE {
            L::from(MIN_GROWTH)
        } else {
            cap.checked_mul(L::from(2u8)).unwrap_or(L::MAX_VALUE)
        };
        return self.reserve_exact(next, layout);
    }

    /// Exchanges storage with `other`, each side keeps its own allocator.
    ///
    /// Only sound when both allocators can free each other's memory.
    pub(crate) fn swap_storage(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.length, &mut other.length);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Frees the storage, leaving an empty buffer behind.
    ///
    /// # Safety
    /// Every live element must already have been dropped or moved out, and
    /// `layout` must be the element layout used for every earlier call.
    pub(crate) unsafe fn release(&mut self, layout: Layout) {
        let ptr = mem::replace(&mut self.ptr, dangling(layout.align()));
        let cap = mem::replace(&mut self.capacity, L::ZERO_VALUE);
        self.length = L::ZERO_VALUE;

        if layout.size() == 0 || cap == L::ZERO_VALUE {
            return;
        }
        let Ok(old_layout) = layout_array(layout, cap.as_usize()) else {
            return;
        };
        unsafe { self.alloc.deallocate(ptr, old_layout) };
    }
}
