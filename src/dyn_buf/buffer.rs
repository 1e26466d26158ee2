use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops;
use core::ptr;
use core::slice;

use super::inner::Inner;
use crate::alloc::AltAllocator;
use crate::alloc::Global;
use crate::types::BufErr;
use crate::types::BufResult;
use crate::types::ErrorReason;
use crate::types::LengthType;

/// An owning, contiguous, growable buffer whose storage comes from the allocator `A`
/// and whose length and capacity are stored as `L`.
///
/// The first append into an empty buffer reserves 128 slots, every following
/// append into a full buffer doubles the capacity. Allocation failures are
/// returned as errors.
///
/// Removal is unstable: `erase_unstable` fills the hole with the last element,
/// so it runs in O(1) but does not keep the order of the remaining elements.
pub struct DynBuf<T, A: AltAllocator = Global, L: LengthType = usize>
where
    usize: TryFrom<L>,
{
    inner: Inner<A, L>,
    _ph:   PhantomData<T>,
}

unsafe impl<T: Send, A: AltAllocator + Send, L: LengthType + Send> Send for DynBuf<T, A, L> where usize: TryFrom<L> {}
unsafe impl<T: Sync, A: AltAllocator + Sync, L: LengthType + Sync> Sync for DynBuf<T, A, L> where usize: TryFrom<L> {}

impl<T> DynBuf<T> {
    /// Creates an empty buffer using the global allocator. Nothing is allocated
    /// until the first element is inserted.
    pub const fn new() -> Self {
        return Self::new_in(Global);
    }

    pub fn with_capacity(capacity: usize) -> BufResult<Self> {
        return Self::with_capacity_in(Global, capacity);
    }

    pub fn from_elem(count: usize, value: &T) -> BufResult<Self>
    where
        T: Clone,
    {
        return Self::from_elem_in(Global, count, value);
    }
}

impl<T, A: AltAllocator, L: LengthType> DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    const LAYOUT: Layout = Layout::new::<T>();

    pub const fn new_in(alloc: A) -> Self {
        return Self {
            inner: Inner::new_in::<T>(alloc),
            _ph:   PhantomData,
        };
    }

    pub fn with_capacity_in(alloc: A, capacity: L) -> BufResult<Self> {
        let mut ret = Self::new_in(alloc);
        ret.reserve(capacity)?;
        return Ok(ret);
    }

    /// Creates a buffer holding `count` clones of `value`.
    pub fn from_elem_in(alloc: A, count: L, value: &T) -> BufResult<Self>
    where
        T: Clone,
    {
        let mut ret = Self::with_capacity_in(alloc, count)?;
        ret.resize_with(count, || value.clone())?;
        return Ok(ret);
    }

    /// The number of live elements.
    #[inline]
    pub const fn len(&self) -> L {
        return self.inner.length;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.inner.length == L::ZERO_VALUE;
    }

    /// The number of allocated slots, live or not.
    #[inline]
    pub fn capacity(&self) -> L {
        return self.inner.capacity(size_of::<T>());
    }

    #[inline]
    pub const fn allocator(&self) -> &A {
        return &self.inner.alloc;
    }

    /// Ensures the capacity is at least `capacity`.
    ///
    /// This does nothing when the capacity is already large enough. Otherwise
    /// storage for exactly `capacity` elements is obtained, every element is
    /// moved over keeping its index, and the old storage is released. On error
    /// the buffer is left untouched.
    pub fn reserve(&mut self, capacity: L) -> BufResult<()> {
        return self.inner.reserve_exact(capacity, Self::LAYOUT);
    }

    /// Bounds checked access.
    pub fn at(&self, pos: L) -> BufResult<&T> {
        if pos >= self.inner.length {
            return Err(BufErr::out_of_range());
        }
        return Ok(unsafe { &*self.as_ptr().add(pos.as_usize()) });
    }

    /// Bounds checked mutable access.
    pub fn at_mut(&mut self, pos: L) -> BufResult<&mut T> {
        if pos >= self.inner.length {
            return Err(BufErr::out_of_range());
        }
        return Ok(unsafe { &mut *self.as_mut_ptr().add(pos.as_usize()) });
    }

    /// # Safety
    /// `pos` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, pos: L) -> &T {
        return unsafe { &*self.as_ptr().add(pos.as_usize()) };
    }

    /// # Safety
    /// `pos` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, pos: L) -> &mut T {
        return unsafe { &mut *self.as_mut_ptr().add(pos.as_usize()) };
    }

    /// Appends `item`, growing first when the buffer is full.
    ///
    /// Returns a reference to the slot the item now lives in.
    pub fn insert(&mut self, item: T) -> BufResult<&mut T> {
        return self.emplace_with(move || item);
    }

    /// Appends the value produced by `make`, building it directly in its slot.
    ///
    /// `make` is only called once there is room for the value, so a failed
    /// growth never constructs anything.
    pub fn emplace_with<F: FnOnce() -> T>(&mut self, make: F) -> BufResult<&mut T> {
        let len = self.inner.length;
        if len >= self.capacity() {
            self.inner.grow_amortized(Self::LAYOUT)?;
        }
        let Some(next) = len.checked_add(L::ONE_VALUE) else {
            return Err(BufErr::new(ErrorReason::CapacityOverflow));
        };

        let slot = unsafe { self.as_mut_ptr().add(len.as_usize()) };
        unsafe { ptr::write(slot, make()) };
        self.inner.length = next;
        return Ok(unsafe { &mut *slot });
    }

    pub fn pop(&mut self) -> Option<T> {
        let last = self.inner.length.checked_sub(L::ONE_VALUE)?;
        self.inner.length = last;
        return Some(unsafe { ptr::read(self.as_ptr().add(last.as_usize())) });
    }

    /// Removes the element at `pos` and returns it. The last element is moved
    /// into `pos`, so the order of the remaining elements is not kept.
    pub fn take_unstable(&mut self, pos: L) -> BufResult<T> {
        let Some(last) = self.inner.length.checked_sub(L::ONE_VALUE) else {
            return Err(BufErr::out_of_range());
        };
        if pos > last {
            return Err(BufErr::out_of_range());
        }
        return Ok(unsafe { self.swap_out(pos.as_usize(), last) });
    }

    /// Drops the element at `pos` and moves the last element into its slot.
    ///
    /// Returns the element now occupying `pos`, or `None` when `pos` was the
    /// last slot and nothing had to be moved.
    ///
    /// This is O(1) and does not preserve the relative order of the remaining
    /// elements.
    pub fn erase_unstable(&mut self, pos: L) -> BufResult<Option<&mut T>> {
        drop(self.take_unstable(pos)?);
        if pos >= self.inner.length {
            return Ok(None);
        }
        return Ok(Some(unsafe { &mut *self.as_mut_ptr().add(pos.as_usize()) }));
    }

    /// Drops every element for which `pred` returns true, using `erase_unstable`.
    ///
    /// Runs in O(n). The order of the surviving elements is unspecified.
    pub fn erase_unstable_if<F: FnMut(&T) -> bool>(&mut self, mut pred: F) {
        let mut pos = 0;
        while let Some(last) = self.inner.length.checked_sub(L::ONE_VALUE) {
            if pos > last.as_usize() {
                break;
            }
            // The element moved into `pos` is tested on the next round.
            if pred(unsafe { &*self.as_ptr().add(pos) }) {
                drop(unsafe { self.swap_out(pos, last) });
            } else {
                pos += 1;
            }
        }
    }

    /// Drops every element, the capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(L::ZERO_VALUE);
    }

    /// Shortens the buffer to `len` elements, dropping the rest.
    pub fn truncate(&mut self, len: L) {
        let old = self.inner.length;
        if len >= old {
            return;
        }
        // Shrink first so a panicking drop can't lead to a double drop.
        self.inner.length = len;
        let tail = unsafe { self.as_mut_ptr().add(len.as_usize()) };
        let count = old.as_usize() - len.as_usize();
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail, count)) };
    }

    /// Resizes to `len` elements. Extra elements are dropped, missing ones are
    /// filled with values returned by `fill`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, len: L, mut fill: F) -> BufResult<()> {
        if len <= self.inner.length {
            self.truncate(len);
            return Ok(());
        }
        self.reserve(len)?;
        while self.inner.length < len {
            self.emplace_with(&mut fill)?;
        }
        return Ok(());
    }

    /// Appends a clone of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> BufResult<()>
    where
        T: Clone,
    {
        let Ok(extra) = L::try_from(items.len()) else {
            return Err(BufErr::new(ErrorReason::CapacityOverflow));
        };
        let Some(total) = self.inner.length.checked_add(extra) else {
            return Err(BufErr::new(ErrorReason::CapacityOverflow));
        };
        self.reserve(total)?;
        for item in items {
            self.emplace_with(|| item.clone())?;
        }
        return Ok(());
    }

    /// Deep copy of this buffer, with its storage taken from `alloc`.
    pub fn try_clone_in<B: AltAllocator>(&self, alloc: B) -> BufResult<DynBuf<T, B, L>>
    where
        T: Clone,
    {
        let mut ret = DynBuf::with_capacity_in(alloc, self.inner.length)?;
        ret.extend_from_slice(self.as_slice())?;
        return Ok(ret);
    }

    /// Copy assignment. The elements of `source` are cloned into this buffer,
    /// which keeps its own allocator.
    ///
    /// Room is reserved before anything is dropped, so on `AllocFailure` this
    /// buffer keeps its previous contents.
    pub fn try_assign_clone<B: AltAllocator>(&mut self, source: &DynBuf<T, B, L>) -> BufResult<()>
    where
        T: Clone,
    {
        self.reserve(source.len())?;
        self.clear();
        return self.extend_from_slice(source.as_slice());
    }

    /// Move assignment that keeps this buffer's allocator.
    ///
    /// When both allocators compare equal the storage of `other` is taken over
    /// directly. Otherwise the elements are moved into storage obtained from this
    /// buffer's allocator, and `other` releases its storage through its own.
    ///
    /// On error this buffer keeps its previous contents and `other` is dropped.
    pub fn assign_from(&mut self, mut other: Self) -> BufResult<()>
    where
        A: PartialEq,
    {
        if self.inner.alloc == other.inner.alloc {
            self.clear();
            self.inner.swap_storage(&mut other.inner);
            return Ok(());
        }

        self.reserve(other.inner.length)?;
        self.clear();
        let count = other.inner.length.as_usize();
        unsafe { ptr::copy_nonoverlapping(other.as_ptr(), self.as_mut_ptr(), count) };
        self.inner.length = other.inner.length;
        other.inner.length = L::ZERO_VALUE;
        return Ok(());
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        return unsafe { slice::from_raw_parts(self.as_ptr(), self.inner.length.as_usize()) };
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        return unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.inner.length.as_usize()) };
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        return self.as_slice().iter();
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        return self.as_mut_slice().iter_mut();
    }

    /// Pointer to the first slot. Dangling while nothing is allocated.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        return self.inner.get_ptr();
    }

    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        return self.inner.get_ptr();
    }

    /// Reads the element at `pos` out and fills the hole with the last element.
    ///
    /// # Safety
    /// `last` must be `len() - 1` and `pos` must not be greater than `last`.
    unsafe fn swap_out(&mut self, pos: usize, last: L) -> T {
        let base = self.as_mut_ptr();
        let end = last.as_usize();
        let ret = unsafe { ptr::read(base.add(pos)) };
        if pos != end {
            unsafe { ptr::copy_nonoverlapping(base.add(end), base.add(pos), 1) };
        }
        self.inner.length = last;
        return ret;
    }
}

impl<T, A: AltAllocator, L: LengthType> Drop for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    fn drop(&mut self) {
        self.clear();
        unsafe { self.inner.release(Self::LAYOUT) };
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::Deref for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    type Target = [T];

    fn deref(&self) -> &[T] {
        return self.as_slice();
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::DerefMut for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    fn deref_mut(&mut self) -> &mut [T] {
        return self.as_mut_slice();
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::Index<L> for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    type Output = T;

    fn index(&self, index: L) -> &T {
        let idx = usize::try_from(index).unwrap_or(usize::MAX);
        return &self.as_slice()[idx];
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::IndexMut<L> for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    fn index_mut(&mut self, index: L) -> &mut T {
        let idx = usize::try_from(index).unwrap_or(usize::MAX);
        return &mut self.as_mut_slice()[idx];
    }
}

impl<'a, T, A: AltAllocator, L: LengthType> IntoIterator for &'a DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}

impl<'a, T, A: AltAllocator, L: LengthType> IntoIterator for &'a mut DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter_mut();
    }
}

impl<T: Clone, A: AltAllocator + Clone, L: LengthType> Clone for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    /// # Panics
    /// Panics if the allocator can't provide storage for the copy.
    fn clone(&self) -> Self {
        return match self.try_clone_in(self.inner.alloc.clone()) {
            Ok(ret) => ret,
            Err(e) => panic!("DynBuf clone failed: {e}"),
        };
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.try_assign_clone(source) {
            panic!("DynBuf clone failed: {e}");
        }
    }
}

impl<T: fmt::Debug, A: AltAllocator, L: LengthType> fmt::Debug for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

impl<T: PartialEq, A: AltAllocator, B: AltAllocator, L: LengthType> PartialEq<DynBuf<T, B, L>> for DynBuf<T, A, L>
where
    usize: TryFrom<L>,
{
    fn eq(&self, other: &DynBuf<T, B, L>) -> bool {
        return self.as_slice() == other.as_slice();
    }
}

impl<T: Eq, A: AltAllocator, L: LengthType> Eq for DynBuf<T, A, L> where usize: TryFrom<L> {}

impl<T> Default for DynBuf<T> {
    fn default() -> Self {
        return Self::new();
    }
}
