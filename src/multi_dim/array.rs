use core::fmt;
use core::mem;
use core::ops;
use core::slice;

use super::shape;
use crate::DynBuf;
use crate::alloc::AltAllocator;
use crate::alloc::Global;
use crate::types::BufErr;
use crate::types::BufResult;

/// A dense array with `D` dimensions, stored row-major in a single `DynBuf`.
///
/// The rank is part of the type while the extents are chosen at runtime by
/// `reshape`. A new array has every extent at zero and holds nothing.
///
/// ```text
/// MultiDim<i32, 2> reshaped to [2, 3]
///
///            j=0 j=1 j=2
///   i=0   [   0,  1,  2,
///   i=1      10, 11, 12 ]   <- bound([1]) is this row
/// ```
pub struct MultiDim<T, const D: usize, A: AltAllocator = Global> {
    buf:     DynBuf<T, A, usize>,
    extents: [usize; D],
}

impl<T, const D: usize> MultiDim<T, D> {
    pub const fn new() -> Self {
        return Self::new_in(Global);
    }
}

impl<T, const D: usize, A: AltAllocator> MultiDim<T, D, A> {
    pub const fn new_in(alloc: A) -> Self {
        const { assert!(D > 0, "a MultiDim needs at least one dimension") };
        return Self {
            buf:     DynBuf::new_in(alloc),
            extents: [0; D],
        };
    }

    /// Sets new extents and refills the array with `T::default()`.
    ///
    /// The previous contents are dropped, nothing is carried over.
    pub fn reshape(&mut self, extents: [usize; D]) -> BufResult<()>
    where
        T: Default,
    {
        return self.reshape_with(extents, T::default);
    }

    /// Sets new extents and refills the array with values from `fill`, in
    /// row-major order.
    ///
    /// The previous contents are dropped, nothing is carried over. On error, or
    /// when `fill` panics, the array is left empty with every extent at zero.
    pub fn reshape_with<F: FnMut() -> T>(&mut self, extents: [usize; D], fill: F) -> BufResult<()> {
        let total = shape::volume(&extents)?;
        self.buf.clear();
        self.extents = [0; D];

        let guard = ClearOnDrop(&mut self.buf);
        guard.0.resize_with(total, fill)?;
        mem::forget(guard);
        self.extents = extents;
        log::trace!("reshaped {}-d array to {:?} ({} elements)", D, extents, total);
        return Ok(());
    }

    #[inline]
    pub const fn rank(&self) -> usize {
        return D;
    }

    #[inline]
    pub const fn extents(&self) -> &[usize; D] {
        return &self.extents;
    }

    pub fn extent(&self, dim: usize) -> BufResult<usize> {
        let Some(&ext) = self.extents.get(dim) else {
            return Err(BufErr::out_of_range());
        };
        return Ok(ext);
    }

    /// Flat distance between neighbours along each dimension.
    pub fn strides(&self) -> [usize; D] {
        return shape::strides(&self.extents);
    }

    pub fn stride(&self, dim: usize) -> BufResult<usize> {
        if dim >= D {
            return Err(BufErr::out_of_range());
        }
        return Ok(shape::suffix_volume(&self.extents, dim + 1));
    }

    /// Total element count, the product of the extents.
    #[inline]
    pub const fn len(&self) -> usize {
        return self.buf.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.buf.is_empty();
    }

    #[inline]
    pub const fn allocator(&self) -> &A {
        return self.buf.allocator();
    }

    /// Flat offset of `index`, or `OutOfRange` for the first dimension whose
    /// index is not below its extent.
    pub fn offset(&self, index: [usize; D]) -> BufResult<usize> {
        return shape::flat_offset(&self.extents, &index);
    }

    pub fn at(&self, index: [usize; D]) -> BufResult<&T> {
        let offset = self.offset(index)?;
        return self.buf.at(offset);
    }

    pub fn at_mut(&mut self, index: [usize; D]) -> BufResult<&mut T> {
        let offset = self.offset(index)?;
        return self.buf.at_mut(offset);
    }

    /// Flat offset of the sub-block addressed by the `K` leading indices in
    /// `prefix`. `K` must be less than the rank.
    pub fn bound_offset<const K: usize>(&self, prefix: [usize; K]) -> BufResult<usize> {
        const { assert!(K < D, "bound takes fewer indices than the rank") };
        return shape::prefix_offset(&self.extents, &prefix);
    }

    /// The contiguous sub-block addressed by the `K` leading indices in `prefix`.
    ///
    /// On a `[2, 3, 4]` array `bound([i])` is the 12 elements starting at
    /// `12 * i` and `bound([i, j])` the 4 elements starting at `12 * i + 4 * j`.
    /// An empty prefix is the whole array.
    pub fn bound<const K: usize>(&self, prefix: [usize; K]) -> BufResult<&[T]> {
        let start = self.bound_offset(prefix)?;
        let end = start + shape::suffix_volume(&self.extents, K);
        return Ok(&self.buf.as_slice()[start..end]);
    }

    pub fn bound_mut<const K: usize>(&mut self, prefix: [usize; K]) -> BufResult<&mut [T]> {
        let start = self.bound_offset(prefix)?;
        let end = start + shape::suffix_volume(&self.extents, K);
        return Ok(&mut self.buf.as_mut_slice()[start..end]);
    }

    /// Every element in storage order, which is row-major order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        return self.buf.iter();
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        return self.buf.iter_mut();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        return self.buf.as_slice();
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        return self.buf.as_mut_slice();
    }

    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        return self.buf.as_ptr();
    }

    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        return self.buf.as_mut_ptr();
    }

    /// Deep copy of this array, with its storage taken from `alloc`.
    pub fn try_clone_in<B: AltAllocator>(&self, alloc: B) -> BufResult<MultiDim<T, D, B>>
    where
        T: Clone,
    {
        return Ok(MultiDim {
            buf:     self.buf.try_clone_in(alloc)?,
            extents: self.extents,
        });
    }

    /// Move assignment that keeps this array's allocator, following the same
    /// rules as `DynBuf::assign_from`.
    pub fn assign_from(&mut self, other: Self) -> BufResult<()>
    where
        A: PartialEq,
    {
        let Self { buf, extents } = other;
        self.buf.assign_from(buf)?;
        self.extents = extents;
        return Ok(());
    }
}

/// Empties the buffer it borrows unless forgotten, so a fill that errors or
/// panics half way never leaves elements behind zero extents.
struct ClearOnDrop<'a, T, A: AltAllocator>(&'a mut DynBuf<T, A, usize>);

impl<T, A: AltAllocator> Drop for ClearOnDrop<'_, T, A> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl<T, const D: usize, A: AltAllocator> ops::Index<[usize; D]> for MultiDim<T, D, A> {
    type Output = T;

    fn index(&self, index: [usize; D]) -> &T {
        return match self.offset(index) {
            Ok(offset) => &self.buf[offset],
            Err(_) => panic!("index {:?} is out of range for extents {:?}", index, self.extents),
        };
    }
}

impl<T, const D: usize, A: AltAllocator> ops::IndexMut<[usize; D]> for MultiDim<T, D, A> {
    fn index_mut(&mut self, index: [usize; D]) -> &mut T {
        return match self.offset(index) {
            Ok(offset) => &mut self.buf[offset],
            Err(_) => panic!("index {:?} is out of range for extents {:?}", index, self.extents),
        };
    }
}

impl<'a, T, const D: usize, A: AltAllocator> IntoIterator for &'a MultiDim<T, D, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}

impl<'a, T, const D: usize, A: AltAllocator> IntoIterator for &'a mut MultiDim<T, D, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter_mut();
    }
}

impl<T: Clone, const D: usize, A: AltAllocator + Clone> Clone for MultiDim<T, D, A> {
    /// # Panics
    /// Panics if the allocator can't provide storage for the copy.
    fn clone(&self) -> Self {
        return Self {
            buf:     self.buf.clone(),
            extents: self.extents,
        };
    }
}

impl<T: fmt::Debug, const D: usize, A: AltAllocator> fmt::Debug for MultiDim<T, D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("MultiDim")
            .field("extents", &self.extents)
            .field("data", &self.buf)
            .finish();
    }
}

impl<T, const D: usize> Default for MultiDim<T, D> {
    fn default() -> Self {
        return Self::new();
    }
}
