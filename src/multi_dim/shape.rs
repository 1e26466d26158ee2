//! Row-major shape arithmetic over a fixed number of extents.
//!
//! The last dimension varies fastest, so the stride of dimension `d` is the
//! product of every extent after it:
//!
//! ```text
//! extents [2, 3, 4]
//! strides [12, 4, 1]
//! offset of [i, j, k] = (i * 3 + j) * 4 + k = 12i + 4j + k
//! ```

use crate::types::BufErr;
use crate::types::BufResult;
use crate::types::ErrorReason;

/// Total element count of `extents`.
///
/// Every suffix product (every stride) must fit a `usize` too, not only the
/// total, so `[0, usize::MAX, 2]` is rejected even though it holds nothing.
pub(crate) fn volume<const D: usize>(extents: &[usize; D]) -> BufResult<usize> {
    let mut total: usize = 1;
    for &ext in extents.iter().rev() {
        let Some(next) = total.checked_mul(ext) else {
            return Err(BufErr::new(ErrorReason::UsizeOverflow));
        };
        total = next;
    }
    return Ok(total);
}

/// Product of the extents from `from` to the last dimension. This is the
/// size of the sub-block addressed by a prefix of `from` indices.
///
/// Only called on extents that passed `volume`, so it can't overflow.
pub(crate) fn suffix_volume<const D: usize>(extents: &[usize; D], from: usize) -> usize {
    return extents[from..].iter().product();
}

pub(crate) fn strides<const D: usize>(extents: &[usize; D]) -> [usize; D] {
    let mut ret = [0; D];
    let mut acc = 1;
    for d in (0..D).rev() {
        ret[d] = acc;
        acc *= extents[d];
    }
    return ret;
}

/// Flat offset of a full index. Dimensions are checked left to right and the
/// first index that is not below its extent fails.
pub(crate) fn flat_offset<const D: usize>(extents: &[usize; D], index: &[usize; D]) -> BufResult<usize> {
    let mut offset = 0;
    for (&ext, &idx) in extents.iter().zip(index) {
        if idx >= ext {
            return Err(BufErr::out_of_range());
        }
        offset = offset * ext + idx;
    }
    return Ok(offset);
}

/// Flat offset of the first element of the sub-block addressed by the
/// leading indices in `prefix`.
pub(crate) fn prefix_offset<const D: usize, const K: usize>(
    extents: &[usize; D],
    prefix: &[usize; K],
) -> BufResult<usize> {
    let strides = strides(extents);
    let mut offset = 0;
    for ((&ext, &stride), &idx) in extents.iter().zip(&strides).zip(prefix) {
        if idx >= ext {
            return Err(BufErr::out_of_range());
        }
        offset += idx * stride;
    }
    return Ok(offset);
}
