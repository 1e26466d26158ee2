use core::cmp;
use core::fmt;

/// This trait is used for letting you specify the type of the length and
/// capacity fields of a `DynBuf`, as well as its indexing operations.
/// If you have some other type that you want to use and behaves like an unsigned integer,
/// you can implement this trait for it.
///
/// It's marked as unsafe since your type must be continuous and ordered
/// under common operations such as addition and multiplication like integers,
/// and `as_usize` must be lossless for every value that `usize::try_from` accepts.
pub unsafe trait LengthType
where
    Self: Copy,
    Self: cmp::Ord,
    Self: fmt::Debug,
    Self: Sized,
    Self: From<u8>,
    Self: TryFrom<usize>,
    usize: TryFrom<Self>,
{
    const MAX_VALUE: Self;
    const ONE_VALUE: Self;
    const ZERO_VALUE: Self;

    /// Truncating conversion, only used on values already known to fit.
    fn as_usize(self) -> usize;
    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_length_type {
    ($typ:ty) => {
        unsafe impl LengthType for $typ {
            const MAX_VALUE: Self = Self::MAX;
            const ONE_VALUE: Self = 1;
            const ZERO_VALUE: Self = 0;

            #[inline(always)]
            fn as_usize(self) -> usize {
                return self as usize;
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                return self.checked_add(rhs);
            }
            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                return self.checked_sub(rhs);
            }
            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                return self.checked_mul(rhs);
            }
        }
    };
}

impl_length_type!(usize);
impl_length_type!(u8);
impl_length_type!(u16);
impl_length_type!(u32);
impl_length_type!(u64);
impl_length_type!(u128);
