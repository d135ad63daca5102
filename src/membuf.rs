//! Non-owning views of contiguous memory regions, the data-plane currency of every send and
//! receive call.
//!
//! A view is nothing more than a base address and an exact length. It never owns the memory it
//! describes; a phantom lifetime ties each view to its source storage so that the storage is
//! statically known to outlive every use of the view.

use std::marker::PhantomData;

/// A read-only view of a contiguous memory region.
#[derive(Copy, Clone, Debug)]
pub struct ConstMembuf<'a> {
    base: *const u8,
    len: usize,
    _source: PhantomData<&'a [u8]>,
}
impl<'a> ConstMembuf<'a> {
    /// Creates a view from a raw base address and length.
    ///
    /// # Safety
    /// If `base` is non-null, it must be valid for reads of `len` bytes for the duration of `'a`.
    /// A null `base` is permitted and is rejected with `EINVAL` by every operation consuming the
    /// view.
    #[inline]
    pub const unsafe fn from_raw_parts(base: *const u8, len: usize) -> Self {
        Self { base, len, _source: PhantomData }
    }
    /// Creates a view of an adapter type's memory.
    #[inline]
    pub fn new<T: AsMembuf + ?Sized>(source: &'a T) -> Self {
        Self { base: source.addr(), len: source.size(), _source: PhantomData }
    }
    /// The base address of the region.
    #[inline]
    pub const fn base(&self) -> *const u8 {
        self.base
    }
    /// The exact length of the region in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }
    /// Whether the region is zero-sized.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
impl<'a, T: AsMembuf + ?Sized> From<&'a T> for ConstMembuf<'a> {
    #[inline]
    fn from(source: &'a T) -> Self {
        Self::new(source)
    }
}

/// A mutable view of a contiguous memory region.
#[derive(Debug)]
pub struct Membuf<'a> {
    base: *mut u8,
    len: usize,
    _source: PhantomData<&'a mut [u8]>,
}
impl<'a> Membuf<'a> {
    /// Creates a view from a raw base address and length.
    ///
    /// # Safety
    /// If `base` is non-null, it must be valid for writes of `len` bytes for the duration of
    /// `'a`, and no other access to the region may overlap with uses of the view. A null `base`
    /// is permitted and is rejected with `EINVAL` by every operation consuming the view.
    #[inline]
    pub const unsafe fn from_raw_parts(base: *mut u8, len: usize) -> Self {
        Self { base, len, _source: PhantomData }
    }
    /// Creates a view of an adapter type's memory.
    #[inline]
    pub fn new<T: AsMembufMut + ?Sized>(source: &'a mut T) -> Self {
        Self { base: source.addr_mut(), len: source.size(), _source: PhantomData }
    }
    /// The base address of the region.
    #[inline]
    pub fn base(&self) -> *mut u8 {
        self.base
    }
    /// The exact length of the region in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }
    /// Whether the region is zero-sized.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
impl<'a, T: AsMembufMut + ?Sized> From<&'a mut T> for Membuf<'a> {
    #[inline]
    fn from(source: &'a mut T) -> Self {
        Self::new(source)
    }
}

/// Adapter for types whose in-memory representation can be read through a [`ConstMembuf`].
///
/// Implementing this for a third-party aggregate lets it be passed to the send operations
/// directly, with no per-call glue and no dynamic dispatch.
///
/// # Safety
/// `addr()` must return a pointer valid for reads of `size()` bytes for as long as the borrow
/// the view was created from lasts.
pub unsafe trait AsMembuf {
    /// The base address of the representation.
    fn addr(&self) -> *const u8;
    /// Its size in bytes.
    fn size(&self) -> usize;
}
/// Adapter for types whose memory can additionally be written through a [`Membuf`].
///
/// # Safety
/// `addr_mut()` must return a pointer valid for writes of `size()` bytes for as long as the
/// borrow the view was created from lasts.
pub unsafe trait AsMembufMut: AsMembuf {
    /// The base address of the representation, for writing.
    fn addr_mut(&mut self) -> *mut u8;
}

unsafe impl AsMembuf for [u8] {
    #[inline]
    fn addr(&self) -> *const u8 {
        self.as_ptr()
    }
    #[inline]
    fn size(&self) -> usize {
        self.len()
    }
}
unsafe impl AsMembufMut for [u8] {
    #[inline]
    fn addr_mut(&mut self) -> *mut u8 {
        self.as_mut_ptr()
    }
}

unsafe impl<const N: usize> AsMembuf for [u8; N] {
    #[inline]
    fn addr(&self) -> *const u8 {
        self.as_ptr()
    }
    #[inline]
    fn size(&self) -> usize {
        N
    }
}
unsafe impl<const N: usize> AsMembufMut for [u8; N] {
    #[inline]
    fn addr_mut(&mut self) -> *mut u8 {
        self.as_mut_ptr()
    }
}

// The view covers the initialized part of the vector, not its capacity.
unsafe impl AsMembuf for Vec<u8> {
    #[inline]
    fn addr(&self) -> *const u8 {
        self.as_ptr()
    }
    #[inline]
    fn size(&self) -> usize {
        self.len()
    }
}
unsafe impl AsMembufMut for Vec<u8> {
    #[inline]
    fn addr_mut(&mut self) -> *mut u8 {
        self.as_mut_ptr()
    }
}
