//! Family-parameterized socket addresses.
//!
//! A [`SockAddr`] is a raw, kernel-convention address encoding tagged at compile time with the
//! [`Family`] it belongs to. The tag keeps sockets and addresses of different families from ever
//! meeting at runtime: `Socket<Unix>` operations only accept `SockAddr<Unix>`, with no dynamic
//! checks anywhere.
//!
//! Caller-facing constructors live on the per-family specializations:
//! [`SockAddr::<Unix>::from_path()`], [`SockAddr::<Ipv4>::from_parts()`] and
//! [`SockAddr::<Ipv6>::from_parts()`], plus `From` conversions from the standard library's
//! `SocketAddrV4`/`SocketAddrV6`.

mod ipv4;
mod ipv6;
mod unix;

pub use unix::MAX_PATH_LEN;

use libc::{sa_family_t, sockaddr, sockaddr_storage, socklen_t};
use std::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    mem::{size_of, zeroed},
    ptr, slice,
};

mod sealed {
    pub trait Sealed {}
}
pub(crate) use sealed::Sealed;

/// Compile-time selector of an address family.
///
/// This trait is sealed and implemented exactly three times, by [`Unix`], [`Ipv4`] and [`Ipv6`].
pub trait Family: Sealed + 'static {
    /// The `AF_*` domain constant passed to `socket(2)` and stored in encoded addresses.
    const DOMAIN: libc::c_int;
    /// The maximum encoded address size for this family, used to pre-size the buffer handed to
    /// kernel-filled-address operations.
    const MAX_LEN: socklen_t;
    /// Human-readable family name, for diagnostics.
    const NAME: &'static str;
}

/// Family tag for local, filesystem-path-based addressing (`AF_UNIX`).
#[derive(Copy, Clone, Debug)]
pub enum Unix {}
/// Family tag for Internet Protocol version 4 addressing (`AF_INET`).
#[derive(Copy, Clone, Debug)]
pub enum Ipv4 {}
/// Family tag for Internet Protocol version 6 addressing (`AF_INET6`).
#[derive(Copy, Clone, Debug)]
pub enum Ipv6 {}

impl Sealed for Unix {}
impl Sealed for Ipv4 {}
impl Sealed for Ipv6 {}

/// A socket address encoded the way the kernel expects it, tagged with its family.
///
/// Defaults to an empty, invalid value. It becomes valid either through one of the per-family
/// constructors or by being filled in by an address-discovering operation
/// ([`accept_with_addr`](crate::Socket::accept_with_addr),
/// [`recv_from`](crate::Socket::recv_from)), which records the length the kernel actually wrote.
pub struct SockAddr<F: Family> {
    storage: sockaddr_storage,
    len: socklen_t,
    _family: PhantomData<F>,
}

impl<F: Family> SockAddr<F> {
    /// Creates an empty, invalid address with the family field pre-set.
    pub fn new() -> Self {
        let mut storage: sockaddr_storage = unsafe {
            // SAFETY: sockaddr_storage only contains integer fields
            zeroed()
        };
        storage.ss_family = F::DOMAIN as sa_family_t;
        Self { storage, len: 0, _family: PhantomData }
    }

    /// Whether the stored encoding is a well-formed address of this family.
    ///
    /// An address is valid once a constructor or an address-discovering operation has populated
    /// it; a default-constructed one is not. [`bind`](crate::Socket::bind) refuses invalid
    /// addresses with `EINVAL` before touching the kernel.
    pub fn is_valid(&self) -> bool {
        (self.len as usize) >= size_of::<sa_family_t>()
            && self.len <= F::MAX_LEN
            && self.storage.ss_family == F::DOMAIN as sa_family_t
    }

    /// The current encoded length in bytes. Zero for an empty address; never exceeds
    /// [`F::MAX_LEN`](Family::MAX_LEN) otherwise.
    #[inline]
    pub fn len(&self) -> socklen_t {
        self.len
    }
    /// Whether the encoding is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw encoded bytes, up to the current length.
    pub fn as_bytes(&self) -> &[u8] {
        let len = (self.len as usize).min(size_of::<sockaddr_storage>());
        unsafe {
            // SAFETY: the storage is always fully initialized and len is clamped to its size
            slice::from_raw_parts(ptr::addr_of!(self.storage).cast::<u8>(), len)
        }
    }

    pub(crate) fn as_sockaddr_ptr(&self) -> *const sockaddr {
        ptr::addr_of!(self.storage).cast()
    }
    pub(crate) fn as_sockaddr_ptr_mut(&mut self) -> *mut sockaddr {
        ptr::addr_of_mut!(self.storage).cast()
    }
    /// Records the length the kernel reported for a discovered address. Only the
    /// kernel-filled-address operations call this.
    pub(crate) fn set_len(&mut self, len: socklen_t) {
        debug_assert!(
            len <= F::MAX_LEN,
            "kernel reported an address longer than the family maximum"
        );
        self.len = len;
    }
}

impl<F: Family> Default for SockAddr<F> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
// Manual impls to avoid the unnecessary `F: Clone`/`F: Copy` bounds a derive would add.
impl<F: Family> Copy for SockAddr<F> {}
impl<F: Family> Clone for SockAddr<F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}
impl<F: Family> PartialEq for SockAddr<F> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl<F: Family> Eq for SockAddr<F> {}

impl<F: Family> Debug for SockAddr<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SockAddr")
            .field("family", &F::NAME)
            .field("len", &self.len)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}
