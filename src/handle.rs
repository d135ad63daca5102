use std::{
    fmt::{self, Debug, Formatter},
    io,
    os::fd::{AsFd, BorrowedFd, OwnedFd},
    os::unix::io::{AsRawFd, FromRawFd, RawFd},
};

/// Owner of at most one OS resource descriptor.
///
/// A handle starts out unset, is set exactly once per acquisition by a resource-producing
/// operation, and releases the descriptor exactly once, either through [`close()`](Self::close)
/// or on drop. Closing an already-closed handle is a no-op.
pub struct Handle {
    fd: Option<OwnedFd>,
}
impl Handle {
    /// Creates a handle in the unset state.
    #[inline]
    pub const fn new() -> Self {
        Self { fd: None }
    }
    /// Whether a resource descriptor is currently held.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.fd.is_some()
    }
    /// Releases the descriptor if one is held and resets to the unset state. Idempotent.
    #[inline]
    pub fn close(&mut self) {
        self.fd = None;
    }

    /// Installs a freshly acquired descriptor.
    ///
    /// Only ever called on an unset handle; every acquisition path checks `is_open()` first.
    pub(crate) fn set(&mut self, fd: OwnedFd) {
        debug_assert!(self.fd.is_none(), "descriptor installed into an occupied handle");
        self.fd = Some(fd);
    }
    /// Borrows the descriptor, failing with `EBADF` if the handle is unset.
    pub(crate) fn get(&self) -> io::Result<BorrowedFd<'_>> {
        match &self.fd {
            Some(fd) => Ok(fd.as_fd()),
            None => Err(io::Error::from_raw_os_error(libc::EBADF)),
        }
    }
}

impl Default for Handle {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
impl Debug for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("fd", &self.as_raw_fd()).finish()
    }
}

impl AsRawFd for Handle {
    /// Returns the raw descriptor, or `-1` if the handle is unset.
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_ref().map_or(-1, AsRawFd::as_raw_fd)
    }
}
impl FromRawFd for Handle {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd: Some(unsafe { OwnedFd::from_raw_fd(fd) }) }
    }
}
impl From<OwnedFd> for Handle {
    fn from(fd: OwnedFd) -> Self {
        Self { fd: Some(fd) }
    }
}
