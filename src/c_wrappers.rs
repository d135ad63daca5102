//! Thin wrappers around the socket syscalls, mapping the `-1`/`errno` convention onto
//! `io::Result`.

use crate::FdOrErrno;
use libc::{c_int, sockaddr, socklen_t};
#[cfg(not(target_os = "linux"))]
use std::os::fd::AsFd;
use std::{
    ffi::c_void,
    io,
    os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd},
    ptr,
};

pub(crate) fn create_socket(domain: c_int, ty: c_int) -> io::Result<OwnedFd> {
    #[allow(unused_mut, clippy::let_and_return)]
    let ty = {
        let mut ty = ty;
        #[cfg(target_os = "linux")]
        {
            ty |= libc::SOCK_CLOEXEC;
        }
        ty
    };
    let fd = create_socket_raw(domain, ty)?;
    #[cfg(not(target_os = "linux"))]
    set_cloexec(fd.as_fd(), true)?;
    Ok(fd)
}
fn create_socket_raw(domain: c_int, ty: c_int) -> io::Result<OwnedFd> {
    let fd = unsafe { libc::socket(domain, ty, 0) }.fd_or_errno()?;
    Ok(unsafe {
        // SAFETY: we just created this descriptor
        OwnedFd::from_raw_fd(fd)
    })
}

pub(crate) fn create_socket_pair(domain: c_int, ty: c_int) -> io::Result<(OwnedFd, OwnedFd)> {
    #[allow(unused_mut, clippy::let_and_return)]
    let ty = {
        let mut ty = ty;
        #[cfg(target_os = "linux")]
        {
            ty |= libc::SOCK_CLOEXEC;
        }
        ty
    };
    let mut fds: [c_int; 2] = [-1, -1];
    let success = unsafe { libc::socketpair(domain, ty, 0, fds.as_mut_ptr()) } != -1;
    ok_or_ret_errno!(success => ())?;
    let [fd1, fd2] = fds;
    let (fd1, fd2) = unsafe {
        // SAFETY: both descriptors were just created by socketpair
        (OwnedFd::from_raw_fd(fd1), OwnedFd::from_raw_fd(fd2))
    };
    #[cfg(not(target_os = "linux"))]
    {
        set_cloexec(fd1.as_fd(), true)?;
        set_cloexec(fd2.as_fd(), true)?;
    }
    Ok((fd1, fd2))
}

/// Binds the given socket file descriptor to the address behind the pointer.
///
/// # Safety
/// `addr` must point to a well-formed socket address of at least `addrlen` bytes.
pub(crate) unsafe fn bind(
    fd: BorrowedFd<'_>,
    addr: *const sockaddr,
    addrlen: socklen_t,
) -> io::Result<()> {
    let success = unsafe { libc::bind(fd.as_raw_fd(), addr, addrlen) != -1 };
    ok_or_ret_errno!(success => ())
}

/// Connects the given socket file descriptor to the address behind the pointer.
///
/// # Safety
/// `addr` must point to a well-formed socket address of at least `addrlen` bytes.
pub(crate) unsafe fn connect(
    fd: BorrowedFd<'_>,
    addr: *const sockaddr,
    addrlen: socklen_t,
) -> io::Result<()> {
    let success = unsafe { libc::connect(fd.as_raw_fd(), addr, addrlen) != -1 };
    ok_or_ret_errno!(success => ())
}

pub(crate) fn listen(fd: BorrowedFd<'_>, backlog: c_int) -> io::Result<()> {
    let success = unsafe { libc::listen(fd.as_raw_fd(), backlog) != -1 };
    ok_or_ret_errno!(success => ())
}

/// Accepts a pending connection on the given listener.
///
/// # Safety
/// `addr` and `addrlen` must either both be null or point to an address buffer of `*addrlen`
/// writable bytes and its in/out length.
pub(crate) unsafe fn accept(
    fd: BorrowedFd<'_>,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
) -> io::Result<OwnedFd> {
    let client = unsafe { libc::accept(fd.as_raw_fd(), addr, addrlen) }.fd_or_errno()?;
    let client = unsafe {
        // SAFETY: accept just produced this descriptor, so it's not owned elsewhere
        OwnedFd::from_raw_fd(client)
    };
    #[cfg(not(target_os = "linux"))]
    set_cloexec(client.as_fd(), true)?;
    Ok(client)
}

/// # Safety
/// `buf` must be valid for reads of `len` bytes.
pub(crate) unsafe fn send(
    fd: BorrowedFd<'_>,
    buf: *const u8,
    len: usize,
    flags: c_int,
) -> io::Result<usize> {
    let (success, bytes_sent) = unsafe {
        let result = libc::send(fd.as_raw_fd(), buf.cast::<c_void>(), len, flags);
        (result != -1, result as usize)
    };
    ok_or_ret_errno!(success => bytes_sent)
}

/// # Safety
/// `buf` must be valid for reads of `len` bytes; `addr` must point to a well-formed socket
/// address of at least `addrlen` bytes.
pub(crate) unsafe fn send_to(
    fd: BorrowedFd<'_>,
    buf: *const u8,
    len: usize,
    flags: c_int,
    addr: *const sockaddr,
    addrlen: socklen_t,
) -> io::Result<usize> {
    let (success, bytes_sent) = unsafe {
        let result = libc::sendto(fd.as_raw_fd(), buf.cast::<c_void>(), len, flags, addr, addrlen);
        (result != -1, result as usize)
    };
    ok_or_ret_errno!(success => bytes_sent)
}

/// # Safety
/// `buf` must be valid for writes of `len` bytes.
pub(crate) unsafe fn recv(
    fd: BorrowedFd<'_>,
    buf: *mut u8,
    len: usize,
    flags: c_int,
) -> io::Result<usize> {
    let (success, bytes_received) = unsafe {
        let result = libc::recv(fd.as_raw_fd(), buf.cast::<c_void>(), len, flags);
        (result != -1, result as usize)
    };
    ok_or_ret_errno!(success => bytes_received)
}

/// # Safety
/// `buf` must be valid for writes of `len` bytes; `addr` and `addrlen` must either both be null
/// or point to an address buffer of `*addrlen` writable bytes and its in/out length.
pub(crate) unsafe fn recv_from(
    fd: BorrowedFd<'_>,
    buf: *mut u8,
    len: usize,
    flags: c_int,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
) -> io::Result<usize> {
    let (success, bytes_received) = unsafe {
        let result =
            libc::recvfrom(fd.as_raw_fd(), buf.cast::<c_void>(), len, flags, addr, addrlen);
        (result != -1, result as usize)
    };
    ok_or_ret_errno!(success => bytes_received)
}

/// Full-duplex shutdown; the read-only/write-only variants are deliberately not exposed.
pub(crate) fn shutdown(fd: BorrowedFd<'_>) -> io::Result<()> {
    let success = unsafe { libc::shutdown(fd.as_raw_fd(), libc::SHUT_RDWR) != -1 };
    ok_or_ret_errno!(success => ())
}

/// # Safety
/// `addr` and `addrlen` must point to an address buffer of `*addrlen` writable bytes and its
/// in/out length.
pub(crate) unsafe fn getsockname(
    fd: BorrowedFd<'_>,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
) -> io::Result<()> {
    let success = unsafe { libc::getsockname(fd.as_raw_fd(), addr, addrlen) != -1 };
    ok_or_ret_errno!(success => ())
}

/// # Safety
/// Same contract as [`getsockname`].
pub(crate) unsafe fn getpeername(
    fd: BorrowedFd<'_>,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
) -> io::Result<()> {
    let success = unsafe { libc::getpeername(fd.as_raw_fd(), addr, addrlen) != -1 };
    ok_or_ret_errno!(success => ())
}

pub(crate) fn set_nonblocking(fd: BorrowedFd<'_>, nonblocking: bool) -> io::Result<()> {
    let (old_flags, success) = unsafe {
        // SAFETY: nothing too unsafe about this function. One thing to note is that we're passing
        // it a null pointer, which is, for some reason, required yet ignored for F_GETFL.
        let result = libc::fcntl(fd.as_raw_fd(), libc::F_GETFL, ptr::null::<c_void>());
        (result, result != -1)
    };
    if !success {
        return Err(io::Error::last_os_error());
    }
    let new_flags = if nonblocking {
        old_flags | libc::O_NONBLOCK
    } else {
        old_flags & !libc::O_NONBLOCK
    };
    let success = unsafe {
        // SAFETY: new_flags is a c_int, as documented in the manpage.
        libc::fcntl(fd.as_raw_fd(), libc::F_SETFL, new_flags)
    } != -1;
    ok_or_ret_errno!(success => ())
}
pub(crate) fn get_nonblocking(fd: BorrowedFd<'_>) -> io::Result<bool> {
    let flags = unsafe {
        // SAFETY: exactly the same as above.
        libc::fcntl(fd.as_raw_fd(), libc::F_GETFL, ptr::null::<c_void>())
    };
    if flags != -1 {
        Ok(flags & libc::O_NONBLOCK != 0)
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(target_os = "linux"))]
mod non_linux {
    use super::*;
    fn get_fdflags(fd: BorrowedFd<'_>) -> io::Result<i32> {
        let (val, success) = unsafe {
            let ret = libc::fcntl(fd.as_raw_fd(), libc::F_GETFD, 0);
            (ret, ret != -1)
        };
        ok_or_ret_errno!(success => val)
    }
    fn set_fdflags(fd: BorrowedFd<'_>, flags: i32) -> io::Result<()> {
        let success = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, flags) != -1 };
        ok_or_ret_errno!(success => ())
    }
    pub(crate) fn set_cloexec(fd: BorrowedFd<'_>, cloexec: bool) -> io::Result<()> {
        // Mask out cloexec to set it to a new value
        let mut flags = get_fdflags(fd)? & (!libc::FD_CLOEXEC);
        if cloexec {
            flags |= libc::FD_CLOEXEC;
        }
        set_fdflags(fd, flags)?;
        Ok(())
    }
}
#[cfg(not(target_os = "linux"))]
use non_linux::*;
