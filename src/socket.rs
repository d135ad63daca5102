use crate::{
    addr::{Family, SockAddr},
    c_wrappers, ConstMembuf, Handle, Membuf,
};
use libc::c_int;
use std::{
    fmt::{self, Debug, Formatter},
    io,
    marker::PhantomData,
    os::fd::OwnedFd,
    os::unix::io::{AsRawFd, FromRawFd, RawFd},
    ptr,
};

/// The set of possible socket communication types, selected at [`open`](Socket::open) time and
/// fixed for the lifetime of the descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SocketType {
    /// Connectionless, unreliable datagrams of fixed maximum length.
    Datagram = libc::SOCK_DGRAM,
    /// Connection-based, reliable, ordered datagrams.
    SeqPacket = libc::SOCK_SEQPACKET,
    /// Connection-based, reliable, ordered byte streams.
    Stream = libc::SOCK_STREAM,
}

/// Behavior modifiers for the send operations, passed through verbatim to the underlying
/// primitive.
///
/// The constants map 1:1 onto the platform's `MSG_*` values; their semantics are exactly the
/// host platform's. Combine with `|`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SendFlags(c_int);
impl SendFlags {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// `MSG_CONFIRM`, tells the link layer that forward progress happened.
    #[cfg(sock_ext_msg_flags)]
    pub const CONFIRM: Self = Self(libc::MSG_CONFIRM);
    /// `MSG_DONTROUTE`, sends without consulting the routing tables.
    pub const DONTROUTE: Self = Self(libc::MSG_DONTROUTE);
    /// `MSG_DONTWAIT`, makes this one call non-blocking.
    pub const DONTWAIT: Self = Self(libc::MSG_DONTWAIT);
    /// `MSG_EOR`, marks the end of a record.
    pub const EOR: Self = Self(libc::MSG_EOR);
    /// `MSG_MORE`, announces that more data follows.
    #[cfg(sock_ext_msg_flags)]
    pub const MORE: Self = Self(libc::MSG_MORE);
    /// `MSG_NOSIGNAL`, suppresses `SIGPIPE` on a broken stream.
    #[cfg(sock_msg_nosignal)]
    pub const NOSIGNAL: Self = Self(libc::MSG_NOSIGNAL);
    /// `MSG_OOB`, sends out-of-band data.
    pub const OOB: Self = Self(libc::MSG_OOB);

    /// The raw bitmask.
    #[inline]
    pub const fn bits(self) -> c_int {
        self.0
    }
    /// Whether every flag in `other` is also set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Behavior modifiers for the receive operations, passed through verbatim to the underlying
/// primitive.
///
/// The constants map 1:1 onto the platform's `MSG_*` values; their semantics are exactly the
/// host platform's. Combine with `|`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RecvFlags(c_int);
impl RecvFlags {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// `MSG_DONTWAIT`, makes this one call non-blocking.
    pub const DONTWAIT: Self = Self(libc::MSG_DONTWAIT);
    /// `MSG_ERRQUEUE`, reads a queued error instead of payload data.
    #[cfg(sock_ext_msg_flags)]
    pub const ERRQUEUE: Self = Self(libc::MSG_ERRQUEUE);
    /// `MSG_OOB`, receives out-of-band data.
    pub const OOB: Self = Self(libc::MSG_OOB);
    /// `MSG_PEEK`, reads without consuming.
    pub const PEEK: Self = Self(libc::MSG_PEEK);
    /// `MSG_TRUNC`, returns the real length of a datagram even when it was truncated.
    pub const TRUNC: Self = Self(libc::MSG_TRUNC);
    /// `MSG_WAITALL`, blocks until the full requested length arrives.
    pub const WAITALL: Self = Self(libc::MSG_WAITALL);

    /// The raw bitmask.
    #[inline]
    pub const fn bits(self) -> c_int {
        self.0
    }
    /// Whether every flag in `other` is also set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

flags_newtype_ops!(SendFlags RecvFlags);

#[cold]
#[inline(never)]
fn busy() -> io::Error {
    io::Error::from_raw_os_error(libc::EBUSY)
}
#[cold]
#[inline(never)]
fn invalid_argument() -> io::Error {
    io::Error::from_raw_os_error(libc::EINVAL)
}

/// A blocking socket of the address family `F`.
///
/// The socket is a [`Handle`] specialized per family: it owns at most one descriptor and adds
/// the communication-type-aware [`open`](Self::open) plus the full set of socket operations,
/// each typed to accept only a [`SockAddr`] of its own family.
///
/// Every fallible operation is a direct call into the host networking stack and either returns
/// the primitive's success value or the exact `errno` the platform reported, preserved in the
/// returned [`io::Error`]. Nothing is retried or absorbed; a would-block or interrupted outcome
/// reaches the caller unchanged.
///
/// # Examples
/// Basic server:
/// ```no_run
/// use polysock::{addr::{SockAddr, Unix}, RecvFlags, Socket, SocketType};
///
/// # fn main() -> std::io::Result<()> {
/// let mut listener = Socket::<Unix>::new();
/// listener.open(SocketType::Stream)?;
/// listener.bind(&SockAddr::from_path("/tmp/example.sock")?)?;
/// listener.listen(16)?;
///
/// let mut conn = Socket::new();
/// listener.accept(&mut conn)?;
/// let mut buf = [0_u8; 128];
/// let received = conn.recv(&mut buf, RecvFlags::NONE)?;
/// println!("client said: {:?}", &buf[..received]);
/// # Ok(()) }
/// ```
pub struct Socket<F: Family> {
    handle: Handle,
    _family: PhantomData<F>,
}

/// A socket in the Unix (local, path-based) family.
pub type UnixSocket = Socket<crate::addr::Unix>;
/// A socket in the IPv4 family.
pub type Ipv4Socket = Socket<crate::addr::Ipv4>;
/// A socket in the IPv6 family.
pub type Ipv6Socket = Socket<crate::addr::Ipv6>;

impl<F: Family> Socket<F> {
    /// Creates a socket object in the unopened state, holding no descriptor.
    #[inline]
    pub const fn new() -> Self {
        Self { handle: Handle::new(), _family: PhantomData }
    }

    /// Whether the socket currently holds an open descriptor.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Acquires a descriptor of the given communication type.
    ///
    /// Fails with `EBUSY` if the socket is already open, leaving the existing descriptor
    /// untouched. After a [`shutdown`](Self::shutdown) or [`close`](Self::close) the object may
    /// be opened again; the released descriptor itself is never reused.
    ///
    /// # System calls
    /// - `socket`
    pub fn open(&mut self, ty: SocketType) -> io::Result<()> {
        if self.handle.is_open() {
            return Err(busy());
        }
        let fd = c_wrappers::create_socket(F::DOMAIN, ty as c_int)?;
        self.handle.set(fd);
        Ok(())
    }

    /// Binds the socket to the given local address.
    ///
    /// Fails with `EINVAL`, without a kernel call, if `local_addr` is not
    /// [valid](SockAddr::is_valid).
    ///
    /// # System calls
    /// - `bind`
    pub fn bind(&self, local_addr: &SockAddr<F>) -> io::Result<()> {
        if !local_addr.is_valid() {
            return Err(invalid_argument());
        }
        let fd = self.handle.get()?;
        unsafe {
            // SAFETY: a valid SockAddr is well-formed for at least len() bytes
            c_wrappers::bind(fd, local_addr.as_sockaddr_ptr(), local_addr.len())
        }
    }

    /// Turns this socket into a passive server socket, ready to accept incoming connections.
    ///
    /// `backlog` bounds the pending-connection queue; it is passed through verbatim and its
    /// exact interpretation is the kernel's.
    ///
    /// # System calls
    /// - `listen`
    pub fn listen(&self, backlog: c_int) -> io::Result<()> {
        c_wrappers::listen(self.handle.get()?, backlog)
    }

    /// Connects to a remote address. Exact semantics depend on the communication type the
    /// socket was opened with; in-progress and would-block outcomes surface as their errno
    /// values unchanged.
    ///
    /// # System calls
    /// - `connect`
    pub fn connect(&self, remote_addr: &SockAddr<F>) -> io::Result<()> {
        let fd = self.handle.get()?;
        unsafe {
            // SAFETY: a SockAddr is well-formed for at least len() bytes
            c_wrappers::connect(fd, remote_addr.as_sockaddr_ptr(), remote_addr.len())
        }
    }

    /// Accepts an incoming connection into `client`, discarding the peer's address.
    ///
    /// `client` must not already hold an open descriptor; `EBUSY` is returned otherwise rather
    /// than silently leaking or overwriting it, and neither socket's state changes.
    ///
    /// # System calls
    /// - `accept`
    pub fn accept(&self, client: &mut Socket<F>) -> io::Result<()> {
        if client.is_open() {
            return Err(busy());
        }
        let fd = self.handle.get()?;
        let client_fd = unsafe {
            // SAFETY: null address output is explicitly allowed by accept
            c_wrappers::accept(fd, ptr::null_mut(), ptr::null_mut())
        }?;
        client.handle.set(client_fd);
        Ok(())
    }

    /// Accepts an incoming connection into `client` and records the peer's address.
    ///
    /// On success `client_addr` holds the connection source's address with the length the
    /// kernel actually wrote, which may be shorter than the family maximum. Identical to
    /// [`accept`](Self::accept) in every other respect.
    ///
    /// # System calls
    /// - `accept`
    pub fn accept_with_addr(
        &self,
        client: &mut Socket<F>,
        client_addr: &mut SockAddr<F>,
    ) -> io::Result<()> {
        if client.is_open() {
            return Err(busy());
        }
        let fd = self.handle.get()?;
        let mut addrlen = F::MAX_LEN;
        let client_fd = unsafe {
            // SAFETY: the address buffer is MAX_LEN bytes by construction
            c_wrappers::accept(fd, client_addr.as_sockaddr_ptr_mut(), &mut addrlen)
        }?;
        client_addr.set_len(addrlen);
        client.handle.set(client_fd);
        Ok(())
    }

    /// Sends a buffer through the socket. The socket must be connected.
    ///
    /// Returns the number of bytes actually sent, which may be less than the buffer's length;
    /// callers handle partial transfers themselves.
    ///
    /// # System calls
    /// - `send`
    #[inline]
    pub fn send<'a>(&self, buf: impl Into<ConstMembuf<'a>>, flags: SendFlags) -> io::Result<usize> {
        let buf = buf.into();
        self.send_raw(buf.base(), buf.len(), flags)
    }

    /// Sends a buffer given by a raw base address and length. Fails with `EINVAL` on a null
    /// base, without a kernel call.
    ///
    /// # System calls
    /// - `send`
    pub fn send_raw(&self, base: *const u8, len: usize, flags: SendFlags) -> io::Result<usize> {
        if base.is_null() {
            return Err(invalid_argument());
        }
        let fd = self.handle.get()?;
        unsafe {
            // SAFETY: the caller (or the view the pointer came from) vouches for len readable
            // bytes at base
            c_wrappers::send(fd, base, len, flags.bits())
        }
    }

    /// Sends a buffer through the socket to the specified address.
    ///
    /// # System calls
    /// - `sendto`
    #[inline]
    pub fn send_to<'a>(
        &self,
        buf: impl Into<ConstMembuf<'a>>,
        destination: &SockAddr<F>,
        flags: SendFlags,
    ) -> io::Result<usize> {
        let buf = buf.into();
        self.send_to_raw(buf.base(), buf.len(), destination, flags)
    }

    /// Addressed counterpart of [`send_raw`](Self::send_raw).
    ///
    /// # System calls
    /// - `sendto`
    pub fn send_to_raw(
        &self,
        base: *const u8,
        len: usize,
        destination: &SockAddr<F>,
        flags: SendFlags,
    ) -> io::Result<usize> {
        if base.is_null() {
            return Err(invalid_argument());
        }
        let fd = self.handle.get()?;
        unsafe {
            // SAFETY: as in send_raw; the destination is well-formed for len() bytes
            c_wrappers::send_to(
                fd,
                base,
                len,
                flags.bits(),
                destination.as_sockaddr_ptr(),
                destination.len(),
            )
        }
    }

    /// Receives data from the socket into the given buffer.
    ///
    /// Returns the number of bytes actually received; for stream sockets, zero signals the peer
    /// closing its end.
    ///
    /// # System calls
    /// - `recv`
    #[inline]
    pub fn recv<'a>(&self, buf: impl Into<Membuf<'a>>, flags: RecvFlags) -> io::Result<usize> {
        let buf = buf.into();
        self.recv_raw(buf.base(), buf.len(), flags)
    }

    /// Receives into a buffer given by a raw base address and length. Fails with `EINVAL` on a
    /// null base, without a kernel call.
    ///
    /// # System calls
    /// - `recv`
    pub fn recv_raw(&self, base: *mut u8, len: usize, flags: RecvFlags) -> io::Result<usize> {
        if base.is_null() {
            return Err(invalid_argument());
        }
        let fd = self.handle.get()?;
        unsafe {
            // SAFETY: the caller (or the view the pointer came from) vouches for len writable
            // bytes at base
            c_wrappers::recv(fd, base, len, flags.bits())
        }
    }

    /// Receives data from the socket, along with the sender's address (when the protocol
    /// provides one).
    ///
    /// On success `sender_addr` holds the source address with the length exactly as the kernel
    /// reported it.
    ///
    /// # System calls
    /// - `recvfrom`
    #[inline]
    pub fn recv_from<'a>(
        &self,
        buf: impl Into<Membuf<'a>>,
        sender_addr: &mut SockAddr<F>,
        flags: RecvFlags,
    ) -> io::Result<usize> {
        let buf = buf.into();
        self.recv_from_raw(buf.base(), buf.len(), sender_addr, flags)
    }

    /// Addressed counterpart of [`recv_raw`](Self::recv_raw).
    ///
    /// # System calls
    /// - `recvfrom`
    pub fn recv_from_raw(
        &self,
        base: *mut u8,
        len: usize,
        sender_addr: &mut SockAddr<F>,
        flags: RecvFlags,
    ) -> io::Result<usize> {
        if base.is_null() {
            return Err(invalid_argument());
        }
        let fd = self.handle.get()?;
        let mut addrlen = F::MAX_LEN;
        let bytes_received = unsafe {
            // SAFETY: as in recv_raw; the address buffer is MAX_LEN bytes by construction
            c_wrappers::recv_from(
                fd,
                base,
                len,
                flags.bits(),
                sender_addr.as_sockaddr_ptr_mut(),
                &mut addrlen,
            )
        }?;
        sender_addr.set_len(addrlen);
        Ok(bytes_received)
    }

    /// Performs a full-duplex shutdown of the connection, then closes the descriptor.
    ///
    /// Always safe to call; a second call (or a call on an unopened socket) is a no-op.
    ///
    /// # System calls
    /// - `shutdown`
    /// - `close`
    pub fn shutdown(&mut self) {
        if let Ok(fd) = self.handle.get() {
            // The shutdown result is deliberately discarded: an ENOTCONN here just means there
            // is no connection left to tear down, and the descriptor is closed either way.
            let _ = c_wrappers::shutdown(fd);
        }
        self.handle.close();
    }

    /// Releases the descriptor without the connection teardown of [`shutdown`](Self::shutdown).
    /// Idempotent.
    #[inline]
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// Creates a pair of mutually connected sockets of this family in one kernel call.
    ///
    /// Both output sockets must be unopened; `EBUSY` is returned otherwise and neither is
    /// touched. Note that the host platform may only support pair creation for the Unix family,
    /// in which case the kernel's refusal (e.g. `EOPNOTSUPP`) is forwarded for the others.
    ///
    /// # System calls
    /// - `socketpair`
    pub fn pair(ty: SocketType, socket1: &mut Socket<F>, socket2: &mut Socket<F>) -> io::Result<()> {
        if socket1.is_open() || socket2.is_open() {
            return Err(busy());
        }
        let (fd1, fd2) = c_wrappers::create_socket_pair(F::DOMAIN, ty as c_int)?;
        socket1.handle.set(fd1);
        socket2.handle.set(fd2);
        Ok(())
    }

    /// The local address the socket is bound to.
    ///
    /// # System calls
    /// - `getsockname`
    pub fn local_addr(&self) -> io::Result<SockAddr<F>> {
        let fd = self.handle.get()?;
        let mut addr = SockAddr::new();
        let mut addrlen = F::MAX_LEN;
        unsafe {
            // SAFETY: the address buffer is MAX_LEN bytes by construction
            c_wrappers::getsockname(fd, addr.as_sockaddr_ptr_mut(), &mut addrlen)?;
        }
        addr.set_len(addrlen);
        Ok(addr)
    }
    /// The address of the connected peer.
    ///
    /// # System calls
    /// - `getpeername`
    pub fn peer_addr(&self) -> io::Result<SockAddr<F>> {
        let fd = self.handle.get()?;
        let mut addr = SockAddr::new();
        let mut addrlen = F::MAX_LEN;
        unsafe {
            // SAFETY: as above
            c_wrappers::getpeername(fd, addr.as_sockaddr_ptr_mut(), &mut addrlen)?;
        }
        addr.set_len(addrlen);
        Ok(addr)
    }

    /// Enables or disables nonblocking mode for the socket itself, affecting every subsequent
    /// operation rather than a single call. By default, it is disabled; per-call nonblocking
    /// behavior is available through [`SendFlags::DONTWAIT`]/[`RecvFlags::DONTWAIT`] instead.
    ///
    /// # System calls
    /// - `fcntl`
    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        c_wrappers::set_nonblocking(self.handle.get()?, nonblocking)
    }
    /// Checks whether the socket is currently in nonblocking mode.
    ///
    /// # System calls
    /// - `fcntl`
    pub fn is_nonblocking(&self) -> io::Result<bool> {
        c_wrappers::get_nonblocking(self.handle.get()?)
    }
}

impl<F: Family> Default for Socket<F> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
impl<F: Family> Drop for Socket<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
impl<F: Family> Debug for Socket<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("family", &F::NAME)
            .field("fd", &self.handle.as_raw_fd())
            .finish()
    }
}

impl<F: Family> AsRawFd for Socket<F> {
    /// Returns the raw descriptor, or `-1` if the socket is unopened.
    fn as_raw_fd(&self) -> RawFd {
        self.handle.as_raw_fd()
    }
}
impl<F: Family> FromRawFd for Socket<F> {
    /// # Safety
    /// In addition to the usual ownership requirements, `fd` must refer to a socket of the
    /// address family `F`.
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self { handle: unsafe { Handle::from_raw_fd(fd) }, _family: PhantomData }
    }
}
impl<F: Family> From<OwnedFd> for Socket<F> {
    /// Adopts an already-open descriptor, which must refer to a socket of the address family
    /// `F` for the address-carrying operations to behave.
    fn from(fd: OwnedFd) -> Self {
        Self { handle: Handle::from(fd), _family: PhantomData }
    }
}
