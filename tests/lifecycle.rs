use {
    super::util::*,
    crate::{
        addr::{SockAddr, Unix},
        RecvFlags, SendFlags, Socket, SocketType,
    },
    std::os::unix::io::AsRawFd,
};

static TYPES: [SocketType; 3] = [SocketType::Datagram, SocketType::SeqPacket, SocketType::Stream];

#[test]
fn open_twice_is_busy() -> TestResult {
    testinit();
    for ty in TYPES {
        let mut sock = Socket::<Unix>::new();
        assert!(!sock.is_open(), "fresh socket must start unopened");
        sock.open(ty)?;
        let fd = sock.as_raw_fd();

        // A second open must fail with EBUSY regardless of the requested type and must not
        // disturb the existing descriptor.
        for second_ty in TYPES {
            let e = sock.open(second_ty).unwrap_err();
            ensure_eq!(e.raw_os_error(), Some(libc::EBUSY));
        }
        assert!(sock.is_open(), "failed reopen must not close the socket");
        ensure_eq!(sock.as_raw_fd(), fd);
    }
    Ok(())
}

#[test]
fn shutdown_is_idempotent() -> TestResult {
    testinit();
    let mut sock = Socket::<Unix>::new();
    sock.open(SocketType::Stream)?;
    assert!(sock.is_open(), "open must produce an open socket");

    sock.shutdown();
    assert!(!sock.is_open(), "shutdown must close the socket");
    sock.shutdown(); // no-op
    assert!(!sock.is_open(), "second shutdown must remain a no-op");

    // A closed object may be opened again.
    sock.open(SocketType::Datagram)?;
    assert!(sock.is_open(), "reopening after shutdown must work");
    Ok(())
}

#[test]
fn operations_on_unopened_socket_fail_ebadf() -> TestResult {
    testinit();
    let sock = Socket::<Unix>::new();

    let e = sock.send(b"x", SendFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBADF));

    let mut buf = [0_u8; 4];
    let e = sock.recv(&mut buf, RecvFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBADF));

    let e = sock.listen(1).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBADF));

    let addr = SockAddr::<Unix>::from_path("/tmp/polysock-unused.sock")?;
    let e = sock.bind(&addr).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBADF));
    Ok(())
}

#[test]
fn null_buffer_is_rejected_locally() -> TestResult {
    testinit();
    let mut a = Socket::<Unix>::new();
    let mut b = Socket::<Unix>::new();
    Socket::pair(SocketType::Stream, &mut a, &mut b)?;

    let e = a.send_raw(std::ptr::null(), 8, SendFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EINVAL));
    let e = b.recv_raw(std::ptr::null_mut(), 8, RecvFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EINVAL));

    // The addressed variants police the buffer base the same way, before looking at the
    // descriptor or the destination.
    let dest = SockAddr::<Unix>::from_path("/tmp/polysock-null-dest.sock")?;
    let e = a.send_to_raw(std::ptr::null(), 8, &dest, SendFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EINVAL));
    let mut sender = SockAddr::new();
    let e = b.recv_from_raw(std::ptr::null_mut(), 8, &mut sender, RecvFlags::NONE).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EINVAL));
    Ok(())
}
