use {
    super::util::*,
    crate::{
        addr::{Family, Ipv4, SockAddr, Unix},
        RecvFlags, SendFlags, Socket, SocketType,
    },
    std::{fs, net::Ipv4Addr, path::Path},
};

#[test]
fn unix_stream_connect_accept_exchange() -> TestResult {
    testinit();
    let mut namegen = NameGen::new(make_id!());
    let path = namegen.next().unwrap();

    let mut listener = Socket::<Unix>::new();
    listener.open(SocketType::Stream)?;
    listener.bind(&SockAddr::from_path(&path)?)?;
    listener.listen(8)?;

    let mut client = Socket::<Unix>::new();
    client.open(SocketType::Stream)?;
    client.connect(&SockAddr::from_path(&path)?)?;

    let mut conn = Socket::new();
    let mut peer = SockAddr::new();
    listener.accept_with_addr(&mut conn, &mut peer)?;
    assert!(conn.is_open(), "accept must produce an open connection socket");
    assert!(peer.len() <= Unix::MAX_LEN, "kernel-reported length must fit the family maximum");

    let sent = client.send(b"hello over a stream", SendFlags::NONE)?;
    ensure_eq!(sent, 19);
    let mut buf = [0_u8; 32];
    let received = conn.recv(&mut buf, RecvFlags::NONE)?;
    ensure_eq!(&buf[..received], b"hello over a stream");

    let sent = conn.send(b"and back", SendFlags::NONE)?;
    ensure_eq!(sent, 8);
    let received = client.recv(&mut buf, RecvFlags::NONE)?;
    ensure_eq!(&buf[..received], b"and back");

    let local = conn.local_addr()?;
    ensure_eq!(local.path(), Some(Path::new(&path)));

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn accept_into_open_socket_is_busy_without_blocking() -> TestResult {
    testinit();
    let mut namegen = NameGen::new(make_id!());
    let path = namegen.next().unwrap();

    let mut listener = Socket::<Unix>::new();
    listener.open(SocketType::Stream)?;
    listener.bind(&SockAddr::from_path(&path)?)?;
    listener.listen(1)?;

    // The occupied-output check fires before the kernel call, so this returns even though no
    // connection is pending.
    let mut occupied = Socket::<Unix>::new();
    occupied.open(SocketType::Datagram)?;
    let e = listener.accept(&mut occupied).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBUSY));
    assert!(occupied.is_open(), "failed accept must not close the occupied output");

    let mut addr = SockAddr::new();
    let e = listener.accept_with_addr(&mut occupied, &mut addr).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EBUSY));

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn ipv4_stream_and_eof_on_peer_shutdown() -> TestResult {
    testinit();
    let mut listener = Socket::<Ipv4>::new();
    listener.open(SocketType::Stream)?;
    listener.bind(&SockAddr::<Ipv4>::from_parts(Ipv4Addr::LOCALHOST, 0))?;
    listener.listen(8)?;
    let addr = listener.local_addr()?;

    let mut client = Socket::<Ipv4>::new();
    client.open(SocketType::Stream)?;
    client.connect(&addr)?;

    let mut conn = Socket::new();
    let mut peer = SockAddr::new();
    listener.accept_with_addr(&mut conn, &mut peer)?;
    ensure_eq!(peer.ip(), Ipv4Addr::LOCALHOST);
    ensure_eq!(peer.port(), client.local_addr()?.port());

    client.send(b"bye", SendFlags::NONE)?;
    client.shutdown();

    let mut buf = [0_u8; 8];
    let received = conn.recv(&mut buf, RecvFlags::NONE)?;
    ensure_eq!(&buf[..received], b"bye");
    // After the peer's full-duplex shutdown the stream reports end of file.
    let received = conn.recv(&mut buf, RecvFlags::NONE)?;
    ensure_eq!(received, 0);
    Ok(())
}
