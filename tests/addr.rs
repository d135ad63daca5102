use {
    super::util::*,
    crate::{
        addr::{Family, Ipv4, Ipv6, SockAddr, Unix, MAX_PATH_LEN},
        Socket, SocketType,
    },
    std::{
        io,
        net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6},
        path::Path,
    },
};

#[test]
fn default_addresses_are_invalid() {
    assert!(!SockAddr::<Unix>::new().is_valid(), "default Unix address must be invalid");
    assert!(!SockAddr::<Ipv4>::new().is_valid(), "default IPv4 address must be invalid");
    assert!(!SockAddr::<Ipv6>::new().is_valid(), "default IPv6 address must be invalid");
}

fn bind_invalid<F: Family>() -> TestResult {
    let mut sock = Socket::<F>::new();
    sock.open(SocketType::Datagram)?;
    let e = sock.bind(&SockAddr::new()).unwrap_err();
    ensure_eq!(e.raw_os_error(), Some(libc::EINVAL));
    assert!(sock.is_open(), "failed bind must not close the socket");
    Ok(())
}

#[test]
fn bind_rejects_invalid_address_for_all_families() -> TestResult {
    testinit();
    bind_invalid::<Unix>()?;
    bind_invalid::<Ipv4>()?;
    bind_invalid::<Ipv6>()?;
    Ok(())
}

#[test]
fn unix_path_roundtrip() -> TestResult {
    testinit();
    let addr = SockAddr::<Unix>::from_path("/tmp/polysock-roundtrip.sock")?;
    assert!(addr.is_valid(), "constructed path address must be valid");
    assert!(addr.len() <= Unix::MAX_LEN, "encoded length must fit the family maximum");
    ensure_eq!(addr.path(), Some(Path::new("/tmp/polysock-roundtrip.sock")));
    Ok(())
}

#[test]
fn unix_path_rejections() {
    testinit();
    let too_long = "a".repeat(MAX_PATH_LEN + 1);
    let e = SockAddr::<Unix>::from_path(&too_long).unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::InvalidInput, "overlong path must be rejected");

    let e = SockAddr::<Unix>::from_path("/tmp/with\0nul").unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::InvalidInput, "interior nul must be rejected");

    let e = SockAddr::<Unix>::from_path("").unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::InvalidInput, "empty path must be rejected");
}

#[cfg(sock_abstract_namespace)]
#[test]
fn unix_abstract_name() -> TestResult {
    testinit();
    let addr = SockAddr::<Unix>::from_abstract_name(b"polysock-abstract-test")?;
    assert!(addr.is_valid(), "abstract-namespace address must be valid");
    ensure_eq!(addr.path(), None);
    Ok(())
}

#[test]
fn ipv4_roundtrip() -> TestResult {
    testinit();
    let addr = SockAddr::<Ipv4>::from_parts(Ipv4Addr::new(127, 0, 0, 1), 8080);
    assert!(addr.is_valid(), "constructed IPv4 address must be valid");
    ensure_eq!(addr.len(), Ipv4::MAX_LEN);
    ensure_eq!(addr.ip(), Ipv4Addr::new(127, 0, 0, 1));
    ensure_eq!(addr.port(), 8080);

    let std_addr = SocketAddrV4::new(Ipv4Addr::new(10, 1, 2, 3), 443);
    let addr = SockAddr::from(std_addr);
    ensure_eq!(SocketAddrV4::from(addr), std_addr);
    Ok(())
}

#[test]
fn ipv6_roundtrip() -> TestResult {
    testinit();
    let addr = SockAddr::<Ipv6>::from_parts(Ipv6Addr::LOCALHOST, 9000);
    assert!(addr.is_valid(), "constructed IPv6 address must be valid");
    ensure_eq!(addr.len(), Ipv6::MAX_LEN);
    ensure_eq!(addr.ip(), Ipv6Addr::LOCALHOST);
    ensure_eq!(addr.port(), 9000);

    let std_addr = SocketAddrV6::new(Ipv6Addr::LOCALHOST, 443, 7, 2);
    let addr = SockAddr::from(std_addr);
    ensure_eq!(SocketAddrV6::from(addr), std_addr);
    Ok(())
}
