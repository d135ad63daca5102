use super::{Family, Ipv6, SockAddr};
use libc::{sa_family_t, sockaddr_in6, socklen_t};
use std::{
    mem::{size_of, zeroed},
    net::{Ipv6Addr, SocketAddrV6},
    ptr,
};

impl Family for Ipv6 {
    const DOMAIN: libc::c_int = libc::AF_INET6;
    const MAX_LEN: socklen_t = size_of::<sockaddr_in6>() as socklen_t;
    const NAME: &'static str = "IPv6";
}

impl SockAddr<Ipv6> {
    /// Encodes an IPv6 endpoint with zero flow info and scope ID.
    pub fn from_parts(ip: Ipv6Addr, port: u16) -> Self {
        Self::from_parts_full(ip, port, 0, 0)
    }

    /// Encodes an IPv6 endpoint with explicit flow info and scope ID.
    pub fn from_parts_full(ip: Ipv6Addr, port: u16, flowinfo: u32, scope_id: u32) -> Self {
        let mut sin6: sockaddr_in6 = unsafe {
            // SAFETY: sockaddr_in6 only contains integer fields
            zeroed()
        };
        sin6.sin6_family = libc::AF_INET6 as sa_family_t;
        sin6.sin6_port = port.to_be();
        sin6.sin6_flowinfo = flowinfo;
        sin6.sin6_addr.s6_addr = ip.octets();
        sin6.sin6_scope_id = scope_id;

        let mut addr = Self::new();
        unsafe {
            // SAFETY: sockaddr_storage is larger than sockaddr_in6 and at least as aligned
            ptr::addr_of_mut!(addr.storage).cast::<sockaddr_in6>().write(sin6);
        }
        addr.len = Ipv6::MAX_LEN;
        addr
    }

    /// The endpoint's address part. All-zeroes for an empty address value.
    pub fn ip(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.read_sin6().sin6_addr.s6_addr)
    }
    /// The endpoint's port part, in host byte order.
    pub fn port(&self) -> u16 {
        u16::from_be(self.read_sin6().sin6_port)
    }
    /// The endpoint's scope ID.
    pub fn scope_id(&self) -> u32 {
        self.read_sin6().sin6_scope_id
    }

    fn read_sin6(&self) -> sockaddr_in6 {
        unsafe {
            // SAFETY: the storage is fully initialized and large enough for any family
            ptr::addr_of!(self.storage).cast::<sockaddr_in6>().read()
        }
    }
}

impl From<SocketAddrV6> for SockAddr<Ipv6> {
    fn from(addr: SocketAddrV6) -> Self {
        Self::from_parts_full(*addr.ip(), addr.port(), addr.flowinfo(), addr.scope_id())
    }
}
impl From<SockAddr<Ipv6>> for SocketAddrV6 {
    fn from(addr: SockAddr<Ipv6>) -> Self {
        Self::new(addr.ip(), addr.port(), addr.read_sin6().sin6_flowinfo, addr.scope_id())
    }
}
