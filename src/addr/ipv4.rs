use super::{Family, Ipv4, SockAddr};
use libc::{sa_family_t, sockaddr_in, socklen_t};
use std::{
    mem::{size_of, zeroed},
    net::{Ipv4Addr, SocketAddrV4},
    ptr,
};

impl Family for Ipv4 {
    const DOMAIN: libc::c_int = libc::AF_INET;
    const MAX_LEN: socklen_t = size_of::<sockaddr_in>() as socklen_t;
    const NAME: &'static str = "IPv4";
}

impl SockAddr<Ipv4> {
    /// Encodes an IPv4 endpoint.
    pub fn from_parts(ip: Ipv4Addr, port: u16) -> Self {
        let mut sin: sockaddr_in = unsafe {
            // SAFETY: sockaddr_in only contains integer fields
            zeroed()
        };
        sin.sin_family = libc::AF_INET as sa_family_t;
        sin.sin_port = port.to_be();
        sin.sin_addr.s_addr = u32::from(ip).to_be();

        let mut addr = Self::new();
        unsafe {
            // SAFETY: sockaddr_storage is larger than sockaddr_in and at least as aligned
            ptr::addr_of_mut!(addr.storage).cast::<sockaddr_in>().write(sin);
        }
        addr.len = Ipv4::MAX_LEN;
        addr
    }

    /// The endpoint's address part. All-zeroes for an empty address value.
    pub fn ip(&self) -> Ipv4Addr {
        let sin = self.read_sin();
        Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))
    }
    /// The endpoint's port part, in host byte order.
    pub fn port(&self) -> u16 {
        u16::from_be(self.read_sin().sin_port)
    }

    fn read_sin(&self) -> sockaddr_in {
        unsafe {
            // SAFETY: the storage is fully initialized and large enough for any family
            ptr::addr_of!(self.storage).cast::<sockaddr_in>().read()
        }
    }
}

impl From<SocketAddrV4> for SockAddr<Ipv4> {
    fn from(addr: SocketAddrV4) -> Self {
        Self::from_parts(*addr.ip(), addr.port())
    }
}
impl From<SockAddr<Ipv4>> for SocketAddrV4 {
    fn from(addr: SockAddr<Ipv4>) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}
