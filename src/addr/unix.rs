use super::{Family, SockAddr, Unix};
use libc::{sockaddr_un, socklen_t};
use std::{
    ffi::OsStr,
    io,
    mem::{size_of, zeroed},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr::{self, addr_of},
};

impl Family for Unix {
    const DOMAIN: libc::c_int = libc::AF_UNIX;
    const MAX_LEN: socklen_t = size_of::<sockaddr_un>() as socklen_t;
    const NAME: &'static str = "Unix";
}

const SUN_LEN: usize = {
    let sun = unsafe { zeroed::<sockaddr_un>() };
    sun.sun_path.len()
};
#[allow(clippy::as_conversions)]
const PATH_OFFSET: usize = {
    let sun = unsafe { zeroed::<sockaddr_un>() };
    let sunptr = (&sun as *const sockaddr_un).cast::<u8>();
    (unsafe { addr_of!(sun.sun_path).cast::<u8>().offset_from(sunptr) }) as usize
};

/// The longest filesystem path a [`SockAddr<Unix>`](SockAddr) can encode, including neither the
/// nul terminator nor the leading nul of the abstract namespace.
pub const MAX_PATH_LEN: usize = SUN_LEN - 1;

#[cold]
#[inline(never)]
fn name_too_long() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "socket path length exceeds capacity of sun_path of sockaddr_un",
    )
}
#[cold]
#[inline(never)]
fn bad_path(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

impl SockAddr<Unix> {
    /// Encodes a filesystem path as a Unix-family socket address.
    ///
    /// The path must be non-empty, contain no interior nul bytes and fit within
    /// [`MAX_PATH_LEN`]; the encoded length includes the nul terminator, matching what the
    /// kernel reports for pathname addresses.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = path.as_ref().as_os_str().as_bytes();
        if bytes.is_empty() {
            return Err(bad_path("empty socket path"));
        }
        if bytes.contains(&0) {
            return Err(bad_path("socket path contains an interior nul byte"));
        }
        if bytes.len() > MAX_PATH_LEN {
            return Err(name_too_long());
        }

        let mut addr = Self::new();
        unsafe {
            // SAFETY: the length check above keeps the copy within sun_path, and the storage is
            // pre-zeroed, so the byte after the path is already a nul terminator
            ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                ptr::addr_of_mut!(addr.storage).cast::<u8>().add(PATH_OFFSET),
                bytes.len(),
            );
        }
        addr.len = (PATH_OFFSET + bytes.len() + 1) as socklen_t;
        Ok(addr)
    }

    /// Encodes a name in the abstract socket namespace.
    ///
    /// The leading nul byte that distinguishes the namespace is added here and must not be part
    /// of `name`.
    #[cfg(sock_abstract_namespace)]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn from_abstract_name(name: impl AsRef<[u8]>) -> io::Result<Self> {
        let name = name.as_ref();
        if name.len() > MAX_PATH_LEN {
            return Err(name_too_long());
        }

        let mut addr = Self::new();
        unsafe {
            // SAFETY: bounds checked above; the leading nul at PATH_OFFSET is already there
            // thanks to the pre-zeroed storage
            ptr::copy_nonoverlapping(
                name.as_ptr(),
                ptr::addr_of_mut!(addr.storage).cast::<u8>().add(PATH_OFFSET + 1),
                name.len(),
            );
        }
        addr.len = (PATH_OFFSET + 1 + name.len()) as socklen_t;
        Ok(addr)
    }

    /// Decodes the filesystem path this address refers to.
    ///
    /// Returns `None` for unnamed addresses (e.g. the peer of an unbound socket) and for
    /// abstract-namespace names.
    pub fn path(&self) -> Option<&Path> {
        let bytes = self.as_bytes().get(PATH_OFFSET..)?;
        let bytes = match bytes.iter().position(|b| *b == 0) {
            Some(0) => return None, // abstract
            Some(n) => bytes.get(..n)?,
            None => bytes,
        };
        if bytes.is_empty() {
            return None;
        }
        Some(Path::new(OsStr::from_bytes(bytes)))
    }
}
