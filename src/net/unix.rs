use std::{fmt, os::unix::ffi::OsStrExt, path::Path};

use super::{AddressError, Family, SocketAddress};

// Bytes of sockaddr_un in front of sun_path (family, plus sun_len on BSD)
const HEADER_SIZE: usize = std::mem::offset_of!(libc::sockaddr_un, sun_path);

// 108 on Linux, 104 on the BSDs and macOS
const PATH_CAPACITY: usize = std::mem::size_of::<libc::sockaddr_un>() - HEADER_SIZE;

/*
    A path that fits in sun_path together with its NUL terminator. The
    buffer past the path is always zero, so equality and hashing over the
    whole buffer are equality and hashing over the path.
*/
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct UnixEndpoint {
    path: [u8; PATH_CAPACITY],
}

impl UnixEndpoint {

    pub const CAPACITY: usize = PATH_CAPACITY;
    pub const HEADER_SIZE: usize = HEADER_SIZE;

    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AddressError> {
        Self::from_bytes(path.as_ref().as_os_str().as_bytes())
    }

    pub fn from_bytes(path: &[u8]) -> Result<Self, AddressError> {
        if path.contains(&0) {
            return Err(AddressError::InvalidPath(
                String::from_utf8_lossy(path).into_owned()
            ));
        }

        if path.len() + 1 > PATH_CAPACITY {
            return Err(AddressError::PathTooLong {
                len: path.len(),
                capacity: PATH_CAPACITY,
            });
        }

        let mut endpoint = Self::default();
        endpoint.path[..path.len()].copy_from_slice(path);

        Ok(endpoint)
    }

    pub fn path(&self) -> &[u8] {
        let end = self.path.iter().position(|&b| b == 0).unwrap_or(PATH_CAPACITY);
        &self.path[..end]
    }

    pub fn as_path(&self) -> &Path {
        Path::new(std::ffi::OsStr::from_bytes(self.path()))
    }

    pub fn is_unnamed(&self) -> bool { self.path[0] == 0 }
}

impl Default for UnixEndpoint {
    fn default() -> Self {
        Self { path: [0; PATH_CAPACITY] }
    }
}

impl SocketAddress for UnixEndpoint {
    const FAMILY: Family = Family::Unix;

    // Header, the path itself and its terminator; not the whole buffer
    fn len(&self) -> usize {
        HEADER_SIZE + self.path().len() + 1
    }
}

impl From<UnixEndpoint> for libc::sockaddr_un {
    fn from(endpoint: UnixEndpoint) -> Self {
        let mut addr: libc::sockaddr_un = unsafe { std::mem::zeroed() };

        set_sockaddr_len!(addr, sun_len, endpoint.len());
        addr.sun_family = Family::Unix.as_raw();

        for (dst, &src) in addr.sun_path.iter_mut().zip(endpoint.path()) {
            *dst = src as libc::c_char;
        }

        addr
    }
}

impl TryFrom<libc::sockaddr_un> for UnixEndpoint {
    type Error = AddressError;

    fn try_from(addr: libc::sockaddr_un) -> Result<Self, Self::Error> {
        let family = Family::try_from(addr.sun_family)?;

        if family != Family::Unix {
            return Err(AddressError::UnsupportedFamily(family));
        }

        let bytes: Vec<u8> = addr.sun_path
            .iter()
            .map(|&c| c as u8)
            .take_while(|&b| b != 0)
            .collect();

        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for UnixEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("UnixEndpoint")
            .field("path", &self.as_path())
            .finish()
    }
}

impl fmt::Display for UnixEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.path()))
    }
}
