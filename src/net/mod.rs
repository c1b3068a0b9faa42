
// BSD-derived systems carry a leading length byte in every sockaddr
macro_rules! set_sockaddr_len {
    ($addr:expr, $field:ident, $len:expr) => {
        #[cfg(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        ))]
        {
            $addr.$field = $len as u8;
        }
    };
}

mod port;
mod ipv4;
mod ipv4_endpoint;
mod ipv6;
mod unix;
mod endpoint;

use std::fmt;
use thiserror::Error;

pub use port::Port;
pub use ipv4::Ipv4Address;
pub use ipv4_endpoint::{Ipv4Endpoint, ParseMode};
pub use ipv6::{Ipv6Address, Ipv6Endpoint};
pub use unix::UnixEndpoint;
pub use endpoint::SocketEndpoint;


#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum AddressError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Path of {len} bytes does not fit in a buffer of {capacity} bytes")]
    PathTooLong {
        len: usize,
        capacity: usize,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Operation not supported for address family: {0}")]
    UnsupportedFamily(Family),

    #[error("Unknown address family: {0}")]
    UnknownFamily(libc::sa_family_t),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Family {
    Ipv4,
    Ipv6,
    Unix,
}

impl Family {

    pub fn as_raw(&self) -> libc::sa_family_t {
        match self {
            Family::Ipv4 => libc::AF_INET as libc::sa_family_t,
            Family::Ipv6 => libc::AF_INET6 as libc::sa_family_t,
            Family::Unix => libc::AF_UNIX as libc::sa_family_t,
        }
    }
}

impl TryFrom<libc::sa_family_t> for Family {
    type Error = AddressError;

    fn try_from(raw: libc::sa_family_t) -> Result<Self, Self::Error> {
        match raw as libc::c_int {
            libc::AF_INET => Ok(Family::Ipv4),
            libc::AF_INET6 => Ok(Family::Ipv6),
            libc::AF_UNIX => Ok(Family::Unix),
            _ => Err(AddressError::UnknownFamily(raw)),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::Ipv4 => write!(f, "IPv4"),
            Family::Ipv6 => write!(f, "IPv6"),
            Family::Unix => write!(f, "Unix"),
        }
    }
}

/*
    Common protocol of the typed endpoints. `Default` yields an empty
    address, ready to be filled in from a native structure.
*/
pub trait SocketAddress: Default + Copy + Eq + std::hash::Hash {
    const FAMILY: Family;

    // Size in bytes of the native record this address occupies
    fn len(&self) -> usize;

    fn family(&self) -> Family { Self::FAMILY }
}
