use std::{fmt, hash::{Hash, Hasher}, str::FromStr};

use rustc_hash::FxHasher;

use super::{
    AddressError,
    Family,
    Ipv4Endpoint,
    Ipv6Endpoint,
    Port,
    SocketAddress,
    UnixEndpoint,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SocketEndpoint {
    Ipv4(Ipv4Endpoint),
    Ipv6(Ipv6Endpoint),
    Unix(UnixEndpoint),
}

impl SocketEndpoint {

    // Empty address of the given family
    pub fn empty(family: Family) -> Self {
        match family {
            Family::Ipv4 => SocketEndpoint::Ipv4(Ipv4Endpoint::default()),
            Family::Ipv6 => SocketEndpoint::Ipv6(Ipv6Endpoint::default()),
            Family::Unix => SocketEndpoint::Unix(UnixEndpoint::default()),
        }
    }

    pub fn parse(family: Family, endpoint: &str) -> Result<Self, AddressError> {
        match family {
            Family::Ipv4 => Ok(SocketEndpoint::Ipv4(endpoint.parse()?)),
            Family::Ipv6 => Ok(SocketEndpoint::Ipv6(endpoint.parse()?)),
            Family::Unix => Ok(SocketEndpoint::Unix(UnixEndpoint::new(endpoint)?)),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            SocketEndpoint::Ipv4(_) => Family::Ipv4,
            SocketEndpoint::Ipv6(_) => Family::Ipv6,
            SocketEndpoint::Unix(_) => Family::Unix,
        }
    }

    pub fn port(&self) -> Option<Port> {
        match self {
            SocketEndpoint::Ipv4(endpoint) => Some(endpoint.port()),
            SocketEndpoint::Ipv6(endpoint) => Some(endpoint.port()),
            SocketEndpoint::Unix(_) => None,
        }
    }

    pub fn set_port(&mut self, port: Port) -> Result<(), AddressError> {
        match self {
            SocketEndpoint::Ipv4(endpoint) => endpoint.set_port(port),
            SocketEndpoint::Ipv6(endpoint) => endpoint.set_port(port),
            SocketEndpoint::Unix(_) => return Err(AddressError::UnsupportedFamily(Family::Unix)),
        }

        Ok(())
    }

    // Wildcard address and port; an unnamed Unix endpoint counts as wildcard
    pub fn is_wildcard(&self) -> bool {
        match self {
            SocketEndpoint::Ipv4(endpoint) => endpoint.is_wildcard(),
            SocketEndpoint::Ipv6(endpoint) => {
                endpoint.is_wildcard_address() && endpoint.is_wildcard_port()
            },
            SocketEndpoint::Unix(endpoint) => endpoint.is_unnamed(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SocketEndpoint::Ipv4(endpoint) => endpoint.len(),
            SocketEndpoint::Ipv6(endpoint) => endpoint.len(),
            SocketEndpoint::Unix(endpoint) => endpoint.len(),
        }
    }

    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    // Native record ready for bind(2)/connect(2), together with its length
    pub fn to_storage(&self) -> (libc::sockaddr_storage, libc::socklen_t) {
        let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };

        match *self {
            SocketEndpoint::Ipv4(endpoint) => unsafe {
                let storage_ptr = &mut storage as *mut _ as *mut libc::sockaddr_in;
                std::ptr::write(storage_ptr, endpoint.into());
            },
            SocketEndpoint::Ipv6(endpoint) => unsafe {
                let storage_ptr = &mut storage as *mut _ as *mut libc::sockaddr_in6;
                std::ptr::write(storage_ptr, endpoint.into());
            },
            SocketEndpoint::Unix(endpoint) => unsafe {
                let storage_ptr = &mut storage as *mut _ as *mut libc::sockaddr_un;
                std::ptr::write(storage_ptr, endpoint.into());
            },
        }

        (storage, self.len() as libc::socklen_t)
    }
}

impl From<Ipv4Endpoint> for SocketEndpoint {
    fn from(endpoint: Ipv4Endpoint) -> Self {
        SocketEndpoint::Ipv4(endpoint)
    }
}

impl From<Ipv6Endpoint> for SocketEndpoint {
    fn from(endpoint: Ipv6Endpoint) -> Self {
        SocketEndpoint::Ipv6(endpoint)
    }
}

impl From<UnixEndpoint> for SocketEndpoint {
    fn from(endpoint: UnixEndpoint) -> Self {
        SocketEndpoint::Unix(endpoint)
    }
}

impl From<std::net::SocketAddr> for SocketEndpoint {
    fn from(addr: std::net::SocketAddr) -> Self {
        match addr {
            std::net::SocketAddr::V4(addr) => SocketEndpoint::Ipv4(addr.into()),
            std::net::SocketAddr::V6(addr) => SocketEndpoint::Ipv6(addr.into()),
        }
    }
}

// Only the IPv4 grammar exists as text
impl FromStr for SocketEndpoint {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Family::Ipv4, s)
    }
}

impl TryFrom<&libc::sockaddr_storage> for SocketEndpoint {
    type Error = AddressError;

    fn try_from(storage: &libc::sockaddr_storage) -> Result<Self, Self::Error> {
        let storage_ptr = storage as *const libc::sockaddr_storage;

        let family = Family::try_from(storage.ss_family).inspect_err(|err| {
            error!("Native address record does not belong to a known family: {}", err);
        })?;

        match family {
            Family::Ipv4 => {
                let addr = unsafe { *(storage_ptr as *const libc::sockaddr_in) };
                Ok(SocketEndpoint::Ipv4(Ipv4Endpoint::try_from(addr)?))
            },
            Family::Ipv6 => {
                let addr = unsafe { *(storage_ptr as *const libc::sockaddr_in6) };
                Ok(SocketEndpoint::Ipv6(Ipv6Endpoint::try_from(addr)?))
            },
            Family::Unix => {
                let addr = unsafe { *(storage_ptr as *const libc::sockaddr_un) };
                Ok(SocketEndpoint::Unix(UnixEndpoint::try_from(addr)?))
            },
        }
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SocketEndpoint::Ipv4(endpoint) => write!(f, "{}", endpoint),
            SocketEndpoint::Ipv6(endpoint) => write!(f, "{}", endpoint),
            SocketEndpoint::Unix(endpoint) => write!(f, "{}", endpoint),
        }
    }
}
