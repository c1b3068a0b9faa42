use thiserror::Error;

#[macro_use]
pub (crate) mod logging;

pub mod net;

pub use net::{
    AddressError,
    Family,
    Ipv4Address,
    Ipv4Endpoint,
    Ipv6Address,
    Ipv6Endpoint,
    ParseMode,
    Port,
    SocketAddress,
    SocketEndpoint,
    UnixEndpoint,
};


#[derive(Debug, Error)]
pub enum Error {
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
}

pub type Result<T> = std::result::Result<T, Error>;

// Parses an IPv4 endpoint; "", "*", "<port>", "<address>" or "<address>:<port>"
pub fn endpoint(s: &str) -> Result<SocketEndpoint> {
    Ok(s.parse::<SocketEndpoint>()?)
}

// Unix-domain endpoint bound to `path`
pub fn unix_endpoint<P: AsRef<std::path::Path>>(path: P) -> Result<SocketEndpoint> {
    Ok(UnixEndpoint::new(path)?.into())
}
