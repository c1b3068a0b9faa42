use std::{fmt, str::FromStr};

use super::{AddressError, Family, Port, SocketAddress};

// Byte data is stored as big-endian
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Ipv6Address([u8; 16]);

impl Ipv6Address {

    pub const WILDCARD: Ipv6Address = Ipv6Address([0; 16]);
    pub const LOCALHOST: Ipv6Address = Ipv6Address([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    pub fn octets(&self) -> [u8; 16] { self.0 }

    pub fn segments(&self) -> [u16; 8] {
        let mut segments = [0u16; 8];

        for (i, segment) in segments.iter_mut().enumerate() {
            *segment = u16::from_be_bytes([self.0[i * 2], self.0[i * 2 + 1]]);
        }

        segments
    }

    pub fn is_wildcard(&self) -> bool { self.0 == [0; 16] }

    pub fn is_v4_mapped(&self) -> bool {
        self.0[0..10].iter().all(|&b| b == 0)
            && self.0[10] == 0xff
            && self.0[11] == 0xff
    }

    // Start and length of the longest run of zero segments, if any run is 2+ long
    fn longest_zero_run(segments: &[u16; 8]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut current: Option<(usize, usize)> = None;

        for (i, &segment) in segments.iter().enumerate() {
            if segment != 0 {
                current = None;
                continue;
            }

            let run = match current {
                Some((start, len)) => (start, len + 1),
                None => (i, 1),
            };
            current = Some(run);

            if best.is_none_or(|(_, len)| run.1 > len) {
                best = Some(run);
            }
        }

        best.filter(|&(_, len)| len > 1)
    }

    fn write_segments(f: &mut fmt::Formatter, segments: &[u16]) -> fmt::Result {
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:x}", segment)?;
        }

        Ok(())
    }
}

impl From<[u8; 16]> for Ipv6Address {
    fn from(octets: [u8; 16]) -> Self {
        Ipv6Address(octets)
    }
}

impl From<std::net::Ipv6Addr> for Ipv6Address {
    fn from(addr: std::net::Ipv6Addr) -> Self {
        Ipv6Address(addr.octets())
    }
}

impl From<Ipv6Address> for std::net::Ipv6Addr {
    fn from(addr: Ipv6Address) -> Self {
        std::net::Ipv6Addr::from(addr.0)
    }
}

// Compressed form, RFC 5952
impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_v4_mapped() {
            let v4 = &self.0[12..];
            return write!(f, "::ffff:{}.{}.{}.{}", v4[0], v4[1], v4[2], v4[3]);
        }

        let segments = self.segments();

        match Self::longest_zero_run(&segments) {
            Some((start, len)) => {
                Self::write_segments(f, &segments[..start])?;
                write!(f, "::")?;
                Self::write_segments(f, &segments[start + len..])
            },
            None => Self::write_segments(f, &segments),
        }
    }
}

/*
    Only structural construction is supported for this family. Parsing
    IPv6 literals ("[addr]:port", "%scope" suffixes) is not implemented and
    `from_str` reports the family as unsupported.
*/
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Ipv6Endpoint {
    address: Ipv6Address,
    port: Port,
    flow_info: u32,
    scope_id: u32,
}

impl Ipv6Endpoint {

    pub fn new(address: Ipv6Address, port: Port) -> Self {
        Self { address, port, ..Self::default() }
    }

    pub fn with_scope(address: Ipv6Address, port: Port, flow_info: u32, scope_id: u32) -> Self {
        Self { address, port, flow_info, scope_id }
    }

    pub fn address(&self) -> Ipv6Address { self.address }
    pub fn port(&self) -> Port { self.port }
    pub fn flow_info(&self) -> u32 { self.flow_info }
    pub fn scope_id(&self) -> u32 { self.scope_id }

    pub fn set_port(&mut self, port: Port) { self.port = port; }
    pub fn set_flow_info(&mut self, flow_info: u32) { self.flow_info = flow_info; }
    pub fn set_scope_id(&mut self, scope_id: u32) { self.scope_id = scope_id; }

    pub fn is_wildcard_address(&self) -> bool { self.address.is_wildcard() }
    pub fn is_wildcard_port(&self) -> bool { self.port.is_wildcard() }
}

impl SocketAddress for Ipv6Endpoint {
    const FAMILY: Family = Family::Ipv6;

    fn len(&self) -> usize {
        std::mem::size_of::<libc::sockaddr_in6>()
    }
}

impl FromStr for Ipv6Endpoint {
    type Err = AddressError;

    fn from_str(_: &str) -> Result<Self, Self::Err> {
        Err(AddressError::UnsupportedFamily(Family::Ipv6))
    }
}

impl From<std::net::SocketAddrV6> for Ipv6Endpoint {
    fn from(addr: std::net::SocketAddrV6) -> Self {
        Self::with_scope(
            Ipv6Address::from(*addr.ip()),
            Port::new(addr.port()),
            addr.flowinfo(),
            addr.scope_id(),
        )
    }
}

impl From<Ipv6Endpoint> for libc::sockaddr_in6 {
    fn from(endpoint: Ipv6Endpoint) -> Self {
        let mut addr: libc::sockaddr_in6 = unsafe { std::mem::zeroed() };

        set_sockaddr_len!(addr, sin6_len, endpoint.len());
        addr.sin6_family = Family::Ipv6.as_raw();
        addr.sin6_port = endpoint.port.to_be();
        addr.sin6_flowinfo = endpoint.flow_info;
        addr.sin6_addr = libc::in6_addr {
            s6_addr: endpoint.address.octets(),
        };
        addr.sin6_scope_id = endpoint.scope_id;

        addr
    }
}

impl TryFrom<libc::sockaddr_in6> for Ipv6Endpoint {
    type Error = AddressError;

    fn try_from(addr: libc::sockaddr_in6) -> Result<Self, Self::Error> {
        let family = Family::try_from(addr.sin6_family)?;

        if family != Family::Ipv6 {
            return Err(AddressError::UnsupportedFamily(family));
        }

        Ok(Self::with_scope(
            Ipv6Address::from(addr.sin6_addr.s6_addr),
            Port::from_be(addr.sin6_port),
            addr.sin6_flowinfo,
            addr.sin6_scope_id,
        ))
    }
}

impl fmt::Display for Ipv6Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}", self.address)?;

        if self.scope_id != 0 {
            write!(f, "%{}", self.scope_id)?;
        }

        write!(f, "]")?;

        if !self.is_wildcard_port() {
            write!(f, ":{}", self.port)?;
        }

        Ok(())
    }
}
