use std::{fmt, hash::{Hash, Hasher}, str::FromStr};

use rustc_hash::FxHasher;

use super::AddressError;

// Byte data is stored as big-endian
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Ipv4Address([u8; 4]);

impl Ipv4Address {

    pub const WILDCARD: Ipv4Address = Ipv4Address([0; 4]);
    pub const LOCALHOST: Ipv4Address = Ipv4Address([127, 0, 0, 1]);
    pub const BROADCAST: Ipv4Address = Ipv4Address([255; 4]);

    pub const fn from_octets(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address([a, b, c, d])
    }

    pub fn octets(&self) -> [u8; 4] { self.0 }

    pub fn is_wildcard(&self) -> bool { self.0 == [0; 4] }

    // The value as it is stored in `in_addr.s_addr`
    pub fn to_network_u32(&self) -> u32 {
        u32::from_ne_bytes(self.0)
    }

    pub fn from_network_u32(s_addr: u32) -> Self {
        Ipv4Address(s_addr.to_ne_bytes())
    }

    // Absent or empty input is the wildcard; anything else must be a dotted quad
    pub fn parse(addr: Option<&str>) -> Result<Self, AddressError> {
        match addr {
            None | Some("") => Ok(Self::WILDCARD),
            Some(addr) => Self::octets_from_str(addr).map(Ipv4Address),
        }
    }

    // Stable across processes, unlike `std`'s randomly seeded hasher
    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn octets_from_str(addr: &str) -> Result<[u8; 4], AddressError> {
        let parts: Vec<&str> = addr.split('.').collect();

        if parts.len() != 4 {
            return Err(AddressError::InvalidAddress(addr.to_string()));
        }

        let mut bytes = [0u8; 4];

        for (byte, part) in bytes.iter_mut().zip(parts) {
            *byte = Self::octet_from_str(part).ok_or_else(|| {
                AddressError::InvalidAddress(addr.to_string())
            })?;
        }

        Ok(bytes)
    }

    /*
        Same rules as inet_pton(3): one to three decimal digits, no sign and
        no leading zero unless the octet is exactly "0"
    */
    fn octet_from_str(part: &str) -> Option<u8> {
        if part.is_empty() || part.len() > 3 {
            return None;
        }

        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        if part.len() > 1 && part.starts_with('0') {
            return None;
        }

        part.parse::<u8>().ok()
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Ipv4Address(octets)
    }
}

impl From<std::net::Ipv4Addr> for Ipv4Address {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Ipv4Address(addr.octets())
    }
}

impl From<Ipv4Address> for std::net::Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        std::net::Ipv4Addr::from(addr.0)
    }
}

impl FromStr for Ipv4Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_wildcard() {
            return write!(f, "*.*.*.*");
        }

        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}
