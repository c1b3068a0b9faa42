use std::{fmt, hash::{Hash, Hasher}, str::FromStr};

use rustc_hash::FxHasher;

use super::{AddressError, Family, Ipv4Address, Port, SocketAddress};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ParseMode {
    // Malformed input is an error
    #[default]
    Strict,

    /*
        Malformed address or port text silently becomes the wildcard.
        Only for callers that depend on the old fallback behaviour.
    */
    Lenient,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Ipv4Endpoint {
    address: Ipv4Address,
    port: Port,
}

impl Ipv4Endpoint {

    pub fn new(address: Ipv4Address, port: Port) -> Self {
        Self { address, port }
    }

    pub fn address(&self) -> Ipv4Address { self.address }
    pub fn port(&self) -> Port { self.port }

    pub fn set_port(&mut self, port: Port) { self.port = port; }

    pub fn is_wildcard_address(&self) -> bool { self.address.is_wildcard() }
    pub fn is_wildcard_port(&self) -> bool { self.port.is_wildcard() }

    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard_address() && self.is_wildcard_port()
    }

    pub fn parse(endpoint: Option<&str>) -> Result<Self, AddressError> {
        Self::parse_with(endpoint, ParseMode::Strict)
    }

    /*
        Accepted forms:
            ""  / None              any address, any port
            "*" / "*.*.*.*"         any address, any port
            "<port>"                any address, that port
            "<address>"             that address, any port
            "<address>:<port>"      both given

        Only the first ':' splits. A lone token is checked for the wildcard
        first, then for a number, and only then taken as an address.
    */
    pub fn parse_with(endpoint: Option<&str>, mode: ParseMode) -> Result<Self, AddressError> {
        let endpoint = match endpoint {
            None | Some("") => return Ok(Self::default()),
            Some(endpoint) => endpoint,
        };

        match endpoint.split_once(':') {
            Some((address, port)) => Ok(Self::new(
                Self::address_part(address, mode)?,
                Self::port_part(port, mode)?,
            )),
            None if Self::is_wildcard_token(endpoint) => Ok(Self::default()),
            None if Port::is_numeric(endpoint) => Ok(Self::new(
                Ipv4Address::WILDCARD,
                Self::port_part(endpoint, mode)?,
            )),
            None => Ok(Self::new(
                Self::address_part(endpoint, mode)?,
                Port::WILDCARD,
            )),
        }
    }

    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn is_wildcard_token(token: &str) -> bool {
        token == "*" || token == "*.*.*.*"
    }

    fn address_part(address: &str, mode: ParseMode) -> Result<Ipv4Address, AddressError> {
        if Self::is_wildcard_token(address) {
            return Ok(Ipv4Address::WILDCARD);
        }

        match Ipv4Address::parse(Some(address)) {
            Err(err) if mode == ParseMode::Lenient => {
                warn!("{}; using the wildcard address instead", err);
                Ok(Ipv4Address::WILDCARD)
            },
            result => result,
        }
    }

    fn port_part(port: &str, mode: ParseMode) -> Result<Port, AddressError> {
        if port.is_empty() {
            return Ok(Port::WILDCARD);
        }

        match port.parse::<Port>() {
            Err(err) if mode == ParseMode::Lenient => {
                warn!("{}; using the wildcard port instead", err);
                Ok(Port::WILDCARD)
            },
            result => result,
        }
    }
}

impl SocketAddress for Ipv4Endpoint {
    const FAMILY: Family = Family::Ipv4;

    fn len(&self) -> usize {
        std::mem::size_of::<libc::sockaddr_in>()
    }
}

impl FromStr for Ipv4Endpoint {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl From<std::net::SocketAddrV4> for Ipv4Endpoint {
    fn from(addr: std::net::SocketAddrV4) -> Self {
        Self::new(Ipv4Address::from(*addr.ip()), Port::new(addr.port()))
    }
}

impl From<Ipv4Endpoint> for libc::sockaddr_in {
    fn from(endpoint: Ipv4Endpoint) -> Self {
        let mut addr: libc::sockaddr_in = unsafe { std::mem::zeroed() };

        set_sockaddr_len!(addr, sin_len, endpoint.len());
        addr.sin_family = Family::Ipv4.as_raw();
        addr.sin_port = endpoint.port.to_be();
        addr.sin_addr = libc::in_addr {
            s_addr: endpoint.address.to_network_u32(),
        };

        addr
    }
}

impl TryFrom<libc::sockaddr_in> for Ipv4Endpoint {
    type Error = AddressError;

    fn try_from(addr: libc::sockaddr_in) -> Result<Self, Self::Error> {
        let family = Family::try_from(addr.sin_family)?;

        if family != Family::Ipv4 {
            return Err(AddressError::UnsupportedFamily(family));
        }

        Ok(Self::new(
            Ipv4Address::from_network_u32(addr.sin_addr.s_addr),
            Port::from_be(addr.sin_port),
        ))
    }
}

impl fmt::Display for Ipv4Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_wildcard_port() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn parse(s: &str) -> Result<Ipv4Endpoint, AddressError> {
        s.parse::<Ipv4Endpoint>()
    }

    #[test]
    fn test_parse_wildcards() {
        let expected = Ipv4Endpoint::default();
        assert_eq!(Ipv4Endpoint::parse(None), Ok(expected));
        assert_eq!(parse(""), Ok(expected));
        assert_eq!(parse("*"), Ok(expected));
        assert_eq!(parse("*.*.*.*"), Ok(expected));
        assert!(expected.is_wildcard());
        assert_eq!(expected.to_string(), "*.*.*.*");
    }

    #[test]
    fn test_parse_address_only() {
        let endpoint = parse("192.168.0.1").unwrap();
        assert_eq!(endpoint.address(), Ipv4Address::from_octets(192, 168, 0, 1));
        assert!(endpoint.is_wildcard_port());
        assert_eq!(endpoint.to_string(), "192.168.0.1");
    }

    #[test]
    fn test_parse_address_and_port() {
        let endpoint = parse("192.168.0.1:80").unwrap();
        assert_eq!(endpoint.address(), Ipv4Address::from_octets(192, 168, 0, 1));
        assert_eq!(endpoint.port(), Port::new(80));
        assert_eq!(endpoint.to_string(), "192.168.0.1:80");
    }

    #[test]
    fn test_parse_port_only() {
        let endpoint = parse("8080").unwrap();
        assert!(endpoint.is_wildcard_address());
        assert_eq!(endpoint.port(), Port::new(8080));
        // A bare port comes back in its fully specified form
        assert_eq!(endpoint.to_string(), "*.*.*.*:8080");
    }

    #[test]
    fn test_parse_wildcard_address_with_port() {
        for input in ["*:8080", "*.*.*.*:8080", ":8080"] {
            let endpoint = parse(input).unwrap();
            assert!(endpoint.is_wildcard_address(), "{input}");
            assert_eq!(endpoint.port(), Port::new(8080), "{input}");
        }
    }

    #[test]
    fn test_parse_empty_port_is_wildcard() {
        let endpoint = parse("10.0.0.1:").unwrap();
        assert_eq!(endpoint, Ipv4Endpoint::new(Ipv4Address::from_octets(10, 0, 0, 1), Port::WILDCARD));
    }

    #[test]
    fn test_parse_zero_port_is_wildcard() {
        let endpoint = parse("10.0.0.1:0").unwrap();
        assert!(endpoint.is_wildcard_port());
        assert_eq!(endpoint.to_string(), "10.0.0.1");
        assert_eq!(parse("0").unwrap(), Ipv4Endpoint::default());
    }

    #[test]
    fn test_parse_splits_at_first_colon_only() {
        assert_eq!(
            parse("10.0.0.1:80:90"),
            Err(AddressError::InvalidPort("80:90".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse("999.1.1.1"), Err(AddressError::InvalidAddress("999.1.1.1".to_string())));
        assert_eq!(parse("1.2.3"), Err(AddressError::InvalidAddress("1.2.3".to_string())));
        assert_eq!(parse("host:notaport"), Err(AddressError::InvalidAddress("host".to_string())));
        assert_eq!(parse("1.2.3.4:notaport"), Err(AddressError::InvalidPort("notaport".to_string())));
        assert_eq!(parse("1.2.3.4:70000"), Err(AddressError::InvalidPort("70000".to_string())));
        assert_eq!(parse("70000"), Err(AddressError::InvalidPort("70000".to_string())));
        assert!(parse("host:70000").is_err());
        assert!(parse("localhost").is_err());
        assert!(parse("**").is_err());
    }

    #[test]
    fn test_parse_lenient_falls_back_to_wildcards() {
        let lenient = |s| Ipv4Endpoint::parse_with(Some(s), ParseMode::Lenient).unwrap();

        assert_eq!(lenient("999.1.1.1"), Ipv4Endpoint::default());
        assert_eq!(lenient("host:notaport"), Ipv4Endpoint::default());
        assert_eq!(lenient("host:80"), Ipv4Endpoint::new(Ipv4Address::WILDCARD, Port::new(80)));
        assert_eq!(
            lenient("10.0.0.1:70000"),
            Ipv4Endpoint::new(Ipv4Address::from_octets(10, 0, 0, 1), Port::WILDCARD)
        );
        assert_eq!(lenient("70000"), Ipv4Endpoint::default());
        assert_eq!(lenient("10.0.0.1:80"), parse("10.0.0.1:80").unwrap());
    }

    #[test]
    fn test_format_parse_idempotent() {
        let inputs = [
            "", "*", "*.*.*.*", "8080", "*:8080", "192.168.0.1", "192.168.0.1:80",
            "0.0.0.0", "0.0.0.0:22", "255.255.255.255:65535", "10.0.0.1:",
        ];

        for input in inputs {
            let once = parse(input).unwrap().to_string();
            let twice = parse(&once).unwrap().to_string();
            assert_eq!(once, twice, "{input:?}");
        }
    }

    #[test]
    fn test_equality_across_construction_paths() {
        let parsed = parse("192.168.0.1:80").unwrap();
        let built = Ipv4Endpoint::new(Ipv4Address::from_octets(192, 168, 0, 1), Port::new(80));
        let mut set_later = Ipv4Endpoint::new(Ipv4Address::from_octets(192, 168, 0, 1), Port::WILDCARD);
        set_later.set_port(Port::new(80));

        assert_eq!(parsed, built);
        assert_eq!(parsed, set_later);
        assert_eq!(parsed.hash_value(), built.hash_value());
        assert_eq!(parsed.hash_value(), set_later.hash_value());

        let mut set = FxHashSet::default();
        set.insert(parsed);
        set.insert(built);
        set.insert(set_later);
        set.insert(parse("192.168.0.1:81").unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_port_keeps_address() {
        let mut endpoint = parse("10.0.0.1:80").unwrap();
        endpoint.set_port(Port::new(443));
        assert_eq!(endpoint.address(), Ipv4Address::from_octets(10, 0, 0, 1));
        assert_eq!(endpoint.to_string(), "10.0.0.1:443");
        assert_eq!(endpoint.family(), Family::Ipv4);
    }

    #[test]
    fn test_std_conversion() {
        let std_addr: std::net::SocketAddrV4 = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(Ipv4Endpoint::from(std_addr), parse("127.0.0.1:9000").unwrap());
    }

    // --- libc Interop Tests ---

    #[test]
    fn test_sockaddr_in_roundtrip() {
        let endpoint = parse("192.168.50.60:12345").unwrap();
        let raw = libc::sockaddr_in::from(endpoint);

        assert_eq!(raw.sin_family as i32, libc::AF_INET);
        assert_eq!(raw.sin_port, 12345u16.to_be());
        assert_eq!(raw.sin_addr.s_addr, u32::from_be_bytes([192, 168, 50, 60]).to_be());
        assert_eq!(Ipv4Endpoint::try_from(raw), Ok(endpoint));
    }

    #[test]
    fn test_sockaddr_in_wrong_family() {
        let mut raw = libc::sockaddr_in::from(Ipv4Endpoint::default());
        raw.sin_family = libc::AF_INET6 as libc::sa_family_t;
        assert_eq!(
            Ipv4Endpoint::try_from(raw),
            Err(AddressError::UnsupportedFamily(Family::Ipv6))
        );
    }

    #[test]
    fn test_len_is_native_size() {
        assert_eq!(Ipv4Endpoint::default().len(), 16);
    }
}
