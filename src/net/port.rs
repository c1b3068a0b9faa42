use std::{fmt, str::FromStr};

use super::AddressError;

// Held in network byte order, the way it sits in `sin_port`
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Port(u16);

impl Port {

    // Port 0: any / unspecified
    pub const WILDCARD: Port = Port(0);

    pub fn new(port: u16) -> Self { Port(port.to_be()) }

    pub fn value(&self) -> u16 { u16::from_be(self.0) }

    pub fn is_wildcard(&self) -> bool { self.0 == 0 }

    pub fn to_be(&self) -> u16 { self.0 }
    pub fn from_be(port: u16) -> Self { Port(port) }

    // Digits only; `str::parse` alone would also take a leading `+`
    pub(crate) fn is_numeric(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Port::new(port)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.value()
    }
}

impl FromStr for Port {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_numeric(s) {
            return Err(AddressError::InvalidPort(s.to_string()));
        }

        s.parse::<u16>()
            .map(Port::new)
            .map_err(|_| AddressError::InvalidPort(s.to_string()))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_creation_and_value() {
        let p1 = Port::from(8080u16);
        let p2 = Port::new(8080);
        assert_eq!(p1, p2);
        assert_eq!(p1.value(), 8080);
        let val: u16 = p1.into();
        assert_eq!(val, 8080);
    }

    #[test]
    fn test_port_display() {
        assert_eq!(format!("{}", Port::from(1234)), "1234");
    }

    #[test]
    fn test_port_byte_order() {
        let port = Port::new(8080);
        assert_eq!(port.to_be(), 8080u16.to_be());
        assert_eq!(Port::from_be(8080u16.to_be()), port);
    }

    #[test]
    fn test_port_wildcard() {
        assert!(Port::WILDCARD.is_wildcard());
        assert!(Port::default().is_wildcard());
        assert!(Port::new(0).is_wildcard());
        assert!(!Port::new(1).is_wildcard());
    }

    #[test]
    fn test_port_parsing_valid() {
        assert_eq!("0".parse::<Port>(), Ok(Port::WILDCARD));
        assert_eq!("80".parse::<Port>(), Ok(Port::new(80)));
        assert_eq!("65535".parse::<Port>(), Ok(Port::new(65535)));
    }

    #[test]
    fn test_port_parsing_invalid() {
        for input in ["", "65536", "70000", "-1", "+80", "http", "80a", " 80"] {
            assert_eq!(
                input.parse::<Port>(),
                Err(AddressError::InvalidPort(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }
}
