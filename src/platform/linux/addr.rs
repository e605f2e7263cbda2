//! Decoding of the `ADDR:PORT` tokens in `/proc/net/{tcp,tcp6,udp,udp6}`.
//!
//! The kernel prints each 32-bit word of the address in host byte order, so
//! on little-endian machines IPv4 bytes come out reversed and IPv6 comes out
//! as four independently reversed words.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{NetProbeError, Result};
use crate::model::{Address, Family};

/// Decode a token like `0500000A:0016` into `10.0.0.5`, port 22.
pub fn decode_address(family: Family, token: &str) -> Result<Address> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 2 {
        return Err(NetProbeError::MalformedInput(format!(
            "does not contain port: {}",
            token
        )));
    }
    let port = u16::from_str_radix(parts[1], 16)
        .map_err(|_| NetProbeError::MalformedInput(format!("invalid port: {}", token)))?;
    let mut bytes = decode_hex(parts[0])?;

    let ip = match family {
        Family::Inet => {
            let octets: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                NetProbeError::MalformedInput(format!("invalid IPv4 address: {}", parts[0]))
            })?;
            Ipv4Addr::from(u32::from_le_bytes(octets)).to_string()
        }
        _ => {
            if bytes.len() != 16 {
                return Err(NetProbeError::MalformedInput(format!(
                    "invalid IPv6 address: {}",
                    parts[0]
                )));
            }
            for word in bytes.chunks_exact_mut(4) {
                word.reverse();
            }
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&bytes);
            format_ipv6(Ipv6Addr::from(octets))
        }
    };

    Ok(Address { ip, port })
}

/// IPv4-mapped addresses print in dotted form, like `ss` and `netstat` do.
fn format_ipv6(addr: Ipv6Addr) -> String {
    match addr.to_ipv4_mapped() {
        Some(v4) => v4.to_string(),
        None => addr.to_string(),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return Err(NetProbeError::MalformedInput(format!("invalid hex: {}", s)));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| NetProbeError::MalformedInput(format!("invalid hex: {}", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ipv4() {
        let addr = decode_address(Family::Inet, "0500000A:0016").unwrap();
        assert_eq!(addr.ip, "10.0.0.5");
        assert_eq!(addr.port, 22);
    }

    #[test]
    fn test_decode_ipv4_any() {
        let addr = decode_address(Family::Inet, "00000000:0000").unwrap();
        assert_eq!(addr.ip, "0.0.0.0");
        assert_eq!(addr.port, 0);
    }

    #[test]
    fn test_decode_ipv6_reverses_each_word() {
        let addr =
            decode_address(Family::Inet6, "0085002452100113070057A13F025401:0035").unwrap();
        assert_eq!(addr.ip, "2400:8500:1301:1052:a157:7:154:23f");
        assert_eq!(addr.port, 53);
    }

    #[test]
    fn test_decode_ipv6_loopback() {
        let addr =
            decode_address(Family::Inet6, "00000000000000000000000001000000:1F90").unwrap();
        assert_eq!(addr.ip, "::1");
        assert_eq!(addr.port, 8080);
    }

    #[test]
    fn test_decode_ipv4_mapped_ipv6() {
        let addr =
            decode_address(Family::Inet6, "0000000000000000FFFF00000100007F:0050").unwrap();
        assert_eq!(addr.ip, "127.0.0.1");
    }

    #[test]
    fn test_missing_port_is_malformed() {
        let err = decode_address(Family::Inet, "0500000A").unwrap_err();
        assert!(matches!(err, NetProbeError::MalformedInput(_)));
        let err = decode_address(Family::Inet, "05:00:00").unwrap_err();
        assert!(matches!(err, NetProbeError::MalformedInput(_)));
    }

    #[test]
    fn test_bad_hex_is_malformed() {
        assert!(matches!(
            decode_address(Family::Inet, "0500000G:0016"),
            Err(NetProbeError::MalformedInput(_))
        ));
        assert!(matches!(
            decode_address(Family::Inet, "0500000A:ZZ"),
            Err(NetProbeError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_wrong_length_is_malformed() {
        assert!(matches!(
            decode_address(Family::Inet6, "0500000A:0016"),
            Err(NetProbeError::MalformedInput(_))
        ));
        assert!(matches!(
            decode_address(Family::Inet, "0500000A00:0016"),
            Err(NetProbeError::MalformedInput(_))
        ));
    }
}
