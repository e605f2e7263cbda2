use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::NetProbeError;

/// An endpoint of a socket. UNIX sockets carry their bound path in `ip`
/// (empty when unnamed) and port 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    pub ip: String,
    pub port: u16,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ip.contains(':') {
            write!(f, "[{}]:{}", self.ip, self.port)
        } else {
            write!(f, "{}:{}", self.ip, self.port)
        }
    }
}

/// Address family, numbered as the kernel numbers `AF_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Unix,
    Inet,
    Inet6,
}

impl Family {
    pub fn as_raw(self) -> u32 {
        match self {
            Family::Unix => 1,
            Family::Inet => 2,
            Family::Inet6 => 10,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Unix => write!(f, "unix"),
            Family::Inet => write!(f, "inet"),
            Family::Inet6 => write!(f, "inet6"),
        }
    }
}

impl Serialize for Family {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_raw())
    }
}

/// Socket type, numbered as the kernel numbers `SOCK_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    Stream,
    Datagram,
    Raw,
    SeqPacket,
    Other(u32),
}

impl SocketType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => SocketType::Stream,
            2 => SocketType::Datagram,
            3 => SocketType::Raw,
            5 => SocketType::SeqPacket,
            n => SocketType::Other(n),
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            SocketType::Stream => 1,
            SocketType::Datagram => 2,
            SocketType::Raw => 3,
            SocketType::SeqPacket => 5,
            SocketType::Other(n) => n,
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketType::Stream => write!(f, "stream"),
            SocketType::Datagram => write!(f, "dgram"),
            SocketType::Raw => write!(f, "raw"),
            SocketType::SeqPacket => write!(f, "seqpacket"),
            SocketType::Other(n) => write!(f, "type{}", n),
        }
    }
}

impl Serialize for SocketType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_raw())
    }
}

/// Connection status. TCP rows carry one of the kernel's TCP states,
/// everything else is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SocketStatus {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    None,
    /// A TCP state code missing from the table above (raw hex code).
    Unknown(String),
}

impl SocketStatus {
    /// Map the two hex digits of the `st` column of `/proc/net/tcp{,6}`.
    /// Returns `None` for codes the kernel did not have when this table was
    /// written.
    pub fn from_tcp_code(code: &str) -> Option<Self> {
        let state = match code.to_ascii_uppercase().as_str() {
            "01" => SocketStatus::Established,
            "02" => SocketStatus::SynSent,
            "03" => SocketStatus::SynRecv,
            "04" => SocketStatus::FinWait1,
            "05" => SocketStatus::FinWait2,
            "06" => SocketStatus::TimeWait,
            "07" => SocketStatus::Close,
            "08" => SocketStatus::CloseWait,
            "09" => SocketStatus::LastAck,
            "0A" => SocketStatus::Listen,
            "0B" => SocketStatus::Closing,
            _ => return None,
        };
        Some(state)
    }
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketStatus::Established => write!(f, "ESTABLISHED"),
            SocketStatus::SynSent => write!(f, "SYN_SENT"),
            SocketStatus::SynRecv => write!(f, "SYN_RECV"),
            SocketStatus::FinWait1 => write!(f, "FIN_WAIT1"),
            SocketStatus::FinWait2 => write!(f, "FIN_WAIT2"),
            SocketStatus::TimeWait => write!(f, "TIME_WAIT"),
            SocketStatus::Close => write!(f, "CLOSE"),
            SocketStatus::CloseWait => write!(f, "CLOSE_WAIT"),
            SocketStatus::LastAck => write!(f, "LAST_ACK"),
            SocketStatus::Listen => write!(f, "LISTEN"),
            SocketStatus::Closing => write!(f, "CLOSING"),
            SocketStatus::None => write!(f, "NONE"),
            SocketStatus::Unknown(code) => write!(f, "{}", code),
        }
    }
}

impl Serialize for SocketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One socket as seen by one owning descriptor.
///
/// `pid` and `fd` are 0 when no process on the system references the socket.
/// Equality covers every field, which is what connection listings dedup on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionRecord {
    pub fd: u32,
    pub family: Family,
    #[serde(rename = "type")]
    pub socket_type: SocketType,
    pub local: Address,
    pub remote: Address,
    pub status: SocketStatus,
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Which socket tables a connection listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    All,
    Tcp,
    Tcp4,
    Tcp6,
    Udp,
    Udp4,
    Udp6,
    Unix,
    Inet,
    Inet4,
    Inet6,
}

impl ConnectionKind {
    pub const NAMES: [&'static str; 11] = [
        "all", "tcp", "tcp4", "tcp6", "udp", "udp4", "udp6", "unix", "inet", "inet4", "inet6",
    ];
}

impl FromStr for ConnectionKind {
    type Err = NetProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "all" => ConnectionKind::All,
            "tcp" => ConnectionKind::Tcp,
            "tcp4" => ConnectionKind::Tcp4,
            "tcp6" => ConnectionKind::Tcp6,
            "udp" => ConnectionKind::Udp,
            "udp4" => ConnectionKind::Udp4,
            "udp6" => ConnectionKind::Udp6,
            "unix" => ConnectionKind::Unix,
            "inet" => ConnectionKind::Inet,
            "inet4" => ConnectionKind::Inet4,
            "inet6" => ConnectionKind::Inet6,
            other => {
                return Err(NetProbeError::InvalidArgument(format!(
                    "invalid kind {:?}, expected one of {}",
                    other,
                    ConnectionKind::NAMES.join(", ")
                )))
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionKind::All => "all",
            ConnectionKind::Tcp => "tcp",
            ConnectionKind::Tcp4 => "tcp4",
            ConnectionKind::Tcp6 => "tcp6",
            ConnectionKind::Udp => "udp",
            ConnectionKind::Udp4 => "udp4",
            ConnectionKind::Udp6 => "udp6",
            ConnectionKind::Unix => "unix",
            ConnectionKind::Inet => "inet",
            ConnectionKind::Inet4 => "inet4",
            ConnectionKind::Inet6 => "inet6",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_display() {
        for name in ConnectionKind::NAMES {
            let kind: ConnectionKind = name.parse().unwrap();
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_kind_rejects_unknown() {
        let err = "invalidkind".parse::<ConnectionKind>().unwrap_err();
        assert!(matches!(err, NetProbeError::InvalidArgument(_)));
    }

    #[test]
    fn test_tcp_codes() {
        assert_eq!(SocketStatus::from_tcp_code("01"), Some(SocketStatus::Established));
        assert_eq!(SocketStatus::from_tcp_code("0A"), Some(SocketStatus::Listen));
        assert_eq!(SocketStatus::from_tcp_code("0a"), Some(SocketStatus::Listen));
        assert_eq!(SocketStatus::from_tcp_code("0C"), None);
        assert_eq!(SocketStatus::CloseWait.to_string(), "CLOSE_WAIT");
    }

    #[test]
    fn test_address_display_brackets_ipv6() {
        let v4 = Address { ip: "10.0.0.5".into(), port: 22 };
        let v6 = Address { ip: "::1".into(), port: 53 };
        assert_eq!(v4.to_string(), "10.0.0.5:22");
        assert_eq!(v6.to_string(), "[::1]:53");
    }

    #[test]
    fn test_record_serializes_raw_numbers() {
        let rec = ConnectionRecord {
            fd: 3,
            family: Family::Inet,
            socket_type: SocketType::Stream,
            local: Address { ip: "127.0.0.1".into(), port: 80 },
            remote: Address { ip: "0.0.0.0".into(), port: 0 },
            status: SocketStatus::Listen,
            pid: 42,
            path: None,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["family"], 2);
        assert_eq!(json["type"], 1);
        assert_eq!(json["status"], "LISTEN");
        assert!(json.get("path").is_none());
    }
}
