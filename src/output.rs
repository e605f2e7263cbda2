use serde::Serialize;

use netprobe::error::{NetProbeError, Result};
use netprobe::model::{ConnectionRecord, FilterStat, InterfaceCounters, ProtocolCounters};

const ADDR_WIDTH: usize = 28;

/// Renders results as column tables or JSON.
pub struct OutputFormatter {
    /// `--json` flag: pretty-printed JSON instead of tables.
    pub json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool) -> Self {
        OutputFormatter { json }
    }

    pub fn connections(&self, conns: &[ConnectionRecord]) -> Result<String> {
        if self.json {
            return to_json(&conns);
        }
        let mut out = format!(
            "{:<6} {:<w$} {:<w$} {:<12} {:>7} {:>4}\n",
            "PROTO", "LOCAL", "REMOTE", "STATUS", "PID", "FD",
            w = ADDR_WIDTH,
        );
        for c in conns {
            let (local, remote) = match c.path {
                Some(ref p) => (p.clone(), String::new()),
                None if c.local.ip.is_empty() && c.local.port == 0 => {
                    (String::new(), String::new())
                }
                None => (c.local.to_string(), c.remote.to_string()),
            };
            out.push_str(&format!(
                "{:<6} {} {} {:<12} {:>7} {:>4}\n",
                proto_name(c),
                fit_str(&local, ADDR_WIDTH),
                fit_str(&remote, ADDR_WIDTH),
                c.status.to_string(),
                c.pid,
                c.fd,
            ));
        }
        Ok(out)
    }

    pub fn interfaces(&self, nics: &[InterfaceCounters]) -> Result<String> {
        if self.json {
            return to_json(&nics);
        }
        let mut out = format!(
            "{:<12} {:>14} {:>12} {:>8} {:>8} {:>14} {:>12} {:>8} {:>8}\n",
            "IFACE", "RX_BYTES", "RX_PKTS", "RX_ERR", "RX_DROP", "TX_BYTES", "TX_PKTS", "TX_ERR",
            "TX_DROP",
        );
        for n in nics {
            out.push_str(&format!(
                "{} {:>14} {:>12} {:>8} {:>8} {:>14} {:>12} {:>8} {:>8}\n",
                fit_str(&n.name, 12),
                n.bytes_recv,
                n.packets_recv,
                n.errin,
                n.dropin,
                n.bytes_sent,
                n.packets_sent,
                n.errout,
                n.dropout,
            ));
        }
        Ok(out)
    }

    /// One `proto.Counter value` line per counter.
    pub fn protocols(&self, stats: &[ProtocolCounters]) -> Result<String> {
        if self.json {
            return to_json(&stats);
        }
        let mut out = String::new();
        for s in stats {
            for (name, value) in &s.stats {
                out.push_str(&format!("{}.{} {}\n", s.protocol, name, value));
            }
        }
        Ok(out)
    }

    pub fn conntrack(&self, stats: &[FilterStat]) -> Result<String> {
        if self.json {
            return to_json(&stats);
        }
        let mut out = format!("{:>10} {:>10}\n", "COUNT", "MAX");
        for s in stats {
            out.push_str(&format!("{:>10} {:>10}\n", s.conntrack_count, s.conntrack_max));
        }
        Ok(out)
    }

    /// PIDs one per line (terse, like `lsof -t`).
    pub fn pids(&self, pids: &[u32]) -> Result<String> {
        if self.json {
            return to_json(&pids);
        }
        Ok(pids.iter().map(|p| format!("{}\n", p)).collect())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut s = serde_json::to_string_pretty(value)
        .map_err(|e| NetProbeError::Platform(format!("JSON encoding failed: {}", e)))?;
    s.push('\n');
    Ok(s)
}

/// `tcp`, `tcp6`, `udp`, `udp6` or `unix`.
fn proto_name(c: &ConnectionRecord) -> &'static str {
    use netprobe::model::{Family, SocketType};
    match (c.family, c.socket_type) {
        (Family::Unix, _) => "unix",
        (Family::Inet, SocketType::Stream) => "tcp",
        (Family::Inet6, SocketType::Stream) => "tcp6",
        (Family::Inet, _) => "udp",
        (Family::Inet6, _) => "udp6",
    }
}

/// Truncate or pad a string to exactly `width` characters.
fn fit_str(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        s.chars().take(width).collect()
    } else {
        format!("{:<width$}", s, width = width)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use netprobe::model::{Address, Family, SocketStatus, SocketType};
    use std::collections::BTreeMap;

    fn tcp_listener() -> ConnectionRecord {
        ConnectionRecord {
            fd: 3,
            family: Family::Inet,
            socket_type: SocketType::Stream,
            local: Address { ip: "0.0.0.0".into(), port: 22 },
            remote: Address { ip: "0.0.0.0".into(), port: 0 },
            status: SocketStatus::Listen,
            pid: 812,
            path: None,
        }
    }

    #[test]
    fn test_fit_str_truncate() {
        assert_eq!(fit_str("longcommandname", 9), "longcomma");
    }

    #[test]
    fn test_fit_str_pad() {
        assert_eq!(fit_str("sh", 9), "sh       ");
    }

    #[test]
    fn test_connections_table() {
        let out = OutputFormatter::new(false).connections(&[tcp_listener()]).unwrap();
        let mut lines = out.lines();
        let header = lines.next().unwrap();
        for col in ["PROTO", "LOCAL", "REMOTE", "STATUS", "PID", "FD"] {
            assert!(header.contains(col), "header should contain {}", col);
        }
        let row = lines.next().unwrap();
        assert!(row.starts_with("tcp "));
        assert!(row.contains("0.0.0.0:22"));
        assert!(row.contains("LISTEN"));
        assert!(row.contains("812"));
    }

    #[test]
    fn test_unix_row_shows_path() {
        let rec = ConnectionRecord {
            fd: 0,
            family: Family::Unix,
            socket_type: SocketType::Stream,
            local: Address { ip: "/run/dbus/system_bus_socket".into(), port: 0 },
            remote: Address::default(),
            status: SocketStatus::None,
            pid: 0,
            path: Some("/run/dbus/system_bus_socket".into()),
        };
        let out = OutputFormatter::new(false).connections(&[rec]).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("unix"));
        assert!(row.contains("/run/dbus/system_bus_socket"));
        assert!(row.contains("NONE"));
    }

    #[test]
    fn test_connections_json() {
        let out = OutputFormatter::new(true).connections(&[tcp_listener()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v[0]["pid"], 812);
        assert_eq!(v[0]["local"]["port"], 22);
        assert_eq!(v[0]["status"], "LISTEN");
    }

    #[test]
    fn test_protocol_lines() {
        let mut stats = BTreeMap::new();
        stats.insert("CurrEstab".to_string(), 7);
        let out = OutputFormatter::new(false)
            .protocols(&[ProtocolCounters { protocol: "tcp".into(), stats }])
            .unwrap();
        assert_eq!(out, "tcp.CurrEstab 7\n");
    }

    #[test]
    fn test_pids_terse() {
        let out = OutputFormatter::new(false).pids(&[1, 42]).unwrap();
        assert_eq!(out, "1\n42\n");
    }
}
