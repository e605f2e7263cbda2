//! Parser for `/proc/net/{tcp,tcp6,udp,udp6}`.

use std::path::Path;

use super::addr::decode_address;
use super::inode::{InodeIndex, Owner};
use crate::error::Result;
use crate::host::{path_exists, read_lines};
use crate::model::{ConnectionRecord, Family, SocketStatus, SocketType};

// Column positions in a data row.
const LOCAL_ADDR: usize = 1;
const REMOTE_ADDR: usize = 2;
const STATE: usize = 3;
const INODE: usize = 9;
const MIN_FIELDS: usize = 10;

/// Parse one INET socket table, joining rows against `index`.
///
/// Rows are attributed to the first owner in the index. With a pid filter
/// only rows owned by that pid are kept; without one, rows nobody owns are
/// kept with pid 0. A missing IPv6 table means the kernel has no IPv6 and
/// yields nothing.
///
/// Rows whose address cannot be decoded are dropped individually instead of
/// failing the table, because the address columns depend on the host's byte
/// layout while the table structure does not.
pub fn parse_inet_table(
    path: &Path,
    family: Family,
    socket_type: SocketType,
    index: &InodeIndex,
    filter_pid: Option<u32>,
) -> Result<Vec<ConnectionRecord>> {
    if family == Family::Inet6 && !path_exists(path) {
        tracing::debug!(path = %path.display(), "no IPv6 table");
        return Ok(Vec::new());
    }
    let lines = read_lines(path)?;

    let mut records = Vec::new();
    for line in lines.iter().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            continue;
        }

        let owner = index.first_owner_of(fields[INODE]).unwrap_or_default();
        if let Some(pid) = filter_pid {
            if owner.pid != pid {
                continue;
            }
        }

        let status = if socket_type == SocketType::Stream {
            tcp_status(fields[STATE])
        } else {
            SocketStatus::None
        };

        let (local, remote) = match (
            decode_address(family, fields[LOCAL_ADDR]),
            decode_address(family, fields[REMOTE_ADDR]),
        ) {
            (Ok(l), Ok(r)) => (l, r),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping row");
                continue;
            }
        };

        let Owner { pid, fd } = owner;
        records.push(ConnectionRecord {
            fd,
            family,
            socket_type,
            local,
            remote,
            status,
            pid,
            path: None,
        });
    }

    Ok(records)
}

fn tcp_status(code: &str) -> SocketStatus {
    SocketStatus::from_tcp_code(code).unwrap_or_else(|| {
        tracing::warn!(code, "unknown TCP state code");
        SocketStatus::Unknown(code.to_string())
    })
}
