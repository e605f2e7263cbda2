use std::collections::HashSet;

use super::inet::parse_inet_table;
use super::inode::{index_all, index_for_pid};
use super::unix::parse_unix_table;
use super::{SocketTable, TableLayout, TCP4, TCP6, UDP4, UDP6, UNIX};
use crate::error::Result;
use crate::host::ProcRoot;
use crate::model::{ConnectionKind, ConnectionRecord};

/// The socket tables read for each kind, in the order they are read.
pub fn tables_for(kind: ConnectionKind) -> &'static [SocketTable] {
    match kind {
        ConnectionKind::All => &[TCP4, TCP6, UDP4, UDP6, UNIX],
        ConnectionKind::Tcp => &[TCP4, TCP6],
        ConnectionKind::Tcp4 => &[TCP4],
        ConnectionKind::Tcp6 => &[TCP6],
        ConnectionKind::Udp => &[UDP4, UDP6],
        ConnectionKind::Udp4 => &[UDP4],
        ConnectionKind::Udp6 => &[UDP6],
        ConnectionKind::Unix => &[UNIX],
        ConnectionKind::Inet => &[TCP4, TCP6, UDP4, UDP6],
        ConnectionKind::Inet4 => &[TCP4, UDP4],
        ConnectionKind::Inet6 => &[TCP6, UDP6],
    }
}

/// List sockets of `kind`, optionally restricted to one pid.
///
/// Records are attributed through the inode index, since the socket tables
/// themselves carry no pid. Identical records (e.g. the same socket reached
/// through several owners that collapse to the same fields) are reported
/// once; order follows table order and then row order.
pub fn connections(
    root: &ProcRoot,
    kind: ConnectionKind,
    pid: Option<u32>,
) -> Result<Vec<ConnectionRecord>> {
    let index = match pid {
        None => index_all(root)?,
        Some(pid) => {
            let index = index_for_pid(root, pid)?;
            if index.is_empty() {
                tracing::debug!(pid, "process holds no sockets");
                return Ok(Vec::new());
            }
            index
        }
    };

    let mut seen = HashSet::new();
    let mut ret = Vec::new();
    for table in tables_for(kind) {
        let path = root.join("net").join(table.file);
        let records = match table.layout {
            TableLayout::Inet(socket_type) => {
                parse_inet_table(&path, table.family, socket_type, &index, pid)?
            }
            TableLayout::Unix => parse_unix_table(&path, &index, pid)?,
        };
        for rec in records {
            if seen.insert(rec.clone()) {
                ret.push(rec);
            }
        }
    }

    Ok(ret)
}
