//! procfs-backed provider.

mod addr;
mod connections;
mod counters;
mod inet;
mod inode;
mod unix;

use std::path::Path;

pub use addr::decode_address;
pub use connections::tables_for;
pub use counters::NET_PROTOCOLS;
pub use inode::{index_all, index_for_pid, InodeIndex, Owner};

use super::{NetProvider, ProviderConfig};
use crate::error::Result;
use crate::host::ProcRoot;
use crate::model::*;

// ---------------------------------------------------------------------------
// Socket tables
// ---------------------------------------------------------------------------

/// Row layout of a socket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// `tcp`/`udp` style rows; every row has the table's socket type.
    Inet(SocketType),
    /// `unix` rows, each carrying its own socket type.
    Unix,
}

/// A kernel socket table under `net/` and what its rows contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketTable {
    pub family: Family,
    pub layout: TableLayout,
    pub file: &'static str,
}

pub const TCP4: SocketTable = SocketTable {
    family: Family::Inet,
    layout: TableLayout::Inet(SocketType::Stream),
    file: "tcp",
};
pub const TCP6: SocketTable = SocketTable {
    family: Family::Inet6,
    layout: TableLayout::Inet(SocketType::Stream),
    file: "tcp6",
};
pub const UDP4: SocketTable = SocketTable {
    family: Family::Inet,
    layout: TableLayout::Inet(SocketType::Datagram),
    file: "udp",
};
pub const UDP6: SocketTable = SocketTable {
    family: Family::Inet6,
    layout: TableLayout::Inet(SocketType::Datagram),
    file: "udp6",
};
pub const UNIX: SocketTable = SocketTable {
    family: Family::Unix,
    layout: TableLayout::Unix,
    file: "unix",
};

// ---------------------------------------------------------------------------
// LinuxProvider
// ---------------------------------------------------------------------------

pub struct LinuxProvider {
    root: ProcRoot,
}

impl LinuxProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            root: config.proc_root,
        }
    }

    /// Typed variant of [`NetProvider::connections`] and
    /// [`NetProvider::connections_for_pid`].
    pub fn connections_of_kind(
        &self,
        kind: ConnectionKind,
        pid: Option<u32>,
    ) -> Result<Vec<ConnectionRecord>> {
        connections::connections(&self.root, kind, pid)
    }
}

impl NetProvider for LinuxProvider {
    fn interface_counters(&self, per_interface: bool) -> Result<Vec<InterfaceCounters>> {
        counters::interface_counters(&self.root, per_interface)
    }

    fn interface_counters_from_file(
        &self,
        per_interface: bool,
        path: &Path,
    ) -> Result<Vec<InterfaceCounters>> {
        counters::interface_counters_from_file(per_interface, path)
    }

    fn protocol_counters(&self, protocols: &[String]) -> Result<Vec<ProtocolCounters>> {
        counters::protocol_counters(&self.root, protocols)
    }

    fn filter_counters(&self) -> Result<Vec<FilterStat>> {
        counters::filter_counters(&self.root)
    }

    fn connections(&self, kind: &str) -> Result<Vec<ConnectionRecord>> {
        let kind: ConnectionKind = kind.parse()?;
        self.connections_of_kind(kind, None)
    }

    fn connections_for_pid(&self, kind: &str, pid: u32) -> Result<Vec<ConnectionRecord>> {
        let kind: ConnectionKind = kind.parse()?;
        // pid 0 is "no process": the whole system
        let pid = (pid != 0).then_some(pid);
        self.connections_of_kind(kind, pid)
    }

    fn pids(&self) -> Result<Vec<u32>> {
        inode::list_pids(&self.root)
    }
}
