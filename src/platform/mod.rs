use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::host::ProcRoot;
use crate::model::{ConnectionRecord, FilterStat, InterfaceCounters, ProtocolCounters};

/// Point-in-time network telemetry read from the operating system.
pub trait NetProvider: Send + Sync {
    /// Interface counters; a single `all` record unless `per_interface`.
    fn interface_counters(&self, per_interface: bool) -> Result<Vec<InterfaceCounters>>;
    /// Same as [`NetProvider::interface_counters`] but reading `path`
    /// instead of `net/dev` under the proc root.
    fn interface_counters_from_file(
        &self,
        per_interface: bool,
        path: &Path,
    ) -> Result<Vec<InterfaceCounters>>;
    /// Counters of the named protocols; every known protocol when empty.
    fn protocol_counters(&self, protocols: &[String]) -> Result<Vec<ProtocolCounters>>;
    fn filter_counters(&self) -> Result<Vec<FilterStat>>;
    /// Sockets of the given kind across the whole system.
    fn connections(&self, kind: &str) -> Result<Vec<ConnectionRecord>>;
    /// Sockets of the given kind owned by one process.
    fn connections_for_pid(&self, kind: &str, pid: u32) -> Result<Vec<ConnectionRecord>>;
    fn pids(&self) -> Result<Vec<u32>>;
}

#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub proc_root: ProcRoot,
}

impl ProviderConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        ProviderConfig {
            proc_root: ProcRoot::new(root),
        }
    }
}

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub fn create_provider(config: ProviderConfig) -> Box<dyn NetProvider> {
    Box::new(linux::LinuxProvider::new(config))
}
