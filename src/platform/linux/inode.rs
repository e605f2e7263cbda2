//! Socket inode -> owning (pid, fd) index, built from `/proc/[pid]/fd`.

use std::collections::HashMap;

use procfs::process::{FDTarget, Process};
use procfs::ProcError;

use crate::error::{NetProbeError, Result};
use crate::host::ProcRoot;

/// One descriptor referencing a socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Owner {
    pub pid: u32,
    pub fd: u32,
}

/// Maps socket inode numbers to every descriptor that references them.
///
/// A socket shared across `fork` or `dup` has several owners. Owners are kept
/// sorted by (pid, fd), so [`InodeIndex::first_owner`] is stable from one call
/// to the next.
#[derive(Debug, Clone, Default)]
pub struct InodeIndex {
    owners: HashMap<u64, Vec<Owner>>,
}

impl InodeIndex {
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn owners(&self, inode: u64) -> Option<&[Owner]> {
        self.owners.get(&inode).map(Vec::as_slice)
    }

    pub fn first_owner(&self, inode: u64) -> Option<Owner> {
        self.owners(inode).and_then(|o| o.first().copied())
    }

    /// Look up the inode column of a socket table row.
    pub fn first_owner_of(&self, inode: &str) -> Option<Owner> {
        inode.parse().ok().and_then(|i| self.first_owner(i))
    }

    pub(crate) fn insert(&mut self, inode: u64, owner: Owner) {
        self.owners.entry(inode).or_default().push(owner);
    }

    /// Concatenate `other`'s owner lists into this index.
    fn merge(&mut self, other: InodeIndex) {
        for (inode, mut owners) in other.owners {
            self.owners.entry(inode).or_default().append(&mut owners);
        }
    }

    fn sort(&mut self) {
        for owners in self.owners.values_mut() {
            owners.sort_unstable();
            owners.dedup();
        }
    }
}

/// Whether a procfs error means the process went away or hid its fds from us.
fn is_vanished(err: &ProcError) -> bool {
    matches!(err, ProcError::NotFound(_) | ProcError::PermissionDenied(_))
}

/// Index the sockets held by one process.
///
/// A process that exited, or whose fd directory we may not read, simply has
/// no sockets.
pub fn index_for_pid(root: &ProcRoot, pid: u32) -> Result<InodeIndex> {
    let process = match Process::new_with_root(root.join(pid.to_string())) {
        Ok(p) => p,
        Err(e) if is_vanished(&e) => {
            tracing::debug!(pid, error = %e, "process vanished before fd scan");
            return Ok(InodeIndex::default());
        }
        Err(e) => return Err(NetProbeError::Platform(format!("process {}: {}", pid, e))),
    };
    let mut index = index_process(&process, pid);
    index.sort();
    Ok(index)
}

/// Index the sockets held by every process under the proc root.
pub fn index_all(root: &ProcRoot) -> Result<InodeIndex> {
    let mut index = InodeIndex::default();
    let all_procs = procfs::process::all_processes_with_root(root.path())
        .map_err(|e| NetProbeError::Platform(e.to_string()))?;

    for proc_result in all_procs {
        let process = match proc_result {
            Ok(p) => p,
            Err(e) if is_vanished(&e) => {
                tracing::debug!(error = %e, "skipping vanished process");
                continue;
            }
            Err(e) => return Err(NetProbeError::Platform(e.to_string())),
        };
        let pid = match u32::try_from(process.pid) {
            Ok(pid) => pid,
            Err(_) => continue,
        };
        let per_pid = index_process(&process, pid);
        if !per_pid.is_empty() {
            index.merge(per_pid);
        }
    }

    index.sort();
    Ok(index)
}

fn index_process(process: &Process, pid: u32) -> InodeIndex {
    let mut index = InodeIndex::default();

    let fds = match process.fd() {
        Ok(fds) => fds,
        Err(e) => {
            tracing::debug!(pid, error = %e, "cannot read fd directory");
            return index;
        }
    };

    for fd_info in fds {
        // Descriptors closed mid-scan or with unparsable targets are skipped.
        let fd_info = match fd_info {
            Ok(fi) => fi,
            Err(_) => continue,
        };
        let fd = match u32::try_from(fd_info.fd) {
            Ok(fd) => fd,
            Err(_) => continue,
        };
        if let FDTarget::Socket(inode) = fd_info.target {
            index.insert(inode, Owner { pid, fd });
        }
    }

    index
}

/// Numeric entries under the proc root.
pub fn list_pids(root: &ProcRoot) -> Result<Vec<u32>> {
    let all_procs = procfs::process::all_processes_with_root(root.path())
        .map_err(|e| NetProbeError::Platform(e.to_string()))?;

    let mut pids: Vec<u32> = all_procs
        .filter_map(|p| p.ok())
        .filter_map(|p| u32::try_from(p.pid).ok())
        .collect();
    pids.sort_unstable();
    Ok(pids)
}
