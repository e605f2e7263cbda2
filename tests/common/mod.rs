#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use tempfile::TempDir;

pub const TCP_HEADER: &str =
    "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";
pub const UNIX_HEADER: &str = "Num       RefCount Protocol Flags    Type St Inode Path";

pub const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  5000      50    0    0    0     0          0         0     5000      50    0    0    0     0       0          0
  eth0: 70000     700    1    2    0     0          0         3    90000     900    4    0    0     5       0          0
 wlan0:   100       1    0    0    0     0          0         0      200       2    0    0    0     0       0          0
";

pub const SNMP: &str = "\
Ip: Forwarding DefaultTTL InReceives InHdrErrors
Ip: 1 64 2000 0
Icmp: InMsgs InErrors OutMsgs
Icmp: 10 0 12
IcmpMsg: InType3 OutType3
IcmpMsg: 10 12
Tcp: RtoAlgorithm RtoMin RtoMax MaxConn ActiveOpens CurrEstab
Tcp: 1 200 120000 -1 300 4
Udp: InDatagrams NoPorts InErrors OutDatagrams
Udp: 900 3 0 880
UdpLite: InDatagrams NoPorts
UdpLite: 0 0
";

/// A throwaway procfs tree.
pub struct FakeProc {
    pub dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("net")).unwrap();
        FakeProc { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write `net/<file>` with a header line followed by `rows`.
    pub fn table(&self, file: &str, header: &str, rows: &[&str]) {
        let mut content = format!("{}\n", header);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        self.write(&format!("net/{}", file), &content);
    }

    /// Give `pid` a descriptor `fd` pointing at `target`.
    pub fn fd(&self, pid: u32, fd: u32, target: &str) {
        let dir = self.dir.path().join(pid.to_string()).join("fd");
        fs::create_dir_all(&dir).unwrap();
        symlink(target, dir.join(fd.to_string())).unwrap();
    }

    pub fn socket(&self, pid: u32, fd: u32, inode: u64) {
        self.fd(pid, fd, &format!("socket:[{}]", inode));
    }
}

/// A tcp/udp table row in kernel layout.
pub fn inet_row(slot: u32, local: &str, remote: &str, state: &str, inode: u64) -> String {
    format!(
        "{:>4}: {} {} {} 00000000:00000000 00:00000000 00000000  1000        0 {} 1 0000000000000000 100 0 0 10 0",
        slot, local, remote, state, inode
    )
}

/// A unix table row; `path` may be empty.
pub fn unix_row(sock_type: u32, inode: u64, path: &str) -> String {
    format!(
        "0000000000000000: 00000002 00000000 00010000 {:04} 01 {} {}",
        sock_type, inode, path
    )
    .trim_end()
    .to_string()
}
