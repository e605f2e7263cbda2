//! Parser for `/proc/net/unix`.

use std::path::Path;

use super::inode::{InodeIndex, Owner};
use crate::error::{NetProbeError, Result};
use crate::host::read_lines;
use crate::model::{Address, ConnectionRecord, Family, SocketStatus, SocketType};

const TYPE: usize = 4;
const INODE: usize = 6;
const PATH: usize = 7;

/// Parse the UNIX socket table, emitting one record per owning descriptor.
///
/// Sockets nobody owns still appear once, with pid and fd 0. The pid filter
/// applies to each owner separately. An unparsable type column is an error:
/// unlike INET addresses it means the table layout itself changed.
pub fn parse_unix_table(
    path: &Path,
    index: &InodeIndex,
    filter_pid: Option<u32>,
) -> Result<Vec<ConnectionRecord>> {
    let lines = read_lines(path)?;
    let unowned = [Owner::default()];

    let mut records = Vec::new();
    for line in lines.iter().skip(1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() <= INODE {
            continue;
        }

        let raw_type: u32 = tokens[TYPE].parse().map_err(|_| {
            NetProbeError::Parse(format!(
                "invalid socket type {:?} in {}",
                tokens[TYPE],
                path.display()
            ))
        })?;

        let owners = tokens[INODE]
            .parse::<u64>()
            .ok()
            .and_then(|inode| index.owners(inode))
            .unwrap_or(&unowned);

        // Paths may contain spaces; everything after the inode is the path.
        let sock_path = if tokens.len() > PATH {
            tokens[PATH..].join(" ")
        } else {
            String::new()
        };

        for owner in owners {
            if let Some(pid) = filter_pid {
                if owner.pid != pid {
                    continue;
                }
            }
            records.push(ConnectionRecord {
                fd: owner.fd,
                family: Family::Unix,
                socket_type: SocketType::from_raw(raw_type),
                local: Address {
                    ip: sock_path.clone(),
                    port: 0,
                },
                remote: Address::default(),
                status: SocketStatus::None,
                pid: owner.pid,
                path: (!sock_path.is_empty()).then(|| sock_path.clone()),
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "Num       RefCount Protocol Flags    Type St Inode Path";

    fn write_unix(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("unix");
        let mut content = format!("{}\n", HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unowned_socket_appears_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_unix(
            tmp.path(),
            &["0000000000000000: 00000002 00000000 00010000 0001 01 17003 /run/systemd/notify"],
        );
        let records = parse_unix_table(&path, &InodeIndex::default(), None).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.pid, 0);
        assert_eq!(rec.fd, 0);
        assert_eq!(rec.status, SocketStatus::None);
        assert_eq!(rec.family, Family::Unix);
        assert_eq!(rec.socket_type, SocketType::Stream);
        assert_eq!(rec.local.ip, "/run/systemd/notify");
        assert_eq!(rec.path.as_deref(), Some("/run/systemd/notify"));
    }

    #[test]
    fn test_shared_socket_yields_record_per_owner() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_unix(
            tmp.path(),
            &["0000000000000000: 00000003 00000000 00000000 0002 01 500"],
        );
        let mut index = InodeIndex::default();
        index.insert(500, Owner { pid: 10, fd: 3 });
        index.insert(500, Owner { pid: 11, fd: 3 });

        let records = parse_unix_table(&path, &index, None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].socket_type, SocketType::Datagram);
        assert!(records[0].path.is_none());
        assert_eq!(records[0].local.ip, "");

        let filtered = parse_unix_table(&path, &index, Some(11)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pid, 11);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_unix(tmp.path(), &["0000000000000000: 00000002 00000000 00010000"]);
        let records = parse_unix_table(&path, &InodeIndex::default(), None).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_bad_type_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_unix(
            tmp.path(),
            &["0000000000000000: 00000002 00000000 00010000 zz 01 17003"],
        );
        let err = parse_unix_table(&path, &InodeIndex::default(), None).unwrap_err();
        assert!(matches!(err, NetProbeError::Parse(_)));
    }
}
