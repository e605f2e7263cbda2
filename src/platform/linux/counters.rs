//! Interface, protocol and conntrack counters.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{NetProbeError, Result};
use crate::host::{path_exists, read_ints, read_lines, ProcRoot};
use crate::model::{FilterStat, InterfaceCounters, ProtocolCounters};

/// Protocol sections of `/proc/net/snmp` reported when none are requested.
pub const NET_PROTOCOLS: [&str; 6] = ["ip", "icmp", "icmpmsg", "tcp", "udp", "udplite"];

const DEV_HEADER_LINES: usize = 2;
const DEV_FIELDS: usize = 16;

/// Parse a `/proc/net/dev` style file.
///
/// Every counter must be numeric; a bad field fails the whole read.
pub fn interface_counters_from_file(
    per_interface: bool,
    path: &Path,
) -> Result<Vec<InterfaceCounters>> {
    let lines = read_lines(path)?;

    let mut ret = Vec::with_capacity(lines.len().saturating_sub(DEV_HEADER_LINES));
    for line in lines.iter().skip(DEV_HEADER_LINES) {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let fields: Vec<&str> = rest.split_whitespace().collect();
        if fields.len() < DEV_FIELDS {
            return Err(NetProbeError::format(
                path,
                format!(
                    "interface {} has {} counters, expected {}",
                    name,
                    fields.len(),
                    DEV_FIELDS
                ),
            ));
        }
        let field = |i: usize| -> Result<u64> {
            fields[i].parse().map_err(|_| {
                NetProbeError::Parse(format!(
                    "invalid counter {:?} for {} in {}",
                    fields[i],
                    name,
                    path.display()
                ))
            })
        };

        ret.push(InterfaceCounters {
            name: name.to_string(),
            bytes_recv: field(0)?,
            packets_recv: field(1)?,
            errin: field(2)?,
            dropin: field(3)?,
            bytes_sent: field(8)?,
            packets_sent: field(9)?,
            errout: field(10)?,
            dropout: field(13)?,
        });
    }

    if per_interface {
        return Ok(ret);
    }

    let mut all = InterfaceCounters {
        name: "all".to_string(),
        ..Default::default()
    };
    for nic in &ret {
        all.accumulate(nic);
    }
    Ok(vec![all])
}

pub fn interface_counters(root: &ProcRoot, per_interface: bool) -> Result<Vec<InterfaceCounters>> {
    interface_counters_from_file(per_interface, &root.join("net/dev"))
}

/// Parse the header/value line pairs of `/proc/net/snmp`.
pub fn protocol_counters(root: &ProcRoot, protocols: &[String]) -> Result<Vec<ProtocolCounters>> {
    protocol_counters_from_file(protocols, &root.join("net/snmp"))
}

pub(crate) fn protocol_counters_from_file(
    protocols: &[String],
    path: &Path,
) -> Result<Vec<ProtocolCounters>> {
    let wanted: HashSet<String> = if protocols.is_empty() {
        NET_PROTOCOLS.iter().map(|p| p.to_string()).collect()
    } else {
        protocols.iter().map(|p| p.to_lowercase()).collect()
    };

    let lines = read_lines(path)?;
    let mut stats = Vec::with_capacity(wanted.len());

    let mut i = 0;
    while i < lines.len() {
        let header = &lines[i];
        let Some((proto, names)) = header.split_once(':') else {
            return Err(NetProbeError::format(path, "expected ':'"));
        };
        let proto = proto.to_lowercase();
        if !wanted.contains(&proto) {
            i += 2;
            continue;
        }

        let values = lines
            .get(i + 1)
            .and_then(|l| l.split_once(':'))
            .map(|(_, v)| v)
            .ok_or_else(|| NetProbeError::format(path, format!("missing values for {}", proto)))?;

        let names: Vec<&str> = names.split_whitespace().collect();
        let values: Vec<&str> = values.split_whitespace().collect();
        if names.len() != values.len() {
            return Err(NetProbeError::format(
                path,
                "expected same number of columns",
            ));
        }

        let mut counters = BTreeMap::new();
        for (name, value) in names.iter().zip(&values) {
            let value: i64 = value.parse().map_err(|_| {
                NetProbeError::Parse(format!("invalid {} counter {}={:?}", proto, name, value))
            })?;
            counters.insert(name.to_string(), value);
        }
        stats.push(ProtocolCounters {
            protocol: proto,
            stats: counters,
        });
        i += 2;
    }

    Ok(stats)
}

/// Conntrack occupancy. Missing files mean conntrack is not available on
/// this host, which is reported as [`NetProbeError::Unsupported`].
pub fn filter_counters(root: &ProcRoot) -> Result<Vec<FilterStat>> {
    let count_file = root.join("sys/net/netfilter/nf_conntrack_count");
    let max_file = root.join("sys/net/netfilter/nf_conntrack_max");

    for file in [&count_file, &max_file] {
        if !path_exists(file) {
            return Err(NetProbeError::Unsupported(format!(
                "connection tracking not available: {} missing",
                file.display()
            )));
        }
    }

    Ok(vec![FilterStat {
        conntrack_count: read_single(&count_file)?,
        conntrack_max: read_single(&max_file)?,
    }])
}

fn read_single(path: &Path) -> Result<u64> {
    let ints = read_ints(path)?;
    let first = ints
        .first()
        .copied()
        .ok_or_else(|| NetProbeError::format(path, "expected an integer"))?;
    u64::try_from(first)
        .map_err(|_| NetProbeError::Parse(format!("negative value {} in {}", first, path.display())))
}
