use std::collections::BTreeMap;

use serde::Serialize;

/// Byte/packet/error/drop counters of one network interface, as found in
/// `/proc/net/dev`. The aggregate over all interfaces is named `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub errin: u64,
    pub errout: u64,
    pub dropin: u64,
    pub dropout: u64,
}

impl InterfaceCounters {
    /// Field-wise sum, keeping `self`'s name. Counters wrap on overflow the
    /// same way the kernel's do.
    pub fn accumulate(&mut self, other: &InterfaceCounters) {
        self.bytes_sent = self.bytes_sent.wrapping_add(other.bytes_sent);
        self.bytes_recv = self.bytes_recv.wrapping_add(other.bytes_recv);
        self.packets_sent = self.packets_sent.wrapping_add(other.packets_sent);
        self.packets_recv = self.packets_recv.wrapping_add(other.packets_recv);
        self.errin = self.errin.wrapping_add(other.errin);
        self.errout = self.errout.wrapping_add(other.errout);
        self.dropin = self.dropin.wrapping_add(other.dropin);
        self.dropout = self.dropout.wrapping_add(other.dropout);
    }
}

/// Named counters of one protocol section of `/proc/net/snmp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolCounters {
    pub protocol: String,
    pub stats: BTreeMap<String, i64>,
}

/// Connection-tracking table occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStat {
    pub conntrack_count: u64,
    pub conntrack_max: u64,
}
