pub mod counters;
pub mod network;

pub use counters::{FilterStat, InterfaceCounters, ProtocolCounters};
pub use network::{Address, ConnectionKind, ConnectionRecord, Family, SocketStatus, SocketType};
