use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "netprobe", version, about = "Network counters and socket tables from procfs")]
pub struct CliArgs {
    /// procfs mount to read instead of /proc
    #[arg(long = "proc-root", value_name = "DIR", env = "HOST_PROC", global = true)]
    pub proc_root: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(short = 'j', long = "json", global = true)]
    pub json: bool,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List sockets and their owning processes
    Conns {
        /// all, tcp, tcp4, tcp6, udp, udp4, udp6, unix, inet, inet4, inet6
        #[arg(short = 'k', long = "kind", value_name = "KIND", default_value = "all")]
        kind: String,

        /// Only sockets held by this PID
        #[arg(short = 'p', long = "pid", value_name = "PID")]
        pid: Option<u32>,

        /// States to show (comma-separated, prefix ^ to exclude)
        #[arg(short = 's', long = "state", value_name = "STATES")]
        state: Option<String>,

        /// Only sockets with this local or remote port
        #[arg(long = "port", value_name = "PORT")]
        port: Option<u16>,
    },
    /// Interface byte/packet counters
    Ifaces {
        /// One row per interface instead of the "all" total
        #[arg(long = "per-nic")]
        per_nic: bool,

        /// Read this file instead of net/dev under the proc root
        #[arg(long = "file", value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Protocol counters from net/snmp
    Proto {
        /// Protocols to show (default: ip icmp icmpmsg tcp udp udplite)
        protocols: Vec<String>,
    },
    /// Connection tracking table usage
    Conntrack,
    /// Process IDs under the proc root
    Pids,
}
