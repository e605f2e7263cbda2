//! Network interface counters, protocol statistics and per-process socket
//! tables read from the Linux procfs.
//!
//! ```no_run
//! use netprobe::platform::{create_provider, NetProvider, ProviderConfig};
//!
//! let provider = create_provider(ProviderConfig::default());
//! for conn in provider.connections("tcp")? {
//!     println!("{} -> {} {} pid={}", conn.local, conn.remote, conn.status, conn.pid);
//! }
//! # Ok::<(), netprobe::error::NetProbeError>(())
//! ```

pub mod error;
pub mod host;
pub mod model;
pub mod platform;

pub use error::{NetProbeError, Result};
