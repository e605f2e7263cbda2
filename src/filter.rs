use crate::cli::Command;
use netprobe::error::{NetProbeError, Result};
use netprobe::model::ConnectionRecord;

/// Post-enumeration filter for the `conns` command.
#[derive(Debug, Default)]
pub struct ConnFilter {
    pub states: Option<StateFilter>,
    pub port: Option<u16>,
}

/// State filter with include/exclude lists, compared case-insensitively.
#[derive(Debug, Default)]
pub struct StateFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a state filter string.
///
/// Format: comma-separated state names, prefix `^` to exclude.
/// Examples: "LISTEN", "^TIME_WAIT", "established,close_wait"
fn parse_state_filter(s: &str) -> Result<StateFilter> {
    let mut filter = StateFilter::default();
    for token in s.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (list, name) = match token.strip_prefix('^') {
            Some(rest) => (&mut filter.exclude, rest),
            None => (&mut filter.include, token),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(NetProbeError::InvalidArgument(format!("invalid state: {}", token)));
        }
        list.push(name.to_ascii_uppercase());
    }
    Ok(filter)
}

impl ConnFilter {
    pub fn from_command(cmd: &Command) -> Result<Self> {
        match cmd {
            Command::Conns { state, port, .. } => Ok(ConnFilter {
                states: state.as_deref().map(parse_state_filter).transpose()?,
                port: *port,
            }),
            _ => Ok(ConnFilter::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_none() && self.port.is_none()
    }

    pub fn matches(&self, conn: &ConnectionRecord) -> bool {
        self.check_state(conn) && self.check_port(conn)
    }

    fn check_state(&self, conn: &ConnectionRecord) -> bool {
        let Some(ref f) = self.states else {
            return true;
        };
        let status = conn.status.to_string();
        if f.exclude.iter().any(|s| *s == status) {
            return false;
        }
        f.include.is_empty() || f.include.iter().any(|s| *s == status)
    }

    fn check_port(&self, conn: &ConnectionRecord) -> bool {
        match self.port {
            Some(p) => conn.local.port == p || conn.remote.port == p,
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
