mod cli;
mod filter;
mod output;

use clap::Parser;
use cli::{CliArgs, Command};
use filter::ConnFilter;
use netprobe::host::ProcRoot;
use netprobe::platform::{create_provider, NetProvider, ProviderConfig};
use output::OutputFormatter;

fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = ProviderConfig {
        proc_root: args
            .proc_root
            .clone()
            .map(ProcRoot::new)
            .unwrap_or_default(),
    };
    let provider = create_provider(config);

    let filter = match ConnFilter::from_command(&args.command) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error parsing filters: {}", e);
            std::process::exit(1);
        }
    };
    let formatter = OutputFormatter::new(args.json);

    match run_once(&*provider, &args.command, &filter, &formatter) {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` picks debug over warn.
fn init_tracing(verbose: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(filter)
        .init();
}

fn run_once(
    provider: &dyn NetProvider,
    command: &Command,
    filter: &ConnFilter,
    formatter: &OutputFormatter,
) -> netprobe::Result<String> {
    match command {
        Command::Conns { kind, pid, .. } => {
            let mut conns = match pid {
                Some(pid) => provider.connections_for_pid(kind, *pid)?,
                None => provider.connections(kind)?,
            };
            if !filter.is_empty() {
                conns.retain(|c| filter.matches(c));
            }
            formatter.connections(&conns)
        }
        Command::Ifaces { per_nic, file } => {
            let nics = match file {
                Some(path) => provider.interface_counters_from_file(*per_nic, path)?,
                None => provider.interface_counters(*per_nic)?,
            };
            formatter.interfaces(&nics)
        }
        Command::Proto { protocols } => formatter.protocols(&provider.protocol_counters(protocols)?),
        Command::Conntrack => formatter.conntrack(&provider.filter_counters()?),
        Command::Pids => formatter.pids(&provider.pids()?),
    }
}
