//! semfora-tags CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use semfora_tags::commands::{
    run_callgraph, run_convert, run_file, run_inspect, run_lookup, run_ping, run_ports,
    run_reload, run_resolve, run_restart_mixer, run_update, CommandContext,
};
use semfora_tags::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "semfora_tags=debug"
    } else {
        "semfora_tags=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> semfora_tags::Result<String> {
    let ctx = CommandContext::from_cli(cli)?;

    match &cli.command {
        Commands::Lookup(args) => run_lookup(args, &ctx),
        Commands::File(args) => run_file(args, &ctx),
        Commands::Ping => run_ping(&ctx),
        Commands::Reload(args) => run_reload(args, &ctx),
        Commands::Update(args) => run_update(args, &ctx),
        Commands::RestartMixer => run_restart_mixer(&ctx),
        Commands::Ports => run_ports(&ctx),
        Commands::Resolve(args) => run_resolve(args, &ctx),
        Commands::Convert(args) => run_convert(args, &ctx),
        Commands::Inspect(args) => run_inspect(args, &ctx),
        Commands::Callgraph(args) => run_callgraph(args, &ctx),
    }
}
