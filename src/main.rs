/*!
 * Command-line interface for GLM
 */

use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use glm::app::App;
use glm::config::{Args, Command, Config};
use glm::{cli, menu};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("glm={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install the log subscriber: {}", e);
    }
}

fn run(args: Args) -> glm::Result<()> {
    // Completions don't need a configuration store
    if let Some(Command::Completions { shell }) = &args.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = Config::from_args(&args);
    config.validate()?;

    let mut app = App::open(config)?;
    match &args.command {
        Some(command) => cli::run(&mut app, command),
        None => menu::run(&mut app),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("X").red().bright(), e);
            ExitCode::FAILURE
        }
    }
}
