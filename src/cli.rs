/*!
 * Non-interactive subcommands
 */

use std::io;
use std::time::Instant;

use clap::CommandFactory;
use console::{style, Term};
use dialoguer::Confirm;

use crate::app::App;
use crate::config::{Args, Command, LibraryCommand};
use crate::error::Result;
use crate::report::{describe_plan, BarReporter, TransferReport};
use crate::transfer::TransferRequest;

/// Print shell completions for `shell`
pub fn print_completions(shell: clap_complete::Shell) {
    let mut command = Args::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
}

/// Run one subcommand to completion
pub fn run(app: &mut App, command: &Command) -> Result<()> {
    match command {
        Command::Libraries(LibraryCommand::List) => {
            for (i, root) in app.catalog().list().iter().enumerate() {
                println!("{} {}", style(format!("{}.", i + 1)).blue().bright(), root.display());
            }
        }
        Command::Libraries(LibraryCommand::Add { path }) => {
            let (root, added) = app.add_library(path)?;
            if added {
                println!("{} Added {}", style("✓").green().bright(), root.display());
            } else {
                println!("{} Already registered: {}", style("-").yellow(), root.display());
            }
        }
        Command::Libraries(LibraryCommand::Remove { library }) => {
            let root = app.remove_library(library)?;
            println!("{} Removed {}", style("✓").green().bright(), root.display());
        }
        Command::Packages { library } => {
            let root = app.library(library)?;
            for package in app.packages(&root)? {
                println!(
                    "{:>10}  {}  ({})",
                    package.app_id, package.display_name, package.install_dir
                );
            }
        }
        Command::Copy {
            from,
            to,
            package,
            yes,
        } => {
            let source = app.library(from)?;
            let destination = app.library(to)?;
            crate::transfer::check_library_pair(&source, &destination)?;

            let manifest = app.find_package(&source, package)?;
            let request = TransferRequest::for_package(&source, &destination, &manifest);
            copy_package(app, &request, &manifest.display_name, *yes)?;
        }
        Command::Completions { shell } => print_completions(*shell),
    }

    Ok(())
}

/// Plan, confirm and execute one transfer, printing the outcome
///
/// Returns `false` when the user declined the confirmation.
pub fn copy_package(app: &App, request: &TransferRequest, name: &str, assume_yes: bool) -> Result<bool> {
    let plan = app.plan_copy(request)?;
    let summary = plan.summary();

    if !assume_yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Are you sure you want to copy: {}?", describe_plan(name, &summary)))
            .default(false)
            .interact_on(&Term::stderr())?;
        if !confirmed {
            return Ok(false);
        }
    }

    let reporter = BarReporter::new(summary.bytes_to_copy);
    let started = Instant::now();
    let result = app.run_copy(request, &plan, &reporter);
    reporter.finish();
    let executed = result?;

    let report = TransferReport {
        package: name.to_string(),
        plan: summary,
        summary: executed,
        duration: started.elapsed(),
    };
    println!("{}", report.render());
    println!("{}", style(format!("Finished copying {}", name)).green().bright());
    Ok(true)
}
