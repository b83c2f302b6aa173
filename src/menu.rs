/*!
 * Interactive menu
 *
 * Loops over the main menu until the user exits. Recoverable errors (missing
 * paths, identical libraries, invalid library roots) are printed and the menu
 * is shown again; anything else ends the session.
 */

use std::path::PathBuf;

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::app::App;
use crate::cli::copy_package;
use crate::error::Result;
use crate::transfer::{check_library_pair, TransferRequest};

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MenuItem {
    #[strum(to_string = "Copy a package")]
    Copy,
    #[strum(to_string = "List libraries")]
    ListLibraries,
    #[strum(to_string = "Add library")]
    AddLibrary,
    #[strum(to_string = "Remove library")]
    RemoveLibrary,
    #[strum(to_string = "Exit")]
    Exit,
}

fn print_banner() {
    println!();
    println!("{}", style("╔═══════════════════════════════╗").blue().bright());
    println!("{}", style("║   GLM · package library mover ║").blue().bright());
    println!("{}", style("╚═══════════════════════════════╝").blue().bright());
    println!();
}

fn print_failure(message: impl std::fmt::Display) {
    println!("{} {}\n", style("X").red().bright(), message);
}

/// Run the menu until the user picks Exit
pub fn run(app: &mut App) -> Result<()> {
    let theme = ColorfulTheme::default();
    let term = Term::stderr();
    let items: Vec<MenuItem> = MenuItem::iter().collect();

    if let Err(e) = term.clear_screen() {
        debug!("Could not clear the terminal: {}", e);
    }
    print_banner();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact_on(&term)?;

        let outcome = match items[choice] {
            MenuItem::Copy => copy(app, &theme, &term),
            MenuItem::ListLibraries => {
                list(app);
                Ok(())
            }
            MenuItem::AddLibrary => add(app, &theme, &term),
            MenuItem::RemoveLibrary => remove(app, &theme, &term),
            MenuItem::Exit => return Ok(()),
        };

        match outcome {
            Err(e) if e.is_recoverable() => print_failure(e),
            other => other?,
        }
    }
}

fn list(app: &App) {
    for (i, root) in app.catalog().list().iter().enumerate() {
        println!("{} {}", style(format!("{}.", i + 1)).blue().bright(), root.display());
    }
}

fn library_labels(app: &App) -> Vec<String> {
    app.catalog()
        .list()
        .iter()
        .map(|root| root.display().to_string())
        .collect()
}

fn copy(app: &App, theme: &ColorfulTheme, term: &Term) -> Result<()> {
    let libraries = app.catalog().list().to_vec();
    if libraries.is_empty() {
        print_failure("There are no libraries setup. Set one up and try again.");
        return Ok(());
    }
    if libraries.len() < 2 {
        print_failure("You need at least 2 libraries setup.");
        return Ok(());
    }

    let labels = library_labels(app);
    let source = Select::with_theme(theme)
        .with_prompt("Which library would you like to copy from?")
        .items(&labels)
        .default(0)
        .interact_on(term)?;
    let destination = Select::with_theme(theme)
        .with_prompt("Which library would you like to copy to?")
        .items(&labels)
        .default(0)
        .interact_on(term)?;

    let source = &libraries[source];
    let destination = &libraries[destination];
    check_library_pair(source, destination)?;

    let packages = app.packages(source)?;
    if packages.is_empty() {
        print_failure(format!("No packages found in {}", source.display()));
        return Ok(());
    }

    let names: Vec<&str> = packages.iter().map(|p| p.display_name.as_str()).collect();
    let selected = Select::with_theme(theme)
        .with_prompt("Which package would you like to copy?")
        .items(&names)
        .default(0)
        .max_length(15)
        .interact_on(term)?;
    let package = &packages[selected];

    let request = TransferRequest::for_package(source, destination, package);
    copy_package(app, &request, &package.display_name, false)?;
    Ok(())
}

fn add(app: &mut App, theme: &ColorfulTheme, term: &Term) -> Result<()> {
    let layout = app.config().layout.clone();
    let answer: String = Input::with_theme(theme)
        .with_prompt("Path to library")
        .validate_with(|value: &String| -> std::result::Result<(), String> {
            layout
                .validate_root(&PathBuf::from(value.trim()))
                .map_err(|e| e.to_string())
        })
        .interact_text_on(term)?;

    let (root, added) = app.add_library(&PathBuf::from(answer.trim()))?;
    if !added {
        println!("{} is already in the list\n", root.display());
    }
    Ok(())
}

fn remove(app: &mut App, theme: &ColorfulTheme, term: &Term) -> Result<()> {
    if app.catalog().is_empty() {
        print_failure("There are no libraries setup. Set one up and try again.");
        return Ok(());
    }

    let labels = library_labels(app);
    let selected = Select::with_theme(theme)
        .with_prompt("Which library would you like to remove?")
        .items(&labels)
        .default(0)
        .interact_on(term)?;
    app.remove_library(&(selected + 1).to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels() {
        let labels: Vec<String> = MenuItem::iter().map(|i| i.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Copy a package",
                "List libraries",
                "Add library",
                "Remove library",
                "Exit"
            ]
        );
    }
}
