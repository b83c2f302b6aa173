/*!
 * Configuration handling for glm
 */

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::library::{LibraryLayout, DEFAULT_PACKAGES_DIR};
use crate::store::default_store_path;
use crate::transfer::DEFAULT_CHUNK_SIZE;

/// Command-line arguments for glm
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "glm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy installed packages between storage libraries",
    long_about = "Keeps a list of package libraries and copies an installed package, manifest included, from one library to another. Files already present at the destination with the same size are skipped, so an interrupted copy can simply be run again."
)]
pub struct Args {
    /// Command to run; the interactive menu starts when omitted
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Path of the configuration file holding the library list
    #[clap(long, global = true, env = "GLM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the packages directory inside each library
    #[clap(long, global = true, default_value = DEFAULT_PACKAGES_DIR)]
    pub packages_dir: String,

    /// Size in bytes of each read/write chunk while copying
    #[clap(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Non-interactive commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage the library list
    #[clap(subcommand)]
    Libraries(LibraryCommand),

    /// List the packages installed in a library
    Packages {
        /// Library path or its number from `libraries list`
        library: String,
    },

    /// Copy a package from one library to another
    Copy {
        /// Library to copy from (path or number)
        #[clap(long)]
        from: String,

        /// Library to copy to (path or number)
        #[clap(long)]
        to: String,

        /// Package name, install directory, app id or manifest file name
        package: String,

        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Library list subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LibraryCommand {
    /// Show the registered libraries
    List,
    /// Register a library
    Add {
        /// Library root directory
        path: PathBuf,
    },
    /// Forget a library
    Remove {
        /// Library path or its number from `libraries list`
        library: String,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Configuration file holding the library list
    pub config_file: PathBuf,

    /// Layout of every library root
    pub layout: LibraryLayout,

    /// Chunk size used while streaming files
    pub chunk_size: usize,

    /// Log verbosity
    pub verbose: u8,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            config_file: args.config.clone().unwrap_or_else(default_store_path),
            layout: LibraryLayout::new(args.packages_dir.clone()),
            chunk_size: args.chunk_size,
            verbose: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        crate::ensure!(self.chunk_size > 0, Config, "chunk size must be positive");

        let packages = &self.layout.packages_dir;
        crate::ensure!(
            !packages.is_empty() && !packages.contains(&['/', '\\'][..]) && packages != ".." && packages != ".",
            Config,
            "invalid packages directory name: {:?}",
            packages
        );

        if self.config_file.is_dir() {
            crate::bail!(
                Config,
                "configuration path is a directory: {}",
                self.config_file.display()
            );
        }

        Ok(())
    }
}
