//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A terminal audio recorder with a recordings manager and player
#[derive(Parser)]
#[command(name = "mrecorder")]
#[command(version)]
#[command(about = "A terminal audio recorder with a recordings manager and player")]
#[command(long_about = "A terminal audio recorder with a recordings manager and player.\n\nDEFAULT COMMAND:\n    If no command is specified, 'manage' is used by default.\n\nEXAMPLES:\n    # Browse, play and organize recordings\n    $ mrecorder\n\n    # Record a new take, then print its path\n    $ mrecorder record\n\n    # Import existing files\n    $ mrecorder add ~/Music/take1.ogg ~/Music/take2.flac\n\n    # Rename the second recording of 'mrecorder list'\n    $ mrecorder rename 2 interview")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/mrecorder/mrecorder.toml\n    Recordings list:    ~/.local/share/mrecorder/recordings.txt\n    Logs:               ~/.local/state/mrecorder/mrecorder.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and play recordings (default)
    ///
    /// Space plays or pauses, arrows step, Shift+arrows or the mouse seek.
    /// Press q to quit; the list is saved on exit.
    #[command(visible_alias = "m")]
    Manage,

    /// Record a new take with a live level meter
    ///
    /// Press Enter to save, Space to pause/resume, Escape/q to discard.
    /// Sending SIGUSR1 saves as well. The saved path is printed on stdout.
    #[command(visible_alias = "r")]
    Record,

    /// Add existing OGG, FLAC or WAV files to the list
    Add {
        /// Files to import (plain paths or file:// URLs)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<String>,
    },

    /// Print the numbered recordings list
    #[command(visible_alias = "ls")]
    List,

    /// Remove a recording from the list, keeping the file
    Remove {
        /// Recording number from 'mrecorder list'
        #[arg(value_name = "N")]
        index: usize,
    },

    /// Remove every recording from the list, keeping the files
    Clear,

    /// Delete a recording file and remove it from the list
    Delete {
        /// Recording number from 'mrecorder list'
        #[arg(value_name = "N")]
        index: usize,
    },

    /// Rename a recording file, keeping its folder and extension
    Rename {
        /// Recording number from 'mrecorder list'
        #[arg(value_name = "N")]
        index: usize,

        /// New file name without extension
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Move a recording file into another folder
    Move {
        /// Recording number from 'mrecorder list'
        #[arg(value_name = "N")]
        index: usize,

        /// Destination folder
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Replace a file with the same name in the destination
        #[arg(short, long)]
        force: bool,
    },

    /// Show sample rate, channels, size and duration of a recording
    #[command(visible_alias = "info")]
    Properties {
        /// Recording number from 'mrecorder list'
        #[arg(value_name = "N")]
        index: usize,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the input device in mrecorder.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   mrecorder completions bash > mrecorder.bash
    ///   mrecorder completions zsh > _mrecorder
    ///   mrecorder completions fish > mrecorder.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "mrecorder", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return exit_on_error(commands::handle_list_devices()),
        Some(Commands::Logs) => return exit_on_error(commands::handle_logs()),
        _ => {}
    }

    logging::init_logging()?;
    tracing::debug!("mrecorder {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None | Some(Commands::Manage) => commands::handle_manage().await?,
        Some(Commands::Record) => commands::handle_record().await?,
        Some(Commands::Add { files }) => exit_on_error(commands::handle_add(files))?,
        Some(Commands::List) => exit_on_error(commands::handle_list())?,
        Some(Commands::Remove { index }) => exit_on_error(commands::handle_remove(index))?,
        Some(Commands::Clear) => exit_on_error(commands::handle_clear())?,
        Some(Commands::Delete { index }) => exit_on_error(commands::handle_delete(index))?,
        Some(Commands::Rename { index, name }) => {
            exit_on_error(commands::handle_rename(index, name))?
        }
        Some(Commands::Move { index, dir, force }) => {
            exit_on_error(commands::handle_move(index, dir, force))?
        }
        Some(Commands::Properties { index }) => {
            exit_on_error(commands::handle_properties(index))?
        }
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

/// Prints the error and exits with status 1 instead of returning it.
fn exit_on_error(result: Result<(), anyhow::Error>) -> Result<(), anyhow::Error> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_manage() {
        let cli = Cli::try_parse_from(["mrecorder"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_move_arguments() {
        let cli = Cli::try_parse_from(["mrecorder", "move", "2", "/tmp/out", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Move { index, dir, force }) => {
                assert_eq!(index, 2);
                assert_eq!(dir, PathBuf::from("/tmp/out"));
                assert!(force);
            }
            _ => panic!("expected move"),
        }
    }

    #[test]
    fn test_add_requires_files() {
        assert!(Cli::try_parse_from(["mrecorder", "add"]).is_err());
    }
}
