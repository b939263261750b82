use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `shellgate` - allowlisted, injection-proof command execution gateway.
#[derive(Parser, Debug)]
#[command(name = "shellgate")]
#[command(author = "theonlyhennygod")]
#[command(version)]
#[command(about = "Run allowlisted commands behind a strict security policy.", long_about = None)]
pub struct Cli {
    /// Start the session in this directory instead of the data home
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an allowlisted command with argv-separated arguments
    Exec {
        /// Program (optionally with leading flags, e.g. "ls -la")
        command: String,

        /// Arguments passed through untouched
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run an allowlisted command through `su -c`
    ExecRoot {
        command: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Install a package with the manager mapped from --source
    Install {
        package: String,

        /// apt|ubuntu|debian, pacman|arch, yum|rpm; anything else uses pkg
        #[arg(long)]
        source: Option<String>,
    },

    /// Report whether `su -c` works
    CheckRoot,

    /// Print how a path resolves against the session
    Resolve {
        path: String,
    },

    /// Change into a directory and print the resulting cwd
    Cd {
        path: String,
    },

    /// Create the emulated Linux tree under the data directory
    SetupEnv,

    /// Serve JSON-lines requests on stdin/stdout
    Serve,

    /// Show configuration and policy summary
    Status,
}
