//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// stargate-deb - build the Stargate DAW Debian package
#[derive(Parser)]
#[command(name = "stargate-deb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Stargate source directory (contains meta.json and the Makefile)
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "STARGATE_SOURCE_DIR",
        value_name = "DIR"
    )]
    pub source_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build Stargate and package it as a .deb
    Build(BuildArgs),

    /// Print the generated control file and lifecycle scripts
    Control(ControlArgs),

    /// Check that the required host tools are installed
    Doctor,

    /// Remove the staging directory and intermediate .deb
    Clean,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Install the package with apt after building it
    #[arg(short, long)]
    pub install: bool,

    /// Override PLAT_FLAGS passed to make
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub plat_flags: Option<String>,
}

#[derive(Args)]
pub struct ControlArgs {
    /// Architecture to render for (default: query dpkg-architecture)
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
