//! stargate-deb CLI - packages Stargate as a Debian .deb

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stargate_deb::core::MetaError;
use stargate_deb::util::diagnostic::{emit, suggestions};
use stargate_deb::util::process::CommandError;
use stargate_deb::util::shell::ColorChoice;
use stargate_deb::util::{Diagnostic, GlobalContext, Shell};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            let mut diag = Diagnostic::error(format!("{:#}", e));
            if let Some(suggestion) = suggestion_for(&e) {
                diag = diag.with_suggestion(suggestion);
            }
            emit(&diag, color && std::io::stderr().is_terminal());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("stargate_deb=debug")
    } else if cli.quiet {
        EnvFilter::new("stargate_deb=error")
    } else {
        EnvFilter::new("stargate_deb=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color);

    let ctx = match &cli.source_dir {
        Some(dir) => GlobalContext::with_source_dir(dir)?,
        None => GlobalContext::new()?,
    };

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx, &shell),
        Commands::Control(args) => commands::control::execute(args, &ctx).map(|_| 0),
        Commands::Doctor => commands::doctor::execute(&ctx, cli.verbose),
        Commands::Clean => commands::clean::execute(&ctx, &shell).map(|_| 0),
        Commands::Completions(args) => commands::completions::execute(args).map(|_| 0),
    }
}

/// Pick a `help:` line for errors we recognize.
fn suggestion_for(err: &anyhow::Error) -> Option<&'static str> {
    for cause in err.chain() {
        if let Some(meta) = cause.downcast_ref::<MetaError>() {
            return Some(match meta {
                MetaError::Read { .. } => suggestions::NO_META,
                _ => suggestions::BAD_META,
            });
        }
        if let Some(CommandError::Failed { command, .. }) = cause.downcast_ref::<CommandError>() {
            let program = command.split_whitespace().find(|w| !w.contains('='));
            return Some(if program == Some("make") {
                suggestions::BUILD_FAILED
            } else {
                suggestions::CHECK_TOOLS
            });
        }
    }

    let message = format!("{:#}", err);
    if message.contains("not found in PATH") || message.contains("failed to execute") {
        return Some(suggestions::CHECK_TOOLS);
    }
    None
}
