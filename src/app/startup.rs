//! Binary entry point: arguments, logging, runtime, command dispatch

use crate::app::cli::args::Args;
use crate::app::cli::commands;
use crate::app::cli::error::CommandError;
use crate::core::error_handling::{describe_for_user, log_error_with_context};
use crate::core::logging::init_logging;
use clap::Parser;

/// Parse the command line, run the command and return the process exit code
pub fn startup() -> i32 {
    let args = Args::parse();
    if !args.use_color() {
        colored::control::set_override(false);
    }

    if let Err(e) = init_logging(&args.log_settings()) {
        eprintln!("Error: Failed to initialize logging: {}", e);
        return 1;
    }
    log::info!(
        "quickmd {} starting",
        crate::core::version::long_version()
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return report(&CommandError::Runtime(e.to_string()), command_name(&args)),
    };

    match runtime.block_on(commands::run(&args)) {
        Ok(()) => 0,
        Err(e) => report(&e, command_name(&args)),
    }
}

fn report(error: &CommandError, context: &str) -> i32 {
    log_error_with_context(error, context);
    eprintln!("Error: {}", describe_for_user(error, context));
    error.exit_code()
}

fn command_name(args: &Args) -> &'static str {
    use crate::app::cli::args::{Command, PluginsAction};

    match &args.command {
        Command::Plugins { action } => match action {
            PluginsAction::List => "plugins list",
            PluginsAction::Enable { .. } => "plugins enable",
            PluginsAction::Disable { .. } => "plugins disable",
        },
        Command::Stats { .. } => "stats",
        Command::Preview { .. } => "preview",
        Command::InsertDiagram { .. } => "insert-diagram",
    }
}
