//! CLI command implementations.
//!
//! One module per command group:
//! - `configure`: store and verify the account credentials
//! - `admin`: service health and version
//! - `dag`: DAG upload, deployment and run status
//! - `dependency`: shared dependency files
//! - `flow_template`: flow templates and their tags
//! - `flow`: flows, direct uploads and config files
//! - `instance`: running instances, logs and Spark details
//! - `completions`: shell completion scripts
//!
//! Every command runs the same way: its options are resolved and enforced,
//! the handler talks to the service, and the resolved values are persisted
//! once the handler succeeded.

pub mod admin;
pub mod completions;
pub mod configure;
pub mod dag;
pub mod dependency;
pub mod flow;
pub mod flow_template;
pub mod instance;

use clap::ArgMatches;
use insights::config::OptionRegistry;
use insights::{ConfigurationContext, Error, GlobalFlags, Prompter, TerminalPrompter};

use crate::cli::{flag_values, selected_command, GlobalArgs, COMPLETIONS};
use crate::error::CliError;

/// Runs the command selected by `matches`.
pub fn run(registry: OptionRegistry, matches: &ArgMatches) -> Result<(), CliError> {
    let (command, leaf_matches) = selected_command(matches)
        .ok_or_else(|| CliError::InvalidArguments("no command given".into()))?;
    if command == COMPLETIONS {
        return completions::execute(&registry, leaf_matches);
    }

    let args = GlobalArgs::from_matches(matches);
    let globals = GlobalFlags::new(args.verbose, args.interactive, args.config)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let logger = insights::init_logger(args.verbose, false);
    let mut ctx = ConfigurationContext::from_process(registry, globals).with_logger(logger);

    let flags = flag_values(ctx.options(&command)?, leaf_matches);
    let mut prompter = TerminalPrompter::stdio();
    execute(&mut ctx, &command, &flags, &mut prompter)
}

/// Prepares, dispatches and finishes one command.
pub fn execute(
    ctx: &mut ConfigurationContext,
    command: &str,
    flags: &insights::FlagValues,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let report = ctx.prepare(command, flags, prompter)?;
    log::debug!("{command}: {report:?}");
    dispatch(ctx, command, prompter)?;
    if let Some(path) = ctx.finish(command) {
        ctx.logger()
            .debug(&format!("saved configuration to {}", path.display()));
    }
    Ok(())
}

fn dispatch(
    ctx: &mut ConfigurationContext,
    command: &str,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let (group, leaf) = command.split_once(' ').unwrap_or((command, ""));
    match group {
        "configure" => configure::execute(ctx),
        "admin" => admin::execute(ctx, leaf),
        "dag" => dag::execute(ctx, leaf, prompter),
        "dependency" => dependency::execute(ctx, leaf, prompter),
        "flow-template" => flow_template::execute(ctx, leaf, prompter),
        "flow" => flow::execute(ctx, leaf, prompter),
        "instance" => instance::execute(ctx, leaf),
        _ => Err(unknown(command)),
    }
}

/// Error for a command id without a handler.
pub(crate) fn unknown(command: &str) -> CliError {
    CliError::Library(Error::UnknownCommand {
        command: command.to_string(),
    })
}
