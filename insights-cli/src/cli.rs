//! Command-line interface definitions.
//!
//! The clap tree is generated from the option catalogue rather than derived
//! from structs: every registered command id `"<group> <leaf>"` becomes a
//! nested subcommand, and every declared option becomes a `--<name>` flag.
//! Resolution from environment and config file happens in the library, so
//! no option carries a clap default or env binding.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use insights::config::{default_config_path, CommandOptionSet, OptionRegistry};
use insights::{FlagValues, OptionKind, OptionSpec};

/// Name of the installed binary.
pub const BIN_NAME: &str = "pi";

/// Subcommand that prints shell completions.
pub const COMPLETIONS: &str = "completions";

const LONG_ABOUT: &str = "PI is a CLI library for Predix Insights. \
It manages DAGs, dependencies, flow templates, flows and flow instances.

Every option can also be given through its environment variable or picked up \
from the config file, which keeps the values of the last successful command.";

/// One-line help for a command group.
#[must_use]
pub fn group_about(group: &str) -> &'static str {
    match group {
        "admin" => "Admin",
        "dag" => "Directed Acyclic Graph (DAG)",
        "dependency" => "Dependency",
        "flow-template" => "Flow Template",
        "flow" => "Flow",
        "instance" => "Flow Instance",
        _ => "",
    }
}

/// One-line help for a command.
#[must_use]
pub fn command_about(command: &str) -> &'static str {
    match command {
        "configure" => "Login to Predix Insights",
        "admin health-check" => "Health Check for Predix Insights",
        "admin version" => "Predix Insights API Version",
        "dag list" => "List DAG(s)",
        "dag delete" => "Delete a DAG",
        "dag create" => "Create a DAG",
        "dag update" => "Update a DAG",
        "dag deploy" => "Deploy a DAG",
        "dag status" => "List DAG(s) Status",
        "dag list-run" => "List DAG Run(s)",
        "dag list-task" => "List DAG Task(s)",
        "dag task-run-info" => "List DAG Task Run Info",
        "dependency list" => "List Dependencies",
        "dependency deploy" => "Deploy Dependencies",
        "dependency undeploy" => "Undeploy Dependencies",
        "dependency delete" => "Delete a Dependency",
        "dependency create" => "Create a Dependency",
        "flow-template create" => "Create a flow template",
        "flow-template update" => "Update a flow template",
        "flow-template update-spark-args" => "Update Flow Template Spark Arguments",
        "flow-template list" => "List Flow Template(s)",
        "flow-template list-tags" => "List Flow Template Tag(s)",
        "flow-template save-tags" => "Save Flow Template Tag(s)",
        "flow-template delete" => "Delete a Flow Template",
        "flow list" => "List Flow(s)",
        "flow delete" => "Delete a Flow",
        "flow create" => "Create a Flow",
        "flow create-direct" => "Create a Direct Flow",
        "flow update-direct" => "Update a Direct Flow",
        "flow launch" => "Launch a Flow",
        "flow stop" => "Stop a Flow",
        "flow create-flow-template" => "Create a Flow Template",
        "flow update-spark-args" => "Update Flow Spark Arguments",
        "flow add-config-file" => "Add Config File(s) to a Flow",
        "flow delete-config-file" => "Delete a Config File From a Flow",
        "flow list-config-files" => "List Flow Config File(s)",
        "flow save-tags" => "Save Flow Tag(s)",
        "flow list-tags" => "List Flow Tag(s)",
        "instance list-instance" => "List Flow Instance(s)",
        "instance list-containers" => "List Flow Containers",
        "instance stop" => "Stop Flow Instance",
        "instance list-submit-logs" => "List Flow Instance Submit Logs",
        "instance list-container-response" => "List Flow Container Logs Response",
        "instance list-container-logs" => "List Container Logs",
        "instance list-spark-app-details" => "List Spark Application Details",
        "instance list-spark-executor-details" => "List Spark Executor Details",
        "instance list-app-stages" => "List Stages of Application Instance",
        "instance list-attempts" => "List All Attempts by Stage",
        "instance list-attempt-details" => "List Stage Attempt Details",
        "instance list-tasks" => "List All Tasks by Stage",
        _ => "",
    }
}

fn global_args() -> Vec<Arg> {
    let mut config = Arg::new("config")
        .long("config")
        .help("Config file holding the values of previous commands")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .global(true)
        .env("CONFIG");
    if let Ok(path) = default_config_path() {
        config = config.default_value(path.display().to_string());
    }

    vec![
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .help("Dump HTTP requests and responses")
            .global(true)
            .action(ArgAction::SetTrue)
            .value_parser(BoolishValueParser::new())
            .env("VERBOSE"),
        Arg::new("interactive")
            .long("interactive")
            .short('i')
            .help("Prompt for required options")
            .global(true)
            .action(ArgAction::SetTrue)
            .value_parser(BoolishValueParser::new())
            .env("INTERACTIVE"),
        config,
    ]
}

fn option_arg(spec: &OptionSpec) -> Arg {
    let mut help = spec.description().to_string();
    if spec.is_required() {
        help.push_str(" (required)");
    }
    if let Some(alias) = spec.env_alias() {
        help.push_str(&format!(" [env: {alias}]"));
    }

    let mut arg = Arg::new(spec.name().to_string())
        .long(spec.name().to_string())
        .help(help);
    if let Some(short) = spec.short_flag() {
        arg = arg.short(short);
    }
    match spec.kind() {
        OptionKind::String => arg.value_name("VALUE").action(ArgAction::Set),
        // `--force` alone means true; `--force=false` overrides env and file.
        OptionKind::Bool => arg
            .value_name("BOOL")
            .action(ArgAction::Set)
            .value_parser(BoolishValueParser::new())
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        OptionKind::Int => arg
            .value_name("N")
            .action(ArgAction::Set)
            .value_parser(value_parser!(i64)),
    }
}

fn leaf_command(name: &str, set: &CommandOptionSet) -> Command {
    Command::new(name.to_string())
        .about(command_about(set.command()))
        .args(
            set.options()
                .iter()
                .filter(|spec| !spec.is_recorded())
                .map(option_arg),
        )
}

fn completions_command() -> Command {
    Command::new(COMPLETIONS)
        .about("Generate shell completion scripts")
        .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell")
        .arg(
            Arg::new("shell")
                .help("Shell to generate completions for")
                .required(true)
                .value_parser(value_parser!(Shell)),
        )
}

/// Builds the full command tree for a registry.
#[must_use]
pub fn build_cli(registry: &OptionRegistry) -> Command {
    let mut root = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Predix Insights CLI")
        .long_about(LONG_ABOUT)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(global_args());

    let mut groups: BTreeMap<&str, Vec<Command>> = BTreeMap::new();
    for set in registry.commands() {
        match set.command().split_once(' ') {
            Some((group, leaf)) => groups
                .entry(group)
                .or_default()
                .push(leaf_command(leaf, set)),
            None => root = root.subcommand(leaf_command(set.command(), set)),
        }
    }
    for (group, leaves) in groups {
        root = root.subcommand(
            Command::new(group.to_string())
                .about(group_about(group))
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommands(leaves),
        );
    }

    root.subcommand(completions_command())
}

/// Global flags as parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// `--verbose`
    pub verbose: bool,
    /// `--interactive`
    pub interactive: bool,
    /// `--config`, empty when no path could be determined.
    pub config: PathBuf,
}

impl GlobalArgs {
    /// Reads the global flags from the root matches.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            interactive: matches.get_flag("interactive"),
            config: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Walks the matches down to the selected command.
///
/// Returns the registered command id and the matches holding its options.
#[must_use]
pub fn selected_command(matches: &ArgMatches) -> Option<(String, &ArgMatches)> {
    let (group, group_matches) = matches.subcommand()?;
    match group_matches.subcommand() {
        Some((leaf, leaf_matches)) => Some((format!("{group} {leaf}"), leaf_matches)),
        None => Some((group.to_string(), group_matches)),
    }
}

/// Collects the options given on the command line.
///
/// Values clap filled in from anywhere else are left out, so they never
/// shadow the lower resolution layers.
#[must_use]
pub fn flag_values(set: &CommandOptionSet, matches: &ArgMatches) -> FlagValues {
    let mut flags = FlagValues::new();
    for spec in set.options().iter().filter(|spec| !spec.is_recorded()) {
        let name = spec.name();
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        match spec.kind() {
            OptionKind::String => {
                if let Some(value) = matches.get_one::<String>(name) {
                    flags.insert(name, value.clone());
                }
            }
            OptionKind::Bool => {
                if let Some(value) = matches.get_one::<bool>(name) {
                    flags.insert(name, *value);
                }
            }
            OptionKind::Int => {
                if let Some(value) = matches.get_one::<i64>(name) {
                    flags.insert(name, *value);
                }
            }
        }
    }
    flags
}
