//! Build script for insights-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.
//! Per-command options come from the option catalogue at runtime and are
//! documented by `pi <group> <command> --help`.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep the group list in sync with the option catalogue.
fn build_cli() -> Command {
    Command::new("pi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Predix Insights CLI")
        .long_about(
            "PI is a CLI library for Predix Insights. It manages DAGs, dependencies, \
             flow templates, flows and flow instances.",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Dump HTTP requests and responses")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("VERBOSE"),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .short('i')
                .help("Prompt for required options")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("INTERACTIVE"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file holding the values of previous commands")
                .value_name("PATH")
                .global(true)
                .env("CONFIG"),
        )
        .subcommands(vec![
            Command::new("configure")
                .about("Login to Predix Insights")
                .long_about("Store the API host, tenant and UAA client, then verify them"),
            Command::new("admin")
                .about("Admin")
                .long_about("Service health check and API version"),
            Command::new("dag")
                .about("Directed Acyclic Graph (DAG)")
                .long_about("Create, deploy and inspect DAGs and their runs"),
            Command::new("dependency")
                .about("Dependency")
                .long_about("Upload and deploy shared dependency files"),
            Command::new("flow-template")
                .about("Flow Template")
                .long_about("Manage flow templates, their Spark arguments and tags"),
            Command::new("flow")
                .about("Flow")
                .long_about("Create, launch and stop flows and manage their config files"),
            Command::new("instance")
                .about("Flow Instance")
                .long_about("Inspect running instances, container logs and Spark details"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("pi.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../insights/src/config/catalog.rs");
}
