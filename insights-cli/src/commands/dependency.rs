//! `pi dependency`: shared dependency files.

use insights::{ConfigurationContext, Prompter};
use serde_json::Value;

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{confirm_delete, connect, forget_deleted, optional, print_json, record};

/// Runs a `dependency` subcommand.
pub fn execute(
    ctx: &mut ConfigurationContext,
    leaf: &str,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let command = format!("dependency {leaf}");
    let command = command.as_str();

    match leaf {
        "list" => {
            let client = connect(ctx)?;
            let dependencies = match optional(ctx, command, "dependencyID")? {
                Some(id) => client.get_dependency(&id)?,
                None => client.list_dependencies()?,
            };
            print_json(&dependencies)
        }
        "create" => {
            let kind = ctx.get_string(command, "dependencyType")?;
            let file_name = ctx.get_string(command, "dependencyFileName")?;
            let location = ctx.get_string(command, "dependencyFileLocation")?;
            let created = connect(ctx)?.create_dependency(&kind, &file_name, &location)?;
            // The service answers with the list of stored dependencies.
            let first = created.as_array().and_then(|all| all.first()).unwrap_or(&Value::Null);
            record(
                ctx,
                command,
                first,
                &[("id", "dependencyID"), ("name", "dependencyName")],
            )?;
            print_json(&created)
        }
        "deploy" => {
            let id = optional(ctx, command, "dependencyID")?;
            connect(ctx)?.deploy_dependency(id.as_deref())?;
            println!("Dependencies deployed successfully");
            Ok(())
        }
        "undeploy" => {
            let id = optional(ctx, command, "dependencyID")?;
            connect(ctx)?.undeploy_dependency(id.as_deref())?;
            println!("Dependencies undeployed successfully");
            Ok(())
        }
        "delete" => {
            let id = ctx.get_string(command, "dependencyID")?;
            if !confirm_delete(ctx, command, prompter, "Dependency", &id)? {
                return Ok(());
            }
            connect(ctx)?.delete_dependency(&id)?;
            forget_deleted(ctx, command, "dependencyID")?;
            println!("Successfully deleted Dependency '{id}'");
            Ok(())
        }
        _ => Err(unknown(command)),
    }
}
