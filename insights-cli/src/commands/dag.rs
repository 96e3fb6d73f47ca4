//! `pi dag`: DAG upload, deployment and run status.

use insights::client::{DagTemplate, DagUpload};
use insights::{ConfigurationContext, Prompter};

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{confirm_delete, connect, forget_deleted, optional, print_json, record};

fn upload(ctx: &ConfigurationContext, command: &str) -> Result<DagUpload, CliError> {
    let get = |name| ctx.get_string(command, name);
    Ok(DagUpload {
        name: get("dagName")?,
        file_name: get("dagFileName")?,
        file_path: get("dagFilePath")?,
        version: get("dagVersion")?,
        description: get("dagDesc")?,
        flow_type: get("dagFlowType")?,
        template: DagTemplate::parse(&get("dagTemplate")?)?,
    })
}

/// Runs a `dag` subcommand.
pub fn execute(
    ctx: &mut ConfigurationContext,
    leaf: &str,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let command = format!("dag {leaf}");
    let command = command.as_str();

    match leaf {
        "list" => {
            let client = connect(ctx)?;
            let dags = match optional(ctx, command, "dagName")? {
                Some(name) => client.get_dag(&name)?,
                None => client.list_dags()?,
            };
            print_json(&dags)
        }
        "create" => {
            let upload = upload(ctx, command)?;
            let created = connect(ctx)?.create_dag(&upload)?;
            record(ctx, command, &created, &[("id", "dagID"), ("name", "dagName")])?;
            print_json(&created)
        }
        "update" => {
            let upload = upload(ctx, command)?;
            connect(ctx)?.update_dag(&upload)?;
            println!("DAG {} updated successfully", upload.name);
            Ok(())
        }
        "delete" => {
            let name = ctx.get_string(command, "dagName")?;
            if !confirm_delete(ctx, command, prompter, "DAG", &name)? {
                return Ok(());
            }
            connect(ctx)?.delete_dag(&name)?;
            forget_deleted(ctx, command, "dagName")?;
            println!("Successfully deleted DAG '{name}'");
            Ok(())
        }
        "deploy" => {
            let name = ctx.get_string(command, "dagName")?;
            connect(ctx)?.deploy_dag(&name)?;
            println!("DAG {name} deployed successfully");
            Ok(())
        }
        "status" => {
            let client = connect(ctx)?;
            let status = match optional(ctx, command, "dagName")? {
                Some(name) => client.dag_status(&name)?,
                None => client.dag_statuses()?,
            };
            print_json(&status)
        }
        "list-run" => {
            let name = ctx.get_string(command, "dagName")?;
            let run_id = optional(ctx, command, "dagRunID")?;
            print_json(&connect(ctx)?.dag_runs(&name, run_id.as_deref())?)
        }
        "list-task" => {
            let name = ctx.get_string(command, "dagName")?;
            let task_id = optional(ctx, command, "dagTaskID")?;
            print_json(&connect(ctx)?.dag_tasks(&name, task_id.as_deref())?)
        }
        "task-run-info" => {
            let name = ctx.get_string(command, "dagName")?;
            let task_id = ctx.get_string(command, "dagTaskID")?;
            let run_id = ctx.get_string(command, "dagRunID")?;
            print_json(&connect(ctx)?.dag_task_run(&name, &task_id, &run_id)?)
        }
        _ => Err(unknown(command)),
    }
}
