//! `pi flow-template`: flow templates and their tags.

use insights::client::{parse_tags, EncapsulatedSparkArgs, FlowTemplateUpload};
use insights::{ConfigurationContext, Prompter};

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{confirm_delete, connect, forget_deleted, optional, print_json, record};

fn upload(ctx: &ConfigurationContext, command: &str) -> Result<FlowTemplateUpload, CliError> {
    let get = |name| ctx.get_string(command, name);
    Ok(FlowTemplateUpload {
        name: get("flowTemplateName")?,
        file_name: get("templateFileName")?,
        file_path: get("templateFilePath")?,
        version: get("flowTemplateVersion")?,
        description: get("desc")?,
        flow_type: get("flowType")?,
    })
}

/// Runs a `flow-template` subcommand.
pub fn execute(
    ctx: &mut ConfigurationContext,
    leaf: &str,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let command = format!("flow-template {leaf}");
    let command = command.as_str();

    match leaf {
        "create" => {
            let upload = upload(ctx, command)?;
            let created = connect(ctx)?.create_flow_template(&upload)?;
            record(ctx, command, &created, &[("id", "flowTemplateID")])?;
            print_json(&created)
        }
        "update" => {
            let id = ctx.get_string(command, "flowTemplateID")?;
            let upload = upload(ctx, command)?;
            connect(ctx)?.update_flow_template(&id, &upload)?;
            println!("Successfully updated Flow Template '{id}'");
            Ok(())
        }
        "update-spark-args" => {
            let id = ctx.get_string(command, "flowTemplateID")?;
            let args = EncapsulatedSparkArgs::parse(&ctx.get_string(command, "sparkArgs")?)?;
            connect(ctx)?.update_flow_template_spark_args(&id, &args)?;
            println!("Successfully updated Flow Template '{id}'");
            Ok(())
        }
        "list" => {
            let client = connect(ctx)?;
            let id = optional(ctx, command, "flowTemplateID")?;
            let name = optional(ctx, command, "flowTemplateName")?;
            let templates = match (id, name) {
                (Some(id), _) => client.get_flow_template(&id)?,
                (None, Some(name)) => client.find_flow_templates(&name)?,
                (None, None) => client.list_flow_templates()?,
            };
            print_json(&templates)
        }
        "delete" => {
            let id = ctx.get_string(command, "flowTemplateID")?;
            if !confirm_delete(ctx, command, prompter, "Flow Template", &id)? {
                return Ok(());
            }
            connect(ctx)?.delete_flow_template(&id)?;
            forget_deleted(ctx, command, "flowTemplateID")?;
            println!("Successfully deleted Flow Template '{id}'");
            Ok(())
        }
        "list-tags" => {
            let id = ctx.get_string(command, "flowTemplateID")?;
            print_json(&connect(ctx)?.flow_template_tags(&id)?)
        }
        "save-tags" => {
            let id = ctx.get_string(command, "flowTemplateID")?;
            let tags = parse_tags(&ctx.get_string(command, "tags")?)?;
            print_json(&connect(ctx)?.save_flow_template_tags(&id, &tags)?)
        }
        _ => Err(unknown(command)),
    }
}
