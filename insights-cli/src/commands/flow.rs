//! `pi flow`: flows, direct uploads and config files.

use insights::client::{
    parse_tags, DirectFlowUpload, EncapsulatedSparkArgs, FileDetails, DEFAULT_FLOW_PAGES,
};
use insights::{ConfigurationContext, Error, Prompter};

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{confirm_delete, connect, forget_deleted, optional, print_json, record};

/// Flow and template id of commands that address a template-scoped flow.
fn template_flow(ctx: &ConfigurationContext, command: &str) -> Result<(String, String), CliError> {
    Ok((
        ctx.get_string(command, "flowTemplateID")?,
        ctx.get_string(command, "flowID")?,
    ))
}

fn list(ctx: &mut ConfigurationContext, command: &str) -> Result<(), CliError> {
    let client = connect(ctx)?;
    let name = optional(ctx, command, "flowName")?;
    let flow_id = optional(ctx, command, "flowID")?;
    let template_id = optional(ctx, command, "flowTemplateID")?;

    let flows = match (name, flow_id, template_id) {
        (Some(name), _, _) => client.get_flow(&name)?,
        (None, Some(flow_id), Some(template_id)) => {
            client.get_template_flow(&template_id, &flow_id)?
        }
        (None, Some(_), None) => {
            return Err(Error::Validation {
                field: "flowTemplateID".into(),
                message: "listing a flow by id needs its flow template id".into(),
            }
            .into())
        }
        (None, None, Some(template_id)) => client.list_template_flows(&template_id)?,
        (None, None, None) => client.list_flows(DEFAULT_FLOW_PAGES)?,
    };
    print_json(&flows)
}

/// Runs a `flow` subcommand.
pub fn execute(
    ctx: &mut ConfigurationContext,
    leaf: &str,
    prompter: &mut dyn Prompter,
) -> Result<(), CliError> {
    let command = format!("flow {leaf}");
    let command = command.as_str();

    match leaf {
        "list" => list(ctx, command),
        "create" => {
            let name = ctx.get_string(command, "flowName")?;
            let template_id = ctx.get_string(command, "flowTemplateID")?;
            let created = connect(ctx)?.create_flow(&name, &template_id)?;
            record(ctx, command, &created, &[("id", "flowID"), ("name", "flowName")])?;
            print_json(&created)
        }
        "create-direct" => {
            let get = |name| ctx.get_string(command, name);
            let upload = DirectFlowUpload {
                name: get("flowName")?,
                file_name: get("flowFileName")?,
                file_path: get("flowFilePath")?,
                version: get("flowVersion")?,
                description: get("desc")?,
                flow_type: get("flowType")?,
            };
            let created = connect(ctx)?.create_direct_flow(&upload)?;
            record(ctx, command, &created, &[("id", "flowID"), ("name", "flowName")])?;
            print_json(&created)
        }
        "update-direct" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            let file_name = ctx.get_string(command, "flowFileName")?;
            let file_path = ctx.get_string(command, "flowFilePath")?;
            let description = ctx.get_string(command, "desc")?;
            let updated =
                connect(ctx)?.update_direct_flow(&flow_id, &description, &file_name, &file_path)?;
            record(ctx, command, &updated, &[("id", "flowID"), ("name", "flowName")])?;
            print_json(&updated)
        }
        "create-flow-template" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            let created = connect(ctx)?.create_template_from_flow(&flow_id)?;
            record(
                ctx,
                command,
                &created,
                &[("id", "flowTemplateID"), ("name", "flowTemplateName")],
            )?;
            print_json(&created)
        }
        "add-config-file" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            let files = FileDetails::parse_list(&ctx.get_string(command, "configFileDetails")?)?;
            connect(ctx)?.add_flow_config_files(&flow_id, &files)?;
            println!("Config file(s) successfully added to flow {flow_id}.");
            Ok(())
        }
        "list-config-files" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            print_json(&connect(ctx)?.list_flow_config_files(&flow_id)?)
        }
        "delete-config-file" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            let file_name = ctx.get_string(command, "configFileName")?;
            connect(ctx)?.delete_flow_config_file(&flow_id, &file_name)?;
            println!("Config file {file_name} successfully deleted from flow {flow_id}.");
            Ok(())
        }
        "delete" => {
            let flow_id = ctx.get_string(command, "flowID")?;
            if !confirm_delete(ctx, command, prompter, "flow", &flow_id)? {
                return Ok(());
            }
            connect(ctx)?.delete_flow(&flow_id)?;
            forget_deleted(ctx, command, "flowID")?;
            println!("Successfully deleted Flow '{flow_id}'");
            Ok(())
        }
        "update-spark-args" => {
            let (template_id, flow_id) = template_flow(ctx, command)?;
            let args = EncapsulatedSparkArgs::parse(&ctx.get_string(command, "sparkArgs")?)?;
            connect(ctx)?.update_flow_spark_args(&template_id, &flow_id, &args)?;
            println!("Successfully updated Flow '{flow_id}'");
            Ok(())
        }
        "launch" => {
            let (template_id, flow_id) = template_flow(ctx, command)?;
            let launched = connect(ctx)?.launch_flow(&template_id, &flow_id)?;
            record(ctx, command, &launched, &[("id", "instanceID")])?;
            print_json(&launched)
        }
        "stop" => {
            let name = ctx.get_string(command, "flowName")?;
            connect(ctx)?.stop_flow(&name)?;
            println!("Flow {name} successfully stopped.");
            Ok(())
        }
        "list-tags" => {
            let (template_id, flow_id) = template_flow(ctx, command)?;
            print_json(&connect(ctx)?.flow_tags(&template_id, &flow_id)?)
        }
        "save-tags" => {
            let (template_id, flow_id) = template_flow(ctx, command)?;
            let tags = parse_tags(&ctx.get_string(command, "tags")?)?;
            print_json(&connect(ctx)?.save_flow_tags(&template_id, &flow_id, &tags)?)
        }
        _ => Err(unknown(command)),
    }
}
