//! `pi instance`: flow instances, container logs and Spark details.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use chrono::Local;
use insights::client::ContainerLogSink;
use insights::{Client, ConfigurationContext};

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{connect, optional, print_json};

/// Delay between two redraws of `list-container-logs --tail`.
pub const TAIL_INTERVAL: Duration = Duration::from_secs(5);

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Redraws a container log every [`TAIL_INTERVAL`] until interrupted or an
/// error occurs.
fn tail_logs(
    client: &Client,
    instance_id: &str,
    container_id: &str,
    sink: ContainerLogSink,
) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    loop {
        let logs = client.container_logs(instance_id, container_id, sink)?;
        write!(stdout, "{CLEAR_SCREEN}{logs}")?;
        writeln!(
            stdout,
            "\n-- {sink} of container {container_id} at {} (Ctrl-C to stop)",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        stdout.flush()?;
        thread::sleep(TAIL_INTERVAL);
    }
}

/// Runs an `instance` subcommand.
pub fn execute(ctx: &mut ConfigurationContext, leaf: &str) -> Result<(), CliError> {
    let command = format!("instance {leaf}");
    let command = command.as_str();
    let get = |ctx: &ConfigurationContext, name| ctx.get_string(command, name);

    match leaf {
        "list-instance" => {
            let client = connect(ctx)?;
            let instances = match optional(ctx, command, "instanceID")? {
                Some(id) => client.get_instance(&id)?,
                None => client.list_instances()?,
            };
            print_json(&instances)
        }
        "list-containers" => {
            let id = get(ctx, "instanceID")?;
            print_json(&connect(ctx)?.list_containers(&id)?)
        }
        "list-container-response" => {
            let id = get(ctx, "instanceID")?;
            let container = get(ctx, "containerID")?;
            print_json(&connect(ctx)?.container_log_response(&id, &container)?)
        }
        "list-container-logs" => {
            let id = get(ctx, "instanceID")?;
            let container = get(ctx, "containerID")?;
            let sink = ContainerLogSink::try_from(ctx.get_int(command, "containerLogSink")?)?;
            let client = connect(ctx)?;
            if ctx.get_bool(command, "tail")? {
                return tail_logs(&client, &id, &container, sink);
            }
            println!("{}", client.container_logs(&id, &container, sink)?);
            Ok(())
        }
        "list-submit-logs" => {
            let id = get(ctx, "instanceID")?;
            println!("{}", connect(ctx)?.submit_logs(&id)?);
            Ok(())
        }
        "stop" => {
            let id = get(ctx, "instanceID")?;
            connect(ctx)?.stop_instance(&id)?;
            println!("Instance {id} successfully stopped.");
            Ok(())
        }
        "list-spark-app-details" => {
            let id = get(ctx, "instanceID")?;
            print_json(&connect(ctx)?.spark_application(&id)?)
        }
        "list-spark-executor-details" => {
            let id = get(ctx, "instanceID")?;
            let attempt = get(ctx, "attemptID")?;
            print_json(&connect(ctx)?.spark_executors(&id, &attempt)?)
        }
        "list-app-stages" => {
            let id = get(ctx, "instanceID")?;
            let attempt = get(ctx, "attemptID")?;
            print_json(&connect(ctx)?.spark_stages(&id, &attempt)?)
        }
        "list-attempts" => {
            let id = get(ctx, "instanceID")?;
            let attempt = get(ctx, "attemptID")?;
            let stage = get(ctx, "stageID")?;
            print_json(&connect(ctx)?.spark_stage_attempts(&id, &attempt, &stage)?)
        }
        "list-attempt-details" => {
            let id = get(ctx, "instanceID")?;
            let attempt = get(ctx, "attemptID")?;
            let stage = get(ctx, "stageID")?;
            let stage_attempt = get(ctx, "stageAttemptID")?;
            print_json(&connect(ctx)?.spark_stage_attempt(&id, &attempt, &stage, &stage_attempt)?)
        }
        "list-tasks" => {
            let id = get(ctx, "instanceID")?;
            let attempt = get(ctx, "attemptID")?;
            let stage = get(ctx, "stageID")?;
            let stage_attempt = get(ctx, "stageAttemptID")?;
            print_json(&connect(ctx)?.spark_tasks(&id, &attempt, &stage, &stage_attempt)?)
        }
        _ => Err(unknown(command)),
    }
}
