//! Built-in option catalogue of the `pi` client.
//!
//! Every CLI command is registered here with its options, environment
//! aliases and required flags. The CLI builds its clap tree from this table,
//! so a command that is not listed here does not exist.

use crate::config::option::OptionSpec;
use crate::config::registry::OptionRegistry;
use crate::error::Result;

fn opt(name: &str, description: &str, env: &str) -> OptionSpec {
    OptionSpec::string(name, description).env(env)
}

fn req(name: &str, description: &str, env: &str) -> OptionSpec {
    opt(name, description, env).required()
}

fn recorded(name: &str, description: &str, env: &str) -> OptionSpec {
    opt(name, description, env).recorded()
}

fn force(description: &str) -> OptionSpec {
    OptionSpec::boolean("force", description)
        .short('f')
        .env("FORCE")
}

fn dag_name() -> OptionSpec {
    req("dagName", "DAG Name", "DAG_NAME")
}

fn dag_upload() -> Vec<OptionSpec> {
    vec![
        dag_name(),
        req("dagFileName", "DAG File Name", "DAG_FILE_NAME"),
        req("dagFilePath", "DAG File Path", "DAG_FILE_PATH"),
        req("dagVersion", "DAG Version", "DAG_VERSION"),
        req("dagDesc", "DAG Description", "DAG_DESCRIPTION"),
        req(
            "dagFlowType",
            "DAG Flow Type (SPARK_JAVA or SPARK_PYTHON)",
            "DAG_FLOW_TYPE",
        ),
        req("dagTemplate", "DAG Template", "DAG_TEMPLATE"),
    ]
}

fn dependency_id() -> OptionSpec {
    opt("dependencyID", "Dependency ID", "DEPENDENCY_ID")
}

fn flow_template_id() -> OptionSpec {
    req("flowTemplateID", "Flow Template ID", "FLOW_TEMPLATE_ID")
}

fn flow_id() -> OptionSpec {
    req("flowID", "Flow ID", "FLOW_ID")
}

fn desc() -> OptionSpec {
    req("desc", "Flow Template Description", "DESC")
}

fn flow_type() -> OptionSpec {
    req(
        "flowType",
        "Flow Type (SPARK_JAVA or SPARK_PYTHON)",
        "FLOW_TYPE",
    )
}

fn flow_template_upload() -> Vec<OptionSpec> {
    vec![
        req("flowTemplateName", "Flow Template Name", "FLOW_TEMPLATE_NAME"),
        req(
            "templateFileName",
            "Flow Template Analytic File Name",
            "TEMPLATE_FILE_NAME",
        ),
        req(
            "templateFilePath",
            "Flow Template Analytic File Path",
            "TEMPLATE_FILE_PATH",
        ),
        req(
            "flowTemplateVersion",
            "Flow Template Version",
            "FLOW_TEMPLATE_VERSION",
        ),
        desc(),
        flow_type(),
    ]
}

fn spark_args() -> OptionSpec {
    req("sparkArgs", "Flow Encapsulated Spark Arguments", "SPARK_ARGS")
}

fn tags() -> OptionSpec {
    req("tags", "Flow Template Tags", "TAGS")
}

fn instance_id() -> OptionSpec {
    req("instanceID", "Instance ID", "INSTANCE_ID")
}

fn container_id() -> OptionSpec {
    req("containerID", "Container ID", "CONTAINER_ID")
}

fn attempt_id() -> OptionSpec {
    req("attemptID", "Attempt ID", "ATTEMPT_ID")
}

fn stage_id() -> OptionSpec {
    req("stageID", "Stage ID", "STAGE_ID")
}

fn stage_attempt_id() -> OptionSpec {
    req("stageAttemptID", "Stage Attempt ID", "STAGE_ATTEMPT_ID")
}

/// Returns the command table as `(command, options)` pairs.
#[must_use]
pub fn builtin_commands() -> Vec<(&'static str, Vec<OptionSpec>)> {
    vec![
        (
            "configure",
            vec![
                req("APIHost", "Predix Insights API Host", "API_HOST"),
                req("TenantID", "Predix Insights Tenant ID", "TENANT_ID"),
                req("IssuerID", "UAA Issuer ID", "ISSUER_ID"),
                req("ClientID", "UAA Client ID", "CLIENT_ID"),
                req("ClientSecret", "UAA Client Secret", "CLIENT_SECRET"),
                opt("Token", "UAA Authentication Token", "TOKEN"),
            ],
        ),
        ("admin health-check", vec![]),
        ("admin version", vec![]),
        // dag
        ("dag list", vec![opt("dagName", "DAG Name", "DAG_NAME")]),
        ("dag delete", vec![dag_name(), force("Permanently remove a DAG")]),
        ("dag create", {
            let mut options = dag_upload();
            options.push(recorded("dagID", "DAG ID", "DAG_ID"));
            options
        }),
        ("dag update", dag_upload()),
        ("dag deploy", vec![dag_name()]),
        ("dag status", vec![dag_name()]),
        (
            "dag task-run-info",
            vec![
                dag_name(),
                req("dagRunID", "DAG Run ID", "DAG_RUN_ID"),
                req("dagTaskID", "DAG Task ID", "DAG_TASK_ID"),
            ],
        ),
        (
            "dag list-run",
            vec![dag_name(), opt("dagRunID", "DAG Run ID", "DAG_RUN_ID")],
        ),
        (
            "dag list-task",
            vec![dag_name(), opt("dagTaskID", "DAG Task ID", "DAG_TASK_ID")],
        ),
        // dependency
        ("dependency list", vec![dependency_id()]),
        (
            "dependency delete",
            vec![
                dependency_id().required(),
                force("Permanently remove a Dependency"),
            ],
        ),
        ("dependency deploy", vec![dependency_id()]),
        ("dependency undeploy", vec![dependency_id()]),
        (
            "dependency create",
            vec![
                req("dependencyType", "Dependency Type", "DEPENDENCY_TYPE"),
                req(
                    "dependencyFileName",
                    "Dependency File Name",
                    "DEPENDENCY_FILE_NAME",
                ),
                req(
                    "dependencyFileLocation",
                    "Dependency File Location",
                    "DEPENDENCY_FILE_LOCATION",
                ),
                recorded("dependencyID", "Dependency ID", "DEPENDENCY_ID"),
                recorded("dependencyName", "Dependency Name", "DEPENDENCY_NAME"),
            ],
        ),
        // flow-template
        ("flow-template create", {
            let mut options = flow_template_upload();
            options.push(recorded("flowTemplateID", "Flow Template ID", "FLOW_TEMPLATE_ID"));
            options
        }),
        ("flow-template update", {
            let mut options = vec![flow_template_id()];
            options.extend(flow_template_upload());
            options
        }),
        (
            "flow-template update-spark-args",
            vec![flow_template_id(), spark_args()],
        ),
        (
            "flow-template list",
            vec![
                opt("flowTemplateID", "Flow Template ID", "FLOW_TEMPLATE_ID"),
                opt("flowTemplateName", "Flow Template Name", "FLOW_TEMPLATE_NAME"),
            ],
        ),
        (
            "flow-template delete",
            vec![flow_template_id(), force("Permanently remove a Flow Template")],
        ),
        ("flow-template list-tags", vec![flow_template_id()]),
        ("flow-template save-tags", vec![flow_template_id(), tags()]),
        // flow
        (
            "flow list",
            vec![
                opt("flowName", "Flow Name", "FLOW_NAME"),
                opt("flowID", "Flow ID", "FLOW_ID"),
                opt("flowTemplateID", "Flow Template ID", "FLOW_TEMPLATE_ID"),
            ],
        ),
        (
            "flow create",
            vec![
                req("flowName", "Flow Name", "FLOW_NAME"),
                flow_template_id(),
                recorded("flowID", "Flow ID", "FLOW_ID"),
            ],
        ),
        (
            "flow create-direct",
            vec![
                req("flowName", "Flow Name", "FLOW_NAME"),
                req("flowFileName", "Flow File Name", "FLOW_FILE_NAME"),
                req("flowFilePath", "Flow File Path", "FLOW_FILE_PATH"),
                req("flowVersion", "Direct Flow Version", "FLOW_VERSION"),
                desc(),
                flow_type(),
                recorded("flowID", "Flow ID", "FLOW_ID"),
            ],
        ),
        (
            "flow create-flow-template",
            vec![
                flow_id(),
                recorded("flowTemplateID", "Flow Template ID", "FLOW_TEMPLATE_ID"),
                recorded("flowTemplateName", "Flow Template Name", "FLOW_TEMPLATE_NAME"),
            ],
        ),
        (
            "flow add-config-file",
            vec![
                req(
                    "configFileDetails",
                    "Flow Config File Details",
                    "CONFIG_FILE_DETAILS",
                ),
                flow_id(),
            ],
        ),
        ("flow list-config-files", vec![flow_id()]),
        (
            "flow delete-config-file",
            vec![
                flow_id(),
                req("configFileName", "Flow Config File Name", "CONFIG_FILE_NAME"),
            ],
        ),
        ("flow delete", vec![flow_id(), force("Permanently remove a Flow")]),
        (
            "flow update-spark-args",
            vec![spark_args(), flow_id(), flow_template_id()],
        ),
        (
            "flow update-direct",
            vec![
                flow_id(),
                req("flowFileName", "Flow File Name", "FLOW_FILE_NAME"),
                req("flowFilePath", "Flow File Path", "FLOW_FILE_PATH"),
                desc(),
                recorded("flowName", "Flow Name", "FLOW_NAME"),
            ],
        ),
        (
            "flow launch",
            vec![
                flow_id(),
                flow_template_id(),
                recorded("instanceID", "Instance ID", "INSTANCE_ID"),
            ],
        ),
        ("flow stop", vec![req("flowName", "Flow Name", "FLOW_NAME")]),
        ("flow list-tags", vec![flow_id(), flow_template_id()]),
        ("flow save-tags", vec![tags(), flow_id(), flow_template_id()]),
        // instance
        (
            "instance list-instance",
            vec![opt("instanceID", "Instance ID", "INSTANCE_ID")],
        ),
        ("instance list-containers", vec![instance_id()]),
        (
            "instance list-container-response",
            vec![instance_id(), container_id()],
        ),
        (
            "instance list-container-logs",
            vec![
                instance_id(),
                container_id(),
                OptionSpec::boolean("tail", "Tail Container Logs")
                    .short('t')
                    .env("TAIL"),
                OptionSpec::integer(
                    "containerLogSink",
                    "Container Log Sink (0 = stderr, 1 = stdout)",
                )
                .env("CONTAINER_LOG_SINK")
                .default_value(1),
            ],
        ),
        ("instance list-submit-logs", vec![instance_id()]),
        ("instance stop", vec![instance_id()]),
        ("instance list-spark-app-details", vec![instance_id()]),
        (
            "instance list-spark-executor-details",
            vec![instance_id(), attempt_id()],
        ),
        ("instance list-app-stages", vec![instance_id(), attempt_id()]),
        (
            "instance list-attempts",
            vec![instance_id(), attempt_id(), stage_id()],
        ),
        (
            "instance list-attempt-details",
            vec![instance_id(), attempt_id(), stage_id(), stage_attempt_id()],
        ),
        (
            "instance list-tasks",
            vec![instance_id(), attempt_id(), stage_id(), stage_attempt_id()],
        ),
    ]
}

/// Builds a registry holding every built-in command.
///
/// # Errors
///
/// Returns a registration error if the table declares an option twice for
/// the same command.
///
/// # Examples
///
/// ```
/// use insights::config::catalog::builtin_registry;
///
/// let registry = builtin_registry().unwrap();
/// let set = registry.lookup("flow launch").unwrap();
/// assert!(set.spec("flowTemplateID").unwrap().is_required());
/// ```
pub fn builtin_registry() -> Result<OptionRegistry> {
    let mut registry = OptionRegistry::new();
    for (command, options) in builtin_commands() {
        registry.register_command(command, options)?;
    }
    Ok(registry)
}
