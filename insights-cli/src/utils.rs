//! Utility functions for CLI operations.
//!
//! Shared by the command handlers: reading optional values, connecting to
//! the service with the configured credentials, confirming deletes and
//! printing responses.

use insights::config::confirm;
use insights::{Client, ConfigurationContext, Credentials, FlagValues, Prompter};
use serde_json::Value;

use crate::error::CliError;

/// Command whose options hold the account credentials.
pub const CONFIGURE: &str = "configure";

/// Returns a string option, or `None` when it resolved to empty.
pub fn optional(
    ctx: &ConfigurationContext,
    command: &str,
    name: &str,
) -> Result<Option<String>, CliError> {
    let value = ctx.get_string(command, name)?;
    Ok((!value.is_empty()).then_some(value))
}

/// Reads the credentials already resolved for `command`.
pub fn read_credentials(
    ctx: &ConfigurationContext,
    command: &str,
) -> Result<Credentials, CliError> {
    Ok(Credentials {
        api_host: ctx.get_string(command, "APIHost")?,
        tenant_id: ctx.get_string(command, "TenantID")?,
        issuer_id: ctx.get_string(command, "IssuerID")?,
        client_id: ctx.get_string(command, "ClientID")?,
        client_secret: ctx.get_string(command, "ClientSecret")?,
        token: ctx.get_string(command, "Token")?,
    })
}

/// Resolves the stored credentials without prompting.
///
/// Missing values are not an error here; [`Client::new`] turns them into
/// `NotConfigured`.
pub fn credentials(ctx: &mut ConfigurationContext) -> Result<Credentials, CliError> {
    ctx.resolve(CONFIGURE, &FlagValues::new())?;
    read_credentials(ctx, CONFIGURE)
}

/// Creates a client from the stored credentials without authenticating.
pub fn client(ctx: &mut ConfigurationContext) -> Result<Client, CliError> {
    let credentials = credentials(ctx)?;
    Ok(Client::new(credentials, *ctx.logger())?)
}

/// Creates a client and fetches a fresh token.
pub fn connect(ctx: &mut ConfigurationContext) -> Result<Client, CliError> {
    let mut client = client(ctx)?;
    client.authenticate()?;
    Ok(client)
}

/// Asks before deleting, unless the command's `force` option is set.
pub fn confirm_delete(
    ctx: &ConfigurationContext,
    command: &str,
    prompter: &mut dyn Prompter,
    kind: &str,
    name: &str,
) -> Result<bool, CliError> {
    if ctx.get_bool(command, "force")? {
        return Ok(true);
    }
    Ok(confirm(prompter, &format!("Really delete the {kind} '{name}'? "))?)
}

/// Forgets a deleted resource's id and the `force` flag before persisting.
pub fn forget_deleted(
    ctx: &mut ConfigurationContext,
    command: &str,
    id_option: &str,
) -> Result<(), CliError> {
    ctx.set(command, id_option, "")?;
    ctx.set(command, "force", false)?;
    Ok(())
}

/// Pretty-prints a JSON response on stdout.
///
/// An empty response prints nothing.
pub fn print_json(value: &Value) -> Result<(), CliError> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Reads a string field of a created resource, accepting numeric ids.
pub fn field_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stores fields of a created resource in recorded options.
///
/// `fields` pairs a response key with the option that keeps it. Missing or
/// empty fields leave the option untouched.
pub fn record(
    ctx: &mut ConfigurationContext,
    command: &str,
    created: &Value,
    fields: &[(&str, &str)],
) -> Result<(), CliError> {
    for (key, option) in fields {
        if let Some(value) = field_string(created, key) {
            ctx.set(command, option, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights::config::catalog::builtin_registry;
    use insights::{GlobalFlags, MapEnvironment, TerminalPrompter};
    use serde_json::json;
    use tempfile::TempDir;

    fn context(dir: &TempDir, env: MapEnvironment) -> ConfigurationContext {
        let globals = GlobalFlags::new(false, false, dir.path().join("config.json")).unwrap();
        ConfigurationContext::new(builtin_registry().unwrap(), globals, env)
    }

    #[test]
    fn test_credentials_from_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"APIHost": "https://insights.example.com", "ClientSecret": "s3cret"}"#,
        )
        .unwrap();
        let env = MapEnvironment::new()
            .with("TENANT_ID", "t1")
            .with("ISSUER_ID", "https://uaa.example.com/oauth/token")
            .with("CLIENT_ID", "app");
        let mut ctx = context(&dir, env);

        let creds = credentials(&mut ctx).unwrap();
        assert_eq!(creds.api_host, "https://insights.example.com");
        assert_eq!(creds.tenant_id, "t1");
        assert_eq!(creds.client_secret, "s3cret");
        assert!(creds.is_complete());
    }

    #[test]
    fn test_client_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, MapEnvironment::new());
        let err = client(&mut ctx).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_optional_empty_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, MapEnvironment::new().with("DAG_NAME", "etl"));
        let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
        ctx.prepare("dag list-run", &FlagValues::new(), &mut prompter)
            .unwrap();

        assert_eq!(optional(&ctx, "dag list-run", "dagName").unwrap().as_deref(), Some("etl"));
        assert_eq!(optional(&ctx, "dag list-run", "dagRunID").unwrap(), None);
    }

    #[test]
    fn test_confirm_delete_forced() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, MapEnvironment::new().with("DAG_NAME", "etl"));
        let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
        let flags = FlagValues::new().with("force", true);
        ctx.prepare("dag delete", &flags, &mut prompter).unwrap();

        assert!(confirm_delete(&ctx, "dag delete", &mut prompter, "DAG", "etl").unwrap());
    }

    #[test]
    fn test_confirm_delete_declined() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, MapEnvironment::new().with("DAG_NAME", "etl"));
        let mut out = Vec::new();
        let mut prompter = TerminalPrompter::new("n\n".as_bytes(), &mut out);
        ctx.prepare("dag delete", &FlagValues::new(), &mut prompter)
            .unwrap();

        assert!(!confirm_delete(&ctx, "dag delete", &mut prompter, "DAG", "etl").unwrap());
        drop(prompter);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Really delete the DAG 'etl'? "
        );
    }

    #[test]
    fn test_forget_deleted_persists_empty_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"dagName": "etl", "flowID": "f1"}"#).unwrap();
        let mut ctx = context(&dir, MapEnvironment::new());
        let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
        ctx.prepare("dag delete", &FlagValues::new().with("force", true), &mut prompter)
            .unwrap();

        forget_deleted(&mut ctx, "dag delete", "dagName").unwrap();
        ctx.finish("dag delete").unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["dagName"], "");
        assert_eq!(saved["force"], false);
        assert_eq!(saved["flowID"], "f1");
    }

    #[test]
    fn test_record_created_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, MapEnvironment::new());
        let created = json!({ "id": "d-1", "name": "etl" });

        record(&mut ctx, "dag create", &created, &[("id", "dagID"), ("name", "dagName")]).unwrap();
        assert_eq!(ctx.get_string("dag create", "dagID").unwrap(), "d-1");
        assert_eq!(ctx.get_string("dag create", "dagName").unwrap(), "etl");

        record(&mut ctx, "dag create", &json!({}), &[("id", "dagID")]).unwrap();
        assert_eq!(ctx.get_string("dag create", "dagID").unwrap(), "d-1");
    }

    #[test]
    fn test_field_string() {
        let created = json!({ "id": 42, "name": "etl", "owner": "" });
        assert_eq!(field_string(&created, "id").as_deref(), Some("42"));
        assert_eq!(field_string(&created, "name").as_deref(), Some("etl"));
        assert_eq!(field_string(&created, "owner"), None);
        assert_eq!(field_string(&created, "missing"), None);
    }
}
