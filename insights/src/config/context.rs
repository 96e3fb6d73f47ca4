//! Explicit configuration context.
//!
//! A [`ConfigurationContext`] replaces process-wide option state. It owns the
//! option registry, the global runtime flags, the environment and the lazily
//! loaded config file, and is passed to every command handler.

use std::path::{Path, PathBuf};

use crate::config::enforcer::{Prompter, RequiredFieldEnforcer};
use crate::config::environment::{Environment, ProcessEnvironment};
use crate::config::loader::PersistedConfig;
use crate::config::option::OptionValue;
use crate::config::persist::PersistenceSink;
use crate::config::registry::{CommandOptionSet, OptionRegistry};
use crate::config::resolver::{FlagValues, PrecedenceResolver, ResolutionReport};
use crate::error::{Error, Result};
use crate::logging::{init_logger, Logger};

/// Process-wide flags that are not tied to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalFlags {
    /// Dump HTTP traffic and enable info/debug output.
    pub verbose: bool,
    /// Prompt for required options on the terminal.
    pub interactive: bool,
    /// Location of the persisted config file.
    pub config_path: PathBuf,
}

impl GlobalFlags {
    /// Creates the global flags.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `config_path` is empty. This is the one
    /// configuration failure that aborts the process.
    pub fn new(verbose: bool, interactive: bool, config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        if config_path.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: "config".into(),
                message: "Config file path must not be empty".into(),
            });
        }
        Ok(Self {
            verbose,
            interactive,
            config_path,
        })
    }
}

/// Everything a command needs to resolve and persist its options.
///
/// # Examples
///
/// ```
/// use insights::config::{
///     ConfigurationContext, FlagValues, GlobalFlags, MapEnvironment, OptionRegistry,
///     OptionSpec, TerminalPrompter,
/// };
///
/// let mut registry = OptionRegistry::new();
/// registry
///     .register_command("flow stop", vec![OptionSpec::string("flowName", "Flow Name").required()])
///     .unwrap();
/// let dir = tempfile::tempdir().unwrap();
/// let globals = GlobalFlags::new(false, false, dir.path().join("config.json")).unwrap();
/// let mut ctx = ConfigurationContext::new(registry, globals, MapEnvironment::new());
///
/// let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
/// ctx.prepare("flow stop", &FlagValues::new().with("flowName", "etl"), &mut prompter)
///     .unwrap();
/// assert_eq!(ctx.get_string("flow stop", "flowName").unwrap(), "etl");
/// ```
pub struct ConfigurationContext {
    registry: OptionRegistry,
    globals: GlobalFlags,
    environment: Box<dyn Environment>,
    persisted: Option<PersistedConfig>,
    logger: Logger,
}

impl ConfigurationContext {
    /// Creates a context.
    pub fn new(
        registry: OptionRegistry,
        globals: GlobalFlags,
        environment: impl Environment + 'static,
    ) -> Self {
        let logger = init_logger(globals.verbose, false);
        Self {
            registry,
            globals,
            environment: Box::new(environment),
            persisted: None,
            logger,
        }
    }

    /// Creates a context reading the real process environment.
    #[must_use]
    pub fn from_process(registry: OptionRegistry, globals: GlobalFlags) -> Self {
        Self::new(registry, globals, ProcessEnvironment)
    }

    /// Replaces the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The global runtime flags.
    #[must_use]
    pub fn globals(&self) -> &GlobalFlags {
        &self.globals
    }

    /// The config file path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.globals.config_path
    }

    /// The option registry.
    #[must_use]
    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// The logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn load_persisted(&mut self) -> Result<()> {
        if self.persisted.is_none() {
            let persisted = match PersistedConfig::load(&self.globals.config_path) {
                Ok(persisted) => persisted,
                // A corrupt file holds no values; the next write replaces it.
                Err(e @ Error::Validation { .. }) => {
                    self.logger
                        .warn(&format!("ignoring unreadable configuration: {e}"));
                    PersistedConfig::default()
                }
                Err(e) => return Err(e),
            };
            self.persisted = Some(persisted);
        }
        Ok(())
    }

    /// Returns the persisted config, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns the load error if the file exists but cannot be read. A file
    /// that is not a JSON object is logged and treated as empty.
    pub fn persisted(&mut self) -> Result<&PersistedConfig> {
        self.load_persisted()?;
        Ok(self.persisted.get_or_insert_with(PersistedConfig::default))
    }

    /// Reads a non-empty string straight from the persisted config.
    ///
    /// Used for values that every command needs but none declares, such as
    /// the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns the load error if the file cannot be read.
    pub fn persisted_string(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self
            .persisted()?
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }

    /// Resolves a command's options and enforces its required fields.
    ///
    /// # Errors
    ///
    /// - `UnknownCommand` if the command is not registered
    /// - resolution errors from [`PrecedenceResolver::resolve`]
    /// - `InputRead` if an interactive prompt fails
    /// - `MissingRequired` if required options remain empty
    pub fn prepare(
        &mut self,
        command: &str,
        flags: &FlagValues,
        prompter: &mut dyn Prompter,
    ) -> Result<ResolutionReport> {
        let report = self.resolve(command, flags)?;
        let set = self.registry.lookup_mut(command)?;
        RequiredFieldEnforcer::new(self.globals.interactive)
            .enforce(set, prompter)?
            .into_result(command)?;
        Ok(report)
    }

    /// Resolves a command's options without enforcing required fields.
    ///
    /// Used to read another command's values, such as the credentials held
    /// by `configure`, where a missing value is not a prompt.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` or a resolution error.
    pub fn resolve(&mut self, command: &str, flags: &FlagValues) -> Result<ResolutionReport> {
        self.load_persisted()?;
        let persisted = self.persisted.get_or_insert_with(PersistedConfig::default);
        let set = self.registry.lookup_mut(command)?;

        PrecedenceResolver::new(&*self.environment, persisted).resolve(set, flags)
    }

    /// Copies one command's option value into another command's store.
    ///
    /// The copied value lands on the session layer of the target, so it wins
    /// over environment and config file on the target's next resolution.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand`, `UnknownOption` or `TypeMismatch`.
    pub fn carry_forward(
        &mut self,
        from_command: &str,
        from_option: &str,
        to_command: &str,
        to_option: &str,
    ) -> Result<()> {
        let value = self.registry.lookup(from_command)?.value(from_option)?;
        log::debug!("carry {from_command} --{from_option} to {to_command} --{to_option}");
        self.registry.lookup_mut(to_command)?.set(to_option, value)
    }

    /// Runs the persistence sink for a command.
    ///
    /// Failures are logged as warnings and swallowed; the command's result
    /// stands either way. Returns the written path on success.
    pub fn finish(&mut self, command: &str) -> Option<PathBuf> {
        let sink = PersistenceSink::new(self.globals.config_path.clone());
        let result = self
            .registry
            .lookup_mut(command)
            .and_then(|set| sink.commit(set, &mut self.globals));
        self.persisted = None;

        match result {
            Ok(path) => Some(path),
            Err(e) => {
                self.logger
                    .warn(&format!("could not save configuration: {e}"));
                None
            }
        }
    }

    /// A command's option set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` if the command is not registered.
    pub fn options(&self, command: &str) -> Result<&CommandOptionSet> {
        self.registry.lookup(command)
    }

    /// Returns a resolved string option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand`, `UnknownOption` or `TypeMismatch`.
    pub fn get_string(&self, command: &str, name: &str) -> Result<String> {
        self.registry.lookup(command)?.get_string(name)
    }

    /// Returns a resolved boolean option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand`, `UnknownOption` or `TypeMismatch`.
    pub fn get_bool(&self, command: &str, name: &str) -> Result<bool> {
        self.registry.lookup(command)?.get_bool(name)
    }

    /// Returns a resolved integer option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand`, `UnknownOption` or `TypeMismatch`.
    pub fn get_int(&self, command: &str, name: &str) -> Result<i64> {
        self.registry.lookup(command)?.get_int(name)
    }

    /// Stores a value in a command's value store.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand`, `UnknownOption` or `TypeMismatch`.
    pub fn set(&mut self, command: &str, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.registry.lookup_mut(command)?.set(name, value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::enforcer::TerminalPrompter;
    use crate::config::environment::MapEnvironment;
    use crate::config::option::OptionSpec;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> OptionRegistry {
        let mut registry = OptionRegistry::new();
        registry
            .register_command(
                "dag create",
                vec![
                    OptionSpec::string("dagName", "DAG Name")
                        .required()
                        .env("DAG_NAME"),
                    OptionSpec::string("dagVersion", "DAG Version").env("DAG_VERSION"),
                ],
            )
            .unwrap();
        registry
            .register_command(
                "dag deploy",
                vec![OptionSpec::string("dagName", "DAG Name")
                    .required()
                    .env("DAG_NAME")],
            )
            .unwrap();
        registry
    }

    fn context(temp: &TempDir, interactive: bool, env: MapEnvironment) -> ConfigurationContext {
        let globals =
            GlobalFlags::new(false, interactive, temp.path().join("config.json")).unwrap();
        ConfigurationContext::new(registry(), globals, env)
    }

    fn silent() -> TerminalPrompter<&'static [u8], Vec<u8>> {
        TerminalPrompter::new(b"".as_slice(), Vec::new())
    }

    #[test]
    fn test_empty_config_path_rejected() {
        let err = GlobalFlags::new(false, false, "").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "config"));
    }

    #[test]
    fn test_prepare_reads_config_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), r#"{"dagName": "from-file"}"#).unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());

        ctx.prepare("dag deploy", &FlagValues::new(), &mut silent())
            .unwrap();
        assert_eq!(ctx.get_string("dag deploy", "dagName").unwrap(), "from-file");
    }

    #[test]
    fn test_prepare_missing_required_non_interactive() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());

        let err = ctx
            .prepare("dag deploy", &FlagValues::new(), &mut silent())
            .unwrap_err();
        assert!(matches!(err, Error::MissingRequired { ref options, .. } if options == &["dagName"]));
    }

    #[test]
    fn test_prepare_interactive_prompts() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, true, MapEnvironment::new().with("DAG_NAME", "env"));
        let mut out = Vec::new();
        let mut prompter = TerminalPrompter::new("typed\n".as_bytes(), &mut out);

        ctx.prepare("dag deploy", &FlagValues::new(), &mut prompter)
            .unwrap();
        drop(prompter);

        assert_eq!(ctx.get_string("dag deploy", "dagName").unwrap(), "typed");
        assert_eq!(String::from_utf8(out).unwrap(), "Enter dagName (env): ");
    }

    #[test]
    fn test_unknown_command() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());
        let err = ctx
            .prepare("dag explode", &FlagValues::new(), &mut silent())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { .. }));
    }

    #[test]
    fn test_carry_forward_feeds_session_layer() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new().with("DAG_NAME", "env"));

        ctx.prepare(
            "dag create",
            &FlagValues::new().with("dagName", "created"),
            &mut silent(),
        )
        .unwrap();
        ctx.carry_forward("dag create", "dagName", "dag deploy", "dagName")
            .unwrap();
        ctx.prepare("dag deploy", &FlagValues::new(), &mut silent())
            .unwrap();

        assert_eq!(ctx.get_string("dag deploy", "dagName").unwrap(), "created");
    }

    #[test]
    fn test_carry_forward_unknown_option() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());
        let err = ctx
            .carry_forward("dag create", "dagVersion", "dag deploy", "dagVersion")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOption { .. }));
    }

    #[test]
    fn test_finish_round_trips_through_file() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());
        ctx.prepare(
            "dag create",
            &FlagValues::new()
                .with("dagName", "nightly")
                .with("dagVersion", "2"),
            &mut silent(),
        )
        .unwrap();
        let written = ctx.finish("dag create").unwrap();
        assert_eq!(written, temp.path().join("config.json"));

        let mut fresh = context(&temp, false, MapEnvironment::new());
        fresh
            .prepare("dag create", &FlagValues::new(), &mut silent())
            .unwrap();
        assert_eq!(fresh.get_string("dag create", "dagName").unwrap(), "nightly");
        assert_eq!(fresh.get_string("dag create", "dagVersion").unwrap(), "2");
    }

    #[test]
    fn test_finish_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let globals = GlobalFlags::new(false, false, blocker.join("config.json")).unwrap();
        let mut ctx = ConfigurationContext::new(registry(), globals, MapEnvironment::new())
            .with_logger(Logger::new(crate::logging::LogLevel::Quiet));

        assert!(ctx.finish("dag create").is_none());
    }

    #[test]
    fn test_corrupt_config_file_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"dagName": "etl""#).unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new())
            .with_logger(Logger::new(crate::logging::LogLevel::Quiet));

        ctx.prepare("dag deploy", &FlagValues::new().with("dagName", "nightly"), &mut silent())
            .unwrap();
        ctx.finish("dag deploy").unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["dagName"], "nightly");
    }

    #[test]
    fn test_corrupt_config_file_contributes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), "[1, 2]").unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new())
            .with_logger(Logger::new(crate::logging::LogLevel::Quiet));

        let err = ctx
            .prepare("dag deploy", &FlagValues::new(), &mut silent())
            .unwrap_err();
        assert!(matches!(err, Error::MissingRequired { .. }));
        assert!(ctx.persisted().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_does_not_enforce() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());
        let report = ctx.resolve("dag deploy", &FlagValues::new()).unwrap();
        assert_eq!(
            report.provenance("dagName"),
            Some(crate::config::resolver::Provenance::Default)
        );
        assert_eq!(ctx.get_string("dag deploy", "dagName").unwrap(), "");
    }

    #[test]
    fn test_persisted_string_skips_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.json"),
            r#"{"APIHost": "https://h", "Token": ""}"#,
        )
        .unwrap();
        let mut ctx = context(&temp, false, MapEnvironment::new());

        assert_eq!(
            ctx.persisted_string("APIHost").unwrap().as_deref(),
            Some("https://h")
        );
        assert_eq!(ctx.persisted_string("Token").unwrap(), None);
        assert_eq!(ctx.persisted_string("TenantID").unwrap(), None);
    }
}
