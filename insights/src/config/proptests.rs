//! Property-based tests for the configuration resolution engine.

use super::context::{ConfigurationContext, GlobalFlags};
use super::enforcer::{RequiredFieldEnforcer, TerminalPrompter};
use super::environment::MapEnvironment;
use super::loader::PersistedConfig;
use super::option::{OptionSpec, OptionValue};
use super::registry::OptionRegistry;
use super::resolver::{FlagValues, PrecedenceResolver, Provenance};
use crate::error::Error;
use proptest::prelude::*;
use tempfile::TempDir;

const COMMAND: &str = "instance list-container-logs";

fn registry() -> OptionRegistry {
    let mut registry = OptionRegistry::new();
    registry
        .register_command(
            COMMAND,
            vec![
                OptionSpec::string("instanceID", "Instance ID")
                    .required()
                    .env("INSTANCE_ID"),
                OptionSpec::string("containerID", "Container ID").env("CONTAINER_ID"),
                OptionSpec::boolean("tail", "Tail").env("TAIL"),
                OptionSpec::integer("containerLogSink", "Sink")
                    .env("CONTAINER_LOG_SINK")
                    .default_value(1),
            ],
        )
        .unwrap();
    registry
}

// Non-empty values without JSON-hostile characters
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,24}"
}

fn config_json(name: &str, value: &str) -> String {
    let mut map = serde_json::Map::new();
    map.insert(name.to_string(), serde_json::Value::from(value));
    serde_json::Value::Object(map).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    // With every layer supplying a distinct value, the flag wins
    #[test]
    fn flag_wins_over_all_layers(
        flag in value_strategy(),
        session in value_strategy(),
        env in value_strategy(),
        file in value_strategy()
    ) {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        set.set("instanceID", OptionValue::from(session)).unwrap();
        let environment = MapEnvironment::new().with("INSTANCE_ID", &env);
        let persisted = PersistedConfig::from_json(&config_json("instanceID", &file)).unwrap();

        let report = PrecedenceResolver::new(&environment, &persisted)
            .resolve(set, &FlagValues::new().with("instanceID", flag.clone()))
            .unwrap();

        prop_assert_eq!(set.get_string("instanceID").unwrap(), flag);
        prop_assert_eq!(report.provenance("instanceID"), Some(Provenance::Flag));
    }

    // Each layer wins exactly when all layers above it are absent
    #[test]
    fn highest_present_layer_wins(
        session in prop::option::of(value_strategy()),
        env in prop::option::of(value_strategy()),
        file in prop::option::of(value_strategy())
    ) {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        if let Some(s) = &session {
            set.set("containerID", OptionValue::from(s.as_str())).unwrap();
        }
        let mut environment = MapEnvironment::new();
        if let Some(e) = &env {
            environment.set("CONTAINER_ID", e);
        }
        let persisted = match &file {
            Some(f) => PersistedConfig::from_json(&config_json("containerID", f)).unwrap(),
            None => PersistedConfig::default(),
        };

        PrecedenceResolver::new(&environment, &persisted)
            .resolve(set, &FlagValues::new())
            .unwrap();

        let expected = session.or(env).or(file).unwrap_or_default();
        prop_assert_eq!(set.get_string("containerID").unwrap(), expected);
    }

    // An empty string at any layer falls through to the next one
    #[test]
    fn empty_string_falls_through(file in value_strategy()) {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        set.set("instanceID", OptionValue::from("")).unwrap();
        let environment = MapEnvironment::new().with("INSTANCE_ID", "");
        let persisted = PersistedConfig::from_json(&config_json("instanceID", &file)).unwrap();

        PrecedenceResolver::new(&environment, &persisted)
            .resolve(set, &FlagValues::new().with("instanceID", ""))
            .unwrap();

        prop_assert_eq!(set.get_string("instanceID").unwrap(), file);
    }

    // Boolean and integer flags are final even at their zero value
    #[test]
    fn typed_flags_are_final(
        tail in any::<bool>(),
        sink in any::<i64>(),
        env_tail in any::<bool>(),
        file_sink in any::<i64>()
    ) {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let environment = MapEnvironment::new().with("TAIL", &env_tail.to_string());
        let persisted = PersistedConfig::from_json(
            &serde_json::json!({ "containerLogSink": file_sink }).to_string(),
        )
        .unwrap();

        PrecedenceResolver::new(&environment, &persisted)
            .resolve(set, &FlagValues::new().with("tail", tail).with("containerLogSink", sink))
            .unwrap();

        prop_assert_eq!(set.get_bool("tail").unwrap(), tail);
        prop_assert_eq!(set.get_int("containerLogSink").unwrap(), sink);
    }

    // Unregistered names are errors, never silent defaults
    #[test]
    fn unknown_option_lookup_fails(name in "[a-z]{1,12}") {
        prop_assume!(name != "tail");
        let registry = registry();
        let set = registry.lookup(COMMAND).unwrap();
        let is_unknown = matches!(set.get_string(&name), Err(Error::UnknownOption { .. }));
        prop_assert!(is_unknown);
    }

    // Missing required values are reported without stopping other options
    #[test]
    fn missing_required_does_not_block_others(container in value_strategy()) {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let environment = MapEnvironment::new();
        let persisted = PersistedConfig::default();
        PrecedenceResolver::new(&environment, &persisted)
            .resolve(set, &FlagValues::new().with("containerID", container.clone()))
            .unwrap();

        let mut prompter = TerminalPrompter::new(b"".as_slice(), Vec::new());
        let report = RequiredFieldEnforcer::new(false).enforce(set, &mut prompter).unwrap();

        prop_assert_eq!(report.unsatisfied().to_vec(), vec!["instanceID".to_string()]);
        prop_assert_eq!(set.get_string("containerID").unwrap(), container);
    }

    // Persisted values come back on the config-file layer, session flags reset
    #[test]
    fn persistence_round_trip(
        instance in value_strategy(),
        container in value_strategy(),
        tail in any::<bool>(),
        sink in 0i64..=1
    ) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        let globals = GlobalFlags::new(true, false, path.clone()).unwrap();
        let mut ctx = ConfigurationContext::new(registry(), globals, MapEnvironment::new());
        let flags = FlagValues::new()
            .with("instanceID", instance.clone())
            .with("containerID", container.clone())
            .with("tail", tail)
            .with("containerLogSink", sink);
        let mut prompter = TerminalPrompter::new(b"".as_slice(), Vec::new());
        ctx.prepare(COMMAND, &flags, &mut prompter).unwrap();
        prop_assert!(ctx.finish(COMMAND).is_some());
        prop_assert!(!ctx.globals().verbose);
        prop_assert!(!ctx.globals().interactive);

        let globals = GlobalFlags::new(false, false, path).unwrap();
        let mut fresh = ConfigurationContext::new(registry(), globals, MapEnvironment::new());
        let report = fresh.prepare(COMMAND, &FlagValues::new(), &mut prompter).unwrap();

        prop_assert_eq!(fresh.get_string(COMMAND, "instanceID").unwrap(), instance);
        prop_assert_eq!(fresh.get_string(COMMAND, "containerID").unwrap(), container);
        prop_assert_eq!(report.provenance("instanceID"), Some(Provenance::ConfigFile));
        prop_assert!(!fresh.get_bool(COMMAND, "tail").unwrap());
        prop_assert_eq!(fresh.get_int(COMMAND, "containerLogSink").unwrap(), 1);
    }
}
