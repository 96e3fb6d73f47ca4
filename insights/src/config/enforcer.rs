//! Required-field enforcement and terminal prompting.
//!
//! Outside interactive mode the enforcer only reports which required options
//! are still empty. In interactive mode it prompts for every required string
//! option, offering the current value as the accepted default.

use std::io::{self, BufRead, Write};

use crate::config::option::{OptionKind, OptionValue};
use crate::config::registry::CommandOptionSet;
use crate::error::{Error, Result};

/// How many invalid answers a yes/no confirmation tolerates.
pub const MAX_CONFIRM_ATTEMPTS: usize = 3;

/// Line-oriented terminal interaction.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Writes `message` and reads one line, without its line terminator.
    ///
    /// End of input yields an empty line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if writing or reading fails.
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

/// A [`Prompter`] over any reader and writer, normally stdin and stdout.
///
/// # Examples
///
/// ```
/// use insights::config::{Prompter, TerminalPrompter};
///
/// let mut out = Vec::new();
/// let mut prompter = TerminalPrompter::new("answer\n".as_bytes(), &mut out);
/// assert_eq!(prompter.prompt("Enter dagName: ").unwrap(), "answer");
/// drop(prompter);
/// assert_eq!(out, b"Enter dagName: ");
/// ```
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Wraps a reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on stdout and reads from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        self.writer.write_all(message.as_bytes())?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

/// Per-option enforcement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Not yet resolved.
    Unresolved,
    /// Resolved and needing no prompt.
    Resolved,
    /// Waiting for a terminal answer.
    PromptPending,
    /// A terminal answer was read, whether or not it changed the value.
    PromptSatisfied,
}

/// Outcome of enforcing one command's required options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnforcementReport {
    states: Vec<(String, FieldState)>,
    unsatisfied: Vec<String>,
}

impl EnforcementReport {
    /// Returns the final state of an option.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<FieldState> {
        self.states
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    /// Required options that are still empty.
    #[must_use]
    pub fn unsatisfied(&self) -> &[String] {
        &self.unsatisfied
    }

    /// True when every required option has a value.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    /// Converts an unsatisfied report into `MissingRequired`.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequired` listing the empty options.
    pub fn into_result(self, command: &str) -> Result<()> {
        if self.is_satisfied() {
            Ok(())
        } else {
            Err(Error::MissingRequired {
                command: command.to_string(),
                options: self.unsatisfied,
            })
        }
    }
}

/// Checks required options and, in interactive mode, prompts for them.
#[derive(Debug, Clone, Copy)]
pub struct RequiredFieldEnforcer {
    interactive: bool,
}

impl RequiredFieldEnforcer {
    /// Creates an enforcer for the given run mode.
    #[must_use]
    pub const fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    /// Enforces the required options of a resolved option set.
    ///
    /// Only string options are prompted; required boolean and integer options
    /// are reported but never asked for.
    ///
    /// # Errors
    ///
    /// Returns `InputRead` if a terminal read fails. The value store keeps
    /// the answers read before the failure.
    pub fn enforce(
        &self,
        set: &mut CommandOptionSet,
        prompter: &mut dyn Prompter,
    ) -> Result<EnforcementReport> {
        let mut report = EnforcementReport::default();
        let specs: Vec<_> = set
            .options()
            .iter()
            .map(|o| (o.name().to_string(), o.kind(), o.is_required()))
            .collect();

        for (name, kind, required) in specs {
            let mut state = if set.store().get(&name).is_some() {
                FieldState::Resolved
            } else {
                FieldState::Unresolved
            };

            if required && self.interactive && kind == OptionKind::String {
                state = FieldState::PromptPending;
                log::debug!("{}: {name} {state:?}", set.command());
                let current = set.get_string(&name)?;
                let message = if current.is_empty() {
                    format!("Enter {name}: ")
                } else {
                    format!("Enter {name} ({current}): ")
                };
                let answer = prompter.prompt(&message).map_err(Error::InputRead)?;
                if !answer.is_empty() {
                    set.set(&name, OptionValue::String(answer))?;
                }
                state = FieldState::PromptSatisfied;
            }

            if required && set.value(&name)?.is_zero() {
                report.unsatisfied.push(name.clone());
            }
            report.states.push((name, state));
        }

        if !report.is_satisfied() {
            log::debug!(
                "{}: unsatisfied required option(s): {}",
                set.command(),
                report.unsatisfied.join(", ")
            );
        }
        Ok(report)
    }
}

/// Asks a yes/no question, allowing [`MAX_CONFIRM_ATTEMPTS`] answers.
///
/// Accepts `y`, `Y`, `yes`, `Yes`, `YES` and `n`, `N`, `no`, `No`, `NO`.
///
/// # Errors
///
/// Returns `InputRead` if reading fails and `InvalidConfirmation` once every
/// attempt produced an unrecognised answer.
///
/// # Examples
///
/// ```
/// use insights::config::{confirm, TerminalPrompter};
///
/// let mut prompter = TerminalPrompter::new("maybe\nyes\n".as_bytes(), Vec::new());
/// assert!(confirm(&mut prompter, "Delete? [y/n]: ").unwrap());
/// ```
pub fn confirm(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    let mut message = question;
    for _ in 0..MAX_CONFIRM_ATTEMPTS {
        let answer = prompter.prompt(message).map_err(Error::InputRead)?;
        match answer.trim() {
            "y" | "Y" | "yes" | "Yes" | "YES" => return Ok(true),
            "n" | "N" | "no" | "No" | "NO" => return Ok(false),
            _ => message = "Please type yes or no and then press enter: ",
        }
    }
    Err(Error::InvalidConfirmation {
        attempts: MAX_CONFIRM_ATTEMPTS,
    })
}
