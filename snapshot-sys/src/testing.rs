// SPDX-License-Identifier: GPL-3.0-only

//! Scripted `CommandRunner` for tests
//!
//! Records every invocation and answers from rules matched by argument
//! prefix. The most recently added matching rule wins; unmatched calls succeed
//! with empty output.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::command::{CommandRunner, Invocation};
use crate::error::{Result, SysError};

type Effect = Arc<dyn Fn(&Invocation) + Send + Sync>;

#[derive(Clone)]
enum Reply {
    Stdout(String),
    Failure { status: i32, stderr: String },
}

#[derive(Clone)]
struct Rule {
    prefix: Vec<String>,
    reply: Option<Reply>,
    effect: Option<Effect>,
}

impl Rule {
    fn matches(&self, args: &[String]) -> bool {
        args.len() >= self.prefix.len()
            && self.prefix.iter().zip(args).all(|(expected, actual)| expected == actual)
    }
}

#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prefix_of(prefix: &[&str]) -> Vec<String> {
    prefix.iter().map(ToString::to_string).collect()
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls whose arguments start with `prefix` with `stdout`
    pub fn respond(&self, prefix: &[&str], stdout: &str) -> &Self {
        self.push(prefix, Some(Reply::Stdout(stdout.to_string())), None)
    }

    /// Fail calls whose arguments start with `prefix`
    pub fn fail(&self, prefix: &[&str], stderr: &str) -> &Self {
        self.push(
            prefix,
            Some(Reply::Failure {
                status: 1,
                stderr: stderr.to_string(),
            }),
            None,
        )
    }

    /// Run `effect` whenever a call starting with `prefix` succeeds
    pub fn on_success<F>(&self, prefix: &[&str], effect: F) -> &Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.push(prefix, None, Some(Arc::new(effect)))
    }

    fn push(&self, prefix: &[&str], reply: Option<Reply>, effect: Option<Effect>) -> &Self {
        lock(&self.rules).push(Rule {
            prefix: prefix_of(prefix),
            reply,
            effect,
        });
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        lock(&self.calls).clone()
    }

    /// Recorded calls rendered as `program arg arg ...`
    pub fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Recorded calls whose arguments start with `prefix`
    pub fn calls_matching(&self, prefix: &[&str]) -> Vec<Vec<String>> {
        let rule = Rule {
            prefix: prefix_of(prefix),
            reply: None,
            effect: None,
        };
        self.calls()
            .iter()
            .map(Invocation::arg_strings)
            .filter(|args| rule.matches(args))
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        lock(&self.calls).push(invocation.clone());

        let args = invocation.arg_strings();
        let rules: Vec<Rule> = lock(&self.rules)
            .iter()
            .filter(|rule| rule.matches(&args))
            .cloned()
            .collect();

        let reply = rules
            .iter()
            .rev()
            .find_map(|rule| rule.reply.clone())
            .unwrap_or(Reply::Stdout(String::new()));

        match reply {
            Reply::Stdout(stdout) => {
                for effect in rules.iter().filter_map(|rule| rule.effect.as_ref()) {
                    effect(invocation);
                }
                Ok(stdout)
            }
            Reply::Failure { status, stderr } => Err(SysError::CommandFailed {
                command: invocation.to_string(),
                status: Some(status),
                stdout: String::new(),
                stderr,
            }),
        }
    }
}
