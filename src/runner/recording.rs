use super::{CommandExistsChecker, CommandOutput, CommandRunner, Invocation};
use crate::error::Result;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-memory runner that records every call and answers from scripted rules.
///
/// Rules match on a prefix of the program-plus-arguments tokens; the most
/// recently added matching rule wins. Unmatched calls succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    rules: Arc<Mutex<Vec<(Vec<String>, CommandOutput)>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
    missing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prefix: &[&str], output: CommandOutput) {
        let prefix = prefix.iter().map(|s| s.to_string()).collect();
        self.rules
            .lock()
            .expect("rules mutex poisoned")
            .push((prefix, output));
    }

    /// Make [`CommandExistsChecker::exists`] report `program` as absent.
    pub fn mark_missing(&self, program: &str) {
        self.missing
            .lock()
            .expect("missing mutex poisoned")
            .insert(program.to_string());
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    /// Redacted command lines, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Whether any call starts with the given tokens.
    pub fn saw(&self, prefix: &[&str]) -> bool {
        self.calls().iter().any(|c| matches_prefix(c, prefix))
    }
}

fn matches_prefix<S: AsRef<str>>(invocation: &Invocation, prefix: &[S]) -> bool {
    let tokens: Vec<&str> = invocation.tokens().collect();
    tokens.len() >= prefix.len() && prefix.iter().zip(&tokens).all(|(p, t)| p.as_ref() == *t)
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(invocation.clone());

        let rules = self.rules.lock().expect("rules mutex poisoned");
        let output = rules
            .iter()
            .rev()
            .find(|(prefix, _)| matches_prefix(invocation, prefix))
            .map(|(_, out)| out.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));
        Ok(output)
    }
}

impl CommandExistsChecker for RecordingRunner {
    fn exists(&self, program: &str) -> bool {
        !self
            .missing
            .lock()
            .expect("missing mutex poisoned")
            .contains(program)
    }
}
