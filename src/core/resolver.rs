//! # Resolver
//!
//! Walks a [`Registry`] in order and returns the command of the first rule whose predicate
//! holds, with the snapshot's arguments appended verbatim. No scoring, no combining: the
//! first match wins, and no match at all is a normal outcome (an empty command).

use crate::{
    constants::ISSUES_URL,
    core::{registry::Registry, snapshot::Snapshot},
};

/// Resolves test commands against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Returns `template ++ args` for the first matching rule, or an empty vector.
    ///
    /// Every step is traced through [`Snapshot::debug`]. When nothing matches, the last
    /// trace line contains "no matching test handler"; packaging smoke tests grep for it.
    pub fn find_command(&self, snapshot: &Snapshot) -> Vec<String> {
        let total = self.registry.len();
        snapshot.debug("checking each handler for first match", 0);

        for (i, rule) in self.registry.rules().iter().enumerate() {
            snapshot.debug(
                &format!("Checking rule {:02}/{}: {}", i + 1, total, rule.name()),
                2,
            );
            snapshot.debug(rule.debug_text(), 4);

            if rule.matches(snapshot) {
                log::debug!("Rule '{}' matched", rule.name());
                snapshot.debug("matched!", 4);
                snapshot.debug(&format!("would have run: `{}`", rule.command_line()), 6);

                let mut command = rule.command_template();
                command.extend(snapshot.args().iter().cloned());
                return command;
            }

            snapshot.debug("no match, continuing", 4);
        }

        log::debug!("No rule matched in '{}'", snapshot.cwd().display());
        snapshot.debug(
            &format!(
                "no matching test handler (no matching rule out of {total}). To add a new one, please file an issue: {ISSUES_URL}"
            ),
            0,
        );
        Vec::new()
    }
}

/// Resolves against the standard registry.
pub fn find_command(snapshot: &Snapshot) -> Vec<String> {
    Resolver::new(Registry::standard()).find_command(snapshot)
}
