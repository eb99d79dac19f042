//! # Registry
//!
//! The fixed, totally ordered list of rules. Order is policy: the first rule that matches
//! wins, so task runners come before the tools they would wrap, wrapped test runners before
//! bare interpreters, and lockfile-specific JS rules before the lockfile-agnostic one.

use crate::core::{rule::Rule, rules::RuleId};
use lazy_static::lazy_static;

/// The order rules are checked in.
pub const PRECEDENCE: [RuleId; 19] = [
    RuleId::Justfile,
    RuleId::Exercism,
    RuleId::Makefile,
    RuleId::AdventOfCode,
    RuleId::UvPytest,
    RuleId::PdmPytest,
    RuleId::PoetryPytest,
    // pytest has django plugins, so if both are present, assume pytest is wanted
    RuleId::Pytest,
    RuleId::Django,
    RuleId::Python,
    // go_multi must come first; both match a bare module
    RuleId::GoMulti,
    RuleId::GoSingle,
    RuleId::Elixir,
    RuleId::Rust,
    RuleId::Clojure,
    RuleId::Npm,
    RuleId::Yarn,
    RuleId::Pnpm,
    RuleId::Bun,
];

lazy_static! {
    static ref STANDARD: Registry = Registry::from_ids(&PRECEDENCE);
}

/// An ordered collection of rules.
#[derive(Debug, Clone)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    /// A registry checking `rules` in the given order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Builds each id's rule, keeping the order of `ids`.
    pub fn from_ids(ids: &[RuleId]) -> Self {
        Self::new(ids.iter().map(|id| id.build()).collect())
    }

    /// The process-wide registry, built once on first use.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Where `id` sits in the check order, if it is registered.
    pub fn position(&self, id: RuleId) -> Option<usize> {
        self.rules.iter().position(|rule| rule.id() == id)
    }
}
