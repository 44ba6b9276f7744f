use crate::template::Template;
use regex::{Captures, Regex};
use tokio::sync::Mutex;

/// One compiled deployment rule. Immutable after config load; the guard
/// serializes command execution when concurrent notifications hit the same
/// rule (distinct rules still run concurrently).
#[derive(Debug)]
pub struct Rule {
    pub name: String,
    pub repository: String,
    pub condition: Regex,
    pub template: Template,
    pub guard: Mutex<()>,
}

/// The rule catalog, in configuration order. Built once at startup and
/// shared read-only across requests.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> RuleSet {
        RuleSet { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

/// All non-overlapping matches of `condition` within `reference`, leftmost
/// first, each carrying its capture groups. Pure over its inputs.
///
/// Zero-length matches count: a condition like `x*` matches any reference
/// and fires its rule. A template with no groups then expands once per
/// (empty) match, so such patterns belong in a config only deliberately.
pub fn find_matches<'t>(condition: &Regex, reference: &'t str) -> Vec<Captures<'t>> {
    condition.captures_iter(reference).collect()
}
