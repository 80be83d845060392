//! Rule registration and per-file rule set resolution.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::LinterError;
use crate::rule::{LintRule, RuleContext, RuleSet};
use crate::source::{Line, SourceFile};
use crate::rules::{self, FinalNewline, MaxLineLength, NoTodo, NoTrailingWhitespace};

/// Selector that expands to every registered rule.
pub const BUILTIN_GROUP: &str = "builtin";

type RuleFactory =
    Arc<dyn Fn(Option<&serde_json::Value>) -> Result<Box<dyn LintRule>, LinterError> + Send + Sync>;

struct RegisteredRule {
    name: String,
    description: String,
    factory: RuleFactory,
}

/// Named rule factories, kept in registration order.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<RegisteredRule>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(
            rules::NO_TODO,
            "Disallow TODO/FIXME markers",
            |options| Ok(Box::new(NoTodo::new(options)?) as Box<dyn LintRule>),
        );
        registry.insert(
            rules::MAX_LINE_LENGTH,
            "Report lines longer than a limit",
            |options| Ok(Box::new(MaxLineLength::new(options)?) as Box<dyn LintRule>),
        );
        registry.insert(
            rules::NO_TRAILING_WHITESPACE,
            "Report whitespace at the end of a line",
            |options| Ok(Box::new(NoTrailingWhitespace::new(options)?) as Box<dyn LintRule>),
        );
        registry.insert(
            rules::FINAL_NEWLINE,
            "Require a newline at the end of non-empty files",
            |options| Ok(Box::new(FinalNewline::new(options)?) as Box<dyn LintRule>),
        );
        registry
    }

    /// Registers a rule. A later registration under the same name replaces
    /// the earlier one in place.
    ///
    /// Every violation the rule reports carries `name`, whatever the rule's
    /// own [`LintRule::name`] returns. Empty names and the group selectors
    /// are rejected.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: F,
    ) -> Result<(), LinterError>
    where
        F: Fn(Option<&serde_json::Value>) -> Result<Box<dyn LintRule>, LinterError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LinterError::Config("Rule name must not be empty".to_string()));
        }
        if name == BUILTIN_GROUP || name == "*" {
            return Err(LinterError::Config(format!(
                "Rule name '{name}' is reserved for rule groups"
            )));
        }
        self.insert(name, description, factory);
        Ok(())
    }

    fn insert<F>(&mut self, name: impl Into<String>, description: impl Into<String>, factory: F)
    where
        F: Fn(Option<&serde_json::Value>) -> Result<Box<dyn LintRule>, LinterError>
            + Send
            + Sync
            + 'static,
    {
        let entry = Arc::new(RegisteredRule {
            name: name.into(),
            description: description.into(),
            factory: Arc::new(factory),
        });
        match self.rules.iter_mut().find(|r| r.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.rules.push(entry),
        }
    }

    /// Names and descriptions of every registered rule.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|r| (r.name.as_str(), r.description.as_str()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    fn expand<'a>(&'a self, selectors: &[String]) -> Result<HashSet<&'a str>, LinterError> {
        let mut names = HashSet::new();
        for selector in selectors {
            if selector == BUILTIN_GROUP || selector == "*" {
                names.extend(self.rules.iter().map(|r| r.name.as_str()));
            } else if let Some(rule) = self.rules.iter().find(|r| r.name == *selector) {
                names.insert(rule.name.as_str());
            } else {
                return Err(LinterError::UnknownRule(selector.clone()));
            }
        }
        Ok(names)
    }

    /// Resolves the rules selected by `enable` minus `disable`, instantiating
    /// each one with its options. Does no I/O.
    pub fn collect_rules(
        &self,
        enable: &[String],
        disable: &[String],
        options: &BTreeMap<String, serde_json::Value>,
    ) -> Result<RuleSet, LinterError> {
        let enabled = self.expand(enable)?;
        let disabled = self.expand(disable)?;

        let mut rules: RuleSet = Vec::new();
        for entry in &self.rules {
            let name = entry.name.as_str();
            if enabled.contains(name) && !disabled.contains(name) {
                let rule = (entry.factory)(options.get(name))?;
                rules.push(Box::new(Named {
                    name: entry.name.clone(),
                    rule,
                }));
            }
        }

        debug!("Resolved {} rules", rules.len());
        Ok(rules)
    }
}

/// A rule instance answering to the name it was registered under.
struct Named {
    name: String,
    rule: Box<dyn LintRule>,
}

impl LintRule for Named {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_line(
        &mut self,
        line: &Line<'_>,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        self.rule.check_line(line, ctx)
    }

    fn check_file(
        &mut self,
        source: &SourceFile,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        self.rule.check_file(source, ctx)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| &r.name))
            .finish()
    }
}
