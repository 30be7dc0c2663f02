use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Part of an issue a rule pattern is tested against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Title,
    Text,
    Label,
    Any,
    /// Selector not understood by the matcher; such a rule never matches
    Unknown(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "title" => Self::Title,
            "text" => Self::Text,
            "label" => Self::Label,
            "any" => Self::Any,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub const fn covers_title(&self) -> bool {
        matches!(self, Self::Title | Self::Any)
    }

    pub const fn covers_text(&self) -> bool {
        matches!(self, Self::Text | Self::Any)
    }

    pub const fn covers_labels(&self) -> bool {
        matches!(self, Self::Label | Self::Any)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Text => write!(f, "text"),
            Self::Label => write!(f, "label"),
            Self::Any => write!(f, "any"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// Single `selector:pattern` rule with a compiled, case-insensitive regex
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: Selector,
    pub pattern: Regex,
}

impl Rule {
    pub const fn new(selector: Selector, pattern: Regex) -> Self {
        Self { selector, pattern }
    }

    /// Rule in its configuration line form (`selector:pattern`)
    ///
    /// The inline `(?i)` flag added at compile time is not part of the line.
    pub fn line(&self) -> String {
        let source = self.pattern.as_str();
        let source = source.strip_prefix("(?i)").unwrap_or(source);
        format!("{}:{source}", self.selector)
    }
}

/// Per-user assignment rules plus the optional fallback label
///
/// Users iterate in sorted order so assignment output is reproducible.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Vec<Rule>>,
    fallback_label: Option<String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to a user's list, creating the user if needed
    pub fn add_rule(&mut self, user: impl Into<String>, rule: Rule) {
        self.rules.entry(user.into()).or_default().push(rule);
    }

    /// Register a user even if none of their lines produced a rule
    pub fn add_user(&mut self, user: impl Into<String>) {
        self.rules.entry(user.into()).or_default();
    }

    #[must_use]
    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = Some(label.into());
        self
    }

    pub fn fallback_label(&self) -> Option<&str> {
        self.fallback_label.as_deref()
    }

    /// Users and their rules, in stable (sorted) order
    pub fn users(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.rules
            .iter()
            .map(|(user, rules)| (user.as_str(), rules.as_slice()))
    }

    pub fn rules_for(&self, user: &str) -> Option<&[Rule]> {
        self.rules.get(user).map(Vec::as_slice)
    }

    pub fn user_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
