use crate::domain::models::{Issue, Rule};

/// Test an issue against one user's rules
///
/// Returns `true` on the first rule whose pattern is found in a covered
/// field. A missing body is searched as the empty string.
pub fn matches(issue: &Issue, rules: &[Rule]) -> bool {
    rules.iter().any(|rule| rule_matches(issue, rule))
}

fn rule_matches(issue: &Issue, rule: &Rule) -> bool {
    let selector = &rule.selector;
    let pattern = &rule.pattern;

    (selector.covers_title() && pattern.is_match(&issue.title))
        || (selector.covers_text() && pattern.is_match(issue.body_text()))
        || (selector.covers_labels() && issue.labels.iter().any(|l| pattern.is_match(&l.name)))
}
