use std::collections::BTreeSet;

use super::matcher;
use crate::domain::models::{Issue, RuleSet, Strategy};

/// Compute the assignee set an issue should have
///
/// `set` leaves an issue with any current assignee exactly as it is, even if
/// none of those assignees match a rule. `append` keeps the current assignees
/// and adds matched users; `change` keeps only matched users.
pub fn resolve(
    issue: &Issue,
    old: &BTreeSet<String>,
    rules: &RuleSet,
    strategy: Strategy,
) -> BTreeSet<String> {
    if strategy == Strategy::Set && !old.is_empty() {
        return old.clone();
    }

    let mut assignees = if strategy == Strategy::Append {
        old.clone()
    } else {
        BTreeSet::new()
    };

    for (user, user_rules) in rules.users() {
        if matcher::matches(issue, user_rules) {
            assignees.insert(user.to_string());
        }
    }

    assignees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::issue::fixtures::issue;
    use crate::domain::models::{Rule, Selector};
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_assume, proptest};
    use regex::Regex;

    fn rules(entries: &[(&str, &str, &str)]) -> RuleSet {
        let mut set = RuleSet::new();
        for (user, selector, pattern) in entries {
            set.add_rule(
                *user,
                Rule::new(
                    Selector::parse(selector),
                    Regex::new(&format!("(?i){pattern}")).expect("valid regex"),
                ),
            );
        }
        set
    }

    fn users(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|u| (*u).to_string()).collect()
    }

    #[test]
    fn test_append_adds_matched_user() {
        let rules = rules(&[("alice", "title", "bug")]);
        let issue = issue("Bug report", &[]);

        let new = resolve(&issue, &BTreeSet::new(), &rules, Strategy::Append);
        assert_eq!(new, users(&["alice"]));
    }

    #[test]
    fn test_set_protects_assigned_issue() {
        let rules = rules(&[("alice", "title", "bug")]);
        let issue = issue("Bug report", &["bob"]);
        let old = issue.assignee_logins();

        assert_eq!(resolve(&issue, &old, &rules, Strategy::Set), users(&["bob"]));
    }

    #[test]
    fn test_set_assigns_unassigned_issue() {
        let rules = rules(&[("alice", "title", "bug")]);
        let issue = issue("Bug report", &[]);

        assert_eq!(
            resolve(&issue, &BTreeSet::new(), &rules, Strategy::Set),
            users(&["alice"])
        );
    }

    #[test]
    fn test_change_drops_unmatched_assignees() {
        let rules = rules(&[("alice", "title", "bug"), ("carol", "title", "docs")]);
        let issue = issue("Bug report", &["bob", "carol"]);
        let old = issue.assignee_logins();

        assert_eq!(resolve(&issue, &old, &rules, Strategy::Change), users(&["alice"]));
    }

    fn arb_assignees() -> impl proptest::strategy::Strategy<Value = BTreeSet<String>> {
        proptest::collection::btree_set("(alice|bob|carol|dave|erin)", 0..4)
    }

    proptest! {
        #[test]
        fn prop_append_keeps_old_assignees(title in "[a-z ]{0,20}", old in arb_assignees()) {
            let rules = rules(&[("alice", "title", "a"), ("dave", "any", "d")]);
            let target = issue(&title, &[]);
            let new = resolve(&target, &old, &rules, Strategy::Append);
            prop_assert!(old.is_subset(&new));
        }

        #[test]
        fn prop_change_only_keeps_matched_users(title in "[a-z ]{0,20}", old in arb_assignees()) {
            let rules = rules(&[("alice", "title", "a"), ("dave", "any", "d")]);
            let target = issue(&title, &[]);
            let new = resolve(&target, &old, &rules, Strategy::Change);
            for user in &new {
                let user_rules = rules.rules_for(user).unwrap_or_default();
                prop_assert!(matcher::matches(&target, user_rules));
            }
        }

        #[test]
        fn prop_set_is_noop_when_assigned(title in "[a-z ]{0,20}", old in arb_assignees()) {
            prop_assume!(!old.is_empty());
            let rules = rules(&[("alice", "title", "a")]);
            let target = issue(&title, &[]);
            prop_assert_eq!(resolve(&target, &old, &rules, Strategy::Set), old);
        }
    }
}
