//! Rule evaluation over fragment contents
//!
//! Rule verdicts are advisory context for the engine's fallback decision;
//! structural merge validation remains the actual gate. Permission and
//! structural correctness are independent concerns.

use conflux_core::{ConfigRepo, EntityKind, Fragment};

/// Reports whether a fragment defines configuration outside the permissions
/// granted to its owning repository.
pub trait RuleEvaluator: Send + Sync {
    /// An absent fragment never violates rules.
    ///
    /// The previously valid fragment is always evaluated against the
    /// repository's *current* rules, so a rules change can retroactively
    /// turn an accepted fragment into a violating one.
    fn violates_rules(&self, repo: &ConfigRepo, fragment: Option<&Fragment>) -> bool;
}

/// Evaluates the repository's allow/deny directives against every entity the
/// fragment defines. Any out-of-scope definition is a violation.
#[derive(Debug, Default)]
pub struct DirectiveEvaluator;

impl DirectiveEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl RuleEvaluator for DirectiveEvaluator {
    fn violates_rules(&self, repo: &ConfigRepo, fragment: Option<&Fragment>) -> bool {
        let Some(fragment) = fragment else {
            return false;
        };
        let rules = repo.rules();
        fragment
            .groups()
            .iter()
            .any(|g| !rules.allows(EntityKind::PipelineGroup, g.name()))
            || fragment
                .environments()
                .iter()
                .any(|e| !rules.allows(EntityKind::Environment, e.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflux_core::{
        Directive, EnvironmentDef, Fingerprint, PipelineGroup, RepoOrigin, RulePolicy, RuleSet,
    };

    fn repo(rules: RuleSet) -> ConfigRepo {
        ConfigRepo::new(Fingerprint::new("f1").unwrap(), "repo.git", rules)
    }

    fn fragment(groups: Vec<PipelineGroup>, environments: Vec<EnvironmentDef>) -> Fragment {
        let origin = RepoOrigin::new(Fingerprint::new("f1").unwrap(), "repo.git", "rev1");
        Fragment::new(origin, groups, environments)
    }

    #[test]
    fn test_absent_fragment_never_violates() {
        let evaluator = DirectiveEvaluator::new();
        assert!(!evaluator.violates_rules(&repo(RuleSet::empty()), None));
    }

    #[test]
    fn test_granted_group_passes() {
        let rules = RuleSet::new(vec![
            Directive::new(RulePolicy::Allow, EntityKind::PipelineGroup, "team-*").unwrap(),
        ]);
        let fragment = fragment(
            vec![PipelineGroup::new("team-a", vec!["build".into()])],
            Vec::new(),
        );
        assert!(!DirectiveEvaluator::new().violates_rules(&repo(rules), Some(&fragment)));
    }

    #[test]
    fn test_ungranted_group_violates() {
        let fragment = fragment(
            vec![PipelineGroup::new("team-a", vec!["build".into()])],
            Vec::new(),
        );
        assert!(DirectiveEvaluator::new().violates_rules(&repo(RuleSet::empty()), Some(&fragment)));
    }

    #[test]
    fn test_environment_scoped_separately() {
        // Groups granted, environments not
        let rules = RuleSet::new(vec![
            Directive::new(RulePolicy::Allow, EntityKind::PipelineGroup, "*").unwrap(),
        ]);
        let fragment = fragment(
            vec![PipelineGroup::new("team-a", vec!["build".into()])],
            vec![EnvironmentDef::new("staging", vec!["build".into()])],
        );
        assert!(DirectiveEvaluator::new().violates_rules(&repo(rules), Some(&fragment)));
    }

    #[test]
    fn test_empty_fragment_never_violates() {
        let fragment = fragment(Vec::new(), Vec::new());
        assert!(!DirectiveEvaluator::new().violates_rules(&repo(RuleSet::empty()), Some(&fragment)));
    }
}
