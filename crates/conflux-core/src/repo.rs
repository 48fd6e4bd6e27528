use crate::error::{CoreError, Result};
use crate::fingerprint::Fingerprint;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a directive grants or forbids access to the entities it matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePolicy {
    Allow,
    Deny,
}

impl fmt::Display for RulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Class of configuration entity a directive applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PipelineGroup,
    Environment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PipelineGroup => write!(f, "pipeline_group"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// One allow/deny rule: policy, entity kind, and a glob pattern over names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    policy: RulePolicy,
    kind: EntityKind,
    pattern: String,
}

impl Directive {
    /// Create a directive, rejecting malformed glob patterns up front.
    pub fn new(policy: RulePolicy, kind: EntityKind, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        Pattern::new(&pattern)
            .map_err(|e| CoreError::invalid_pattern(&pattern, e.to_string()))?;
        Ok(Self {
            policy,
            kind,
            pattern,
        })
    }

    pub fn policy(&self) -> RulePolicy {
        self.policy
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this directive applies to the given entity.
    ///
    /// A pattern that fails to compile (possible after deserialization from
    /// untrusted input) matches nothing, which under the default-deny policy
    /// below means it grants nothing.
    pub fn matches(&self, kind: EntityKind, name: &str) -> bool {
        self.kind == kind
            && Pattern::new(&self.pattern)
                .map(|p| p.matches(name))
                .unwrap_or(false)
    }
}

/// The authorization rules granted to one configuration repository.
///
/// Resolution: a matching deny directive forbids the entity, otherwise a
/// matching allow directive grants it, otherwise it is forbidden. Nothing is
/// granted by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    directives: Vec<Directive>,
}

impl RuleSet {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// A rule set that grants nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Whether the owning repository may define the given entity.
    pub fn allows(&self, kind: EntityKind, name: &str) -> bool {
        let mut allowed = false;
        for directive in &self.directives {
            if !directive.matches(kind, name) {
                continue;
            }
            match directive.policy() {
                RulePolicy::Deny => return false,
                RulePolicy::Allow => allowed = true,
            }
        }
        allowed
    }
}

/// Descriptor of one tracked external configuration repository.
///
/// Immutable per watch-list generation; a configuration change that alters a
/// repository's rules or material produces a new descriptor in the next
/// watch-list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRepo {
    fingerprint: Fingerprint,
    material: String,
    rules: RuleSet,
}

impl ConfigRepo {
    pub fn new(fingerprint: Fingerprint, material: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            fingerprint,
            material: material.into(),
            rules,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
