use crate::origin::RepoOrigin;
use crate::time::{UtcTime, now_utc};
use serde::{Deserialize, Serialize};

/// A named group of pipelines contributed to the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineGroup {
    name: String,
    pipelines: Vec<String>,
}

impl PipelineGroup {
    pub fn new(name: impl Into<String>, pipelines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pipelines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipelines(&self) -> &[String] {
        &self.pipelines
    }
}

/// An environment definition grouping pipelines for deployment purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDef {
    name: String,
    pipelines: Vec<String>,
}

impl EnvironmentDef {
    pub fn new(name: impl Into<String>, pipelines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pipelines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipelines(&self) -> &[String] {
        &self.pipelines
    }
}

/// A parsed configuration sub-document contributed by one repository.
///
/// Fragments are immutable once constructed; the polling layer builds a new
/// instance per poll cycle. The capture timestamp is provenance only and is
/// ignored when comparing fragments for equivalence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    origin: RepoOrigin,
    groups: Vec<PipelineGroup>,
    environments: Vec<EnvironmentDef>,
    captured_at: UtcTime,
}

impl Fragment {
    pub fn new(
        origin: RepoOrigin,
        groups: Vec<PipelineGroup>,
        environments: Vec<EnvironmentDef>,
    ) -> Self {
        Self {
            origin,
            groups,
            environments,
            captured_at: now_utc(),
        }
    }

    pub fn origin(&self) -> &RepoOrigin {
        &self.origin
    }

    pub fn groups(&self) -> &[PipelineGroup] {
        &self.groups
    }

    pub fn environments(&self) -> &[EnvironmentDef] {
        &self.environments
    }

    pub fn captured_at(&self) -> &UtcTime {
        &self.captured_at
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.environments.is_empty()
    }

    /// Whether two fragments contribute identical definitions to the merged
    /// configuration, ignoring origin revision and capture time.
    pub fn same_definitions(&self, other: &Fragment) -> bool {
        self.groups == other.groups && self.environments == other.environments
    }

    /// Names of all pipelines defined across this fragment's groups.
    pub fn pipeline_names(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.pipelines.iter().map(String::as_str))
    }
}
