use crate::error::{CoreError, Result};
use crate::fingerprint::Fingerprint;
use crate::fragment::{EnvironmentDef, Fragment, PipelineGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used for locally defined entities in validation messages.
const LOCAL_ORIGIN: &str = "the local configuration";

/// The full configuration document: locally defined pipeline groups and
/// environments plus one contribution per remote configuration repository.
///
/// Instances are plain values. The live document is owned by the update
/// sink, which mutates a private clone and publishes it only after
/// [`MergedConfiguration::validate`] passes, so every published snapshot is
/// structurally valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedConfiguration {
    local_groups: Vec<PipelineGroup>,
    local_environments: Vec<EnvironmentDef>,
    remote: BTreeMap<Fingerprint, Fragment>,
}

impl MergedConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local(groups: Vec<PipelineGroup>, environments: Vec<EnvironmentDef>) -> Self {
        Self {
            local_groups: groups,
            local_environments: environments,
            remote: BTreeMap::new(),
        }
    }

    pub fn local_groups(&self) -> &[PipelineGroup] {
        &self.local_groups
    }

    pub fn local_environments(&self) -> &[EnvironmentDef] {
        &self.local_environments
    }

    /// The fragment currently contributed under the given fingerprint.
    pub fn contribution(&self, fingerprint: &Fingerprint) -> Option<&Fragment> {
        self.remote.get(fingerprint)
    }

    /// Fingerprints of all repositories currently contributing definitions.
    pub fn contributing_fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.remote.keys()
    }

    /// Replace (or insert) the contribution stored under `fingerprint`.
    pub fn set_contribution(&mut self, fingerprint: Fingerprint, fragment: Fragment) {
        self.remote.insert(fingerprint, fragment);
    }

    /// Drop the contribution stored under `fingerprint`, if any.
    pub fn remove_contribution(&mut self, fingerprint: &Fingerprint) -> bool {
        self.remote.remove(fingerprint).is_some()
    }

    /// Whether any group, local or remote, defines a pipeline by this name.
    pub fn has_pipeline(&self, name: &str) -> bool {
        self.all_groups().any(|(_, g)| {
            g.pipelines().iter().any(|p| p == name)
        })
    }

    /// All pipeline names across local and remote groups, in document order.
    pub fn pipeline_names(&self) -> Vec<String> {
        self.all_groups()
            .flat_map(|(_, g)| g.pipelines().iter().cloned())
            .collect()
    }

    fn all_groups(&self) -> impl Iterator<Item = (String, &PipelineGroup)> {
        let local = self
            .local_groups
            .iter()
            .map(|g| (LOCAL_ORIGIN.to_string(), g));
        let remote = self.remote.values().flat_map(|fragment| {
            let label = fragment.origin().display_name();
            fragment.groups().iter().map(move |g| (label.clone(), g))
        });
        local.chain(remote)
    }

    fn all_environments(&self) -> impl Iterator<Item = (String, &EnvironmentDef)> {
        let local = self
            .local_environments
            .iter()
            .map(|e| (LOCAL_ORIGIN.to_string(), e));
        let remote = self.remote.values().flat_map(|fragment| {
            let label = fragment.origin().display_name();
            fragment
                .environments()
                .iter()
                .map(move |e| (label.clone(), e))
        });
        local.chain(remote)
    }

    /// Whole-document structural validation.
    ///
    /// Rejects empty names, pipelines defined by more than one origin,
    /// duplicate environments, and environments referencing pipelines that
    /// no group defines.
    pub fn validate(&self) -> Result<()> {
        let mut pipeline_owners: BTreeMap<&str, String> = BTreeMap::new();
        for (label, group) in self.all_groups() {
            if group.name().is_empty() {
                return Err(CoreError::invalid_name("pipeline group", group.name()));
            }
            for pipeline in group.pipelines() {
                if pipeline.is_empty() {
                    return Err(CoreError::invalid_name("pipeline", pipeline));
                }
                if let Some(first) = pipeline_owners.insert(pipeline, label.clone()) {
                    return Err(CoreError::duplicate_pipeline(pipeline, first, label));
                }
            }
        }

        let mut environment_owners: BTreeMap<&str, String> = BTreeMap::new();
        for (label, environment) in self.all_environments() {
            if environment.name().is_empty() {
                return Err(CoreError::invalid_name("environment", environment.name()));
            }
            if let Some(first) = environment_owners.insert(environment.name(), label.clone()) {
                return Err(CoreError::duplicate_environment(
                    environment.name(),
                    first,
                    label,
                ));
            }
            for pipeline in environment.pipelines() {
                if !pipeline_owners.contains_key(pipeline.as_str()) {
                    return Err(CoreError::unknown_pipeline(environment.name(), pipeline));
                }
            }
        }

        Ok(())
    }
}
