pub mod document;
pub mod error;
pub mod fingerprint;
pub mod fragment;
pub mod health;
pub mod origin;
pub mod repo;
pub mod time;

pub use document::MergedConfiguration;
pub use error::{CoreError, Result};
pub use fingerprint::Fingerprint;
pub use fragment::{EnvironmentDef, Fragment, PipelineGroup};
pub use health::{HealthRecord, HealthScope};
pub use origin::RepoOrigin;
pub use repo::{ConfigRepo, Directive, EntityKind, RulePolicy, RuleSet};
pub use time::{UtcTime, now_utc};
