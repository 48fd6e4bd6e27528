//! Semantic fragment equivalence
//!
//! Used purely as an optimization gate before merging: a false "not
//! equivalent" answer only costs a redundant merge attempt, never incorrect
//! configuration state.

use conflux_core::Fragment;

/// Whether two fragment snapshots contribute identical definitions,
/// ignoring provenance such as revision and capture time.
///
/// An absent fragment is equivalent only to an absent fragment.
pub fn equivalent(a: Option<&Fragment>, b: Option<&Fragment>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_definitions(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflux_core::{Fingerprint, PipelineGroup, RepoOrigin};

    fn fragment(rev: &str, pipeline: &str) -> Fragment {
        let origin = RepoOrigin::new(Fingerprint::new("f1").unwrap(), "repo.git", rev);
        Fragment::new(
            origin,
            vec![PipelineGroup::new("group", vec![pipeline.to_string()])],
            Vec::new(),
        )
    }

    #[test]
    fn test_absent_equivalent_only_to_absent() {
        let f = fragment("rev1", "build");
        assert!(equivalent(None, None));
        assert!(!equivalent(Some(&f), None));
        assert!(!equivalent(None, Some(&f)));
    }

    #[test]
    fn test_same_content_different_revision_is_equivalent() {
        let a = fragment("rev1", "build");
        let b = fragment("rev2", "build");
        assert!(equivalent(Some(&a), Some(&b)));
    }

    #[test]
    fn test_different_content_not_equivalent() {
        let a = fragment("rev1", "build");
        let b = fragment("rev1", "deploy");
        assert!(!equivalent(Some(&a), Some(&b)));
    }
}
