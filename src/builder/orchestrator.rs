//! Build orchestration: expands a request into targets, runs them against
//! the selected backend and aggregates the outcomes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::builder::errors::BuildError;
use crate::builder::outcome::{BuildOutcome, BuildSummary, BuildTarget};
use crate::builder::shim::{BackendId, BackendShim};
use crate::builder::source_locator::SourceLocator;
use crate::util::Config;

/// How far to take each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Stop after the source package (`umpkg buildsrc`)
    SourceOnly,
    /// Source package, then binary packages from it (`umpkg build`)
    Full,
}

/// Expand a request into build targets.
///
/// An explicit path yields one target; no path fans out over the configured
/// spec list. Every target's path is normalized to carry the spec extension.
pub fn expand_request(request: Option<&str>, spec_list: &[String]) -> Vec<BuildTarget> {
    match request {
        Some(path) => vec![BuildTarget::new(path)],
        None => spec_list.iter().map(|s| BuildTarget::new(s)).collect(),
    }
}

/// Coordinates one `build` or `buildsrc` request.
pub struct BuildOrchestrator {
    backend: Arc<dyn BackendShim>,
    locator: SourceLocator,
    root: PathBuf,
}

impl BuildOrchestrator {
    /// Create an orchestrator resolving relative spec paths against `root`.
    pub fn new(
        backend: Arc<dyn BackendShim>,
        locator: SourceLocator,
        root: impl Into<PathBuf>,
    ) -> Self {
        BuildOrchestrator {
            backend,
            locator,
            root: root.into(),
        }
    }

    /// The backend every target of this orchestrator is built with.
    pub fn backend_id(&self) -> BackendId {
        self.backend.id()
    }

    /// Run a request: one path, or the configured spec list when `None`.
    pub fn run(&self, request: Option<&str>, config: &Config, stage: BuildStage) -> BuildSummary {
        let targets = expand_request(request, &config.spec_list());
        self.run_targets(targets, stage)
    }

    /// Build a batch of targets and wait for all of them.
    ///
    /// Missing spec files are reported immediately without touching the
    /// backend. The rest run inline when there is one, concurrently otherwise.
    /// A failing target never stops its siblings.
    pub fn run_targets(&self, targets: Vec<BuildTarget>, stage: BuildStage) -> BuildSummary {
        let total = targets.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut runnable = Vec::with_capacity(total);

        for target in targets {
            if self.root.join(&target.spec_path).is_file() {
                runnable.push(target);
            } else {
                tracing::error!("Spec {} not found", target.spec_path.display());
                let error = BuildError::SpecNotFound {
                    path: target.spec_path.clone(),
                };
                outcomes.push(BuildOutcome::failure(target, &error));
            }
        }

        if runnable.len() > 1 {
            outcomes.extend(self.run_concurrent(runnable, stage));
        } else {
            outcomes.extend(runnable.into_iter().map(|t| self.build_target(t, stage)));
        }

        BuildSummary::from_outcomes(total, outcomes)
    }

    /// One task per target on a pool as wide as the batch; joins them all.
    fn run_concurrent(&self, targets: Vec<BuildTarget>, stage: BuildStage) -> Vec<BuildOutcome> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(targets.len())
            .thread_name(|i| format!("umpkg-build-{}", i))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("failed to start build pool, building sequentially: {}", e);
                return targets
                    .into_iter()
                    .map(|t| self.build_target(t, stage))
                    .collect();
            }
        };

        tracing::info!("Building {} packages concurrently", targets.len());

        let outcomes = Mutex::new(Vec::with_capacity(targets.len()));
        pool.scope(|s| {
            for target in targets {
                let outcomes = &outcomes;
                s.spawn(move |_| {
                    let outcome = self.build_target(target, stage);
                    outcomes
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(outcome);
                });
            }
        });

        outcomes.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn build_target(&self, mut target: BuildTarget, stage: BuildStage) -> BuildOutcome {
        let spec = self.root.join(&target.spec_path);
        let source_dir = self.locator.resolve(&spec);
        target.source_dir = Some(source_dir.clone());

        let result = self
            .backend
            .build_source_package(&spec, &source_dir)
            .and_then(|srpm| match stage {
                BuildStage::SourceOnly => Ok(srpm),
                BuildStage::Full => self.backend.build_binary_package(&srpm),
            });

        match result {
            Ok(artifact) => {
                tracing::info!("Built {} -> {}", target.name(), artifact.display());
                BuildOutcome::success(target, artifact)
            }
            Err(e) => {
                tracing::error!("Error building {}: {}", target.spec_path.display(), e);
                BuildOutcome::failure(target, &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::outcome::BuildStatus;
    use crate::test_support::{write_spec, StubBehavior, StubShim};
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(root: &std::path::Path, shim: Arc<StubShim>) -> BuildOrchestrator {
        let locator = SourceLocator::new(None, root, root.join("SOURCES"));
        BuildOrchestrator::new(shim, locator, root)
    }

    fn config_with_specs(specs: &str) -> Config {
        let mut config = Config::default();
        config.package.spec = Some(specs.to_string());
        config
    }

    #[test]
    fn test_expand_single_request() {
        let targets = expand_request(Some("pkg"), &["ignored".to_string()]);
        assert_eq!(targets, vec![BuildTarget::new("pkg.spec")]);
    }

    #[test]
    fn test_expand_configured_list() {
        let targets = expand_request(None, &["foo".to_string(), "bar.spec".to_string()]);
        let paths: Vec<_> = targets.iter().map(|t| t.spec_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("foo.spec"), PathBuf::from("bar.spec")]);
        assert!(targets.iter().all(|t| t.source_dir.is_none()));
    }

    #[test]
    fn test_all_targets_succeed() {
        let tmp = TempDir::new().unwrap();
        let names = ["a", "b", "c", "d", "e"];
        for name in names {
            write_spec(tmp.path(), name);
        }

        let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            None,
            &config_with_specs(&names.join(" ")),
            BuildStage::Full,
        );

        assert_eq!(summary.total, names.len());
        assert_eq!(summary.succeeded, names.len());
        assert!(summary.all_succeeded());
        assert_eq!(shim.source_calls(), names.len());
        assert_eq!(shim.binary_calls(), names.len());
        for outcome in &summary.outcomes {
            assert!(outcome.artifact().unwrap().to_string_lossy().ends_with(".x86_64.rpm"));
            assert_eq!(outcome.target().source_dir.as_deref(), Some(tmp.path()));
        }
    }

    #[test]
    fn test_missing_specs_do_not_block_others() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "present1");
        write_spec(tmp.path(), "present2");

        let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            None,
            &config_with_specs("present1 gone1 present2 gone2"),
            BuildStage::SourceOnly,
        );

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(shim.source_calls(), 2);
        assert_eq!(shim.binary_calls(), 0);
        for name in ["gone1", "gone2"] {
            assert_eq!(
                summary.outcome_for(name).map(|o| o.status()),
                Some(BuildStatus::NotFound)
            );
        }
        for name in ["present1", "present2"] {
            assert!(summary.outcome_for(name).unwrap().is_success());
        }
    }

    #[test]
    fn test_foo_exists_bar_missing() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "foo");

        let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
        let summary = orchestrator(tmp.path(), shim).run(
            None,
            &config_with_specs("foo bar"),
            BuildStage::Full,
        );

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.outcome_for("foo").unwrap().status(), BuildStatus::Success);
        assert_eq!(summary.outcome_for("bar").unwrap().status(), BuildStatus::NotFound);
        // Not-found targets are reported before any backend work completes
        assert_eq!(summary.outcomes[0].target().name(), "bar");
    }

    #[test]
    fn test_single_request_build_failed() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "pkg");

        let shim = Arc::new(StubShim::new(StubBehavior::FailSource));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            Some("pkg"),
            &Config::default(),
            BuildStage::SourceOnly,
        );

        assert_eq!(summary.total, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.outcomes[0].status(), BuildStatus::BuildFailed);
        assert!(summary.outcomes[0].artifact().is_none());
        assert!(summary.outcomes[0].message().is_some());
    }

    #[test]
    fn test_source_failure_skips_binary_stage() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "pkg");

        let shim = Arc::new(StubShim::new(StubBehavior::FailSource));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            Some("pkg.spec"),
            &Config::default(),
            BuildStage::Full,
        );

        assert_eq!(summary.outcomes[0].status(), BuildStatus::BuildFailed);
        assert_eq!(shim.binary_calls(), 0);
    }

    #[test]
    fn test_binary_failure_does_not_stop_siblings() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "foo");
        write_spec(tmp.path(), "bar");

        let shim = Arc::new(StubShim::new(StubBehavior::FailBinary));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            None,
            &config_with_specs("foo bar"),
            BuildStage::Full,
        );

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(shim.source_calls(), 2);
        assert_eq!(shim.binary_calls(), 2);
        assert!(summary
            .outcomes
            .iter()
            .all(|o| o.status() == BuildStatus::BuildFailed));
    }

    #[test]
    fn test_binary_without_artifact() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "pkg");

        let shim = Arc::new(StubShim::new(StubBehavior::NoBinaryArtifact));
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            Some("pkg"),
            &Config::default(),
            BuildStage::Full,
        );

        assert_eq!(summary.outcomes[0].status(), BuildStatus::NoArtifact);
        assert_eq!(shim.source_calls(), 1);
        assert_eq!(shim.binary_calls(), 1);
    }

    #[test]
    fn test_source_only_stage_returns_source_package() {
        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "pkg");

        let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
        let summary = orchestrator(tmp.path(), shim).run(
            Some("pkg"),
            &Config::default(),
            BuildStage::SourceOnly,
        );

        let artifact = summary.outcomes[0].artifact().unwrap();
        assert!(artifact.to_string_lossy().ends_with(".src.rpm"));
    }

    #[test]
    fn test_batch_runs_concurrently() {
        let tmp = TempDir::new().unwrap();
        let names = ["a", "b", "c", "d"];
        for name in names {
            write_spec(tmp.path(), name);
        }

        let shim = Arc::new(
            StubShim::new(StubBehavior::Succeed).with_delay(Duration::from_millis(200)),
        );
        let summary = orchestrator(tmp.path(), shim.clone()).run(
            None,
            &config_with_specs(&names.join(" ")),
            BuildStage::SourceOnly,
        );

        assert_eq!(summary.succeeded, names.len());
        assert_eq!(shim.max_in_flight(), names.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_concurrent_targets_keep_their_own_artifacts() {
        use crate::builder::shim::{BackendConfig, RpmbuildShim};
        use crate::test_support::{fake_tool, STAGGERED_RPMBUILD};

        let tmp = TempDir::new().unwrap();
        write_spec(tmp.path(), "slow");
        write_spec(tmp.path(), "fast");
        let tool = fake_tool(tmp.path(), "rpmbuild", STAGGERED_RPMBUILD);
        let shim =
            RpmbuildShim::new(BackendConfig::new(tmp.path().join("build"))).with_program(tool);

        let locator = SourceLocator::new(None, tmp.path(), tmp.path().join("SOURCES"));
        let orchestrator = BuildOrchestrator::new(Arc::new(shim), locator, tmp.path());

        let srpms = orchestrator.run(None, &config_with_specs("slow fast"), BuildStage::SourceOnly);
        assert_eq!(srpms.succeeded, 2);
        for name in ["slow", "fast"] {
            let outcome = srpms.outcome_for(name).unwrap();
            assert_eq!(
                outcome.artifact(),
                Some(tmp.path().join(format!("build/srpm/{}-1.0-1.src.rpm", name)).as_path()),
                "{} got another package's source rpm",
                name
            );
        }

        let rpms = orchestrator.run(None, &config_with_specs("slow fast"), BuildStage::Full);
        assert_eq!(rpms.succeeded, 2);
        for name in ["slow", "fast"] {
            let outcome = rpms.outcome_for(name).unwrap();
            assert_eq!(
                outcome.artifact(),
                Some(
                    tmp.path()
                        .join(format!("build/rpm/x86_64/{}-1.0-1.x86_64.rpm", name))
                        .as_path()
                ),
                "{} got another package's binary rpm",
                name
            );
        }
    }

    #[test]
    fn test_empty_batch() {
        let tmp = TempDir::new().unwrap();
        let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
        let summary = orchestrator(tmp.path(), shim).run(None, &Config::default(), BuildStage::Full);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert!(summary.outcomes.is_empty());
    }
}
