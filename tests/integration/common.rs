//! Shared fixtures for the integration suite.

use addonsync::catalog::Project;
use addonsync::config::{ProjectToggles, UpdaterConfig};
use addonsync::engine::UpdateEngine;
use addonsync::test_utils::{FakeHttp, init_test_logging};
use std::path::Path;
use std::sync::Arc;

/// Configuration with exactly `projects` enabled.
pub fn config_with(projects: &[Project]) -> UpdaterConfig {
    let mut config = UpdaterConfig::default();
    config.projects = ProjectToggles::none();
    for project in projects {
        config.projects.set(*project, true);
    }
    config
}

/// Engine over `http` with exactly `projects` enabled.
pub fn engine_with(projects: &[Project], http: FakeHttp) -> UpdateEngine<FakeHttp> {
    init_test_logging(None);
    UpdateEngine::with_client(Arc::new(config_with(projects)), http)
}

/// Sorted names of the immediate children of `dir`.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries.map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
