use crate::resolver::PathTable;
use crate::types::{ActionEffect, Availability, BindingTarget, ControlBinding};
use std::time::{Duration, Instant};
use tracing::debug;

/// Re-evaluates every binding against the filesystem on a fixed period.
/// Runs on the interface thread; it only stats paths.
pub struct Poller {
    interval: Duration,
    next_due: Instant,
}

impl Poller {
    /// The first tick is due immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: Instant::now(),
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Makes the next `is_due` check succeed.
    pub fn request_refresh(&mut self) {
        self.next_due = Instant::now();
    }

    /// Updates every idle binding, then schedules the next tick.
    /// Bindings with an outstanding task keep their in-progress state.
    pub fn tick(&mut self, bindings: &mut [ControlBinding], paths: &PathTable) {
        for binding in bindings.iter_mut() {
            if binding.state == Availability::InProgress {
                continue;
            }
            let state = Availability::from_exists(is_available(&binding.target, paths));
            if state != binding.state {
                debug!("{} is now {:?}", binding.label, state);
            }
            binding.state = state;
        }
        self.next_due = Instant::now() + self.interval;
    }
}

/// Whether the binding's target can be acted on right now.
pub fn is_available(target: &BindingTarget, paths: &PathTable) -> bool {
    match target {
        BindingTarget::Action(descriptor) => {
            paths.all_exist(&descriptor.required_keys)
                && match &descriptor.effect {
                    ActionEffect::OpenFile(path) | ActionEffect::DeletePath(path) => path.exists(),
                    ActionEffect::SpawnProcess { .. } => true,
                }
        }
        BindingTarget::DeleteFolder(Some(folder)) => folder.exists(),
        BindingTarget::DeleteFolder(None) => false,
        BindingTarget::DeleteAll(folders) => folders.iter().any(|folder| folder.exists()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_bindings;
    use crate::config::PanelConfig;
    use crate::types::Section;
    use std::fs;

    fn setup(json: &str) -> (Vec<ControlBinding>, PathTable) {
        let config = PanelConfig::from_json(json).unwrap();
        let paths = PathTable::new(&config.paths);
        (build_bindings(&config, &paths), paths)
    }

    fn state_of(bindings: &[ControlBinding], label: &str) -> Availability {
        bindings
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.state)
            .unwrap()
    }

    #[test]
    fn missing_project_path_leaves_everything_unavailable() {
        let (mut bindings, paths) = setup(r#"{"paths": {"unreal_project": ""}}"#);
        let mut poller = Poller::new(Duration::from_secs(5));

        poller.tick(&mut bindings, &paths);

        assert!(
            bindings
                .iter()
                .all(|b| b.state == Availability::Unavailable)
        );
    }

    #[test]
    fn absent_project_key_leaves_everything_unavailable() {
        let (mut bindings, paths) = setup(r#"{"paths": {}}"#);
        assert!(paths.get("unreal_project").is_none());

        Poller::new(Duration::from_secs(5)).tick(&mut bindings, &paths);

        for section in [
            Section::ProjectActions,
            Section::BuildTools,
            Section::ConfigFiles,
            Section::TemporaryData,
        ] {
            assert!(bindings.iter().any(|b| b.section == section));
        }
        for binding in &bindings {
            assert_eq!(
                binding.state,
                Availability::Unavailable,
                "{} should be unavailable",
                binding.label
            );
        }
    }

    #[test]
    fn folders_and_config_files_track_existence() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path();
        fs::create_dir(project.join("Intermediate")).unwrap();
        fs::create_dir(project.join("Config")).unwrap();
        fs::write(project.join("Config/DefaultGame.ini"), "[/Script]").unwrap();
        let json = format!(
            r#"{{"paths": {{"unreal_project": {}}}}}"#,
            serde_json::to_string(&project.display().to_string()).unwrap()
        );
        let (mut bindings, paths) = setup(&json);
        let mut poller = Poller::new(Duration::from_secs(5));

        poller.tick(&mut bindings, &paths);

        assert_eq!(state_of(&bindings, "Intermediate"), Availability::Available);
        assert_eq!(state_of(&bindings, "Saved"), Availability::Unavailable);
        assert_eq!(
            state_of(&bindings, "Delete All Temporary Data"),
            Availability::Available
        );
        assert_eq!(
            state_of(&bindings, "Open DefaultGame.ini"),
            Availability::Available
        );
        assert_eq!(
            state_of(&bindings, "Open DefaultEngine.ini"),
            Availability::Unavailable
        );
        assert_eq!(
            state_of(&bindings, "Open Project Folder"),
            Availability::Available
        );
        assert_eq!(state_of(&bindings, "Open in VSCode"), Availability::Unavailable);
    }

    #[test]
    fn in_progress_bindings_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let json = format!(
            r#"{{"paths": {{"unreal_project": {}}}}}"#,
            serde_json::to_string(&dir.path().display().to_string()).unwrap()
        );
        let (mut bindings, paths) = setup(&json);
        let saved = bindings.iter().position(|b| b.label == "Saved").unwrap();
        bindings[saved].state = Availability::InProgress;

        Poller::new(Duration::from_secs(5)).tick(&mut bindings, &paths);

        assert_eq!(bindings[saved].state, Availability::InProgress);
    }

    #[test]
    fn tick_reschedules() {
        let (mut bindings, paths) = setup("{}");
        let mut poller = Poller::new(Duration::from_secs(60));
        assert!(poller.is_due(Instant::now()));

        poller.tick(&mut bindings, &paths);
        assert!(!poller.is_due(Instant::now()));

        poller.request_refresh();
        assert!(poller.is_due(Instant::now()));
    }
}
