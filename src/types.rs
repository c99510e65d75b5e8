use std::collections::BTreeSet;
use std::path::PathBuf;

/// Index of a binding in the panel's binding table.
pub type BindingId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
    InProgress,
}

impl Availability {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    ProjectActions,
    BuildTools,
    ConfigFiles,
    TemporaryData,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::ProjectActions => "Project Actions",
            Section::BuildTools => "Build Tools",
            Section::ConfigFiles => "Configuration Files",
            Section::TemporaryData => "Temporary Data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Start `argv[0]` with the remaining arguments. With `wait` set the
    /// worker blocks until the process exits and logs its status.
    SpawnProcess {
        argv: Vec<String>,
        cwd: Option<PathBuf>,
        wait: bool,
    },
    OpenFile(PathBuf),
    DeletePath(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub label: String,
    pub required_keys: BTreeSet<String>,
    pub effect: ActionEffect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    Action(ActionDescriptor),
    /// `None` when the project path is not configured.
    DeleteFolder(Option<PathBuf>),
    DeleteAll(Vec<PathBuf>),
}

#[derive(Debug, Clone)]
pub struct ControlBinding {
    pub id: BindingId,
    pub section: Section,
    pub label: String,
    pub target: BindingTarget,
    pub state: Availability,
}

impl ControlBinding {
    pub fn is_destructive(&self) -> bool {
        matches!(
            self.target,
            BindingTarget::DeleteFolder(_) | BindingTarget::DeleteAll(_)
        )
    }

    /// Label shown while the binding's task is outstanding.
    pub fn progress_label(&self) -> &'static str {
        match &self.target {
            BindingTarget::DeleteFolder(_) | BindingTarget::DeleteAll(_) => "Deleting...",
            BindingTarget::Action(descriptor) => match descriptor.effect {
                ActionEffect::DeletePath(_) => "Deleting...",
                ActionEffect::SpawnProcess { wait: true, .. } => "Running...",
                _ => "Launching...",
            },
        }
    }

    pub fn display_label(&self) -> &str {
        if self.state == Availability::InProgress {
            self.progress_label()
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivePane {
    Controls,
    Log,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogButton {
    Ok,
    Cancel,
}
