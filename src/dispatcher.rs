use crate::error::ActionError;
use crate::file_operations::{self, Filesystem};
use crate::resolver::PathTable;
use crate::types::{ActionDescriptor, ActionEffect};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

const OUTPUT_EXCERPT_LEN: usize = 300;

/// Process and file-association calls made by actions. Swapped out in tests.
pub trait Launcher: Send + Sync {
    /// Starts the process and returns without waiting for it.
    fn spawn_detached(&self, argv: &[String], cwd: Option<&Path>) -> io::Result<()>;
    /// Runs the process to completion, capturing its output.
    fn run(&self, argv: &[String], cwd: Option<&Path>) -> io::Result<Output>;
    fn open_with_default(&self, path: &Path) -> io::Result<()>;
}

pub struct SystemLauncher;

impl SystemLauncher {
    fn command(argv: &[String], cwd: Option<&Path>) -> io::Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command line"))?;
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        Ok(command)
    }
}

impl Launcher for SystemLauncher {
    fn spawn_detached(&self, argv: &[String], cwd: Option<&Path>) -> io::Result<()> {
        let mut child = Self::command(argv, cwd)?
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // Reap the child whenever it exits so it does not linger as a zombie.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }

    fn run(&self, argv: &[String], cwd: Option<&Path>) -> io::Result<Output> {
        let mut command = Self::command(argv, cwd)?;
        configure_child_process(&mut command);
        command.stdin(Stdio::null()).output()
    }

    fn open_with_default(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}

#[cfg(windows)]
fn configure_child_process(command: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x08000000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn configure_child_process(_command: &mut Command) {}

/// Executes actions on a worker thread. Every failure is logged here and
/// nothing is returned to the caller.
#[derive(Clone)]
pub struct Dispatcher {
    paths: Arc<PathTable>,
    fs: Arc<dyn Filesystem>,
    launcher: Arc<dyn Launcher>,
}

impl Dispatcher {
    pub fn new(paths: Arc<PathTable>, fs: Arc<dyn Filesystem>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            paths,
            fs,
            launcher,
        }
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    pub fn execute(&self, descriptor: &ActionDescriptor) {
        if let Some(key) = descriptor
            .required_keys
            .iter()
            .find(|key| !self.paths.exists(key))
        {
            debug!(
                "Skipping '{}': {}",
                descriptor.label,
                ActionError::MissingPath(key.clone())
            );
            return;
        }

        if let Err(e) = self.run_effect(&descriptor.label, &descriptor.effect) {
            error!("{}: {}", descriptor.label, e);
        }
    }

    pub fn delete_path(&self, path: &Path) {
        if let Err(e) = file_operations::delete_path(self.fs.as_ref(), path) {
            error!("{}", e);
        }
    }

    pub fn delete_all(&self, paths: &[PathBuf]) {
        let failures = file_operations::delete_all(self.fs.as_ref(), paths);
        if failures > 0 {
            warn!("{} of {} folders could not be deleted", failures, paths.len());
        }
    }

    fn run_effect(&self, label: &str, effect: &ActionEffect) -> Result<(), ActionError> {
        match effect {
            ActionEffect::SpawnProcess {
                argv,
                cwd,
                wait: false,
            } => {
                info!("Launching: {}", argv.join(" "));
                self.launcher
                    .spawn_detached(argv, cwd.as_deref())
                    .map_err(|source| launch_error(argv, source))
            }
            ActionEffect::SpawnProcess {
                argv,
                cwd,
                wait: true,
            } => {
                info!("Starting: {}...", label);
                let output = self
                    .launcher
                    .run(argv, cwd.as_deref())
                    .map_err(|source| launch_error(argv, source))?;
                let excerpt = format_output_excerpt(
                    &String::from_utf8_lossy(&output.stdout),
                    &String::from_utf8_lossy(&output.stderr),
                );
                if output.status.success() {
                    info!("Completed: {}.", label);
                    if !excerpt.is_empty() {
                        debug!("{}", excerpt);
                    }
                } else {
                    error!("{} failed ({}): {}", label, output.status, excerpt);
                }
                Ok(())
            }
            ActionEffect::OpenFile(path) => {
                info!("Opening {}", path.display());
                self.launcher
                    .open_with_default(path)
                    .map_err(|source| ActionError::Open {
                        path: path.clone(),
                        source,
                    })
            }
            ActionEffect::DeletePath(path) => {
                file_operations::delete_path(self.fs.as_ref(), path).map(|_| ())
            }
        }
    }
}

fn launch_error(argv: &[String], source: io::Error) -> ActionError {
    ActionError::Launch {
        program: argv.first().cloned().unwrap_or_default(),
        source,
    }
}

fn format_output_excerpt(stdout: &str, stderr: &str) -> String {
    let mut text = String::new();
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    if !stdout.is_empty() {
        text.push_str("stdout: ");
        text.push_str(stdout);
    }
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push_str(" | ");
        }
        text.push_str("stderr: ");
        text.push_str(stderr);
    }
    truncate_tail(&text, OUTPUT_EXCERPT_LEN)
}

/// Keeps the last `max` characters; build tools print the interesting part last.
fn truncate_tail(value: &str, max: usize) -> String {
    let count = value.chars().count();
    if count <= max {
        return value.to_string();
    }
    let tail: String = value.chars().skip(count - max).collect();
    format!("...{}", tail)
}
