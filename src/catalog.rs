//! The fixed set of controls the panel offers, built once at startup from
//! the path table and build settings.

use crate::config::PanelConfig;
use crate::file_operations;
use crate::resolver::PathTable;
use crate::types::{
    ActionDescriptor, ActionEffect, Availability, BindingTarget, ControlBinding, Section,
};
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = ["DefaultEngine.ini", "DefaultGame.ini", "DefaultInput.ini"];

pub fn build_bindings(config: &PanelConfig, paths: &PathTable) -> Vec<ControlBinding> {
    let mut targets: Vec<(Section, String, BindingTarget)> = Vec::new();

    for descriptor in project_actions(config, paths) {
        targets.push((
            Section::ProjectActions,
            descriptor.label.clone(),
            BindingTarget::Action(descriptor),
        ));
    }
    for descriptor in build_actions(config, paths) {
        targets.push((
            Section::BuildTools,
            descriptor.label.clone(),
            BindingTarget::Action(descriptor),
        ));
    }
    for descriptor in config_file_actions(paths) {
        targets.push((
            Section::ConfigFiles,
            descriptor.label.clone(),
            BindingTarget::Action(descriptor),
        ));
    }

    let folders = file_operations::temp_folders(paths);
    for (name, folder) in &folders {
        targets.push((
            Section::TemporaryData,
            name.to_string(),
            BindingTarget::DeleteFolder(folder.clone()),
        ));
    }
    targets.push((
        Section::TemporaryData,
        "Delete All Temporary Data".to_string(),
        BindingTarget::DeleteAll(folders.into_iter().filter_map(|(_, f)| f).collect()),
    ));

    targets
        .into_iter()
        .enumerate()
        .map(|(id, (section, label, target))| ControlBinding {
            id,
            section,
            label,
            target,
            state: Availability::Unavailable,
        })
        .collect()
}

fn action(label: &str, keys: &[&str], effect: ActionEffect) -> ActionDescriptor {
    ActionDescriptor {
        label: label.to_string(),
        required_keys: keys.iter().map(|k| k.to_string()).collect(),
        effect,
    }
}

fn arg(path: PathBuf) -> String {
    path.display().to_string()
}

fn spawn(argv: Vec<String>) -> ActionEffect {
    ActionEffect::SpawnProcess {
        argv,
        cwd: None,
        wait: false,
    }
}

fn project_actions(config: &PanelConfig, paths: &PathTable) -> Vec<ActionDescriptor> {
    let project = paths.lookup("unreal_project");
    vec![
        action(
            "Open in Unreal",
            &["unreal", "unreal_project_file"],
            spawn(vec![
                arg(paths.lookup("unreal")),
                arg(paths.lookup("unreal_project_file")),
            ]),
        ),
        action(
            "Open in Visual Studio",
            &["sln_file"],
            ActionEffect::OpenFile(paths.lookup("sln_file")),
        ),
        action(
            "Open in VSCode",
            &["unreal_project", "vscode"],
            spawn(vec![arg(paths.lookup("vscode")), arg(project.clone())]),
        ),
        action(
            "Open Project Folder",
            &["unreal_project"],
            ActionEffect::OpenFile(project.clone()),
        ),
        action(
            "Open in Terminal",
            &["unreal_project"],
            terminal_effect(config.tools.terminal.as_deref(), &project),
        ),
    ]
}

fn build_actions(config: &PanelConfig, paths: &PathTable) -> Vec<ActionDescriptor> {
    let build = &config.build;
    vec![
        action(
            "Generate Project Files",
            &["unreal", "unreal_project_file"],
            ActionEffect::SpawnProcess {
                argv: vec![
                    arg(paths.lookup("unreal")),
                    arg(paths.lookup("unreal_project_file")),
                    "-projectfiles".to_string(),
                ],
                cwd: None,
                wait: true,
            },
        ),
        action(
            "Build Project",
            &["sln_file"],
            ActionEffect::SpawnProcess {
                argv: vec![
                    build.msbuild.clone(),
                    arg(paths.lookup("sln_file")),
                    format!("/p:Configuration={}", build.configuration),
                    format!("/p:Platform={}", build.platform),
                    "/t:build".to_string(),
                ],
                cwd: None,
                wait: true,
            },
        ),
    ]
}

fn config_file_actions(paths: &PathTable) -> Vec<ActionDescriptor> {
    let config_dir = paths.lookup("unreal_project").join("Config");
    CONFIG_FILES
        .iter()
        .map(|name| {
            action(
                &format!("Open {}", name),
                &["unreal_project"],
                ActionEffect::OpenFile(config_dir.join(name)),
            )
        })
        .collect()
}

fn terminal_effect(configured: Option<&[String]>, project: &Path) -> ActionEffect {
    if let Some(argv) = configured.filter(|argv| !argv.is_empty()) {
        return ActionEffect::SpawnProcess {
            argv: argv.to_vec(),
            cwd: Some(project.to_path_buf()),
            wait: false,
        };
    }

    if cfg!(windows) {
        spawn(vec![
            "cmd".to_string(),
            "/c".to_string(),
            "start".to_string(),
            "cmd".to_string(),
            "/K".to_string(),
            format!("cd /d {}", project.display()),
        ])
    } else if cfg!(target_os = "macos") {
        spawn(vec![
            "open".to_string(),
            "-a".to_string(),
            "Terminal".to_string(),
            arg(project.to_path_buf()),
        ])
    } else {
        let terminal =
            std::env::var("TERMINAL").unwrap_or_else(|_| "x-terminal-emulator".to_string());
        ActionEffect::SpawnProcess {
            argv: vec![terminal],
            cwd: Some(project.to_path_buf()),
            wait: false,
        }
    }
}
