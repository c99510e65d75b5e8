use crate::catalog;
use crate::config::PanelConfig;
use crate::dispatcher::Dispatcher;
use crate::logging::LogBuffer;
use crate::poller::{self, Poller};
use crate::resolver;
use crate::tasks::TaskRunner;
use crate::types::{ActivePane, Availability, BindingId, BindingTarget, ControlBinding, DialogButton};
use notify::Event as NotifyEvent;
use notify::EventKind;
use ratatui::widgets::ListState;
use std::sync::mpsc::Receiver;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct App {
    pub bindings: Vec<ControlBinding>,
    pub list_state: ListState,
    pub found_entries: Vec<(String, bool)>,
    pub active_pane: ActivePane,
    pub log: LogBuffer,
    /// Lines scrolled back from the newest log line; 0 follows the tail.
    pub log_scroll: usize,
    pub show_confirm_dialog: bool,
    pub show_help_dialog: bool,
    pub dialog_button: DialogButton,
    dispatcher: Dispatcher,
    runner: TaskRunner<BindingId>,
    completions: Receiver<BindingId>,
    poller: Poller,
    fs_events: Option<Receiver<Result<NotifyEvent, notify::Error>>>,
}

impl App {
    pub fn new(config: &PanelConfig, dispatcher: Dispatcher, log: LogBuffer) -> Self {
        let bindings = catalog::build_bindings(config, dispatcher.paths());
        let (runner, completions) = TaskRunner::new();

        let mut list_state = ListState::default();
        if !bindings.is_empty() {
            list_state.select(Some(0));
        }

        let mut app = App {
            bindings,
            list_state,
            found_entries: Vec::new(),
            active_pane: ActivePane::Controls,
            log,
            log_scroll: 0,
            show_confirm_dialog: false,
            show_help_dialog: false,
            dialog_button: DialogButton::Ok,
            dispatcher,
            runner,
            completions,
            poller: Poller::new(config.poll_interval()),
            fs_events: None,
        };

        app.refresh();
        app
    }

    pub fn with_fs_events(mut self, fs_events: Receiver<Result<NotifyEvent, notify::Error>>) -> Self {
        self.fs_events = Some(fs_events);
        self
    }

    pub fn next(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.bindings.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.bindings.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_binding(&self) -> Option<&ControlBinding> {
        self.list_state.selected().and_then(|i| self.bindings.get(i))
    }

    pub fn scroll_log_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    pub fn scroll_log_up(&mut self) {
        if self.log_scroll < self.log.len().saturating_sub(1) {
            self.log_scroll += 1;
        }
    }

    pub fn toggle_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Controls => ActivePane::Log,
            ActivePane::Log => ActivePane::Controls,
        };
    }

    /// Enter on the selected control. Deletions ask for confirmation first.
    pub fn activate_selected(&mut self) {
        let Some(binding) = self.selected_binding() else {
            return;
        };
        if binding.state != Availability::Available {
            debug!("{} is not available", binding.label);
            return;
        }
        if binding.is_destructive() {
            self.show_confirm_dialog = true;
            self.dialog_button = DialogButton::Ok;
        } else {
            let id = binding.id;
            self.trigger(id);
        }
    }

    pub fn confirm_selected(&mut self) {
        if self.dialog_button == DialogButton::Ok {
            if let Some(id) = self.list_state.selected() {
                self.trigger(id);
            }
        }
        self.show_confirm_dialog = false;
        self.dialog_button = DialogButton::Ok;
    }

    /// Starts the binding's action on a worker. The binding stays in progress
    /// until its completion message is processed. Returns false when the
    /// binding is not currently available.
    pub fn trigger(&mut self, id: BindingId) -> bool {
        let Some(binding) = self.bindings.get_mut(id) else {
            return false;
        };
        if binding.state != Availability::Available {
            return false;
        }

        let dispatcher = self.dispatcher.clone();
        let task: Box<dyn FnOnce() + Send> = match binding.target.clone() {
            BindingTarget::Action(descriptor) => Box::new(move || dispatcher.execute(&descriptor)),
            BindingTarget::DeleteFolder(Some(folder)) => {
                Box::new(move || dispatcher.delete_path(&folder))
            }
            BindingTarget::DeleteFolder(None) => return false,
            BindingTarget::DeleteAll(folders) => Box::new(move || dispatcher.delete_all(&folders)),
        };

        info!("{}", binding.label);
        binding.state = Availability::InProgress;
        self.runner.run(task, Some(id));
        true
    }

    /// Applies completion messages posted by workers since the last frame.
    pub fn check_completions(&mut self) {
        while let Ok(id) = self.completions.try_recv() {
            self.on_task_finished(id);
        }
    }

    fn on_task_finished(&mut self, id: BindingId) {
        if let Some(binding) = self.bindings.get_mut(id) {
            debug!("{} finished", binding.label);
            binding.state = Availability::from_exists(poller::is_available(
                &binding.target,
                self.dispatcher.paths(),
            ));
        }
        self.refresh();
    }

    pub fn check_fs_events(&mut self) {
        let Some(fs_events) = &self.fs_events else {
            return;
        };
        let mut changed = false;
        while let Ok(event) = fs_events.try_recv() {
            match event {
                Ok(event) => {
                    if matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_)
                    ) {
                        changed = true;
                    }
                }
                Err(e) => warn!("Filesystem watch error: {}", e),
            }
        }
        if changed {
            self.poller.request_refresh();
        }
    }

    pub fn request_refresh(&mut self) {
        self.poller.request_refresh();
    }

    /// Runs a poll tick if one is due.
    pub fn tick(&mut self) {
        if self.poller.is_due(Instant::now()) {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let paths = self.dispatcher.paths();
        self.poller.tick(&mut self.bindings, paths);
        self.found_entries = paths
            .keys()
            .map(|key| (resolver::display_name(key), paths.exists(key)))
            .collect();
    }

    pub fn running_tasks(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| b.state == Availability::InProgress)
            .count()
    }

    #[cfg(test)]
    fn wait_for_completion(&mut self, timeout: std::time::Duration) -> Option<BindingId> {
        let id = self.completions.recv_timeout(timeout).ok()?;
        self.on_task_finished(id);
        Some(id)
    }
}
