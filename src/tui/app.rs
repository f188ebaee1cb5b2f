use std::io;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};

use super::message::TuiMessage;
use crate::dispatch::{self, outcome_effects, CommandDispatcher, Control, ControlKind, Effect};
use crate::logs::LogPane;
use crate::poller::PollerHandle;
use crate::shutdown::{self, ShutdownSignal};
use crate::status::{StatusBoard, StatusReporter, STATUS_FAILURE_MESSAGE};
use crate::toast::{Notifier, ToastKind};

/// Number of lines to scroll with mouse wheel
const MOUSE_SCROLL_LINES: usize = 3;

/// Which page the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Every project with its status and controls.
    List,
    /// One project with its log pane.
    Detail(String),
}

/// Components the dashboard drives, handed over at construction.
pub struct Bindings {
    pub status: PollerHandle,
    pub logs: PollerHandle,
    pub dispatcher: CommandDispatcher,
    pub shutdown: ShutdownSignal,
}

/// Display options.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub toast_delay: Duration,
    pub open_host: String,
    /// Shown in the header (usually the backend URL).
    pub backend_label: String,
    /// Start on this project's detail view.
    pub initial_project: Option<String>,
}

type Opener = fn(&str) -> io::Result<()>;

/// Dashboard state.
pub struct TuiApp {
    pub(super) board: StatusBoard,
    pub(super) logs: LogPane,
    pub(super) notifier: Notifier,
    reporter: StatusReporter,
    pub(super) view: View,
    /// Selected row in the list view.
    pub(super) selected: usize,
    /// Control waiting for the user to confirm.
    pub(super) pending_confirm: Option<Control>,
    pub(super) should_quit: bool,
    pub(super) backend_label: String,
    open_host: String,
    rx: Receiver<TuiMessage>,
    bindings: Bindings,
    opener: Opener,
}

impl TuiApp {
    /// Create the dashboard. When `initial_project` is set, the log poller
    /// must already be bound to it.
    pub fn new(rx: Receiver<TuiMessage>, bindings: Bindings, options: AppOptions) -> Self {
        let mut logs = LogPane::new();
        let view = match options.initial_project {
            Some(id) => {
                logs.bind(Some(id.clone()));
                View::Detail(id)
            }
            None => View::List,
        };
        Self {
            board: StatusBoard::new(),
            logs,
            notifier: Notifier::new(options.toast_delay),
            reporter: StatusReporter::new(),
            view,
            selected: 0,
            pending_confirm: None,
            should_quit: false,
            backend_label: options.backend_label,
            open_host: options.open_host,
            rx,
            bindings,
            opener: dispatch::open_url,
        }
    }

    /// Replace the function used to open project URLs.
    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Process pending messages and expire old toasts.
    pub fn process_messages(&mut self, now: Instant) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                TuiMessage::Projects { seq, result } => match result {
                    Ok(projects) => {
                        self.reporter.on_success();
                        if self.board.apply(seq, projects) {
                            self.clamp_selection();
                        }
                    }
                    Err(e) => {
                        if self.reporter.on_failure(&e, now) {
                            self.notifier.show("Error", STATUS_FAILURE_MESSAGE, ToastKind::Danger);
                        }
                    }
                },
                TuiMessage::Logs {
                    seq,
                    project_id,
                    lines,
                } => {
                    self.logs.apply(seq, &project_id, lines);
                }
                TuiMessage::CommandFinished {
                    project_id,
                    command,
                    result,
                } => {
                    tracing::debug!(
                        event = "client.command.outcome",
                        project_id = %project_id,
                        command = command.as_str()
                    );
                    for effect in outcome_effects(command, &result) {
                        self.apply_effect(effect, &project_id);
                    }
                }
            }
        }

        self.notifier.prune(now);

        if shutdown::requested() {
            self.quit();
        }
    }

    /// Apply one effect of a finished command on `project_id`.
    fn apply_effect(&mut self, effect: Effect, project_id: &str) {
        match effect {
            Effect::Toast { title, body, kind } => {
                self.notifier.show(&title, &body, kind);
            }
            Effect::RefreshStatuses => {
                self.bindings.status.refresh_now();
            }
            Effect::NavigateToList => {
                // Only leave the detail view of the project that was removed
                if matches!(&self.view, View::Detail(id) if id == project_id) {
                    self.show_list();
                }
                self.bindings.status.refresh_now();
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.board.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Project the controls act on: the detail project, or the selected row.
    pub(super) fn target_project(&self) -> Option<&str> {
        match &self.view {
            View::Detail(id) => Some(id.as_str()),
            View::List => self.board.rows().get(self.selected).map(|r| r.id()),
        }
    }

    /// Activate a control on the target project. Disabled controls are inert.
    pub fn activate(&mut self, kind: ControlKind) {
        let Some(project_id) = self.target_project() else {
            return;
        };
        let Some(control) = Control::resolve(&self.board, project_id, kind) else {
            return;
        };
        if control.needs_confirmation() {
            self.pending_confirm = Some(control);
        } else {
            self.execute(control);
        }
    }

    /// Answer the pending confirmation. Declining issues no request.
    pub fn confirm(&mut self, accepted: bool) {
        if let Some(control) = self.pending_confirm.take() {
            if accepted {
                self.execute(control);
            }
        }
    }

    fn execute(&mut self, control: Control) {
        match control.kind.command() {
            Some(command) => {
                if let Err(e) = self.bindings.dispatcher.dispatch(&control.project_id, command) {
                    tracing::error!(event = "client.command.spawn_failed", error = %e);
                    self.notifier.danger(command.fallback_error());
                }
            }
            None => self.open_project(&control.project_id),
        }
    }

    fn open_project(&mut self, project_id: &str) {
        let Some(port) = self.board.row(project_id).and_then(|r| r.project.port) else {
            return;
        };
        let url = dispatch::project_url(&self.open_host, port);
        match (self.opener)(&url) {
            Ok(()) => {
                self.notifier.show("Info", &format!("Opening {}", url), ToastKind::Info);
            }
            Err(e) => {
                tracing::error!(event = "client.open.failed", url = %url, error = %e);
                self.notifier.danger(&format!("Failed to open {}", url));
            }
        }
    }

    /// Switch to a project's detail view and bind the log poller to it.
    pub fn open_detail(&mut self, project_id: &str) {
        self.view = View::Detail(project_id.to_string());
        self.logs.bind(Some(project_id.to_string()));
        self.bindings.logs.bind(Some(project_id.to_string()));
    }

    /// Switch to the list view and unbind the log poller.
    pub fn show_list(&mut self) {
        if let View::Detail(id) = &self.view {
            if let Some(index) = self.board.rows().iter().position(|r| r.id() == id) {
                self.selected = index;
            }
        }
        self.view = View::List;
        self.logs.bind(None);
        self.bindings.logs.bind(None);
    }

    fn quit(&mut self) {
        self.should_quit = true;
        self.bindings.shutdown.trigger();
    }

    /// Handle a key event. `page_height` is the visible height of the log pane.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers, page_height: usize) {
        // Handle confirmation modal first
        if self.pending_confirm.is_some() {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.confirm(false),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => return self.quit(),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return self.quit(),
            KeyCode::Char('R') => {
                self.bindings.status.refresh_now();
                return;
            }
            KeyCode::Char('c') => return self.notifier.dismiss_all(),
            KeyCode::Char('s') => return self.activate(ControlKind::Start),
            KeyCode::Char('x') => return self.activate(ControlKind::Stop),
            KeyCode::Char('o') => return self.activate(ControlKind::Open),
            KeyCode::Char('r') => return self.activate(ControlKind::Remove),
            _ => {}
        }

        match self.view {
            View::List => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.selected += 1;
                    self.clamp_selection();
                }
                KeyCode::Enter => {
                    if let Some(id) = self.target_project().map(str::to_string) {
                        self.open_detail(&id);
                    }
                }
                _ => {}
            },
            View::Detail(_) => match key {
                KeyCode::Esc | KeyCode::Backspace => self.show_list(),
                KeyCode::Up | KeyCode::Char('k') => self.logs.scroll_up(1),
                KeyCode::Down | KeyCode::Char('j') => self.logs.scroll_down(1),
                KeyCode::PageUp => self.logs.scroll_up(page_height.max(1)),
                KeyCode::PageDown => self.logs.scroll_down(page_height.max(1)),
                KeyCode::Home => self.logs.scroll_to_top(),
                KeyCode::End => self.logs.scroll_to_bottom(),
                _ => {}
            },
        }
    }

    /// Handle mouse scroll event.
    pub fn handle_mouse_scroll(&mut self, up: bool) {
        if self.pending_confirm.is_some() || !matches!(self.view, View::Detail(_)) {
            return;
        }
        if up {
            self.logs.scroll_up(MOUSE_SCROLL_LINES);
        } else {
            self.logs.scroll_down(MOUSE_SCROLL_LINES);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Sender};
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::api::{
        ApiError, CommandKind, CommandReply, Project, ProjectStatus, StubBackend, StubCall,
    };
    use crate::poller::PollControl;
    use crate::status::BadgeStyle;

    struct Harness {
        app: TuiApp,
        tx: Sender<TuiMessage>,
        stub: Arc<StubBackend>,
        status_rx: Receiver<PollControl>,
        logs_rx: Receiver<PollControl>,
    }

    fn harness() -> Harness {
        let stub = Arc::new(StubBackend::new());
        let (tx, rx) = mpsc::channel();
        let (status, status_rx) = PollerHandle::detached();
        let (logs, logs_rx) = PollerHandle::detached();
        let bindings = Bindings {
            status,
            logs,
            dispatcher: CommandDispatcher::new(stub.clone(), tx.clone()),
            shutdown: ShutdownSignal::new(),
        };
        let options = AppOptions {
            toast_delay: Duration::from_secs(5),
            open_host: "localhost".to_string(),
            backend_label: "stub".to_string(),
            initial_project: None,
        };
        let app = TuiApp::new(rx, bindings, options).with_opener(|_| Ok(()));
        Harness {
            app,
            tx,
            stub,
            status_rx,
            logs_rx,
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            Project::new("web", ProjectStatus::Running).with_port(5001),
            Project::new("api", ProjectStatus::Stopped).with_port(5002),
        ]
    }

    fn load(h: &mut Harness, seq: u64, projects: Vec<Project>) {
        h.tx.send(TuiMessage::Projects {
            seq,
            result: Ok(projects),
        })
        .unwrap();
        h.app.process_messages(Instant::now());
    }

    fn pump_until(h: &mut Harness, done: impl Fn(&TuiApp) -> bool) {
        for _ in 0..200 {
            h.app.process_messages(Instant::now());
            if done(&h.app) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached");
    }

    fn drain(rx: &Receiver<PollControl>) -> Vec<PollControl> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_projects_render_rows() {
        let mut h = harness();
        load(&mut h, 1, projects());

        let web = h.app.board.row("web").unwrap();
        assert_eq!(web.badge.style, BadgeStyle::Success);
        assert!(!web.controls.start);
        assert!(web.controls.stop);
    }

    #[test]
    fn test_start_success_refreshes_exactly_once() {
        let mut h = harness();
        load(&mut h, 1, projects());
        h.app.selected = 1; // api, stopped

        h.app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE, 10);
        pump_until(&mut h, |app| !app.notifier.toasts().is_empty());

        assert_eq!(h.stub.calls(), vec![StubCall::Command("api".to_string(), CommandKind::Start)]);
        assert_eq!(drain(&h.status_rx), vec![PollControl::RefreshNow]);
        assert_eq!(h.app.notifier.toasts()[0].kind, ToastKind::Success);
    }

    #[test]
    fn test_stop_failure_toasts_without_refresh() {
        let mut h = harness();
        h.stub.set_command_reply(CommandKind::Stop, Ok(CommandReply::failed("")));
        load(&mut h, 1, projects());

        h.app.activate(ControlKind::Stop);
        pump_until(&mut h, |app| !app.notifier.toasts().is_empty());

        let toast = &h.app.notifier.toasts()[0];
        assert_eq!(toast.kind, ToastKind::Danger);
        assert_eq!(toast.body, "Failed to stop project");
        assert!(drain(&h.status_rx).is_empty());
    }

    #[test]
    fn test_disabled_control_is_inert() {
        let mut h = harness();
        load(&mut h, 1, projects());

        // web is running: start is disabled
        h.app.activate(ControlKind::Start);
        thread::sleep(Duration::from_millis(20));
        h.app.process_messages(Instant::now());
        assert!(h.stub.calls().is_empty());
    }

    #[test]
    fn test_remove_declined_issues_no_request() {
        let mut h = harness();
        load(&mut h, 1, projects());

        h.app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE, 10);
        assert!(h.app.pending_confirm.is_some());

        h.app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE, 10);
        assert!(h.app.pending_confirm.is_none());
        thread::sleep(Duration::from_millis(20));
        assert!(h.stub.calls().is_empty());
    }

    #[test]
    fn test_remove_confirmed_navigates_to_list() {
        let mut h = harness();
        load(&mut h, 1, projects());
        h.app.open_detail("api");
        assert_eq!(drain(&h.logs_rx), vec![PollControl::Bind(Some("api".to_string()))]);

        h.app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE, 10);
        h.app.handle_key(KeyCode::Char('y'), KeyModifiers::NONE, 10);
        pump_until(&mut h, |app| app.view == View::List);

        assert_eq!(h.stub.calls(), vec![StubCall::Command("api".to_string(), CommandKind::Remove)]);
        assert_eq!(drain(&h.logs_rx), vec![PollControl::Bind(None)]);
        assert_eq!(drain(&h.status_rx), vec![PollControl::RefreshNow]);
        assert!(h.app.logs.bound().is_none());
    }

    #[test]
    fn test_late_remove_reply_keeps_other_detail_view() {
        let mut h = harness();
        load(&mut h, 1, projects());
        h.app.open_detail("web");
        drain(&h.logs_rx);

        h.tx.send(TuiMessage::CommandFinished {
            project_id: "api".to_string(),
            command: CommandKind::Remove,
            result: Ok(CommandReply::ok("Project api removed")),
        })
        .unwrap();
        h.app.process_messages(Instant::now());

        assert_eq!(h.app.view, View::Detail("web".to_string()));
        assert_eq!(h.app.logs.bound(), Some("web"));
        assert!(drain(&h.logs_rx).is_empty());
        assert_eq!(drain(&h.status_rx), vec![PollControl::RefreshNow]);
        assert_eq!(h.app.notifier.toasts()[0].kind, ToastKind::Success);
    }

    #[test]
    fn test_remove_reply_on_list_view_refreshes() {
        let mut h = harness();
        load(&mut h, 1, projects());

        h.tx.send(TuiMessage::CommandFinished {
            project_id: "api".to_string(),
            command: CommandKind::Remove,
            result: Ok(CommandReply::ok("Project api removed")),
        })
        .unwrap();
        h.app.process_messages(Instant::now());

        assert_eq!(h.app.view, View::List);
        assert!(drain(&h.logs_rx).is_empty());
        assert_eq!(drain(&h.status_rx), vec![PollControl::RefreshNow]);
    }

    #[test]
    fn test_failed_fetch_keeps_rows_and_toasts_once() {
        let mut h = harness();
        load(&mut h, 1, projects());

        for seq in 2..5 {
            h.tx.send(TuiMessage::Projects {
                seq,
                result: Err(ApiError::Status(500)),
            })
            .unwrap();
        }
        h.app.process_messages(Instant::now());

        assert_eq!(h.app.board.rows().len(), 2);
        assert_eq!(h.app.notifier.toasts().len(), 1);
        assert_eq!(h.app.notifier.toasts()[0].body, STATUS_FAILURE_MESSAGE);
    }

    #[test]
    fn test_offline_fetch_is_quiet() {
        let mut h = harness();
        load(&mut h, 1, projects());

        h.tx.send(TuiMessage::Projects {
            seq: 2,
            result: Err(ApiError::Offline("refused".into())),
        })
        .unwrap();
        h.app.process_messages(Instant::now());

        assert_eq!(h.app.board.rows().len(), 2);
        assert!(h.app.notifier.toasts().is_empty());
    }

    #[test]
    fn test_log_messages_fill_detail_pane() {
        let mut h = harness();
        load(&mut h, 1, projects());

        h.app.handle_key(KeyCode::Enter, KeyModifiers::NONE, 10);
        assert_eq!(h.app.view, View::Detail("web".to_string()));

        h.tx.send(TuiMessage::Logs {
            seq: 1,
            project_id: "web".to_string(),
            lines: vec!["a".into(), "b".into()],
        })
        .unwrap();
        h.tx.send(TuiMessage::Logs {
            seq: 2,
            project_id: "api".to_string(),
            lines: vec!["x".into()],
        })
        .unwrap();
        h.app.process_messages(Instant::now());
        assert_eq!(h.app.logs.lines(), &["a".to_string(), "b".to_string()]);

        h.app.handle_key(KeyCode::Esc, KeyModifiers::NONE, 10);
        assert_eq!(h.app.view, View::List);
        assert!(h.app.logs.lines().is_empty());
    }

    #[test]
    fn test_open_running_project() {
        let mut h = harness();
        load(&mut h, 1, projects());

        h.app.activate(ControlKind::Open);
        assert_eq!(h.app.notifier.toasts()[0].body, "Opening http://localhost:5001");
    }

    #[test]
    fn test_selection_clamped_when_rows_shrink() {
        let mut h = harness();
        load(&mut h, 1, projects());
        h.app.handle_key(KeyCode::Down, KeyModifiers::NONE, 10);
        h.app.handle_key(KeyCode::Down, KeyModifiers::NONE, 10);
        assert_eq!(h.app.selected, 1);

        load(&mut h, 2, vec![Project::new("web", ProjectStatus::Running)]);
        assert_eq!(h.app.selected, 0);
    }

    #[test]
    fn test_quit_triggers_shutdown_signal() {
        let mut h = harness();
        h.app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, 10);
        assert!(h.app.should_quit());
        assert!(h.app.bindings.shutdown.is_shutdown());
    }
}
