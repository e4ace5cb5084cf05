use std::collections::VecDeque;
use std::io::Write;
use std::sync::mpsc;

use chrono::Local;
use ingestdesk_core::{update, Effect, Msg, Notification, NotificationLevel, SessionState};
use ingestdesk_engine::load_documents;
use ingestdesk_logging::{desk_error, desk_info, desk_warn};

use super::effects::{to_file_handle, EffectRunner};
use super::ui::commands::{ShellCommand, HELP_TEXT};
use super::ui::render::{format_notification, render};

/// Everything the console loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum AppInput {
    Msg(Msg),
    /// A raw line from the interactive shell.
    Line(String),
    Quit,
}

pub struct ConsoleApp<W: Write> {
    state: SessionState,
    runner: EffectRunner,
    out: W,
    /// Render after every change instead of once at the end.
    live_render: bool,
    errors_reported: usize,
}

impl<W: Write> ConsoleApp<W> {
    pub fn new(runner: EffectRunner, out: W, live_render: bool) -> Self {
        Self {
            state: SessionState::new(),
            runner,
            out,
            live_render,
            errors_reported: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn errors_reported(&self) -> usize {
        self.errors_reported
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for effect in effects {
            match effect {
                Effect::Notify(notification) => self.notify(&notification),
                other => self.runner.run(other),
            }
        }

        if was_dirty && self.live_render {
            self.render();
        }
    }

    /// Feeds `script` one message at a time, each once the session has
    /// settled, and returns when the script is exhausted and settled.
    pub fn run_script(&mut self, input_rx: &mpsc::Receiver<AppInput>, script: Vec<Msg>) {
        let mut pending = VecDeque::from(script);
        loop {
            while self.state.is_settled() {
                match pending.pop_front() {
                    Some(msg) => self.dispatch(msg),
                    None => {
                        self.render();
                        return;
                    }
                }
            }
            match input_rx.recv() {
                Ok(AppInput::Msg(msg)) => self.dispatch(msg),
                Ok(AppInput::Line(_)) => {}
                Ok(AppInput::Quit) | Err(_) => return,
            }
        }
    }

    pub fn run_shell(&mut self, input_rx: &mpsc::Receiver<AppInput>) {
        self.say(HELP_TEXT);
        self.dispatch(Msg::Mounted);
        while let Ok(input) = input_rx.recv() {
            match input {
                AppInput::Msg(msg) => self.dispatch(msg),
                AppInput::Line(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                AppInput::Quit => break,
            }
        }
        desk_info!("shell session ended");
    }

    /// Returns `false` when the shell should exit.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let command = match ShellCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(message) => {
                self.say(&message);
                return true;
            }
        };

        match command {
            ShellCommand::Select(paths) => match load_documents(&paths) {
                Ok(documents) => {
                    let files = documents.into_iter().map(to_file_handle).collect();
                    self.dispatch(Msg::FilesSelected(files));
                }
                Err(err) => {
                    desk_warn!("selection rejected: {}", err);
                    self.say(&format!("selection unchanged: {err}"));
                }
            },
            ShellCommand::Ingest => {
                let view = self.state.view();
                if view.can_cancel {
                    self.say("an upload is already in progress");
                } else if !view.can_submit {
                    self.say("no files selected; use `select <path>...`");
                }
                self.dispatch(Msg::UploadClicked);
            }
            ShellCommand::Cancel => {
                if !self.state.view().can_cancel {
                    self.say("no upload in progress");
                }
                self.dispatch(Msg::CancelUploadClicked);
            }
            ShellCommand::Purge => {
                if self.state.is_purging() {
                    self.say("a purge is already in progress");
                }
                self.dispatch(Msg::PurgeClicked);
            }
            ShellCommand::Refresh => self.dispatch(Msg::RefreshClicked),
            ShellCommand::Status => self.render(),
            ShellCommand::Help => self.say(HELP_TEXT),
            ShellCommand::Quit => return false,
        }
        true
    }

    fn notify(&mut self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => desk_info!("notification: {}", notification.message),
            NotificationLevel::Error => {
                self.errors_reported += 1;
                desk_error!("notification: {}", notification.message);
            }
        }
        let line = format_notification(notification, Local::now().time());
        self.say(&line);
    }

    fn render(&mut self) {
        let lines = render(&self.state.view());
        for line in lines {
            self.say(&line);
        }
    }

    fn say(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            desk_warn!("failed to write to console: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use ingestdesk_core::{FileHandle, UploadOutcome};
    use ingestdesk_engine::{
        BackendError, EngineHandle, FailureKind, IngestionBackend, UploadDocument, UploadReceipt,
    };

    use super::*;

    /// In-memory backend that records every call in order.
    struct RecordingBackend {
        registry: Mutex<Vec<String>>,
        calls: Mutex<Vec<&'static str>>,
        upload_error: Option<(u16, &'static str)>,
        uploads: AtomicUsize,
    }

    impl RecordingBackend {
        fn new(registry: &[&str], upload_error: Option<(u16, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                registry: Mutex::new(registry.iter().map(|n| n.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
                upload_error,
                uploads: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IngestionBackend for RecordingBackend {
        async fn list_ingested(&self) -> Result<Vec<String>, BackendError> {
            self.calls.lock().unwrap().push("list");
            Ok(self.registry.lock().unwrap().clone())
        }

        async fn upload(
            &self,
            documents: Vec<UploadDocument>,
        ) -> Result<UploadReceipt, BackendError> {
            self.calls.lock().unwrap().push("upload");
            self.uploads.fetch_add(1, Ordering::SeqCst);
            if let Some((status, text)) = self.upload_error {
                return Err(BackendError {
                    kind: FailureKind::HttpStatus(status),
                    message: format!("status {status}"),
                    body: Some(text.to_string()),
                });
            }
            let mut registry = self.registry.lock().unwrap();
            registry.extend(documents.into_iter().map(|doc| doc.file_name));
            Ok(UploadReceipt {
                status: 200,
                body: "{}".to_string(),
            })
        }

        async fn purge(&self) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push("purge");
            self.registry.lock().unwrap().clear();
            Err(BackendError {
                kind: FailureKind::HttpStatus(500),
                message: "status 500".to_string(),
                body: None,
            })
        }
    }

    fn app_for(
        backend: Arc<RecordingBackend>,
        live_render: bool,
    ) -> (ConsoleApp<Vec<u8>>, mpsc::Receiver<AppInput>) {
        let (engine, events) = EngineHandle::spawn(backend).unwrap();
        let (input_tx, input_rx) = mpsc::channel();
        let runner = EffectRunner::new(engine, events, input_tx);
        (ConsoleApp::new(runner, Vec::new(), live_render), input_rx)
    }

    fn output(app: &ConsoleApp<Vec<u8>>) -> String {
        String::from_utf8_lossy(&app.out).into_owned()
    }

    #[test]
    fn upload_script_uploads_then_refreshes_once() {
        let backend = RecordingBackend::new(&["banana", "Apple"], None);
        let (mut app, input_rx) = app_for(backend.clone(), false);

        app.run_script(
            &input_rx,
            vec![
                Msg::Mounted,
                Msg::FilesSelected(vec![FileHandle::new("cherry", b"c".to_vec())]),
                Msg::UploadClicked,
            ],
        );

        assert_eq!(backend.calls(), vec!["list", "upload", "list"]);
        assert_eq!(app.state().registry(), ["Apple", "banana", "cherry"]);
        assert_eq!(app.state().selected_files(), None);
        assert_eq!(app.state().last_upload(), Some(UploadOutcome::Succeeded));
        assert_eq!(app.errors_reported(), 0);
        assert!(output(&app).contains("OK  Document upload successful"));
    }

    #[test]
    fn failed_upload_reports_backend_text() {
        let backend = RecordingBackend::new(&[], Some((500, "disk full")));
        let (mut app, input_rx) = app_for(backend.clone(), false);

        app.run_script(
            &input_rx,
            vec![
                Msg::Mounted,
                Msg::FilesSelected(vec![
                    FileHandle::new("a.pdf", b"a".to_vec()),
                    FileHandle::new("b.pdf", b"b".to_vec()),
                ]),
                Msg::UploadClicked,
            ],
        );

        assert_eq!(backend.calls(), vec!["list", "upload", "list"]);
        assert_eq!(app.errors_reported(), 1);
        assert!(output(&app).contains("disk full"));
        assert_eq!(app.state().selected_files(), None);
    }

    #[test]
    fn purge_is_followed_by_exactly_one_fetch_even_on_failure() {
        let backend = RecordingBackend::new(&["a.pdf"], None);
        let (mut app, input_rx) = app_for(backend.clone(), false);

        app.run_script(&input_rx, vec![Msg::Mounted, Msg::PurgeClicked]);

        assert_eq!(backend.calls(), vec!["list", "purge", "list"]);
        assert!(app.state().registry().is_empty());
        assert_eq!(app.errors_reported(), 1);
    }

    #[test]
    fn shell_ingest_without_selection_sends_nothing() {
        let backend = RecordingBackend::new(&[], None);
        let (mut app, _input_rx) = app_for(backend.clone(), true);

        assert!(app.handle_line("ingest"));
        assert!(output(&app).contains("no files selected"));
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
        assert!(!app.handle_line("quit"));
    }

    #[test]
    fn shell_select_reports_unreadable_paths() {
        let backend = RecordingBackend::new(&[], None);
        let (mut app, _input_rx) = app_for(backend, true);

        assert!(app.handle_line("select /definitely/not/here.pdf"));
        assert!(output(&app).contains("selection unchanged"));
        assert_eq!(app.state().selected_files(), None);
    }
}
