//! Terminal front end: settings, logging, and the message loop around the core.
mod app;
mod cli;
mod effects;
mod settings;
mod ui;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use ingestdesk_core::{Msg, UploadOutcome};
use ingestdesk_engine::{load_documents, EngineHandle};
use ingestdesk_logging::{desk_info, LogDestination};

use app::{AppInput, ConsoleApp};
pub use cli::{Cli, Command};
use effects::{to_file_handle, EffectRunner};
use settings::{load_settings, save_settings, Settings, SETTINGS_FILENAME};

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));
    let command = cli.command.clone().unwrap_or(Command::Shell);

    if let Command::InitConfig { force } = command {
        save_settings(&settings_path, &Settings::default(), force)?;
        println!("Wrote default settings to {}", settings_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut settings = load_settings(&settings_path, cli.config.is_some())?;
    cli.apply_overrides(&mut settings);
    let level = settings.level_filter()?;
    let destination = if cli.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    };
    ingestdesk_logging::initialize(destination, level, settings.log_file.as_deref());
    desk_info!("ingestdesk starting against {}", settings.backend_url);

    let (engine, events) = EngineHandle::with_settings(settings.backend_settings())
        .context("could not start the backend engine")?;
    let (input_tx, input_rx) = mpsc::channel();
    let runner = EffectRunner::new(engine, events, input_tx.clone());

    let interactive = command == Command::Shell;
    let mut app = ConsoleApp::new(runner, io::stdout(), interactive);

    match command {
        Command::List => app.run_script(&input_rx, vec![Msg::Mounted]),
        Command::Upload { paths } => {
            let documents = load_documents(&paths).context("could not read the selected files")?;
            let files = documents.into_iter().map(to_file_handle).collect();
            app.run_script(
                &input_rx,
                vec![Msg::Mounted, Msg::FilesSelected(files), Msg::UploadClicked],
            );
        }
        Command::Purge => app.run_script(&input_rx, vec![Msg::Mounted, Msg::PurgeClicked]),
        Command::Shell => {
            spawn_stdin_reader(input_tx);
            app.run_shell(&input_rx);
            return Ok(ExitCode::SUCCESS);
        }
        Command::InitConfig { .. } => return Ok(ExitCode::SUCCESS),
    }

    let upload_failed = app.state().last_upload() == Some(UploadOutcome::Failed);
    if app.errors_reported() == 0 && !upload_failed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(AppInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(AppInput::Quit);
    });
}
