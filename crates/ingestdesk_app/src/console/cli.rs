use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::settings::Settings;

/// Select local documents, upload them to the ingestion service and manage
/// what it has already ingested.
#[derive(Debug, Parser)]
#[command(name = "ingestdesk", version, about)]
pub struct Cli {
    /// Settings file (RON). Defaults to ./ingestdesk.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the ingestion service.
    #[arg(long, env = "INGESTDESK_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Give up on a request after this many seconds (default: wait forever).
    #[arg(long, global = true)]
    pub request_timeout_secs: Option<u64>,

    /// Log level override (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Mirror the log to the terminal as well as the log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the files the service has ingested.
    List,
    /// Upload files as one ingestion request, then print the refreshed list.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove every ingested file from the service.
    Purge,
    /// Interactive session (the default).
    Shell,
    /// Write a settings file with default values.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.backend_url {
            settings.backend_url = url.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout_secs = Some(secs);
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_requires_paths() {
        assert!(Cli::try_parse_from(["ingestdesk", "upload"]).is_err());

        let cli = Cli::try_parse_from(["ingestdesk", "upload", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Upload {
                paths: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]
            })
        );
    }

    #[test]
    fn flags_override_file_settings() {
        let cli = Cli::try_parse_from([
            "ingestdesk",
            "list",
            "--backend-url",
            "http://10.0.0.5:5555",
            "--request-timeout-secs",
            "30",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.backend_url, "http://10.0.0.5:5555");
        assert_eq!(settings.request_timeout_secs, Some(30));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["ingestdesk"]).unwrap();
        assert_eq!(cli.command, None);
    }
}
