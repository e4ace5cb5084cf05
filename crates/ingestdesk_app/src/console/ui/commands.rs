use std::path::PathBuf;

/// One line typed into the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Replace the selection. An empty list clears it.
    Select(Vec<PathBuf>),
    Ingest,
    Cancel,
    Purge,
    Refresh,
    Status,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  select <path>...   choose files to ingest (no paths clears the selection)
  ingest             upload the selected files
  cancel             abort the upload in progress
  refresh            reload the list of ingested files
  purge              remove all ingested files from the backend
  status             show the current session
  help               show this help
  quit               leave the shell
Paths are separated by whitespace.";

impl ShellCommand {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "select" | "sel" => ShellCommand::Select(words.by_ref().map(PathBuf::from).collect()),
            "ingest" | "upload" => ShellCommand::Ingest,
            "cancel" => ShellCommand::Cancel,
            "purge" => ShellCommand::Purge,
            "refresh" | "list" | "ls" => ShellCommand::Refresh,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command {other:?}; type `help`")),
        };

        if !matches!(command, ShellCommand::Select(_)) && words.next().is_some() {
            return Err(format!("`{verb}` takes no arguments"));
        }
        Ok(Some(command))
    }
}
